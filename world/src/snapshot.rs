//! Order-stable fingerprint of a whole [`State`].

use std::fmt;

use pixel_rail_core::Shooter;
use sha2::{Digest, Sha256};

use crate::State;

const SNAPSHOT_DOMAIN: &[u8] = b"pixel-rail:snapshot:v1";

/// 64-bit digest of grid contents, queues, rail, waiting slots and tick.
///
/// Two states produce the same snapshot exactly when they would play out
/// identically; the value is stable across platforms and toolchains.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Snapshot(u64);

impl Snapshot {
    /// Numeric digest value.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

impl State {
    /// Captures the fingerprint of the current state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let mut hasher = Sha256::new();
        hasher.update(SNAPSHOT_DOMAIN);
        hasher.update(self.tick().to_le_bytes());
        hasher.update(len_bytes(self.capacity()));
        hasher.update([self.policy() as u8]);
        self.grid().feed(&mut hasher);

        hasher.update(len_bytes(self.queue_count()));
        for queue in self.deck().queues() {
            hasher.update(len_bytes(queue.len()));
            for shooter in queue {
                feed_shooter(&mut hasher, shooter);
            }
        }

        hasher.update(len_bytes(self.active().len()));
        for active in self.active() {
            feed_shooter(&mut hasher, active.shooter());
            hasher.update(len_bytes(active.rail_index()));
            hasher.update(len_bytes(active.start_index()));
            hasher.update(len_bytes(active.lap_progress()));
            hasher.update([u8::from(active.is_dry()), u8::from(active.is_stalled())]);
        }

        for slot in self.waiting().slots() {
            match slot {
                Some(shooter) => {
                    hasher.update([1u8]);
                    feed_shooter(&mut hasher, shooter);
                }
                None => hasher.update([0u8]),
            }
        }

        Snapshot(finalize_digest(hasher))
    }
}

fn feed_shooter(hasher: &mut Sha256, shooter: &Shooter) {
    hasher.update(shooter.id().get().to_le_bytes());
    hasher.update([shooter.color().index()]);
    hasher.update(shooter.ammo().to_le_bytes());
}

fn len_bytes(value: usize) -> [u8; 8] {
    u64::try_from(value).unwrap_or(u64::MAX).to_le_bytes()
}

/// Truncates a SHA-256 digest to its first eight bytes, little-endian.
#[must_use]
pub fn finalize_digest(hasher: Sha256) -> u64 {
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}
