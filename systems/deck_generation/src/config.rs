//! Tunable generator parameters.

use pixel_rail_core::MismatchPolicy;
use pixel_rail_system_validation::{PlayRules, DEFAULT_CAPACITY, DEFAULT_MAX_SIM_STEPS};
use serde::{Deserialize, Serialize};

use crate::GenerationError;

/// One ammo size class a shooter can be rolled into.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Bucket {
    /// Preferred ammo for shooters in this class.
    pub target: u32,
    /// Relative chance of rolling this class.
    pub probability: f64,
}

impl Bucket {
    /// Creates a bucket.
    #[must_use]
    pub const fn new(target: u32, probability: f64) -> Self {
        Self {
            target,
            probability,
        }
    }
}

/// Large, medium and small ammo classes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SizeBuckets {
    /// Big shooters.
    pub large: Bucket,
    /// Middle-sized shooters.
    pub medium: Bucket,
    /// Small shooters.
    pub small: Bucket,
}

impl Default for SizeBuckets {
    fn default() -> Self {
        Self {
            large: Bucket::new(20, 0.25),
            medium: Bucket::new(10, 0.45),
            small: Bucket::new(5, 0.30),
        }
    }
}

impl SizeBuckets {
    pub(crate) fn iter(&self) -> impl DoubleEndedIterator<Item = &Bucket> {
        [&self.large, &self.medium, &self.small].into_iter()
    }

    pub(crate) fn total_probability(&self) -> f64 {
        self.iter().map(|bucket| bucket.probability).sum()
    }
}

/// Every knob of the constructive generator and its retry loop.
///
/// Missing fields fall back to [`GeneratorConfig::default`], so a style file
/// only needs to name what it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Root seed; each attempt derives its own stream from it.
    pub seed: u64,
    /// Shooters allowed on the rail during the solvability run.
    pub capacity: usize,
    /// Number of deck queues the shooters are dealt into.
    pub queue_count: usize,
    /// Smallest ammo a shooter is given when the color has enough pixels left.
    pub min_ammo: u32,
    /// Largest ammo a single shooter may carry.
    pub max_ammo: u32,
    /// Ammo size classes.
    pub buckets: SizeBuckets,
    /// Prefer a different color than the previous shooter.
    pub alternate_colors: bool,
    /// Longest run of consecutive same-color shooters while other colors remain.
    pub max_run: u32,
    /// Extra weight per pixel a color exposes to a single lap.
    pub exposure_bias: u32,
    /// Upper bound on shooters per deck; exceeding it fails the attempt.
    pub max_shooters: usize,
    /// Attempts before giving up.
    pub max_attempts: u32,
    /// Tick ceiling for each solvability run.
    pub max_sim_steps: u32,
    /// Mismatch rule the deck must be solvable under.
    pub policy: MismatchPolicy,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            capacity: DEFAULT_CAPACITY,
            queue_count: 3,
            min_ammo: 5,
            max_ammo: 40,
            buckets: SizeBuckets::default(),
            alternate_colors: true,
            max_run: 2,
            exposure_bias: 1,
            max_shooters: 512,
            max_attempts: 20,
            max_sim_steps: DEFAULT_MAX_SIM_STEPS,
            policy: MismatchPolicy::default(),
        }
    }
}

impl GeneratorConfig {
    /// Rejects parameter combinations the generator cannot work with.
    pub fn validate(&self) -> Result<(), GenerationError> {
        let invalid = |reason: &str| -> Result<(), GenerationError> {
            Err(GenerationError::InvalidConfig(reason.to_owned()))
        };
        if self.min_ammo == 0 {
            return invalid("min_ammo must be at least 1");
        }
        if self.min_ammo > self.max_ammo {
            return invalid("min_ammo must not exceed max_ammo");
        }
        if self.queue_count == 0 {
            return invalid("queue_count must be at least 1");
        }
        if self.max_attempts == 0 {
            return invalid("max_attempts must be at least 1");
        }
        if self.max_run == 0 {
            return invalid("max_run must be at least 1");
        }
        if self
            .buckets
            .iter()
            .any(|bucket| !bucket.probability.is_finite() || bucket.probability < 0.0)
        {
            return invalid("bucket probabilities must be finite and non-negative");
        }
        if self.buckets.total_probability() <= 0.0 {
            return invalid("at least one bucket needs a positive probability");
        }
        Ok(())
    }

    /// Rules the solvability check plays under.
    #[must_use]
    pub fn play_rules(&self) -> PlayRules {
        PlayRules {
            capacity: self.capacity,
            policy: self.policy,
            max_sim_steps: self.max_sim_steps,
        }
    }
}
