#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic deck generation with validate-and-retry.
//!
//! Each attempt drafts shooters color by color until the remaining ammo for
//! every grid color reaches zero, deals them round-robin into the deck queues
//! and hands the deck to the validator. A rejected attempt is retried with a
//! seed derived from the root seed and the attempt number.

mod config;

use std::collections::BTreeMap;

use pixel_rail_core::{Color, Shooter, ShooterId};
use pixel_rail_system_validation::{validate_deck, ValidationError, ValidationReport};
use pixel_rail_world::{finalize_digest, Deck, Grid, State};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, info, warn};

pub use config::{Bucket, GeneratorConfig, SizeBuckets};

const RNG_STREAM_ATTEMPT: &str = "pixel-rail:deck-attempt";

/// Divisor applied to the previous color's weight when alternating.
const ALTERNATION_PENALTY: u64 = 4;

/// Why a single attempt produced no usable deck.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AttemptFailure {
    /// Drafting needed more shooters than the configured ceiling.
    #[error("deck needed more than {limit} shooters")]
    ShooterCeiling {
        /// Configured ceiling.
        limit: usize,
    },
    /// The drafted deck failed validation.
    #[error("deck rejected ({0})")]
    Rejected(#[from] ValidationError),
}

/// Failure surfaced to callers of the generator.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The configuration cannot drive the generator.
    #[error("invalid generator config: {0}")]
    InvalidConfig(String),
    /// Every attempt failed.
    #[error("could not generate a solvable deck in {attempts} attempts; last: {last}")]
    Exhausted {
        /// Attempts made.
        attempts: u32,
        /// Failure of the final attempt.
        #[source]
        last: AttemptFailure,
    },
}

/// A validated deck and the attempt that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedDeck {
    /// The deck, dealt into the configured number of queues.
    pub deck: Deck,
    /// Seed of the successful attempt.
    pub seed: u64,
    /// Attempts made, including the successful one.
    pub attempts: u32,
    /// Validator summary for the deck.
    pub report: ValidationReport,
}

/// Generates decks for grids under a fixed configuration.
#[derive(Debug)]
pub struct DeckGenerator {
    config: GeneratorConfig,
    weight_workspace: Vec<(Color, u64)>,
}

impl DeckGenerator {
    /// Creates a generator after checking the configuration.
    pub fn new(config: GeneratorConfig) -> Result<Self, GenerationError> {
        config.validate()?;
        Ok(Self {
            config,
            weight_workspace: Vec::new(),
        })
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Drafts, validates and retries until a deck passes or attempts run out.
    pub fn generate(&mut self, grid: &Grid) -> Result<GeneratedDeck, GenerationError> {
        let rules = self.config.play_rules();
        let mut attempts = 0;
        loop {
            let seed = attempt_seed(self.config.seed, attempts);
            attempts += 1;

            let failure = match self.draft(grid, seed) {
                Ok(shooters) => {
                    let deck = Deck::from_shooters(shooters, self.config.queue_count);
                    match validate_deck(grid, &deck, &rules) {
                        Ok(report) => {
                            info!(
                                attempts,
                                seed,
                                shooters = deck.len(),
                                steps = report.outcome.steps,
                                "deck generated"
                            );
                            return Ok(GeneratedDeck {
                                deck,
                                seed,
                                attempts,
                                report,
                            });
                        }
                        Err(error) => AttemptFailure::from(error),
                    }
                }
                Err(failure) => failure,
            };

            debug!(attempt = attempts, seed, %failure, "generation attempt failed");
            if attempts >= self.config.max_attempts {
                warn!(attempts, %failure, "deck generation exhausted its attempts");
                return Err(GenerationError::Exhausted {
                    attempts,
                    last: failure,
                });
            }
        }
    }

    /// Drafts the flat shooter list for one attempt without validating it.
    ///
    /// Per color, the ammo of the drafted shooters sums to the grid's pixel
    /// count for that color, and no other color is drafted.
    pub fn draft(&mut self, grid: &Grid, seed: u64) -> Result<Vec<Shooter>, AttemptFailure> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut remaining = grid.count_by_color();
        remaining.retain(|_, count| *count > 0);
        let exposure = exposure_by_color(grid, &remaining);

        let mut shooters = Vec::new();
        let mut previous = None;
        let mut run = 0;
        while let Some(color) = self.pick_color(&remaining, &exposure, previous, run, &mut rng) {
            if shooters.len() >= self.config.max_shooters {
                return Err(AttemptFailure::ShooterCeiling {
                    limit: self.config.max_shooters,
                });
            }

            let need = remaining.get(&color).copied().unwrap_or(0);
            let ammo = self.pick_ammo(need, &mut rng);
            let id = ShooterId::new(u32::try_from(shooters.len()).unwrap_or(u32::MAX));
            shooters.push(Shooter::new(id, color, ammo));

            if ammo >= need {
                let _ = remaining.remove(&color);
            } else {
                let _ = remaining.insert(color, need - ammo);
            }
            run = if previous == Some(color) { run + 1 } else { 1 };
            previous = Some(color);
        }

        Ok(shooters)
    }

    fn pick_color(
        &mut self,
        remaining: &BTreeMap<Color, u32>,
        exposure: &BTreeMap<Color, u32>,
        previous: Option<Color>,
        run: u32,
        rng: &mut ChaCha8Rng,
    ) -> Option<Color> {
        let several = remaining.len() > 1;
        self.weight_workspace.clear();
        for (&color, &left) in remaining {
            let exposed = exposure.get(&color).copied().unwrap_or(0).min(left);
            let mut weight =
                u64::from(left) + u64::from(self.config.exposure_bias) * u64::from(exposed);
            if several && previous == Some(color) {
                if run >= self.config.max_run {
                    continue;
                }
                if self.config.alternate_colors {
                    weight = (weight / ALTERNATION_PENALTY).max(1);
                }
            }
            self.weight_workspace.push((color, weight));
        }

        let total: u64 = self.weight_workspace.iter().map(|(_, weight)| weight).sum();
        if total == 0 {
            return None;
        }
        let mut roll = rng.gen_range(0..total);
        for &(color, weight) in &self.weight_workspace {
            if roll < weight {
                return Some(color);
            }
            roll -= weight;
        }
        self.weight_workspace.last().map(|(color, _)| *color)
    }

    fn pick_ammo(&self, need: u32, rng: &mut ChaCha8Rng) -> u32 {
        let config = &self.config;
        let buckets = &config.buckets;
        let mut target = buckets
            .iter()
            .rev()
            .find(|bucket| bucket.probability > 0.0)
            .map_or(buckets.small.target, |bucket| bucket.target);
        let mut roll = rng.gen::<f64>() * buckets.total_probability();
        for bucket in buckets.iter() {
            if roll < bucket.probability {
                target = bucket.target;
                break;
            }
            roll -= bucket.probability;
        }

        let mut ammo = target.clamp(config.min_ammo, config.max_ammo).min(need);
        let rest = need - ammo;
        if rest > 0 && rest < config.min_ammo && ammo + rest <= config.max_ammo {
            ammo += rest;
        }
        ammo
    }
}

/// Generates a validated deck for `grid`.
pub fn generate(grid: &Grid, config: &GeneratorConfig) -> Result<GeneratedDeck, GenerationError> {
    DeckGenerator::new(config.clone())?.generate(grid)
}

/// Seed used by attempt `attempt` of a run rooted at `seed`.
#[must_use]
pub fn attempt_seed(seed: u64, attempt: u32) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(seed.to_le_bytes());
    hasher.update(RNG_STREAM_ATTEMPT.as_bytes());
    hasher.update(attempt.to_le_bytes());
    finalize_digest(hasher)
}

/// Pixels of each color a single unlimited lap could reach on the start grid.
fn exposure_by_color(grid: &Grid, colors: &BTreeMap<Color, u32>) -> BTreeMap<Color, u32> {
    let scratch = State::new(grid.clone(), Deck::new(1), 0);
    colors
        .keys()
        .map(|&color| {
            let reachable = scratch.count_potential_removals_for_color(color);
            (color, u32::try_from(reachable).unwrap_or(u32::MAX))
        })
        .collect()
}
