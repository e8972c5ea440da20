//! Seeded random number generation for combat and spawning.
//!
//! This module provides a trait-based RNG so the battle manager can own one
//! explicitly injected stream and tests can substitute a scripted sequence.
//!
//! # Determinism
//!
//! All implementations must be deterministic: given the same seed (or the same
//! script) and the same sequence of calls, they produce the same outputs.
//! Every draw advances shared state, so the *order* of draws across the whole
//! combat subsystem is part of the reproducibility contract.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::CombatError;

/// Number of 32-bit words in the Mersenne Twister state.
const STATE_WORDS: usize = 624;
/// Offset of the twist partner word.
const SHIFT_SIZE: usize = 397;
const MATRIX_A: u32 = 0x9908_b0df;
const UPPER_MASK: u32 = 0x8000_0000;
const LOWER_MASK: u32 = 0x7fff_ffff;
const INIT_MULTIPLIER: u32 = 0x6c07_8965;
/// Normalizes a 32-bit word into `[0, 1)`.
const WORD_SPAN: f64 = 4_294_967_296.0;
/// Step used by [`RandomSource::from_range`].
const RANGE_STEP: f64 = 0.01;

/// Source of uniformly distributed draws in `[0, 1)`.
///
/// Only [`next`](RandomSource::next) is required. The remaining operations are
/// expressed in terms of it so every implementation consumes draws in exactly
/// the same order.
pub trait RandomSource {
    /// Advance the generator and return a value in `[0, 1)`.
    fn next(&mut self) -> f64;

    /// Return true with probability `n`.
    ///
    /// Values above 1 are read as percentages (`25` means 25%). Values in
    /// `[0, 1]` are read as fractions. Anything outside `[0, 100]` is rejected.
    fn chance(&mut self, n: f64) -> Result<bool, CombatError> {
        if !(0.0..=100.0).contains(&n) {
            return Err(CombatError::ChanceOutOfRange(n));
        }
        let probability = if n > 1.0 { n / 100.0 } else { n };
        let roll = self.next();
        if probability <= 0.0 {
            return Ok(false);
        }
        Ok(roll <= probability)
    }

    /// Uniform pick from `start, start + 0.01, …, stop` (inclusive).
    ///
    /// The result is rounded to two decimal places; this is a pick over a
    /// fixed-precision grid, not a continuous draw.
    fn from_range(&mut self, start: f64, stop: f64) -> Result<f64, CombatError> {
        if !start.is_finite() || !stop.is_finite() {
            return Err(CombatError::invalid(
                "RandomSource::from_range",
                "bounds must be finite",
            ));
        }
        if start > stop {
            return Err(CombatError::invalid(
                "RandomSource::from_range",
                "start must not exceed stop",
            ));
        }
        let steps = ((stop - start) / RANGE_STEP + 1e-9).floor() as usize + 1;
        let index = pick_index(self.next(), steps);
        Ok(round_cents(start + index as f64 * RANGE_STEP))
    }
}

/// Selection helpers available on every [`RandomSource`], including trait objects.
pub trait RandomExt: RandomSource {
    /// Pick one element, optionally skipping every element equal to `exclude`.
    ///
    /// A draw is consumed even when nothing is eligible; an empty pool yields
    /// `None` rather than an error.
    fn choice<'a, T: PartialEq>(&mut self, seq: &'a [T], exclude: Option<&T>) -> Option<&'a T> {
        let roll = self.next();
        let pool: Vec<&'a T> = seq
            .iter()
            .filter(|item| exclude.is_none_or(|excluded| *item != excluded))
            .collect();
        if pool.is_empty() {
            return None;
        }
        Some(pool[pick_index(roll, pool.len())])
    }

    /// `k` independent picks; elements may repeat.
    fn sample<'a, T: PartialEq>(
        &mut self,
        seq: &'a [T],
        k: usize,
        exclude: Option<&T>,
    ) -> Vec<&'a T> {
        (0..k)
            .filter_map(|_| self.choice(seq, exclude))
            .collect()
    }

    /// `k` picks weighted by an explicit per-element weight list.
    ///
    /// Weights are normalized to sum to 1, then one draw per pick walks the
    /// cumulative distribution.
    fn weighted_choice_by<'a, T>(
        &mut self,
        seq: &'a [T],
        weights: &[f64],
        k: usize,
    ) -> Result<Vec<&'a T>, CombatError> {
        if seq.len() != weights.len() {
            return Err(CombatError::InvalidDistribution(
                "array and weights must have the same length",
            ));
        }
        if weights.iter().any(|w| w.is_nan() || *w < 0.0) {
            return Err(CombatError::InvalidDistribution(
                "weights must be non-negative",
            ));
        }
        if !weights.iter().any(|w| *w > 0.0) {
            return Err(CombatError::InvalidDistribution(
                "at least one weight must be positive",
            ));
        }

        let total: f64 = weights.iter().sum();
        let scaled: Vec<f64> = weights.iter().map(|w| w / total).collect();
        // Rounding can leave the walk a hair short of 1.0.
        let fallback = scaled.iter().rposition(|w| *w > 0.0).unwrap_or(0);

        let mut picks = Vec::with_capacity(k);
        for _ in 0..k {
            let mut roll = self.next();
            let mut picked = fallback;
            for (index, weight) in scaled.iter().enumerate() {
                if roll < *weight {
                    picked = index;
                    break;
                }
                roll -= weight;
            }
            picks.push(&seq[picked]);
        }
        Ok(picks)
    }

    /// `k` picks weighted by rank: each element's weight is looked up by its
    /// rank key, missing ranks weigh zero.
    fn weighted_choice<'a, T: Ranked>(
        &mut self,
        seq: &'a [T],
        weights_by_rank: &BTreeMap<u8, f64>,
        k: usize,
    ) -> Result<Vec<&'a T>, CombatError> {
        let weights: Vec<f64> = seq
            .iter()
            .map(|item| weights_by_rank.get(&item.rank()).copied().unwrap_or(0.0))
            .collect();
        self.weighted_choice_by(seq, &weights, k)
    }
}

impl<R: RandomSource + ?Sized> RandomExt for R {}

/// Anything that carries a rank key for weighted selection.
pub trait Ranked {
    fn rank(&self) -> u8;
}

fn pick_index(roll: f64, len: usize) -> usize {
    ((roll * len as f64) as usize).min(len.saturating_sub(1))
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Mersenne Twister (MT19937) stream.
///
/// # Properties
///
/// - **Deterministic**: equal seeds yield identical sequences
/// - **Block regeneration**: the 624-word state is regenerated in one pass
///   whenever the cursor runs off the end of the current block
/// - **Never reseeded**: one stream lives for the whole session
#[derive(Clone)]
pub struct RandomStream {
    state: [u32; STATE_WORDS],
    index: usize,
    seed: u32,
}

impl RandomStream {
    /// Create a stream from an explicit seed.
    pub fn new(seed: u32) -> Self {
        let mut state = [0u32; STATE_WORDS];
        state[0] = seed;
        for i in 1..STATE_WORDS {
            let prev = state[i - 1];
            state[i] = INIT_MULTIPLIER
                .wrapping_mul(prev ^ (prev >> 30))
                .wrapping_add(i as u32);
        }
        Self {
            state,
            index: STATE_WORDS,
            seed,
        }
    }

    /// Create a stream seeded from the wall clock (seconds since the epoch).
    pub fn from_time() -> Self {
        let seconds = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        Self::new(seconds as u32)
    }

    /// The seed this stream was created with.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Next tempered 32-bit word.
    pub fn next_u32(&mut self) -> u32 {
        if self.index >= STATE_WORDS {
            self.regenerate();
            self.index = 0;
        }

        let mut y = self.state[self.index];
        y ^= y >> 11;
        y ^= (y << 7) & 0x9d2c_5680;
        y ^= (y << 15) & 0xefc6_0000;
        y ^= y >> 18;

        self.index += 1;
        y
    }

    fn regenerate(&mut self) {
        for i in 0..STATE_WORDS {
            let y = (self.state[i] & UPPER_MASK)
                | (self.state[(i + 1) % STATE_WORDS] & LOWER_MASK);
            let mut next = self.state[(i + SHIFT_SIZE) % STATE_WORDS] ^ (y >> 1);
            if y % 2 != 0 {
                next ^= MATRIX_A;
            }
            self.state[i] = next;
        }
    }
}

impl RandomSource for RandomStream {
    fn next(&mut self) -> f64 {
        f64::from(self.next_u32()) / WORD_SPAN
    }
}

impl core::fmt::Debug for RandomStream {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RandomStream")
            .field("seed", &self.seed)
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

/// Scripted source that replays a fixed list of draws, cycling when exhausted.
///
/// Values are clamped into `[0, 1)`. An empty script always yields `0.0`.
#[derive(Clone, Debug, Default)]
pub struct FixedSequence {
    values: Vec<f64>,
    cursor: usize,
}

impl FixedSequence {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        let values = values
            .into()
            .into_iter()
            .map(|v| v.clamp(0.0, 1.0 - f64::EPSILON))
            .collect();
        Self { values, cursor: 0 }
    }

    /// Number of draws consumed so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for FixedSequence {
    fn next(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}
