//! Fortune scoring engine.
//!
//! Four independent sub-models each produce a value in `[0, 100]`:
//!
//! | sub-model      | keyed by                                   | weight |
//! |----------------|--------------------------------------------|--------|
//! | elemental      | `(y + m + d) mod 5` of both dates           | 0.30   |
//! | cyclical pair  | day-of-year `mod 10` / `mod 12`             | 0.25   |
//! | numerological  | `(y + m + d) mod 9 + 1` compatibility class | 0.25   |
//! | astrological   | day-of-month band + birth/target month gap  | 0.20   |
//!
//! The weighted blend plus a `[-5, 5)` jitter is the `total`. The three
//! facets re-jitter the elemental, cyclical and numerological outputs by
//! `[-7.5, 7.5)` each. Everything is clamped to `[0, 100]` and rounded only
//! at the very end.
//!
//! Draw order from the random source is fixed: numerology, moon phase,
//! zodiac, total jitter, career, family, friendship.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::profile::BirthProfile;
use crate::random::RandomSource;

pub const ELEMENTAL_WEIGHT: f64 = 0.30;
pub const CYCLICAL_WEIGHT: f64 = 0.25;
pub const NUMEROLOGICAL_WEIGHT: f64 = 0.25;
pub const ASTROLOGICAL_WEIGHT: f64 = 0.20;

/// Total jitter half-width.
const TOTAL_JITTER: f64 = 5.0;
/// Facet jitter half-width.
const FACET_JITTER: f64 = 7.5;

/// Fallback for a missing affinity pair. Unreachable with the full table.
const DEFAULT_AFFINITY: f64 = 50.0;

// ─── Result types ────────────────────────────────────────────────────────────

/// Final integer scores for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub total: u8,
    pub career: u8,
    pub family: u8,
    pub friendship: u8,
}

impl ScoreBreakdown {
    /// `total` mapped into `[0, 1]` for colouring.
    pub fn normalized(&self) -> f64 {
        self.total as f64 / 100.0
    }
}

/// Raw (unrounded, unjittered at the blend level) sub-model outputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub elemental: f64,
    pub cyclical: f64,
    pub numerological: f64,
    pub astrological: f64,
}

impl SubScores {
    /// Fixed-weight blend, before jitter.
    pub fn weighted(&self) -> f64 {
        self.elemental * ELEMENTAL_WEIGHT
            + self.cyclical * CYCLICAL_WEIGHT
            + self.numerological * NUMEROLOGICAL_WEIGHT
            + self.astrological * ASTROLOGICAL_WEIGHT
    }
}

// ─── Elements ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Metal,
    Wood,
    Water,
    Fire,
    Earth,
}

impl Element {
    pub const ALL: [Element; 5] = [
        Element::Metal,
        Element::Wood,
        Element::Water,
        Element::Fire,
        Element::Earth,
    ];

    /// `(year + month + day) mod 5`.
    pub fn from_components(year: i32, month: u32, day: u32) -> Self {
        let sum = year as i64 + month as i64 + day as i64;
        Self::ALL[sum.rem_euclid(5) as usize]
    }

    pub fn of_date(date: NaiveDate) -> Self {
        Self::from_components(date.year(), date.month(), date.day())
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// `AFFINITY[birth][day]`. Deliberately asymmetric: Metal→Fire is 20 but
/// Fire→Metal is 80.
const AFFINITY: [[u8; 5]; 5] = [
    //  Metal Wood Water Fire Earth
    [50, 30, 80, 20, 70], // Metal
    [20, 50, 70, 80, 30], // Wood
    [70, 80, 50, 30, 20], // Water
    [80, 30, 20, 50, 70], // Fire
    [30, 70, 80, 20, 50], // Earth
];

/// Table entry for a `(birth, day)` element pair.
pub fn element_affinity(birth: Element, day: Element) -> Option<u8> {
    AFFINITY
        .get(birth.index())
        .and_then(|row| row.get(day.index()))
        .copied()
}

/// Elemental sub-model.
pub fn elemental_score(birth: &BirthProfile, target: NaiveDate) -> f64 {
    let birth_el = Element::from_components(birth.year(), birth.month(), birth.day());
    let day_el = Element::of_date(target);
    element_affinity(birth_el, day_el)
        .map(f64::from)
        .unwrap_or(DEFAULT_AFFINITY)
}

// ─── Cyclical pair ───────────────────────────────────────────────────────────

/// 10-cycle and 12-cycle indices from a date's own day-of-year (1-based).
pub fn cycle_indices(date: NaiveDate) -> (u32, u32) {
    let ordinal = date.ordinal();
    (ordinal % 10, ordinal % 12)
}

/// Cyclical-pair sub-model. Bonuses are independent and additive.
pub fn cyclical_score(birth: &BirthProfile, target: NaiveDate) -> f64 {
    let (b10, b12) = cycle_indices(birth.date());
    let (t10, t12) = cycle_indices(target);

    let mut score = 50.0;
    if b10 == t10 {
        score += 20.0;
    }
    if b12 == t12 {
        score += 20.0;
    }
    if b10.abs_diff(t10) <= 2 {
        score += 10.0;
    }
    if b12.abs_diff(t12) <= 2 {
        score += 10.0;
    }
    f64::min(score, 100.0)
}

// ─── Numerology ──────────────────────────────────────────────────────────────

/// Compatibility classes; every number 1–9 sits in exactly one.
pub const NUMEROLOGY_CLASSES: [[u8; 3]; 3] = [[1, 5, 7], [2, 4, 8], [3, 6, 9]];

/// `(year + month + day) mod 9 + 1`, always in `1..=9`.
pub fn reduce_number(year: i32, month: u32, day: u32) -> u8 {
    let sum = year as i64 + month as i64 + day as i64;
    (sum.rem_euclid(9) + 1) as u8
}

pub fn life_number(birth: &BirthProfile) -> u8 {
    reduce_number(birth.year(), birth.month(), birth.day())
}

pub fn date_number(date: NaiveDate) -> u8 {
    reduce_number(date.year(), date.month(), date.day())
}

/// Numbers compatible with `n` (its own class). Empty outside `1..=9`.
pub fn compatible_numbers(n: u8) -> &'static [u8] {
    NUMEROLOGY_CLASSES
        .iter()
        .find(|class| class.contains(&n))
        .map(|class| class.as_slice())
        .unwrap_or(&[])
}

pub fn numerological_score(
    birth: &BirthProfile,
    target: NaiveDate,
    rng: &mut impl RandomSource,
) -> f64 {
    if compatible_numbers(life_number(birth)).contains(&date_number(target)) {
        rng.uniform(70.0, 90.0)
    } else {
        rng.uniform(30.0, 70.0)
    }
}

// ─── Astrology ───────────────────────────────────────────────────────────────

/// Range for the "moon phase" draw, keyed only by day of month.
pub fn moon_phase_range(day_of_month: u32) -> (f64, f64) {
    match day_of_month {
        d if d <= 7 || d >= 23 => (60.0, 90.0),
        8..=15 => (70.0, 95.0),
        _ => (50.0, 90.0),
    }
}

/// Range for the "zodiac" draw, keyed by absolute month difference.
pub fn zodiac_range(birth_month: u32, target_month: u32) -> (f64, f64) {
    match birth_month.abs_diff(target_month) {
        0 => (80.0, 95.0),
        4 | 8 => (75.0, 95.0),
        6 => (40.0, 60.0),
        _ => (55.0, 80.0),
    }
}

pub fn astrological_score(
    birth: &BirthProfile,
    target: NaiveDate,
    rng: &mut impl RandomSource,
) -> f64 {
    let (lo, hi) = moon_phase_range(target.day());
    let moon = rng.uniform(lo, hi);
    let (lo, hi) = zodiac_range(birth.month(), target.month());
    let zodiac = rng.uniform(lo, hi);
    (moon + zodiac) / 2.0
}

// ─── Engine ──────────────────────────────────────────────────────────────────

fn clamp_round(v: f64) -> u8 {
    v.clamp(0.0, 100.0).round() as u8
}

/// Combines the four sub-models into a [`ScoreBreakdown`].
///
/// The only state is the injected random source.
#[derive(Debug, Clone)]
pub struct FortuneScoreEngine<R> {
    rng: R,
}

impl<R: RandomSource> FortuneScoreEngine<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Sub-model outputs for one day (consumes the three sub-model draws).
    pub fn sub_scores(&mut self, birth: &BirthProfile, target: NaiveDate) -> SubScores {
        SubScores {
            elemental: elemental_score(birth, target),
            cyclical: cyclical_score(birth, target),
            numerological: numerological_score(birth, target, &mut self.rng),
            astrological: astrological_score(birth, target, &mut self.rng),
        }
    }

    pub fn score(&mut self, birth: &BirthProfile, target: NaiveDate) -> ScoreBreakdown {
        let subs = self.sub_scores(birth, target);
        self.combine(&subs)
    }

    /// Blend sub-scores, apply jitter, clamp and round.
    pub fn combine(&mut self, subs: &SubScores) -> ScoreBreakdown {
        let total = subs.weighted() + self.rng.uniform(-TOTAL_JITTER, TOTAL_JITTER);
        let career = subs.elemental + self.rng.uniform(-FACET_JITTER, FACET_JITTER);
        let family = subs.cyclical + self.rng.uniform(-FACET_JITTER, FACET_JITTER);
        let friendship = subs.numerological + self.rng.uniform(-FACET_JITTER, FACET_JITTER);

        ScoreBreakdown {
            total: clamp_round(total),
            career: clamp_round(career),
            family: clamp_round(family),
            friendship: clamp_round(friendship),
        }
    }
}
