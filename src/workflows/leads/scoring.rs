use serde::{Deserialize, Serialize};

use super::domain::Lead;
use super::rates::{month_bucket, RateBook, RateKeyField};

/// Score returned when no conversion history is available at all: the neutral
/// midpoint, "unknown".
pub const NEUTRAL_SCORE: u8 = 50;

/// Relative weight of each rate-backed attribute in the composite score.
///
/// The month weight ships at zero: the month lookup stays wired so the weight
/// can be raised once enough per-month history has accumulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub service: u32,
    pub ad_set: u32,
    pub ad_name: u32,
    pub lead_month: u32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            service: 30,
            ad_set: 10,
            ad_name: 10,
            lead_month: 0,
        }
    }
}

impl ScoreWeights {
    fn total(&self) -> u32 {
        self.service + self.ad_set + self.ad_name + self.lead_month
    }
}

/// Stateless scorer combining a lead's attributes with historical conversion
/// rates. Total over its whole domain: malformed attributes degrade to a
/// zero-rate contribution, never an error.
#[derive(Debug, Clone, Default)]
pub struct LeadScoringEngine {
    weights: ScoreWeights,
}

impl LeadScoringEngine {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    /// Weighted average of per-field conversion rates, scaled to [0, 100] and
    /// rounded to the nearest integer.
    pub fn score(&self, lead: &Lead, rates: &RateBook) -> u8 {
        if rates.is_empty() {
            return NEUTRAL_SCORE;
        }

        let total_weight = self.weights.total();
        if total_weight == 0 {
            return 0;
        }

        let month_rate = month_bucket(&lead.lead_date)
            .map(|bucket| rates.lookup(RateKeyField::Date, &bucket))
            .unwrap_or(0.0);

        let contributions = [
            (
                rates.lookup(RateKeyField::Service, &lead.service),
                self.weights.service,
            ),
            (
                rates.lookup(RateKeyField::AdSet, &lead.ad_set_name),
                self.weights.ad_set,
            ),
            (
                rates.lookup(RateKeyField::AdName, &lead.ad_name),
                self.weights.ad_name,
            ),
            (month_rate, self.weights.lead_month),
        ];

        let weighted: f64 = contributions
            .iter()
            .map(|(rate, weight)| rate * f64::from(*weight))
            .sum();

        let score = (weighted / f64::from(total_weight) * 100.0).round();
        score.clamp(0.0, 100.0) as u8
    }
}
