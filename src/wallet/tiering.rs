//! Rank-based tier assignment
//!
//! Tiers are a pure function of the current score distribution: the whole
//! population is ranked every cycle and bucketed by cumulative share.

use serde::{Deserialize, Serialize};

use crate::wallet::types::Tier;

/// Float slack for `rank / n <= fraction` so that e.g. 30/100 <= 0.3 holds
const RANK_EPSILON: f64 = 1e-9;

/// Tier bucketing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierConfig {
    /// Wallets scoring below this are always `ignore`
    #[serde(default = "default_min_wallet_score")]
    pub min_wallet_score: f64,

    /// Cumulative population share for S
    #[serde(default = "default_frac_s")]
    pub frac_s: f64,

    /// Cumulative population share for S + A
    #[serde(default = "default_frac_a")]
    pub frac_a: f64,

    /// Cumulative population share for S + A + B
    #[serde(default = "default_frac_b")]
    pub frac_b: f64,
}

fn default_min_wallet_score() -> f64 { 60.0 }
fn default_frac_s() -> f64 { 0.10 }
fn default_frac_a() -> f64 { 0.30 }
fn default_frac_b() -> f64 { 0.60 }

impl Default for TierConfig {
    fn default() -> Self {
        Self {
            min_wallet_score: default_min_wallet_score(),
            frac_s: default_frac_s(),
            frac_a: default_frac_a(),
            frac_b: default_frac_b(),
        }
    }
}

/// Assigns tiers across a scored population
#[derive(Debug, Clone)]
pub struct TierAssigner {
    config: TierConfig,
}

impl TierAssigner {
    pub fn new(config: TierConfig) -> Self {
        Self { config }
    }

    /// Assign a tier to every score. Output is aligned with the input order.
    ///
    /// Ranking is by score descending; ties keep their input order.
    pub fn assign(&self, scores: &[f64]) -> Vec<Tier> {
        let n = scores.len();
        let mut order: Vec<usize> = (0..n).collect();
        // sort_by is stable
        order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

        let mut tiers = vec![Tier::Ignore; n];
        for (idx, &wallet) in order.iter().enumerate() {
            let rank = idx + 1;
            tiers[wallet] = self.tier_for(scores[wallet], rank, n);
        }
        tiers
    }

    /// Tier for a wallet at 1-based `rank` out of `n`
    pub fn tier_for(&self, score: f64, rank: usize, n: usize) -> Tier {
        if n == 0 || score < self.config.min_wallet_score {
            return Tier::Ignore;
        }

        let p = rank as f64 / n as f64;
        if p <= self.config.frac_s + RANK_EPSILON {
            Tier::S
        } else if p <= self.config.frac_a + RANK_EPSILON {
            Tier::A
        } else if p <= self.config.frac_b + RANK_EPSILON {
            Tier::B
        } else {
            Tier::Ignore
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assigner(min_score: f64) -> TierAssigner {
        TierAssigner::new(TierConfig {
            min_wallet_score: min_score,
            frac_s: 0.1,
            frac_a: 0.3,
            frac_b: 0.6,
        })
    }

    fn count(tiers: &[Tier], tier: Tier) -> usize {
        tiers.iter().filter(|t| **t == tier).count()
    }

    #[test]
    fn test_uniform_population_buckets() {
        // 100 wallets, scores 1..=100 shuffled by a fixed stride
        let scores: Vec<f64> = (0..100).map(|i| ((i * 37) % 100 + 1) as f64).collect();
        let tiers = assigner(0.0).assign(&scores);

        assert_eq!(count(&tiers, Tier::S), 10);
        assert_eq!(count(&tiers, Tier::A), 20);
        assert_eq!(count(&tiers, Tier::B), 30);
        assert_eq!(count(&tiers, Tier::Ignore), 40);

        // the top-10 scores are exactly the S wallets
        for (score, tier) in scores.iter().zip(&tiers) {
            assert_eq!(*score > 90.0, *tier == Tier::S);
        }
    }

    #[test]
    fn test_score_floor_overrides_rank() {
        let scores = vec![50.0, 40.0, 30.0, 20.0, 10.0];
        let tiers = assigner(60.0).assign(&scores);
        assert!(tiers.iter().all(|t| *t == Tier::Ignore));

        let scores = vec![95.0, 59.9, 70.0];
        let tiers = TierAssigner::new(TierConfig {
            min_wallet_score: 60.0,
            frac_s: 0.34,
            frac_a: 0.67,
            frac_b: 1.0,
        })
        .assign(&scores);
        assert_eq!(tiers, vec![Tier::S, Tier::Ignore, Tier::A]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let scores = vec![80.0; 10];
        let tiers = assigner(0.0).assign(&scores);
        assert_eq!(tiers[0], Tier::S);
        assert_eq!(tiers[1], Tier::A);
        assert_eq!(tiers[2], Tier::A);
        assert_eq!(tiers[3], Tier::B);
        assert_eq!(tiers[9], Tier::Ignore);
    }

    #[test]
    fn test_single_wallet_is_last_rank() {
        // rank 1 of 1 -> p = 1.0, outside frac_b = 0.6
        assert_eq!(assigner(0.0).assign(&[99.0]), vec![Tier::Ignore]);
    }

    #[test]
    fn test_empty_population() {
        assert!(assigner(0.0).assign(&[]).is_empty());
    }
}
