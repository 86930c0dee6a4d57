//! Smart Score Computation
//!
//! Smart Score measures a wallet's trading reputation on a 0-100 scale. Formula:
//! - ROI (60%): piecewise-linear over all-time ROI
//! - Equity (25%): step function over account value
//! - PnL (15%): step function over all-time PnL
//!
//! Missing or non-finite metrics are scored as 0.

use serde::{Deserialize, Serialize};

use crate::wallet::types::WalletMetrics;

const WEIGHT_ROI: f64 = 0.60;
const WEIGHT_EQUITY: f64 = 0.25;
const WEIGHT_PNL: f64 = 0.15;

/// Score breakdown for a wallet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmartScore {
    /// Weighted total, 0-100
    pub value: f64,
    pub roi_score: f64,
    pub equity_score: f64,
    pub pnl_score: f64,
}

/// Pure scoring function over wallet metrics
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreEngine;

impl ScoreEngine {
    pub fn new() -> Self {
        Self
    }

    /// Final smart score in [0, 100]
    pub fn score(&self, metrics: &WalletMetrics) -> f64 {
        self.breakdown(metrics).value
    }

    /// Compute score with per-component detail
    pub fn breakdown(&self, metrics: &WalletMetrics) -> SmartScore {
        let roi_score = roi_score(or_zero(metrics.roi_all));
        let equity_score = equity_score(or_zero(metrics.account_value_usd));
        let pnl_score = pnl_score(or_zero(metrics.pnl_all_usd));

        let value = WEIGHT_ROI * roi_score + WEIGHT_EQUITY * equity_score + WEIGHT_PNL * pnl_score;

        SmartScore {
            value: value.clamp(0.0, 100.0),
            roi_score,
            equity_score,
            pnl_score,
        }
    }
}

fn or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Map a value from [from_lo, from_hi] onto [to_lo, to_hi]
fn lerp(value: f64, from_lo: f64, from_hi: f64, to_lo: f64, to_hi: f64) -> f64 {
    to_lo + (value - from_lo) / (from_hi - from_lo) * (to_hi - to_lo)
}

/// ROI sub-score over the all-time ROI fraction
fn roi_score(roi_all: f64) -> f64 {
    if roi_all <= -0.5 {
        0.0
    } else if roi_all < 0.0 {
        lerp(roi_all, -0.5, 0.0, 0.0, 40.0)
    } else if roi_all < 0.5 {
        lerp(roi_all, 0.0, 0.5, 40.0, 80.0)
    } else if roi_all < 3.0 {
        lerp(roi_all, 0.5, 3.0, 80.0, 100.0)
    } else {
        100.0
    }
}

fn equity_score(account_value_usd: f64) -> f64 {
    match account_value_usd {
        v if v < 1_000.0 => 40.0,
        v if v < 10_000.0 => 55.0,
        v if v < 50_000.0 => 70.0,
        v if v < 200_000.0 => 85.0,
        _ => 95.0,
    }
}

fn pnl_score(pnl_all_usd: f64) -> f64 {
    match pnl_all_usd {
        p if p < 0.0 => 30.0,
        p if p < 10_000.0 => 60.0,
        p if p < 100_000.0 => 80.0,
        p if p < 1_000_000.0 => 90.0,
        _ => 98.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_roi_saturates() {
        for roi in [-10.0, -1.0, -0.75, -0.5] {
            assert_eq!(roi_score(roi), 0.0);
        }
        for roi in [3.0, 3.5, 10.0, 1e6] {
            assert_eq!(roi_score(roi), 100.0);
        }
    }

    #[test]
    fn test_roi_breakpoints() {
        assert!(approx(roi_score(-0.25), 20.0));
        assert!(approx(roi_score(0.0), 40.0));
        assert!(approx(roi_score(0.25), 60.0));
        assert!(approx(roi_score(0.5), 80.0));
        assert!(approx(roi_score(1.75), 90.0));
    }

    #[test]
    fn test_step_functions() {
        assert_eq!(equity_score(999.0), 40.0);
        assert_eq!(equity_score(1_000.0), 55.0);
        assert_eq!(equity_score(49_999.0), 70.0);
        assert_eq!(equity_score(200_000.0), 95.0);

        assert_eq!(pnl_score(-1.0), 30.0);
        assert_eq!(pnl_score(0.0), 60.0);
        assert_eq!(pnl_score(99_999.0), 80.0);
        assert_eq!(pnl_score(999_999.0), 90.0);
        assert_eq!(pnl_score(1_000_000.0), 98.0);
    }

    #[test]
    fn test_missing_metrics_score_as_zero() {
        let engine = ScoreEngine::new();
        // 0.6*40 + 0.25*40 + 0.15*60
        assert!(approx(engine.score(&WalletMetrics::default()), 43.0));

        let nan = WalletMetrics {
            account_value_usd: Some(f64::NAN),
            pnl_all_usd: None,
            roi_all: Some(f64::INFINITY),
        };
        assert!(approx(engine.score(&nan), 43.0));
    }

    #[test]
    fn test_elite_wallet_score() {
        let engine = ScoreEngine::new();
        let score = engine.breakdown(&WalletMetrics::new(1_000_000.0, 2_000_000.0, 3.0));
        assert_eq!(score.roi_score, 100.0);
        assert_eq!(score.equity_score, 95.0);
        assert_eq!(score.pnl_score, 98.0);
        assert!(approx(score.value, 98.45));
    }

    #[test]
    fn test_monotonic_in_each_metric() {
        let engine = ScoreEngine::new();
        let base = WalletMetrics::new(5_000.0, 5_000.0, 0.1);

        let mut prev = f64::MIN;
        for i in -100..=400 {
            let metrics = WalletMetrics { roi_all: Some(i as f64 / 100.0), ..base };
            let s = engine.score(&metrics);
            assert!(s >= prev, "roi {} decreased score", i);
            prev = s;
        }

        let mut prev = f64::MIN;
        for v in (0..300).map(|i| i as f64 * 1_000.0) {
            let s = engine.score(&WalletMetrics { account_value_usd: Some(v), ..base });
            assert!(s >= prev);
            prev = s;
        }

        let mut prev = f64::MIN;
        for p in (-50..2_000).map(|i| i as f64 * 1_000.0) {
            let s = engine.score(&WalletMetrics { pnl_all_usd: Some(p), ..base });
            assert!(s >= prev);
            prev = s;
        }
    }

    #[test]
    fn test_score_bounds() {
        let engine = ScoreEngine::new();
        let worst = engine.score(&WalletMetrics::new(0.0, -1e9, -5.0));
        let best = engine.score(&WalletMetrics::new(1e9, 1e9, 50.0));
        assert!((0.0..=100.0).contains(&worst));
        assert!((0.0..=100.0).contains(&best));
    }
}
