//! Perp signal eligibility policy
//!
//! Which wallet tiers may produce perp signals is a deployment choice, not a
//! constant. The policy is selected from configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::wallet::types::Tier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerpEligibilityPolicy {
    /// Any wallet, including `ignore`
    All,
    /// Only S-tier wallets
    #[default]
    TierSOnly,
    /// S- and A-tier wallets
    TierSAndA,
}

impl PerpEligibilityPolicy {
    pub fn allows(&self, tier: Tier) -> bool {
        match self {
            PerpEligibilityPolicy::All => true,
            PerpEligibilityPolicy::TierSOnly => tier == Tier::S,
            PerpEligibilityPolicy::TierSAndA => matches!(tier, Tier::S | Tier::A),
        }
    }
}

impl fmt::Display for PerpEligibilityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PerpEligibilityPolicy::All => write!(f, "all"),
            PerpEligibilityPolicy::TierSOnly => write!(f, "tier_s_only"),
            PerpEligibilityPolicy::TierSAndA => write!(f, "tier_s_and_a"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_matrix() {
        let tiers = [Tier::S, Tier::A, Tier::B, Tier::Ignore];

        let all: Vec<_> = tiers.iter().map(|t| PerpEligibilityPolicy::All.allows(*t)).collect();
        assert_eq!(all, vec![true, true, true, true]);

        let s_only: Vec<_> = tiers.iter().map(|t| PerpEligibilityPolicy::TierSOnly.allows(*t)).collect();
        assert_eq!(s_only, vec![true, false, false, false]);

        let s_and_a: Vec<_> = tiers.iter().map(|t| PerpEligibilityPolicy::TierSAndA.allows(*t)).collect();
        assert_eq!(s_and_a, vec![true, true, false, false]);
    }

    #[test]
    fn test_policy_deserialize() {
        let policy: PerpEligibilityPolicy = serde_json::from_str(r#""tier_s_and_a""#).unwrap();
        assert_eq!(policy, PerpEligibilityPolicy::TierSAndA);
        assert_eq!(PerpEligibilityPolicy::default(), PerpEligibilityPolicy::TierSOnly);
    }
}
