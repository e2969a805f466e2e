use crate::ledger::{Cents, MilliCents};
use crate::tiers::Tier;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Payout thresholds. Injected into the workflow constructor so tests and
/// deployments can override them; nothing here is a hidden global.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoutConfig {
    /// Minimum withdrawable balance in cents.
    pub minimum_withdrawal: Cents,
    /// Display-only fee fraction applied at submission (0.03 = 3%).
    pub fee_percent: f64,
    /// Upper bound on wallet directory and identity lookups.
    pub external_call_timeout: Duration,
}

impl Default for PayoutConfig {
    fn default() -> Self {
        Self {
            minimum_withdrawal: 1800, // $18.00
            fee_percent: 0.03,
            external_call_timeout: Duration::from_secs(5),
        }
    }
}

impl PayoutConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            minimum_withdrawal: env::var("MIN_WITHDRAWAL_CENTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.minimum_withdrawal),
            fee_percent: env::var("WITHDRAWAL_FEE_PERCENT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.fee_percent),
            external_call_timeout: env::var("EXTERNAL_CALL_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.external_call_timeout),
        }
    }

    /// What the creator is told they will receive after the fee. The ledger
    /// always settles the full snapshot amount; any fee is taken by the
    /// external payment rail.
    pub fn amount_after_fee(&self, amount: Cents) -> Cents {
        ((amount as f64) * (1.0 - self.fee_percent)).round() as Cents
    }
}

/// View thresholds for tier eligibility and the per-tier payout rates.
/// The rate is a pure function of tier level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierSchedule {
    pub silver_views: u64,
    pub gold_views: u64,
    pub platinum_views: u64,
    pub bronze_rate: MilliCents,
    pub silver_rate: MilliCents,
    pub gold_rate: MilliCents,
    pub platinum_rate: MilliCents,
}

impl Default for TierSchedule {
    fn default() -> Self {
        Self {
            silver_views: 10_000,
            gold_views: 50_000,
            platinum_views: 200_000,
            bronze_rate: 500,    // $0.005 per view
            silver_rate: 700,    // $0.007
            gold_rate: 1_000,    // $0.010
            platinum_rate: 1_500, // $0.015
        }
    }
}

impl TierSchedule {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let read = |key: &str, fallback: u64| {
            env::var(key)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(fallback)
        };
        Self {
            silver_views: read("TIER_SILVER_VIEWS", defaults.silver_views),
            gold_views: read("TIER_GOLD_VIEWS", defaults.gold_views),
            platinum_views: read("TIER_PLATINUM_VIEWS", defaults.platinum_views),
            bronze_rate: read("RATE_BRONZE_MILLICENTS", defaults.bronze_rate as u64) as MilliCents,
            silver_rate: read("RATE_SILVER_MILLICENTS", defaults.silver_rate as u64) as MilliCents,
            gold_rate: read("RATE_GOLD_MILLICENTS", defaults.gold_rate as u64) as MilliCents,
            platinum_rate: read("RATE_PLATINUM_MILLICENTS", defaults.platinum_rate as u64)
                as MilliCents,
        }
    }

    /// Tier implied by a cumulative view count alone.
    pub fn eligible_for(&self, views: u64) -> Tier {
        if views >= self.platinum_views {
            Tier::Platinum
        } else if views >= self.gold_views {
            Tier::Gold
        } else if views >= self.silver_views {
            Tier::Silver
        } else {
            Tier::Bronze
        }
    }

    pub fn rate_for(&self, tier: Tier) -> MilliCents {
        match tier {
            Tier::Bronze => self.bronze_rate,
            Tier::Silver => self.silver_rate,
            Tier::Gold => self.gold_rate,
            Tier::Platinum => self.platinum_rate,
        }
    }
}
