//! Protocol parameters: tier brackets, timers, and settlement tuning.
//!
//! Stake amounts and the loss distribution mirror the on-chain settlement
//! contract's constants; the rest tune the off-chain pipeline.

use crate::amount::{SkrAmount, SKR_UNIT};
use serde::{Deserialize, Serialize};

/// A difficulty/stake bracket. Higher tier means higher stake, shorter
/// timer, and a stricter adjudication confidence floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    One,
    Two,
    Three,
}

impl Tier {
    pub fn from_u8(n: u8) -> Option<Self> {
        match n {
            1 => Some(Tier::One),
            2 => Some(Tier::Two),
            3 => Some(Tier::Three),
            _ => None,
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            Tier::One => 1,
            Tier::Two => 2,
            Tier::Three => 3,
        }
    }
}

/// All tunable parameters for the bounty pipeline.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProtocolParams {
    // ── Stakes (raw SKR units, contract-enforced) ────────────────────────
    pub stake_tier1: SkrAmount,
    pub stake_tier2: SkrAmount,
    pub stake_tier3: SkrAmount,

    // ── Bounty timers ────────────────────────────────────────────────────
    pub timer_tier1_secs: u64,
    pub timer_tier2_secs: u64,
    pub timer_tier3_secs: u64,

    // ── Adjudication confidence floors, must be monotone in tier ────────
    pub confidence_floor_tier1: f64,
    pub confidence_floor_tier2: f64,
    pub confidence_floor_tier3: f64,

    // ── Settlement ───────────────────────────────────────────────────────
    /// Mandatory dispute window between propose and finalize.
    pub challenge_window_secs: u64,
    /// Maximum finalize attempts before a settlement is declared stuck.
    pub finalize_max_attempts: u32,
    /// Finalization queue poll interval.
    pub finalize_poll_interval_secs: u64,

    // ── Loss distribution (basis points, must sum to 10_000) ─────────────
    pub house_share_bps: u64,
    pub singularity_share_bps: u64,
    pub burn_share_bps: u64,
    pub protocol_share_bps: u64,
    /// Jackpot odds: 1 in `singularity_odds` on every win.
    pub singularity_odds: u64,

    // ── Identity nonces ──────────────────────────────────────────────────
    pub nonce_ttl_secs: u64,
    pub nonce_sweep_interval_secs: u64,

    // ── Bounty housekeeping ──────────────────────────────────────────────
    /// How long terminal bounties are retained before garbage collection.
    pub bounty_retention_secs: u64,
    pub purge_interval_secs: u64,
    pub expiry_sweep_interval_secs: u64,

    // ── Anti-fraud pre-checks ────────────────────────────────────────────
    /// Maximum photo age at submission time.
    pub photo_max_age_secs: u64,
    /// Allowed forward clock skew on capture timestamps.
    pub future_skew_secs: u64,
    /// Tolerance for capture times slightly before bounty creation.
    pub precapture_tolerance_secs: u64,
}

impl ProtocolParams {
    /// SEEK mainnet defaults. Stakes and distribution match the settlement
    /// contract's constants.
    pub fn seek_defaults() -> Self {
        Self {
            stake_tier1: 100 * SKR_UNIT,
            stake_tier2: 200 * SKR_UNIT,
            stake_tier3: 300 * SKR_UNIT,

            timer_tier1_secs: 20 * 60,
            timer_tier2_secs: 10 * 60,
            timer_tier3_secs: 5 * 60,

            confidence_floor_tier1: 0.60,
            confidence_floor_tier2: 0.75,
            confidence_floor_tier3: 0.90,

            challenge_window_secs: 300,
            finalize_max_attempts: 10,
            finalize_poll_interval_secs: 15,

            house_share_bps: 7000,
            singularity_share_bps: 1500,
            burn_share_bps: 1000,
            protocol_share_bps: 500,
            singularity_odds: 500,

            nonce_ttl_secs: 300,
            nonce_sweep_interval_secs: 60,

            bounty_retention_secs: 24 * 3600,
            purge_interval_secs: 300,
            expiry_sweep_interval_secs: 30,

            photo_max_age_secs: 120,
            future_skew_secs: 60,
            precapture_tolerance_secs: 30,
        }
    }

    pub fn stake_for(&self, tier: Tier) -> SkrAmount {
        match tier {
            Tier::One => self.stake_tier1,
            Tier::Two => self.stake_tier2,
            Tier::Three => self.stake_tier3,
        }
    }

    pub fn timer_secs_for(&self, tier: Tier) -> u64 {
        match tier {
            Tier::One => self.timer_tier1_secs,
            Tier::Two => self.timer_tier2_secs,
            Tier::Three => self.timer_tier3_secs,
        }
    }

    pub fn confidence_floor_for(&self, tier: Tier) -> f64 {
        match tier {
            Tier::One => self.confidence_floor_tier1,
            Tier::Two => self.confidence_floor_tier2,
            Tier::Three => self.confidence_floor_tier3,
        }
    }

    /// Whether the loss distribution shares sum to exactly 100%.
    pub fn distribution_is_complete(&self) -> bool {
        self.house_share_bps
            + self.singularity_share_bps
            + self.burn_share_bps
            + self.protocol_share_bps
            == 10_000
    }

    /// Whether confidence floors are monotone non-decreasing with tier.
    pub fn floors_are_monotone(&self) -> bool {
        self.confidence_floor_tier1 <= self.confidence_floor_tier2
            && self.confidence_floor_tier2 <= self.confidence_floor_tier3
    }
}

/// Default is the SEEK mainnet configuration.
impl Default for ProtocolParams {
    fn default() -> Self {
        Self::seek_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_distribution_sums_to_100_percent() {
        assert!(ProtocolParams::default().distribution_is_complete());
    }

    #[test]
    fn default_floors_monotone() {
        let p = ProtocolParams::default();
        assert!(p.floors_are_monotone());
        assert!(p.confidence_floor_for(Tier::Three) >= p.confidence_floor_for(Tier::Two));
        assert!(p.confidence_floor_for(Tier::Two) >= p.confidence_floor_for(Tier::One));
    }

    #[test]
    fn higher_tier_shorter_timer() {
        let p = ProtocolParams::default();
        assert!(p.timer_secs_for(Tier::Three) < p.timer_secs_for(Tier::Two));
        assert!(p.timer_secs_for(Tier::Two) < p.timer_secs_for(Tier::One));
    }

    #[test]
    fn tier_round_trip() {
        for n in 1..=3u8 {
            assert_eq!(Tier::from_u8(n).unwrap().as_u8(), n);
        }
        assert!(Tier::from_u8(0).is_none());
        assert!(Tier::from_u8(4).is_none());
    }
}
