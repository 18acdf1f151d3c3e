//! Payout and loss-distribution arithmetic.
//!
//! The split percentages are contract-enforced; this module mirrors them
//! for the operational status surface and for sanity checks at startup.

use seek_types::{ProtocolParams, SkrAmount};

/// Where a lost stake goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Distribution {
    pub house: SkrAmount,
    pub jackpot: SkrAmount,
    pub burn: SkrAmount,
    pub treasury: SkrAmount,
}

impl Distribution {
    pub fn total(&self) -> SkrAmount {
        self.house + self.jackpot + self.burn + self.treasury
    }
}

/// A win pays double the stake (plus a possible jackpot draw, contract-side).
pub fn win_payout(stake: SkrAmount) -> SkrAmount {
    stake.saturating_mul(2)
}

/// Split a lost stake across the house pool, jackpot pool, burn, and
/// protocol treasury. The remainder from integer division lands in the
/// house share so the split always sums to the stake exactly.
pub fn loss_distribution(stake: SkrAmount, params: &ProtocolParams) -> Distribution {
    let share = |bps: u64| -> SkrAmount { (stake as u128 * bps as u128 / 10_000) as SkrAmount };
    let jackpot = share(params.singularity_share_bps);
    let burn = share(params.burn_share_bps);
    let treasury = share(params.protocol_share_bps);
    let house = stake - jackpot - burn - treasury;
    Distribution {
        house,
        jackpot,
        burn,
        treasury,
    }
}
