// service/commission.rs
//
// Referral, activation and pair commission rules. Every view that shows an
// earnings figure goes through `calculate`; nothing else does this arithmetic.
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    models::{binarymodel::Pair, distributormodel::DistributorDashboardStats},
    utils::{currency::{format_paise_as_rupees, percent_of}, decimal::BigDecimalHelpers},
};

pub const REFERRAL_BONUS_PAISE: i64 = 100_000; // ₹1,000
pub const REFERRAL_BONUS_CAP: u32 = 3;
pub const ACTIVATION_REFERRALS: u32 = 3;
pub const ACTIVATION_BONUS_PAISE: i64 = 200_000; // ₹2,000
pub const PAIR_COMMISSION_PAISE: i64 = 200_000; // ₹2,000
pub const PAIR_CAP: u32 = 10;
pub const TDS_PERCENT: i64 = 10;
pub const POOL_PERCENT: i64 = 20;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommissionInputs {
    pub total_referrals: u32,
    pub total_pairs: u32,
    pub total_earnings_paise: i64,
    pub tds_deducted_paise: i64,
    pub pool_money_paise: i64,
    pub activation_bonus_paise: i64,
}

impl From<&DistributorDashboardStats> for CommissionInputs {
    fn from(stats: &DistributorDashboardStats) -> Self {
        let distributor = stats.distributor.as_ref();

        let activation_bonus = match &stats.activation_bonus {
            Some(bonus) => bonus.to_paise_or_zero(),
            None => distributor
                .map(|d| d.activation_bonus.to_paise_or_zero())
                .unwrap_or(0),
        };
        let pool_money = match &stats.pool_money {
            Some(pool) => pool.to_paise_or_zero(),
            None => distributor.map(|d| d.pool_money.to_paise_or_zero()).unwrap_or(0),
        };
        let total_referrals = if stats.total_referrals > 0 {
            stats.total_referrals
        } else {
            distributor.map(|d| d.total_referrals).unwrap_or(0)
        };

        Self {
            total_referrals,
            total_pairs: stats.total_pairs,
            total_earnings_paise: stats.total_earnings.to_paise_or_zero(),
            tds_deducted_paise: stats.tds_deducted.to_paise_or_zero(),
            pool_money_paise: pool_money,
            activation_bonus_paise: activation_bonus,
        }
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CommissionKind {
    ReferralBonus,
    ActivationBonus,
    PairCommission,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct BreakdownRow {
    pub kind: CommissionKind,
    pub count: u32,
    pub gross: i64,
    pub tds: i64,
    pub pool: i64,
    pub net: i64,
    pub description: String,
}

impl BreakdownRow {
    fn new(kind: CommissionKind, count: u32, gross: i64, tds: i64, pool: i64, description: String) -> Self {
        Self {
            kind,
            count,
            gross,
            tds,
            pool,
            net: gross - tds - pool,
            description,
        }
    }
}

/// Upstream aggregates that do not line up with the commission rules.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConsistencyWarning {
    NegativePairResidual { residual_paise: i64 },
    PairResidualExceedsCap { residual_paise: i64, computed_paise: i64 },
    TdsMismatch { reported_paise: i64, computed_paise: i64 },
    PoolMismatch { reported_paise: i64, computed_paise: i64 },
}

impl ConsistencyWarning {
    pub fn message(&self) -> String {
        match self {
            ConsistencyWarning::NegativePairResidual { residual_paise } => format!(
                "Reported total earnings leave a negative pair commission ({}); shown as ₹0.00",
                format_paise_as_rupees(*residual_paise)
            ),
            ConsistencyWarning::PairResidualExceedsCap { residual_paise, computed_paise } => format!(
                "Reported pair commission {} exceeds the capped amount {}",
                format_paise_as_rupees(*residual_paise),
                format_paise_as_rupees(*computed_paise)
            ),
            ConsistencyWarning::TdsMismatch { reported_paise, computed_paise } => format!(
                "Reported TDS {} differs from computed TDS {}",
                format_paise_as_rupees(*reported_paise),
                format_paise_as_rupees(*computed_paise)
            ),
            ConsistencyWarning::PoolMismatch { reported_paise, computed_paise } => format!(
                "Reported pool money {} differs from computed pool money {}",
                format_paise_as_rupees(*reported_paise),
                format_paise_as_rupees(*computed_paise)
            ),
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct CommissionBreakdown {
    pub rows: Vec<BreakdownRow>,
    pub total_gross: i64,
    pub total_tds: i64,
    pub total_pool: i64,
    pub total_net: i64,
    pub binary_activated: bool,
    pub pairs_beyond_limit: u32,
    /// `total_earnings - referral gross - activation bonus`, floored at zero.
    pub residual_pair_commission: i64,
    pub warnings: Vec<ConsistencyWarning>,
}

impl CommissionBreakdown {
    pub fn row(&self, kind: CommissionKind) -> Option<&BreakdownRow> {
        self.rows.iter().find(|row| row.kind == kind)
    }
}

pub fn is_binary_activated(total_referrals: u32) -> bool {
    total_referrals >= ACTIVATION_REFERRALS
}

pub fn pairs_beyond_limit(total_pairs: u32) -> u32 {
    total_pairs.saturating_sub(PAIR_CAP)
}

pub fn referral_bonus(total_referrals: u32) -> BreakdownRow {
    let count = total_referrals.min(REFERRAL_BONUS_CAP);
    let gross = count as i64 * REFERRAL_BONUS_PAISE;
    BreakdownRow::new(
        CommissionKind::ReferralBonus,
        count,
        gross,
        percent_of(gross, TDS_PERCENT),
        0,
        format!(
            "₹1,000 per direct referral, first {} referrals only",
            REFERRAL_BONUS_CAP
        ),
    )
}

pub fn activation_bonus(total_referrals: u32) -> BreakdownRow {
    let activated = is_binary_activated(total_referrals);
    let gross = if activated { ACTIVATION_BONUS_PAISE } else { 0 };
    BreakdownRow::new(
        CommissionKind::ActivationBonus,
        u32::from(activated),
        gross,
        0,
        0,
        format!(
            "One-time ₹2,000 bonus on reaching {} referrals, no TDS",
            ACTIVATION_REFERRALS
        ),
    )
}

pub fn pair_commission(total_pairs: u32) -> BreakdownRow {
    let paid_pairs = total_pairs.min(PAIR_CAP);
    let gross = paid_pairs as i64 * PAIR_COMMISSION_PAISE;
    let pool = if total_pairs >= PAIR_CAP {
        percent_of(PAIR_CAP as i64 * PAIR_COMMISSION_PAISE, POOL_PERCENT)
    } else {
        0
    };
    BreakdownRow::new(
        CommissionKind::PairCommission,
        paid_pairs,
        gross,
        percent_of(gross, TDS_PERCENT),
        pool,
        format!(
            "₹2,000 per matched pair up to {} pairs, 20% of a full batch to pool",
            PAIR_CAP
        ),
    )
}

/// What the server total implies was earned from pairs. May be negative when
/// the upstream aggregates disagree with each other.
pub fn pair_commission_residual(total_earnings: i64, referral_gross: i64, activation_bonus: i64) -> i64 {
    total_earnings - referral_gross - activation_bonus
}

pub fn calculate(inputs: &CommissionInputs) -> CommissionBreakdown {
    let referral = referral_bonus(inputs.total_referrals);
    let activation = activation_bonus(inputs.total_referrals);
    let pairs = pair_commission(inputs.total_pairs);

    let mut warnings = Vec::new();

    let residual = pair_commission_residual(
        inputs.total_earnings_paise,
        referral.gross,
        inputs.activation_bonus_paise,
    );
    // No reported total means nothing to reconcile against.
    if inputs.total_earnings_paise > 0 {
        if residual < 0 {
            warnings.push(ConsistencyWarning::NegativePairResidual { residual_paise: residual });
        } else if residual > pairs.gross {
            warnings.push(ConsistencyWarning::PairResidualExceedsCap {
                residual_paise: residual,
                computed_paise: pairs.gross,
            });
        }
    }

    let rows = vec![referral, activation, pairs];
    let total_gross: i64 = rows.iter().map(|r| r.gross).sum();
    let total_tds: i64 = rows.iter().map(|r| r.tds).sum();
    let total_pool: i64 = rows.iter().map(|r| r.pool).sum();
    let total_net: i64 = rows.iter().map(|r| r.net).sum();

    if inputs.tds_deducted_paise > 0 && inputs.tds_deducted_paise != total_tds {
        warnings.push(ConsistencyWarning::TdsMismatch {
            reported_paise: inputs.tds_deducted_paise,
            computed_paise: total_tds,
        });
    }
    if inputs.pool_money_paise > 0 && inputs.pool_money_paise != total_pool {
        warnings.push(ConsistencyWarning::PoolMismatch {
            reported_paise: inputs.pool_money_paise,
            computed_paise: total_pool,
        });
    }

    for warning in &warnings {
        tracing::warn!("Commission data inconsistency: {}", warning.message());
    }

    CommissionBreakdown {
        rows,
        total_gross,
        total_tds,
        total_pool,
        total_net,
        binary_activated: is_binary_activated(inputs.total_referrals),
        pairs_beyond_limit: pairs_beyond_limit(inputs.total_pairs),
        residual_pair_commission: residual.max(0),
        warnings,
    }
}

/// A pair-history row with its deductions recomputed.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PairView {
    pub id: String,
    pub left_pv: f64,
    pub right_pv: f64,
    pub matched_pv: f64,
    pub commission: i64,
    pub tds: i64,
    pub pool: i64,
    pub net: i64,
    pub expected_tds: i64,
    pub consistent: bool,
    pub matched_at: Option<DateTime<Utc>>,
}

pub fn derive_pair(pair: &Pair) -> PairView {
    let commission = pair.commission.to_paise_or_zero();
    let expected_tds = percent_of(commission, TDS_PERCENT);
    let tds = pair.tds.as_ref().map(|t| t.to_paise_or_zero()).unwrap_or(expected_tds);
    let pool = pair.pool_money.to_paise_or_zero();
    let expected_net = commission - tds - pool;

    let reported_net = pair.net_amount.as_ref().map(|n| n.to_paise_or_zero());
    let consistent = reported_net.map_or(true, |net| net == expected_net) && tds == expected_tds;

    let matched_pv = if pair.matched_pv > 0.0 {
        pair.matched_pv
    } else {
        pair.left_pv.min(pair.right_pv)
    };

    PairView {
        id: pair.id.clone(),
        left_pv: pair.left_pv,
        right_pv: pair.right_pv,
        matched_pv,
        commission,
        tds,
        pool,
        net: reported_net.unwrap_or(expected_net),
        expected_tds,
        consistent,
        matched_at: pair.matched_at,
    }
}

#[derive(Debug, Serialize, Clone, Default, PartialEq, Eq)]
pub struct PairTotals {
    pub count: usize,
    pub commission: i64,
    pub tds: i64,
    pub pool: i64,
    pub net: i64,
    pub inconsistent: usize,
}

pub fn summarize_pairs(pairs: &[PairView]) -> PairTotals {
    pairs.iter().fold(PairTotals::default(), |mut totals, pair| {
        totals.count += 1;
        totals.commission += pair.commission;
        totals.tds += pair.tds;
        totals.pool += pair.pool;
        totals.net += pair.net;
        if !pair.consistent {
            totals.inconsistent += 1;
        }
        totals
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    fn dec(value: &str) -> Option<BigDecimal> {
        Some(BigDecimal::from_str(value).unwrap())
    }

    #[test]
    fn test_referral_bonus_grows_until_cap() {
        for referrals in 0..=3u32 {
            let row = referral_bonus(referrals);
            assert_eq!(row.gross, referrals as i64 * 100_000);
            assert_eq!(row.net, row.gross * 9 / 10);
        }
        for referrals in [4u32, 5, 50] {
            let row = referral_bonus(referrals);
            assert_eq!(row.gross, 300_000);
            assert_eq!(row.count, 3);
        }
    }

    #[test]
    fn test_pair_commission_caps_at_ten_pairs() {
        for pairs in 0..=10u32 {
            assert_eq!(pair_commission(pairs).gross, pairs as i64 * 200_000);
            assert_eq!(pairs_beyond_limit(pairs), 0);
        }
        let row = pair_commission(14);
        assert_eq!(row.gross, 2_000_000);
        assert_eq!(pairs_beyond_limit(14), 4);
    }

    #[test]
    fn test_pool_applies_only_on_full_batch() {
        assert_eq!(pair_commission(9).pool, 0);

        let full = pair_commission(10);
        assert_eq!(full.pool, 400_000);
        assert_eq!(full.tds, 200_000);
        assert_eq!(full.net, 2_000_000 - 200_000 - 400_000);
    }

    #[test]
    fn test_activation_bonus_needs_three_referrals() {
        assert_eq!(activation_bonus(2).gross, 0);
        let row = activation_bonus(3);
        assert_eq!(row.gross, 200_000);
        assert_eq!(row.tds, 0);
        assert_eq!(row.net, 200_000);
        assert!(!is_binary_activated(2));
        assert!(is_binary_activated(3));
    }

    #[test]
    fn test_over_reported_earnings_are_flagged_not_trusted() {
        let inputs = CommissionInputs {
            total_referrals: 5,
            total_pairs: 12,
            total_earnings_paise: 2_900_000,
            activation_bonus_paise: 200_000,
            ..Default::default()
        };
        let breakdown = calculate(&inputs);

        let referral = breakdown.row(CommissionKind::ReferralBonus).unwrap();
        assert_eq!(referral.gross, 300_000);
        assert_eq!(referral.net, 270_000);

        let activation = breakdown.row(CommissionKind::ActivationBonus).unwrap();
        assert_eq!(activation.gross, 200_000);

        let pairs = breakdown.row(CommissionKind::PairCommission).unwrap();
        assert_eq!(pairs.gross, 2_000_000);
        assert_eq!(breakdown.residual_pair_commission, 2_400_000);
        assert_eq!(breakdown.pairs_beyond_limit, 2);
        assert_eq!(
            breakdown.warnings,
            vec![ConsistencyWarning::PairResidualExceedsCap {
                residual_paise: 2_400_000,
                computed_paise: 2_000_000,
            }]
        );
        assert_eq!(breakdown.total_net, 270_000 + 200_000 + 1_400_000);
    }

    #[test]
    fn test_negative_residual_is_clamped() {
        let inputs = CommissionInputs {
            total_referrals: 3,
            total_earnings_paise: 100_000,
            activation_bonus_paise: 200_000,
            ..Default::default()
        };
        let breakdown = calculate(&inputs);
        assert_eq!(breakdown.residual_pair_commission, 0);
        assert_eq!(
            breakdown.warnings,
            vec![ConsistencyWarning::NegativePairResidual { residual_paise: -400_000 }]
        );
    }

    #[test]
    fn test_missing_aggregates_produce_no_warnings() {
        let breakdown = calculate(&CommissionInputs {
            total_referrals: 1,
            ..Default::default()
        });
        assert!(breakdown.warnings.is_empty());
        assert_eq!(breakdown.total_gross, 100_000);
        assert!(!breakdown.binary_activated);
    }

    #[test]
    fn test_reported_tds_mismatch_is_flagged() {
        let breakdown = calculate(&CommissionInputs {
            total_referrals: 3,
            total_pairs: 2,
            tds_deducted_paise: 10_000,
            ..Default::default()
        });
        assert_eq!(
            breakdown.warnings,
            vec![ConsistencyWarning::TdsMismatch {
                reported_paise: 10_000,
                computed_paise: 30_000 + 40_000,
            }]
        );
    }

    #[test]
    fn test_inputs_fall_back_to_distributor_info() {
        use crate::models::distributormodel::DistributorInfo;

        let stats = DistributorDashboardStats {
            total_earnings: dec("5000.00"),
            distributor: Some(DistributorInfo {
                total_referrals: 4,
                activation_bonus: dec("2000"),
                ..Default::default()
            }),
            ..Default::default()
        };
        let inputs = CommissionInputs::from(&stats);
        assert_eq!(inputs.total_referrals, 4);
        assert_eq!(inputs.activation_bonus_paise, 200_000);
        assert_eq!(inputs.total_earnings_paise, 500_000);
    }

    #[test]
    fn test_derive_pair_recomputes_net() {
        let pair = Pair {
            id: "p1".to_string(),
            left_pv: 500.0,
            right_pv: 300.0,
            matched_pv: 0.0,
            commission: dec("2000"),
            tds: None,
            pool_money: None,
            net_amount: dec("1800.00"),
            matched_at: None,
        };
        let view = derive_pair(&pair);
        assert_eq!(view.tds, 20_000);
        assert_eq!(view.net, 180_000);
        assert_eq!(view.matched_pv, 300.0);
        assert!(view.consistent);
    }

    #[test]
    fn test_derive_pair_flags_bad_net() {
        let pair = Pair {
            id: "p2".to_string(),
            left_pv: 100.0,
            right_pv: 100.0,
            matched_pv: 100.0,
            commission: dec("2000"),
            tds: dec("200"),
            pool_money: dec("400"),
            net_amount: dec("1800"),
            matched_at: None,
        };
        let view = derive_pair(&pair);
        assert!(!view.consistent);
        assert_eq!(view.net, 180_000);

        let totals = summarize_pairs(&[view, derive_pair(&Pair { net_amount: dec("1400"), ..pair })]);
        assert_eq!(totals.count, 2);
        assert_eq!(totals.inconsistent, 1);
        assert_eq!(totals.pool, 80_000);
    }
}
