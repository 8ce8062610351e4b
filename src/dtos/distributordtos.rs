// dtos/distributordtos.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::common::{validate_phone, PaginatedResponse};
use crate::{
    models::{
        binarymodel::{BinaryStats, NodePosition, TeamMember},
        distributormodel::{DistributorDashboardStats, Nominee, VerificationStatus},
        milestonemodel::{MilestoneCounter, MilestoneProgress, MilestoneSummary},
    },
    service::{
        binary_tree::SideTotals,
        commission::{BreakdownRow, CommissionBreakdown, CommissionKind, ConsistencyWarning, PairTotals, PairView},
        fetch::FetchState,
    },
    utils::{
        currency::{format_paise_as_rupees, paise_to_rupees},
        decimal::BigDecimalHelpers,
    },
};

// Earnings

#[derive(Debug, Serialize)]
pub struct BreakdownRowDto {
    #[serde(rename = "type")]
    pub kind: CommissionKind,
    pub count: u32,
    pub gross: f64, // In Rupees
    pub tds: f64,
    pub pool: f64,
    pub net: f64,
    pub description: String,
}

impl From<&BreakdownRow> for BreakdownRowDto {
    fn from(row: &BreakdownRow) -> Self {
        Self {
            kind: row.kind,
            count: row.count,
            gross: paise_to_rupees(row.gross),
            tds: paise_to_rupees(row.tds),
            pool: paise_to_rupees(row.pool),
            net: paise_to_rupees(row.net),
            description: row.description.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WarningDto {
    #[serde(flatten)]
    pub detail: ConsistencyWarning,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct EarningsResponseDto {
    pub rows: Vec<BreakdownRowDto>,
    pub total_gross: f64,
    pub total_tds: f64,
    pub total_pool: f64,
    pub total_net: f64,
    pub formatted_total_net: String,
    pub binary_activated: bool,
    pub pairs_beyond_limit: u32,
    /// What the reported total leaves for pairs after referral and activation.
    pub residual_pair_commission: f64,
    pub warnings: Vec<WarningDto>,
}

impl From<&CommissionBreakdown> for EarningsResponseDto {
    fn from(breakdown: &CommissionBreakdown) -> Self {
        Self {
            rows: breakdown.rows.iter().map(BreakdownRowDto::from).collect(),
            total_gross: paise_to_rupees(breakdown.total_gross),
            total_tds: paise_to_rupees(breakdown.total_tds),
            total_pool: paise_to_rupees(breakdown.total_pool),
            total_net: paise_to_rupees(breakdown.total_net),
            formatted_total_net: format_paise_as_rupees(breakdown.total_net),
            binary_activated: breakdown.binary_activated,
            pairs_beyond_limit: breakdown.pairs_beyond_limit,
            residual_pair_commission: paise_to_rupees(breakdown.residual_pair_commission),
            warnings: breakdown
                .warnings
                .iter()
                .map(|warning| WarningDto {
                    detail: warning.clone(),
                    message: warning.message(),
                })
                .collect(),
        }
    }
}

// Milestones

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneDto {
    pub id: String,
    pub name: String,
    pub counter: MilestoneCounter,
    pub current: u32,
    pub target: u32,
    pub progress_percent: f64,
    pub achieved: bool,
    pub reward: f64,
    pub achieved_at: Option<DateTime<Utc>>,
}

impl From<MilestoneProgress> for MilestoneDto {
    fn from(progress: MilestoneProgress) -> Self {
        Self {
            id: progress.id,
            name: progress.name,
            counter: progress.counter,
            current: progress.current,
            target: progress.target,
            progress_percent: progress.progress_percent,
            achieved: progress.achieved,
            reward: paise_to_rupees(progress.reward_paise),
            achieved_at: progress.achieved_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneSummaryDto {
    pub achieved_count: usize,
    pub total_count: usize,
    pub total_rewards: f64,
    pub formatted_total_rewards: String,
}

impl From<&MilestoneSummary> for MilestoneSummaryDto {
    fn from(summary: &MilestoneSummary) -> Self {
        Self {
            achieved_count: summary.achieved_count,
            total_count: summary.total_count,
            total_rewards: paise_to_rupees(summary.total_rewards_paise),
            formatted_total_rewards: format_paise_as_rupees(summary.total_rewards_paise),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MilestonesResponseDto {
    pub milestones: Vec<MilestoneDto>,
    pub summary: MilestoneSummaryDto,
}

// Team

#[derive(Debug, Deserialize, Default)]
pub struct TeamQueryDto {
    /// Restrict to one leg of the tree.
    pub side: Option<NodePosition>,
    pub max_level: Option<u32>,
}

impl TeamQueryDto {
    pub fn keeps(&self, member: &TeamMember) -> bool {
        self.max_level.map_or(true, |max| member.level <= max)
    }
}

#[derive(Debug, Serialize)]
pub struct TeamResponseDto {
    pub members: Vec<TeamMember>,
    pub total_members: usize,
    pub sides: SideTotals,
    pub weaker_side_pv: f64,
    /// Whether the tree agrees with the distributor's reported side counts;
    /// `None` when the counts could not be fetched.
    pub counts_match: Option<bool>,
}

// Pairs

#[derive(Debug, Serialize)]
pub struct PairViewDto {
    pub id: String,
    pub left_pv: f64,
    pub right_pv: f64,
    pub matched_pv: f64,
    pub commission: f64,
    pub tds: f64,
    pub pool_money: f64,
    pub net_amount: f64,
    pub expected_tds: f64,
    pub consistent: bool,
    pub matched_at: Option<DateTime<Utc>>,
}

impl From<PairView> for PairViewDto {
    fn from(pair: PairView) -> Self {
        Self {
            id: pair.id,
            left_pv: pair.left_pv,
            right_pv: pair.right_pv,
            matched_pv: pair.matched_pv,
            commission: paise_to_rupees(pair.commission),
            tds: paise_to_rupees(pair.tds),
            pool_money: paise_to_rupees(pair.pool),
            net_amount: paise_to_rupees(pair.net),
            expected_tds: paise_to_rupees(pair.expected_tds),
            consistent: pair.consistent,
            matched_at: pair.matched_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PairTotalsDto {
    pub count: usize,
    pub commission: f64,
    pub tds: f64,
    pub pool_money: f64,
    pub net_amount: f64,
    pub inconsistent: usize,
}

impl From<&PairTotals> for PairTotalsDto {
    fn from(totals: &PairTotals) -> Self {
        Self {
            count: totals.count,
            commission: paise_to_rupees(totals.commission),
            tds: paise_to_rupees(totals.tds),
            pool_money: paise_to_rupees(totals.pool),
            net_amount: paise_to_rupees(totals.net),
            inconsistent: totals.inconsistent,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PairHistoryResponseDto {
    #[serde(flatten)]
    pub page: PaginatedResponse<PairViewDto>,
    pub page_totals: PairTotalsDto,
}

// Dashboard

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardSection {
    Stats,
    Binary,
    Milestones,
}

#[derive(Debug, Deserialize, Default)]
pub struct DashboardQueryDto {
    /// Comma separated subset of `stats,binary,milestones`; all when absent.
    pub sections: Option<String>,
}

impl DashboardQueryDto {
    pub fn wants(&self, section: DashboardSection) -> bool {
        let Some(raw) = &self.sections else {
            return true;
        };

        let name = match section {
            DashboardSection::Stats => "stats",
            DashboardSection::Binary => "binary",
            DashboardSection::Milestones => "milestones",
        };
        raw.split(',').any(|s| s.trim().eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Serialize)]
pub struct DashboardStatsDto {
    pub total_earnings: f64,
    pub tds_deducted: f64,
    pub pool_money: f64,
    pub total_referrals: u32,
    pub total_pairs: u32,
    pub referral_code: Option<String>,
    pub verification_status: Option<VerificationStatus>,
    pub earnings: EarningsResponseDto,
}

impl DashboardStatsDto {
    pub fn new(stats: &DistributorDashboardStats, breakdown: &CommissionBreakdown) -> Self {
        let distributor = stats.distributor.as_ref();
        Self {
            total_earnings: stats.total_earnings.to_f64_or_zero(),
            tds_deducted: stats.tds_deducted.to_f64_or_zero(),
            pool_money: stats.pool_money.to_f64_or_zero(),
            total_referrals: stats.total_referrals,
            total_pairs: stats.total_pairs,
            referral_code: distributor
                .map(|d| d.referral_code.clone())
                .filter(|code| !code.is_empty()),
            verification_status: distributor.and_then(|d| d.verification_status),
            earnings: breakdown.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BinarySummaryDto {
    #[serde(flatten)]
    pub stats: BinaryStats,
    pub weaker_side_pv: f64,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponseDto {
    pub stats: FetchState<DashboardStatsDto>,
    pub binary: FetchState<BinarySummaryDto>,
    pub milestones: FetchState<MilestonesResponseDto>,
}

// Nominee

fn validate_dob(dob: &NaiveDate) -> Result<(), ValidationError> {
    if *dob < Utc::now().date_naive() {
        Ok(())
    } else {
        Err(ValidationError::new("Date of birth must be in the past"))
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct NomineeUpdateDto {
    #[validate(length(min = 2, max = 100, message = "Nominee name must be between 2 and 100 characters"))]
    pub name: String,

    #[validate(length(min = 2, max = 50, message = "Relationship is required"))]
    pub relationship: String,

    #[validate(custom = "validate_phone")]
    pub phone: Option<String>,

    #[validate(custom = "validate_dob")]
    pub dob: Option<NaiveDate>,
}

impl From<NomineeUpdateDto> for Nominee {
    fn from(dto: NomineeUpdateDto) -> Self {
        Nominee {
            name: dto.name.trim().to_string(),
            relationship: dto.relationship.trim().to_string(),
            phone: dto.phone,
            dob: dto.dob,
        }
    }
}
