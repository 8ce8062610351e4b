// service/milestone.rs
use crate::{
    models::milestonemodel::{
        Milestone, MilestoneCounter, MilestoneDefinition, MilestoneProgress, MilestoneSummary,
    },
    service::commission::ACTIVATION_REFERRALS,
    utils::decimal::BigDecimalHelpers,
};

/// The catalog used when the platform does not send its own list.
pub fn default_definitions() -> Vec<MilestoneDefinition> {
    vec![
        definition("m1", "3 Direct Referrals", MilestoneCounter::Referrals, 3, 0),
        definition(
            "m2",
            "Binary Activation",
            MilestoneCounter::ReferralsCapped,
            ACTIVATION_REFERRALS,
            200_000,
        ),
        definition("m3", "5 Matched Pairs", MilestoneCounter::Pairs, 5, 0),
        definition("m4", "10 Matched Pairs", MilestoneCounter::Pairs, 10, 0),
    ]
}

fn definition(id: &str, name: &str, counter: MilestoneCounter, target: u32, reward_paise: i64) -> MilestoneDefinition {
    MilestoneDefinition {
        id: id.to_string(),
        name: name.to_string(),
        counter,
        target,
        reward_paise,
        achieved_at: None,
    }
}

/// Counter for the legacy milestone ids that predate the `counter` field.
fn legacy_counter(id: &str) -> Option<MilestoneCounter> {
    match id {
        "m1" => Some(MilestoneCounter::Referrals),
        "m2" => Some(MilestoneCounter::ReferralsCapped),
        "m3" | "m4" => Some(MilestoneCounter::Pairs),
        _ => None,
    }
}

/// Turns the upstream milestone list into definitions. Entries with neither a
/// counter nor a known id are dropped.
pub fn definitions_from(milestones: &[Milestone]) -> Vec<MilestoneDefinition> {
    if milestones.is_empty() {
        return default_definitions();
    }

    milestones
        .iter()
        .filter_map(|milestone| {
            let counter = milestone.counter.or_else(|| legacy_counter(&milestone.id));
            match counter {
                Some(counter) => Some(MilestoneDefinition {
                    id: milestone.id.clone(),
                    name: milestone.name.clone(),
                    counter,
                    target: milestone.target,
                    reward_paise: milestone.reward.to_paise_or_zero(),
                    achieved_at: milestone.achieved_at,
                }),
                None => {
                    tracing::warn!("Skipping milestone {} with no counter", milestone.id);
                    None
                }
            }
        })
        .collect()
}

pub fn current_value(counter: MilestoneCounter, total_referrals: u32, total_pairs: u32) -> u32 {
    match counter {
        MilestoneCounter::Referrals => total_referrals,
        MilestoneCounter::ReferralsCapped => total_referrals.min(ACTIVATION_REFERRALS),
        MilestoneCounter::Pairs => total_pairs,
    }
}

pub fn progress_percent(current: u32, target: u32) -> f64 {
    if target == 0 {
        return 100.0;
    }
    (current as f64 * 100.0 / target as f64).min(100.0)
}

pub fn evaluate_definitions(
    definitions: &[MilestoneDefinition],
    total_referrals: u32,
    total_pairs: u32,
) -> Vec<MilestoneProgress> {
    definitions
        .iter()
        .map(|def| {
            let current = current_value(def.counter, total_referrals, total_pairs);
            MilestoneProgress {
                id: def.id.clone(),
                name: def.name.clone(),
                counter: def.counter,
                current,
                target: def.target,
                progress_percent: progress_percent(current, def.target),
                achieved: current >= def.target,
                reward_paise: def.reward_paise,
                achieved_at: def.achieved_at,
            }
        })
        .collect()
}

pub fn evaluate(milestones: &[Milestone], total_referrals: u32, total_pairs: u32) -> Vec<MilestoneProgress> {
    evaluate_definitions(&definitions_from(milestones), total_referrals, total_pairs)
}

pub fn summarize(progress: &[MilestoneProgress]) -> MilestoneSummary {
    let achieved: Vec<&MilestoneProgress> = progress.iter().filter(|m| m.achieved).collect();
    MilestoneSummary {
        achieved_count: achieved.len(),
        total_count: progress.len(),
        total_rewards_paise: achieved.iter().map(|m| m.reward_paise).sum(),
    }
}
