// service/funnel.rs
//
// Funnel counts from the two user types are summed; conversion rates are
// averaged. The two policies are deliberately kept in separate functions.
use crate::models::funnelmodel::{BiggestDrop, ConversionRate, FunnelStage};

pub fn percentage_of(count: u64, base: u64) -> f64 {
    if base == 0 {
        return 0.0;
    }
    count as f64 * 100.0 / base as f64
}

/// Drop-off from the previous stage, in percent. Zero for the first stage and
/// whenever the previous stage is empty.
pub fn drop_off(prev: u64, curr: u64) -> f64 {
    if prev == 0 {
        return 0.0;
    }
    (prev as f64 - curr as f64) * 100.0 / prev as f64
}

/// Per-stage drop-offs, preferring values the server already computed.
pub fn derive_drop_offs(stages: &[FunnelStage]) -> Vec<f64> {
    stages
        .iter()
        .enumerate()
        .map(|(idx, stage)| {
            if idx == 0 {
                return 0.0;
            }
            stage
                .drop_off
                .unwrap_or_else(|| drop_off(stages[idx - 1].count, stage.count))
        })
        .collect()
}

/// Fills in missing percentage and drop-off fields for a single user type.
pub fn complete_stages(stages: &[FunnelStage]) -> Vec<FunnelStage> {
    let base = stages.first().map(|s| s.count).unwrap_or(0);
    let drop_offs = derive_drop_offs(stages);

    stages
        .iter()
        .zip(drop_offs)
        .map(|(stage, drop)| FunnelStage {
            stage: stage.stage.clone(),
            count: stage.count,
            percentage: Some(stage.percentage.unwrap_or_else(|| percentage_of(stage.count, base))),
            drop_off: Some(drop),
        })
        .collect()
}

/// Sums counts stage-by-stage and recomputes percentages against the combined
/// first stage. A longer list keeps its extra stages with their own counts.
pub fn combine_funnel(normal: &[FunnelStage], staff: &[FunnelStage]) -> Vec<FunnelStage> {
    let len = normal.len().max(staff.len());
    let summed: Vec<(String, u64)> = (0..len)
        .filter_map(|idx| match (normal.get(idx), staff.get(idx)) {
            (Some(n), Some(s)) => Some((n.stage.clone(), n.count + s.count)),
            (Some(only), None) | (None, Some(only)) => Some((only.stage.clone(), only.count)),
            (None, None) => None,
        })
        .collect();

    let base = summed.first().map(|(_, count)| *count).unwrap_or(0);

    summed
        .iter()
        .enumerate()
        .map(|(idx, (stage, count))| FunnelStage {
            stage: stage.clone(),
            count: *count,
            percentage: Some(percentage_of(*count, base)),
            drop_off: Some(if idx == 0 { 0.0 } else { drop_off(summed[idx - 1].1, *count) }),
        })
        .collect()
}

/// Largest drop-off and the transition it happened on. `None` for an empty
/// funnel.
pub fn biggest_drop(stages: &[FunnelStage]) -> Option<BiggestDrop> {
    let drops = derive_drop_offs(stages);

    let (idx, value) = drops
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (idx, value)| match best {
            Some((_, best_value)) if best_value >= value => best,
            _ => Some((idx, value)),
        })?;

    let label = if idx == 0 {
        "N/A".to_string()
    } else {
        format!("{} → {}", stages[idx - 1].stage, stages[idx].stage)
    };

    Some(BiggestDrop { value, label })
}

/// Averages `rate` and `change` per transition across the two user types.
pub fn combine_conversion_rates(normal: &[ConversionRate], staff: &[ConversionRate]) -> Vec<ConversionRate> {
    let len = normal.len().max(staff.len());
    (0..len)
        .filter_map(|idx| match (normal.get(idx), staff.get(idx)) {
            (Some(n), Some(s)) => Some(ConversionRate {
                from_stage: n.from_stage.clone(),
                to_stage: n.to_stage.clone(),
                rate: (n.rate + s.rate) / 2.0,
                change: (n.change + s.change) / 2.0,
            }),
            (Some(only), None) | (None, Some(only)) => Some(only.clone()),
            (None, None) => None,
        })
        .collect()
}
