// Business rules - Clip selection and scratch naming

use crate::domain::model::ClipDescriptor;

/// Default cap on clips taking part in one compilation
pub const MAX_TOTAL_CLIPS: usize = 35;

/// Outcome of applying the eligibility filter and the clip cap
#[derive(Debug, Clone, PartialEq)]
pub struct ClipSelection {
    pub clips: Vec<ClipDescriptor>,
    /// Records dropped for an empty path or non-positive duration
    pub rejected: usize,
    /// Eligible records dropped because the cap was reached
    pub truncated: usize,
}

/// Selects clips for assembly.
///
/// Filters first, then keeps the first `max_clips` survivors. Relative order
/// is never changed.
pub fn select_clips(descriptors: Vec<ClipDescriptor>, max_clips: usize) -> ClipSelection {
    let total = descriptors.len();
    let mut eligible: Vec<ClipDescriptor> = descriptors
        .into_iter()
        .filter(ClipDescriptor::is_eligible)
        .collect();
    let rejected = total - eligible.len();
    let truncated = eligible.len().saturating_sub(max_clips);
    eligible.truncate(max_clips);

    ClipSelection {
        clips: eligible,
        rejected,
        truncated,
    }
}

/// Width of the numeric scratch prefix for `clip_count` clips plus bookends
pub fn prefix_width(clip_count: usize) -> usize {
    let highest = clip_count + 1;
    highest.to_string().len().max(3)
}

/// Turns an arbitrary file stem into a name safe for the scratch directory
pub fn sanitize_stem(stem: &str) -> String {
    let cleaned: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "clip".to_string()
    } else {
        cleaned
    }
}
