use crate::progress::{UserProgress, MILESTONES};

/// Record every milestone newly reached by the current total.
///
/// Returns the thresholds passed by this call in ascending order. A single
/// large award can cross several at once.
pub fn check_milestones(progress: &mut UserProgress) -> Vec<u64> {
    let mut passed = Vec::new();
    for milestone in MILESTONES {
        if progress.total_xp >= milestone && !progress.has_passed(milestone) {
            progress.passed_milestones.push(milestone);
            passed.push(milestone);
        }
    }
    passed
}
