use crate::storage::Phase;
use soroban_sdk::Vec;

/// `[start, end]` is usable as a new phase: ordered, and disjoint from every
/// existing phase regardless of the order they were added in.
pub fn is_valid_interval(phases: &Vec<Phase>, start_time: u64, end_time: u64) -> bool {
    if start_time >= end_time {
        return false;
    }

    !phases
        .iter()
        .any(|phase| start_time <= phase.end_time && phase.start_time <= end_time)
}

/// First phase whose inclusive bounds contain `timestamp`.
pub fn find_phase(phases: &Vec<Phase>, timestamp: u64) -> Option<Phase> {
    phases
        .iter()
        .find(|phase| phase.start_time <= timestamp && timestamp <= phase.end_time)
}

/// Bonus at `timestamp`; 0 when no phase covers it.
///
/// A 0 result is ambiguous on its own, use `find_phase` to tell a zero-bonus
/// phase from a gap in the schedule.
pub fn bonus_percent_at(phases: &Vec<Phase>, timestamp: u64) -> u32 {
    find_phase(phases, timestamp)
        .map(|phase| phase.bonus_percent)
        .unwrap_or(0)
}
