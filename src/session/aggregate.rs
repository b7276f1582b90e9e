use crate::models::session::{LogEntry, Totals};

/// Sum seconds, reps and calories across a session's log entries. Pure;
/// an empty log sequence yields all-zero totals.
pub fn aggregate(logs: &[LogEntry]) -> Totals {
    logs.iter().fold(Totals::default(), |mut totals, entry| {
        totals.seconds += entry.performed.seconds;
        totals.reps += entry.performed.reps;
        totals.calories += entry.calories;
        totals
    })
}
