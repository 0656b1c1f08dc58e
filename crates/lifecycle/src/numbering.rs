//! Order number sequence.

use std::sync::Mutex;

use chrono::Utc;

/// Issues human-readable order numbers: `CMD-YYYYMMDD-NNNN`, a per-day
/// sequence starting at 1.
///
/// The sequence is process-local; uniqueness across restarts would come
/// from persisting the counter alongside the event log.
#[derive(Debug, Default)]
pub struct OrderNumbers {
    state: Mutex<DaySequence>,
}

#[derive(Debug, Default)]
struct DaySequence {
    day: String,
    last: u32,
}

impl OrderNumbers {
    /// Creates a new sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next order number.
    pub fn next(&self) -> String {
        let today = Utc::now().format("%Y%m%d").to_string();
        let mut state = self.state.lock().unwrap();
        if state.day != today {
            state.day = today;
            state.last = 0;
        }
        state.last += 1;
        format!("CMD-{}-{:04}", state.day, state.last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_sequential_within_a_day() {
        let numbers = OrderNumbers::new();
        let first = numbers.next();
        let second = numbers.next();

        assert!(first.starts_with("CMD-"));
        assert!(first.ends_with("-0001"));
        assert!(second.ends_with("-0002"));
        assert_eq!(&first[..13], &second[..13]);
    }

    #[test]
    fn format_has_date_and_four_digit_sequence() {
        let numbers = OrderNumbers::new();
        let n = numbers.next();
        // CMD- + 8 date digits + - + 4 sequence digits
        assert_eq!(n.len(), 17);
        let parts: Vec<&str> = n.split('-').collect();
        assert_eq!(parts[0], "CMD");
        assert_eq!(parts[1].len(), 8);
        assert_eq!(parts[2], "0001");
    }
}
