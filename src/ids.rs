//! Timestamp-derived identifiers for moods, boards, journal entries and board items

use chrono::{DateTime, Utc};

/// Mints millisecond-timestamp ids, bumping forward when two are requested
/// within the same millisecond.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> String {
        self.next_at(Utc::now())
    }

    pub fn next_at(&mut self, now: DateTime<Utc>) -> String {
        let millis = now.timestamp_millis().max(self.last + 1);
        self.last = millis;
        millis.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_ids_are_timestamp_millis() {
        let mut ids = IdGenerator::new();
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(ids.next_at(now), now.timestamp_millis().to_string());
    }

    #[test]
    fn test_same_millisecond_does_not_collide() {
        let mut ids = IdGenerator::new();
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let a = ids.next_at(now);
        let b = ids.next_at(now);
        assert_ne!(a, b);
        assert!(b.parse::<i64>().unwrap() > a.parse::<i64>().unwrap());
    }
}
