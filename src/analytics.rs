//! Mood statistics over a trailing time range

use chrono::{DateTime, Duration, Utc};

use crate::store::{Mood, StoreState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeRange {
    #[default]
    Week,
    Month,
    Year,
}

impl TimeRange {
    pub const ALL: [TimeRange; 3] = [TimeRange::Week, TimeRange::Month, TimeRange::Year];

    pub fn days(self) -> i64 {
        match self {
            TimeRange::Week => 7,
            TimeRange::Month => 30,
            TimeRange::Year => 365,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeRange::Week => "Week",
            TimeRange::Month => "Month",
            TimeRange::Year => "Year",
        }
    }

    pub fn cutoff(self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(self.days())
    }
}

/// Moods per label bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Distribution {
    pub great: usize,
    pub good: usize,
    pub neutral: usize,
    pub down: usize,
    pub sad: usize,
}

impl Distribution {
    fn record(&mut self, value: u8) {
        match value {
            0..=2 => self.sad += 1,
            3..=4 => self.down += 1,
            5..=6 => self.neutral += 1,
            7..=8 => self.good += 1,
            _ => self.great += 1,
        }
    }

    /// Buckets from best to worst
    pub fn buckets(&self) -> [(&'static str, usize); 5] {
        [
            ("great", self.great),
            ("good", self.good),
            ("neutral", self.neutral),
            ("down", self.down),
            ("sad", self.sad),
        ]
    }

    /// Largest bucket; the earlier bucket wins ties, "none" when empty
    pub fn most_common(&self) -> &'static str {
        self.buckets()
            .into_iter()
            .fold(("none", 0), |best, bucket| if bucket.1 > best.1 { bucket } else { best })
            .0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoodStats {
    pub entries: usize,
    /// Mean value rounded to one decimal
    pub average: Option<f32>,
    pub distribution: Distribution,
    /// max - min, needs at least two entries
    pub spread: Option<u8>,
}

/// Moods dated within `range` of `now`, oldest first
pub fn moods_in_range(moods: &[Mood], range: TimeRange, now: DateTime<Utc>) -> Vec<&Mood> {
    let cutoff = range.cutoff(now);
    let mut filtered: Vec<&Mood> = moods.iter().filter(|m| m.date >= cutoff).collect();
    filtered.sort_by_key(|m| m.date);
    filtered
}

pub fn mood_stats(moods: &[Mood], range: TimeRange, now: DateTime<Utc>) -> MoodStats {
    let filtered = moods_in_range(moods, range, now);
    let mut distribution = Distribution::default();
    for mood in &filtered {
        distribution.record(mood.value);
    }

    let values: Vec<u8> = filtered.iter().map(|m| m.value).collect();
    let spread = match (values.iter().max(), values.iter().min()) {
        (Some(max), Some(min)) if values.len() > 1 => Some(max - min),
        _ => None,
    };

    MoodStats {
        entries: filtered.len(),
        average: average(&values),
        distribution,
        spread,
    }
}

/// Headline numbers for the dashboard
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub total_moods: usize,
    pub average_mood: Option<f32>,
    pub mood_boards: usize,
    pub journal_entries: usize,
}

pub fn dashboard_summary(state: &StoreState) -> DashboardSummary {
    let values: Vec<u8> = state.moods.iter().map(|m| m.value).collect();
    DashboardSummary {
        total_moods: state.moods.len(),
        average_mood: average(&values),
        mood_boards: state.mood_boards.len(),
        journal_entries: state.journal_entries.len(),
    }
}

fn average(values: &[u8]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    let sum: u32 = values.iter().map(|&v| u32::from(v)).sum();
    let mean = sum as f32 / values.len() as f32;
    Some((mean * 10.0).round() / 10.0)
}
