use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::daily::Daily;

/// Upstream text for a day without any opening period.
pub const CLOSED_MARKER: &str = "closed";

/// The free-text weekly hours as the places provider hands them out,
/// e.g. `["Monday: 9:00 AM – 5:00 PM", "Tuesday: Closed", ...]`.
///
/// Entries may come in any order and the week may be incomplete. Days are
/// looked up by a case-insensitive substring search and the first hit wins.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeeklySchedule {
    descriptions: Vec<String>,
}

/// What a single weekday description says about its day.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DayEntry {
    Closed,
    Hours(Daily),
    Unparsable,
}

impl WeeklySchedule {
    pub fn new(descriptions: Vec<String>) -> Self {
        Self { descriptions }
    }

    pub fn is_empty(&self) -> bool {
        self.descriptions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.descriptions.len()
    }

    pub fn descriptions(&self) -> &[String] {
        &self.descriptions
    }

    /// First description mentioning the day's full English name.
    ///
    /// This is a plain substring match, so "Monday" also hits "Mondayish".
    pub fn find_day(&self, day: Weekday) -> Option<&str> {
        let needle = day_name(day).to_lowercase();
        self.descriptions
            .iter()
            .find(|entry| entry.to_lowercase().contains(&needle))
            .map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for WeeklySchedule {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// The hours part of a description, i.e. everything after the `Day:` label.
pub fn hours_text(entry: &str) -> &str {
    match entry.split_once(':') {
        Some((_, hours)) => hours.trim(),
        None => entry.trim(),
    }
}

pub fn is_closed(entry: &str) -> bool {
    entry.to_lowercase().contains(CLOSED_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule(entries: &[&str]) -> WeeklySchedule {
        entries.iter().copied().collect()
    }

    #[test]
    fn finds_days_in_any_order_and_case() {
        let week = schedule(&["SUNDAY: Closed", "monday: 9:00 am – 5:00 pm"]);
        assert_eq!(week.find_day(Weekday::Mon), Some("monday: 9:00 am – 5:00 pm"));
        assert_eq!(week.find_day(Weekday::Sun), Some("SUNDAY: Closed"));
        assert_eq!(week.find_day(Weekday::Tue), None);
    }

    #[test]
    fn first_duplicate_wins() {
        let week = schedule(&["Monday: Closed", "Monday: 9:00 am – 5:00 pm"]);
        assert_eq!(week.find_day(Weekday::Mon), Some("Monday: Closed"));
    }

    #[test]
    fn substring_match_is_loose() {
        let week = schedule(&["Mondayish: 9:00 am – 5:00 pm"]);
        assert_eq!(week.find_day(Weekday::Mon), Some("Mondayish: 9:00 am – 5:00 pm"));
    }

    #[test]
    fn hours_text_strips_the_label() {
        assert_eq!(hours_text("Monday: 9:00 AM – 5:00 PM"), "9:00 AM – 5:00 PM");
        assert_eq!(hours_text("Tuesday: Closed"), "Closed");
        assert_eq!(hours_text(" no label "), "no label");
    }

    #[test]
    fn markers_ignore_case() {
        assert!(is_closed("Monday: CLOSED"));
        assert!(!is_closed("Monday: 9:00 am – 5:00 pm"));
    }

    #[test]
    fn deserializes_from_a_plain_array() {
        let week: WeeklySchedule =
            serde_json::from_str(r#"["Monday: Closed", "Tuesday: Closed"]"#).unwrap();
        assert_eq!(week.len(), 2);
    }
}
