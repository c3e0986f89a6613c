use chrono::{Datelike, Timelike};
use regex::{Captures, Regex};

use super::{
    clock::to_minutes,
    daily::Daily,
    schedule::{day_name, hours_text, is_closed, DayEntry, WeeklySchedule},
    status::{CurrentPeriod, RealTimeStatus},
};

/// `H[:MM] am|pm – H[:MM] am|pm`, with a hyphen, en dash or em dash in between.
const TIME_RANGE_PATTERN: &str =
    r"(?i)(\d{1,2})(:(\d{2}))?\s*(am|pm)\s*[–\-—]\s*(\d{1,2})(:(\d{2}))?\s*(am|pm)";

/// Answers "is this venue open right now" from the provider's weekday descriptions.
///
/// The evaluator holds nothing but the compiled time range pattern, so one
/// instance can be shared between any number of callers. Every input maps to a
/// `RealTimeStatus`; malformed hours degrade to the fallback hint instead of failing.
#[derive(Clone, Debug)]
pub struct HoursEvaluator {
    time_range_regex: Regex,
}

impl Default for HoursEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl HoursEvaluator {
    pub fn new() -> Self {
        Self {
            time_range_regex: Regex::new(TIME_RANGE_PATTERN)
                .expect("time range pattern is a valid regex"),
        }
    }

    /// Evaluates `schedule` at `now`, which must already be the venue's local wall clock.
    ///
    /// `fallback_open_now` is only consulted when the relevant day cannot be found or parsed.
    pub fn evaluate<T>(
        &self,
        schedule: &WeeklySchedule,
        now: &T,
        fallback_open_now: Option<bool>,
    ) -> RealTimeStatus
    where
        T: Datelike + Timelike,
    {
        if schedule.is_empty() {
            tracing::debug!("No weekday descriptions");
            return RealTimeStatus::unavailable();
        }

        let current = (now.hour() * 60 + now.minute()) as u16;
        let today = now.weekday();
        let yesterday = today.pred();

        // Yesterday's overnight hours win over anything today says.
        if let Some(entry) = schedule.find_day(yesterday) {
            if let DayEntry::Hours(daily) = self.parse_entry(entry) {
                if daily.carries_over_to(current) {
                    let day = day_name(yesterday);
                    tracing::debug!(day, current, "Inside previous day's overnight hours");
                    let closes_at = daily.closes_at();
                    return RealTimeStatus {
                        is_open: true,
                        message: format!("Open until {} ({}'s overnight hours)", closes_at, day),
                        current_period: Some(CurrentPeriod {
                            day: day.to_string(),
                            hours: hours_text(entry).to_string(),
                            is_overnight_period: true,
                            closes_at: Some(closes_at),
                        }),
                    };
                }
            }
        }

        let day = day_name(today);
        let Some(entry) = schedule.find_day(today) else {
            tracing::debug!(day, "No entry for today, using fallback");
            return RealTimeStatus::fallback(fallback_open_now);
        };

        match self.parse_entry(entry) {
            DayEntry::Closed => RealTimeStatus {
                is_open: false,
                current_period: Some(CurrentPeriod {
                    day: day.to_string(),
                    hours: "Closed".to_string(),
                    is_overnight_period: false,
                    closes_at: None,
                }),
                message: format!("Closed today ({})", day),
            },
            DayEntry::Hours(daily) => Self::evaluate_day(day, entry, daily, current),
            DayEntry::Unparsable => {
                tracing::debug!(entry, "Unparsable hours, using fallback");
                RealTimeStatus::fallback(fallback_open_now)
            }
        }
    }

    /// Classifies a single weekday description.
    pub fn parse_entry(&self, entry: &str) -> DayEntry {
        if is_closed(entry) {
            return DayEntry::Closed;
        }
        match self.time_range_regex.captures(entry) {
            Some(captures) => match Self::parse_timings(&captures) {
                Some(daily) => DayEntry::Hours(daily),
                None => DayEntry::Unparsable,
            },
            None => DayEntry::Unparsable,
        }
    }

    fn parse_timings(captures: &Captures) -> Option<Daily> {
        let reading = |hour: usize, minute: usize, meridiem: usize| -> Option<(u16, bool)> {
            let hour: u16 = captures.get(hour)?.as_str().parse().ok()?;
            let minute: u16 = match captures.get(minute) {
                Some(m) => m.as_str().parse().ok()?,
                None => 0,
            };
            let is_pm = captures.get(meridiem)?.as_str().eq_ignore_ascii_case("pm");
            Some((to_minutes(hour, minute, is_pm)?, is_pm))
        };
        let (opening, _) = reading(1, 3, 4)?;
        let (closing, closes_pm) = reading(5, 7, 8)?;
        Some(Daily::new(opening, closing, !closes_pm))
    }

    fn evaluate_day(day: &str, entry: &str, daily: Daily, current: u16) -> RealTimeStatus {
        let is_open = daily.contains(current);
        let closes_at = daily.closes_at();
        let opens_at = daily.opens_at();

        let message = match (is_open, daily.is_overnight()) {
            (true, true) if current >= daily.opening() => {
                format!("Open until {} tomorrow (overnight hours)", closes_at)
            }
            (true, true) => format!("Open until {} ({}'s overnight hours)", closes_at, day),
            (true, false) => format!("Open until {}", closes_at),
            (false, true) => format!("Closed - Opens at {}", opens_at),
            (false, false) if current < daily.opening() => {
                format!("Closed - Opens at {}", opens_at)
            }
            (false, false) => format!("Closed - Opens {} tomorrow", opens_at),
        };

        RealTimeStatus {
            is_open,
            current_period: Some(CurrentPeriod {
                day: day.to_string(),
                hours: hours_text(entry).to_string(),
                is_overnight_period: daily.is_overnight(),
                closes_at: is_open.then_some(closes_at),
            }),
            message,
        }
    }
}
