/// Minutes in a day. Every minute value handled here lives in `0..MINUTES_PER_DAY`.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Noon, in minutes since midnight.
pub const NOON: u16 = 12 * 60;

/// Converts a 12 hour clock reading into minutes since midnight.
///
/// 12 AM maps to 0:xx, 12 PM stays 12:xx and every other PM hour gains 12 hours.
/// Returns `None` for hours outside `1..=12` or minutes outside `0..60`.
pub fn to_minutes(hour: u16, minute: u16, is_pm: bool) -> Option<u16> {
    if !(1..=12).contains(&hour) || minute >= 60 {
        return None;
    }
    let hour = match (hour, is_pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, true) => h + 12,
        (h, false) => h,
    };
    Some(hour * 60 + minute)
}

/// Formats minutes since midnight as `H:MM AM` / `H:MM PM`.
pub fn format_minutes(minutes: u16) -> String {
    let minutes = minutes % MINUTES_PER_DAY;
    let hour = minutes / 60;
    let minute = minutes % 60;
    let suffix = if hour < 12 { "AM" } else { "PM" };
    let hour = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:{:02} {}", hour, minute, suffix)
}
