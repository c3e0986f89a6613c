use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Where a venue's wall clock comes from, most specific first.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum VenueZone<'a> {
    Named(&'a str),
    Offset(i32),
}

/// Converts `now` into the venue's local wall clock.
///
/// An IANA zone name is preferred over a fixed offset, and `default_tz` is used when
/// neither is usable.
pub fn venue_local_time(
    now: DateTime<Utc>,
    zones: &[VenueZone],
    default_tz: Tz,
) -> NaiveDateTime {
    for zone in zones {
        match zone {
            VenueZone::Named(name) => match name.parse::<Tz>() {
                Ok(tz) => return now.with_timezone(&tz).naive_local(),
                Err(_) => tracing::debug!(name, "Unknown time zone"),
            },
            VenueZone::Offset(minutes) => {
                match minutes.checked_mul(60).and_then(FixedOffset::east_opt) {
                    Some(offset) => return now.with_timezone(&offset).naive_local(),
                    None => tracing::debug!(minutes, "UTC offset out of range"),
                }
            }
        }
    }
    now.with_timezone(&default_tz).naive_local()
}
