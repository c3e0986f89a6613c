use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::timing::{
    evaluator::HoursEvaluator,
    schedule::WeeklySchedule,
    status::RealTimeStatus,
    venue_time::{venue_local_time, VenueZone},
};

/// What the hours engine needs from a place record, whichever upstream API it came from.
pub trait OpeningHoursSource {
    fn display_name(&self) -> String;
    fn weekday_descriptions(&self) -> WeeklySchedule;
    /// The provider's own "open now" flag.
    fn open_now_hint(&self) -> Option<bool>;
    fn utc_offset_minutes(&self) -> Option<i32>;
    fn time_zone(&self) -> Option<&str> {
        None
    }
}

/// A place as returned by the legacy Places API.
///
/// `opening_hours` is required so that the untagged `Place` can tell the two shapes apart.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LegacyPlace {
    #[serde(default)]
    pub name: String,
    pub opening_hours: LegacyOpeningHours,
    #[serde(default)]
    pub utc_offset: Option<i32>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LegacyOpeningHours {
    #[serde(default)]
    pub open_now: Option<bool>,
    #[serde(default)]
    pub weekday_text: Vec<String>,
}

/// A place as returned by the new Places API.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceV1 {
    pub display_name: Option<LocalizedText>,
    #[serde(default)]
    pub regular_opening_hours: Option<OpeningHoursV1>,
    #[serde(default)]
    pub current_opening_hours: Option<OpeningHoursV1>,
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
    #[serde(default)]
    pub time_zone: Option<TimeZoneId>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningHoursV1 {
    #[serde(default)]
    pub open_now: Option<bool>,
    #[serde(default)]
    pub weekday_descriptions: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LocalizedText {
    #[serde(default)]
    pub text: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TimeZoneId {
    pub id: String,
}

/// Either payload shape. Anything without a legacy `opening_hours` object is read as
/// the new API, whose fields are all optional.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Place {
    Legacy(LegacyPlace),
    V1(PlaceV1),
}

impl OpeningHoursSource for LegacyPlace {
    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn weekday_descriptions(&self) -> WeeklySchedule {
        WeeklySchedule::new(self.opening_hours.weekday_text.clone())
    }

    fn open_now_hint(&self) -> Option<bool> {
        self.opening_hours.open_now
    }

    fn utc_offset_minutes(&self) -> Option<i32> {
        self.utc_offset
    }
}

impl OpeningHoursSource for PlaceV1 {
    fn display_name(&self) -> String {
        self.display_name
            .as_ref()
            .map(|name| name.text.clone())
            .unwrap_or_default()
    }

    /// Regular hours describe the usual week; current hours are only used when
    /// the regular ones are missing.
    fn weekday_descriptions(&self) -> WeeklySchedule {
        [&self.regular_opening_hours, &self.current_opening_hours]
            .into_iter()
            .flatten()
            .find(|hours| !hours.weekday_descriptions.is_empty())
            .map(|hours| WeeklySchedule::new(hours.weekday_descriptions.clone()))
            .unwrap_or_default()
    }

    fn open_now_hint(&self) -> Option<bool> {
        self.current_opening_hours
            .as_ref()
            .and_then(|hours| hours.open_now)
            .or_else(|| {
                self.regular_opening_hours
                    .as_ref()
                    .and_then(|hours| hours.open_now)
            })
    }

    fn utc_offset_minutes(&self) -> Option<i32> {
        self.utc_offset_minutes
    }

    fn time_zone(&self) -> Option<&str> {
        self.time_zone.as_ref().map(|zone| zone.id.as_str())
    }
}

impl OpeningHoursSource for Place {
    fn display_name(&self) -> String {
        match self {
            Place::Legacy(place) => place.display_name(),
            Place::V1(place) => place.display_name(),
        }
    }

    fn weekday_descriptions(&self) -> WeeklySchedule {
        match self {
            Place::V1(place) => place.weekday_descriptions(),
            Place::Legacy(place) => place.weekday_descriptions(),
        }
    }

    fn open_now_hint(&self) -> Option<bool> {
        match self {
            Place::V1(place) => place.open_now_hint(),
            Place::Legacy(place) => place.open_now_hint(),
        }
    }

    fn utc_offset_minutes(&self) -> Option<i32> {
        match self {
            Place::V1(place) => place.utc_offset_minutes(),
            Place::Legacy(place) => place.utc_offset_minutes(),
        }
    }

    fn time_zone(&self) -> Option<&str> {
        match self {
            Place::V1(place) => place.time_zone(),
            Place::Legacy(place) => place.time_zone(),
        }
    }
}

/// Resolves the venue's wall clock at `now` and evaluates its hours.
pub fn status_for<P: OpeningHoursSource + ?Sized>(
    place: &P,
    evaluator: &HoursEvaluator,
    now: DateTime<Utc>,
    default_tz: Tz,
) -> RealTimeStatus {
    let mut zones = Vec::with_capacity(2);
    if let Some(name) = place.time_zone() {
        zones.push(VenueZone::Named(name));
    }
    if let Some(minutes) = place.utc_offset_minutes() {
        zones.push(VenueZone::Offset(minutes));
    }
    let local = venue_local_time(now, &zones, default_tz);
    evaluator.evaluate(&place.weekday_descriptions(), &local, place.open_now_hint())
}
