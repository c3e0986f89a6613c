use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{places::Place, timing::status::RealTimeStatus};

/// Body of `POST /api/status`.
#[derive(Deserialize)]
pub struct StatusRequest {
    pub place: Place,
    /// Defaults to the time the request is handled.
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

/// Body of `POST /api/open-now`.
///
/// Places are kept as raw JSON so that one bad record can be skipped on its own.
#[derive(Deserialize)]
pub struct OpenNowRequest {
    pub places: Vec<Value>,
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

/// The places that are open right now, out of everything that was sent.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct OpenNowResponse {
    pub evaluated: usize,
    pub skipped: usize,
    pub open: Vec<OpenPlace>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct OpenPlace {
    pub index: usize,
    pub name: String,
    pub status: RealTimeStatus,
}
