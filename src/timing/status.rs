use serde::{Deserialize, Serialize};

/// The verdict for a venue at one instant, ready to be rendered as-is.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealTimeStatus {
    pub is_open: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_period: Option<CurrentPeriod>,
    pub message: String,
}

/// The weekday entry the verdict was derived from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentPeriod {
    pub day: String,
    pub hours: String,
    pub is_overnight_period: bool,
    /// Only set while open.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closes_at: Option<String>,
}

impl RealTimeStatus {
    pub fn unavailable() -> Self {
        Self {
            is_open: false,
            current_period: None,
            message: "Hours not available".to_string(),
        }
    }

    pub fn fallback(open_now: Option<bool>) -> Self {
        let is_open = open_now.unwrap_or(false);
        Self {
            is_open,
            current_period: None,
            message: if is_open {
                "Currently open".to_string()
            } else {
                "Currently closed".to_string()
            },
        }
    }
}
