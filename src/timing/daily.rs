use super::clock::{format_minutes, NOON};

/// A single opening period of one day, in minutes since midnight.
///
/// `closing < opening` marks an overnight period that ends on the next calendar day.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Daily {
    opening: u16,
    closing: u16,
    closes_am: bool,
}

impl Daily {
    pub fn new(opening: u16, closing: u16, closes_am: bool) -> Self {
        Self {
            opening,
            closing,
            closes_am,
        }
    }

    pub fn opening(&self) -> u16 {
        self.opening
    }

    pub fn closing(&self) -> u16 {
        self.closing
    }

    pub fn is_overnight(&self) -> bool {
        self.closing < self.opening
    }

    /// Whether this period is still running at `minute` of the following day.
    ///
    /// Any AM closing time up to noon is read as spilling past midnight, even when the
    /// period itself never crossed it.
    pub fn carries_over_to(&self, minute: u16) -> bool {
        self.closes_am && self.closing <= NOON && minute <= self.closing
    }

    /// Inclusive on both ends.
    pub fn contains(&self, minute: u16) -> bool {
        if self.is_overnight() {
            minute >= self.opening || minute <= self.closing
        } else {
            self.opening <= minute && minute <= self.closing
        }
    }

    pub fn opens_at(&self) -> String {
        format_minutes(self.opening)
    }

    pub fn closes_at(&self) -> String {
        format_minutes(self.closing)
    }
}
