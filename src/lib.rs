pub mod config;
pub mod error;
pub mod logger;
pub mod places;
pub mod server;
pub mod timing;

pub use error::{AppError, Result};
pub use places::{status_for, OpeningHoursSource, Place};
pub use timing::{
    evaluator::HoursEvaluator,
    schedule::WeeklySchedule,
    status::{CurrentPeriod, RealTimeStatus},
};
