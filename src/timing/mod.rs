pub mod clock;
pub mod daily;
pub mod evaluator;
pub mod schedule;
pub mod status;
pub mod venue_time;
