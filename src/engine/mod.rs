pub mod progression;
pub mod review;
pub mod rolling;
pub mod selector;
pub mod thresholds;
