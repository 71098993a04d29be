pub mod calendar;
pub mod core;
pub mod week;
