pub mod analysis;
pub mod cache;
pub mod compare;
pub mod gaps;
pub mod log;
pub mod qualifying;
pub mod ranking;
pub mod report;
