//! Core abstractions shared by the pipeline and its backends

pub mod config;
pub mod log;
pub mod rates;
pub mod storage;
pub mod timestamp;

// Re-export main types for cleaner imports
pub use config::AppConfig;
pub use rates::{ExchangeRateDocument, RateProvider};
pub use storage::ObjectStore;
pub use timestamp::InvocationTimestamp;
