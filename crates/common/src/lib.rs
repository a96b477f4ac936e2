pub mod audit;
pub mod config;
pub mod error;
pub mod marketdata;
pub mod notify;
pub mod types;

pub use audit::{AuditEvent, AuditSink};
pub use config::Config;
pub use error::{Error, Result};
pub use marketdata::MarketData;
pub use notify::Notifier;
pub use types::*;
