pub mod config;
pub mod dispatch;
pub mod monitor;
pub mod runner;
pub mod streak;
pub mod window;

pub use config::{InstrumentConfig, WatchlistConfig};
pub use dispatch::AlertDispatcher;
pub use monitor::{InstrumentMonitor, MonitorParams};
pub use runner::WatchlistRunner;
pub use streak::{evaluate, Evaluation};
pub use window::compute;
