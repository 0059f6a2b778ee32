pub mod alert;
pub mod config;
pub mod duration;
pub mod error;
pub mod format;
pub mod keys;

pub use alert::{Alert, AlertType, FlightDescriptor};
pub use config::Config;
pub use duration::parse_duration;
pub use error::*;
