pub mod config;
pub mod tracing;

pub use self::config::*;
pub use self::tracing::*;
