pub mod config;
pub mod error;
pub mod types;

pub use config::InterlinkConfig;
pub use error::{InterlinkError, Result};
pub use types::*;
