pub mod config;
pub mod error;
pub mod types;

pub use config::TalkqlConfig;
pub use error::{Result, TalkqlError};
pub use types::*;
