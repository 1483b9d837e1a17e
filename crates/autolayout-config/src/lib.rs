//! Configuration parsing for autolayout
//!
//! This crate handles parsing the optional KDL configuration file that
//! tunes logging and how the i3 IPC socket is located.

mod error;
mod model;
mod parser;

pub use error::ConfigError;
pub use model::*;
pub use parser::{parse_config, parse_config_str};
