//! Shared utilities for the LSD core.

pub mod format;
pub mod logging;

pub use format::{format_pct, format_wad, parse_wad, FormatError};
pub use logging::{init_logging, LogFormat};
