//! Formatting and parsing of 18-decimal fixed-point values.

use lsd_types::WAD;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("not a decimal number: {0:?}")]
    InvalidDecimal(String),

    #[error("more than 18 fractional digits: {0:?}")]
    TooPrecise(String),

    #[error("value does not fit in 128 bits: {0:?}")]
    Overflow(String),

    #[error("unknown log format {0:?}, expected \"human\" or \"json\"")]
    UnknownLogFormat(String),
}

/// Render a WAD value as a decimal with trailing zeros trimmed.
///
/// `format_wad(1_090_000_000_000_000_000) == "1.09"`.
pub fn format_wad(value: u128) -> String {
    let whole = value / WAD;
    let frac = value % WAD;
    if frac == 0 {
        return whole.to_string();
    }
    let digits = format!("{frac:018}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

/// Render a WAD fraction as a percentage, e.g. `"2%"` for `2e16`.
pub fn format_pct(value: u128) -> String {
    format!("{}%", format_wad(value.saturating_mul(100)))
}

/// Parse a decimal string such as `"32"` or `"1.5"` into WAD units.
pub fn parse_wad(s: &str) -> Result<u128, FormatError> {
    let s = s.trim();
    let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
    if whole.is_empty() && frac.is_empty() {
        return Err(FormatError::InvalidDecimal(s.to_string()));
    }
    if !whole.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
        return Err(FormatError::InvalidDecimal(s.to_string()));
    }
    if frac.len() > 18 {
        return Err(FormatError::TooPrecise(s.to_string()));
    }
    let overflow = || FormatError::Overflow(s.to_string());
    let whole: u128 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| overflow())?
    };
    let frac: u128 = if frac.is_empty() {
        0
    } else {
        format!("{frac:0<18}").parse().map_err(|_| overflow())?
    };
    whole
        .checked_mul(WAD)
        .and_then(|w| w.checked_add(frac))
        .ok_or_else(overflow)
}
