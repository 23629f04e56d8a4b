//! Parameter extraction
//!
//! Pulls values out of flat, JSON-looking parameter text such as
//! `{"path":"/data/log.txt","off":4096}`. This is deliberately not a JSON
//! parser: the first literal occurrence of `"<key>":` wins, string values
//! end at the next `"` with no escape handling, and nothing is nested.
//! Counterpart implementations depend on exactly this behavior.

use thiserror::Error;

/// Why a parameter could not be extracted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("parameter \"{0}\" not present")]
    Missing(String),

    #[error("parameter \"{0}\" is not a quoted string")]
    Malformed(String),

    #[error("parameter \"{key}\" longer than {max} bytes")]
    TooLong { key: String, max: usize },

    #[error("parameter \"{0}\" out of range")]
    OutOfRange(String),
}

/// Borrowed view over request parameter text
#[derive(Debug, Clone, Copy)]
pub struct Params<'a> {
    text: &'a str,
}

impl<'a> Params<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    pub fn as_str(&self) -> &'a str {
        self.text
    }

    /// Text following `"<key>":` and any spaces or tabs
    fn value_start(&self, key: &str) -> Option<&'a str> {
        let marker = format!("\"{}\":", key);
        let pos = self.text.find(&marker)?;
        Some(self.text[pos + marker.len()..].trim_start_matches([' ', '\t']))
    }

    /// Extract a string value
    ///
    /// `capacity` counts the terminator slot of the device's buffer, so at
    /// most `capacity - 1` bytes are accepted. A value with no closing quote
    /// runs to the end of the text.
    pub fn string(&self, key: &str, capacity: usize) -> Result<&'a str, ParamError> {
        let rest = self
            .value_start(key)
            .ok_or_else(|| ParamError::Missing(key.to_string()))?;

        let rest = rest
            .strip_prefix('"')
            .ok_or_else(|| ParamError::Malformed(key.to_string()))?;

        let value = match rest.find('"') {
            Some(end) => &rest[..end],
            None => rest,
        };

        let max = capacity.saturating_sub(1);
        if value.len() > max {
            return Err(ParamError::TooLong {
                key: key.to_string(),
                max,
            });
        }

        Ok(value)
    }

    /// Extract a decimal integer value
    ///
    /// Parses like C `atoi`: optional sign, then digits up to the first
    /// non-digit. No digits at all yields 0. Values outside `i32` are
    /// `OutOfRange`.
    pub fn int(&self, key: &str) -> Result<i32, ParamError> {
        let rest = self
            .value_start(key)
            .ok_or_else(|| ParamError::Missing(key.to_string()))?;

        let rest = rest.trim_start_matches(|c: char| c.is_ascii_whitespace());
        let (negative, digits) = match rest.as_bytes().first() {
            Some(b'-') => (true, &rest[1..]),
            Some(b'+') => (false, &rest[1..]),
            _ => (false, rest),
        };

        let mut value: i64 = 0;
        for b in digits.bytes().take_while(u8::is_ascii_digit) {
            value = value * 10 + i64::from(b - b'0');
            if value > i64::from(i32::MAX) + 1 {
                return Err(ParamError::OutOfRange(key.to_string()));
            }
        }
        if negative {
            value = -value;
        }

        i32::try_from(value).map_err(|_| ParamError::OutOfRange(key.to_string()))
    }

    /// Extract an integer, using `default` when the key is absent
    pub fn int_or(&self, key: &str, default: i32) -> Result<i32, ParamError> {
        match self.int(key) {
            Err(ParamError::Missing(_)) => Ok(default),
            other => other,
        }
    }
}
