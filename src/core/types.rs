//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`NumberFormat`] - printf-style rendering of namespace iteration numbers
//!
//! # Validation
//!
//! Formats are parsed once at construction. An invalid format cannot be
//! represented, so rendering never fails.
//!
//! # Examples
//!
//! ```
//! use containerkit::core::types::NumberFormat;
//!
//! let format = NumberFormat::new("%02d").unwrap();
//! assert_eq!(format.render(1), "01");
//! assert_eq!(format.render(123), "123");
//!
//! assert!(NumberFormat::new("no directive").is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from format validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("number format '{0}' has no %d directive")]
    MissingDirective(String),

    #[error("number format '{0}' has more than one directive")]
    MultipleDirectives(String),

    #[error("number format '{format}' uses unsupported conversion '%{conversion}'")]
    UnsupportedConversion { format: String, conversion: char },

    #[error("number format '{0}' ends inside a directive")]
    Truncated(String),

    #[error("number format '{format}' has a width above {max}")]
    WidthTooLarge { format: String, max: usize },
}

/// Widest field a format may ask for.
pub const MAX_FORMAT_WIDTH: usize = 64;

/// The default iteration format: two digits, zero padded.
pub const DEFAULT_NUMBER_FORMAT: &str = "%02d";

/// A validated printf-style integer format.
///
/// Supports literal text around exactly one `%d` directive. The directive
/// may carry a `0` flag and a width (`%d`, `%3d`, `%02d`). `%%` is a
/// literal percent sign.
///
/// # Example
///
/// ```
/// use containerkit::core::types::NumberFormat;
///
/// let format = NumberFormat::new("_v%03d").unwrap();
/// assert_eq!(format.render(7), "_v007");
///
/// let plain = NumberFormat::new("%d").unwrap();
/// assert_eq!(plain.render(7), "7");
///
/// let spaced = NumberFormat::new("%3d").unwrap();
/// assert_eq!(spaced.render(7), "  7");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NumberFormat {
    source: String,
    before: String,
    after: String,
    zero_pad: bool,
    width: usize,
}

impl NumberFormat {
    /// Parse and validate a format.
    ///
    /// # Errors
    ///
    /// Returns a [`FormatError`] unless the format holds exactly one
    /// supported directive.
    pub fn new(format: impl Into<String>) -> Result<Self, FormatError> {
        let source = format.into();

        let mut before = String::new();
        let mut after = String::new();
        let mut directive: Option<(bool, usize)> = None;

        let mut chars = source.chars().peekable();
        while let Some(c) = chars.next() {
            let literal = if directive.is_some() {
                &mut after
            } else {
                &mut before
            };

            if c != '%' {
                literal.push(c);
                continue;
            }

            if chars.peek() == Some(&'%') {
                chars.next();
                literal.push('%');
                continue;
            }

            if directive.is_some() {
                return Err(FormatError::MultipleDirectives(source.clone()));
            }

            let zero_pad = chars.peek() == Some(&'0');
            if zero_pad {
                chars.next();
            }

            let mut width = 0usize;
            while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
                width = width
                    .checked_mul(10)
                    .and_then(|w| w.checked_add(d as usize))
                    .filter(|&w| w <= MAX_FORMAT_WIDTH)
                    .ok_or_else(|| FormatError::WidthTooLarge {
                        format: source.clone(),
                        max: MAX_FORMAT_WIDTH,
                    })?;
                chars.next();
            }

            match chars.next() {
                Some('d') | Some('i') => directive = Some((zero_pad, width)),
                Some(other) => {
                    return Err(FormatError::UnsupportedConversion {
                        format: source.clone(),
                        conversion: other,
                    })
                }
                None => return Err(FormatError::Truncated(source.clone())),
            }
        }

        let Some((zero_pad, width)) = directive else {
            return Err(FormatError::MissingDirective(source));
        };

        Ok(Self {
            source,
            before,
            after,
            zero_pad,
            width,
        })
    }

    /// Render `number` through the format.
    pub fn render(&self, number: u32) -> String {
        let digits = if self.zero_pad {
            format!("{:0width$}", number, width = self.width)
        } else {
            format!("{:>width$}", number, width = self.width)
        };
        format!("{}{}{}", self.before, digits, self.after)
    }

    /// The format as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            source: DEFAULT_NUMBER_FORMAT.to_string(),
            before: String::new(),
            after: String::new(),
            zero_pad: true,
            width: 2,
        }
    }
}

impl fmt::Display for NumberFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for NumberFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for NumberFormat {
    type Error = FormatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NumberFormat> for String {
    fn from(value: NumberFormat) -> Self {
        value.source
    }
}
