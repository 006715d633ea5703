//! Natural-value arguments for `Variant::compose`.
//!
//! A single value becomes one positional argument; a list value is spread
//! into positional arguments. Accessors are positional and typed.

use crate::model::record::RecordError;
use derive_more::{Deref, IntoIterator};
use serde_json::Value as JsonValue;

///
/// ComposeArg
///

#[derive(Clone, Debug, PartialEq)]
pub enum ComposeArg {
    Text(String),
    Number(f64),
    Bool(bool),
    Json(JsonValue),
    List(Vec<Self>),
}

impl ComposeArg {
    const fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Number(_) => "number",
            Self::Bool(_) => "bool",
            Self::Json(_) => "json",
            Self::List(_) => "list",
        }
    }
}

impl From<&str> for ComposeArg {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ComposeArg {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for ComposeArg {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for ComposeArg {
    #[expect(clippy::cast_precision_loss)]
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for ComposeArg {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<JsonValue> for ComposeArg {
    fn from(value: JsonValue) -> Self {
        Self::Json(value)
    }
}

impl<T: Into<Self>> From<Vec<T>> for ComposeArg {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

///
/// ComposeArgs
/// Positional arguments handed to a composer.
///

#[derive(Clone, Debug, Default, Deref, IntoIterator, PartialEq)]
pub struct ComposeArgs(#[into_iterator(owned, ref)] Vec<ComposeArg>);

impl ComposeArgs {
    /// Build arguments from one value, spreading it when it is a list.
    #[must_use]
    pub fn from_value(value: impl Into<ComposeArg>) -> Self {
        match value.into() {
            ComposeArg::List(items) => Self(items),
            single => Self(vec![single]),
        }
    }

    #[must_use]
    pub const fn new(args: Vec<ComposeArg>) -> Self {
        Self(args)
    }

    // ------------------------------------------------------------------
    // Positional accessors
    // ------------------------------------------------------------------

    pub fn arg(&self, index: usize) -> Result<&ComposeArg, RecordError> {
        self.0.get(index).ok_or_else(|| RecordError::InvalidComposeArgs {
            message: format!("missing argument {index} (got {})", self.0.len()),
        })
    }

    pub fn text(&self, index: usize) -> Result<&str, RecordError> {
        match self.arg(index)? {
            ComposeArg::Text(text) => Ok(text),
            other => Err(mismatch(index, "text", other)),
        }
    }

    /// Text at `index`, or `None` when fewer arguments were given.
    pub fn optional_text(&self, index: usize) -> Result<Option<&str>, RecordError> {
        if index >= self.0.len() {
            return Ok(None);
        }

        self.text(index).map(Some)
    }

    pub fn number(&self, index: usize) -> Result<f64, RecordError> {
        match self.arg(index)? {
            ComposeArg::Number(number) => Ok(*number),
            other => Err(mismatch(index, "number", other)),
        }
    }

    /// Whole number at `index`; fractional or out-of-range values are rejected.
    pub fn integer(&self, index: usize) -> Result<i64, RecordError> {
        const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

        let number = self.number(index)?;
        if number.fract() != 0.0 || !(-MAX_EXACT..=MAX_EXACT).contains(&number) {
            return Err(RecordError::InvalidComposeArgs {
                message: format!("argument {index}: expected a whole number, found {number}"),
            });
        }

        #[expect(clippy::cast_possible_truncation)]
        let whole = number as i64;

        Ok(whole)
    }

    pub fn bool(&self, index: usize) -> Result<bool, RecordError> {
        match self.arg(index)? {
            ComposeArg::Bool(flag) => Ok(*flag),
            other => Err(mismatch(index, "bool", other)),
        }
    }

    /// Bool at `index`, or `None` when fewer arguments were given.
    pub fn optional_bool(&self, index: usize) -> Result<Option<bool>, RecordError> {
        if index >= self.0.len() {
            return Ok(None);
        }

        self.bool(index).map(Some)
    }

    pub fn json(&self, index: usize) -> Result<&JsonValue, RecordError> {
        match self.arg(index)? {
            ComposeArg::Json(value) => Ok(value),
            other => Err(mismatch(index, "json", other)),
        }
    }

    /// Reject argument lists longer than `max`.
    pub fn expect_at_most(&self, max: usize) -> Result<(), RecordError> {
        if self.0.len() > max {
            return Err(RecordError::InvalidComposeArgs {
                message: format!("expected at most {max} arguments, got {}", self.0.len()),
            });
        }

        Ok(())
    }
}

fn mismatch(index: usize, expected: &str, found: &ComposeArg) -> RecordError {
    RecordError::InvalidComposeArgs {
        message: format!(
            "argument {index}: expected {expected}, found {}",
            found.kind()
        ),
    }
}
