use std::fmt;

use thiserror::Error;

pub mod filter;
pub mod pipeline;
pub mod table;

/// Error type used across the crate
#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("UTF8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("Missing column: {0}")]
    MissingColumn(String),
}

/// A single table cell as produced by the reader.
///
/// The reader types each CSV field: empty fields become [`CellValue::Blank`],
/// fields that parse in full as a double become [`CellValue::Number`], and
/// everything else stays [`CellValue::Text`].
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Blank,
}

impl CellValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, CellValue::Blank)
    }
}

/// Text form of a cell, used for header copies and CSV serialization.
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(text) => f.write_str(text),
            CellValue::Number(value) => write!(f, "{value}"),
            CellValue::Blank => Ok(()),
        }
    }
}

/// Comparison operator of a numeric filter expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Greater,
    Less,
    Equal,
    GreaterEqual,
    LessEqual,
    NotEqual,
}

impl CompareOp {
    /// Operator tokens in the order the parser scans them. Compound tokens
    /// come before the single-character tokens they start with, so `>=` is
    /// never split as `>` with a leftover `=`.
    pub const SCAN_ORDER: [(CompareOp, &'static str); 6] = [
        (CompareOp::GreaterEqual, ">="),
        (CompareOp::LessEqual, "<="),
        (CompareOp::NotEqual, "!="),
        (CompareOp::Greater, ">"),
        (CompareOp::Less, "<"),
        (CompareOp::Equal, "="),
    ];

    /// Applies the operator with plain IEEE comparison. `=` and `!=` are
    /// exact, with the usual float-precision caveats.
    pub fn apply(self, value: f64, threshold: f64) -> bool {
        match self {
            CompareOp::Greater => value > threshold,
            CompareOp::Less => value < threshold,
            CompareOp::Equal => value == threshold,
            CompareOp::GreaterEqual => value >= threshold,
            CompareOp::LessEqual => value <= threshold,
            CompareOp::NotEqual => value != threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_renders_cell_text_form() {
        assert_eq!(CellValue::Text("apple".into()).to_string(), "apple");
        assert_eq!(CellValue::Number(150.0).to_string(), "150");
        assert_eq!(CellValue::Number(0.5).to_string(), "0.5");
        assert_eq!(CellValue::Blank.to_string(), "");
    }

    #[test]
    fn compare_op_boundaries_are_inclusive_where_expected() {
        assert!(CompareOp::GreaterEqual.apply(50.0, 50.0));
        assert!(CompareOp::LessEqual.apply(50.0, 50.0));
        assert!(!CompareOp::Greater.apply(50.0, 50.0));
        assert!(!CompareOp::Less.apply(50.0, 50.0));
        assert!(CompareOp::Equal.apply(50.0, 50.0));
        assert!(!CompareOp::NotEqual.apply(50.0, 50.0));
    }

    #[test]
    fn scan_order_tries_compound_tokens_first() {
        let tokens: Vec<&str> = CompareOp::SCAN_ORDER.iter().map(|(_, t)| *t).collect();
        for (i, earlier) in tokens.iter().enumerate() {
            for later in &tokens[i + 1..] {
                assert!(!later.starts_with(earlier), "{earlier} would shadow {later}");
            }
        }
    }
}
