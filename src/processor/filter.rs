use std::collections::HashMap;

use tracing::warn;

use crate::processor::table::{Row, Table};
use crate::processor::{CellValue, CompareOp};

/// Mapping from column name to 0-based position, built from a table's
/// header row.
///
/// Names are matched ignoring case and surrounding whitespace. When two
/// header cells normalize to the same name, the later position wins.
#[derive(Debug, Clone, Default)]
pub struct HeaderIndex {
    positions: HashMap<String, usize>,
}

impl HeaderIndex {
    /// Builds the index from row 0 of `table`. Blank and absent header
    /// cells are skipped; a missing header row yields an empty index.
    pub fn from_table(table: &Table) -> Self {
        let mut positions = HashMap::new();
        if let Some(header) = table.row(0) {
            for i in 0..header.width() {
                match header.cell(i) {
                    None | Some(CellValue::Blank) => {}
                    Some(cell) => {
                        positions.insert(cell.to_string().trim().to_lowercase(), i);
                    }
                }
            }
        }
        HeaderIndex { positions }
    }

    /// Position of `name`, matched case- and whitespace-insensitively.
    pub fn get(&self, name: &str) -> Option<usize> {
        self.positions.get(&name.trim().to_lowercase()).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// What a wholly unrecognized filter expression degrades to.
///
/// The original tool passed every row through on input it could not parse,
/// so a typo still produced a full copy of the table. `Strict` drops every
/// row instead. Expressions that are recognized but unresolvable (unknown
/// column, bad number) match nothing under either policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    #[default]
    Permissive,
    Strict,
}

/// Executable row predicate parsed from a user-typed filter expression
///
/// Built via [`Condition::parse`]; parsing never fails, it degrades. The
/// two fallback variants exist so a bad expression still yields a usable
/// predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Fallback for unrecognized syntax under [`FallbackPolicy::Permissive`]
    AlwaysTrue,
    /// Degraded result of a malformed or unresolvable expression
    AlwaysFalse,
    /// Text cell at `column` starts with `prefix` (lower-cased match)
    StartsWith { column: usize, prefix: String },
    /// Numeric cell at `column` compared against `threshold`
    Compare {
        column: usize,
        op: CompareOp,
        threshold: f64,
    },
}

impl Condition {
    /// Parses a filter expression such as `"price > 100"` or
    /// `"name startswith a"` against `headers`.
    ///
    /// The input is trimmed and lower-cased first. A `startswith` expression
    /// splits on the first occurrence of the keyword; a comparison scans the
    /// operator tokens in [`CompareOp::SCAN_ORDER`]. Problems are reported
    /// as warnings and degrade to [`Condition::AlwaysFalse`], except wholly
    /// unrecognized syntax, which follows `policy`.
    pub fn parse(input: &str, headers: &HeaderIndex, policy: FallbackPolicy) -> Condition {
        let input = input.trim().to_lowercase();

        if let Some((column, prefix)) = input.split_once("startswith") {
            return Self::parse_starts_with(column, prefix, headers);
        }
        Self::parse_comparison(&input, headers, policy)
    }

    fn parse_starts_with(column: &str, prefix: &str, headers: &HeaderIndex) -> Condition {
        let column = column.trim();
        let prefix = prefix.trim();
        if column.is_empty() || prefix.is_empty() {
            warn!("malformed startswith filter; matching nothing");
            return Condition::AlwaysFalse;
        }

        match headers.get(column) {
            Some(position) => Condition::StartsWith {
                column: position,
                prefix: prefix.to_string(),
            },
            None => {
                warn!("column not found: {column}");
                Condition::AlwaysFalse
            }
        }
    }

    fn parse_comparison(input: &str, headers: &HeaderIndex, policy: FallbackPolicy) -> Condition {
        for (op, token) in CompareOp::SCAN_ORDER {
            if !input.contains(token) {
                continue;
            }

            let parts: Vec<&str> = input.split(token).collect();
            if parts.len() != 2 {
                // more than one occurrence: give up on operator syntax
                break;
            }

            let column = parts[0].trim();
            let Some(position) = headers.get(column) else {
                warn!("column not found: {column}");
                return Condition::AlwaysFalse;
            };

            let value_text = parts[1].trim();
            let Ok(threshold) = fast_float2::parse::<f64, _>(value_text) else {
                warn!("invalid number format: {value_text}");
                return Condition::AlwaysFalse;
            };

            return Condition::Compare {
                column: position,
                op,
                threshold,
            };
        }

        match policy {
            FallbackPolicy::Permissive => {
                warn!("unsupported or invalid filter; passing every row through");
                Condition::AlwaysTrue
            }
            FallbackPolicy::Strict => {
                warn!("unsupported or invalid filter; matching nothing");
                Condition::AlwaysFalse
            }
        }
    }

    /// Tests the condition against one row.
    ///
    /// Never faults: an absent cell, or a cell of the wrong type, simply
    /// fails the match.
    pub fn matches(&self, row: &Row) -> bool {
        match self {
            Condition::AlwaysTrue => true,
            Condition::AlwaysFalse => false,
            Condition::StartsWith { column, prefix } => row
                .cell(*column)
                .and_then(CellValue::as_text)
                .is_some_and(|text| text.to_lowercase().starts_with(prefix)),
            Condition::Compare {
                column,
                op,
                threshold,
            } => row
                .cell(*column)
                .and_then(CellValue::as_number)
                .is_some_and(|value| op.apply(value, *threshold)),
        }
    }
}
