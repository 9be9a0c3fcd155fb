//! # table-processor
//!
//! A row-oriented CSV filter tool built around a tiny human-typed condition
//! language, bundled with a handful of small console exercises.
//!
//! The main pipeline parses a condition such as `price > 100` or
//! `name startswith a` against the input table's header row, applies it to
//! every data row, and writes the matching rows to a new document followed by
//! a trailing row holding the average of one numeric column:
//!
//! ```rust
//! use table_processor::processor::CellValue;
//! use table_processor::processor::filter::{Condition, FallbackPolicy, HeaderIndex};
//! use table_processor::processor::pipeline::filter_table;
//! use table_processor::processor::table::Table;
//!
//! let mut input = Table::new();
//! {
//!     let header = input.create_row(0);
//!     header.set_cell(0, CellValue::Text("name".into()));
//!     header.set_cell(1, CellValue::Text("price".into()));
//! }
//! {
//!     let row = input.create_row(1);
//!     row.set_cell(0, CellValue::Text("apple".into()));
//!     row.set_cell(1, CellValue::Number(150.0));
//! }
//!
//! let headers = HeaderIndex::from_table(&input);
//! let condition = Condition::parse("price > 100", &headers, FallbackPolicy::default());
//! let (output, report) = filter_table(&input, &condition, 1);
//!
//! assert_eq!(report.matched_rows, 1);
//! assert_eq!(output.row_count(), 3); // header + match + trailing average
//! ```
//!
//! A malformed condition never aborts a run: unknown columns and unparseable
//! thresholds degrade to a match-nothing predicate, and wholly unrecognized
//! syntax falls back according to [`processor::filter::FallbackPolicy`]. Only
//! I/O failures are reported as errors.
//!
//! The [`tasks`] module carries the unrelated console exercises (string
//! reversal, word-frequency counting, traversal timing, duplicate-character
//! detection); they share nothing with the processor beyond the CLI.

pub mod processor;
pub mod tasks;
