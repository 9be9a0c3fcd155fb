use std::path::Path;

use tracing::{debug, info};

use crate::processor::filter::{Condition, FallbackPolicy, HeaderIndex};
use crate::processor::table::{Row, Table};
use crate::processor::{CellValue, ProcessorError};

/// Label written next to the mean in the trailing summary row.
const AVERAGE_LABEL: &str = "Average:";

/// Running sum and count for the averaged column, plus the next free output
/// row position, for one filtering pass.
///
/// Created by the filter pass and returned to the summary writer by value;
/// nothing mutable is shared between the two steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AverageTracker {
    sum: f64,
    count: usize,
    next_row: usize,
}

impl AverageTracker {
    /// Starts a pass whose first output row is `next_row` (the number of
    /// header rows already written).
    pub fn new(next_row: usize) -> Self {
        AverageTracker {
            sum: 0.0,
            count: 0,
            next_row,
        }
    }

    /// Feeds one numeric value from a matched row.
    pub fn record(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    /// Claims the next output row position.
    pub fn advance_row(&mut self) -> usize {
        let row = self.next_row;
        self.next_row += 1;
        row
    }

    /// Number of values recorded so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Position the summary row will land on.
    pub fn next_row(&self) -> usize {
        self.next_row
    }

    /// Mean of the recorded values, 0 when nothing was recorded.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

/// Outcome of one filtering pass, reported to the caller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterReport {
    /// Rows that matched the condition and were copied to the output
    pub matched_rows: usize,
    /// Mean of the target column over the matched rows, 0 when none of them
    /// held a number there
    pub average: f64,
}

/// Filters `input` into a new table.
///
/// The output holds a text copy of the header row, every data row matching
/// `condition` in original order, and a trailing row labeling the mean of
/// `avg_column` over the matches. Row 0 is always treated as the header and
/// never tested against the condition.
pub fn filter_table(input: &Table, condition: &Condition, avg_column: usize) -> (Table, FilterReport) {
    let mut output = Table::new();

    let header_rows = copy_header_row(input, &mut output);
    let mut tracker = AverageTracker::new(header_rows);
    let mut matched_rows = 0;

    for (index, row) in input.rows().iter().enumerate() {
        if index == 0 || !condition.matches(row) {
            continue;
        }

        let position = tracker.advance_row();
        copy_row(row, output.create_row(position));
        matched_rows += 1;

        if let Some(value) = row.cell(avg_column).and_then(CellValue::as_number) {
            tracker.record(value);
        }
    }

    write_average_row(&mut output, &tracker, avg_column);

    let report = FilterReport {
        matched_rows,
        average: tracker.mean(),
    };
    (output, report)
}

/// Copies row 0 to the output in text form. Returns the number of header
/// rows written (0 when the input table is empty).
fn copy_header_row(input: &Table, output: &mut Table) -> usize {
    let Some(header) = input.row(0) else {
        return 0;
    };

    let out = output.create_row(0);
    for i in 0..header.width() {
        if let Some(cell) = header.cell(i) {
            out.set_cell(i, CellValue::Text(cell.to_string()));
        }
    }
    1
}

/// Copies cells preserving text and number typing; anything else goes over
/// in its text form. Absent cells stay absent.
fn copy_row(from: &Row, to: &mut Row) {
    for i in 0..from.width() {
        match from.cell(i) {
            Some(CellValue::Text(text)) => to.set_cell(i, CellValue::Text(text.clone())),
            Some(CellValue::Number(value)) => to.set_cell(i, CellValue::Number(*value)),
            Some(other) => to.set_cell(i, CellValue::Text(other.to_string())),
            None => {}
        }
    }
}

/// Writes the trailing summary row at the tracker's final position: the
/// label one cell before the averaged column, the mean in the column itself.
/// A target column of 0 has no cell before it, so only the mean is written.
fn write_average_row(output: &mut Table, tracker: &AverageTracker, avg_column: usize) {
    let row = output.create_row(tracker.next_row());
    if let Some(label_column) = avg_column.checked_sub(1) {
        row.set_cell(label_column, CellValue::Text(AVERAGE_LABEL.to_string()));
    }
    row.set_cell(avg_column, CellValue::Number(tracker.mean()));
}

/// Runs the whole pipeline over CSV files.
///
/// Opens `input_path`, resolves `avg_column_name` against its headers,
/// parses `expr`, filters into a new table, and persists it to
/// `output_path` in one committed write.
///
/// # Errors
/// Only I/O trouble and an `avg_column_name` missing from the headers fail
/// the run. Filter-expression problems degrade to fallback conditions per
/// `policy` and are reported as warnings.
pub fn process_csv(
    input_path: &Path,
    output_path: &Path,
    expr: &str,
    avg_column_name: &str,
    policy: FallbackPolicy,
) -> Result<FilterReport, ProcessorError> {
    let input = Table::open_csv(input_path)?;
    let headers = HeaderIndex::from_table(&input);

    let avg_column = headers
        .get(avg_column_name)
        .ok_or_else(|| ProcessorError::MissingColumn(avg_column_name.to_string()))?;

    let condition = Condition::parse(expr, &headers, policy);
    debug!(?condition, "parsed filter expression");

    let (output, report) = filter_table(&input, &condition, avg_column);
    output.save_csv(output_path)?;

    info!(
        matched_rows = report.matched_rows,
        "table processed successfully"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Table {
        let mut table = Table::new();
        {
            let header = table.create_row(0);
            header.set_cell(0, CellValue::Text("name".into()));
            header.set_cell(1, CellValue::Text("price".into()));
        }
        {
            let row = table.create_row(1);
            row.set_cell(0, CellValue::Text("a".into()));
            row.set_cell(1, CellValue::Number(50.0));
        }
        {
            let row = table.create_row(2);
            row.set_cell(0, CellValue::Text("b".into()));
            row.set_cell(1, CellValue::Number(150.0));
        }
        table
    }

    #[test]
    fn tracker_mean_is_zero_without_records() {
        let tracker = AverageTracker::new(1);
        assert_eq!(tracker.mean(), 0.0);
        assert_eq!(tracker.count(), 0);
    }

    #[test]
    fn tracker_accumulates_and_advances_independently() {
        let mut tracker = AverageTracker::new(1);
        assert_eq!(tracker.advance_row(), 1);
        tracker.record(10.0);
        assert_eq!(tracker.advance_row(), 2);
        tracker.record(30.0);
        assert_eq!(tracker.next_row(), 3);
        assert_eq!(tracker.mean(), 20.0);
        assert_eq!(tracker.count(), 2);
    }

    #[test]
    fn always_true_reproduces_every_data_row_in_order() {
        let table = sample_table();
        let (output, report) = filter_table(&table, &Condition::AlwaysTrue, 1);

        assert_eq!(report.matched_rows, 2);
        assert_eq!(output.row_count(), 4);
        assert_eq!(output.row(1), table.row(1));
        assert_eq!(output.row(2), table.row(2));
        assert_eq!(report.average, 100.0);
    }

    #[test]
    fn header_is_copied_in_text_form() {
        let mut table = Table::new();
        {
            let header = table.create_row(0);
            header.set_cell(0, CellValue::Number(2024.0));
            header.set_cell(1, CellValue::Text("price".into()));
        }
        let (output, _) = filter_table(&table, &Condition::AlwaysTrue, 1);
        assert_eq!(
            output.row(0).unwrap().cell(0),
            Some(&CellValue::Text("2024".into()))
        );
    }

    #[test]
    fn always_false_leaves_header_and_zero_average() {
        let table = sample_table();
        let (output, report) = filter_table(&table, &Condition::AlwaysFalse, 1);

        assert_eq!(report.matched_rows, 0);
        assert_eq!(output.row_count(), 2);
        let trailing = output.row(1).unwrap();
        assert_eq!(trailing.cell(0), Some(&CellValue::Text(AVERAGE_LABEL.into())));
        assert_eq!(trailing.cell(1), Some(&CellValue::Number(0.0)));
    }

    #[test]
    fn empty_input_still_gets_a_summary_row() {
        let (output, report) = filter_table(&Table::new(), &Condition::AlwaysTrue, 1);
        assert_eq!(report.matched_rows, 0);
        assert_eq!(output.row_count(), 1);
        assert_eq!(
            output.row(0).unwrap().cell(1),
            Some(&CellValue::Number(0.0))
        );
    }

    #[test]
    fn averaging_column_zero_writes_no_label() {
        let mut table = Table::new();
        table.create_row(0).set_cell(0, CellValue::Text("n".into()));
        table.create_row(1).set_cell(0, CellValue::Number(4.0));
        let (output, _) = filter_table(&table, &Condition::AlwaysTrue, 0);

        let trailing = output.row(2).unwrap();
        assert_eq!(trailing.cell(0), Some(&CellValue::Number(4.0)));
        assert_eq!(trailing.width(), 1);
    }

    #[test]
    fn non_numeric_target_cells_are_copied_but_not_averaged() {
        let mut table = sample_table();
        {
            let row = table.create_row(3);
            row.set_cell(0, CellValue::Text("c".into()));
            row.set_cell(1, CellValue::Text("n/a".into()));
        }
        let (output, report) = filter_table(&table, &Condition::AlwaysTrue, 1);

        assert_eq!(report.matched_rows, 3);
        assert_eq!(report.average, 100.0); // 50 and 150; "n/a" not counted
        assert_eq!(
            output.row(3).unwrap().cell(1),
            Some(&CellValue::Text("n/a".into()))
        );
    }
}
