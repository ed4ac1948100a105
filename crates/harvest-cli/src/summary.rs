use std::collections::BTreeSet;
use std::path::Path;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use harvest_cli::pipeline::{Harvest, RunOutcome};
use harvest_model::{Code, SubmissionRecord};

pub fn print_harvest(harvest: &Harvest) {
    println!(
        "Found {} code(s) in {} post(s)",
        harvest.codes.len(),
        harvest.posts
    );
    println!("{}", codes_table(&harvest.codes));
}

pub fn print_run_summary(outcome: &RunOutcome, dry_run: bool, audit_log: &Path) {
    println!(
        "Posts: {}  Codes: {}  Submitted: {}",
        outcome.harvest.posts,
        outcome.harvest.codes.len(),
        outcome.records.len()
    );
    if dry_run {
        println!("Dry run, nothing submitted:");
        println!("{}", codes_table(&outcome.harvest.codes));
        return;
    }
    println!("Audit log: {}", audit_log.display());
    println!("{}", records_table(&outcome.records));
}

pub fn print_history(records: &[SubmissionRecord], total: usize) {
    if records.is_empty() {
        if total == 0 {
            println!("No submissions recorded");
        } else {
            println!("{total} matching submission(s), none shown");
        }
        return;
    }
    println!("{}", records_table(records));
    if records.len() < total {
        println!("Showing {} of {} matching submission(s)", records.len(), total);
    }
}

fn codes_table(codes: &BTreeSet<Code>) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("#"), header_cell("Code")]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (index, code) in codes.iter().enumerate() {
        table.add_row(vec![dim_cell(index + 1), code_cell(code.as_str())]);
    }
    table
}

fn records_table(records: &[SubmissionRecord]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Time"),
        header_cell("Code"),
        header_cell("Site response"),
    ]);
    apply_table_style(&mut table);
    for record in records {
        table.add_row(vec![
            dim_cell(record.formatted_timestamp()),
            code_cell(record.code.as_str()),
            message_cell(&record.message),
        ]);
    }
    table
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn code_cell(code: &str) -> Cell {
    Cell::new(code).add_attribute(Attribute::Bold)
}

/// Empty responses are shown as a dash so the row is not mistaken for a gap.
fn message_cell(message: &str) -> Cell {
    if message.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(message)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).fg(Color::DarkGrey)
}
