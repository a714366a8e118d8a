use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use rtd_model::{BulletinStatus, RunReport};

pub fn print_summary(report: &RunReport) {
    println!(
        "Processed: {}  Skipped: {}  Failed: {}",
        report.processed, report.skipped, report.failed
    );
    if report.outcomes.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Bulletin"),
        header_cell("Era"),
        header_cell("Type"),
        header_cell("Status"),
        header_cell("Rows"),
        header_cell("Dropped"),
        header_cell("Losses"),
        header_cell("Error"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);
    align_column(&mut table, 6, CellAlignment::Right);
    for outcome in &report.outcomes {
        table.add_row(vec![
            Cell::new(&outcome.bulletin)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(&outcome.era),
            Cell::new(&outcome.frequency),
            status_cell(outcome.status),
            Cell::new(outcome.rows),
            count_cell(outcome.dropped_rows),
            count_cell(outcome.coercion_losses),
            match &outcome.error {
                Some(error) => Cell::new(error).fg(Color::Red),
                None => dim_cell("-"),
            },
        ]);
    }
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
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

fn status_cell(status: BulletinStatus) -> Cell {
    match status {
        BulletinStatus::Processed => Cell::new("OK").fg(Color::Green),
        BulletinStatus::Skipped => dim_cell("SKIP"),
        BulletinStatus::Failed => Cell::new("FAIL")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
    }
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count).fg(Color::Yellow)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
