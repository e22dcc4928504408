//! Terminal summary of one reconciliation run.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use recon_model::SummaryStats;

pub fn print_summary(stats: &SummaryStats, total_rows: usize) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Outcome"),
        header_cell("Records"),
        header_cell("Share"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);

    let classified = stats.total_classified();
    for (label, count, color) in [
        ("Compliant", stats.compliant, Color::Green),
        ("Non-compliant", stats.non_compliant, Color::Yellow),
        ("Not received", stats.not_found, Color::Red),
    ] {
        table.add_row(vec![
            Cell::new(label).fg(color),
            count_cell(count, color),
            Cell::new(share(count, classified)),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(classified).add_attribute(Attribute::Bold),
        Cell::new("100.0%").add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    let mut detail = Table::new();
    detail.set_header(vec![header_cell("Detail"), header_cell("Records")]);
    apply_summary_table_style(&mut detail);
    align_column(&mut detail, 1, CellAlignment::Right);
    for (label, count) in [
        ("Value divergences", stats.value_divergent),
        ("Quantity divergences", stats.qty_divergent),
        ("Excellent matches", stats.excellent_matches),
        ("Good matches", stats.good_matches),
        ("Fair matches", stats.fair_matches),
        ("Rows emitted (incl. orphans)", total_rows),
    ] {
        detail.add_row(vec![Cell::new(label), Cell::new(count)]);
    }
    println!("{detail}");
}

fn share(count: usize, total: usize) -> String {
    if total == 0 {
        "-".to_string()
    } else {
        format!("{:.1}%", count as f64 / total as f64 * 100.0)
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        Cell::new(count).fg(Color::DarkGrey)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
