use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use sheetmap_map::WorkbookReport;
use sheetmap_model::{MappingAction, MappingResult, MatchType};

pub fn print_report(report: &WorkbookReport, output: Option<&Path>, details: bool) {
    println!("Input: {}", report.source);
    if let Some(path) = output {
        println!("Report: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Sheet"),
        header_cell("Header rows"),
        header_cell("Columns"),
        header_cell("AutoMap"),
        header_cell("Review"),
        header_cell("ManualMap"),
        header_cell("Auto %"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..=6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for sheet in &report.sheets {
        let summary = &sheet.summary;
        table.add_row(vec![
            Cell::new(&sheet.sheet_name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(sheet.header_row_count),
            Cell::new(sheet.total_columns),
            count_cell(summary.auto_mapped, Color::Green),
            count_cell(summary.needs_review, Color::Yellow),
            count_cell(summary.needs_manual, Color::Red),
            Cell::new(format!("{:.1}", summary.auto_mapped_percentage)),
        ]);
    }
    let overall = &report.overall_summary;
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(overall.total_headers).add_attribute(Attribute::Bold),
        count_cell(overall.total_auto_mapped, Color::Green).add_attribute(Attribute::Bold),
        count_cell(overall.total_needs_review, Color::Yellow).add_attribute(Attribute::Bold),
        count_cell(overall.total_needs_manual, Color::Red).add_attribute(Attribute::Bold),
        Cell::new(format!("{:.1}", overall.auto_mapped_percentage)).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    if details {
        print_mapping_table(report);
    }
}

fn print_mapping_table(report: &WorkbookReport) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Sheet"),
        header_cell("Column"),
        header_cell("Canonical"),
        header_cell("Match"),
        header_cell("Confidence"),
        header_cell("Action"),
        header_cell("Details"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Right);
    for sheet in &report.sheets {
        for mapping in &sheet.mappings {
            table.add_row(mapping_row(&sheet.sheet_name, mapping));
        }
    }
    println!();
    println!("Mappings:");
    println!("{table}");
}

fn mapping_row(sheet: &str, mapping: &MappingResult) -> Vec<Cell> {
    vec![
        Cell::new(sheet),
        if mapping.user_column.is_empty() {
            dim_cell("(empty)")
        } else {
            Cell::new(&mapping.user_column)
        },
        match &mapping.canonical_column {
            Some(name) => Cell::new(name),
            None => dim_cell("-"),
        },
        match_cell(mapping.match_type),
        Cell::new(format!("{:.2}", mapping.confidence)),
        action_cell(mapping.recommended_action),
        Cell::new(&mapping.match_details),
    ]
}

/// Ranked candidates for one label.
pub fn print_suggestions(label: &str, suggestions: &[MappingResult]) {
    println!("Label: {label}");
    if suggestions.is_empty() {
        println!("No candidates above the fuzzy threshold.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Canonical"),
        header_cell("Confidence"),
        header_cell("Action"),
        header_cell("Details"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for (rank, suggestion) in suggestions.iter().enumerate() {
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(suggestion.canonical_column.as_deref().unwrap_or("-")),
            Cell::new(format!("{:.2}", suggestion.confidence)),
            action_cell(suggestion.recommended_action),
            Cell::new(&suggestion.match_details),
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

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn match_cell(match_type: MatchType) -> Cell {
    match match_type {
        MatchType::None => dim_cell(match_type),
        _ => Cell::new(match_type),
    }
}

fn action_cell(action: MappingAction) -> Cell {
    let color = match action {
        MappingAction::AutoMap => Color::Green,
        MappingAction::Review => Color::Yellow,
        MappingAction::Manual => Color::Red,
    };
    Cell::new(action).fg(color)
}

pub fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
