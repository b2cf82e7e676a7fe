//! Device table rendering.
//!
//! Bordered, column-aligned output with bold red headers and a FileVault
//! column coloured green (enabled) or red (anything else).

use std::io::{self, IsTerminal};

use crossterm::style::Stylize;

use mdm_xv_core::models::Computer;
use mdm_xv_core::utils::{format_optional, truncate_string};

const HEADERS: [&str; 12] = [
    "Name",
    "Serial",
    "Managed",
    "Model",
    "OS",
    "Last Check-In",
    "Inventory",
    "Enrollment",
    "RAM (MB)",
    "MAC",
    "FileVault",
    "Email",
];

const FILEVAULT_COLUMN: usize = 10;

/// Longest cell content before truncation
const MAX_CELL_WIDTH: usize = 40;

struct Row {
    cells: [String; 12],
    file_vault_enabled: bool,
}

impl Row {
    fn from_computer(computer: &Computer) -> Self {
        let cells = [
            format_optional(computer.name()),
            format_optional(computer.serial_number()),
            format_optional(computer.is_managed()),
            format_optional(computer.model()),
            format_optional(computer.os_version()),
            format_optional(computer.last_contact_time()),
            format_optional(computer.report_date()),
            format_optional(computer.last_enrolled_date()),
            format_optional(computer.total_ram_megabytes()),
            format_optional(computer.mac_address()),
            format_optional(computer.file_vault_enabled()),
            format_optional(computer.email()),
        ]
        .map(|cell| truncate_string(&cell, MAX_CELL_WIDTH));

        Self {
            cells,
            file_vault_enabled: computer.file_vault_enabled() == Some(true),
        }
    }
}

/// Colour is used only on a terminal, and never when `NO_COLOR` is set.
fn use_color() -> bool {
    io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

pub fn print_device_table(computers: &[Computer]) {
    print!("{}", render_device_table(computers, use_color()));
}

pub fn render_device_table(computers: &[Computer], color: bool) -> String {
    let rows: Vec<Row> = computers.iter().map(Row::from_computer).collect();

    let mut widths: Vec<usize> = HEADERS.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.cells.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let separator = format!(
        "+{}+\n",
        widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+")
    );

    let mut out = String::new();
    out.push_str(&separator);

    let header_cells: Vec<String> = HEADERS
        .iter()
        .zip(&widths)
        .map(|(header, &width)| {
            let padded = pad(&header.to_uppercase(), width);
            if color {
                padded.red().bold().to_string()
            } else {
                padded
            }
        })
        .collect();
    push_line(&mut out, &header_cells);
    out.push_str(&separator);

    for row in &rows {
        let cells: Vec<String> = row
            .cells
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (cell, &width))| {
                let padded = pad(cell, width);
                match (color, i == FILEVAULT_COLUMN) {
                    (true, true) if row.file_vault_enabled => padded.green().to_string(),
                    (true, true) => padded.red().to_string(),
                    _ => padded,
                }
            })
            .collect();
        push_line(&mut out, &cells);
    }

    if !rows.is_empty() {
        out.push_str(&separator);
    }
    out
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.chars().count());
    format!("{}{}", text, " ".repeat(fill))
}

fn push_line(out: &mut String, cells: &[String]) {
    out.push_str("| ");
    out.push_str(&cells.join(" | "));
    out.push_str(" |\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn computer(json: &str) -> Computer {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_plain_table_layout() {
        let c = computer(
            r#"{
                "general": { "name": "Lab-01", "remoteManagement": { "managed": true } },
                "hardware": { "serialNumber": "C02XYZ", "totalRamMegabytes": 16384 },
                "diskEncryption": { "fileVault2Enabled": true },
                "userAndLocation": { "email": "jane@example.com" }
            }"#,
        );

        let table = render_device_table(&[c], false);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 5, "separator, header, separator, row, separator");
        assert!(lines[1].starts_with("| NAME "));
        assert!(lines[1].contains("FILEVAULT"));
        assert!(lines[3].contains("Lab-01"));
        assert!(lines[3].contains("C02XYZ"));
        assert!(lines[3].contains("16384"));
        assert!(lines[3].contains("jane@example.com"));
        assert!(!table.contains('\u{1b}'), "no escape codes without colour");

        let widths: Vec<usize> = lines.iter().map(|l| l.chars().count()).collect();
        assert!(widths.iter().all(|&w| w == widths[0]), "rows must align");
    }

    #[test]
    fn test_missing_sections_render_empty_cells() {
        let c = computer(r#"{ "hardware": { "serialNumber": "ONLY" } }"#);
        let table = render_device_table(&[c], false);
        let row = table.lines().nth(3).unwrap();

        let cells: Vec<&str> = row.trim_matches('|').split('|').map(str::trim).collect();
        assert_eq!(cells.len(), 12);
        assert_eq!(cells[0], "");
        assert_eq!(cells[1], "ONLY");
        assert_eq!(cells[FILEVAULT_COLUMN], "");
    }

    #[test]
    fn test_colour_output_contains_escape_codes() {
        let c = computer(r#"{ "diskEncryption": { "fileVault2Enabled": false } }"#);
        let table = render_device_table(&[c], true);
        assert!(table.contains('\u{1b}'));
    }

    #[test]
    fn test_long_values_are_truncated() {
        let long_model = "M".repeat(80);
        let c = computer(&format!(r#"{{ "hardware": {{ "model": "{}" }} }}"#, long_model));
        let table = render_device_table(&[c], false);
        assert!(table.contains(&format!("{}...", "M".repeat(MAX_CELL_WIDTH - 3))));
        assert!(!table.contains(&long_model));
    }
}
