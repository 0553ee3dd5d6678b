//! Output formatting helpers built on `tabled`.

use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Render rows as a rounded table.
pub fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Placeholder for a value the device did not report.
pub const UNKNOWN: &str = "-";
