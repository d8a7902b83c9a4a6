//! Static frame parts: title, section rules and the key legend.

use super::constants::APP_TITLE;

/// Rows used by the header, the stats block, the active panel and the legend;
/// whatever is left goes to the log viewport.
pub const FIXED_ROWS: usize = 11;

pub fn title_line(server_url: &str) -> String {
    format!("{APP_TITLE}  |  {server_url}")
}

pub fn section_rule(title: &str, width: usize) -> String {
    let head = format!("-- {title} ");
    let fill = width.saturating_sub(head.chars().count());
    format!("{head}{}", "-".repeat(fill))
}

pub fn key_legend(retry_visible: bool) -> String {
    let mut keys = vec!["[s] start", "[Ctrl+Enter] start when idle"];
    if retry_visible {
        keys.push("[r] retry");
    }
    keys.extend(["[Esc] stop hint", "[PgUp/PgDn/End] log", "[q] quit"]);
    keys.join("  ")
}
