use sqlx::any::AnyRow;
use sqlx::{Column, Row, ValueRef};

/// Cells longer than this are cut and suffixed with `...`.
pub const MAX_CELL_CHARS: usize = 100;

pub const NO_ROWS: &str = "No rows returned.";

/// Header line then one line per row, cells separated by ` | `.
pub fn render_rows(rows: &[AnyRow]) -> String {
    let Some(first) = rows.first() else {
        return NO_ROWS.to_string();
    };

    let header: Vec<&str> = first.columns().iter().map(|c| c.name()).collect();
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(header.join(" | "));
    lines.extend(rows.iter().map(|row| row_cells(row).join(" | ")));
    lines.join("\n")
}

pub fn row_cells(row: &AnyRow) -> Vec<String> {
    (0..row.len()).map(|i| truncate(cell_text(row, i))).collect()
}

/// Best-effort text for one cell. The `Any` driver only exposes a handful of
/// portable types, so each is tried in turn.
pub fn cell_text(row: &AnyRow, idx: usize) -> String {
    match row.try_get_raw(idx) {
        Ok(raw) if raw.is_null() => return "NULL".to_string(),
        Ok(_) => {}
        Err(_) => return "<unreadable>".to_string(),
    }
    if let Ok(s) = row.try_get::<String, _>(idx) {
        return s;
    }
    if let Ok(i) = row.try_get::<i64, _>(idx) {
        return i.to_string();
    }
    if let Ok(i) = row.try_get::<i32, _>(idx) {
        return i.to_string();
    }
    if let Ok(f) = row.try_get::<f64, _>(idx) {
        return f.to_string();
    }
    if let Ok(f) = row.try_get::<f32, _>(idx) {
        return f.to_string();
    }
    if let Ok(b) = row.try_get::<bool, _>(idx) {
        return b.to_string();
    }
    if let Ok(bytes) = row.try_get::<Vec<u8>, _>(idx) {
        return format!("<{} bytes>", bytes.len());
    }
    "<unsupported>".to_string()
}

pub fn truncate(text: String) -> String {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_cells_are_untouched() {
        assert_eq!(truncate("USD".to_string()), "USD");
        let exact = "x".repeat(MAX_CELL_CHARS);
        assert_eq!(truncate(exact.clone()), exact);
    }

    #[test]
    fn long_cells_are_cut_on_char_boundaries() {
        let long = "é".repeat(MAX_CELL_CHARS + 5);
        let cut = truncate(long);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), MAX_CELL_CHARS + 3);
    }

    #[test]
    fn empty_result_has_a_message() {
        assert_eq!(render_rows(&[]), NO_ROWS);
    }
}
