//! Output formatting utilities.

const WIDTHS: [usize; 3] = [5, 22, 10];

/// Prints a table header; every column but the last is padded.
pub fn print_table_header(columns: &[&str]) {
    let mut line = String::new();
    for (i, column) in columns.iter().enumerate() {
        match WIDTHS.get(i).filter(|_| i + 1 < columns.len()) {
            Some(width) => line.push_str(&format!("{:<width$} ", column, width = width)),
            None => line.push_str(column),
        }
    }
    println!("{}", line);
    println!("{}", "-".repeat(100));
}

/// Shortens `s` to at most `max_len` characters, marking the cut with `...`.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
