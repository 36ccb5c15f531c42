/// Converts a byte offset into 1-based (line, column) coordinates.
///
/// Columns count characters, not bytes. Only called when formatting
/// diagnostics, so the linear walk is fine.
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    for (pos, c) in source.char_indices() {
        if pos >= offset {
            break;
        }
        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}
