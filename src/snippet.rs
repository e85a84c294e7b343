//! Line-numbered source excerpts with a caret under the error column.

#[cfg(test)]
#[path = "./snippet_tests.rs"]
mod tests;

use std::fmt::Write as _;

/// Number of source lines shown around an error.
pub(crate) const CONTEXT_LINES: usize = 5;

/// Renders up to `max_lines` lines of `source` around byte `offset`, with the
/// line containing `offset` roughly centered and a marker line beneath it.
///
/// ```text
/// 1 | [server]
/// 2 | port = 80x # listen port
///   |        ^ ***
/// 3 | host = "localhost"
/// ```
pub(crate) fn render(source: &str, offset: usize, max_lines: usize) -> String {
    let bytes = source.as_bytes();
    let offset = offset.min(bytes.len());
    let max_lines = max_lines.max(1);

    // Walk back over ⌈N/2⌉ newlines so the error line sits in the middle.
    let half = max_lines.div_ceil(2);
    let mut start = offset;
    let mut passed = 0;
    while start > 0 {
        if bytes[start - 1] == b'\n' {
            passed += 1;
            if passed == half {
                break;
            }
        }
        start -= 1;
    }
    let first_line = bytes[..start].iter().filter(|&&b| b == b'\n').count() + 1;

    // Forward scan recording at most N line boundaries.
    let mut lines: Vec<(usize, usize)> = Vec::with_capacity(max_lines);
    let mut line_start = start;
    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if lines.len() == max_lines {
            break;
        }
        if b == b'\n' {
            lines.push((line_start, i));
            line_start = i + 1;
        }
    }
    if lines.len() < max_lines && (line_start < bytes.len() || line_start == offset) {
        lines.push((line_start, bytes.len()));
    }

    let last_line = first_line + lines.len().saturating_sub(1);
    let width = last_line.to_string().len();

    let mut out = String::new();
    for (n, &(ls, le)) in lines.iter().enumerate() {
        let text = source
            .get(ls..le)
            .unwrap_or_default()
            .trim_end_matches('\r');
        if !out.is_empty() {
            out.push('\n');
        }
        let _ = write!(out, "{:>width$} | {text}", first_line + n);

        if ls <= offset && offset <= le {
            out.push('\n');
            let _ = write!(out, "{:>width$} | ", "");
            out.push_str(&marker(text, offset - ls));
        }
    }
    out
}

/// `^` at the column, then a space and at most three `*`, padded with blanks
/// to the line length.
fn marker(line: &str, column: usize) -> String {
    let mut column = column.min(line.len());
    while !line.is_char_boundary(column) {
        column -= 1;
    }
    let prefix = &line[..column];
    let mut out: String = prefix
        .chars()
        .map(|c| if c == '\t' { '\t' } else { ' ' })
        .collect();
    out.push('^');

    let line_width = line.chars().count();
    let used = prefix.chars().count() + 1;
    let budget = line_width.saturating_sub(used);
    out.extend(" ***".chars().take(budget));
    let used = used + budget.min(4);
    out.extend(std::iter::repeat_n(' ', line_width.saturating_sub(used)));
    out
}
