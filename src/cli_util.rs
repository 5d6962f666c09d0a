use std::io::{self, IsTerminal, Write};

use nu_ansi_term::{Color, Style};

use crate::{Program, RunError};

/// Pretty-print a [`RunError`]; syntax errors get the offending source line
/// with a caret under the bracket.
/// If `program` is `Some("bf")`, prefix messages with "bf: ..." for CLI mode
pub fn print_run_error(program: Option<&str>, source: &Program, err: &RunError) {
    let color = io::stderr().is_terminal();
    eprint!("{}", render_run_error(program, source, err, color));
    let _ = io::stderr().flush();
}

pub fn render_run_error(program: Option<&str>, source: &Program, err: &RunError, color: bool) -> String {
    let prefix_program = |msg: &str| {
        if let Some(p) = program {
            format!("{p}: {msg}")
        } else {
            msg.to_string()
        }
    };

    match err {
        RunError::Syntax(syntax) => {
            let (line, column) = syntax.location();
            let msg = prefix_program(&err.to_string());
            let text = source.line(line).unwrap_or_default();
            render_error_with_context(&msg, line, text, column, color)
        }
        RunError::Internal(_) => {
            format!("{}\n", paint(color, Color::Red.bold(), &prefix_program(&err.to_string())))
        }
    }
}

/// Format an error header followed by a window of `text` around the 1-based
/// `column`, with a caret under it, slicing by char indices so UTF-8 is safe.
pub fn render_error_with_context(header: &str, line: usize, text: &str, column: usize, color: bool) -> String {
    // Show a short window around the position for context
    const WINDOW_CHARS: usize = 32;

    let pos = column.saturating_sub(1);
    let total_chars = text.chars().count();
    let start_char = pos.saturating_sub(WINDOW_CHARS);
    let end_char = (pos + WINDOW_CHARS + 1).min(total_chars);

    let start_byte = char_to_byte_index(text, start_char);
    let end_byte = char_to_byte_index(text, end_char);
    let slice = &text[start_byte..end_byte];

    let gutter = format!("{line} | ");
    let mut out = String::new();
    out.push_str(&paint(color, Color::Red.bold(), header));
    out.push('\n');
    out.push_str(&format!("{}{}\n", paint(color, Style::new().dimmed(), &gutter), slice));

    // Caret under the exact position
    let caret_offset_chars = gutter.len() + pos.saturating_sub(start_char);
    out.push_str(&" ".repeat(caret_offset_chars));
    out.push_str(&paint(color, Color::Yellow.bold(), "^"));
    out.push('\n');
    out
}

fn paint(color: bool, style: Style, text: &str) -> String {
    if color {
        style.paint(text).to_string()
    } else {
        text.to_string()
    }
}

/// Convert a char index into a byte index in the given UTF-8 string.
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map_or(s.len(), |(byte_idx, _)| byte_idx)
}
