//! Colored terminal output of the `mgmesh` tool.

use std::{
    fmt::Display,
    io::{stdout, Write},
    time::Instant,
};

use term_painter::{Color, Style, ToStyle};

use mgmesh::Reporter;


macro_rules! info {
    ($($t:tt)*) => {
        crate::ui::message(crate::ui::MsgKind::Info, &format!($($t)*))
    };
}

macro_rules! warn {
    ($($t:tt)*) => {
        crate::ui::message(crate::ui::MsgKind::Warning, &format!($($t)*))
    };
}

macro_rules! error {
    ($($t:tt)*) => {
        crate::ui::message(crate::ui::MsgKind::Error, &format!($($t)*))
    };
}

/// Lines are never longer than this, even on wide terminals.
const MAX_LINE_LEN: usize = 100;

#[derive(Debug, Clone, Copy)]
pub enum MsgKind {
    Error,
    Warning,
    Info,
}

impl MsgKind {
    fn label(self) -> &'static str {
        match self {
            MsgKind::Error => "error",
            MsgKind::Warning => "warning",
            MsgKind::Info => "info",
        }
    }

    fn style(self) -> Style {
        match self {
            MsgKind::Error => Color::Red.bold(),
            MsgKind::Warning => Color::Yellow.bold(),
            MsgKind::Info => Color::Blue.bold(),
        }
    }
}

/// Prints `body` prefixed with the label of `kind`. Continuation lines are
/// indented to the start of the body.
pub fn message(kind: MsgKind, body: &str) {
    let label = kind.label();
    let indent = label.len() + 2;
    let width = term_size::dimensions().map(|(w, _)| w).unwrap_or(80);

    for (i, line) in wrap(body, line_len(width, indent)).iter().enumerate() {
        if i == 0 {
            println!("{}: {}", kind.style().paint(label), line);
        } else {
            println!("{:indent$}{}", "", line, indent = indent);
        }
    }
}

fn line_len(terminal_width: usize, indent: usize) -> usize {
    terminal_width.min(MAX_LINE_LEN).saturating_sub(indent).max(1)
}

/// Breaks `body` at whitespace into lines of at most `len` characters. A word
/// longer than `len` gets a line of its own.
fn wrap(body: &str, len: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in body.split_whitespace() {
        let needed = current.chars().count() + 1 + word.chars().count();
        if !current.is_empty() && needed > len {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Runs `f` after printing `label`, then finishes the line with the elapsed
/// time or "failed".
pub fn progress<T, E>(label: impl Display, f: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
    let style = Color::Green.bold();
    print!("{} {} ... ", style.paint("=>"), label);
    let _ = stdout().flush();

    let before = Instant::now();
    let out = f();
    match &out {
        Ok(_) => println!("{} (in {:.2?})", style.paint("done"), before.elapsed()),
        Err(_) => println!("{}", Color::Red.bold().paint("failed")),
    }

    out
}

/// Formats the given integer with `,` as thousand separator.
pub fn fmt_with_thousand_sep(v: u64) -> String {
    let digits = v.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    out
}

/// Prints warnings of the codecs as UI messages.
///
/// Errors are not printed here: they are returned to `main` anyway, which
/// prints them together with their context.
pub struct UiReporter;

impl Reporter for UiReporter {
    fn warn(&mut self, msg: &str) {
        // A progress line might still be open.
        println!();
        message(MsgKind::Warning, msg);
    }

    fn error(&mut self, _msg: &str) {}
}
