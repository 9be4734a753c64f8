//! Utilities for printing messages to the terminal.

use std::{
    cmp,
    fmt,
    io::{self, Write},
    time::Duration,
};

use term_painter::{Color, Style, ToStyle};


macro_rules! info {
    ($($t:tt)*) => {
        crate::ui::print_msg(crate::ui::MsgKind::Info, format_args!($($t)*))
    };
}

macro_rules! warn {
    ($($t:tt)*) => {
        crate::ui::print_msg(crate::ui::MsgKind::Warning, format_args!($($t)*))
    };
}

macro_rules! error {
    ($($t:tt)*) => {
        crate::ui::print_msg(crate::ui::MsgKind::Error, format_args!($($t)*))
    };
}

/// Prints a progress line, evaluates `$body` and marks the line as done,
/// printing the elapsed time. Evaluates to the value of `$body`.
macro_rules! progress {
    ([$($label:tt)*] => $body:expr) => {{
        let label = format!($($label)*);
        crate::ui::progress_started(&label);

        let before = std::time::Instant::now();
        let out = $body;
        crate::ui::progress_done(&label, before.elapsed());

        out
    }};
}

#[derive(Debug, Clone, Copy)]
pub enum MsgKind {
    Error,
    Warning,
    Info,
    Progress,
}

impl MsgKind {
    fn icon(&self) -> char {
        match self {
            MsgKind::Error => '!',
            MsgKind::Warning => 'w',
            MsgKind::Info => 'i',
            MsgKind::Progress => '…',
        }
    }

    pub fn icon_style(&self) -> Style {
        match self {
            MsgKind::Error => Color::Red.bold(),
            MsgKind::Warning => Color::Yellow.bold(),
            MsgKind::Info => Color::Blue.bold(),
            MsgKind::Progress => Color::Green.bold(),
        }
    }

    pub fn body_style(&self) -> Style {
        match self {
            MsgKind::Error => Color::BrightRed.to_style(),
            MsgKind::Warning => Color::BrightYellow.to_style(),
            MsgKind::Info | MsgKind::Progress => Color::NotSet.to_style(),
        }
    }
}

/// Prints a message with an icon, wrapped to the terminal width. Errors go
/// to stderr, everything else to stdout.
pub fn print_msg(kind: MsgKind, body: fmt::Arguments) {
    let width = cmp::min(100, term_size::dimensions().map(|(w, _)| w).unwrap_or(80)) - 7;
    let lines = wrap(&body.to_string(), width);

    for (i, line) in lines.iter().enumerate() {
        let prefix = match i {
            0 => format!("[{}] ", kind.icon()),
            _ if i == lines.len() - 1 => "    └ ".to_string(),
            _ => "    │ ".to_string(),
        };

        let prefix = kind.icon_style().paint(prefix);
        let line = kind.body_style().paint(line);
        match kind {
            MsgKind::Error => eprintln!("{}{}", prefix, line),
            _ => println!("{}{}", prefix, line),
        }
    }
}

/// Splits `text` into lines of at most `width` characters, breaking at
/// whitespace only.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let len = current.chars().count();
        if len > 0 && len + 1 + word.chars().count() > width {
            lines.push(current);
            current = String::new();
        }

        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    lines.push(current);

    lines
}

pub fn progress_started(label: &str) {
    let kind = MsgKind::Progress;
    print!("{} {} ... ", kind.icon_style().paint("[…]"), kind.body_style().paint(label));
    let _ = io::stdout().flush();
}

pub fn progress_done(label: &str, elapsed: Duration) {
    let kind = MsgKind::Progress;
    println!(
        "\r{} {} ... {} (in {:.2?})",
        kind.icon_style().paint("[✓]"),
        kind.body_style().paint(label),
        kind.icon_style().paint("done"),
        elapsed,
    );
}

/// Formats the given integer with `,` as thousand separator.
pub fn fmt_with_thousand_sep(mut v: u64) -> String {
    let mut out = String::new();
    while v >= 1000 {
        out = format!(",{:03}{}", v % 1000, out);
        v /= 1000;
    }

    format!("{}{}", v, out)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousand_sep() {
        assert_eq!(fmt_with_thousand_sep(0), "0");
        assert_eq!(fmt_with_thousand_sep(999), "999");
        assert_eq!(fmt_with_thousand_sep(1_000), "1,000");
        assert_eq!(fmt_with_thousand_sep(1_234_005), "1,234,005");
    }

    #[test]
    fn wrapping() {
        assert_eq!(wrap("", 10), [""]);
        assert_eq!(wrap("one two three four", 9), ["one two", "three", "four"]);
        assert_eq!(wrap("averyveryverylongword x", 5), ["averyveryverylongword", "x"]);
    }
}
