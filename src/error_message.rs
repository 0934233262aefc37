//! Last-error text holder used as the error channel of configuration objects.

use std::fmt::{self, Write};

/// Mutable error text. Overwritten by each failing call, untouched on success.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorMessage {
    data: String,
}

/// Sink that only measures how long the formatted output is.
struct LengthCounter(usize);

impl Write for LengthCounter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0 += s.len();
        Ok(())
    }
}

fn formatted_len(args: fmt::Arguments<'_>) -> usize {
    let mut counter = LengthCounter(0);
    // LengthCounter never fails; a failing Display impl just yields a shorter count.
    let _ = counter.write_fmt(args);
    counter.0
}

impl ErrorMessage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored message.
    pub fn set(&mut self, text: impl Into<String>) {
        self.data = text.into();
    }

    /// Replace the stored message with formatted text.
    ///
    /// The output length is measured first so the buffer is allocated once at
    /// exactly the required size.
    pub fn format(&mut self, args: fmt::Arguments<'_>) {
        let mut data = String::with_capacity(formatted_len(args));
        let _ = data.write_fmt(args);
        self.data = data;
    }

    /// Append formatted text, keeping what is already stored.
    pub fn append_format(&mut self, args: fmt::Arguments<'_>) {
        self.data.reserve_exact(formatted_len(args));
        let _ = self.data.write_fmt(args);
    }

    /// Current text, empty if never set.
    pub fn text(&self) -> &str {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }
}

impl fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_until_set() {
        let message = ErrorMessage::new();
        assert_eq!(message.text(), "");
        assert!(message.is_empty());
    }

    #[test]
    fn set_replaces_text() {
        let mut message = ErrorMessage::new();
        message.set("hello world");
        assert_eq!(message.text(), "hello world");
        message.set(String::from("bye"));
        assert_eq!(message.to_string(), "bye");
    }

    #[test]
    fn format_overwrites_and_fits_exactly() {
        let mut message = ErrorMessage::new();
        message.set("stale text that is much longer than the replacement");
        message.format(format_args!("{}: [{}, {:.2}, {}]", "list", 1, 3.14159, 'a'));
        assert_eq!(message.text(), "list: [1, 3.14, a]");
        assert_eq!(message.data.capacity(), message.text().len());
    }

    #[test]
    fn append_format_keeps_previous_content() {
        let mut message = ErrorMessage::new();
        message.format(format_args!("{} Put \"{}\"", "GlobalConfig", "k"));
        message.append_format(format_args!(": {}", "no such key"));
        assert_eq!(message.text(), "GlobalConfig Put \"k\": no such key");
    }

    #[test]
    fn format_empty_output() {
        let mut message = ErrorMessage::new();
        message.set("x");
        message.format(format_args!(""));
        assert!(message.is_empty());
    }
}
