//! Pattern-based event formatter
//!
//! A pattern is literal text interspersed with `%` placeholders:
//!
//! | Placeholder | Renders |
//! |---|---|
//! | `%m` | message |
//! | `%p` | level name |
//! | `%r` | milliseconds elapsed since process start |
//! | `%c` | logger name |
//! | `%t` | thread id |
//! | `%n` | newline |
//! | `%d{fmt}` | timestamp, strftime sub-pattern (default `%Y-%m-%d %H:%M:%S`) |
//! | `%f` | source file |
//! | `%l` | source line |
//! | `%T` | tab |
//! | `%F` | task id |
//! | `%N` | thread name |
//! | `%%` | a literal `%` |
//!
//! Compilation never fails. Unknown letters and unterminated arguments are
//! kept as visible markers in the output and raise [`LogFormatter::is_error`],
//! so a caller can refuse a bad pattern before installing it.
//!
//! # Examples
//!
//! ```
//! use rust_config_logger::core::LogFormatter;
//!
//! let formatter = LogFormatter::new("[%p] %c - %m%n");
//! assert!(!formatter.is_error());
//!
//! let broken = LogFormatter::new("%d{%Y-%m-%d");
//! assert!(broken.is_error());
//! ```

use super::log_event::LogEvent;
use chrono::format::{Item, StrftimeItems};
use once_cell::sync::Lazy;
use std::fmt::Write as _;
use std::io;
use std::sync::Arc;

pub const DEFAULT_PATTERN: &str =
    "%d{%Y-%m-%d %H:%M:%S}%T%t%T%N%T%F%T[%p]%T[%c]%T%f:%l%T%m%n";
pub const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const PATTERN_ERROR_MARKER: &str = "<<pattern_error>>";

static DEFAULT_FORMATTER: Lazy<Arc<LogFormatter>> =
    Lazy::new(|| Arc::new(LogFormatter::new(DEFAULT_PATTERN)));

/// One event attribute a placeholder expands to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Message,
    Level,
    Elapsed,
    LoggerName,
    ThreadId,
    NewLine,
    DateTime(String),
    FileName,
    Line,
    Tab,
    TaskId,
    ThreadName,
}

impl Field {
    /// Resolve a placeholder letter and its optional `{...}` argument.
    ///
    /// Returns the error marker to render in place of the field when the
    /// letter is unknown or its argument is unusable.
    pub fn from_letter(letter: char, arg: Option<&str>) -> Result<Field, String> {
        let field = match letter {
            'm' => Field::Message,
            'p' => Field::Level,
            'r' => Field::Elapsed,
            'c' => Field::LoggerName,
            't' => Field::ThreadId,
            'n' => Field::NewLine,
            'd' => {
                let format = match arg {
                    Some(fmt) if !fmt.is_empty() => fmt,
                    _ => DEFAULT_DATETIME_FORMAT,
                };
                if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
                    return Err(format!("<<error_format %d{{{}}}>>", format));
                }
                Field::DateTime(format.to_string())
            }
            'f' => Field::FileName,
            'l' => Field::Line,
            'T' => Field::Tab,
            'F' => Field::TaskId,
            'N' => Field::ThreadName,
            _ => return Err(format!("<<error_format %{}>>", letter)),
        };
        Ok(field)
    }

    pub fn letter(&self) -> char {
        match self {
            Field::Message => 'm',
            Field::Level => 'p',
            Field::Elapsed => 'r',
            Field::LoggerName => 'c',
            Field::ThreadId => 't',
            Field::NewLine => 'n',
            Field::DateTime(_) => 'd',
            Field::FileName => 'f',
            Field::Line => 'l',
            Field::Tab => 'T',
            Field::TaskId => 'F',
            Field::ThreadName => 'N',
        }
    }

    fn render<S: RenderSink>(
        &self,
        event: &LogEvent,
        scratch: &mut String,
        sink: &mut S,
    ) -> io::Result<()> {
        scratch.clear();
        match self {
            Field::Message => return sink.put(event.message.as_bytes()),
            Field::Level => return sink.put(event.level.to_str().as_bytes()),
            Field::LoggerName => return sink.put(event.logger.as_bytes()),
            Field::NewLine => return sink.put(b"\n"),
            Field::Tab => return sink.put(b"\t"),
            Field::FileName => return sink.put(event.file.as_bytes()),
            Field::ThreadName => return sink.put(event.thread_name.as_bytes()),
            Field::Elapsed => {
                let _ = write!(scratch, "{}", event.elapsed_ms);
            }
            Field::ThreadId => {
                let _ = write!(scratch, "{}", event.thread_id);
            }
            Field::TaskId => {
                let _ = write!(scratch, "{}", event.task_id);
            }
            Field::Line => {
                let _ = write!(scratch, "{}", event.line);
            }
            Field::DateTime(format) => {
                let _ = write!(scratch, "{}", event.timestamp.format(format));
            }
        }
        sink.put(scratch.as_bytes())
    }
}

/// A compiled piece of a pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatItem {
    Literal(String),
    Field(Field),
}

/// Destination a formatter renders into
trait RenderSink {
    fn put(&mut self, bytes: &[u8]) -> io::Result<()>;
}

impl RenderSink for Vec<u8> {
    fn put(&mut self, bytes: &[u8]) -> io::Result<()> {
        let needed = self.len() + bytes.len();
        if needed > self.capacity() {
            // double instead of growing to fit
            let target = (self.capacity() * 2).max(needed).max(64);
            self.reserve_exact(target - self.len());
        }
        self.extend_from_slice(bytes);
        Ok(())
    }
}

struct StreamSink<'a, W: ?Sized>(&'a mut W);

impl<W: io::Write + ?Sized> RenderSink for StreamSink<'_, W> {
    fn put(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.0.write_all(bytes)
    }
}

/// Compiled log pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFormatter {
    pattern: String,
    items: Vec<FormatItem>,
    error: bool,
}

impl LogFormatter {
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let (items, error) = compile(&pattern);
        Self {
            pattern,
            items,
            error,
        }
    }

    /// Shared formatter for [`DEFAULT_PATTERN`]
    pub fn default_shared() -> Arc<LogFormatter> {
        Arc::clone(&DEFAULT_FORMATTER)
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn items(&self) -> &[FormatItem] {
        &self.items
    }

    /// True when the pattern contained an unknown letter or an
    /// unterminated placeholder
    pub fn is_error(&self) -> bool {
        self.error
    }

    /// Render into a growable buffer
    pub fn format_into(&self, event: &LogEvent, buf: &mut Vec<u8>) {
        // Vec sink never fails
        let _ = self.render(event, buf);
    }

    /// Render straight into a stream
    pub fn format_to<W: io::Write + ?Sized>(&self, event: &LogEvent, writer: &mut W) -> io::Result<()> {
        self.render(event, &mut StreamSink(writer))
    }

    pub fn format(&self, event: &LogEvent) -> String {
        let mut buf = Vec::new();
        self.format_into(event, &mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn render<S: RenderSink>(&self, event: &LogEvent, sink: &mut S) -> io::Result<()> {
        let mut scratch = String::new();
        for item in &self.items {
            match item {
                FormatItem::Literal(text) => sink.put(text.as_bytes())?,
                FormatItem::Field(field) => field.render(event, &mut scratch, sink)?,
            }
        }
        Ok(())
    }
}

impl Default for LogFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERN)
    }
}

/// Single left-to-right scan with a pending literal accumulator
fn compile(pattern: &str) -> (Vec<FormatItem>, bool) {
    let mut items = Vec::new();
    let mut literal = String::new();
    let mut error = false;
    let mut chars = pattern.char_indices().peekable();

    fn flush(literal: &mut String, items: &mut Vec<FormatItem>) {
        if !literal.is_empty() {
            items.push(FormatItem::Literal(std::mem::take(literal)));
        }
    }

    while let Some((_, c)) = chars.next() {
        if c != '%' {
            literal.push(c);
            continue;
        }

        match chars.peek().copied() {
            Some((_, '%')) => {
                chars.next();
                literal.push('%');
            }
            Some((_, letter)) if letter.is_ascii_alphabetic() => {
                chars.next();
                flush(&mut literal, &mut items);

                let mut arg = None;
                if let Some(&(brace, '{')) = chars.peek() {
                    let body = brace + 1;
                    match pattern[body..].find('}') {
                        Some(len) => {
                            let close = body + len;
                            arg = Some(&pattern[body..close]);
                            for (idx, _) in chars.by_ref() {
                                if idx == close {
                                    break;
                                }
                            }
                        }
                        None => {
                            error = true;
                            items.push(FormatItem::Literal(PATTERN_ERROR_MARKER.to_string()));
                            return (items, error);
                        }
                    }
                }

                match Field::from_letter(letter, arg) {
                    Ok(field) => items.push(FormatItem::Field(field)),
                    Err(marker) => {
                        error = true;
                        items.push(FormatItem::Literal(marker));
                    }
                }
            }
            Some((_, other)) => {
                chars.next();
                flush(&mut literal, &mut items);
                error = true;
                items.push(FormatItem::Literal(format!("<<error_format %{}>>", other)));
            }
            None => {
                flush(&mut literal, &mut items);
                error = true;
                items.push(FormatItem::Literal(PATTERN_ERROR_MARKER.to_string()));
            }
        }
    }

    flush(&mut literal, &mut items);
    (items, error)
}
