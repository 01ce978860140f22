//! Inline markup compiler.
//!
//! Turns a [`Message`] into a [`Record`] in a single pass. The supported
//! markup is a small subset of Markdown:
//!
//! * `**bold**` or `__bold__`
//! * `*italic*` or `_italic_`
//! * `` `code` ``
//!
//! A marker opens only after a boundary and closes only before one (see
//! [`crate::separator`]); anything else is kept as literal text. Values that
//! changed since the previous render can additionally be highlighted.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::record::{Piece, Record, StyleArg, ESCAPED_PERCENT, STYLE_DIRECTIVE, VALUE_DIRECTIVE};
use crate::separator::is_boundary;
use crate::template::Message;
use crate::value::Value;

const TRACE_STYLE: &str = "color: #999; font-style: italic; font-size: 0.9em; padding-left: 2em;";

/// Where the compiled record is going to be printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Target {
    /// ANSI escape sequences embedded in the text.
    #[default]
    Terminal,
    /// `%c` directives with CSS style payloads.
    Console,
}

/// Decides whether styling must be dropped for a message.
pub trait StylePolicy: Send + Sync {
    fn disable_styling(&self, values: &[Value]) -> bool;
}

/// Always style.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullStyling;

impl StylePolicy for FullStyling {
    fn disable_styling(&self, _values: &[Value]) -> bool {
        false
    }
}

/// Consoles embedded in some online sandboxes mis-render styled output that
/// carries objects, so styling is dropped whenever a rich value is present.
#[derive(Debug, Clone, Copy, Default)]
pub struct RestrictedSandbox;

impl StylePolicy for RestrictedSandbox {
    fn disable_styling(&self, values: &[Value]) -> bool {
        values.iter().any(Value::is_rich)
    }
}

/// Output target plus styling policy.
#[derive(Clone)]
pub struct Environment {
    pub target: Target,
    pub policy: Arc<dyn StylePolicy>,
}

impl Environment {
    pub fn new(target: Target) -> Self {
        Self { target, policy: Arc::new(FullStyling) }
    }

    pub fn with_policy(target: Target, policy: impl StylePolicy + 'static) -> Self {
        Self { target, policy: Arc::new(policy) }
    }

    pub fn terminal() -> Self {
        Self::new(Target::Terminal)
    }

    pub fn console() -> Self {
        Self::new(Target::Console)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::terminal()
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment").field("target", &self.target).finish_non_exhaustive()
    }
}

/// Positions of values that changed since the previous render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeHints(BTreeSet<usize>);

impl ChangeHints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&mut self, index: usize) {
        self.0.insert(index);
    }

    pub fn is_changed(&self, index: usize) -> bool {
        self.0.contains(&index)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<usize> for ChangeHints {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Bold,
    Italic,
    Code,
    Changed,
}

impl Marker {
    fn slot(self) -> usize {
        self as usize
    }

    /// Opening or closing style for the given target.
    fn style(self, target: Target, open: bool) -> &'static str {
        match (target, self, open) {
            (Target::Terminal, Marker::Bold, true) => "\u{1b}[1m",
            (Target::Terminal, Marker::Bold, false) => "\u{1b}[22m",
            (Target::Terminal, Marker::Italic, true) => "\u{1b}[3m",
            (Target::Terminal, Marker::Italic, false) => "\u{1b}[23m",
            (Target::Terminal, Marker::Code, true) => "\u{1b}[96m\u{1b}[1m",
            (Target::Terminal, Marker::Code, false) => "\u{1b}[39m\u{1b}[22m",
            (Target::Terminal, Marker::Changed, _) => "",
            (Target::Console, Marker::Bold, true) => "font-weight: bold;",
            (Target::Console, Marker::Bold, false) => "font-weight: normal;",
            (Target::Console, Marker::Italic, true) => "font-style: italic;",
            (Target::Console, Marker::Italic, false) => "font-style: normal;",
            (Target::Console, Marker::Code, true) => {
                "background: hsla(0,0%,70%,.3); border-radius:3px; padding: 0 2px;"
            }
            (Target::Console, Marker::Code, false) => "background: unset;",
            (Target::Console, Marker::Changed, true) => {
                concat!(
                    "text-decoration: underline; text-decoration-color: green; ",
                    "text-decoration-style: wavy; padding-bottom: 1px; ",
                    "text-decoration-skip-ink: none;"
                )
            }
            (Target::Console, Marker::Changed, false) => {
                "text-decoration: none; padding-bottom: 0;"
            }
        }
    }
}

/// Compiles a message into a record.
///
/// `hints` marks values to highlight and `trace` is appended as a dimmed
/// `(@ trace)` suffix when non-empty.
///
/// # Examples
///
/// ```
/// # use lifecycle_logger::compiler::{compile, ChangeHints, Environment};
/// # use lifecycle_logger::message;
/// let message = message!("**{}** apples", 3);
/// let record = compile(&message, &ChangeHints::new(), None, &Environment::terminal());
/// assert_eq!(record.format(), Some("\u{1b}[1m3\u{1b}[22m apples"));
/// ```
pub fn compile(
    message: &Message,
    hints: &ChangeHints,
    trace: Option<&str>,
    env: &Environment,
) -> Record {
    let styling = !env.policy.disable_styling(&message.values);
    let mut compiler = Compiler::new(env.target, styling);

    for (i, segment) in message.segments.iter().enumerate() {
        let value = message.values.get(i);
        if styling {
            compiler.styled_segment(segment, value, hints.is_changed(i));
        } else {
            compiler.plain_segment(i, segment, value);
        }
    }

    if let Some(trace) = trace.filter(|t| !t.is_empty()) {
        compiler.trace(trace);
    }

    compiler.finish()
}

/// State for one compile call. Nothing here outlives it.
struct Compiler {
    target: Target,
    styling: bool,
    open: [bool; 4],
    buf: String,
    args: Vec<StyleArg>,
    pieces: Vec<Piece>,
    // True while the last thing written to `buf` is a `%c` directive.
    directive_pending: bool,
}

impl Compiler {
    fn new(target: Target, styling: bool) -> Self {
        Self {
            target,
            styling,
            open: [false; 4],
            buf: String::new(),
            args: Vec::new(),
            pieces: Vec::new(),
            directive_pending: false,
        }
    }

    fn styled_segment(&mut self, segment: &str, value: Option<&Value>, changed: bool) {
        self.scan(segment);

        let Some(value) = value else { return };
        if changed {
            self.emit(Marker::Changed, true);
        }
        match value {
            Value::Rich(rich) => {
                self.buf.push_str(VALUE_DIRECTIVE);
                self.args.push(StyleArg::Value(rich.clone()));
                self.directive_pending = false;
            }
            other => self.push_text(&other.to_inline()),
        }
        if changed {
            self.emit(Marker::Changed, false);
        }
    }

    fn plain_segment(&mut self, index: usize, segment: &str, value: Option<&Value>) {
        self.buf.clear();
        self.scan(segment);

        let mut text = std::mem::take(&mut self.buf);
        if value.is_some() && text.ends_with(' ') {
            text.pop();
        }
        if index > 0 && text.starts_with(' ') {
            text.remove(0);
        }
        if !text.is_empty() {
            self.pieces.push(Piece::Text(text));
        }

        match value {
            Some(text @ Value::Text(_)) => self.pieces.push(Piece::Text(text.to_inline())),
            Some(other) => self.pieces.push(Piece::Value(other.clone())),
            None => {}
        }
    }

    fn scan(&mut self, segment: &str) {
        let chars: Vec<char> = segment.chars().collect();
        let mut prev: Option<char> = None;
        let mut j = 0;

        while j < chars.len() {
            let c = chars[j];
            let (marker, width) = match c {
                '*' | '_' if chars.get(j + 1) == Some(&c) => (Some(Marker::Bold), 2),
                '*' | '_' => (Some(Marker::Italic), 1),
                '`' => (Some(Marker::Code), 1),
                _ => (None, 1),
            };
            let next = chars.get(j + width).copied();

            match marker {
                Some(marker) if self.toggle(marker, next, prev) => prev = None,
                _ => {
                    for &literal in &chars[j..j + width] {
                        self.push_char(literal);
                    }
                    prev = Some(c);
                }
            }
            j += width;
        }
    }

    /// Closing wins over opening; a marker that can do neither is literal.
    fn toggle(&mut self, marker: Marker, next: Option<char>, prev: Option<char>) -> bool {
        let is_open = self.open[marker.slot()];
        if is_open && is_boundary(next) {
            self.emit(marker, false);
            true
        } else if !is_open && is_boundary(prev) {
            self.emit(marker, true);
            true
        } else {
            false
        }
    }

    fn emit(&mut self, marker: Marker, open: bool) {
        self.open[marker.slot()] = open;
        if !self.styling {
            return;
        }
        let style = marker.style(self.target, open);
        match self.target {
            Target::Terminal => self.push_text(style),
            Target::Console => self.push_style(style),
        }
    }

    fn push_style(&mut self, style: &str) {
        if self.directive_pending {
            if let Some(StyleArg::Style(pending)) = self.args.last_mut() {
                pending.push_str(style);
                return;
            }
        }
        self.buf.push_str(STYLE_DIRECTIVE);
        self.args.push(StyleArg::Style(style.to_string()));
        self.directive_pending = true;
    }

    /// Literal text. In a styled record every `%` is escaped so that only
    /// the compiler's own directives consume payloads.
    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.styling && text.contains('%') {
            self.buf.push_str(&text.replace('%', ESCAPED_PERCENT));
        } else {
            self.buf.push_str(text);
        }
        self.directive_pending = false;
    }

    fn push_char(&mut self, c: char) {
        if self.styling && c == '%' {
            self.buf.push_str(ESCAPED_PERCENT);
        } else {
            self.buf.push(c);
        }
        self.directive_pending = false;
    }

    fn trace(&mut self, trace: &str) {
        if !self.styling {
            self.pieces.push(Piece::Text(format!(" (@ {})", trace)));
            return;
        }
        match self.target {
            Target::Terminal => {
                self.push_text(&format!("  \u{1b}[2m(@ {})\u{1b}[22m", trace));
            }
            Target::Console => {
                self.buf.push_str(STYLE_DIRECTIVE);
                self.args.push(StyleArg::Style(TRACE_STYLE.to_string()));
                self.push_text(&format!("(@ {})", trace));
            }
        }
    }

    fn finish(self) -> Record {
        if self.styling {
            Record::Styled { format: self.buf, args: self.args }
        } else {
            Record::Plain(self.pieces)
        }
    }
}
