use std::fmt;

use crate::value::{RichValue, Value};

/// Directive that consumes a style payload.
pub const STYLE_DIRECTIVE: &str = "%c";
/// Directive that consumes an opaque value.
pub const VALUE_DIRECTIVE: &str = "%o";
/// A literal percent sign inside a format string.
pub const ESCAPED_PERCENT: &str = "%%";

/// A payload consumed by one directive of a styled record.
#[derive(Debug, Clone)]
pub enum StyleArg {
    /// Style declarations for a `%c` directive.
    Style(String),
    /// Opaque value for a `%o` directive, passed through uninterpreted.
    Value(RichValue),
}

/// One piece of a record whose styling has been disabled.
#[derive(Debug, Clone)]
pub enum Piece {
    Text(String),
    Value(Value),
}

/// One formatted log line, ready for a sink.
///
/// Mirrors the argument list of a console logging call: either a format
/// string followed by one payload per directive, or a list of plain pieces
/// that the console joins with spaces.
#[derive(Debug, Clone)]
pub enum Record {
    Styled { format: String, args: Vec<StyleArg> },
    Plain(Vec<Piece>),
}

impl Record {
    /// The format string, if this record is styled.
    pub fn format(&self) -> Option<&str> {
        match self {
            Record::Styled { format, .. } => Some(format),
            Record::Plain(_) => None,
        }
    }

    /// Payloads following the format string.
    pub fn args(&self) -> &[StyleArg] {
        match self {
            Record::Styled { args, .. } => args,
            Record::Plain(_) => &[],
        }
    }

    /// Number of `%c` and `%o` directives in the format string. `%%` is an
    /// escaped percent, not a directive.
    pub fn directive_count(&self) -> usize {
        let Some(mut rest) = self.format() else { return 0 };
        let mut count = 0;
        while let Some(pos) = rest.find('%') {
            let directive = &rest[pos..];
            if directive.starts_with(STYLE_DIRECTIVE) || directive.starts_with(VALUE_DIRECTIVE) {
                count += 1;
            }
            let mut after = directive[1..].chars();
            after.next();
            rest = after.as_str();
        }
        count
    }

    /// Rich values carried next to the text, in order.
    pub fn rich_values(&self) -> Vec<&RichValue> {
        match self {
            Record::Styled { args, .. } => args
                .iter()
                .filter_map(|arg| match arg {
                    StyleArg::Value(v) => Some(v),
                    StyleArg::Style(_) => None,
                })
                .collect(),
            Record::Plain(pieces) => pieces
                .iter()
                .filter_map(|piece| match piece {
                    Piece::Value(Value::Rich(v)) => Some(v),
                    _ => None,
                })
                .collect(),
        }
    }
}

impl fmt::Display for Record {
    /// Renders the record as a console would print it: `%c` consumes its
    /// style, `%o` prints its value and `%%` prints a percent sign. Plain
    /// pieces are joined by one space.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Record::Styled { format, args } => {
                let mut args = args.iter();
                let mut rest = format.as_str();
                while let Some(pos) = rest.find('%') {
                    f.write_str(&rest[..pos])?;
                    let directive = &rest[pos..];
                    if directive.starts_with(ESCAPED_PERCENT) {
                        f.write_str("%")?;
                        rest = &directive[ESCAPED_PERCENT.len()..];
                    } else if directive.starts_with(STYLE_DIRECTIVE) {
                        args.next();
                        rest = &directive[STYLE_DIRECTIVE.len()..];
                    } else if directive.starts_with(VALUE_DIRECTIVE) {
                        match args.next() {
                            Some(StyleArg::Value(v)) => write!(f, "{:?}", v)?,
                            Some(StyleArg::Style(_)) | None => f.write_str(VALUE_DIRECTIVE)?,
                        }
                        rest = &directive[VALUE_DIRECTIVE.len()..];
                    } else {
                        f.write_str("%")?;
                        rest = &directive[1..];
                    }
                }
                f.write_str(rest)
            }
            Record::Plain(pieces) => {
                for (i, piece) in pieces.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    match piece {
                        Piece::Text(text) => f.write_str(text)?,
                        Piece::Value(value) => write!(f, "{}", value)?,
                    }
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_styled_display_substitutes_directives() {
        let record = Record::Styled {
            format: "%cbold%c and %o, 100%%".to_string(),
            args: vec![
                StyleArg::Style("font-weight: bold;".into()),
                StyleArg::Style("font-weight: normal;".into()),
                StyleArg::Value(RichValue::new(vec![1, 2])),
            ],
        };
        assert_eq!(record.directive_count(), 3);
        assert_eq!(record.to_string(), "bold and [1, 2], 100%");
    }

    #[test]
    fn test_escaped_percent_is_not_a_directive() {
        let record = Record::Styled {
            format: "50%%off %o, 20%%%c".to_string(),
            args: vec![
                StyleArg::Value(RichValue::new("USER")),
                StyleArg::Style("color: red;".into()),
            ],
        };
        assert_eq!(record.directive_count(), 2);
        assert_eq!(record.to_string(), "50%off \"USER\", 20%");
    }

    #[test]
    fn test_plain_display_joins_with_spaces() {
        let record = Record::Plain(vec![
            Piece::Text("a is".into()),
            Piece::Value(Value::from(1)),
            Piece::Text("\"b\"".into()),
        ]);
        assert_eq!(record.to_string(), "a is 1 \"b\"");
        assert_eq!(record.directive_count(), 0);
    }
}
