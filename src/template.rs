use crate::value::Value;

/// A message made of literal segments interleaved with values.
///
/// Value `i` is emitted right after segment `i`. A well-formed message has
/// one more segment than it has values; extra values are ignored.
#[derive(Debug, Clone, Default)]
pub struct Message {
    pub segments: Vec<String>,
    pub values: Vec<Value>,
}

impl Message {
    pub fn new(segments: Vec<String>, values: Vec<Value>) -> Self {
        Self { segments, values }
    }

    /// A message without values.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(vec![text.into()], Vec::new())
    }

    /// Builds a message from a `{}` template. `{{` and `}}` are literal
    /// braces. Placeholders without a value are kept as literal `{}`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use lifecycle_logger::template::Message;
    /// # use lifecycle_logger::Value;
    /// let message = Message::from_template("x = {}, {{y}}", vec![Value::from(1)]);
    /// assert_eq!(message.segments, vec!["x = ".to_string(), ", {y}".to_string()]);
    /// ```
    pub fn from_template(template: &str, values: Vec<Value>) -> Self {
        let mut segments = Vec::with_capacity(values.len() + 1);
        let mut current = String::new();
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            match (c, chars.peek().copied()) {
                ('{', Some('{')) | ('}', Some('}')) => {
                    chars.next();
                    current.push(c);
                }
                ('{', Some('}')) => {
                    chars.next();
                    if segments.len() < values.len() {
                        segments.push(std::mem::take(&mut current));
                    } else {
                        current.push_str("{}");
                    }
                }
                _ => current.push(c),
            }
        }
        segments.push(current);

        let mut values = values;
        values.truncate(segments.len() - 1);
        Self { segments, values }
    }

    /// The message used for a bare list of values: `a, b, c`.
    pub fn from_values(values: Vec<Value>) -> Self {
        let mut segments: Vec<String> = (0..values.len())
            .map(|i| if i > 0 { ", ".to_string() } else { String::new() })
            .collect();
        segments.push(String::new());
        Self { segments, values }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

// Helper functions for compile-time template checks
#[doc(hidden)]
pub const fn validate_template(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'{' => {
                if i + 1 < bytes.len() && (bytes[i + 1] == b'{' || bytes[i + 1] == b'}') {
                    i += 2;
                    continue;
                }
                return false; // Only `{}` placeholders are supported
            }
            b'}' => {
                if i + 1 < bytes.len() && bytes[i + 1] == b'}' {
                    i += 2;
                    continue;
                }
                return false; // Unmatched closing brace
            }
            _ => {}
        }
        i += 1;
    }
    true
}

#[doc(hidden)]
pub const fn placeholder_count(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut i = 0;
    let mut count = 0;

    while i + 1 < bytes.len() {
        if bytes[i] == b'{' && bytes[i + 1] == b'}' {
            count += 1;
            i += 2;
        } else if (bytes[i] == b'{' && bytes[i + 1] == b'{')
            || (bytes[i] == b'}' && bytes[i + 1] == b'}')
        {
            i += 2;
        } else {
            i += 1;
        }
    }
    count
}

/// Builds a [`Message`] from a template literal, checking at compile time
/// that the template is well formed and that the argument count matches.
///
/// # Examples
///
/// ```
/// # use lifecycle_logger::message;
/// let message = message!("The answer is {}", 42);
/// assert_eq!(message.segments.len(), 2);
/// assert_eq!(message.values.len(), 1);
/// ```
#[macro_export]
macro_rules! message {
    ($template:literal $(, $arg:expr)* $(,)?) => {{
        const _: () = assert!($crate::template::validate_template($template));
        const _: () = assert!(
            $crate::template::placeholder_count($template)
                == 0usize $(+ { let _ = stringify!($arg); 1usize })*,
            "placeholder count does not match argument count"
        );
        $crate::template::Message::from_template($template, vec![$($crate::Value::from($arg)),*])
    }};
}
