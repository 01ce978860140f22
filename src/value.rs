use std::fmt;
use std::sync::Arc;

use serde::ser::{Error as _, Serialize, Serializer};

/// Values that can be interpolated into a log message.
///
/// Primitives are serialized inline. Anything structured or callable is a
/// [`RichValue`] and travels next to the message as an opaque argument, the
/// way a console receives an object for a `%o` directive.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    /// Non-finite floats have no JSON form and are stored as [`Value::Null`].
    Number(serde_json::Number),
    Text(Arc<str>),
    Rich(RichValue),
}

/// An opaque, reference-counted value that is never rendered inline.
///
/// Two rich values are the same only if they share the same allocation.
#[derive(Clone)]
pub struct RichValue(Arc<dyn fmt::Debug + Send + Sync>);

impl RichValue {
    pub fn new<T: fmt::Debug + Send + Sync + 'static>(value: T) -> Self {
        Self(Arc::new(value))
    }

    pub fn from_arc(value: Arc<dyn fmt::Debug + Send + Sync>) -> Self {
        Self(value)
    }

    /// Reference identity, not structural equality.
    pub fn ptr_eq(&self, other: &RichValue) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }
}

impl fmt::Debug for RichValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Value {
    /// Wraps any debuggable value as a rich, out-of-band argument.
    pub fn rich<T: fmt::Debug + Send + Sync + 'static>(value: T) -> Self {
        Value::Rich(RichValue::new(value))
    }

    pub fn is_rich(&self) -> bool {
        matches!(self, Value::Rich(_))
    }

    /// Identity comparison used for change detection between renders.
    ///
    /// Primitives compare by value, rich values by reference.
    pub fn same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Rich(a), Value::Rich(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Inline textual form: JSON for primitives, the display form if
    /// serialization fails.
    pub fn to_inline(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|err| {
            tracing::trace!(%err, "value is not serializable, coercing");
            self.to_string()
        })
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => n.serialize(serializer),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Rich(_) => Err(S::Error::custom("rich values have no inline form")),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
            Value::Rich(r) => write!(f, "{:?}", r),
        }
    }
}

impl From<RichValue> for Value {
    fn from(value: RichValue) -> Self {
        Value::Rich(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(Arc::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(Arc::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value).map_or(Value::Null, Value::Number)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::from(f64::from(value))
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Value::Number(serde_json::Number::from(value))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
