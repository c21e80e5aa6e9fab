//! Primitive types and call-time values.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Scalar types a parameter, property or mapped column can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveType {
    /// Boolean.
    Bool,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point.
    Float64,
    /// UTF-8 string.
    String,
    /// Raw bytes.
    Bytes,
    /// Date (stored as days since epoch).
    Date,
    /// Timestamp (stored as microseconds since epoch).
    Timestamp,
}

impl PrimitiveType {
    /// Returns the name of the type as shown in error messages.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveType::Bool => "bool",
            PrimitiveType::Int32 => "i32",
            PrimitiveType::Int64 => "i64",
            PrimitiveType::Float64 => "f64",
            PrimitiveType::String => "String",
            PrimitiveType::Bytes => "Bytes",
            PrimitiveType::Date => "Date",
            PrimitiveType::Timestamp => "Timestamp",
        }
    }

    /// Returns whether this type is numeric.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            PrimitiveType::Int32 | PrimitiveType::Int64 | PrimitiveType::Float64
        )
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Field values of a bean (struct) argument.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BeanValue {
    /// Name of the bean type the value was built from.
    pub type_name: String,
    fields: BTreeMap<String, Value>,
}

impl BeanValue {
    /// Creates an empty bean value of the named type.
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        BeanValue {
            type_name: type_name.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Sets a field value.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Gets a field value by name.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns an iterator over the fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }
}

/// Call-time argument value.
///
/// Lists, sets and arrays all travel as [`Value::List`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 32-bit signed integer value.
    Int32(i32),
    /// 64-bit signed integer value.
    Int64(i64),
    /// 64-bit floating point value.
    Float64(f64),
    /// String value.
    String(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// Date value (days since Unix epoch).
    Date(i32),
    /// Timestamp value (microseconds since Unix epoch).
    Timestamp(i64),
    /// Bean (struct) value.
    Bean(BeanValue),
    /// Collection value.
    List(Vec<Value>),
}

// Manual Eq implementation because f64 doesn't implement Eq
impl Eq for Value {}

impl Value {
    /// Returns true if this value is null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Attempts to extract the elements of a collection value.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Attempts to extract a bean value.
    #[must_use]
    pub fn as_bean(&self) -> Option<&BeanValue> {
        match self {
            Value::Bean(bean) => Some(bean),
            _ => None,
        }
    }

    /// Attempts to extract a string reference.
    #[must_use]
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns a short description of the value's shape for error messages.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int32(_) => "i32",
            Value::Int64(_) => "i64",
            Value::Float64(_) => "f64",
            Value::String(_) => "String",
            Value::Bytes(_) => "Bytes",
            Value::Date(_) => "Date",
            Value::Timestamp(_) => "Timestamp",
            Value::Bean(_) => "bean",
            Value::List(_) => "collection",
        }
    }

    /// Tests the value as a directive condition.
    ///
    /// Null, false, zero, the empty string and empty collections are false.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int32(i) | Value::Date(i) => *i != 0,
            Value::Int64(i) | Value::Timestamp(i) => *i != 0,
            Value::Float64(f) => *f != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Bytes(b) => !b.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Bean(_) => true,
        }
    }

    /// Compares two values, promoting integers to a common width.
    ///
    /// Returns None if either value is null or types don't match.
    #[must_use]
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int32(a), Value::Int32(b)) | (Value::Date(a), Value::Date(b)) => {
                Some(a.cmp(b))
            }
            (Value::Int64(a), Value::Int64(b))
            | (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
            (Value::Int32(a), Value::Int64(b)) => Some(i64::from(*a).cmp(b)),
            (Value::Int64(a), Value::Int32(b)) => Some(a.cmp(&i64::from(*b))),
            (Value::Float64(a), Value::Float64(b)) => a.partial_cmp(b),
            (Value::Float64(a), b) => b.as_f64().and_then(|b| a.partial_cmp(&b)),
            (a, Value::Float64(b)) => a.as_f64().and_then(|a| a.partial_cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            // Null or type mismatch
            _ => None,
        }
    }

    /// Tests equality for directive conditions; null equals only null.
    #[must_use]
    pub fn loosely_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Null, _) | (_, Value::Null) => false,
            _ => match self.compare(other) {
                Some(ordering) => ordering == Ordering::Equal,
                None => self == other,
            },
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int32(i) => Some(f64::from(*i)),
            Value::Int64(i) => Some(*i as f64),
            Value::Float64(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int32(i) | Value::Date(i) => write!(f, "{i}"),
            Value::Int64(i) | Value::Timestamp(i) => write!(f, "{i}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::String(s) => f.write_str(s),
            Value::Bytes(bytes) => {
                for byte in bytes {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
            Value::Bean(bean) => {
                write!(f, "{}{{", bean.type_name)?;
                for (i, (name, value)) in bean.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}={value}")?;
                }
                f.write_str("}")
            }
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<BeanValue> for Value {
    fn from(v: BeanValue) -> Self {
        Value::Bean(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
