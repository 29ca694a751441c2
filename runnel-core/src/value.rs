use crate::{Error, Result};
use rust_decimal::{Decimal, prelude::FromPrimitive, prelude::ToPrimitive};
use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use time::{Date, PrimitiveDateTime, Time};
use uuid::Uuid;

macro_rules! write_integer {
    ($f:ident, $value:expr) => {{
        let mut buffer = itoa::Buffer::new();
        $f.write_str(buffer.format($value))
    }};
}
macro_rules! write_float {
    ($f:ident, $value:expr) => {{
        let mut buffer = ryu::Buffer::new();
        $f.write_str(buffer.format($value))
    }};
}

/// Dynamically typed database value used for query parameters and result rows.
///
/// Every data variant carries an `Option` payload so a typed NULL stays
/// distinguishable from an untyped one.
#[derive(Default, Debug, Clone, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Boolean(Option<bool>),
    Int8(Option<i8>),
    Int16(Option<i16>),
    Int32(Option<i32>),
    Int64(Option<i64>),
    Float32(Option<f32>),
    Float64(Option<f64>),
    Decimal(Option<Decimal>),
    Varchar(Option<String>),
    Blob(Option<Box<[u8]>>),
    Date(Option<Date>),
    Time(Option<Time>),
    Timestamp(Option<PrimitiveDateTime>),
    Uuid(Option<Uuid>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Boolean(v) => v.is_none(),
            Value::Int8(v) => v.is_none(),
            Value::Int16(v) => v.is_none(),
            Value::Int32(v) => v.is_none(),
            Value::Int64(v) => v.is_none(),
            Value::Float32(v) => v.is_none(),
            Value::Float64(v) => v.is_none(),
            Value::Decimal(v) => v.is_none(),
            Value::Varchar(v) => v.is_none(),
            Value::Blob(v) => v.is_none(),
            Value::Date(v) => v.is_none(),
            Value::Time(v) => v.is_none(),
            Value::Timestamp(v) => v.is_none(),
            Value::Uuid(v) => v.is_none(),
        }
    }

    pub fn same_type(&self, other: &Self) -> bool {
        core::mem::discriminant(self) == core::mem::discriminant(other)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Boolean(..) => "BOOLEAN",
            Value::Int8(..) => "TINYINT",
            Value::Int16(..) => "SMALLINT",
            Value::Int32(..) => "INTEGER",
            Value::Int64(..) => "BIGINT",
            Value::Float32(..) => "REAL",
            Value::Float64(..) => "DOUBLE",
            Value::Decimal(..) => "DECIMAL",
            Value::Varchar(..) => "VARCHAR",
            Value::Blob(..) => "BLOB",
            Value::Date(..) => "DATE",
            Value::Time(..) => "TIME",
            Value::Timestamp(..) => "TIMESTAMP",
            Value::Uuid(..) => "UUID",
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int8(Some(v)) => Some(*v as i64),
            Value::Int16(Some(v)) => Some(*v as i64),
            Value::Int32(Some(v)) => Some(*v as i64),
            Value::Int64(Some(v)) => Some(*v),
            Value::Boolean(Some(v)) => Some(*v as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float32(Some(v)) => Some(*v as f64),
            Value::Float64(Some(v)) => Some(*v),
            Value::Decimal(Some(v)) => v.to_f64(),
            _ => self.as_i64().map(|v| v as f64),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Varchar(Some(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(Some(v)) => Some(*v),
            Value::Int8(Some(v)) => Some(*v != 0),
            Value::Int16(Some(v)) => Some(*v != 0),
            Value::Int32(Some(v)) => Some(*v != 0),
            Value::Int64(Some(v)) => Some(*v != 0),
            _ => None,
        }
    }

    /// Total-ish order used by client side range predicates and field sorts.
    ///
    /// NULL sorts before any present value. Numeric variants compare across
    /// widths, everything else compares within its own variant only.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self.is_null(), other.is_null()) {
            (true, true) => return Some(Ordering::Equal),
            (true, false) => return Some(Ordering::Less),
            (false, true) => return Some(Ordering::Greater),
            (false, false) => {}
        }
        if let (Some(l), Some(r)) = (self.as_i64(), other.as_i64()) {
            return Some(l.cmp(&r));
        }
        if let (Some(l), Some(r)) = (self.as_f64(), other.as_f64()) {
            return l.partial_cmp(&r);
        }
        match (self, other) {
            (Value::Varchar(Some(l)), Value::Varchar(Some(r))) => Some(l.cmp(r)),
            (Value::Blob(Some(l)), Value::Blob(Some(r))) => Some(l.cmp(r)),
            (Value::Date(Some(l)), Value::Date(Some(r))) => Some(l.cmp(r)),
            (Value::Time(Some(l)), Value::Time(Some(r))) => Some(l.cmp(r)),
            (Value::Timestamp(Some(l)), Value::Timestamp(Some(r))) => Some(l.cmp(r)),
            (Value::Uuid(Some(l)), Value::Uuid(Some(r))) => Some(l.cmp(r)),
            (Value::Decimal(Some(l)), Value::Decimal(Some(r))) => Some(l.cmp(r)),
            _ => None,
        }
    }

    /// Convert a raw generated key into the variant declared by `template`.
    ///
    /// Generated keys reach the engine as `i64`; the owning column decides the
    /// actual width. Narrowing overflow and non integer targets are errors.
    pub fn cast_generated_key(template: &Value, key: i64) -> Result<Value> {
        Ok(match template {
            Value::Int8(..) => Value::Int8(Some(i8::try_from(key).map_err(|_| {
                Error::msg(format!("Generated key {} does not fit in TINYINT", key))
            })?)),
            Value::Int16(..) => Value::Int16(Some(i16::try_from(key).map_err(|_| {
                Error::msg(format!("Generated key {} does not fit in SMALLINT", key))
            })?)),
            Value::Int32(..) => Value::Int32(Some(i32::try_from(key).map_err(|_| {
                Error::msg(format!("Generated key {} does not fit in INTEGER", key))
            })?)),
            Value::Int64(..) => Value::Int64(Some(key)),
            Value::Decimal(..) => Value::Decimal(Decimal::from_i64(key)),
            other => {
                return Err(Error::msg(format!(
                    "Cannot assign a generated key to a column of type {}",
                    other.type_name()
                )));
            }
        })
    }
}

macro_rules! impl_value_from {
    ($type:ty => $variant:ident) => {
        impl From<$type> for Value {
            fn from(value: $type) -> Self {
                Value::$variant(Some(value))
            }
        }
        impl From<Option<$type>> for Value {
            fn from(value: Option<$type>) -> Self {
                Value::$variant(value)
            }
        }
    };
}

impl_value_from!(bool => Boolean);
impl_value_from!(i8 => Int8);
impl_value_from!(i16 => Int16);
impl_value_from!(i32 => Int32);
impl_value_from!(i64 => Int64);
impl_value_from!(f32 => Float32);
impl_value_from!(f64 => Float64);
impl_value_from!(Decimal => Decimal);
impl_value_from!(String => Varchar);
impl_value_from!(Date => Date);
impl_value_from!(Time => Time);
impl_value_from!(PrimitiveDateTime => Timestamp);
impl_value_from!(Uuid => Uuid);

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Varchar(Some(value.to_owned()))
    }
}

impl From<Option<&str>> for Value {
    fn from(value: Option<&str>) -> Self {
        Value::Varchar(value.map(str::to_owned))
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Blob(Some(value.into_boxed_slice()))
    }
}

/// Renders a SQL-literal-ish representation, for logging only. Execution
/// always binds parameters, it never inlines values into statement text.
impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            v if v.is_null() => f.write_str("NULL"),
            Value::Boolean(Some(v)) => f.write_str(["false", "true"][*v as usize]),
            Value::Int8(Some(v)) => write_integer!(f, *v),
            Value::Int16(Some(v)) => write_integer!(f, *v),
            Value::Int32(Some(v)) => write_integer!(f, *v),
            Value::Int64(Some(v)) => write_integer!(f, *v),
            Value::Float32(Some(v)) => write_float!(f, *v),
            Value::Float64(Some(v)) => write_float!(f, *v),
            Value::Decimal(Some(v)) => write!(f, "{}", v),
            Value::Varchar(Some(v)) => {
                f.write_str("'")?;
                let mut position = 0;
                for (i, c) in v.char_indices() {
                    if c == '\'' {
                        f.write_str(&v[position..i])?;
                        f.write_str("''")?;
                        position = i + 1;
                    }
                }
                f.write_str(&v[position..])?;
                f.write_str("'")
            }
            Value::Blob(Some(v)) => {
                f.write_str("X'")?;
                for b in v.iter() {
                    write!(f, "{:02X}", b)?;
                }
                f.write_str("'")
            }
            Value::Date(Some(v)) => write!(
                f,
                "'{:04}-{:02}-{:02}'",
                v.year(),
                v.month() as u8,
                v.day()
            ),
            Value::Time(Some(v)) => {
                write!(f, "'{:02}:{:02}:{:02}'", v.hour(), v.minute(), v.second())
            }
            Value::Timestamp(Some(v)) => write!(
                f,
                "'{:04}-{:02}-{:02}T{:02}:{:02}:{:02}'",
                v.year(),
                v.month() as u8,
                v.day(),
                v.hour(),
                v.minute(),
                v.second()
            ),
            Value::Uuid(Some(v)) => write!(f, "'{}'", v),
            _ => f.write_str("NULL"),
        }
    }
}
