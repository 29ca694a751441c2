use runnel_core::{Error, Result, TypeMapper, Value};
use uuid::Uuid;

/// SQLite stores booleans as INTEGER 0/1.
#[derive(Debug, Default, Clone, Copy)]
pub struct BooleanAsInteger;

impl TypeMapper for BooleanAsInteger {
    fn to_database(&self, value: Value) -> Value {
        match value {
            Value::Boolean(v) => Value::Int64(v.map(|b| b as i64)),
            other => other,
        }
    }

    fn to_entity(&self, value: Value) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Boolean(None));
        }
        value
            .as_bool()
            .map(|b| Value::Boolean(Some(b)))
            .ok_or_else(|| {
                Error::msg(format!(
                    "Cannot read a boolean out of a {} column value",
                    value.type_name()
                ))
            })
    }
}

/// SQLite has no native UUID type, values travel as TEXT.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidAsText;

impl TypeMapper for UuidAsText {
    fn to_database(&self, value: Value) -> Value {
        match value {
            Value::Uuid(v) => Value::Varchar(v.map(|u| u.to_string())),
            other => other,
        }
    }

    fn to_entity(&self, value: Value) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Uuid(None));
        }
        let text = value.as_str().ok_or_else(|| {
            Error::msg(format!(
                "Cannot read a UUID out of a {} column value",
                value.type_name()
            ))
        })?;
        let uuid = Uuid::parse_str(text)
            .map_err(|e| Error::msg(format!("Malformed UUID `{}`: {}", text, e)))?;
        Ok(Value::Uuid(Some(uuid)))
    }
}
