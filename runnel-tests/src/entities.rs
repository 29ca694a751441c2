use runnel_core::{
    Column, Error, Field, Result, RowLabeled, RowNames, Table, TableBinding, Value,
};
use std::sync::Arc;

/// A museum guest. The `id` column is a generated primary key.
#[derive(Debug, Clone, PartialEq)]
pub struct Guest {
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub email: Option<String>,
}

/// An entry ticket with two generated columns, `id` and `seq`.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticket {
    pub id: i64,
    pub seq: i64,
    pub holder: String,
}

/// An append only audit line; the table has no primary key.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditRecord {
    pub message: String,
    pub level: i64,
}

fn require_i64(value: Value) -> Result<i64> {
    value
        .as_i64()
        .ok_or_else(|| Error::msg(format!("Expected an integer, got {}", value)))
}

fn require_string(value: Value) -> Result<String> {
    match value {
        Value::Varchar(Some(text)) => Ok(text),
        other => Err(Error::msg(format!("Expected a string, got {}", other))),
    }
}

fn optional_string(value: Value) -> Result<Option<String>> {
    if value.is_null() {
        return Ok(None);
    }
    require_string(value).map(Some)
}

pub fn guest_table() -> Table {
    Table::new("app", "guest")
        .with_column(
            Column::new("id", 1, Value::Int64(None))
                .auto_increment(true)
                .type_name("BIGINT"),
        )
        .with_column(Column::new("name", 2, Value::Varchar(None)).type_name("VARCHAR"))
        .with_column(Column::new("age", 3, Value::Int64(None)).type_name("BIGINT"))
        .with_column(
            Column::new("email", 4, Value::Varchar(None))
                .nullable(true)
                .type_name("VARCHAR"),
        )
        .with_primary_key("id")
}

pub fn guest_id_field() -> Field<Guest> {
    Field::new(
        "id",
        |g| g.id.into(),
        |g, v| {
            g.id = require_i64(v)?;
            Ok(())
        },
    )
}

pub fn guest_name_field() -> Field<Guest> {
    Field::new(
        "name",
        |g| g.name.as_str().into(),
        |g, v| {
            g.name = require_string(v)?;
            Ok(())
        },
    )
}

pub fn guest_age_field() -> Field<Guest> {
    Field::new(
        "age",
        |g| g.age.into(),
        |g, v| {
            g.age = require_i64(v)?;
            Ok(())
        },
    )
}

pub fn guest_email_field() -> Field<Guest> {
    Field::new(
        "email",
        |g| g.email.clone().into(),
        |g, v| {
            g.email = optional_string(v)?;
            Ok(())
        },
    )
}

pub fn guest_from_row(row: &RowLabeled) -> Result<Guest> {
    Ok(Guest {
        id: require_i64(row.require_column("id")?.clone())?,
        name: require_string(row.require_column("name")?.clone())?,
        age: require_i64(row.require_column("age")?.clone())?,
        email: optional_string(row.require_column("email")?.clone())?,
    })
}

pub fn guest_binding() -> Arc<TableBinding<Guest>> {
    Arc::new(
        TableBinding::new(
            Arc::new(guest_table()),
            vec![
                guest_id_field(),
                guest_name_field(),
                guest_age_field(),
                guest_email_field(),
            ],
            guest_from_row,
        )
        .expect("The guest binding is well formed"),
    )
}

pub fn guest_row(id: i64, name: &str, age: i64, email: Option<&str>) -> RowLabeled {
    let labels: RowNames = ["id", "name", "age", "email"]
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .into();
    RowLabeled::new(
        labels,
        vec![
            Value::Int64(Some(id)),
            Value::Varchar(Some(name.to_owned())),
            Value::Int64(Some(age)),
            Value::Varchar(email.map(str::to_owned)),
        ]
        .into_boxed_slice(),
    )
}

/// A single column, single row result as a COUNT query would produce it.
pub fn count_row(count: i64) -> RowLabeled {
    let labels: RowNames = vec!["count".to_string()].into();
    RowLabeled::new(labels, vec![Value::Int64(Some(count))].into_boxed_slice())
}

pub fn ticket_table() -> Table {
    Table::new("app", "ticket")
        .with_column(
            Column::new("id", 1, Value::Int64(None))
                .auto_increment(true)
                .type_name("BIGINT"),
        )
        .with_column(
            Column::new("seq", 2, Value::Int32(None))
                .auto_increment(true)
                .type_name("INTEGER"),
        )
        .with_column(Column::new("holder", 3, Value::Varchar(None)).type_name("VARCHAR"))
        .with_primary_key("id")
}

pub fn ticket_binding() -> Arc<TableBinding<Ticket>> {
    Arc::new(
        TableBinding::new(
            Arc::new(ticket_table()),
            vec![
                Field::new(
                    "id",
                    |t: &Ticket| t.id.into(),
                    |t, v| {
                        t.id = require_i64(v)?;
                        Ok(())
                    },
                ),
                Field::new(
                    "seq",
                    |t: &Ticket| t.seq.into(),
                    |t, v| {
                        t.seq = require_i64(v)?;
                        Ok(())
                    },
                ),
                Field::new(
                    "holder",
                    |t: &Ticket| t.holder.as_str().into(),
                    |t, v| {
                        t.holder = require_string(v)?;
                        Ok(())
                    },
                ),
            ],
            |row| {
                Ok(Ticket {
                    id: require_i64(row.require_column("id")?.clone())?,
                    seq: require_i64(row.require_column("seq")?.clone())?,
                    holder: require_string(row.require_column("holder")?.clone())?,
                })
            },
        )
        .expect("The ticket binding is well formed"),
    )
}

pub fn audit_table() -> Table {
    Table::new("app", "audit_record")
        .with_column(Column::new("message", 1, Value::Varchar(None)).type_name("VARCHAR"))
        .with_column(Column::new("level", 2, Value::Int64(None)).type_name("BIGINT"))
}

pub fn audit_binding() -> Arc<TableBinding<AuditRecord>> {
    Arc::new(
        TableBinding::new(
            Arc::new(audit_table()),
            vec![
                Field::new(
                    "message",
                    |a: &AuditRecord| a.message.as_str().into(),
                    |a, v| {
                        a.message = require_string(v)?;
                        Ok(())
                    },
                ),
                Field::new(
                    "level",
                    |a: &AuditRecord| a.level.into(),
                    |a, v| {
                        a.level = require_i64(v)?;
                        Ok(())
                    },
                ),
            ],
            |row| {
                Ok(AuditRecord {
                    message: require_string(row.require_column("message")?.clone())?,
                    level: require_i64(row.require_column("level")?.clone())?,
                })
            },
        )
        .expect("The audit binding is well formed"),
    )
}
