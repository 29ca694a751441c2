use crate::{Error, Field, Result, RowLabeled, Table};
use std::sync::Arc;

/// The per table bundle the engine consumes: the table document node, the
/// field bindings and the row to entity mapping function. Resolved once at
/// startup, immutable afterwards; normally produced by generated manager
/// code.
pub struct TableBinding<E> {
    table: Arc<Table>,
    fields: Vec<Field<E>>,
    from_row: fn(&RowLabeled) -> Result<E>,
}

impl<E> TableBinding<E> {
    /// Validates the table document and checks every field resolves to one of
    /// its columns. Failures are configuration faults.
    pub fn new(
        table: Arc<Table>,
        fields: Vec<Field<E>>,
        from_row: fn(&RowLabeled) -> Result<E>,
    ) -> Result<Self> {
        table.validate()?;
        for field in &fields {
            if table.column(field.name()).is_none() {
                return Err(Error::msg(format!(
                    "Field `{}` does not resolve to a column of table `{}`",
                    field.name(),
                    table.name
                )));
            }
        }
        Ok(Self {
            table,
            fields,
            from_row,
        })
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn fields(&self) -> &[Field<E>] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field<E>> {
        self.fields.iter().find(|f| f.name() == name)
    }

    pub fn map_row(&self, row: &RowLabeled) -> Result<E> {
        (self.from_row)(row)
    }
}
