use crate::{
    DbmsType, EntityStream, Error, Filter, OperationHandler, OptimizerComponent, Result,
    SubSelectAlias, TableBinding,
};
use std::sync::Arc;

/// Produces entity streams over one table: precompiles the base
/// `SELECT <enabled columns> FROM <table>` statement once, then binds each
/// stream to an asynchronous query execution at terminal time.
pub struct SqlStreamSupplier<E> {
    pub(crate) binding: Arc<TableBinding<E>>,
    pub(crate) dbms: Arc<dyn DbmsType>,
    pub(crate) optimizers: Arc<OptimizerComponent>,
    pub(crate) select_sql: String,
    pub(crate) count_sql: String,
}

impl<E> SqlStreamSupplier<E>
where
    E: Send + 'static,
{
    pub fn new(binding: Arc<TableBinding<E>>, dbms: Arc<dyn DbmsType>) -> Self {
        Self::with_optimizers(binding, dbms, Arc::new(OptimizerComponent::new()))
    }

    pub fn with_optimizers(
        binding: Arc<TableBinding<E>>,
        dbms: Arc<dyn DbmsType>,
        optimizers: Arc<OptimizerComponent>,
    ) -> Self {
        let table = binding.table();
        let naming = dbms.naming();
        let schema = if dbms.has_schema_names() {
            table.schema.as_str()
        } else {
            ""
        };
        let full_name = naming.full_name_of(schema, &table.name);
        let mut columns = String::new();
        for (i, column) in table.enabled_columns().iter().enumerate() {
            if i > 0 {
                columns.push_str(", ");
            }
            columns.push_str(&naming.enclose_field(&column.name));
        }
        let select_sql = format!("SELECT {} FROM {}", columns, full_name);
        let count_sql = format!("SELECT COUNT(*) FROM {}", full_name);
        Self {
            binding,
            dbms,
            optimizers,
            select_sql,
            count_sql,
        }
    }

    pub fn binding(&self) -> &Arc<TableBinding<E>> {
        &self.binding
    }

    pub fn select_sql(&self) -> &str {
        &self.select_sql
    }

    /// Opens a lazy entity stream; nothing executes until a terminal
    /// operation is invoked on it.
    pub fn stream<'h, H: OperationHandler>(&'h self, handler: &'h H) -> EntityStream<'h, E, H> {
        EntityStream::new(self, handler)
    }

    /// Convenience filter plus find-first pair; no ordering guarantee among
    /// matches.
    pub async fn find_any<H: OperationHandler>(
        &self,
        handler: &H,
        filter: Filter<E>,
    ) -> Result<Option<E>> {
        self.stream(handler).filter(filter).find_first().await
    }

    /// Issues the precompiled `SELECT COUNT(*)`; a size-only query cannot be
    /// derived from the main SELECT without re-executing it.
    pub async fn sql_count<H: OperationHandler>(&self, handler: &H) -> Result<u64> {
        count_query(handler, self.count_sql.clone(), Vec::new()).await
    }

    /// Wraps an already rendered SELECT into a counting sub-select, aliased
    /// according to the dialect's policy.
    pub(crate) fn count_over(&self, select: &str) -> String {
        match self.dbms.sub_select_alias() {
            SubSelectAlias::Required => format!("SELECT COUNT(*) FROM ({}) AS A", select),
            SubSelectAlias::Prohibited => format!("SELECT COUNT(*) FROM ({})", select),
        }
    }
}

pub(crate) async fn count_query<H: OperationHandler>(
    handler: &H,
    sql: String,
    params: Vec<crate::Value>,
) -> Result<u64> {
    let rows = handler.execute_query(sql, params).await?;
    let count = rows
        .first()
        .and_then(|row| row.values().first())
        .and_then(|value| value.as_i64())
        .ok_or_else(|| Error::msg("The count query did not return a numeric value"))?;
    Ok(count as u64)
}
