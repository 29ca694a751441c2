use crate::{DbmsType, Error, OperationHandler, Result, TableBinding, Value};
use std::sync::Arc;

struct GeneratedKeyField {
    /// Index into the binding's field list.
    field: usize,
    /// Type template of the owning column.
    template: Value,
}

/// Per table INSERT/UPDATE/DELETE compiler and executor.
///
/// Statement text is precompiled once at construction from the enabled,
/// dialect-inclusion-filtered, ordinal-sorted column lists. Operations are
/// generic over the [`OperationHandler`] so the same provider runs against
/// the pool or inside an explicitly passed transaction.
pub struct PersistenceProvider<E> {
    binding: Arc<TableBinding<E>>,
    insert_sql: String,
    insert_fields: Vec<usize>,
    generated_key_columns: Vec<String>,
    generated_fields: Vec<GeneratedKeyField>,
    update_sql: Option<String>,
    update_fields: Vec<usize>,
    delete_sql: Option<String>,
    pk_fields: Vec<usize>,
}

impl<E> PersistenceProvider<E> {
    pub fn new(binding: Arc<TableBinding<E>>, dbms: Arc<dyn DbmsType>) -> Result<Self> {
        let table = binding.table();
        if table.is_view {
            return Err(Error::msg(format!(
                "View `{}` cannot receive persistence operations",
                table.name
            )));
        }
        let naming = dbms.naming();
        let handler = dbms.column_handler();
        let schema = if dbms.has_schema_names() {
            table.schema.as_str()
        } else {
            ""
        };
        let full_name = naming.full_name_of(schema, &table.name);
        let field_index = |column: &str| -> Result<usize> {
            binding
                .fields()
                .iter()
                .position(|f| f.name() == column)
                .ok_or_else(|| {
                    Error::msg(format!(
                        "Column `{}` of table `{}` has no field binding",
                        column, table.name
                    ))
                })
        };

        let columns = table.enabled_columns();
        let mut insert_columns = Vec::new();
        let mut insert_fields = Vec::new();
        for column in columns.iter().filter(|c| !handler.excluded_in_insert(c)) {
            insert_columns.push(naming.enclose_field(&column.name));
            insert_fields.push(field_index(&column.name)?);
        }
        if insert_fields.is_empty() {
            return Err(Error::msg(format!(
                "Table `{}` has no insertable columns",
                table.name
            )));
        }
        let placeholders = vec!["?"; insert_fields.len()].join(", ");
        let insert_sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            full_name,
            insert_columns.join(", "),
            placeholders
        );

        let mut generated_key_columns = Vec::new();
        let mut generated_fields = Vec::new();
        for column in columns.iter().filter(|c| c.auto_increment) {
            generated_key_columns.push(column.name.clone());
            generated_fields.push(GeneratedKeyField {
                field: field_index(&column.name)?,
                template: column.value.clone(),
            });
        }

        let pk_columns = table.primary_key_columns();
        let mut pk_fields = Vec::new();
        let mut where_clause = String::new();
        for (i, column) in pk_columns.iter().enumerate() {
            pk_fields.push(field_index(&column.name)?);
            if i > 0 {
                where_clause.push_str(" AND ");
            }
            where_clause.push_str(&naming.enclose_field(&column.name));
            where_clause.push_str(" = ?");
        }

        let mut update_fields = Vec::new();
        let mut set_clause = String::new();
        for column in columns.iter().filter(|c| {
            !handler.excluded_in_update(c) && !pk_columns.iter().any(|pk| pk.name == c.name)
        }) {
            if !update_fields.is_empty() {
                set_clause.push_str(", ");
            }
            update_fields.push(field_index(&column.name)?);
            set_clause.push_str(&naming.enclose_field(&column.name));
            set_clause.push_str(" = ?");
        }

        let (update_sql, delete_sql) = if pk_columns.is_empty() {
            (None, None)
        } else {
            let update = (!update_fields.is_empty())
                .then(|| format!("UPDATE {} SET {} WHERE {}", full_name, set_clause, where_clause));
            let delete = format!("DELETE FROM {} WHERE {}", full_name, where_clause);
            (update, Some(delete))
        };

        Ok(Self {
            binding,
            insert_sql,
            insert_fields,
            generated_key_columns,
            generated_fields,
            update_sql,
            update_fields,
            delete_sql,
            pk_fields,
        })
    }

    pub fn insert_sql(&self) -> &str {
        &self.insert_sql
    }

    /// INSERTs the entity and writes the generated key values back through
    /// each auto increment field, in column discovery order.
    pub async fn persist<H: OperationHandler>(&self, handler: &H, entity: &mut E) -> Result<()> {
        let fields = self.binding.fields();
        let params: Vec<Value> = self
            .insert_fields
            .iter()
            .map(|&i| fields[i].get_database(entity))
            .collect();
        let result = handler
            .execute_insert(self.insert_sql.clone(), params, &self.generated_key_columns)
            .await?;
        if self.generated_fields.is_empty() {
            return Ok(());
        }
        if result.generated_keys.len() != self.generated_fields.len() {
            return Err(Error::msg(format!(
                "The driver returned {} generated keys where table `{}` expects {}",
                result.generated_keys.len(),
                self.binding.table().name,
                self.generated_fields.len()
            )));
        }
        for (generated, key) in self.generated_fields.iter().zip(result.generated_keys) {
            let value = Value::cast_generated_key(&generated.template, key)?;
            fields[generated.field].set_from_database(entity, value)?;
        }
        Ok(())
    }

    /// UPDATEs the entity row, binding the non key values first and the
    /// primary key values after, matching the `SET ... WHERE ...` placeholder
    /// order. Returns the number of affected rows.
    pub async fn update<H: OperationHandler>(&self, handler: &H, entity: &E) -> Result<u64> {
        self.require_primary_key("update")?;
        let sql = self.update_sql.as_ref().ok_or_else(|| {
            Error::msg(format!(
                "Table `{}` has no non key columns to update",
                self.binding.table().name
            ))
        })?;
        let fields = self.binding.fields();
        let params: Vec<Value> = self
            .update_fields
            .iter()
            .chain(self.pk_fields.iter())
            .map(|&i| fields[i].get_database(entity))
            .collect();
        handler.execute_update(sql.clone(), params).await
    }

    /// DELETEs the entity row, binding the primary key values in WHERE clause
    /// order.
    pub async fn remove<H: OperationHandler>(&self, handler: &H, entity: &E) -> Result<u64> {
        self.require_primary_key("remove")?;
        let sql = self.delete_sql.as_ref().ok_or_else(|| {
            Error::msg(format!(
                "Table `{}` has no delete statement",
                self.binding.table().name
            ))
        })?;
        let fields = self.binding.fields();
        let params: Vec<Value> = self
            .pk_fields
            .iter()
            .map(|&i| fields[i].get_database(entity))
            .collect();
        handler.execute_delete(sql.clone(), params).await
    }

    /// UPDATEs the entity row, falling back to an INSERT when no row matched
    /// the primary key.
    pub async fn merge<H: OperationHandler>(&self, handler: &H, entity: &mut E) -> Result<()> {
        self.require_primary_key("merge")?;
        if self.update(handler, entity).await? == 0 {
            self.persist(handler, entity).await?;
        }
        Ok(())
    }

    /// A table without a primary key makes `update`/`remove`/`merge`
    /// permanently unavailable; detected at construction and re-checked here
    /// so the fault fires before any SQL is issued.
    fn require_primary_key(&self, operation: &str) -> Result<()> {
        if self.pk_fields.is_empty() {
            return Err(Error::msg(format!(
                "Table `{}` has no primary key, {} is unavailable",
                self.binding.table().name,
                operation
            )));
        }
        Ok(())
    }
}
