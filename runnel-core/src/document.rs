use crate::{Error, Order, Result, Value};

/// Root of the configuration document tree the engine consumes. The tree is
/// built externally (metadata read, config load) and is read only during
/// query and persistence execution.
#[derive(Debug, Clone, Default)]
pub struct Project {
    pub name: String,
    pub dbmses: Vec<Dbms>,
}

#[derive(Debug, Clone, Default)]
pub struct Dbms {
    pub name: String,
    /// Dialect identifier, matches [`DbmsType::name`](crate::DbmsType::name).
    pub type_name: String,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub schemas: Vec<Schema>,
}

#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub name: String,
    pub tables: Vec<Table>,
}

#[derive(Debug, Clone, Default)]
pub struct Table {
    pub name: String,
    /// Owning schema name, empty for schema-less dialects.
    pub schema: String,
    /// A table is either a base table or a view, never both. Views never
    /// receive synthesized row identity columns.
    pub is_view: bool,
    pub columns: Vec<Column>,
    pub indexes: Vec<Index>,
    pub foreign_keys: Vec<ForeignKey>,
    pub primary_key: Vec<PrimaryKeyColumn>,
}

#[derive(Debug, Clone)]
pub struct Column {
    /// Unique id within the owning table.
    pub name: String,
    /// 1-based position, unique and contiguous within the table.
    pub ordinal: u32,
    pub enabled: bool,
    pub auto_increment: bool,
    pub nullable: bool,
    /// Database type name as reported by the metadata read.
    pub type_name: String,
    /// Type template, the payload is ignored.
    pub value: Value,
}

#[derive(Debug, Clone)]
pub struct PrimaryKeyColumn {
    pub name: String,
    pub ordinal: u32,
}

#[derive(Debug, Clone, Default)]
pub struct Index {
    pub name: String,
    pub unique: bool,
    pub columns: Vec<IndexColumn>,
}

#[derive(Debug, Clone)]
pub struct IndexColumn {
    pub name: String,
    pub ordinal: u32,
    pub order: Order,
}

#[derive(Debug, Clone, Default)]
pub struct ForeignKey {
    pub name: String,
    pub columns: Vec<ForeignKeyColumn>,
}

#[derive(Debug, Clone)]
pub struct ForeignKeyColumn {
    pub name: String,
    pub ordinal: u32,
    pub foreign_table: String,
    pub foreign_column: String,
}

impl Column {
    pub fn new(name: impl Into<String>, ordinal: u32, value: Value) -> Self {
        Self {
            name: name.into(),
            ordinal,
            enabled: true,
            auto_increment: false,
            nullable: false,
            type_name: String::new(),
            value,
        }
    }

    pub fn auto_increment(mut self, auto_increment: bool) -> Self {
        self.auto_increment = auto_increment;
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = type_name.into();
        self
    }
}

impl Table {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: schema.into(),
            ..Default::default()
        }
    }

    pub fn view(mut self, is_view: bool) -> Self {
        self.is_view = is_view;
        self
    }

    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Appends `name` to the primary key, next ordinal position.
    pub fn with_primary_key(mut self, name: impl Into<String>) -> Self {
        let ordinal = self.primary_key.len() as u32 + 1;
        self.primary_key.push(PrimaryKeyColumn {
            name: name.into(),
            ordinal,
        });
        self
    }

    pub fn with_index(mut self, index: Index) -> Self {
        self.indexes.push(index);
        self
    }

    pub fn with_foreign_key(mut self, foreign_key: ForeignKey) -> Self {
        self.foreign_keys.push(foreign_key);
        self
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Enabled columns in ordinal position order.
    pub fn enabled_columns(&self) -> Vec<&Column> {
        let mut columns: Vec<&Column> = self.columns.iter().filter(|c| c.enabled).collect();
        columns.sort_by_key(|c| c.ordinal);
        columns
    }

    /// Primary key columns resolved against the column list, in key order.
    pub fn primary_key_columns(&self) -> Vec<&Column> {
        let mut key = self.primary_key.clone();
        key.sort_by_key(|c| c.ordinal);
        key.iter()
            .filter_map(|k| self.column(&k.name))
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        self.check_unique_names()?;
        Self::check_ordinals(&self.name, "column", self.columns.iter().map(|c| c.ordinal))?;
        Self::check_ordinals(
            &self.name,
            "primary key column",
            self.primary_key.iter().map(|c| c.ordinal),
        )?;
        for key in &self.primary_key {
            self.require_column(&key.name, "primary key")?;
        }
        for index in &self.indexes {
            Self::check_ordinals(&self.name, "index column", index.columns.iter().map(|c| c.ordinal))?;
            for column in &index.columns {
                self.require_column(&column.name, "index")?;
            }
        }
        for foreign_key in &self.foreign_keys {
            Self::check_ordinals(
                &self.name,
                "foreign key column",
                foreign_key.columns.iter().map(|c| c.ordinal),
            )?;
            for column in &foreign_key.columns {
                self.require_column(&column.name, "foreign key")?;
            }
            self.check_foreign_key_reconciliation(foreign_key)?;
        }
        if self.is_view && !self.primary_key.is_empty() {
            return Err(Error::msg(format!(
                "View `{}` must not declare a primary key",
                self.name
            )));
        }
        Ok(())
    }

    fn check_unique_names(&self) -> Result<()> {
        for (i, column) in self.columns.iter().enumerate() {
            if self.columns[..i].iter().any(|c| c.name == column.name) {
                return Err(Error::msg(format!(
                    "Table `{}` declares the column id `{}` more than once",
                    self.name, column.name
                )));
            }
        }
        Ok(())
    }

    fn check_ordinals(
        table: &str,
        what: &str,
        ordinals: impl Iterator<Item = u32>,
    ) -> Result<()> {
        let mut ordinals: Vec<u32> = ordinals.collect();
        ordinals.sort_unstable();
        for (i, ordinal) in ordinals.iter().enumerate() {
            if *ordinal != i as u32 + 1 {
                return Err(Error::msg(format!(
                    "Table `{}` has non contiguous or duplicate {} ordinals",
                    table, what
                )));
            }
        }
        Ok(())
    }

    fn require_column(&self, name: &str, referrer: &str) -> Result<&Column> {
        self.column(name).ok_or_else(|| {
            Error::msg(format!(
                "A {} of table `{}` references the missing column `{}`",
                referrer, self.name, name
            ))
        })
    }

    /// A foreign key sharing columns with a unique index must match its column
    /// set exactly; partial overlap is flagged instead of silently accepted.
    fn check_foreign_key_reconciliation(&self, foreign_key: &ForeignKey) -> Result<()> {
        let fk_columns: Vec<&str> = foreign_key.columns.iter().map(|c| c.name.as_str()).collect();
        for index in self.indexes.iter().filter(|i| i.unique) {
            let index_columns: Vec<&str> = index.columns.iter().map(|c| c.name.as_str()).collect();
            let overlap = fk_columns.iter().any(|c| index_columns.contains(c));
            let exact = fk_columns.len() == index_columns.len()
                && fk_columns.iter().all(|c| index_columns.contains(c));
            if overlap && !exact {
                return Err(Error::msg(format!(
                    "Foreign key `{}` of table `{}` partially overlaps the unique index `{}`",
                    foreign_key.name, self.name, index.name
                )));
            }
        }
        Ok(())
    }
}

impl Schema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: Vec::new(),
        }
    }

    pub fn with_table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn validate(&self) -> Result<()> {
        for table in &self.tables {
            if !table.schema.is_empty() && table.schema != self.name {
                return Err(Error::msg(format!(
                    "Table `{}` claims schema `{}` but lives in `{}`",
                    table.name, table.schema, self.name
                )));
            }
            table.validate()?;
        }
        Ok(())
    }
}

impl Dbms {
    pub fn validate(&self) -> Result<()> {
        for schema in &self.schemas {
            schema.validate()?;
        }
        Ok(())
    }
}

impl Project {
    pub fn validate(&self) -> Result<()> {
        for dbms in &self.dbmses {
            dbms.validate()?;
        }
        Ok(())
    }
}
