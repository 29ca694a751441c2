use runnel_core::NamingConvention;

/// SQLite identifier rules. SQLite does not organize tables in schemas, so
/// full names never carry a schema prefix and no schema is excluded from a
/// metadata read.
pub struct SqliteNamingConvention;

impl NamingConvention for SqliteNamingConvention {
    fn full_name_of(&self, _schema: &str, table: &str) -> String {
        self.enclose_field(table)
    }

    fn full_name_of_column(&self, _schema: &str, table: &str, column: &str) -> String {
        format!(
            "{}.{}",
            self.enclose_field(table),
            self.enclose_field(column)
        )
    }
}
