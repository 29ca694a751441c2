/// Per dialect identifier quoting and full name composition. Pure functions,
/// no state, safe to share across threads.
pub trait NamingConvention: Send + Sync {
    /// Wraps an identifier in the dialect's field enclosers, doubling the
    /// encloser wherever it appears inside the identifier itself.
    fn enclose_field(&self, ident: &str) -> String {
        let mut out = String::with_capacity(ident.len() + 2);
        out.push('"');
        for c in ident.chars() {
            if c == '"' {
                out.push('"');
            }
            out.push(c);
        }
        out.push('"');
        out
    }

    /// Wraps a literal in the dialect's quote characters. Embedded quotes are
    /// doubled; an embedded field encloser is backslash escaped since it is
    /// nested inside a differently quoted context.
    fn quote_field(&self, literal: &str) -> String {
        let mut out = String::with_capacity(literal.len() + 2);
        out.push('\'');
        for c in literal.chars() {
            match c {
                '\'' => out.push_str("''"),
                '"' => out.push_str("\\\""),
                _ => out.push(c),
            }
        }
        out.push('\'');
        out
    }

    /// Dot delimited, quoted `schema.table` composition. An empty schema
    /// yields the bare table name.
    fn full_name_of(&self, schema: &str, table: &str) -> String {
        if schema.is_empty() {
            self.enclose_field(table)
        } else {
            format!(
                "{}.{}",
                self.enclose_field(schema),
                self.enclose_field(table)
            )
        }
    }

    fn full_name_of_column(&self, schema: &str, table: &str, column: &str) -> String {
        format!(
            "{}.{}",
            self.full_name_of(schema, table),
            self.enclose_field(column)
        )
    }

    /// Identifiers that must never be treated as user schemas during a
    /// metadata read.
    fn schema_exclude_set(&self) -> &[&str] {
        &[]
    }
}

/// ANSI double quote defaults.
pub struct AnsiNamingConvention;

impl NamingConvention for AnsiNamingConvention {
    fn schema_exclude_set(&self) -> &[&str] {
        &["information_schema"]
    }
}
