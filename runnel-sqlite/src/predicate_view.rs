use runnel_core::{FieldPredicateView, SqlFragment, Value};

/// SQLite flavored predicate compilation.
///
/// LIKE is case insensitive for ASCII by default, so the case sensitive
/// variants pin `COLLATE BINARY` and the insensitive ones `COLLATE NOCASE`
/// instead of the ANSI `LOWER(...)` rewriting. Patterns are concatenated
/// around the bound value with the `ESCAPE '_'` clause the engine expects.
pub struct SqlitePredicateView;

fn like(column: &str, collation: &str, pattern: &str, value: &str) -> SqlFragment {
    SqlFragment::new(
        format!("({} COLLATE {} LIKE {} ESCAPE '_')", column, collation, pattern),
        vec![Value::Varchar(Some(value.to_owned()))],
    )
}

impl FieldPredicateView for SqlitePredicateView {
    fn equal_ignore_case(&self, column: &str, value: &str) -> SqlFragment {
        SqlFragment::new(
            format!("({} COLLATE NOCASE = ?)", column),
            vec![Value::Varchar(Some(value.to_owned()))],
        )
    }

    fn starts_with(&self, column: &str, value: &str) -> SqlFragment {
        like(column, "BINARY", "(? || '%')", value)
    }

    fn starts_with_ignore_case(&self, column: &str, value: &str) -> SqlFragment {
        like(column, "NOCASE", "(? || '%')", value)
    }

    fn ends_with(&self, column: &str, value: &str) -> SqlFragment {
        like(column, "BINARY", "('%' || ?)", value)
    }

    fn ends_with_ignore_case(&self, column: &str, value: &str) -> SqlFragment {
        like(column, "NOCASE", "('%' || ?)", value)
    }

    fn contains(&self, column: &str, value: &str) -> SqlFragment {
        like(column, "BINARY", "('%' || ? || '%')", value)
    }

    fn contains_ignore_case(&self, column: &str, value: &str) -> SqlFragment {
        like(column, "NOCASE", "('%' || ? || '%')", value)
    }
}
