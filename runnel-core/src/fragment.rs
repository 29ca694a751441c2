use crate::Value;
use std::fmt::{self, Display, Formatter};

/// A SQL text fragment with `?` placeholders plus the values bound to them.
///
/// Invariant: the number of placeholders in `sql` equals `params.len()`, and
/// composition keeps parameter order aligned with the placeholder order in
/// the composed text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlFragment {
    pub sql: String,
    pub params: Vec<Value>,
}

impl SqlFragment {
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        let fragment = Self {
            sql: sql.into(),
            params,
        };
        debug_assert_eq!(
            fragment.placeholder_count(),
            fragment.params.len(),
            "Placeholder count must match the number of bound values",
        );
        fragment
    }

    pub fn placeholder_count(&self) -> usize {
        self.sql.matches('?').count()
    }

    pub fn and(self, other: Self) -> Self {
        Self::binary(self, "AND", other)
    }

    pub fn or(self, other: Self) -> Self {
        Self::binary(self, "OR", other)
    }

    /// Wraps the whole fragment in `NOT(...)` rather than inverting operators,
    /// so negation stays correct under three valued NULL logic.
    pub fn negate(self) -> Self {
        Self {
            sql: format!("(NOT {})", self.sql),
            params: self.params,
        }
    }

    /// ANDs the fragments together; `None` when the input is empty.
    pub fn join_and(fragments: impl IntoIterator<Item = Self>) -> Option<Self> {
        fragments.into_iter().reduce(Self::and)
    }

    fn binary(lhs: Self, op: &str, rhs: Self) -> Self {
        let mut params = lhs.params;
        params.extend(rhs.params);
        Self {
            sql: format!("({} {} {})", lhs.sql, op, rhs.sql),
            params,
        }
    }
}

impl Display for SqlFragment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.sql, self.params)
    }
}
