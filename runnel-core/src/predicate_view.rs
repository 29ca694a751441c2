use crate::{
    FieldPredicate, Inclusion, NamingConvention, PredicateKind, SqlFragment, StringOp, Value,
};

/// Compiles a [`FieldPredicate`] into a parameterized SQL fragment.
///
/// The default methods implement ANSI SQL for every predicate kind; dialects
/// normally override only the string matching helpers, since LIKE escaping
/// and collation syntax differ per backend.
pub trait FieldPredicateView: Send + Sync {
    fn render(&self, naming: &dyn NamingConvention, predicate: &FieldPredicate) -> SqlFragment {
        use PredicateKind::*;
        let column = naming.enclose_field(&predicate.column);
        match &predicate.kind {
            AlwaysTrue => self.always_true(),
            AlwaysFalse => self.always_false(),
            IsNull => SqlFragment::new(format!("({} IS NULL)", column), vec![]),
            IsNotNull => SqlFragment::new(format!("({} IS NOT NULL)", column), vec![]),
            IsEmpty => SqlFragment::new(format!("({} = '')", column), vec![]),
            IsNotEmpty => SqlFragment::new(format!("({} <> '')", column), vec![]),
            Equal(operand) => self.compare(&column, "=", operand),
            NotEqual(operand) => self.compare(&column, "<>", operand),
            GreaterThan(operand) => self.compare(&column, ">", operand),
            GreaterOrEqual(operand) => self.compare(&column, ">=", operand),
            LessThan(operand) => self.compare(&column, "<", operand),
            LessOrEqual(operand) => self.compare(&column, "<=", operand),
            Between {
                low,
                high,
                inclusion,
            } => self.between(&column, low, high, *inclusion),
            NotBetween {
                low,
                high,
                inclusion,
            } => self.between(&column, low, high, *inclusion).negate(),
            In(set) => self.in_set(&column, set, false),
            NotIn(set) => self.in_set(&column, set, true),
            Matches {
                op,
                value,
                case_insensitive,
                negated,
            } => {
                let fragment = match (op, case_insensitive) {
                    (StringOp::Equal, false) => {
                        self.compare(&column, "=", &Value::Varchar(Some(value.clone())))
                    }
                    (StringOp::Equal, true) => self.equal_ignore_case(&column, value),
                    (StringOp::StartsWith, false) => self.starts_with(&column, value),
                    (StringOp::StartsWith, true) => self.starts_with_ignore_case(&column, value),
                    (StringOp::EndsWith, false) => self.ends_with(&column, value),
                    (StringOp::EndsWith, true) => self.ends_with_ignore_case(&column, value),
                    (StringOp::Contains, false) => self.contains(&column, value),
                    (StringOp::Contains, true) => self.contains_ignore_case(&column, value),
                };
                if *negated { fragment.negate() } else { fragment }
            }
        }
    }

    fn always_true(&self) -> SqlFragment {
        SqlFragment::new("(TRUE)", vec![])
    }

    fn always_false(&self) -> SqlFragment {
        SqlFragment::new("(FALSE)", vec![])
    }

    fn compare(&self, column: &str, operator: &str, operand: &Value) -> SqlFragment {
        SqlFragment::new(
            format!("({} {} ?)", column, operator),
            vec![operand.clone()],
        )
    }

    fn between(
        &self,
        column: &str,
        low: &Value,
        high: &Value,
        inclusion: Inclusion,
    ) -> SqlFragment {
        let start = if inclusion.start_inclusive() { ">=" } else { ">" };
        let end = if inclusion.end_inclusive() { "<=" } else { "<" };
        SqlFragment::new(
            format!("({} {} ? AND {} {} ?)", column, start, column, end),
            vec![low.clone(), high.clone()],
        )
    }

    /// An empty set short circuits to a constant, a singleton degenerates to
    /// plain (in)equality, larger sets bind one parameter per element in
    /// iteration order.
    fn in_set(&self, column: &str, set: &[Value], negated: bool) -> SqlFragment {
        match set.len() {
            0 => {
                if negated {
                    self.always_true()
                } else {
                    self.always_false()
                }
            }
            1 => self.compare(column, if negated { "<>" } else { "=" }, &set[0]),
            n => {
                let mut sql = String::with_capacity(column.len() + n * 2 + 16);
                sql.push('(');
                sql.push_str(column);
                if negated {
                    sql.push_str(" NOT");
                }
                sql.push_str(" IN (");
                for i in 0..n {
                    if i > 0 {
                        sql.push(',');
                    }
                    sql.push('?');
                }
                sql.push_str("))");
                SqlFragment::new(sql, set.to_vec())
            }
        }
    }

    fn equal_ignore_case(&self, column: &str, value: &str) -> SqlFragment {
        SqlFragment::new(
            format!("(LOWER({}) = LOWER(?))", column),
            vec![Value::Varchar(Some(value.to_owned()))],
        )
    }

    fn starts_with(&self, column: &str, value: &str) -> SqlFragment {
        SqlFragment::new(
            format!("({} LIKE (? || '%'))", column),
            vec![Value::Varchar(Some(value.to_owned()))],
        )
    }

    fn starts_with_ignore_case(&self, column: &str, value: &str) -> SqlFragment {
        SqlFragment::new(
            format!("(LOWER({}) LIKE (LOWER(?) || '%'))", column),
            vec![Value::Varchar(Some(value.to_owned()))],
        )
    }

    fn ends_with(&self, column: &str, value: &str) -> SqlFragment {
        SqlFragment::new(
            format!("({} LIKE ('%' || ?))", column),
            vec![Value::Varchar(Some(value.to_owned()))],
        )
    }

    fn ends_with_ignore_case(&self, column: &str, value: &str) -> SqlFragment {
        SqlFragment::new(
            format!("(LOWER({}) LIKE ('%' || LOWER(?)))", column),
            vec![Value::Varchar(Some(value.to_owned()))],
        )
    }

    fn contains(&self, column: &str, value: &str) -> SqlFragment {
        SqlFragment::new(
            format!("({} LIKE ('%' || ? || '%'))", column),
            vec![Value::Varchar(Some(value.to_owned()))],
        )
    }

    fn contains_ignore_case(&self, column: &str, value: &str) -> SqlFragment {
        SqlFragment::new(
            format!("(LOWER({}) LIKE ('%' || LOWER(?) || '%'))", column),
            vec![Value::Varchar(Some(value.to_owned()))],
        )
    }
}

/// The ANSI defaults as a usable view.
pub struct StandardPredicateView;

impl FieldPredicateView for StandardPredicateView {}
