use crate::Value;
use std::cmp::Ordering;

/// Sort direction of an ORDER BY key or a field sort action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

/// One ORDER BY key as consumed by the SQL builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderKey {
    pub column: String,
    pub order: Order,
}

/// Endpoint inclusion of BETWEEN style predicates, `{>, >=} x {<, <=}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inclusion {
    StartInclusiveEndInclusive,
    StartInclusiveEndExclusive,
    StartExclusiveEndInclusive,
    StartExclusiveEndExclusive,
}

impl Inclusion {
    pub(crate) fn start_inclusive(&self) -> bool {
        matches!(
            self,
            Inclusion::StartInclusiveEndInclusive | Inclusion::StartInclusiveEndExclusive
        )
    }

    pub(crate) fn end_inclusive(&self) -> bool {
        matches!(
            self,
            Inclusion::StartInclusiveEndInclusive | Inclusion::StartExclusiveEndInclusive
        )
    }
}

/// String matching operator of a pattern predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringOp {
    Equal,
    StartsWith,
    EndsWith,
    Contains,
}

/// The tagged variant over every predicate kind a field can express.
#[derive(Debug, Clone, PartialEq)]
pub enum PredicateKind {
    AlwaysTrue,
    AlwaysFalse,
    IsNull,
    IsNotNull,
    IsEmpty,
    IsNotEmpty,
    Equal(Value),
    NotEqual(Value),
    GreaterThan(Value),
    GreaterOrEqual(Value),
    LessThan(Value),
    LessOrEqual(Value),
    Between {
        low: Value,
        high: Value,
        inclusion: Inclusion,
    },
    NotBetween {
        low: Value,
        high: Value,
        inclusion: Inclusion,
    },
    In(Vec<Value>),
    NotIn(Vec<Value>),
    Matches {
        op: StringOp,
        value: String,
        case_insensitive: bool,
        negated: bool,
    },
}

/// A typed comparison against one column, translatable to SQL by a
/// [`FieldPredicateView`](crate::FieldPredicateView) and evaluable in process
/// when it cannot be pushed down.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPredicate {
    pub column: String,
    pub kind: PredicateKind,
}

impl FieldPredicate {
    pub fn new(column: impl Into<String>, kind: PredicateKind) -> Self {
        Self {
            column: column.into(),
            kind,
        }
    }

    /// In-process evaluation against the database representation of the field.
    ///
    /// Follows SQL comparison semantics: a NULL operand satisfies nothing but
    /// the null checks, including negated variants.
    pub fn test(&self, value: &Value) -> bool {
        use PredicateKind::*;
        match &self.kind {
            AlwaysTrue => true,
            AlwaysFalse => false,
            IsNull => value.is_null(),
            IsNotNull => !value.is_null(),
            IsEmpty => value.as_str().is_some_and(str::is_empty),
            IsNotEmpty => value.as_str().is_some_and(|v| !v.is_empty()),
            Equal(operand) => Self::compare(value, operand, |o| o == Ordering::Equal),
            NotEqual(operand) => Self::compare(value, operand, |o| o != Ordering::Equal),
            GreaterThan(operand) => Self::compare(value, operand, |o| o == Ordering::Greater),
            GreaterOrEqual(operand) => Self::compare(value, operand, |o| o != Ordering::Less),
            LessThan(operand) => Self::compare(value, operand, |o| o == Ordering::Less),
            LessOrEqual(operand) => Self::compare(value, operand, |o| o != Ordering::Greater),
            Between {
                low,
                high,
                inclusion,
            } => Self::within(value, low, high, *inclusion),
            NotBetween {
                low,
                high,
                inclusion,
            } => {
                !value.is_null()
                    && !low.is_null()
                    && !high.is_null()
                    && !Self::within(value, low, high, *inclusion)
            }
            In(set) => !value.is_null() && set.iter().any(|v| value.compare(v) == Some(Ordering::Equal)),
            NotIn(set) => {
                !value.is_null()
                    && set.iter().all(|v| {
                        !v.is_null() && value.compare(v) != Some(Ordering::Equal)
                    })
            }
            Matches {
                op,
                value: pattern,
                case_insensitive,
                negated,
            } => {
                let Some(subject) = value.as_str() else {
                    return false;
                };
                let (subject, pattern) = if *case_insensitive {
                    (subject.to_lowercase(), pattern.to_lowercase())
                } else {
                    (subject.to_owned(), pattern.clone())
                };
                let outcome = match op {
                    StringOp::Equal => subject == pattern,
                    StringOp::StartsWith => subject.starts_with(&pattern),
                    StringOp::EndsWith => subject.ends_with(&pattern),
                    StringOp::Contains => subject.contains(&pattern),
                };
                outcome != *negated
            }
        }
    }

    fn compare(value: &Value, operand: &Value, accept: impl Fn(Ordering) -> bool) -> bool {
        if value.is_null() || operand.is_null() {
            return false;
        }
        value.compare(operand).is_some_and(accept)
    }

    fn within(value: &Value, low: &Value, high: &Value, inclusion: Inclusion) -> bool {
        let start = if inclusion.start_inclusive() {
            Self::compare(value, low, |o| o != Ordering::Less)
        } else {
            Self::compare(value, low, |o| o == Ordering::Greater)
        };
        let end = if inclusion.end_inclusive() {
            Self::compare(value, high, |o| o != Ordering::Greater)
        } else {
            Self::compare(value, high, |o| o == Ordering::Less)
        };
        start && end
    }
}
