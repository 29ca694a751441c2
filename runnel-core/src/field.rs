use crate::{
    FieldPredicate, Filter, Inclusion, Order, PredicateKind, Result, Sort, StringOp, TypeMapper,
    Value, identity_mapper,
};
use std::sync::Arc;

/// Binds one column to an entity member: getter, setter and the
/// [`TypeMapper`] converting between the two representations.
///
/// Bindings are resolved once per table at startup and are immutable
/// afterwards. Fields are the factory for typed predicates and sort keys.
#[derive(Clone)]
pub struct Field<E> {
    name: &'static str,
    getter: fn(&E) -> Value,
    setter: fn(&mut E, Value) -> Result<()>,
    mapper: Arc<dyn TypeMapper>,
}

impl<E> Field<E> {
    pub fn new(
        name: &'static str,
        getter: fn(&E) -> Value,
        setter: fn(&mut E, Value) -> Result<()>,
    ) -> Self {
        Self {
            name,
            getter,
            setter,
            mapper: identity_mapper(),
        }
    }

    pub fn with_mapper(mut self, mapper: Arc<dyn TypeMapper>) -> Self {
        self.mapper = mapper;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn mapper(&self) -> &Arc<dyn TypeMapper> {
        &self.mapper
    }

    /// Entity side value of this field.
    pub fn get(&self, entity: &E) -> Value {
        (self.getter)(entity)
    }

    /// Database side value of this field.
    pub fn get_database(&self, entity: &E) -> Value {
        self.mapper.to_database(self.get(entity))
    }

    /// Writes an entity side value back into the entity.
    pub fn set(&self, entity: &mut E, value: Value) -> Result<()> {
        (self.setter)(entity, value)
    }

    /// Converts a database side value and writes it back into the entity.
    pub fn set_from_database(&self, entity: &mut E, value: Value) -> Result<()> {
        self.set(entity, self.mapper.to_entity(value)?)
    }

    // Predicate factories. Operand values are converted to their database
    // representation up front, so both the SQL compiler and the in-process
    // fallback see the same operands.

    pub fn equal(&self, value: impl Into<Value>) -> Filter<E> {
        self.filter(PredicateKind::Equal(self.mapper.to_database(value.into())))
    }

    pub fn not_equal(&self, value: impl Into<Value>) -> Filter<E> {
        self.filter(PredicateKind::NotEqual(
            self.mapper.to_database(value.into()),
        ))
    }

    pub fn greater_than(&self, value: impl Into<Value>) -> Filter<E> {
        self.filter(PredicateKind::GreaterThan(
            self.mapper.to_database(value.into()),
        ))
    }

    pub fn greater_or_equal(&self, value: impl Into<Value>) -> Filter<E> {
        self.filter(PredicateKind::GreaterOrEqual(
            self.mapper.to_database(value.into()),
        ))
    }

    pub fn less_than(&self, value: impl Into<Value>) -> Filter<E> {
        self.filter(PredicateKind::LessThan(
            self.mapper.to_database(value.into()),
        ))
    }

    pub fn less_or_equal(&self, value: impl Into<Value>) -> Filter<E> {
        self.filter(PredicateKind::LessOrEqual(
            self.mapper.to_database(value.into()),
        ))
    }

    pub fn between(
        &self,
        low: impl Into<Value>,
        high: impl Into<Value>,
        inclusion: Inclusion,
    ) -> Filter<E> {
        self.filter(PredicateKind::Between {
            low: self.mapper.to_database(low.into()),
            high: self.mapper.to_database(high.into()),
            inclusion,
        })
    }

    pub fn not_between(
        &self,
        low: impl Into<Value>,
        high: impl Into<Value>,
        inclusion: Inclusion,
    ) -> Filter<E> {
        self.filter(PredicateKind::NotBetween {
            low: self.mapper.to_database(low.into()),
            high: self.mapper.to_database(high.into()),
            inclusion,
        })
    }

    pub fn is_in(&self, values: impl IntoIterator<Item = impl Into<Value>>) -> Filter<E> {
        self.filter(PredicateKind::In(self.to_database_set(values)))
    }

    pub fn not_in(&self, values: impl IntoIterator<Item = impl Into<Value>>) -> Filter<E> {
        self.filter(PredicateKind::NotIn(self.to_database_set(values)))
    }

    pub fn is_null(&self) -> Filter<E> {
        self.filter(PredicateKind::IsNull)
    }

    pub fn is_not_null(&self) -> Filter<E> {
        self.filter(PredicateKind::IsNotNull)
    }

    pub fn is_empty(&self) -> Filter<E> {
        self.filter(PredicateKind::IsEmpty)
    }

    pub fn is_not_empty(&self) -> Filter<E> {
        self.filter(PredicateKind::IsNotEmpty)
    }

    pub fn always_true(&self) -> Filter<E> {
        self.filter(PredicateKind::AlwaysTrue)
    }

    pub fn always_false(&self) -> Filter<E> {
        self.filter(PredicateKind::AlwaysFalse)
    }

    pub fn equal_ignore_case(&self, value: impl Into<String>) -> Filter<E> {
        self.matches(StringOp::Equal, value.into(), true, false)
    }

    pub fn not_equal_ignore_case(&self, value: impl Into<String>) -> Filter<E> {
        self.matches(StringOp::Equal, value.into(), true, true)
    }

    pub fn starts_with(&self, value: impl Into<String>) -> Filter<E> {
        self.matches(StringOp::StartsWith, value.into(), false, false)
    }

    pub fn starts_with_ignore_case(&self, value: impl Into<String>) -> Filter<E> {
        self.matches(StringOp::StartsWith, value.into(), true, false)
    }

    pub fn not_starts_with(&self, value: impl Into<String>) -> Filter<E> {
        self.matches(StringOp::StartsWith, value.into(), false, true)
    }

    pub fn not_starts_with_ignore_case(&self, value: impl Into<String>) -> Filter<E> {
        self.matches(StringOp::StartsWith, value.into(), true, true)
    }

    pub fn ends_with(&self, value: impl Into<String>) -> Filter<E> {
        self.matches(StringOp::EndsWith, value.into(), false, false)
    }

    pub fn ends_with_ignore_case(&self, value: impl Into<String>) -> Filter<E> {
        self.matches(StringOp::EndsWith, value.into(), true, false)
    }

    pub fn not_ends_with(&self, value: impl Into<String>) -> Filter<E> {
        self.matches(StringOp::EndsWith, value.into(), false, true)
    }

    pub fn not_ends_with_ignore_case(&self, value: impl Into<String>) -> Filter<E> {
        self.matches(StringOp::EndsWith, value.into(), true, true)
    }

    pub fn contains(&self, value: impl Into<String>) -> Filter<E> {
        self.matches(StringOp::Contains, value.into(), false, false)
    }

    pub fn contains_ignore_case(&self, value: impl Into<String>) -> Filter<E> {
        self.matches(StringOp::Contains, value.into(), true, false)
    }

    pub fn not_contains(&self, value: impl Into<String>) -> Filter<E> {
        self.matches(StringOp::Contains, value.into(), false, true)
    }

    pub fn not_contains_ignore_case(&self, value: impl Into<String>) -> Filter<E> {
        self.matches(StringOp::Contains, value.into(), true, true)
    }

    pub fn ascending(&self) -> Sort<E> {
        self.sort(Order::Asc)
    }

    pub fn descending(&self) -> Sort<E> {
        self.sort(Order::Desc)
    }

    fn filter(&self, kind: PredicateKind) -> Filter<E> {
        Filter::Field {
            getter: self.getter,
            mapper: self.mapper.clone(),
            predicate: FieldPredicate::new(self.name, kind),
        }
    }

    fn matches(&self, op: StringOp, value: String, case_insensitive: bool, negated: bool) -> Filter<E> {
        self.filter(PredicateKind::Matches {
            op,
            value,
            case_insensitive,
            negated,
        })
    }

    fn sort(&self, order: Order) -> Sort<E> {
        Sort::Field {
            getter: self.getter,
            mapper: self.mapper.clone(),
            column: self.name.to_owned(),
            order,
        }
    }

    fn to_database_set(&self, values: impl IntoIterator<Item = impl Into<Value>>) -> Vec<Value> {
        values
            .into_iter()
            .map(|v| self.mapper.to_database(v.into()))
            .collect()
    }
}
