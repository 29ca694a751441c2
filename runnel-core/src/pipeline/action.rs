use crate::{FieldPredicate, Order, TypeMapper, Value};
use std::cmp::Ordering;
use std::sync::Arc;

/// A stream filter: either a typed field predicate the optimizer may push
/// into SQL, or an opaque closure that can only run in process.
pub enum Filter<E> {
    Field {
        getter: fn(&E) -> Value,
        mapper: Arc<dyn TypeMapper>,
        predicate: FieldPredicate,
    },
    Custom(Box<dyn Fn(&E) -> bool + Send + Sync>),
}

impl<E> Filter<E> {
    pub fn custom(filter: impl Fn(&E) -> bool + Send + Sync + 'static) -> Self {
        Filter::Custom(Box::new(filter))
    }

    pub fn predicate(&self) -> Option<&FieldPredicate> {
        match self {
            Filter::Field { predicate, .. } => Some(predicate),
            Filter::Custom(..) => None,
        }
    }

    pub fn test(&self, entity: &E) -> bool {
        match self {
            Filter::Field {
                getter,
                mapper,
                predicate,
            } => predicate.test(&mapper.to_database(getter(entity))),
            Filter::Custom(filter) => filter(entity),
        }
    }
}

/// A stream ordering: a field sort the optimizer may translate to ORDER BY,
/// or an opaque comparator.
pub enum Sort<E> {
    Field {
        getter: fn(&E) -> Value,
        mapper: Arc<dyn TypeMapper>,
        column: String,
        order: Order,
    },
    Custom(Box<dyn Fn(&E, &E) -> Ordering + Send + Sync>),
}

impl<E> Sort<E> {
    pub fn custom(comparator: impl Fn(&E, &E) -> Ordering + Send + Sync + 'static) -> Self {
        Sort::Custom(Box::new(comparator))
    }

    pub fn compare(&self, a: &E, b: &E) -> Ordering {
        match self {
            Sort::Field {
                getter,
                mapper,
                order,
                ..
            } => {
                let left = mapper.to_database(getter(a));
                let right = mapper.to_database(getter(b));
                let ordering = left.compare(&right).unwrap_or(Ordering::Equal);
                match order {
                    Order::Asc => ordering,
                    Order::Desc => ordering.reverse(),
                }
            }
            Sort::Custom(comparator) => comparator(a, b),
        }
    }
}

/// One recorded stream operation. The optimizer matches exhaustively over
/// these kinds, there is no open ended type inspection.
pub enum Action<E> {
    Filter(Filter<E>),
    Map(Box<dyn FnMut(E) -> E + Send + Sync>),
    FlatMap(Box<dyn FnMut(E) -> Vec<E> + Send + Sync>),
    Sort(Sort<E>),
    Skip(u64),
    Limit(u64),
    Peek(Box<dyn FnMut(&E) + Send + Sync>),
    Distinct(Box<dyn Fn(&E, &E) -> bool + Send + Sync>),
}

/// Type erased view of an action, what the optimizers inspect.
#[derive(Debug, Clone, Copy)]
pub enum ActionInfo<'a> {
    FieldFilter(&'a FieldPredicate),
    CustomFilter,
    Map,
    FlatMap,
    FieldSort { column: &'a str, order: Order },
    CustomSort,
    Skip(u64),
    Limit(u64),
    Peek,
    Distinct,
}

impl<E> Action<E> {
    pub fn info(&self) -> ActionInfo<'_> {
        match self {
            Action::Filter(Filter::Field { predicate, .. }) => ActionInfo::FieldFilter(predicate),
            Action::Filter(Filter::Custom(..)) => ActionInfo::CustomFilter,
            Action::Map(..) => ActionInfo::Map,
            Action::FlatMap(..) => ActionInfo::FlatMap,
            Action::Sort(Sort::Field { column, order, .. }) => ActionInfo::FieldSort {
                column,
                order: *order,
            },
            Action::Sort(Sort::Custom(..)) => ActionInfo::CustomSort,
            Action::Skip(n) => ActionInfo::Skip(*n),
            Action::Limit(n) => ActionInfo::Limit(*n),
            Action::Peek(..) => ActionInfo::Peek,
            Action::Distinct(..) => ActionInfo::Distinct,
        }
    }
}
