use crate::{Action, ActionInfo};
use std::fmt::{self, Debug, Formatter};

/// The ordered, append only sequence of stream operations recorded before a
/// terminal call.
///
/// Intermediate operations are pure metadata appends and never touch the
/// database. Terminal operations take the pipeline by value, so appending
/// after a terminal call is unrepresentable.
pub struct Pipeline<E> {
    actions: Vec<Action<E>>,
}

impl<E> Pipeline<E> {
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
        }
    }

    pub fn push(&mut self, action: Action<E>) {
        self.actions.push(action);
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Erased view for optimizer inspection.
    pub fn infos(&self) -> Vec<ActionInfo<'_>> {
        self.actions.iter().map(Action::info).collect()
    }

    /// Removes the first `count` actions, the ones an optimizer consumed into
    /// SQL clauses.
    pub fn drain_leading(&mut self, count: usize) {
        self.actions.drain(..count);
    }

    /// The residual, client side actions in append order.
    pub fn into_actions(self) -> Vec<Action<E>> {
        self.actions
    }
}

impl<E> Default for Pipeline<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Debug for Pipeline<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.actions.iter().map(Action::info))
            .finish()
    }
}
