use crate::{ActionInfo, DbmsType, InitialFilterOptimizer, PaginationOptimizer, RenderedPlan, StreamOptimizer};

/// Ordered registry of [`StreamOptimizer`] candidates.
///
/// The candidate with the highest positive score wins, ties favor the first
/// installed one and a score of `i32::MAX` ends the search immediately. When
/// nothing applies the pipeline is executed unoptimized.
pub struct OptimizerComponent {
    optimizers: Vec<Box<dyn StreamOptimizer>>,
}

impl OptimizerComponent {
    pub fn empty() -> Self {
        Self {
            optimizers: Vec::new(),
        }
    }

    pub fn new() -> Self {
        let mut component = Self::empty();
        component.install(Box::new(InitialFilterOptimizer));
        component.install(Box::new(PaginationOptimizer));
        component
    }

    pub fn install(&mut self, optimizer: Box<dyn StreamOptimizer>) {
        self.optimizers.push(optimizer);
    }

    pub fn select(
        &self,
        actions: &[ActionInfo],
        dbms: &dyn DbmsType,
    ) -> Option<&dyn StreamOptimizer> {
        let mut best: Option<(&dyn StreamOptimizer, i32)> = None;
        for optimizer in &self.optimizers {
            let score = optimizer.metrics(actions, dbms);
            log::trace!("Optimizer {} scored {}", optimizer.name(), score);
            if score == i32::MAX {
                return Some(optimizer.as_ref());
            }
            if score > 0 && best.is_none_or(|(_, s)| score > s) {
                best = Some((optimizer.as_ref(), score));
            }
        }
        best.map(|(optimizer, _)| optimizer)
    }

    /// Scores, selects and renders in one go; the unoptimized plan when no
    /// candidate applies.
    pub fn plan(&self, actions: &[ActionInfo], dbms: &dyn DbmsType) -> RenderedPlan {
        match self.select(actions, dbms) {
            Some(optimizer) => {
                log::debug!("Optimizing the pipeline with {}", optimizer.name());
                optimizer.render(actions, dbms)
            }
            None => RenderedPlan::unoptimized(),
        }
    }
}

impl Default for OptimizerComponent {
    fn default() -> Self {
        Self::new()
    }
}
