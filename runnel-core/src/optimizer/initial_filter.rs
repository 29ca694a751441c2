use crate::{ActionInfo, DbmsType, FieldPredicate, RenderedPlan, SqlFragment, StreamOptimizer};

/// The reference strategy: push consecutive leading field filters into the
/// WHERE clause.
///
/// Consumption stops at the first non-filter action or at the first filter
/// the dialect cannot translate (a custom closure); predicates converted
/// before that point are kept. Stopping there is what guarantees that client
/// side operations downstream of an unpushable filter still observe the
/// correct row set.
pub struct InitialFilterOptimizer;

fn leading_predicates<'a>(actions: &[ActionInfo<'a>]) -> Vec<&'a FieldPredicate> {
    let mut predicates = Vec::new();
    for info in actions {
        match *info {
            ActionInfo::FieldFilter(predicate) => predicates.push(predicate),
            _ => break,
        }
    }
    predicates
}

impl StreamOptimizer for InitialFilterOptimizer {
    fn name(&self) -> &'static str {
        "InitialFilterOptimizer"
    }

    fn metrics(&self, actions: &[ActionInfo], _dbms: &dyn DbmsType) -> i32 {
        leading_predicates(actions).len() as i32
    }

    fn render(&self, actions: &[ActionInfo], dbms: &dyn DbmsType) -> RenderedPlan {
        let view = dbms.predicate_view();
        let naming = dbms.naming();
        let fragments: Vec<SqlFragment> = leading_predicates(actions)
            .into_iter()
            .map(|predicate| view.render(naming, predicate))
            .collect();
        RenderedPlan {
            consumed: fragments.len(),
            where_clause: SqlFragment::join_and(fragments),
            ..RenderedPlan::default()
        }
    }
}
