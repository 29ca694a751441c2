use crate::{
    ActionInfo, DbmsType, FieldPredicate, OrderKey, RenderedPlan, SkipLimitSupport, SqlFragment,
    StreamOptimizer,
};

/// Extends the filter push-down with ORDER BY and pagination: consumes
/// leading field filters, then field sorts, then any run of skip/limit
/// actions, subject to the dialect's pagination capability.
///
/// Scores by the number of consumed actions, so it outbids the filter-only
/// strategy exactly when it absorbs more of the pipeline.
pub struct PaginationOptimizer;

#[derive(Default)]
struct Consumed<'a> {
    predicates: Vec<&'a FieldPredicate>,
    sorts: Vec<OrderKey>,
    skip: u64,
    limit: Option<u64>,
    count: usize,
}

fn consume<'a>(actions: &[ActionInfo<'a>], support: SkipLimitSupport) -> Consumed<'a> {
    let mut consumed = Consumed::default();
    let mut iter = actions.iter().peekable();
    while let Some(&&ActionInfo::FieldFilter(predicate)) = iter.peek() {
        consumed.predicates.push(predicate);
        consumed.count += 1;
        iter.next();
    }
    while let Some(&&ActionInfo::FieldSort { column, order }) = iter.peek() {
        consumed.sorts.push(OrderKey {
            column: column.to_owned(),
            order,
        });
        consumed.count += 1;
        iter.next();
    }
    let paginate = match support {
        SkipLimitSupport::Standard => true,
        SkipLimitSupport::OnlyAfterSorted => !consumed.sorts.is_empty(),
        SkipLimitSupport::None => false,
    };
    if paginate {
        loop {
            match iter.peek() {
                Some(&&ActionInfo::Skip(n)) => {
                    // Skipping after a limit shrinks the remaining window.
                    consumed.skip += n;
                    consumed.limit = consumed.limit.map(|l| l.saturating_sub(n));
                }
                Some(&&ActionInfo::Limit(n)) => {
                    consumed.limit = Some(consumed.limit.map_or(n, |l| l.min(n)));
                }
                _ => break,
            }
            consumed.count += 1;
            iter.next();
        }
    }
    // Sequential sorts compose stably: the one recorded last dominates, the
    // earlier ones break its ties.
    consumed.sorts.reverse();
    consumed
}

impl StreamOptimizer for PaginationOptimizer {
    fn name(&self) -> &'static str {
        "PaginationOptimizer"
    }

    fn metrics(&self, actions: &[ActionInfo], dbms: &dyn DbmsType) -> i32 {
        consume(actions, dbms.skip_limit_support()).count as i32
    }

    fn render(&self, actions: &[ActionInfo], dbms: &dyn DbmsType) -> RenderedPlan {
        let consumed = consume(actions, dbms.skip_limit_support());
        let view = dbms.predicate_view();
        let naming = dbms.naming();
        let fragments: Vec<SqlFragment> = consumed
            .predicates
            .iter()
            .map(|predicate| view.render(naming, predicate))
            .collect();
        RenderedPlan {
            consumed: consumed.count,
            where_clause: SqlFragment::join_and(fragments),
            order_by: consumed.sorts,
            skip: consumed.skip,
            limit: consumed.limit,
        }
    }
}
