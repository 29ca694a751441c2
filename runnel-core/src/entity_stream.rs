use crate::{
    Action, Filter, OperationHandler, Pipeline, Result, Sort, SqlStreamSupplier, Value,
    supplier::count_query, write_order_by,
};
use async_stream::try_stream;
use futures::{StreamExt, TryStreamExt, stream::BoxStream};
use std::cmp::Ordering;

/// A lazy, declarative stream over the entities of one table.
///
/// Intermediate operations only record [`Action`]s; the database is touched
/// exclusively by the terminal operations, which consume the stream, let the
/// optimizer rewrite the leading actions into SQL clauses, execute the
/// statement and apply whatever remains in process, in append order.
pub struct EntityStream<'h, E, H> {
    supplier: &'h SqlStreamSupplier<E>,
    handler: &'h H,
    pipeline: Pipeline<E>,
}

struct Rendered<E> {
    sql: String,
    params: Vec<Value>,
    residual: Vec<Action<E>>,
}

impl<'h, E, H> EntityStream<'h, E, H>
where
    E: Send + 'static,
    H: OperationHandler,
{
    pub(crate) fn new(supplier: &'h SqlStreamSupplier<E>, handler: &'h H) -> Self {
        Self {
            supplier,
            handler,
            pipeline: Pipeline::new(),
        }
    }

    pub fn filter(mut self, filter: Filter<E>) -> Self {
        self.pipeline.push(Action::Filter(filter));
        self
    }

    pub fn filter_fn(self, filter: impl Fn(&E) -> bool + Send + Sync + 'static) -> Self {
        self.filter(Filter::custom(filter))
    }

    pub fn map(mut self, mapper: impl FnMut(E) -> E + Send + Sync + 'static) -> Self {
        self.pipeline.push(Action::Map(Box::new(mapper)));
        self
    }

    pub fn flat_map(mut self, mapper: impl FnMut(E) -> Vec<E> + Send + Sync + 'static) -> Self {
        self.pipeline.push(Action::FlatMap(Box::new(mapper)));
        self
    }

    pub fn sorted(mut self, sort: Sort<E>) -> Self {
        self.pipeline.push(Action::Sort(sort));
        self
    }

    pub fn sorted_by(
        self,
        comparator: impl Fn(&E, &E) -> Ordering + Send + Sync + 'static,
    ) -> Self {
        self.sorted(Sort::custom(comparator))
    }

    pub fn skip(mut self, count: u64) -> Self {
        self.pipeline.push(Action::Skip(count));
        self
    }

    pub fn limit(mut self, count: u64) -> Self {
        self.pipeline.push(Action::Limit(count));
        self
    }

    pub fn peek(mut self, inspector: impl FnMut(&E) + Send + Sync + 'static) -> Self {
        self.pipeline.push(Action::Peek(Box::new(inspector)));
        self
    }

    pub fn distinct(mut self) -> Self
    where
        E: PartialEq,
    {
        self.pipeline
            .push(Action::Distinct(Box::new(|a: &E, b: &E| a == b)));
        self
    }

    /// Terminal: the stream of entities. Resources are acquired on first
    /// poll and released when the returned stream is dropped, however far it
    /// was consumed.
    pub fn into_stream(self) -> BoxStream<'h, Result<E>> {
        let EntityStream {
            supplier,
            handler,
            pipeline,
        } = self;
        execute(supplier, handler, render(supplier, pipeline))
    }

    /// Terminal: all entities, in stream order.
    pub async fn collect_vec(self) -> Result<Vec<E>> {
        self.into_stream().try_collect().await
    }

    /// Terminal: invokes `consumer` for every entity.
    pub async fn for_each(self, mut consumer: impl FnMut(E)) -> Result<()> {
        let mut stream = self.into_stream();
        while let Some(entity) = stream.next().await {
            consumer(entity?);
        }
        Ok(())
    }

    /// Terminal: the first entity, releasing the rest of the result set.
    pub async fn find_first(self) -> Result<Option<E>> {
        let mut stream = self.into_stream();
        stream.next().await.transpose()
    }

    /// Terminal: whether any entity passes `filter`.
    pub async fn any_match(self, filter: Filter<E>) -> Result<bool> {
        Ok(self.filter(filter).find_first().await?.is_some())
    }

    /// Terminal: the number of entities.
    ///
    /// When the optimizer absorbed the entire pipeline the count is delegated
    /// to the database as a counting sub-select; any residual client side
    /// action forces the streamed fallback.
    pub async fn count(self) -> Result<u64> {
        let EntityStream {
            supplier,
            handler,
            pipeline,
        } = self;
        let rendered = render(supplier, pipeline);
        if rendered.residual.is_empty() {
            let sql = supplier.count_over(&rendered.sql);
            return count_query(handler, sql, rendered.params).await;
        }
        let mut stream = execute(supplier, handler, rendered);
        let mut count = 0;
        while let Some(entity) = stream.next().await {
            entity?;
            count += 1;
        }
        Ok(count)
    }
}

/// Optimizer selection plus SQL assembly: WHERE from the pushed predicates,
/// ORDER BY from the pushed sorts, pagination last. Consumed actions are
/// drained off the pipeline, the rest runs in process.
fn render<E: Send + 'static>(
    supplier: &SqlStreamSupplier<E>,
    mut pipeline: Pipeline<E>,
) -> Rendered<E> {
    let plan = {
        let infos = pipeline.infos();
        supplier.optimizers.plan(&infos, supplier.dbms.as_ref())
    };
    let mut sql = supplier.select_sql.clone();
    let mut params = Vec::new();
    if let Some(where_clause) = plan.where_clause {
        sql.push_str(" WHERE ");
        sql.push_str(&where_clause.sql);
        params.extend(where_clause.params);
    }
    write_order_by(&mut sql, supplier.dbms.as_ref(), &plan.order_by);
    supplier
        .dbms
        .apply_skip_limit(&mut sql, &mut params, plan.skip, plan.limit);
    pipeline.drain_leading(plan.consumed);
    Rendered {
        sql,
        params,
        residual: pipeline.into_actions(),
    }
}

fn execute<'h, E, H>(
    supplier: &'h SqlStreamSupplier<E>,
    handler: &'h H,
    rendered: Rendered<E>,
) -> BoxStream<'h, Result<E>>
where
    E: Send + 'static,
    H: OperationHandler,
{
    let Rendered {
        sql,
        params,
        residual,
    } = rendered;
    let binding = supplier.binding.clone();
    let base: BoxStream<'h, Result<E>> = Box::pin(try_stream! {
        let mut rows = handler.execute_query_async(sql, params).await?;
        while let Some(row) = rows.next().await {
            let row = row?;
            yield binding.map_row(&row)?;
        }
        rows.close();
    });
    residual.into_iter().fold(base, apply_action)
}

/// Applies one residual action on top of an entity stream. Errors pass
/// through untouched and end the stream at the consumer.
fn apply_action<'s, E: Send + 's>(
    stream: BoxStream<'s, Result<E>>,
    action: Action<E>,
) -> BoxStream<'s, Result<E>> {
    match action {
        Action::Filter(filter) => Box::pin(try_stream! {
            let mut stream = stream;
            while let Some(item) = stream.next().await {
                let entity = item?;
                if filter.test(&entity) {
                    yield entity;
                }
            }
        }),
        Action::Map(mapper) => Box::pin(stream.map_ok(mapper)),
        Action::FlatMap(mut mapper) => Box::pin(try_stream! {
            let mut stream = stream;
            while let Some(item) = stream.next().await {
                for entity in mapper(item?) {
                    yield entity;
                }
            }
        }),
        Action::Sort(sort) => Box::pin(try_stream! {
            let mut stream = stream;
            let mut buffered = Vec::new();
            while let Some(item) = stream.next().await {
                buffered.push(item?);
            }
            buffered.sort_by(|a, b| sort.compare(a, b));
            for entity in buffered {
                yield entity;
            }
        }),
        Action::Skip(count) => Box::pin(try_stream! {
            let mut stream = stream;
            let mut remaining = count;
            while let Some(item) = stream.next().await {
                let entity = item?;
                if remaining > 0 {
                    remaining -= 1;
                    continue;
                }
                yield entity;
            }
        }),
        Action::Limit(count) => Box::pin(try_stream! {
            let mut stream = stream;
            let mut remaining = count;
            while remaining > 0 {
                let Some(item) = stream.next().await else {
                    break;
                };
                yield item?;
                remaining -= 1;
            }
        }),
        Action::Peek(mut inspector) => Box::pin(stream.inspect_ok(move |entity| inspector(entity))),
        Action::Distinct(same) => Box::pin(try_stream! {
            let mut stream = stream;
            let mut buffered = Vec::new();
            while let Some(item) = stream.next().await {
                buffered.push(item?);
            }
            let mut unique: Vec<E> = Vec::new();
            for entity in buffered {
                if !unique.iter().any(|seen| same(seen, &entity)) {
                    unique.push(entity);
                }
            }
            for entity in unique {
                yield entity;
            }
        }),
    }
}
