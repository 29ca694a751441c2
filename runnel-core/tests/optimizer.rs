use runnel_core::{
    Action, AnsiNamingConvention, Dbms, DbmsType, Error, Field, FieldPredicateView, Filter,
    GenericDbmsType, NamingConvention, OptimizerComponent, Order, Pipeline, SkipLimitSupport,
    StandardPredicateView, Value,
};

#[derive(Debug, Clone, PartialEq)]
struct Item {
    name: String,
    age: i64,
}

fn age_field() -> Field<Item> {
    Field::new(
        "age",
        |i| i.age.into(),
        |i, v| {
            i.age = v
                .as_i64()
                .ok_or_else(|| Error::msg("Expected an integer"))?;
            Ok(())
        },
    )
}

fn name_field() -> Field<Item> {
    Field::new(
        "name",
        |i| i.name.as_str().into(),
        |i, v| {
            i.name = v
                .as_str()
                .map(str::to_owned)
                .ok_or_else(|| Error::msg("Expected a string"))?;
            Ok(())
        },
    )
}

struct SortedOnlyDialect;

impl DbmsType for SortedOnlyDialect {
    fn name(&self) -> &'static str {
        "sortedonly"
    }
    fn connection_url(&self, _dbms: &Dbms) -> String {
        "sortedonly://".to_owned()
    }
    fn skip_limit_support(&self) -> SkipLimitSupport {
        SkipLimitSupport::OnlyAfterSorted
    }
    fn naming(&self) -> &dyn NamingConvention {
        &AnsiNamingConvention
    }
    fn predicate_view(&self) -> &dyn FieldPredicateView {
        &StandardPredicateView
    }
}

#[test]
fn pushes_leading_filters_until_the_first_barrier() {
    let mut pipeline: Pipeline<Item> = Pipeline::new();
    pipeline.push(Action::Filter(age_field().greater_or_equal(18i64)));
    pipeline.push(Action::Filter(name_field().starts_with("A")));
    pipeline.push(Action::Map(Box::new(|i| i)));
    // Individually pushable, but stranded behind the map.
    pipeline.push(Action::Filter(age_field().less_than(99i64)));

    let component = OptimizerComponent::new();
    let plan = {
        let infos = pipeline.infos();
        component.plan(&infos, &GenericDbmsType)
    };
    assert_eq!(plan.consumed, 2);
    let where_clause = plan.where_clause.expect("Two filters were pushed");
    assert_eq!(
        where_clause.sql,
        r#"(("age" >= ?) AND ("name" LIKE (? || '%')))"#
    );
    assert_eq!(
        where_clause.params,
        vec![Value::Int64(Some(18)), Value::Varchar(Some("A".to_owned()))]
    );
    pipeline.drain_leading(plan.consumed);
    assert_eq!(pipeline.len(), 2);
}

#[test]
fn custom_filter_blocks_push_down_entirely() {
    let mut pipeline: Pipeline<Item> = Pipeline::new();
    pipeline.push(Action::Filter(Filter::custom(|i: &Item| i.age > 10)));
    pipeline.push(Action::Filter(age_field().less_than(99i64)));

    let component = OptimizerComponent::new();
    let infos = pipeline.infos();
    assert!(component.select(&infos, &GenericDbmsType).is_none());
    let plan = component.plan(&infos, &GenericDbmsType);
    assert_eq!(plan.consumed, 0);
    assert!(plan.where_clause.is_none());
}

#[test]
fn ties_favor_the_first_registered_optimizer() {
    let mut pipeline: Pipeline<Item> = Pipeline::new();
    pipeline.push(Action::Filter(age_field().greater_than(1i64)));
    let component = OptimizerComponent::new();
    let infos = pipeline.infos();
    let selected = component
        .select(&infos, &GenericDbmsType)
        .expect("A filter is pushable");
    assert_eq!(selected.name(), "InitialFilterOptimizer");
}

#[test]
fn pagination_outbids_filters_when_it_consumes_more() {
    let mut pipeline: Pipeline<Item> = Pipeline::new();
    pipeline.push(Action::Filter(age_field().greater_than(1i64)));
    pipeline.push(Action::Sort(age_field().ascending()));
    pipeline.push(Action::Limit(10));
    let component = OptimizerComponent::new();
    let infos = pipeline.infos();
    let selected = component
        .select(&infos, &GenericDbmsType)
        .expect("The pipeline is pushable");
    assert_eq!(selected.name(), "PaginationOptimizer");
    let plan = component.plan(&infos, &GenericDbmsType);
    assert_eq!(plan.consumed, 3);
    assert_eq!(plan.limit, Some(10));
    assert_eq!(plan.order_by.len(), 1);
}

#[test]
fn skip_and_limit_runs_combine_into_one_window() {
    let component = OptimizerComponent::new();

    let mut limit_then_skip: Pipeline<Item> = Pipeline::new();
    limit_then_skip.push(Action::Limit(10));
    limit_then_skip.push(Action::Skip(3));
    let infos = limit_then_skip.infos();
    let plan = component.plan(&infos, &GenericDbmsType);
    assert_eq!((plan.skip, plan.limit), (3, Some(7)));

    let mut skip_then_limit: Pipeline<Item> = Pipeline::new();
    skip_then_limit.push(Action::Skip(3));
    skip_then_limit.push(Action::Limit(10));
    let infos = skip_then_limit.infos();
    let plan = component.plan(&infos, &GenericDbmsType);
    assert_eq!((plan.skip, plan.limit), (3, Some(10)));

    let mut tighter: Pipeline<Item> = Pipeline::new();
    tighter.push(Action::Limit(9));
    tighter.push(Action::Limit(5));
    let infos = tighter.infos();
    let plan = component.plan(&infos, &GenericDbmsType);
    assert_eq!(plan.limit, Some(5));
}

#[test]
fn pagination_respects_only_after_sorted() {
    let component = OptimizerComponent::new();

    let mut unsorted: Pipeline<Item> = Pipeline::new();
    unsorted.push(Action::Skip(2));
    let infos = unsorted.infos();
    let plan = component.plan(&infos, &SortedOnlyDialect);
    assert_eq!(plan.consumed, 0);

    let mut sorted: Pipeline<Item> = Pipeline::new();
    sorted.push(Action::Sort(age_field().ascending()));
    sorted.push(Action::Skip(2));
    let infos = sorted.infos();
    let plan = component.plan(&infos, &SortedOnlyDialect);
    assert_eq!(plan.consumed, 2);
    assert_eq!(plan.skip, 2);
}

#[test]
fn a_definitive_score_short_circuits_the_search() {
    struct Definitive;
    impl runnel_core::StreamOptimizer for Definitive {
        fn name(&self) -> &'static str {
            "Definitive"
        }
        fn metrics(
            &self,
            _actions: &[runnel_core::ActionInfo],
            _dbms: &dyn DbmsType,
        ) -> i32 {
            i32::MAX
        }
        fn render(
            &self,
            _actions: &[runnel_core::ActionInfo],
            _dbms: &dyn DbmsType,
        ) -> runnel_core::RenderedPlan {
            runnel_core::RenderedPlan::unoptimized()
        }
    }

    let mut component = OptimizerComponent::new();
    component.install(Box::new(Definitive));
    let mut pipeline: Pipeline<Item> = Pipeline::new();
    pipeline.push(Action::Filter(age_field().greater_than(1i64)));
    let infos = pipeline.infos();
    let selected = component
        .select(&infos, &GenericDbmsType)
        .expect("The definitive candidate wins");
    assert_eq!(selected.name(), "Definitive");
}

#[test]
fn later_sorts_dominate_earlier_ones() {
    let mut pipeline: Pipeline<Item> = Pipeline::new();
    pipeline.push(Action::Sort(age_field().ascending()));
    pipeline.push(Action::Sort(name_field().descending()));
    let component = OptimizerComponent::new();
    let infos = pipeline.infos();
    let plan = component.plan(&infos, &GenericDbmsType);
    assert_eq!(plan.consumed, 2);
    let keys: Vec<(&str, Order)> = plan
        .order_by
        .iter()
        .map(|k| (k.column.as_str(), k.order))
        .collect();
    assert_eq!(keys, vec![("name", Order::Desc), ("age", Order::Asc)]);
}
