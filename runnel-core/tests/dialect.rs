use runnel_core::{
    AnsiNamingConvention, Dbms, DbmsType, FieldPredicateView, GenericDbmsType, NO_LIMIT,
    NamingConvention, NullOrderInsertion, Order, OrderKey, StandardPredicateView, Value,
    write_order_by,
};

struct PreNullDialect;

impl DbmsType for PreNullDialect {
    fn name(&self) -> &'static str {
        "prenull"
    }
    fn connection_url(&self, _dbms: &Dbms) -> String {
        "prenull://".to_owned()
    }
    fn sort_by_null_order_insertion(&self) -> NullOrderInsertion {
        NullOrderInsertion::Pre
    }
    fn naming(&self) -> &dyn NamingConvention {
        &AnsiNamingConvention
    }
    fn predicate_view(&self) -> &dyn FieldPredicateView {
        &StandardPredicateView
    }
}

#[test]
fn skip_limit_noop_leaves_sql_untouched() {
    let mut sql = "SELECT \"a\" FROM \"t\"".to_owned();
    let original = sql.clone();
    let mut params = Vec::new();
    GenericDbmsType.apply_skip_limit(&mut sql, &mut params, 0, None);
    assert_eq!(sql, original);
    assert!(params.is_empty());
}

#[test]
fn skip_and_limit_append_in_clause_order() {
    let mut sql = "SELECT \"a\" FROM \"t\"".to_owned();
    let mut params = Vec::new();
    GenericDbmsType.apply_skip_limit(&mut sql, &mut params, 5, Some(10));
    assert_eq!(sql, "SELECT \"a\" FROM \"t\" LIMIT ? OFFSET ?");
    assert_eq!(
        params,
        vec![Value::Int64(Some(10)), Value::Int64(Some(5))]
    );
}

#[test]
fn skip_without_limit_binds_the_no_limit_sentinel() {
    let mut sql = "SELECT \"a\" FROM \"t\"".to_owned();
    let mut params = Vec::new();
    GenericDbmsType.apply_skip_limit(&mut sql, &mut params, 3, None);
    assert_eq!(sql, "SELECT \"a\" FROM \"t\" LIMIT ? OFFSET ?");
    assert_eq!(
        params,
        vec![Value::Int64(Some(NO_LIMIT)), Value::Int64(Some(3))]
    );
}

#[test]
fn limit_without_skip_emits_no_offset() {
    let mut sql = "SELECT \"a\" FROM \"t\"".to_owned();
    let mut params = Vec::new();
    GenericDbmsType.apply_skip_limit(&mut sql, &mut params, 0, Some(7));
    assert_eq!(sql, "SELECT \"a\" FROM \"t\" LIMIT ?");
    assert_eq!(params, vec![Value::Int64(Some(7))]);
}

#[test]
fn order_by_post_insertion_appends_null_hints() {
    let mut sql = String::new();
    let keys = [
        OrderKey {
            column: "age".to_owned(),
            order: Order::Asc,
        },
        OrderKey {
            column: "name".to_owned(),
            order: Order::Desc,
        },
    ];
    write_order_by(&mut sql, &GenericDbmsType, &keys);
    assert_eq!(
        sql,
        " ORDER BY \"age\" ASC NULLS FIRST, \"name\" DESC NULLS LAST"
    );
}

#[test]
fn order_by_pre_insertion_synthesizes_is_null_keys() {
    let mut sql = String::new();
    let keys = [OrderKey {
        column: "age".to_owned(),
        order: Order::Asc,
    }];
    write_order_by(&mut sql, &PreNullDialect, &keys);
    assert_eq!(sql, " ORDER BY (\"age\" IS NULL) DESC, \"age\" ASC");
}

#[test]
fn order_by_without_keys_appends_nothing() {
    let mut sql = "SELECT 1".to_owned();
    write_order_by(&mut sql, &GenericDbmsType, &[]);
    assert_eq!(sql, "SELECT 1");
}

#[test]
fn generic_connection_url_uses_host_and_port() {
    let dbms = Dbms {
        name: "app".to_owned(),
        type_name: "generic".to_owned(),
        host: Some("db.example.com".to_owned()),
        port: Some(5555),
        schemas: Vec::new(),
    };
    assert_eq!(
        GenericDbmsType.connection_url(&dbms),
        "generic://db.example.com:5555/app"
    );
}

#[test]
fn ansi_naming_quotes_and_escapes() {
    let naming = AnsiNamingConvention;
    assert_eq!(naming.enclose_field("age"), "\"age\"");
    assert_eq!(naming.enclose_field("we\"ird"), "\"we\"\"ird\"");
    assert_eq!(naming.full_name_of("app", "guest"), "\"app\".\"guest\"");
    assert_eq!(naming.full_name_of("", "guest"), "\"guest\"");
    assert_eq!(
        naming.full_name_of_column("app", "guest", "id"),
        "\"app\".\"guest\".\"id\""
    );
    assert_eq!(naming.quote_field("it's"), "'it''s'");
    assert_eq!(naming.quote_field("a\"b"), "'a\\\"b'");
    assert!(naming.schema_exclude_set().contains(&"information_schema"));
}
