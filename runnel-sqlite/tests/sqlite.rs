use runnel_core::{
    Dbms, DbmsType, FieldPredicate, FieldPredicateView, NamingConvention, NullOrderInsertion,
    PredicateKind, SkipLimitSupport, StringOp, SubSelectAlias, TypeMapper, Value,
};
use runnel_sqlite::{
    BooleanAsInteger, SqliteDbmsType, SqliteNamingConvention, SqlitePredicateView, UuidAsText,
    sqlite_type_rules,
};
use std::sync::Arc;
use uuid::Uuid;

#[tokio::test]
async fn scenarios_against_the_sqlite_dialect() {
    runnel_tests::init_logs();
    runnel_tests::execute_scenarios(Arc::new(SqliteDbmsType::new())).await;
}

fn render(kind: PredicateKind) -> runnel_core::SqlFragment {
    SqlitePredicateView.render(&SqliteNamingConvention, &FieldPredicate::new("name", kind))
}

fn starts_with(case_insensitive: bool, negated: bool) -> runnel_core::SqlFragment {
    render(PredicateKind::Matches {
        op: StringOp::StartsWith,
        value: "Foo".to_owned(),
        case_insensitive,
        negated,
    })
}

#[test]
fn case_insensitive_starts_with_uses_collate_nocase() {
    let fragment = starts_with(true, false);
    assert_eq!(
        fragment.sql,
        r#"("name" COLLATE NOCASE LIKE (? || '%') ESCAPE '_')"#
    );
    assert_eq!(fragment.params, vec![Value::Varchar(Some("Foo".to_owned()))]);
}

#[test]
fn negated_variant_wraps_the_whole_fragment() {
    let fragment = starts_with(true, true);
    assert_eq!(
        fragment.sql,
        r#"(NOT ("name" COLLATE NOCASE LIKE (? || '%') ESCAPE '_'))"#
    );
    assert_eq!(fragment.params, vec![Value::Varchar(Some("Foo".to_owned()))]);
}

#[test]
fn case_sensitive_matching_pins_collate_binary() {
    let fragment = starts_with(false, false);
    assert_eq!(
        fragment.sql,
        r#"("name" COLLATE BINARY LIKE (? || '%') ESCAPE '_')"#
    );
    let contains = render(PredicateKind::Matches {
        op: StringOp::Contains,
        value: "oo".to_owned(),
        case_insensitive: true,
        negated: false,
    });
    assert_eq!(
        contains.sql,
        r#"("name" COLLATE NOCASE LIKE ('%' || ? || '%') ESCAPE '_')"#
    );
}

#[test]
fn equality_ignore_case_collates_the_column() {
    let fragment = render(PredicateKind::Matches {
        op: StringOp::Equal,
        value: "Foo".to_owned(),
        case_insensitive: true,
        negated: false,
    });
    assert_eq!(fragment.sql, r#"("name" COLLATE NOCASE = ?)"#);
}

#[test]
fn full_names_never_carry_a_schema_prefix() {
    let naming = SqliteNamingConvention;
    assert_eq!(naming.full_name_of("app", "guest"), r#""guest""#);
    assert_eq!(
        naming.full_name_of_column("app", "guest", "id"),
        r#""guest"."id""#
    );
    assert!(naming.schema_exclude_set().is_empty());
}

#[test]
fn dialect_policies() {
    let dialect = SqliteDbmsType::new();
    assert_eq!(dialect.name(), "sqlite");
    assert_eq!(dialect.default_port(), 0);
    assert!(!dialect.has_schema_names());
    assert!(!dialect.has_database_names());
    assert_eq!(dialect.skip_limit_support(), SkipLimitSupport::Standard);
    assert_eq!(dialect.sub_select_alias(), SubSelectAlias::Required);
    assert_eq!(
        dialect.sort_by_null_order_insertion(),
        NullOrderInsertion::Pre
    );
}

#[test]
#[should_panic(expected = "does not organize tables in schemas")]
fn result_set_table_schema_fails_loudly() {
    SqliteDbmsType::new().result_set_table_schema();
}

#[test]
fn connection_urls_point_at_the_database_file() {
    let dialect = SqliteDbmsType::new();
    let dbms = Dbms {
        name: "app".to_owned(),
        type_name: "sqlite".to_owned(),
        host: Some("data/app.db".to_owned()),
        port: None,
        schemas: Vec::new(),
    };
    assert_eq!(dialect.connection_url(&dbms), "sqlite://data/app.db");
    let in_memory = Dbms {
        host: None,
        ..dbms
    };
    assert_eq!(dialect.connection_url(&in_memory), "sqlite://:memory:");
}

#[test]
fn database_path_round_trips() {
    assert_eq!(
        SqliteDbmsType::database_path("sqlite://data/app.db").expect("Well formed"),
        "data/app.db"
    );
    assert_eq!(
        SqliteDbmsType::database_path("sqlite:///var/lib/app.db").expect("Well formed"),
        "/var/lib/app.db"
    );
    assert!(SqliteDbmsType::database_path("postgres://db").is_err());
}

#[test]
fn type_affinity_rules() {
    let rules = sqlite_type_rules();
    // INT wins over any other fragment, POINT included.
    assert!(rules.resolve("POINT").same_type(&Value::Int64(None)));
    assert!(rules.resolve("BIGINT").same_type(&Value::Int64(None)));
    assert!(rules.resolve("VARCHAR(70)").same_type(&Value::Varchar(None)));
    assert!(rules.resolve("CLOB").same_type(&Value::Varchar(None)));
    assert!(rules.resolve("BLOB").same_type(&Value::Blob(None)));
    assert!(rules.resolve("").same_type(&Value::Blob(None)));
    assert!(rules.resolve("DOUBLE PRECISION").same_type(&Value::Float64(None)));
    // Everything else has NUMERIC affinity.
    assert!(rules.resolve("DATE").same_type(&Value::Decimal(None)));
}

#[test]
fn boolean_mapper_round_trips_through_integer() {
    let mapper = BooleanAsInteger;
    assert_eq!(
        mapper.to_database(Value::Boolean(Some(true))),
        Value::Int64(Some(1))
    );
    assert_eq!(
        mapper.to_entity(Value::Int64(Some(0))).expect("Readable"),
        Value::Boolean(Some(false))
    );
    assert_eq!(
        mapper.to_entity(Value::Int64(None)).expect("Typed null"),
        Value::Boolean(None)
    );
    assert!(mapper.to_entity(Value::Varchar(Some("x".to_owned()))).is_err());
}

#[test]
fn uuid_mapper_round_trips_through_text() {
    let mapper = UuidAsText;
    let id = Uuid::from_u128(0x00112233445566778899aabbccddeeff);
    let text = mapper.to_database(Value::Uuid(Some(id)));
    assert_eq!(text, Value::Varchar(Some(id.to_string())));
    assert_eq!(
        mapper.to_entity(text).expect("Readable"),
        Value::Uuid(Some(id))
    );
    assert!(mapper.to_entity(Value::Varchar(Some("nope".to_owned()))).is_err());
}
