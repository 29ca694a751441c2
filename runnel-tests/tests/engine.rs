use runnel_core::{GenericDbmsType, PersistenceProvider, SqlStreamSupplier};
use runnel_tests::entities::{guest_binding, ticket_binding};
use std::sync::Arc;

#[tokio::test]
async fn scenarios_against_the_generic_dialect() {
    runnel_tests::init_logs();
    runnel_tests::execute_scenarios(Arc::new(GenericDbmsType)).await;
}

#[test]
fn base_select_lists_enabled_columns_in_ordinal_order() {
    let supplier = SqlStreamSupplier::new(guest_binding(), Arc::new(GenericDbmsType));
    assert_eq!(
        supplier.select_sql(),
        r#"SELECT "id", "name", "age", "email" FROM "app"."guest""#
    );
}

#[test]
fn insert_statement_skips_generated_columns() {
    let provider = PersistenceProvider::new(ticket_binding(), Arc::new(GenericDbmsType))
        .expect("The provider builds");
    assert_eq!(
        provider.insert_sql(),
        r#"INSERT INTO "app"."ticket" ("holder") VALUES (?)"#
    );
}
