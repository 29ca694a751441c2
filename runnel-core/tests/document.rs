use runnel_core::{
    Column, ForeignKey, ForeignKeyColumn, Index, IndexColumn, Order, Table, Value,
};

fn base_table() -> Table {
    Table::new("app", "guest")
        .with_column(Column::new("id", 1, Value::Int64(None)))
        .with_column(Column::new("name", 2, Value::Varchar(None)))
        .with_primary_key("id")
}

#[test]
fn well_formed_table_validates() {
    base_table().validate().expect("The table is well formed");
}

#[test]
fn duplicate_column_ids_are_rejected() {
    let table = base_table().with_column(Column::new("name", 3, Value::Varchar(None)));
    assert!(table.validate().is_err());
}

#[test]
fn non_contiguous_ordinals_are_rejected() {
    let table = Table::new("app", "guest")
        .with_column(Column::new("id", 1, Value::Int64(None)))
        .with_column(Column::new("name", 3, Value::Varchar(None)));
    assert!(table.validate().is_err());
}

#[test]
fn primary_key_must_reference_a_sibling_column() {
    let table = Table::new("app", "guest")
        .with_column(Column::new("id", 1, Value::Int64(None)))
        .with_primary_key("missing");
    assert!(table.validate().is_err());
}

#[test]
fn views_never_carry_a_primary_key() {
    let table = base_table().view(true);
    assert!(table.validate().is_err());
}

#[test]
fn foreign_key_matching_a_unique_index_is_accepted() {
    let table = base_table()
        .with_index(Index {
            name: "guest_name_idx".to_owned(),
            unique: true,
            columns: vec![IndexColumn {
                name: "name".to_owned(),
                ordinal: 1,
                order: Order::Asc,
            }],
        })
        .with_foreign_key(ForeignKey {
            name: "guest_name_fk".to_owned(),
            columns: vec![ForeignKeyColumn {
                name: "name".to_owned(),
                ordinal: 1,
                foreign_table: "person".to_owned(),
                foreign_column: "name".to_owned(),
            }],
        });
    table.validate().expect("Exact column set matches reconcile");
}

#[test]
fn foreign_key_partially_overlapping_a_unique_index_is_flagged() {
    let table = base_table()
        .with_index(Index {
            name: "guest_id_name_idx".to_owned(),
            unique: true,
            columns: vec![
                IndexColumn {
                    name: "id".to_owned(),
                    ordinal: 1,
                    order: Order::Asc,
                },
                IndexColumn {
                    name: "name".to_owned(),
                    ordinal: 2,
                    order: Order::Asc,
                },
            ],
        })
        .with_foreign_key(ForeignKey {
            name: "guest_name_fk".to_owned(),
            columns: vec![ForeignKeyColumn {
                name: "name".to_owned(),
                ordinal: 1,
                foreign_table: "person".to_owned(),
                foreign_column: "name".to_owned(),
            }],
        });
    assert!(table.validate().is_err());
}

#[test]
fn enabled_columns_come_back_in_ordinal_order() {
    let table = Table::new("app", "guest")
        .with_column(Column::new("name", 2, Value::Varchar(None)))
        .with_column(Column::new("id", 1, Value::Int64(None)))
        .with_column(Column::new("hidden", 3, Value::Varchar(None)).enabled(false));
    let names: Vec<&str> = table
        .enabled_columns()
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, ["id", "name"]);
}

#[test]
fn primary_key_columns_resolve_in_key_order() {
    let table = Table::new("app", "visit")
        .with_column(Column::new("guest", 1, Value::Int64(None)))
        .with_column(Column::new("day", 2, Value::Date(None)))
        .with_primary_key("day")
        .with_primary_key("guest");
    let names: Vec<&str> = table
        .primary_key_columns()
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, ["day", "guest"]);
}
