use runnel_core::{TypeNameRules, Value};
use std::cmp::Ordering;

#[test]
fn nulls_sort_before_any_present_value() {
    let null = Value::Int64(None);
    let present = Value::Int64(Some(-5));
    assert_eq!(null.compare(&present), Some(Ordering::Less));
    assert_eq!(present.compare(&null), Some(Ordering::Greater));
    assert_eq!(null.compare(&Value::Null), Some(Ordering::Equal));
}

#[test]
fn integers_compare_across_widths() {
    assert_eq!(
        Value::Int8(Some(5)).compare(&Value::Int64(Some(5))),
        Some(Ordering::Equal)
    );
    assert_eq!(
        Value::Int16(Some(-1)).compare(&Value::Int32(Some(1))),
        Some(Ordering::Less)
    );
    assert_eq!(
        Value::Int64(Some(10)).compare(&Value::Float64(Some(9.5))),
        Some(Ordering::Greater)
    );
}

#[test]
fn incompatible_variants_do_not_compare()  {
    assert_eq!(
        Value::Varchar(Some("a".to_owned())).compare(&Value::Int64(Some(1))),
        None
    );
}

#[test]
fn generated_keys_cast_into_the_column_template() {
    let narrow = Value::cast_generated_key(&Value::Int32(None), 7).expect("7 fits");
    assert_eq!(narrow, Value::Int32(Some(7)));
    let wide = Value::cast_generated_key(&Value::Int64(None), i64::MAX).expect("Fits");
    assert_eq!(wide, Value::Int64(Some(i64::MAX)));
    assert!(Value::cast_generated_key(&Value::Int8(None), 1000).is_err());
    assert!(Value::cast_generated_key(&Value::Varchar(None), 1).is_err());
}

#[test]
fn display_renders_sql_literals() {
    assert_eq!(Value::Null.to_string(), "NULL");
    assert_eq!(Value::Int64(None).to_string(), "NULL");
    assert_eq!(Value::Boolean(Some(true)).to_string(), "true");
    assert_eq!(Value::Int32(Some(-7)).to_string(), "-7");
    assert_eq!(
        Value::Varchar(Some("it's".to_owned())).to_string(),
        "'it''s'"
    );
    assert_eq!(
        Value::Blob(Some(vec![0x0f, 0xa0].into_boxed_slice())).to_string(),
        "X'0FA0'"
    );
}

#[test]
fn accessors_widen_but_do_not_parse() {
    assert_eq!(Value::Int16(Some(3)).as_i64(), Some(3));
    assert_eq!(Value::Varchar(Some("3".to_owned())).as_i64(), None);
    assert_eq!(Value::Int64(Some(0)).as_bool(), Some(false));
    assert_eq!(Value::Varchar(Some("x".to_owned())).as_str(), Some("x"));
}

#[test]
fn ansi_type_rules_strip_parameters() {
    let rules = TypeNameRules::ansi();
    assert!(rules.resolve("VARCHAR(32)").same_type(&Value::Varchar(None)));
    assert!(rules.resolve("numeric(10,2)").same_type(&Value::Decimal(None)));
    assert!(rules.resolve("BIGINT").same_type(&Value::Int64(None)));
    assert!(rules.resolve("TIMESTAMP(6)").same_type(&Value::Timestamp(None)));
    assert!(rules.resolve("SOMETHING ODD").same_type(&Value::Varchar(None)));
}
