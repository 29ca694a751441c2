use runnel_core::{FieldPredicate, Inclusion, PredicateKind, StringOp, Value};

fn predicate(kind: PredicateKind) -> FieldPredicate {
    FieldPredicate::new("age", kind)
}

#[test]
fn null_operands_satisfy_only_null_checks() {
    let null = Value::Int64(None);
    assert!(predicate(PredicateKind::IsNull).test(&null));
    assert!(!predicate(PredicateKind::IsNotNull).test(&null));
    assert!(!predicate(PredicateKind::Equal(Value::Int64(Some(1)))).test(&null));
    assert!(!predicate(PredicateKind::NotEqual(Value::Int64(Some(1)))).test(&null));
    assert!(!predicate(PredicateKind::In(vec![Value::Int64(Some(1))])).test(&null));
    assert!(!predicate(PredicateKind::NotIn(vec![Value::Int64(Some(1))])).test(&null));
    // Negated matches stay unsatisfied on NULL, like SQL's NOT(NULL LIKE x).
    assert!(
        !predicate(PredicateKind::Matches {
            op: StringOp::Contains,
            value: "x".to_owned(),
            case_insensitive: false,
            negated: true,
        })
        .test(&Value::Varchar(None))
    );
}

#[test]
fn range_comparisons_follow_inclusion() {
    let between = |inclusion| {
        predicate(PredicateKind::Between {
            low: Value::Int64(Some(10)),
            high: Value::Int64(Some(20)),
            inclusion,
        })
    };
    let inclusive = between(Inclusion::StartInclusiveEndInclusive);
    assert!(inclusive.test(&Value::Int64(Some(10))));
    assert!(inclusive.test(&Value::Int64(Some(20))));
    let exclusive = between(Inclusion::StartExclusiveEndExclusive);
    assert!(!exclusive.test(&Value::Int64(Some(10))));
    assert!(!exclusive.test(&Value::Int64(Some(20))));
    assert!(exclusive.test(&Value::Int64(Some(15))));
}

#[test]
fn comparisons_widen_across_integer_variants() {
    let greater = predicate(PredicateKind::GreaterThan(Value::Int64(Some(100))));
    assert!(greater.test(&Value::Int32(Some(101))));
    assert!(!greater.test(&Value::Int16(Some(100))));
}

#[test]
fn string_matching_respects_case_flag() {
    let starts = |case_insensitive, negated| {
        predicate(PredicateKind::Matches {
            op: StringOp::StartsWith,
            value: "Foo".to_owned(),
            case_insensitive,
            negated,
        })
    };
    let subject = Value::Varchar(Some("foobar".to_owned()));
    assert!(!starts(false, false).test(&subject));
    assert!(starts(true, false).test(&subject));
    assert!(starts(false, true).test(&subject));
    assert!(!starts(true, true).test(&subject));
}

#[test]
fn emptiness_checks_only_match_present_strings() {
    let empty = predicate(PredicateKind::IsEmpty);
    assert!(empty.test(&Value::Varchar(Some(String::new()))));
    assert!(!empty.test(&Value::Varchar(Some("x".to_owned()))));
    assert!(!empty.test(&Value::Varchar(None)));
    let not_empty = predicate(PredicateKind::IsNotEmpty);
    assert!(not_empty.test(&Value::Varchar(Some("x".to_owned()))));
    assert!(!not_empty.test(&Value::Varchar(None)));
}

#[test]
fn constants_ignore_the_operand() {
    assert!(predicate(PredicateKind::AlwaysTrue).test(&Value::Null));
    assert!(!predicate(PredicateKind::AlwaysFalse).test(&Value::Int64(Some(1))));
}
