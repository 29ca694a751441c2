use runnel_core::{
    AnsiNamingConvention, FieldPredicate, FieldPredicateView, Inclusion, PredicateKind,
    StandardPredicateView, StringOp, Value,
};

fn render(kind: PredicateKind) -> runnel_core::SqlFragment {
    StandardPredicateView.render(&AnsiNamingConvention, &FieldPredicate::new("age", kind))
}

#[test]
fn placeholder_parity_across_kinds() {
    let cases = vec![
        (render(PredicateKind::AlwaysTrue), 0),
        (render(PredicateKind::AlwaysFalse), 0),
        (render(PredicateKind::IsNull), 0),
        (render(PredicateKind::IsNotNull), 0),
        (render(PredicateKind::IsEmpty), 0),
        (render(PredicateKind::Equal(Value::Int64(Some(1)))), 1),
        (render(PredicateKind::NotEqual(Value::Int64(Some(1)))), 1),
        (render(PredicateKind::GreaterThan(Value::Int64(Some(1)))), 1),
        (
            render(PredicateKind::Between {
                low: Value::Int64(Some(1)),
                high: Value::Int64(Some(9)),
                inclusion: Inclusion::StartInclusiveEndInclusive,
            }),
            2,
        ),
        (
            render(PredicateKind::In(vec![
                Value::Int64(Some(1)),
                Value::Int64(Some(2)),
                Value::Int64(Some(3)),
            ])),
            3,
        ),
        (
            render(PredicateKind::Matches {
                op: StringOp::Contains,
                value: "foo".to_owned(),
                case_insensitive: false,
                negated: false,
            }),
            1,
        ),
    ];
    for (fragment, expected) in cases {
        assert_eq!(fragment.placeholder_count(), expected, "in {}", fragment.sql);
        assert_eq!(fragment.params.len(), expected, "in {}", fragment.sql);
    }
}

#[test]
fn equality_renders_quoted_column() {
    let fragment = render(PredicateKind::Equal(Value::Int64(Some(42))));
    assert_eq!(fragment.sql, r#"("age" = ?)"#);
    assert_eq!(fragment.params, vec![Value::Int64(Some(42))]);
}

#[test]
fn in_set_degenerations() {
    let empty = render(PredicateKind::In(vec![]));
    assert_eq!(empty.sql, "(FALSE)");
    assert!(empty.params.is_empty());

    let not_empty = render(PredicateKind::NotIn(vec![]));
    assert_eq!(not_empty.sql, "(TRUE)");
    assert!(not_empty.params.is_empty());

    let singleton = render(PredicateKind::In(vec![Value::Int64(Some(5))]));
    let equal = render(PredicateKind::Equal(Value::Int64(Some(5))));
    assert_eq!(singleton, equal);

    let triple = render(PredicateKind::In(vec![
        Value::Int64(Some(3)),
        Value::Int64(Some(1)),
        Value::Int64(Some(2)),
    ]));
    assert_eq!(triple.sql, r#"("age" IN (?,?,?))"#);
    // Iteration order is preserved in the bound values.
    assert_eq!(
        triple.params,
        vec![
            Value::Int64(Some(3)),
            Value::Int64(Some(1)),
            Value::Int64(Some(2)),
        ]
    );
}

#[test]
fn between_inclusion_variants() {
    let cases = [
        (Inclusion::StartInclusiveEndInclusive, ">=", "<="),
        (Inclusion::StartInclusiveEndExclusive, ">=", "<"),
        (Inclusion::StartExclusiveEndInclusive, ">", "<="),
        (Inclusion::StartExclusiveEndExclusive, ">", "<"),
    ];
    for (inclusion, start, end) in cases {
        let fragment = render(PredicateKind::Between {
            low: Value::Int64(Some(1)),
            high: Value::Int64(Some(9)),
            inclusion,
        });
        let expected = format!(r#"("age" {} ? AND "age" {} ?)"#, start, end);
        assert_eq!(fragment.sql, expected);
    }
}

#[test]
fn not_between_wraps_the_whole_fragment() {
    let fragment = render(PredicateKind::NotBetween {
        low: Value::Int64(Some(1)),
        high: Value::Int64(Some(9)),
        inclusion: Inclusion::StartInclusiveEndInclusive,
    });
    assert_eq!(fragment.sql, r#"(NOT ("age" >= ? AND "age" <= ?))"#);
    assert_eq!(fragment.params.len(), 2);
}

#[test]
fn negated_pattern_wraps_in_not() {
    let plain = render(PredicateKind::Matches {
        op: StringOp::StartsWith,
        value: "Foo".to_owned(),
        case_insensitive: false,
        negated: false,
    });
    let negated = render(PredicateKind::Matches {
        op: StringOp::StartsWith,
        value: "Foo".to_owned(),
        case_insensitive: false,
        negated: true,
    });
    assert_eq!(negated.sql, format!("(NOT {})", plain.sql));
    assert_eq!(negated.params, plain.params);
}

#[test]
fn ansi_case_insensitive_lowers_both_sides() {
    let fragment = render(PredicateKind::Matches {
        op: StringOp::StartsWith,
        value: "Foo".to_owned(),
        case_insensitive: true,
        negated: false,
    });
    assert_eq!(fragment.sql, r#"(LOWER("age") LIKE (LOWER(?) || '%'))"#);
    assert_eq!(fragment.params, vec![Value::Varchar(Some("Foo".to_owned()))]);
}

#[test]
fn fragment_composition_preserves_parameter_order() {
    let first = render(PredicateKind::Equal(Value::Int64(Some(1))));
    let second = render(PredicateKind::Equal(Value::Int64(Some(2))));
    let combined = first.and(second);
    assert_eq!(combined.sql, r#"(("age" = ?) AND ("age" = ?))"#);
    assert_eq!(
        combined.params,
        vec![Value::Int64(Some(1)), Value::Int64(Some(2))]
    );
    assert_eq!(combined.placeholder_count(), combined.params.len());
}
