use runnel_core::{NameMatch, TypeNameRule, TypeNameRules, Value};

/// SQLite's type affinity rules, in affinity resolution order: INT wins over
/// any other fragment, then text markers, then BLOB (including the absent
/// type name), then the floating point markers. Everything else has NUMERIC
/// affinity.
pub fn sqlite_type_rules() -> TypeNameRules {
    use NameMatch::*;
    let rules = [
        (Contains("INT"), Value::Int64(None)),
        (Contains("CHAR"), Value::Varchar(None)),
        (Contains("CLOB"), Value::Varchar(None)),
        (Contains("TEXT"), Value::Varchar(None)),
        (Contains("BLOB"), Value::Blob(None)),
        (Exact(""), Value::Blob(None)),
        (Contains("REAL"), Value::Float64(None)),
        (Contains("FLOA"), Value::Float64(None)),
        (Contains("DOUB"), Value::Float64(None)),
    ]
    .into_iter()
    .map(|(pattern, template)| TypeNameRule { pattern, template })
    .collect();
    TypeNameRules::new(rules, Value::Decimal(None))
}
