use crate::Value;

/// How a rule matches a database type name. Matching happens on the upper
/// cased base name, with any parameter list (`(10,2)` and the like) already
/// stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameMatch {
    Exact(&'static str),
    Prefix(&'static str),
    Contains(&'static str),
}

impl NameMatch {
    fn applies(&self, base: &str) -> bool {
        match self {
            NameMatch::Exact(name) => base == *name,
            NameMatch::Prefix(prefix) => base.starts_with(prefix),
            NameMatch::Contains(fragment) => base.contains(fragment),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TypeNameRule {
    pub pattern: NameMatch,
    pub template: Value,
}

/// Ordered, first match wins table mapping database type names to [`Value`]
/// type templates. Consumed when document trees are built from a metadata
/// read; dialects ship their own rule lists.
#[derive(Debug, Clone)]
pub struct TypeNameRules {
    rules: Vec<TypeNameRule>,
    fallback: Value,
}

impl TypeNameRules {
    pub fn new(rules: Vec<TypeNameRule>, fallback: Value) -> Self {
        Self { rules, fallback }
    }

    pub fn resolve(&self, type_name: &str) -> Value {
        let base = type_name
            .split('(')
            .next()
            .unwrap_or(type_name)
            .trim()
            .to_uppercase();
        self.rules
            .iter()
            .find(|rule| rule.pattern.applies(&base))
            .map(|rule| rule.template.clone())
            .unwrap_or_else(|| self.fallback.clone())
    }

    /// ANSI defaults, enough for backends without a dedicated dialect crate.
    pub fn ansi() -> Self {
        use NameMatch::*;
        let rules = [
            (Exact("BOOLEAN"), Value::Boolean(None)),
            (Exact("TINYINT"), Value::Int8(None)),
            (Exact("SMALLINT"), Value::Int16(None)),
            (Exact("INTEGER"), Value::Int32(None)),
            (Exact("INT"), Value::Int32(None)),
            (Exact("BIGINT"), Value::Int64(None)),
            (Exact("REAL"), Value::Float32(None)),
            (Exact("FLOAT"), Value::Float64(None)),
            (Prefix("DOUBLE"), Value::Float64(None)),
            (Exact("DECIMAL"), Value::Decimal(None)),
            (Exact("NUMERIC"), Value::Decimal(None)),
            (Contains("CHAR"), Value::Varchar(None)),
            (Exact("TEXT"), Value::Varchar(None)),
            (Contains("BINARY"), Value::Blob(None)),
            (Exact("BLOB"), Value::Blob(None)),
            (Exact("DATE"), Value::Date(None)),
            (Exact("TIME"), Value::Time(None)),
            (Prefix("TIMESTAMP"), Value::Timestamp(None)),
            (Exact("UUID"), Value::Uuid(None)),
        ]
        .into_iter()
        .map(|(pattern, template)| TypeNameRule { pattern, template })
        .collect();
        Self::new(rules, Value::Varchar(None))
    }
}
