use crate::{
    AnsiNamingConvention, Column, Dbms, FieldPredicateView, NamingConvention, Order, OrderKey,
    StandardPredicateView, Value,
};

/// Pagination capability of a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipLimitSupport {
    /// `LIMIT ? OFFSET ?` after any SELECT.
    Standard,
    /// Pagination is only valid after an explicit ORDER BY.
    OnlyAfterSorted,
    /// No pagination clause, rows are windowed in process.
    None,
}

/// Whether a derived table must carry an alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubSelectAlias {
    Required,
    Prohibited,
}

/// Where NULLS FIRST/LAST style hints are placed around an ORDER BY key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullOrderInsertion {
    /// The dialect has no hint syntax, a `(col IS NULL)` key is synthesized
    /// before the natural key.
    Pre,
    /// `NULLS FIRST`/`NULLS LAST` after the natural key.
    Post,
    /// No hint at all, engine default ordering applies.
    None,
}

/// Bound instead of a limit value when the caller paginates by skip only.
pub const NO_LIMIT: i64 = i64::MAX;

/// Per dialect rules deciding which columns participate in generated
/// INSERT/UPDATE statements.
pub trait ColumnHandler: Send + Sync {
    /// Excluded columns get no slot in the INSERT column/value lists. The
    /// engine populates them from generated keys after the fact.
    fn excluded_in_insert(&self, column: &Column) -> bool {
        column.auto_increment
    }

    fn excluded_in_update(&self, _column: &Column) -> bool {
        false
    }
}

pub struct StandardColumnHandler;

impl ColumnHandler for StandardColumnHandler {}

/// Immutable per process descriptor of one database product: connectivity
/// conventions plus references to the independently swappable strategies
/// (naming, predicate compilation, pagination, column inclusion).
///
/// Constructed once and shared; implementations must be stateless.
pub trait DbmsType: Send + Sync {
    fn name(&self) -> &'static str;

    fn default_port(&self) -> u16 {
        0
    }

    /// Connection URL for the given dbms document node.
    fn connection_url(&self, dbms: &Dbms) -> String;

    fn has_schema_names(&self) -> bool {
        true
    }

    fn has_database_names(&self) -> bool {
        true
    }

    fn skip_limit_support(&self) -> SkipLimitSupport {
        SkipLimitSupport::Standard
    }

    fn sub_select_alias(&self) -> SubSelectAlias {
        SubSelectAlias::Required
    }

    fn sort_by_null_order_insertion(&self) -> NullOrderInsertion {
        NullOrderInsertion::Post
    }

    /// Label under which a metadata result set reports schema names.
    ///
    /// Schema-less dialects must fail loudly here instead of returning a
    /// misleading empty value, since callers branch on schema semantics.
    fn result_set_table_schema(&self) -> &'static str {
        "table_schema"
    }

    fn naming(&self) -> &dyn NamingConvention;

    fn predicate_view(&self) -> &dyn FieldPredicateView;

    fn column_handler(&self) -> &dyn ColumnHandler {
        &StandardColumnHandler
    }

    /// Appends the dialect's pagination clauses and their bound values.
    ///
    /// A no-op for skip 0 with an unbounded limit: the SQL comes back byte
    /// for byte unchanged. Otherwise `LIMIT ?` is appended (binding the limit
    /// or [`NO_LIMIT`] when unbounded) followed by `OFFSET ?` when skip > 0,
    /// values pushed in clause order.
    fn apply_skip_limit(
        &self,
        sql: &mut String,
        params: &mut Vec<Value>,
        skip: u64,
        limit: Option<u64>,
    ) {
        if skip == 0 && limit.is_none() {
            return;
        }
        if self.skip_limit_support() == SkipLimitSupport::None {
            log::warn!(
                "Dialect {} cannot paginate in SQL, the skip/limit clause was not applied",
                self.name()
            );
            return;
        }
        sql.push_str(" LIMIT ?");
        params.push(Value::Int64(Some(
            limit.map(|l| l as i64).unwrap_or(NO_LIMIT),
        )));
        if skip > 0 {
            sql.push_str(" OFFSET ?");
            params.push(Value::Int64(Some(skip as i64)));
        }
    }
}

/// Appends an ORDER BY clause honoring the dialect's null ordering policy.
/// Nulls go first on ascending keys and last on descending ones, matching the
/// engine's in-process comparison.
pub fn write_order_by(sql: &mut String, dbms: &dyn DbmsType, keys: &[OrderKey]) {
    if keys.is_empty() {
        return;
    }
    sql.push_str(" ORDER BY ");
    for (i, key) in keys.iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        let column = dbms.naming().enclose_field(&key.column);
        let direction = match key.order {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        };
        match dbms.sort_by_null_order_insertion() {
            NullOrderInsertion::Pre => {
                // IS NULL yields 1 for nulls: DESC puts them first.
                let null_key = match key.order {
                    Order::Asc => "DESC",
                    Order::Desc => "ASC",
                };
                sql.push_str(&format!(
                    "({} IS NULL) {}, {} {}",
                    column, null_key, column, direction
                ));
            }
            NullOrderInsertion::Post => {
                let nulls = match key.order {
                    Order::Asc => "NULLS FIRST",
                    Order::Desc => "NULLS LAST",
                };
                sql.push_str(&format!("{} {} {}", column, direction, nulls));
            }
            NullOrderInsertion::None => {
                sql.push_str(&format!("{} {}", column, direction));
            }
        }
    }
}

/// ANSI defaults, enough for tests and for backends without a dedicated
/// dialect crate.
pub struct GenericDbmsType;

impl DbmsType for GenericDbmsType {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn connection_url(&self, dbms: &Dbms) -> String {
        format!(
            "{}://{}:{}/{}",
            self.name(),
            dbms.host.as_deref().unwrap_or("localhost"),
            dbms.port.unwrap_or_else(|| self.default_port()),
            dbms.name
        )
    }

    fn naming(&self) -> &dyn NamingConvention {
        &AnsiNamingConvention
    }

    fn predicate_view(&self) -> &dyn FieldPredicateView {
        &StandardPredicateView
    }
}
