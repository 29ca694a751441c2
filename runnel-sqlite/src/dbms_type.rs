use crate::{SqliteNamingConvention, SqlitePredicateView};
use runnel_core::{
    Context, Dbms, DbmsType, Error, FieldPredicateView, NamingConvention, NullOrderInsertion,
    Result, SkipLimitSupport, SubSelectAlias,
};
use url::Url;

pub const SQLITE_URL_SCHEME: &str = "sqlite";

/// The SQLite dialect descriptor. SQLite is file based: there is no port, no
/// database name and no schema organization.
pub struct SqliteDbmsType;

impl SqliteDbmsType {
    pub const fn new() -> Self {
        Self
    }

    /// Extracts the database file path out of a `sqlite://` connection URL.
    pub fn database_path(connection_url: &str) -> Result<String> {
        let url = Url::parse(connection_url)
            .with_context(|| format!("While decoding the connection URL `{}`", connection_url))?;
        if url.scheme() != SQLITE_URL_SCHEME {
            return Err(Error::msg(format!(
                "Expected a `{}://` connection URL, got `{}`",
                SQLITE_URL_SCHEME, connection_url
            )));
        }
        let mut path = String::new();
        if let Some(host) = url.host_str() {
            path.push_str(host);
        }
        path.push_str(url.path());
        Ok(path)
    }
}

impl Default for SqliteDbmsType {
    fn default() -> Self {
        Self::new()
    }
}

impl DbmsType for SqliteDbmsType {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn connection_url(&self, dbms: &Dbms) -> String {
        format!(
            "{}://{}",
            SQLITE_URL_SCHEME,
            dbms.host.as_deref().unwrap_or(":memory:")
        )
    }

    fn has_schema_names(&self) -> bool {
        false
    }

    fn has_database_names(&self) -> bool {
        false
    }

    fn skip_limit_support(&self) -> SkipLimitSupport {
        SkipLimitSupport::Standard
    }

    fn sub_select_alias(&self) -> SubSelectAlias {
        SubSelectAlias::Required
    }

    /// SQLite has no NULLS FIRST/LAST clause, an `(col IS NULL)` key is
    /// synthesized in front of the natural one.
    fn sort_by_null_order_insertion(&self) -> NullOrderInsertion {
        NullOrderInsertion::Pre
    }

    fn result_set_table_schema(&self) -> &'static str {
        panic!("SQLite does not organize tables in schemas");
    }

    fn naming(&self) -> &dyn NamingConvention {
        &SqliteNamingConvention
    }

    fn predicate_view(&self) -> &dyn FieldPredicateView {
        &SqlitePredicateView
    }
}
