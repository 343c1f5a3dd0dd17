use crate::config::Db;
use crate::domain::entities::report::ReportRequest;
use crate::domain::value_objects::report_kind::ReportFunction;
use crate::infrastructure::db::database::{Database, DatabaseError, ReportConnection, ResultSet};
use crate::infrastructure::db::postgres::row_decoder::decode_rows;
use async_trait::async_trait;
use sqlx::postgres::PgConnectOptions;
use sqlx::{Connection, PgConnection};
use tracing::warn;

const APPLICATION_NAME: &str = "account_reports";

const ARGUMENT_TYPES_SQL: &str = "SELECT p.proargtypes::pg_catalog.regtype[]::text[] \
     FROM pg_catalog.pg_proc p \
     WHERE p.proname = $1 \
       AND p.pronargs = 3 \
       AND pg_catalog.pg_function_is_visible(p.oid)";

/// Postgres connector. Holds connect options only; every `connect` dials a
/// new connection.
#[derive(Clone)]
pub struct PostgresDatabase {
    options: PgConnectOptions,
}

impl PostgresDatabase {
    pub fn new(settings: &Db) -> Self {
        let options = PgConnectOptions::new()
            .host(&settings.host)
            .port(settings.port)
            .database(&settings.name)
            .username(&settings.user)
            .password(&settings.password)
            .application_name(APPLICATION_NAME);

        Self { options }
    }

    /// Build a connector from a `postgres://` URL.
    pub fn from_url(url: &str) -> Result<Self, DatabaseError> {
        let options = url
            .parse::<PgConnectOptions>()
            .map_err(|e| DatabaseError::Connection(e.to_string()))?
            .application_name(APPLICATION_NAME);

        Ok(Self { options })
    }
}

#[async_trait]
impl Database for PostgresDatabase {
    async fn connect(&self) -> Result<Box<dyn ReportConnection>, DatabaseError> {
        let conn = PgConnection::connect_with(&self.options)
            .await
            .map_err(|e| DatabaseError::Connection(e.to_string()))?;

        Ok(Box::new(PostgresConnection { conn }))
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        let mut conn = PgConnection::connect_with(&self.options)
            .await
            .map_err(|e| DatabaseError::Connection(e.to_string()))?;
        let result = sqlx::query("SELECT 1")
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| DatabaseError::Query(e.to_string()));
        if let Err(err) = conn.close().await {
            warn!(error = %err, "connection_close_failed");
        }
        result
    }
}

struct PostgresConnection {
    conn: PgConnection,
}

#[async_trait]
impl ReportConnection for PostgresConnection {
    async fn call_report(
        &mut self,
        function: ReportFunction,
        request: &ReportRequest,
    ) -> Result<ResultSet, DatabaseError> {
        // Step 1: Open a transaction so nothing the function does outlives the call.
        let mut tx = self
            .conn
            .begin()
            .await
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        // Step 2: Look up the declared argument types so the text parameters
        // can be converted server-side.
        let declared = argument_types(&mut *tx, function).await?;

        // Step 3: Call the function with bound parameters.
        let sql = match &declared {
            Some(types) => typed_call_sql(function, types),
            None => function.call_sql(),
        };
        let rows = sqlx::query(&sql)
            .bind(request.account_number())
            .bind(request.start_date())
            .bind(request.end_date())
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        // Step 4: Discard any side effects.
        tx.rollback()
            .await
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        // Step 5: Convert rows to report values.
        decode_rows(&rows)
    }

    async fn close(self: Box<Self>) -> Result<(), DatabaseError> {
        self.conn
            .close()
            .await
            .map_err(|e| DatabaseError::Connection(e.to_string()))
    }
}

/// Argument types of the single visible three-argument function with this
/// name, as the catalog spells them. `None` when there is no unique match, in
/// which case the call goes out with plain text arguments and Postgres
/// reports the resolution failure itself.
async fn argument_types(
    conn: &mut PgConnection,
    function: ReportFunction,
) -> Result<Option<Vec<String>>, DatabaseError> {
    let mut candidates = sqlx::query_scalar::<_, Vec<String>>(ARGUMENT_TYPES_SQL)
        .bind(function.name())
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| DatabaseError::Query(e.to_string()))?;

    match candidates.pop() {
        Some(types) if candidates.is_empty() && types.len() == 3 => Ok(Some(types)),
        _ => Ok(None),
    }
}

/// `SELECT * FROM f($1::text::<type>, ...)`. The function name comes from
/// [`ReportFunction`] and the type names from the catalog, so request text
/// only ever travels as bound parameters.
fn typed_call_sql(function: ReportFunction, argument_types: &[String]) -> String {
    let arguments = argument_types
        .iter()
        .enumerate()
        .map(|(i, ty)| format!("${}::text::{ty}", i + 1))
        .collect::<Vec<_>>()
        .join(", ");
    format!("SELECT * FROM {}({arguments})", function.name())
}
