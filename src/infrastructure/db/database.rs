use crate::domain::entities::report::{ReportRequest, ReportValue};
use crate::domain::value_objects::report_kind::ReportFunction;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DatabaseError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),

    /// A returned value has no JSON representation.
    #[error("conversion error: {0}")]
    Conversion(String),
}

/// Tabular output of one reporting function call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<ReportValue>>,
}

/// Opens connections to the reporting database.
#[async_trait]
pub trait Database: Send + Sync {
    /// Open a fresh connection. Each call yields a connection the caller owns
    /// and must close.
    async fn connect(&self) -> Result<Box<dyn ReportConnection>, DatabaseError>;

    /// Round-trip check used by the readiness route.
    async fn ping(&self) -> Result<(), DatabaseError> {
        let conn = self.connect().await?;
        conn.close().await
    }
}

/// A single open connection scoped to one request.
#[async_trait]
pub trait ReportConnection: Send {
    /// Call `function(account, start, end)` and read every row.
    async fn call_report(
        &mut self,
        function: ReportFunction,
        request: &ReportRequest,
    ) -> Result<ResultSet, DatabaseError>;

    /// Release the connection. Dropping without closing also releases it,
    /// but without a clean protocol shutdown.
    async fn close(self: Box<Self>) -> Result<(), DatabaseError>;
}
