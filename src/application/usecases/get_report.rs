// Use case: get_report.

use crate::application::context::AppContext;
use crate::domain::entities::report::{Report, ReportRequest, ReportRow};
use crate::infrastructure::db::database::{Database, DatabaseError, ResultSet};
use metrics::{counter, histogram};
use std::sync::Arc;
use tracing::{info, warn};

/// Runs one reporting function for a validated request.
pub struct GetReportUseCase;

#[derive(Debug)]
pub enum GetReportError {
    /// The database failed to connect, execute, or return rows.
    Database(String),
    /// Anything else, including a panic inside the unit of work.
    Internal(String),
}

impl GetReportUseCase {
    /// Call the backend function selected by the request's kind and shape its rows.
    pub async fn execute(ctx: &AppContext, request: ReportRequest) -> Result<Report, GetReportError> {
        let kind = request.kind();
        let start = std::time::Instant::now();

        // Step 1: Run the unit of work on its own task so a panic surfaces as an error.
        let result = match tokio::spawn(run(ctx.db.clone(), request)).await {
            Ok(result) => result,
            Err(err) => Err(GetReportError::Internal(err.to_string())),
        };

        // Step 2: Record the outcome.
        let latency_ms = start.elapsed().as_millis() as u64;
        let outcome = match &result {
            Ok(_) => "ok",
            Err(GetReportError::Database(_)) => "database_error",
            Err(GetReportError::Internal(_)) => "internal_error",
        };
        counter!("report_requests_total", "kind" => kind.as_str(), "outcome" => outcome)
            .increment(1);
        histogram!("report_backend_duration_ms", "kind" => kind.as_str()).record(latency_ms as f64);
        match &result {
            Ok(report) => info!(
                kind = kind.as_str(),
                function = kind.function().name(),
                rows = report.rows.len(),
                latency_ms,
                "report_served"
            ),
            Err(err) => warn!(
                kind = kind.as_str(),
                function = kind.function().name(),
                error = ?err,
                latency_ms,
                "report_failed"
            ),
        }

        result
    }
}

async fn run(db: Arc<dyn Database>, request: ReportRequest) -> Result<Report, GetReportError> {
    // Step 1: Resolve the backend function from the closed set.
    let function = request.kind().function();

    // Step 2: Open a connection owned by this request.
    let mut conn = db.connect().await.map_err(classify)?;

    // Step 3: Call the function, then close regardless of the outcome.
    let result = conn.call_report(function, &request).await;
    if let Err(err) = conn.close().await {
        warn!(function = function.name(), error = %err, "connection_close_failed");
    }
    let ResultSet { columns, rows } = result.map_err(classify)?;

    // Step 4: Pair every row with the column names, keeping backend order.
    let rows = rows
        .into_iter()
        .map(|values| ReportRow::from_columns(&columns, values))
        .collect::<Vec<_>>();

    Ok(Report { request, rows })
}

fn classify(err: DatabaseError) -> GetReportError {
    match err {
        DatabaseError::Connection(_) | DatabaseError::Query(_) => {
            GetReportError::Database(err.to_string())
        }
        DatabaseError::Conversion(_) => GetReportError::Internal(err.to_string()),
    }
}
