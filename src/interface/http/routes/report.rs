// HTTP routes: account reports.

use crate::application::usecases::get_report::{GetReportError, GetReportUseCase};
use crate::domain::services::request_validator::{RawReportParams, validate};
use crate::interface::http::dto::report::ReportResponse;
use crate::interface::http::problem::{DATABASE_ERROR, INTERNAL_ERROR, problem};
use crate::interface::http::state::AppState;
use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;

/// Builds report routes.
pub fn router() -> axum::Router<AppState> {
    axum::Router::new().route("/report", get(get_report))
}

/// Serves a daily or monthly report for one account.
async fn get_report(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Response {
    // Step 1: Collect the raw parameters.
    let Query(pairs) = match query {
        Ok(query) => query,
        Err(rejection) => {
            return problem(StatusCode::BAD_REQUEST, &rejection.body_text(), None);
        }
    };
    let params = RawReportParams {
        account: first(&pairs, "account"),
        report_type: first(&pairs, "type"),
        start: first(&pairs, "start"),
        end: first(&pairs, "end"),
    };

    // Step 2: Validate before touching the database.
    let request = match validate(params) {
        Ok(request) => request,
        Err(err) => return problem(StatusCode::BAD_REQUEST, &err.to_string(), None),
    };

    // Step 3: Execute the report use case and map the outcome.
    match GetReportUseCase::execute(&state.ctx, request).await {
        Ok(report) => (StatusCode::OK, Json(ReportResponse::from(report))).into_response(),
        Err(GetReportError::Database(detail)) => problem(
            StatusCode::INTERNAL_SERVER_ERROR,
            DATABASE_ERROR,
            Some(detail),
        ),
        Err(GetReportError::Internal(detail)) => problem(
            StatusCode::INTERNAL_SERVER_ERROR,
            INTERNAL_ERROR,
            Some(detail),
        ),
    }
}

// Repeated keys resolve to their first occurrence.
fn first(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.clone())
}
