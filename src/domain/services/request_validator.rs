// Validation of raw report query parameters.

use crate::domain::entities::report::ReportRequest;
use crate::domain::value_objects::report_kind::ReportKind;
use thiserror::Error;

pub const REQUIRED_PARAMETERS: [&str; 4] = ["account", "type", "start", "end"];

/// Raw `/report` query parameters as they arrive from the transport.
#[derive(Debug, Clone, Default)]
pub struct RawReportParams {
    pub account: Option<String>,
    pub report_type: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error(
        "missing required parameters: {}; all of account, type, start, end are required",
        .missing.join(", ")
    )]
    MissingParameter { missing: Vec<&'static str> },

    #[error("parameter type must be 'daily' or 'monthly', got '{value}'")]
    InvalidReportType { value: String },
}

/// Turns raw parameters into a [`ReportRequest`].
///
/// Only presence and the report type are checked. Dates and the account
/// number are passed through untouched for the backend function to judge.
pub fn validate(params: RawReportParams) -> Result<ReportRequest, ValidationError> {
    // Step 1: Every parameter must be present and non-empty.
    let RawReportParams {
        account,
        report_type,
        start,
        end,
    } = params;
    let fields = [account, report_type, start, end];
    let missing = REQUIRED_PARAMETERS
        .iter()
        .zip(fields.iter())
        .filter(|(_, value)| value.as_deref().map_or(true, str::is_empty))
        .map(|(name, _)| *name)
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        return Err(ValidationError::MissingParameter { missing });
    }
    let [Some(account), Some(report_type), Some(start), Some(end)] = fields else {
        return Err(ValidationError::MissingParameter {
            missing: REQUIRED_PARAMETERS.to_vec(),
        });
    };

    // Step 2: Resolve the report kind.
    let kind = ReportKind::parse(&report_type)
        .ok_or(ValidationError::InvalidReportType { value: report_type })?;

    Ok(ReportRequest::new(account, kind, start, end))
}
