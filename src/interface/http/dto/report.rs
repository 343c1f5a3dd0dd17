use crate::domain::entities::report::{Report, ReportRow};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct PeriodResponse {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub account: String,
    #[serde(rename = "type")]
    pub report_type: &'static str,
    pub period: PeriodResponse,
    pub data: Vec<ReportRow>,
}

impl From<Report> for ReportResponse {
    fn from(report: Report) -> Self {
        let request = report.request;
        Self {
            account: request.account_number().to_string(),
            report_type: request.kind().as_str(),
            period: PeriodResponse {
                start: request.start_date().to_string(),
                end: request.end_date().to_string(),
            },
            data: report.rows,
        }
    }
}
