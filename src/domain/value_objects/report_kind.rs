/// Which backend aggregation a report request asks for.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ReportKind {
    Daily,
    Monthly,
}

impl ReportKind {
    /// Parse the `type` query value. Matching is case-sensitive.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "daily" => Some(ReportKind::Daily),
            "monthly" => Some(ReportKind::Monthly),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReportKind::Daily => "daily",
            ReportKind::Monthly => "monthly",
        }
    }

    /// The database function that produces this kind of report.
    pub fn function(self) -> ReportFunction {
        match self {
            ReportKind::Daily => ReportFunction("daily_report"),
            ReportKind::Monthly => ReportFunction("monthly_report"),
        }
    }
}

/// Name of a server-side reporting function.
///
/// The only identifier ever spliced into query text. It cannot be built from
/// a string outside this module, so every value is one of the literals in
/// [`ReportKind::function`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct ReportFunction(&'static str);

impl ReportFunction {
    pub fn name(self) -> &'static str {
        self.0
    }

    /// Query calling the function with account, start and end bound as
    /// `$1`, `$2`, `$3`.
    pub fn call_sql(self) -> String {
        format!("SELECT * FROM {}($1, $2, $3)", self.0)
    }
}
