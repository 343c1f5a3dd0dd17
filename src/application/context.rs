use std::sync::Arc;

use crate::infrastructure::db::database::Database;

/// Shared application resources used by use cases.
#[derive(Clone)]
pub struct AppContext {
    pub db: Arc<dyn Database>,
}

impl AppContext {
    /// Build a new application context around a database connector.
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }
}

#[cfg(test)]
pub mod test_support {
    use super::AppContext;
    use crate::domain::entities::report::ReportRequest;
    use crate::domain::value_objects::report_kind::ReportFunction;
    use crate::infrastructure::db::database::{Database, DatabaseError, ReportConnection, ResultSet};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// What the scripted connection does when the report is called.
    #[derive(Clone)]
    pub enum CallOutcome {
        Rows(ResultSet),
        Fail(DatabaseError),
        Panic,
    }

    /// Arguments seen by a scripted connection.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RecordedCall {
        pub function: &'static str,
        pub account: String,
        pub start: String,
        pub end: String,
    }

    #[derive(Default)]
    pub struct Counters {
        pub connects: AtomicUsize,
        pub closes: AtomicUsize,
        pub drops: AtomicUsize,
        pub calls: Mutex<Vec<RecordedCall>>,
    }

    impl Counters {
        pub fn connects(&self) -> usize {
            self.connects.load(Ordering::SeqCst)
        }

        pub fn closes(&self) -> usize {
            self.closes.load(Ordering::SeqCst)
        }

        pub fn drops(&self) -> usize {
            self.drops.load(Ordering::SeqCst)
        }

        pub fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    pub struct ScriptedDatabase {
        pub connect_error: Option<DatabaseError>,
        pub outcome: CallOutcome,
        pub counters: Arc<Counters>,
    }

    impl ScriptedDatabase {
        pub fn returning(set: ResultSet) -> Self {
            Self::with_outcome(CallOutcome::Rows(set))
        }

        pub fn with_outcome(outcome: CallOutcome) -> Self {
            Self {
                connect_error: None,
                outcome,
                counters: Arc::new(Counters::default()),
            }
        }

        pub fn refusing(err: DatabaseError) -> Self {
            Self {
                connect_error: Some(err),
                outcome: CallOutcome::Rows(ResultSet::default()),
                counters: Arc::new(Counters::default()),
            }
        }
    }

    struct ScriptedConnection {
        outcome: CallOutcome,
        counters: Arc<Counters>,
    }

    impl Drop for ScriptedConnection {
        fn drop(&mut self) {
            self.counters.drops.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl Database for ScriptedDatabase {
        async fn connect(&self) -> Result<Box<dyn ReportConnection>, DatabaseError> {
            self.counters.connects.fetch_add(1, Ordering::SeqCst);
            if let Some(err) = &self.connect_error {
                return Err(err.clone());
            }
            Ok(Box::new(ScriptedConnection {
                outcome: self.outcome.clone(),
                counters: self.counters.clone(),
            }))
        }
    }

    #[async_trait]
    impl ReportConnection for ScriptedConnection {
        async fn call_report(
            &mut self,
            function: ReportFunction,
            request: &ReportRequest,
        ) -> Result<ResultSet, DatabaseError> {
            self.counters.calls.lock().unwrap().push(RecordedCall {
                function: function.name(),
                account: request.account_number().to_string(),
                start: request.start_date().to_string(),
                end: request.end_date().to_string(),
            });
            match &self.outcome {
                CallOutcome::Rows(set) => Ok(set.clone()),
                CallOutcome::Fail(err) => Err(err.clone()),
                CallOutcome::Panic => panic!("scripted backend panic"),
            }
        }

        async fn close(self: Box<Self>) -> Result<(), DatabaseError> {
            self.counters.closes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    pub fn test_context(db: ScriptedDatabase) -> (AppContext, Arc<Counters>) {
        let counters = db.counters.clone();
        (AppContext::new(Arc::new(db)), counters)
    }
}
