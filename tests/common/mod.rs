#![allow(dead_code)]

use account_reports::application::context::AppContext;
use account_reports::domain::entities::report::ReportRequest;
use account_reports::domain::value_objects::report_kind::ReportFunction;
use account_reports::infrastructure::db::database::{
    Database, DatabaseError, ReportConnection, ResultSet,
};
use account_reports::interface::http::state::AppState;
use async_trait::async_trait;
use axum::body::to_bytes;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Records every interaction so tests can assert on connects, calls and closes.
#[derive(Default)]
pub struct Recorder {
    connects: AtomicUsize,
    closes: AtomicUsize,
    calls: Mutex<Vec<(String, String, String, String)>>,
}

impl Recorder {
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// `(function, account, start, end)` per backend call.
    pub fn calls(&self) -> Vec<(String, String, String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

pub struct FakeDatabase {
    pub recorder: Arc<Recorder>,
    pub connect_error: Option<DatabaseError>,
    pub result: Result<ResultSet, DatabaseError>,
}

impl FakeDatabase {
    pub fn returning(set: ResultSet) -> Self {
        Self {
            recorder: Arc::new(Recorder::default()),
            connect_error: None,
            result: Ok(set),
        }
    }

    pub fn failing(err: DatabaseError) -> Self {
        Self {
            recorder: Arc::new(Recorder::default()),
            connect_error: None,
            result: Err(err),
        }
    }

    pub fn refusing(err: DatabaseError) -> Self {
        Self {
            recorder: Arc::new(Recorder::default()),
            connect_error: Some(err),
            result: Ok(ResultSet::default()),
        }
    }
}

struct FakeConnection {
    recorder: Arc<Recorder>,
    result: Result<ResultSet, DatabaseError>,
}

#[async_trait]
impl Database for FakeDatabase {
    async fn connect(&self) -> Result<Box<dyn ReportConnection>, DatabaseError> {
        self.recorder.connects.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.connect_error {
            return Err(err.clone());
        }
        Ok(Box::new(FakeConnection {
            recorder: self.recorder.clone(),
            result: self.result.clone(),
        }))
    }
}

#[async_trait]
impl ReportConnection for FakeConnection {
    async fn call_report(
        &mut self,
        function: ReportFunction,
        request: &ReportRequest,
    ) -> Result<ResultSet, DatabaseError> {
        self.recorder.calls.lock().unwrap().push((
            function.name().to_string(),
            request.account_number().to_string(),
            request.start_date().to_string(),
            request.end_date().to_string(),
        ));
        self.result.clone()
    }

    async fn close(self: Box<Self>) -> Result<(), DatabaseError> {
        self.recorder.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Wraps a database in app state and returns its call recorder alongside it.
pub fn state_with(db: FakeDatabase) -> (AppState, Arc<Recorder>) {
    let recorder = db.recorder.clone();
    let state = AppState {
        ctx: Arc::new(AppContext::new(Arc::new(db))),
        metrics: None,
    };
    (state, recorder)
}

pub async fn response_json(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap_or(Value::Null)
}
