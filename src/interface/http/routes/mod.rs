pub mod health;
pub mod metrics;
pub mod ready;
pub mod report;
