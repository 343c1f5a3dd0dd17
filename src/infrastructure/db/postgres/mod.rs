mod database;
mod numeric;
mod row_decoder;

pub use database::PostgresDatabase;
