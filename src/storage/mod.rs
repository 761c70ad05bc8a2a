mod database;
pub mod schema;

pub use database::{
    is_unique_violation, now, opt_time_column, opt_uuid_column, parsed_column, time_column,
    time_to_sql, uuid_column, Database, Result, StorageError,
};
