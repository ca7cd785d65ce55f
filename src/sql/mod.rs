pub mod types;
pub mod write;

pub use types::{sql_type_for, SqlType};
pub use write::{generate_sql, quote_ident};
