//! Database connection utilities.

use diesel::pg::PgConnection;
use diesel::prelude::*;
use embedfix_error::{ConfigError, DatabaseError, EmbedfixResult};

/// Establish a connection to the PostgreSQL database.
///
/// Reads the `DATABASE_URL` environment variable to determine the connection string.
///
/// # Errors
///
/// Returns a configuration error if `DATABASE_URL` is not set, and a
/// database error if the connection itself fails.
pub fn establish_connection() -> EmbedfixResult<PgConnection> {
    connect(std::env::var("DATABASE_URL").ok())
}

fn connect(database_url: Option<String>) -> EmbedfixResult<PgConnection> {
    let database_url = database_url
        .ok_or_else(|| ConfigError::new("DATABASE_URL environment variable not set"))?;

    Ok(PgConnection::establish(&database_url).map_err(DatabaseError::from)?)
}
