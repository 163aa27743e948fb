//! Database operations and SQLite management for activities, participants,
//! preferences and plans.
//!
//! Each query family lives in its own file as an `impl Database` block.
//! Timestamps are stored as RFC 3339 text and statuses as their lowercase
//! names; the helpers below turn malformed columns into
//! [`rusqlite::Error::FromSqlConversionFailure`] so they surface as database
//! errors instead of panics.

use std::{path::Path, str::FromStr};

use jiff::Timestamp;
use rusqlite::{types::Type, Connection, Row};

use crate::error::{DatabaseResultExt, Result};

pub mod activity_queries;
pub mod migrations;
pub mod participant_queries;
pub mod plan_queries;
pub mod preference_queries;

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Creates a new database connection and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}

pub(crate) fn id_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<u64> {
    Ok(row.get::<_, i64>(idx)? as u64)
}

pub(crate) fn optional_id_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<u64>> {
    Ok(row.get::<_, Option<i64>>(idx)?.map(|id| id as u64))
}

pub(crate) fn timestamp_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Timestamp> {
    row.get::<_, String>(idx)?
        .parse::<Timestamp>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn status_at<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = String>,
{
    let status_str: String = row.get(idx)?;
    status_str.parse::<T>().map_err(|message| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, message)),
        )
    })
}
