//! Database operations and SQLite management for plans, steps and messages.
//!
//! This module provides the synchronous query layer behind
//! [`crate::store::SqliteStore`]. It owns the SQLite connection, schema
//! management, and specialized query interfaces for each record type.

use std::path::Path;

use rusqlite::Connection;

use crate::error::{DatabaseResultExt, Result};

pub mod message_queries;
pub mod migrations;
pub mod plan_queries;
pub mod step_queries;
pub mod utils;

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
