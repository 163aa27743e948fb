//! Database schema initialization and migrations.

use crate::error::{DatabaseResultExt, Result};

impl super::Database {
    /// Initializes the database schema using the embedded SQL file.
    pub(super) fn initialize_schema(&self) -> Result<()> {
        // Foreign keys are per connection
        self.connection
            .execute("PRAGMA foreign_keys = ON", [])
            .db_context("Failed to enable foreign keys")?;

        let schema_sql = include_str!("../../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .db_context("Failed to initialize database schema")?;

        self.apply_migrations()?;

        Ok(())
    }

    /// Brings databases created by earlier releases up to date.
    fn apply_migrations(&self) -> Result<()> {
        self.ensure_column("plans", "revised_from", "INTEGER REFERENCES plans(id) ON DELETE SET NULL")?;
        self.ensure_column("activities", "start_time", "TEXT")?;
        Ok(())
    }

    fn ensure_column(&self, table: &str, column: &str, definition: &str) -> Result<()> {
        let exists: bool = self
            .connection
            .query_row(
                &format!("SELECT COUNT(*) FROM pragma_table_info('{table}') WHERE name = ?1"),
                [column],
                |row| row.get(0),
            )
            .map(|count: i64| count > 0)
            .db_context("Failed to inspect table columns")?;

        if !exists {
            log::info!("Adding column {table}.{column}");
            self.connection
                .execute(&format!("ALTER TABLE {table} ADD COLUMN {column} {definition}"), [])
                .db_context(&format!("Failed to add {column} column to {table} table"))?;
        }

        Ok(())
    }
}
