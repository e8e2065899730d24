pub mod tables;

pub use tables::{TableDef, ALL_TABLES, NORMALIZED_TABLES, STAGING_TABLE};

use anyhow::{Context, Result};
use duckdb::Connection;
use tracing::{debug, info};

use crate::duck::table_exists;

/// Create every table in `ALL_TABLES` that is not already present.
///
/// Existing tables are left untouched, whatever their columns. Returns the
/// names of the tables created by this call.
#[tracing::instrument(level = "info", skip(conn))]
pub fn create_missing_tables(conn: &Connection) -> Result<Vec<&'static str>> {
    let mut created = Vec::new();

    for def in ALL_TABLES.iter() {
        if table_exists(conn, def.name)? {
            debug!(table = def.name, "table already exists");
            continue;
        }
        create_table(conn, def)?;
        created.push(def.name);
    }

    info!("created {} of {} tables", created.len(), ALL_TABLES.len());
    Ok(created)
}

fn create_table(conn: &Connection, def: &TableDef) -> Result<()> {
    if let Some(seq) = def.sequence {
        conn.execute_batch(&format!("CREATE SEQUENCE IF NOT EXISTS {};", seq))
            .with_context(|| format!("creating sequence {}", seq))?;
    }
    conn.execute_batch(def.ddl)
        .with_context(|| format!("creating table {}", def.name))?;
    debug!(table = def.name, "created table");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duck::{count_rows, open_mem_db};
    use anyhow::Result;

    #[test]
    fn creates_all_tables_once() -> Result<()> {
        let conn = open_mem_db()?;

        let created = create_missing_tables(&conn)?;
        assert_eq!(
            created,
            vec![
                "Users",
                "Trail",
                "Review",
                "Hike",
                "HikingClub",
                "Member",
                "Hiker",
                "kaggleTable"
            ]
        );
        for def in ALL_TABLES.iter() {
            assert!(table_exists(&conn, def.name)?, "{} missing", def.name);
            assert_eq!(count_rows(&conn, def.name)?, 0);
        }

        // second pass is a no-op
        assert!(create_missing_tables(&conn)?.is_empty());
        Ok(())
    }

    #[test]
    fn only_missing_tables_are_created() -> Result<()> {
        let conn = open_mem_db()?;
        create_missing_tables(&conn)?;
        conn.execute_batch("DROP TABLE kaggleTable;")?;

        let created = create_missing_tables(&conn)?;
        assert_eq!(created, vec![STAGING_TABLE]);
        Ok(())
    }

    #[test]
    fn surrogate_keys_come_from_sequences() -> Result<()> {
        let conn = open_mem_db()?;
        create_missing_tables(&conn)?;

        conn.execute_batch("INSERT INTO Users (Name) VALUES ('a'), ('b');")?;
        let max_id: i64 = conn.query_row("SELECT MAX(UserID) FROM Users", [], |r| r.get(0))?;
        assert_eq!(max_id, 2);
        Ok(())
    }

    #[test]
    fn foreign_keys_are_enforced() -> Result<()> {
        let conn = open_mem_db()?;
        create_missing_tables(&conn)?;

        let res = conn.execute_batch("INSERT INTO Review (Difficulty, UserID, TrailID) VALUES ('T1', 99, 99);");
        assert!(res.is_err());
        Ok(())
    }
}
