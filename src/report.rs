use anyhow::Result;
use duckdb::Connection;
use tracing::info;

use crate::{duck::count_rows, schema::NORMALIZED_TABLES};

/// Row count of every normalized table, in schema order.
pub fn table_counts(conn: &Connection) -> Result<Vec<(&'static str, i64)>> {
    NORMALIZED_TABLES
        .iter()
        .map(|def| count_rows(conn, def.name).map(|n| (def.name, n)))
        .collect()
}

pub fn log_summary(counts: &[(&'static str, i64)]) {
    for (table, rows) in counts {
        info!(table = *table, rows = *rows, "table count");
    }
}

/// Aligned two-column table for terminal output.
pub fn format_counts(counts: &[(&str, i64)]) -> String {
    let mut out = format!("{: <15} {:>12}\n", "Table", "Rows");
    out.push_str(&format!("{:-<28}\n", ""));
    for (table, rows) in counts {
        out.push_str(&format!("{: <15} {:>12}\n", table, rows));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{duck::open_mem_db, schema::create_missing_tables};
    use anyhow::Result;

    #[test]
    fn counts_every_normalized_table() -> Result<()> {
        let conn = open_mem_db()?;
        create_missing_tables(&conn)?;
        conn.execute_batch("INSERT INTO Users (Name) VALUES ('a'), ('b');")?;

        let counts = table_counts(&conn)?;
        assert_eq!(counts.len(), 7);
        assert_eq!(counts[0], ("Users", 2));
        assert!(counts[1..].iter().all(|(_, n)| *n == 0));
        Ok(())
    }

    #[test]
    fn formats_aligned_rows() {
        let text = format_counts(&[("Users", 2), ("HikingClub", 0)]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("Users"));
        assert!(lines[2].ends_with(" 2"));
        assert_eq!(lines[2].len(), lines[3].len());
    }
}
