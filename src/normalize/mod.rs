use anyhow::{Context, Result};
use duckdb::Connection;
use std::fmt;
use tracing::info;

use crate::schema::STAGING_TABLE;

/// The fixed normalization queries, in foreign-key dependency order.
///
/// Every join matches on name equality only, so two trails or users sharing
/// a name fan out into one joined row per match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeStep {
    Users,
    Trails,
    Reviews,
    Hikes,
    Hikers,
}

impl NormalizeStep {
    pub const ALL: [NormalizeStep; 5] = [
        NormalizeStep::Users,
        NormalizeStep::Trails,
        NormalizeStep::Reviews,
        NormalizeStep::Hikes,
        NormalizeStep::Hikers,
    ];

    /// Table populated by this step.
    pub fn table(&self) -> &'static str {
        match self {
            NormalizeStep::Users => "Users",
            NormalizeStep::Trails => "Trail",
            NormalizeStep::Reviews => "Review",
            NormalizeStep::Hikes => "Hike",
            NormalizeStep::Hikers => "Hiker",
        }
    }

    pub fn sql(&self) -> &'static str {
        match self {
            NormalizeStep::Users => {
                "INSERT INTO Users (Name)
                 SELECT DISTINCT username
                 FROM kaggleTable"
            }
            NormalizeStep::Trails => {
                "INSERT INTO Trail (GeoBoundary, MinElevation, Downhill, Name, Length2D, Uphill, Length3D, gpx)
                 SELECT DISTINCT bounds, min_elevation, downhill, name, length_2d, uphill, length_3d, gpx
                 FROM kaggleTable"
            }
            NormalizeStep::Reviews => {
                "INSERT INTO Review (Difficulty, UserID, TrailID)
                 SELECT kaggleTable.difficulty, Users.UserID, Trail.TrailID
                 FROM kaggleTable
                    JOIN Users ON Users.Name = kaggleTable.username
                    JOIN Trail ON Trail.Name = kaggleTable.name"
            }
            NormalizeStep::Hikes => {
                "INSERT INTO Hike (MaxSpeed, EndTime, StartTime, MovingTime, TrailID)
                 SELECT kaggleTable.max_speed, kaggleTable.end_time, kaggleTable.start_time, kaggleTable.moving_time, Trail.TrailID
                 FROM kaggleTable
                    JOIN Trail ON Trail.Name = kaggleTable.name"
            }
            NormalizeStep::Hikers => {
                "INSERT INTO Hiker (UserID, HikeID)
                 SELECT DISTINCT Users.UserID, Hike.HikeID
                 FROM kaggleTable
                    JOIN Users ON Users.Name = kaggleTable.username
                    JOIN Trail ON Trail.Name = kaggleTable.name
                    JOIN Hike ON Hike.TrailID = Trail.TrailID"
            }
        }
    }
}

impl fmt::Display for NormalizeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

/// Run one step; it commits on its own. Returns the rows inserted.
pub fn run_step(conn: &Connection, step: NormalizeStep) -> Result<usize> {
    let n = conn
        .execute(step.sql(), [])
        .with_context(|| format!("normalizing into {}", step.table()))?;
    info!(step = %step, rows = n, "normalized");
    Ok(n)
}

/// Run every step in order. A failure stops the sequence; earlier steps stay
/// committed.
#[tracing::instrument(level = "info", skip(conn))]
pub fn normalize(conn: &Connection) -> Result<Vec<(NormalizeStep, usize)>> {
    NormalizeStep::ALL
        .iter()
        .map(|&step| run_step(conn, step).map(|n| (step, n)))
        .collect()
}

pub fn drop_staging(conn: &Connection) -> Result<()> {
    conn.execute_batch(&format!("DROP TABLE {};", STAGING_TABLE))
        .context("dropping staging table")?;
    info!(table = STAGING_TABLE, "dropped staging table");
    Ok(())
}
