//! Table definitions for the normalized trail schema and the staging table.
//!
//! Order matters: every table appears after the tables its foreign keys
//! reference, and creation follows this order.

/// One table of the target schema.
#[derive(Debug)]
pub struct TableDef {
    pub name: &'static str,
    /// Sequence backing the surrogate key, created before the table.
    pub sequence: Option<&'static str>,
    pub ddl: &'static str,
}

pub const STAGING_TABLE: &str = "kaggleTable";

pub static USERS: TableDef = TableDef {
    name: "Users",
    sequence: Some("users_id_seq"),
    ddl: "CREATE TABLE Users (
        UserID BIGINT PRIMARY KEY DEFAULT nextval('users_id_seq'),
        Name VARCHAR(255),
        Gender VARCHAR(255),
        Nationality VARCHAR(255),
        Age INTEGER,
        Experience VARCHAR(255)
    );",
};

pub static TRAIL: TableDef = TableDef {
    name: "Trail",
    sequence: Some("trail_id_seq"),
    ddl: "CREATE TABLE Trail (
        TrailID BIGINT PRIMARY KEY DEFAULT nextval('trail_id_seq'),
        GeoBoundary VARCHAR(4000),
        MinElevation DOUBLE,
        Downhill DOUBLE,
        Name VARCHAR(255),
        Length2D DOUBLE,
        Uphill DOUBLE,
        Length3D DOUBLE,
        gpx VARCHAR
    );",
};

pub static REVIEW: TableDef = TableDef {
    name: "Review",
    sequence: Some("review_id_seq"),
    ddl: "CREATE TABLE Review (
        ReviewID BIGINT PRIMARY KEY DEFAULT nextval('review_id_seq'),
        Comments VARCHAR(4000),
        Difficulty VARCHAR(255),
        Rating INTEGER,
        UserID BIGINT,
        TrailID BIGINT,
        FOREIGN KEY (UserID) REFERENCES Users (UserID),
        FOREIGN KEY (TrailID) REFERENCES Trail (TrailID)
    );",
};

pub static HIKE: TableDef = TableDef {
    name: "Hike",
    sequence: Some("hike_id_seq"),
    ddl: "CREATE TABLE Hike (
        HikeID BIGINT PRIMARY KEY DEFAULT nextval('hike_id_seq'),
        MaxSpeed DOUBLE,
        EndTime TIMESTAMP,
        StartTime TIMESTAMP,
        MovingTime DOUBLE,
        TrailID BIGINT,
        FOREIGN KEY (TrailID) REFERENCES Trail (TrailID)
    );",
};

pub static HIKING_CLUB: TableDef = TableDef {
    name: "HikingClub",
    sequence: Some("club_id_seq"),
    ddl: "CREATE TABLE HikingClub (
        ClubID BIGINT PRIMARY KEY DEFAULT nextval('club_id_seq'),
        Name VARCHAR(255)
    );",
};

pub static MEMBER: TableDef = TableDef {
    name: "Member",
    sequence: None,
    ddl: "CREATE TABLE Member (
        UserID BIGINT,
        ClubID BIGINT,
        PRIMARY KEY (UserID, ClubID),
        FOREIGN KEY (UserID) REFERENCES Users (UserID),
        FOREIGN KEY (ClubID) REFERENCES HikingClub (ClubID)
    );",
};

pub static HIKER: TableDef = TableDef {
    name: "Hiker",
    sequence: None,
    ddl: "CREATE TABLE Hiker (
        UserID BIGINT,
        HikeID BIGINT,
        PRIMARY KEY (UserID, HikeID),
        FOREIGN KEY (UserID) REFERENCES Users (UserID),
        FOREIGN KEY (HikeID) REFERENCES Hike (HikeID)
    );",
};

// Column order mirrors the CSV export; `user` is stored as `username`.
pub static KAGGLE: TableDef = TableDef {
    name: STAGING_TABLE,
    sequence: None,
    ddl: "CREATE TABLE kaggleTable (
        _id VARCHAR(255) PRIMARY KEY,
        length_3d DOUBLE,
        username VARCHAR(255),
        start_time TIMESTAMP,
        max_elevation DOUBLE,
        bounds VARCHAR(4000),
        uphill DOUBLE,
        moving_time DOUBLE,
        end_time TIMESTAMP,
        max_speed DOUBLE,
        gpx VARCHAR,
        difficulty VARCHAR(255),
        min_elevation DOUBLE,
        url VARCHAR(255),
        downhill DOUBLE,
        name VARCHAR(255),
        length_2d DOUBLE
    );",
};

/// Normalized tables in creation order.
pub static NORMALIZED_TABLES: [&TableDef; 7] =
    [&USERS, &TRAIL, &REVIEW, &HIKE, &HIKING_CLUB, &MEMBER, &HIKER];

/// Every table the loader needs, staging last.
pub static ALL_TABLES: [&TableDef; 8] = [
    &USERS,
    &TRAIL,
    &REVIEW,
    &HIKE,
    &HIKING_CLUB,
    &MEMBER,
    &HIKER,
    &KAGGLE,
];
