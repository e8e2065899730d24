use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDateTime;
use csv::StringRecord;

use super::date_parser::parse_timestamp;

/// CSV columns the loader reads, in staging-table order.
pub const REQUIRED_COLUMNS: [&str; 17] = [
    "_id",
    "length_3d",
    "user",
    "start_time",
    "max_elevation",
    "bounds",
    "uphill",
    "moving_time",
    "end_time",
    "max_speed",
    "gpx",
    "difficulty",
    "min_elevation",
    "url",
    "downhill",
    "name",
    "length_2d",
];

/// A required column. Discriminants are positions in [`REQUIRED_COLUMNS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Col {
    Id,
    Length3d,
    User,
    StartTime,
    MaxElevation,
    Bounds,
    Uphill,
    MovingTime,
    EndTime,
    MaxSpeed,
    Gpx,
    Difficulty,
    MinElevation,
    Url,
    Downhill,
    Name,
    Length2d,
}

impl Col {
    pub const ALL: [Col; REQUIRED_COLUMNS.len()] = [
        Col::Id,
        Col::Length3d,
        Col::User,
        Col::StartTime,
        Col::MaxElevation,
        Col::Bounds,
        Col::Uphill,
        Col::MovingTime,
        Col::EndTime,
        Col::MaxSpeed,
        Col::Gpx,
        Col::Difficulty,
        Col::MinElevation,
        Col::Url,
        Col::Downhill,
        Col::Name,
        Col::Length2d,
    ];

    /// Header name of the column.
    pub fn name(self) -> &'static str {
        REQUIRED_COLUMNS[self as usize]
    }
}

/// Positions of the required columns within a CSV header.
#[derive(Debug, Clone)]
pub struct HeaderIndex {
    positions: [usize; REQUIRED_COLUMNS.len()],
}

impl HeaderIndex {
    /// Resolve every required column by name. Extra columns are ignored.
    pub fn from_headers(headers: &StringRecord) -> Result<Self> {
        let mut positions = [0usize; REQUIRED_COLUMNS.len()];
        let mut missing = Vec::new();

        for (slot, col) in positions.iter_mut().zip(REQUIRED_COLUMNS.iter()) {
            match headers.iter().position(|h| h.trim() == *col) {
                Some(p) => *slot = p,
                None => missing.push(*col),
            }
        }

        if !missing.is_empty() {
            bail!("CSV header is missing required columns: {}", missing.join(", "));
        }
        Ok(Self { positions })
    }

    fn get<'r>(&self, record: &'r StringRecord, col: Col) -> Result<&'r str> {
        record
            .get(self.positions[col as usize])
            .ok_or_else(|| anyhow!("record has no field for column {}", col.name()))
    }
}

/// One record of the export, typed for the staging table.
#[derive(Debug, Clone, PartialEq)]
pub struct StagingRow {
    pub id: String,
    pub length_3d: f64,
    pub username: String,
    pub start_time: Option<NaiveDateTime>,
    pub max_elevation: Option<f64>,
    pub bounds: String,
    pub uphill: f64,
    pub moving_time: f64,
    pub end_time: Option<NaiveDateTime>,
    pub max_speed: f64,
    pub gpx: String,
    pub difficulty: String,
    pub min_elevation: Option<f64>,
    pub url: String,
    pub downhill: Option<f64>,
    pub name: String,
    pub length_2d: Option<f64>,
}

// Surrounding whitespace is not part of the number.
fn required_f64(raw: &str, col: Col) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .with_context(|| format!("column {}: {:?} is not a number", col.name(), raw))
}

fn optional_f64(raw: &str, col: Col) -> Result<Option<f64>> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    required_f64(raw, col).map(Some)
}

impl StagingRow {
    pub fn from_record(record: &StringRecord, idx: &HeaderIndex) -> Result<Self> {
        let text = |col: Col| idx.get(record, col);
        let real = |col: Col| required_f64(text(col)?, col);
        let maybe_real = |col: Col| optional_f64(text(col)?, col);

        Ok(Self {
            id: text(Col::Id)?.to_string(),
            length_3d: real(Col::Length3d)?,
            username: text(Col::User)?.to_string(),
            start_time: parse_timestamp(text(Col::StartTime)?),
            max_elevation: maybe_real(Col::MaxElevation)?,
            bounds: text(Col::Bounds)?.to_string(),
            uphill: real(Col::Uphill)?,
            moving_time: real(Col::MovingTime)?,
            end_time: parse_timestamp(text(Col::EndTime)?),
            max_speed: real(Col::MaxSpeed)?,
            gpx: text(Col::Gpx)?.to_string(),
            difficulty: text(Col::Difficulty)?.to_string(),
            min_elevation: maybe_real(Col::MinElevation)?,
            url: text(Col::Url)?.to_string(),
            downhill: maybe_real(Col::Downhill)?,
            name: text(Col::Name)?.to_string(),
            length_2d: maybe_real(Col::Length2d)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn header() -> StringRecord {
        StringRecord::from(REQUIRED_COLUMNS.to_vec())
    }

    fn record(overrides: &[(&str, &str)]) -> StringRecord {
        let fields: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .map(|col| {
                overrides
                    .iter()
                    .find(|(c, _)| c == col)
                    .map(|(_, v)| v.to_string())
                    .unwrap_or_else(|| match *col {
                        "_id" => "5d8a".to_string(),
                        "user" => "hiker01".to_string(),
                        "start_time" | "end_time" => "2012-09-16 07:41:44".to_string(),
                        "bounds" | "gpx" | "difficulty" | "url" | "name" => format!("{}-value", col),
                        _ => "12.5".to_string(),
                    })
            })
            .collect();
        StringRecord::from(fields)
    }

    #[test]
    fn parses_a_complete_record() -> Result<()> {
        let idx = HeaderIndex::from_headers(&header())?;
        let row = StagingRow::from_record(&record(&[("length_3d", "4521.887")]), &idx)?;

        assert_eq!(row.id, "5d8a");
        assert_eq!(row.username, "hiker01");
        assert_eq!(row.length_3d, "4521.887".parse::<f64>()?);
        assert_eq!(row.max_elevation, Some(12.5));
        assert!(row.start_time.is_some());
        assert_eq!(row.name, "name-value");
        Ok(())
    }

    #[test]
    fn resolves_columns_by_name_not_position() -> Result<()> {
        let mut cols: Vec<&str> = REQUIRED_COLUMNS.to_vec();
        cols.reverse();
        cols.insert(3, "extra");
        let headers = StringRecord::from(cols.clone());
        let idx = HeaderIndex::from_headers(&headers)?;

        let values: Vec<String> = cols
            .iter()
            .map(|c| match *c {
                "_id" => "abc".to_string(),
                "user" => "u".to_string(),
                "uphill" => "7".to_string(),
                "extra" => "ignored".to_string(),
                "start_time" | "end_time" => String::new(),
                "bounds" | "gpx" | "difficulty" | "url" | "name" => String::new(),
                _ => "1".to_string(),
            })
            .collect();
        let row = StagingRow::from_record(&StringRecord::from(values), &idx)?;
        assert_eq!(row.id, "abc");
        assert_eq!(row.uphill, 7.0);
        Ok(())
    }

    #[test]
    fn missing_columns_are_reported() {
        let headers = StringRecord::from(vec!["_id", "user", "name"]);
        let err = HeaderIndex::from_headers(&headers).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("length_3d"));
        assert!(msg.contains("gpx"));
    }

    #[test]
    fn bad_timestamps_become_none() -> Result<()> {
        let idx = HeaderIndex::from_headers(&header())?;
        let row = StagingRow::from_record(
            &record(&[("start_time", ""), ("end_time", "16.09.2012 07:41")]),
            &idx,
        )?;
        assert_eq!(row.start_time, None);
        assert_eq!(row.end_time, None);
        Ok(())
    }

    #[test]
    fn malformed_required_number_fails() -> Result<()> {
        let idx = HeaderIndex::from_headers(&header())?;
        assert!(StagingRow::from_record(&record(&[("max_speed", "fast")]), &idx).is_err());
        assert!(StagingRow::from_record(&record(&[("uphill", "")]), &idx).is_err());
        Ok(())
    }

    #[test]
    fn empty_optional_number_is_null() -> Result<()> {
        let idx = HeaderIndex::from_headers(&header())?;
        let row = StagingRow::from_record(
            &record(&[("min_elevation", ""), ("downhill", ""), ("length_2d", "")]),
            &idx,
        )?;
        assert_eq!(row.min_elevation, None);
        assert_eq!(row.downhill, None);
        assert_eq!(row.length_2d, None);

        assert!(StagingRow::from_record(&record(&[("downhill", "n/a")]), &idx).is_err());
        Ok(())
    }

    #[test]
    fn column_enum_matches_header_order() {
        for (i, col) in Col::ALL.iter().enumerate() {
            assert_eq!(*col as usize, i);
            assert_eq!(col.name(), REQUIRED_COLUMNS[i]);
        }
    }

    #[test]
    fn padded_numbers_parse() -> Result<()> {
        let idx = HeaderIndex::from_headers(&header())?;
        let row = StagingRow::from_record(
            &record(&[("length_3d", " 1.5"), ("downhill", " 2.0 "), ("length_2d", "  ")]),
            &idx,
        )?;
        assert_eq!(row.length_3d, 1.5);
        assert_eq!(row.downhill, Some(2.0));
        assert_eq!(row.length_2d, None);
        Ok(())
    }
}
