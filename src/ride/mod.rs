pub mod metrics;
pub mod polyline;

use std::io::Read;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer};

use crate::core::types::ActivityId;

/// One exported activity, as a row of the activities CSV.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Ride {
    pub id: ActivityId,
    pub name: String,
    #[serde(deserialize_with = "local_datetime")]
    pub start_date_local: NaiveDateTime,
    /// meters
    pub distance: f64,
    /// seconds
    pub moving_time: u64,
    pub average_watts: Option<f64>,
    pub weighted_average_watts: Option<f64>,
    /// meters per second
    pub average_speed: f64,
    /// meters
    pub total_elevation_gain: f64,
}

impl Ride {
    pub fn moving_hours(&self) -> f64 {
        self.moving_time as f64 / 3600.0
    }

    pub fn label(&self) -> String {
        format!("{} - {}", self.name, self.start_date_local.format("%Y-%m-%d"))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RideError {
    #[error("could not read activities: {0}")]
    Csv(#[from] csv::Error),
}

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%SZ", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

fn local_datetime<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(raw.trim(), f).ok())
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognised date `{}`", raw)))
}

pub fn load_rides(path: impl AsRef<Path>) -> Result<Vec<Ride>, RideError> {
    let reader = csv::Reader::from_path(path)?;
    collect_rides(reader)
}

pub fn read_rides<R: Read>(input: R) -> Result<Vec<Ride>, RideError> {
    collect_rides(csv::Reader::from_reader(input))
}

fn collect_rides<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<Ride>, RideError> {
    let mut rides = reader
        .deserialize::<Ride>()
        .collect::<Result<Vec<_>, _>>()?;
    rides.sort_by_key(|r| r.start_date_local);
    Ok(rides)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const SAMPLE: &str = "\
id,name,start_date_local,distance,moving_time,average_watts,weighted_average_watts,average_speed,total_elevation_gain,map.summary_polyline
300,Hill Repeats,2024-05-08T18:00:00Z,32000.0,5400,240.0,262.0,5.9,610.0,abc
100,Morning Ride,2024-05-04T08:12:33Z,40233.6,7200,180.5,195.0,5.59,420.0,
200,Recovery Spin,2024-05-06T07:00:00Z,20000.0,3600,,,5.55,50.0,
";

    #[test]
    fn reads_and_orders_rides() {
        let rides = read_rides(SAMPLE.as_bytes()).unwrap();
        let ids: Vec<u64> = rides.iter().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![100, 200, 300]);

        let spin = &rides[1];
        assert_eq!(spin.name, "Recovery Spin");
        assert_eq!(spin.average_watts, None);
        assert_eq!(spin.weighted_average_watts, None);
        assert_eq!(spin.moving_hours(), 1.0);
    }

    #[test]
    fn accepts_space_separated_dates() {
        let csv = "\
id,name,start_date_local,distance,moving_time,average_watts,weighted_average_watts,average_speed,total_elevation_gain
1,Commute,2024-01-02 07:30:00,8000,1500,150,155,5.3,20
";
        let rides = read_rides(csv.as_bytes()).unwrap();
        assert_eq!(rides[0].label(), "Commute - 2024-01-02");
    }

    #[test]
    fn bad_date_is_an_error() {
        let csv = "\
id,name,start_date_local,distance,moving_time,average_watts,weighted_average_watts,average_speed,total_elevation_gain
1,Commute,yesterday,8000,1500,150,155,5.3,20
";
        assert!(matches!(read_rides(csv.as_bytes()), Err(RideError::Csv(_))));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("activities.csv");
        std::fs::write(&path, SAMPLE).unwrap();
        assert_eq!(load_rides(&path).unwrap().len(), 3);
        assert!(load_rides(dir.path().join("missing.csv")).is_err());
    }
}
