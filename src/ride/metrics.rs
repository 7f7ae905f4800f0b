use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};

use super::Ride;

pub const METERS_TO_FEET: f64 = 3.28084;
pub const METERS_TO_MILES: f64 = 0.000621371;
pub const MPS_TO_MPH: f64 = 2.23694;

pub fn meters_to_feet(meters: f64) -> f64 {
    meters * METERS_TO_FEET
}

pub fn meters_to_miles(meters: f64) -> f64 {
    meters * METERS_TO_MILES
}

pub fn mps_to_mph(mps: f64) -> f64 {
    mps * MPS_TO_MPH
}

/// Functional threshold power in watts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ftp(pub u32);

impl Ftp {
    pub fn watts(self) -> f64 {
        f64::from(self.0)
    }
}

impl fmt::Display for Ftp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}W", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TssLabel {
    Easy,
    Moderate,
    Hard,
}

impl TssLabel {
    pub fn for_score(tss: f64) -> Self {
        if tss < 60.0 {
            Self::Easy
        } else if tss < 100.0 {
            Self::Moderate
        } else {
            Self::Hard
        }
    }
}

impl fmt::Display for TssLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Easy => "Easy",
            Self::Moderate => "Moderate",
            Self::Hard => "Hard",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RideMetrics {
    pub normalized_power: f64,
    pub intensity_factor: f64,
    pub tss: f64,
}

impl RideMetrics {
    /// `None` when the ride carries no weighted power or the FTP is zero.
    pub fn for_ride(ride: &Ride, ftp: Ftp) -> Option<Self> {
        let np = ride.weighted_average_watts?;
        if ftp.0 == 0 {
            return None;
        }
        let intensity_factor = np / ftp.watts();
        let tss = (ride.moving_time as f64 * np * intensity_factor) / (ftp.watts() * 3600.0) * 100.0;

        Some(Self {
            normalized_power: np,
            intensity_factor,
            tss,
        })
    }

    pub fn label(&self) -> TssLabel {
        TssLabel::for_score(self.tss)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Overview {
    pub rides: usize,
    pub distance_km: f64,
    pub elevation_m: f64,
    pub average_watts: Option<f64>,
    pub moving_hours: f64,
}

impl Overview {
    pub fn from_rides(rides: &[Ride]) -> Self {
        let powered: Vec<f64> = rides.iter().filter_map(|r| r.average_watts).collect();
        let average_watts = if powered.is_empty() {
            None
        } else {
            Some(powered.iter().sum::<f64>() / powered.len() as f64)
        };

        Self {
            rides: rides.len(),
            distance_km: rides.iter().map(|r| r.distance).sum::<f64>() / 1000.0,
            elevation_m: rides.iter().map(|r| r.total_elevation_gain).sum(),
            average_watts,
            moving_hours: rides.iter().map(|r| r.moving_time as f64).sum::<f64>() / 3600.0,
        }
    }
}

/// Ride with the highest average power; the earliest one wins a tie.
pub fn highest_power_ride(rides: &[Ride]) -> Option<&Ride> {
    rides
        .iter()
        .filter(|r| r.average_watts.is_some())
        .fold(None, |best: Option<&Ride>, r| match best {
            Some(b) if b.average_watts >= r.average_watts => Some(b),
            _ => Some(r),
        })
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeekHours {
    /// Monday of the week
    pub week_start: NaiveDate,
    pub hours: f64,
}

pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Moving hours per Monday-based week, oldest first, limited to the last
/// `last` weeks that contain at least one ride.
pub fn weekly_hours(rides: &[Ride], last: usize) -> Vec<WeekHours> {
    let mut weeks: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for ride in rides {
        *weeks
            .entry(week_start(ride.start_date_local.date()))
            .or_insert(0.0) += ride.moving_hours();
    }

    let skip = weeks.len().saturating_sub(last);
    weeks
        .into_iter()
        .skip(skip)
        .map(|(week_start, hours)| WeekHours { week_start, hours })
        .collect()
}
