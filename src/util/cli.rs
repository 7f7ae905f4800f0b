use std::io::{self, Write};

use clap::{Args, Subcommand};
use tracing::{event, Level};

use crate::auth::TokenStore;
use crate::client::{self, Session};
use crate::core::models::ActivityDetail;
use crate::core::types::ActivityId;
use crate::ride::{
    self,
    metrics::{self, Ftp, Overview, RideMetrics},
    polyline::{self, PolylineError},
    Ride, RideError,
};
use crate::store::FileStore;

pub use super::config::Options;

const WEEKS_SHOWN: usize = 12;

#[derive(Subcommand, Debug)]
pub enum SubCommand {
    /// Exchange the stored refresh token and persist any rotated value
    Refresh,
    /// Totals, best power ride and weekly training hours
    Overview,
    /// Stats, power metrics and route for one ride
    Ride(RideCommand),
}

#[derive(Args, Debug)]
pub struct RideCommand {
    pub id: ActivityId,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Client(#[from] client::Error),
    #[error(transparent)]
    Rides(#[from] RideError),
    #[error("route could not be decoded: {0}")]
    Route(#[from] PolylineError),
    #[error("bad endpoint URL: {0}")]
    Endpoint(#[from] url::ParseError),
    #[error("could not build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
    #[error("no ride with id {0} in the activities file")]
    UnknownRide(ActivityId),
    #[error("could not write output: {0}")]
    Output(#[from] io::Error),
}

fn http_client() -> Result<reqwest::Client, CliError> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("ridelog/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

async fn connect(opts: &Options) -> Result<Session<FileStore>, CliError> {
    let store = FileStore::new(&opts.refresh_token_file);
    let session = Session::connect(http_client()?, opts.endpoints()?, opts.credential(), store).await?;
    Ok(session)
}

async fn refresh(opts: &Options) -> Result<(), CliError> {
    let store = FileStore::new(&opts.refresh_token_file);
    let before = store.load().await.map_err(client::Error::from)?;

    let session = connect(opts).await?;
    let mut out = io::stdout().lock();
    if session.refresh_token() != before.as_ref() {
        writeln!(out, "Refresh token rotated; saved to {}", opts.refresh_token_file.display())?;
    } else {
        writeln!(out, "Access token obtained; refresh token unchanged")?;
    }
    Ok(())
}

fn write_overview(out: &mut impl Write, rides: &[Ride], ftp: Ftp) -> io::Result<()> {
    let totals = Overview::from_rides(rides);

    writeln!(out, "Performance Overview")?;
    writeln!(out, "  Total rides:    {}", totals.rides)?;
    writeln!(
        out,
        "  Total distance: {:.0} km ({:.0} mi)",
        totals.distance_km,
        metrics::meters_to_miles(totals.distance_km * 1000.0)
    )?;
    writeln!(out, "  Total time:     {:.1} hrs", totals.moving_hours)?;
    writeln!(out, "  Total climbing: {:.0} m", totals.elevation_m)?;
    match totals.average_watts {
        Some(w) => writeln!(out, "  Avg power:      {:.0} W (FTP: {})", w, ftp)?,
        None => writeln!(out, "  Avg power:      n/a (FTP: {})", ftp)?,
    }

    writeln!(out)?;
    writeln!(out, "Highest Average Power Ride")?;
    match metrics::highest_power_ride(rides) {
        Some(best) => {
            writeln!(out, "  {}", best.name)?;
            writeln!(out, "  Date:      {}", best.start_date_local.format("%B %d, %Y"))?;
            writeln!(out, "  Power:     {:.0} W", best.average_watts.unwrap_or_default())?;
            writeln!(out, "  Distance:  {:.2} mi", metrics::meters_to_miles(best.distance))?;
            writeln!(out, "  Duration:  {:.0} min", best.moving_time as f64 / 60.0)?;
            writeln!(
                out,
                "  Elevation: {:.0} ft",
                metrics::meters_to_feet(best.total_elevation_gain)
            )?;
        }
        None => writeln!(out, "  No power data available in your activities.")?,
    }

    writeln!(out)?;
    writeln!(out, "Weekly Training Hours (last {} weeks)", WEEKS_SHOWN)?;
    for week in metrics::weekly_hours(rides, WEEKS_SHOWN) {
        writeln!(out, "  {}  {:>5.1} h", week.week_start, week.hours)?;
    }

    Ok(())
}

fn write_ride(out: &mut impl Write, ride: &Ride, ftp: Ftp) -> io::Result<()> {
    writeln!(out, "{}", ride.name)?;
    writeln!(
        out,
        "  Completed on {}",
        ride.start_date_local.format("%B %d, %Y at %I:%M %p")
    )?;
    writeln!(out, "  Distance:  {:.2} mi", metrics::meters_to_miles(ride.distance))?;
    writeln!(out, "  Duration:  {:.0} min", ride.moving_time as f64 / 60.0)?;
    writeln!(out, "  Avg speed: {:.1} mph", metrics::mps_to_mph(ride.average_speed))?;
    writeln!(
        out,
        "  Elevation: {:.0} ft",
        metrics::meters_to_feet(ride.total_elevation_gain)
    )?;

    match (ride.average_watts, RideMetrics::for_ride(ride, ftp)) {
        (Some(avg), Some(m)) => {
            writeln!(out, "Power Analysis")?;
            writeln!(out, "  Average power:    {:.0} W", avg)?;
            writeln!(out, "  Normalized power: {:.0} W", m.normalized_power)?;
            writeln!(out, "  Intensity factor: {:.2}", m.intensity_factor)?;
            writeln!(out, "  TSS:              {:.0} ({})", m.tss, m.label())?;
        }
        _ => writeln!(out, "No power data available for this ride.")?,
    }
    Ok(())
}

fn write_route(out: &mut impl Write, detail: &ActivityDetail) -> Result<(), CliError> {
    writeln!(out, "Route")?;
    let points = match detail.summary_polyline() {
        Some(encoded) => polyline::decode(&encoded)?,
        None => Vec::new(),
    };
    match (points.first(), points.last()) {
        (Some(start), Some(finish)) => {
            writeln!(out, "  Start:  {}", start)?;
            writeln!(out, "  Finish: {}", finish)?;
            writeln!(out, "  Points: {}", points.len())?;
        }
        _ => writeln!(out, "  No route data available for this ride.")?,
    }
    Ok(())
}

fn overview(opts: &Options) -> Result<(), CliError> {
    let rides = ride::load_rides(&opts.activities_csv)?;
    write_overview(&mut io::stdout().lock(), &rides, opts.ftp())?;
    Ok(())
}

fn find_ride(rides: &[Ride], id: ActivityId) -> Result<&Ride, CliError> {
    rides
        .iter()
        .find(|r| r.id == id)
        .ok_or(CliError::UnknownRide(id))
}

async fn ride_detail(cmd: &RideCommand, opts: &Options) -> Result<(), CliError> {
    let rides = ride::load_rides(&opts.activities_csv)?;
    let ride = find_ride(&rides, cmd.id)?;
    write_ride(&mut io::stdout().lock(), ride, opts.ftp())?;

    let mut session = connect(opts).await?;
    let detail = session.get_activity(cmd.id).await?;
    write_route(&mut io::stdout().lock(), &detail)
}

pub async fn run_cli_action(opts: Options) -> Result<(), CliError> {
    event!(
        Level::DEBUG,
        insights = opts.insights_enabled(),
        ftp = opts.ftp,
        "Configuration loaded"
    );

    match &opts.command {
        SubCommand::Refresh => refresh(&opts).await,
        SubCommand::Overview => overview(&opts),
        SubCommand::Ride(c) => ride_detail(c, &opts).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ride::tests::SAMPLE;

    use serde_json::json;

    fn rides() -> Vec<Ride> {
        ride::read_rides(SAMPLE.as_bytes()).unwrap()
    }

    fn render(f: impl FnOnce(&mut Vec<u8>) -> Result<(), CliError>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn overview_lists_totals_and_best_ride() {
        let text = render(|out| Ok(write_overview(out, &rides(), Ftp(225))?));

        assert!(text.starts_with("Performance Overview\n"));
        assert!(text.contains("  Total rides:    3\n"));
        assert!(text.contains("(FTP: 225W)"));
        assert!(text.contains("Highest Average Power Ride\n  Hill Repeats\n"));
        assert!(text.contains("  Date:      May 08, 2024\n"));
        assert!(text.contains("Weekly Training Hours (last 12 weeks)"));
    }

    #[test]
    fn overview_without_power_says_so() {
        let no_power: Vec<Ride> = rides().into_iter().filter(|r| r.average_watts.is_none()).collect();
        let text = render(|out| Ok(write_overview(out, &no_power, Ftp(225))?));

        assert!(text.contains("  Avg power:      n/a (FTP: 225W)\n"));
        assert!(text.contains("  No power data available in your activities.\n"));
    }

    #[test]
    fn ride_with_power_shows_analysis() {
        let rides = rides();
        let ride = find_ride(&rides, ActivityId(300)).unwrap();
        let text = render(|out| Ok(write_ride(out, ride, Ftp(225))?));

        assert!(text.starts_with("Hill Repeats\n  Completed on May 08, 2024 at 06:00 PM\n"));
        assert!(text.contains("Power Analysis\n"));
        assert!(text.contains("  Normalized power: 262 W\n"));
        assert!(text.contains("  Intensity factor: 1.16\n"));
    }

    #[test]
    fn ride_without_power_skips_analysis() {
        let rides = rides();
        let ride = find_ride(&rides, ActivityId(200)).unwrap();
        let text = render(|out| Ok(write_ride(out, ride, Ftp(225))?));

        assert!(!text.contains("Power Analysis"));
        assert!(text.ends_with("No power data available for this ride.\n"));
    }

    #[test]
    fn unknown_ride_is_an_error() {
        let rides = rides();
        assert!(matches!(
            find_ride(&rides, ActivityId(7)),
            Err(CliError::UnknownRide(ActivityId(7)))
        ));
    }

    #[test]
    fn route_shows_endpoints() {
        let detail = ActivityDetail::new(
            ActivityId(42),
            json!({ "map": { "summary_polyline": "_p~iF~ps|U_ulLnnqC_mqNvxq`@" } }),
        );
        let text = render(|out| write_route(out, &detail));

        assert_eq!(
            text,
            "Route\n  Start:  38.50000, -120.20000\n  Finish: 43.25200, -126.45300\n  Points: 3\n"
        );
    }

    #[test]
    fn route_without_polyline_says_so() {
        let detail = ActivityDetail::new(ActivityId(42), json!({ "map": { "summary_polyline": "" } }));
        let text = render(|out| write_route(out, &detail));
        assert_eq!(text, "Route\n  No route data available for this ride.\n");
    }

    #[test]
    fn bad_route_is_an_error() {
        let detail = ActivityDetail::new(ActivityId(42), json!({ "map": { "summary_polyline": "_p iF" } }));
        let mut out = Vec::new();
        assert!(matches!(write_route(&mut out, &detail), Err(CliError::Route(_))));
    }
}
