use std::path::PathBuf;

use clap::Parser;

use crate::client::{Endpoints, STRAVA_API_BASE, STRAVA_TOKEN_URL};
use crate::core::models::Credential;
use crate::ride::metrics::Ftp;

use super::cli::SubCommand;

#[derive(Parser)]
#[clap(
    name = "ridelog",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS")
)]
pub struct Options {
    #[clap(long, env = "STRAVA_CLIENT_ID", hide_env_values = true)]
    pub client_id: String,
    #[clap(long, env = "STRAVA_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: String,
    /// Key for the coaching-insight service; insights stay off without it
    #[clap(long, env = "GROQ_API_KEY", hide_env_values = true)]
    pub insight_api_key: Option<String>,
    #[clap(long, env = "RIDER_FTP", default_value = "225", validator = positive)]
    pub ftp: u32,
    #[clap(long, env = "REFRESH_TOKEN_FILE", default_value = "strava_refresh_token.txt")]
    pub refresh_token_file: PathBuf,
    #[clap(long, env = "ACTIVITIES_CSV", default_value = "my_strava_activities.csv")]
    pub activities_csv: PathBuf,
    #[clap(long, env = "STRAVA_API_BASE", default_value = STRAVA_API_BASE)]
    pub api_base: String,
    #[clap(long, env = "STRAVA_TOKEN_URL", default_value = STRAVA_TOKEN_URL)]
    pub token_url: String,
    #[clap(subcommand)]
    pub command: SubCommand,
}

fn positive(s: &str) -> Result<(), String> {
    match s.parse::<u32>() {
        Ok(0) => Err("must be greater than zero".to_string()),
        Ok(_) => Ok(()),
        Err(e) => Err(e.to_string()),
    }
}

impl Options {
    pub fn credential(&self) -> Credential {
        Credential::new(self.client_id.trim(), self.client_secret.trim())
    }

    pub fn endpoints(&self) -> Result<Endpoints, url::ParseError> {
        Endpoints::parse(&self.api_base, &self.token_url)
    }

    pub fn ftp(&self) -> Ftp {
        Ftp(self.ftp)
    }

    pub fn insights_enabled(&self) -> bool {
        self.insight_api_key
            .as_deref()
            .map(|k| !k.trim().is_empty())
            .unwrap_or(false)
    }
}
