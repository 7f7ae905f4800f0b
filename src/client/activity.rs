use crate::auth::TokenStore;
use crate::client::{Error, Session};
use crate::core::models::ActivityDetail;
use crate::core::types::{AccessToken, ActivityId};

use reqwest::StatusCode;
use tracing::{event, Level};
use url::Url;

enum Attempt {
    Done(serde_json::Value),
    Rejected(StatusCode),
}

impl<S: TokenStore> Session<S> {
    /// Fetch one activity's detail record.
    ///
    /// A 401 triggers a single token exchange followed by a single retry;
    /// the session only adopts the new tokens once the retry succeeds.
    #[tracing::instrument(skip(self, id), fields(activity = %id))]
    pub async fn get_activity(&mut self, id: ActivityId) -> Result<ActivityDetail, Error> {
        let url = self.endpoints.activity_url(id);

        let status = match self.get_json(&url, &self.access_token).await? {
            Attempt::Done(raw) => return Ok(ActivityDetail::new(id, raw)),
            Attempt::Rejected(status) => status,
        };

        let (refresh_token, credential) = match self.refresh_material() {
            Some(material) if status == StatusCode::UNAUTHORIZED => material,
            _ => {
                event!(Level::WARN, status = status.as_u16(), "Activity request failed");
                return Err(Error::RequestFailed {
                    status: status.as_u16(),
                });
            }
        };

        event!(Level::INFO, "Access token rejected, refreshing");
        let pair = self
            .tokens
            .exchange(&self.store, &refresh_token, &credential)
            .await?;

        match self.get_json(&url, &pair.access_token).await? {
            Attempt::Done(raw) => {
                self.install(pair);
                Ok(ActivityDetail::new(id, raw))
            }
            Attempt::Rejected(status) => {
                event!(
                    Level::WARN,
                    status = status.as_u16(),
                    "Activity request failed after refresh"
                );
                Err(Error::RequestFailedAfterRefresh {
                    status: status.as_u16(),
                })
            }
        }
    }

    async fn get_json(&self, url: &Url, token: &AccessToken) -> Result<Attempt, Error> {
        let response = self
            .http
            .get(url.clone())
            .bearer_auth(token.as_ref())
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Ok(Attempt::Rejected(status));
        }

        let body = response.bytes().await?;
        Ok(Attempt::Done(serde_json::from_slice(&body)?))
    }
}
