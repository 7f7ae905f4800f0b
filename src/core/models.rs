use super::types::*;

/// Application credentials issued by the remote service.
#[derive(Debug, Clone)]
pub struct Credential {
    pub client_id: ClientId,
    pub client_secret: ClientSecret,
}

impl Credential {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: ClientId(client_id.into()),
            client_secret: ClientSecret(client_secret.into()),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.client_id.0.is_empty() && !self.client_secret.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ActivityMap {
    #[serde(default)]
    pub summary_polyline: Option<String>,
}

/// Activity detail payload. The whole body is kept; a few fields are typed.
#[derive(Debug, Clone)]
pub struct ActivityDetail {
    pub id: ActivityId,
    pub raw: serde_json::Value,
}

impl ActivityDetail {
    pub fn new(id: ActivityId, raw: serde_json::Value) -> Self {
        Self { id, raw }
    }

    pub fn name(&self) -> Option<&str> {
        self.raw.get("name").and_then(|n| n.as_str())
    }

    pub fn map(&self) -> Option<ActivityMap> {
        self.raw
            .get("map")
            .and_then(|m| serde_json::from_value(m.clone()).ok())
    }

    pub fn summary_polyline(&self) -> Option<String> {
        self.map()
            .and_then(|m| m.summary_polyline)
            .filter(|p| !p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn polyline_is_read_from_map() {
        let detail = ActivityDetail::new(
            ActivityId(7),
            json!({ "name": "Lunch Ride", "map": { "summary_polyline": "_p~iF~ps|U" } }),
        );
        assert_eq!(detail.name(), Some("Lunch Ride"));
        assert_eq!(detail.summary_polyline().as_deref(), Some("_p~iF~ps|U"));
    }

    #[test]
    fn missing_or_empty_polyline_is_none() {
        let empty = ActivityDetail::new(ActivityId(1), json!({ "map": { "summary_polyline": "" } }));
        let absent = ActivityDetail::new(ActivityId(2), json!({ "name": "Trainer" }));
        let null = ActivityDetail::new(ActivityId(3), json!({ "map": { "summary_polyline": null } }));
        assert_eq!(empty.summary_polyline(), None);
        assert_eq!(absent.summary_polyline(), None);
        assert_eq!(null.summary_polyline(), None);
    }

    #[test]
    fn credential_completeness() {
        assert!(Credential::new("id", "secret").is_complete());
        assert!(!Credential::new("", "secret").is_complete());
        assert!(!Credential::new("id", "").is_complete());
    }
}
