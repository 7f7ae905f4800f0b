/// Error body returned by the remote API, e.g.
/// `{"message":"Authorization Error","errors":[{"resource":"Athlete","field":"access_token","code":"invalid"}]}`.
#[derive(Debug, Clone, Default)]
#[derive(serde::Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Vec<ErrorDetail>,
}

#[derive(Debug, Clone)]
#[derive(serde::Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub resource: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

impl ErrorResponse {
    pub fn from_body(body: &[u8]) -> Option<Self> {
        serde_json::from_slice(body).ok()
    }

    pub fn describe(&self) -> Option<String> {
        let message = self.message.as_deref()?;
        let codes: Vec<String> = self
            .errors
            .iter()
            .filter_map(|e| match (&e.field, &e.code) {
                (Some(field), Some(code)) => Some(format!("{}: {}", field, code)),
                (None, Some(code)) => Some(code.clone()),
                _ => None,
            })
            .collect();

        if codes.is_empty() {
            Some(message.to_string())
        } else {
            Some(format!("{} ({})", message, codes.join(", ")))
        }
    }
}
