//! Route summaries arrive as encoded polylines with five decimal places of
//! precision.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl std::fmt::Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lng)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid route polyline: {0}")]
pub struct PolylineError(pub String);

const PRECISION: u32 = 5;

/// Decode to points in path order. Malformed input, or input whose points
/// leave the valid latitude/longitude range, is an error.
pub fn decode(encoded: &str) -> Result<Vec<LatLng>, PolylineError> {
    let line = polyline::decode_polyline(encoded, PRECISION)
        .map_err(|e| PolylineError(e.to_string()))?;

    Ok(line
        .0
        .into_iter()
        .map(|c| LatLng { lat: c.y, lng: c.x })
        .collect())
}
