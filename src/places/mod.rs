//! Nearby-places lookup.
//!
//! Turns "find a recycling center near me" into a location-biased text search
//! and normalizes the provider payload into a flat list of `{name, address}`
//! records. The request parameters are echoed back so the caller can see which
//! bias point was applied.
//!
//! The default provider is the Google Places API (New) `places:searchText`
//! endpoint:
//!
//! ```text
//! POST /v1/places:searchText
//! X-Goog-Api-Key: <key>
//! X-Goog-FieldMask: *
//!
//! { "textQuery": "...",
//!   "locationBias": { "circle": { "center": { "latitude": .., "longitude": .. },
//!                                 "radius": 100.0 } } }
//! ```

mod error;

pub use error::PlacesError;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Google Places text search endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://places.googleapis.com/v1/places:searchText";

/// Bias circle radius. The provider interprets it in meters.
pub const DEFAULT_RADIUS: f64 = 100.0;

/// Ask for every field; only two are used, but the mask must be non-empty.
pub const DEFAULT_FIELD_MASK: &str = "*";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for [`PlacesClient`].
#[derive(Debug, Clone)]
pub struct PlacesConfig {
    /// Provider API key, sent as `X-Goog-Api-Key`
    pub api_key: String,

    /// Full URL of the text search endpoint
    pub endpoint: String,

    /// Radius of the location bias circle
    pub radius: f64,

    /// Value of the `X-Goog-FieldMask` header
    pub field_mask: String,

    /// Upper bound for the whole round trip
    pub timeout: Duration,
}

impl PlacesConfig {
    /// Create a config with the provider defaults.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            radius: DEFAULT_RADIUS,
            field_mask: DEFAULT_FIELD_MASK.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_field_mask(mut self, field_mask: impl Into<String>) -> Self {
        self.field_mask = field_mask.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn validate(&self) -> Result<(), PlacesError> {
        if self.api_key.trim().is_empty() {
            return Err(PlacesError::Configuration(
                "places API key is empty".to_string(),
            ));
        }
        if self.endpoint.trim().is_empty() {
            return Err(PlacesError::Configuration(
                "places endpoint is empty".to_string(),
            ));
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(PlacesError::Configuration(format!(
                "location bias radius must be a positive number, got {}",
                self.radius
            )));
        }
        if self.field_mask.trim().is_empty() {
            return Err(PlacesError::Configuration(
                "field mask is empty".to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(PlacesError::Configuration(
                "timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// A validated lookup request.
///
/// # Invariants
/// - `query` contains at least one non-whitespace character
/// - `latitude` is finite and within [-90, 90]
/// - `longitude` is finite and within [-180, 180]
#[derive(Debug, Clone, PartialEq)]
pub struct LookupRequest {
    query: String,
    latitude: f64,
    longitude: f64,
}

impl LookupRequest {
    pub fn new(
        query: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Result<Self, PlacesError> {
        let query = query.into();
        if query.trim().is_empty() {
            return Err(PlacesError::InvalidArgument(
                "query must not be empty".to_string(),
            ));
        }
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(PlacesError::InvalidArgument(format!(
                "latitude must be within [-90, 90], got {}",
                latitude
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(PlacesError::InvalidArgument(format!(
                "longitude must be within [-180, 180], got {}",
                longitude
            )));
        }
        Ok(Self {
            query,
            latitude,
            longitude,
        })
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// One matched place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceRecord {
    pub name: String,
    pub address: String,
}

/// Outcome of a lookup, in provider order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LookupResult {
    query: String,
    latitude_used: f64,
    longitude_used: f64,
    results: Vec<PlaceRecord>,
}

impl LookupResult {
    /// Pair a request with the records found for it.
    pub fn new(request: LookupRequest, results: Vec<PlaceRecord>) -> Self {
        Self {
            query: request.query,
            latitude_used: request.latitude,
            longitude_used: request.longitude,
            results,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn latitude_used(&self) -> f64 {
        self.latitude_used
    }

    pub fn longitude_used(&self) -> f64 {
        self.longitude_used
    }

    pub fn results(&self) -> &[PlaceRecord] {
        &self.results
    }
}

/// Something that can find places near a point.
#[async_trait]
pub trait PlacesLookup: Send + Sync {
    /// Find places matching `query`, preferring those near the given point.
    ///
    /// # Errors
    /// - `InvalidArgument` for an empty query or out-of-range coordinates
    ///   (no request is made)
    /// - `UpstreamUnavailable` / `Timeout` when the provider cannot be reached
    /// - `UpstreamError` for a non-success status
    /// - `MalformedResponse` when the payload lacks `places` or per-place fields
    async fn find_places(
        &self,
        query: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<LookupResult, PlacesError>;
}

/// HTTP client for the places text search API.
///
/// The inner `reqwest::Client` pools connections and is safe to share across
/// concurrent lookups.
pub struct PlacesClient {
    client: Client,
    config: PlacesConfig,
}

impl PlacesClient {
    /// Create a client.
    ///
    /// # Errors
    ///
    /// Returns `PlacesError::Configuration` for a blank key or endpoint, a
    /// non-positive radius, or a zero timeout.
    pub fn new(config: PlacesConfig) -> Result<Self, PlacesError> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                PlacesError::Configuration(format!("failed to build HTTP client: {}", e))
            })?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &PlacesConfig {
        &self.config
    }

    /// Run a lookup for an already validated request.
    pub async fn lookup(&self, request: LookupRequest) -> Result<LookupResult, PlacesError> {
        let body = SearchTextRequest {
            text_query: &request.query,
            location_bias: LocationBias {
                circle: Circle {
                    center: LatLng {
                        latitude: request.latitude,
                        longitude: request.longitude,
                    },
                    radius: self.config.radius,
                },
            },
        };

        tracing::debug!(
            "Searching places: query={:?} center=({}, {}) radius={}",
            request.query,
            request.latitude,
            request.longitude,
            self.config.radius
        );

        let timeout = self.config.timeout;
        let response = self
            .client
            .post(&self.config.endpoint)
            .header("X-Goog-Api-Key", &self.config.api_key)
            .header("X-Goog-FieldMask", &self.config.field_mask)
            .json(&body)
            .send()
            .await
            .map_err(|e| PlacesError::from_transport(e, timeout))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| PlacesError::from_transport(e, timeout))?;

        if !status.is_success() {
            let message = provider_message(&text)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());
            tracing::warn!("Places search failed with HTTP {}: {}", status, message);
            return Err(PlacesError::UpstreamError {
                status: status.as_u16(),
                message,
            });
        }

        let results = parse_places(&text)?;
        tracing::info!(
            "Places search for {:?} returned {} results",
            request.query,
            results.len()
        );
        Ok(LookupResult::new(request, results))
    }
}

#[async_trait]
impl PlacesLookup for PlacesClient {
    async fn find_places(
        &self,
        query: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<LookupResult, PlacesError> {
        let request = LookupRequest::new(query, latitude, longitude)?;
        self.lookup(request).await
    }
}

/// Extract the provider's error message from a body, falling back to the raw text.
fn provider_message(body: &str) -> Option<String> {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        if let Some(message) = envelope.error.message.filter(|m| !m.is_empty()) {
            return Some(match envelope.error.status {
                Some(status) => format!("{} ({})", message, status),
                None => message,
            });
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse a success body into records, rejecting anything incomplete.
fn parse_places(body: &str) -> Result<Vec<PlaceRecord>, PlacesError> {
    let parsed: SearchTextResponse = serde_json::from_str(body)
        .map_err(|e| PlacesError::MalformedResponse(format!("invalid JSON: {}", e)))?;

    let places = parsed.places.ok_or_else(|| {
        PlacesError::MalformedResponse("response has no `places` array".to_string())
    })?;

    places
        .into_iter()
        .enumerate()
        .map(|(i, place)| {
            let name = place
                .display_name
                .and_then(|d| d.text)
                .ok_or_else(|| {
                    PlacesError::MalformedResponse(format!(
                        "place {} has no displayName.text",
                        i
                    ))
                })?;
            let address = place.formatted_address.ok_or_else(|| {
                PlacesError::MalformedResponse(format!("place {} has no formattedAddress", i))
            })?;
            Ok(PlaceRecord { name, address })
        })
        .collect()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchTextRequest<'a> {
    text_query: &'a str,
    location_bias: LocationBias,
}

#[derive(Debug, Serialize)]
struct LocationBias {
    circle: Circle,
}

#[derive(Debug, Serialize)]
struct Circle {
    center: LatLng,
    radius: f64,
}

#[derive(Debug, Serialize)]
struct LatLng {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct SearchTextResponse {
    #[serde(default)]
    places: Option<Vec<WirePlace>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePlace {
    #[serde(default)]
    display_name: Option<LocalizedText>,
    #[serde(default)]
    formatted_address: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LocalizedText {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    status: Option<String>,
}
