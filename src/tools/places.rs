//! `get_places`: nearby-places lookup exposed to the locator agent.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::Tool;
use crate::places::PlacesLookup;

/// Find places near a coordinate.
///
/// Returns the lookup result as JSON (`query`, `latitude_used`,
/// `longitude_used`, `results`). Lookup failures are returned as errors so
/// the agent reports them instead of inventing places.
pub struct FindPlaces {
    lookup: Arc<dyn PlacesLookup>,
}

impl FindPlaces {
    pub fn new(lookup: Arc<dyn PlacesLookup>) -> Self {
        Self { lookup }
    }
}

#[derive(Debug, Deserialize)]
struct FindPlacesArgs {
    query: String,
    latitude: f64,
    longitude: f64,
}

#[async_trait]
impl Tool for FindPlaces {
    fn name(&self) -> &str {
        "get_places"
    }

    fn description(&self) -> &str {
        "Find locations near the given latitude and longitude using the Google Places API. Returns the query, the coordinates used, and a list of results with name and address."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The type of location you are searching for (for example \"Recycling center\")"
                },
                "latitude": {
                    "type": "number",
                    "description": "The current latitude of the user"
                },
                "longitude": {
                    "type": "number",
                    "description": "The current longitude of the user"
                }
            },
            "required": ["query", "latitude", "longitude"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let args: FindPlacesArgs = serde_json::from_value(args)
            .map_err(|e| anyhow::anyhow!("Invalid arguments for get_places: {}", e))?;

        let result = self
            .lookup
            .find_places(&args.query, args.latitude, args.longitude)
            .await?;

        Ok(serde_json::to_string_pretty(&result)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use crate::places::{LookupRequest, LookupResult, PlaceRecord, PlacesError};

    /// Answers every lookup with the same two places.
    struct Fixed;

    #[async_trait]
    impl PlacesLookup for Fixed {
        async fn find_places(
            &self,
            query: &str,
            latitude: f64,
            longitude: f64,
        ) -> Result<LookupResult, PlacesError> {
            let request = LookupRequest::new(query, latitude, longitude)?;
            Ok(LookupResult::new(
                request,
                vec![
                    PlaceRecord {
                        name: "ABC Recycling".to_string(),
                        address: "123 Main St".to_string(),
                    },
                    PlaceRecord {
                        name: "LA Sanitation".to_string(),
                        address: "1149 S Broadway".to_string(),
                    },
                ],
            ))
        }
    }

    /// Answers every lookup with a canned error, recording the arguments.
    struct Failing {
        calls: Mutex<Vec<(String, f64, f64)>>,
    }

    #[async_trait]
    impl PlacesLookup for Failing {
        async fn find_places(
            &self,
            query: &str,
            latitude: f64,
            longitude: f64,
        ) -> Result<LookupResult, PlacesError> {
            self.calls
                .lock()
                .unwrap()
                .push((query.to_string(), latitude, longitude));
            LookupRequest::new(query, latitude, longitude)?;
            Err(PlacesError::UpstreamError {
                status: 403,
                message: "API key not valid.".to_string(),
            })
        }
    }

    fn tool() -> (FindPlaces, Arc<Failing>) {
        let lookup = Arc::new(Failing {
            calls: Mutex::new(Vec::new()),
        });
        (FindPlaces::new(lookup.clone()), lookup)
    }

    #[test]
    fn test_schema_requires_all_arguments() {
        let (tool, _) = tool();
        let schema = tool.parameters_schema();
        assert_eq!(schema["required"], json!(["query", "latitude", "longitude"]));
        assert_eq!(schema["properties"]["latitude"]["type"], "number");
    }

    #[tokio::test]
    async fn test_returns_lookup_result_json() {
        let tool = FindPlaces::new(Arc::new(Fixed));
        let out = tool
            .execute(json!({"query": "Recycling center", "latitude": 34.06, "longitude": -118.30}))
            .await
            .unwrap();

        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["query"], "Recycling center");
        assert_eq!(value["latitude_used"], 34.06);
        assert_eq!(value["longitude_used"], -118.30);
        assert_eq!(value["results"][0]["name"], "ABC Recycling");
        assert_eq!(value["results"][1]["address"], "1149 S Broadway");
    }

    #[tokio::test]
    async fn test_missing_argument_is_rejected() {
        let (tool, lookup) = tool();
        let err = tool
            .execute(json!({"query": "park", "latitude": 1.0}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("longitude"), "{err}");
        assert!(lookup.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lookup_error_is_surfaced() {
        let (tool, lookup) = tool();
        let err = tool
            .execute(json!({"query": "Recycling center", "latitude": 34.06, "longitude": -118.30}))
            .await
            .unwrap_err();

        let places_err = err.downcast_ref::<PlacesError>().unwrap();
        assert_eq!(places_err.status(), Some(403));
        assert_eq!(
            lookup.calls.lock().unwrap()[0],
            ("Recycling center".to_string(), 34.06, -118.30)
        );
    }

    #[tokio::test]
    async fn test_invalid_argument_is_surfaced() {
        let (tool, _) = tool();
        let err = tool
            .execute(json!({"query": "", "latitude": 0.0, "longitude": 0.0}))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PlacesError>(),
            Some(PlacesError::InvalidArgument(_))
        ));
    }
}
