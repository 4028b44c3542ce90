//! Nominatim (OpenStreetMap) geocoding client
//!
//! Usage policy: https://operations.osmfoundation.org/policies/nominatim/
//! Every request carries an identifying User-Agent.

use reqwest::{header::USER_AGENT, Client, Request};
use serde_json::Value;
use shared::PlaceResult;

use crate::config::GeocodingConfig;
use crate::error::{AppError, AppResult};

const SERVICE: &str = "Nominatim";

/// Nominatim geocoding client
#[derive(Clone)]
pub struct NominatimClient {
    client: Client,
    base_url: String,
    user_agent: String,
}

impl NominatimClient {
    pub fn new(config: &GeocodingConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &GeocodingConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
        }
    }

    /// `GET /search?format=json&q=...`
    pub fn search_request(
        &self,
        query: &str,
        address_details: bool,
        limit: Option<u32>,
    ) -> AppResult<Request> {
        let mut params: Vec<(&str, String)> =
            vec![("format", "json".to_string()), ("q", query.to_string())];
        if address_details {
            params.push(("addressdetails", "1".to_string()));
        }
        if let Some(limit) = limit {
            params.push(("limit", limit.to_string()));
        }
        self.build(&format!("{}/search", self.base_url), &params)
    }

    /// `GET /reverse?format=json&lat=...&lon=...`
    pub fn reverse_request(
        &self,
        latitude: f64,
        longitude: f64,
        address_details: bool,
    ) -> AppResult<Request> {
        let mut params: Vec<(&str, String)> = vec![
            ("format", "json".to_string()),
            ("lat", latitude.to_string()),
            ("lon", longitude.to_string()),
        ];
        if address_details {
            params.push(("addressdetails", "1".to_string()));
        }
        self.build(&format!("{}/reverse", self.base_url), &params)
    }

    /// `GET /details?place_id=...&format=json`
    pub fn details_request(&self, place_id: u64) -> AppResult<Request> {
        let params: Vec<(&str, String)> = vec![
            ("place_id", place_id.to_string()),
            ("format", "json".to_string()),
        ];
        self.build(&format!("{}/details", self.base_url), &params)
    }

    fn build(&self, url: &str, params: &[(&str, String)]) -> AppResult<Request> {
        self.client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .query(params)
            .build()
            .map_err(|e| AppError::Internal(format!("Invalid Nominatim request: {}", e)))
    }

    /// Forward geocoding
    pub async fn search(
        &self,
        query: &str,
        address_details: bool,
        limit: Option<u32>,
    ) -> AppResult<Vec<PlaceResult>> {
        let request = self.search_request(query, address_details, limit)?;
        let body = self.execute(request).await?;
        serde_json::from_value(body)
            .map_err(|e| AppError::ExternalService(format!("Failed to parse search results: {}", e)))
    }

    /// Reverse geocoding. Nominatim answers unknown points with
    /// `{"error": "Unable to geocode"}`, which becomes a provider error.
    pub async fn reverse(
        &self,
        latitude: f64,
        longitude: f64,
        address_details: bool,
    ) -> AppResult<Value> {
        let request = self.reverse_request(latitude, longitude, address_details)?;
        self.send_reverse(request).await
    }

    /// Send a request built by [`Self::reverse_request`]
    pub async fn send_reverse(&self, request: Request) -> AppResult<Value> {
        let body = self.execute(request).await?;
        if let Some(reason) = body.get("error") {
            let reason = reason
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| reason.to_string());
            return Err(AppError::Provider {
                service: SERVICE,
                reason,
            });
        }
        Ok(body)
    }

    /// Full record for a place id
    pub async fn details(&self, place_id: u64) -> AppResult<Value> {
        let request = self.details_request(place_id)?;
        self.execute(request).await
    }

    async fn execute(&self, request: Request) -> AppResult<Value> {
        tracing::debug!(url = %request.url(), "Nominatim request");
        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| AppError::ExternalService(format!("Nominatim request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::UpstreamStatus {
                service: SERVICE,
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("Failed to parse Nominatim response: {}", e)))
    }
}
