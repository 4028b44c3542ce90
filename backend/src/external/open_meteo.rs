//! Open-Meteo API client
//!
//! One client covers the forecast, archive, air-quality, climate, marine,
//! flood and ensemble endpoints. Requests are built separately from being
//! sent so the exact query can be inspected.

use std::sync::Arc;

use reqwest::{Client, Request};
use serde_json::Value;

use crate::config::OpenMeteoConfig;
use crate::error::{AppError, AppResult};

const SERVICE: &str = "Open-Meteo";

/// Open-Meteo API family member
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMeteoApi {
    Forecast,
    Archive,
    AirQuality,
    Climate,
    Marine,
    Flood,
    Ensemble,
}

/// Query parameters in the order they are appended
pub type QueryParams = Vec<(&'static str, String)>;

/// `latitude`/`longitude` exactly as the caller passed them
pub fn location_params(latitude: f64, longitude: f64) -> QueryParams {
    vec![
        ("latitude", latitude.to_string()),
        ("longitude", longitude.to_string()),
    ]
}

/// Open-Meteo API client
#[derive(Clone)]
pub struct OpenMeteoClient {
    client: Client,
    endpoints: Arc<OpenMeteoConfig>,
}

impl OpenMeteoClient {
    /// Create a new OpenMeteoClient
    pub fn new(endpoints: OpenMeteoConfig) -> Self {
        Self::with_client(Client::new(), endpoints)
    }

    /// Create a client sharing an existing connection pool
    pub fn with_client(client: Client, endpoints: OpenMeteoConfig) -> Self {
        Self {
            client,
            endpoints: Arc::new(endpoints),
        }
    }

    pub fn endpoint(&self, api: OpenMeteoApi) -> &str {
        let e = &self.endpoints;
        match api {
            OpenMeteoApi::Forecast => &e.forecast_url,
            OpenMeteoApi::Archive => &e.archive_url,
            OpenMeteoApi::AirQuality => &e.air_quality_url,
            OpenMeteoApi::Climate => &e.climate_url,
            OpenMeteoApi::Marine => &e.marine_url,
            OpenMeteoApi::Flood => &e.flood_url,
            OpenMeteoApi::Ensemble => &e.ensemble_url,
        }
    }

    /// Build the GET request without sending it
    pub fn request(&self, api: OpenMeteoApi, params: &QueryParams) -> AppResult<Request> {
        self.client
            .get(self.endpoint(api))
            .query(params)
            .build()
            .map_err(|e| AppError::Internal(format!("Invalid Open-Meteo request: {}", e)))
    }

    /// Fetch and parse a response.
    ///
    /// A body of `{"error": true, "reason": ...}` becomes [`AppError::Provider`]
    /// regardless of the HTTP status, matching how Open-Meteo reports bad
    /// parameters.
    pub async fn fetch(&self, api: OpenMeteoApi, params: &QueryParams) -> AppResult<Value> {
        let request = self.request(api, params)?;
        tracing::debug!(url = %request.url(), "Open-Meteo request");

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| AppError::ExternalService(format!("Open-Meteo request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::ExternalService(format!("Failed to read Open-Meteo response: {}", e)))?;

        parse_response(status.as_u16(), &body)
    }
}

/// Interpret an Open-Meteo response body
pub fn parse_response(status: u16, body: &str) -> AppResult<Value> {
    let data: Value = match serde_json::from_str(body) {
        Ok(data) => data,
        Err(e) if (200..300).contains(&status) => {
            return Err(AppError::ExternalService(format!(
                "Failed to parse Open-Meteo response: {}",
                e
            )))
        }
        Err(_) => {
            return Err(AppError::UpstreamStatus {
                service: SERVICE,
                status,
                body: body.to_string(),
            })
        }
    };

    if provider_error(&data) {
        let reason = data
            .get("reason")
            .and_then(Value::as_str)
            .unwrap_or("unknown reason")
            .to_string();
        return Err(AppError::Provider {
            service: SERVICE,
            reason,
        });
    }

    if !(200..300).contains(&status) {
        return Err(AppError::UpstreamStatus {
            service: SERVICE,
            status,
            body: body.to_string(),
        });
    }

    Ok(data)
}

fn provider_error(data: &Value) -> bool {
    match data.get("error") {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Null) | None => false,
        Some(_) => true,
    }
}
