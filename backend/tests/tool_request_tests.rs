//! Provider request building tests
//!
//! Coordinates must reach every provider exactly as the caller passed them.

use chrono::NaiveDate;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use reqwest::Url;
use serde_json::json;
use shared::{Coordinate, Units, VisualizationQuery, VisualizationType};
use spatialgpt_backend::{
    config::Config,
    external::{
        open_meteo::{location_params, QueryParams},
        NominatimClient, OpenMeteoApi, OpenMeteoClient, OverpassClient,
    },
    services::visualization::request_params,
    tools::{
        air_quality::air_quality_params,
        climate::climate_params,
        parse_args,
        weather::{
            detailed_forecast_params, historical_weather_params, weather_alert_params,
            weather_params, DetailedForecastArgs, HistoricalWeatherArgs, LocationArgs,
        },
    },
};

fn query_value(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// Build the Open-Meteo request and check the coordinates on its URL
fn assert_sent_coordinates(
    api: OpenMeteoApi,
    params: &QueryParams,
    latitude: f64,
    longitude: f64,
) -> Result<(), TestCaseError> {
    let config = Config::defaults().unwrap();
    let request = OpenMeteoClient::new(config.open_meteo)
        .request(api, params)
        .unwrap();
    prop_assert_eq!(query_value(request.url(), "latitude"), Some(latitude.to_string()));
    prop_assert_eq!(query_value(request.url(), "longitude"), Some(longitude.to_string()));
    Ok(())
}

const APIS: [OpenMeteoApi; 7] = [
    OpenMeteoApi::Forecast,
    OpenMeteoApi::Archive,
    OpenMeteoApi::AirQuality,
    OpenMeteoApi::Climate,
    OpenMeteoApi::Marine,
    OpenMeteoApi::Flood,
    OpenMeteoApi::Ensemble,
];

proptest! {
    #[test]
    fn open_meteo_coordinates_verbatim(
        latitude in -90.0f64..=90.0,
        longitude in -180.0f64..=180.0,
        api_index in 0usize..7,
    ) {
        let config = Config::defaults().unwrap();
        let client = OpenMeteoClient::new(config.open_meteo);
        let request = client
            .request(APIS[api_index], &location_params(latitude, longitude))
            .unwrap();

        prop_assert_eq!(query_value(request.url(), "latitude"), Some(latitude.to_string()));
        prop_assert_eq!(query_value(request.url(), "longitude"), Some(longitude.to_string()));
    }

    #[test]
    fn weather_tool_coordinates_verbatim(
        latitude in -90.0f64..=90.0,
        longitude in -180.0f64..=180.0,
    ) {
        let params = weather_params(latitude, longitude);
        assert_sent_coordinates(OpenMeteoApi::Forecast, &params, latitude, longitude)?;
    }

    #[test]
    fn detailed_forecast_tool_coordinates_verbatim(
        latitude in -90.0f64..=90.0,
        longitude in -180.0f64..=180.0,
        days in 1u32..=16,
    ) {
        let args: DetailedForecastArgs = parse_args(json!({
            "latitude": latitude, "longitude": longitude, "days": days
        }))
        .unwrap();
        let params = detailed_forecast_params(&args);
        assert_sent_coordinates(OpenMeteoApi::Forecast, &params, latitude, longitude)?;
    }

    #[test]
    fn historical_weather_tool_coordinates_verbatim(
        latitude in -90.0f64..=90.0,
        longitude in -180.0f64..=180.0,
    ) {
        let args: HistoricalWeatherArgs = parse_args(json!({
            "latitude": latitude, "longitude": longitude,
            "start_date": "2024-01-01", "end_date": "2024-01-31"
        }))
        .unwrap();
        let params = historical_weather_params(&args);
        assert_sent_coordinates(OpenMeteoApi::Archive, &params, latitude, longitude)?;
    }

    #[test]
    fn location_tools_coordinates_verbatim(
        latitude in -90.0f64..=90.0,
        longitude in -180.0f64..=180.0,
    ) {
        let args: LocationArgs =
            parse_args(json!({"latitude": latitude, "longitude": longitude})).unwrap();

        assert_sent_coordinates(
            OpenMeteoApi::Forecast,
            &weather_alert_params(&args),
            latitude,
            longitude,
        )?;
        assert_sent_coordinates(
            OpenMeteoApi::AirQuality,
            &air_quality_params(&args),
            latitude,
            longitude,
        )?;
        assert_sent_coordinates(OpenMeteoApi::Climate, &climate_params(&args), latitude, longitude)?;
    }

    #[test]
    fn visualization_coordinates_verbatim(
        latitude in -90.0f64..=90.0,
        longitude in -180.0f64..=180.0,
        type_index in 0usize..8,
    ) {
        let visualization_type = VisualizationType::ALL[type_index];
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let query = VisualizationQuery {
            coordinate: Coordinate::new(latitude, longitude),
            date_range: visualization_type.default_date_range(today),
            units: Units::default(),
            visualization_type,
        };

        let (api, params) = request_params(&query);
        assert_sent_coordinates(api, &params, latitude, longitude)?;
    }

    #[test]
    fn nominatim_reverse_coordinates_verbatim(
        latitude in -90.0f64..=90.0,
        longitude in -180.0f64..=180.0,
    ) {
        let config = Config::defaults().unwrap();
        let client = NominatimClient::new(&config.geocoding);
        let request = client.reverse_request(latitude, longitude, false).unwrap();

        prop_assert_eq!(query_value(request.url(), "lat"), Some(latitude.to_string()));
        prop_assert_eq!(query_value(request.url(), "lon"), Some(longitude.to_string()));
    }

    #[test]
    fn overpass_query_carries_coordinates(
        latitude in -90.0f64..=90.0,
        longitude in -180.0f64..=180.0,
        radius in 1u32..=50_000,
    ) {
        let config = Config::defaults().unwrap();
        let client = OverpassClient::new(&config.overpass);
        let request = client.amenities_request(radius, latitude, longitude).unwrap();

        let data = query_value(request.url(), "data").unwrap();
        let expected = format!("(around:{},{},{})", radius, latitude, longitude);
        prop_assert!(data.contains(&expected));
    }
}

#[test]
fn test_endpoints_per_api() {
    let config = Config::defaults().unwrap();
    let client = OpenMeteoClient::new(config.open_meteo);
    assert!(client.endpoint(OpenMeteoApi::Archive).contains("archive-api"));
    assert!(client.endpoint(OpenMeteoApi::Flood).contains("flood-api"));
}
