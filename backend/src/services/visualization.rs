//! Visualization data service
//!
//! Server side of the drawer panels: one Open-Meteo request per
//! visualization type, cached in memory for the type's freshness window.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde_json::Value;
use shared::validation::{validate_coordinate, validate_date_range};
use shared::{VisualizationQuery, VisualizationType};

use crate::config::CacheConfig;
use crate::error::{AppError, AppResult};
use crate::external::open_meteo::{location_params, QueryParams};
use crate::external::{OpenMeteoApi, OpenMeteoClient};

const FORECAST_HOURLY: &str = "temperature_2m,relative_humidity_2m,dew_point_2m,apparent_temperature,precipitation,rain,showers,snowfall,snow_depth,weather_code,pressure_msl,surface_pressure,cloud_cover,cloud_cover_low,cloud_cover_mid,cloud_cover_high,visibility,evapotranspiration,et0_fao_evapotranspiration,vapor_pressure_deficit,wind_speed_10m,wind_speed_100m,wind_direction_10m,wind_direction_100m,wind_gusts_10m,soil_temperature_0cm,soil_temperature_6cm,soil_temperature_18cm,soil_temperature_54cm,soil_moisture_0_1cm,soil_moisture_1_3cm,soil_moisture_3_9cm,soil_moisture_9_27cm,soil_moisture_27_81cm";
const FORECAST_DAILY: &str = "weather_code,temperature_2m_max,temperature_2m_min,apparent_temperature_max,apparent_temperature_min,sunrise,sunset,daylight_duration,sunshine_duration,uv_index_max,uv_index_clear_sky_max,precipitation_sum,rain_sum,showers_sum,snowfall_sum,precipitation_hours,precipitation_probability_max,wind_speed_10m_max,wind_gusts_10m_max,wind_direction_10m_dominant,shortwave_radiation_sum,et0_fao_evapotranspiration";
const HISTORY_HOURLY: &str = "temperature_2m,relative_humidity_2m,dew_point_2m,apparent_temperature,precipitation,rain,snowfall,weather_code,pressure_msl,surface_pressure,cloud_cover,wind_speed_10m,wind_direction_10m,wind_gusts_10m";
const HISTORY_DAILY: &str = "weather_code,temperature_2m_max,temperature_2m_min,apparent_temperature_max,apparent_temperature_min,sunrise,sunset,precipitation_sum,rain_sum,snowfall_sum,precipitation_hours,wind_speed_10m_max,wind_gusts_10m_max,wind_direction_10m_dominant";
const AIR_QUALITY_HOURLY: &str = "pm10,pm2_5,carbon_monoxide,nitrogen_dioxide,sulphur_dioxide,ozone,aerosol_optical_depth,dust,uv_index,uv_index_clear_sky,alder_pollen,birch_pollen,grass_pollen,mugwort_pollen,olive_pollen,ragweed_pollen";
const CLIMATE_MODELS: &str =
    "EC_Earth3P_HR,FGOALS_f3_H,MPI_ESM1_2_XR,NICAM16_8S,CMCC_CM2_VHR4,HiRAM_SIT_HR,MRI_AGCM3_2_S";
const CLIMATE_DAILY: &str = "temperature_2m_max,temperature_2m_min,precipitation_sum,wind_speed_10m_max";
const MARINE_HOURLY: &str = "wave_height,wave_direction,wave_period,wind_wave_height,wind_wave_direction,wind_wave_period,swell_wave_height,swell_wave_direction,swell_wave_period,wind_speed_10m,wind_direction_10m,wind_gusts_10m";
const MARINE_DAILY: &str = "wave_height_max,wave_direction_dominant,wave_period_max,wind_wave_height_max,wind_wave_direction_dominant,wind_wave_period_max,swell_wave_height_max,swell_wave_direction_dominant,swell_wave_period_max";
const SOLAR_HOURLY: &str = "shortwave_radiation,direct_radiation,diffuse_radiation,direct_normal_irradiance,terrestrial_radiation,shortwave_radiation_instant,direct_radiation_instant,diffuse_radiation_instant,direct_normal_irradiance_instant,terrestrial_radiation_instant";

/// Which API a visualization reads and with what parameters
pub fn request_params(query: &VisualizationQuery) -> (OpenMeteoApi, QueryParams) {
    let mut params = location_params(query.coordinate.latitude, query.coordinate.longitude);
    let (start, end) = query.date_range.to_query_dates();
    params.push(("start_date", start));
    params.push(("end_date", end));

    let units = query.units;
    let push = |params: &mut QueryParams, key: &'static str, value: &str| {
        params.push((key, value.to_string()))
    };

    let api = match query.visualization_type {
        VisualizationType::WeatherForecast => {
            push(&mut params, "hourly", FORECAST_HOURLY);
            push(&mut params, "daily", FORECAST_DAILY);
            OpenMeteoApi::Forecast
        }
        VisualizationType::WeatherHistory => {
            push(&mut params, "hourly", HISTORY_HOURLY);
            push(&mut params, "daily", HISTORY_DAILY);
            OpenMeteoApi::Archive
        }
        VisualizationType::AirQuality => {
            push(&mut params, "hourly", AIR_QUALITY_HOURLY);
            OpenMeteoApi::AirQuality
        }
        VisualizationType::ClimateChange => {
            push(&mut params, "models", CLIMATE_MODELS);
            push(&mut params, "daily", CLIMATE_DAILY);
            OpenMeteoApi::Climate
        }
        VisualizationType::Marine => {
            push(&mut params, "hourly", MARINE_HOURLY);
            push(&mut params, "daily", MARINE_DAILY);
            OpenMeteoApi::Marine
        }
        VisualizationType::Flood => {
            push(&mut params, "daily", "river_discharge");
            OpenMeteoApi::Flood
        }
        VisualizationType::SolarRadiation => {
            push(&mut params, "hourly", SOLAR_HOURLY);
            OpenMeteoApi::Forecast
        }
        VisualizationType::EnsembleModels => {
            push(&mut params, "hourly", "temperature_2m");
            OpenMeteoApi::Ensemble
        }
    };

    // the climate API has no timezone parameter
    if query.visualization_type != VisualizationType::ClimateChange {
        push(&mut params, "timezone", "auto");
    }
    if query.visualization_type.uses_temperature_unit() {
        push(&mut params, "temperature_unit", units.temperature.as_str());
    }
    if query.visualization_type.uses_wind_and_precipitation_units() {
        push(&mut params, "windspeed_unit", units.wind.as_str());
        push(&mut params, "precipitation_unit", units.precipitation.as_str());
    }

    (api, params)
}

/// In-memory cache with per-entry expiry and a size bound.
///
/// Expired entries are swept on every insert. Past `max_entries` the oldest
/// insertions are evicted first.
pub struct TtlCache {
    max_entries: usize,
    inner: Mutex<CacheEntries>,
}

#[derive(Default)]
struct CacheEntries {
    values: HashMap<String, (Instant, Value)>,
    order: VecDeque<String>,
}

impl TtlCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            max_entries,
            inner: Mutex::new(CacheEntries::default()),
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let (expires_at, value) = inner.values.get(key)?;
        if Instant::now() < *expires_at {
            return Some(value.clone());
        }

        inner.values.remove(key);
        inner.order.retain(|entry| entry != key);
        None
    }

    pub fn insert(&self, key: String, value: Value, ttl: Duration) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();

        inner.values.retain(|_, (expires_at, _)| now < *expires_at);
        let CacheEntries { values, order } = &mut *inner;
        order.retain(|entry| entry != &key && values.contains_key(entry));

        if self.max_entries == 0 {
            values.clear();
            order.clear();
            return;
        }

        values.insert(key.clone(), (now + ttl, value));
        order.push_back(key);
        while values.len() > self.max_entries {
            match order.pop_front() {
                Some(evicted) => {
                    values.remove(&evicted);
                }
                None => break,
            }
        }
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .values
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Visualization data service
#[derive(Clone)]
pub struct VisualizationService {
    client: OpenMeteoClient,
    cache: Option<Arc<TtlCache>>,
}

impl VisualizationService {
    pub fn new(client: OpenMeteoClient, cache: &CacheConfig) -> Self {
        Self {
            client,
            cache: cache
                .enabled
                .then(|| Arc::new(TtlCache::new(cache.max_entries))),
        }
    }

    /// Fetch the data behind one panel
    pub async fn fetch(&self, query: &VisualizationQuery) -> AppResult<Value> {
        validate_coordinate(&query.coordinate)
            .map_err(|message| AppError::validation("coordinate", message))?;
        validate_date_range(&query.date_range)
            .map_err(|message| AppError::validation("from", message))?;

        let key = query.cache_key();

        if let Some(hit) = self.cache.as_ref().and_then(|cache| cache.get(&key)) {
            tracing::debug!(key = %key, "Visualization cache hit");
            return Ok(hit);
        }

        let (api, params) = request_params(query);
        let data = self.client.fetch(api, &params).await?;

        if let Some(cache) = &self.cache {
            let ttl = Duration::from_secs(query.visualization_type.stale_time_secs());
            cache.insert(key, data.clone(), ttl);
        }
        Ok(data)
    }
}
