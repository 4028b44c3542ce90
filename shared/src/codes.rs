//! Static lookup tables used to annotate provider responses
//!
//! Open-Meteo reports weather as WMO interpretation codes and air quality as
//! European AQI levels. These tables turn them into readable labels.

/// Label returned for any code missing from a table
pub const UNKNOWN_LABEL: &str = "Unknown";

/// WMO weather interpretation codes
pub const WEATHER_CODES: &[(i64, &str)] = &[
    (0, "Clear sky"),
    (1, "Mainly clear"),
    (2, "Partly cloudy"),
    (3, "Overcast"),
    (45, "Fog"),
    (48, "Depositing rime fog"),
    (51, "Light drizzle"),
    (53, "Moderate drizzle"),
    (55, "Dense drizzle"),
    (56, "Light freezing drizzle"),
    (57, "Dense freezing drizzle"),
    (61, "Slight rain"),
    (63, "Moderate rain"),
    (65, "Heavy rain"),
    (66, "Light freezing rain"),
    (67, "Heavy freezing rain"),
    (71, "Slight snow fall"),
    (73, "Moderate snow fall"),
    (75, "Heavy snow fall"),
    (77, "Snow grains"),
    (80, "Slight rain showers"),
    (81, "Moderate rain showers"),
    (82, "Violent rain showers"),
    (85, "Slight snow showers"),
    (86, "Heavy snow showers"),
    (95, "Thunderstorm"),
    (96, "Thunderstorm with slight hail"),
    (99, "Thunderstorm with heavy hail"),
];

/// Codes that raise a "Severe Weather" alert, with the alert wording
pub const SEVERE_WEATHER_CODES: &[(i64, &str)] = &[
    (65, "Heavy rain"),
    (67, "Heavy freezing rain"),
    (71, "Snow fall"),
    (73, "Moderate snow fall"),
    (75, "Heavy snow fall"),
    (77, "Snow grains"),
    (82, "Violent rain showers"),
    (85, "Slight snow showers"),
    (86, "Heavy snow showers"),
    (95, "Thunderstorm"),
    (96, "Thunderstorm with slight hail"),
    (99, "Thunderstorm with heavy hail"),
];

/// European AQI levels
pub const AQI_LEVELS: &[(i64, &str)] = &[
    (1, "Good"),
    (2, "Fair"),
    (3, "Moderate"),
    (4, "Poor"),
    (5, "Very Poor"),
];

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

fn lookup(table: &[(i64, &'static str)], code: i64) -> Option<&'static str> {
    table
        .iter()
        .find(|(candidate, _)| *candidate == code)
        .map(|(_, label)| *label)
}

/// Describe a WMO weather code
pub fn weather_description(code: i64) -> &'static str {
    lookup(WEATHER_CODES, code).unwrap_or(UNKNOWN_LABEL)
}

/// Alert wording for a severe weather code, `None` if the code is not severe
pub fn severe_weather_description(code: i64) -> Option<&'static str> {
    lookup(SEVERE_WEATHER_CODES, code)
}

/// Describe a European AQI level
pub fn aqi_level(level: i64) -> &'static str {
    lookup(AQI_LEVELS, level).unwrap_or(UNKNOWN_LABEL)
}

/// Describe a JSON value holding a weather code.
///
/// Providers send codes as numbers, sometimes as floats (`3.0`) and
/// sometimes as `null` for missing hours.
pub fn weather_description_value(value: &serde_json::Value) -> &'static str {
    json_code(value)
        .map(weather_description)
        .unwrap_or(UNKNOWN_LABEL)
}

/// Describe a JSON value holding an AQI level
pub fn aqi_level_value(value: &serde_json::Value) -> &'static str {
    json_code(value).map(aqi_level).unwrap_or(UNKNOWN_LABEL)
}

fn json_code(value: &serde_json::Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0)
            .map(|f| f as i64)
    })
}

/// Meteorological season for a 1-based month
pub fn season_for_month(month: u32, northern_hemisphere: bool) -> &'static str {
    let northern = match month {
        3..=5 => "Spring",
        6..=8 => "Summer",
        9..=11 => "Fall",
        _ => "Winter",
    };
    if northern_hemisphere {
        return northern;
    }
    match northern {
        "Spring" => "Fall",
        "Summer" => "Winter",
        "Fall" => "Spring",
        _ => "Summer",
    }
}

/// Seasons for January through December
pub fn seasons(northern_hemisphere: bool) -> Vec<&'static str> {
    (1..=12)
        .map(|month| season_for_month(month, northern_hemisphere))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_known_weather_codes() {
        assert_eq!(weather_description(0), "Clear sky");
        assert_eq!(weather_description(3), "Overcast");
        assert_eq!(weather_description(99), "Thunderstorm with heavy hail");
    }

    #[test]
    fn test_unknown_weather_code() {
        assert_eq!(weather_description(999), "Unknown");
        assert_eq!(weather_description(-1), "Unknown");
        assert_eq!(weather_description(4), "Unknown");
    }

    #[test]
    fn test_every_documented_code_has_label() {
        for (code, _) in WEATHER_CODES {
            assert_ne!(weather_description(*code), UNKNOWN_LABEL);
        }
        for (level, _) in AQI_LEVELS {
            assert_ne!(aqi_level(*level), UNKNOWN_LABEL);
        }
    }

    #[test]
    fn test_aqi_levels() {
        assert_eq!(aqi_level(1), "Good");
        assert_eq!(aqi_level(5), "Very Poor");
        assert_eq!(aqi_level(0), "Unknown");
        assert_eq!(aqi_level(6), "Unknown");
    }

    #[test]
    fn test_json_values() {
        assert_eq!(weather_description_value(&json!(3)), "Overcast");
        assert_eq!(weather_description_value(&json!(61.0)), "Slight rain");
        assert_eq!(weather_description_value(&json!(null)), "Unknown");
        assert_eq!(weather_description_value(&json!(2.5)), "Unknown");
        assert_eq!(aqi_level_value(&json!(2)), "Fair");
    }

    #[test]
    fn test_severe_codes_subset() {
        assert_eq!(severe_weather_description(71), Some("Snow fall"));
        assert_eq!(severe_weather_description(3), None);
        for (code, _) in SEVERE_WEATHER_CODES {
            assert_ne!(weather_description(*code), UNKNOWN_LABEL);
        }
    }

    #[test]
    fn test_seasons_by_hemisphere() {
        assert_eq!(season_for_month(1, true), "Winter");
        assert_eq!(season_for_month(4, true), "Spring");
        assert_eq!(season_for_month(7, true), "Summer");
        assert_eq!(season_for_month(10, true), "Fall");
        assert_eq!(season_for_month(12, true), "Winter");

        assert_eq!(season_for_month(1, false), "Summer");
        assert_eq!(season_for_month(4, false), "Fall");
        assert_eq!(season_for_month(7, false), "Winter");
        assert_eq!(season_for_month(10, false), "Spring");
    }

    #[test]
    fn test_seasons_list_has_twelve_entries() {
        let s = seasons(true);
        assert_eq!(s.len(), 12);
        assert_eq!(s[0], "Winter");
        assert_eq!(s[5], "Summer");
    }
}
