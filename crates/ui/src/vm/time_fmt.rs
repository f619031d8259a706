use chrono::{DateTime, Utc};

#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M").to_string()
}

/// `-` when the timestamp is unknown.
#[must_use]
pub fn format_optional_datetime(value: Option<DateTime<Utc>>) -> String {
    value.map_or_else(|| "-".to_string(), format_datetime)
}

/// Whole numbers without decimals, everything else with up to two.
#[must_use]
pub fn format_points(points: f64) -> String {
    if !points.is_finite() {
        return "0".to_string();
    }
    if points.fract() == 0.0 {
        return format!("{points:.0}");
    }
    let text = format!("{points:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[must_use]
pub fn format_percent(percentage: f64) -> String {
    format!("{}%", format_points((percentage * 10.0).round() / 10.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    #[test]
    fn datetime_is_minute_precision() {
        assert_eq!(format_datetime(fixed_now()), "2023-11-14 22:13");
        assert_eq!(format_optional_datetime(None), "-");
    }

    #[test]
    fn points_drop_trailing_zeros() {
        assert_eq!(format_points(7.0), "7");
        assert_eq!(format_points(2.5), "2.5");
        assert_eq!(format_points(1.0 / 3.0), "0.33");
        assert_eq!(format_points(f64::NAN), "0");
    }

    #[test]
    fn percent_rounds_to_one_decimal() {
        assert_eq!(format_percent(70.0), "70%");
        assert_eq!(format_percent(66.666), "66.7%");
    }
}
