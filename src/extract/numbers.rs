use crate::model::Metric;

/// Chinese magnitude suffixes, checked in order
const UNITS: &[(char, f64)] = &[('万', 10_000.0), ('亿', 100_000_000.0)];

/// Normalizes a displayed count such as `"1.2万"` or `"1,234"` to a number
///
/// Commas are stripped, a `万` or `亿` suffix scales the value, and anything
/// that still does not parse is returned as text instead of being dropped.
///
/// # Example
///
/// ```
/// use cwm_harvest::extract::normalize_number;
/// use cwm_harvest::Metric;
///
/// assert_eq!(normalize_number("1.2万"), Metric::Number(12000.0));
/// assert_eq!(normalize_number("abc"), Metric::Text("abc".to_string()));
/// ```
pub fn normalize_number(text: &str) -> Metric {
    let cleaned = text.trim().replace(',', "");
    if cleaned.is_empty() {
        return Metric::Text(cleaned);
    }

    for (unit, multiplier) in UNITS {
        if cleaned.contains(*unit) {
            return match cleaned.replace(*unit, "").trim().parse::<f64>() {
                Ok(value) => Metric::Number(value * multiplier),
                Err(_) => Metric::Text(cleaned),
            };
        }
    }

    match cleaned.parse::<f64>() {
        Ok(value) => Metric::Number(value),
        Err(_) => Metric::Text(cleaned),
    }
}
