//! Column names of the Major Crime Indicators table and the boundary file.

pub const MCI_CATEGORY: &str = "MCI_CATEGORY";
pub const PREMISES_TYPE: &str = "PREMISES_TYPE";
pub const OCC_YEAR: &str = "OCC_YEAR";
pub const OCC_MONTH: &str = "OCC_MONTH";
pub const OCC_DAY: &str = "OCC_DAY";
pub const OCC_DOW: &str = "OCC_DOW";
pub const OCC_HOUR: &str = "OCC_HOUR";
pub const HOOD_140: &str = "HOOD_140";
pub const NEIGHBOURHOOD_140: &str = "NEIGHBOURHOOD_140";
pub const HOOD_158: &str = "HOOD_158";
pub const NEIGHBOURHOOD_158: &str = "NEIGHBOURHOOD_158";

/// Boundary feature properties.
pub const AREA_SHORT_CODE: &str = "AREA_SHORT_CODE";
pub const AREA_NAME: &str = "AREA_NAME";

/// Placeholder for "no stated area".
pub const NSA_SENTINEL: &str = "NSA";

/// Cell texts read as missing, alongside empty fields.
pub const NULL_MARKERS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Neighbourhood fields that must not carry the sentinel.
pub const SENTINEL_COLUMNS: [&str; 4] = [HOOD_158, NEIGHBOURHOOD_158, HOOD_140, NEIGHBOURHOOD_140];

/// Canonical form of a numeric-looking key.
///
/// `"097"`, `" 97 "` and `"97.0"` all become `"97"`. Anything that is not an
/// integral number is returned trimmed and otherwise untouched.
pub fn normalize_numeric_label(raw: &str) -> String {
    let trimmed = raw.trim();
    if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        let digits = trimmed.trim_start_matches('0');
        return if digits.is_empty() {
            "0".to_string()
        } else {
            digits.to_string()
        };
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", v as i64),
        _ => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_labels_collapse_to_one_key() {
        assert_eq!(normalize_numeric_label("097"), "97");
        assert_eq!(normalize_numeric_label(" 97 "), "97");
        assert_eq!(normalize_numeric_label("97.0"), "97");
        assert_eq!(normalize_numeric_label("000"), "0");
        assert_eq!(normalize_numeric_label("2019.0"), "2019");
    }

    #[test]
    fn non_integral_labels_are_only_trimmed() {
        assert_eq!(normalize_numeric_label(" NSA "), "NSA");
        assert_eq!(normalize_numeric_label("12.5"), "12.5");
        assert_eq!(normalize_numeric_label("C10"), "C10");
    }
}
