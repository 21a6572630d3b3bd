//! Month and weekday name tables.
//!
//! The incident table spells months and weekdays in English. Charts show them
//! in the configured locale, always in calendar order (January first, Monday
//! first).

use serde::Deserialize;

pub const ENGLISH_MONTHS: [&str; 12] = [
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

const INDONESIAN_MONTHS: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

pub const ENGLISH_WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const INDONESIAN_WEEKDAYS: [&str; 7] = [
    "Senin", "Selasa", "Rabu", "Kamis", "Jumat", "Sabtu", "Minggu",
];

/// Display language for calendar labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    #[default]
    Indonesian,
    English,
}

/// Which calendar table a label belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Calendar {
    Month,
    Weekday,
}

impl Calendar {
    fn english(self) -> &'static [&'static str] {
        match self {
            Calendar::Month => &ENGLISH_MONTHS,
            Calendar::Weekday => &ENGLISH_WEEKDAYS,
        }
    }
}

impl Locale {
    /// Canonical label order for `calendar` in this locale.
    pub fn labels(self, calendar: Calendar) -> &'static [&'static str] {
        match (self, calendar) {
            (Locale::English, c) => c.english(),
            (Locale::Indonesian, Calendar::Month) => &INDONESIAN_MONTHS,
            (Locale::Indonesian, Calendar::Weekday) => &INDONESIAN_WEEKDAYS,
        }
    }

    /// Translate an English month or weekday name.
    ///
    /// The input is trimmed and case-folded first, so `" monday"` and
    /// `"MONDAY "` both resolve. Unknown names give `None`.
    pub fn translate(self, calendar: Calendar, english: &str) -> Option<&'static str> {
        let wanted = title_case(english);
        calendar
            .english()
            .iter()
            .position(|name| *name == wanted)
            .map(|idx| self.labels(calendar)[idx])
    }
}

/// `"  wEDNESDAY "` -> `"Wednesday"`.
pub fn title_case(raw: &str) -> String {
    let mut chars = raw.trim().chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_after_normalising_case_and_whitespace() {
        assert_eq!(
            Locale::Indonesian.translate(Calendar::Weekday, "  monday "),
            Some("Senin")
        );
        assert_eq!(
            Locale::Indonesian.translate(Calendar::Month, "DECEMBER"),
            Some("Desember")
        );
        assert_eq!(
            Locale::English.translate(Calendar::Weekday, "sunday"),
            Some("Sunday")
        );
    }

    #[test]
    fn unknown_names_are_not_translated() {
        assert_eq!(Locale::Indonesian.translate(Calendar::Month, "Smarch"), None);
        assert_eq!(Locale::English.translate(Calendar::Weekday, ""), None);
    }

    #[test]
    fn tables_are_calendar_ordered() {
        assert_eq!(Locale::Indonesian.labels(Calendar::Month).len(), 12);
        assert_eq!(Locale::Indonesian.labels(Calendar::Weekday)[0], "Senin");
        assert_eq!(Locale::English.labels(Calendar::Weekday)[6], "Sunday");
    }

    #[test]
    fn title_case_handles_mixed_input() {
        assert_eq!(title_case("  wEDNESDAY "), "Wednesday");
        assert_eq!(title_case("   "), "");
    }
}
