//! Display strings for the dashboard, per locale.

use crate::aggregate::{Dimension, Locale, TimeBreakdown};

/// Every piece of text the dashboard and the PNG export show.
#[derive(Debug, Clone, Copy)]
pub struct Captions {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub category_heading: &'static str,
    pub premises_heading: &'static str,
    pub time_heading: &'static str,
    pub tab_year_hour: &'static str,
    pub tab_day_month: &'static str,
    pub breakdown_prompt: &'static str,
    pub breakdown_options: [&'static str; 3],
    pub map_heading: &'static str,
    pub count: &'static str,
    pub incidents_axis: &'static str,
    pub crimes_axis: &'static str,
    pub total_crimes: &'static str,
    pub no_data: &'static str,
    pub loading: &'static str,
    pub export_button: &'static str,
    pub footer: &'static str,
    category: &'static str,
    premises: &'static str,
    year: &'static str,
    date: &'static str,
    month: &'static str,
    weekday: &'static str,
    hour: &'static str,
    neighbourhood: &'static str,
}

const INDONESIAN: Captions = Captions {
    title: "Kejahatan di Toronto",
    subtitle: "Visualisasi chart berdasarkan data Crimes in Toronto di Kaggle.",
    category_heading: "Kategori Kejahatan",
    premises_heading: "Lokasi Kejahatan",
    time_heading: "Waktu Kejadian",
    tab_year_hour: "Tahunan & Jam",
    tab_day_month: "Harian & Bulanan",
    breakdown_prompt: "Pilih jenis waktu:",
    breakdown_options: ["per hari (tanggal)", "per bulan", "per hari dalam minggu"],
    map_heading: "Peta Persebaran Kejahatan",
    count: "Jumlah",
    incidents_axis: "Banyaknya Kejadian",
    crimes_axis: "Banyaknya Kejadian Kriminal",
    total_crimes: "Total Kejahatan",
    no_data: "Tidak ada data",
    loading: "Memuat data...",
    export_button: "Ekspor PNG",
    footer: "Sumber data: Toronto Police Service, Major Crime Indicators",
    category: "Kategori",
    premises: "Jenis Tempat Kejadian",
    year: "Tahun",
    date: "Tanggal",
    month: "Bulan",
    weekday: "Hari",
    hour: "Jam",
    neighbourhood: "Lingkungan",
};

const ENGLISH: Captions = Captions {
    title: "Crimes in Toronto",
    subtitle: "Charts built from the Crimes in Toronto dataset on Kaggle.",
    category_heading: "Crime Categories",
    premises_heading: "Crime Locations",
    time_heading: "Time of Occurrence",
    tab_year_hour: "Yearly & Hourly",
    tab_day_month: "Daily & Monthly",
    breakdown_prompt: "Choose a time view:",
    breakdown_options: ["by date", "by month", "by day of week"],
    map_heading: "Crime Distribution Map",
    count: "Count",
    incidents_axis: "Number of incidents",
    crimes_axis: "Number of crimes",
    total_crimes: "Total crimes",
    no_data: "No data",
    loading: "Loading data...",
    export_button: "Export PNG",
    footer: "Data: Toronto Police Service, Major Crime Indicators",
    category: "Category",
    premises: "Premises type",
    year: "Year",
    date: "Date",
    month: "Month",
    weekday: "Day",
    hour: "Hour",
    neighbourhood: "Neighbourhood",
};

impl Captions {
    pub fn for_locale(locale: Locale) -> &'static Captions {
        match locale {
            Locale::Indonesian => &INDONESIAN,
            Locale::English => &ENGLISH,
        }
    }

    /// Name of the value a dimension groups by, used on axes and in hovers.
    pub fn dimension(&self, dimension: Dimension) -> &'static str {
        match dimension {
            Dimension::Category => self.category,
            Dimension::PremisesType => self.premises,
            Dimension::Year => self.year,
            Dimension::DayOfMonth => self.date,
            Dimension::Month => self.month,
            Dimension::DayOfWeek => self.weekday,
            Dimension::Hour => self.hour,
            Dimension::Neighbourhood => self.neighbourhood,
        }
    }

    pub fn breakdown(&self, breakdown: TimeBreakdown) -> &'static str {
        match breakdown {
            TimeBreakdown::ByDate => self.breakdown_options[0],
            TimeBreakdown::ByMonth => self.breakdown_options[1],
            TimeBreakdown::ByWeekday => self.breakdown_options[2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indonesian_is_the_default_dashboard_language() {
        let captions = Captions::for_locale(Locale::default());
        assert_eq!(captions.title, "Kejahatan di Toronto");
        assert_eq!(captions.breakdown(TimeBreakdown::ByWeekday), "per hari dalam minggu");
        assert_eq!(captions.dimension(Dimension::DayOfMonth), "Tanggal");
    }

    #[test]
    fn every_dimension_has_a_name_in_both_locales() {
        for locale in [Locale::Indonesian, Locale::English] {
            let captions = Captions::for_locale(locale);
            for dim in Dimension::ALL {
                assert!(!captions.dimension(dim).is_empty());
            }
        }
    }
}
