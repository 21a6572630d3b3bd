//! Dimension table: one row of grouping policy per chart dimension.

use crate::aggregate::locale::Calendar;
use crate::data::schema;

/// A column incidents can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Category,
    PremisesType,
    Year,
    DayOfMonth,
    Month,
    DayOfWeek,
    Hour,
    Neighbourhood,
}

/// How a raw cell becomes a group key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyNormalizer {
    /// Value as stored.
    Raw,
    /// Integral numbers collapse (`"2019.0"` == `"2019"`).
    Numeric,
    /// English calendar name, translated to the target locale.
    Calendar(Calendar),
}

/// Order of the resulting buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderPolicy {
    /// Largest count first, ties by label.
    CountDescending,
    /// Numeric keys ascending, non-numeric leftovers after them.
    KeyAscending,
    /// Every label of the calendar in order, absent ones counted as zero.
    Canonical(Calendar),
}

/// Post-processing applied to the ordered buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rebin {
    None,
    /// Fold buckets below the "Others" threshold into one trailing bucket.
    FoldMinor,
    /// Repeat the first bucket at the end to close a radial line.
    CloseLoop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionSpec {
    pub column: &'static str,
    pub key: KeyNormalizer,
    pub order: OrderPolicy,
    pub rebin: Rebin,
    /// Attach a count rank to every bucket for shading.
    pub ranked: bool,
}

impl Dimension {
    pub const ALL: [Dimension; 8] = [
        Dimension::Category,
        Dimension::PremisesType,
        Dimension::Year,
        Dimension::DayOfMonth,
        Dimension::Month,
        Dimension::DayOfWeek,
        Dimension::Hour,
        Dimension::Neighbourhood,
    ];

    pub fn spec(self) -> DimensionSpec {
        use KeyNormalizer as K;
        use OrderPolicy as O;

        let (column, key, order, rebin, ranked) = match self {
            Dimension::Category => (schema::MCI_CATEGORY, K::Raw, O::CountDescending, Rebin::None, false),
            Dimension::PremisesType => (schema::PREMISES_TYPE, K::Raw, O::CountDescending, Rebin::None, false),
            Dimension::Year => (schema::OCC_YEAR, K::Numeric, O::KeyAscending, Rebin::FoldMinor, true),
            Dimension::DayOfMonth => (schema::OCC_DAY, K::Numeric, O::KeyAscending, Rebin::None, false),
            Dimension::Month => (
                schema::OCC_MONTH,
                K::Calendar(Calendar::Month),
                O::Canonical(Calendar::Month),
                Rebin::None,
                false,
            ),
            Dimension::DayOfWeek => (
                schema::OCC_DOW,
                K::Calendar(Calendar::Weekday),
                O::Canonical(Calendar::Weekday),
                Rebin::None,
                false,
            ),
            Dimension::Hour => (schema::OCC_HOUR, K::Numeric, O::KeyAscending, Rebin::CloseLoop, false),
            Dimension::Neighbourhood => (schema::HOOD_140, K::Numeric, O::KeyAscending, Rebin::None, false),
        };

        DimensionSpec {
            column,
            key,
            order,
            rebin,
            ranked,
        }
    }

    /// Short identifier, used for file names.
    pub fn slug(self) -> &'static str {
        match self {
            Dimension::Category => "category",
            Dimension::PremisesType => "premises_type",
            Dimension::Year => "year",
            Dimension::DayOfMonth => "day_of_month",
            Dimension::Month => "month",
            Dimension::DayOfWeek => "day_of_week",
            Dimension::Hour => "hour",
            Dimension::Neighbourhood => "neighbourhood",
        }
    }
}

/// The three views offered by the time breakdown selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeBreakdown {
    #[default]
    ByDate,
    ByMonth,
    ByWeekday,
}

impl TimeBreakdown {
    pub const ALL: [TimeBreakdown; 3] = [
        TimeBreakdown::ByDate,
        TimeBreakdown::ByMonth,
        TimeBreakdown::ByWeekday,
    ];

    pub fn dimension(self) -> Dimension {
        match self {
            TimeBreakdown::ByDate => Dimension::DayOfMonth,
            TimeBreakdown::ByMonth => Dimension::Month,
            TimeBreakdown::ByWeekday => Dimension::DayOfWeek,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_dimension_reads_a_distinct_column() {
        let mut columns: Vec<_> = Dimension::ALL.iter().map(|d| d.spec().column).collect();
        columns.sort_unstable();
        columns.dedup();
        assert_eq!(columns.len(), Dimension::ALL.len());
    }

    #[test]
    fn only_year_is_ranked_and_folded() {
        for dim in Dimension::ALL {
            let spec = dim.spec();
            assert_eq!(spec.ranked, dim == Dimension::Year);
            assert_eq!(spec.rebin == Rebin::FoldMinor, dim == Dimension::Year);
        }
    }

    #[test]
    fn time_breakdown_covers_calendar_views() {
        let dims: Vec<_> = TimeBreakdown::ALL.iter().map(|t| t.dimension()).collect();
        assert_eq!(
            dims,
            vec![Dimension::DayOfMonth, Dimension::Month, Dimension::DayOfWeek]
        );
    }
}
