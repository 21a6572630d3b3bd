pub mod calculator;
pub mod dimension;
pub mod locale;
pub mod spatial;

pub use calculator::{AggregateBucket, AggregateError, AggregationPolicy, Aggregator, OTHERS_LABEL};
pub use dimension::{Dimension, TimeBreakdown};
pub use locale::{Calendar, Locale};
pub use spatial::{RegionCount, SpatialJoin};
