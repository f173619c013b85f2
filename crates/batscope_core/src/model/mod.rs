mod ids;
mod metadata;
mod metric;
mod records;
mod series;
mod warnings;

pub use ids::{EntityKey, VectorId};
pub use metadata::{DATETIME_FORMAT, RunMetadata};
pub use metric::MetricKind;
pub use records::{ColumnLayout, ScalarRecord, VectorDeclaration, VectorRecord, VectorSample};
pub use series::{Sample, TimeSeries};
pub use warnings::DataWarning;
