use serde::{Deserialize, Serialize};

/// One `(time, value)` observation of a vector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub time: f64,
    pub value: f64,
}

/// Samples of one entity/metric pair in file encounter order
///
/// Built once by the series builder and never mutated afterwards. Re-parsing
/// a file produces a fresh series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub entity_path: String,
    pub metric_name: String,
    pub samples: Vec<Sample>,
}

impl TimeSeries {
    pub fn new(entity_path: impl Into<String>, metric_name: impl Into<String>) -> Self {
        Self {
            entity_path: entity_path.into(),
            metric_name: metric_name.into(),
            samples: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Value of the first recorded sample
    pub fn initial_value(&self) -> Option<f64> {
        self.samples.first().map(|s| s.value)
    }

    /// Value of the last recorded sample
    pub fn final_value(&self) -> Option<f64> {
        self.samples.last().map(|s| s.value)
    }

    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.time)
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.value)
    }
}
