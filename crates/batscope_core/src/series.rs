//! Series builder
//!
//! Folds the parser's record stream of one file into per-entity structures:
//! a [`VectorSeriesSet`] for vector files and a [`ScalarTable`] for scalar
//! files. Both are rebuilt wholesale when a file is re-parsed.

use rustc_hash::FxHashMap;

use crate::model::{DataWarning, Sample, ScalarRecord, TimeSeries, VectorId, VectorRecord};

/// Time series of one vector file, keyed by vector id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VectorSeriesSet {
    series: FxHashMap<VectorId, TimeSeries>,
    /// Samples dropped because their id was never declared
    pub undeclared_samples: usize,
    /// Ids declared more than once, in the order the repeats were seen
    pub redeclared: Vec<VectorId>,
}

impl VectorSeriesSet {
    /// Assemble series from an ordered record stream.
    ///
    /// A repeated declaration replaces the earlier one and restarts its
    /// series empty (last write wins).
    pub fn build(records: impl IntoIterator<Item = VectorRecord>) -> Self {
        let mut set = Self::default();

        for record in records {
            match record {
                VectorRecord::Declaration(decl) => {
                    let series = TimeSeries::new(decl.entity_path, decl.metric_name);
                    if set.series.insert(decl.vector_id, series).is_some() {
                        tracing::warn!(
                            "vector {} redeclared, discarding its earlier samples",
                            decl.vector_id
                        );
                        set.redeclared.push(decl.vector_id);
                    }
                }
                VectorRecord::Sample(sample) => match set.series.get_mut(&sample.vector_id) {
                    Some(series) => series.samples.push(Sample {
                        time: sample.time,
                        value: sample.value,
                    }),
                    None => set.undeclared_samples += 1,
                },
            }
        }

        if set.undeclared_samples > 0 {
            tracing::debug!(
                "dropped {} samples of undeclared vectors",
                set.undeclared_samples
            );
        }
        set
    }

    pub fn get(&self, id: VectorId) -> Option<&TimeSeries> {
        self.series.get(&id)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Iterate in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (VectorId, &TimeSeries)> {
        self.series.iter().map(|(id, series)| (*id, series))
    }

    /// All series ordered by vector id
    pub fn sorted(&self) -> Vec<(VectorId, &TimeSeries)> {
        let mut out: Vec<_> = self.iter().collect();
        out.sort_by_key(|(id, _)| *id);
        out
    }

    pub fn into_sorted(self) -> Vec<(VectorId, TimeSeries)> {
        let mut out: Vec<_> = self.series.into_iter().collect();
        out.sort_by_key(|(id, _)| *id);
        out
    }

    /// Data-quality findings collected while building
    pub fn warnings(&self) -> Vec<DataWarning> {
        let mut warnings: Vec<_> = self
            .redeclared
            .iter()
            .map(|&vector_id| DataWarning::Redeclared { vector_id })
            .collect();
        if self.undeclared_samples > 0 {
            warnings.push(DataWarning::UndeclaredSamples {
                count: self.undeclared_samples,
            });
        }
        warnings
    }
}

/// Scalar values of one file, addressable by entity path and metric name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScalarTable {
    records: Vec<ScalarRecord>,
    index: FxHashMap<String, FxHashMap<String, usize>>,
    /// Entity/metric pairs that appeared more than once (last value kept)
    pub duplicates: usize,
}

impl ScalarTable {
    pub fn build(records: impl IntoIterator<Item = ScalarRecord>) -> Self {
        let mut table = Self::default();

        for record in records {
            let metrics = table.index.entry(record.entity_path.clone()).or_default();
            match metrics.get(&record.metric_name) {
                Some(&slot) => {
                    tracing::debug!(
                        "duplicate scalar {} {}, keeping the later value",
                        record.entity_path,
                        record.metric_name
                    );
                    table.records[slot].value = record.value;
                    table.duplicates += 1;
                }
                None => {
                    metrics.insert(record.metric_name.clone(), table.records.len());
                    table.records.push(record);
                }
            }
        }

        table
    }

    pub fn get(&self, entity_path: &str, metric_name: &str) -> Option<f64> {
        let slot = *self.index.get(entity_path)?.get(metric_name)?;
        Some(self.records[slot].value)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in first-encounter order
    pub fn iter(&self) -> impl Iterator<Item = &ScalarRecord> {
        self.records.iter()
    }

    /// Records whose metric name equals `metric_name` exactly
    pub fn with_metric<'a>(&'a self, metric_name: &'a str) -> impl Iterator<Item = &'a ScalarRecord> {
        self.records
            .iter()
            .filter(move |r| r.metric_name == metric_name)
    }

    /// Value of the first metric in `names` recorded for `entity_path`
    pub fn first_of(&self, entity_path: &str, names: &[String]) -> Option<f64> {
        names.iter().find_map(|name| self.get(entity_path, name))
    }

    pub fn entity_count(&self) -> usize {
        self.index.len()
    }
}
