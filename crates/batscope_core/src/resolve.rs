//! Key resolver
//!
//! Maps raw module paths and metric names onto logical groupings.
//!
//! Metric kind: case-insensitive substring match of the metric name against
//! an ordered pattern list, first match wins.
//!
//! Entity key: the first index-bearing segment of the module path.
//!
//! ```text
//! path    := segment ("." segment)*
//! segment := name | name "[" digits "]"
//! ```
//!
//! `BatSwarmNetwork.uav[3].batAlgorithm` resolves to `EntityKey::Indexed(3)`;
//! a path without an indexed segment resolves to `EntityKey::CatchAll`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{EntityKey, MetricKind, TimeSeries};

/// One entry of the metric-kind priority list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricPattern {
    pub kind: MetricKind,
    /// Substring looked for in the metric name, compared case-insensitively
    pub pattern: String,
}

impl MetricPattern {
    pub fn new(kind: MetricKind, pattern: impl Into<String>) -> Self {
        Self {
            kind,
            pattern: pattern.into(),
        }
    }

    /// Fitness, Loudness, PulseRate, ObstaclesAvoided
    pub fn defaults() -> Vec<MetricPattern> {
        MetricKind::ALL
            .iter()
            .map(|kind| MetricPattern::new(*kind, kind.default_pattern()))
            .collect()
    }
}

/// Result of resolving one entity/metric pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolvedKey {
    pub kind: MetricKind,
    pub entity: EntityKey,
}

/// A series tagged with the entity it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMember {
    pub key: EntityKey,
    pub series: TimeSeries,
}

/// All series of one metric kind, ordered by entity key
///
/// Never empty: [`LogicalGroup::new`] refuses to build a group without
/// members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicalGroup {
    kind: MetricKind,
    members: Vec<GroupMember>,
}

impl LogicalGroup {
    pub fn new(kind: MetricKind, mut members: Vec<GroupMember>) -> Option<Self> {
        if members.is_empty() {
            return None;
        }
        members.sort_by(|a, b| {
            a.key
                .cmp(&b.key)
                .then_with(|| a.series.entity_path.cmp(&b.series.entity_path))
                .then_with(|| a.series.metric_name.cmp(&b.series.metric_name))
        });
        Some(Self { kind, members })
    }

    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    pub fn members(&self) -> &[GroupMember] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn series(&self) -> impl Iterator<Item = &TimeSeries> {
        self.members.iter().map(|m| &m.series)
    }

    /// Number of distinct entity keys among the members
    pub fn entity_count(&self) -> usize {
        // members are sorted by key
        let mut keys: Vec<_> = self.members.iter().map(|m| m.key).collect();
        keys.dedup();
        keys.len()
    }
}

#[derive(Debug, Clone)]
pub struct KeyResolver {
    patterns: Vec<(MetricKind, String)>,
}

impl Default for KeyResolver {
    fn default() -> Self {
        Self::new(&MetricPattern::defaults())
    }
}

impl KeyResolver {
    pub fn new(patterns: &[MetricPattern]) -> Self {
        Self {
            patterns: patterns
                .iter()
                .filter(|p| !p.pattern.is_empty())
                .map(|p| (p.kind, p.pattern.to_lowercase()))
                .collect(),
        }
    }

    /// Metric kind of `metric_name`, first matching pattern wins
    pub fn metric_kind(&self, metric_name: &str) -> Option<MetricKind> {
        let name = metric_name.to_lowercase();
        self.patterns
            .iter()
            .find(|(_, pattern)| name.contains(pattern.as_str()))
            .map(|(kind, _)| *kind)
    }

    pub fn resolve(&self, entity_path: &str, metric_name: &str) -> Option<ResolvedKey> {
        Some(ResolvedKey {
            kind: self.metric_kind(metric_name)?,
            entity: entity_key(entity_path),
        })
    }

    /// Partition series into logical groups by metric kind.
    ///
    /// Series whose metric name matches no pattern are left out. Groups are
    /// returned in `MetricKind` order and only for kinds with members.
    pub fn group_series(&self, series: impl IntoIterator<Item = TimeSeries>) -> Vec<LogicalGroup> {
        let mut buckets: BTreeMap<MetricKind, Vec<GroupMember>> = BTreeMap::new();
        let mut unmatched = 0usize;

        for series in series {
            match self.resolve(&series.entity_path, &series.metric_name) {
                Some(key) => buckets.entry(key.kind).or_default().push(GroupMember {
                    key: key.entity,
                    series,
                }),
                None => unmatched += 1,
            }
        }

        if unmatched > 0 {
            tracing::debug!("{unmatched} series matched no metric kind");
        }

        buckets
            .into_iter()
            .filter_map(|(kind, members)| LogicalGroup::new(kind, members))
            .collect()
    }
}

/// Name and index of the first `name[digits]` segment of a module path
pub fn index_segment(path: &str) -> Option<(&str, u32)> {
    path.split('.').find_map(parse_indexed_segment)
}

fn parse_indexed_segment(segment: &str) -> Option<(&str, u32)> {
    let inner = segment.strip_suffix(']')?;
    let (name, digits) = inner.split_once('[')?;
    if name.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((name, digits.parse().ok()?))
}

/// Logical entity identity of a module path
pub fn entity_key(path: &str) -> EntityKey {
    match index_segment(path) {
        Some((_, index)) => EntityKey::Indexed(index),
        None => EntityKey::CatchAll,
    }
}

/// Top-level network name of a module path (`BatSwarmNetwork.uav[0]...`)
pub fn network_name(path: &str) -> Option<&str> {
    let first = path.split('.').next()?;
    (!first.is_empty()).then_some(first)
}

/// Number of distinct indexed entities among `paths`
pub fn count_indexed_entities<'a>(paths: impl IntoIterator<Item = &'a str>) -> usize {
    let mut indices: Vec<u32> = paths
        .into_iter()
        .filter_map(|p| index_segment(p).map(|(_, i)| i))
        .collect();
    indices.sort_unstable();
    indices.dedup();
    indices.len()
}
