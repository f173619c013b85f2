//! Typed records emitted by the line parsers

use serde::{Deserialize, Serialize};

use super::VectorId;

/// One final value recorded for an entity/metric pair in a scalar file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarRecord {
    pub entity_path: String,
    pub metric_name: String,
    pub value: f64,
}

/// Column order of the sample lines belonging to one vector
///
/// Positions are counted after the leading vector id. The simulator writes
/// this as the optional fifth token of a declaration, e.g. `TV` or `ETV`
/// (E = event number, T = time, V = value).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLayout {
    time: Option<usize>,
    value: usize,
    width: usize,
}

impl ColumnLayout {
    /// `<id> <time> <value>`
    pub const TIME_VALUE: Self = Self {
        time: Some(0),
        value: 1,
        width: 2,
    };

    /// `<id> <event> <time> <value>`
    pub const EVENT_TIME_VALUE: Self = Self {
        time: Some(1),
        value: 2,
        width: 3,
    };

    /// `<id> <value>`, time comes from the implicit per-vector counter
    pub const VALUE_ONLY: Self = Self {
        time: None,
        value: 0,
        width: 1,
    };

    /// Parse a column spec such as `ETV`.
    ///
    /// Returns `None` for unknown letters, repeated columns or a spec
    /// without a value column.
    pub fn parse(spec: &str) -> Option<Self> {
        let mut time = None;
        let mut value = None;
        let mut event = false;

        for (i, c) in spec.chars().enumerate() {
            match c.to_ascii_uppercase() {
                'E' if !event => event = true,
                'T' if time.is_none() => time = Some(i),
                'V' if value.is_none() => value = Some(i),
                _ => return None,
            }
        }

        Some(Self {
            time,
            value: value?,
            width: spec.chars().count(),
        })
    }

    /// Column of the sample time, if the layout has one
    pub fn time_column(&self) -> Option<usize> {
        self.time
    }

    pub fn value_column(&self) -> usize {
        self.value
    }

    /// Number of tokens after the vector id
    pub fn width(&self) -> usize {
        self.width
    }
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self::TIME_VALUE
    }
}

/// Declares that later samples tagged `vector_id` belong to an entity/metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorDeclaration {
    pub vector_id: VectorId,
    pub entity_path: String,
    pub metric_name: String,
    #[serde(default)]
    pub columns: ColumnLayout,
}

/// One sample line of a vector file
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VectorSample {
    pub vector_id: VectorId,
    pub time: f64,
    pub value: f64,
}

/// Record stream item produced by the vector parser
#[derive(Debug, Clone, PartialEq)]
pub enum VectorRecord {
    Declaration(VectorDeclaration),
    Sample(VectorSample),
}
