//! Vector file parser
//!
//! A `vector <id> <module> <name> [<columns>]` line declares a series. Bare
//! lines starting with an id are samples laid out per the declared columns
//! (`<id> <time> <value>` unless stated otherwise).

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::SkipReason;
use crate::model::{ColumnLayout, VectorDeclaration, VectorId, VectorRecord, VectorSample};

use super::{LineOutcome, LineParser, classify_header, parse_finite, tokenize};

/// File-wide parsing options for vector files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorParseOptions {
    /// Accept `<id> <value>` sample lines for time/value vectors, using the
    /// per-vector sample counter (0, 1, 2, ...) as the time.
    #[serde(default)]
    pub implicit_time: bool,
}

#[derive(Debug, Default)]
pub struct VectorParser {
    options: VectorParseOptions,
    layouts: FxHashMap<VectorId, ColumnLayout>,
    counters: FxHashMap<VectorId, u64>,
    in_results: bool,
}

impl VectorParser {
    pub fn new(options: VectorParseOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    fn declaration(
        &mut self,
        id: &str,
        module: &str,
        name: &str,
        columns: Option<&str>,
    ) -> LineOutcome<VectorRecord> {
        let Ok(id) = id.parse().map(VectorId) else {
            return LineOutcome::Skipped(SkipReason::InvalidNumber);
        };
        let columns = match columns {
            Some(spec) => match ColumnLayout::parse(spec) {
                Some(layout) => layout,
                None => return LineOutcome::Skipped(SkipReason::InvalidColumns),
            },
            None => ColumnLayout::default(),
        };

        self.in_results = true;
        self.layouts.insert(id, columns);
        self.counters.insert(id, 0);

        LineOutcome::Record(VectorRecord::Declaration(VectorDeclaration {
            vector_id: id,
            entity_path: module.to_string(),
            metric_name: name.to_string(),
            columns,
        }))
    }

    fn sample(&mut self, tokens: &[&str]) -> LineOutcome<VectorRecord> {
        let Some((id, fields)) = tokens.split_first() else {
            return LineOutcome::Skipped(SkipReason::TokenCount);
        };
        let Ok(id) = id.parse().map(VectorId) else {
            return LineOutcome::Skipped(SkipReason::InvalidNumber);
        };

        let layout = self.layouts.get(&id).copied().unwrap_or_default();
        let (time_column, value_column) = if fields.len() == layout.width() {
            (layout.time_column(), layout.value_column())
        } else if self.options.implicit_time && fields.len() == 1 {
            (None, 0)
        } else {
            return LineOutcome::Skipped(SkipReason::TokenCount);
        };

        let Some(value) = parse_finite(fields[value_column]) else {
            return LineOutcome::Skipped(SkipReason::InvalidNumber);
        };
        let counter = self.counters.entry(id).or_insert(0);
        let time = match time_column {
            Some(column) => match parse_finite(fields[column]) {
                Some(time) => time,
                None => return LineOutcome::Skipped(SkipReason::InvalidNumber),
            },
            None => *counter as f64,
        };
        *counter += 1;

        LineOutcome::Record(VectorRecord::Sample(VectorSample {
            vector_id: id,
            time,
            value,
        }))
    }
}

impl LineParser for VectorParser {
    type Record = VectorRecord;

    fn parse_line(&mut self, line: &str) -> LineOutcome<VectorRecord> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return LineOutcome::Ignored;
        }

        let tokens = tokenize(line);
        if let Some(header) = classify_header(&tokens, self.in_results) {
            return header;
        }

        match tokens.as_slice() {
            ["vector", id, module, name] => self.declaration(id, module, name, None),
            ["vector", id, module, name, columns] => {
                self.declaration(id, module, name, Some(*columns))
            }
            ["vector", ..] => LineOutcome::Skipped(SkipReason::TokenCount),
            [first, ..] if first.starts_with(|c: char| c.is_ascii_digit()) => {
                self.sample(&tokens)
            }
            _ => LineOutcome::Skipped(SkipReason::UnrecognizedLine),
        }
    }
}
