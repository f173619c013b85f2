//! Scalar file parser
//!
//! Accepted result lines:
//! - `scalar <module> <name> <value>`
//! - `module <module>` then `scalar <name> <value>`
//! - `statistic <module> <name>` then `field <field> <value>`, recorded as
//!   the metric `<name>.<field>`

use crate::error::SkipReason;
use crate::model::ScalarRecord;

use super::{LineOutcome, LineParser, classify_header, parse_finite, tokenize};

#[derive(Debug, Default)]
pub struct ScalarParser {
    module: Option<String>,
    statistic: Option<(String, String)>,
    in_results: bool,
}

impl ScalarParser {
    pub fn new() -> Self {
        Self::default()
    }

    fn scalar(&mut self, module: Option<&str>, name: &str, value: &str) -> LineOutcome<ScalarRecord> {
        self.statistic = None;
        let Some(module) = module.or(self.module.as_deref()) else {
            return LineOutcome::Skipped(SkipReason::MissingContext);
        };
        let Some(value) = parse_finite(value) else {
            return LineOutcome::Skipped(SkipReason::InvalidNumber);
        };
        LineOutcome::Record(ScalarRecord {
            entity_path: module.to_string(),
            metric_name: name.to_string(),
            value,
        })
    }

    fn field(&self, field: &str, value: &str) -> LineOutcome<ScalarRecord> {
        let Some((module, statistic)) = &self.statistic else {
            return LineOutcome::Skipped(SkipReason::MissingContext);
        };
        let Some(value) = parse_finite(value) else {
            return LineOutcome::Skipped(SkipReason::InvalidNumber);
        };
        LineOutcome::Record(ScalarRecord {
            entity_path: module.clone(),
            metric_name: format!("{statistic}.{field}"),
            value,
        })
    }
}

impl LineParser for ScalarParser {
    type Record = ScalarRecord;

    fn parse_line(&mut self, line: &str) -> LineOutcome<ScalarRecord> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return LineOutcome::Ignored;
        }

        let tokens = tokenize(line);
        if let Some(header) = classify_header(&tokens, self.in_results) {
            return header;
        }

        match tokens.as_slice() {
            ["scalar", module, name, value] => {
                self.in_results = true;
                self.scalar(Some(*module), name, value)
            }
            ["scalar", name, value] => {
                self.in_results = true;
                self.scalar(None, name, value)
            }
            ["scalar", ..] => LineOutcome::Skipped(SkipReason::TokenCount),
            ["module", module] => {
                self.module = Some((*module).to_string());
                self.statistic = None;
                LineOutcome::Ignored
            }
            ["statistic" | "histogram", module, name] => {
                self.in_results = true;
                self.statistic = Some(((*module).to_string(), (*name).to_string()));
                LineOutcome::Ignored
            }
            ["field", field, value] => self.field(field, value),
            ["bin", ..] => LineOutcome::Ignored,
            ["module" | "statistic" | "histogram" | "field", ..] => {
                LineOutcome::Skipped(SkipReason::TokenCount)
            }
            _ => LineOutcome::Skipped(SkipReason::UnrecognizedLine),
        }
    }
}
