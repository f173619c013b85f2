use std::fmt;

use serde::{Deserialize, Serialize};

use super::VectorId;

/// Non-fatal data-quality findings attached to an analysis result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataWarning {
    /// The last vector sample and the recorded end-of-run scalar disagree
    FinalValueMismatch {
        entity_path: String,
        vector_value: f64,
        scalar_value: f64,
    },
    /// A vector id was declared more than once; the later declaration won
    Redeclared { vector_id: VectorId },
    /// Samples were found for vector ids that were never declared
    UndeclaredSamples { count: usize },
}

impl fmt::Display for DataWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataWarning::FinalValueMismatch {
                entity_path,
                vector_value,
                scalar_value,
            } => write!(
                f,
                "{entity_path}: last vector sample {vector_value} differs from scalar {scalar_value}"
            ),
            DataWarning::Redeclared { vector_id } => {
                write!(f, "vector {vector_id} declared more than once, earlier samples dropped")
            }
            DataWarning::UndeclaredSamples { count } => {
                write!(f, "{count} samples referenced undeclared vectors")
            }
        }
    }
}
