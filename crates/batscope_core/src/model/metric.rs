use serde::{Deserialize, Serialize};

/// Measurement category a series or scalar belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MetricKind {
    /// Distance to target plus obstacle penalty (lower is better)
    Fitness,
    Loudness,
    PulseRate,
    ObstaclesAvoided,
}

impl MetricKind {
    pub const ALL: [MetricKind; 4] = [
        MetricKind::Fitness,
        MetricKind::Loudness,
        MetricKind::PulseRate,
        MetricKind::ObstaclesAvoided,
    ];

    /// Get a display label for the metric kind
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Fitness => "Fitness",
            Self::Loudness => "Loudness",
            Self::PulseRate => "Pulse Rate",
            Self::ObstaclesAvoided => "Obstacles Avoided",
        }
    }

    /// Lowercase substring matched against metric names by default
    #[must_use]
    pub fn default_pattern(&self) -> &'static str {
        match self {
            Self::Fitness => "fitness",
            Self::Loudness => "loudness",
            Self::PulseRate => "pulserate",
            Self::ObstaclesAvoided => "obstaclesavoided",
        }
    }
}
