// Classifier - coarse signal character of a feature vector
//
// Decision table, evaluated in order:
// 1. IF periodicity >= T_TONAL_PERIODICITY AND zcr <= T_TONAL_ZCR THEN Tonal
// 2. ELSE IF zcr >= T_NOISY_ZCR THEN Noisy
// 3. ELSE Mixed

use serde::{Deserialize, Serialize};

use crate::analysis::features::BlockFeatures;
use crate::config::ClassifierConfig;

/// Coarse character of a block or window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalClass {
    /// Strongly periodic, few zero crossings
    Tonal,
    /// Dense zero crossings
    Noisy,
    /// Neither; matches any class when comparing
    Mixed,
}

impl SignalClass {
    /// Two classes agree when equal or when either is `Mixed`
    pub fn agrees_with(self, other: SignalClass) -> bool {
        self == other || self == SignalClass::Mixed || other == SignalClass::Mixed
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SignalClass::Tonal => "tonal",
            SignalClass::Noisy => "noisy",
            SignalClass::Mixed => "mixed",
        }
    }
}

/// Classifier applies the decision table with configured thresholds
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    config: ClassifierConfig,
}

impl Classifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn classify(&self, features: &BlockFeatures) -> SignalClass {
        if features.periodicity >= self.config.tonal_min_periodicity
            && features.zcr <= self.config.tonal_max_zcr
        {
            SignalClass::Tonal
        } else if features.zcr >= self.config.noisy_min_zcr {
            SignalClass::Noisy
        } else {
            SignalClass::Mixed
        }
    }
}

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod tests;
