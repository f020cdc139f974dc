use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named self-assembly classification rules.
///
/// All of them are the orientation-balanced cluster rule; they differ only in
/// the fraction of an orientation's cells the largest cluster has to hold.
#[derive(Deserialize, Serialize, Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum CheckStrategy {
    #[default]
    #[serde(rename = "clusters")]
    Clusters,
    #[serde(rename = "clusters-90")]
    Clusters90,
    #[serde(rename = "clusters-95")]
    Clusters95,
    #[serde(rename = "clusters-99")]
    Clusters99,
}

impl CheckStrategy {
    pub const ALL: [CheckStrategy; 4] = [
        CheckStrategy::Clusters,
        CheckStrategy::Clusters90,
        CheckStrategy::Clusters95,
        CheckStrategy::Clusters99,
    ];

    /// Minimum largest-cluster fraction required for both orientations.
    pub fn threshold(self) -> f64 {
        match self {
            CheckStrategy::Clusters => 0.5,
            CheckStrategy::Clusters90 => 0.9,
            CheckStrategy::Clusters95 => 0.95,
            CheckStrategy::Clusters99 => 0.99,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CheckStrategy::Clusters => "clusters",
            CheckStrategy::Clusters90 => "clusters-90",
            CheckStrategy::Clusters95 => "clusters-95",
            CheckStrategy::Clusters99 => "clusters-99",
        }
    }
}

impl fmt::Display for CheckStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CheckStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CheckStrategy::ALL
            .into_iter()
            .find(|strategy| strategy.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "unknown self-assembly check strategy '{}' (expected one of: clusters, clusters-90, clusters-95, clusters-99)",
                    s
                )
            })
    }
}
