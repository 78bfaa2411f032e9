use serde::{Deserialize, Serialize};

/// Why an application is being serialised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SerialiseApplicationObjective {
    /// Manual export to a file.
    Share,
    /// Git sync: commits, pulls and branch checkouts.
    VersionControl,
    /// Duplicating or forking into another workspace.
    Duplication,
}
