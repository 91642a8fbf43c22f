//! Per-user learning progress models

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where the user last was in the curriculum
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LastViewed {
    pub semester: String,
    pub level: String,
    /// Which view was open: "concept" or "implementation"
    #[serde(rename = "type")]
    pub screen: String,
}

/// One user's progress record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProgress {
    #[serde(default)]
    pub last_viewed: Option<LastViewed>,
    /// Unit ids the user has opened, in first-visit order
    #[serde(default)]
    pub visited_levels: Vec<String>,
    /// Unit ids with a successful upload, in first-completion order
    #[serde(default)]
    pub completed_levels: Vec<String>,
}

/// All progress records, keyed by user identifier (email)
pub type ProgressBook = BTreeMap<String, UserProgress>;
