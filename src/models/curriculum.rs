//! Curriculum data models
//!
//! The curriculum is a tree of semesters, each holding ordered levels. A
//! level carries concept material (read) and an implementation unit (edit,
//! build, upload). A unit id is `"<semester>/<level>"`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The full curriculum tree, keyed by semester name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Curriculum {
    #[serde(flatten)]
    pub semesters: BTreeMap<String, Semester>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Semester {
    #[serde(default)]
    pub levels: BTreeMap<String, Level>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Level {
    #[serde(default)]
    pub concept: Concept,
    #[serde(default)]
    pub implementation: ImplementationUnit,
}

/// Concept material for a level: an explanation, example code, and the
/// expected output of that example
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Concept {
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub output: String,
}

/// The editable firmware sketch of a level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImplementationUnit {
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub code: String,
}

impl Curriculum {
    /// All unit ids in curriculum order (semesters and levels sorted by name)
    pub fn unit_ids(&self) -> Vec<String> {
        let mut ids = Vec::new();
        for (semester, data) in &self.semesters {
            for level in data.levels.keys() {
                ids.push(unit_id(semester, level));
            }
        }
        ids
    }

    pub fn level(&self, semester: &str, level: &str) -> Option<&Level> {
        self.semesters.get(semester)?.levels.get(level)
    }

    pub fn level_mut(&mut self, semester: &str, level: &str) -> Option<&mut Level> {
        self.semesters.get_mut(semester)?.levels.get_mut(level)
    }
}

/// Build the canonical `"<semester>/<level>"` unit identifier
pub fn unit_id(semester: &str, level: &str) -> String {
    format!("{}/{}", semester, level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_ids_are_ordered_by_semester_then_level() {
        let json = r#"{
            "Semester 2": {"levels": {"Level 1": {}}},
            "Semester 1": {"levels": {"Level 2": {}, "Level 1": {}}}
        }"#;
        let curriculum: Curriculum = serde_json::from_str(json).unwrap();
        assert_eq!(
            curriculum.unit_ids(),
            vec![
                "Semester 1/Level 1",
                "Semester 1/Level 2",
                "Semester 2/Level 1"
            ]
        );
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let json = r#"{"Semester 1": {"levels": {"Level 1": {}}}}"#;
        let curriculum: Curriculum = serde_json::from_str(json).unwrap();
        let level = curriculum.level("Semester 1", "Level 1").unwrap();
        assert!(level.concept.explanation.is_empty());
        assert!(level.implementation.code.is_empty());
    }
}
