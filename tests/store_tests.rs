//! Integration tests for the content, progress, and session stores

use robobench::models::{Curriculum, LastViewed};
use robobench::store::content::ContentStore;
use robobench::store::{JsonContentStore, JsonProgressStore, MemorySessionStore, SessionStore};
use std::time::Duration;
use tempfile::TempDir;

const SAMPLE_CURRICULUM: &str = r#"{
    "Semester 1": {
        "levels": {
            "Level 1": {
                "concept": {"explanation": "Blinking an LED", "code": "digitalWrite(2, HIGH);", "output": "LED on"},
                "implementation": {"explanation": "Make it blink", "code": "void setup() {}"}
            },
            "Level 2": {}
        }
    }
}"#;

mod content_store_tests {
    use super::*;

    #[test]
    fn save_and_load_round_trip() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let store = JsonContentStore::new(dir.path().join("data").join("learning_data.json"));

        let curriculum: Curriculum = serde_json::from_str(SAMPLE_CURRICULUM).unwrap();
        store.save(&curriculum).expect("save should succeed");

        let loaded = store.load().expect("load should succeed");
        assert_eq!(
            loaded.unit_ids(),
            vec!["Semester 1/Level 1", "Semester 1/Level 2"]
        );
        let level = loaded.level("Semester 1", "Level 1").unwrap();
        assert_eq!(level.implementation.code, "void setup() {}");
        assert_eq!(level.concept.explanation, "Blinking an LED");
    }

    #[test]
    fn missing_file_loads_an_empty_curriculum() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let store = JsonContentStore::new(dir.path().join("nope.json"));

        let loaded = store.load().expect("missing file is not an error");
        assert!(loaded.semesters.is_empty());
    }

    #[test]
    fn corrupt_file_loads_an_empty_curriculum() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let path = dir.path().join("learning_data.json");
        std::fs::write(&path, "{not json").unwrap();

        let loaded = JsonContentStore::new(&path).load().expect("corrupt file is tolerated");
        assert!(loaded.semesters.is_empty());
    }
}

mod progress_store_tests {
    use super::*;
    use robobench::store::ProgressTracker;

    fn store_in(dir: &TempDir) -> JsonProgressStore {
        JsonProgressStore::new(
            dir.path().join("data").join("user_progress.json"),
            "student@example.com",
        )
    }

    #[test]
    fn completion_is_recorded_once_per_unit() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let mut store = store_in(&dir);

        store.notify_unit_completed("Semester 1/Level 1").unwrap();
        store.notify_unit_completed("Semester 1/Level 1").unwrap();
        store.notify_unit_completed("Semester 1/Level 2").unwrap();

        let progress = store.user_progress().unwrap();
        assert_eq!(
            progress.completed_levels,
            vec!["Semester 1/Level 1", "Semester 1/Level 2"]
        );
    }

    #[test]
    fn visits_update_last_viewed_and_dedupe() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let mut store = store_in(&dir);

        let first = LastViewed {
            semester: "Semester 1".to_string(),
            level: "Level 1".to_string(),
            screen: "concept".to_string(),
        };
        let second = LastViewed {
            semester: "Semester 1".to_string(),
            level: "Level 1".to_string(),
            screen: "implementation".to_string(),
        };
        store.mark_visited("Semester 1/Level 1", first).unwrap();
        store.mark_visited("Semester 1/Level 1", second.clone()).unwrap();

        let progress = store.user_progress().unwrap();
        assert_eq!(progress.visited_levels, vec!["Semester 1/Level 1"]);
        assert_eq!(progress.last_viewed, Some(second));
    }

    #[test]
    fn progress_records_are_per_user() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let path = dir.path().join("user_progress.json");

        let mut alice = JsonProgressStore::new(&path, "alice@example.com");
        let mut bob = JsonProgressStore::new(&path, "bob@example.com");
        alice.notify_unit_completed("Semester 1/Level 1").unwrap();
        bob.notify_unit_completed("Semester 1/Level 2").unwrap();

        assert_eq!(
            alice.user_progress().unwrap().completed_levels,
            vec!["Semester 1/Level 1"]
        );
        assert_eq!(
            bob.user_progress().unwrap().completed_levels,
            vec!["Semester 1/Level 2"]
        );
    }

    #[test]
    fn reset_clears_the_record() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let mut store = store_in(&dir);

        store.notify_unit_completed("Semester 1/Level 1").unwrap();
        store.reset().unwrap();

        let progress = store.user_progress().unwrap();
        assert!(progress.completed_levels.is_empty());
        assert!(progress.visited_levels.is_empty());
        assert!(progress.last_viewed.is_none());
    }
}

mod session_store_tests {
    use super::*;

    #[test]
    fn put_then_get_returns_the_value() {
        let mut store = MemorySessionStore::new();
        store.put("token", "abc123".to_string(), Duration::from_secs(60));
        assert_eq!(store.get("token"), Some("abc123".to_string()));
    }

    #[test]
    fn entries_expire_after_their_ttl() {
        let mut store = MemorySessionStore::new();
        store.put("token", "abc123".to_string(), Duration::from_millis(10));
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(store.get("token"), None);
        assert!(store.is_empty(), "expired entry is dropped on access");
    }

    #[test]
    fn expire_removes_an_entry_immediately() {
        let mut store = MemorySessionStore::new();
        store.put("token", "abc123".to_string(), Duration::from_secs(60));
        store.expire("token");
        assert_eq!(store.get("token"), None);
    }

    #[test]
    fn session_tokens_are_opaque_and_unique() {
        use robobench::store::session::new_session_token;
        let first = new_session_token();
        let second = new_session_token();
        assert_ne!(first, second);
        assert_eq!(first.len(), 36, "uuid v4 text form");
    }

    #[test]
    fn purge_sweeps_only_expired_entries() {
        let mut store = MemorySessionStore::new();
        store.put("stale", "x".to_string(), Duration::from_millis(10));
        store.put("fresh", "y".to_string(), Duration::from_secs(60));
        std::thread::sleep(Duration::from_millis(30));

        store.purge_expired();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("fresh"), Some("y".to_string()));
    }
}
