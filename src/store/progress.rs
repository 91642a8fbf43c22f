//! Learning progress store

use log::{info, warn};
use std::fs;
use std::path::PathBuf;

use crate::errors::Result;
use crate::models::{LastViewed, ProgressBook, UserProgress};

/// Collaborator notified when a unit's firmware was successfully uploaded.
pub trait ProgressTracker: Send {
    /// Record `unit_id` as completed. Idempotent: a unit already recorded is
    /// left untouched.
    fn notify_unit_completed(&mut self, unit_id: &str) -> Result<()>;
}

/// Progress store backed by a JSON file of per-user records
pub struct JsonProgressStore {
    path: PathBuf,
    user: String,
}

impl JsonProgressStore {
    pub fn new(path: impl Into<PathBuf>, user: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            user: user.into(),
        }
    }

    /// A missing or unreadable progress file yields an empty book
    pub fn load_book(&self) -> Result<ProgressBook> {
        match fs::read_to_string(&self.path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(book) => Ok(book),
                Err(e) => {
                    warn!(
                        "progress file {} is not valid JSON ({}), starting empty",
                        self.path.display(),
                        e
                    );
                    Ok(ProgressBook::default())
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ProgressBook::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn save_book(&self, book: &ProgressBook) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(book)?;
        fs::write(&self.path, text)?;
        Ok(())
    }

    /// The current user's record, or an empty one
    pub fn user_progress(&self) -> Result<UserProgress> {
        Ok(self.load_book()?.get(&self.user).cloned().unwrap_or_default())
    }

    /// Record where the user is and add the unit to the visited list
    pub fn mark_visited(&mut self, unit_id: &str, last_viewed: LastViewed) -> Result<()> {
        let mut book = self.load_book()?;
        let record = book.entry(self.user.clone()).or_default();
        record.last_viewed = Some(last_viewed);
        if !record.visited_levels.iter().any(|u| u == unit_id) {
            record.visited_levels.push(unit_id.to_string());
        }
        self.save_book(&book)
    }

    /// Reset the current user's record to a blank state
    pub fn reset(&mut self) -> Result<()> {
        let mut book = self.load_book()?;
        if book.contains_key(&self.user) {
            book.insert(self.user.clone(), UserProgress::default());
            self.save_book(&book)?;
            info!("progress has been reset for user {}", self.user);
        }
        Ok(())
    }
}

impl ProgressTracker for JsonProgressStore {
    fn notify_unit_completed(&mut self, unit_id: &str) -> Result<()> {
        let mut book = self.load_book()?;
        let record = book.entry(self.user.clone()).or_default();
        if !record.completed_levels.iter().any(|u| u == unit_id) {
            record.completed_levels.push(unit_id.to_string());
            self.save_book(&book)?;
            info!("marked unit complete for {}: {}", self.user, unit_id);
        }
        Ok(())
    }
}
