//! Curriculum content store

use log::warn;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::Result;
use crate::models::Curriculum;

pub trait ContentStore {
    fn load(&self) -> Result<Curriculum>;
    fn save(&self, curriculum: &Curriculum) -> Result<()>;
}

/// Curriculum store backed by a single pretty-printed JSON file
pub struct JsonContentStore {
    path: PathBuf,
}

impl JsonContentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ContentStore for JsonContentStore {
    /// A missing or unreadable curriculum file yields an empty curriculum so
    /// the app starts in a usable offline state.
    fn load(&self) -> Result<Curriculum> {
        match fs::read_to_string(&self.path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(curriculum) => Ok(curriculum),
                Err(e) => {
                    warn!(
                        "curriculum file {} is not valid JSON ({}), starting empty",
                        self.path.display(),
                        e
                    );
                    Ok(Curriculum::default())
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Curriculum::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, curriculum: &Curriculum) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(curriculum)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}
