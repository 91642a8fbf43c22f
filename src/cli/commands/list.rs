//! List command: curriculum units and their progress

use anyhow::Result;

use crate::config::AppConfig;
use crate::models::unit_id;
use crate::store::content::ContentStore;
use crate::store::{JsonContentStore, JsonProgressStore};

/// Execute the list command
pub async fn execute_list_command(config: &AppConfig) -> Result<()> {
    let curriculum = JsonContentStore::new(config.curriculum_file()).load()?;
    let progress = JsonProgressStore::new(config.progress_file(), &config.user).user_progress()?;

    if curriculum.semesters.is_empty() {
        println!(
            "No curriculum data found in {}. Use `robobench sync` to fetch a class.",
            config.curriculum_file().display()
        );
        return Ok(());
    }

    println!("📚 Curriculum ({} units):", curriculum.unit_ids().len());
    for (semester, data) in &curriculum.semesters {
        println!("\n{}", semester);
        for level in data.levels.keys() {
            let id = unit_id(semester, level);
            let marker = if progress.completed_levels.contains(&id) {
                "✅"
            } else if progress.visited_levels.contains(&id) {
                "👀"
            } else {
                "  "
            };
            println!("  {} {}", marker, level);
        }
    }
    Ok(())
}
