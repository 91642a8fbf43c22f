//! Main TUI application state and logic

use chrono::Local;
use ratatui::widgets::ListState;
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::device::BuildOrchestrator;
use crate::errors::{Result, RoboBenchError};
use crate::models::{unit_id, Curriculum, JobKind, JobStatus, LastViewed, OutputMessage};
use crate::services::{TutorClient, TutorRequest};
use crate::store::content::ContentStore;
use crate::store::{JsonContentStore, JsonProgressStore};

/// Which pane has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    UnitList,
    Editor,
    Output,
}

/// Which output tab is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputTab {
    Build,
    Serial,
    Tutor,
}

impl OutputTab {
    pub fn index(&self) -> usize {
        match self {
            OutputTab::Build => 0,
            OutputTab::Serial => 1,
            OutputTab::Tutor => 2,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            OutputTab::Build => OutputTab::Serial,
            OutputTab::Serial => OutputTab::Tutor,
            OutputTab::Tutor => OutputTab::Build,
        }
    }
}

/// Minimal line-based editor buffer
#[derive(Debug, Default)]
pub struct EditorBuffer {
    pub lines: Vec<String>,
    pub cursor_row: usize,
    pub cursor_col: usize,
    pub dirty: bool,
}

fn byte_offset(line: &str, col: usize) -> usize {
    line.char_indices()
        .nth(col)
        .map(|(i, _)| i)
        .unwrap_or(line.len())
}

impl EditorBuffer {
    pub fn from_text(text: &str) -> Self {
        let mut lines: Vec<String> = text.lines().map(|l| l.to_string()).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        Self {
            lines,
            cursor_row: 0,
            cursor_col: 0,
            dirty: false,
        }
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines.get(row).map(|l| l.chars().count()).unwrap_or(0)
    }

    pub fn insert_char(&mut self, c: char) {
        let col = self.cursor_col.min(self.line_len(self.cursor_row));
        let line = &mut self.lines[self.cursor_row];
        let offset = byte_offset(line, col);
        line.insert(offset, c);
        self.cursor_col = col + 1;
        self.dirty = true;
    }

    pub fn newline(&mut self) {
        let col = self.cursor_col.min(self.line_len(self.cursor_row));
        let line = &mut self.lines[self.cursor_row];
        let offset = byte_offset(line, col);
        let rest = line.split_off(offset);
        self.lines.insert(self.cursor_row + 1, rest);
        self.cursor_row += 1;
        self.cursor_col = 0;
        self.dirty = true;
    }

    pub fn backspace(&mut self) {
        let col = self.cursor_col.min(self.line_len(self.cursor_row));
        if col > 0 {
            let line = &mut self.lines[self.cursor_row];
            let offset = byte_offset(line, col - 1);
            line.remove(offset);
            self.cursor_col = col - 1;
            self.dirty = true;
        } else if self.cursor_row > 0 {
            let line = self.lines.remove(self.cursor_row);
            self.cursor_row -= 1;
            self.cursor_col = self.line_len(self.cursor_row);
            self.lines[self.cursor_row].push_str(&line);
            self.dirty = true;
        }
    }

    pub fn move_up(&mut self) {
        if self.cursor_row > 0 {
            self.cursor_row -= 1;
            self.cursor_col = self.cursor_col.min(self.line_len(self.cursor_row));
        }
    }

    pub fn move_down(&mut self) {
        if self.cursor_row + 1 < self.lines.len() {
            self.cursor_row += 1;
            self.cursor_col = self.cursor_col.min(self.line_len(self.cursor_row));
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor_col < self.line_len(self.cursor_row) {
            self.cursor_col += 1;
        }
    }
}

pub struct App {
    pub config: AppConfig,
    pub content: JsonContentStore,
    pub curriculum: Curriculum,
    /// (semester, level) pairs in curriculum order
    pub units: Vec<(String, String)>,
    pub selected_unit: usize,
    pub list_state: ListState,
    pub focused_pane: FocusedPane,
    pub output_tab: OutputTab,
    pub editor: EditorBuffer,
    pub build_lines: Vec<String>,
    pub serial_lines: Vec<String>,
    pub tutor_lines: Vec<String>,
    pub status_line: String,
    pub show_concept: bool,
    pub tutor: TutorClient,
    pub tutor_available: bool,
    pub tutor_pending: bool,
    pub tutor_tx: mpsc::UnboundedSender<String>,
    pub orchestrator: BuildOrchestrator,
    pub progress: JsonProgressStore,
    pub completed_units: Vec<String>,
}

impl App {
    pub fn new(
        config: AppConfig,
    ) -> Result<(
        Self,
        mpsc::UnboundedReceiver<OutputMessage>,
        mpsc::UnboundedReceiver<String>,
    )> {
        let content = JsonContentStore::new(config.curriculum_file());
        let curriculum = content.load()?;
        let units: Vec<(String, String)> = curriculum
            .semesters
            .iter()
            .flat_map(|(semester, data)| {
                data.levels
                    .keys()
                    .map(move |level| (semester.clone(), level.clone()))
            })
            .collect();

        let (tx, rx) = mpsc::unbounded_channel();
        let (tutor_tx, tutor_rx) = mpsc::unbounded_channel();

        let progress = JsonProgressStore::new(config.progress_file(), &config.user);
        let completed_units = progress.user_progress()?.completed_levels;
        let tracker = JsonProgressStore::new(config.progress_file(), &config.user);
        let orchestrator = BuildOrchestrator::new(
            config.project_dir.clone(),
            config.toolchain.clone(),
            config.serial.clone(),
            tx,
            Box::new(tracker),
        );
        let tutor = TutorClient::new(&config.tutor.base_url, &config.tutor.model);

        let mut list_state = ListState::default();
        if !units.is_empty() {
            list_state.select(Some(0));
        }

        let mut app = Self {
            config,
            content,
            curriculum,
            units,
            selected_unit: 0,
            list_state,
            focused_pane: FocusedPane::UnitList,
            output_tab: OutputTab::Build,
            editor: EditorBuffer::from_text(""),
            build_lines: Vec::new(),
            serial_lines: Vec::new(),
            tutor_lines: Vec::new(),
            status_line: format!(
                "RoboBench {} — c compile · u upload · m monitor · t tutor · ? concept · q quit",
                crate::VERSION
            ),
            show_concept: false,
            tutor,
            tutor_available: false,
            tutor_pending: false,
            tutor_tx,
            orchestrator,
            progress,
            completed_units,
        };
        app.open_selected_unit();
        Ok((app, rx, tutor_rx))
    }

    pub fn selected_unit_id(&self) -> Option<String> {
        self.units
            .get(self.selected_unit)
            .map(|(semester, level)| unit_id(semester, level))
    }

    /// Load the selected unit's sketch into the editor and record the visit
    pub fn open_selected_unit(&mut self) {
        let Some((semester, level)) = self.units.get(self.selected_unit).cloned() else {
            return;
        };
        let code = self
            .curriculum
            .level(&semester, &level)
            .map(|l| l.implementation.code.clone())
            .unwrap_or_default();
        self.editor = EditorBuffer::from_text(&code);

        let id = unit_id(&semester, &level);
        self.orchestrator.set_active_unit(Some(id.clone()));
        let last_viewed = LastViewed {
            semester,
            level,
            screen: "implementation".to_string(),
        };
        if let Err(e) = self.progress.mark_visited(&id, last_viewed) {
            log::warn!("failed to record visit of {}: {}", id, e);
        }
    }

    pub fn next_unit(&mut self) {
        if self.units.is_empty() {
            return;
        }
        self.selected_unit = (self.selected_unit + 1) % self.units.len();
        self.list_state.select(Some(self.selected_unit));
        self.open_selected_unit();
    }

    pub fn previous_unit(&mut self) {
        if self.units.is_empty() {
            return;
        }
        self.selected_unit = if self.selected_unit == 0 {
            self.units.len() - 1
        } else {
            self.selected_unit - 1
        };
        self.list_state.select(Some(self.selected_unit));
        self.open_selected_unit();
    }

    pub fn cycle_focus(&mut self) {
        self.focused_pane = match self.focused_pane {
            FocusedPane::UnitList => FocusedPane::Editor,
            FocusedPane::Editor => FocusedPane::Output,
            FocusedPane::Output => FocusedPane::UnitList,
        };
    }

    pub fn cycle_output_tab(&mut self) {
        self.output_tab = self.output_tab.next();
    }

    /// Apply one drained message from the worker channel
    pub fn apply_message(&mut self, message: OutputMessage) {
        match message {
            OutputMessage::BuildLine(line) => self.build_lines.push(line),
            OutputMessage::SerialLine(line) => self.serial_lines.push(line),
            OutputMessage::JobFinished(status) => {
                let was_upload =
                    matches!(self.orchestrator.status(), JobStatus::Running(JobKind::Upload));
                self.orchestrator.finish_job(status);
                let stamp = Local::now().format("%H:%M:%S");
                self.status_line = match status {
                    JobStatus::Succeeded if was_upload => {
                        format!("[{}] Upload finished successfully", stamp)
                    }
                    JobStatus::Succeeded => format!("[{}] Build finished successfully", stamp),
                    JobStatus::Failed(Some(code)) => {
                        format!("[{}] Job failed (exit code {})", stamp, code)
                    }
                    JobStatus::Failed(None) => format!("[{}] Job failed", stamp),
                    other => format!("[{}] Job ended: {:?}", stamp, other),
                };
                if was_upload && status == JobStatus::Succeeded {
                    self.output_tab = OutputTab::Serial;
                    self.refresh_completed();
                }
            }
        }
    }

    pub fn compile_current(&mut self) {
        let source = self.editor.text();
        self.build_lines.clear();
        self.output_tab = OutputTab::Build;
        match self.orchestrator.compile(&source) {
            Ok(()) => self.status_line = "Compiling...".to_string(),
            Err(e) => self.report_job_error(e),
        }
    }

    pub async fn upload_current(&mut self) {
        if self.orchestrator.is_running() {
            self.report_job_error(RoboBenchError::Busy);
            return;
        }
        let source = self.editor.text();
        self.build_lines.clear();
        self.serial_lines.clear();
        self.output_tab = OutputTab::Build;
        match self.orchestrator.upload(&source).await {
            Ok(()) => self.status_line = "Uploading...".to_string(),
            Err(e) => self.report_job_error(e),
        }
    }

    fn report_job_error(&mut self, e: RoboBenchError) {
        self.status_line = match e {
            RoboBenchError::Busy => "⚠ A process is already running".to_string(),
            other => format!("⚠ {}", other),
        };
    }

    pub fn toggle_monitor(&mut self) {
        if self.orchestrator.is_running() {
            self.status_line = "⚠ A process is already running".to_string();
            return;
        }
        if self.orchestrator.monitor().is_open() {
            self.orchestrator.monitor().stop();
            self.status_line = "Stopping serial monitor...".to_string();
        } else {
            let port = self.config.serial.port.clone();
            let baud = self.config.serial.baud_rate;
            self.orchestrator.monitor().start(&port, baud);
            self.output_tab = OutputTab::Serial;
            self.status_line = format!("Monitoring {}", port);
        }
    }

    pub fn ask_tutor(&mut self) {
        if !self.tutor_available {
            self.status_line =
                "⚠ Local AI engine is not running (start it with `ollama serve`)".to_string();
            return;
        }
        if self.tutor_pending {
            return;
        }
        let request = TutorRequest {
            question: "Explain what this sketch does, step by step.".to_string(),
            snippet: None,
            code_context: Some(self.editor.text()),
        };
        self.tutor.ask(request, self.tutor_tx.clone());
        self.tutor_pending = true;
        self.output_tab = OutputTab::Tutor;
        self.tutor_lines.push("🤖 Thinking...".to_string());
    }

    pub fn apply_tutor_answer(&mut self, answer: String) {
        self.tutor_pending = false;
        if self.tutor_lines.last().map(String::as_str) == Some("🤖 Thinking...") {
            self.tutor_lines.pop();
        }
        for line in answer.lines() {
            self.tutor_lines.push(line.to_string());
        }
        self.tutor_lines.push(String::new());
    }

    /// Write the editor buffer back into the curriculum (developer edit)
    pub fn save_current_unit(&mut self) {
        let Some((semester, level)) = self.units.get(self.selected_unit).cloned() else {
            return;
        };
        let text = self.editor.text();
        if let Some(found) = self.curriculum.level_mut(&semester, &level) {
            found.implementation.code = text;
        }
        match self.content.save(&self.curriculum) {
            Ok(()) => {
                self.editor.dirty = false;
                self.status_line = format!("Saved {}", unit_id(&semester, &level));
            }
            Err(e) => self.status_line = format!("⚠ Failed to save: {}", e),
        }
    }

    pub fn refresh_completed(&mut self) {
        self.completed_units = self
            .progress
            .user_progress()
            .map(|p| p.completed_levels)
            .unwrap_or_default();
    }

    /// Concept text of the selected unit, for the overlay
    pub fn selected_concept(&self) -> Option<(String, String)> {
        let (semester, level) = self.units.get(self.selected_unit)?;
        let found = self.curriculum.level(semester, level)?;
        Some((
            format!("{} — {}", semester, level),
            format!(
                "{}\n\nExample:\n{}\n\nExpected output:\n{}",
                found.concept.explanation, found.concept.code, found.concept.output
            ),
        ))
    }
}
