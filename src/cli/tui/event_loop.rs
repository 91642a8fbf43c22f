//! TUI event loop and handling

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, time::Duration};
use tokio::sync::mpsc;

use crate::cli::tui::app::{App, FocusedPane};
use crate::cli::tui::ui::ui;
use crate::models::OutputMessage;

/// Run the main TUI event loop
pub async fn run_tui_event_loop(
    mut app: App,
    mut rx: mpsc::UnboundedReceiver<OutputMessage>,
    mut tutor_rx: mpsc::UnboundedReceiver<String>,
) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Probe the local AI engine once at startup
    app.tutor_available = app.tutor.probe().await;

    let result = loop {
        terminal.draw(|f| ui(f, &mut app))?;

        tokio::select! {
            // Handle crossterm events
            _ = tokio::task::spawn_blocking(|| event::poll(Duration::from_millis(50))) => {
                if event::poll(Duration::from_millis(0))? {
                    if let Event::Key(key) = event::read()? {
                        if key.kind == KeyEventKind::Press
                            && handle_key(&mut app, key.code, key.modifiers).await?
                        {
                            break Ok(());
                        }
                    }
                }
            }

            // Worker messages: drain everything currently queued in one pass
            Some(message) = rx.recv() => {
                app.apply_message(message);
                while let Ok(message) = rx.try_recv() {
                    app.apply_message(message);
                }
            }

            Some(answer) = tutor_rx.recv() => {
                app.apply_tutor_answer(answer);
            }
        }
    };

    // Cleanup
    app.orchestrator.monitor().stop();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Handle one key press. Returns true when the app should quit.
async fn handle_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Result<bool> {
    // The editor captures everything except focus changes while active
    if app.focused_pane == FocusedPane::Editor {
        match code {
            KeyCode::Esc => app.focused_pane = FocusedPane::UnitList,
            KeyCode::Char('s') if modifiers.contains(KeyModifiers::CONTROL) => {
                app.save_current_unit()
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Ok(true),
            KeyCode::Char(c) => app.editor.insert_char(c),
            KeyCode::Enter => app.editor.newline(),
            KeyCode::Backspace => app.editor.backspace(),
            KeyCode::Up => app.editor.move_up(),
            KeyCode::Down => app.editor.move_down(),
            KeyCode::Left => app.editor.move_left(),
            KeyCode::Right => app.editor.move_right(),
            _ => {}
        }
        return Ok(false);
    }

    if app.show_concept {
        match code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => app.show_concept = false,
            _ => {}
        }
        return Ok(false);
    }

    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Ok(true),
        KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
        KeyCode::Tab => app.cycle_focus(),
        KeyCode::Char('e') | KeyCode::Enter => app.focused_pane = FocusedPane::Editor,
        KeyCode::Char('?') => app.show_concept = true,
        KeyCode::Up | KeyCode::Char('k') => app.previous_unit(),
        KeyCode::Down | KeyCode::Char('j') => app.next_unit(),
        KeyCode::Char('c') => app.compile_current(),
        KeyCode::Char('u') => app.upload_current().await,
        KeyCode::Char('m') => app.toggle_monitor(),
        KeyCode::Char('t') => app.ask_tutor(),
        KeyCode::Char('o') => app.cycle_output_tab(),
        _ => {}
    }
    Ok(false)
}
