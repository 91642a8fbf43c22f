//! TUI rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::cli::tui::app::{App, FocusedPane, OutputTab};
use crate::models::unit_id;

pub fn ui(f: &mut Frame, app: &mut App) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(f.area());

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(28), Constraint::Percentage(72)])
        .split(outer[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
        .split(main[1]);

    render_unit_list(f, app, main[0]);
    render_editor(f, app, right[0]);
    render_output(f, app, right[1]);
    render_status_bar(f, app, outer[1]);

    if app.show_concept {
        render_concept_overlay(f, app);
    }
}

fn border_style(app: &App, pane: FocusedPane) -> Style {
    if app.focused_pane == pane {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

fn render_unit_list(f: &mut Frame, app: &mut App, area: Rect) {
    let items: Vec<ListItem> = app
        .units
        .iter()
        .map(|(semester, level)| {
            let id = unit_id(semester, level);
            let marker = if app.completed_units.contains(&id) {
                "✅"
            } else {
                "  "
            };
            ListItem::new(Line::from(vec![
                Span::raw(format!("{} ", marker)),
                Span::raw(id),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(app, FocusedPane::UnitList))
                .title(format!(" Curriculum ({}) ", app.units.len())),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    f.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_editor(f: &mut Frame, app: &App, area: Rect) {
    let title = match app.selected_unit_id() {
        Some(id) if app.editor.dirty => format!(" Implementation — {} [modified] ", id),
        Some(id) => format!(" Implementation — {} ", id),
        None => " Implementation ".to_string(),
    };

    let visible = area.height.saturating_sub(2) as usize;
    let scroll = app.editor.cursor_row.saturating_sub(visible.saturating_sub(1));

    let paragraph = Paragraph::new(app.editor.text())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(app, FocusedPane::Editor))
                .title(title),
        )
        .scroll((scroll as u16, 0));
    f.render_widget(paragraph, area);

    if app.focused_pane == FocusedPane::Editor {
        let x = area.x + 1 + (app.editor.cursor_col as u16).min(area.width.saturating_sub(3));
        let y = area.y + 1 + (app.editor.cursor_row - scroll) as u16;
        f.set_cursor_position((x, y));
    }
}

fn render_output(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let serial_title = if app.orchestrator.monitor_is_open() {
        "Serial Monitor 📺"
    } else {
        "Serial Monitor"
    };
    let tabs = Tabs::new(vec!["Terminal Output", serial_title, "Robo-Tutor"])
        .select(app.output_tab.index())
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, chunks[0]);

    let (lines, color) = match app.output_tab {
        OutputTab::Build => (&app.build_lines, Color::White),
        OutputTab::Serial => (&app.serial_lines, Color::Green),
        OutputTab::Tutor => (&app.tutor_lines, Color::Cyan),
    };

    let visible = chunks[1].height.saturating_sub(2) as usize;
    let start = lines.len().saturating_sub(visible);
    let text = lines[start..].join("\n");

    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(color))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(app, FocusedPane::Output)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, chunks[1]);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let status = app.orchestrator.status();
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", status.symbol()),
            Style::default().fg(status.color()),
        ),
        Span::raw(app.status_line.clone()),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_concept_overlay(f: &mut Frame, app: &App) {
    let Some((title, body)) = app.selected_concept() else {
        return;
    };
    let area = centered_rect(70, 70, f.area());
    f.render_widget(Clear, area);
    let paragraph = Paragraph::new(body)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Concept: {} (Esc to close) ", title)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
