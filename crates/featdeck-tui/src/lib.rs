// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use featdeck_app::{
    DeleteTarget, Direction as CursorDirection, Document, EditorCommand, EditorEvent, EditorMode,
    EditorState, ModeKind, Prompt, PromptStep, PromptTarget, QuitChoice,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs};
use std::collections::VecDeque;
use std::io;
use time::OffsetDateTime;
use time::macros::format_description;

const DIRTY_MARK: &str = "*";
const CURSOR_MARK: &str = "_";

/// Side effects the editor needs from its host.
pub trait EditorRuntime {
    fn save_document(&mut self, document: &Document) -> Result<SaveOutcome>;
    /// Where saves go, for the title bar.
    fn location(&self) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub location: String,
    pub group_count: usize,
    pub feature_count: usize,
    pub saved_at: OffsetDateTime,
}

#[derive(Debug, Clone, Default)]
struct ViewData {
    help_visible: bool,
    location: String,
}

pub fn run_app<R: EditorRuntime>(state: &mut EditorState, runtime: &mut R) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData {
        location: runtime.location(),
        ..ViewData::default()
    };
    tracing::info!(location = %view_data.location, "editor started");

    let mut result = Ok(());
    loop {
        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                if handle_key_event(state, runtime, &mut view_data, key) {
                    break;
                }
            }
            Ok(_) => {}
            Err(error) => {
                result = Err(error).context("read event");
                break;
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    tracing::info!("editor stopped");
    result
}

/// Handles one key press. Returns true when the editor should exit.
fn handle_key_event<R: EditorRuntime>(
    state: &mut EditorState,
    runtime: &mut R,
    view_data: &mut ViewData,
    key: KeyEvent,
) -> bool {
    if state.status_line.is_some() {
        state.dispatch(EditorCommand::ClearStatus);
    }

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        view_data.help_visible = false;
        let events = state.dispatch(EditorCommand::Quit);
        return apply_events(state, runtime, events);
    }

    if view_data.help_visible {
        if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
            view_data.help_visible = false;
        }
        return false;
    }

    let mode = state.mode.kind();
    if mode == ModeKind::Browsing && key.code == KeyCode::Char('?') {
        view_data.help_visible = true;
        return false;
    }

    let Some(command) = command_for_key(mode, key) else {
        return false;
    };
    let events = state.dispatch(command);
    apply_events(state, runtime, events)
}

fn apply_events<R: EditorRuntime>(
    state: &mut EditorState,
    runtime: &mut R,
    events: Vec<EditorEvent>,
) -> bool {
    let mut queue = VecDeque::from(events);
    while let Some(event) = queue.pop_front() {
        match event {
            EditorEvent::SaveRequested { and_quit } => {
                queue.extend(perform_save(state, runtime, and_quit));
            }
            EditorEvent::ExitRequested => return true,
            EditorEvent::ModeChanged(mode) => {
                tracing::debug!(mode = mode.label(), "mode changed");
            }
            EditorEvent::DocumentChanged => {
                tracing::debug!(
                    groups = state.document.group_count(),
                    features = state.document.feature_count(),
                    history = state.history.len(),
                    "document changed"
                );
            }
            EditorEvent::SelectionChanged(_)
            | EditorEvent::DirtyChanged(_)
            | EditorEvent::PromptAdvanced
            | EditorEvent::StatusUpdated(_)
            | EditorEvent::StatusCleared => {}
        }
    }
    false
}

fn perform_save<R: EditorRuntime>(
    state: &mut EditorState,
    runtime: &mut R,
    and_quit: bool,
) -> Vec<EditorEvent> {
    match runtime.save_document(&state.document) {
        Ok(outcome) => state.dispatch(EditorCommand::SaveCompleted {
            and_quit,
            status: save_status(&outcome),
        }),
        Err(error) => {
            tracing::warn!(error = %format!("{error:#}"), and_quit, "save failed");
            state.dispatch(EditorCommand::SaveFailed {
                and_quit,
                message: format!("{error:#}"),
            })
        }
    }
}

fn save_status(outcome: &SaveOutcome) -> String {
    let clock = outcome
        .saved_at
        .format(format_description!("[hour]:[minute]:[second]"))
        .unwrap_or_else(|_| outcome.saved_at.to_string());
    format!(
        "saved {} in {} to {} at {clock} UTC",
        plural(outcome.feature_count, "feature"),
        plural(outcome.group_count, "group"),
        outcome.location
    )
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

fn command_for_key(mode: ModeKind, key: KeyEvent) -> Option<EditorCommand> {
    match mode {
        ModeKind::Browsing => browsing_command_for_key(key),
        ModeKind::AddPrompt | ModeKind::EditPrompt => match key.code {
            KeyCode::Enter => Some(EditorCommand::PromptSubmit),
            KeyCode::Esc => Some(EditorCommand::Cancel),
            KeyCode::Backspace => Some(EditorCommand::PromptBackspace),
            KeyCode::Char(ch)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                Some(EditorCommand::PromptInput(ch))
            }
            _ => None,
        },
        ModeKind::DeleteConfirm => match key.code {
            KeyCode::Char('y' | 'Y') | KeyCode::Enter => Some(EditorCommand::Confirm),
            KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(EditorCommand::Cancel),
            _ => None,
        },
        ModeKind::QuitConfirm => match key.code {
            KeyCode::Char('s' | 'S' | 'y' | 'Y') => {
                Some(EditorCommand::ChooseQuit(QuitChoice::SaveAndQuit))
            }
            KeyCode::Char('n' | 'N') => Some(EditorCommand::ChooseQuit(QuitChoice::QuitWithoutSaving)),
            KeyCode::Char('c' | 'C') | KeyCode::Esc => {
                Some(EditorCommand::ChooseQuit(QuitChoice::Cancel))
            }
            _ => None,
        },
    }
}

fn browsing_command_for_key(key: KeyEvent) -> Option<EditorCommand> {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }
    let command = match key.code {
        KeyCode::Up | KeyCode::Char('k') => EditorCommand::Move(CursorDirection::Up),
        KeyCode::Down | KeyCode::Char('j') => EditorCommand::Move(CursorDirection::Down),
        KeyCode::Left | KeyCode::Char('h') => EditorCommand::Move(CursorDirection::Left),
        KeyCode::Right | KeyCode::Char('l') => EditorCommand::Move(CursorDirection::Right),
        KeyCode::Home => EditorCommand::JumpFirst,
        KeyCode::End => EditorCommand::JumpLast,
        KeyCode::Char('a') => EditorCommand::StartAddFeature,
        KeyCode::Char('e') => EditorCommand::StartEditFeature,
        KeyCode::Char('d') => EditorCommand::StartDeleteFeature,
        KeyCode::Char('g') => EditorCommand::StartAddGroup,
        KeyCode::Char('r') => EditorCommand::StartRenameGroup,
        KeyCode::Char('x') => EditorCommand::StartDeleteGroup,
        KeyCode::Char('u') => EditorCommand::Undo,
        KeyCode::Char('s') => EditorCommand::Save,
        KeyCode::Char('q') => EditorCommand::Quit,
        KeyCode::Esc => EditorCommand::Cancel,
        _ => return None,
    };
    Some(command)
}

fn title_text(state: &EditorState, view_data: &ViewData) -> String {
    let mut title = String::from("featdeck");
    if !view_data.location.is_empty() {
        title.push_str(" - ");
        title.push_str(&view_data.location);
    }
    if state.dirty {
        title.push(' ');
        title.push_str(DIRTY_MARK);
    }
    title
}

fn render(frame: &mut ratatui::Frame<'_>, state: &EditorState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let tab_titles = state
        .document
        .groups()
        .iter()
        .map(|group| format!("{} ({})", group.name, group.len()))
        .collect::<Vec<String>>();
    let tabs = Tabs::new(tab_titles)
        .block(
            Block::default()
                .title(title_text(state, view_data))
                .borders(Borders::ALL),
        )
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .select(state.selection.group);
    frame.render_widget(tabs, layout[0]);

    render_features(frame, layout[1], state);

    let status_widget = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_widget, layout[2]);

    match &state.mode {
        EditorMode::Browsing => {}
        EditorMode::AddPrompt(prompt) | EditorMode::EditPrompt(prompt) => {
            let (step, total) = prompt.position();
            let area = centered_rect(64, 36, frame.area());
            frame.render_widget(Clear, area);
            let overlay = Paragraph::new(prompt_overlay_text(prompt)).block(
                Block::default()
                    .title(format!("{} ({step}/{total})", prompt.target.title()))
                    .borders(Borders::ALL)
                    .style(Style::default().fg(Color::Cyan)),
            );
            frame.render_widget(overlay, area);
        }
        EditorMode::DeleteConfirm(target) => {
            let area = centered_rect(56, 24, frame.area());
            frame.render_widget(Clear, area);
            let overlay = Paragraph::new(delete_overlay_text(&state.document, *target)).block(
                Block::default()
                    .title("delete")
                    .borders(Borders::ALL)
                    .style(Style::default().fg(Color::Red)),
            );
            frame.render_widget(overlay, area);
        }
        EditorMode::QuitConfirm => {
            let area = centered_rect(56, 24, frame.area());
            frame.render_widget(Clear, area);
            let overlay = Paragraph::new(quit_overlay_text()).block(
                Block::default()
                    .title("unsaved changes")
                    .borders(Borders::ALL)
                    .style(Style::default().fg(Color::Yellow)),
            );
            frame.render_widget(overlay, area);
        }
    }

    if view_data.help_visible {
        let area = centered_rect(72, 60, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_features(frame: &mut ratatui::Frame<'_>, area: Rect, state: &EditorState) {
    let Some(group) = state.document.group(state.selection.group) else {
        frame.render_widget(
            Paragraph::new(String::new()).block(Block::default().borders(Borders::ALL)),
            area,
        );
        return;
    };

    if group.is_empty() {
        let empty = Paragraph::new("no features in this group -- press a to add one")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().title(group.name.as_str()).borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(["", "feature", "description"].map(|label| {
        Cell::from(label).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    }));

    let rows = group.features.iter().enumerate().map(|(index, feature)| {
        let selected = state.selection.item == Some(index);
        let style = if selected {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Row::new([
            Cell::from(feature.icon.as_str()),
            Cell::from(feature.name.as_str()),
            Cell::from(feature.description.as_str()),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Length(6),
        Constraint::Min(16),
        Constraint::Percentage(60),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(
            Block::default()
                .title(group.name.as_str())
                .borders(Borders::ALL),
        );
    frame.render_widget(table, area);
}

fn prompt_overlay_text(prompt: &Prompt) -> String {
    let mut lines = Vec::new();
    if let PromptTarget::NewFeature { .. } | PromptTarget::Feature { .. } = prompt.target {
        for step in prompt.target.steps() {
            if *step == prompt.step {
                break;
            }
            let value = match step {
                PromptStep::Name => &prompt.draft.name,
                PromptStep::Icon => &prompt.draft.icon,
                PromptStep::Description => &prompt.draft.description,
            };
            lines.push(format!("{}: {value}", step.label()));
        }
    }
    lines.push(format!(
        "{}: {}{CURSOR_MARK}",
        prompt.step.label(),
        prompt.input
    ));
    lines.push(String::new());
    lines.push("enter next | backspace erase | esc cancel".to_owned());
    lines.join("\n")
}

fn delete_overlay_text(document: &Document, target: DeleteTarget) -> String {
    let subject = match target {
        DeleteTarget::Feature { group, item } => document
            .feature(group, item)
            .map(|feature| format!("feature {:?}", feature.name)),
        DeleteTarget::Group(group) => document.group(group).map(|group| {
            format!(
                "group {:?} and its {} feature(s)",
                group.name,
                group.len()
            )
        }),
    }
    .unwrap_or_else(|| "this entry".to_owned());
    format!("delete {subject}?\n\ny/enter delete | n/esc keep")
}

fn quit_overlay_text() -> &'static str {
    "there are unsaved changes.\n\ns/y save and quit | n quit without saving | c/esc keep editing"
}

fn help_overlay_text() -> &'static str {
    "nav: up/down or j/k feature | left/right or h/l group | home/end first/last\n\
features: a add | e edit | d delete\n\
groups: g new | r rename | x delete\n\
file: u undo | s save | q quit\n\
prompt: type text | enter next | backspace erase | esc cancel\n\
confirm: y/enter yes | n/esc no\n\
global: ctrl+c quit | ? help"
}

fn status_text(state: &EditorState, view_data: &ViewData) -> String {
    if view_data.help_visible {
        return String::new();
    }

    let mode = state.mode.kind().label().to_uppercase();
    let default = match state.mode.kind() {
        ModeKind::Browsing => "j/k/h/l home/end | a e d | g r x | u s q | ? help",
        ModeKind::AddPrompt | ModeKind::EditPrompt => "enter next | esc cancel",
        ModeKind::DeleteConfirm => "y/enter delete | n/esc keep",
        ModeKind::QuitConfirm => "s/y save+quit | n discard | c/esc cancel",
    };
    let position = match state.selection.item {
        Some(item) => format!(
            "{}/{}",
            item + 1,
            state
                .document
                .group(state.selection.group)
                .map_or(0, |group| group.len())
        ),
        None => "-".to_owned(),
    };
    match &state.status_line {
        Some(status) => format!("{mode} {position} | {status} | {default}"),
        None => format!("{mode} {position} | {default}"),
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
