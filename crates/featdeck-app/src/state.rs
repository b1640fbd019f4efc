// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{
    Direction, Document, EditError, EditResult, Mutation, Prompt, PromptProgress, Selection,
    Snapshot, Target, UndoHistory,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTarget {
    Feature { group: usize, item: usize },
    Group(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitChoice {
    SaveAndQuit,
    QuitWithoutSaving,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Browsing,
    AddPrompt(Prompt),
    EditPrompt(Prompt),
    DeleteConfirm(DeleteTarget),
    QuitConfirm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeKind {
    Browsing,
    AddPrompt,
    EditPrompt,
    DeleteConfirm,
    QuitConfirm,
}

impl EditorMode {
    pub const fn kind(&self) -> ModeKind {
        match self {
            Self::Browsing => ModeKind::Browsing,
            Self::AddPrompt(_) => ModeKind::AddPrompt,
            Self::EditPrompt(_) => ModeKind::EditPrompt,
            Self::DeleteConfirm(_) => ModeKind::DeleteConfirm,
            Self::QuitConfirm => ModeKind::QuitConfirm,
        }
    }

    pub const fn prompt(&self) -> Option<&Prompt> {
        match self {
            Self::AddPrompt(prompt) | Self::EditPrompt(prompt) => Some(prompt),
            _ => None,
        }
    }
}

impl ModeKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Browsing => "browse",
            Self::AddPrompt => "add",
            Self::EditPrompt => "edit",
            Self::DeleteConfirm => "delete?",
            Self::QuitConfirm => "quit?",
        }
    }
}

/// The whole editor: document, cursor, undo stack and the modal input state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorState {
    pub document: Document,
    pub selection: Selection,
    pub history: UndoHistory,
    pub mode: EditorMode,
    pub dirty: bool,
    pub status_line: Option<String>,
    saves: u64,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(Document::seed())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorCommand {
    Move(Direction),
    JumpFirst,
    JumpLast,
    StartAddFeature,
    StartEditFeature,
    StartDeleteFeature,
    StartAddGroup,
    StartRenameGroup,
    StartDeleteGroup,
    Undo,
    Save,
    Quit,
    PromptInput(char),
    PromptBackspace,
    PromptSubmit,
    Confirm,
    Cancel,
    ChooseQuit(QuitChoice),
    SaveCompleted { and_quit: bool, status: String },
    SaveFailed { and_quit: bool, message: String },
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    ModeChanged(ModeKind),
    SelectionChanged(Selection),
    DocumentChanged,
    DirtyChanged(bool),
    PromptAdvanced,
    SaveRequested { and_quit: bool },
    ExitRequested,
    StatusUpdated(String),
    StatusCleared,
}

impl EditorState {
    pub fn new(document: Document) -> Self {
        Self {
            selection: Selection::first(&document),
            history: UndoHistory::default(),
            mode: EditorMode::Browsing,
            dirty: false,
            status_line: None,
            saves: 0,
            document,
        }
    }

    pub fn dispatch(&mut self, command: EditorCommand) -> Vec<EditorEvent> {
        match command {
            EditorCommand::SetStatus(message) => return vec![self.set_status(message)],
            EditorCommand::ClearStatus => {
                self.status_line = None;
                return vec![EditorEvent::StatusCleared];
            }
            EditorCommand::SaveCompleted { and_quit, status } => {
                return self.finish_save(and_quit, status);
            }
            EditorCommand::SaveFailed { and_quit, message } => {
                let mut events = self.enter_mode(EditorMode::Browsing);
                let prefix = if and_quit {
                    "save failed, not quitting"
                } else {
                    "save failed"
                };
                events.push(self.set_status(format!("{prefix}: {message}")));
                return events;
            }
            EditorCommand::Quit if !matches!(self.mode, EditorMode::QuitConfirm) => {
                let mut events = self.enter_mode(EditorMode::Browsing);
                events.extend(self.request_quit());
                return events;
            }
            _ => {}
        }

        match self.mode.kind() {
            ModeKind::Browsing => self.dispatch_browsing(command),
            ModeKind::AddPrompt | ModeKind::EditPrompt => self.dispatch_prompt(command),
            ModeKind::DeleteConfirm => self.dispatch_delete_confirm(command),
            ModeKind::QuitConfirm => self.dispatch_quit_confirm(command),
        }
    }

    /// Snapshot, apply, record. Nothing is recorded when the mutation is rejected.
    pub fn apply_mutation(&mut self, mutation: Mutation) -> EditResult<()> {
        let document = self.document.clone();
        self.document.apply(mutation.clone())?;
        self.history.record(Snapshot {
            document,
            dirty: self.dirty,
            saves: self.saves,
        });
        self.dirty = true;
        self.reselect_after(&mutation);
        Ok(())
    }

    fn dispatch_browsing(&mut self, command: EditorCommand) -> Vec<EditorEvent> {
        match command {
            EditorCommand::Move(direction) => {
                let moved = self.selection.step(&self.document, direction);
                self.selection_events(moved)
            }
            EditorCommand::JumpFirst => {
                let moved = self.selection.jump_first(&self.document);
                self.selection_events(moved)
            }
            EditorCommand::JumpLast => {
                let moved = self.selection.jump_last(&self.document);
                self.selection_events(moved)
            }
            EditorCommand::StartAddFeature => {
                self.enter_mode(EditorMode::AddPrompt(Prompt::add_feature(self.selection.group)))
            }
            EditorCommand::StartEditFeature => match self.selected_feature_prompt() {
                Some(prompt) => self.enter_mode(EditorMode::EditPrompt(prompt)),
                None => vec![self.set_status("no feature selected -- nothing to edit")],
            },
            EditorCommand::StartDeleteFeature => match self.selection.item {
                Some(item) => self.enter_mode(EditorMode::DeleteConfirm(DeleteTarget::Feature {
                    group: self.selection.group,
                    item,
                })),
                None => vec![self.set_status("no feature selected -- nothing to delete")],
            },
            EditorCommand::StartAddGroup => self.enter_mode(EditorMode::AddPrompt(Prompt::add_group())),
            EditorCommand::StartRenameGroup => match self.document.group(self.selection.group) {
                Some(group) => {
                    let prompt = Prompt::rename_group(self.selection.group, group);
                    self.enter_mode(EditorMode::EditPrompt(prompt))
                }
                None => vec![self.set_status(
                    EditError::NotFound(Target::Group(self.selection.group)).to_string(),
                )],
            },
            EditorCommand::StartDeleteGroup => {
                if self.document.group_count() == 1 {
                    vec![self.set_status("cannot delete the only group -- add another group first")]
                } else {
                    self.enter_mode(EditorMode::DeleteConfirm(DeleteTarget::Group(
                        self.selection.group,
                    )))
                }
            }
            EditorCommand::Undo => self.undo(),
            EditorCommand::Save => vec![EditorEvent::SaveRequested { and_quit: false }],
            EditorCommand::Cancel => {
                if self.status_line.take().is_some() {
                    vec![EditorEvent::StatusCleared]
                } else {
                    Vec::new()
                }
            }
            _ => Vec::new(),
        }
    }

    fn dispatch_prompt(&mut self, command: EditorCommand) -> Vec<EditorEvent> {
        let prompt = match &mut self.mode {
            EditorMode::AddPrompt(prompt) | EditorMode::EditPrompt(prompt) => prompt,
            _ => return Vec::new(),
        };
        match command {
            EditorCommand::PromptInput(ch) => {
                prompt.push(ch);
                Vec::new()
            }
            EditorCommand::PromptBackspace => {
                prompt.backspace();
                Vec::new()
            }
            EditorCommand::PromptSubmit => match prompt.advance() {
                Ok(PromptProgress::Continue(_)) => vec![EditorEvent::PromptAdvanced],
                Ok(PromptProgress::Complete) => self.commit_prompt(),
                Err(error) => vec![self.set_status(error.to_string())],
            },
            EditorCommand::Cancel => {
                let title = prompt.target.title();
                let mut events = self.enter_mode(EditorMode::Browsing);
                events.push(self.set_status(format!("{title} canceled")));
                events
            }
            _ => Vec::new(),
        }
    }

    fn commit_prompt(&mut self) -> Vec<EditorEvent> {
        let mode = std::mem::replace(&mut self.mode, EditorMode::Browsing);
        let (mut prompt, adding) = match mode {
            EditorMode::AddPrompt(prompt) => (prompt, true),
            EditorMode::EditPrompt(prompt) => (prompt, false),
            other => {
                self.mode = other;
                return Vec::new();
            }
        };

        let mut events = vec![EditorEvent::ModeChanged(ModeKind::Browsing)];
        let Some(mutation) = prompt.mutation(&self.document) else {
            events.push(self.set_status("no changes"));
            return events;
        };

        match self.apply_mutation(mutation.clone()) {
            Ok(()) => {
                events.extend(self.mutation_events(&mutation));
            }
            Err(error) if error.is_validation() => {
                prompt.reopen();
                let mode = if adding {
                    EditorMode::AddPrompt(prompt)
                } else {
                    EditorMode::EditPrompt(prompt)
                };
                events = self.enter_mode(mode);
                events.push(self.set_status(error.to_string()));
            }
            Err(error) => {
                self.selection.clamp(&self.document);
                events.push(EditorEvent::SelectionChanged(self.selection));
                events.push(self.set_status(error.to_string()));
            }
        }
        events
    }

    fn dispatch_delete_confirm(&mut self, command: EditorCommand) -> Vec<EditorEvent> {
        let EditorMode::DeleteConfirm(target) = self.mode else {
            return Vec::new();
        };
        match command {
            EditorCommand::Confirm => {
                let mut events = self.enter_mode(EditorMode::Browsing);
                let mutation = match target {
                    DeleteTarget::Feature { group, item } => Mutation::DeleteFeature { group, item },
                    DeleteTarget::Group(group) => Mutation::DeleteGroup { group },
                };
                match self.apply_mutation(mutation.clone()) {
                    Ok(()) => events.extend(self.mutation_events(&mutation)),
                    Err(error) => {
                        self.selection.clamp(&self.document);
                        events.push(self.set_status(error.to_string()));
                    }
                }
                events
            }
            EditorCommand::Cancel => {
                let mut events = self.enter_mode(EditorMode::Browsing);
                events.push(self.set_status("delete canceled"));
                events
            }
            _ => Vec::new(),
        }
    }

    fn dispatch_quit_confirm(&mut self, command: EditorCommand) -> Vec<EditorEvent> {
        match command {
            EditorCommand::ChooseQuit(QuitChoice::SaveAndQuit) => {
                vec![EditorEvent::SaveRequested { and_quit: true }]
            }
            EditorCommand::ChooseQuit(QuitChoice::QuitWithoutSaving) => {
                vec![EditorEvent::ExitRequested]
            }
            EditorCommand::ChooseQuit(QuitChoice::Cancel) | EditorCommand::Cancel => {
                let mut events = self.enter_mode(EditorMode::Browsing);
                events.push(self.set_status("quit canceled"));
                events
            }
            _ => Vec::new(),
        }
    }

    fn request_quit(&mut self) -> Vec<EditorEvent> {
        if !self.dirty {
            return vec![EditorEvent::ExitRequested];
        }
        let mut events = self.enter_mode(EditorMode::QuitConfirm);
        events.push(self.set_status("unsaved changes"));
        events
    }

    fn undo(&mut self) -> Vec<EditorEvent> {
        match self.history.undo() {
            Ok(previous) => {
                self.dirty = previous.dirty_after_undo(self.saves);
                self.document = previous.document;
                self.selection.clamp(&self.document);
                let remaining = self.history.len();
                vec![
                    EditorEvent::DocumentChanged,
                    EditorEvent::SelectionChanged(self.selection),
                    EditorEvent::DirtyChanged(self.dirty),
                    self.set_status(format!("undone ({remaining} left)")),
                ]
            }
            Err(error) => vec![self.set_status(error.to_string())],
        }
    }

    fn finish_save(&mut self, and_quit: bool, status: String) -> Vec<EditorEvent> {
        self.saves += 1;
        self.dirty = false;
        let mut events = self.enter_mode(EditorMode::Browsing);
        events.push(EditorEvent::DirtyChanged(false));
        events.push(self.set_status(status));
        if and_quit {
            events.push(EditorEvent::ExitRequested);
        }
        events
    }

    fn selected_feature_prompt(&self) -> Option<Prompt> {
        let item = self.selection.item?;
        let feature = self.document.feature(self.selection.group, item)?;
        Some(Prompt::edit_feature(self.selection.group, item, feature))
    }

    fn reselect_after(&mut self, mutation: &Mutation) {
        match mutation {
            Mutation::AddFeature { group, .. } => {
                let len = self.document.group(*group).map_or(0, |group| group.len());
                self.selection = Selection {
                    group: *group,
                    item: len.checked_sub(1),
                };
            }
            Mutation::AddGroup { .. } => {
                self.selection =
                    Selection::entering(&self.document, self.document.group_count() - 1);
            }
            Mutation::DeleteGroup { group } => {
                self.selection = Selection::entering(&self.document, group.saturating_sub(1));
                self.selection.jump_last(&self.document);
            }
            Mutation::EditFeature { .. }
            | Mutation::DeleteFeature { .. }
            | Mutation::RenameGroup { .. } => self.selection.clamp(&self.document),
        }
    }

    fn mutation_events(&mut self, mutation: &Mutation) -> Vec<EditorEvent> {
        vec![
            EditorEvent::DocumentChanged,
            EditorEvent::SelectionChanged(self.selection),
            EditorEvent::DirtyChanged(true),
            self.set_status(mutation.verb()),
        ]
    }

    fn selection_events(&self, moved: bool) -> Vec<EditorEvent> {
        if moved {
            vec![EditorEvent::SelectionChanged(self.selection)]
        } else {
            Vec::new()
        }
    }

    fn enter_mode(&mut self, mode: EditorMode) -> Vec<EditorEvent> {
        let changed = self.mode.kind() != mode.kind();
        self.mode = mode;
        if changed {
            vec![EditorEvent::ModeChanged(self.mode.kind())]
        } else {
            Vec::new()
        }
    }

    fn set_status(&mut self, message: impl Into<String>) -> EditorEvent {
        let message = message.into();
        self.status_line = Some(message.clone());
        EditorEvent::StatusUpdated(message)
    }
}
