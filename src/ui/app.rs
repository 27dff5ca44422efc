use std::mem;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;
use tracing::{error, info};

use crate::config::AppConfig;
use crate::db::AgendaStore;
use crate::debounce::{Debouncer, Ticket};
use crate::interchange::{
    default_export_file_name, export_to_path, import_from_path, import_into_store,
};
use crate::models::AgendaEntry;
use crate::search::{
    normalize_keyword, run_search, PriorityFilter, SearchRequest, KEYWORD_PLACEHOLDER,
};
use crate::validation::{validate, Validated};

use super::forms::{AgendaField, AgendaForm, PathPrompt, PendingSave, Transfer};
use super::helpers::{
    centered_rect, keyword_match_style, local_now, priority_style, surface_error,
};

/// Height of the search bar above the table.
const SEARCH_BAR_HEIGHT: u16 = 3;
/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Rows skipped by PageUp / PageDown.
const PAGE_STEP: isize = 10;

/// Fine-grained interaction modes. Dialog modes own the state they need so
/// cancelling one simply drops it.
enum Mode {
    Normal,
    /// Keystrokes edit the search keyword.
    Searching,
    EditingForm(AgendaForm),
    ConfirmPastTime(PendingSave),
    ConfirmUpdate(PendingSave),
    ConfirmDelete(AgendaEntry),
    ConfirmImport,
    Transfer(PathPrompt),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    store: AgendaStore,
    config: AppConfig,
    entries: Vec<AgendaEntry>,
    selected: usize,
    keyword: String,
    filter: PriorityFilter,
    debouncer: Debouncer,
    /// Search status line shown in the table title.
    summary: String,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    /// Build the application around an already constructed store and load
    /// every entry.
    pub fn new(store: AgendaStore, config: AppConfig) -> Self {
        let debouncer = Debouncer::new(config.search_debounce);
        let mut app = Self {
            store,
            config,
            entries: Vec::new(),
            selected: 0,
            keyword: String::new(),
            filter: PriorityFilter::All,
            debouncer,
            summary: String::new(),
            mode: Mode::Normal,
            status: None,
        };
        app.run_search_now(None);
        app
    }

    /// Give the store back so the caller can close it.
    pub fn into_store(self) -> AgendaStore {
        self.store
    }

    pub fn entries(&self) -> &[AgendaEntry] {
        &self.entries
    }

    pub fn selected_entry(&self) -> Option<&AgendaEntry> {
        self.entries.get(self.selected)
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn status_text(&self) -> Option<&str> {
        self.status.as_ref().map(|status| status.text.as_str())
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn filter(&self) -> PriorityFilter {
        self.filter
    }

    /// True while a keyword edit is waiting out the debounce window.
    pub fn search_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// How long the event loop may sleep before something needs to happen.
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        self.debouncer
            .time_until_due(now)
            .map(|due| due.min(self.config.tick_rate))
            .unwrap_or(self.config.tick_rate)
    }

    /// Run a debounced search whose quiet window has elapsed.
    pub fn on_tick(&mut self, now: Instant) {
        if let Some(ticket) = self.debouncer.poll(now) {
            self.run_search_now(Some(ticket));
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::Searching => self.handle_search_key(code),
            Mode::EditingForm(form) => self.handle_form_key(code, form),
            Mode::ConfirmPastTime(pending) => self.handle_confirm_past_time(code, pending),
            Mode::ConfirmUpdate(pending) => self.handle_confirm_update(code, pending),
            Mode::ConfirmDelete(entry) => self.handle_confirm_delete(code, entry),
            Mode::ConfirmImport => self.handle_confirm_import(code),
            Mode::Transfer(prompt) => self.handle_transfer_key(code, prompt),
        };

        Ok(exit)
    }

    /// Ctrl+F: jump into the search box from the main table.
    pub(crate) fn handle_ctrl_f(&mut self) {
        if matches!(self.mode, Mode::Normal | Mode::Searching) {
            self.mode = Mode::Searching;
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                *exit = true;
            }
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::PageUp => self.move_selection(-PAGE_STEP),
            KeyCode::PageDown => self.move_selection(PAGE_STEP),
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.selected = self.entries.len().saturating_sub(1),
            KeyCode::Char('/') => {
                self.clear_status();
                return Ok(Mode::Searching);
            }
            KeyCode::Char('+') | KeyCode::Char('a') => {
                self.clear_status();
                return Ok(Mode::EditingForm(AgendaForm::new_entry(local_now())));
            }
            KeyCode::Enter | KeyCode::Char('e') | KeyCode::Char('E') => {
                if let Some(form) = self.open_selected_for_edit()? {
                    self.clear_status();
                    return Ok(Mode::EditingForm(form));
                }
            }
            KeyCode::Char('-') | KeyCode::Char('d') => {
                if let Some(entry) = self.selected_entry().cloned() {
                    self.clear_status();
                    return Ok(Mode::ConfirmDelete(entry));
                }
                self.set_status("Select an agenda to delete first.", StatusKind::Error);
            }
            KeyCode::Char('p') | KeyCode::Char('P') => {
                self.filter = self.filter.cycle();
                self.debouncer.cancel();
                self.run_search_now(None);
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.reset_view(None);
                self.set_status("Search and filter reset.", StatusKind::Info);
            }
            KeyCode::Char('x') | KeyCode::Char('X') => return Ok(self.start_export()),
            KeyCode::Char('i') | KeyCode::Char('I') => {
                self.clear_status();
                return Ok(Mode::ConfirmImport);
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_search_key(&mut self, code: KeyCode) -> Mode {
        match code {
            KeyCode::Enter => {
                self.debouncer.cancel();
                self.run_search_now(None);
                Mode::Normal
            }
            KeyCode::Esc => {
                self.keyword.clear();
                self.debouncer.cancel();
                self.run_search_now(None);
                Mode::Normal
            }
            KeyCode::Up => {
                self.move_selection(-1);
                Mode::Searching
            }
            KeyCode::Down => {
                self.move_selection(1);
                Mode::Searching
            }
            KeyCode::Backspace => {
                if self.keyword.pop().is_some() {
                    self.debouncer.schedule(Instant::now());
                }
                Mode::Searching
            }
            KeyCode::Char(ch) if !ch.is_control() => {
                self.keyword.push(ch);
                self.debouncer.schedule(Instant::now());
                Mode::Searching
            }
            _ => Mode::Searching,
        }
    }

    fn handle_form_key(&mut self, code: KeyCode, mut form: AgendaForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Changes discarded.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Tab | KeyCode::Down => form.step_field(true),
            KeyCode::BackTab | KeyCode::Up => form.step_field(false),
            KeyCode::Left if form.active == AgendaField::Priority => form.cycle_priority(-1),
            KeyCode::Right if form.active == AgendaField::Priority => form.cycle_priority(1),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => return self.submit_form(form),
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Mode::EditingForm(form)
    }

    /// Validate the form and decide which confirmation, if any, comes next.
    fn submit_form(&mut self, mut form: AgendaForm) -> Mode {
        match validate(&form.draft, local_now()) {
            Err(err) => {
                let message = err.to_string();
                form.error = Some(message.clone());
                self.set_status(message, StatusKind::Error);
                Mode::EditingForm(form)
            }
            Ok(Validated::NeedsConfirmation(entry)) => {
                Mode::ConfirmPastTime(PendingSave { entry, form })
            }
            Ok(Validated::Ready(entry)) => self.proceed_with_save(PendingSave { entry, form }),
        }
    }

    /// Updates always ask first; new entries are written straight away.
    fn proceed_with_save(&mut self, pending: PendingSave) -> Mode {
        if pending.is_update() {
            return Mode::ConfirmUpdate(pending);
        }

        match self.create_entry(&pending.entry) {
            Ok(()) => Mode::Normal,
            Err(err) => self.return_to_form(pending.form, &err),
        }
    }

    fn handle_confirm_past_time(&mut self, code: KeyCode, pending: PendingSave) -> Mode {
        match code {
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.proceed_with_save(pending)
            }
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Save cancelled.", StatusKind::Info);
                Mode::EditingForm(pending.form)
            }
            _ => Mode::ConfirmPastTime(pending),
        }
    }

    fn handle_confirm_update(&mut self, code: KeyCode, pending: PendingSave) -> Mode {
        match code {
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.update_entry(&pending.entry) {
                    Ok(()) => Mode::Normal,
                    Err(err) => self.return_to_form(pending.form, &err),
                }
            }
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Update cancelled.", StatusKind::Info);
                Mode::EditingForm(pending.form)
            }
            _ => Mode::ConfirmUpdate(pending),
        }
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, entry: AgendaEntry) -> Mode {
        match code {
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                if let Err(err) = self.delete_entry(&entry) {
                    error!(id = entry.id, error = %format!("{err:#}"), "failed to delete agenda");
                    self.set_status(surface_error(&err), StatusKind::Error);
                }
                Mode::Normal
            }
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Mode::Normal
            }
            _ => Mode::ConfirmDelete(entry),
        }
    }

    fn handle_confirm_import(&mut self, code: KeyCode) -> Mode {
        match code {
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                let initial = self.config.export_dir.join("");
                Mode::Transfer(PathPrompt::new(Transfer::Import, &initial))
            }
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Import cancelled.", StatusKind::Info);
                Mode::Normal
            }
            _ => Mode::ConfirmImport,
        }
    }

    fn handle_transfer_key(&mut self, code: KeyCode, mut prompt: PathPrompt) -> Mode {
        match code {
            KeyCode::Esc => {
                let message = match prompt.transfer {
                    Transfer::Export => "Export cancelled.",
                    Transfer::Import => "Import cancelled.",
                };
                self.set_status(message, StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Backspace => prompt.backspace(),
            KeyCode::Enter => {
                let path = PathBuf::from(prompt.path.trim());
                let result = match prompt.transfer {
                    Transfer::Export => self.export_all(path),
                    Transfer::Import => self.import_file(path),
                };
                match result {
                    Ok(()) => return Mode::Normal,
                    Err(err) => {
                        error!(error = %format!("{err:#}"), "agenda transfer failed");
                        let message = surface_error(&err);
                        prompt.error = Some(message.clone());
                        self.set_status(message, StatusKind::Error);
                    }
                }
            }
            KeyCode::Char(ch) => {
                if prompt.push_char(ch) {
                    prompt.error = None;
                }
            }
            _ => {}
        }
        Mode::Transfer(prompt)
    }

    fn start_export(&mut self) -> Mode {
        match self.store.count() {
            Ok(0) => {
                self.set_status("Nothing to export.", StatusKind::Error);
                Mode::Normal
            }
            Ok(_) => {
                self.clear_status();
                let initial = self
                    .config
                    .export_dir
                    .join(default_export_file_name(local_now()));
                Mode::Transfer(PathPrompt::new(Transfer::Export, &initial))
            }
            Err(err) => {
                error!(error = %err, "failed to count agenda before export");
                self.set_status(err.to_string(), StatusKind::Error);
                Mode::Normal
            }
        }
    }

    fn create_entry(&mut self, entry: &AgendaEntry) -> Result<()> {
        let created = self
            .store
            .create(entry)
            .context("failed to save agenda")?;
        info!(id = created.id, title = %created.title, "agenda added");
        self.reset_view(Some(created.id));
        self.set_status(format!("Saved '{}'.", created.title), StatusKind::Info);
        Ok(())
    }

    fn update_entry(&mut self, entry: &AgendaEntry) -> Result<()> {
        let updated = self
            .store
            .update(entry)
            .context("failed to update agenda")?;
        if !updated {
            self.reset_view(None);
            return Err(anyhow!("Agenda no longer exists."));
        }
        info!(id = entry.id, title = %entry.title, "agenda updated");
        self.reset_view(Some(entry.id));
        self.set_status(format!("Updated '{}'.", entry.title), StatusKind::Info);
        Ok(())
    }

    fn delete_entry(&mut self, entry: &AgendaEntry) -> Result<()> {
        let deleted = self
            .store
            .delete(entry.id)
            .context("failed to delete agenda")?;
        self.reset_view(None);
        if !deleted {
            return Err(anyhow!("Agenda no longer exists."));
        }
        info!(id = entry.id, "agenda removed");
        self.set_status(format!("Deleted '{}'.", entry.title), StatusKind::Info);
        Ok(())
    }

    fn export_all(&mut self, path: PathBuf) -> Result<()> {
        if path.as_os_str().is_empty() {
            return Err(anyhow!("Enter a file path."));
        }
        let entries = self.store.get_all().context("failed to load agenda")?;
        if entries.is_empty() {
            return Err(anyhow!("Nothing to export."));
        }
        let written = export_to_path(&entries, &path, local_now())
            .context("failed to export agenda")?;
        self.set_status(
            format!("Exported {} agenda to {}.", entries.len(), written.display()),
            StatusKind::Info,
        );
        Ok(())
    }

    fn import_file(&mut self, path: PathBuf) -> Result<()> {
        if path.as_os_str().is_empty() {
            return Err(anyhow!("Enter a file path."));
        }
        let records = import_from_path(&path).context("failed to import agenda")?;
        if records.is_empty() {
            return Err(anyhow!("The file contains no agenda."));
        }
        let report = import_into_store(&mut self.store, records);
        self.reset_view(None);
        let kind = if report.failed == 0 {
            StatusKind::Info
        } else {
            StatusKind::Error
        };
        self.set_status(
            format!(
                "Import finished: {} succeeded, {} failed, {} total.",
                report.succeeded,
                report.failed,
                report.total()
            ),
            kind,
        );
        Ok(())
    }

    /// Re-read the selected row so the form never edits a stale copy.
    fn open_selected_for_edit(&mut self) -> Result<Option<AgendaForm>> {
        let Some(id) = self.selected_entry().map(|entry| entry.id) else {
            self.set_status("Select an agenda to edit first.", StatusKind::Error);
            return Ok(None);
        };

        match self.store.get_by_id(id) {
            Ok(Some(entry)) => Ok(Some(AgendaForm::from_entry(&entry))),
            Ok(None) => {
                self.reset_view(None);
                self.set_status("Agenda no longer exists.", StatusKind::Error);
                Ok(None)
            }
            Err(err) => {
                error!(id, error = %err, "failed to load agenda for editing");
                self.set_status(err.to_string(), StatusKind::Error);
                Ok(None)
            }
        }
    }

    fn return_to_form(&mut self, mut form: AgendaForm, err: &anyhow::Error) -> Mode {
        error!(error = %format!("{err:#}"), "failed to save agenda");
        let message = surface_error(err);
        form.error = Some(message.clone());
        self.set_status(message, StatusKind::Error);
        Mode::EditingForm(form)
    }

    /// Clear search and filter, reload everything and optionally focus a row.
    fn reset_view(&mut self, focus_id: Option<i64>) {
        self.keyword.clear();
        self.filter = PriorityFilter::All;
        self.debouncer.cancel();
        self.selected = 0;
        self.run_search_now(None);

        if let Some(id) = focus_id {
            if let Some(idx) = self.entries.iter().position(|entry| entry.id == id) {
                self.selected = idx;
            }
        }
    }

    /// Run the current keyword and filter against the store. A superseded
    /// debounce ticket skips the query entirely. Store failures degrade to an
    /// empty table plus an error in the footer.
    fn run_search_now(&mut self, ticket: Option<Ticket>) {
        if let Some(ticket) = ticket {
            if !self.debouncer.is_current(ticket) {
                return;
            }
        }

        let request = SearchRequest::from_inputs(&self.keyword, self.filter);
        match run_search(&mut self.store, &request) {
            Ok(outcome) => {
                self.summary = outcome.status();
                self.entries = outcome.entries;
            }
            Err(err) => {
                error!(error = %err, "failed to load agenda");
                self.entries.clear();
                self.summary = "No agenda found".to_string();
                self.set_status(err.to_string(), StatusKind::Error);
            }
        }
        self.ensure_in_bounds();
    }

    fn move_selection(&mut self, offset: isize) {
        if self.entries.is_empty() {
            return;
        }
        let last = self.entries.len() as isize - 1;
        self.selected = (self.selected as isize + offset).clamp(0, last) as usize;
    }

    fn ensure_in_bounds(&mut self) {
        if self.entries.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.entries.len() {
            self.selected = self.entries.len() - 1;
        }
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    #[cfg(test)]
    fn status_kind(&self) -> Option<StatusKind> {
        self.status.as_ref().map(|status| status.kind)
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(SEARCH_BAR_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_search_bar(frame, chunks[0]);
        self.draw_table(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);

        match &self.mode {
            Mode::EditingForm(form) => self.draw_form(frame, area, form),
            Mode::ConfirmPastTime(pending) => self.draw_confirm(
                frame,
                area,
                "Time Warning",
                vec![
                    Line::from(format!(
                        "{} is already in the past.",
                        pending.entry.datetime_label()
                    )),
                    Line::from("Save it anyway?"),
                ],
            ),
            Mode::ConfirmUpdate(pending) => self.draw_confirm(
                frame,
                area,
                "Confirm Update",
                vec![Line::from(format!(
                    "Update '{}' ({}, {})?",
                    pending.entry.title,
                    pending.entry.datetime_label(),
                    pending.entry.priority
                ))],
            ),
            Mode::ConfirmDelete(entry) => self.draw_confirm(
                frame,
                area,
                "Confirm Delete",
                vec![
                    Line::from(format!("Delete '{}' ({})?", entry.title, entry.datetime_label())),
                    Line::from("This cannot be undone."),
                ],
            ),
            Mode::ConfirmImport => self.draw_confirm(
                frame,
                area,
                "Confirm Import",
                vec![
                    Line::from("Import adds the file's agenda as new entries."),
                    Line::from("Existing agenda are kept."),
                ],
            ),
            Mode::Transfer(prompt) => self.draw_path_prompt(frame, area, prompt),
            Mode::Normal | Mode::Searching => {}
        }
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect) {
        let searching = matches!(self.mode, Mode::Searching);
        let mut block = Block::default().borders(Borders::ALL).title("Agenda");
        if searching {
            block = block.border_style(Style::default().fg(Color::Yellow));
        }

        let keyword = if self.keyword.is_empty() && !searching {
            Span::styled(KEYWORD_PLACEHOLDER, Style::default().fg(Color::DarkGray))
        } else {
            Span::raw(self.keyword.clone())
        };
        let filter_style = if self.filter.is_active() {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let line = Line::from(vec![
            Span::raw("Search: "),
            keyword,
            Span::raw("   Filter: "),
            Span::styled(self.filter.label(), filter_style),
        ]);
        frame.render_widget(Paragraph::new(line).block(block.clone()), area);

        if searching {
            let inner = block.inner(area);
            let cursor_x = inner.x + "Search: ".len() as u16 + self.keyword.chars().count() as u16;
            frame.set_cursor_position((cursor_x, inner.y));
        }
    }

    fn draw_table(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.summary.clone());

        if self.entries.is_empty() {
            let text = if self.keyword.trim().is_empty() && !self.filter.is_active() {
                "No agenda yet. Press '+' to add one."
            } else {
                "No agenda matches the current search."
            };
            let message = Paragraph::new(text)
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let header = Row::new(["Title", "Day", "Date", "Time", "Priority"])
            .style(Style::default().add_modifier(Modifier::BOLD));
        let keyword = normalize_keyword(&self.keyword);
        let keyword = keyword.as_deref();
        let rows = self.entries.iter().map(|entry| {
            let title = entry.title.clone();
            let title_style = keyword_match_style(&title, keyword);
            Row::new(vec![
                Cell::from(title).style(title_style),
                Cell::from(entry.day_name()),
                Cell::from(entry.date_label()),
                Cell::from(entry.time_label()),
                Cell::from(entry.priority.label()).style(priority_style(entry.priority)),
            ])
        });
        let widths = [
            Constraint::Min(20),
            Constraint::Length(8),
            Constraint::Length(11),
            Constraint::Length(6),
            Constraint::Length(9),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        let mut state = TableState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let hints: &[(&str, &str)] = match &self.mode {
            Mode::Searching => &[
                ("[Type]", " Search   "),
                ("[Enter]", " Done   "),
                ("[Esc]", " Clear"),
            ],
            Mode::EditingForm(_) => &[
                ("[Tab]", " Next field   "),
                ("[Left/Right/Space]", " Priority   "),
                ("[Enter]", " Save   "),
                ("[Esc]", " Cancel"),
            ],
            Mode::Transfer(_) => &[("[Enter]", " Confirm   "), ("[Esc]", " Cancel")],
            Mode::ConfirmPastTime(_)
            | Mode::ConfirmUpdate(_)
            | Mode::ConfirmDelete(_)
            | Mode::ConfirmImport => &[("[Y]", " Yes   "), ("[N/Esc]", " No")],
            Mode::Normal => &[
                ("[+]", " Add   "),
                ("[e]", " Edit   "),
                ("[-]", " Delete   "),
                ("[/]", " Search   "),
                ("[p]", " Priority filter   "),
                ("[r]", " Reset   "),
                ("[x]", " Export   "),
                ("[i]", " Import   "),
                ("[q]", " Quit"),
            ],
        };

        let spans: Vec<Span<'static>> = hints
            .iter()
            .flat_map(|(key, label)| [Span::styled(*key, key_style), Span::raw(*label)])
            .collect();
        Line::from(spans)
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect, form: &AgendaForm) {
        let popup_area = centered_rect(70, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(form.title()).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = AgendaField::ORDER
            .iter()
            .map(|field| form.build_line(*field))
            .collect();
        lines.push(Line::from(""));

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save | Tab to switch | Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        frame.render_widget(Paragraph::new(lines), inner);

        if let Some((dx, dy)) = form.cursor_offset() {
            frame.set_cursor_position((inner.x + dx, inner.y + dy));
        }
    }

    fn draw_confirm(&self, frame: &mut Frame, area: Rect, title: &str, mut lines: Vec<Line>) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press Y to confirm or N / Esc to cancel.",
            Style::default().fg(Color::Gray),
        )));

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_path_prompt(&self, frame: &mut Frame, area: Rect, prompt: &PathPrompt) {
        let popup_area = centered_rect(70, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(prompt.title()).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            Line::from(vec![Span::raw("File: "), Span::raw(prompt.path.clone())]),
            Line::from(""),
        ];
        if let Some(error) = &prompt.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to confirm | Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }
        frame.render_widget(Paragraph::new(lines), inner);

        let cursor_x = inner.x + "File: ".len() as u16 + prompt.path.chars().count() as u16;
        frame.set_cursor_position((cursor_x, inner.y));
    }
}
