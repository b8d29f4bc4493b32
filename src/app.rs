use arboard::Clipboard;
use ratatui::crossterm::event::KeyEvent;
use tracing::{debug, trace, warn};

use dv::actions::RowActions;
use dv::domain::DVError;
use dv::engine::TableEngine;

use crate::controller::Message;
use crate::inputter::{InputResult, Inputter};

#[derive(Debug, PartialEq)]
pub enum Status {
    RUNNING,
    QUITTING,
}

/// Front-end state over one table engine: curser position, filter text
/// entry, clipboard and the injected row actions. Every user gesture
/// arrives as a [`Message`]; the UI re-reads the engine's view after
/// each one.
pub struct App<T> {
    name: String,
    engine: TableEngine<T>,
    actions: Box<dyn RowActions>,
    pub status: Status,
    curser_row: usize,    // Row under the curser, within the current page
    curser_column: usize, // Column under the curser, within the visible columns
    input: Inputter,
    filter_field: Option<String>, // Column being filtered while the input line is active
    clipboard: Option<Clipboard>,
    status_message: String,
}

impl<T> App<T> {
    pub fn new(name: impl Into<String>, engine: TableEngine<T>, actions: Box<dyn RowActions>) -> Self {
        let clipboard = match Clipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(e) => {
                warn!("Clipboard unavailable: {e}");
                None
            }
        };
        App {
            name: name.into(),
            engine,
            actions,
            status: Status::RUNNING,
            curser_row: 0,
            curser_column: 0,
            input: Inputter::default(),
            filter_field: None,
            clipboard,
            status_message: "Started dv!".to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn engine(&self) -> &TableEngine<T> {
        &self.engine
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn curser(&self) -> (usize, usize) {
        (self.curser_row, self.curser_column)
    }

    /// True while filter text is being typed; the controller then
    /// forwards key presses raw instead of mapping them.
    pub fn raw_keyevents(&self) -> bool {
        self.filter_field.is_some()
    }

    /// Field and editor state of the filter input line, if active.
    pub fn filter_input(&self) -> Option<(&str, InputResult)> {
        self.filter_field.as_deref().map(|f| (f, self.input.get()))
    }

    pub fn update(&mut self, message: Message) {
        match message {
            Message::Quit => self.status = Status::QUITTING,
            Message::MoveUp => self.curser_row = self.curser_row.saturating_sub(1),
            Message::MoveDown => {
                let rows = self.engine.view().rows.len();
                if self.curser_row + 1 < rows {
                    self.curser_row += 1;
                }
            }
            Message::MoveLeft => self.curser_column = self.curser_column.saturating_sub(1),
            Message::MoveRight => {
                let columns = self.engine.view().columns.len();
                if self.curser_column + 1 < columns {
                    self.curser_column += 1;
                }
            }
            Message::NextPage => {
                self.engine.next_page();
                self.clamp_curser();
            }
            Message::PrevPage => {
                self.engine.prev_page();
                self.clamp_curser();
            }
            Message::ToggleSelect => {
                if let Some(id) = self.current_row_id() {
                    self.engine.toggle_row_selected(id);
                }
            }
            Message::ToggleSelectAll => self.toggle_select_all(),
            Message::CycleSort => {
                if let Some(field) = self.current_field() {
                    let result = self.engine.cycle_sort(&field);
                    self.report(result);
                }
            }
            Message::EnterFilter => {
                if let Some(field) = self.current_field() {
                    self.enter_filter(field);
                }
            }
            Message::SearchDefault => {
                let field = self.engine.default_search_field().map(str::to_string);
                match field {
                    Some(field) => self.enter_filter(field),
                    None => self.set_status_message("No search field configured"),
                }
            }
            Message::HideColumn => {
                if let Some(field) = self.current_field() {
                    let result = self.engine.set_column_hidden(&field, true);
                    self.report(result);
                    self.clamp_curser();
                }
            }
            Message::ShowAllColumns => self.engine.show_all_columns(),
            Message::CopyRow => self.copy_row(),
            Message::Delete => {
                let ids = self.engine.selected_ids();
                if ids.is_empty() {
                    self.set_status_message("No rows selected");
                } else {
                    self.actions.delete(&ids);
                    self.set_status_message(format!("Delete requested for {} row(s)", ids.len()));
                }
            }
            Message::AddToCollection => {
                let ids = self.engine.selected_ids();
                if ids.is_empty() {
                    self.set_status_message("No rows selected");
                } else {
                    self.actions.add_to_collection(&ids);
                    self.set_status_message(format!(
                        "Add to collection requested for {} row(s)",
                        ids.len()
                    ));
                }
            }
            Message::RawKey(key) => self.filter_input_key(key),
        }
    }

    // ---------------------- Gesture handling ---------------------- //

    fn current_row_id(&self) -> Option<usize> {
        self.engine.view().rows.get(self.curser_row).map(|r| r.id)
    }

    fn current_field(&self) -> Option<String> {
        self.engine
            .view()
            .columns
            .get(self.curser_column)
            .map(|c| c.field.to_string())
    }

    fn toggle_select_all(&mut self) {
        let all_selected = {
            let snapshot = self.engine.view();
            snapshot.filtered_count > 0 && snapshot.selected_count == snapshot.filtered_count
        };
        self.engine.toggle_all_visible_selected(!all_selected);
    }

    fn enter_filter(&mut self, field: String) {
        self.input.clear();
        if let Some(current) = self.engine.active_filter(&field) {
            let current = current.to_string();
            self.input.set(&current);
        }
        trace!("Entering filter input for \"{field}\"");
        self.filter_field = Some(field);
    }

    fn filter_input_key(&mut self, key: KeyEvent) {
        let result = self.input.read(key);
        if !result.finished {
            return;
        }
        let Some(field) = self.filter_field.take() else {
            return;
        };
        if result.canceled {
            self.set_status_message("Filter input canceled");
            return;
        }
        match self.engine.set_filter(&field, &result.input) {
            Ok(()) => {
                self.clamp_curser();
                self.set_status_message(format!("{} row(s) match", self.engine.filtered_count()));
            }
            Err(e) => self.set_status_message(e.to_string()),
        }
    }

    fn copy_row(&mut self) {
        let Some(id) = self.current_row_id() else {
            return;
        };
        let Some(row) = self.engine.row_as_csv(id) else {
            return;
        };
        match self.clipboard.as_mut() {
            Some(clipboard) => match clipboard.set_text(row) {
                Ok(()) => self.set_status_message("Copied row to clipboard"),
                Err(e) => self.set_status_message(format!("Clipboard error: {e}")),
            },
            None => self.set_status_message("Clipboard unavailable"),
        }
    }

    fn report(&mut self, result: Result<(), DVError>) {
        if let Err(e) = result {
            debug!("Rejected: {e}");
            self.set_status_message(e.to_string());
        }
    }

    fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }

    // The engine clamps its page when the filtered count shrinks; the
    // curser has to follow the rows actually on screen.
    fn clamp_curser(&mut self) {
        let (rows, columns) = {
            let snapshot = self.engine.view();
            (snapshot.rows.len(), snapshot.columns.len())
        };
        self.curser_row = usize::min(self.curser_row, rows.saturating_sub(1));
        self.curser_column = usize::min(self.curser_column, columns.saturating_sub(1));
    }
}
