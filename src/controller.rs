use std::time::Duration;

use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent};
use tracing::trace;

use dv::domain::{DVConfig, DVError};

/// User gestures the front-end understands.
#[derive(Debug, Clone)]
pub enum Message {
    Quit,
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    NextPage,
    PrevPage,
    ToggleSelect,
    ToggleSelectAll,
    CycleSort,
    EnterFilter,
    SearchDefault,
    HideColumn,
    ShowAllColumns,
    CopyRow,
    Delete,
    AddToCollection,
    RawKey(KeyEvent),
}

pub struct Controller {
    event_poll_time: u64,
}

impl Controller {
    pub fn new(cfg: &DVConfig) -> Self {
        Self {
            event_poll_time: cfg.event_poll_time,
        }
    }

    /// Poll for one key press and map it to a message. While a filter is
    /// being typed (`raw_keyevents`) every press is forwarded untouched.
    pub fn handle_event(&self, raw_keyevents: bool) -> Result<Option<Message>, DVError> {
        if event::poll(Duration::from_millis(self.event_poll_time))?
            && let Event::Key(key) = event::read()?
            && key.kind == event::KeyEventKind::Press
        {
            if raw_keyevents {
                return Ok(Some(Message::RawKey(key)));
            }
            return Ok(self.handle_key(key));
        }
        Ok(None)
    }

    fn handle_key(&self, key: KeyEvent) -> Option<Message> {
        let message = match key.code {
            KeyCode::Char('q') => Some(Message::Quit),
            KeyCode::Up | KeyCode::Char('k') => Some(Message::MoveUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Message::MoveDown),
            KeyCode::Left => Some(Message::MoveLeft),
            KeyCode::Right => Some(Message::MoveRight),
            KeyCode::Char('n') => Some(Message::NextPage),
            KeyCode::Char('p') => Some(Message::PrevPage),
            KeyCode::Char(' ') => Some(Message::ToggleSelect),
            KeyCode::Char('a') => Some(Message::ToggleSelectAll),
            KeyCode::Char('s') => Some(Message::CycleSort),
            KeyCode::Char('/') => Some(Message::EnterFilter),
            KeyCode::Char('f') => Some(Message::SearchDefault),
            KeyCode::Char('h') => Some(Message::HideColumn),
            KeyCode::Char('H') => Some(Message::ShowAllColumns),
            KeyCode::Char('y') => Some(Message::CopyRow),
            KeyCode::Char('d') => Some(Message::Delete),
            KeyCode::Char('c') => Some(Message::AddToCollection),
            _ => None,
        };
        trace!("Mapped: {key:?} => {message:?}");
        message
    }
}
