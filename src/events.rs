use std::io;
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    Tick,
    Quit,
    NextPane,
    TogglePlan,
    Reload,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    MouseScrollUp(u16, u16),
    MouseScrollDown(u16, u16),
    MouseLeftClick(u16, u16),
}

fn map_key_event(key_event: KeyEvent) -> AppEvent {
    if key_event.kind != KeyEventKind::Press {
        return AppEvent::Tick;
    }

    if key_event.code == KeyCode::Char('c') && key_event.modifiers.contains(KeyModifiers::CONTROL) {
        return AppEvent::Quit;
    }

    match key_event.code {
        KeyCode::Char('q') | KeyCode::Esc => AppEvent::Quit,
        KeyCode::Tab | KeyCode::BackTab => AppEvent::NextPane,
        KeyCode::Enter | KeyCode::Char(' ') => AppEvent::TogglePlan,
        KeyCode::Char('r') => AppEvent::Reload,
        KeyCode::Up => AppEvent::MoveUp,
        KeyCode::Down => AppEvent::MoveDown,
        KeyCode::PageUp => AppEvent::PageUp,
        KeyCode::PageDown => AppEvent::PageDown,
        _ => AppEvent::Tick,
    }
}

fn map_mouse_event(mouse_event: MouseEvent) -> AppEvent {
    let (column, row) = (mouse_event.column, mouse_event.row);
    match mouse_event.kind {
        MouseEventKind::ScrollUp => AppEvent::MouseScrollUp(column, row),
        MouseEventKind::ScrollDown => AppEvent::MouseScrollDown(column, row),
        MouseEventKind::Down(MouseButton::Left) => AppEvent::MouseLeftClick(column, row),
        _ => AppEvent::Tick,
    }
}

pub fn next_event(timeout: Duration) -> io::Result<AppEvent> {
    if event::poll(timeout)? {
        match event::read()? {
            Event::Key(key_event) => return Ok(map_key_event(key_event)),
            Event::Mouse(mouse_event) => return Ok(map_mouse_event(mouse_event)),
            _ => {}
        }
    }

    Ok(AppEvent::Tick)
}
