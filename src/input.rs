use std::collections::VecDeque;
use std::io;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::components::Dir;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    Key(Dir),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub dir: Option<Dir>,
    pub quit: bool,
}

impl TickInput {
    /// Last direction pressed wins; a quit anywhere in the batch sticks.
    pub fn from_events(events: impl IntoIterator<Item = InputEvent>) -> Self {
        let mut input = TickInput::default();
        for event in events {
            match event {
                InputEvent::Quit => input.quit = true,
                InputEvent::Key(dir) => input.dir = Some(dir),
            }
        }
        input
    }
}

pub trait InputSource {
    fn drain(&mut self) -> io::Result<Vec<InputEvent>>;
}

pub fn map_key(key: KeyEvent) -> Option<InputEvent> {
    if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
        return None;
    }
    let event = match key.code {
        KeyCode::Up | KeyCode::Char('k') => InputEvent::Key(Dir::Up),
        KeyCode::Down | KeyCode::Char('j') => InputEvent::Key(Dir::Down),
        KeyCode::Left | KeyCode::Char('h') => InputEvent::Key(Dir::Left),
        KeyCode::Right | KeyCode::Char('l') => InputEvent::Key(Dir::Right),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => InputEvent::Quit,
        KeyCode::Char('q') | KeyCode::Esc => InputEvent::Quit,
        _ => return None,
    };
    Some(event)
}

#[derive(Debug, Default)]
pub struct ScriptedInput {
    batches: VecDeque<Vec<InputEvent>>,
}

impl ScriptedInput {
    pub fn new(batches: impl IntoIterator<Item = Vec<InputEvent>>) -> Self {
        Self { batches: batches.into_iter().collect() }
    }
}

impl InputSource for ScriptedInput {
    fn drain(&mut self) -> io::Result<Vec<InputEvent>> {
        Ok(self.batches.pop_front().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn last_direction_wins_within_a_tick() {
        let input = TickInput::from_events([
            InputEvent::Key(Dir::Up),
            InputEvent::Key(Dir::Left),
            InputEvent::Key(Dir::Down),
        ]);
        assert_eq!(input, TickInput { dir: Some(Dir::Down), quit: false });
        assert_eq!(TickInput::from_events(std::iter::empty()), TickInput::default());
    }

    #[test]
    fn quit_is_kept_regardless_of_order() {
        let input = TickInput::from_events([InputEvent::Quit, InputEvent::Key(Dir::Right)]);
        assert!(input.quit);
        assert_eq!(input.dir, Some(Dir::Right));
    }

    #[test]
    fn arrows_and_vi_keys_steer() {
        assert_eq!(map_key(press(KeyCode::Up)), Some(InputEvent::Key(Dir::Up)));
        assert_eq!(map_key(press(KeyCode::Char('j'))), Some(InputEvent::Key(Dir::Down)));
        assert_eq!(map_key(press(KeyCode::Char('h'))), Some(InputEvent::Key(Dir::Left)));
        assert_eq!(map_key(press(KeyCode::Right)), Some(InputEvent::Key(Dir::Right)));
        assert_eq!(map_key(press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn quit_keys_and_releases() {
        assert_eq!(map_key(press(KeyCode::Char('q'))), Some(InputEvent::Quit));
        assert_eq!(map_key(press(KeyCode::Esc)), Some(InputEvent::Quit));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(ctrl_c), Some(InputEvent::Quit));
        assert_eq!(map_key(press(KeyCode::Char('c'))), None);

        let release = KeyEvent {
            code: KeyCode::Up,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(map_key(release), None);
    }

    #[test]
    fn scripted_input_runs_dry() {
        let mut input = ScriptedInput::new([vec![InputEvent::Key(Dir::Up)], vec![]]);
        assert_eq!(input.drain().unwrap(), vec![InputEvent::Key(Dir::Up)]);
        assert!(input.drain().unwrap().is_empty());
        assert!(input.drain().unwrap().is_empty());
    }
}
