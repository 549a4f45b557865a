use crate::model::Action;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use std::time::Duration;

/// What kind of screen the key arrived on; the app owns the full scene
/// state, input only needs the discriminant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SceneKind {
    CharacterSelect,
    Main,
    Help,
    Laser,
    Catch,
    Dead,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Quit,
    HelpToggle,
    Back,
    Do(Action),
    StartLaser,
    StartCatch,
    ResetPet,
    SelectMove(i32),
    SelectConfirm,
    GameMove(i32, i32),
    Zap,
    NewGame,
}

pub(crate) fn collect_input_nonblocking(max_frame_time: Duration) -> anyhow::Result<Vec<KeyCode>> {
    let mut out = Vec::new();

    // poll with a tiny timeout so we stay responsive
    let timeout = std::cmp::min(Duration::from_millis(1), max_frame_time);
    while event::poll(timeout)? {
        if let Event::Key(k) = event::read()? {
            if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat {
                out.push(k.code);
                if out.len() >= 32 {
                    break;
                }
            }
        }
    }
    Ok(out)
}

pub(crate) fn map_key_to_command(scene: SceneKind, key: KeyCode) -> Option<Command> {
    if matches!(key, KeyCode::Char('q') | KeyCode::Char('Q')) {
        return Some(Command::Quit);
    }

    match scene {
        SceneKind::CharacterSelect => match key {
            KeyCode::Left | KeyCode::Up => Some(Command::SelectMove(-1)),
            KeyCode::Right | KeyCode::Down | KeyCode::Tab => Some(Command::SelectMove(1)),
            KeyCode::Enter => Some(Command::SelectConfirm),
            _ => None,
        },
        SceneKind::Main => match key {
            KeyCode::Char('f') | KeyCode::Char('F') => Some(Command::Do(Action::Feed)),
            KeyCode::Char('p') | KeyCode::Char('P') => Some(Command::Do(Action::Play)),
            KeyCode::Char('e') | KeyCode::Char('E') => Some(Command::Do(Action::Heal)),
            KeyCode::Char('s') | KeyCode::Char('S') => Some(Command::Do(Action::Sleep)),
            KeyCode::Char('t') | KeyCode::Char('T') => Some(Command::Do(Action::Train)),
            KeyCode::Char('g') | KeyCode::Char('G') => Some(Command::Do(Action::Treat)),
            KeyCode::Char(' ') => Some(Command::Do(Action::Click)),
            KeyCode::Char('l') | KeyCode::Char('L') => Some(Command::StartLaser),
            KeyCode::Char('b') | KeyCode::Char('B') => Some(Command::StartCatch),
            KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::ResetPet),
            KeyCode::Char('h') | KeyCode::Char('H') => Some(Command::HelpToggle),
            _ => None,
        },
        SceneKind::Help => match key {
            KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H') => Some(Command::Back),
            _ => None,
        },
        SceneKind::Laser => match key {
            KeyCode::Left => Some(Command::GameMove(-1, 0)),
            KeyCode::Right => Some(Command::GameMove(1, 0)),
            KeyCode::Up => Some(Command::GameMove(0, -1)),
            KeyCode::Down => Some(Command::GameMove(0, 1)),
            KeyCode::Char(' ') => Some(Command::Zap),
            KeyCode::Esc => Some(Command::Back),
            _ => None,
        },
        SceneKind::Catch => match key {
            KeyCode::Left => Some(Command::GameMove(-1, 0)),
            KeyCode::Right => Some(Command::GameMove(1, 0)),
            KeyCode::Esc => Some(Command::Back),
            _ => None,
        },
        SceneKind::Dead => match key {
            KeyCode::Char('n') | KeyCode::Char('N') => Some(Command::NewGame),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_keys_only_work_on_the_main_scene() {
        assert_eq!(
            map_key_to_command(SceneKind::Main, KeyCode::Char('f')),
            Some(Command::Do(Action::Feed))
        );
        assert_eq!(map_key_to_command(SceneKind::Laser, KeyCode::Char('f')), None);
        assert_eq!(map_key_to_command(SceneKind::Dead, KeyCode::Char('f')), None);
    }

    #[test]
    fn quit_is_global() {
        for scene in [
            SceneKind::CharacterSelect,
            SceneKind::Main,
            SceneKind::Help,
            SceneKind::Laser,
            SceneKind::Catch,
            SceneKind::Dead,
        ] {
            assert_eq!(map_key_to_command(scene, KeyCode::Char('q')), Some(Command::Quit));
        }
    }

    #[test]
    fn space_means_pet_or_zap_depending_on_scene() {
        assert_eq!(
            map_key_to_command(SceneKind::Main, KeyCode::Char(' ')),
            Some(Command::Do(Action::Click))
        );
        assert_eq!(map_key_to_command(SceneKind::Laser, KeyCode::Char(' ')), Some(Command::Zap));
    }
}
