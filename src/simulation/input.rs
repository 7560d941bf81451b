//! Input handling for point edits.
//!
//! Maps keyboard input to [`PointsCommand`] events.

use bevy::prelude::*;

use super::points_config::KeyBindings;

/// A request to edit the tip point set. Every manager receives it.
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointsCommand {
    /// Append a point at the beam tip
    Append,
    /// Remove the highest-indexed point
    Remove,
    /// Any other key; ignored by managers
    Other,
}

impl PointsCommand {
    /// Map a typed character: `S`/`s` appends, `L`/`l` removes.
    pub fn from_key(key: char) -> Self {
        match key {
            'S' | 's' => PointsCommand::Append,
            'L' | 'l' => PointsCommand::Remove,
            _ => PointsCommand::Other,
        }
    }

    /// Map a physical key through `bindings`.
    pub fn from_key_code(key: KeyCode, bindings: &KeyBindings) -> Self {
        if key == bindings.append {
            PointsCommand::Append
        } else if key == bindings.remove {
            PointsCommand::Remove
        } else {
            PointsCommand::Other
        }
    }
}

/// System turning just-pressed keys into point commands.
pub fn handle_points_input(
    keyboard: Option<Res<ButtonInput<KeyCode>>>,
    bindings: Res<KeyBindings>,
    mut commands: EventWriter<PointsCommand>,
) {
    let Some(keyboard) = keyboard else {
        return;
    };

    for key in keyboard.get_just_pressed() {
        let command = PointsCommand::from_key_code(*key, &bindings);
        if command != PointsCommand::Other {
            debug!("{:?} pressed: {:?}", key, command);
        }
        commands.send(command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_characters_map_case_insensitively() {
        assert_eq!(PointsCommand::from_key('S'), PointsCommand::Append);
        assert_eq!(PointsCommand::from_key('s'), PointsCommand::Append);
        assert_eq!(PointsCommand::from_key('L'), PointsCommand::Remove);
        assert_eq!(PointsCommand::from_key('l'), PointsCommand::Remove);
    }

    #[test]
    fn other_characters_are_ignored() {
        for key in ['a', 'x', ' ', '1', 'D', 'é'] {
            assert_eq!(PointsCommand::from_key(key), PointsCommand::Other);
        }
    }

    #[test]
    fn key_codes_follow_bindings() {
        let defaults = KeyBindings::default();
        assert_eq!(PointsCommand::from_key_code(KeyCode::KeyS, &defaults), PointsCommand::Append);
        assert_eq!(PointsCommand::from_key_code(KeyCode::KeyL, &defaults), PointsCommand::Remove);
        assert_eq!(PointsCommand::from_key_code(KeyCode::KeyA, &defaults), PointsCommand::Other);

        let custom = KeyBindings {
            append: KeyCode::Space,
            remove: KeyCode::Backspace,
        };
        assert_eq!(PointsCommand::from_key_code(KeyCode::KeyS, &custom), PointsCommand::Other);
        assert_eq!(PointsCommand::from_key_code(KeyCode::Space, &custom), PointsCommand::Append);
        assert_eq!(
            PointsCommand::from_key_code(KeyCode::Backspace, &custom),
            PointsCommand::Remove
        );
    }
}
