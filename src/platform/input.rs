//! Raw browser input -> game commands
//!
//! Pure string/number mapping so it can be tested natively.

use crate::game::{Command, InputSource};
use crate::sim::Heading;

/// Minimum swipe travel (px) on either axis
pub const MIN_SWIPE: f32 = 30.0;

/// Map a `KeyboardEvent.key` value
pub fn command_for_key(key: &str) -> Command {
    match key {
        "ArrowUp" | "w" | "W" => Command::Steer(Heading::Up, InputSource::Keyboard),
        "ArrowDown" | "s" | "S" => Command::Steer(Heading::Down, InputSource::Keyboard),
        "ArrowLeft" | "a" | "A" => Command::Steer(Heading::Left, InputSource::Keyboard),
        "ArrowRight" | "d" | "D" => Command::Steer(Heading::Right, InputSource::Keyboard),
        " " => Command::TogglePause,
        "Enter" => Command::Confirm,
        _ => Command::AnyKey,
    }
}

/// Map a touch-start/touch-end displacement. Short drags are taps, not swipes.
pub fn command_for_swipe(dx: f32, dy: f32) -> Option<Command> {
    if dx.abs() < MIN_SWIPE && dy.abs() < MIN_SWIPE {
        return None;
    }
    let heading = if dx.abs() > dy.abs() {
        if dx > 0.0 { Heading::Right } else { Heading::Left }
    } else if dy > 0.0 {
        Heading::Down
    } else {
        Heading::Up
    };
    Some(Command::Steer(heading, InputSource::Touch))
}

/// On-screen direction buttons, by element id
pub const DIRECTION_BUTTONS: [(&str, Heading); 4] = [
    ("keyboard_key_up", Heading::Up),
    ("keyboard_key_down", Heading::Down),
    ("keyboard_key_left", Heading::Left),
    ("keyboard_key_right", Heading::Right),
];

/// Button id to highlight for the current heading
pub fn active_button(heading: Heading) -> Option<&'static str> {
    DIRECTION_BUTTONS
        .iter()
        .find(|(_, h)| *h == heading)
        .map(|(id, _)| *id)
}

/// Keys the page should not scroll on
pub fn should_prevent_default(key: &str) -> bool {
    matches!(key, " " | "ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight")
}
