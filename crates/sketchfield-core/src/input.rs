//! Pointer events delivered by the host.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// What a tool sees of a pointer event: where it happened and which
/// modifiers were held.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerInput {
    /// Position in surface coordinates.
    pub position: Point,
    pub button: MouseButton,
    pub modifiers: Modifiers,
}

impl PointerInput {
    /// Primary-button input without modifiers.
    pub fn at(position: Point) -> Self {
        Self {
            position,
            button: MouseButton::Left,
            modifiers: Modifiers::default(),
        }
    }
}

/// Pointer event type for unified mouse/touch handling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down(PointerInput),
    Move(PointerInput),
    Up(PointerInput),
    /// The pointer left the surface.
    Leave(PointerInput),
}

impl PointerEvent {
    pub fn down(x: f64, y: f64) -> Self {
        Self::Down(PointerInput::at(Point::new(x, y)))
    }

    pub fn moved(x: f64, y: f64) -> Self {
        Self::Move(PointerInput::at(Point::new(x, y)))
    }

    pub fn up(x: f64, y: f64) -> Self {
        Self::Up(PointerInput::at(Point::new(x, y)))
    }

    pub fn leave(x: f64, y: f64) -> Self {
        Self::Leave(PointerInput::at(Point::new(x, y)))
    }

    /// The payload shared by every variant.
    pub fn input(&self) -> &PointerInput {
        match self {
            Self::Down(input) | Self::Move(input) | Self::Up(input) | Self::Leave(input) => input,
        }
    }
}
