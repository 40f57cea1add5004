//! Tool system for the sketch surface.
//!
//! Each tool is a strategy over the same small capability set. Tools only
//! ever touch the surface; history is derived later from the surface's
//! lifecycle events.

mod pencil;
mod select;
mod shape;

pub use pencil::PencilTool;
pub use select::SelectTool;
pub use shape::{CircleTool, LineTool, RectangleTool};

use crate::error::{SketchError, SketchResult};
use crate::input::{MouseButton, PointerEvent, PointerInput};
use crate::shapes::ShapeStyle;
use crate::surface::Surface;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hit tolerance, in surface pixels, for picking objects.
pub const HIT_TOLERANCE: f64 = 4.0;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    Select,
    #[default]
    Pencil,
    Line,
    Rectangle,
    Circle,
}

impl ToolKind {
    pub const ALL: [ToolKind; 5] = [
        ToolKind::Select,
        ToolKind::Pencil,
        ToolKind::Line,
        ToolKind::Rectangle,
        ToolKind::Circle,
    ];

    /// Name used by hosts and configuration.
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::Pencil => "pencil",
            ToolKind::Line => "line",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Circle => "circle",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ToolKind {
    type Err = SketchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SketchError::UnknownTool(s.to_string()))
    }
}

/// Drawing configuration handed to tools.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolOptions {
    /// Stroke, fill and opacity for new shapes and the pencil brush.
    pub style: ShapeStyle,
}

/// Capability contract shared by every tool. Pointer handlers default to no-ops.
pub trait Tool {
    /// Apply the surface configuration this tool needs.
    fn configure(&mut self, surface: &mut dyn Surface, options: &ToolOptions);

    fn on_pointer_down(&mut self, _surface: &mut dyn Surface, _input: &PointerInput) -> SketchResult<()> {
        Ok(())
    }

    fn on_pointer_move(&mut self, _surface: &mut dyn Surface, _input: &PointerInput) -> SketchResult<()> {
        Ok(())
    }

    fn on_pointer_up(&mut self, _surface: &mut dyn Surface, _input: &PointerInput) -> SketchResult<()> {
        Ok(())
    }

    fn on_pointer_leave(&mut self, _surface: &mut dyn Surface, _input: &PointerInput) -> SketchResult<()> {
        Ok(())
    }

    /// Abandon any gesture in progress (the tool is being switched away).
    fn cancel(&mut self, _surface: &mut dyn Surface) -> SketchResult<()> {
        Ok(())
    }
}

/// Owns one instance per tool and routes pointer events to the active one.
#[derive(Debug, Default)]
pub struct ToolManager {
    current: Option<ToolKind>,
    options: ToolOptions,
    select: SelectTool,
    pencil: PencilTool,
    line: LineTool,
    rectangle: RectangleTool,
    circle: CircleTool,
}

impl ToolManager {
    /// Create a tool manager with no active tool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently active tool, if any.
    pub fn current_tool(&self) -> Option<ToolKind> {
        self.current
    }

    pub fn options(&self) -> &ToolOptions {
        &self.options
    }

    fn tool_mut(&mut self, kind: ToolKind) -> &mut dyn Tool {
        match kind {
            ToolKind::Select => &mut self.select,
            ToolKind::Pencil => &mut self.pencil,
            ToolKind::Line => &mut self.line,
            ToolKind::Rectangle => &mut self.rectangle,
            ToolKind::Circle => &mut self.circle,
        }
    }

    /// Make `kind` the active tool (or none) and configure the surface for it.
    pub fn set_tool(&mut self, kind: Option<ToolKind>, surface: &mut dyn Surface) -> SketchResult<()> {
        if let Some(previous) = self.current {
            self.tool_mut(previous).cancel(surface)?;
        }
        self.current = kind;
        self.configure_current(surface);
        Ok(())
    }

    /// Replace the drawing options and reconfigure the active tool.
    pub fn configure(&mut self, options: ToolOptions, surface: &mut dyn Surface) {
        self.options = options;
        self.configure_current(surface);
    }

    fn configure_current(&mut self, surface: &mut dyn Surface) {
        if let Some(kind) = self.current {
            let options = self.options.clone();
            self.tool_mut(kind).configure(surface, &options);
        }
    }

    /// Route a pointer event to the active tool. Without one this does nothing.
    pub fn dispatch(&mut self, event: &PointerEvent, surface: &mut dyn Surface) -> SketchResult<()> {
        let Some(kind) = self.current else {
            log::trace!("No active tool; ignoring {:?}", event);
            return Ok(());
        };
        if let PointerEvent::Down(input) = event {
            if input.button != MouseButton::Left {
                log::trace!("Ignoring {:?} button press", input.button);
                return Ok(());
            }
        }
        let tool = self.tool_mut(kind);
        match event {
            PointerEvent::Down(input) => tool.on_pointer_down(surface, input),
            PointerEvent::Move(input) => tool.on_pointer_move(surface, input),
            PointerEvent::Up(input) => tool.on_pointer_up(surface, input),
            PointerEvent::Leave(input) => tool.on_pointer_leave(surface, input),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;

    #[test]
    fn test_tool_names_round_trip() {
        for kind in ToolKind::ALL {
            assert_eq!(kind.name().parse::<ToolKind>().unwrap(), kind);
        }
        assert_eq!("Rectangle".parse::<ToolKind>().unwrap(), ToolKind::Rectangle);
    }

    #[test]
    fn test_unknown_tool_name() {
        let err = "eraser".parse::<ToolKind>().unwrap_err();
        assert!(matches!(err, SketchError::UnknownTool(name) if name == "eraser"));
    }

    #[test]
    fn test_tool_kind_serde_lowercase() {
        let json = serde_json::to_string(&ToolKind::Circle).unwrap();
        assert_eq!(json, "\"circle\"");
    }

    #[test]
    fn test_tool_selection() {
        let mut canvas = Canvas::new();
        let mut tm = ToolManager::new();
        assert_eq!(tm.current_tool(), None);

        tm.set_tool(Some(ToolKind::Pencil), &mut canvas).unwrap();
        assert_eq!(tm.current_tool(), Some(ToolKind::Pencil));
        assert!(canvas.drawing_mode());

        tm.set_tool(Some(ToolKind::Select), &mut canvas).unwrap();
        assert!(!canvas.drawing_mode());
        assert!(canvas.selection_enabled());
    }

    #[test]
    fn test_dispatch_without_tool_is_noop() {
        let mut canvas = Canvas::new();
        let mut tm = ToolManager::new();

        tm.dispatch(&PointerEvent::down(0.0, 0.0), &mut canvas).unwrap();
        tm.dispatch(&PointerEvent::moved(50.0, 50.0), &mut canvas).unwrap();
        tm.dispatch(&PointerEvent::up(50.0, 50.0), &mut canvas).unwrap();

        assert!(canvas.is_empty());
        assert!(canvas.drain_events().is_empty());
    }

    #[test]
    fn test_secondary_button_does_not_draw() {
        let mut canvas = Canvas::new();
        let mut tm = ToolManager::new();
        tm.set_tool(Some(ToolKind::Rectangle), &mut canvas).unwrap();

        let mut press = PointerInput::at(kurbo::Point::new(10.0, 10.0));
        press.button = MouseButton::Right;
        tm.dispatch(&PointerEvent::Down(press), &mut canvas).unwrap();
        tm.dispatch(&PointerEvent::moved(40.0, 40.0), &mut canvas).unwrap();
        tm.dispatch(&PointerEvent::up(40.0, 40.0), &mut canvas).unwrap();

        assert!(canvas.is_empty());
    }

    #[test]
    fn test_configure_reaches_active_tool() {
        let mut canvas = Canvas::new();
        let mut tm = ToolManager::new();
        tm.set_tool(Some(ToolKind::Pencil), &mut canvas).unwrap();

        let mut options = ToolOptions::default();
        options.style.stroke_width = 7.0;
        tm.configure(options, &mut canvas);

        assert!((canvas.brush().stroke_width - 7.0).abs() < f64::EPSILON);
    }
}
