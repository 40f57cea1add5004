//! Host-facing configuration.

use crate::error::{SketchError, SketchResult};
use crate::history::DEFAULT_UNDO_STEPS;
use crate::shapes::{SerializableColor, ShapeStyle};
use crate::tools::{ToolKind, ToolOptions};
use serde::{Deserialize, Serialize};

/// Settings accepted from the host, with camelCase keys.
///
/// Every key is optional; missing ones take their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SketchConfig {
    pub line_color: String,
    pub line_width: f64,
    pub fill_color: String,
    /// Clamped to `0.0..=1.0` when applied.
    pub opacity: f64,
    /// History capacity. Only read when the controller is built.
    pub undo_steps: usize,
    /// Tool activated at start-up.
    pub tool: String,
    pub scale_on_resize: bool,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            line_color: "black".to_string(),
            line_width: 10.0,
            fill_color: "transparent".to_string(),
            opacity: 1.0,
            undo_steps: DEFAULT_UNDO_STEPS,
            tool: ToolKind::Pencil.name().to_string(),
            scale_on_resize: true,
        }
    }
}

impl SketchConfig {
    /// Parse a JSON configuration object.
    pub fn from_json(json: &str) -> SketchResult<Self> {
        serde_json::from_str(json).map_err(|e| SketchError::Config(e.to_string()))
    }

    /// Drawing style derived from the color, width and opacity settings.
    ///
    /// Unparseable colors fall back to the defaults with a warning.
    pub fn style(&self) -> ShapeStyle {
        let stroke_color = SerializableColor::parse(&self.line_color).unwrap_or_else(|| {
            log::warn!("Unrecognized line color {:?}; using black", self.line_color);
            SerializableColor::black()
        });
        let fill_color = match SerializableColor::parse(&self.fill_color) {
            Some(color) if !color.is_transparent() => Some(color),
            Some(_) => None,
            None => {
                log::warn!("Unrecognized fill color {:?}; leaving shapes unfilled", self.fill_color);
                None
            }
        };
        let opacity = if self.opacity.is_nan() {
            1.0
        } else {
            self.opacity.clamp(0.0, 1.0)
        };
        ShapeStyle {
            stroke_color,
            stroke_width: self.line_width.max(0.0),
            fill_color,
            opacity,
        }
    }

    pub fn tool_options(&self) -> ToolOptions {
        ToolOptions { style: self.style() }
    }

    /// The configured start-up tool, if the name is known.
    pub fn tool_kind(&self) -> SketchResult<ToolKind> {
        self.tool.parse()
    }
}
