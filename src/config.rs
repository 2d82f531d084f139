//! Editor settings.
//!
//! Settings are plain serde data so hosts can persist them as JSON. Missing
//! fields fall back to their defaults; [`EditorSettings::validate`] enforces the
//! hard bounds before a session accepts them.

use serde::{Deserialize, Serialize};

use crate::buffer::parse_hex_color;
use crate::composite::text::{MAX_TEXT_SIZE, MIN_TEXT_SIZE};
use crate::error::{CutoutError, CutoutResult};
use crate::filters::feather::{EdgeMode, MAX_FEATHER_RADIUS};
use crate::selection::magic_wand::MAX_TOLERANCE;
use crate::selection::SelectionMode;

pub const MIN_BRUSH_SIZE: u32 = 2;
pub const MAX_BRUSH_SIZE: u32 = 100;
pub const MAX_SELECTION_OPACITY: u8 = 100;
pub const MIN_PREVIEW_SCALE: f32 = 0.1;
pub const MAX_PREVIEW_SCALE: f32 = 5.0;

/// Content and style of the text tool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    pub content: String,
    /// `#RGB`, `#RRGGBB` or `#RRGGBBAA`.
    pub color: String,
    pub size: u32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            content: "Hello World".to_string(),
            color: "#FFFFFF".to_string(),
            size: 48,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Magic wand color tolerance (0-100).
    pub tolerance: u8,
    pub selection_mode: SelectionMode,
    /// Brush diameter in pixels (2-100).
    pub brush_size: u32,
    /// Preview tint opacity in percent (0-100).
    pub selection_opacity: u8,
    /// Feather radius applied on isolate (0-30).
    pub edge_smoothing: u32,
    pub edge_mode: EdgeMode,
    pub text: TextStyle,
    /// Scale of the cropped preview (0.1-5.0).
    pub preview_scale: f32,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            tolerance: 20,
            selection_mode: SelectionMode::New,
            brush_size: 30,
            selection_opacity: 40,
            edge_smoothing: 2,
            edge_mode: EdgeMode::Truncated,
            text: TextStyle::default(),
            preview_scale: 1.0,
        }
    }
}

impl EditorSettings {
    /// Parse settings from JSON, filling in defaults for missing fields.
    pub fn from_json(json: &str) -> CutoutResult<Self> {
        let settings: Self =
            serde_json::from_str(json).map_err(|e| CutoutError::InvalidConfig(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> CutoutResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| CutoutError::InvalidConfig(e.to_string()))
    }

    /// Check every field against its hard bound. Returns the first violation.
    pub fn validate(&self) -> CutoutResult<()> {
        if self.tolerance > MAX_TOLERANCE {
            return Err(CutoutError::setting("tolerance", self.tolerance, 0u8, MAX_TOLERANCE));
        }
        if !(MIN_BRUSH_SIZE..=MAX_BRUSH_SIZE).contains(&self.brush_size) {
            return Err(CutoutError::setting("brush_size", self.brush_size, MIN_BRUSH_SIZE, MAX_BRUSH_SIZE));
        }
        if self.selection_opacity > MAX_SELECTION_OPACITY {
            return Err(CutoutError::setting(
                "selection_opacity",
                self.selection_opacity,
                0u8,
                MAX_SELECTION_OPACITY,
            ));
        }
        if self.edge_smoothing as usize > MAX_FEATHER_RADIUS {
            return Err(CutoutError::setting(
                "edge_smoothing",
                self.edge_smoothing,
                0u32,
                MAX_FEATHER_RADIUS as u32,
            ));
        }
        if !(MIN_TEXT_SIZE..=MAX_TEXT_SIZE).contains(&self.text.size) {
            return Err(CutoutError::setting("text.size", self.text.size, MIN_TEXT_SIZE, MAX_TEXT_SIZE));
        }
        if !(MIN_PREVIEW_SCALE..=MAX_PREVIEW_SCALE).contains(&self.preview_scale) {
            return Err(CutoutError::setting(
                "preview_scale",
                self.preview_scale,
                MIN_PREVIEW_SCALE,
                MAX_PREVIEW_SCALE,
            ));
        }
        parse_hex_color(&self.text.color)?;
        Ok(())
    }
}
