//! Editing session over one source image.
//!
//! [`EditorSession`] holds the current selection snapshot and replaces it with
//! the output of the pure selection functions on every edit. Once a selection
//! is isolated the cutout is kept as a [`CroppedArtifact`] and selection edits are
//! rejected until [`EditorSession::reset`].

use tracing::{debug, info};

use crate::buffer::{PixelBuffer, Point};
use crate::composite::preview::{render_preview, PreviewLayers, ToolPreview};
use crate::composite::text::{draw_texts_scaled, overlay_text, AppliedText};
use crate::composite::crop;
use crate::config::EditorSettings;
use crate::error::{CutoutError, CutoutResult};
use crate::export::{encode_png, svg};
use crate::filters::{feather_with_mode, scale_bilinear};
use crate::selection::{
    brush_radius, combine_with_current, flood_select, invert, mask_bounds, stamp, stroke, Bounds, SelectionMask,
    SelectionMode,
};

/// Isolated selection: the cropped RGBA image and where it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct CroppedArtifact {
    pub image: PixelBuffer,
    pub bounds: Bounds,
}

impl CroppedArtifact {
    /// Top-left corner of the crop in source coordinates.
    pub fn origin(&self) -> Point {
        self.bounds.origin()
    }
}

pub struct EditorSession {
    source: PixelBuffer,
    settings: EditorSettings,
    mask: Option<SelectionMask>,
    texts: Vec<AppliedText>,
    text_position: Option<Point>,
    last_stroke_point: Option<Point>,
    artifact: Option<CroppedArtifact>,
}

impl EditorSession {
    pub fn new(source: PixelBuffer) -> Self {
        Self {
            source,
            settings: EditorSettings::default(),
            mask: None,
            texts: Vec::new(),
            text_position: None,
            last_stroke_point: None,
            artifact: None,
        }
    }

    /// Start a session with custom settings. Fails if they are out of range.
    pub fn with_settings(source: PixelBuffer, settings: EditorSettings) -> CutoutResult<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            ..Self::new(source)
        })
    }

    pub fn source(&self) -> &PixelBuffer {
        &self.source
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    /// Replace the settings after validating them.
    pub fn set_settings(&mut self, settings: EditorSettings) -> CutoutResult<()> {
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    /// Current selection, if any.
    pub fn mask(&self) -> Option<&SelectionMask> {
        self.mask.as_ref()
    }

    /// Bounds of the current selection, `None` when nothing is selected.
    pub fn bounds(&self) -> Option<Bounds> {
        self.mask.as_ref().and_then(mask_bounds)
    }

    pub fn texts(&self) -> &[AppliedText] {
        &self.texts
    }

    pub fn text_position(&self) -> Option<Point> {
        self.text_position
    }

    /// The isolated cutout, once [`isolate`](Self::isolate) has run.
    pub fn artifact(&self) -> Option<&CroppedArtifact> {
        self.artifact.as_ref()
    }

    pub fn is_locked(&self) -> bool {
        self.artifact.is_some()
    }

    fn ensure_editable(&self) -> CutoutResult<()> {
        if self.is_locked() {
            return Err(CutoutError::SelectionLocked);
        }
        Ok(())
    }

    /// Flood-select from `seed` and combine with the current mask according to
    /// the selection mode.
    #[tracing::instrument(skip(self), fields(mode = ?self.settings.selection_mode))]
    pub fn magic_wand(&mut self, seed: Point) -> CutoutResult<&SelectionMask> {
        self.ensure_editable()?;
        let fresh = flood_select(&self.source, seed, self.settings.tolerance);
        let combined = combine_with_current(self.mask.as_ref(), fresh, self.settings.selection_mode);
        debug!(selected = combined.count(), "selection updated");
        Ok(&*self.mask.insert(combined))
    }

    /// Start a brush stroke with a stamp at `point`.
    ///
    /// In `New` mode, or without a current mask, the stroke starts from an
    /// empty mask. `Subtract` erases, the other modes paint.
    pub fn begin_stroke(&mut self, point: Point) -> CutoutResult<()> {
        self.ensure_editable()?;
        let mode = self.settings.selection_mode;
        let base = match (&self.mask, mode) {
            (Some(mask), SelectionMode::Add | SelectionMode::Subtract) => mask.clone(),
            _ => SelectionMask::empty(self.source.width(), self.source.height()),
        };
        let radius = brush_radius(self.settings.brush_size);
        self.mask = Some(stamp(&base, point, radius, mode.paints()));
        self.last_stroke_point = Some(point);
        Ok(())
    }

    /// Extend the active stroke to `point`, filling the gap from the previous
    /// sample. Ignored when no stroke is active.
    pub fn continue_stroke(&mut self, point: Point) -> CutoutResult<()> {
        self.ensure_editable()?;
        let (Some(prev), Some(mask)) = (self.last_stroke_point, self.mask.as_ref()) else {
            return Ok(());
        };
        let radius = brush_radius(self.settings.brush_size);
        self.mask = Some(stroke(mask, prev, point, radius, self.settings.selection_mode.paints()));
        self.last_stroke_point = Some(point);
        Ok(())
    }

    pub fn end_stroke(&mut self) {
        self.last_stroke_point = None;
    }

    pub fn invert_selection(&mut self) -> CutoutResult<()> {
        self.ensure_editable()?;
        let mask = self.mask.as_ref().ok_or(CutoutError::NoSelection)?;
        self.mask = Some(invert(mask));
        Ok(())
    }

    /// Pin the pending text at `point`.
    pub fn place_text(&mut self, point: Point) {
        self.text_position = Some(point);
    }

    /// Commit the pending text at its placement. Returns `false` when there is
    /// no content or no placement. The placement is cleared either way.
    pub fn apply_text(&mut self) -> CutoutResult<bool> {
        let Some(pos) = self.text_position.take() else {
            return Ok(false);
        };
        let style = &self.settings.text;
        if style.content.is_empty() {
            return Ok(false);
        }
        self.texts.push(AppliedText::new(style.content.clone(), &style.color, style.size, pos)?);
        Ok(true)
    }

    /// Preview of the text tool: pinned text when placed, otherwise the text
    /// following `cursor`.
    pub fn text_tool_preview(&self, cursor: Option<Point>) -> CutoutResult<Option<ToolPreview>> {
        let (pos, placed) = match (self.text_position, cursor) {
            (Some(pos), _) => (pos, true),
            (None, Some(pos)) => (pos, false),
            (None, None) => return Ok(None),
        };
        let style = &self.settings.text;
        let text = AppliedText::new(style.content.clone(), &style.color, style.size, pos)?;
        Ok(Some(ToolPreview::Text { text, placed }))
    }

    /// Feather the selection, crop it to its bounds and lock editing.
    #[tracing::instrument(skip(self), fields(radius = self.settings.edge_smoothing))]
    pub fn isolate(&mut self) -> CutoutResult<&CroppedArtifact> {
        self.ensure_editable()?;
        let mask = self.mask.as_ref().ok_or(CutoutError::NoSelection)?;
        let bounds = mask_bounds(mask).ok_or(CutoutError::NoSelection)?;

        let feathered = feather_with_mode(mask, self.settings.edge_smoothing as usize, self.settings.edge_mode);
        let image = crop(&self.source, &feathered, bounds);
        info!(?bounds, "selection isolated");

        self.last_stroke_point = None;
        Ok(&*self.artifact.insert(CroppedArtifact { image, bounds }))
    }

    fn require_artifact(&self) -> CutoutResult<&CroppedArtifact> {
        self.artifact.as_ref().ok_or(CutoutError::NotIsolated)
    }

    /// The cutout with all applied texts drawn on top.
    pub fn export_raster(&self) -> CutoutResult<PixelBuffer> {
        let cutout = self.require_artifact()?;
        Ok(overlay_text(&cutout.image, &self.texts, cutout.origin()))
    }

    pub fn export_png(&self) -> CutoutResult<Vec<u8>> {
        encode_png(&self.export_raster()?)
    }

    /// SVG document clipping the cutout to its traced contour.
    #[tracing::instrument(skip(self))]
    pub fn export_svg(&self) -> CutoutResult<String> {
        let cutout = self.require_artifact()?;
        svg::export_svg(&cutout.image, &self.texts, cutout.origin())
    }

    /// Full-image preview with texts, selection tint, bounds outline and the
    /// given tool preview.
    pub fn render_preview(&self, tool: Option<&ToolPreview>) -> PixelBuffer {
        render_preview(&PreviewLayers {
            base: &self.source,
            texts: &self.texts,
            mask: self.mask.as_ref(),
            bounds: self.bounds(),
            selection_opacity: self.settings.selection_opacity,
            tool,
        })
    }

    /// The cutout scaled by `preview_scale` with texts drawn at scaled offsets.
    pub fn render_cropped_preview(&self) -> CutoutResult<PixelBuffer> {
        let cutout = self.require_artifact()?;
        let scale = self.settings.preview_scale;
        let mut frame = scale_bilinear(&cutout.image, scale);
        draw_texts_scaled(&mut frame, &self.texts, cutout.origin(), scale);
        Ok(frame)
    }

    /// Drop selection, texts and cutout and restore default settings.
    pub fn reset(&mut self) {
        self.settings = EditorSettings::default();
        self.mask = None;
        self.texts.clear();
        self.text_position = None;
        self.last_stroke_point = None;
        self.artifact = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Route session spans and events to the test output.
    fn init_logging() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    }

    fn split_image() -> PixelBuffer {
        let mut image = PixelBuffer::new(10, 10);
        for y in 0..10 {
            for x in 0..10 {
                let rgba = if x < 5 { [255, 0, 0, 255] } else { [0, 0, 255, 255] };
                image.set_pixel(x, y, rgba);
            }
        }
        image
    }

    fn session_with(mode: SelectionMode) -> EditorSession {
        let mut session = EditorSession::new(split_image());
        session.settings.selection_mode = mode;
        session
    }

    #[test]
    fn test_uniform_image_wand_selects_everything() {
        let mut session = EditorSession::new(PixelBuffer::filled(10, 10, [40, 80, 120, 255]));
        let mut settings = session.settings().clone();
        settings.tolerance = 0;
        session.set_settings(settings).unwrap();

        assert_eq!(session.magic_wand(Point::new(5, 5)).unwrap().count(), 100);
        assert_eq!(
            session.bounds(),
            Some(Bounds {
                min_x: 0,
                min_y: 0,
                width: 10,
                height: 10
            })
        );
    }

    #[test]
    fn test_split_image_wand_stops_at_color_edge() {
        let mut session = EditorSession::new(split_image());
        let mut settings = session.settings().clone();
        settings.tolerance = 10;
        session.set_settings(settings).unwrap();

        let mask = session.magic_wand(Point::new(2, 2)).unwrap();
        assert_eq!(mask.count(), 50);
        assert!(mask.get(4, 9) && !mask.get(5, 0));
        assert_eq!(
            session.bounds(),
            Some(Bounds {
                min_x: 0,
                min_y: 0,
                width: 5,
                height: 10
            })
        );
    }

    #[test]
    fn test_wand_modes_combine() {
        init_logging();
        let mut session = session_with(SelectionMode::New);
        session.magic_wand(Point::new(1, 1)).unwrap();
        session.settings.selection_mode = SelectionMode::Add;
        assert_eq!(session.magic_wand(Point::new(8, 8)).unwrap().count(), 100);
        session.settings.selection_mode = SelectionMode::Subtract;
        let mask = session.magic_wand(Point::new(8, 8)).unwrap();
        assert_eq!(mask.count(), 50);
        assert!(mask.get(0, 0) && !mask.get(9, 9));
    }

    #[test]
    fn test_brush_stamp_in_new_mode() {
        let mut session = session_with(SelectionMode::New);
        let mut settings = session.settings().clone();
        settings.brush_size = 8;
        session.set_settings(settings).unwrap();

        session.begin_stroke(Point::new(5, 5)).unwrap();
        session.end_stroke();
        let mask = session.mask().unwrap();
        for y in 0..10 {
            for x in 0..10 {
                let d = (x as i32 - 5).pow(2) + (y as i32 - 5).pow(2);
                assert_eq!(mask.get(x, y), d <= 16, "({x},{y})");
            }
        }
    }

    #[test]
    fn test_subtract_stroke_erases_from_full_selection() {
        let mut session = session_with(SelectionMode::New);
        session.settings.tolerance = 100;
        session.settings.brush_size = 2;
        // Red and blue are ~360 apart, so select both halves through Add.
        session.magic_wand(Point::new(0, 0)).unwrap();
        session.settings.selection_mode = SelectionMode::Add;
        session.magic_wand(Point::new(9, 9)).unwrap();
        assert_eq!(session.mask().unwrap().count(), 100);

        session.settings.selection_mode = SelectionMode::Subtract;
        session.begin_stroke(Point::new(1, 5)).unwrap();
        session.continue_stroke(Point::new(8, 5)).unwrap();
        session.end_stroke();
        let mask = session.mask().unwrap();
        for x in 1..=8 {
            assert!(!mask.get(x, 5), "x={x}");
        }
        assert!(mask.get(0, 0));
    }

    #[test]
    fn test_continue_without_begin_is_ignored() {
        let mut session = session_with(SelectionMode::New);
        session.continue_stroke(Point::new(3, 3)).unwrap();
        assert!(session.mask().is_none());
    }

    #[test]
    fn test_invert_requires_mask() {
        let mut session = session_with(SelectionMode::New);
        assert_eq!(session.invert_selection(), Err(CutoutError::NoSelection));
        session.magic_wand(Point::new(2, 2)).unwrap();
        session.invert_selection().unwrap();
        let mask = session.mask().unwrap();
        assert!(!mask.get(0, 0) && mask.get(9, 0));
    }

    #[test]
    fn test_isolate_crops_to_bounds_and_locks() {
        init_logging();
        let mut session = session_with(SelectionMode::New);
        session.settings.edge_smoothing = 0;
        session.magic_wand(Point::new(2, 2)).unwrap();

        let cutout = session.isolate().unwrap();
        assert_eq!((cutout.image.width(), cutout.image.height()), (5, 10));
        assert_eq!(cutout.image.pixel(0, 0), [255, 0, 0, 255]);

        assert_eq!(session.magic_wand(Point::new(8, 8)).unwrap_err(), CutoutError::SelectionLocked);
        assert_eq!(session.begin_stroke(Point::new(1, 1)), Err(CutoutError::SelectionLocked));
        assert_eq!(session.invert_selection(), Err(CutoutError::SelectionLocked));
    }

    #[test]
    fn test_isolate_feathers_edges() {
        let mut session = EditorSession::new(PixelBuffer::filled(20, 20, [10, 10, 10, 255]));
        session.settings.edge_smoothing = 3;
        session.settings.brush_size = 12;
        session.begin_stroke(Point::new(10, 10)).unwrap();
        session.end_stroke();

        let cutout = session.isolate().unwrap();
        let (w, h) = (cutout.image.width(), cutout.image.height());
        let center = cutout.image.alpha(w / 2, h / 2);
        let rim = cutout.image.alpha(w / 2, 0);
        assert!(center > rim, "center {center} rim {rim}");
        assert!(rim < 255);
    }

    #[test]
    fn test_isolate_without_selection() {
        let mut session = session_with(SelectionMode::New);
        assert_eq!(session.isolate().unwrap_err(), CutoutError::NoSelection);

        // A mask that became empty also has nothing to isolate.
        session.magic_wand(Point::new(2, 2)).unwrap();
        session.settings.selection_mode = SelectionMode::Subtract;
        session.magic_wand(Point::new(2, 2)).unwrap();
        assert_eq!(session.isolate().unwrap_err(), CutoutError::NoSelection);
    }

    #[test]
    fn test_exports_require_isolate() {
        let session = session_with(SelectionMode::New);
        assert_eq!(session.export_raster(), Err(CutoutError::NotIsolated));
        assert_eq!(session.export_svg(), Err(CutoutError::NotIsolated));
        assert_eq!(session.render_cropped_preview(), Err(CutoutError::NotIsolated));
    }

    #[test]
    fn test_text_placement_and_export_offset() {
        let mut session = EditorSession::new(PixelBuffer::filled(40, 40, [0, 0, 0, 255]));
        session.settings.edge_smoothing = 0;
        session.settings.brush_size = 40;
        session.settings.text.content = "T".to_string();
        session.settings.text.size = 8;

        assert!(!session.apply_text().unwrap());
        session.place_text(Point::new(12, 14));
        assert!(session.apply_text().unwrap());
        assert_eq!(session.text_position(), None);
        assert_eq!(session.texts().len(), 1);

        session.begin_stroke(Point::new(20, 20)).unwrap();
        session.end_stroke();
        let origin = session.isolate().unwrap().origin();
        assert_eq!(origin, Point::new(0, 0));

        let raster = session.export_raster().unwrap();
        // 'T' has ink across its first glyph row, which lands on y = 14.
        assert!((0..raster.width()).any(|x| raster.pixel(x, 14) == [255, 255, 255, 255]));
        assert!((0..raster.width()).all(|x| raster.pixel(x, 13) != [255, 255, 255, 255]));

        let png = session.export_png().unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }

    #[test]
    fn test_svg_export_after_isolate() {
        init_logging();
        let mut session = session_with(SelectionMode::New);
        session.settings.edge_smoothing = 0;
        session.magic_wand(Point::new(7, 3)).unwrap();
        session.isolate().unwrap();

        let svg = session.export_svg().unwrap();
        assert!(svg.contains(r#"width="5" height="10""#));
        assert!(svg.contains(r#"<path d="M 0,0 L 1,0"#));
    }

    #[test]
    fn test_cropped_preview_scales() {
        let mut session = session_with(SelectionMode::New);
        session.settings.edge_smoothing = 0;
        session.settings.preview_scale = 2.0;
        session.magic_wand(Point::new(2, 2)).unwrap();
        session.isolate().unwrap();

        let preview = session.render_cropped_preview().unwrap();
        assert_eq!((preview.width(), preview.height()), (10, 20));
        assert_eq!(preview.pixel(5, 10), [255, 0, 0, 255]);
    }

    #[test]
    fn test_preview_tool_and_tint() {
        let mut session = session_with(SelectionMode::New);
        assert_eq!(session.render_preview(None), *session.source());

        session.magic_wand(Point::new(2, 2)).unwrap();
        let frame = session.render_preview(None);
        assert_ne!(frame.pixel(2, 2), [255, 0, 0, 255]);
        assert_eq!(frame.pixel(8, 8), [0, 0, 255, 255]);

        assert_eq!(session.text_tool_preview(None).unwrap(), None);
        match session.text_tool_preview(Some(Point::new(1, 1))).unwrap() {
            Some(ToolPreview::Text { placed, text }) => {
                assert!(!placed);
                assert_eq!(text.pos, Point::new(1, 1));
            }
            other => panic!("unexpected {other:?}"),
        }
        session.place_text(Point::new(3, 3));
        assert!(matches!(
            session.text_tool_preview(Some(Point::new(1, 1))).unwrap(),
            Some(ToolPreview::Text { placed: true, .. })
        ));
    }

    #[test]
    fn test_set_settings_validates() {
        let mut session = session_with(SelectionMode::New);
        let mut bad = session.settings().clone();
        bad.brush_size = 0;
        assert!(matches!(
            session.set_settings(bad),
            Err(CutoutError::InvalidSetting { name: "brush_size", .. })
        ));
        assert_eq!(session.settings().brush_size, 30);
    }

    #[test]
    fn test_with_settings_validates() {
        let bad = EditorSettings {
            brush_size: u32::MAX,
            ..Default::default()
        };
        assert!(matches!(
            EditorSession::with_settings(split_image(), bad),
            Err(CutoutError::InvalidSetting { name: "brush_size", .. })
        ));

        let good = EditorSettings {
            tolerance: 0,
            ..Default::default()
        };
        let session = EditorSession::with_settings(split_image(), good).unwrap();
        assert_eq!(session.settings().tolerance, 0);
    }

    #[test]
    fn test_reset_unlocks() {
        let mut session = session_with(SelectionMode::Add);
        session.magic_wand(Point::new(2, 2)).unwrap();
        session.place_text(Point::new(1, 1));
        session.apply_text().unwrap();
        session.isolate().unwrap();

        session.reset();
        assert!(session.mask().is_none());
        assert!(session.texts().is_empty());
        assert!(session.artifact().is_none());
        assert_eq!(session.settings(), &EditorSettings::default());
        assert!(session.magic_wand(Point::new(8, 8)).is_ok());
    }
}
