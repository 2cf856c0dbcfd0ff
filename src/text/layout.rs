use crate::{
    assets::font::FontFace,
    foundation::error::{CardError, CardResult},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color carried through Parley layouts.
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

/// One glyph positioned relative to the start of its line, `y` on the baseline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionedGlyph {
    /// Glyph id in the shaping font.
    pub id: u32,
    /// Horizontal pen position.
    pub x: f32,
    /// Vertical position (baseline-relative layout coordinates).
    pub y: f32,
}

/// A single shaped line of text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShapedLine {
    /// Positioned glyphs in visual order.
    pub glyphs: Vec<PositionedGlyph>,
    /// Advance width including trailing whitespace.
    pub width: f32,
    /// Baseline y in layout coordinates.
    pub baseline: f32,
    /// Distance from baseline to the top of the em box.
    pub ascent: f32,
    /// Distance from baseline to the bottom of the em box.
    pub descent: f32,
}

impl ShapedLine {
    /// Offset to add to glyph `y` so the em-box middle lands on `middle_y`.
    pub fn middle_baseline_shift(&self, middle_y: f32) -> f32 {
        middle_y + (self.ascent - self.descent) / 2.0 - self.baseline
    }
}

/// Stateful helper for shaping single lines with one registered font face.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
}

impl std::fmt::Debug for TextLayoutEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextLayoutEngine")
            .field("family_name", &self.family_name)
            .finish()
    }
}

impl TextLayoutEngine {
    /// Register `face` with a fresh Parley font context.
    pub fn new(face: &FontFace) -> CardResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(face.bytes.as_ref().clone()),
            None,
        );
        let family_id = families
            .iter()
            .find(|(_, fonts)| fonts.iter().any(|info| info.index() == face.index))
            .or_else(|| families.first())
            .map(|(id, _)| *id)
            .ok_or_else(|| CardError::font("no font families registered from font bytes"))?;

        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| CardError::font("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
        })
    }

    /// Family name used for shaping.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    /// Shape `text` as a single unwrapped line.
    pub fn shape_line(
        &mut self,
        text: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> CardResult<ShapedLine> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(CardError::validation(
                "text size_px must be finite and > 0",
            ));
        }
        if text.is_empty() {
            return Ok(ShapedLine::default());
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);

        let mut out = ShapedLine {
            width: layout.full_width(),
            ..ShapedLine::default()
        };
        if let Some(line) = layout.lines().next() {
            let m = line.metrics();
            out.baseline = m.baseline;
            out.ascent = m.ascent;
            out.descent = m.descent;
        }
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                out.glyphs
                    .extend(run.positioned_glyphs().map(|g| PositionedGlyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    }));
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/layout.rs"]
mod tests;
