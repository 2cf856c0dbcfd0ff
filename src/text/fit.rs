//! Fixed-box text rendering that shrinks overflowing text to fit.
//!
//! Every line is measured at the card font size. When the widest line (plus a small pad)
//! and the stacked line pitch both fit the box, lines are drawn at natural size. Otherwise
//! the lines are drawn at natural size into a larger offscreen buffer which is then
//! stretched to exactly fill the box. Either way nothing is painted outside the box.

use crate::{
    assets::font::FontFace,
    foundation::{
        core::{Affine, Rect, Rgba8, Vec2},
        error::{CardError, CardResult},
    },
    render::cpu::{affine_to_cpu, color_to_cpu, fill_image, pixmap_paint, surface_dim},
    text::layout::{TextBrushRgba8, TextLayoutEngine},
};

/// Vertical distance between consecutive line middles.
pub const LINE_PITCH: f64 = 40.0;
/// Middle of the first line, measured from the top of the box.
pub const FIRST_LINE_MIDDLE: f64 = 20.0;
/// Extra width added to the widest measured line.
pub const WIDTH_PAD: f64 = 4.0;

/// Font size, colors and outline of card text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in pixels.
    pub size_px: f32,
    /// Glyph fill color.
    pub fill: Rgba8,
    /// Outline color drawn beneath the fill.
    pub stroke: Rgba8,
    /// Outline width in pixels (round joins and caps).
    pub stroke_width: f64,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size_px: 28.0,
            fill: Rgba8::opaque(255, 255, 255),
            stroke: Rgba8::opaque(0x51, 0x51, 0x51),
            stroke_width: 6.0,
        }
    }
}

/// Line width measurement used to plan a layout.
pub trait TextMeasure {
    /// Advance width of one line (no line breaks inside).
    fn measure_line(&mut self, line: &str) -> CardResult<f64>;
}

/// How a string is placed into its box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TextFit {
    /// Nothing to draw.
    Empty,
    /// Drawn at natural size, clipped to the box.
    Direct,
    /// Drawn into a `buffer_width` x `buffer_height` buffer, then stretched onto the box.
    Scaled {
        /// Offscreen buffer width in pixels.
        buffer_width: u32,
        /// Offscreen buffer height in pixels.
        buffer_height: u32,
    },
}

/// Measured layout of a string against a box.
#[derive(Clone, Debug, PartialEq)]
pub struct TextPlan<'a> {
    /// Lines in order.
    pub lines: Vec<&'a str>,
    /// Widest line plus [`WIDTH_PAD`].
    pub natural_width: f64,
    /// Line count times [`LINE_PITCH`].
    pub natural_height: f64,
    /// Chosen placement.
    pub fit: TextFit,
}

/// Split on `\r\n`, `\n` or `\r`. An empty string has no lines.
pub fn split_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    let bytes = text.as_bytes();
    let mut out = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\r' => {
                out.push(&text[start..i]);
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            }
            b'\n' => {
                out.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    out.push(&text[start..]);
    out
}

/// Measure `text` and decide between direct and scaled placement in `bounds`.
pub fn plan_text<'a, M: TextMeasure + ?Sized>(
    measure: &mut M,
    bounds: Rect,
    text: &'a str,
) -> CardResult<TextPlan<'a>> {
    let lines = split_lines(text);
    if lines.is_empty() {
        return Ok(TextPlan {
            lines,
            natural_width: 0.0,
            natural_height: 0.0,
            fit: TextFit::Empty,
        });
    }

    let mut widest = 0.0f64;
    for line in &lines {
        widest = widest.max(measure.measure_line(line)?);
    }
    let natural_width = widest + WIDTH_PAD;
    let natural_height = lines.len() as f64 * LINE_PITCH;

    let fit = if natural_width > bounds.width() || natural_height > bounds.height() {
        TextFit::Scaled {
            buffer_width: natural_width.max(bounds.width()).ceil() as u32,
            buffer_height: natural_height.max(bounds.height()).ceil() as u32,
        }
    } else {
        TextFit::Direct
    };

    Ok(TextPlan {
        lines,
        natural_width,
        natural_height,
        fit,
    })
}

/// Draws strings into fixed boxes with the card text style.
pub struct TextFitRenderer {
    engine: TextLayoutEngine,
    font: vello_cpu::peniko::FontData,
    style: TextStyle,
}

impl std::fmt::Debug for TextFitRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextFitRenderer")
            .field("engine", &self.engine)
            .field("style", &self.style)
            .finish()
    }
}

impl TextMeasure for TextFitRenderer {
    fn measure_line(&mut self, line: &str) -> CardResult<f64> {
        let shaped = self.engine.shape_line(line, self.style.size_px, self.brush())?;
        Ok(f64::from(shaped.width))
    }
}

impl TextFitRenderer {
    /// Build a renderer for `face` with `style`.
    pub fn new(face: &FontFace, style: TextStyle) -> CardResult<Self> {
        if !(style.stroke_width.is_finite() && style.stroke_width >= 0.0) {
            return Err(CardError::validation("stroke width must be finite and >= 0"));
        }
        let engine = TextLayoutEngine::new(face)?;
        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(face.bytes.as_ref().clone()),
            face.index,
        );
        Ok(Self {
            engine,
            font,
            style,
        })
    }

    /// Active style.
    pub fn style(&self) -> TextStyle {
        self.style
    }

    fn brush(&self) -> TextBrushRgba8 {
        let c = self.style.fill;
        TextBrushRgba8 {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }

    /// Draw `text` into `bounds` on `ctx` and report the placement used.
    pub fn draw(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        bounds: Rect,
        text: &str,
    ) -> CardResult<TextFit> {
        let plan = plan_text(self, bounds, text)?;
        let (buffer_width, buffer_height) = match plan.fit {
            TextFit::Empty => return Ok(TextFit::Empty),
            TextFit::Direct => (bounds.width().ceil() as u32, bounds.height().ceil() as u32),
            TextFit::Scaled {
                buffer_width,
                buffer_height,
            } => (buffer_width, buffer_height),
        };

        let pixmap = self.render_lines(&plan.lines, buffer_width, buffer_height)?;
        let (bw, bh) = (f64::from(buffer_width), f64::from(buffer_height));
        let stretch = Affine::translate(Vec2::new(bounds.x0, bounds.y0))
            * Affine::scale_non_uniform(bounds.width() / bw, bounds.height() / bh);
        fill_image(
            ctx,
            pixmap_paint(pixmap),
            stretch,
            Rect::new(0.0, 0.0, bw, bh),
        );
        Ok(plan.fit)
    }

    /// Draw `lines` on the line pitch into a transparent `width` x `height` pixmap.
    fn render_lines(
        &mut self,
        lines: &[&str],
        width: u32,
        height: u32,
    ) -> CardResult<vello_cpu::Pixmap> {
        if width == 0 || height == 0 {
            return Err(CardError::render("text box has zero size"));
        }
        let w = surface_dim(width, "text buffer width")?;
        let h = surface_dim(height, "text buffer height")?;
        let mut buf = vello_cpu::RenderContext::new(w, h);
        for (i, line) in lines.iter().enumerate() {
            let middle = FIRST_LINE_MIDDLE + i as f64 * LINE_PITCH;
            self.draw_line(&mut buf, WIDTH_PAD / 2.0, middle, line)?;
        }
        buf.flush();
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        buf.render_to_pixmap(&mut pixmap);
        Ok(pixmap)
    }

    /// Outline then fill one line with its em-box middle at `middle_y`.
    fn draw_line(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        x: f64,
        middle_y: f64,
        line: &str,
    ) -> CardResult<()> {
        let shaped = self
            .engine
            .shape_line(line, self.style.size_px, self.brush())?;
        if shaped.glyphs.is_empty() {
            return Ok(());
        }
        let dy = shaped.middle_baseline_shift(middle_y as f32);
        let x = x as f32;
        let glyphs = || {
            shaped.glyphs.iter().map(move |g| vello_cpu::Glyph {
                id: g.id,
                x: x + g.x,
                y: g.y + dy,
            })
        };

        ctx.set_transform(affine_to_cpu(Affine::IDENTITY));
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        ctx.set_stroke(
            vello_cpu::kurbo::Stroke::new(self.style.stroke_width)
                .with_join(vello_cpu::kurbo::Join::Round)
                .with_caps(vello_cpu::kurbo::Cap::Round),
        );
        ctx.set_paint(color_to_cpu(self.style.stroke));
        ctx.glyph_run(&self.font)
            .font_size(self.style.size_px)
            .stroke_glyphs(glyphs());

        ctx.set_paint(color_to_cpu(self.style.fill));
        ctx.glyph_run(&self.font)
            .font_size(self.style.size_px)
            .fill_glyphs(glyphs());
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/fit.rs"]
mod tests;
