use std::sync::Arc;

use crate::{
    assets::decode::PreparedImage,
    card::{fields::TextField, slot::Slot, state::CardState},
    foundation::{core::Affine, error::CardResult},
    render::{
        cpu::{clear_pixmap, fill_image, image_paint, surface_dim},
        raster::CardRaster,
    },
    text::fit::{TextFit, TextFitRenderer},
};

/// Per-pass counters, mostly useful to observe isolated failures.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Slots whose image was painted.
    pub slots_drawn: Vec<Slot>,
    /// Slots with an image that could not be placed.
    pub slots_skipped: Vec<Slot>,
    /// Fields drawn at natural size.
    pub fields_direct: Vec<TextField>,
    /// Fields drawn through the scaling buffer.
    pub fields_scaled: Vec<TextField>,
    /// Fields with text that could not be drawn.
    pub fields_skipped: Vec<TextField>,
}

/// Paints a [`CardState`] into a fresh raster.
///
/// Order is fixed: clear, slot photos (`Main`, `Wife0`, `Wife1`, `Wife2`), the frame
/// artwork over them, then every text field over the frame. Output depends only on the
/// state, so rendering an unchanged state twice is pixel-identical.
#[derive(Debug, Default)]
pub struct Compositor {
    text: Option<TextFitRenderer>,
    frame_paint: Option<(Arc<PreparedImage>, vello_cpu::Image)>,
}

impl Compositor {
    /// Build a compositor. Without a text renderer, non-empty fields are skipped.
    pub fn new(text: Option<TextFitRenderer>) -> Self {
        Self {
            text,
            frame_paint: None,
        }
    }

    /// Whether text can be drawn.
    pub fn has_text_renderer(&self) -> bool {
        self.text.is_some()
    }

    /// Render `state` into a new raster the size of its frame.
    pub fn render(&mut self, state: &CardState) -> CardResult<CardRaster> {
        self.render_with_stats(state).map(|(raster, _)| raster)
    }

    /// Render `state` and report what was drawn or skipped.
    #[tracing::instrument(skip_all, fields(width = state.canvas().width, height = state.canvas().height))]
    pub fn render_with_stats(&mut self, state: &CardState) -> CardResult<(CardRaster, RenderStats)> {
        let canvas = state.canvas();
        let w = surface_dim(canvas.width, "card width")?;
        let h = surface_dim(canvas.height, "card height")?;
        let mut stats = RenderStats::default();

        let mut ctx = vello_cpu::RenderContext::new(w, h);

        for slot in Slot::ALL {
            let Some(image) = state.slots().image(slot) else {
                continue;
            };
            let transform = state.slots().transform(slot);
            let placement = match transform.placement(image.width, image.height) {
                Ok(Some(p)) => p,
                Ok(None) => {
                    tracing::debug!(%slot, "crop misses the image, nothing to draw");
                    continue;
                }
                Err(e) => {
                    tracing::warn!(%slot, error = %e, "skipping slot with invalid transform");
                    stats.slots_skipped.push(slot);
                    continue;
                }
            };
            match image_paint(image) {
                Ok(paint) => {
                    fill_image(&mut ctx, paint, placement.to_affine(), placement.source);
                    stats.slots_drawn.push(slot);
                }
                Err(e) => {
                    tracing::warn!(%slot, error = %e, "skipping slot image");
                    stats.slots_skipped.push(slot);
                }
            }
        }

        let frame_paint = self.frame_paint_for(state.frame())?;
        fill_image(&mut ctx, frame_paint, Affine::IDENTITY, canvas.rect());

        for field in TextField::ALL {
            let text = state.field_text(field);
            if text.is_empty() {
                continue;
            }
            let Some(renderer) = self.text.as_mut() else {
                tracing::warn!(field = field.name(), "no font available, skipping text");
                stats.fields_skipped.push(field);
                continue;
            };
            match renderer.draw(&mut ctx, field.bounds(), &text) {
                Ok(TextFit::Direct) => stats.fields_direct.push(field),
                Ok(TextFit::Scaled {
                    buffer_width,
                    buffer_height,
                }) => {
                    tracing::debug!(
                        field = field.name(),
                        buffer_width,
                        buffer_height,
                        "text overflows its box, scaled to fit"
                    );
                    stats.fields_scaled.push(field);
                }
                Ok(TextFit::Empty) => {}
                Err(e) => {
                    tracing::warn!(field = field.name(), error = %e, "skipping text field");
                    stats.fields_skipped.push(field);
                }
            }
        }

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        clear_pixmap(&mut pixmap, [0, 0, 0, 0]);
        ctx.render_to_pixmap(&mut pixmap);

        Ok((
            CardRaster {
                width: canvas.width,
                height: canvas.height,
                data: pixmap.data_as_u8_slice().to_vec(),
            },
            stats,
        ))
    }

    /// Paint for `frame`, rebuilt only when the state carries a different frame.
    fn frame_paint_for(&mut self, frame: &Arc<PreparedImage>) -> CardResult<vello_cpu::Image> {
        if let Some((cached, paint)) = &self.frame_paint {
            if Arc::ptr_eq(cached, frame) {
                return Ok(paint.clone());
            }
        }
        let paint = image_paint(frame)?;
        self.frame_paint = Some((Arc::clone(frame), paint.clone()));
        Ok(paint)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
