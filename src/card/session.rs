use std::{path::Path, sync::Arc};

use crate::{
    assets::decode::{PreparedImage, decode_image},
    card::{
        fields::FieldInput,
        slot::Slot,
        state::{CardState, CropEdit},
        store::LoadTicket,
    },
    export::png::{encode_png, save_png},
    foundation::error::CardResult,
    render::{
        compositor::{Compositor, RenderStats},
        raster::CardRaster,
    },
    text::fit::TextFitRenderer,
};

/// A discrete state mutation. Each one is followed by a full re-render.
#[derive(Clone, Debug)]
pub enum CardCommand {
    /// Put a decoded image into a slot.
    SetImage {
        /// Target slot.
        slot: Slot,
        /// Decoded image.
        image: PreparedImage,
    },
    /// Empty a slot.
    ClearImage(Slot),
    /// Move the crop origin of a slot.
    SetSourceOrigin {
        /// Target slot.
        slot: Slot,
        /// Crop origin x in source pixels.
        sx: f64,
        /// Crop origin y in source pixels.
        sy: f64,
    },
    /// Commit one form input.
    SetField {
        /// Which input.
        input: FieldInput,
        /// Raw value.
        value: String,
    },
    /// Pick a server from the fixed list.
    SelectServer(usize),
    /// Set the preview flag.
    SetPreview(bool),
    /// Flip the preview flag.
    TogglePreview,
}

/// Owns a [`CardState`] and keeps its raster in sync.
///
/// Every mutation goes through [`CardSession::apply`] (or the load helpers) and ends with a
/// full compositor pass, so [`CardSession::raster`] always reflects the latest state.
#[derive(Debug)]
pub struct CardSession {
    state: CardState,
    compositor: Compositor,
    raster: CardRaster,
    snapshot: Option<CardRaster>,
    last_stats: RenderStats,
}

impl CardSession {
    /// Start an empty card over `frame` and render it once.
    pub fn new(frame: Arc<PreparedImage>, text: Option<TextFitRenderer>) -> CardResult<Self> {
        let state = CardState::new(frame);
        let raster = CardRaster::transparent(state.canvas());
        let mut session = Self {
            state,
            compositor: Compositor::new(text),
            raster,
            snapshot: None,
            last_stats: RenderStats::default(),
        };
        session.render()?;
        Ok(session)
    }

    /// Current state.
    pub fn state(&self) -> &CardState {
        &self.state
    }

    /// Repaint the live raster from the current state.
    pub fn render(&mut self) -> CardResult<()> {
        let (raster, stats) = self.compositor.render_with_stats(&self.state)?;
        self.raster = raster;
        self.last_stats = stats;
        Ok(())
    }

    /// Apply `cmd`, then re-render. On error the state is unchanged and nothing is drawn.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn apply(&mut self, cmd: CardCommand) -> CardResult<()> {
        match cmd {
            CardCommand::SetImage { slot, image } => self.state.set_image(slot, image),
            CardCommand::ClearImage(slot) => {
                self.state.clear_image(slot);
            }
            CardCommand::SetSourceOrigin { slot, sx, sy } => {
                self.state.set_source_origin(slot, sx, sy)?
            }
            CardCommand::SetField { input, value } => self.state.set_field(input, value)?,
            CardCommand::SelectServer(index) => self.state.select_server(index)?,
            CardCommand::SetPreview(on) => self.set_preview(on),
            CardCommand::TogglePreview => {
                let on = !self.state.preview();
                self.set_preview(on);
            }
        }
        self.render()
    }

    fn set_preview(&mut self, on: bool) {
        if !self.state.set_preview(on) {
            return;
        }
        if on {
            self.snapshot = Some(self.raster.clone());
        } else {
            self.snapshot = None;
        }
    }

    /// Empty `slot` and hand out a ticket for the image that will replace it.
    pub fn begin_load(&mut self, slot: Slot) -> CardResult<LoadTicket> {
        let ticket = self.state.begin_load(slot);
        self.render()?;
        Ok(ticket)
    }

    /// Complete a load started with [`CardSession::begin_load`].
    ///
    /// A failed decode leaves the slot empty; a superseded ticket is dropped. Both return
    /// `Ok(false)`.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        decoded: CardResult<PreparedImage>,
    ) -> CardResult<bool> {
        let slot = ticket.slot();
        let image = match decoded {
            Ok(image) => image,
            Err(e) => {
                tracing::warn!(%slot, error = %e, "image load failed, slot left empty");
                return Ok(false);
            }
        };
        if !self.state.finish_load(ticket, image) {
            tracing::debug!(%slot, "discarding superseded image load");
            return Ok(false);
        }
        self.render()?;
        Ok(true)
    }

    /// Decode `bytes` and complete the load for `ticket`.
    pub fn finish_load_bytes(&mut self, ticket: LoadTicket, bytes: &[u8]) -> CardResult<bool> {
        self.finish_load(ticket, decode_image(bytes))
    }

    /// Live raster.
    pub fn raster(&self) -> &CardRaster {
        &self.raster
    }

    /// What should be on screen: the frozen snapshot while previewing, else the live raster.
    pub fn displayed(&self) -> &CardRaster {
        self.snapshot.as_ref().unwrap_or(&self.raster)
    }

    /// Snapshot captured when preview was last turned on.
    pub fn preview_snapshot(&self) -> Option<&CardRaster> {
        self.snapshot.as_ref()
    }

    /// Stats of the last render pass.
    pub fn last_stats(&self) -> &RenderStats {
        &self.last_stats
    }

    /// Crop-edit request for `slot`, or `None` when it has no image.
    pub fn edit_target(&self, slot: Slot) -> Option<CropEdit> {
        self.state.edit_target(slot)
    }

    /// Encode the live raster (never the snapshot) as PNG bytes.
    pub fn export_png(&self) -> CardResult<Vec<u8>> {
        encode_png(&self.raster)
    }

    /// Write the live raster to `path` as PNG.
    pub fn save_png(&self, path: &Path) -> CardResult<()> {
        save_png(&self.raster, path)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/card/session.rs"]
mod tests;
