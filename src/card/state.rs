use std::{borrow::Cow, sync::Arc};

use crate::{
    assets::decode::PreparedImage,
    card::{
        fields::{DateParts, FieldInput, TextField, server_name, validate_date_part},
        slot::{Slot, Transform},
        store::{LoadTicket, SlotStore},
    },
    foundation::{core::Canvas, error::CardResult},
};

/// Everything a crop editor needs to adjust one slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CropEdit {
    /// Slot being edited.
    pub slot: Slot,
    /// Current transform (only `sx`/`sy` are editable).
    pub transform: Transform,
    /// Source image width in pixels.
    pub image_width: u32,
    /// Source image height in pixels.
    pub image_height: u32,
}

/// Full snapshot of what one render pass draws.
///
/// Mutations never draw; the owner re-renders after each one.
#[derive(Clone, Debug)]
pub struct CardState {
    frame: Arc<PreparedImage>,
    slots: SlotStore,
    commander: String,
    server: String,
    date: DateParts,
    comment: String,
    preview: bool,
}

impl CardState {
    /// Empty card over `frame`. The output raster takes the frame's size.
    pub fn new(frame: Arc<PreparedImage>) -> Self {
        Self {
            frame,
            slots: SlotStore::new(),
            commander: String::new(),
            server: String::new(),
            date: DateParts::default(),
            comment: String::new(),
            preview: false,
        }
    }

    /// Shared frame artwork.
    pub fn frame(&self) -> &Arc<PreparedImage> {
        &self.frame
    }

    /// Output raster size (the frame's natural size).
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.frame.width,
            height: self.frame.height,
        }
    }

    /// Slot images and transforms.
    pub fn slots(&self) -> &SlotStore {
        &self.slots
    }

    /// Replace the image of `slot`.
    pub fn set_image(&mut self, slot: Slot, image: PreparedImage) {
        self.slots.set_image(slot, image);
    }

    /// Remove the image of `slot`; returns whether one was present.
    pub fn clear_image(&mut self, slot: Slot) -> bool {
        self.slots.clear_image(slot)
    }

    /// Start an asynchronous load into `slot` (empties it).
    pub fn begin_load(&mut self, slot: Slot) -> LoadTicket {
        self.slots.begin_load(slot)
    }

    /// Complete a load; stale tickets are ignored and return `false`.
    pub fn finish_load(&mut self, ticket: LoadTicket, image: PreparedImage) -> bool {
        self.slots.finish_load(ticket, image)
    }

    /// Move the crop origin of `slot`.
    pub fn set_source_origin(&mut self, slot: Slot, sx: f64, sy: f64) -> CardResult<()> {
        self.slots.set_source_origin(slot, sx, sy)
    }

    /// Crop-edit request for `slot`, or `None` when it has no image.
    pub fn edit_target(&self, slot: Slot) -> Option<CropEdit> {
        let image = self.slots.image(slot)?;
        Some(CropEdit {
            slot,
            transform: *self.slots.transform(slot),
            image_width: image.width,
            image_height: image.height,
        })
    }

    /// Commit a raw input value. Date parts are range-checked; on error nothing changes.
    pub fn set_field(&mut self, input: FieldInput, value: impl Into<String>) -> CardResult<()> {
        let value = value.into();
        validate_date_part(input, &value)?;
        let target = match input {
            FieldInput::Commander => &mut self.commander,
            FieldInput::Server => &mut self.server,
            FieldInput::Year => &mut self.date.year,
            FieldInput::Month => &mut self.date.month,
            FieldInput::Day => &mut self.date.day,
            FieldInput::Comment => &mut self.comment,
        };
        *target = value;
        Ok(())
    }

    /// Set the server from the fixed server list.
    pub fn select_server(&mut self, index: usize) -> CardResult<()> {
        self.server = server_name(index)?.to_string();
        Ok(())
    }

    /// Date inputs as entered.
    pub fn date(&self) -> &DateParts {
        &self.date
    }

    /// Text drawn for `field`.
    pub fn field_text(&self, field: TextField) -> Cow<'_, str> {
        match field {
            TextField::Commander => Cow::Borrowed(&self.commander),
            TextField::Server => Cow::Borrowed(&self.server),
            TextField::Date => Cow::Owned(self.date.joined()),
            TextField::Comment => Cow::Borrowed(&self.comment),
        }
    }

    /// Whether any field would draw text.
    pub fn has_text(&self) -> bool {
        TextField::ALL
            .iter()
            .any(|f| !self.field_text(*f).is_empty())
    }

    /// Preview flag.
    pub fn preview(&self) -> bool {
        self.preview
    }

    /// Set the preview flag; returns whether it changed.
    pub fn set_preview(&mut self, on: bool) -> bool {
        let changed = self.preview != on;
        self.preview = on;
        changed
    }
}

#[cfg(test)]
#[path = "../../tests/unit/card/state.rs"]
mod tests;
