use crate::{
    assets::decode::PreparedImage,
    card::slot::{Slot, Transform},
    foundation::error::CardResult,
};

/// Proof of a pending image load for one slot.
///
/// A ticket is only honored while it is the slot's latest: clearing the slot, setting an
/// image directly or starting another load invalidates it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    slot: Slot,
    generation: u64,
}

impl LoadTicket {
    /// Slot the load targets.
    pub fn slot(&self) -> Slot {
        self.slot
    }
}

#[derive(Clone, Debug)]
struct SlotEntry {
    image: Option<PreparedImage>,
    transform: Transform,
    generation: u64,
}

/// At most one decoded image per slot, each paired with its transform.
#[derive(Clone, Debug)]
pub struct SlotStore {
    entries: [SlotEntry; 4],
}

impl Default for SlotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SlotStore {
    /// Empty store with every slot at its default transform.
    pub fn new() -> Self {
        Self {
            entries: Slot::ALL.map(|slot| SlotEntry {
                image: None,
                transform: slot.default_transform(),
                generation: 0,
            }),
        }
    }

    fn entry(&self, slot: Slot) -> &SlotEntry {
        &self.entries[slot.index()]
    }

    fn entry_mut(&mut self, slot: Slot) -> &mut SlotEntry {
        &mut self.entries[slot.index()]
    }

    /// Current image of `slot`, if any.
    pub fn image(&self, slot: Slot) -> Option<&PreparedImage> {
        self.entry(slot).image.as_ref()
    }

    /// Current transform of `slot`.
    pub fn transform(&self, slot: Slot) -> &Transform {
        &self.entry(slot).transform
    }

    /// Move the crop origin of `slot`.
    pub fn set_source_origin(&mut self, slot: Slot, sx: f64, sy: f64) -> CardResult<()> {
        self.entry_mut(slot).transform.set_source_origin(sx, sy)
    }

    /// Replace the image of `slot` wholesale. Pending loads for it become stale.
    pub fn set_image(&mut self, slot: Slot, image: PreparedImage) {
        let e = self.entry_mut(slot);
        e.generation += 1;
        e.image = Some(image);
    }

    /// Remove the image of `slot`. Pending loads for it become stale.
    ///
    /// Returns whether an image was present.
    pub fn clear_image(&mut self, slot: Slot) -> bool {
        let e = self.entry_mut(slot);
        e.generation += 1;
        e.image.take().is_some()
    }

    /// Start loading a new image: the slot is emptied and a fresh ticket issued.
    pub fn begin_load(&mut self, slot: Slot) -> LoadTicket {
        let e = self.entry_mut(slot);
        e.generation += 1;
        e.image = None;
        LoadTicket {
            slot,
            generation: e.generation,
        }
    }

    /// Whether `ticket` is still the latest request for its slot.
    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        self.entry(ticket.slot).generation == ticket.generation
    }

    /// Install the decoded image for `ticket` if it is still current.
    ///
    /// Returns `false` (and drops `image`) for stale tickets.
    pub fn finish_load(&mut self, ticket: LoadTicket, image: PreparedImage) -> bool {
        if !self.is_current(&ticket) {
            return false;
        }
        self.set_image(ticket.slot, image);
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/card/store.rs"]
mod tests;
