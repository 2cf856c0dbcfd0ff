use crate::foundation::{
    core::{Affine, Rect, Vec2},
    error::{CardError, CardResult},
};

/// One of the four fixed photo positions on the card.
///
/// The variant order is the paint order used by the compositor.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    /// Large portrait on the left side of the card.
    Main,
    /// First small portrait.
    Wife0,
    /// Second small portrait.
    Wife1,
    /// Third small portrait.
    Wife2,
}

impl Slot {
    /// All slots in paint order.
    pub const ALL: [Slot; 4] = [Slot::Main, Slot::Wife0, Slot::Wife1, Slot::Wife2];

    /// Dense index in `0..4`, matching [`Slot::ALL`].
    pub fn index(self) -> usize {
        match self {
            Slot::Main => 0,
            Slot::Wife0 => 1,
            Slot::Wife1 => 2,
            Slot::Wife2 => 3,
        }
    }

    /// Stable lowercase name used in manifests and logs.
    pub fn name(self) -> &'static str {
        match self {
            Slot::Main => "main",
            Slot::Wife0 => "wife0",
            Slot::Wife1 => "wife1",
            Slot::Wife2 => "wife2",
        }
    }

    /// Fixed layout constants for this slot.
    pub fn layout(self) -> SlotLayout {
        SLOT_LAYOUTS[self.index()]
    }

    /// Initial transform: fixed layout with the crop origin at `(0, 0)`.
    pub fn default_transform(self) -> Transform {
        Transform::from_layout(self.layout())
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Fixed placement of a slot on the card plus the size of its source crop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlotLayout {
    /// Crop width in source pixels.
    pub sw: f64,
    /// Crop height in source pixels.
    pub sh: f64,
    /// Destination x on the card.
    pub dx: f64,
    /// Destination y on the card.
    pub dy: f64,
    /// Destination width on the card.
    pub dw: f64,
    /// Destination height on the card.
    pub dh: f64,
}

const fn wife_layout(i: u32) -> SlotLayout {
    // The middle window sits one pixel further right than the even stride.
    let nudge = if i == 1 { 1 } else { 0 };
    SlotLayout {
        sw: 97.0,
        sh: 126.0,
        dx: (581 + i * 101 + nudge) as f64,
        dy: 223.0,
        dw: 97.0,
        dh: 126.0,
    }
}

const SLOT_LAYOUTS: [SlotLayout; 4] = [
    SlotLayout {
        sw: 562.0,
        sh: 480.0,
        dx: 13.0,
        dy: 13.0,
        dw: 562.0,
        dh: 480.0,
    },
    wife_layout(0),
    wife_layout(1),
    wife_layout(2),
];

/// Source crop and destination placement for one slot image.
///
/// Only the crop origin (`sx`, `sy`) can change after construction; the crop size and the
/// destination rectangle are the slot's layout constants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    sx: f64,
    sy: f64,
    sw: f64,
    sh: f64,
    dx: f64,
    dy: f64,
    dw: f64,
    dh: f64,
}

impl Transform {
    fn from_layout(l: SlotLayout) -> Self {
        Self {
            sx: 0.0,
            sy: 0.0,
            sw: l.sw,
            sh: l.sh,
            dx: l.dx,
            dy: l.dy,
            dw: l.dw,
            dh: l.dh,
        }
    }

    /// Crop origin x in source pixels.
    pub fn sx(&self) -> f64 {
        self.sx
    }

    /// Crop origin y in source pixels.
    pub fn sy(&self) -> f64 {
        self.sy
    }

    /// Crop width in source pixels.
    pub fn sw(&self) -> f64 {
        self.sw
    }

    /// Crop height in source pixels.
    pub fn sh(&self) -> f64 {
        self.sh
    }

    /// Destination x on the card.
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Destination y on the card.
    pub fn dy(&self) -> f64 {
        self.dy
    }

    /// Destination width on the card.
    pub fn dw(&self) -> f64 {
        self.dw
    }

    /// Destination height on the card.
    pub fn dh(&self) -> f64 {
        self.dh
    }

    /// Crop rectangle in source image pixel space.
    pub fn source_rect(&self) -> Rect {
        Rect::new(self.sx, self.sy, self.sx + self.sw, self.sy + self.sh)
    }

    /// Placement rectangle in card pixel space.
    pub fn dest_rect(&self) -> Rect {
        Rect::new(self.dx, self.dy, self.dx + self.dw, self.dy + self.dh)
    }

    /// Move the crop origin. Values must be finite; they may lie outside the image.
    pub fn set_source_origin(&mut self, sx: f64, sy: f64) -> CardResult<()> {
        if !sx.is_finite() || !sy.is_finite() {
            return Err(CardError::validation(format!(
                "crop origin must be finite, got ({sx}, {sy})"
            )));
        }
        self.sx = sx;
        self.sy = sy;
        Ok(())
    }

    /// Check the rectangle invariants (finite origins, positive sizes).
    pub fn validate(&self) -> CardResult<()> {
        let all = [
            self.sx, self.sy, self.sw, self.sh, self.dx, self.dy, self.dw, self.dh,
        ];
        if all.iter().any(|v| !v.is_finite()) {
            return Err(CardError::validation("transform fields must be finite"));
        }
        if self.sw <= 0.0 || self.sh <= 0.0 || self.dw <= 0.0 || self.dh <= 0.0 {
            return Err(CardError::validation(
                "transform source and destination sizes must be > 0",
            ));
        }
        Ok(())
    }

    /// Resolve the draw geometry against an image of `width` x `height` pixels.
    ///
    /// The crop is clipped to the image bounds and the destination shrunk by the same
    /// proportion, so the uncovered part of the destination stays untouched. Returns
    /// `Ok(None)` when the crop misses the image entirely.
    pub fn placement(&self, width: u32, height: u32) -> CardResult<Option<Placement>> {
        self.validate()?;

        let (w, h) = (f64::from(width), f64::from(height));
        let x0 = self.sx.max(0.0);
        let y0 = self.sy.max(0.0);
        let x1 = (self.sx + self.sw).min(w);
        let y1 = (self.sy + self.sh).min(h);
        if x1 <= x0 || y1 <= y0 {
            return Ok(None);
        }

        let kx = self.dw / self.sw;
        let ky = self.dh / self.sh;
        Ok(Some(Placement {
            source: Rect::new(x0, y0, x1, y1),
            dest: Rect::new(
                self.dx + (x0 - self.sx) * kx,
                self.dy + (y0 - self.sy) * ky,
                self.dx + (x1 - self.sx) * kx,
                self.dy + (y1 - self.sy) * ky,
            ),
        }))
    }
}

/// Clipped source and destination rectangles ready to draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Region of the source image to sample.
    pub source: Rect,
    /// Region of the card it lands on.
    pub dest: Rect,
}

impl Placement {
    /// Affine map from source image pixel space to card pixel space.
    pub fn to_affine(&self) -> Affine {
        let scale_x = self.dest.width() / self.source.width();
        let scale_y = self.dest.height() / self.source.height();
        Affine::translate(Vec2::new(self.dest.x0, self.dest.y0))
            * Affine::scale_non_uniform(scale_x, scale_y)
            * Affine::translate(Vec2::new(-self.source.x0, -self.source.y0))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/card/slot.rs"]
mod tests;
