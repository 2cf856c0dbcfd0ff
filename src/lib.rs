//! Profile card compositor.
//!
//! Builds a single card bitmap from up to four cropped photos, a fixed frame artwork and a
//! handful of text fields. The pieces, leaves first:
//!
//! 1. **Slots**: four fixed photo positions, each with a [`Transform`] (crop origin is the
//!    only moving part) and at most one decoded image held in a [`SlotStore`].
//! 2. **Text fit**: [`TextFitRenderer`] lays a string into a fixed box, drawing it at natural
//!    size when it fits and stretching an offscreen buffer into the box when it does not.
//! 3. **Compositor**: [`Compositor::render`] clears, paints slot photos, the frame over them,
//!    then text over the frame. Output is a pure function of the [`CardState`].
//! 4. **Session**: [`CardSession`] applies [`CardCommand`]s, re-renders after each one,
//!    tracks image loads with [`LoadTicket`]s and freezes a preview snapshot on demand.
//! 5. **Export**: [`encode_png`] turns the live raster into PNG bytes.
//!
//! Pixels are **premultiplied RGBA8** until export, which writes straight alpha.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod card;
mod export;
mod foundation;
mod manifest;
mod render;
mod text;

pub use assets::decode::{PreparedImage, decode_image, load_image_file};
pub use assets::font::{FontConfig, FontFace, resolve_font};
pub use card::fields::{
    DateParts, FIRST_YEAR, FieldInput, SERVERS, TextField, current_year, server_name,
    validate_date_part,
};
pub use card::session::{CardCommand, CardSession};
pub use card::slot::{Placement, Slot, SlotLayout, Transform};
pub use card::state::{CardState, CropEdit};
pub use card::store::{LoadTicket, SlotStore};
pub use export::png::{DEFAULT_EXPORT_FILE_NAME, encode_png, ensure_parent_dir, save_png};
pub use foundation::core::{Affine, Canvas, Rect, Rgba8, Rgba8Premul, Vec2};
pub use foundation::error::{CardError, CardResult};
pub use manifest::{CardManifest, SlotSource, normalize_rel_path};
pub use render::compositor::{Compositor, RenderStats};
pub use render::raster::CardRaster;
pub use text::fit::{
    FIRST_LINE_MIDDLE, LINE_PITCH, TextFit, TextFitRenderer, TextMeasure, TextPlan, TextStyle,
    WIDTH_PAD, plan_text, split_lines,
};
pub use text::layout::{PositionedGlyph, ShapedLine, TextBrushRgba8, TextLayoutEngine};
