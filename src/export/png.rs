use std::{io::Cursor, path::Path};

use anyhow::Context as _;

use crate::{
    foundation::error::{CardError, CardResult},
    render::raster::CardRaster,
};

/// File name offered for downloaded cards.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "azucomm_profile.png";

/// Encode a rendered card as PNG bytes (straight alpha, full size).
pub fn encode_png(raster: &CardRaster) -> CardResult<Vec<u8>> {
    let img = image::RgbaImage::from_raw(raster.width, raster.height, raster.to_straight_rgba8())
        .ok_or_else(|| {
            CardError::encode(format!(
                "raster buffer does not match {}x{}",
                raster.width, raster.height
            ))
        })?;

    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| CardError::encode(format!("write png: {e}")))?;
    Ok(buf)
}

/// Encode `raster` and write it to `path`, creating parent directories.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn save_png(raster: &CardRaster, path: &Path) -> CardResult<()> {
    let bytes = encode_png(raster)?;
    ensure_parent_dir(path)?;
    std::fs::write(path, &bytes).with_context(|| format!("write png '{}'", path.display()))?;
    tracing::debug!(bytes = bytes.len(), "png written");
    Ok(())
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> CardResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/export/png.rs"]
mod tests;
