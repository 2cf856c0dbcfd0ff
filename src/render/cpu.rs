use std::sync::Arc;

use crate::{
    assets::decode::PreparedImage,
    foundation::{
        core::{Affine, Rect, Rgba8},
        error::{CardError, CardResult},
    },
};

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

pub(crate) fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

pub(crate) fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

pub(crate) fn surface_dim(v: u32, what: &str) -> CardResult<u16> {
    v.try_into()
        .map_err(|_| CardError::render(format!("{what} {v} exceeds u16")))
}

pub(crate) fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap, rgba: [u8; 4]) {
    let data = pixmap.data_as_u8_slice_mut();
    for px in data.chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

pub(crate) fn pixmap_from_premul_bytes(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> CardResult<vello_cpu::Pixmap> {
    let w = surface_dim(width, "image width")?;
    let h = surface_dim(height, "image height")?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(CardError::render("prepared image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

pub(crate) fn pixmap_paint(pixmap: vello_cpu::Pixmap) -> vello_cpu::Image {
    vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    }
}

pub(crate) fn image_paint(img: &PreparedImage) -> CardResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(img.rgba8_premul.as_slice(), img.width, img.height)?;
    Ok(pixmap_paint(pixmap))
}

/// Paint `paint` (in its own pixel space) through `transform` over `source`.
pub(crate) fn fill_image(
    ctx: &mut vello_cpu::RenderContext,
    paint: vello_cpu::Image,
    transform: Affine,
    source: Rect,
) {
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_transform(affine_to_cpu(transform));
    ctx.set_paint(paint);
    ctx.fill_rect(&rect_to_cpu(source));
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
