use super::*;

#[test]
fn surface_dim_rejects_oversized() {
    assert_eq!(surface_dim(900, "w").unwrap(), 900);
    assert!(surface_dim(70_000, "w").is_err());
}

#[test]
fn pixmap_from_bytes_checks_length() {
    assert!(pixmap_from_premul_bytes(&[0; 8], 2, 2).is_err());
    let p = pixmap_from_premul_bytes(&[1, 2, 3, 255, 4, 5, 6, 255], 2, 1).unwrap();
    assert_eq!(p.width(), 2);
    assert_eq!(p.height(), 1);
    assert_eq!(p.data_as_u8_slice(), &[1, 2, 3, 255, 4, 5, 6, 255]);
}

#[test]
fn clear_pixmap_fills_every_pixel() {
    let mut p = vello_cpu::Pixmap::new(3, 2);
    clear_pixmap(&mut p, [9, 8, 7, 255]);
    assert!(
        p.data_as_u8_slice()
            .chunks_exact(4)
            .all(|px| px == [9, 8, 7, 255])
    );
}

#[test]
fn fill_image_paints_through_transform() {
    let img = PreparedImage::from_straight_rgba8(2, 2, [200u8, 0, 0, 255].repeat(4)).unwrap();
    let paint = image_paint(&img).unwrap();

    let mut ctx = vello_cpu::RenderContext::new(8, 8);
    fill_image(
        &mut ctx,
        paint,
        Affine::translate((4.0, 4.0)) * Affine::scale(2.0),
        Rect::new(0.0, 0.0, 2.0, 2.0),
    );
    ctx.flush();
    let mut out = vello_cpu::Pixmap::new(8, 8);
    ctx.render_to_pixmap(&mut out);

    let data = out.data_as_u8_slice();
    let px = |x: usize, y: usize| &data[(y * 8 + x) * 4..(y * 8 + x) * 4 + 4];
    assert_eq!(px(5, 5), &[200, 0, 0, 255]);
    assert_eq!(px(1, 1), &[0, 0, 0, 0]);
}
