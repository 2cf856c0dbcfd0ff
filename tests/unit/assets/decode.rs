use std::io::Cursor;

use super::*;

#[test]
fn decode_image_png_dimensions_and_premul() {
    let src_rgba = vec![100u8, 50u8, 200u8, 128u8];
    let img = image::RgbaImage::from_raw(1, 1, src_rgba).unwrap();

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();

    let prepared = decode_image(&buf).unwrap();
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn garbage_bytes_are_a_decode_error() {
    let err = decode_image(b"definitely not an image").unwrap_err();
    assert!(matches!(err, CardError::Decode(_)));
}

#[test]
fn fully_transparent_pixels_drop_color() {
    let img = PreparedImage::from_straight_rgba8(1, 1, vec![255, 255, 255, 0]).unwrap();
    assert_eq!(img.rgba8_premul.as_slice(), &[0, 0, 0, 0]);
}

#[test]
fn byte_length_must_match_dimensions() {
    assert!(PreparedImage::from_straight_rgba8(2, 2, vec![0; 12]).is_err());
    assert!(PreparedImage::from_straight_rgba8(0, 2, vec![]).is_err());
}

#[test]
fn missing_file_reports_path() {
    let err = load_image_file(Path::new("no/such/frame.png")).unwrap_err();
    assert!(err.to_string().contains("no/such/frame.png"));
}
