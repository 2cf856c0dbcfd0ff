use std::io::Cursor;

use super::*;

fn write_png(path: &Path, w: u32, h: u32, rgba: [u8; 4]) {
    let img = image::RgbaImage::from_raw(w, h, rgba.repeat((w * h) as usize)).unwrap();
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    std::fs::write(path, buf).unwrap();
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir()
        .join("profile_card_manifest_test")
        .join(format!("{name}_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(dir.join("img")).unwrap();
    dir
}

#[test]
fn normalize_rel_path_rejects_escapes() {
    assert_eq!(normalize_rel_path("./img//a.png").unwrap(), "img/a.png");
    assert_eq!(normalize_rel_path("img\\b.png").unwrap(), "img/b.png");
    assert!(normalize_rel_path("/etc/passwd").is_err());
    assert!(normalize_rel_path("../x.png").is_err());
    assert!(normalize_rel_path("").is_err());
    assert!(normalize_rel_path("./").is_err());
}

#[test]
fn parse_minimal_manifest_uses_defaults() {
    let m = CardManifest::from_json_str(r#"{ "frame": "frame.png" }"#).unwrap();
    assert_eq!(m.frame, "frame.png");
    assert!(m.slots.is_empty());
    assert!(m.fonts.is_none());
    assert!(!m.has_text());
}

#[test]
fn parse_full_manifest() {
    let json = r#"{
        "frame": "frame.png",
        "fonts": { "families": ["Noto Sans"], "weight": 400 },
        "slots": {
            "main": { "image": "img/main.png", "sx": 12.5 },
            "wife2": { "image": "img/w2.png", "sy": 4 }
        },
        "commander": "Admiral",
        "date": { "year": "2019", "month": "8" },
        "comment": "hi\nthere"
    }"#;
    let m = CardManifest::from_json_str(json).unwrap();
    assert_eq!(m.slots.len(), 2);
    assert_eq!(m.slots[&Slot::Main].sx, 12.5);
    assert_eq!(m.slots[&Slot::Wife2].sy, 4.0);
    assert_eq!(m.date.joined(), "2019/8");
    assert_eq!(m.fonts.as_ref().unwrap().weight, 400);
    assert!(m.fonts.as_ref().unwrap().system_fonts);
    assert!(m.has_text());
}

#[test]
fn unknown_keys_are_serde_errors() {
    let err = CardManifest::from_json_str(r#"{ "frame": "f.png", "colour": 1 }"#).unwrap_err();
    assert!(matches!(err, CardError::Serde(_)));
    let err = CardManifest::from_json_str(r#"{ "frame": "f.png", "slots": { "wife3": { "image": "x" } } }"#)
        .unwrap_err();
    assert!(matches!(err, CardError::Serde(_)));
}

#[test]
fn build_session_loads_frame_and_slots() {
    let dir = scratch_dir("build");
    write_png(&dir.join("frame.png"), 900, 506, [0, 0, 0, 0]);
    write_png(&dir.join("img/main.png"), 600, 500, [0, 200, 0, 255]);
    write_png(&dir.join("img/w1.png"), 120, 140, [0, 0, 200, 255]);

    let m = CardManifest::from_json_str(
        r#"{
            "frame": "frame.png",
            "slots": {
                "main": { "image": "img/main.png", "sx": 10, "sy": 5 },
                "wife1": { "image": "img/w1.png" }
            }
        }"#,
    )
    .unwrap();
    let session = m.build_session(&dir).unwrap();
    let raster = session.raster();
    assert_eq!((raster.width, raster.height), (900, 506));
    assert_eq!(raster.pixel(100, 100).unwrap().to_array(), [0, 200, 0, 255]);
    assert_eq!(raster.pixel(720, 280).unwrap().to_array(), [0, 0, 200, 255]);
    assert_eq!(session.state().slots().transform(Slot::Main).sx(), 10.0);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn undecodable_slot_image_is_left_empty() {
    let dir = scratch_dir("bad_slot");
    write_png(&dir.join("frame.png"), 900, 506, [0, 0, 0, 0]);
    std::fs::write(dir.join("img/broken.png"), b"not a png").unwrap();

    let m = CardManifest::from_json_str(
        r#"{ "frame": "frame.png", "slots": { "main": { "image": "img/broken.png" } } }"#,
    )
    .unwrap();
    let session = m.build_session(&dir).unwrap();
    assert!(session.state().slots().image(Slot::Main).is_none());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_files_and_bad_frames_are_errors() {
    let dir = scratch_dir("missing");
    let m = CardManifest::from_json_str(r#"{ "frame": "frame.png" }"#).unwrap();
    assert!(matches!(m.build_session(&dir), Err(CardError::Other(_))));

    std::fs::write(dir.join("frame.png"), b"garbage").unwrap();
    assert!(matches!(m.build_session(&dir), Err(CardError::Decode(_))));

    write_png(&dir.join("frame.png"), 10, 10, [0, 0, 0, 255]);
    let m = CardManifest::from_json_str(
        r#"{ "frame": "frame.png", "slots": { "main": { "image": "img/none.png" } } }"#,
    )
    .unwrap();
    assert!(matches!(m.build_session(&dir), Err(CardError::Other(_))));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn invalid_date_in_manifest_is_rejected() {
    let dir = scratch_dir("bad_date");
    write_png(&dir.join("frame.png"), 10, 10, [0, 0, 0, 255]);
    let m = CardManifest::from_json_str(r#"{ "frame": "frame.png", "date": { "month": "13" } }"#)
        .unwrap();
    // Font lookup may fail first on hosts without fonts; either way the build fails.
    assert!(m.build_session(&dir).is_err());

    let _ = std::fs::remove_dir_all(&dir);
}
