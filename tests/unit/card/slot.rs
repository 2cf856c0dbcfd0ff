use super::*;

#[test]
fn main_slot_layout_is_fixed() {
    let t = Slot::Main.default_transform();
    assert_eq!(t.dest_rect(), Rect::new(13.0, 13.0, 575.0, 493.0));
    assert_eq!((t.sw(), t.sh()), (562.0, 480.0));
    assert_eq!((t.sx(), t.sy()), (0.0, 0.0));
}

#[test]
fn wife_slot_destinations_follow_stride() {
    let dx: Vec<f64> = [Slot::Wife0, Slot::Wife1, Slot::Wife2]
        .iter()
        .map(|s| s.default_transform().dx())
        .collect();
    assert_eq!(dx, vec![581.0, 683.0, 783.0]);

    for slot in [Slot::Wife0, Slot::Wife1, Slot::Wife2] {
        let t = slot.default_transform();
        assert_eq!(t.dy(), 223.0);
        assert_eq!((t.dw(), t.dh()), (97.0, 126.0));
        assert_eq!((t.sw(), t.sh()), (97.0, 126.0));
    }
}

#[test]
fn slot_order_and_indices_agree() {
    for (i, slot) in Slot::ALL.iter().enumerate() {
        assert_eq!(slot.index(), i);
    }
    assert_eq!(Slot::Wife1.to_string(), "wife1");
}

#[test]
fn moving_crop_origin_keeps_layout_constants() {
    let mut t = Slot::Wife2.default_transform();
    t.set_source_origin(40.0, -12.5).unwrap();
    assert_eq!((t.sx(), t.sy()), (40.0, -12.5));
    assert_eq!(t.dest_rect(), Slot::Wife2.default_transform().dest_rect());
    assert_eq!(t.source_rect(), Rect::new(40.0, -12.5, 137.0, 113.5));
}

#[test]
fn non_finite_crop_origin_is_rejected_and_state_kept() {
    let mut t = Slot::Main.default_transform();
    t.set_source_origin(5.0, 6.0).unwrap();
    assert!(t.set_source_origin(f64::NAN, 0.0).is_err());
    assert!(t.set_source_origin(0.0, f64::INFINITY).is_err());
    assert_eq!((t.sx(), t.sy()), (5.0, 6.0));
}

#[test]
fn validate_rejects_non_positive_sizes() {
    let mut t = Slot::Main.default_transform();
    t.dw = 0.0;
    assert!(t.validate().is_err());
    assert!(t.placement(1000, 1000).is_err());
}

#[test]
fn placement_inside_image_is_unclipped() {
    let mut t = Slot::Main.default_transform();
    t.set_source_origin(10.0, 20.0).unwrap();
    let p = t.placement(1000, 1000).unwrap().unwrap();
    assert_eq!(p.source, Rect::new(10.0, 20.0, 572.0, 500.0));
    assert_eq!(p.dest, Rect::new(13.0, 13.0, 575.0, 493.0));
}

#[test]
fn placement_clips_crop_and_destination_together() {
    // Image is smaller than the crop: only the top-left 100x50 region is covered.
    let t = Slot::Main.default_transform();
    let p = t.placement(100, 50).unwrap().unwrap();
    assert_eq!(p.source, Rect::new(0.0, 0.0, 100.0, 50.0));
    assert_eq!(p.dest, Rect::new(13.0, 13.0, 113.0, 63.0));

    let mut t = Slot::Wife0.default_transform();
    t.set_source_origin(-10.0, 0.0).unwrap();
    let p = t.placement(1000, 1000).unwrap().unwrap();
    assert_eq!(p.source, Rect::new(0.0, 0.0, 87.0, 126.0));
    assert_eq!(p.dest, Rect::new(591.0, 223.0, 678.0, 349.0));
}

#[test]
fn placement_missing_the_image_draws_nothing() {
    let mut t = Slot::Main.default_transform();
    t.set_source_origin(5000.0, 0.0).unwrap();
    assert_eq!(t.placement(100, 100).unwrap(), None);
}

#[test]
fn placement_affine_maps_source_corners_to_destination() {
    let mut t = Slot::Wife1.default_transform();
    t.set_source_origin(30.0, 40.0).unwrap();
    let p = t.placement(500, 500).unwrap().unwrap();
    let a = p.to_affine();
    let tl = a * kurbo::Point::new(30.0, 40.0);
    let br = a * kurbo::Point::new(127.0, 166.0);
    assert!((tl.x - 683.0).abs() < 1e-9 && (tl.y - 223.0).abs() < 1e-9);
    assert!((br.x - 780.0).abs() < 1e-9 && (br.y - 349.0).abs() < 1e-9);
}
