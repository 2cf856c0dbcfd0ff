use super::*;

#[test]
fn default_stack_prefers_yu_gothic_then_generic() {
    let c = FontConfig::default();
    assert_eq!(c.families.first().map(String::as_str), Some("游ゴシック体"));
    assert_eq!(c.families.last().map(String::as_str), Some("sans-serif"));
    assert_eq!(c.weight, 500);
    assert!(c.system_fonts);
}

#[test]
fn config_deserializes_with_defaults() {
    let c: FontConfig = serde_json::from_str(r#"{ "families": ["Noto Sans"] }"#).unwrap();
    assert_eq!(c.families, vec!["Noto Sans".to_string()]);
    assert_eq!(c.weight, 500);
    assert!(c.extra_dirs.is_empty());
}

#[test]
fn generic_names_map_to_generic_families() {
    assert!(matches!(family_for("sans-serif"), fontdb::Family::SansSerif));
    assert!(matches!(family_for("serif"), fontdb::Family::Serif));
    assert!(matches!(family_for("Yu Gothic"), fontdb::Family::Name("Yu Gothic")));
}

#[test]
fn empty_database_is_a_font_error() {
    let config = FontConfig {
        system_fonts: false,
        extra_dirs: vec![PathBuf::from("no/such/font/dir")],
        ..FontConfig::default()
    };
    let err = resolve_font(&config).unwrap_err();
    assert!(matches!(err, CardError::Font(_)));
}

#[test]
fn resolves_some_face_when_system_fonts_exist() {
    let Ok(face) = resolve_font(&FontConfig::default()) else {
        return;
    };
    assert!(!face.bytes.is_empty());
}

#[test]
fn sans_heuristic_skips_math_and_mono_faces() {
    assert!(looks_sans("DejaVu Sans", false));
    assert!(looks_sans("Source Han Sans JP", false));
    assert!(!looks_sans("DejaVu Math TeX Gyre", false));
    assert!(!looks_sans("DejaVu Sans Mono", false));
    assert!(!looks_sans("Noto Sans", true));
    assert!(!looks_sans("DejaVu Serif", false));
}

#[test]
fn generic_sans_serif_resolves_to_an_installed_sans_face() {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    let Some(picked) = pick_sans_family(&db) else {
        return;
    };

    for family in ["sans-serif", "No Such Family"] {
        let config = FontConfig {
            families: vec![family.to_string()],
            ..FontConfig::default()
        };
        let face = resolve_font(&config).unwrap();
        assert!(!face.family.contains("Math"), "{family}: {}", face.family);
        assert!(db.faces().any(|f| {
            f.families.first().map(|(n, _)| n) == Some(&face.family)
                && f.families.iter().any(|(n, _)| *n == picked)
        }));
    }
}
