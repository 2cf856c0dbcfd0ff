use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use usvg::fontdb;

use crate::foundation::error::{CardError, CardResult};

/// Font stack and lookup locations for card text.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FontConfig {
    /// Family names in preference order. `sans-serif`, `serif` and `monospace` are generic.
    #[serde(default = "default_families")]
    pub families: Vec<String>,
    /// CSS-style weight to match.
    #[serde(default = "default_weight")]
    pub weight: u16,
    /// Additional directories scanned for `.ttf`/`.otf`/`.ttc` files.
    #[serde(default)]
    pub extra_dirs: Vec<PathBuf>,
    /// Whether installed system fonts are considered.
    #[serde(default = "default_system_fonts")]
    pub system_fonts: bool,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            families: default_families(),
            weight: default_weight(),
            extra_dirs: Vec::new(),
            system_fonts: default_system_fonts(),
        }
    }
}

fn default_families() -> Vec<String> {
    ["游ゴシック体", "YuGothic", "游ゴシック", "Yu Gothic", "sans-serif"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn default_weight() -> u16 {
    500
}

fn default_system_fonts() -> bool {
    true
}

/// Raw font data for one resolved face.
#[derive(Clone)]
pub struct FontFace {
    /// Font file bytes (may be a collection).
    pub bytes: Arc<Vec<u8>>,
    /// Face index inside `bytes`.
    pub index: u32,
    /// Family name the face was resolved under.
    pub family: String,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("bytes_len", &self.bytes.len())
            .field("index", &self.index)
            .field("family", &self.family)
            .finish()
    }
}

impl FontFace {
    /// Use caller-provided font bytes directly.
    pub fn from_bytes(bytes: Vec<u8>, index: u32) -> Self {
        Self {
            bytes: Arc::new(bytes),
            index,
            family: String::new(),
        }
    }
}

/// Resolve the first available family of `config.families`.
///
/// Falls back to any loaded face when nothing in the stack matches.
#[tracing::instrument(skip(config), fields(families = config.families.len()))]
pub fn resolve_font(config: &FontConfig) -> CardResult<FontFace> {
    let mut db = fontdb::Database::new();
    if config.system_fonts {
        db.load_system_fonts();
    }
    for dir in &config.extra_dirs {
        load_fonts_from_dir(&mut db, dir);
    }
    if db.is_empty() {
        return Err(CardError::font("no font faces available"));
    }
    let sans = pick_sans_family(&db);
    if let Some(name) = &sans {
        tracing::debug!(family = %name, "generic sans-serif family");
        db.set_sans_serif_family(name.as_str());
    }

    for name in &config.families {
        let families = [family_for(name)];
        let query = fontdb::Query {
            families: &families,
            weight: fontdb::Weight(config.weight),
            stretch: fontdb::Stretch::Normal,
            style: fontdb::Style::Normal,
        };
        if let Some(id) = db.query(&query) {
            tracing::debug!(family = %name, "font family resolved");
            return face_from_db(&db, id);
        }
        tracing::debug!(family = %name, "font family not available");
    }

    let fallback = sans.as_deref().and_then(|name| {
        db.query(&fontdb::Query {
            families: &[fontdb::Family::Name(name)],
            weight: fontdb::Weight(config.weight),
            ..fontdb::Query::default()
        })
    });
    let id = fallback
        .or_else(|| db.faces().next().map(|f| f.id))
        .ok_or_else(|| CardError::font("no font faces available"))?;
    tracing::warn!("no configured font family found, using first available face");
    face_from_db(&db, id)
}

fn family_for(name: &str) -> fontdb::Family<'_> {
    match name {
        "sans-serif" => fontdb::Family::SansSerif,
        "serif" => fontdb::Family::Serif,
        "monospace" => fontdb::Family::Monospace,
        other => fontdb::Family::Name(other),
    }
}

/// Installed families tried, in order, for the generic `sans-serif` name.
const SANS_SERIF_CANDIDATES: [&str; 8] = [
    "Noto Sans CJK JP",
    "Noto Sans JP",
    "Arial",
    "Helvetica",
    "DejaVu Sans",
    "Noto Sans",
    "Liberation Sans",
    "Roboto",
];

/// Pick the family `sans-serif` should mean in `db`.
///
/// fontdb defaults the generic to Arial, which most Linux hosts lack.
fn pick_sans_family(db: &fontdb::Database) -> Option<String> {
    let has_family = |wanted: &str| {
        db.faces()
            .any(|f| f.families.iter().any(|(name, _)| name == wanted))
    };
    if let Some(name) = SANS_SERIF_CANDIDATES.into_iter().find(|c| has_family(c)) {
        return Some(name.to_string());
    }
    db.faces().find_map(|f| {
        let (name, _) = f.families.first()?;
        looks_sans(name, f.monospaced).then(|| name.clone())
    })
}

fn looks_sans(family: &str, monospaced: bool) -> bool {
    !monospaced
        && family.contains("Sans")
        && !family.contains("Mono")
        && !family.contains("Math")
}

fn face_from_db(db: &fontdb::Database, id: fontdb::ID) -> CardResult<FontFace> {
    let family = db
        .face(id)
        .and_then(|f| f.families.first().map(|(name, _)| name.clone()))
        .unwrap_or_default();
    let (bytes, index) = db
        .with_face_data(id, |data, index| (data.to_vec(), index))
        .ok_or_else(|| CardError::font(format!("font data for '{family}' is unreadable")))?;
    Ok(FontFace {
        bytes: Arc::new(bytes),
        index,
        family,
    })
}

fn load_fonts_from_dir(db: &mut fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        tracing::debug!(dir = %dir.display(), "font directory not readable");
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        let _ = db.load_font_file(&path);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/font.rs"]
mod tests;
