use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;

use crate::{
    assets::{
        decode::load_image_file,
        font::{FontConfig, resolve_font},
    },
    card::{
        fields::{DateParts, FieldInput},
        session::{CardCommand, CardSession},
        slot::Slot,
    },
    foundation::error::{CardError, CardResult},
    text::fit::{TextFitRenderer, TextStyle},
};

/// JSON description of one card, resolved relative to the manifest's directory.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CardManifest {
    /// Frame artwork image; its size becomes the card size.
    pub frame: String,
    /// Font lookup; defaults apply when absent.
    #[serde(default)]
    pub fonts: Option<FontConfig>,
    /// Photo per slot.
    #[serde(default)]
    pub slots: BTreeMap<Slot, SlotSource>,
    /// Commander name.
    #[serde(default)]
    pub commander: String,
    /// Server name.
    #[serde(default)]
    pub server: String,
    /// Date sub-values.
    #[serde(default)]
    pub date: DateParts,
    /// Free-form comment; may contain line breaks.
    #[serde(default)]
    pub comment: String,
}

/// Image file for a slot plus its crop origin.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlotSource {
    /// Image path relative to the manifest.
    pub image: String,
    /// Crop origin x in source pixels.
    #[serde(default)]
    pub sx: f64,
    /// Crop origin y in source pixels.
    #[serde(default)]
    pub sy: f64,
}

impl CardManifest {
    /// Read and parse a manifest file.
    pub fn from_path(path: &Path) -> CardResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read manifest '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Parse a manifest from JSON text.
    pub fn from_json_str(text: &str) -> CardResult<Self> {
        serde_json::from_str(text).map_err(|e| CardError::serde(e.to_string()))
    }

    /// Whether any text input is non-empty.
    pub fn has_text(&self) -> bool {
        [
            &self.commander,
            &self.server,
            &self.date.year,
            &self.date.month,
            &self.date.day,
            &self.comment,
        ]
        .iter()
        .any(|s| !s.is_empty())
    }

    fn text_inputs(&self) -> [(FieldInput, &str); 6] {
        [
            (FieldInput::Commander, self.commander.as_str()),
            (FieldInput::Server, self.server.as_str()),
            (FieldInput::Year, self.date.year.as_str()),
            (FieldInput::Month, self.date.month.as_str()),
            (FieldInput::Day, self.date.day.as_str()),
            (FieldInput::Comment, self.comment.as_str()),
        ]
    }

    /// Load every referenced asset and return a rendered session.
    ///
    /// The frame must decode. Slot files must exist, but one that fails to decode is
    /// logged and its slot left empty. A font is only resolved when the manifest carries
    /// text.
    #[tracing::instrument(skip_all, fields(root = %root.display()))]
    pub fn build_session(&self, root: &Path) -> CardResult<CardSession> {
        let frame = load_image_file(&resolve_path(root, &self.frame)?)?;

        let text = if self.has_text() {
            let config = self.fonts.clone().unwrap_or_default();
            let face = resolve_font(&config)?;
            tracing::info!(family = %face.family, "using font");
            Some(TextFitRenderer::new(&face, TextStyle::default())?)
        } else {
            None
        };

        let mut session = CardSession::new(Arc::new(frame), text)?;

        for (slot, src) in &self.slots {
            let path = resolve_path(root, &src.image)?;
            let bytes = std::fs::read(&path)
                .with_context(|| format!("read slot image '{}'", path.display()))?;
            let ticket = session.begin_load(*slot)?;
            session.finish_load_bytes(ticket, &bytes)?;
            session.apply(CardCommand::SetSourceOrigin {
                slot: *slot,
                sx: src.sx,
                sy: src.sy,
            })?;
        }

        for (input, value) in self.text_inputs() {
            if value.is_empty() {
                continue;
            }
            session.apply(CardCommand::SetField {
                input,
                value: value.to_string(),
            })?;
        }

        Ok(session)
    }
}

fn resolve_path(root: &Path, rel: &str) -> CardResult<PathBuf> {
    Ok(root.join(normalize_rel_path(rel)?))
}

/// Normalize a manifest-relative path: `/` separators, no `.` segments, no `..`, not absolute.
pub fn normalize_rel_path(source: &str) -> CardResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(CardError::validation("manifest paths must be relative"));
    }
    if s.is_empty() {
        return Err(CardError::validation("manifest path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(CardError::validation("manifest paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(CardError::validation(
            "manifest path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../tests/unit/manifest.rs"]
mod tests;
