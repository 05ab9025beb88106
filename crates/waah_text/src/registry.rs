//! Font registry for system font discovery and caching
//!
//! Uses fontdb to discover system fonts by family name or generic category.
//! Lookups never fail: the order in which candidates are tried is given by
//! [`fallback_chain`], and a face with no glyphs is the last resort.

use crate::font::{FontFace, FontStyle};
use crate::{Result, TextError};
use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex, OnceLock};

/// Generic font category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GenericFont {
    Serif,
    #[default]
    SansSerif,
    Monospace,
    Cursive,
    Fantasy,
}

impl GenericFont {
    /// Recognise CSS-style generic family names
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "serif" => Some(GenericFont::Serif),
            "sans-serif" | "sans" | "system-ui" => Some(GenericFont::SansSerif),
            "monospace" | "mono" => Some(GenericFont::Monospace),
            "cursive" => Some(GenericFont::Cursive),
            "fantasy" => Some(GenericFont::Fantasy),
            _ => None,
        }
    }

    fn family(self) -> Family<'static> {
        match self {
            GenericFont::Serif => Family::Serif,
            GenericFont::SansSerif => Family::SansSerif,
            GenericFont::Monospace => Family::Monospace,
            GenericFont::Cursive => Family::Cursive,
            GenericFont::Fantasy => Family::Fantasy,
        }
    }
}

/// One step of a font lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontCandidate {
    Named(String),
    Generic(GenericFont),
    /// Any installed face
    Any,
}

/// Lookup order for a requested family: the family itself (or its generic
/// category), then sans-serif, then any installed face.
pub fn fallback_chain(family: &str) -> Vec<FontCandidate> {
    let first = match GenericFont::from_name(family) {
        Some(generic) => FontCandidate::Generic(generic),
        None => FontCandidate::Named(family.to_string()),
    };
    let mut chain = vec![first];
    let sans = FontCandidate::Generic(GenericFont::SansSerif);
    if !chain.contains(&sans) {
        chain.push(sans);
    }
    chain.push(FontCandidate::Any);
    chain
}

/// First candidate of [`fallback_chain`] that `resolve` accepts.
///
/// `None` means nothing resolved and the caller should use
/// [`FontFace::fallback`].
pub fn select_fallback<T, F>(family: &str, mut resolve: F) -> Option<T>
where
    F: FnMut(&FontCandidate) -> Option<T>,
{
    fallback_chain(family).iter().find_map(|c| resolve(c))
}

/// Metadata for an installed face
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontInfo {
    pub id: fontdb::ID,
    /// PostScript name
    pub name: String,
    pub family: String,
    pub style: String,
    pub bold: bool,
    pub italic: bool,
}

impl FontInfo {
    fn from_face(face: &fontdb::FaceInfo) -> Self {
        let bold = face.weight.0 >= Weight::BOLD.0;
        let italic = matches!(face.style, Style::Italic | Style::Oblique);
        Self {
            id: face.id,
            name: face.post_script_name.clone(),
            family: face
                .families
                .first()
                .map(|(name, _)| name.clone())
                .unwrap_or_default(),
            style: style_name(bold, italic).to_string(),
            bold,
            italic,
        }
    }
}

fn style_name(bold: bool, italic: bool) -> &'static str {
    match (bold, italic) {
        (false, false) => "Regular",
        (true, false) => "Bold",
        (false, true) => "Italic",
        (true, true) => "Bold Italic",
    }
}

/// Font registry that discovers and caches system fonts
pub struct FontRegistry {
    /// fontdb database containing all known fonts
    db: Database,
    /// Loaded faces by database id
    faces: FxHashMap<fontdb::ID, Arc<FontFace>>,
}

impl FontRegistry {
    /// Create a new font registry and load system fonts
    pub fn new() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        tracing::debug!("Font registry loaded {} system faces", db.len());
        Self::with_database(db)
    }

    /// Registry without any fonts; every lookup resolves to the fallback face
    pub fn empty() -> Self {
        Self::with_database(Database::new())
    }

    pub fn with_database(db: Database) -> Self {
        Self {
            db,
            faces: FxHashMap::default(),
        }
    }

    /// All known faces, sorted by family then style
    pub fn list(&self) -> Vec<FontInfo> {
        let mut infos: Vec<FontInfo> = self.db.faces().map(FontInfo::from_face).collect();
        infos.sort_by(|a, b| (&a.family, &a.style).cmp(&(&b.family, &b.style)));
        infos
    }

    /// Find a face for `family` and `style`. Never fails.
    pub fn find(&mut self, family: &str, style: FontStyle) -> Arc<FontFace> {
        let found = select_fallback(family, |candidate| {
            let id = self.query(candidate, style)?;
            match self.face(id) {
                Ok(face) => Some(face),
                Err(e) => {
                    tracing::warn!("Skipping unreadable font for {:?}: {}", candidate, e);
                    None
                }
            }
        });

        match found {
            Some(face) => {
                if face.family().map_or(true, |f| !f.eq_ignore_ascii_case(family)) {
                    tracing::debug!(
                        "Font '{}' ({:?}) resolved to {:?}",
                        family,
                        style,
                        face.family()
                    );
                }
                face
            }
            None => {
                tracing::warn!(
                    "No font available for '{}', using built-in fallback",
                    family
                );
                Arc::new(FontFace::fallback())
            }
        }
    }

    /// Load a face by database id, cached
    pub fn face(&mut self, id: fontdb::ID) -> Result<Arc<FontFace>> {
        if let Some(face) = self.faces.get(&id) {
            return Ok(Arc::clone(face));
        }
        let info = self
            .db
            .face(id)
            .map(FontInfo::from_face)
            .ok_or_else(|| TextError::FontLoad("Font source not found".to_string()))?;
        let face = self
            .db
            .with_face_data(id, |data, index| {
                FontFace::from_data_with_index(data.to_vec(), index)
            })
            .ok_or_else(|| {
                TextError::FontLoad(format!("Failed to read font data for '{}'", info.name))
            })??;
        let face = Arc::new(face.with_metadata(info.family, info.style));
        self.faces.insert(id, Arc::clone(&face));
        Ok(face)
    }

    fn query(&self, candidate: &FontCandidate, style: FontStyle) -> Option<fontdb::ID> {
        let family = match candidate {
            FontCandidate::Named(name) => Family::Name(name),
            FontCandidate::Generic(generic) => generic.family(),
            FontCandidate::Any => {
                return self
                    .db
                    .faces()
                    .find(|f| FontInfo::from_face(f).bold == style.bold)
                    .or_else(|| self.db.faces().next())
                    .map(|f| f.id);
            }
        };
        let weight = if style.bold { Weight::BOLD } else { Weight::NORMAL };
        let styles: &[Style] = if style.italic {
            &[Style::Italic, Style::Oblique]
        } else {
            &[Style::Normal]
        };
        styles.iter().find_map(|s| {
            self.db.query(&Query {
                families: &[family],
                weight,
                style: *s,
                stretch: Stretch::Normal,
            })
        })
    }
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide registry, created with system fonts on first use
pub fn global_font_registry() -> Arc<Mutex<FontRegistry>> {
    static REGISTRY: OnceLock<Arc<Mutex<FontRegistry>>> = OnceLock::new();
    Arc::clone(REGISTRY.get_or_init(|| Arc::new(Mutex::new(FontRegistry::new()))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_for_named_family() {
        assert_eq!(
            fallback_chain("Fira Code"),
            vec![
                FontCandidate::Named("Fira Code".to_string()),
                FontCandidate::Generic(GenericFont::SansSerif),
                FontCandidate::Any,
            ]
        );
    }

    #[test]
    fn test_chain_for_generic_family() {
        assert_eq!(
            fallback_chain("monospace")[0],
            FontCandidate::Generic(GenericFont::Monospace)
        );
        // sans-serif is not repeated
        assert_eq!(fallback_chain("sans-serif").len(), 2);
    }

    #[test]
    fn test_select_fallback_skips_missing() {
        let installed = ["DejaVu Sans"];
        let pick = select_fallback("Nonexistent", |c| match c {
            FontCandidate::Named(n) if installed.contains(&n.as_str()) => Some(n.clone()),
            FontCandidate::Generic(GenericFont::SansSerif) => Some("DejaVu Sans".to_string()),
            _ => None,
        });
        assert_eq!(pick.as_deref(), Some("DejaVu Sans"));
    }

    #[test]
    fn test_select_fallback_exhausted() {
        let pick: Option<()> = select_fallback("Nonexistent", |_| None);
        assert!(pick.is_none());
    }

    #[test]
    fn test_empty_registry_returns_fallback_face() {
        let mut registry = FontRegistry::empty();
        assert!(registry.list().is_empty());
        let face = registry.find("Helvetica", FontStyle::NORMAL.bold());
        assert!(face.is_fallback());
    }

    #[test]
    fn test_system_fonts_have_metadata() {
        let mut registry = FontRegistry::new();
        let fonts = registry.list();
        // May be empty in minimal CI environments without fonts
        if fonts.is_empty() {
            println!("No fonts found - likely minimal CI environment");
            return;
        }
        let face = registry.find(&fonts[0].family, FontStyle::NORMAL);
        assert!(face.family().is_some());
        assert!(face.style().is_some());
    }

    #[test]
    fn test_generic_names() {
        assert_eq!(GenericFont::from_name("Serif"), Some(GenericFont::Serif));
        assert_eq!(GenericFont::from_name("Arial"), None);
    }
}
