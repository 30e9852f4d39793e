use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;
use ttf_parser::Face;

static TEXT_MEASURER: Lazy<Mutex<TextMeasurer>> = Lazy::new(|| Mutex::new(TextMeasurer::new()));

/// Measures the rendered width of a single line of text. Returns `None` when
/// no matching system font can be resolved; callers fall back to an estimate.
pub fn measure_text_width(text: &str, font_size: f32, font_family: &str) -> Option<f32> {
    if text.is_empty() || font_size <= 0.0 {
        return Some(0.0);
    }
    let mut guard = TEXT_MEASURER.lock().ok()?;
    guard.measure(text, font_size, font_family)
}

struct TextMeasurer {
    db: Database,
    loaded_system_fonts: bool,
    cache: HashMap<String, Option<FontFace>>,
}

impl TextMeasurer {
    fn new() -> Self {
        Self {
            db: Database::new(),
            loaded_system_fonts: false,
            cache: HashMap::new(),
        }
    }

    fn measure(&mut self, text: &str, font_size: f32, font_family: &str) -> Option<f32> {
        let family_key = normalize_family_key(font_family);
        if !self.cache.contains_key(&family_key) {
            let face = self.load_face(font_family);
            self.cache.insert(family_key.clone(), face);
        }
        let face = self.cache.get(&family_key).and_then(|face| face.as_ref())?;
        let normalized = text.replace('\t', "    ");
        Some(face.measure_width(&normalized, font_size))
    }

    fn load_face(&mut self, font_family: &str) -> Option<FontFace> {
        let mut names: Vec<String> = Vec::new();
        let mut generics: Vec<Family<'static>> = Vec::new();
        for part in font_family.split(',') {
            let raw = part.trim().trim_matches('"').trim_matches('\'');
            if raw.is_empty() {
                continue;
            }
            match raw.to_ascii_lowercase().as_str() {
                "serif" => generics.push(Family::Serif),
                "sans-serif" | "system-ui" | "-apple-system" | "ui-sans-serif" => {
                    generics.push(Family::SansSerif)
                }
                "monospace" | "ui-monospace" => generics.push(Family::Monospace),
                "cursive" => generics.push(Family::Cursive),
                "fantasy" => generics.push(Family::Fantasy),
                _ => names.push(raw.to_string()),
            }
        }

        let mut families: Vec<Family<'_>> = names.iter().map(|n| Family::Name(n.as_str())).collect();
        families.extend(generics);
        if families.is_empty() {
            families.push(Family::SansSerif);
        }

        if !self.loaded_system_fonts {
            self.db.load_system_fonts();
            self.loaded_system_fonts = true;
        }

        let query = Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = self.db.query(&query)?;
        let mut loaded: Option<FontFace> = None;
        self.db.with_face_data(id, |data, index| {
            if let Ok(face) = Face::parse(data, index) {
                loaded = Some(FontFace::new(data.to_vec(), index, &face));
            }
        });
        loaded
    }
}

struct FontFace {
    data: Vec<u8>,
    index: u32,
    units_per_em: u16,
    ascii_advances: [u16; 128],
}

impl FontFace {
    fn new(data: Vec<u8>, index: u32, face: &Face<'_>) -> Self {
        let mut ascii_advances = [0u16; 128];
        for byte in 0u8..=127 {
            if let Some(glyph_id) = face.glyph_index(byte as char) {
                ascii_advances[byte as usize] = face.glyph_hor_advance(glyph_id).unwrap_or(0);
            }
        }
        Self {
            data,
            index,
            units_per_em: face.units_per_em().max(1),
            ascii_advances,
        }
    }

    fn measure_width(&self, text: &str, font_size: f32) -> f32 {
        let scale = font_size / self.units_per_em as f32;
        let fallback = font_size * 0.56;

        if text.is_ascii() {
            let mut width = 0.0f32;
            for byte in text.as_bytes() {
                if *byte == b'\n' {
                    continue;
                }
                let advance = self.ascii_advances[*byte as usize];
                if advance == 0 {
                    width += fallback;
                } else {
                    width += advance as f32 * scale;
                }
            }
            return width.max(0.0);
        }

        // Non-ASCII text is rare in this data; re-parsing the face per call
        // keeps the cache simple.
        let Ok(face) = Face::parse(&self.data, self.index) else {
            return text.chars().filter(|ch| *ch != '\n').count() as f32 * fallback;
        };
        let mut width = 0.0f32;
        for ch in text.chars() {
            if ch == '\n' {
                continue;
            }
            match face.glyph_index(ch) {
                Some(glyph_id) => {
                    let advance = face.glyph_hor_advance(glyph_id).unwrap_or(0);
                    width += advance as f32 * scale;
                }
                None => width += fallback,
            }
        }
        width.max(0.0)
    }
}

fn normalize_family_key(font_family: &str) -> String {
    let trimmed = font_family.trim();
    if trimmed.is_empty() {
        "sans-serif".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_zero() {
        assert_eq!(measure_text_width("", 14.0, "sans-serif"), Some(0.0));
    }

    #[test]
    fn wider_text_measures_wider() {
        // Skip silently on systems without fonts; layout has its own fallback.
        let short = measure_text_width("abc", 14.0, "sans-serif");
        let long = measure_text_width("abcabcabc", 14.0, "sans-serif");
        if let (Some(short), Some(long)) = (short, long) {
            assert!(long > short);
        }
    }
}
