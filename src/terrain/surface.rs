//! Ground surface style: flat color or image texture

use serde::{Deserialize, Serialize};

use crate::consts::{FALLBACK_SURFACE_COLOR, GROUND_COLOR};
use crate::error::SimError;

/// How the terrain surface should be shaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum SurfaceStyle {
    /// Sandy ground color
    #[default]
    Ground,
    /// RGBA color in [0, 1]
    Color([f32; 4]),
    /// Image file name to sample with the mesh UVs
    Texture(String),
    /// Input that was neither a color nor an image
    Fallback,
}

impl SurfaceStyle {
    /// Interpret user input
    ///
    /// `*.png` / `*.jpg` selects a texture, `#RRGGBBAA` a color. Anything
    /// else falls back to translucent white.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        match Self::try_parse(input) {
            Ok(style) => style,
            Err(e) => {
                log::info!("{}, using fallback color", e);
                SurfaceStyle::Fallback
            }
        }
    }

    /// Strict variant of [`SurfaceStyle::parse`]
    pub fn try_parse(input: &str) -> Result<Self, SimError> {
        let lower = input.to_ascii_lowercase();
        if lower.ends_with(".png") || lower.ends_with(".jpg") {
            return Ok(SurfaceStyle::Texture(input.to_string()));
        }
        parse_hex_rgba(input)
            .map(SurfaceStyle::Color)
            .ok_or_else(|| SimError::InvalidSurface(input.to_string()))
    }

    /// Flat color, or None when a texture supplies it
    pub fn color(&self) -> Option<[f32; 4]> {
        match self {
            SurfaceStyle::Ground => Some(GROUND_COLOR),
            SurfaceStyle::Color(c) => Some(*c),
            SurfaceStyle::Texture(_) => None,
            SurfaceStyle::Fallback => Some(FALLBACK_SURFACE_COLOR),
        }
    }

    pub fn is_textured(&self) -> bool {
        matches!(self, SurfaceStyle::Texture(_))
    }
}

/// `#RRGGBBAA` to normalized RGBA
fn parse_hex_rgba(input: &str) -> Option<[f32; 4]> {
    let hex = input.strip_prefix('#')?;
    if hex.len() != 8 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let mut rgba = [0.0; 4];
    for (i, channel) in rgba.iter_mut().enumerate() {
        let byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok()?;
        *channel = byte as f32 / 255.0;
    }
    Some(rgba)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_texture_names() {
        assert_eq!(
            SurfaceStyle::parse("grass.PNG"),
            SurfaceStyle::Texture("grass.PNG".into())
        );
        assert!(SurfaceStyle::parse("rock.jpg").is_textured());
        assert_eq!(SurfaceStyle::parse("rock.jpg").color(), None);
    }

    #[test]
    fn test_parse_hex_color() {
        let style = SurfaceStyle::parse("#ff800040");
        let c = style.color().unwrap();
        assert_eq!(c[0], 1.0);
        assert!((c[1] - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c[2], 0.0);
        assert!((c[3] - 64.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_parse_rejects_short_and_non_hex() {
        for bad in ["#ff8000", "#gg000000", "ff800040", "", "#ff8000400"] {
            assert_eq!(SurfaceStyle::parse(bad), SurfaceStyle::Fallback);
            assert!(SurfaceStyle::try_parse(bad).is_err());
        }
        assert_eq!(SurfaceStyle::Fallback.color(), Some(FALLBACK_SURFACE_COLOR));
    }

    #[test]
    fn test_default_is_ground() {
        assert_eq!(SurfaceStyle::default().color(), Some(GROUND_COLOR));
    }
}
