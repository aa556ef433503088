//! Hex color parsing for color-block items
//!
//! Accepts `#RRGGBB` (full opacity) and `#AARRGGBB`. The `#` prefix is optional.

/// Straight (non-premultiplied) RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl HexColor {
    pub fn parse(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        // from_str_radix accepts a leading sign, so check every digit first
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

        match hex.len() {
            6 => Some(Self {
                r: byte(0)?,
                g: byte(2)?,
                b: byte(4)?,
                a: 0xFF,
            }),
            8 => Some(Self {
                a: byte(0)?,
                r: byte(2)?,
                g: byte(4)?,
                b: byte(6)?,
            }),
            _ => None,
        }
    }

    pub fn rgba(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn to_egui(&self) -> egui::Color32 {
        egui::Color32::from_rgba_unmultiplied(self.r, self.g, self.b, self.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::board::COLOR_PALETTE;

    #[test]
    fn test_parse_rgb() {
        assert_eq!(
            HexColor::parse("#e0f2fe"),
            Some(HexColor { r: 0xE0, g: 0xF2, b: 0xFE, a: 0xFF })
        );
        assert_eq!(HexColor::parse("E0F2FE"), HexColor::parse("#e0f2fe"));
    }

    #[test]
    fn test_parse_argb() {
        assert_eq!(
            HexColor::parse("#7F000000").map(|c| c.rgba()),
            Some([0, 0, 0, 0x7F])
        );
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(HexColor::parse(""), None);
        assert_eq!(HexColor::parse("#12345"), None);
        assert_eq!(HexColor::parse("#gg0000"), None);
        assert_eq!(HexColor::parse("#ééé"), None);
    }

    #[test]
    fn test_parse_rejects_signed_pairs() {
        assert_eq!(HexColor::parse("#+f+f+f"), None);
        assert_eq!(HexColor::parse("+fffff"), None);
        assert_eq!(HexColor::parse("#-1ffffff"), None);
    }

    #[test]
    fn test_palette_parses() {
        for hex in COLOR_PALETTE {
            assert!(HexColor::parse(hex).is_some(), "palette entry {hex} should parse");
        }
    }
}
