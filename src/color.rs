//! RGBA color type with hex parsing

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid hex color: {0}")]
    InvalidHexColor(String),
}

/// RGBA color (0.0-1.0 range for D2D compatibility)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    /// Create color from RGB values (0-255)
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Create color from RGBA values (0-255)
    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Parse hex color string (#RGB, #RRGGBB, #RRGGBBAA)
    pub fn from_hex(hex: &str) -> Result<Self, ParseError> {
        let stripped = hex.trim_start_matches('#');

        match stripped.len() {
            3 => {
                // #RGB -> #RRGGBB
                let r = parse_hex_digit(stripped, 0)? * 17;
                let g = parse_hex_digit(stripped, 1)? * 17;
                let b = parse_hex_digit(stripped, 2)? * 17;
                Ok(Self::rgb(r, g, b))
            }
            6 => {
                let r = parse_hex_byte(stripped, 0)?;
                let g = parse_hex_byte(stripped, 2)?;
                let b = parse_hex_byte(stripped, 4)?;
                Ok(Self::rgb(r, g, b))
            }
            8 => {
                let r = parse_hex_byte(stripped, 0)?;
                let g = parse_hex_byte(stripped, 2)?;
                let b = parse_hex_byte(stripped, 4)?;
                let a = parse_hex_byte(stripped, 6)?;
                Ok(Self::rgba(r, g, b, a))
            }
            _ => Err(ParseError::InvalidHexColor(hex.to_string())),
        }
    }
}

fn parse_hex_digit(s: &str, at: usize) -> Result<u8, ParseError> {
    u8::from_str_radix(&s[at..at + 1], 16).map_err(|_| ParseError::InvalidHexColor(s.to_string()))
}

fn parse_hex_byte(s: &str, at: usize) -> Result<u8, ParseError> {
    u8::from_str_radix(&s[at..at + 2], 16).map_err(|_| ParseError::InvalidHexColor(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        let c = Color::from_hex("#fff").unwrap();
        assert_eq!(c, Color::WHITE);

        let c = Color::from_hex("#ff0000").unwrap();
        assert_eq!(c.r, 1.0);
        assert_eq!(c.g, 0.0);
        assert_eq!(c.b, 0.0);

        let c = Color::from_hex("#ff000080").unwrap();
        assert!((c.a - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_hex_rejects_garbage() {
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#zzzzzz").is_err());
        assert!(Color::from_hex("").is_err());
    }
}
