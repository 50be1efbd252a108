use serde::{
    Deserialize, Deserializer,
    de::{self, Visitor},
};
use std::fmt;
use std::str::FromStr;

/// An RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub(crate) const BLACK: Rgb = Rgb::new(0, 0, 0);

    /// The color every unlit cell takes.
    pub(crate) const BACKGROUND: Rgb = Rgb::new(17, 24, 39);

    pub(crate) const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Apply `f` to every channel.
    pub(crate) fn map(self, f: impl Fn(u8) -> u8) -> Self {
        Self::new(f(self.r), f(self.g), f(self.b))
    }

    /// Blend this color over `base` with the given opacity (0.0 - 1.0).
    pub(crate) fn blend_over(self, base: Rgb, alpha: f32) -> Self {
        let alpha = alpha.clamp(0.0, 1.0);
        let channel = |top: u8, bottom: u8| (bottom as f32 + (top as f32 - bottom as f32) * alpha).round() as u8;
        Self::new(channel(self.r, base.r), channel(self.g, base.g), channel(self.b, base.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<Rgb> for crossterm::style::Color {
    fn from(color: Rgb) -> Self {
        Self::Rgb { r: color.r, g: color.g, b: color.b }
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let hex = input.strip_prefix('#').unwrap_or(input);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(ColorParseError(input.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| ColorParseError(input.to_string()))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RgbVisitor)
    }
}

struct RgbVisitor;

impl Visitor<'_> for RgbVisitor {
    type Value = Rgb;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a quoted hex color like \"#00ff78\"")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        value.parse().map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Err(E::custom(format!("color {value} was read as a number: hex colors must be quoted, e.g. \"#{value:0>6}\"")))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Err(E::custom(format!("color {value} was read as a number: hex colors must be quoted")))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        Err(E::custom(format!("color {value} was read as a number: hex colors must be quoted")))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Err(E::custom("missing color: hex colors must be quoted since an unquoted '#' starts a comment"))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        self.visit_unit()
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("invalid color '{0}': expected a hex color like #00ff78")]
pub struct ColorParseError(String);

/// The ordered list of base colors the wave cycles through.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Palette(Vec<Rgb>);

impl Palette {
    /// Build a palette. Returns `None` if there are no colors.
    pub(crate) fn new(colors: Vec<Rgb>) -> Option<Self> {
        if colors.is_empty() { None } else { Some(Self(colors)) }
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    /// Get the color at `index`, wrapping around the end of the palette.
    pub(crate) fn color(&self, index: usize) -> Rgb {
        self.0[index % self.0.len()]
    }

    /// The palette index that follows `index`.
    pub(crate) fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.0.len()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self(vec![
            // green
            Rgb::new(0, 255, 120),
            // sky
            Rgb::new(0, 200, 255),
            // blue
            Rgb::new(0, 100, 255),
            // violet
            Rgb::new(180, 0, 255),
            // pink
            Rgb::new(255, 0, 150),
        ])
    }
}

/// Context passed to an animation when coloring a single grid cell.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CellContext {
    /// Row of the cell, 0 being the top one.
    pub row: usize,
    /// Column of the cell, 0 being the leftmost one.
    pub col: usize,
}

/// Something that can color every cell of the grid.
pub(crate) trait Animation {
    /// Compute the color of a single cell.
    fn render_cell(&self, ctx: &CellContext) -> Rgb;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::lowercase("#00ff78", Rgb::new(0, 255, 120))]
    #[case::uppercase("#B400FF", Rgb::new(180, 0, 255))]
    #[case::no_hash("111827", Rgb::new(17, 24, 39))]
    fn parse_color(#[case] input: &str, #[case] expected: Rgb) {
        let color: Rgb = input.parse().expect("parse failed");
        assert_eq!(color, expected);
    }

    #[rstest]
    #[case::too_short("#fff")]
    #[case::not_hex("#gg0000")]
    #[case::empty("")]
    #[case::multibyte("#ff00é")]
    fn parse_invalid_color(#[case] input: &str) {
        assert!(input.parse::<Rgb>().is_err());
    }

    #[rstest]
    #[case::quoted("\"#b400ff\"", Rgb::new(180, 0, 255))]
    #[case::quoted_no_hash("'00c8ff'", Rgb::new(0, 200, 255))]
    #[case::unquoted_letters("ff0096", Rgb::new(255, 0, 150))]
    fn deserialize_color(#[case] input: &str, #[case] expected: Rgb) {
        let color: Rgb = serde_yaml::from_str(input).expect("deserialize failed");
        assert_eq!(color, expected);
    }

    #[rstest]
    #[case::digits_only("111827")]
    #[case::null("~")]
    fn deserialize_unquoted_color(#[case] input: &str) {
        let error = serde_yaml::from_str::<Rgb>(input).expect_err("deserialize succeeded");
        assert!(error.to_string().contains("must be quoted"), "{error}");
    }

    #[test]
    fn display_as_hex() {
        assert_eq!(Rgb::new(0, 200, 255).to_string(), "#00c8ff");
    }

    #[test]
    fn map_channels() {
        assert_eq!(Rgb::new(255, 100, 3).map(|c| c / 2), Rgb::new(127, 50, 1));
    }

    #[test]
    fn blend_over_black() {
        let glow = Rgb::new(0, 255, 120).blend_over(Rgb::BLACK, 0.3);
        assert_eq!(glow, Rgb::new(0, 77, 36));
    }

    #[test]
    fn palette_wraps() {
        let palette = Palette::default();
        assert_eq!(palette.len(), 5);
        assert_eq!(palette.next_index(4), 0);
        assert_eq!(palette.color(5), palette.color(0));
    }

    #[test]
    fn empty_palette() {
        assert!(Palette::new(vec![]).is_none());
    }
}
