//! Style name to visual effect mapping
//!
//! The document only carries style names. This is where a name becomes
//! something visible.

use editor_core::{InlineStyle, StyleSet};
use serde::{Deserialize, Serialize};

/// Terminal color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl Color {
    fn index(self) -> u8 {
        match self {
            Color::Black => 0,
            Color::Red => 1,
            Color::Green => 2,
            Color::Yellow => 3,
            Color::Blue => 4,
            Color::Magenta => 5,
            Color::Cyan => 6,
            Color::White => 7,
        }
    }

    /// SGR parameter selecting this color as foreground
    pub fn foreground_code(self) -> u8 {
        30 + self.index()
    }

    /// SGR parameter selecting this color as background
    pub fn background_code(self) -> u8 {
        40 + self.index()
    }
}

/// How a run of text looks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualEffect {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Color>,
}

impl VisualEffect {
    pub const PLAIN: Self = Self {
        bold: false,
        underline: false,
        foreground: None,
        background: None,
    };

    pub fn bold() -> Self {
        Self {
            bold: true,
            ..Self::PLAIN
        }
    }

    pub fn underline() -> Self {
        Self {
            underline: true,
            ..Self::PLAIN
        }
    }

    pub fn foreground(color: Color) -> Self {
        Self {
            foreground: Some(color),
            ..Self::PLAIN
        }
    }

    pub fn background(color: Color) -> Self {
        Self {
            background: Some(color),
            ..Self::PLAIN
        }
    }

    pub fn is_plain(&self) -> bool {
        *self == Self::PLAIN
    }

    /// Combines two effects; colors from `other` win
    pub fn merge(self, other: VisualEffect) -> Self {
        Self {
            bold: self.bold || other.bold,
            underline: self.underline || other.underline,
            foreground: other.foreground.or(self.foreground),
            background: other.background.or(self.background),
        }
    }

    /// SGR parameters for this effect, in a fixed order
    pub fn sgr_codes(&self) -> Vec<u8> {
        let mut codes = Vec::new();
        if self.bold {
            codes.push(1);
        }
        if self.underline {
            codes.push(4);
        }
        if let Some(color) = self.foreground {
            codes.push(color.foreground_code());
        }
        if let Some(color) = self.background {
            codes.push(color.background_code());
        }
        codes
    }
}

/// Mapping from inline style to visual effect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleMap {
    effects: Vec<(InlineStyle, VisualEffect)>,
}

impl StyleMap {
    /// Empty map; every style renders plain
    pub fn empty() -> Self {
        Self {
            effects: Vec::new(),
        }
    }

    /// Replaces the effect for `style`
    pub fn set(&mut self, style: InlineStyle, effect: VisualEffect) {
        match self.effects.iter_mut().find(|(s, _)| *s == style) {
            Some(entry) => entry.1 = effect,
            None => self.effects.push((style, effect)),
        }
    }

    pub fn with(mut self, style: InlineStyle, effect: VisualEffect) -> Self {
        self.set(style, effect);
        self
    }

    pub fn effect_for(&self, style: InlineStyle) -> VisualEffect {
        self.effects
            .iter()
            .find(|(s, _)| *s == style)
            .map(|(_, effect)| *effect)
            .unwrap_or_default()
    }

    /// Merged effect of every style in `styles`
    pub fn effect_for_set(&self, styles: StyleSet) -> VisualEffect {
        styles
            .iter()
            .fold(VisualEffect::PLAIN, |acc, style| acc.merge(self.effect_for(style)))
    }
}

impl Default for StyleMap {
    fn default() -> Self {
        Self::empty()
            .with(InlineStyle::Bold, VisualEffect::bold())
            .with(InlineStyle::ColorRed, VisualEffect::foreground(Color::Red))
            .with(InlineStyle::Underline, VisualEffect::underline())
            .with(InlineStyle::Highlight, VisualEffect::background(Color::Yellow))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_map() {
        let map = StyleMap::default();
        assert_eq!(map.effect_for(InlineStyle::Bold), VisualEffect::bold());
        assert_eq!(
            map.effect_for(InlineStyle::ColorRed).foreground,
            Some(Color::Red)
        );
        assert_eq!(
            map.effect_for(InlineStyle::Highlight).background,
            Some(Color::Yellow)
        );
        assert!(map.effect_for(InlineStyle::Underline).underline);
    }

    #[test]
    fn test_overlapping_styles_merge() {
        let map = StyleMap::default();
        let styles = StyleSet::of(InlineStyle::Bold)
            .with(InlineStyle::ColorRed)
            .with(InlineStyle::Highlight);
        let effect = map.effect_for_set(styles);
        assert!(effect.bold);
        assert_eq!(effect.foreground, Some(Color::Red));
        assert_eq!(effect.background, Some(Color::Yellow));
        assert_eq!(effect.sgr_codes(), vec![1, 31, 43]);
    }

    #[test]
    fn test_set_replaces() {
        let mut map = StyleMap::default();
        map.set(InlineStyle::ColorRed, VisualEffect::foreground(Color::Magenta));
        assert_eq!(
            map.effect_for(InlineStyle::ColorRed).foreground,
            Some(Color::Magenta)
        );
        assert!(StyleMap::empty().effect_for(InlineStyle::Bold).is_plain());
    }
}
