//! Inline styles

use core::fmt;
use serde::{Deserialize, Serialize};

/// Character-range-scoped visual mark
///
/// The engine only manipulates the style name; how a style looks is the
/// renderer's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum InlineStyle {
    #[serde(rename = "BOLD")]
    Bold,
    #[serde(rename = "COLOR_RED")]
    ColorRed,
    #[serde(rename = "UNDERLINE")]
    Underline,
    #[serde(rename = "HIGHLIGHT")]
    Highlight,
}

impl InlineStyle {
    pub const ALL: [InlineStyle; 4] = [
        InlineStyle::Bold,
        InlineStyle::ColorRed,
        InlineStyle::Underline,
        InlineStyle::Highlight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InlineStyle::Bold => "BOLD",
            InlineStyle::ColorRed => "COLOR_RED",
            InlineStyle::Underline => "UNDERLINE",
            InlineStyle::Highlight => "HIGHLIGHT",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|style| style.as_str() == name)
    }

    const fn bit(self) -> u8 {
        match self {
            InlineStyle::Bold => 1 << 0,
            InlineStyle::ColorRed => 1 << 1,
            InlineStyle::Underline => 1 << 2,
            InlineStyle::Highlight => 1 << 3,
        }
    }
}

impl fmt::Display for InlineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of inline styles active on one character
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StyleSet {
    bits: u8,
}

impl StyleSet {
    pub const EMPTY: Self = Self { bits: 0 };

    pub fn new() -> Self {
        Self::EMPTY
    }

    pub fn of(style: InlineStyle) -> Self {
        Self { bits: style.bit() }
    }

    pub fn with(mut self, style: InlineStyle) -> Self {
        self.bits |= style.bit();
        self
    }

    pub fn without(mut self, style: InlineStyle) -> Self {
        self.bits &= !style.bit();
        self
    }

    /// Flips one style in the set
    pub fn toggled(self, style: InlineStyle) -> Self {
        if self.contains(style) {
            self.without(style)
        } else {
            self.with(style)
        }
    }

    pub fn contains(&self, style: InlineStyle) -> bool {
        self.bits & style.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Styles in declaration order
    pub fn iter(&self) -> impl Iterator<Item = InlineStyle> + '_ {
        InlineStyle::ALL
            .into_iter()
            .filter(move |style| self.contains(*style))
    }
}

impl FromIterator<InlineStyle> for StyleSet {
    fn from_iter<I: IntoIterator<Item = InlineStyle>>(iter: I) -> Self {
        iter.into_iter().fold(StyleSet::new(), StyleSet::with)
    }
}

impl fmt::Display for StyleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        for (i, style) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("+")?;
            }
            f.write_str(style.as_str())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_style_names() {
        assert_eq!(InlineStyle::Bold.as_str(), "BOLD");
        assert_eq!(InlineStyle::ColorRed.as_str(), "COLOR_RED");
        assert_eq!(InlineStyle::from_name("HIGHLIGHT"), Some(InlineStyle::Highlight));
        assert_eq!(InlineStyle::from_name("ITALIC"), None);
    }

    #[test]
    fn test_style_set_toggle() {
        let set = StyleSet::new().toggled(InlineStyle::Bold);
        assert!(set.contains(InlineStyle::Bold));
        assert_eq!(set.toggled(InlineStyle::Bold), StyleSet::EMPTY);
    }

    #[test]
    fn test_style_set_iter_order() {
        let set: StyleSet = [InlineStyle::Highlight, InlineStyle::Bold].into_iter().collect();
        let styles: alloc::vec::Vec<_> = set.iter().collect();
        assert_eq!(styles, [InlineStyle::Bold, InlineStyle::Highlight]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.to_string(), "BOLD+HIGHLIGHT");
    }

    #[test]
    fn test_style_serializes_as_engine_name() {
        let json = serde_json::to_string(&InlineStyle::ColorRed).unwrap();
        assert_eq!(json, "\"COLOR_RED\"");
    }
}
