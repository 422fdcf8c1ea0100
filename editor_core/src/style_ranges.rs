//! Per-block inline style ranges
//!
//! Each style maps to a sorted list of half-open character spans. Spans of the
//! same style never overlap or touch: they are merged on every write, so two
//! blocks carrying the same styling always compare equal.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::style::{InlineStyle, StyleSet};

/// Half-open character span `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// Creates a span, swapping the bounds if given backwards
    pub fn new(a: usize, b: usize) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

/// Style ranges of one block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleRanges {
    ranges: BTreeMap<InlineStyle, Vec<Span>>,
}

impl StyleRanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Spans carrying `style`, sorted
    pub fn spans(&self, style: InlineStyle) -> &[Span] {
        self.ranges.get(&style).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every `(style, span)` pair, style-major
    pub fn iter(&self) -> impl Iterator<Item = (InlineStyle, Span)> + '_ {
        self.ranges
            .iter()
            .flat_map(|(style, spans)| spans.iter().map(move |span| (*style, *span)))
    }

    /// Styles active on the character at `offset`
    pub fn styles_at(&self, offset: usize) -> StyleSet {
        self.ranges
            .iter()
            .filter(|(_, spans)| spans.iter().any(|span| span.contains(offset)))
            .map(|(style, _)| *style)
            .collect()
    }

    /// True when every character of `span` carries `style`
    ///
    /// An empty span is never covered.
    pub fn covers(&self, style: InlineStyle, span: Span) -> bool {
        if span.is_empty() {
            return false;
        }
        self.spans(style)
            .iter()
            .any(|r| r.start <= span.start && r.end >= span.end)
    }

    pub fn apply(&mut self, style: InlineStyle, span: Span) {
        if span.is_empty() {
            return;
        }
        let spans = self.ranges.entry(style).or_default();
        spans.push(span);
        normalize(spans);
    }

    pub fn remove(&mut self, style: InlineStyle, span: Span) {
        if span.is_empty() {
            return;
        }
        if let Some(spans) = self.ranges.get_mut(&style) {
            let mut kept = Vec::with_capacity(spans.len() + 1);
            for r in spans.iter() {
                if r.end <= span.start || r.start >= span.end {
                    kept.push(*r);
                    continue;
                }
                if r.start < span.start {
                    kept.push(Span::new(r.start, span.start));
                }
                if r.end > span.end {
                    kept.push(Span::new(span.end, r.end));
                }
            }
            *spans = kept;
        }
        self.prune();
    }

    /// Shifts spans for `count` characters inserted at `at`; the inserted
    /// characters carry exactly `styles`
    pub fn insert(&mut self, at: usize, count: usize, styles: StyleSet) {
        if count == 0 {
            return;
        }
        for spans in self.ranges.values_mut() {
            let mut shifted = Vec::with_capacity(spans.len() + 1);
            for r in spans.iter() {
                if r.end <= at {
                    shifted.push(*r);
                } else if r.start >= at {
                    shifted.push(Span::new(r.start + count, r.end + count));
                } else {
                    shifted.push(Span::new(r.start, at));
                    shifted.push(Span::new(at + count, r.end + count));
                }
            }
            *spans = shifted;
        }
        for style in styles.iter() {
            self.apply(style, Span::new(at, at + count));
        }
        for spans in self.ranges.values_mut() {
            normalize(spans);
        }
    }

    /// Collapses the characters of `removed` out of every span
    pub fn delete(&mut self, removed: Span) {
        if removed.is_empty() {
            return;
        }
        let map = |p: usize| {
            if p <= removed.start {
                p
            } else if p >= removed.end {
                p - removed.len()
            } else {
                removed.start
            }
        };
        for spans in self.ranges.values_mut() {
            for r in spans.iter_mut() {
                *r = Span::new(map(r.start), map(r.end));
            }
            normalize(spans);
        }
        self.prune();
    }

    /// Splits into the ranges before and after `at`, the latter rebased to 0
    pub fn split(&self, at: usize) -> (StyleRanges, StyleRanges) {
        let mut left = StyleRanges::new();
        let mut right = StyleRanges::new();
        for (style, span) in self.iter() {
            if span.start < at {
                left.apply(style, Span::new(span.start, span.end.min(at)));
            }
            if span.end > at {
                right.apply(style, Span::new(span.start.max(at) - at, span.end - at));
            }
        }
        (left, right)
    }

    /// Appends `other`, whose offsets start at `offset` in the joined text
    pub fn append(&mut self, other: &StyleRanges, offset: usize) {
        for (style, span) in other.iter() {
            self.apply(style, Span::new(span.start + offset, span.end + offset));
        }
    }

    /// Clips every span to `[0, len)`
    pub fn clamp(&mut self, len: usize) {
        for spans in self.ranges.values_mut() {
            for r in spans.iter_mut() {
                *r = Span::new(r.start.min(len), r.end.min(len));
            }
            normalize(spans);
        }
        self.prune();
    }

    fn prune(&mut self) {
        self.ranges.retain(|_, spans| !spans.is_empty());
    }
}

/// Sorts, drops empty spans, and merges overlapping or touching ones
fn normalize(spans: &mut Vec<Span>) {
    spans.retain(|span| !span.is_empty());
    spans.sort();
    let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
    for span in spans.drain(..) {
        match merged.last_mut() {
            Some(last) if span.start <= last.end => last.end = last.end.max(span.end),
            _ => merged.push(span),
        }
    }
    *spans = merged;
}
