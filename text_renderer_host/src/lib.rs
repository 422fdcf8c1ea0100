//! # Text Renderer Host
//!
//! Renders the rich-text document for a terminal.
//!
//! ## Philosophy
//!
//! - **Rendering is a host concern**, not an editor concern
//! - **Frames are values** - the renderer never mutates the document
//! - **Renderer is dumb and replaceable** - no editing logic
//! - **Style names stay names** until the `StyleMap` turns them into effects
//!
//! ## Responsibilities
//!
//! The text renderer host:
//! - Splits each block into runs of identical inline styles
//! - Marks the cursor
//! - Prefixes blocks by type (`# ` for headers, `> ` for quotes)
//! - Emits plain text or ANSI SGR escapes
//! - Redraws only when the document version changes

pub mod style_map;

pub use style_map::{Color, StyleMap, VisualEffect};

use editor_core::{Block, BlockKey, BlockType, Document, Selection, StyleSet};
use std::collections::HashMap;

/// Default separator width for the status line
const SEPARATOR_WIDTH: usize = 80;

/// Cursor marker in rendered output
const CURSOR: char = '|';

/// SGR reset sequence
const RESET: &str = "\x1b[0m";

/// Text with one set of inline styles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub styles: StyleSet,
}

/// A block broken into runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBlock {
    pub key: BlockKey,
    pub block_type: BlockType,
    pub runs: Vec<TextRun>,
    /// Char offset of the cursor, if it is in this block
    pub cursor: Option<usize>,
}

impl RenderedBlock {
    fn from_block(block: &Block, cursor: Option<usize>) -> Self {
        let mut runs: Vec<TextRun> = Vec::new();
        for (offset, ch) in block.text().chars().enumerate() {
            let styles = block.styles_at(offset);
            match runs.last_mut() {
                Some(run) if run.styles == styles => run.text.push(ch),
                _ => runs.push(TextRun {
                    text: ch.to_string(),
                    styles,
                }),
            }
        }
        Self {
            key: block.key().clone(),
            block_type: block.block_type(),
            runs,
            cursor,
        }
    }

    /// Prefix marking the block type in text output
    pub fn prefix(&self) -> &'static str {
        match self.block_type {
            BlockType::HeaderOne => "# ",
            BlockType::HeaderTwo => "## ",
            BlockType::HeaderThree => "### ",
            BlockType::Blockquote => "> ",
            BlockType::UnorderedListItem => "- ",
            BlockType::OrderedListItem => "1. ",
            BlockType::CodeBlock => "    ",
            BlockType::Unstyled => "",
        }
    }

    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    /// Renders the block as one line, styling each run with `style`
    fn render_line(&self, style: impl Fn(&str, StyleSet) -> String) -> String {
        let mut line = String::from(self.prefix());
        let mut offset = 0;
        for run in &self.runs {
            let len = run.text.chars().count();
            match self.cursor {
                Some(cursor) if cursor >= offset && cursor < offset + len => {
                    let split = run
                        .text
                        .char_indices()
                        .nth(cursor - offset)
                        .map(|(i, _)| i)
                        .unwrap_or(run.text.len());
                    let (before, after) = run.text.split_at(split);
                    if !before.is_empty() {
                        line.push_str(&style(before, run.styles));
                    }
                    line.push(CURSOR);
                    line.push_str(&style(after, run.styles));
                }
                _ => line.push_str(&style(&run.text, run.styles)),
            }
            offset += len;
        }
        if self.cursor == Some(offset) {
            line.push(CURSOR);
        }
        line
    }
}

/// An immutable rendering of one document version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFrame {
    pub version: u64,
    pub blocks: Vec<RenderedBlock>,
    style_map: StyleMap,
}

impl DocumentFrame {
    /// One line per block, cursor shown as `|`
    pub fn to_plain(&self) -> String {
        self.lines(false).join("\n")
    }

    /// Like `to_plain`, with inline styles as SGR escapes
    pub fn to_ansi(&self) -> String {
        self.lines(true).join("\n")
    }

    pub fn lines(&self, ansi: bool) -> Vec<String> {
        self.blocks
            .iter()
            .map(|block| {
                if ansi {
                    block.render_line(|text, styles| self.ansi_run(text, styles))
                } else {
                    block.render_line(|text, _| text.to_string())
                }
            })
            .collect()
    }

    fn ansi_run(&self, text: &str, styles: StyleSet) -> String {
        let effect = self.style_map.effect_for_set(styles);
        if effect.is_plain() || text.is_empty() {
            return text.to_string();
        }
        let codes: Vec<String> = effect.sgr_codes().iter().map(u8::to_string).collect();
        format!("\x1b[{}m{}{}", codes.join(";"), text, RESET)
    }
}

/// Rendering statistics for performance monitoring
#[derive(Debug, Default, Clone)]
pub struct RenderStats {
    /// Number of characters written in the last frame
    pub chars_written_per_frame: usize,
    /// Number of lines redrawn in the last frame
    pub lines_redrawn_per_frame: usize,
}

impl RenderStats {
    fn reset(&mut self) {
        self.chars_written_per_frame = 0;
        self.lines_redrawn_per_frame = 0;
    }
}

/// Text renderer that turns documents into frames and frames into text
pub struct TextRenderer {
    style_map: StyleMap,
    ansi: bool,
    /// Last rendered version (to detect changes)
    last_version: Option<u64>,
    /// Cached lines (line index -> rendered text)
    line_cache: HashMap<usize, String>,
    stats: RenderStats,
}

impl TextRenderer {
    /// Creates a new text renderer with the default style map
    pub fn new() -> Self {
        Self::with_style_map(StyleMap::default())
    }

    pub fn with_style_map(style_map: StyleMap) -> Self {
        Self {
            style_map,
            ansi: false,
            last_version: None,
            line_cache: HashMap::new(),
            stats: RenderStats::default(),
        }
    }

    /// Emit SGR escapes in snapshots
    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    pub fn style_map(&self) -> &StyleMap {
        &self.style_map
    }

    /// Get the latest rendering statistics
    pub fn stats(&self) -> &RenderStats {
        &self.stats
    }

    /// Builds the frame for `document` with the cursor at the selection focus
    pub fn render(&self, document: &Document, selection: &Selection, version: u64) -> DocumentFrame {
        let blocks = document
            .blocks()
            .iter()
            .map(|block| {
                let cursor = (block.key() == &selection.focus.key)
                    .then(|| selection.focus.offset.min(block.len()));
                RenderedBlock::from_block(block, cursor)
            })
            .collect();
        DocumentFrame {
            version,
            blocks,
            style_map: self.style_map.clone(),
        }
    }

    /// Checks if a redraw is needed based on version changes
    pub fn needs_redraw(&self, frame: &DocumentFrame) -> bool {
        self.last_version != Some(frame.version)
    }

    /// Full redraw of `frame` with an optional status line beneath
    pub fn render_snapshot(&mut self, frame: &DocumentFrame, status: Option<&str>) -> String {
        self.stats.reset();

        let lines = frame.lines(self.ansi);
        let mut output = String::new();
        for line in &lines {
            output.push_str(line);
            output.push('\n');
        }

        output.push_str(&"─".repeat(SEPARATOR_WIDTH));
        output.push('\n');
        match status {
            Some(text) => {
                output.push_str(text);
                output.push('\n');
            }
            None => output.push_str("(no status)\n"),
        }

        self.line_cache = lines.into_iter().enumerate().collect();
        self.last_version = Some(frame.version);
        self.stats.lines_redrawn_per_frame = self.line_cache.len();
        self.stats.chars_written_per_frame = output.len();
        output
    }

    /// Renders only the lines that changed since the last frame
    ///
    /// Returns a description of changed lines (for debugging/testing).
    pub fn render_incremental(&mut self, frame: &DocumentFrame) -> String {
        self.stats.reset();

        let lines = frame.lines(self.ansi);
        let mut output = String::new();
        for (idx, line) in lines.iter().enumerate() {
            if self.line_cache.get(&idx) != Some(line) {
                output.push_str(&format!("[L{}] {}\n", idx, line));
                self.stats.chars_written_per_frame += line.len();
                self.stats.lines_redrawn_per_frame += 1;
                self.line_cache.insert(idx, line.clone());
            }
        }

        let stale: Vec<usize> = self
            .line_cache
            .keys()
            .copied()
            .filter(|idx| *idx >= lines.len())
            .collect();
        for idx in stale {
            self.line_cache.remove(&idx);
            output.push_str(&format!("[L{}] (removed)\n", idx));
        }

        self.last_version = Some(frame.version);
        if output.is_empty() {
            output.push_str("(no changes)\n");
        }
        output
    }
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}
