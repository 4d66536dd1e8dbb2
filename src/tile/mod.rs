//! A rectangular region bound to one content source.
//!
//! A tile owns its line buffer and draws itself. It is either visible with
//! live `lines`, or hidden with those lines stashed in `hidden_memory`; never
//! both.

use crate::action::{ActionEffect, ActionTable};
use crate::config::TileSpec;
use crate::error::Result;
use crate::geometry::Rect;
use crate::queue::FreshnessQueue;
use crate::style::{KEY_BODY, KEY_BORDER, KEY_TITLE, StyleHandle, StyleTable, StyleValue};
use crate::surface::Surface;
use crate::width::{fit_to_width, normalize_line, truncate_to_width};
use crate::worker::Payload;

#[derive(Debug)]
pub struct Tile {
    index: usize,
    title: Option<String>,
    rect: Rect,
    placed: bool,
    border: bool,
    toggle_key: Option<char>,
    lines: Vec<String>,
    hidden_memory: Option<Vec<String>>,
    styles: StyleTable,
    actions: ActionTable,
    queue: FreshnessQueue<Payload>,
    content_hash: Option<blake3::Hash>,
    payloads: u64,
    dirty: bool,
}

impl Tile {
    /// Build a tile from its spec. Positioned specs are placed immediately;
    /// the others wait for the placement grid.
    pub fn new(
        index: usize,
        spec: &TileSpec,
        styles: StyleTable,
        actions: ActionTable,
        queue: FreshnessQueue<Payload>,
    ) -> Self {
        let geometry = spec.geometry;
        let (y, x) = geometry.position().unwrap_or((0, 0));
        let lines: Vec<String> = spec.title.iter().cloned().collect();
        let (lines, hidden_memory) = if spec.starts_active() {
            (lines, None)
        } else {
            (Vec::new(), Some(lines))
        };
        Self {
            index,
            title: spec.title.clone(),
            rect: Rect::new(x, y, geometry.width, geometry.height),
            placed: geometry.position().is_some(),
            border: styles.flag(KEY_BORDER),
            toggle_key: spec.toggle_key(),
            lines,
            hidden_memory,
            styles,
            actions,
            queue,
            content_hash: None,
            payloads: 0,
            dirty: true,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// `(height, width)` requested by the configuration.
    pub fn footprint(&self) -> (u16, u16) {
        (self.rect.height, self.rect.width)
    }

    pub fn is_placed(&self) -> bool {
        self.placed
    }

    pub fn place_at(&mut self, y: u16, x: u16) {
        self.rect = self.rect.at(y, x);
        self.placed = true;
        self.dirty = true;
    }

    /// Leave the tile off screen for this arrangement pass.
    pub fn unplace(&mut self) {
        self.placed = false;
    }

    pub fn has_border(&self) -> bool {
        self.border
    }

    pub fn toggle_key(&self) -> Option<char> {
        self.toggle_key
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden_memory.is_some()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn styles(&self) -> &StyleTable {
        &self.styles
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Payloads taken from the queue so far, empty ones included.
    pub fn payloads_received(&self) -> u64 {
        self.payloads
    }

    /// Take the pending payload, if any, and evaluate the action triggers.
    ///
    /// An empty payload keeps the previous lines. Hidden tiles leave the queue
    /// untouched.
    pub fn load(&mut self) -> Option<ActionEffect> {
        if self.is_hidden() {
            return None;
        }
        let payload = self.queue.try_take()?;
        self.payloads += 1;
        if !payload.is_empty() {
            let hash = hash_payload(&payload);
            if self.content_hash != Some(hash) {
                self.content_hash = Some(hash);
                self.lines = self.title.iter().cloned().chain(payload).collect();
                self.dirty = true;
            }
        }
        self.actions.evaluate(&self.lines)
    }

    /// Flip visibility. Hiding blanks the footprint; showing reloads at once so
    /// stale content never flashes.
    pub fn toggle<S>(&mut self, surface: &mut S) -> Result<Option<ActionEffect>>
    where
        S: Surface + ?Sized,
    {
        self.flip(surface)?;
        if self.is_hidden() {
            Ok(None)
        } else {
            Ok(self.load())
        }
    }

    /// Flip visibility without touching the queue. Shown tiles come back with
    /// the lines they had when hidden.
    pub fn flip<S>(&mut self, surface: &mut S) -> Result<()>
    where
        S: Surface + ?Sized,
    {
        match self.hidden_memory.take() {
            None => {
                self.blank(surface)?;
                self.hidden_memory = Some(std::mem::take(&mut self.lines));
            }
            Some(stashed) => {
                self.lines = stashed;
                self.dirty = true;
            }
        }
        Ok(())
    }

    /// Overwrite the visible part of the footprint with spaces.
    pub fn blank<S>(&self, surface: &mut S) -> Result<()>
    where
        S: Surface + ?Sized,
    {
        if !self.placed {
            return Ok(());
        }
        let visible = self.rect.clip(surface.size()?);
        let spaces = " ".repeat(visible.width as usize);
        for row in visible.y..visible.bottom() {
            surface.write_clipped(row, visible.x, &spaces, visible.width, StyleHandle::NONE)?;
        }
        Ok(())
    }

    /// Draw the tile, clipped to the current surface size.
    pub fn render<S>(&mut self, surface: &mut S) -> Result<()>
    where
        S: Surface + ?Sized,
    {
        if self.is_hidden() || !self.placed {
            self.dirty = false;
            return Ok(());
        }
        let visible = self.rect.clip(surface.size()?);
        for dy in 0..visible.height {
            let (text, style) = self.row(dy);
            let text = truncate_to_width(&text, visible.width as usize);
            surface.write_clipped(self.rect.y + dy, self.rect.x, text, visible.width, style)?;
        }
        self.dirty = false;
        Ok(())
    }

    fn framed(&self) -> bool {
        self.border && self.rect.width >= 2 && self.rect.height >= 2
    }

    /// Full-width text and style for row `dy` of the footprint.
    fn row(&self, dy: u16) -> (String, StyleHandle) {
        let width = self.rect.width as usize;
        if !self.framed() {
            return self.content_row(dy as usize, width);
        }

        let inner = width - 2;
        let last = self.rect.height - 1;
        let frame_style = self.styles.handle(KEY_BODY);
        let divider_row = self.title.is_some() && self.rect.height >= 4;
        if dy == 0 {
            (format!("┌{}┐", "─".repeat(inner)), frame_style)
        } else if dy == last {
            (format!("└{}┘", "─".repeat(inner)), frame_style)
        } else if divider_row && dy == 2 {
            (format!("├{}┤", "─".repeat(inner)), frame_style)
        } else {
            let mut line_idx = dy as usize - 1;
            if divider_row && dy > 2 {
                line_idx -= 1;
            }
            let (text, style) = self.content_row(line_idx, inner);
            (format!("│{text}│"), style)
        }
    }

    fn content_row(&self, line_idx: usize, width: usize) -> (String, StyleHandle) {
        let line = self
            .lines
            .get(line_idx)
            .map(|line| normalize_line(line))
            .unwrap_or_default();
        let style = self.markup_for(line_idx, &line);
        (fit_to_width(&line, width), style)
    }

    /// Title style on the title row, else the first matching pattern, else `body`.
    fn markup_for(&self, line_idx: usize, text: &str) -> StyleHandle {
        if line_idx == 0 && self.title.is_some() && self.styles.has_handle(KEY_TITLE) {
            return self.styles.handle(KEY_TITLE);
        }
        match self.styles.first_pattern_match(text) {
            Some(StyleValue::Handle(handle)) => handle,
            _ => self.styles.handle(KEY_BODY),
        }
    }
}

/// Length-prefixed so line boundaries are part of the hash.
fn hash_payload(payload: &[String]) -> blake3::Hash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&(payload.len() as u64).to_le_bytes());
    for line in payload {
        hasher.update(&(line.len() as u64).to_le_bytes());
        hasher.update(line.as_bytes());
    }
    hasher.finalize()
}
