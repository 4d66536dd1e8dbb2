use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

use unicode_width::UnicodeWidthChar;

use crate::error::Result;
use crate::geometry::Size;
use crate::style::{Rgb, StyleHandle, StyleTriple, TermColor};

use super::{KeyInput, Surface};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    style: StyleHandle,
}

/// One `write_clipped` request exactly as the caller issued it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRecord {
    pub row: u16,
    pub col: u16,
    pub text: String,
    pub max_len: u16,
    pub style: StyleHandle,
}

/// In-memory cell grid with scripted key input.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    size: Size,
    cells: Vec<Cell>,
    keys: VecDeque<KeyInput>,
    background: StyleHandle,
    styles: BTreeMap<StyleHandle, StyleTriple>,
    writes: Vec<WriteRecord>,
    true_color: bool,
    cursor_visible: bool,
    clears: usize,
}

impl MemorySurface {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            cells: blank_cells(size, StyleHandle::NONE),
            keys: VecDeque::new(),
            background: StyleHandle::NONE,
            styles: BTreeMap::new(),
            writes: Vec::new(),
            true_color: true,
            cursor_visible: true,
            clears: 0,
        }
    }

    /// Refuse every custom color definition.
    pub fn reject_true_color(mut self) -> Self {
        self.true_color = false;
        self
    }

    /// Simulate a terminal resize. Contents are lost, as on a real terminal.
    pub fn resize(&mut self, size: Size) {
        self.size = size;
        self.cells = blank_cells(size, self.background);
    }

    pub fn push_key(&mut self, key: KeyInput) {
        self.keys.push_back(key);
    }

    pub fn push_char(&mut self, ch: char) {
        self.push_key(KeyInput::Char(ch));
    }

    /// Text of a whole row; empty when `row` is off-surface.
    pub fn row_text(&self, row: u16) -> String {
        if row >= self.size.height {
            return String::new();
        }
        let start = self.index(row, 0);
        self.cells[start..start + self.size.width as usize]
            .iter()
            .map(|cell| cell.ch)
            .collect()
    }

    /// `len` cells of text starting at `row`/`col`, clipped to the surface.
    pub fn text_at(&self, row: u16, col: u16, len: u16) -> String {
        let row_text: Vec<char> = self.row_text(row).chars().collect();
        let start = (col as usize).min(row_text.len());
        let end = (col as usize + len as usize).min(row_text.len());
        row_text[start..end].iter().collect()
    }

    pub fn style_at(&self, row: u16, col: u16) -> Option<StyleHandle> {
        self.size
            .contains(row, col)
            .then(|| self.cells[self.index(row, col)].style)
    }

    pub fn writes(&self) -> &[WriteRecord] {
        &self.writes
    }

    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }

    pub fn background(&self) -> StyleHandle {
        self.background
    }

    pub fn registered_styles(&self) -> &BTreeMap<StyleHandle, StyleTriple> {
        &self.styles
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    pub fn clear_count(&self) -> usize {
        self.clears
    }

    fn index(&self, row: u16, col: u16) -> usize {
        row as usize * self.size.width as usize + col as usize
    }
}

fn blank_cells(size: Size, style: StyleHandle) -> Vec<Cell> {
    vec![Cell { ch: ' ', style }; size.width as usize * size.height as usize]
}

impl Surface for MemorySurface {
    fn size(&self) -> Result<Size> {
        Ok(self.size)
    }

    fn clear(&mut self) -> Result<()> {
        self.cells = blank_cells(self.size, self.background);
        self.clears += 1;
        Ok(())
    }

    fn write_clipped(
        &mut self,
        row: u16,
        col: u16,
        text: &str,
        max_len: u16,
        style: StyleHandle,
    ) -> Result<()> {
        self.writes.push(WriteRecord {
            row,
            col,
            text: text.to_string(),
            max_len,
            style,
        });
        if !self.size.contains(row, col) {
            return Ok(());
        }
        let limit = (col as usize + max_len as usize).min(self.size.width as usize);
        let mut cursor = col as usize;
        for ch in text.chars() {
            let width = ch.width().unwrap_or(0);
            if width == 0 {
                continue;
            }
            if cursor + width > limit {
                break;
            }
            let idx = self.index(row, cursor as u16);
            self.cells[idx] = Cell { ch, style };
            for extra in 1..width {
                self.cells[idx + extra] = Cell { ch: ' ', style };
            }
            cursor += width;
        }
        Ok(())
    }

    fn set_background(&mut self, style: StyleHandle) -> Result<()> {
        self.background = style;
        Ok(())
    }

    fn poll_key(&mut self, _timeout: Duration) -> Result<Option<KeyInput>> {
        Ok(self.keys.pop_front())
    }

    fn set_cursor_visible(&mut self, visible: bool) -> Result<()> {
        self.cursor_visible = visible;
        Ok(())
    }

    fn register_style(&mut self, handle: StyleHandle, style: StyleTriple) -> Result<()> {
        self.styles.insert(handle, style);
        Ok(())
    }

    fn define_color(&mut self, rgb: Rgb) -> Option<TermColor> {
        self.true_color.then_some(TermColor::Rgb(rgb))
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_are_clipped_at_the_right_edge() {
        let mut surface = MemorySurface::new(Size::new(6, 2));
        surface
            .write_clipped(0, 3, "HELLO", 5, StyleHandle::NONE)
            .unwrap();
        assert_eq!(surface.row_text(0), "   HEL");
        surface
            .write_clipped(5, 0, "nowhere", 7, StyleHandle::NONE)
            .unwrap();
        assert_eq!(surface.row_text(5), "");
        assert_eq!(surface.writes().len(), 2);
    }

    #[test]
    fn max_len_limits_the_write() {
        let mut surface = MemorySurface::new(Size::new(10, 1));
        surface
            .write_clipped(0, 0, "abcdefgh", 3, StyleHandle::NONE)
            .unwrap();
        assert_eq!(surface.text_at(0, 0, 5), "abc  ");
    }

    #[test]
    fn scripted_keys_drain_in_order() {
        let mut surface = MemorySurface::new(Size::new(1, 1));
        surface.push_char('a');
        surface.push_key(KeyInput::Interrupt);
        assert_eq!(
            surface.poll_key(Duration::ZERO).unwrap(),
            Some(KeyInput::Char('a'))
        );
        assert_eq!(
            surface.poll_key(Duration::ZERO).unwrap(),
            Some(KeyInput::Interrupt)
        );
        assert_eq!(surface.poll_key(Duration::ZERO).unwrap(), None);
    }
}
