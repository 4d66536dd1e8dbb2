use std::collections::HashMap;
use std::io::Write;
use std::time::Duration;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::queue;
use crossterm::style::{
    Attribute, Attributes, Color, Colors, ContentStyle, PrintStyledContent, ResetColor, SetColors,
    StyledContent,
};
use crossterm::terminal::{self, Clear, ClearType};

use crate::error::Result;
use crate::geometry::Size;
use crate::style::{BaseColor, Rgb, StyleHandle, StyleTriple, TermColor, TextAttr};
use crate::width::truncate_to_width;

use super::{KeyInput, Surface};

/// Surface backed by a crossterm terminal handle.
///
/// Output is queued and only reaches the terminal on [`Surface::flush`].
/// Raw mode and the alternate screen are the driver's business, not this type's.
pub struct CrosstermSurface<W: Write> {
    out: W,
    styles: HashMap<StyleHandle, ContentStyle>,
    background: ContentStyle,
    true_color: bool,
}

impl<W: Write> CrosstermSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            styles: HashMap::new(),
            background: ContentStyle::new(),
            true_color: detect_true_color(),
        }
    }

    /// Override true color detection.
    pub fn with_true_color(mut self, enabled: bool) -> Self {
        self.true_color = enabled;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn style_for(&self, handle: StyleHandle) -> ContentStyle {
        let mut style = self
            .styles
            .get(&handle)
            .copied()
            .unwrap_or(self.background);
        if style.foreground_color.is_none() {
            style.foreground_color = self.background.foreground_color;
        }
        if style.background_color.is_none() {
            style.background_color = self.background.background_color;
        }
        style
    }
}

impl<W: Write> Surface for CrosstermSurface<W> {
    fn size(&self) -> Result<Size> {
        let (cols, rows) = terminal::size()?;
        Ok(Size::new(cols, rows))
    }

    fn clear(&mut self) -> Result<()> {
        queue!(
            self.out,
            SetColors(Colors {
                foreground: self.background.foreground_color,
                background: self.background.background_color,
            }),
            Clear(ClearType::All),
            ResetColor
        )?;
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
        let size = self.size()?;
        if !size.contains(row, col) {
            return Ok(());
        }
        let room = max_len.min(size.width - col) as usize;
        let visible = truncate_to_width(text, room);
        if visible.is_empty() {
            return Ok(());
        }
        let styled = StyledContent::new(self.style_for(style), visible);
        queue!(self.out, MoveTo(col, row), PrintStyledContent(styled))?;
        Ok(())
    }

    fn set_background(&mut self, style: StyleHandle) -> Result<()> {
        self.background = self.styles.get(&style).copied().unwrap_or_default();
        self.clear()
    }

    fn poll_key(&mut self, timeout: Duration) -> Result<Option<KeyInput>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        let key = match event::read()? {
            Event::Key(KeyEvent {
                code: KeyCode::Char(ch),
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) => {
                if modifiers.contains(KeyModifiers::CONTROL) && ch == 'c' {
                    Some(KeyInput::Interrupt)
                } else {
                    Some(KeyInput::Char(ch))
                }
            }
            _ => None,
        };
        Ok(key)
    }

    fn set_cursor_visible(&mut self, visible: bool) -> Result<()> {
        if visible {
            queue!(self.out, Show)?;
        } else {
            queue!(self.out, Hide)?;
        }
        Ok(())
    }

    fn register_style(&mut self, handle: StyleHandle, style: StyleTriple) -> Result<()> {
        self.styles.insert(handle, content_style(style));
        Ok(())
    }

    fn define_color(&mut self, rgb: Rgb) -> Option<TermColor> {
        self.true_color.then_some(TermColor::Rgb(rgb))
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

fn detect_true_color() -> bool {
    std::env::var("COLORTERM")
        .map(|value| {
            let value = value.to_ascii_lowercase();
            value.contains("truecolor") || value.contains("24bit")
        })
        .unwrap_or(false)
}

fn content_style(style: StyleTriple) -> ContentStyle {
    ContentStyle {
        foreground_color: term_color(style.fg),
        background_color: term_color(style.bg),
        attributes: attributes(style.attr),
        ..ContentStyle::new()
    }
}

// Base colors are the classic ANSI 30-37 set, which crossterm names `Dark*`.
fn term_color(color: TermColor) -> Option<Color> {
    match color {
        TermColor::Reset => None,
        TermColor::Base(base) => Some(match base {
            BaseColor::Black => Color::Black,
            BaseColor::Red => Color::DarkRed,
            BaseColor::Green => Color::DarkGreen,
            BaseColor::Yellow => Color::DarkYellow,
            BaseColor::Blue => Color::DarkBlue,
            BaseColor::Magenta => Color::DarkMagenta,
            BaseColor::Cyan => Color::DarkCyan,
            BaseColor::White => Color::Grey,
        }),
        TermColor::Rgb(Rgb { r, g, b }) => Some(Color::Rgb { r, g, b }),
    }
}

fn attributes(attr: TextAttr) -> Attributes {
    let mut out = Attributes::default();
    let table = [
        (TextAttr::STANDOUT, Attribute::Reverse),
        (TextAttr::UNDERLINE, Attribute::Underlined),
        (TextAttr::REVERSE, Attribute::Reverse),
        (TextAttr::BLINK, Attribute::SlowBlink),
        (TextAttr::DIM, Attribute::Dim),
        (TextAttr::BOLD, Attribute::Bold),
        (TextAttr::INVIS, Attribute::Hidden),
    ];
    for (flag, attribute) in table {
        if attr.contains(flag) {
            out.set(attribute);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_colors_map_to_classic_ansi() {
        assert_eq!(term_color(TermColor::Base(BaseColor::Red)), Some(Color::DarkRed));
        assert_eq!(term_color(TermColor::Reset), None);
    }

    #[test]
    fn attributes_translate_flags() {
        let attrs = attributes(TextAttr::BOLD | TextAttr::UNDERLINE);
        assert!(attrs.has(Attribute::Bold));
        assert!(attrs.has(Attribute::Underlined));
        assert!(!attrs.has(Attribute::Reverse));
    }

    #[test]
    fn unset_colors_fall_back_to_background() {
        let mut surface = CrosstermSurface::new(Vec::new()).with_true_color(false);
        let base = StyleHandle::default();
        surface
            .register_style(
                base,
                StyleTriple {
                    fg: TermColor::Base(BaseColor::White),
                    bg: TermColor::Base(BaseColor::Blue),
                    attr: TextAttr::empty(),
                },
            )
            .unwrap();
        surface.background = surface.styles[&base];
        let style = surface.style_for(StyleHandle::NONE);
        assert_eq!(style.background_color, Some(Color::DarkBlue));
        assert!(surface.define_color(Rgb::new(1, 2, 3)).is_none());
    }
}
