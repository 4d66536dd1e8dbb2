use std::collections::HashMap;

use crate::error::Result;
use crate::surface::Surface;

use super::palette::{self, Rgb, TermColor, TextAttr};

/// Opaque token for a resolved color/attribute combination.
///
/// `StyleHandle::NONE` means "no override": the surface paints with its
/// current background style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct StyleHandle(u16);

impl StyleHandle {
    pub const NONE: StyleHandle = StyleHandle(0);

    pub fn index(self) -> u16 {
        self.0
    }

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

/// Foreground, background and attribute resolved from a token list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StyleTriple {
    pub fg: TermColor,
    pub bg: TermColor,
    pub attr: TextAttr,
}

/// Allocates style handles and remembers which triple owns which slot.
///
/// Slots are handed out from a monotonically increasing counter and are never
/// freed, mirroring how terminals treat color pairs. One translator lives per
/// engine; nothing here is global.
#[derive(Debug)]
pub struct StyleTranslator {
    extended: HashMap<String, TermColor>,
    handles: HashMap<StyleTriple, StyleHandle>,
    next: u16,
}

impl Default for StyleTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleTranslator {
    pub fn new() -> Self {
        Self {
            extended: HashMap::new(),
            handles: HashMap::new(),
            next: 1,
        }
    }

    /// Translate `[fg?, bg?, attr?]` tokens. Unknown or missing tokens become
    /// the neutral value.
    pub fn translate<T: AsRef<str>>(&self, tokens: &[T]) -> StyleTriple {
        let color_at = |idx: usize| {
            tokens
                .get(idx)
                .map(|token| self.color(token.as_ref()))
                .unwrap_or_default()
        };
        StyleTriple {
            fg: color_at(0),
            bg: color_at(1),
            attr: tokens
                .get(2)
                .and_then(|token| palette::attribute(token.as_ref()))
                .unwrap_or_default(),
        }
    }

    /// Handle for the given tokens, registering a new slot with the surface on
    /// first use of the triple.
    pub fn resolve<S, T>(&mut self, tokens: &[T], surface: &mut S) -> Result<StyleHandle>
    where
        S: Surface + ?Sized,
        T: AsRef<str>,
    {
        let triple = self.translate(tokens);
        self.handle_for(triple, surface)
    }

    pub fn handle_for<S>(&mut self, triple: StyleTriple, surface: &mut S) -> Result<StyleHandle>
    where
        S: Surface + ?Sized,
    {
        if let Some(handle) = self.handles.get(&triple) {
            return Ok(*handle);
        }
        if self.next == u16::MAX {
            return Ok(StyleHandle::NONE);
        }
        let handle = StyleHandle(self.next);
        surface.register_style(handle, triple)?;
        self.next += 1;
        self.handles.insert(triple, handle);
        Ok(handle)
    }

    /// Best-effort registration of a named true color. Returns whether the
    /// name is now usable; a refusal from the surface leaves it unavailable.
    pub fn register_extended<S>(&mut self, name: &str, rgb: Rgb, surface: &mut S) -> bool
    where
        S: Surface + ?Sized,
    {
        match surface.define_color(rgb) {
            Some(color) => {
                self.extended.insert(name.to_string(), color);
                true
            }
            None => false,
        }
    }

    /// Register the whole built-in X11 palette, returning how many names were accepted.
    pub fn register_x11_palette<S>(&mut self, surface: &mut S) -> usize
    where
        S: Surface + ?Sized,
    {
        palette::X11_COLORS
            .iter()
            .filter(|(name, rgb)| self.register_extended(name, *rgb, surface))
            .count()
    }

    /// Number of handles allocated so far.
    pub fn allocated(&self) -> usize {
        self.handles.len()
    }

    fn color(&self, token: &str) -> TermColor {
        if let Some(base) = palette::base_color(token) {
            return TermColor::Base(base);
        }
        self.extended.get(token).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;
    use crate::style::BaseColor;
    use crate::surface::MemorySurface;

    #[test]
    fn unknown_tokens_degrade_to_neutral() {
        let translator = StyleTranslator::new();
        let triple = translator.translate(&["MAUVE", "BLUE", "SPARKLE"]);
        assert_eq!(triple.fg, TermColor::Reset);
        assert_eq!(triple.bg, TermColor::Base(BaseColor::Blue));
        assert_eq!(triple.attr, TextAttr::empty());

        let empty: [&str; 0] = [];
        assert_eq!(translator.translate(&empty), StyleTriple::default());
    }

    #[test]
    fn same_triple_reuses_its_handle() {
        let mut surface = MemorySurface::new(Size::new(10, 2));
        let mut translator = StyleTranslator::new();
        let first = translator
            .resolve(&["WHITE", "BLUE", "BOLD"], &mut surface)
            .unwrap();
        let other = translator.resolve(&["RED", "BLUE"], &mut surface).unwrap();
        let again = translator
            .resolve(&["WHITE", "BLUE", "BOLD"], &mut surface)
            .unwrap();

        assert_eq!(first, again);
        assert_ne!(first, other);
        assert!(!first.is_none());
        assert_eq!(translator.allocated(), 2);
        assert_eq!(surface.registered_styles().len(), 2);
    }

    #[test]
    fn handles_are_allocated_monotonically() {
        let mut surface = MemorySurface::new(Size::new(10, 2));
        let mut translator = StyleTranslator::new();
        let a = translator.resolve(&["RED", "BLACK"], &mut surface).unwrap();
        let b = translator.resolve(&["GREEN", "BLACK"], &mut surface).unwrap();
        assert!(b.index() > a.index());
    }

    #[test]
    fn rejected_extended_color_stays_unavailable() {
        let mut surface = MemorySurface::new(Size::new(10, 2)).reject_true_color();
        let mut translator = StyleTranslator::new();
        assert!(!translator.register_extended("LIME", Rgb::new(0, 255, 0), &mut surface));
        assert_eq!(translator.translate(&["LIME"]).fg, TermColor::Reset);
    }

    #[test]
    fn accepted_extended_color_resolves() {
        let mut surface = MemorySurface::new(Size::new(10, 2));
        let mut translator = StyleTranslator::new();
        let accepted = translator.register_x11_palette(&mut surface);
        assert_eq!(accepted, palette::X11_COLORS.len());
        assert_eq!(
            translator.translate(&["THISTLE"]).fg,
            TermColor::Rgb(Rgb::new(216, 191, 216))
        );
    }
}
