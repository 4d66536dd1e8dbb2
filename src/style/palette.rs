//! Recognised color and attribute names.

use bitflags::bitflags;

/// One of the eight colors every color terminal provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Terminal-level color. `Reset` is the neutral value unrecognised tokens map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TermColor {
    #[default]
    Reset,
    Base(BaseColor),
    Rgb(Rgb),
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TextAttr: u8 {
        const STANDOUT = 1 << 0;
        const UNDERLINE = 1 << 1;
        const REVERSE = 1 << 2;
        const BLINK = 1 << 3;
        const DIM = 1 << 4;
        const BOLD = 1 << 5;
        const INVIS = 1 << 6;
    }
}

pub const BASE_COLORS: [(&str, BaseColor); 8] = [
    ("BLACK", BaseColor::Black),
    ("RED", BaseColor::Red),
    ("GREEN", BaseColor::Green),
    ("YELLOW", BaseColor::Yellow),
    ("BLUE", BaseColor::Blue),
    ("MAGENTA", BaseColor::Magenta),
    ("CYAN", BaseColor::Cyan),
    ("WHITE", BaseColor::White),
];

// Curses attribute names. The positional ones have no terminal escape and
// resolve to no attribute.
pub const ATTRIBUTES: [(&str, TextAttr); 16] = [
    ("NORMAL", TextAttr::empty()),
    ("STANDOUT", TextAttr::STANDOUT),
    ("UNDERLINE", TextAttr::UNDERLINE),
    ("REVERSE", TextAttr::REVERSE),
    ("BLINK", TextAttr::BLINK),
    ("DIM", TextAttr::DIM),
    ("BOLD", TextAttr::BOLD),
    ("ALTCHARSET", TextAttr::empty()),
    ("INVIS", TextAttr::INVIS),
    ("PROTECT", TextAttr::empty()),
    ("HORIZONTAL", TextAttr::empty()),
    ("LEFT", TextAttr::empty()),
    ("LOW", TextAttr::empty()),
    ("RIGHT", TextAttr::empty()),
    ("TOP", TextAttr::empty()),
    ("VERTICAL", TextAttr::empty()),
];

/// Extended named colors registered on top of the base eight when the
/// terminal accepts true color definitions.
pub const X11_COLORS: &[(&str, Rgb)] = &[
    ("ALICEBLUE", Rgb::new(240, 248, 255)),
    ("AQUA", Rgb::new(0, 255, 255)),
    ("AQUAMARINE", Rgb::new(127, 255, 212)),
    ("BEIGE", Rgb::new(245, 245, 220)),
    ("BROWN", Rgb::new(165, 42, 42)),
    ("CHOCOLATE", Rgb::new(210, 105, 30)),
    ("CORAL", Rgb::new(255, 127, 80)),
    ("CRIMSON", Rgb::new(220, 20, 60)),
    ("DARKGREEN", Rgb::new(0, 100, 0)),
    ("DARKORANGE", Rgb::new(255, 140, 0)),
    ("FUCHSIA", Rgb::new(255, 0, 255)),
    ("GOLD", Rgb::new(255, 215, 0)),
    ("GRAY", Rgb::new(190, 190, 190)),
    ("INDIGO", Rgb::new(75, 0, 130)),
    ("IVORY", Rgb::new(255, 255, 240)),
    ("KHAKI", Rgb::new(240, 230, 140)),
    ("LAVENDER", Rgb::new(230, 230, 250)),
    ("LIME", Rgb::new(0, 255, 0)),
    ("MAROON", Rgb::new(176, 48, 96)),
    ("NAVY", Rgb::new(0, 0, 128)),
    ("OLIVE", Rgb::new(128, 128, 0)),
    ("ORANGE", Rgb::new(255, 165, 0)),
    ("ORCHID", Rgb::new(218, 112, 214)),
    ("PINK", Rgb::new(255, 192, 203)),
    ("PLUM", Rgb::new(221, 160, 221)),
    ("PURPLE", Rgb::new(160, 32, 240)),
    ("SALMON", Rgb::new(250, 128, 114)),
    ("SIENNA", Rgb::new(160, 82, 45)),
    ("SILVER", Rgb::new(192, 192, 192)),
    ("SKYBLUE", Rgb::new(135, 206, 235)),
    ("SLATEGRAY", Rgb::new(112, 128, 144)),
    ("TAN", Rgb::new(210, 180, 140)),
    ("TEAL", Rgb::new(0, 128, 128)),
    ("THISTLE", Rgb::new(216, 191, 216)),
    ("TOMATO", Rgb::new(255, 99, 71)),
    ("TURQUOISE", Rgb::new(64, 224, 208)),
    ("VIOLET", Rgb::new(238, 130, 238)),
    ("WHEAT", Rgb::new(245, 222, 179)),
];

pub fn base_color(name: &str) -> Option<BaseColor> {
    BASE_COLORS
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, color)| *color)
}

pub fn attribute(name: &str) -> Option<TextAttr> {
    ATTRIBUTES
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, attr)| *attr)
}

pub fn x11_color(name: &str) -> Option<Rgb> {
    X11_COLORS
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, rgb)| *rgb)
}

/// Whether `token` names a base or extended color.
pub fn is_color(token: &str) -> bool {
    base_color(token).is_some() || x11_color(token).is_some()
}

pub fn is_attr(token: &str) -> bool {
    attribute(token).is_some()
}
