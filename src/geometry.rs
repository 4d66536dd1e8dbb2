/// Integer size measured in terminal character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Whether the cell at `row`/`col` lies inside this size.
    pub fn contains(&self, row: u16, col: u16) -> bool {
        row < self.height && col < self.width
    }
}

/// Rectangle area anchored within the terminal grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    pub fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Move the rectangle to a new top-left corner keeping its extent.
    pub fn at(self, y: u16, x: u16) -> Self {
        Self { x, y, ..self }
    }

    /// Part of the rectangle that is visible on a surface of `bounds`.
    pub fn clip(&self, bounds: Size) -> Rect {
        if self.x >= bounds.width || self.y >= bounds.height {
            return Rect::new(self.x, self.y, 0, 0);
        }
        let width = self.right().min(bounds.width) - self.x;
        let height = self.bottom().min(bounds.height) - self.y;
        Rect::new(self.x, self.y, width, height)
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_trims_overhang() {
        let rect = Rect::new(30, 20, 20, 10);
        let clipped = rect.clip(Size::new(40, 24));
        assert_eq!(clipped, Rect::new(30, 20, 10, 4));
    }

    #[test]
    fn clip_outside_bounds_is_empty() {
        let rect = Rect::new(50, 0, 5, 5);
        assert!(rect.clip(Size::new(40, 24)).is_empty());
    }

    #[test]
    fn adjacent_rects_do_not_intersect() {
        let left = Rect::new(0, 0, 10, 20);
        let right = Rect::new(10, 0, 10, 20);
        assert!(!left.intersects(&right));
        assert!(left.intersects(&Rect::new(9, 19, 3, 3)));
    }
}
