//! Axis-aligned rectangles for sprites and hitboxes
//!
//! Screen space: origin top-left, y grows downward. Obstacles spawn below the
//! bottom edge and rise toward y = 0 as the skydiver "falls" past them.

use glam::Vec2;

/// An axis-aligned rectangle (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Strict overlap: rectangles that only share an edge do not collide
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Shrink by `dx` on the left and right and `dy` on the top and bottom
    pub fn inset(&self, dx: f32, dy: f32) -> Rect {
        let size = Vec2::new(
            (self.size.x - 2.0 * dx).max(0.0),
            (self.size.y - 2.0 * dy).max(0.0),
        );
        Rect {
            pos: self.pos + Vec2::new(dx, dy),
            size,
        }
    }

    /// Whether `inner` lies entirely within this rectangle
    pub fn contains(&self, inner: &Rect) -> bool {
        inner.left() >= self.left()
            && inner.right() <= self.right()
            && inner.top() >= self.top()
            && inner.bottom() <= self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_basic() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(!a.overlaps(&right));
        assert!(!a.overlaps(&below));
    }

    #[test]
    fn test_inset_is_strictly_inside() {
        let sprite = Rect::new(100.0, 200.0, 100.0, 91.0);
        let hitbox = sprite.inset(20.0, 15.0);
        assert!(sprite.contains(&hitbox));
        assert!(hitbox.size.x < sprite.size.x);
        assert!(hitbox.size.y < sprite.size.y);
        assert_eq!(hitbox.center(), sprite.center());
    }

    #[test]
    fn test_inset_never_negative() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0).inset(20.0, 20.0);
        assert_eq!(r.size, Vec2::ZERO);
    }
}
