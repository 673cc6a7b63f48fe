//! Rectangle math, direction tests, and the overlap/distance metrics used by
//! directional focus and the `rect_cmp` ordering.
//!
//! Grounded in the teacher's `window_manager::tree::Rect`, widened from the
//! teacher's `i32` fields to the wire-compatible `i16`/`u16` pair the spec
//! calls for, and extended with the direction-aware helpers the teacher's
//! `Rect` never needed because it only ever split rectangles in half.

use serde::{Deserialize, Serialize};

/// A rectangle in the same coordinate space the display protocol uses:
/// signed 16-bit position, unsigned 16-bit extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i16,
    pub y: i16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub fn new(x: i16, y: i16, width: u16, height: u16) -> Self {
        Rect { x, y, width, height }
    }

    /// `width > 0 ∧ height > 0` and neither edge overflows `i16::MAX`.
    pub fn is_valid(&self) -> bool {
        self.width > 0
            && self.height > 0
            && (self.x as i32) + (self.width as i32) <= i16::MAX as i32
            && (self.y as i32) + (self.height as i32) <= i16::MAX as i32
    }

    pub fn area(&self) -> u32 {
        (self.width as u32).saturating_mul(self.height as u32)
    }

    pub fn is_inside(&self, px: i16, py: i16) -> bool {
        px >= self.x
            && (px as i32) < self.x as i32 + self.width as i32
            && py >= self.y
            && (py as i32) < self.y as i32 + self.height as i32
    }

    /// Whether `self` wholly contains `other`.
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.x as i32 + other.width as i32 <= self.x as i32 + self.width as i32
            && other.y as i32 + other.height as i32 <= self.y as i32 + self.height as i32
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        (self.x as i32) < other.x as i32 + other.width as i32
            && (self.x as i32 + self.width as i32) > other.x as i32
            && (self.y as i32) < other.y as i32 + other.height as i32
            && (self.y as i32 + self.height as i32) > other.y as i32
    }

    pub fn center(&self) -> (i32, i32) {
        (
            self.x as i32 + self.width as i32 / 2,
            self.y as i32 + self.height as i32 / 2,
        )
    }

    pub fn shrink(&self, amount: u16) -> Rect {
        let amount2 = amount.saturating_mul(2);
        Rect {
            x: self.x.saturating_add(amount as i16),
            y: self.y.saturating_add(amount as i16),
            width: self.width.saturating_sub(amount2).max(1),
            height: self.height.saturating_sub(amount2).max(1),
        }
    }

    /// Shrink independently per edge, used by `arrange` for asymmetric padding.
    pub fn shrink_edges(&self, top: u16, right: u16, bottom: u16, left: u16) -> Rect {
        Rect {
            x: self.x.saturating_add(left as i16),
            y: self.y.saturating_add(top as i16),
            width: self
                .width
                .saturating_sub(left.saturating_add(right))
                .max(1),
            height: self
                .height
                .saturating_sub(top.saturating_add(bottom))
                .max(1),
        }
    }
}

pub fn rect_eq(a: &Rect, b: &Rect) -> bool {
    a.x == b.x && a.y == b.y && a.width == b.width && a.height == b.height
}

/// Orders rectangles top-to-bottom then left-to-right when they don't
/// overlap; when they do, falls back to descending area so the larger of two
/// overlapping windows sorts first.
pub fn rect_cmp(a: &Rect, b: &Rect) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    if a.intersects(b) {
        return b.area().cmp(&a.area());
    }
    match a.y.cmp(&b.y) {
        Ordering::Equal => a.x.cmp(&b.x),
        other => other,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// The split axis a fence perpendicular to this direction lies on.
    pub fn axis_is_vertical(self) -> bool {
        matches!(self, Direction::East | Direction::West)
    }
}

/// How strict `on_dir_side` is about rejecting a neighbor that only
/// partially clears the source rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tightness {
    /// The neighbor may begin within the source's own extent.
    Low,
    /// The neighbor must start strictly past the source's opposite edge.
    High,
}

/// True if `candidate` lies in `dir` from `source` under the given tightness.
pub fn on_dir_side(source: &Rect, candidate: &Rect, dir: Direction, tightness: Tightness) -> bool {
    let (s_lo, s_hi, c_lo, c_hi) = match dir {
        Direction::East => (
            source.x as i32,
            source.x as i32 + source.width as i32,
            candidate.x as i32,
            candidate.x as i32 + candidate.width as i32,
        ),
        Direction::West => (
            -(source.x as i32 + source.width as i32),
            -(source.x as i32),
            -(candidate.x as i32 + candidate.width as i32),
            -(candidate.x as i32),
        ),
        Direction::South => (
            source.y as i32,
            source.y as i32 + source.height as i32,
            candidate.y as i32,
            candidate.y as i32 + candidate.height as i32,
        ),
        Direction::North => (
            -(source.y as i32 + source.height as i32),
            -(source.y as i32),
            -(candidate.y as i32 + candidate.height as i32),
            -(candidate.y as i32),
        ),
    };
    match tightness {
        Tightness::Low => c_hi > s_lo,
        Tightness::High => c_lo >= s_hi,
    }
}

/// Distance from `source`'s boundary on side `dir` to `candidate`'s nearest
/// edge, used to rank directional-focus candidates (smaller is closer).
pub fn boundary_distance(source: &Rect, candidate: &Rect, dir: Direction) -> i64 {
    let (sx, sy) = source.center();
    let (cx, cy) = candidate.center();
    match dir {
        Direction::East | Direction::West => {
            let dx = (cx - sx) as i64;
            let dy = (cy - sy) as i64;
            dx.abs() * 2 + dy.abs()
        }
        Direction::North | Direction::South => {
            let dx = (cx - sx) as i64;
            let dy = (cy - sy) as i64;
            dy.abs() * 2 + dx.abs()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_rect() {
        assert!(Rect::new(0, 0, 100, 100).is_valid());
        assert!(!Rect::new(0, 0, 0, 100).is_valid());
    }

    #[test]
    fn contains_point() {
        let r = Rect::new(10, 10, 20, 20);
        assert!(r.is_inside(10, 10));
        assert!(!r.is_inside(30, 10));
    }

    #[test]
    fn rect_cmp_top_to_bottom() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(0, 20, 10, 10);
        assert_eq!(rect_cmp(&a, &b), std::cmp::Ordering::Less);
    }

    #[test]
    fn east_neighbor_detected() {
        let source = Rect::new(0, 0, 100, 100);
        let east = Rect::new(150, 0, 100, 100);
        assert!(on_dir_side(&source, &east, Direction::East, Tightness::High));
        assert!(!on_dir_side(&source, &east, Direction::West, Tightness::High));
    }

    #[test]
    fn low_tightness_allows_overlap_start() {
        let source = Rect::new(0, 0, 100, 100);
        let east = Rect::new(50, 0, 100, 100);
        assert!(on_dir_side(&source, &east, Direction::East, Tightness::Low));
        assert!(!on_dir_side(&source, &east, Direction::East, Tightness::High));
    }
}
