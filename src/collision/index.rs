//! Pixel Collision Index
//!
//! Passability and pixel-region queries against the active map's collision
//! image. `is_passable_area` runs for every character on every movement
//! attempt, so it stays allocation-free and O(window / stride).

use super::bitmap::CollisionImage;
use super::color::{Color, RegionTable};
use crate::config::CollisionSettings;

// ============================================================================
// Movement Geometry
// ============================================================================

/// Movement direction in numpad notation, as the host engine encodes it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Direction {
    DownLeft = 1,
    Down = 2,
    DownRight = 3,
    Left = 4,
    Right = 6,
    UpLeft = 7,
    Up = 8,
    UpRight = 9,
}

impl Direction {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Direction::DownLeft),
            2 => Some(Direction::Down),
            3 => Some(Direction::DownRight),
            4 => Some(Direction::Left),
            6 => Some(Direction::Right),
            7 => Some(Direction::UpLeft),
            8 => Some(Direction::Up),
            9 => Some(Direction::UpRight),
            _ => None,
        }
    }

    /// Up/down moves scan along the y axis; everything else along x
    pub fn is_vertical(&self) -> bool {
        matches!(self, Direction::Down | Direction::Up)
    }
}

/// Leading edge of a moving character's bounding box, in pixels.
///
/// Supplied by the movement system for the direction being tested.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub start: (f64, f64),
    pub end: (f64, f64),
}

impl Edge {
    pub fn new(start: (f64, f64), end: (f64, f64)) -> Self {
        Self { start, end }
    }

    /// Integer sample window covered by this edge (corners truncated toward zero)
    pub fn window(&self) -> SampleWindow {
        SampleWindow {
            x1: self.start.0.trunc() as i32,
            x2: self.end.0.trunc() as i32,
            y1: self.start.1.trunc() as i32,
            y2: self.end.1.trunc() as i32,
        }
    }
}

/// Inclusive pixel rectangle `[x1, x2] × [y1, y2]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleWindow {
    pub x1: i32,
    pub x2: i32,
    pub y1: i32,
    pub y2: i32,
}

impl SampleWindow {
    pub fn new(x1: i32, x2: i32, y1: i32, y2: i32) -> Self {
        Self { x1, x2, y1, y2 }
    }

    pub fn is_empty(&self) -> bool {
        self.x1 > self.x2 || self.y1 > self.y2
    }
}

/// Coordinates sampled along one axis: multiples of `stride` plus both ends
#[derive(Debug, Clone, Copy)]
struct AxisSamples {
    next: i64,
    last: i64,
    stride: i64,
}

impl AxisSamples {
    fn new(first: i32, last: i32, stride: u32) -> Self {
        Self {
            next: i64::from(first),
            last: i64::from(last),
            stride: i64::from(stride.max(1)),
        }
    }
}

impl Iterator for AxisSamples {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        let c = self.next;
        if c > self.last {
            return None;
        }
        // Jump to the next multiple of stride, never past the last coordinate
        self.next = if c == self.last {
            c + 1
        } else {
            (c + self.stride - c.rem_euclid(self.stride)).min(self.last)
        };
        i32::try_from(c).ok()
    }
}

/// Every point checked for a window moving in `direction`.
///
/// The movement axis is thinned by `stride`; the perpendicular axis is
/// always sampled in full. Points come out x-major.
pub fn sample_points(
    window: SampleWindow,
    direction: Direction,
    stride: u32,
) -> impl Iterator<Item = (i32, i32)> {
    let (x_stride, y_stride) = if direction.is_vertical() {
        (1, stride)
    } else {
        (stride, 1)
    };
    let SampleWindow { x1, x2, y1, y2 } = window;

    let column = move |x: i32| AxisSamples::new(y1, y2, y_stride).map(move |y| (x, y));
    AxisSamples::new(x1, x2, x_stride).flat_map(column)
}

// ============================================================================
// Index
// ============================================================================

/// Collision queries for the currently loaded map
#[derive(Debug, Clone)]
pub struct PixelCollisionIndex {
    image: Option<CollisionImage>,
    blocking: Color,
    regions: RegionTable,
    stride: u32,
}

impl PixelCollisionIndex {
    pub fn new(blocking: Color, regions: RegionTable, stride: u32) -> Self {
        Self {
            image: None,
            blocking,
            regions,
            stride: stride.max(1),
        }
    }

    pub fn from_settings(settings: &CollisionSettings) -> Self {
        Self::new(
            settings.blocking_color,
            settings.regions.clone(),
            settings.stride,
        )
    }

    /// Replace the active image (`None` disables collision and regions)
    pub fn set_image(&mut self, image: Option<CollisionImage>) {
        self.image = image;
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// True unless the pixel is exactly the blocking color.
    /// Without an image, and outside its bounds, everything is passable.
    pub fn is_passable(&self, x: i32, y: i32) -> bool {
        match &self.image {
            Some(image) => image.pixel(x, y).is_none_or(|c| c != self.blocking),
            None => true,
        }
    }

    /// Pixel region at a point, 0 when there is no image or the color is unmapped
    pub fn region_at(&self, x: i32, y: i32) -> u32 {
        self.image
            .as_ref()
            .and_then(|image| image.pixel(x, y))
            .and_then(|color| self.regions.get(color))
            .unwrap_or(0)
    }

    /// Check every sampled pixel under a moving edge; one blocked sample fails
    pub fn is_passable_area(&self, edge: &Edge, direction: Direction) -> bool {
        if self.image.is_none() {
            return true;
        }
        self.is_window_passable(edge.window(), direction)
    }

    pub fn is_window_passable(&self, window: SampleWindow, direction: Direction) -> bool {
        sample_points(window, direction, self.stride).all(|(x, y)| self.is_passable(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::rgb(255, 0, 0);
    const GREEN: Color = Color::rgb(0, 255, 0);

    fn index_with(image: Option<CollisionImage>, stride: u32) -> PixelCollisionIndex {
        let mut regions = RegionTable::new();
        regions.insert(GREEN, 1);
        let mut index = PixelCollisionIndex::new(RED, regions, stride);
        index.set_image(image);
        index
    }

    fn sampled_xs(window: SampleWindow, direction: Direction, stride: u32) -> Vec<i32> {
        sample_points(window, direction, stride)
            .map(|(x, _)| x)
            .collect()
    }

    #[test]
    fn test_no_image_is_passable_everywhere() {
        let index = index_with(None, 1);
        for (x, y) in [(0, 0), (-50, 12), (9999, -9999)] {
            assert!(index.is_passable(x, y));
            assert_eq!(index.region_at(x, y), 0);
        }
        let edge = Edge::new((0.0, 0.0), (100.0, 100.0));
        assert!(index.is_passable_area(&edge, Direction::Down));
    }

    #[test]
    fn test_blocking_color() {
        let mut img = CollisionImage::filled(10, 10, Color::TRANSPARENT);
        img.set_pixel(4, 4, RED);
        img.set_pixel(5, 4, Color::rgba(255, 0, 0, 128));
        let index = index_with(Some(img), 1);

        assert!(!index.is_passable(4, 4));
        assert!(index.is_passable(5, 4)); // different alpha is a different color
        assert!(index.is_passable(3, 4));
        assert!(index.is_passable(-1, -1));
    }

    #[test]
    fn test_region_at() {
        let mut img = CollisionImage::filled(10, 10, Color::TRANSPARENT);
        img.set_pixel(2, 3, GREEN);
        img.set_pixel(6, 6, Color::rgb(0, 0, 255));
        let index = index_with(Some(img), 1);

        assert_eq!(index.region_at(2, 3), 1);
        assert_eq!(index.region_at(6, 6), 0);
        assert_eq!(index.region_at(0, 0), 0);
        assert_eq!(index.region_at(50, 50), 0);
    }

    #[test]
    fn test_stride_keeps_window_ends() {
        // Horizontal move over x = 1..=7 with stride 3
        let window = SampleWindow::new(1, 7, 0, 0);
        let xs = sampled_xs(window, Direction::Right, 3);
        assert_eq!(xs, vec![1, 3, 6, 7]);

        // 7-pixel window starting at 0: index 0 and 6 are both ends
        let window = SampleWindow::new(10, 16, 0, 0);
        let xs = sampled_xs(window, Direction::Left, 3);
        assert_eq!(xs, vec![10, 12, 15, 16]);
        assert_eq!(xs.first(), Some(&10));
        assert_eq!(xs.last(), Some(&16));
    }

    #[test]
    fn test_stride_jumps_between_multiples() {
        let samples: Vec<i32> = AxisSamples::new(i32::MIN, i32::MAX, 1 << 30).collect();
        assert_eq!(samples, vec![i32::MIN, -(1 << 30), 0, 1 << 30, i32::MAX]);

        let samples: Vec<i32> = AxisSamples::new(5, 5, 4).collect();
        assert_eq!(samples, vec![5]);
    }

    #[test]
    fn test_perpendicular_axis_fully_sampled() {
        // Vertical move: y thinned, x complete
        let window = SampleWindow::new(0, 4, 1, 5);
        let points: Vec<(i32, i32)> = sample_points(window, Direction::Up, 4).collect();

        let mut ys: Vec<i32> = points.iter().map(|p| p.1).collect();
        ys.sort();
        ys.dedup();
        assert_eq!(ys, vec![1, 4, 5]);

        let mut xs: Vec<i32> = points.iter().map(|p| p.0).collect();
        xs.sort();
        xs.dedup();
        assert_eq!(xs, vec![0, 1, 2, 3, 4]);
        assert_eq!(points.len(), 15);
    }

    #[test]
    fn test_stride_handles_negative_coordinates() {
        let window = SampleWindow::new(-4, 0, 0, 0);
        let xs = sampled_xs(window, Direction::Right, 3);
        assert_eq!(xs, vec![-4, -3, 0]);
    }

    #[test]
    fn test_passable_area_single_block_fails() {
        let mut img = CollisionImage::filled(20, 20, Color::TRANSPARENT);
        img.set_pixel(8, 5, RED);
        let index = index_with(Some(img), 1);

        let edge = Edge::new((5.0, 5.0), (10.0, 5.9));
        assert!(!index.is_passable_area(&edge, Direction::Right));

        let clear = Edge::new((5.0, 6.0), (10.0, 6.0));
        assert!(index.is_passable_area(&clear, Direction::Right));
    }

    #[test]
    fn test_stride_can_miss_thin_obstacles() {
        let mut img = CollisionImage::filled(20, 20, Color::TRANSPARENT);
        img.set_pixel(5, 0, RED);
        let edge = Edge::new((1.0, 0.0), (7.0, 0.0));

        let exact = index_with(Some(img.clone()), 1);
        assert!(!exact.is_passable_area(&edge, Direction::Right));

        // Stride 3 samples x = 1, 3, 6, 7 and steps over the wall at x = 5
        let fast = index_with(Some(img), 3);
        assert!(fast.is_passable_area(&edge, Direction::Right));
    }

    #[test]
    fn test_empty_window_passes() {
        let img = CollisionImage::filled(4, 4, RED);
        let index = index_with(Some(img), 1);
        let window = SampleWindow::new(3, 1, 0, 0);
        assert!(window.is_empty());
        assert!(index.is_window_passable(window, Direction::Right));
    }

    #[test]
    fn test_direction_codes() {
        assert_eq!(Direction::from_u8(2), Some(Direction::Down));
        assert_eq!(Direction::from_u8(5), None);
        assert!(Direction::Up.is_vertical());
        assert!(!Direction::UpLeft.is_vertical());
        assert!(!Direction::Left.is_vertical());
    }
}
