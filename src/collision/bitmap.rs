use std::path::Path;

use super::color::Color;
use crate::error::CollisionError;

fn pixel_count(width: u32, height: u32) -> usize {
    width as usize * height as usize
}

/// Decoded collision bitmap, immutable once loaded
#[derive(Debug, Clone)]
pub struct CollisionImage {
    pub width: u32,
    pub height: u32,
    pixels: Vec<Color>,
}

impl CollisionImage {
    /// Create an image filled with a single color
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; pixel_count(width, height)],
        }
    }

    /// Build from a tightly packed RGBA8 buffer
    pub fn from_rgba(width: u32, height: u32, bytes: &[u8]) -> Result<Self, CollisionError> {
        if bytes.len() != pixel_count(width, height) * 4 {
            return Err(CollisionError::BufferSize {
                width,
                height,
                length: bytes.len(),
            });
        }

        let pixels = bytes
            .chunks_exact(4)
            .map(|p| Color::rgba(p[0], p[1], p[2], p[3]))
            .collect();

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Decode an image file (PNG) into RGBA pixels
    pub fn load(path: &Path) -> Result<Self, CollisionError> {
        let decoded = image::open(path)
            .map_err(|source| CollisionError::Image {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        let (width, height) = decoded.dimensions();
        Self::from_rgba(width, height, decoded.as_raw())
    }

    /// Color at a pixel, `None` outside the image
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        let idx = y as usize * self.width as usize + x as usize;
        self.pixels.get(idx).copied()
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = y as usize * self.width as usize + x as usize;
        self.pixels[idx] = color;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_pixel_bounds() {
        let mut img = CollisionImage::filled(4, 3, Color::TRANSPARENT);
        img.set_pixel(3, 2, Color::rgb(255, 0, 0));
        img.set_pixel(9, 9, Color::rgb(255, 0, 0)); // ignored

        assert_eq!(img.pixel(3, 2), Some(Color::rgb(255, 0, 0)));
        assert_eq!(img.pixel(0, 0), Some(Color::TRANSPARENT));
        assert_eq!(img.pixel(4, 0), None);
        assert_eq!(img.pixel(-1, 0), None);
        assert_eq!(img.pixel(0, 3), None);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_pixel_count_does_not_wrap() {
        assert_eq!(pixel_count(70_000, 70_000), 4_900_000_000);
        assert_eq!(pixel_count(u32::MAX, 0), 0);
    }

    #[test]
    fn test_from_rgba_size_mismatch() {
        let err = CollisionImage::from_rgba(2, 2, &[0; 15]).unwrap_err();
        assert!(matches!(err, CollisionError::BufferSize { length: 15, .. }));
    }

    #[test]
    fn test_load_png() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cm.png");

        let mut png = image::RgbaImage::from_pixel(8, 6, image::Rgba([0, 0, 0, 0]));
        png.put_pixel(5, 1, image::Rgba([0, 255, 0, 255]));
        png.save(&path).unwrap();

        let img = CollisionImage::load(&path).unwrap();
        assert_eq!((img.width, img.height), (8, 6));
        assert_eq!(img.pixel(5, 1), Some(Color::rgb(0, 255, 0)));
        assert_eq!(img.pixel(0, 0), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_load_missing_file() {
        let err = CollisionImage::load(Path::new("missing/cm.png")).unwrap_err();
        assert!(matches!(err, CollisionError::Image { .. }));
    }
}
