use anyhow::Result;

/// Bounding box of a detected face, in absolute pixel coordinates of the source image.
///
/// Detectors may report boxes that start slightly outside the frame, so the
/// origin is signed. Consumers clamp to the image bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl FaceRect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }
}

/// Axis-aligned rectangle stored as corner coordinates, `min <= max` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x_min: u32,
    pub y_min: u32,
    pub x_max: u32,
    pub y_max: u32,
}

impl Region {
    pub fn new(x_min: u32, y_min: u32, x_max: u32, y_max: u32) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    pub fn width(&self) -> u32 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> u32 {
        self.y_max - self.y_min
    }

    /// Integer center of the region (floor division, like the crop math expects)
    pub fn center(&self) -> (u32, u32) {
        (
            (self.x_min + self.x_max) / 2,
            (self.y_min + self.y_max) / 2,
        )
    }
}

/// Output dimensions for a processing run.
///
/// Both sides are guaranteed non-zero, which keeps the crop planner free of
/// division-by-zero cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSpec {
    width: u32,
    height: u32,
}

impl TargetSpec {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(anyhow::anyhow!(
                "Target dimensions must be greater than 0, got {}x{}",
                width,
                height
            ));
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl Default for TargetSpec {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_spec_rejects_zero() {
        assert!(TargetSpec::new(0, 1080).is_err());
        assert!(TargetSpec::new(1920, 0).is_err());
        let target = TargetSpec::new(1920, 1080).unwrap();
        assert_eq!(target, TargetSpec::default());
    }

    #[test]
    fn test_region_center_and_size() {
        let region = Region::new(1800, 700, 2200, 1140);
        assert_eq!(region.width(), 400);
        assert_eq!(region.height(), 440);
        assert_eq!(region.center(), (2000, 920));
    }

    #[test]
    fn test_face_rect_edges_with_negative_origin() {
        let face = FaceRect::new(-5, 10, 20, 30);
        assert_eq!(face.right(), 15);
        assert_eq!(face.bottom(), 40);
    }
}
