use glam::Mat4;

/// Screen-space orthographic projection: `(0, 0)` is the top-left pixel and
/// `(width, height)` the bottom-right, matching how scripts address the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenProjection {
    pub width: u32,
    pub height: u32,
}

impl ScreenProjection {
    pub fn new(size: (u32, u32)) -> Self {
        Self {
            width: size.0,
            height: size.1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn matrix(&self) -> Mat4 {
        let w = self.width.max(1) as f32;
        let h = self.height.max(1) as f32;
        Mat4::orthographic_rh(0.0, w, h, 0.0, -1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn project(p: &ScreenProjection, x: f32, y: f32) -> (f32, f32) {
        let clip = p.matrix() * Vec4::new(x, y, 0.0, 1.0);
        (clip.x / clip.w, clip.y / clip.w)
    }

    #[test]
    fn test_corners_map_to_clip_space() {
        let p = ScreenProjection::new((800, 600));
        let (x0, y0) = project(&p, 0.0, 0.0);
        assert!((x0 + 1.0).abs() < 1e-5 && (y0 - 1.0).abs() < 1e-5);
        let (x1, y1) = project(&p, 800.0, 600.0);
        assert!((x1 - 1.0).abs() < 1e-5 && (y1 + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_zero_size_is_empty() {
        assert!(ScreenProjection::new((0, 600)).is_empty());
        assert!(!ScreenProjection::new((1, 1)).is_empty());
        // Still produces a finite matrix.
        assert!(ScreenProjection::new((0, 0)).matrix().is_finite());
    }
}
