use glam::Vec2;

/// The bounded area beams fall through, in host coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Surface {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self { left, top, width, height }
    }

    /// Surface anchored at the host origin.
    pub fn sized(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }

    /// Host-space y of the bottom edge.
    pub fn lower_boundary(&self) -> f32 {
        self.top + self.height
    }

    /// Whether the surface has been laid out with a usable, finite size.
    pub fn is_measurable(&self) -> bool {
        [self.left, self.top, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width > 0.0
            && self.height > 0.0
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// Bounding box of a `size` box at `origin` rotated by `degrees` about its centre.
    pub fn rotated(origin: Vec2, size: Vec2, degrees: f32) -> Self {
        let half = size * 0.5;
        let center = origin + half;
        let (sin, cos) = degrees.to_radians().sin_cos();
        let (sin, cos) = (sin.abs(), cos.abs());
        let extent = Vec2::new(cos * half.x + sin * half.y, sin * half.x + cos * half.y);
        Self { min: center - extent, max: center + extent }
    }

    pub fn left(&self) -> f32 {
        self.min.x
    }

    pub fn bottom(&self) -> f32 {
        self.max.y
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }
}
