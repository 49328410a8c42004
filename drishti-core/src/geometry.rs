//! Affine mapping between frame space and the square model-input space

use crate::error::{Error, Result};
use crate::types::RectF;
use serde::{Deserialize, Serialize};

/// Determinant threshold below which a transform is treated as singular
const SINGULAR_EPSILON: f32 = 1e-9;

/// Row-major 2x3 affine transform:
///
/// ```text
/// | a  b  c |
/// | d  e  f |
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl AffineTransform {
    pub const IDENTITY: AffineTransform = AffineTransform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 0.0,
        e: 1.0,
        f: 0.0,
    };

    pub fn translation(tx: f32, ty: f32) -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: tx,
            d: 0.0,
            e: 1.0,
            f: ty,
        }
    }

    pub fn scaling(sx: f32, sy: f32) -> Self {
        Self {
            a: sx,
            b: 0.0,
            c: 0.0,
            d: 0.0,
            e: sy,
            f: 0.0,
        }
    }

    /// Rotation by a right-angle multiple, exact (no trigonometry)
    fn right_angle_rotation(degrees: i32) -> Self {
        let (cos, sin) = match degrees {
            0 => (1.0, 0.0),
            90 => (0.0, 1.0),
            180 => (-1.0, 0.0),
            270 => (0.0, -1.0),
            _ => unreachable!("rotation must be normalized to a right angle"),
        };
        Self {
            a: cos,
            b: -sin,
            c: 0.0,
            d: sin,
            e: cos,
            f: 0.0,
        }
    }

    /// Compose: the returned transform applies `self` first, then `next`
    pub fn then(&self, next: &AffineTransform) -> AffineTransform {
        AffineTransform {
            a: next.a * self.a + next.b * self.d,
            b: next.a * self.b + next.b * self.e,
            c: next.a * self.c + next.b * self.f + next.c,
            d: next.d * self.a + next.e * self.d,
            e: next.d * self.b + next.e * self.e,
            f: next.d * self.c + next.e * self.f + next.f,
        }
    }

    pub fn map_point(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.b * y + self.c,
            self.d * x + self.e * y + self.f,
        )
    }

    /// Map a rectangle to the axis-aligned bounding box of its mapped
    /// corners. Exact for right-angle rotations.
    pub fn map_rect(&self, rect: &RectF) -> RectF {
        let corners = [
            self.map_point(rect.left, rect.top),
            self.map_point(rect.right, rect.top),
            self.map_point(rect.left, rect.bottom),
            self.map_point(rect.right, rect.bottom),
        ];

        let mut left = f32::INFINITY;
        let mut top = f32::INFINITY;
        let mut right = f32::NEG_INFINITY;
        let mut bottom = f32::NEG_INFINITY;
        for (x, y) in corners {
            left = left.min(x);
            top = top.min(y);
            right = right.max(x);
            bottom = bottom.max(y);
        }

        RectF::new(left, top, right, bottom)
    }

    /// Invert the transform. Fails if the linear part is singular.
    pub fn invert(&self) -> Result<AffineTransform> {
        let det = self.a * self.e - self.b * self.d;
        if !det.is_finite() || det.abs() < SINGULAR_EPSILON {
            return Err(Error::Geometry(format!(
                "singular transform (determinant {})",
                det
            )));
        }

        Ok(AffineTransform {
            a: self.e / det,
            b: -self.b / det,
            c: (self.b * self.f - self.c * self.e) / det,
            d: -self.d / det,
            e: self.a / det,
            f: (self.c * self.d - self.a * self.f) / det,
        })
    }
}

/// Forward (frame -> crop) and inverse (crop -> frame) maps for one
/// preview configuration. The inverse is the exact matrix inverse of the
/// forward map; both stay consistent for the lifetime of the
/// configuration.
#[derive(Debug, Clone, Copy)]
pub struct TransformPair {
    pub forward: AffineTransform,
    pub inverse: AffineTransform,
}

impl TransformPair {
    /// Build the mapping from an arbitrary source rectangle to a fixed
    /// square destination of side `dst_size`, rotated by
    /// `rotation_degrees` (right-angle multiples only).
    ///
    /// With `maintain_aspect` the source is uniformly scaled to fit and
    /// centered; without it each axis is scaled independently to fill
    /// (accepted distortion).
    pub fn compute(
        src_width: u32,
        src_height: u32,
        dst_size: u32,
        rotation_degrees: i32,
        maintain_aspect: bool,
    ) -> Result<TransformPair> {
        if src_width == 0 || src_height == 0 {
            return Err(Error::Geometry(format!(
                "degenerate source size {}x{}",
                src_width, src_height
            )));
        }
        if dst_size == 0 {
            return Err(Error::Geometry("degenerate destination size 0".to_string()));
        }
        if rotation_degrees % 90 != 0 {
            return Err(Error::Geometry(format!(
                "unsupported rotation {} (must be a multiple of 90)",
                rotation_degrees
            )));
        }

        let rotation = rotation_degrees.rem_euclid(360);

        // After a 90/270 rotation the source axes swap relative to the
        // destination
        let transpose = rotation == 90 || rotation == 270;
        let (in_width, in_height) = if transpose {
            (src_height as f32, src_width as f32)
        } else {
            (src_width as f32, src_height as f32)
        };

        let dst = dst_size as f32;
        let mut scale_x = dst / in_width;
        let mut scale_y = dst / in_height;
        if maintain_aspect {
            let uniform = scale_x.min(scale_y);
            scale_x = uniform;
            scale_y = uniform;
        }

        let forward = AffineTransform::translation(
            -(src_width as f32) / 2.0,
            -(src_height as f32) / 2.0,
        )
        .then(&AffineTransform::right_angle_rotation(rotation))
        .then(&AffineTransform::scaling(scale_x, scale_y))
        .then(&AffineTransform::translation(dst / 2.0, dst / 2.0));

        let inverse = forward.invert()?;

        Ok(TransformPair { forward, inverse })
    }
}
