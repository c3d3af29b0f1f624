//! Projection and model matrices for 2D chart rendering.
//!
//! Matrices are column-major (`m[column][row]`) to match WGSL `mat4x4<f32>`.

use std::ops::Mul;

use ponzi_core::Rect;

/// A 4x4 column-major matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix4(pub [[f32; 4]; 4]);

impl Matrix4 {
    pub const IDENTITY: Matrix4 = Matrix4([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);

    /// Orthographic projection of the box `[left, right] x [bottom, top]`
    /// onto clip space.
    pub fn ortho(left: f32, right: f32, bottom: f32, top: f32) -> Self {
        let sx = 2.0 / (right - left);
        let sy = 2.0 / (top - bottom);
        let tx = -(right + left) / (right - left);
        let ty = -(top + bottom) / (top - bottom);

        Matrix4([
            [sx, 0.0, 0.0, 0.0],
            [0.0, sy, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [tx, ty, 0.0, 1.0],
        ])
    }

    pub fn translate(x: f32, y: f32) -> Self {
        let mut m = Self::IDENTITY;
        m.0[3][0] = x;
        m.0[3][1] = y;
        m
    }

    pub fn scale(x: f32, y: f32) -> Self {
        let mut m = Self::IDENTITY;
        m.0[0][0] = x;
        m.0[1][1] = y;
        m
    }

    /// Counter-clockwise rotation around the Z axis.
    pub fn rotate_z(radians: f32) -> Self {
        let (s, c) = radians.sin_cos();
        Matrix4([
            [c, s, 0.0, 0.0],
            [-s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Model matrix stretching the unit square `[-1, 1]^2` over `rect`.
    pub fn for_rect(rect: &Rect) -> Self {
        let sx = rect.width() as f32 / 2.0;
        let sy = rect.height() as f32 / 2.0;
        let cx = rect.min.x as f32 + sx;
        let cy = rect.min.y as f32 + sy;
        Self::translate(cx, cy) * Self::scale(sx, sy)
    }

    /// Apply to a 2D point (z = 0, w = 1).
    pub fn transform_point(&self, x: f32, y: f32) -> [f32; 2] {
        let m = &self.0;
        [
            m[0][0] * x + m[1][0] * y + m[3][0],
            m[0][1] * x + m[1][1] * y + m[3][1],
        ]
    }

    pub fn to_cols_array_2d(&self) -> [[f32; 4]; 4] {
        self.0
    }
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Matrix4 {
    type Output = Matrix4;

    fn mul(self, rhs: Matrix4) -> Matrix4 {
        let a = &self.0;
        let b = &rhs.0;
        let mut out = [[0.0f32; 4]; 4];
        for (c, col) in out.iter_mut().enumerate() {
            for (r, cell) in col.iter_mut().enumerate() {
                *cell = (0..4).map(|k| a[k][r] * b[c][k]).sum();
            }
        }
        Matrix4(out)
    }
}

/// Projection for a window measured in pixels with a bottom-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub width: f32,
    pub height: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1) as f32,
            height: height.max(1) as f32,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1) as f32;
        self.height = height.max(1) as f32;
    }

    pub fn build_view_projection_matrix(&self) -> Matrix4 {
        Matrix4::ortho(0.0, self.width, 0.0, self.height)
    }
}
