use bytemuck::{Pod, Zeroable};
use eframe::egui::{Pos2, Rect};

/// Exponent applied to normalized drag / wheel deltas when zooming.
const ZOOM_RATE: f32 = 2.5;

/// Normalized delta of one wheel notch.
const WHEEL_STEP: f32 = 0.05;

/// Uniform block as laid out in the shader: `pan` then `scale`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ViewUniform {
    pub pan: [f32; 2],
    pub scale: [f32; 2],
}

/// Interactive 2D transform: clip = `scale * (position + pan)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanZoom {
    pub pan: [f32; 2],
    pub scale: [f32; 2],
}

impl Default for PanZoom {
    fn default() -> Self {
        Self {
            pan: [0.0, 0.0],
            scale: [1.0, 1.0],
        }
    }
}

/// Map a screen position inside `rect` to `[-1, 1]` on both axes (y down).
pub fn normalize(pos: Pos2, rect: Rect) -> [f32; 2] {
    let w = rect.width().max(1.0);
    let h = rect.height().max(1.0);
    let local = pos - rect.min;
    [local.x / (w / 2.0) - 1.0, local.y / (h / 2.0) - 1.0]
}

impl PanZoom {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Translate by the movement from `prev` to `cur` (normalized coords).
    pub fn drag_pan(&mut self, prev: [f32; 2], cur: [f32; 2]) {
        let dx = cur[0] - prev[0];
        let dy = -(cur[1] - prev[1]);
        self.pan[0] += dx / self.scale[0];
        self.pan[1] += dy / self.scale[1];
    }

    /// Zoom each axis by the movement from `prev` to `cur`, keeping the
    /// point under `press` fixed.
    pub fn drag_zoom(&mut self, press: [f32; 2], prev: [f32; 2], cur: [f32; 2]) {
        let dx = cur[0] - prev[0];
        let dy = -(cur[1] - prev[1]);
        let [sx, sy] = self.scale;
        let sx_new = sx * (ZOOM_RATE * dx).exp();
        let sy_new = sy * (ZOOM_RATE * dy).exp();
        self.scale = [sx_new, sy_new];
        self.pan[0] -= press[0] * (1.0 / sx - 1.0 / sx_new);
        // screen y grows downwards, clip y upwards
        self.pan[1] += press[1] * (1.0 / sy - 1.0 / sy_new);
    }

    /// Uniform zoom by one wheel step in the direction of `delta_y`.
    pub fn wheel(&mut self, delta_y: f32) {
        if delta_y == 0.0 {
            return;
        }
        let factor = (ZOOM_RATE * delta_y.signum() * WHEEL_STEP).exp();
        self.scale[0] *= factor;
        self.scale[1] *= factor;
    }

    pub fn uniform(&self) -> ViewUniform {
        ViewUniform {
            pan: self.pan,
            scale: self.scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::pos2;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    /// CPU mirror of the vertex shader transform.
    fn apply(v: &PanZoom, position: [f32; 2]) -> [f32; 2] {
        [
            v.scale[0] * (position[0] + v.pan[0]),
            v.scale[1] * (position[1] + v.pan[1]),
        ]
    }

    #[test]
    fn default_is_identity() {
        let v = PanZoom::default();
        assert_eq!(apply(&v, [0.3, -0.7]), [0.3, -0.7]);
        assert_eq!(std::mem::size_of::<ViewUniform>(), 16);
    }

    #[test]
    fn normalize_maps_corners() {
        let rect = Rect::from_min_size(pos2(100.0, 50.0), eframe::egui::vec2(200.0, 100.0));
        assert_eq!(normalize(pos2(100.0, 50.0), rect), [-1.0, -1.0]);
        assert_eq!(normalize(pos2(200.0, 100.0), rect), [0.0, 0.0]);
        assert_eq!(normalize(pos2(300.0, 150.0), rect), [1.0, 1.0]);
    }

    #[test]
    fn pan_follows_drag_with_flipped_y() {
        let mut v = PanZoom::default();
        v.drag_pan([0.0, 0.0], [0.5, 0.25]);
        assert_eq!(v.pan, [0.5, -0.25]);

        v.scale = [2.0, 4.0];
        v.drag_pan([0.0, 0.0], [0.5, 0.0]);
        assert_eq!(v.pan, [0.75, -0.25]);
    }

    #[test]
    fn zoom_keeps_press_point_fixed() {
        let mut v = PanZoom {
            pan: [0.1, -0.2],
            scale: [1.5, 0.8],
        };
        let press = [0.4, -0.3];
        // data position currently under the press point (clip y is flipped)
        let data = [
            press[0] / v.scale[0] - v.pan[0],
            -press[1] / v.scale[1] - v.pan[1],
        ];
        v.drag_zoom(press, [0.4, -0.3], [0.6, -0.5]);
        assert!(v.scale[0] > 1.5 && v.scale[1] > 0.8);
        let clip = apply(&v, data);
        assert!(close(clip[0], press[0]));
        assert!(close(clip[1], -press[1]));
    }

    #[test]
    fn wheel_zooms_by_fixed_step() {
        let mut v = PanZoom::default();
        v.wheel(120.0);
        let f = (0.125f32).exp();
        assert!(close(v.scale[0], f) && close(v.scale[1], f));
        v.wheel(-3.0);
        assert!(close(v.scale[0], 1.0));
        v.wheel(0.0);
        assert!(close(v.scale[1], 1.0));
    }

    #[test]
    fn reset_restores_identity() {
        let mut v = PanZoom::default();
        v.drag_pan([0.0, 0.0], [1.0, 1.0]);
        v.wheel(1.0);
        v.reset();
        assert_eq!(v, PanZoom::default());
    }
}
