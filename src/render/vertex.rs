use bytemuck::{Pod, Zeroable};
use eframe::wgpu;

use crate::data::model::Trace;

/// One vertex of a trace strip.
///
/// `index` is the strip number; it is integral on every vertex so only the
/// connector segment between two strips interpolates to a fractional value.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct StripVertex {
    pub position: [f32; 2],
    pub color: [f32; 3],
    pub index: f32,
}

impl StripVertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Float32x3, // color
        2 => Float32    // strip index
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<StripVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Min/max scale samples into [-1, 1]. A constant signal maps to 0.
pub fn normalize_samples(data: &[f64]) -> Vec<f32> {
    let min = data.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = data.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if !range.is_finite() || range.abs() < f64::EPSILON {
        return vec![0.0; data.len()];
    }
    data.iter()
        .map(|&y| ((y - min) / range * 2.0 - 1.0) as f32)
        .collect()
}

/// `n` evenly spaced values over [-1, 1]; a single point sits at 0.
pub fn linspace(n: usize) -> Vec<f32> {
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let step = 2.0 / (n - 1) as f64;
            (0..n).map(|i| (-1.0 + i as f64 * step) as f32).collect()
        }
    }
}

/// Pack traces into one vertex buffer, one strip per trace.
///
/// Strip `k` of `m` occupies the horizontal band of height `2 / m` counted
/// from the top, so a single trace fills the full [-1, 1] range.
pub fn pack_strips(traces: &[&Trace], colors: &[[f32; 3]]) -> Vec<StripVertex> {
    let m = traces.len();
    let total: usize = traces.iter().map(|tr| tr.npts()).sum();
    let mut out = Vec::with_capacity(total);

    for (k, tr) in traces.iter().enumerate() {
        let color = colors.get(k).copied().unwrap_or([1.0, 1.0, 1.0]);
        let half_band = 1.0 / m as f32;
        let center = 1.0 - (2 * k + 1) as f32 * half_band;

        let xs = linspace(tr.npts());
        let ys = normalize_samples(&tr.data);
        out.extend(xs.into_iter().zip(ys).map(|(x, y)| StripVertex {
            position: [x, center + y * half_band],
            color,
            index: k as f32,
        }));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::trace;

    #[test]
    fn vertex_stride_is_24_bytes() {
        assert_eq!(std::mem::size_of::<StripVertex>(), 24);
        assert_eq!(StripVertex::layout().array_stride, 24);
    }

    #[test]
    fn normalized_samples_span_unit_range() {
        let ys = normalize_samples(&[10.0, -30.0, 50.0, 0.0]);
        assert_eq!(ys, vec![0.0, -1.0, 1.0, -0.25]);
        assert!(ys.iter().all(|y| (-1.0..=1.0).contains(y)));
    }

    #[test]
    fn constant_signal_is_centred() {
        assert_eq!(normalize_samples(&[4.0, 4.0, 4.0]), vec![0.0; 3]);
        assert!(normalize_samples(&[]).is_empty());
    }

    #[test]
    fn linspace_endpoints() {
        assert_eq!(linspace(3), vec![-1.0, 0.0, 1.0]);
        assert_eq!(linspace(1), vec![0.0]);
        assert!(linspace(0).is_empty());
    }

    #[test]
    fn single_trace_fills_clip_space() {
        let tr = trace("XX_A__HHZ", 0, 1.0, vec![0.0, 2.0, 1.0]);
        let v = pack_strips(&[&tr], &[[0.5, 0.5, 0.5]]);
        assert_eq!(v.len(), 3);
        assert_eq!(v[0].position, [-1.0, -1.0]);
        assert_eq!(v[1].position, [0.0, 1.0]);
        assert_eq!(v[2].position, [1.0, 0.0]);
        assert!(v.iter().all(|p| p.index == 0.0 && p.color == [0.5, 0.5, 0.5]));
    }

    #[test]
    fn strips_get_own_band_and_index() {
        let a = trace("XX_A__HHZ", 0, 1.0, vec![0.0, 1.0]);
        let b = trace("XX_B__HHZ", 0, 1.0, vec![0.0, 1.0, 2.0]);
        let v = pack_strips(&[&a, &b], &[]);
        assert_eq!(v.len(), 5);
        // top band [0, 1]
        assert_eq!(v[0].position[1], 0.0);
        assert_eq!(v[1].position[1], 1.0);
        // bottom band [-1, 0]
        assert_eq!(v[2].position[1], -1.0);
        assert_eq!(v[4].position[1], 0.0);
        assert_eq!(v[2].index, 1.0);
        assert_eq!(v[2].color, [1.0, 1.0, 1.0]);
    }
}
