use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n).map(|i| hue_color(i, n)).collect()
}

/// Colour of trace `index` among `count` traces.
pub fn trace_color(index: usize, count: usize) -> Color32 {
    hue_color(index % count.max(1), count.max(1))
}

fn hue_color(i: usize, n: usize) -> Color32 {
    let hue = (i as f32 / n as f32) * 360.0;
    let hsl = Hsl::new(hue, 0.75, 0.55);
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// Linear `[r, g, b]` in 0..=1 for vertex attributes.
pub fn to_rgb_f32(c: Color32) -> [f32; 3] {
    [
        c.r() as f32 / 255.0,
        c.g() as f32 / 255.0,
        c.b() as f32 / 255.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_length_and_distinct_colours() {
        assert!(generate_palette(0).is_empty());
        let p = generate_palette(6);
        assert_eq!(p.len(), 6);
        for (i, a) in p.iter().enumerate() {
            for b in &p[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn trace_color_matches_palette() {
        let p = generate_palette(4);
        assert_eq!(trace_color(2, 4), p[2]);
        // a zero count still yields a colour
        assert_eq!(trace_color(3, 0), generate_palette(1)[0]);
    }

    #[test]
    fn rgb_components_in_unit_range() {
        let rgb = to_rgb_f32(Color32::from_rgb(255, 0, 51));
        assert_eq!(rgb, [1.0, 0.0, 0.2]);
    }
}
