//! Procedural window icon: four candlesticks on a transparent square.

use ponzi_render::Color;
use winit::window::Icon;

pub const ICON_SIZE: u32 = 32;

/// `(x, body_bottom, body_top, wick_bottom, wick_top)` in icon pixels, y up.
const CANDLES: [(u32, u32, u32, u32, u32); 4] = [
    (4, 8, 16, 5, 19),
    (11, 12, 22, 9, 25),
    (18, 10, 18, 7, 21),
    (25, 16, 27, 13, 30),
];
const BODY_WIDTH: u32 = 5;

/// RGBA8 pixels, rows top to bottom.
pub fn icon_rgba() -> Vec<u8> {
    let mut pixels = vec![0u8; (ICON_SIZE * ICON_SIZE * 4) as usize];
    let mut put = |x: u32, y: u32, color: Color| {
        let row = ICON_SIZE - 1 - y;
        let i = ((row * ICON_SIZE + x) * 4) as usize;
        pixels[i..i + 4].copy_from_slice(&color.to_rgba8());
    };

    let mut previous_top = 0;
    for (x, bottom, top, wick_bottom, wick_top) in CANDLES {
        let color = if top >= previous_top { Color::UP } else { Color::DOWN };
        previous_top = top;
        let mid = x + BODY_WIDTH / 2;
        for y in wick_bottom..=wick_top {
            put(mid, y, color);
        }
        for y in bottom..=top {
            for dx in 0..BODY_WIDTH {
                put(x + dx, y, color);
            }
        }
    }
    pixels
}

pub fn window_icon() -> Option<Icon> {
    match Icon::from_rgba(icon_rgba(), ICON_SIZE, ICON_SIZE) {
        Ok(icon) => Some(icon),
        Err(e) => {
            log::warn!("cannot build window icon: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_dimensions_and_coverage() {
        let rgba = icon_rgba();
        assert_eq!(rgba.len(), (ICON_SIZE * ICON_SIZE * 4) as usize);
        let opaque = rgba.chunks(4).filter(|p| p[3] == 255).count();
        assert!(opaque > 100);
        // Corners stay transparent.
        assert_eq!(&rgba[0..4], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_icon_builds() {
        assert!(window_icon().is_some());
    }
}
