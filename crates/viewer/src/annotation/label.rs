use ab_glyph::{point, Font, FontRef, Glyph, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use thiserror::Error;

/// Label canvas size in pixels
pub const LABEL_WIDTH: u32 = 256;
pub const LABEL_HEIGHT: u32 = 64;

/// Glyph height in pixels
pub const LABEL_FONT_PX: f32 = 20.0;

/// Black at 80% opacity
pub const LABEL_BACKGROUND: [u8; 4] = [0, 0, 0, 204];

pub const LABEL_TEXT_COLOR: [u8; 3] = [255, 255, 255];

#[derive(Debug, Error)]
pub enum LabelFontError {
    #[error("invalid label font data")]
    InvalidFont,
}

/// Turns label text into a fixed-size RGBA image.
///
/// Output depends only on the text: every label in a session has the same
/// canvas size and font, and text that does not fit is clipped.
pub struct LabelRasterizer {
    font: FontRef<'static>,
    scale: PxScale,
}

impl LabelRasterizer {
    /// Rasterizer using the UI's default proportional font (Latin + Cyrillic).
    pub fn new() -> Result<Self, LabelFontError> {
        Self::from_font_bytes(epaint_default_fonts::UBUNTU_LIGHT)
    }

    pub fn from_font_bytes(data: &'static [u8]) -> Result<Self, LabelFontError> {
        let font = FontRef::try_from_slice(data).map_err(|_| LabelFontError::InvalidFont)?;
        Ok(Self {
            font,
            scale: PxScale::from(LABEL_FONT_PX),
        })
    }

    /// Render `text` centered on both axes. Empty text gives a background-only image.
    pub fn rasterize(&self, text: &str) -> RgbaImage {
        let mut image = RgbaImage::from_pixel(LABEL_WIDTH, LABEL_HEIGHT, Rgba(LABEL_BACKGROUND));
        let (glyphs, width) = self.layout(text);
        if glyphs.is_empty() {
            return image;
        }

        let scaled = self.font.as_scaled(self.scale);
        let origin_x = (LABEL_WIDTH as f32 - width) / 2.0;
        // Vertical middle of the ascent..descent box sits on the canvas center line
        let baseline = LABEL_HEIGHT as f32 / 2.0 + (scaled.ascent() + scaled.descent()) / 2.0;

        for mut glyph in glyphs {
            glyph.position = point(glyph.position.x + origin_x, baseline);
            let Some(outlined) = self.font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|x, y, coverage| {
                let px = bounds.min.x as i32 + x as i32;
                let py = bounds.min.y as i32 + y as i32;
                if px < 0 || py < 0 || px >= LABEL_WIDTH as i32 || py >= LABEL_HEIGHT as i32 {
                    return;
                }
                let pixel = image.get_pixel_mut(px as u32, py as u32);
                *pixel = blend_text(*pixel, coverage);
            });
        }

        image
    }

    /// Glyphs positioned on a zero baseline plus total advance width.
    fn layout(&self, text: &str) -> (Vec<Glyph>, f32) {
        let scaled = self.font.as_scaled(self.scale);
        let mut glyphs = Vec::new();
        let mut caret = 0.0;
        let mut previous = None;

        for c in text.chars().filter(|c| !c.is_control()) {
            let id = scaled.glyph_id(c);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, id);
            }
            glyphs.push(id.with_scale_and_position(self.scale, point(caret, 0.0)));
            caret += scaled.h_advance(id);
            previous = Some(id);
        }

        (glyphs, caret)
    }
}

/// Source-over of the text color with `coverage` onto an unpremultiplied pixel
fn blend_text(dst: Rgba<u8>, coverage: f32) -> Rgba<u8> {
    let c = coverage.clamp(0.0, 1.0);
    let [r, g, b, a] = dst.0;
    let mix = |d: u8, s: u8| (d as f32 * (1.0 - c) + s as f32 * c).round() as u8;
    let alpha = a as f32 + (255.0 - a as f32) * c;
    Rgba([
        mix(r, LABEL_TEXT_COLOR[0]),
        mix(g, LABEL_TEXT_COLOR[1]),
        mix(b, LABEL_TEXT_COLOR[2]),
        alpha.round() as u8,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ink_columns(image: &RgbaImage) -> Vec<u32> {
        (0..image.width())
            .filter(|&x| (0..image.height()).any(|y| image.get_pixel(x, y).0[0] > 128))
            .collect()
    }

    fn ink_rows(image: &RgbaImage) -> Vec<u32> {
        (0..image.height())
            .filter(|&y| (0..image.width()).any(|x| image.get_pixel(x, y).0[0] > 128))
            .collect()
    }

    #[test]
    fn test_empty_text_is_background_only() {
        let r = LabelRasterizer::new().unwrap();
        let image = r.rasterize("");
        assert_eq!(image.dimensions(), (LABEL_WIDTH, LABEL_HEIGHT));
        assert!(image.pixels().all(|p| p.0 == LABEL_BACKGROUND));
    }

    #[test]
    fn test_text_is_centered() {
        let r = LabelRasterizer::new().unwrap();
        let image = r.rasterize("Humerus");

        let cols = ink_columns(&image);
        assert!(!cols.is_empty());
        let center_x = (cols[0] + cols[cols.len() - 1]) as f32 / 2.0;
        assert!((center_x - LABEL_WIDTH as f32 / 2.0).abs() < 6.0);

        let rows = ink_rows(&image);
        let center_y = (rows[0] + rows[rows.len() - 1]) as f32 / 2.0;
        assert!((center_y - LABEL_HEIGHT as f32 / 2.0).abs() < 6.0);
    }

    #[test]
    fn test_deterministic() {
        let r = LabelRasterizer::new().unwrap();
        assert_eq!(r.rasterize("Femur"), r.rasterize("Femur"));
        assert_ne!(r.rasterize("Femur"), r.rasterize("Tibia"));
    }

    #[test]
    fn test_long_text_clipped_not_resized() {
        let r = LabelRasterizer::new().unwrap();
        let image = r.rasterize(&"Phalanges digitorum manus ".repeat(4));
        assert_eq!(image.dimensions(), (LABEL_WIDTH, LABEL_HEIGHT));
        // ink reaches both edges of the canvas
        let cols = ink_columns(&image);
        assert!(cols.iter().any(|&c| c < 16));
        assert!(cols.iter().any(|&c| c >= LABEL_WIDTH - 16));
    }

    #[test]
    fn test_cyrillic_renders() {
        let r = LabelRasterizer::new().unwrap();
        let image = r.rasterize("Бедренная кость");
        assert!(!ink_columns(&image).is_empty());
    }

    #[test]
    fn test_invalid_font_rejected() {
        assert!(matches!(
            LabelRasterizer::from_font_bytes(b"not a font"),
            Err(LabelFontError::InvalidFont)
        ));
    }

    #[test]
    fn test_blend_full_coverage_is_opaque_text() {
        let out = blend_text(Rgba(LABEL_BACKGROUND), 1.0);
        assert_eq!(out.0, [255, 255, 255, 255]);
        assert_eq!(blend_text(Rgba(LABEL_BACKGROUND), 0.0).0, LABEL_BACKGROUND);
    }
}
