//! Condition icons.
//!
//! Maps provider condition codes to an icon kind and rasterizes each
//! kind as a small flat-shape RGBA image. Icons are PNG-encoded at full
//! raster resolution; the consumer scales after decode.

use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

/// Edge length of the synthesized icon raster.
pub const ICON_RASTER_SIZE: u32 = 64;

/// The fixed set of renderable conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconKind {
    Storm,
    Drizzle,
    Rain,
    Snow,
    Fog,
    Clear,
    LightClouds,
    Clouds,
}

impl IconKind {
    /// Classify a provider condition code.
    ///
    /// Code ranges follow the provider's scheme: 2xx thunderstorm,
    /// 3xx drizzle, 5xx rain (511 freezing), 6xx snow, 7xx atmosphere,
    /// 800 clear, 801+ clouds. Unknown codes yield `None`.
    pub fn for_condition(code: u16) -> Option<IconKind> {
        match code {
            200..=232 => Some(IconKind::Storm),
            300..=321 => Some(IconKind::Drizzle),
            511 => Some(IconKind::Snow),
            500..=504 | 520..=531 => Some(IconKind::Rain),
            600..=622 => Some(IconKind::Snow),
            761 | 781 => Some(IconKind::Storm),
            701..=760 => Some(IconKind::Fog),
            800 => Some(IconKind::Clear),
            801 => Some(IconKind::LightClouds),
            802..=804 => Some(IconKind::Clouds),
            _ => None,
        }
    }
}

const SUN: Rgba<u8> = Rgba([250, 200, 60, 255]);
const CLOUD: Rgba<u8> = Rgba([200, 205, 215, 255]);
const DARK_CLOUD: Rgba<u8> = Rgba([120, 128, 142, 255]);
const DROP: Rgba<u8> = Rgba([70, 130, 220, 255]);
const FLAKE: Rgba<u8> = Rgba([240, 245, 255, 255]);
const HAZE: Rgba<u8> = Rgba([180, 180, 180, 200]);
const BOLT: Rgba<u8> = Rgba([255, 220, 80, 255]);

/// Rasterize one icon kind.
pub fn render_icon(kind: IconKind) -> RgbaImage {
    let size = ICON_RASTER_SIZE;
    let mut img = RgbaImage::from_pixel(size, size, Rgba([0, 0, 0, 0]));
    let c = size as i32 / 2;
    match kind {
        IconKind::Clear => {
            fill_disc(&mut img, c, c, 20, SUN);
        }
        IconKind::LightClouds => {
            fill_disc(&mut img, c - 8, c - 8, 14, SUN);
            fill_disc(&mut img, c + 6, c + 8, 16, CLOUD);
            fill_disc(&mut img, c - 10, c + 10, 12, CLOUD);
        }
        IconKind::Clouds => {
            fill_disc(&mut img, c - 10, c, 14, CLOUD);
            fill_disc(&mut img, c + 8, c + 2, 16, DARK_CLOUD);
        }
        IconKind::Drizzle | IconKind::Rain => {
            let color = if kind == IconKind::Drizzle { CLOUD } else { DARK_CLOUD };
            fill_disc(&mut img, c, c - 10, 16, color);
            for i in 0..3 {
                fill_band(&mut img, c - 14 + i * 14, c + 12, 4, 12, DROP);
            }
        }
        IconKind::Snow => {
            fill_disc(&mut img, c, c - 10, 16, CLOUD);
            for i in 0..3 {
                fill_disc(&mut img, c - 14 + i * 14, c + 18, 4, FLAKE);
            }
        }
        IconKind::Fog => {
            for i in 0..4 {
                fill_band(&mut img, 8, c - 18 + i * 12, (size - 16) as i32, 5, HAZE);
            }
        }
        IconKind::Storm => {
            fill_disc(&mut img, c, c - 12, 16, DARK_CLOUD);
            fill_band(&mut img, c - 3, c + 2, 6, 20, BOLT);
        }
    }
    img
}

/// Encode a raster as PNG bytes.
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>, image::ImageError> {
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(img.clone())
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

fn fill_disc(img: &mut RgbaImage, cx: i32, cy: i32, radius: i32, color: Rgba<u8>) {
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy > radius * radius {
                continue;
            }
            put_pixel_clamped(img, cx + dx, cy + dy, color);
        }
    }
}

fn fill_band(img: &mut RgbaImage, x: i32, y: i32, width: i32, height: i32, color: Rgba<u8>) {
    for dy in 0..height {
        for dx in 0..width {
            put_pixel_clamped(img, x + dx, y + dy, color);
        }
    }
}

fn put_pixel_clamped(img: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as u32, y as u32);
    if x < img.width() && y < img.height() {
        img.put_pixel(x, y, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- classification ----------------------------------------------------

    #[test]
    fn condition_code_ranges() {
        assert_eq!(IconKind::for_condition(200), Some(IconKind::Storm));
        assert_eq!(IconKind::for_condition(310), Some(IconKind::Drizzle));
        assert_eq!(IconKind::for_condition(500), Some(IconKind::Rain));
        assert_eq!(IconKind::for_condition(511), Some(IconKind::Snow));
        assert_eq!(IconKind::for_condition(525), Some(IconKind::Rain));
        assert_eq!(IconKind::for_condition(615), Some(IconKind::Snow));
        assert_eq!(IconKind::for_condition(741), Some(IconKind::Fog));
        assert_eq!(IconKind::for_condition(761), Some(IconKind::Storm));
        assert_eq!(IconKind::for_condition(781), Some(IconKind::Storm));
        assert_eq!(IconKind::for_condition(800), Some(IconKind::Clear));
        assert_eq!(IconKind::for_condition(801), Some(IconKind::LightClouds));
        assert_eq!(IconKind::for_condition(804), Some(IconKind::Clouds));
    }

    #[test]
    fn unknown_codes_are_rejected() {
        assert_eq!(IconKind::for_condition(0), None);
        assert_eq!(IconKind::for_condition(199), None);
        assert_eq!(IconKind::for_condition(905), None);
    }

    // -- rasterization -----------------------------------------------------

    #[test]
    fn rendered_icon_has_expected_dimensions_and_content() {
        let img = render_icon(IconKind::Clear);
        assert_eq!(img.dimensions(), (ICON_RASTER_SIZE, ICON_RASTER_SIZE));
        let opaque = img.pixels().filter(|p| p.0[3] != 0).count();
        assert!(opaque > 0, "icon raster should not be fully transparent");
    }

    #[test]
    fn png_bytes_decode_back_to_same_dimensions() {
        let img = render_icon(IconKind::Rain);
        let bytes = encode_png(&img).expect("encode");
        let decoded = image::load_from_memory(&bytes).expect("decode");
        assert_eq!(decoded.width(), ICON_RASTER_SIZE);
        assert_eq!(decoded.height(), ICON_RASTER_SIZE);
    }
}
