//! Synthetic reference shapes rendered at catalogue construction.

use image::{DynamicImage, GrayImage, ImageBuffer, Luma, Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_ellipse_mut, draw_filled_rect_mut, draw_polygon_mut,
};
use imageproc::point::Point;
use imageproc::rect::Rect;

/// Side length of every built-in template canvas
pub const TEMPLATE_SIZE: u32 = 128;

const CENTER: i32 = (TEMPLATE_SIZE / 2) as i32;

/// All built-in templates, in name order
pub fn all() -> Vec<(&'static str, DynamicImage)> {
    vec![
        ("circle", circle()),
        ("ellipse", ellipse()),
        ("gaussian", gaussian()),
        ("rectangle", rectangle()),
        ("square", square()),
        ("triangle", triangle()),
    ]
}

pub fn circle() -> DynamicImage {
    let mut img = GrayImage::new(TEMPLATE_SIZE, TEMPLATE_SIZE);
    draw_filled_circle_mut(&mut img, (CENTER, CENTER), 40, Luma([255u8]));
    DynamicImage::ImageLuma8(img)
}

/// Color canvas, so lookups go through luminance conversion
pub fn ellipse() -> DynamicImage {
    let mut img = RgbImage::new(TEMPLATE_SIZE, TEMPLATE_SIZE);
    draw_filled_ellipse_mut(&mut img, (CENTER, CENTER), 48, 24, Rgb([255u8, 200, 80]));
    DynamicImage::ImageRgb8(img)
}

/// 16-bit Gaussian beam profile
pub fn gaussian() -> DynamicImage {
    let sigma = 14.0_f64;
    let center = f64::from(CENTER);
    let img = ImageBuffer::from_fn(TEMPLATE_SIZE, TEMPLATE_SIZE, |x, y| {
        let dx = f64::from(x) - center;
        let dy = f64::from(y) - center;
        let value = (-(dx * dx + dy * dy) / (2.0 * sigma * sigma)).exp();
        Luma([(value * f64::from(u16::MAX)).round() as u16])
    });
    DynamicImage::ImageLuma16(img)
}

pub fn rectangle() -> DynamicImage {
    let mut img = GrayImage::new(TEMPLATE_SIZE, TEMPLATE_SIZE);
    draw_filled_rect_mut(&mut img, Rect::at(24, 44).of_size(80, 40), Luma([255u8]));
    DynamicImage::ImageLuma8(img)
}

pub fn square() -> DynamicImage {
    let mut img = GrayImage::new(TEMPLATE_SIZE, TEMPLATE_SIZE);
    draw_filled_rect_mut(&mut img, Rect::at(34, 34).of_size(60, 60), Luma([255u8]));
    DynamicImage::ImageLuma8(img)
}

pub fn triangle() -> DynamicImage {
    let mut img = GrayImage::new(TEMPLATE_SIZE, TEMPLATE_SIZE);
    let vertices = [Point::new(64, 20), Point::new(108, 100), Point::new(20, 100)];
    draw_polygon_mut(&mut img, &vertices, Luma([255u8]));
    DynamicImage::ImageLuma8(img)
}
