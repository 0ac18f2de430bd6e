use image::{DynamicImage, GrayImage, ImageBuffer, Luma, Primitive};

/// A single-channel image at the bit depth it was decoded with
#[derive(Debug, Clone)]
pub enum SingleChannel {
    U8(GrayImage),
    U16(ImageBuffer<Luma<u16>, Vec<u16>>),
    F32(ImageBuffer<Luma<f32>, Vec<f32>>),
}

impl SingleChannel {
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::U8(img) => img.dimensions(),
            Self::U16(img) => img.dimensions(),
            Self::F32(img) => img.dimensions(),
        }
    }
}

/// Collapse color channels to luminance, keeping the bit depth.
pub fn to_gray(image: &DynamicImage) -> SingleChannel {
    match image {
        DynamicImage::ImageLuma8(img) => SingleChannel::U8(img.clone()),
        DynamicImage::ImageLuma16(img) => SingleChannel::U16(img.clone()),
        DynamicImage::ImageLumaA8(_) | DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => {
            SingleChannel::U8(image.to_luma8())
        }
        DynamicImage::ImageLumaA16(_)
        | DynamicImage::ImageRgb16(_)
        | DynamicImage::ImageRgba16(_) => SingleChannel::U16(image.to_luma16()),
        _ => SingleChannel::F32(image.to_luma32f()),
    }
}

/// Convert to 8-bit, min-max rescaling anything deeper into `0..=255`.
///
/// 8-bit input is returned as is. A constant image maps to all zeros.
pub fn to_uint8(image: &SingleChannel) -> GrayImage {
    match image {
        SingleChannel::U8(img) => img.clone(),
        SingleChannel::U16(img) => rescale(img),
        SingleChannel::F32(img) => rescale(img),
    }
}

/// `to_gray` followed by `to_uint8`, skipping both for 8-bit luma input.
pub fn normalize(image: &DynamicImage) -> GrayImage {
    match image {
        DynamicImage::ImageLuma8(img) => img.clone(),
        _ => to_uint8(&to_gray(image)),
    }
}

fn rescale<T>(image: &ImageBuffer<Luma<T>, Vec<T>>) -> GrayImage
where
    T: Primitive + Into<f64>,
{
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &value in image.as_raw() {
        let v: f64 = value.into();
        if v.is_finite() {
            min = min.min(v);
            max = max.max(v);
        }
    }
    let span = max - min;

    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let v: f64 = image.get_pixel(x, y)[0].into();
        if span > 0.0 && v.is_finite() {
            Luma([((v - min) / span * 255.0).round() as u8])
        } else {
            Luma([0])
        }
    })
}
