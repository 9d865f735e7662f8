use anyhow::{Result, bail};
use image::{DynamicImage, ImageFormat};

/// Decodes fetched album art. JPEG and PNG cover what shows up in music
/// libraries in practice; anything else is reported and the notification
/// goes out without an image.
pub fn decode(data: &[u8]) -> Result<DynamicImage> {
    match image::guess_format(data)? {
        format @ (ImageFormat::Jpeg | ImageFormat::Png) => {
            Ok(image::load_from_memory_with_format(data, format)?)
        }
        format => bail!("Unsupported album art format {format:?}"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Cursor;

    use image::{DynamicImage, ImageFormat, RgbaImage};

    use super::decode;

    fn encoded_rgba(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            image::Rgba([10, 20, 30, 255]),
        ));
        let mut buf = Cursor::new(Vec::new());
        image.write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    #[test]
    fn decodes_png() {
        let decoded = decode(&encoded_rgba(4, 3, ImageFormat::Png)).unwrap();

        let buffer = decoded.to_rgba8();
        assert_eq!(buffer.width(), 4);
        assert_eq!(buffer.height(), 3);
    }

    #[test]
    fn rejects_unsupported_formats() {
        let bmp = encoded_rgba(2, 2, ImageFormat::Bmp);

        assert!(decode(&bmp).is_err());
    }

    #[test]
    fn rejects_garbage() {
        assert!(decode(b"definitely not an image").is_err());
    }
}
