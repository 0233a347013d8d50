use image::{DynamicImage, GenericImageView, ImageFormat};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("frame is empty")]
    Empty,
    #[error("frame too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },
    #[error("unrecognized image format")]
    UnknownFormat,
    #[error("failed to decode frame: {0}")]
    Decode(#[from] image::ImageError),
}

impl FrameError {
    pub fn code(&self) -> &'static str {
        match self {
            FrameError::TooLarge { .. } => "FRAME_TOO_LARGE",
            _ => "DECODE_FAILED",
        }
    }
}

/// 已解码的一帧：保留原始编码字节（供感知服务上传）与像素缓冲
#[derive(Debug, Clone)]
pub struct DecodedFrame {
    encoded: Vec<u8>,
    format: ImageFormat,
    image: DynamicImage,
}

impl DecodedFrame {
    pub fn encoded(&self) -> &[u8] {
        &self.encoded
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

pub fn decode_frame(bytes: Vec<u8>, max_bytes: usize) -> Result<DecodedFrame, FrameError> {
    if bytes.is_empty() {
        return Err(FrameError::Empty);
    }
    if bytes.len() > max_bytes {
        return Err(FrameError::TooLarge {
            size: bytes.len(),
            max: max_bytes,
        });
    }

    let format = image::guess_format(&bytes).map_err(|_| FrameError::UnknownFormat)?;
    let image = image::load_from_memory_with_format(&bytes, format)?;

    Ok(DecodedFrame {
        encoded: bytes,
        format,
        image,
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::Cursor;

    use image::{ImageFormat, RgbImage};

    pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, image::Rgb([90, 120, 150]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).expect("encode png");
        out.into_inner()
    }
}
