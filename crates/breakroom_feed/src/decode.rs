use encoding_rs::UTF_8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("image data is empty")]
    EmptyData,
    #[error("failed to decode image: {0}")]
    DecodeFailed(String),
}

/// Decode a response body as UTF-8 and join its lines with no terminators.
///
/// `\n`, `\r\n` and a lone `\r` all end a line. Malformed sequences become
/// U+FFFD and a leading byte-order mark is dropped.
pub fn decode_body_text(bytes: &[u8]) -> String {
    let (text, _had_errors) = UTF_8.decode_with_bom_removal(bytes);
    text.split(&['\r', '\n'][..]).collect()
}

/// Turns encoded image bytes into pixels.
pub trait ImageDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, DecodeError>;
}

/// Decoder backed by the `image` crate; the format is sniffed from magic bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageCrateDecoder;

impl ImageDecoder for ImageCrateDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
        if bytes.is_empty() {
            return Err(DecodeError::EmptyData);
        }
        let img = image::load_from_memory(bytes)
            .map_err(|err| DecodeError::DecodeFailed(err.to_string()))?;
        let rgba = img.to_rgba8();
        Ok(DecodedImage {
            width: rgba.width(),
            height: rgba.height(),
            rgba: rgba.into_raw(),
        })
    }
}
