use image::{ImageReader, RgbaImage};
use std::path::Path;

/// Fully decode an image into RGBA pixels, sniffing the format from its content.
pub fn load_image<P: AsRef<Path>>(path: P) -> crate::Result<RgbaImage> {
    let img = ImageReader::open(path.as_ref())?
        .with_guessed_format()?
        .decode()?;
    Ok(img.to_rgba8())
}

/// File name without its extension, used as the default image title.
pub fn file_stem_label<P: AsRef<Path>>(path: P) -> String {
    path.as_ref()
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
