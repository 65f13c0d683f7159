use image::ImageReader;
use ndarray::{ArrayBase, Data, Dimension};
use std::path::{Path, PathBuf};

/// Something whose width and height can be queried.
///
/// A pixel array is described by its shape in array order (rows, columns, ...),
/// so `PixelArray(&[50, 100, 3])` is an image 100 pixels wide and 50 tall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageInput<'a> {
    FilePath(&'a Path),
    PixelArray(&'a [usize]),
}

impl<'a> From<&'a Path> for ImageInput<'a> {
    fn from(path: &'a Path) -> Self {
        ImageInput::FilePath(path)
    }
}

impl<'a> From<&'a PathBuf> for ImageInput<'a> {
    fn from(path: &'a PathBuf) -> Self {
        ImageInput::FilePath(path.as_path())
    }
}

impl<'a> From<&'a str> for ImageInput<'a> {
    fn from(path: &'a str) -> Self {
        ImageInput::FilePath(Path::new(path))
    }
}

impl<'a> From<&'a [usize]> for ImageInput<'a> {
    fn from(shape: &'a [usize]) -> Self {
        ImageInput::PixelArray(shape)
    }
}

impl<'a, S, D> From<&'a ArrayBase<S, D>> for ImageInput<'a>
where
    S: Data,
    D: Dimension,
{
    fn from(array: &'a ArrayBase<S, D>) -> Self {
        ImageInput::PixelArray(array.shape())
    }
}

/// Returns `(width, height)` of an image file or pixel array.
///
/// For files only the header is parsed; the format is sniffed from the content.
pub fn width_height<'a, I: Into<ImageInput<'a>>>(input: I) -> crate::Result<(u32, u32)> {
    match input.into() {
        ImageInput::FilePath(path) => {
            let dims = ImageReader::open(path)?
                .with_guessed_format()?
                .into_dimensions()?;
            tracing::trace!(path = %path.display(), width = dims.0, height = dims.1, "Read image header");
            Ok(dims)
        }
        ImageInput::PixelArray(shape) => {
            if shape.len() < 2 {
                return Err(anyhow::anyhow!(
                    "Pixel array must have at least 2 axes, got shape {:?}",
                    shape
                ));
            }
            Ok((u32::try_from(shape[1])?, u32::try_from(shape[0])?))
        }
    }
}

pub fn width<'a, I: Into<ImageInput<'a>>>(input: I) -> crate::Result<u32> {
    Ok(width_height(input)?.0)
}

pub fn height<'a, I: Into<ImageInput<'a>>>(input: I) -> crate::Result<u32> {
    Ok(width_height(input)?.1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use ndarray::{Array2, Array3};
    use tempfile::TempDir;

    #[test]
    fn test_file_dimensions() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wide.png");
        RgbImage::from_pixel(100, 50, Rgb([10, 20, 30])).save(&path).unwrap();

        assert_eq!(width_height(&path).unwrap(), (100, 50));
        assert_eq!(width(&path).unwrap(), 100);
        assert_eq!(height(&path).unwrap(), 50);
    }

    #[test]
    fn test_format_sniffed_from_content() {
        let dir = TempDir::new().unwrap();
        let png = dir.path().join("image.png");
        RgbImage::new(7, 3).save(&png).unwrap();
        let renamed = dir.path().join("image.data");
        std::fs::rename(&png, &renamed).unwrap();

        assert_eq!(width_height(&renamed).unwrap(), (7, 3));
    }

    #[test]
    fn test_array_axes_are_swapped() {
        let array = Array3::<u8>::zeros((50, 100, 3));
        assert_eq!(width_height(&array).unwrap(), (100, 50));

        let gray = Array2::<f32>::zeros((4, 9));
        assert_eq!(width(&gray).unwrap(), 9);
        assert_eq!(height(&gray).unwrap(), 4);
    }

    #[test]
    fn test_one_dimensional_array_rejected() {
        let shape: &[usize] = &[12];
        assert!(width_height(shape).is_err());
    }

    #[test]
    fn test_non_image_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"definitely not pixels").unwrap();

        let err = width_height(&path).unwrap_err();
        assert!(err.downcast_ref::<image::ImageError>().is_some());
    }

    #[test]
    fn test_missing_file() {
        let err = width_height("does/not/exist.png").unwrap_err();
        assert!(err.downcast_ref::<std::io::Error>().is_some());
    }
}
