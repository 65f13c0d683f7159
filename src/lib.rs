//! Small helpers for computer-vision notebooks and demos: base64-encode image
//! files, read image dimensions without decoding pixels, and lay images out in
//! a labelled grid figure.

pub mod config;
pub mod data;
pub mod encoding;
pub mod logging;
pub mod visualization;

pub use data::{height, width, width_height, ImageInput};
pub use encoding::{encode_image, encode_images};
pub use visualization::{show_images, Figure, OneOrMany, ShowOptions};

pub type Result<T> = anyhow::Result<T>;
