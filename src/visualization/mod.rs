pub mod figure;
pub mod grid;

pub use figure::{Figure, FigureStyle, Subplot};
pub use grid::{grid_shape, show_images, OneOrMany, ShowOptions};
