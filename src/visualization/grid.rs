use super::figure::{Figure, FigureStyle};
use crate::config::GridConfig;
use crate::data::{file_stem_label, load_image};
use std::path::Path;

/// A single item or an ordered list of items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OneOrMany<T> {
    Single(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Single(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            OneOrMany::Single(_) => 1,
            OneOrMany::Many(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(items: Vec<T>) -> Self {
        OneOrMany::Many(items)
    }
}

/// Options for [`show_images`].
#[derive(Debug, Clone, PartialEq)]
pub struct ShowOptions {
    /// Per-image titles; file stems are used when absent
    pub labels: Option<OneOrMany<String>>,
    /// Edge length of each cell in inches
    pub size: f32,
    pub rows: usize,
    pub style: FigureStyle,
}

impl Default for ShowOptions {
    fn default() -> Self {
        Self {
            labels: None,
            size: 3.0,
            rows: 1,
            style: FigureStyle::default(),
        }
    }
}

impl ShowOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &GridConfig) -> Self {
        Self {
            labels: None,
            size: config.size,
            rows: config.rows,
            style: config.style(),
        }
    }

    pub fn with_labels(mut self, labels: impl Into<OneOrMany<String>>) -> Self {
        self.labels = Some(labels.into());
        self
    }

    pub fn with_label(self, label: impl Into<String>) -> Self {
        self.with_labels(OneOrMany::Single(label.into()))
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_rows(mut self, rows: usize) -> Self {
        self.rows = rows;
        self
    }
}

/// Grid shape `(rows, cols)` for `count` images laid out over `rows` rows.
///
/// More rows than images leaves trailing cells empty.
pub fn grid_shape(count: usize, rows: usize) -> crate::Result<(usize, usize)> {
    if rows == 0 {
        return Err(anyhow::anyhow!("Grid must have at least one row"));
    }
    if count == 0 {
        return Err(anyhow::anyhow!("No images to show"));
    }
    Ok((rows, count.div_ceil(rows)))
}

/// Load images and arrange them into a titled grid figure.
///
/// Cells are filled in row-major order. Each filled cell has its axis hidden
/// and is titled with the label at the same index, or the file stem when no
/// labels are given.
#[tracing::instrument(level = "debug", skip_all, fields(rows = options.rows))]
pub fn show_images<P: AsRef<Path>>(
    im_paths: OneOrMany<P>,
    options: &ShowOptions,
) -> crate::Result<Figure> {
    let im_paths = im_paths.into_vec();
    let labels = options.labels.clone().map(OneOrMany::into_vec);

    let images = im_paths
        .iter()
        .map(load_image)
        .collect::<crate::Result<Vec<_>>>()?;

    let (rows, cols) = grid_shape(images.len(), options.rows)?;
    tracing::debug!(images = images.len(), rows, cols, "Computed grid shape");

    let mut figure = Figure::new(rows, cols, options.size)?.with_style(options.style.clone());
    let capacity = figure.capacity();

    for (i, (im_path, image)) in im_paths.iter().zip(images).enumerate() {
        let title = match &labels {
            Some(labels) => labels.get(i).cloned().ok_or_else(|| {
                anyhow::anyhow!("No label for image {}: only {} labels given", i, labels.len())
            })?,
            None => file_stem_label(im_path),
        };

        let subplot = figure.subplot_mut(i / cols, i % cols).ok_or_else(|| {
            anyhow::anyhow!("Image {} does not fit in a grid of {} cells", i, capacity)
        })?;
        subplot.set_title(title);
        subplot.set_axis_off();
        subplot.imshow(image);
    }

    Ok(figure)
}
