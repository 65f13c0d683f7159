//! Owned figure canvas for image grids
//!
//! A [`Figure`] is a `rows × cols` grid of [`Subplot`] cells addressed by
//! explicit `(row, col)` indices. Nothing is drawn until the figure is
//! rendered, so there is no global plotting state involved. Rendering goes
//! through `plotters`: a bitmap backend for raster output and an SVG backend
//! for vector output, both drawing the same titled cells.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest canvas edge, in pixels, that a figure may be rendered at.
pub const MAX_CANVAS_EDGE: u32 = 1 << 15;

/// Colors and text size used when a figure is rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureStyle {
    pub background: [u8; 3],
    /// Color of titles and of the frame around cells with a visible axis
    pub frame_color: [u8; 3],
    /// Title size in points
    pub title_font_size: f32,
}

impl Default for FigureStyle {
    fn default() -> Self {
        Self {
            background: [255, 255, 255],
            frame_color: [0, 0, 0],
            title_font_size: 12.0,
        }
    }
}

impl FigureStyle {
    fn background_color(&self) -> RGBColor {
        let [r, g, b] = self.background;
        RGBColor(r, g, b)
    }

    fn frame_color(&self) -> RGBColor {
        let [r, g, b] = self.frame_color;
        RGBColor(r, g, b)
    }
}

/// One cell of a figure grid.
#[derive(Debug, Clone)]
pub struct Subplot {
    row: usize,
    col: usize,
    title: Option<String>,
    axis_visible: bool,
    image: Option<RgbaImage>,
}

impl Subplot {
    fn new(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            title: None,
            axis_visible: true,
            image: None,
        }
    }

    pub fn position(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn axis_visible(&self) -> bool {
        self.axis_visible
    }

    pub fn image(&self) -> Option<&RgbaImage> {
        self.image.as_ref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn set_axis_off(&mut self) {
        self.axis_visible = false;
    }

    pub fn set_axis_on(&mut self) {
        self.axis_visible = true;
    }

    /// Place pixel data in this cell, replacing any previous image.
    pub fn imshow(&mut self, image: RgbaImage) {
        self.image = Some(image);
    }
}

#[derive(Debug, Clone)]
pub struct Figure {
    rows: usize,
    cols: usize,
    size: f32,
    style: FigureStyle,
    cells: Vec<Subplot>,
}

impl Figure {
    /// Create an empty `rows × cols` figure where each cell is `size` inches square.
    ///
    /// Fails when the grid is empty or when the canvas would exceed
    /// [`MAX_CANVAS_EDGE`] pixels even at one pixel per inch.
    pub fn new(rows: usize, cols: usize, size: f32) -> crate::Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(anyhow::anyhow!(
                "Figure grid must have at least one cell, got {}x{}",
                rows,
                cols
            ));
        }
        if !(size.is_finite() && size > 0.0) {
            return Err(anyhow::anyhow!("Figure size must be positive, got {}", size));
        }

        let longest_edge = size * rows.max(cols) as f32;
        if longest_edge > MAX_CANVAS_EDGE as f32 {
            return Err(anyhow::anyhow!(
                "Figure of {}x{} cells of {} inches is too large to render",
                rows,
                cols,
                size
            ));
        }

        let count = rows
            .checked_mul(cols)
            .ok_or_else(|| anyhow::anyhow!("Figure grid {}x{} is too large", rows, cols))?;
        let cells = (0..count)
            .map(|i| Subplot::new(i / cols, i % cols))
            .collect();

        Ok(Self {
            rows,
            cols,
            size,
            style: FigureStyle::default(),
            cells,
        })
    }

    pub fn with_style(mut self, style: FigureStyle) -> Self {
        self.style = style;
        self
    }

    pub fn style(&self) -> &FigureStyle {
        &self.style
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Total canvas size in inches as `(width, height)`.
    pub fn figsize(&self) -> (f32, f32) {
        (self.size * self.cols as f32, self.size * self.rows as f32)
    }

    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Subplot> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get(row * self.cols + col)
    }

    pub fn subplot_mut(&mut self, row: usize, col: usize) -> Option<&mut Subplot> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get_mut(row * self.cols + col)
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> &[Subplot] {
        &self.cells
    }

    /// Canvas size in pixels at the given dpi.
    pub fn pixel_size(&self, dpi: f32) -> crate::Result<(u32, u32)> {
        if !(dpi.is_finite() && dpi > 0.0) {
            return Err(anyhow::anyhow!("Dpi must be positive, got {}", dpi));
        }

        let cell = (self.size * dpi).round().max(1.0);
        if cell > MAX_CANVAS_EDGE as f32 {
            return Err(anyhow::anyhow!(
                "Cells of {} inches at {} dpi exceed {} pixels",
                self.size,
                dpi,
                MAX_CANVAS_EDGE
            ));
        }
        let cell = cell as u32;

        let edge = |count: usize| {
            u32::try_from(count)
                .ok()
                .and_then(|count| cell.checked_mul(count))
                .filter(|&pixels| pixels <= MAX_CANVAS_EDGE)
        };

        match (edge(self.cols), edge(self.rows)) {
            (Some(width), Some(height)) => Ok((width, height)),
            _ => Err(anyhow::anyhow!(
                "A {}x{} grid of {} pixel cells exceeds {} pixels",
                self.rows,
                self.cols,
                cell,
                MAX_CANVAS_EDGE
            )),
        }
    }

    fn title_font_px(&self, dpi: f32) -> f64 {
        f64::from(self.style.title_font_size * dpi / 72.0)
    }

    /// Draw every cell onto `root`, which must span the whole canvas.
    ///
    /// Titled cells get a caption above the image; images are scaled to fit
    /// the rest of the cell, preserving aspect ratio, and centered.
    fn draw_on<DB>(&self, root: &DrawingArea<DB, Shift>, dpi: f32) -> crate::Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let font_px = self.title_font_px(dpi);
        let frame = self.style.frame_color();
        let untitled_band = (font_px * 1.5).round() as i32;

        root.fill(&self.style.background_color())?;

        for (area, subplot) in root.split_evenly((self.rows, self.cols)).iter().zip(&self.cells) {
            let area = match &subplot.title {
                Some(title) => area.titled(title, ("sans-serif", font_px).into_font().color(&frame))?,
                None => area.margin(untitled_band, 0, 0, 0),
            };
            let (area_w, area_h) = area.dim_in_pixel();
            if area_w == 0 || area_h == 0 {
                continue;
            }

            if let Some(image) = &subplot.image {
                let (fit_w, fit_h) = fit_within(image.dimensions(), (area_w, area_h));
                let pixels = self.flatten(image, (fit_w, fit_h));
                let x = ((area_w - fit_w) / 2) as i32;
                let y = ((area_h - fit_h) / 2) as i32;
                let bitmap: BitMapElement<(i32, i32)> =
                    BitMapElement::with_owned_buffer((x, y), (fit_w, fit_h), pixels.into_raw())
                        .ok_or_else(|| {
                            anyhow::anyhow!("Bitmap buffer does not match {}x{}", fit_w, fit_h)
                        })?;
                area.draw(&bitmap)?;
            }

            if subplot.axis_visible {
                area.draw(&Rectangle::new(
                    [(0, 0), (area_w as i32 - 1, area_h as i32 - 1)],
                    frame.stroke_width(1),
                ))?;
            }
        }

        Ok(())
    }

    /// Scale an image and composite it over the background as RGB.
    fn flatten(&self, image: &RgbaImage, (width, height): (u32, u32)) -> RgbImage {
        let scaled = imageops::resize(image, width, height, FilterType::Triangle);
        let [r, g, b] = self.style.background;
        let mut flat = RgbaImage::from_pixel(width, height, Rgba([r, g, b, 255]));
        imageops::overlay(&mut flat, &scaled, 0, 0);
        image::DynamicImage::ImageRgba8(flat).to_rgb8()
    }

    /// Render the figure, titles included, into an RGB raster.
    pub fn render(&self, dpi: f32) -> crate::Result<RgbImage> {
        let (width, height) = self.pixel_size(dpi)?;
        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            self.draw_on(&root, dpi)?;
            root.present()?;
        }

        RgbImage::from_raw(width, height, buffer)
            .ok_or_else(|| anyhow::anyhow!("Rendered buffer does not match {}x{}", width, height))
    }

    /// Render the figure as an SVG document; cell images are embedded as PNG.
    pub fn to_svg(&self, dpi: f32) -> crate::Result<String> {
        let size = self.pixel_size(dpi)?;
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
            self.draw_on(&root, dpi)?;
            root.present()?;
        }
        Ok(svg)
    }

    /// Write the figure to disk: SVG for a `.svg` extension, otherwise a raster
    /// image in the format implied by the extension.
    pub fn save<P: AsRef<Path>>(&self, path: P, dpi: f32) -> crate::Result<()> {
        let path = path.as_ref();
        let is_svg = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));

        if is_svg {
            std::fs::write(path, self.to_svg(dpi)?)?;
        } else {
            self.render(dpi)?.save(path)?;
        }

        tracing::info!(path = %path.display(), rows = self.rows, cols = self.cols, "Saved figure");
        Ok(())
    }
}

/// Largest size with the source aspect ratio that fits inside `bounds`.
fn fit_within((width, height): (u32, u32), (max_w, max_h): (u32, u32)) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (1, 1);
    }
    let scale = (max_w as f32 / width as f32).min(max_h as f32 / height as f32);
    let fit_w = ((width as f32 * scale).round() as u32).clamp(1, max_w);
    let fit_h = ((height as f32 * scale).round() as u32).clamp(1, max_h);
    (fit_w, fit_h)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba(color))
    }

    fn single_cell(title: Option<&str>) -> Figure {
        let mut figure = Figure::new(1, 1, 1.0).unwrap();
        let cell = figure.subplot_mut(0, 0).unwrap();
        cell.imshow(solid(8, 8, [0, 128, 0, 255]));
        cell.set_axis_off();
        if let Some(title) = title {
            cell.set_title(title);
        }
        figure
    }

    #[test]
    fn test_figure_geometry() {
        let figure = Figure::new(2, 3, 3.0).unwrap();
        assert_eq!(figure.shape(), (2, 3));
        assert_eq!(figure.capacity(), 6);
        assert_eq!(figure.figsize(), (9.0, 6.0));
        assert_eq!(figure.pixel_size(100.0).unwrap(), (900, 600));
    }

    #[test]
    fn test_cells_are_row_major() {
        let figure = Figure::new(2, 2, 1.0).unwrap();
        let positions: Vec<_> = figure.cells().iter().map(Subplot::position).collect();
        assert_eq!(positions, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
        assert!(figure.cell(2, 0).is_none());
        assert!(figure.cell(0, 2).is_none());
    }

    #[test]
    fn test_empty_grid_rejected() {
        assert!(Figure::new(0, 3, 3.0).is_err());
        assert!(Figure::new(1, 1, 0.0).is_err());
    }

    #[test]
    fn test_oversized_figure_rejected() {
        assert!(Figure::new(1, 3, 2.0e7).is_err());

        let figure = Figure::new(1, 3, 3.0).unwrap();
        assert!(figure.pixel_size(1.0e6).is_err());
        assert!(figure.pixel_size(f32::NAN).is_err());
        assert!(figure.render(1.0e6).is_err());
        assert!(figure.to_svg(0.0).is_err());
    }

    #[test]
    fn test_render_places_image_in_cell() {
        let mut figure = Figure::new(1, 2, 1.0).unwrap();
        let cell = figure.subplot_mut(0, 1).unwrap();
        cell.imshow(solid(10, 10, [255, 0, 0, 255]));
        cell.set_axis_off();

        let canvas = figure.render(100.0).unwrap();
        assert_eq!(canvas.dimensions(), (200, 100));
        // Center of the second cell is red, the first cell stays background.
        assert_eq!(canvas.get_pixel(150, 60).0, [255, 0, 0]);
        assert_eq!(canvas.get_pixel(50, 60).0, [255, 255, 255]);
        // The empty first cell still has its frame.
        assert_ne!(canvas.get_pixel(0, 60).0, [255, 255, 255]);
    }

    #[test]
    fn test_raster_draws_titles() {
        let titled = single_cell(Some("a clearly visible title")).render(100.0).unwrap();
        let untitled = single_cell(None).render(100.0).unwrap();

        assert_eq!(titled.dimensions(), untitled.dimensions());
        assert_ne!(titled, untitled);
        // Title pixels are drawn in the frame color somewhere in the top band.
        let band_has_ink = (0..100).any(|x| (0..15).any(|y| titled.get_pixel(x, y).0 != [255, 255, 255]));
        assert!(band_has_ink);
    }

    #[test]
    fn test_svg_contains_titles_and_images() {
        let svg = single_cell(Some("cats & dogs")).to_svg(100.0).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("cats &amp; dogs"));
        assert_eq!(svg.matches("<image").count(), 1);
    }

    #[test]
    fn test_fit_within_preserves_aspect() {
        assert_eq!(fit_within((200, 100), (100, 100)), (100, 50));
        assert_eq!(fit_within((50, 100), (100, 80)), (40, 80));
    }
}
