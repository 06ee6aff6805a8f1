//! The drawing surface: accumulated SVG elements plus rasterization.

use coursegen_render::RenderContext;

/// Largest pixmap dimension we will allocate.
const MAX_DIM: u32 = 16_384;

/// Rectangular drawing region in pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

/// One document's drawing surface.
///
/// Components accumulate SVG elements in draw order; the surface is
/// flattened to pixels exactly once, at persistence time.
pub struct Surface {
    width: u32,
    height: u32,
    background: String,
    padding: f64,
    elements: String,
    /// Per-pass store: axis domains, legend entries, series counters.
    pub context: RenderContext,
}

impl Surface {
    /// Open a fresh surface.
    #[must_use]
    pub fn new(width: u32, height: u32, background: &str, padding: f64) -> Self {
        Self {
            width,
            height,
            background: background.to_owned(),
            padding,
            elements: String::new(),
            context: RenderContext::new(),
        }
    }

    /// Surface width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Surface height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Append one SVG element.
    pub fn push_element(&mut self, svg: &str) {
        self.elements.push_str(svg);
        self.elements.push('\n');
    }

    /// The padded region data plots draw into.
    #[must_use]
    pub fn plot_area(&self) -> Rect {
        Rect {
            x: self.padding,
            y: self.padding,
            width: f64::from(self.width) - 2.0 * self.padding,
            height: f64::from(self.height) - 2.0 * self.padding,
        }
    }

    /// Map a data point through the axis domain stored in the context,
    /// if an `Axis` component published one.
    #[must_use]
    pub fn map_point(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let x_min = self.context.get_f64("axis.x_min")?;
        let x_max = self.context.get_f64("axis.x_max")?;
        let y_min = self.context.get_f64("axis.y_min")?;
        let y_max = self.context.get_f64("axis.y_max")?;
        Some(self.map_with_domain(x, y, (x_min, x_max), (y_min, y_max)))
    }

    /// Map a data point through an explicit domain.
    #[must_use]
    pub fn map_with_domain(
        &self,
        x: f64,
        y: f64,
        (x_min, x_max): (f64, f64),
        (y_min, y_max): (f64, f64),
    ) -> (f64, f64) {
        let area = self.plot_area();
        let x_span = (x_max - x_min).abs().max(f64::EPSILON);
        let y_span = (y_max - y_min).abs().max(f64::EPSILON);
        let px = area.x + (x - x_min) / x_span * area.width;
        let py = area.y + area.height - (y - y_min) / y_span * area.height;
        (px, py)
    }

    /// Assemble the complete SVG document.
    #[must_use]
    pub fn to_svg(&self) -> String {
        format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" "#,
                r#"viewBox="0 0 {w} {h}" font-family="sans-serif">"#,
                "\n",
                r#"<rect x="0" y="0" width="{w}" height="{h}" fill="{bg}"/>"#,
                "\n{elements}</svg>\n"
            ),
            w = self.width,
            h = self.height,
            bg = self.background,
            elements = self.elements,
        )
    }

    /// Flatten the surface to PNG bytes.
    ///
    /// Happens exactly once per document, when the backend persists.
    pub fn rasterize(&self) -> Result<Vec<u8>, String> {
        if self.width == 0 || self.height == 0 || self.width > MAX_DIM || self.height > MAX_DIM {
            return Err(format!(
                "surface size {}x{} out of range (max {MAX_DIM})",
                self.width, self.height
            ));
        }

        let mut options = usvg::Options::default();
        options.fontdb_mut().load_system_fonts();
        let tree = usvg::Tree::from_str(&self.to_svg(), &options)
            .map_err(|err| format!("invalid surface svg: {err}"))?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(self.width, self.height)
            .ok_or_else(|| "failed to allocate pixmap".to_owned())?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::identity(),
            &mut pixmap.as_mut(),
        );

        pixmap
            .encode_png()
            .map_err(|err| format!("png encoding failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn surface() -> Surface {
        Surface::new(800, 480, "#ffffff", 60.0)
    }

    #[test]
    fn test_plot_area_respects_padding() {
        let area = surface().plot_area();
        assert_eq!(
            area,
            Rect {
                x: 60.0,
                y: 60.0,
                width: 680.0,
                height: 360.0
            }
        );
    }

    #[test]
    fn test_map_point_needs_domain() {
        let mut surface = surface();
        assert_eq!(surface.map_point(1.0, 1.0), None);

        surface.context.set("axis.x_min", 0.0);
        surface.context.set("axis.x_max", 10.0);
        surface.context.set("axis.y_min", 0.0);
        surface.context.set("axis.y_max", 100.0);

        // Domain origin maps to the bottom-left corner of the plot area.
        let (px, py) = surface.map_point(0.0, 0.0).unwrap();
        assert!((px - 60.0).abs() < 1e-9);
        assert!((py - 420.0).abs() < 1e-9);

        // Domain maximum maps to the top-right corner.
        let (px, py) = surface.map_point(10.0, 100.0).unwrap();
        assert!((px - 740.0).abs() < 1e-9);
        assert!((py - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_svg_document_shape() {
        let mut surface = surface();
        surface.push_element(r##"<circle cx="10" cy="10" r="4" fill="#d62728"/>"##);
        let svg = surface.to_svg();

        assert!(svg.starts_with("<svg xmlns="));
        assert!(svg.contains(r##"fill="#ffffff""##));
        assert!(svg.contains("<circle"));
        assert!(svg.ends_with("</svg>\n"));
    }

    #[test]
    fn test_rasterize_produces_png() {
        let mut surface = Surface::new(64, 48, "#ffffff", 8.0);
        surface.push_element(r##"<rect x="4" y="4" width="20" height="10" fill="#1f77b4"/>"##);
        let png = surface.rasterize().unwrap();

        // PNG magic bytes.
        assert!(png.starts_with(&[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n']));
    }

    #[test]
    fn test_rasterize_rejects_zero_size() {
        let surface = Surface::new(0, 48, "#ffffff", 0.0);
        assert!(surface.rasterize().is_err());
    }
}
