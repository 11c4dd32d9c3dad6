use std::io::Cursor;

use anyhow::Context as _;

use crate::foundation::error::UndulateResult;

/// Rasterize an SVG document into PNG bytes over a white background.
///
/// Text is laid out with the fonts installed on the system.
#[tracing::instrument(level = "debug", skip(svg), fields(bytes = svg.len()))]
pub fn svg_to_png(svg: &str) -> UndulateResult<Vec<u8>> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    let tree = usvg::Tree::from_str(svg, &opt).context("parse svg")?;

    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("cannot allocate a {size:?} pixmap"))?;
    pixmap.fill(resvg::tiny_skia::Color::WHITE);
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap.as_mut());

    let rgba: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    let img = image::RgbaImage::from_raw(size.width(), size.height(), rgba)
        .context("pixmap size mismatch")?;

    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .context("encode png")?;
    tracing::debug!(width = size.width(), height = size.height(), "rasterized");
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
