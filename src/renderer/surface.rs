use anyhow::Result;
use tiny_skia::{Paint, PathBuilder, Pixmap, Stroke, StrokeDash, Transform};

use crate::coordinates::Coordinate;
use crate::renderer::utils::parse_color;

/// Something the journey overlay can be drawn onto. Points are given in
/// image space, which is also the surface's logical pixel space.
pub trait Surface {
    fn logical_size(&self) -> (u32, u32);

    fn clear(&mut self);

    fn stroke_dashed_polyline(
        &mut self,
        points: &[Coordinate],
        color: &str,
        line_width: f32,
        dash: &[f32],
    ) -> Result<()>;
}

/// A raster surface backed by a tiny-skia pixmap that is `supersample` times
/// larger than its logical size.
pub struct PixmapSurface {
    width: u32,
    height: u32,
    supersample: u32,
    pixmap: Pixmap,
}

impl PixmapSurface {
    pub fn new(width: u32, height: u32, supersample: u32) -> Result<Self> {
        let supersample = supersample.max(1);
        let pixmap = Self::allocate(width, height, supersample)?;
        Ok(Self {
            width,
            height,
            supersample,
            pixmap,
        })
    }

    fn allocate(width: u32, height: u32, supersample: u32) -> Result<Pixmap> {
        // tiny-skia refuses zero sized pixmaps
        let w = width.max(1).saturating_mul(supersample);
        let h = height.max(1).saturating_mul(supersample);
        Pixmap::new(w, h).ok_or_else(|| anyhow!("cannot allocate {}x{} pixmap", w, h))
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        if (width, height) == (self.width, self.height) {
            return Ok(());
        }
        self.pixmap = Self::allocate(width, height, self.supersample)?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    pub fn supersample(&self) -> u32 {
        self.supersample
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn to_png(&self) -> Result<Vec<u8>> {
        Ok(self.pixmap.encode_png()?)
    }
}

impl Surface for PixmapSurface {
    fn logical_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    fn stroke_dashed_polyline(
        &mut self,
        points: &[Coordinate],
        color: &str,
        line_width: f32,
        dash: &[f32],
    ) -> Result<()> {
        let (first, rest) = match points.split_first() {
            Some((first, rest)) if !rest.is_empty() => (first, rest),
            _ => return Ok(()),
        };

        let mut builder = PathBuilder::new();
        builder.move_to(first.x as f32, first.y as f32);
        for point in rest {
            builder.line_to(point.x as f32, point.y as f32);
        }
        let path = builder
            .finish()
            .ok_or_else(|| anyhow!("degenerate polyline"))?;

        let mut paint = Paint::default();
        paint.set_color(parse_color(color)?);
        paint.anti_alias = true;

        let stroke = Stroke {
            width: line_width,
            dash: StrokeDash::new(dash.to_vec(), 0.0),
            ..Stroke::default()
        };

        let scale = self.supersample as f32;
        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::from_scale(scale, scale), None);
        Ok(())
    }
}
