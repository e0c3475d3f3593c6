use crate::edit::{AffineTransform, ColorFilter};
use crate::image::{SourceImage, apply_color_filter};
use crate::util::safe_usize_to_f32;
use egui::epaint::Vertex;
use egui::{Color32, ColorImage, Context, Mesh, Painter, Pos2, Rect, Shape, TextureHandle, TextureOptions, Vec2, pos2};
use image::RgbaImage;
use std::sync::Arc;

/// Surface that shows the live preview of the edit.
pub trait PreviewSurface {
    /// A new source finished decoding and replaces the previous one.
    fn attach(&mut self, source: &SourceImage);

    /// Show the source through the given descriptors.
    fn present(&mut self, filter: &ColorFilter, transform: &AffineTransform);
}

/// egui-backed preview: the colour filter is baked into a texture, the
/// geometry is applied when painting the textured quad.
pub struct PreviewRenderer {
    ctx: Context,
    source: Option<Arc<RgbaImage>>,
    size: Option<[usize; 2]>,
    texture: Option<TextureHandle>,
    baked_filter: Option<ColorFilter>,
    transform: AffineTransform,
}

impl PreviewRenderer {
    pub fn new(ctx: &Context) -> Self {
        Self {
            ctx: ctx.clone(),
            source: None,
            size: None,
            texture: None,
            baked_filter: None,
            transform: AffineTransform::default(),
        }
    }

    #[cfg(test)]
    pub const fn transform(&self) -> AffineTransform {
        self.transform
    }

    /// Filter currently baked into the texture, if any.
    #[cfg(test)]
    pub const fn baked_filter(&self) -> Option<ColorFilter> {
        self.baked_filter
    }

    /// Baked preview pixel in unmultiplied RGBA, recomputed from the source.
    #[cfg(test)]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let (source, filter) = (self.source.as_ref()?, self.baked_filter?);
        if x >= source.width() || y >= source.height() {
            return None;
        }
        let mut rgba = source.get_pixel(x, y).0;
        apply_color_filter(filter, &mut rgba);
        Some(rgba)
    }

    fn bake(&mut self, filter: ColorFilter) {
        let Some(source) = self.source.as_ref() else {
            return;
        };
        let mut rgba = source.as_raw().clone();
        apply_color_filter(filter, &mut rgba);
        let size = [source.width() as usize, source.height() as usize];
        let pixels = ColorImage::from_rgba_unmultiplied(size, &rgba);
        match self.texture.as_mut() {
            Some(texture) => texture.set(pixels, TextureOptions::LINEAR),
            None => {
                self.texture = Some(self.ctx.load_texture("preview_image", pixels, TextureOptions::LINEAR));
            }
        }
        self.size = Some(size);
        self.baked_filter = Some(filter);
    }

    /// Untransformed image rect, centred in `available`, scaled so the
    /// transformed footprint fits.
    pub fn fitted_rect(&self, available: Rect) -> Option<Rect> {
        fit_rect(self.size?, self.transform, available)
    }

    /// Screen footprint of the transformed image inside `available`.
    pub fn footprint(&self, available: Rect) -> Option<Rect> {
        let rect = self.fitted_rect(available)?;
        Some(Rect::from_points(&quad(rect, self.transform)))
    }

    /// Paint the transformed, filtered image into `available`.
    pub fn paint(&self, painter: &Painter, available: Rect) {
        let (Some(texture), Some(rect)) = (self.texture.as_ref(), self.fitted_rect(available)) else {
            return;
        };
        let corners = quad(rect, self.transform);
        let uvs = [pos2(0.0, 0.0), pos2(1.0, 0.0), pos2(1.0, 1.0), pos2(0.0, 1.0)];
        let mut mesh = Mesh::with_texture(texture.id());
        for (pos, uv) in corners.into_iter().zip(uvs) {
            mesh.vertices.push(Vertex {
                pos,
                uv,
                color: Color32::WHITE,
            });
        }
        mesh.add_triangle(0, 1, 2);
        mesh.add_triangle(0, 2, 3);
        painter.add(Shape::mesh(mesh));
    }
}

impl PreviewSurface for PreviewRenderer {
    fn attach(&mut self, source: &SourceImage) {
        self.source = Some(source.shared_pixels());
        self.baked_filter = None;
        tracing::debug!(
            width = source.natural_width(),
            height = source.natural_height(),
            "preview attached"
        );
    }

    fn present(&mut self, filter: &ColorFilter, transform: &AffineTransform) {
        self.transform = *transform;
        if self.baked_filter != Some(*filter) {
            self.bake(*filter);
        }
    }
}

/// Scale `size` so its footprint under `transform` fits `available`, centred.
pub fn fit_rect(size: [usize; 2], transform: AffineTransform, available: Rect) -> Option<Rect> {
    let [w, h] = size.map(safe_usize_to_f32);
    if w <= 0.0 || h <= 0.0 || available.width() <= 0.0 || available.height() <= 0.0 {
        return None;
    }
    let (box_w, box_h) = if transform.swaps_axes() { (h, w) } else { (w, h) };
    let scale = (available.width() / box_w).min(available.height() / box_h);
    Some(Rect::from_center_size(
        available.center(),
        Vec2::new(w * scale, h * scale),
    ))
}

/// Corners of `rect` (TL, TR, BR, BL) mapped through `transform` around its centre.
pub fn quad(rect: Rect, transform: AffineTransform) -> [Pos2; 4] {
    let center = rect.center();
    [
        rect.left_top(),
        rect.right_top(),
        rect.right_bottom(),
        rect.left_bottom(),
    ]
    .map(|corner| {
        let rel = corner - center;
        let (x, y) = transform.apply(rel.x, rel.y);
        center + Vec2::new(x, y)
    })
}
