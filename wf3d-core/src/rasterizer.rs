/// Wireframe rasterizer drawing mesh edges into a packed RGBA buffer
use crate::camera::Camera;
use crate::geometry::Model;
use crate::vector::{Vec2, Vec3, Vec4};

/// Owns a `width * height` color buffer of packed RGBA pixels (red in the
/// most significant byte), row-major with row 0 at the top of the image.
///
/// Each [`Rasterizer::render`] call clears the buffer and draws the edges
/// of every triangle in the model through the camera's view and projection
/// transforms. No frustum clipping is performed before the perspective
/// divide, so geometry behind or straddling the near plane may project
/// incorrectly.
pub struct Rasterizer {
    width: i32,
    height: i32,
    colorbuffer: Vec<u32>,
}

impl Rasterizer {
    pub fn new(width: i32, height: i32) -> Result<Self, String> {
        validate_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            colorbuffer: vec![0; (width * height) as usize],
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// The finished frame, row-major top-to-bottom, length `width * height`
    pub fn colorbuffer(&self) -> &[u32] {
        &self.colorbuffer
    }

    /// Reallocates the buffer for the new dimensions; subsequent renders
    /// use the new size
    pub fn resize(&mut self, width: i32, height: i32) -> Result<(), String> {
        validate_dimensions(width, height)?;
        self.width = width;
        self.height = height;
        self.colorbuffer = vec![0; (width * height) as usize];
        Ok(())
    }

    /// Writes one pixel. Out-of-bounds coordinates are a programming error,
    /// checked only in debug builds.
    pub fn set_color(&mut self, x: i32, y: i32, color: Vec4) {
        debug_assert!(x >= 0 && x < self.width);
        debug_assert!(y >= 0 && y < self.height);
        let index = (y * self.width + x) as usize;
        self.colorbuffer[index] = pack_color(color);
    }

    /// Clears the buffer, then draws the three edges of every vertex triple
    /// in every mesh with the mesh material's diffuse color
    pub fn render(&mut self, camera: &Camera, model: &Model) {
        let view = camera.view_matrix();
        let projection = camera.projection_matrix();

        self.colorbuffer.fill(0);

        for mesh in &model.meshes {
            let color = mesh.material.diffuse.extend(1.0);

            for triangle in mesh.vertices.chunks_exact(3) {
                let clip0 = triangle[0].position.extend(1.0) * view * projection;
                let clip1 = triangle[1].position.extend(1.0) * view * projection;
                let clip2 = triangle[2].position.extend(1.0) * view * projection;

                let screen0 = self.to_screen(clip0.xyz() / clip0.w());
                let screen1 = self.to_screen(clip1.xyz() / clip1.w());
                let screen2 = self.to_screen(clip2.xyz() / clip2.w());

                self.draw_line(screen0, screen1, color);
                self.draw_line(screen1, screen2, color);
                self.draw_line(screen2, screen0, color);
            }
        }
    }

    /// Maps NDC x/y from [-1, 1] to pixel coordinates, flipping y so that
    /// NDC up is towards row 0
    fn to_screen(&self, ndc: Vec3) -> Vec2 {
        Vec2::new(
            (ndc.x() + 1.0) / 2.0 * (self.width - 1) as f32,
            (1.0 - (ndc.y() + 1.0) / 2.0) * (self.height - 1) as f32,
        )
    }

    /// Bresenham line rasterization. Pixels outside the buffer are silently
    /// skipped; coordinates run in i64 so far off-screen endpoints from
    /// unclipped geometry cannot overflow the error terms.
    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Vec4) {
        let mut x0 = from.x().round() as i64;
        let mut y0 = from.y().round() as i64;
        let x1 = to.x().round() as i64;
        let y1 = to.y().round() as i64;

        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx - dy;

        loop {
            if x0 >= 0 && x0 < self.width as i64 && y0 >= 0 && y0 < self.height as i64 {
                self.set_color(x0 as i32, y0 as i32, color);
            }
            if x0 == x1 && y0 == y1 {
                break;
            }
            let err2 = err * 2;
            if err2 > -dy {
                err -= dy;
                x0 += sx;
            }
            if err2 < dx {
                err += dx;
                y0 += sy;
            }
        }
    }
}

fn validate_dimensions(width: i32, height: i32) -> Result<(), String> {
    if width <= 0 || height <= 0 {
        return Err("Rasterizer width and height must be positive and non-zero".to_string());
    }
    Ok(())
}

/// Packs a [0, 1] RGBA color as R<<24 | G<<16 | B<<8 | A, rounding each
/// channel to a byte. Channels outside [0, 1] are clamped.
fn pack_color(color: Vec4) -> u32 {
    let channel = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u32;
    channel(color.r()) << 24 | channel(color.g()) << 16 | channel(color.b()) << 8 | channel(color.a())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Material, Mesh, Model, Vertex};
    use crate::vector::{Vec2, Vec3};

    fn test_camera() -> Camera {
        Camera::new(Vec3::new(0.0, 0.0, 5.0), 60.0, 4.0 / 3.0, 0.1, 100.0).unwrap()
    }

    fn triangle_model(diffuse: Vec3) -> Model {
        let positions = [
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let vertices = positions
            .iter()
            .map(|&p| Vertex::new(p, Vec3::new(0.0, 0.0, 1.0), Vec2::zero()))
            .collect();
        Model::from(Mesh::new(vertices, Material::new("flat", diffuse)))
    }

    fn drawn_pixels(rasterizer: &Rasterizer) -> Vec<(i32, i32)> {
        let width = rasterizer.width();
        rasterizer
            .colorbuffer()
            .iter()
            .enumerate()
            .filter(|(_, &pixel)| pixel != 0)
            .map(|(i, _)| (i as i32 % width, i as i32 / width))
            .collect()
    }

    fn drawn_near(rasterizer: &Rasterizer, x: i32, y: i32) -> bool {
        drawn_pixels(rasterizer)
            .iter()
            .any(|&(px, py)| (px - x).abs() <= 2 && (py - y).abs() <= 2)
    }

    #[test]
    fn test_new_validates_dimensions() {
        assert!(Rasterizer::new(0, 600).is_err());
        assert!(Rasterizer::new(800, 0).is_err());
        assert!(Rasterizer::new(-800, 600).is_err());
        assert!(Rasterizer::new(800, 600).is_ok());
    }

    #[test]
    fn test_empty_model_leaves_buffer_cleared() {
        let mut rasterizer = Rasterizer::new(64, 48).unwrap();
        rasterizer.render(&test_camera(), &Model::default());
        assert!(rasterizer.colorbuffer().iter().all(|&pixel| pixel == 0));
        assert_eq!(rasterizer.colorbuffer().len(), 64 * 48);
    }

    #[test]
    fn test_render_clears_previous_frame() {
        let mut rasterizer = Rasterizer::new(200, 150).unwrap();
        let camera = test_camera();
        rasterizer.render(&camera, &triangle_model(Vec3::new(1.0, 1.0, 1.0)));
        assert!(!drawn_pixels(&rasterizer).is_empty());

        rasterizer.render(&camera, &Model::default());
        assert!(drawn_pixels(&rasterizer).is_empty());
    }

    #[test]
    fn test_centered_triangle_outline() {
        let mut rasterizer = Rasterizer::new(800, 600).unwrap();
        rasterizer.render(&test_camera(), &triangle_model(Vec3::new(1.0, 1.0, 1.0)));

        let drawn = drawn_pixels(&rasterizer);

        // Three edges of a triangle spanning roughly x in [296, 503],
        // y in [196, 403] for this camera; every drawn pixel stays inside
        // that box and the three corners are hit.
        assert!(drawn.len() > 300);
        for &(x, y) in &drawn {
            assert!((290..=510).contains(&x), "pixel ({x}, {y}) outside outline bounds");
            assert!((190..=410).contains(&y), "pixel ({x}, {y}) outside outline bounds");
        }
        assert!(drawn_near(&rasterizer, 400, 196));
        assert!(drawn_near(&rasterizer, 296, 403));
        assert!(drawn_near(&rasterizer, 503, 403));

        // Drawn pixels carry the packed material color.
        let first = drawn[0];
        let pixel = rasterizer.colorbuffer()[(first.1 * 800 + first.0) as usize];
        assert_eq!(pixel, 0xFFFF_FFFF);
    }

    #[test]
    fn test_diffuse_color_is_packed_rgba() {
        let mut rasterizer = Rasterizer::new(100, 100).unwrap();
        rasterizer.render(&test_camera(), &triangle_model(Vec3::new(1.0, 0.0, 0.5)));

        let drawn = drawn_pixels(&rasterizer);
        assert!(!drawn.is_empty());
        let pixel = rasterizer.colorbuffer()[(drawn[0].1 * 100 + drawn[0].0) as usize];
        assert_eq!(pixel, 0xFF00_80FF);
    }

    #[test]
    fn test_set_color_packs_channels() {
        let mut rasterizer = Rasterizer::new(4, 4).unwrap();
        rasterizer.set_color(1, 2, Vec4::new(0.0, 1.0, 0.0, 1.0));
        assert_eq!(rasterizer.colorbuffer()[2 * 4 + 1], 0x00FF_00FF);

        // Out-of-range channels clamp instead of bleeding into neighbors.
        rasterizer.set_color(0, 0, Vec4::new(2.0, -1.0, 0.5, 1.0));
        assert_eq!(rasterizer.colorbuffer()[0], 0xFF00_80FF);
    }

    #[test]
    fn test_resize_drops_old_frame_and_bounds() {
        let mut rasterizer = Rasterizer::new(800, 600).unwrap();
        let camera = test_camera();
        rasterizer.render(&camera, &triangle_model(Vec3::new(1.0, 1.0, 1.0)));

        rasterizer.resize(400, 300).unwrap();
        assert_eq!(rasterizer.colorbuffer().len(), 400 * 300);
        assert!(rasterizer.colorbuffer().iter().all(|&pixel| pixel == 0));

        rasterizer.render(&camera, &triangle_model(Vec3::new(1.0, 1.0, 1.0)));
        assert_eq!(rasterizer.colorbuffer().len(), 400 * 300);
        assert!(!drawn_pixels(&rasterizer).is_empty());
    }

    #[test]
    fn test_resize_validates_dimensions() {
        let mut rasterizer = Rasterizer::new(10, 10).unwrap();
        assert!(rasterizer.resize(0, 10).is_err());
        assert!(rasterizer.resize(10, -1).is_err());
        // Failed resize leaves the rasterizer usable at its old size.
        assert_eq!(rasterizer.colorbuffer().len(), 100);
    }

    #[test]
    fn test_offscreen_geometry_is_skipped_not_fatal() {
        let mut rasterizer = Rasterizer::new(80, 60).unwrap();
        // Far off to the side: projects outside the buffer, draws nothing.
        let positions = [
            Vec3::new(100.0, 0.0, 0.0),
            Vec3::new(102.0, 0.0, 0.0),
            Vec3::new(101.0, 2.0, 0.0),
        ];
        let vertices = positions
            .iter()
            .map(|&p| Vertex::new(p, Vec3::zero(), Vec2::zero()))
            .collect();
        let model = Model::from(Mesh::new(vertices, Material::default()));

        rasterizer.render(&test_camera(), &model);
        assert!(drawn_pixels(&rasterizer).is_empty());
    }

    #[test]
    fn test_zero_area_triangle_draws_degenerate_line() {
        let mut rasterizer = Rasterizer::new(100, 100).unwrap();
        let p = Vec3::new(0.0, 0.0, 0.0);
        let vertices = vec![
            Vertex::new(p, Vec3::zero(), Vec2::zero());
            3
        ];
        let model = Model::from(Mesh::new(vertices, Material::default()));

        // All three corners collapse to one pixel; still not an error.
        rasterizer.render(&test_camera(), &model);
        assert_eq!(drawn_pixels(&rasterizer).len(), 1);
    }
}
