//! Shared utilities for the interactive collision viewer.

use std::hash::{Hash, Hasher};
use std::path::PathBuf;

use bsp_collide::{box_brush, Clip, ConfigFile, Plane3D, Polygon, Sphere, ValidationConfig};
use macroquad::models::{draw_mesh, Mesh, Vertex};
use macroquad::prelude::*;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

pub mod navigator;
pub use navigator::TreeNavigator;

/// Viewer settings, read from the `.ron` or `.toml` file given on the command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VizConfig {
    /// Radius of the player sphere.
    pub sphere_radius: f32,
    /// Movement speed in world units per second.
    pub move_speed: f32,
    /// Where the sphere starts.
    pub spawn: [f32; 3],
    /// Tree asset to load instead of the built-in demo level.
    pub level: Option<PathBuf>,
    /// Checks applied to a loaded level.
    pub validation: ValidationConfig,
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            sphere_radius: 0.5,
            move_speed: 3.0,
            spawn: [0.0, 2.0, 0.0],
            level: None,
            validation: ValidationConfig::default(),
        }
    }
}

impl ConfigFile for VizConfig {}

/// Built-in level: a floor slab, a crate and a taller pillar.
pub fn demo_level() -> Vec<Polygon> {
    let mut polygons = box_brush(Point3::new(0.0, -0.5, 0.0), Vector3::new(5.0, 0.5, 5.0));
    polygons.extend(box_brush(Point3::new(-2.0, 0.5, -1.0), Vector3::new(0.75, 0.5, 0.75)));
    polygons.extend(box_brush(Point3::new(2.0, 1.0, 1.5), Vector3::new(0.5, 1.0, 0.5)));
    polygons
}

/// Demo collision response: push the sphere out along each contact in turn.
///
/// Clips are all computed for the starting position, so a sphere wedged into a
/// corner can be pushed slightly further than necessary.
pub fn push_out(sphere: &Sphere, clips: &[Clip]) -> Sphere {
    let offset: Vector3<f32> = clips.iter().map(|clip| clip.normal * clip.depth).sum();
    sphere.with_center(sphere.center() + offset)
}

/// Generates a deterministic color from a polygon's vertices using hashing.
pub fn polygon_color(polygon: &Polygon) -> Color {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    for v in polygon.vertices() {
        v.x.to_bits().hash(&mut hasher);
        v.y.to_bits().hash(&mut hasher);
        v.z.to_bits().hash(&mut hasher);
    }
    let hash = hasher.finish();

    // Keep colors away from black
    let r = (((hash >> 16) & 0xFF) as u8).max(40);
    let g = (((hash >> 8) & 0xFF) as u8).max(40);
    let b = ((hash & 0xFF) as u8).max(40);

    Color::from_rgba(r, g, b, 255)
}

pub fn to_vec3(point: Point3<f32>) -> Vec3 {
    vec3(point.x, point.y, point.z)
}

/// Draws a single polygon by fan triangulation.
pub fn draw_polygon(polygon: &Polygon) {
    let verts = polygon.vertices();
    if verts.len() < 3 {
        return;
    }

    let color = polygon_color(polygon);
    let vertices: Vec<Vertex> = verts
        .iter()
        .map(|p| Vertex::new2(to_vec3(*p), vec2(0.0, 0.0), color))
        .collect();

    let mut indices: Vec<u16> = Vec::with_capacity((verts.len() - 2) * 3);
    for i in 1..verts.len() - 1 {
        indices.extend([0, i as u16, (i + 1) as u16]);
    }

    draw_mesh(&Mesh {
        vertices,
        indices,
        texture: None,
    });
}

/// Draws the player sphere, red while it penetrates anything.
pub fn draw_sphere_state(sphere: &Sphere, clips: &[Clip]) {
    let color = if clips.is_empty() { WHITE } else { RED };
    draw_sphere_wires(to_vec3(sphere.center()), sphere.radius(), None, color);
}

/// Draws each contact normal from the deepest point of the sphere along it.
pub fn draw_clips(sphere: &Sphere, clips: &[Clip]) {
    for clip in clips {
        let contact = sphere.center() - clip.normal * sphere.radius();
        let tip = contact + clip.normal * (clip.depth + 0.5);
        draw_line_3d(to_vec3(contact), to_vec3(tip), YELLOW);
    }
}

/// Draws a square patch of `plane` centered on the point nearest `around`.
pub fn draw_plane_patch(plane: &Plane3D, around: Point3<f32>, half_size: f32, color: Color) {
    let center = plane.project_point(around);
    let normal = plane.normal();
    let helper = if normal.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    let u = normal.cross(&helper).normalize() * half_size;
    let v = normal.cross(&u);

    let corners = [center + u + v, center - u + v, center - u - v, center + u - v];
    for i in 0..4 {
        draw_line_3d(to_vec3(corners[i]), to_vec3(corners[(i + 1) % 4]), color);
    }
    draw_line_3d(to_vec3(center), to_vec3(center + normal * 0.5), color);
}

/// Simple orbit camera that follows a target point.
pub struct OrbitCamera {
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub target: Vec3,
    /// Multiplier for scroll wheel zoom
    pub zoom_speed: f32,
    /// Minimum distance from target
    pub min_distance: f32,
    /// Maximum distance from target
    pub max_distance: f32,
}

impl OrbitCamera {
    pub fn new(distance: f32, yaw: f32, pitch: f32) -> Self {
        Self {
            distance,
            yaw,
            pitch,
            target: vec3(0.0, 0.0, 0.0),
            zoom_speed: 0.5,
            min_distance: 2.0,
            max_distance: 30.0,
        }
    }

    /// Updates camera state from mouse drag, scroll and arrow keys.
    pub fn update(&mut self) {
        if is_mouse_button_down(MouseButton::Left) {
            let delta = mouse_delta_position();
            self.yaw -= delta.x * 2.0;
            self.pitch -= delta.y * 2.0;
        }

        if is_key_down(KeyCode::Left) {
            self.yaw += 0.02;
        }
        if is_key_down(KeyCode::Right) {
            self.yaw -= 0.02;
        }
        if is_key_down(KeyCode::Up) {
            self.pitch += 0.02;
        }
        if is_key_down(KeyCode::Down) {
            self.pitch -= 0.02;
        }
        self.pitch = self.pitch.clamp(-1.5, 1.5);

        let scroll = mouse_wheel().1;
        self.distance = (self.distance - scroll * self.zoom_speed)
            .clamp(self.min_distance, self.max_distance);
    }

    /// Returns the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + vec3(x, y, z)
    }

    /// Horizontal forward and right directions for camera-relative movement.
    pub fn ground_axes(&self) -> (Vector3<f32>, Vector3<f32>) {
        let forward = Vector3::new(-self.yaw.sin(), 0.0, -self.yaw.cos());
        let right = Vector3::new(self.yaw.cos(), 0.0, -self.yaw.sin());
        (forward, right)
    }

    pub fn to_camera3d(&self) -> Camera3D {
        Camera3D {
            position: self.position(),
            up: vec3(0.0, 1.0, 0.0),
            target: self.target,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bsp_collide::BspTree;

    #[test]
    fn push_out_rests_sphere_on_surface() {
        let tree = BspTree::from_polygons(demo_level());
        let sunk = Sphere::new(Point3::new(0.0, 0.3, 0.0), 0.5);

        let clips = tree.clip_sphere(&sunk);
        assert_eq!(clips.len(), 1);

        let resolved = push_out(&sunk, &clips);
        assert!((resolved.center().y - 0.5).abs() < 1e-5);

        let lifted = resolved.with_center(resolved.center() + Vector3::new(0.0, 1e-3, 0.0));
        assert!(tree.clip_sphere(&lifted).is_empty());
    }

    #[test]
    fn push_out_without_clips_is_identity() {
        let sphere = Sphere::new(Point3::new(1.0, 2.0, 3.0), 0.5);
        assert_eq!(push_out(&sphere, &[]), sphere);
    }

    #[test]
    fn viz_config_defaults_fill_missing_fields() {
        let config: VizConfig =
            bsp_collide::config::Format::Ron.parse("(sphere_radius: 1.5)").unwrap();
        assert_eq!(config.sphere_radius, 1.5);
        assert_eq!(config.move_speed, VizConfig::default().move_speed);
        assert!(config.level.is_none());
    }

    #[test]
    fn ground_axes_are_orthogonal() {
        let camera = OrbitCamera::new(5.0, 0.7, 0.3);
        let (forward, right) = camera.ground_axes();
        assert!(forward.dot(&right).abs() < 1e-6);
        assert!((forward.norm() - 1.0).abs() < 1e-6);
    }
}
