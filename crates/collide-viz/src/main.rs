use std::path::PathBuf;

use bsp_collide::{clip_sphere_into, BspTree, Clip, ConfigFile, Sphere};
use collide_viz::{
    demo_level, draw_clips, draw_polygon, draw_sphere_state, push_out, OrbitCamera, TreeNavigator,
    VizConfig,
};
use macroquad::prelude::*;
use nalgebra::{Point3, Vector3};

#[macroquad::main("BSP Sphere Clipping")]
async fn main() {
    env_logger::init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = match VizConfig::load_or_default(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load viewer config: {}", e);
            return;
        }
    };

    // Brushes are only available for the built-in level.
    let (tree, brushes) = match &config.level {
        Some(path) => match BspTree::load(path, &config.validation) {
            Ok(tree) => (tree, Vec::new()),
            Err(e) => {
                log::error!("Failed to load level {}: {}", path.display(), e);
                return;
            }
        },
        None => {
            let brushes = demo_level();
            (BspTree::from_polygons(brushes.clone()), brushes)
        }
    };
    log::info!("Collision tree: {} nodes, depth {}", tree.len(), tree.depth());

    let mut sphere = Sphere::new(Point3::from(config.spawn), config.sphere_radius);
    let mut clips: Vec<Clip> = Vec::with_capacity(tree.len());
    let mut resolve = true;

    let mut camera = OrbitCamera::new(8.0, 0.6, 0.5);
    let mut navigator = TreeNavigator::new();

    loop {
        camera.update();
        navigator.update(&tree);
        if is_key_pressed(KeyCode::Space) {
            resolve = !resolve;
        }

        let (forward, right) = camera.ground_axes();
        let mut motion = Vector3::zeros();
        if is_key_down(KeyCode::W) {
            motion += forward;
        }
        if is_key_down(KeyCode::S) {
            motion -= forward;
        }
        if is_key_down(KeyCode::D) {
            motion += right;
        }
        if is_key_down(KeyCode::A) {
            motion -= right;
        }
        if is_key_down(KeyCode::E) {
            motion += Vector3::y();
        }
        if is_key_down(KeyCode::Q) {
            motion -= Vector3::y();
        }
        sphere = sphere.with_center(sphere.center() + motion * config.move_speed * get_frame_time());

        clips.clear();
        clip_sphere_into(&tree, &sphere, &mut clips);
        if resolve && !clips.is_empty() {
            sphere = push_out(&sphere, &clips);
        }

        clear_background(Color::from_rgba(20, 20, 30, 255));
        camera.target = collide_viz::to_vec3(sphere.center());
        set_camera(&camera.to_camera3d());

        for brush in &brushes {
            draw_polygon(brush);
        }
        draw_sphere_state(&sphere, &clips);
        draw_clips(&sphere, &clips);
        navigator.render(&tree, &sphere);

        set_default_camera();

        draw_text(
            &format!("Nodes: {} | Depth: {} | Clips: {}", tree.len(), tree.depth(), clips.len()),
            10.0,
            25.0,
            20.0,
            WHITE,
        );
        draw_text(
            &format!(
                "Response: {} (Space to toggle)",
                if resolve { "push out" } else { "off" }
            ),
            10.0,
            45.0,
            18.0,
            GRAY,
        );

        navigator.draw_ui(&tree, &sphere, 70.0);

        draw_text(
            "WASD/QE move sphere, drag or arrows to orbit, scroll to zoom",
            10.0,
            175.0,
            16.0,
            DARKGRAY,
        );
        draw_text(&format!("FPS: {}", get_fps()), 10.0, 195.0, 16.0, DARKGRAY);

        next_frame().await
    }
}
