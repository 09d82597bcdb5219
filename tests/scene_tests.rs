//! Scene Integration Tests
//!
//! Tests for:
//! - Scene: create/remove nodes, attach hierarchy, name lookup
//! - Transform: dirty tracking and world matrix propagation
//! - Mesh components and morph target influences
//! - Camera, lights and environment data

use glam::{Quat, Vec3};
use marionette::scene::{
    Camera, Fog, Light, LightKind, Mesh, MorphTargets, Node, Scene, Transform, color_from_hex,
};

const EPSILON: f32 = 1e-5;

fn approx_vec(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < EPSILON
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(ToString::to_string).collect()
}

// ============================================================================
// Node Creation & Removal
// ============================================================================

#[test]
fn add_node_registers_root() {
    let mut scene = Scene::new();
    let handle = scene.add_node(Node::new("Root"));

    assert!(scene.root_nodes.contains(&handle));
    assert_eq!(scene.get_name(handle), Some("Root"));
}

#[test]
fn created_node_is_detached() {
    let mut scene = Scene::new();
    let handle = scene.create_node_with_name("Loose");

    assert!(!scene.root_nodes.contains(&handle));
    assert_eq!(scene.get_node(handle).and_then(Node::parent), None);
}

#[test]
fn attach_moves_root_under_parent() {
    let mut scene = Scene::new();
    let parent = scene.add_node(Node::new("Parent"));
    let child = scene.add_node(Node::new("Child"));

    scene.attach(child, parent);

    assert!(!scene.root_nodes.contains(&child));
    assert_eq!(scene.get_node(child).and_then(Node::parent), Some(parent));
    assert_eq!(scene.get_node(parent).unwrap().children(), [child]);
}

#[test]
fn reattach_detaches_from_old_parent() {
    let mut scene = Scene::new();
    let a = scene.add_node(Node::new("A"));
    let b = scene.add_node(Node::new("B"));
    let child = scene.create_node_with_name("Child");

    scene.attach(child, a);
    scene.attach(child, b);

    assert!(scene.get_node(a).unwrap().children().is_empty());
    assert_eq!(scene.get_node(b).unwrap().children(), [child]);
}

#[test]
fn attach_to_self_is_ignored() {
    let mut scene = Scene::new();
    let node = scene.add_node(Node::new("Solo"));
    scene.attach(node, node);

    assert!(scene.root_nodes.contains(&node));
    assert!(scene.get_node(node).unwrap().children().is_empty());
}

#[test]
fn remove_node_removes_subtree_and_meshes() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("Root"));
    let arm = scene.create_node_with_name("Arm");
    let hand = scene.create_node_with_name("Hand");
    scene.attach(arm, root);
    scene.attach(hand, arm);
    let mesh = scene.add_mesh(Mesh::new("HandMesh"));
    scene.set_node_mesh(hand, mesh);

    scene.remove_node(arm);

    assert!(scene.get_node(arm).is_none());
    assert!(scene.get_node(hand).is_none());
    assert!(scene.meshes.get(mesh).is_none());
    assert!(scene.get_node(root).unwrap().children().is_empty());
    assert!(scene.get_node(root).is_some());
}

#[test]
fn remove_root_drops_it_from_roots() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("Root"));
    scene.remove_node(root);

    assert!(scene.root_nodes.is_empty());
    assert!(scene.nodes.is_empty());
}

// ============================================================================
// Queries
// ============================================================================

#[test]
fn collect_subtree_is_depth_first_preorder() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("Root"));
    let a = scene.create_node_with_name("A");
    let a1 = scene.create_node_with_name("A1");
    let b = scene.create_node_with_name("B");
    scene.attach(a, root);
    scene.attach(a1, a);
    scene.attach(b, root);

    assert_eq!(scene.collect_subtree(root), vec![root, a, a1, b]);
}

#[test]
fn find_node_by_name_stays_under_root() {
    let mut scene = Scene::new();
    let first = scene.add_node(Node::new("First"));
    let second = scene.add_node(Node::new("Second"));
    let head = scene.create_node_with_name("Head_4");
    scene.attach(head, second);

    assert_eq!(scene.find_node_by_name(second, "Head_4"), Some(head));
    assert_eq!(scene.find_node_by_name(first, "Head_4"), None);
    assert_eq!(scene.find_node_by_name(second, "Second"), Some(second));
}

#[test]
fn morph_meshes_skips_meshes_without_targets() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("Root"));
    let face = scene.create_node_with_name("Face");
    let body = scene.create_node_with_name("Body");
    scene.attach(face, root);
    scene.attach(body, root);

    let face_mesh = scene.add_mesh(
        Mesh::new("FaceMesh").with_morph_targets(MorphTargets::new(1, &names(&["Smile"]), None)),
    );
    let body_mesh = scene.add_mesh(Mesh::new("BodyMesh"));
    scene.set_node_mesh(face, face_mesh);
    scene.set_node_mesh(body, body_mesh);

    assert_eq!(scene.morph_meshes(root), vec![(face, face_mesh)]);
    assert_eq!(scene.mesh_of(body), Some(body_mesh));
}

// ============================================================================
// Transforms
// ============================================================================

#[test]
fn world_matrix_composes_parent_transform() {
    let mut scene = Scene::new();
    let parent = scene.add_node(Node::new("Parent"));
    let child = scene.create_node_with_name("Child");
    scene.attach(child, parent);

    {
        let p = scene.get_node_mut(parent).unwrap();
        p.transform.position = Vec3::new(10.0, 0.0, 0.0);
        p.transform.scale = Vec3::splat(2.0);
    }
    scene.get_node_mut(child).unwrap().transform.position = Vec3::new(1.0, 0.0, 0.0);
    scene.update_matrix_world();

    let world = scene.get_node(child).unwrap().world_matrix();
    assert!(approx_vec(world.translation.into(), Vec3::new(12.0, 0.0, 0.0)));
}

#[test]
fn parent_change_propagates_to_children() {
    let mut scene = Scene::new();
    let parent = scene.add_node(Node::new("Parent"));
    let child = scene.create_node_with_name("Child");
    scene.attach(child, parent);
    scene.update_matrix_world();

    scene.get_node_mut(parent).unwrap().transform.rotation =
        Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
    scene.get_node_mut(child).unwrap().transform.position = Vec3::new(0.0, 0.0, 1.0);
    scene.update_matrix_world();

    let world = scene.get_node(child).unwrap().world_matrix();
    assert!(approx_vec(world.translation.into(), Vec3::new(1.0, 0.0, 0.0)));
}

#[test]
fn update_subtree_uses_parent_world() {
    let mut scene = Scene::new();
    let parent = scene.add_node(Node::new("Parent"));
    let child = scene.create_node_with_name("Child");
    scene.attach(child, parent);
    scene.get_node_mut(parent).unwrap().transform.position = Vec3::Y;
    scene.update_matrix_world();

    scene.get_node_mut(child).unwrap().transform.position = Vec3::X;
    scene.update_subtree(child);

    let world = scene.get_node(child).unwrap().world_matrix();
    assert!(approx_vec(world.translation.into(), Vec3::new(1.0, 1.0, 0.0)));
}

#[test]
fn transform_tracks_changes() {
    let mut transform = Transform::new();
    assert!(transform.update_local_matrix(), "first update always rebuilds");
    assert!(!transform.update_local_matrix());

    transform.position = Vec3::X;
    assert!(transform.update_local_matrix());
    assert!(!transform.update_local_matrix());

    transform.mark_dirty();
    assert!(transform.update_local_matrix());
}

#[test]
fn transform_euler_round_trip() {
    let mut transform = Transform::new();
    transform.set_rotation_euler(0.1, 0.2, 0.3);
    assert!(approx_vec(transform.rotation_euler(), Vec3::new(0.1, 0.2, 0.3)));
}

#[test]
fn transform_look_at_faces_target() {
    let mut transform = Transform::from_trs(Vec3::ZERO, Quat::IDENTITY, Vec3::ONE);
    transform.look_at(Vec3::new(5.0, 0.0, 0.0), Vec3::Y);

    let forward = transform.rotation * Vec3::NEG_Z;
    assert!(approx_vec(forward, Vec3::X), "forward {forward}");
}

// ============================================================================
// Morph Targets
// ============================================================================

#[test]
fn morph_targets_fill_missing_names_and_clamp_defaults() {
    let targets = MorphTargets::new(3, &names(&["Angry"]), Some([2.0, -1.0].as_slice()));

    assert_eq!(targets.names(), ["Angry", "target_1", "target_2"]);
    assert_eq!(targets.influences(), [1.0, 0.0, 0.0]);
    assert_eq!(targets.index_of("target_2"), Some(2));
}

#[test]
fn morph_set_clamps_and_rejects_out_of_range() {
    let mut targets = MorphTargets::new(2, &names(&["A", "B"]), None);

    assert_eq!(targets.set(0, 1.7), Some(1.0));
    assert_eq!(targets.set(1, -0.5), Some(0.0));
    assert_eq!(targets.set(1, f32::NAN), Some(0.0));
    assert_eq!(targets.set(2, 0.5), None);
    assert_eq!(targets.get(0), Some(1.0));
}

#[test]
fn morph_count_is_capped() {
    let targets = MorphTargets::new(100, &[], None);
    assert_eq!(targets.len(), marionette::scene::MAX_MORPH_TARGETS);
}

// ============================================================================
// Camera, Lights, Environment
// ============================================================================

#[test]
fn camera_stores_fov_in_radians() {
    let camera = Camera::new_perspective(45.0, 1.5, 0.25, 100.0);
    assert!((camera.fov_degrees() - 45.0).abs() < 1e-3);
    assert!((camera.fov - std::f32::consts::FRAC_PI_4).abs() < EPSILON);
}

#[test]
fn camera_aspect_ignores_zero_height() {
    let mut camera = Camera::new_perspective(50.0, 1.0, 0.1, 1000.0);
    camera.set_aspect_from_size(1920, 1080);
    assert!((camera.aspect - 1920.0 / 1080.0).abs() < EPSILON);

    camera.set_aspect_from_size(800, 0);
    assert!((camera.aspect - 1920.0 / 1080.0).abs() < EPSILON);
}

#[test]
fn camera_view_matrix_looks_at_target() {
    let mut camera = Camera::new_perspective(50.0, 1.0, 0.1, 1000.0);
    camera.set_position(Vec3::new(0.0, 2.0, 5.0));
    camera.look_at(Vec3::new(0.0, 2.0, 0.0));

    let target_in_view = camera.view_matrix().transform_point3(Vec3::new(0.0, 2.0, 0.0));
    assert!(approx_vec(target_in_view, Vec3::new(0.0, 0.0, -5.0)));
}

#[test]
fn color_from_hex_splits_channels() {
    assert!(approx_vec(color_from_hex(0xff8000), Vec3::new(1.0, 128.0 / 255.0, 0.0)));
    assert!(approx_vec(color_from_hex(0x000000), Vec3::ZERO));
}

#[test]
fn directional_light_points_at_origin() {
    let light = Light::new_directional(Vec3::ONE, 3.0).with_position(Vec3::new(0.0, 20.0, 0.0));
    assert!(approx_vec(light.direction(), Vec3::NEG_Y));
    assert_eq!(light.kind, LightKind::Directional);
}

#[test]
fn hemisphere_light_keeps_ground_color() {
    let ground = color_from_hex(0x8d8d8d);
    let light = Light::new_hemisphere(Vec3::ONE, ground, 3.0);
    assert_eq!(light.kind, LightKind::Hemisphere { ground_color: ground });
}

#[test]
fn add_light_stores_it() {
    let mut scene = Scene::new();
    let key = scene.add_light(Light::new_ambient(Vec3::ONE, 0.4));
    assert!((scene.lights[key].intensity - 0.4).abs() < EPSILON);
}

#[test]
fn fog_factor_is_linear_between_near_and_far() {
    let fog = Fog {
        color: Vec3::ONE,
        near: 20.0,
        far: 100.0,
    };

    assert!(fog.factor(10.0).abs() < EPSILON);
    assert!((fog.factor(60.0) - 0.5).abs() < EPSILON);
    assert!((fog.factor(500.0) - 1.0).abs() < EPSILON);
}
