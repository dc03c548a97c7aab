/// Tests for Node and Light

use super::*;
use crate::uniform::{UniformValue, Uniforms};

#[test]
fn test_group_has_no_capabilities() {
    let node = Node::group("g");
    assert!(node.capabilities().is_empty());
    assert!(node.material().is_none());
    assert!(node.camera_data().is_none());
}

#[test]
fn test_camera_nodes_use_inverted_look_at() {
    let node = Node::camera("cam", Camera::perspective(1.0, 1.0, 0.1, 10.0));
    assert!(node.has(Capabilities::CAMERA));
    assert_eq!(node.transform.look_at_mode(), LookAtMode::Inverted);
    assert_eq!(Node::group("g").transform.look_at_mode(), LookAtMode::Direct);
}

#[test]
fn test_light_uniform_fields() {
    let light = Light::point(Vec3::new(1.0, 0.5, 0.0), 3.0, 20.0);
    let mut transform = Transform::default().with_position(Vec3::new(0.0, 4.0, 0.0));
    transform.update(None);

    let fields = light.uniform_fields(&transform);
    assert!(fields.contains(&Uniform::float("intensity", 3.0)));
    assert!(fields.contains(&Uniform::float("range", 20.0)));
    assert!(fields.contains(&Uniform::vec3("position", Vec3::new(0.0, 4.0, 0.0))));
}

#[test]
fn test_unlit_fields_overwrite_every_light_field() {
    let light = Light::spot(Vec3::ONE, 5.0, 8.0, 0.4, 0.2);
    let mut uniforms = Uniforms::from_list(vec![Uniform::struct_array(
        "lights",
        vec![light.uniform_fields(&Transform::default())],
    )]);

    uniforms.set_value("lights", UniformValue::StructArray(vec![Light::unlit_fields()]));

    let Some(UniformValue::StructArray(items)) = uniforms.value("lights") else {
        panic!("expected struct array");
    };
    assert_eq!(items.len(), 1);
    assert_eq!(items[0], Light::unlit_fields());
    assert!(items[0].contains(&Uniform::float("intensity", 0.0)));
}

#[test]
fn test_shadow_settings_only_on_shadow_lights() {
    let mut light = Light::directional(Vec3::ONE, 1.0);
    assert!(light.shadow_mut().is_none());
    let mut light = light.with_shadow(ShadowSettings::default()).unwrap();
    light.shadow_mut().unwrap().map_size = 2048;
    assert_eq!(light.shadow().unwrap().map_size, 2048);
}
