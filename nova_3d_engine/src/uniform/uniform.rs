/// Uniform entry and its recursively typed value

use std::fmt;
use std::sync::Arc;
use glam::{Mat4, Vec2, Vec3, Vec4};
use crate::graphics_device::Texture;

/// Type tag of a uniform entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformType {
    Float,
    Vector2,
    Vector3,
    Vector4,
    Matrix4,
    Color,
    Texture,
    CubeMap,
    Struct,
    StructArray,
}

/// A uniform value
///
/// Struct values are lists of named sub-uniforms; struct arrays are lists of
/// such lists. Texture values are nullable: a `None` texture is bound as the
/// device's neutral texture at draw time.
#[derive(Clone)]
pub enum UniformValue {
    Float(f32),
    Vector2(Vec2),
    Vector3(Vec3),
    Vector4(Vec4),
    Matrix4(Mat4),
    /// Linear RGBA
    Color(Vec4),
    Texture(Option<Arc<dyn Texture>>),
    CubeMap(Option<Arc<dyn Texture>>),
    Struct(Vec<Uniform>),
    StructArray(Vec<Vec<Uniform>>),
}

impl UniformValue {
    /// Type tag of this value
    pub fn uniform_type(&self) -> UniformType {
        match self {
            UniformValue::Float(_) => UniformType::Float,
            UniformValue::Vector2(_) => UniformType::Vector2,
            UniformValue::Vector3(_) => UniformType::Vector3,
            UniformValue::Vector4(_) => UniformType::Vector4,
            UniformValue::Matrix4(_) => UniformType::Matrix4,
            UniformValue::Color(_) => UniformType::Color,
            UniformValue::Texture(_) => UniformType::Texture,
            UniformValue::CubeMap(_) => UniformType::CubeMap,
            UniformValue::Struct(_) => UniformType::Struct,
            UniformValue::StructArray(_) => UniformType::StructArray,
        }
    }

    /// Whether this value is sampled through a texture unit
    pub fn is_texture(&self) -> bool {
        matches!(self, UniformValue::Texture(_) | UniformValue::CubeMap(_))
    }

    /// Whether this value is a composite (Struct or StructArray)
    pub fn is_composite(&self) -> bool {
        matches!(self, UniformValue::Struct(_) | UniformValue::StructArray(_))
    }
}

fn texture_id(texture: &Option<Arc<dyn Texture>>) -> Option<u64> {
    texture.as_ref().map(|t| t.id())
}

impl PartialEq for UniformValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (UniformValue::Float(a), UniformValue::Float(b)) => a == b,
            (UniformValue::Vector2(a), UniformValue::Vector2(b)) => a == b,
            (UniformValue::Vector3(a), UniformValue::Vector3(b)) => a == b,
            (UniformValue::Vector4(a), UniformValue::Vector4(b)) => a == b,
            (UniformValue::Matrix4(a), UniformValue::Matrix4(b)) => a == b,
            (UniformValue::Color(a), UniformValue::Color(b)) => a == b,
            (UniformValue::Texture(a), UniformValue::Texture(b)) => texture_id(a) == texture_id(b),
            (UniformValue::CubeMap(a), UniformValue::CubeMap(b)) => texture_id(a) == texture_id(b),
            (UniformValue::Struct(a), UniformValue::Struct(b)) => a == b,
            (UniformValue::StructArray(a), UniformValue::StructArray(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for UniformValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniformValue::Float(v) => write!(f, "Float({})", v),
            UniformValue::Vector2(v) => write!(f, "Vector2({:?})", v),
            UniformValue::Vector3(v) => write!(f, "Vector3({:?})", v),
            UniformValue::Vector4(v) => write!(f, "Vector4({:?})", v),
            UniformValue::Matrix4(v) => write!(f, "Matrix4({:?})", v),
            UniformValue::Color(v) => write!(f, "Color({:?})", v),
            UniformValue::Texture(t) => write!(f, "Texture({:?})", texture_id(t)),
            UniformValue::CubeMap(t) => write!(f, "CubeMap({:?})", texture_id(t)),
            UniformValue::Struct(fields) => f.debug_tuple("Struct").field(fields).finish(),
            UniformValue::StructArray(items) => f.debug_tuple("StructArray").field(items).finish(),
        }
    }
}

/// A named uniform entry
#[derive(Debug, Clone, PartialEq)]
pub struct Uniform {
    pub name: String,
    pub value: UniformValue,
}

impl Uniform {
    pub fn new(name: &str, value: UniformValue) -> Self {
        Self { name: name.to_string(), value }
    }

    pub fn float(name: &str, value: f32) -> Self {
        Self::new(name, UniformValue::Float(value))
    }

    pub fn vec2(name: &str, value: Vec2) -> Self {
        Self::new(name, UniformValue::Vector2(value))
    }

    pub fn vec3(name: &str, value: Vec3) -> Self {
        Self::new(name, UniformValue::Vector3(value))
    }

    pub fn vec4(name: &str, value: Vec4) -> Self {
        Self::new(name, UniformValue::Vector4(value))
    }

    pub fn mat4(name: &str, value: Mat4) -> Self {
        Self::new(name, UniformValue::Matrix4(value))
    }

    pub fn color(name: &str, rgba: Vec4) -> Self {
        Self::new(name, UniformValue::Color(rgba))
    }

    pub fn texture(name: &str, texture: Option<Arc<dyn Texture>>) -> Self {
        Self::new(name, UniformValue::Texture(texture))
    }

    pub fn cube_map(name: &str, texture: Option<Arc<dyn Texture>>) -> Self {
        Self::new(name, UniformValue::CubeMap(texture))
    }

    pub fn structure(name: &str, fields: Vec<Uniform>) -> Self {
        Self::new(name, UniformValue::Struct(fields))
    }

    pub fn struct_array(name: &str, items: Vec<Vec<Uniform>>) -> Self {
        Self::new(name, UniformValue::StructArray(items))
    }

    /// Type tag of this entry
    pub fn uniform_type(&self) -> UniformType {
        self.value.uniform_type()
    }
}
