/// Primitive and blend kinds used by draw calls.
///
/// Both kinds arrive as names from material and geometry data; parsing an
/// unknown name is a configuration error, never a silent fallback.

use std::fmt;
use std::str::FromStr;
use crate::error::Error;
use crate::engine_err;
use crate::graphics_device::{
    PrimitiveTopology, DepthState, BlendState, CompareOp,
};

/// Kind of primitive assembled from the vertex stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Points,
    Lines,
    LineStrip,
    LineLoop,
    Triangles,
    TriangleStrip,
    TriangleFan,
}

impl PrimitiveKind {
    /// Concrete device topology
    pub fn topology(self) -> PrimitiveTopology {
        match self {
            PrimitiveKind::Points => PrimitiveTopology::PointList,
            PrimitiveKind::Lines => PrimitiveTopology::LineList,
            PrimitiveKind::LineStrip => PrimitiveTopology::LineStrip,
            PrimitiveKind::LineLoop => PrimitiveTopology::LineLoop,
            PrimitiveKind::Triangles => PrimitiveTopology::TriangleList,
            PrimitiveKind::TriangleStrip => PrimitiveTopology::TriangleStrip,
            PrimitiveKind::TriangleFan => PrimitiveTopology::TriangleFan,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PrimitiveKind::Points => "points",
            PrimitiveKind::Lines => "lines",
            PrimitiveKind::LineStrip => "line_strip",
            PrimitiveKind::LineLoop => "line_loop",
            PrimitiveKind::Triangles => "triangles",
            PrimitiveKind::TriangleStrip => "triangle_strip",
            PrimitiveKind::TriangleFan => "triangle_fan",
        }
    }
}

impl FromStr for PrimitiveKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "points" => Ok(PrimitiveKind::Points),
            "lines" => Ok(PrimitiveKind::Lines),
            "line_strip" => Ok(PrimitiveKind::LineStrip),
            "line_loop" => Ok(PrimitiveKind::LineLoop),
            "triangles" => Ok(PrimitiveKind::Triangles),
            "triangle_strip" => Ok(PrimitiveKind::TriangleStrip),
            "triangle_fan" => Ok(PrimitiveKind::TriangleFan),
            other => Err(engine_err!("nova3d::GpuDispatch", InvalidConfiguration =>
                "Unknown primitive kind '{}'", other)),
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compositing policy of a draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendKind {
    /// Depth-write on, blending off
    Opaque,
    /// Depth-write off, standard alpha compositing
    Transparent,
    /// Depth-write off, additive compositing
    Additive,
}

impl BlendKind {
    /// Fixed depth and blend state for this kind
    pub fn policy(self) -> (DepthState, BlendState) {
        let depth = |write_enable| DepthState {
            test_enable: true,
            write_enable,
            compare_op: CompareOp::LessOrEqual,
        };
        match self {
            BlendKind::Opaque => (depth(true), BlendState::REPLACE),
            BlendKind::Transparent => (depth(false), BlendState::ALPHA),
            BlendKind::Additive => (depth(false), BlendState::ADDITIVE),
        }
    }

    /// Whether draws of this kind are sorted back-to-front after opaque ones
    pub fn is_blended(self) -> bool {
        !matches!(self, BlendKind::Opaque)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BlendKind::Opaque => "opaque",
            BlendKind::Transparent => "transparent",
            BlendKind::Additive => "additive",
        }
    }
}

impl FromStr for BlendKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "opaque" => Ok(BlendKind::Opaque),
            "transparent" => Ok(BlendKind::Transparent),
            "additive" => Ok(BlendKind::Additive),
            other => Err(engine_err!("nova3d::GpuDispatch", InvalidConfiguration =>
                "Unknown blend kind '{}'", other)),
        }
    }
}

impl fmt::Display for BlendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
