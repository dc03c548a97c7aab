/// Shader program trait and descriptor
///
/// Shader source is an opaque blob. The engine only observes whether the
/// backend managed to compile and link it.

/// Descriptor for creating (compiling + linking) a shader program
#[derive(Debug, Clone)]
pub struct ProgramDesc {
    /// Debug name
    pub name: String,
    /// Vertex stage source
    pub vertex_source: String,
    /// Fragment stage source
    pub fragment_source: String,
}

/// Linked shader program
pub trait Program: Send + Sync {
    /// Stable backend handle id
    fn id(&self) -> u64;

    /// Debug name given at creation
    fn name(&self) -> &str;
}
