use derive_more::Display;

pub type Result<T> = core::result::Result<T, PolygonizeError>;

#[derive(Debug, Display, Clone, PartialEq)]
pub enum PolygonizeError {
    /// A caller-supplied parameter is out of its valid domain.
    #[display("invalid parameter `{name}`: {value}")]
    InvalidParameter { name: &'static str, value: f32 },

    /// The triangulation table referenced an edge that is not crossed in this configuration.
    #[display("internal consistency failure: state {state:#04x} references edge {edge}")]
    InternalConsistency { state: u8, edge: i8 },

    /// The mesh outgrew what a `u32` index can address.
    #[display("mesh too large: {vertices} vertices")]
    MeshTooLarge { vertices: usize },
}

impl std::error::Error for PolygonizeError {}
