/// Error types for the geometry core
use std::fmt;
use std::io;

/// Arithmetic failures in vector and matrix math
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    /// A scalar divisor (or homogeneous `w`) was exactly zero.
    DivideByZero,
    /// A zero-length vector was normalized.
    ZeroLength,
}

impl fmt::Display for MathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MathError::DivideByZero => write!(f, "division by zero"),
            MathError::ZeroLength => write!(f, "normalization of a zero-length vector"),
        }
    }
}

impl std::error::Error for MathError {}

/// Failures while loading a mesh from its text form
#[derive(Debug)]
pub enum MeshError {
    Io(io::Error),
    /// A `v` or `f` record could not be parsed.
    Parse { line: usize, message: String },
    /// A face names a vertex that does not exist (indices are one-based).
    FaceIndexOutOfRange {
        line: usize,
        index: i64,
        vertex_count: usize,
    },
    /// A face with other than three vertex indices.
    UnsupportedFace { line: usize, vertices: usize },
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshError::Io(e) => write!(f, "failed to read mesh: {}", e),
            MeshError::Parse { line, message } => {
                write!(f, "line {}: {}", line, message)
            }
            MeshError::FaceIndexOutOfRange {
                line,
                index,
                vertex_count,
            } => write!(
                f,
                "line {}: face index {} out of range (mesh has {} vertices)",
                line, index, vertex_count
            ),
            MeshError::UnsupportedFace { line, vertices } => write!(
                f,
                "line {}: face has {} vertices, only triangles are supported",
                line, vertices
            ),
        }
    }
}

impl std::error::Error for MeshError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MeshError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for MeshError {
    fn from(e: io::Error) -> Self {
        MeshError::Io(e)
    }
}

/// Rejected pipeline configuration
#[derive(Debug)]
pub enum ConfigError {
    Invalid { field: &'static str, reason: String },
    Json(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid { field, reason } => {
                write!(f, "invalid `{}`: {}", field, reason)
            }
            ConfigError::Json(e) => write!(f, "malformed configuration: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Json(e) => Some(e),
            ConfigError::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(MathError::ZeroLength.to_string(), "normalization of a zero-length vector");
        let err = MeshError::FaceIndexOutOfRange {
            line: 7,
            index: 9,
            vertex_count: 3,
        };
        assert_eq!(
            err.to_string(),
            "line 7: face index 9 out of range (mesh has 3 vertices)"
        );
    }
}
