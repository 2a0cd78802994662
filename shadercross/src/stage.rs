//! Pipeline stage types

use std::fmt;

/// One programmable point in a rendering/compute pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShaderStage {
    /// Vertex shader
    Vertex,
    /// Tessellation control (hull) shader
    TessControl,
    /// Tessellation evaluation (domain) shader
    TessEvaluation,
    /// Geometry shader
    Geometry,
    /// Fragment (pixel) shader
    Fragment,
    /// Compute shader
    Compute,
}

impl ShaderStage {
    /// Returns the conventional source file extension
    /// (vert, tesc, tese, geom, frag, comp)
    pub fn extension(&self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vert",
            ShaderStage::TessControl => "tesc",
            ShaderStage::TessEvaluation => "tese",
            ShaderStage::Geometry => "geom",
            ShaderStage::Fragment => "frag",
            ShaderStage::Compute => "comp",
        }
    }

    /// Deduces the stage from a file name suffix.
    ///
    /// A trailing `.glsl` is stripped first, so `shadow.frag.glsl` resolves
    /// the same as `shadow.frag`. Unknown or missing suffixes fall back to
    /// `Vertex`.
    pub fn from_file_name(name: &str) -> Self {
        let base = name.strip_suffix(".glsl").unwrap_or(name);
        let suffix = match base.rfind('.') {
            Some(dot) => &base[dot + 1..],
            None => return ShaderStage::Vertex,
        };
        Self::from_extension(suffix).unwrap_or(ShaderStage::Vertex)
    }

    /// Maps an extension back to a stage
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "vert" => Some(ShaderStage::Vertex),
            "tesc" => Some(ShaderStage::TessControl),
            "tese" => Some(ShaderStage::TessEvaluation),
            "geom" => Some(ShaderStage::Geometry),
            "frag" => Some(ShaderStage::Fragment),
            "comp" => Some(ShaderStage::Compute),
            _ => None,
        }
    }

    /// Returns the numeric execution model the binary IR encodes for this
    /// stage. Backends derive their execution role from the stage, not from
    /// module contents.
    pub fn execution_model(&self) -> u32 {
        match self {
            ShaderStage::Vertex => 0,
            ShaderStage::TessControl => 1,
            ShaderStage::TessEvaluation => 2,
            ShaderStage::Geometry => 3,
            ShaderStage::Fragment => 4,
            ShaderStage::Compute => 5,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
