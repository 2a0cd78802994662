//! Target representation types (language + version + platform)

use std::fmt;

/// Target shading representation
///
/// Closed set; translator dispatch matches on this exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetLang {
    /// Portable binary IR, rendered as a textual listing
    SpirV,
    /// Desktop/ES shading language
    Glsl,
    /// High-level shading language
    Hlsl,
    /// Metal shading language
    Metal,
    /// Legacy GPU bytecode assembly (Flash era)
    Agal,
    /// Flat variable-list introspection format
    VarList,
    /// Recognized but never translatable
    JavaScript,
}

impl TargetLang {
    /// Returns the conventional output file extension
    pub fn extension(&self) -> &'static str {
        match self {
            TargetLang::SpirV => "spv",
            TargetLang::Glsl => "glsl",
            TargetLang::Hlsl => "hlsl",
            TargetLang::Metal => "metal",
            TargetLang::Agal => "agal",
            TargetLang::VarList => "varlist",
            TargetLang::JavaScript => "js",
        }
    }
}

/// Destination platform for the generated source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TargetSystem {
    Windows,
    WindowsApp,
    MacOs,
    Linux,
    Ios,
    Android,
    Html5,
    Flash,
    Unity,
    #[default]
    Unknown,
}

/// Complete target specification
///
/// Immutable value describing what one invocation translates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Target {
    /// The target shading representation
    pub lang: TargetLang,
    /// Numeric language version (e.g. 300 for GLSL ES 300, 11 for HLSL 11)
    pub version: i32,
    /// Mobile/constrained profile (GLSL ES, forced for AGAL)
    pub es: bool,
    /// Destination platform
    pub system: TargetSystem,
}

impl Target {
    /// Creates a target with the default platform
    pub const fn new(lang: TargetLang, version: i32) -> Self {
        Target {
            lang,
            version,
            es: false,
            system: TargetSystem::Unknown,
        }
    }

    /// Marks the target as a constrained (ES) profile
    pub const fn with_es(mut self) -> Self {
        self.es = true;
        self
    }

    /// Sets the destination platform
    pub const fn with_system(mut self, system: TargetSystem) -> Self {
        self.system = system;
        self
    }

    /// Applies per-language defaults: versions for targets where 0 or less
    /// was supplied, and the constrained profile AGAL always runs with.
    pub fn normalized(mut self) -> Self {
        if self.version <= 0 {
            self.version = match self.lang {
                TargetLang::SpirV => 1,
                TargetLang::Hlsl => 11,
                TargetLang::Metal => 1,
                TargetLang::Agal => 100,
                TargetLang::VarList => 1,
                TargetLang::Glsl | TargetLang::JavaScript => self.version,
            };
        }
        if self.lang == TargetLang::Agal {
            self.es = true;
        }
        self
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.lang {
            TargetLang::SpirV => f.write_str("SPIR-V"),
            TargetLang::Glsl => {
                if self.es {
                    write!(f, "GLSL ES {}", self.version)
                } else {
                    write!(f, "GLSL {}", self.version)
                }
            }
            TargetLang::Hlsl => write!(f, "HLSL {}", self.version),
            TargetLang::Metal => f.write_str("Metal"),
            TargetLang::Agal => f.write_str("AGAL"),
            TargetLang::VarList => f.write_str("VarList"),
            TargetLang::JavaScript => f.write_str("JavaScript"),
        }
    }
}
