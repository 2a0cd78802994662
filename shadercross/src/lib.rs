//! Shader cross-compilation for multiple target shading languages
//!
//! This crate turns shader source for one or more pipeline stages into
//! source text for a chosen target representation, plus structured
//! interface-reflection metadata. The language front-end is an external
//! collaborator behind the [`Frontend`] trait; this crate owns unit
//! building, binary IR decoding, backend dispatch, and result aggregation.
//!
//! # Example
//!
//! ```no_run
//! use shadercross::{CrossCompileBuilder, ShaderStage, Target, TargetLang};
//! # struct F;
//! # impl shadercross::Frontend for F {
//! #     fn compile(&mut self, _: &shadercross::CompilationUnit<'_>, _: &str,
//! #         _: shadercross::CompileOptions, _: &mut dyn shadercross::IncludeResolver)
//! #         -> shadercross::UnitDiagnostics { Default::default() }
//! #     fn link(&mut self) -> shadercross::LinkOutcome { Default::default() }
//! # }
//! # let mut frontend = F;
//!
//! let source = r#"
//!     void main() {
//!         gl_FragColor = vec4(1.0, 0.0, 0.0, 1.0);
//!     }
//! "#;
//!
//! let result = CrossCompileBuilder::new(Target::new(TargetLang::Glsl, 300).with_es())
//!     .stage(ShaderStage::Fragment, source)
//!     .run(&mut frontend);
//!
//! assert!(result.success);
//! println!("{}", result.stages[0].output);
//! ```

macro_rules! debug_log {
    ($($arg:tt)*) => {{
        #[cfg(feature = "debug-logs")]
        eprintln!($($arg)*);
    }};
}

mod compile;
mod error;
mod flags;
mod frontend;
mod include;
mod module;
mod reflect;
mod stage;
pub mod spv;
mod target;
mod translate;
mod unit;

pub use compile::{
    cross_compile, CrossCompileBuilder, CrossResult, Define, StageResult, MAX_STAGES,
};
pub use error::{Error, Result};
pub use flags::CompileOptions;
pub use frontend::{Frontend, FrontendRuntime, LinkOutcome, StageIr, UnitDiagnostics};
pub use include::{
    CallbackResolver, DirectoryResolver, IncludeResolver, IncludeResult, NullResolver,
};
pub use module::{Instruction, IrModule};
pub use reflect::{
    InterfaceVariable, IrReflector, ReflectionDocument, Reflector, VariableKind,
};
pub use stage::ShaderStage;
pub use target::{Target, TargetLang, TargetSystem};
pub use translate::{
    translator_for, AgalTranslator, AttributeMap, GlslTranslator, HlslTranslator,
    MetalTranslator, OutputBuffer, SpirvTranslator, Translator, VarListTranslator,
    MAX_OUTPUT_LEN,
};
pub use unit::{build_units, CompilationUnit, StageSource};
