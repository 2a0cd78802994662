//! Front-end collaborator interface
//!
//! The shading-language front-end (parsing, type-checking, linking stage
//! programs into binary IR) lives outside this crate. This module defines
//! the contract the orchestrator drives it through, plus the process-wide
//! runtime guard its engines typically require.

use crate::flags::CompileOptions;
use crate::include::IncludeResolver;
use crate::stage::ShaderStage;
use crate::unit::CompilationUnit;
use std::sync::OnceLock;

/// Per-stage binary IR produced by a successful link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageIr {
    /// The stage this IR was linked for
    pub stage: ShaderStage,
    /// Flat word buffer
    pub words: Vec<u32>,
}

/// Diagnostics from compiling one unit.
///
/// `messages` may be non-empty on success (warnings).
#[derive(Debug, Clone, Default)]
pub struct UnitDiagnostics {
    pub success: bool,
    pub messages: String,
}

/// Outcome of linking all units of one request
#[derive(Debug, Clone, Default)]
pub struct LinkOutcome {
    pub success: bool,
    pub messages: String,
    /// Per-stage IR, present only on success
    pub stages: Vec<StageIr>,
}

/// The front-end collaborator: compiles units, links them into a multi-stage
/// program, and resolves cross-stage interface matching.
///
/// Implementations must honor `CompileOptions::AUTO_MAP_BINDINGS` by
/// assigning descriptor bindings automatically during linking.
pub trait Frontend {
    /// Parses and type-checks one unit. Include directives are resolved
    /// through `resolver`; every resolved buffer is released before this
    /// call returns.
    fn compile(
        &mut self,
        unit: &CompilationUnit<'_>,
        defines: &str,
        options: CompileOptions,
        resolver: &mut dyn IncludeResolver,
    ) -> UnitDiagnostics;

    /// Links every unit compiled since the last link into per-stage IR
    fn link(&mut self) -> LinkOutcome;
}

/// Process-wide front-end runtime.
///
/// Front-end engines require one-time global initialization. `acquire`
/// performs it exactly once behind a guard and keeps the runtime alive for
/// the process lifetime; it is never invoked per request, and concurrent
/// first calls observe a single initialization.
#[derive(Debug)]
pub struct FrontendRuntime {
    _private: (),
}

static RUNTIME: OnceLock<FrontendRuntime> = OnceLock::new();

impl FrontendRuntime {
    /// Acquires the process-wide runtime, initializing it on first call
    pub fn acquire() -> &'static FrontendRuntime {
        RUNTIME.get_or_init(|| {
            debug_log!("front-end runtime initialized");
            FrontendRuntime { _private: () }
        })
    }

    /// Whether the runtime has been initialized
    pub fn is_initialized() -> bool {
        RUNTIME.get().is_some()
    }
}
