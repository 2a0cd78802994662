//! Compile option flags

use bitflags::bitflags;

bitflags! {
    /// Options controlling front-end behavior and IR post-processing
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CompileOptions: u32 {
        /// Ask the front-end to auto-assign descriptor bindings while linking
        const AUTO_MAP_BINDINGS = 1 << 0;

        /// Rewrite descriptor-binding decorations in the decoded IR with a
        /// per-module counter starting at 0
        const AUTO_ASSIGN_BINDINGS = 1 << 1;

        /// Accept looser front-end validation
        const RELAXED_ERRORS = 1 << 2;

        /// Keep warning diagnostics out of the aggregated error text
        const SUPPRESS_WARNINGS = 1 << 3;

        /// Ask the front-end to retain functions the entry point never calls
        const KEEP_UNCALLED = 1 << 4;
    }
}

impl Default for CompileOptions {
    /// Front-end binding auto-mapping is always requested; the IR-level
    /// rewrite pass is opt-in.
    fn default() -> Self {
        CompileOptions::AUTO_MAP_BINDINGS
    }
}
