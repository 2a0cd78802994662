//! Compilation units: named per-stage source handed to the front-end

use crate::stage::ShaderStage;

/// One stage's source as supplied by the caller
#[derive(Debug, Clone, Copy)]
pub struct StageSource<'a> {
    /// Which pipeline stage this source targets
    pub stage: ShaderStage,
    /// Raw source text
    pub source: &'a str,
    /// Explicit unit name, if any; defaults to `source.<extension>`
    pub name: Option<&'a str>,
}

/// A stage source resolved to a named unit for one pipeline invocation.
///
/// Borrows the caller's source text; exists only within the invocation.
#[derive(Debug, Clone)]
pub struct CompilationUnit<'a> {
    pub stage: ShaderStage,
    pub name: String,
    pub source: &'a str,
}

/// Maps stage sources to compilation units, synthesizing default names
pub fn build_units<'a>(sources: &[StageSource<'a>]) -> Vec<CompilationUnit<'a>> {
    sources
        .iter()
        .map(|s| CompilationUnit {
            stage: s.stage,
            name: match s.name {
                Some(name) => name.to_string(),
                None => format!("source.{}", s.stage.extension()),
            },
            source: s.source,
        })
        .collect()
}
