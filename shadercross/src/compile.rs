//! Cross-compilation pipeline
//!
//! Sequences unit building, front-end compile/link, and per-stage
//! decode/translate/reflect into one invocation. Front-end failures are
//! terminal for the whole request; backend and reflection failures are
//! isolated to their stage.

use crate::error::Result;
use crate::flags::CompileOptions;
use crate::frontend::{Frontend, FrontendRuntime, StageIr};
use crate::include::{CallbackResolver, DirectoryResolver, IncludeResolver, NullResolver};
use crate::module::IrModule;
use crate::reflect::{IrReflector, ReflectionDocument, Reflector};
use crate::stage::ShaderStage;
use crate::target::{Target, TargetLang};
use crate::translate::{translator_for, AttributeMap, OutputBuffer};
use crate::unit::{build_units, CompilationUnit, StageSource};
use std::path::PathBuf;

/// Maximum concurrently supported stages per request
pub const MAX_STAGES: usize = 2;

/// A preprocessor macro definition
#[derive(Debug, Clone)]
pub struct Define {
    name: String,
    value: String,
}

impl Define {
    /// Creates a new preprocessor define
    pub fn new(name: &str, value: &str) -> Self {
        Define {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    /// Creates a define with an empty value
    pub fn flag(name: &str) -> Self {
        Self::new(name, "")
    }

    fn render(&self) -> String {
        if self.value.is_empty() {
            format!("#define {}\n", self.name)
        } else {
            format!("#define {} {}\n", self.name, self.value)
        }
    }
}

/// Per-stage translation outcome
#[derive(Debug, Clone)]
pub struct StageResult {
    pub stage: ShaderStage,
    pub success: bool,
    /// Cross-compiled source text
    pub output: String,
    /// Interface reflection for this stage
    pub reflection: Option<ReflectionDocument>,
    /// Symbol-to-integer side channel (e.g. vertex attribute locations)
    pub attributes: AttributeMap,
    /// Error text when this stage failed
    pub error: Option<String>,
}

impl StageResult {
    fn pending(stage: ShaderStage) -> Self {
        StageResult {
            stage,
            success: false,
            output: String::new(),
            reflection: None,
            attributes: AttributeMap::new(),
            error: None,
        }
    }
}

/// Aggregated result of one invocation
#[derive(Debug, Clone, Default)]
pub struct CrossResult {
    /// True only when every requested stage translated and reflected
    pub success: bool,
    /// Per-stage results in request order, at most `MAX_STAGES`
    pub stages: Vec<StageResult>,
    /// Concatenated human-readable diagnostics
    pub errors: String,
}

enum IncludeStrategy<'a> {
    Callback(Box<dyn FnMut(&str, bool) -> (String, String) + 'a>),
    Directory(PathBuf),
    None,
}

/// Builder for a cross-compilation request
///
/// # Example
/// ```no_run
/// use shadercross::{CrossCompileBuilder, ShaderStage, Target, TargetLang};
/// # struct F;
/// # impl shadercross::Frontend for F {
/// #     fn compile(&mut self, _: &shadercross::CompilationUnit<'_>, _: &str,
/// #         _: shadercross::CompileOptions, _: &mut dyn shadercross::IncludeResolver)
/// #         -> shadercross::UnitDiagnostics { Default::default() }
/// #     fn link(&mut self) -> shadercross::LinkOutcome { Default::default() }
/// # }
/// # let mut frontend = F;
///
/// let result = CrossCompileBuilder::new(Target::new(TargetLang::Glsl, 300).with_es())
///     .stage(ShaderStage::Fragment, "void main() {}")
///     .define("QUALITY", "2")
///     .include_dir("shaders/include")
///     .run(&mut frontend);
///
/// assert!(result.success);
/// ```
pub struct CrossCompileBuilder<'a> {
    target: Target,
    stages: Vec<StageSource<'a>>,
    defines: Vec<Define>,
    include: IncludeStrategy<'a>,
    options: CompileOptions,
}

impl<'a> CrossCompileBuilder<'a> {
    /// Creates a builder for the given target
    pub fn new(target: Target) -> Self {
        CrossCompileBuilder {
            target,
            stages: Vec::new(),
            defines: Vec::new(),
            include: IncludeStrategy::None,
            options: CompileOptions::default(),
        }
    }

    /// Adds a stage with a default unit name
    pub fn stage(mut self, stage: ShaderStage, source: &'a str) -> Self {
        self.stages.push(StageSource {
            stage,
            source,
            name: None,
        });
        self
    }

    /// Adds a stage with an explicit unit name
    pub fn stage_named(mut self, stage: ShaderStage, source: &'a str, name: &'a str) -> Self {
        self.stages.push(StageSource {
            stage,
            source,
            name: Some(name),
        });
        self
    }

    /// Adds a preprocessor define
    pub fn define(mut self, name: &str, value: &str) -> Self {
        self.defines.push(Define::new(name, value));
        self
    }

    /// Adds a preprocessor define flag (empty value)
    pub fn define_flag(mut self, name: &str) -> Self {
        self.defines.push(Define::flag(name));
        self
    }

    /// Adds a pre-built Define
    pub fn with_define(mut self, define: Define) -> Self {
        self.defines.push(define);
        self
    }

    /// Sets compile options (replaces the defaults)
    pub fn options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    /// Adds compile options (bitwise OR with existing)
    pub fn with_options(mut self, options: CompileOptions) -> Self {
        self.options |= options;
        self
    }

    /// Resolves includes against a base directory
    pub fn include_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.include = IncludeStrategy::Directory(dir.into());
        self
    }

    /// Resolves includes through a caller-supplied callback taking the
    /// header name and whether the include was local
    pub fn include_callback<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&str, bool) -> (String, String) + 'a,
    {
        self.include = IncludeStrategy::Callback(Box::new(callback));
        self
    }

    /// Runs the pipeline with the default reflector
    pub fn run(self, frontend: &mut dyn Frontend) -> CrossResult {
        self.run_with_reflector(frontend, &IrReflector)
    }

    /// Runs the pipeline with a custom reflection collaborator
    pub fn run_with_reflector(
        self,
        frontend: &mut dyn Frontend,
        reflector: &dyn Reflector,
    ) -> CrossResult {
        let mut result = CrossResult::default();

        // ConfigValidate: reject unsupported targets and malformed requests
        // before any front-end work.
        if let Err(err) = translator_for(self.target.lang) {
            result.errors = err.to_string();
            return result;
        }
        if self.stages.is_empty() {
            result.errors = "no shader stages supplied".to_string();
            return result;
        }
        if self.stages.len() > MAX_STAGES {
            result.errors = format!(
                "{} stages supplied, at most {MAX_STAGES} per request",
                self.stages.len()
            );
            return result;
        }

        let target = self.target.normalized();
        let preamble = build_preamble(&self.defines, &target);

        let mut resolver: Box<dyn IncludeResolver + 'a> = match self.include {
            IncludeStrategy::Callback(callback) => Box::new(CallbackResolver::new(callback)),
            IncludeStrategy::Directory(dir) => Box::new(DirectoryResolver::new(dir)),
            IncludeStrategy::None => Box::new(NullResolver),
        };

        let units = build_units(&self.stages);

        // FrontendCompileLink: compile every unit in declared order, then
        // link. Diagnostics accumulate in that order, linker last.
        FrontendRuntime::acquire();
        let suppress_warnings = self.options.contains(CompileOptions::SUPPRESS_WARNINGS);
        let mut frontend_failed = false;
        let mut diagnostics = String::new();
        for unit in &units {
            let diag = frontend.compile(unit, &preamble, self.options, resolver.as_mut());
            if !diag.success {
                frontend_failed = true;
            }
            if !diag.messages.is_empty() && (!diag.success || !suppress_warnings) {
                push_diagnostic(&mut diagnostics, &diag.messages);
            }
        }
        let link = frontend.link();
        if !link.success {
            frontend_failed = true;
        }
        if !link.messages.is_empty() && (!link.success || !suppress_warnings) {
            push_diagnostic(&mut diagnostics, &link.messages);
        }

        if frontend_failed {
            push_diagnostic(
                &mut diagnostics,
                "SPIR-V is not generated for failed compile or link",
            );
            result.errors = diagnostics;
            return result;
        }
        result.errors = diagnostics;

        // Decode -> Translate -> Reflect per stage, in request order. Each
        // stage fails independently; overall success needs all of them.
        result.success = true;
        for unit in &units {
            let mut stage_result = StageResult::pending(unit.stage);
            match stage_ir(&link.stages, unit.stage) {
                Some(ir) => {
                    match translate_one(&target, unit, ir.words.clone(), self.options, reflector) {
                        Ok((output, reflection, attributes)) => {
                            stage_result.success = true;
                            stage_result.output = output;
                            stage_result.reflection = Some(reflection);
                            stage_result.attributes = attributes;
                        }
                        Err(err) => {
                            stage_result.error = Some(err.to_string());
                        }
                    }
                }
                None => {
                    stage_result.error =
                        Some(format!("front-end produced no IR for stage {}", unit.stage));
                }
            }
            if !stage_result.success {
                result.success = false;
                if let Some(error) = &stage_result.error {
                    push_diagnostic(&mut result.errors, error);
                }
            }
            result.stages.push(stage_result);
        }

        result
    }
}

/// Convenience function for a single-stage request
pub fn cross_compile(
    target: Target,
    stage: ShaderStage,
    source: &str,
    frontend: &mut dyn Frontend,
) -> CrossResult {
    CrossCompileBuilder::new(target).stage(stage, source).run(frontend)
}

fn stage_ir(stages: &[StageIr], stage: ShaderStage) -> Option<&StageIr> {
    stages.iter().find(|s| s.stage == stage)
}

fn push_diagnostic(buffer: &mut String, message: &str) {
    buffer.push_str(message);
    if !message.ends_with('\n') {
        buffer.push('\n');
    }
}

/// Renders user defines plus the per-language marker define into the
/// preamble handed to the front-end.
fn build_preamble(defines: &[Define], target: &Target) -> String {
    let mut preamble = String::new();
    for define in defines {
        preamble.push_str(&define.render());
    }
    let marker = match target.lang {
        TargetLang::SpirV => Some("SPIRV"),
        TargetLang::Glsl => Some("GLSL"),
        TargetLang::Hlsl => Some("HLSL"),
        TargetLang::Metal => Some("METAL"),
        TargetLang::Agal => Some("AGAL"),
        TargetLang::VarList | TargetLang::JavaScript => None,
    };
    if let Some(marker) = marker {
        preamble.push_str(&format!("#define {marker} {}\n", target.version));
    }
    preamble
}

fn translate_one(
    target: &Target,
    unit: &CompilationUnit<'_>,
    words: Vec<u32>,
    options: CompileOptions,
    reflector: &dyn Reflector,
) -> Result<(String, ReflectionDocument, AttributeMap)> {
    let mut module = IrModule::decode(words)?;
    if options.contains(CompileOptions::AUTO_ASSIGN_BINDINGS) {
        module.auto_assign_bindings();
    }

    let translator = translator_for(target.lang)?;
    let output_name = format!("{}.{}", unit.stage.extension(), target.lang.extension());
    let mut out = OutputBuffer::new();
    let mut attributes = AttributeMap::new();
    translator.produce(
        &module,
        unit.stage,
        target,
        &unit.name,
        &output_name,
        &mut out,
        &mut attributes,
    )?;

    let reflection = reflector.reflect(&module)?;
    Ok((out.into_string(), reflection, attributes))
}
