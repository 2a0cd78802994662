//! Integration tests for the cross-compilation pipeline
//!
//! The front-end collaborator is scripted: it resolves include directives,
//! reports diagnostics keyed off markers in the source text, and links each
//! stage to a canned (or test-supplied) IR module.

use pretty_assertions::assert_eq;
use shadercross::spv;
use shadercross::{
    CompilationUnit, CompileOptions, CrossCompileBuilder, Frontend, IncludeResolver, LinkOutcome,
    ShaderStage, StageIr, Target, TargetLang, UnitDiagnostics, VariableKind,
};
use std::collections::HashMap;

// Fragment shader with an empty entry point
const EMPTY_FRAGMENT: &str = "void main() {}";

// Vertex shader passing a position through
const SIMPLE_VERTEX: &str = "
layout(location = 0) in vec4 position;
void main() { gl_Position = position; }
";

// Source the scripted front-end rejects
const BAD_FRAGMENT: &str = "void main() { gl_FragColor = undeclared_identifier; }";

// Source the scripted front-end warns about
const NOISY_VERTEX: &str = "void main() { gl_Position = deprecated_builtin; }";

/// Builds the minimal well-formed module the front-end links a stage to:
/// header, shader capability, entry point named "main".
fn canned_ir(stage: ShaderStage) -> Vec<u32> {
    let mut words = vec![spv::MAGIC, 0x0001_0000, 0, 8, 0];
    let mut push = |opcode: u16, operands: &[u32]| {
        words.push(((operands.len() as u32 + 1) << 16) | opcode as u32);
        words.extend_from_slice(operands);
    };
    push(spv::OP_CAPABILITY, &[spv::CAPABILITY_SHADER]);
    let mut entry = vec![stage.execution_model(), 4];
    entry.extend(spv::encode_literal_string("main"));
    push(spv::OP_ENTRY_POINT, &entry);
    words
}

/// IR with two named uniforms whose binding decorations start out as junk
fn ir_with_bindings(stage: ShaderStage, first: u32, second: u32) -> Vec<u32> {
    let mut words = canned_ir(stage);
    let mut push = |opcode: u16, operands: &[u32]| {
        words.push(((operands.len() as u32 + 1) << 16) | opcode as u32);
        words.extend_from_slice(operands);
    };
    let mut name_a = vec![10];
    name_a.extend(spv::encode_literal_string("albedo"));
    push(spv::OP_NAME, &name_a);
    let mut name_b = vec![11];
    name_b.extend(spv::encode_literal_string("normal_map"));
    push(spv::OP_NAME, &name_b);
    push(spv::OP_DECORATE, &[10, spv::DECORATION_DESCRIPTOR_SET, 0]);
    push(spv::OP_DECORATE, &[10, spv::DECORATION_BINDING, first]);
    push(spv::OP_DECORATE, &[11, spv::DECORATION_DESCRIPTOR_SET, 0]);
    push(spv::OP_DECORATE, &[11, spv::DECORATION_BINDING, second]);
    push(spv::OP_TYPE_SAMPLED_IMAGE, &[6]);
    push(spv::OP_TYPE_POINTER, &[7, spv::STORAGE_UNIFORM_CONSTANT, 6]);
    push(spv::OP_VARIABLE, &[7, 10, spv::STORAGE_UNIFORM_CONSTANT]);
    push(spv::OP_VARIABLE, &[7, 11, spv::STORAGE_UNIFORM_CONSTANT]);
    words
}

/// Scripted front-end collaborator
#[derive(Default)]
struct ScriptedFrontend {
    /// Stages compiled successfully since the last link
    compiled: Vec<ShaderStage>,
    any_failed: bool,
    /// Per-stage IR overriding the canned module
    stage_ir: HashMap<ShaderStage, Vec<u32>>,
    /// Stage the linker silently drops, if any
    omit_stage: Option<ShaderStage>,
    /// Every preamble passed to compile
    preambles: Vec<String>,
    /// Every include resolved, with its content
    resolved: Vec<(String, Vec<u8>)>,
    compile_calls: usize,
    link_calls: usize,
}

impl ScriptedFrontend {
    fn new() -> Self {
        Self::default()
    }

    fn with_stage_ir(mut self, stage: ShaderStage, words: Vec<u32>) -> Self {
        self.stage_ir.insert(stage, words);
        self
    }
}

impl Frontend for ScriptedFrontend {
    fn compile(
        &mut self,
        unit: &CompilationUnit<'_>,
        defines: &str,
        _options: CompileOptions,
        resolver: &mut dyn IncludeResolver,
    ) -> UnitDiagnostics {
        self.compile_calls += 1;
        self.preambles.push(defines.to_string());

        for line in unit.source.lines() {
            let trimmed = line.trim();
            if let Some(name) = trimmed
                .strip_prefix("#include \"")
                .and_then(|rest| rest.strip_suffix('"'))
            {
                match resolver.resolve_local(name) {
                    Some(result) => self.resolved.push((result.name, result.content)),
                    None => {
                        self.any_failed = true;
                        return UnitDiagnostics {
                            success: false,
                            messages: format!(
                                "ERROR: {}: cannot open include file \"{name}\"",
                                unit.name
                            ),
                        };
                    }
                }
            }
        }

        if unit.source.contains("undeclared_identifier") {
            self.any_failed = true;
            return UnitDiagnostics {
                success: false,
                messages: format!(
                    "ERROR: {}: 'undeclared_identifier' : undeclared identifier",
                    unit.name
                ),
            };
        }

        let messages = if unit.source.contains("deprecated_builtin") {
            format!("WARNING: {}: deprecated builtin used", unit.name)
        } else {
            String::new()
        };
        self.compiled.push(unit.stage);
        UnitDiagnostics {
            success: true,
            messages,
        }
    }

    fn link(&mut self) -> LinkOutcome {
        self.link_calls += 1;
        if self.any_failed {
            return LinkOutcome {
                success: false,
                messages: "ERROR: linking failed, missing stage objects".to_string(),
                stages: Vec::new(),
            };
        }
        let stages = self
            .compiled
            .drain(..)
            .filter(|stage| Some(*stage) != self.omit_stage)
            .map(|stage| StageIr {
                stage,
                words: self
                    .stage_ir
                    .get(&stage)
                    .cloned()
                    .unwrap_or_else(|| canned_ir(stage)),
            })
            .collect();
        LinkOutcome {
            success: true,
            messages: String::new(),
            stages,
        }
    }
}

fn all_translatable_targets() -> Vec<Target> {
    vec![
        Target::new(TargetLang::SpirV, 1),
        Target::new(TargetLang::Glsl, 450),
        Target::new(TargetLang::Glsl, 300).with_es(),
        Target::new(TargetLang::Hlsl, 11),
        Target::new(TargetLang::Metal, 1),
        Target::new(TargetLang::Agal, 100),
        Target::new(TargetLang::VarList, 1),
    ]
}

#[test]
fn test_fragment_compiles_against_every_supported_target() {
    for target in all_translatable_targets() {
        let mut frontend = ScriptedFrontend::new();
        let result = CrossCompileBuilder::new(target)
            .stage(ShaderStage::Fragment, EMPTY_FRAGMENT)
            .run(&mut frontend);
        assert!(result.success, "{target} failed: {}", result.errors);
        assert_eq!(result.stages.len(), 1);
        assert!(
            !result.stages[0].output.is_empty(),
            "{target} produced empty output"
        );
    }
}

#[test]
fn test_empty_fragment_against_glsl_450() {
    let mut frontend = ScriptedFrontend::new();
    let result = CrossCompileBuilder::new(Target::new(TargetLang::Glsl, 450))
        .stage(ShaderStage::Fragment, EMPTY_FRAGMENT)
        .run(&mut frontend);

    assert!(result.success, "{}", result.errors);
    let stage = &result.stages[0];
    assert!(stage.output.contains("void main()\n{\n}\n"));
    let reflection = stage.reflection.as_ref().unwrap();
    assert!(reflection.variables.is_empty());
    assert_eq!(reflection.entry_point.as_deref(), Some("main"));
}

#[test]
fn test_unsupported_target_never_reaches_the_frontend() {
    let mut frontend = ScriptedFrontend::new();
    let result = CrossCompileBuilder::new(Target::new(TargetLang::JavaScript, 1))
        .stage(ShaderStage::Fragment, EMPTY_FRAGMENT)
        .run(&mut frontend);

    assert!(!result.success);
    assert_eq!(result.errors, "JavaScript not supported");
    assert!(result.stages.is_empty());
    assert_eq!(frontend.compile_calls, 0);
    assert_eq!(frontend.link_calls, 0);
}

#[test]
fn test_frontend_failure_on_stage_two_orders_diagnostics() {
    let mut frontend = ScriptedFrontend::new();
    let result = CrossCompileBuilder::new(Target::new(TargetLang::Glsl, 450))
        .stage(ShaderStage::Vertex, NOISY_VERTEX)
        .stage(ShaderStage::Fragment, BAD_FRAGMENT)
        .run(&mut frontend);

    assert!(!result.success);
    assert!(result.stages.is_empty(), "no output entry may be populated");

    let vertex_pos = result
        .errors
        .find("WARNING: source.vert")
        .expect("stage 1 diagnostics present");
    let fragment_pos = result
        .errors
        .find("ERROR: source.frag")
        .expect("stage 2 diagnostics present");
    assert!(vertex_pos < fragment_pos, "diagnostics out of stage order");
    assert!(result
        .errors
        .contains("SPIR-V is not generated for failed compile or link"));
}

#[test]
fn test_two_stage_results_arrive_in_request_order() {
    let mut frontend = ScriptedFrontend::new();
    let result = CrossCompileBuilder::new(Target::new(TargetLang::Glsl, 450))
        .stage(ShaderStage::Vertex, SIMPLE_VERTEX)
        .stage(ShaderStage::Fragment, EMPTY_FRAGMENT)
        .run(&mut frontend);

    assert!(result.success, "{}", result.errors);
    assert_eq!(result.stages.len(), 2);
    assert_eq!(result.stages[0].stage, ShaderStage::Vertex);
    assert_eq!(result.stages[1].stage, ShaderStage::Fragment);
}

#[test]
fn test_translation_failure_is_isolated_to_its_stage() {
    // Metal has no geometry stage; the vertex stage must be unaffected.
    let mut frontend = ScriptedFrontend::new();
    let result = CrossCompileBuilder::new(Target::new(TargetLang::Metal, 1))
        .stage(ShaderStage::Vertex, SIMPLE_VERTEX)
        .stage(ShaderStage::Geometry, "void main() {}")
        .run(&mut frontend);

    assert!(!result.success, "all-or-nothing policy");
    assert_eq!(result.stages.len(), 2);

    let vertex = &result.stages[0];
    assert!(vertex.success);
    assert!(!vertex.output.is_empty());
    assert!(vertex.error.is_none());

    let geometry = &result.stages[1];
    assert!(!geometry.success);
    assert!(geometry.output.is_empty());
    assert!(geometry
        .error
        .as_ref()
        .unwrap()
        .contains("cannot be represented in Metal"));
}

#[test]
fn test_missing_stage_ir_is_a_stage_error() {
    let mut frontend = ScriptedFrontend::new();
    frontend.omit_stage = Some(ShaderStage::Fragment);
    let result = CrossCompileBuilder::new(Target::new(TargetLang::Glsl, 450))
        .stage(ShaderStage::Vertex, SIMPLE_VERTEX)
        .stage(ShaderStage::Fragment, EMPTY_FRAGMENT)
        .run(&mut frontend);

    assert!(!result.success);
    assert!(result.stages[0].success);
    assert!(result.stages[1]
        .error
        .as_ref()
        .unwrap()
        .contains("no IR for stage frag"));
}

#[test]
fn test_directory_include_of_missing_header_is_empty_content() {
    let source = "#include \"not_there.h\"\nvoid main() {}";
    let mut frontend = ScriptedFrontend::new();
    let result = CrossCompileBuilder::new(Target::new(TargetLang::Glsl, 450))
        .stage(ShaderStage::Fragment, source)
        .include_dir("/definitely/not/a/real/dir")
        .run(&mut frontend);

    // The resolver reported empty content, not a failure.
    assert!(result.success, "{}", result.errors);
    assert_eq!(frontend.resolved.len(), 1);
    assert!(frontend.resolved[0].0.ends_with("not_there.h"));
    assert_eq!(frontend.resolved[0].1, b"");
}

#[test]
fn test_null_include_strategy_surfaces_frontend_diagnostic() {
    let source = "#include \"common.h\"\nvoid main() {}";
    let mut frontend = ScriptedFrontend::new();
    let result = CrossCompileBuilder::new(Target::new(TargetLang::Glsl, 450))
        .stage(ShaderStage::Fragment, source)
        .run(&mut frontend);

    assert!(!result.success);
    assert!(result.errors.contains("cannot open include file \"common.h\""));
}

#[test]
fn test_callback_include_strategy_supplies_content() {
    let source = "#include \"colors.h\"\nvoid main() {}";
    let mut frontend = ScriptedFrontend::new();
    let result = CrossCompileBuilder::new(Target::new(TargetLang::Glsl, 450))
        .stage(ShaderStage::Fragment, source)
        .include_callback(|name, local| {
            assert!(local);
            (format!("gen/{name}"), "vec4 red();\n".to_string())
        })
        .run(&mut frontend);

    assert!(result.success, "{}", result.errors);
    assert_eq!(
        frontend.resolved,
        vec![("gen/colors.h".to_string(), b"vec4 red();\n".to_vec())]
    );
}

#[test]
fn test_define_preamble_reaches_the_frontend() {
    let mut frontend = ScriptedFrontend::new();
    let result = CrossCompileBuilder::new(Target::new(TargetLang::Glsl, 300).with_es())
        .stage(ShaderStage::Fragment, EMPTY_FRAGMENT)
        .define("QUALITY", "2")
        .run(&mut frontend);

    assert!(result.success);
    assert_eq!(
        frontend.preambles[0],
        "#define QUALITY 2\n#define GLSL 300\n"
    );
}

#[test]
fn test_auto_assign_bindings_renumbers_from_zero() {
    let mut frontend = ScriptedFrontend::new().with_stage_ir(
        ShaderStage::Fragment,
        ir_with_bindings(ShaderStage::Fragment, 7, 9),
    );
    let result = CrossCompileBuilder::new(Target::new(TargetLang::VarList, 1))
        .stage(ShaderStage::Fragment, EMPTY_FRAGMENT)
        .with_options(CompileOptions::AUTO_ASSIGN_BINDINGS)
        .run(&mut frontend);

    assert!(result.success, "{}", result.errors);
    let reflection = result.stages[0].reflection.as_ref().unwrap();
    let bindings: Vec<Option<u32>> = reflection
        .variables
        .iter()
        .filter(|v| v.kind == VariableKind::Uniform)
        .map(|v| v.binding)
        .collect();
    assert_eq!(bindings, vec![Some(0), Some(1)]);
}

#[test]
fn test_bindings_untouched_without_the_option() {
    let mut frontend = ScriptedFrontend::new().with_stage_ir(
        ShaderStage::Fragment,
        ir_with_bindings(ShaderStage::Fragment, 7, 9),
    );
    let result = CrossCompileBuilder::new(Target::new(TargetLang::VarList, 1))
        .stage(ShaderStage::Fragment, EMPTY_FRAGMENT)
        .run(&mut frontend);

    assert!(result.success, "{}", result.errors);
    let reflection = result.stages[0].reflection.as_ref().unwrap();
    let bindings: Vec<Option<u32>> = reflection
        .variables
        .iter()
        .filter(|v| v.kind == VariableKind::Uniform)
        .map(|v| v.binding)
        .collect();
    assert_eq!(bindings, vec![Some(7), Some(9)]);
}

#[test]
fn test_vertex_attributes_flow_to_the_side_channel() {
    let mut words = canned_ir(ShaderStage::Vertex);
    let mut push = |opcode: u16, operands: &[u32]| {
        words.push(((operands.len() as u32 + 1) << 16) | opcode as u32);
        words.extend_from_slice(operands);
    };
    let mut name = vec![10];
    name.extend(spv::encode_literal_string("position"));
    push(spv::OP_NAME, &name);
    push(spv::OP_DECORATE, &[10, spv::DECORATION_LOCATION, 0]);
    push(spv::OP_TYPE_FLOAT, &[2, 32]);
    push(spv::OP_TYPE_VECTOR, &[3, 2, 4]);
    push(spv::OP_TYPE_POINTER, &[4, spv::STORAGE_INPUT, 3]);
    push(spv::OP_VARIABLE, &[4, 10, spv::STORAGE_INPUT]);

    let mut frontend = ScriptedFrontend::new().with_stage_ir(ShaderStage::Vertex, words);
    let result = CrossCompileBuilder::new(Target::new(TargetLang::Glsl, 450))
        .stage(ShaderStage::Vertex, SIMPLE_VERTEX)
        .run(&mut frontend);

    assert!(result.success, "{}", result.errors);
    assert_eq!(result.stages[0].attributes["position"], 0);
    assert!(result.stages[0].output.contains("in vec4 position;"));
}

#[test]
fn test_suppress_warnings_keeps_error_text_clean() {
    let mut frontend = ScriptedFrontend::new();
    let result = CrossCompileBuilder::new(Target::new(TargetLang::Glsl, 450))
        .stage(ShaderStage::Vertex, NOISY_VERTEX)
        .with_options(CompileOptions::SUPPRESS_WARNINGS)
        .run(&mut frontend);

    assert!(result.success);
    assert!(result.errors.is_empty(), "warnings leaked: {}", result.errors);
}
