//! GLSL backend

use super::{collect_vertex_attributes, AttributeMap, OutputBuffer, Translator};
use crate::error::Result;
use crate::module::IrModule;
use crate::reflect::{IrReflector, Reflector, VariableKind};
use crate::stage::ShaderStage;
use crate::target::Target;

/// Emits desktop or ES GLSL: version directive, interface declarations from
/// the module's reflection, and the entry-point skeleton.
#[derive(Debug)]
pub struct GlslTranslator;

impl Translator for GlslTranslator {
    fn produce(
        &self,
        module: &IrModule,
        stage: ShaderStage,
        target: &Target,
        _source_name: &str,
        _output_name: &str,
        out: &mut OutputBuffer,
        attributes: &mut AttributeMap,
    ) -> Result<()> {
        let doc = IrReflector.reflect(module)?;
        collect_vertex_attributes(&doc, stage, attributes);

        if target.es {
            out.push_line(&format!("#version {} es", target.version))?;
        } else {
            out.push_line(&format!("#version {}", target.version))?;
        }
        if target.es && stage == ShaderStage::Fragment {
            out.push_line("precision mediump float;")?;
        }
        if stage == ShaderStage::Compute {
            out.push_line("layout(local_size_x = 1) in;")?;
        }

        for var in &doc.variables {
            let name = if var.name.is_empty() {
                "_anon".to_string()
            } else {
                var.name.clone()
            };
            match var.kind {
                VariableKind::Input => {
                    let prefix = match var.location {
                        Some(loc) => format!("layout(location = {loc}) "),
                        None => String::new(),
                    };
                    out.push_line(&format!("{prefix}in {} {name};", var.type_name))?;
                }
                VariableKind::Output => {
                    let prefix = match var.location {
                        Some(loc) => format!("layout(location = {loc}) "),
                        None => String::new(),
                    };
                    out.push_line(&format!("{prefix}out {} {name};", var.type_name))?;
                }
                VariableKind::Uniform => {
                    let prefix = match (var.set, var.binding) {
                        (Some(set), Some(binding)) => {
                            format!("layout(set = {set}, binding = {binding}) ")
                        }
                        (None, Some(binding)) => format!("layout(binding = {binding}) "),
                        _ => String::new(),
                    };
                    let glsl_type = match var.type_name.as_str() {
                        "sampledImage" => "sampler2D",
                        "image" => "image2D",
                        other => other,
                    };
                    out.push_line(&format!("{prefix}uniform {glsl_type} {name};"))?;
                }
                VariableKind::PushConstant => {
                    out.push_line(&format!(
                        "layout(push_constant) uniform {} {name};",
                        var.type_name
                    ))?;
                }
            }
        }

        if !doc.variables.is_empty() {
            out.push_line("")?;
        }
        out.push_line("void main()")?;
        out.push_line("{")?;
        out.push_line("}")?;
        Ok(())
    }
}
