//! Metal backend

use super::{collect_vertex_attributes, AttributeMap, OutputBuffer, Translator};
use crate::error::{Error, Result};
use crate::module::IrModule;
use crate::reflect::{IrReflector, Reflector, VariableKind};
use crate::stage::ShaderStage;
use crate::target::Target;

/// Emits Metal shading language. Geometry and tessellation stages have no
/// direct Metal representation and fail with a translation error.
#[derive(Debug)]
pub struct MetalTranslator;

impl Translator for MetalTranslator {
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
        let qualifier = match stage {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
            ShaderStage::Compute => "kernel",
            ShaderStage::Geometry
            | ShaderStage::TessControl
            | ShaderStage::TessEvaluation => {
                return Err(Error::Translation {
                    target: target.to_string(),
                    message: format!("{stage} stages cannot be represented in Metal"),
                });
            }
        };

        let doc = IrReflector.reflect(module)?;
        collect_vertex_attributes(&doc, stage, attributes);

        out.push_line("#include <metal_stdlib>")?;
        out.push_line("using namespace metal;")?;
        out.push_line("")?;

        for var in doc
            .variables
            .iter()
            .filter(|v| v.kind == VariableKind::Uniform)
        {
            let name = if var.name.is_empty() {
                "_anon"
            } else {
                var.name.as_str()
            };
            out.push_line(&format!(
                "// buffer({}) {} {name}",
                var.binding.unwrap_or(0),
                var.type_name
            ))?;
        }

        // `main` is reserved in Metal; the entry point gets a 0 suffix
        match stage {
            ShaderStage::Vertex => {
                out.push_line("vertex float4 main0()")?;
                out.push_line("{")?;
                out.push_line("    return float4(0.0);")?;
                out.push_line("}")?;
            }
            ShaderStage::Fragment => {
                out.push_line("fragment float4 main0()")?;
                out.push_line("{")?;
                out.push_line("    return float4(0.0);")?;
                out.push_line("}")?;
            }
            _ => {
                out.push_line(&format!("{qualifier} void main0()"))?;
                out.push_line("{")?;
                out.push_line("}")?;
            }
        }
        Ok(())
    }
}
