//! HLSL backend

use super::{collect_vertex_attributes, AttributeMap, OutputBuffer, Translator};
use crate::error::Result;
use crate::module::IrModule;
use crate::reflect::{IrReflector, Reflector, VariableKind};
use crate::stage::ShaderStage;
use crate::target::Target;

fn hlsl_type(name: &str) -> &str {
    match name {
        "vec2" => "float2",
        "vec3" => "float3",
        "vec4" => "float4",
        "ivec2" => "int2",
        "ivec3" => "int3",
        "ivec4" => "int4",
        "uvec2" => "uint2",
        "uvec3" => "uint3",
        "uvec4" => "uint4",
        "mat2" => "float2x2",
        "mat3" => "float3x3",
        "mat4" => "float4x4",
        other => other,
    }
}

/// Emits HLSL: resource declarations from the module's reflection and a
/// stage-appropriate entry-point skeleton.
#[derive(Debug)]
pub struct HlslTranslator;

impl Translator for HlslTranslator {
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

        out.push_line(&format!("// HLSL {}", target.version))?;

        let mut cbuffer_fields = Vec::new();
        for var in &doc.variables {
            if var.kind != VariableKind::Uniform && var.kind != VariableKind::PushConstant {
                continue;
            }
            let name = if var.name.is_empty() {
                "_anon"
            } else {
                var.name.as_str()
            };
            match var.type_name.as_str() {
                "sampler" => out.push_line(&format!(
                    "SamplerState {name} : register(s{});",
                    var.binding.unwrap_or(0)
                ))?,
                "image" | "sampledImage" => out.push_line(&format!(
                    "Texture2D {name} : register(t{});",
                    var.binding.unwrap_or(0)
                ))?,
                other => cbuffer_fields.push(format!("    {} {name};", hlsl_type(other))),
            }
        }
        if !cbuffer_fields.is_empty() {
            out.push_line("cbuffer Globals : register(b0)")?;
            out.push_line("{")?;
            for field in &cbuffer_fields {
                out.push_line(field)?;
            }
            out.push_line("};")?;
        }

        out.push_line("")?;
        match stage {
            ShaderStage::Vertex => {
                out.push_line("float4 main() : SV_POSITION")?;
                out.push_line("{")?;
                out.push_line("    return float4(0.0, 0.0, 0.0, 1.0);")?;
                out.push_line("}")?;
            }
            ShaderStage::Fragment => {
                out.push_line("float4 main() : SV_TARGET")?;
                out.push_line("{")?;
                out.push_line("    return float4(0.0, 0.0, 0.0, 0.0);")?;
                out.push_line("}")?;
            }
            ShaderStage::Compute => {
                out.push_line("[numthreads(1, 1, 1)]")?;
                out.push_line("void main(uint3 id : SV_DispatchThreadID)")?;
                out.push_line("{")?;
                out.push_line("}")?;
            }
            ShaderStage::Geometry
            | ShaderStage::TessControl
            | ShaderStage::TessEvaluation => {
                out.push_line("void main()")?;
                out.push_line("{")?;
                out.push_line("}")?;
            }
        }
        Ok(())
    }
}
