//! AGAL backend (legacy Flash GPU assembly)

use super::{collect_vertex_attributes, AttributeMap, OutputBuffer, Translator};
use crate::error::{Error, Result};
use crate::module::IrModule;
use crate::reflect::{IrReflector, Reflector, VariableKind};
use crate::spv;
use crate::stage::ShaderStage;
use crate::target::Target;

/// Emits an AGAL register-map listing. The Flash runtime only has vertex and
/// fragment programs, and only the plain shader capability; anything else is
/// a translation error.
#[derive(Debug)]
pub struct AgalTranslator;

impl Translator for AgalTranslator {
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
        let (program, attr_prefix, const_prefix) = match stage {
            ShaderStage::Vertex => ("vertex", "va", "vc"),
            ShaderStage::Fragment => ("fragment", "v", "fc"),
            other => {
                return Err(Error::Translation {
                    target: target.to_string(),
                    message: format!("{other} stages cannot be represented in AGAL"),
                });
            }
        };

        for inst in module.instructions() {
            if inst.opcode == spv::OP_CAPABILITY {
                let capability = module.operands(inst).first().copied().unwrap_or(0);
                if capability != spv::CAPABILITY_SHADER {
                    return Err(Error::Translation {
                        target: target.to_string(),
                        message: format!("capability {capability} cannot be represented in AGAL"),
                    });
                }
            }
        }

        let doc = IrReflector.reflect(module)?;
        collect_vertex_attributes(&doc, stage, attributes);

        out.push_line(&format!("// AGAL {} {program} program", target.version))?;
        let mut attr_slot = 0;
        let mut const_slot = 0;
        for var in &doc.variables {
            let name = if var.name.is_empty() {
                "_anon"
            } else {
                var.name.as_str()
            };
            match var.kind {
                VariableKind::Input => {
                    let slot = var.location.unwrap_or(attr_slot);
                    attr_slot = attr_slot.max(slot + 1);
                    out.push_line(&format!("{attr_prefix}{slot} = {name}"))?;
                }
                VariableKind::Uniform | VariableKind::PushConstant => {
                    let slot = var.binding.unwrap_or(const_slot);
                    const_slot = const_slot.max(slot + 1);
                    out.push_line(&format!("{const_prefix}{slot} = {name}"))?;
                }
                VariableKind::Output => {}
            }
        }
        out.push_line(&format!(
            "// {} attribute registers, {} constant registers",
            attr_slot, const_slot
        ))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spv::{CAPABILITY_SHADER, MAGIC, OP_CAPABILITY};
    use crate::target::TargetLang;

    fn module_with_capability(capability: u32) -> IrModule {
        IrModule::decode(vec![
            MAGIC,
            0x0001_0000,
            0,
            4,
            0,
            (2 << 16) | OP_CAPABILITY as u32,
            capability,
        ])
        .unwrap()
    }

    fn agal() -> Target {
        Target::new(TargetLang::Agal, 100).with_es()
    }

    #[test]
    fn test_vertex_program_header() {
        let mut out = OutputBuffer::new();
        let mut attributes = AttributeMap::new();
        AgalTranslator
            .produce(
                &module_with_capability(CAPABILITY_SHADER),
                ShaderStage::Vertex,
                &agal(),
                "",
                "",
                &mut out,
                &mut attributes,
            )
            .unwrap();
        assert!(out.into_string().contains("// AGAL 100 vertex program"));
    }

    #[test]
    fn test_compute_stage_is_a_translation_error() {
        let mut out = OutputBuffer::new();
        let mut attributes = AttributeMap::new();
        let err = AgalTranslator
            .produce(
                &module_with_capability(CAPABILITY_SHADER),
                ShaderStage::Compute,
                &agal(),
                "",
                "",
                &mut out,
                &mut attributes,
            )
            .unwrap_err();
        assert!(matches!(err, Error::Translation { .. }));
    }

    #[test]
    fn test_exotic_capability_is_a_translation_error() {
        let mut out = OutputBuffer::new();
        let mut attributes = AttributeMap::new();
        let err = AgalTranslator
            .produce(
                &module_with_capability(11), // tessellation-class capability
                ShaderStage::Vertex,
                &agal(),
                "",
                "",
                &mut out,
                &mut attributes,
            )
            .unwrap_err();
        assert!(matches!(err, Error::Translation { .. }));
    }
}
