//! Textual listing of the portable binary IR

use super::{AttributeMap, OutputBuffer, Translator};
use crate::error::Result;
use crate::module::IrModule;
use crate::spv;
use crate::stage::ShaderStage;
use crate::target::Target;

/// Emits the module itself as an annotated word listing, one instruction per
/// line. The header is carried as comments so a listing is self-describing.
#[derive(Debug)]
pub struct SpirvTranslator;

impl Translator for SpirvTranslator {
    fn produce(
        &self,
        module: &IrModule,
        _stage: ShaderStage,
        _target: &Target,
        source_name: &str,
        _output_name: &str,
        out: &mut OutputBuffer,
        _attributes: &mut AttributeMap,
    ) -> Result<()> {
        out.push_line("; SPIR-V")?;
        if !source_name.is_empty() {
            out.push_line(&format!("; Source: {source_name}"))?;
        }
        out.push_line(&format!(
            "; Version: {}.{}",
            module.version_major(),
            module.version_minor()
        ))?;
        out.push_line(&format!("; Generator: {}", module.generator))?;
        out.push_line(&format!("; Bound: {}", module.bound))?;
        out.push_line(&format!("; Schema: {}", module.schema))?;

        for inst in module.instructions() {
            let mut line = match spv::opcode_name(inst.opcode) {
                Some(name) => name.to_string(),
                None => format!("Op#{}", inst.opcode),
            };
            for word in module.operands(inst) {
                line.push_str(&format!(" 0x{word:08x}"));
            }
            out.push_line(&line)?;
        }
        Ok(())
    }
}
