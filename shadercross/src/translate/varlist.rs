//! Flat variable-list introspection format

use super::{collect_vertex_attributes, AttributeMap, OutputBuffer, Translator};
use crate::error::Result;
use crate::module::IrModule;
use crate::reflect::{IrReflector, Reflector, VariableKind};
use crate::stage::ShaderStage;
use crate::target::Target;

/// Emits one line per externally visible variable, for tooling that only
/// needs the interface and not a runnable shader.
#[derive(Debug)]
pub struct VarListTranslator;

impl Translator for VarListTranslator {
    fn produce(
        &self,
        module: &IrModule,
        stage: ShaderStage,
        _target: &Target,
        _source_name: &str,
        _output_name: &str,
        out: &mut OutputBuffer,
        attributes: &mut AttributeMap,
    ) -> Result<()> {
        let doc = IrReflector.reflect(module)?;
        collect_vertex_attributes(&doc, stage, attributes);

        out.push_line(&format!("{stage} shader:"))?;
        for var in &doc.variables {
            let keyword = match var.kind {
                VariableKind::Input => "in",
                VariableKind::Output => "out",
                VariableKind::Uniform => "uniform",
                VariableKind::PushConstant => "push_constant",
            };
            let name = if var.name.is_empty() {
                "_anon"
            } else {
                var.name.as_str()
            };
            let mut line = format!("{keyword} {} {name};", var.type_name);
            if let Some(location) = var.location {
                line.push_str(&format!(" location={location}"));
            }
            if let Some(set) = var.set {
                line.push_str(&format!(" set={set}"));
            }
            if let Some(binding) = var.binding {
                line.push_str(&format!(" binding={binding}"));
            }
            out.push_line(&line)?;
        }
        Ok(())
    }
}
