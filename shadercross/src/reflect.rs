//! Interface reflection
//!
//! Produces a structured document describing a module's externally visible
//! interface: inputs, outputs, uniforms, and their bindings. The JSON
//! rendering is the compatibility text form embedding applications consume.

use crate::error::{Error, Result};
use crate::module::IrModule;
use crate::spv;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How a variable is exposed to the embedding application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableKind {
    Input,
    Output,
    Uniform,
    PushConstant,
}

/// One externally visible shader variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceVariable {
    /// Debug name, empty when the module carries none
    pub name: String,
    /// Resolved type name (e.g. `vec4`, `mat4`, `sampler`)
    #[serde(rename = "type")]
    pub type_name: String,
    pub kind: VariableKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binding: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set: Option<u32>,
}

/// Structured description of a shader's externally visible interface
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflectionDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_point: Option<String>,
    pub variables: Vec<InterfaceVariable>,
}

impl ReflectionDocument {
    /// Renders the document as JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Reflection {
            message: e.to_string(),
        })
    }
}

/// The reflection collaborator consumed by the pipeline
pub trait Reflector {
    fn reflect(&self, module: &IrModule) -> Result<ReflectionDocument>;
}

#[derive(Debug, Clone, Copy, Default)]
struct Decorations {
    location: Option<u32>,
    binding: Option<u32>,
    set: Option<u32>,
}

/// Default reflector: walks the module's name, decoration, type, and
/// variable instructions.
#[derive(Debug, Clone, Copy, Default)]
pub struct IrReflector;

impl IrReflector {
    fn type_name(types: &HashMap<u32, (u16, Vec<u32>)>, id: u32, depth: u8) -> String {
        if depth > 8 {
            return "unknown".to_string();
        }
        let Some((opcode, operands)) = types.get(&id) else {
            return "unknown".to_string();
        };
        match *opcode {
            spv::OP_TYPE_VOID => "void".to_string(),
            spv::OP_TYPE_BOOL => "bool".to_string(),
            spv::OP_TYPE_INT => {
                // operands: width, signedness
                if operands.get(2).copied() == Some(0) {
                    "uint".to_string()
                } else {
                    "int".to_string()
                }
            }
            spv::OP_TYPE_FLOAT => "float".to_string(),
            spv::OP_TYPE_VECTOR => {
                // operands: component type, count
                let count = operands.get(2).copied().unwrap_or(0);
                let component = Self::type_name(types, operands.get(1).copied().unwrap_or(0), depth + 1);
                match component.as_str() {
                    "float" => format!("vec{count}"),
                    "int" => format!("ivec{count}"),
                    "uint" => format!("uvec{count}"),
                    "bool" => format!("bvec{count}"),
                    other => format!("{other}x{count}"),
                }
            }
            spv::OP_TYPE_MATRIX => {
                let count = operands.get(2).copied().unwrap_or(0);
                format!("mat{count}")
            }
            spv::OP_TYPE_IMAGE => "image".to_string(),
            spv::OP_TYPE_SAMPLER => "sampler".to_string(),
            spv::OP_TYPE_SAMPLED_IMAGE => "sampledImage".to_string(),
            spv::OP_TYPE_ARRAY => {
                let element = Self::type_name(types, operands.get(1).copied().unwrap_or(0), depth + 1);
                format!("{element}[]")
            }
            spv::OP_TYPE_STRUCT => "struct".to_string(),
            spv::OP_TYPE_POINTER => {
                // operands: result id, storage class, pointee
                Self::type_name(types, operands.get(2).copied().unwrap_or(0), depth + 1)
            }
            _ => "unknown".to_string(),
        }
    }
}

impl Reflector for IrReflector {
    fn reflect(&self, module: &IrModule) -> Result<ReflectionDocument> {
        let mut names: HashMap<u32, String> = HashMap::new();
        let mut decorations: HashMap<u32, Decorations> = HashMap::new();
        // type id -> (opcode, full operand words including the result id)
        let mut types: HashMap<u32, (u16, Vec<u32>)> = HashMap::new();
        let mut entry_point = None;
        let mut variables = Vec::new();

        for inst in module.instructions() {
            let operands = module.operands(inst);
            match inst.opcode {
                spv::OP_NAME if operands.len() >= 2 => {
                    let (name, _) = spv::decode_literal_string(&operands[1..]);
                    names.insert(operands[0], name);
                }
                spv::OP_DECORATE if operands.len() >= 2 => {
                    let entry = decorations.entry(operands[0]).or_default();
                    let literal = operands.get(2).copied();
                    match operands[1] {
                        spv::DECORATION_LOCATION => entry.location = literal,
                        spv::DECORATION_BINDING => entry.binding = literal,
                        spv::DECORATION_DESCRIPTOR_SET => entry.set = literal,
                        _ => {}
                    }
                }
                spv::OP_ENTRY_POINT if operands.len() >= 3 => {
                    let (name, _) = spv::decode_literal_string(&operands[2..]);
                    entry_point = Some(name);
                }
                opcode @ (spv::OP_TYPE_VOID
                | spv::OP_TYPE_BOOL
                | spv::OP_TYPE_INT
                | spv::OP_TYPE_FLOAT
                | spv::OP_TYPE_VECTOR
                | spv::OP_TYPE_MATRIX
                | spv::OP_TYPE_IMAGE
                | spv::OP_TYPE_SAMPLER
                | spv::OP_TYPE_SAMPLED_IMAGE
                | spv::OP_TYPE_ARRAY
                | spv::OP_TYPE_STRUCT
                | spv::OP_TYPE_POINTER)
                    if !operands.is_empty() =>
                {
                    types.insert(operands[0], (opcode, operands.to_vec()));
                }
                spv::OP_VARIABLE if operands.len() >= 3 => {
                    let kind = match operands[2] {
                        spv::STORAGE_INPUT => VariableKind::Input,
                        spv::STORAGE_OUTPUT => VariableKind::Output,
                        spv::STORAGE_UNIFORM | spv::STORAGE_UNIFORM_CONSTANT => {
                            VariableKind::Uniform
                        }
                        spv::STORAGE_PUSH_CONSTANT => VariableKind::PushConstant,
                        _ => continue,
                    };
                    let id = operands[1];
                    let deco = decorations.get(&id).copied().unwrap_or_default();
                    variables.push(InterfaceVariable {
                        name: names.get(&id).cloned().unwrap_or_default(),
                        type_name: Self::type_name(&types, operands[0], 0),
                        kind,
                        location: deco.location,
                        binding: deco.binding,
                        set: deco.set,
                    });
                }
                _ => {}
            }
        }

        Ok(ReflectionDocument {
            entry_point,
            variables,
        })
    }
}
