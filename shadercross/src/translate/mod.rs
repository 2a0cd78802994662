//! Translator protocol and backend dispatch
//!
//! One backend per target representation. Dispatch is an exhaustive match
//! over the closed `TargetLang` set; an unmapped kind is a configuration
//! error surfaced before any backend runs.

mod agal;
mod glsl;
mod hlsl;
mod metal;
mod spirv;
mod varlist;

pub use agal::AgalTranslator;
pub use glsl::GlslTranslator;
pub use hlsl::HlslTranslator;
pub use metal::MetalTranslator;
pub use spirv::SpirvTranslator;
pub use varlist::VarListTranslator;

use crate::error::{Error, Result};
use crate::module::IrModule;
use crate::reflect::{ReflectionDocument, VariableKind};
use crate::stage::ShaderStage;
use crate::target::{Target, TargetLang};
use std::collections::BTreeMap;

/// Upper bound on generated text per stage
pub const MAX_OUTPUT_LEN: usize = 1024 * 1024;

/// Symbol-to-integer side channel filled during translation, e.g. vertex
/// attribute locations consumed by the embedding application.
pub type AttributeMap = BTreeMap<String, i32>;

/// Per-call, range-checked text buffer for generated source.
///
/// Grows dynamically but never past its capacity; exceeding it is a fatal
/// `OutputOverflow`, never silent truncation.
#[derive(Debug)]
pub struct OutputBuffer {
    text: String,
    limit: usize,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::with_limit(MAX_OUTPUT_LEN)
    }

    pub fn with_limit(limit: usize) -> Self {
        OutputBuffer {
            text: String::new(),
            limit,
        }
    }

    /// Appends text, failing if the capacity would be exceeded
    pub fn push_str(&mut self, s: &str) -> Result<()> {
        if self.text.len() + s.len() > self.limit {
            return Err(Error::OutputOverflow { limit: self.limit });
        }
        self.text.push_str(s);
        Ok(())
    }

    /// Appends text followed by a newline
    pub fn push_line(&mut self, s: &str) -> Result<()> {
        self.push_str(s)?;
        self.push_str("\n")
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// A backend that emits one target representation's source text from a
/// decoded module.
///
/// The execution role comes from `stage`, not from module contents; role
/// cannot always be inferred reliably from IR alone. A backend fails with
/// `Error::Translation` when it meets an IR construct it cannot represent.
pub trait Translator: std::fmt::Debug {
    fn produce(
        &self,
        module: &IrModule,
        stage: ShaderStage,
        target: &Target,
        source_name: &str,
        output_name: &str,
        out: &mut OutputBuffer,
        attributes: &mut AttributeMap,
    ) -> Result<()>;
}

/// Selects the backend for a target representation.
///
/// Exhaustive over the closed set; `JavaScript` has no backend and is a
/// configuration error.
pub fn translator_for(lang: TargetLang) -> Result<Box<dyn Translator>> {
    debug_log!("dispatching target language {lang:?}");
    match lang {
        TargetLang::SpirV => Ok(Box::new(SpirvTranslator)),
        TargetLang::Glsl => Ok(Box::new(GlslTranslator)),
        TargetLang::Hlsl => Ok(Box::new(HlslTranslator)),
        TargetLang::Metal => Ok(Box::new(MetalTranslator)),
        TargetLang::Agal => Ok(Box::new(AgalTranslator)),
        TargetLang::VarList => Ok(Box::new(VarListTranslator)),
        TargetLang::JavaScript => Err(Error::Unsupported("JavaScript".to_string())),
    }
}

/// Records vertex-stage input locations into the attribute side channel.
/// Inputs without an explicit location get the next free slot in
/// declaration order.
pub(crate) fn collect_vertex_attributes(
    doc: &ReflectionDocument,
    stage: ShaderStage,
    attributes: &mut AttributeMap,
) {
    if stage != ShaderStage::Vertex {
        return;
    }
    let mut next = 0i32;
    for var in doc.variables.iter().filter(|v| v.kind == VariableKind::Input) {
        let location = match var.location {
            Some(loc) => loc as i32,
            None => next,
        };
        next = next.max(location + 1);
        if !var.name.is_empty() {
            attributes.insert(var.name.clone(), location);
        }
    }
}
