//! Binary IR decoding
//!
//! Decodes one stage's flat word sequence into header fields plus an
//! instruction stream. Decoding is pure and read-only: operand views are
//! index ranges into the module's word buffer, never copies.

use crate::error::{Error, Result};
use crate::spv;
use std::ops::Range;

/// One decoded instruction: opcode, total word count, and the operand view
/// into the owning module's word buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Low half of the leading word
    pub opcode: u16,
    /// High half of the leading word; total words including the leading one,
    /// always >= 1
    pub word_count: u16,
    operands: Range<usize>,
}

impl Instruction {
    /// Number of operand words following the leading word
    pub fn operand_count(&self) -> usize {
        self.operands.len()
    }

    /// Index range of the operand words in the module buffer
    pub fn operand_range(&self) -> Range<usize> {
        self.operands.clone()
    }
}

/// A decoded per-stage IR module: 5 header words plus the instruction stream.
///
/// Invariant: instruction word counts sum to exactly the post-header buffer
/// length; a truncated trailing instruction never decodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrModule {
    /// Header magic word
    pub magic: u32,
    /// Packed version word
    pub version: u32,
    /// Generator id
    pub generator: u32,
    /// Id bound
    pub bound: u32,
    /// Reserved schema word
    pub schema: u32,
    words: Vec<u32>,
    instructions: Vec<Instruction>,
}

impl IrModule {
    /// Decodes a word buffer into a module.
    ///
    /// Starting after the 5 header words: the current word's low half is the
    /// opcode and its high half the instruction's total word count; the
    /// operands are the following `word_count - 1` words. The buffer must be
    /// consumed exactly.
    pub fn decode(words: Vec<u32>) -> Result<Self> {
        if words.len() < spv::HEADER_WORDS {
            return Err(Error::MalformedModule {
                reason: format!(
                    "{} words is shorter than the {}-word header",
                    words.len(),
                    spv::HEADER_WORDS
                ),
            });
        }
        if words[0] != spv::MAGIC {
            return Err(Error::MalformedModule {
                reason: format!("bad magic word 0x{:08x}", words[0]),
            });
        }

        let mut instructions = Vec::new();
        let mut index = spv::HEADER_WORDS;
        while index < words.len() {
            let leading = words[index];
            let opcode = (leading & 0xffff) as u16;
            let word_count = (leading >> 16) as u16;
            if word_count == 0 {
                return Err(Error::MalformedModule {
                    reason: format!("zero word count at word {index}"),
                });
            }
            let end = index + word_count as usize;
            if end > words.len() {
                return Err(Error::MalformedModule {
                    reason: format!(
                        "instruction at word {index} claims {word_count} words but only {} remain",
                        words.len() - index
                    ),
                });
            }
            instructions.push(Instruction {
                opcode,
                word_count,
                operands: index + 1..end,
            });
            index = end;
        }

        debug_log!(
            "decoded {} instructions, id bound {}",
            instructions.len(),
            words[3]
        );

        Ok(IrModule {
            magic: words[0],
            version: words[1],
            generator: words[2],
            bound: words[3],
            schema: words[4],
            words,
            instructions,
        })
    }

    /// Decodes a little-endian byte buffer, framing it into words first
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() % 4 != 0 {
            return Err(Error::MalformedModule {
                reason: format!("byte length {} is not word-aligned", bytes.len()),
            });
        }
        let words = bytes
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        Self::decode(words)
    }

    /// Major version from the packed version word
    pub fn version_major(&self) -> u32 {
        (self.version >> 16) & 0xff
    }

    /// Minor version from the packed version word
    pub fn version_minor(&self) -> u32 {
        (self.version >> 8) & 0xff
    }

    /// The full word buffer, header included
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// Decoded instructions in module order
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Materializes an instruction's operand view
    pub fn operands(&self, inst: &Instruction) -> &[u32] {
        &self.words[inst.operand_range()]
    }

    /// Rewrites every descriptor-binding decoration literal with a
    /// per-module counter starting at 0. Returns how many bindings were
    /// assigned.
    ///
    /// Decorations too short to carry a binding literal are skipped.
    /// Instruction operand ranges stay valid across the rewrite.
    pub fn auto_assign_bindings(&mut self) -> u32 {
        let mut binding = 0u32;
        for inst in &self.instructions {
            if inst.opcode != spv::OP_DECORATE || inst.operand_count() < 3 {
                continue;
            }
            let range = inst.operand_range();
            if self.words[range.start + 1] == spv::DECORATION_BINDING {
                self.words[range.start + 2] = binding;
                binding += 1;
            }
        }
        binding
    }
}
