//! Word-level constants of the binary IR schema
//!
//! Only the opcodes and enumerants the decoder, reflector, and backends
//! actually inspect are named here.

/// First header word of a well-formed module
pub const MAGIC: u32 = 0x0723_0203;

/// Number of fixed header words (magic, version, generator, bound, schema)
pub const HEADER_WORDS: usize = 5;

// Opcodes
pub const OP_NAME: u16 = 5;
pub const OP_MEMBER_NAME: u16 = 6;
pub const OP_ENTRY_POINT: u16 = 15;
pub const OP_EXECUTION_MODE: u16 = 16;
pub const OP_CAPABILITY: u16 = 17;
pub const OP_TYPE_VOID: u16 = 19;
pub const OP_TYPE_BOOL: u16 = 20;
pub const OP_TYPE_INT: u16 = 21;
pub const OP_TYPE_FLOAT: u16 = 22;
pub const OP_TYPE_VECTOR: u16 = 23;
pub const OP_TYPE_MATRIX: u16 = 24;
pub const OP_TYPE_IMAGE: u16 = 25;
pub const OP_TYPE_SAMPLER: u16 = 26;
pub const OP_TYPE_SAMPLED_IMAGE: u16 = 27;
pub const OP_TYPE_ARRAY: u16 = 28;
pub const OP_TYPE_STRUCT: u16 = 30;
pub const OP_TYPE_POINTER: u16 = 32;
pub const OP_VARIABLE: u16 = 59;
pub const OP_DECORATE: u16 = 71;

// Storage classes (second operand of OP_VARIABLE)
pub const STORAGE_UNIFORM_CONSTANT: u32 = 0;
pub const STORAGE_INPUT: u32 = 1;
pub const STORAGE_UNIFORM: u32 = 2;
pub const STORAGE_OUTPUT: u32 = 3;
pub const STORAGE_PUSH_CONSTANT: u32 = 9;

// Decorations (second operand of OP_DECORATE)
pub const DECORATION_LOCATION: u32 = 30;
pub const DECORATION_BINDING: u32 = 33;
pub const DECORATION_DESCRIPTOR_SET: u32 = 34;

// Capabilities (single operand of OP_CAPABILITY)
pub const CAPABILITY_SHADER: u32 = 1;

/// Returns the mnemonic for opcodes this crate knows by name
pub fn opcode_name(opcode: u16) -> Option<&'static str> {
    match opcode {
        OP_NAME => Some("OpName"),
        OP_MEMBER_NAME => Some("OpMemberName"),
        OP_ENTRY_POINT => Some("OpEntryPoint"),
        OP_EXECUTION_MODE => Some("OpExecutionMode"),
        OP_CAPABILITY => Some("OpCapability"),
        OP_TYPE_VOID => Some("OpTypeVoid"),
        OP_TYPE_BOOL => Some("OpTypeBool"),
        OP_TYPE_INT => Some("OpTypeInt"),
        OP_TYPE_FLOAT => Some("OpTypeFloat"),
        OP_TYPE_VECTOR => Some("OpTypeVector"),
        OP_TYPE_MATRIX => Some("OpTypeMatrix"),
        OP_TYPE_IMAGE => Some("OpTypeImage"),
        OP_TYPE_SAMPLER => Some("OpTypeSampler"),
        OP_TYPE_SAMPLED_IMAGE => Some("OpTypeSampledImage"),
        OP_TYPE_ARRAY => Some("OpTypeArray"),
        OP_TYPE_STRUCT => Some("OpTypeStruct"),
        OP_TYPE_POINTER => Some("OpTypePointer"),
        OP_VARIABLE => Some("OpVariable"),
        OP_DECORATE => Some("OpDecorate"),
        _ => None,
    }
}

/// Decodes a packed literal string operand (UTF-8, NUL-terminated,
/// little-endian packed four bytes per word). Returns the string and the
/// number of words it occupied.
pub fn decode_literal_string(words: &[u32]) -> (String, usize) {
    let mut bytes = Vec::new();
    let mut used = 0;
    'outer: for &word in words {
        used += 1;
        for byte in word.to_le_bytes() {
            if byte == 0 {
                break 'outer;
            }
            bytes.push(byte);
        }
    }
    (String::from_utf8_lossy(&bytes).into_owned(), used)
}

/// Encodes a literal string into packed words, including the terminating NUL
pub fn encode_literal_string(s: &str) -> Vec<u32> {
    let mut bytes: Vec<u8> = s.as_bytes().to_vec();
    bytes.push(0);
    while bytes.len() % 4 != 0 {
        bytes.push(0);
    }
    bytes
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}
