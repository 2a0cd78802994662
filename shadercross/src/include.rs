//! Include resolver trait and strategies for `#include` resolution

use std::io::{BufRead, BufReader};
use std::path::PathBuf;

/// A resolved include: the name the front-end should report for the header,
/// plus its content.
///
/// Single-owner value; the buffer is released when the result is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeResult {
    /// Resolved header name (shown in front-end diagnostics)
    pub name: String,
    /// Header content
    pub content: Vec<u8>,
}

impl IncludeResult {
    /// Creates a result with an exactly-sized content buffer
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        let mut content = content.into();
        content.shrink_to_fit();
        IncludeResult {
            name: name.into(),
            content,
        }
    }
}

/// Trait for header resolution during front-end parsing
///
/// Returning `None` reports the header as not found, leaving the front-end
/// to surface its own unresolved-include diagnostic.
pub trait IncludeResolver {
    /// Resolves `#include <name>`
    fn resolve_system(&mut self, name: &str) -> Option<IncludeResult>;

    /// Resolves `#include "name"`
    fn resolve_local(&mut self, name: &str) -> Option<IncludeResult>;
}

/// Resolver that delegates to a caller-supplied function.
///
/// The callback receives the header name and whether the include was local,
/// and returns the resolved name plus content. Content is copied into a
/// freshly owned, exactly-sized buffer.
pub struct CallbackResolver<F>
where
    F: FnMut(&str, bool) -> (String, String),
{
    callback: F,
}

impl<F> CallbackResolver<F>
where
    F: FnMut(&str, bool) -> (String, String),
{
    pub fn new(callback: F) -> Self {
        CallbackResolver { callback }
    }
}

impl<F> IncludeResolver for CallbackResolver<F>
where
    F: FnMut(&str, bool) -> (String, String),
{
    fn resolve_system(&mut self, name: &str) -> Option<IncludeResult> {
        let (resolved, content) = (self.callback)(name, false);
        Some(IncludeResult::new(resolved, content.into_bytes()))
    }

    fn resolve_local(&mut self, name: &str) -> Option<IncludeResult> {
        let (resolved, content) = (self.callback)(name, true);
        Some(IncludeResult::new(resolved, content.into_bytes()))
    }
}

/// Resolver that reads headers from a base directory.
///
/// The header name is joined onto the base path and the file is read line by
/// line with every line ending normalized to `\n`. A header that cannot be
/// opened resolves to an empty-content result rather than "not found"; the
/// front-end then parses an empty header without raising a diagnostic.
#[derive(Debug, Clone)]
pub struct DirectoryResolver {
    dir: PathBuf,
}

impl DirectoryResolver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirectoryResolver { dir: dir.into() }
    }

    fn read_normalized(&self, name: &str) -> (String, Vec<u8>) {
        let path = self.dir.join(name);
        let resolved = path.to_string_lossy().into_owned();
        let mut content = Vec::new();
        if let Ok(file) = std::fs::File::open(&path) {
            let mut reader = BufReader::new(file);
            let mut line = String::new();
            while let Ok(n) = reader.read_line(&mut line) {
                if n == 0 {
                    break;
                }
                let trimmed = line.trim_end_matches('\n').trim_end_matches('\r');
                content.extend_from_slice(trimmed.as_bytes());
                content.push(b'\n');
                line.clear();
            }
        }
        (resolved, content)
    }
}

impl IncludeResolver for DirectoryResolver {
    fn resolve_system(&mut self, name: &str) -> Option<IncludeResult> {
        self.resolve_local(name)
    }

    fn resolve_local(&mut self, name: &str) -> Option<IncludeResult> {
        let (resolved, content) = self.read_normalized(name);
        Some(IncludeResult::new(resolved, content))
    }
}

/// Resolver used when no include mechanism is configured; every resolution
/// attempt reports "not found".
#[derive(Debug, Clone, Copy, Default)]
pub struct NullResolver;

impl IncludeResolver for NullResolver {
    fn resolve_system(&mut self, _name: &str) -> Option<IncludeResult> {
        None
    }

    fn resolve_local(&mut self, _name: &str) -> Option<IncludeResult> {
        None
    }
}
