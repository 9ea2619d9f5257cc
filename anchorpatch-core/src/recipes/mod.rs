//! Named operation lists that ship with the binary.

use std::path::PathBuf;

use crate::operation::PatchOperation;

pub mod pwa;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub name: String,
    /// Target used when the caller does not name one.
    pub target: PathBuf,
    pub operations: Vec<PatchOperation>,
}

pub fn builtin_names() -> &'static [&'static str] {
    &[pwa::NAME]
}

pub fn builtin(name: &str) -> Option<Recipe> {
    match name {
        pwa::NAME => Some(pwa::recipe()),
        _ => None,
    }
}
