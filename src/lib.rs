//! Lexical model compiler: turns a model folder's sources and metadata into
//! a model script, a distributable package and a merged `model_info`.
pub mod build;
pub mod cli;
pub mod codegen;
pub mod config;
pub mod error;
pub mod identity;
pub mod layout;
pub mod manifest;
pub mod metadata;
pub mod package;
pub mod source;
pub mod transpile;
pub mod trie;
pub mod util;
pub mod vfs;
pub mod workflow;

#[cfg(test)]
mod test_support;
