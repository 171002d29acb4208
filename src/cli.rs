//! CLI argument parsing for the lexical model compiler.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "kmlmc",
    version,
    about = "Compile lexical models into a model script, package and model_info",
    after_help = "Run from a model's build/ folder, or pass --dir.\n\nExamples:\n  kmlmc build\n  kmlmc build --dir release/demo/en.sample/build --verbose\n  kmlmc identify --json",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile the model in a build directory into script, package and model_info
    Build(BuildArgs),
    /// Resolve the model identifier and its group/author/language location
    Identify(IdentifyArgs),
}

/// Build command inputs for a single model.
#[derive(Parser, Debug)]
#[command(about = "Build the model script, package and model_info")]
pub struct BuildArgs {
    /// Build directory (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Model source description (defaults to ../source/<id>.model.json)
    #[arg(long, value_name = "PATH")]
    pub model_source: Option<PathBuf>,

    /// Compiler config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Transpiler command line for custom sources (overrides config)
    #[arg(long, value_name = "CMD")]
    pub transpiler: Option<String>,

    /// Enable debug logging
    #[arg(long)]
    pub verbose: bool,
}

/// Identify command inputs.
#[derive(Parser, Debug)]
#[command(about = "Resolve and check the model identifier for a build directory")]
pub struct IdentifyArgs {
    /// Build directory (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub verbose: bool,
}

impl Command {
    pub fn verbose(&self) -> bool {
        match self {
            Command::Build(args) => args.verbose,
            Command::Identify(args) => args.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_consistent_and_documented() {
        let command = RootArgs::command();
        command.clone().debug_assert();
        for sub in command.get_subcommands() {
            assert!(sub.get_about().is_some(), "{} lacks help", sub.get_name());
        }
    }

    #[test]
    fn build_flags_parse() {
        let args = RootArgs::try_parse_from([
            "kmlmc",
            "build",
            "--dir",
            "g/demo/en.sample/build",
            "--transpiler",
            "tsc --stdin",
            "--verbose",
        ])
        .expect("parse");
        assert!(args.command.verbose());
        match args.command {
            Command::Build(build) => {
                assert_eq!(build.transpiler.as_deref(), Some("tsc --stdin"));
                assert!(build.model_source.is_none());
            }
            Command::Identify(_) => panic!("expected build"),
        }
    }
}
