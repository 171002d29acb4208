//! Command handlers wiring the CLI to the build pipeline.
use crate::build::{build_model, BuildContext, Collaborators, ModelSourceInput};
use crate::cli::{BuildArgs, IdentifyArgs};
use crate::config::resolve_config;
use crate::identity::resolve_identity;
use crate::layout::BuildPaths;
use crate::package::KpsPackageCompiler;
use crate::transpile::{CommandTranspiler, PassthroughTranspiler, Transpiler};
use crate::trie::WordListTrieBuilder;
use crate::util::{display_path, normalize_lexically};
use crate::vfs::OsFilesystem;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

fn build_dir(dir: Option<&Path>) -> Result<PathBuf> {
    let dir = match dir {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir().context("resolve current directory")?,
    };
    if dir.is_absolute() {
        return Ok(dir);
    }
    let cwd = std::env::current_dir().context("resolve current directory")?;
    Ok(normalize_lexically(&cwd.join(dir)))
}

pub fn run_build(args: BuildArgs) -> Result<()> {
    let build_dir = build_dir(args.dir.as_deref())?;
    let paths = BuildPaths::new(build_dir.clone())?;
    let fs = OsFilesystem;
    let config = resolve_config(&fs, args.config.as_deref(), &paths.project_config_path())?;

    let command = args.transpiler.as_deref().or(config.transpiler.as_deref());
    let transpiler: Box<dyn Transpiler> = match command {
        Some(command) => Box::new(CommandTranspiler::from_command_line(command)?),
        None => Box::new(PassthroughTranspiler),
    };
    let trie_builder = WordListTrieBuilder::default();
    let package_compiler = KpsPackageCompiler;
    let collaborators = Collaborators {
        transpiler: transpiler.as_ref(),
        trie_builder: &trie_builder,
        package_compiler: &package_compiler,
    };

    let ctx = BuildContext {
        fs: &fs,
        build_dir,
        now: chrono::Utc::now(),
    };
    let input = match args.model_source {
        Some(path) => ModelSourceInput::File(path),
        None => ModelSourceInput::Layout,
    };
    let outcome = build_model(&ctx, &collaborators, &config, input)?;

    let cwd = std::env::current_dir().ok();
    for path in [
        &outcome.script_path,
        &outcome.package_path,
        &outcome.manifest_path,
    ] {
        println!("wrote {}", display_path(path, cwd.as_deref()));
    }
    Ok(())
}

pub fn run_identify(args: IdentifyArgs) -> Result<()> {
    let paths = BuildPaths::new(build_dir(args.dir.as_deref())?)?;
    let identity = resolve_identity(&OsFilesystem, &paths)?;
    if args.json {
        let text = serde_json::to_string_pretty(&identity).context("serialize identity")?;
        println!("{text}");
    } else {
        println!("{} ({})", identity.id, identity.location.source_path());
    }
    Ok(())
}
