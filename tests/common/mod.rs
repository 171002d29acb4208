//! Shared test infrastructure for integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub const MODEL_ID: &str = "demo.en.sample";

pub const PACKAGE_SOURCE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Package>
  <Info>
    <Name URL="">Sample Words</Name>
    <Author URL="mailto:ann@example.com">Ann Example</Author>
    <Version URL="">1.2</Version>
  </Info>
  <Files>
    <File><Name>..\build\demo.en.sample.model.js</Name><Description>Lexical model</Description></File>
  </Files>
  <LexicalModels>
    <LexicalModel>
      <Name>Sample</Name>
      <ID>demo.en.sample</ID>
      <Languages><Language ID="en">English</Language></Languages>
    </LexicalModel>
  </LexicalModels>
</Package>
"#;

pub const TRIE_MODEL_SOURCE: &str = r#"{"format":"trie-1.0","sources":["wordlist.tsv"]}"#;

/// A model folder laid out as `<tmp>/release/demo/en.sample/{source,build}`.
pub struct ModelFixture {
    _temp_dir: TempDir,
    pub root: PathBuf,
    pub model_dir: PathBuf,
}

impl ModelFixture {
    pub fn new(model_dir_name: &str, info_json: &str, model_source: &str) -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let root = temp_dir.path().to_path_buf();
        let model_dir = root.join("release").join("demo").join(model_dir_name);
        let source_dir = model_dir.join("source");
        fs::create_dir_all(&source_dir).expect("create source dir");
        fs::create_dir_all(model_dir.join("build")).expect("create build dir");

        fs::write(model_dir.join(format!("{MODEL_ID}.model_info")), info_json)
            .expect("write model_info");
        fs::write(
            source_dir.join(format!("{MODEL_ID}.model.kps")),
            PACKAGE_SOURCE,
        )
        .expect("write kps");
        fs::write(
            source_dir.join(format!("{MODEL_ID}.model.json")),
            model_source,
        )
        .expect("write model source");
        fs::write(
            source_dir.join("wordlist.tsv"),
            "# sample\nhello\t10\nhelp\t4\nworld\t7\n",
        )
        .expect("write word list");

        Self {
            _temp_dir: temp_dir,
            root,
            model_dir,
        }
    }

    pub fn trie() -> Self {
        Self::new("en.sample", "{}", TRIE_MODEL_SOURCE)
    }

    pub fn build_dir(&self) -> PathBuf {
        self.model_dir.join("build")
    }

    pub fn output(&self, suffix: &str) -> PathBuf {
        self.build_dir().join(format!("{MODEL_ID}{suffix}"))
    }

    pub fn write_source(&self, name: &str, contents: &[u8]) {
        fs::write(self.model_dir.join("source").join(name), contents).expect("write source");
    }

    /// Run `kmlmc` from the build directory with an isolated config home.
    pub fn run(&self, args: &[&str]) -> Output {
        self.run_in(&self.build_dir(), args)
    }

    pub fn run_in(&self, cwd: &Path, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_kmlmc"))
            .args(args)
            .current_dir(cwd)
            .env("XDG_CONFIG_HOME", self.root.join("config-home"))
            .env_remove("RUST_LOG")
            .output()
            .expect("run kmlmc")
    }
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}
