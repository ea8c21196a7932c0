//! Shared fixtures for integration tests.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use jobsplit::SplitterConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Two items with one metadata line and a matching footer.
pub const SAMPLE: &str = "JOB|J1|extra\n\
META_A|x\n\
CLNT_CORR|1\n\
CLNT_ROLE|r1\n\
PLAN|p1\n\
CLNT_CORR|2\n\
PLAN|p2\n\
CLNT_ROLE|r2\n\
FOOTER|J1|2\n";

/// Builds a well-formed input with `items` items.
pub fn sample_with_items(job: &str, items: usize) -> String {
    let mut text = format!("JOB|{job}|x\nMETA_SRC|test\n");
    for n in 1..=items {
        text.push_str(&format!("CLNT_CORR|{n}\nCLNT_ROLE|r{n}\nPLAN|p{n}\n"));
    }
    text.push_str(&format!("FOOTER|{job}|{items}\n"));
    text
}

/// Scratch workspace with `csvinput/` and `csvoutput/` beneath it.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn input_dir(&self) -> PathBuf {
        self.root().join("csvinput")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root().join("csvoutput")
    }

    /// Writes `bytes` as `csvinput/<name>`.
    pub fn write_input(&self, name: &str, bytes: &[u8]) -> PathBuf {
        fs::create_dir_all(self.input_dir()).unwrap();
        let path = self.input_dir().join(name);
        fs::write(&path, bytes).unwrap();
        path
    }

    /// Default configuration anchored at the workspace.
    pub fn config(&self, input_name: &str, items_per_file: i64) -> SplitterConfig {
        SplitterConfig::for_app_dir(self.root())
            .with_input_filename(input_name)
            .with_items_per_file(items_per_file)
    }

    /// Sorted file names in the output directory.
    pub fn output_files(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(self.output_dir()) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    pub fn read_output(&self, name: &str) -> String {
        fs::read_to_string(self.output_dir().join(name)).unwrap()
    }
}
