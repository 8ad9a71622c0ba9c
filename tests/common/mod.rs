//! Common test utilities

#![allow(dead_code)]

use assert_cmd::{cargo_bin_cmd, Command};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const MODEL: &str = "TTSS_STD-2.0.2.jar";

/// Stand-in for `java -jar TTSS_GUI-1.0.1.jar`.
///
/// Copies `$STUB_OUTPUT` to the `-o` path, records its arguments and working
/// directory, and fails like the real tool when it is not run from the install
/// root. `STUB_EXIT`, `STUB_STDOUT` and `STUB_STDERR` simulate failures;
/// `STUB_SKIP_OUTPUT` makes it exit cleanly without writing anything.
const JAVA_STUB: &str = r#"#!/bin/sh
out=""
for arg in "$@"; do
  if [ "$prev" = "-o" ]; then out="$arg"; fi
  prev="$arg"
done
printf '%s\n' "$@" > "$STUB_LOG"
pwd > "$STUB_LOG.cwd"
if [ ! -d module ]; then
  echo 'Exception in thread "main" java.io.FileNotFoundException: module' >&2
  exit 1
fi
if [ -n "$STUB_STDOUT" ]; then printf '%s' "$STUB_STDOUT"; fi
if [ -n "$STUB_STDERR" ]; then printf '%s' "$STUB_STDERR" >&2; fi
if [ -n "$STUB_EXIT" ]; then exit "$STUB_EXIT"; fi
if [ -z "$STUB_SKIP_OUTPUT" ]; then cat "$STUB_OUTPUT" > "$out"; fi
exit 0
"#;

/// A throwaway Effective T3 installation with a stubbed `java` on `PATH`
pub struct Fixture {
    dir: TempDir,
    root: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        // The wrapper resolves relative paths against the physical cwd
        let root = fs::canonicalize(dir.path()).unwrap();
        let fixture = Self { dir, root };

        let install = fixture.install_dir();
        fs::create_dir_all(install.join("module")).unwrap();
        fs::write(install.join("TTSS_GUI-1.0.1.jar"), b"").unwrap();
        fs::write(install.join("module").join(MODEL), b"").unwrap();
        fs::write(install.join("module").join("TTSS_ANIMAL-1.0.1.jar"), b"").unwrap();

        let bin = fixture.bin_dir();
        fs::create_dir_all(&bin).unwrap();
        let java = bin.join("java");
        fs::write(&java, JAVA_STUB).unwrap();
        fs::set_permissions(&java, fs::Permissions::from_mode(0o755)).unwrap();

        fs::write(fixture.input(), ">p1 first\nMKVLA\n>p2\nMSTNP\n").unwrap();
        fixture.set_raw_output("");

        fixture
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn install_dir(&self) -> PathBuf {
        self.root().join("effectivet3")
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.root().join("bin")
    }

    pub fn input(&self) -> PathBuf {
        self.root().join("proteins.fasta")
    }

    pub fn output(&self) -> PathBuf {
        self.root().join("out.tabular")
    }

    pub fn temp_output(&self) -> PathBuf {
        self.root().join("out.tabular.tmp")
    }

    fn raw_output_path(&self) -> PathBuf {
        self.root().join("raw.txt")
    }

    pub fn stub_log(&self) -> PathBuf {
        self.root().join("java.args")
    }

    /// What the stubbed tool writes to its `-o` file
    pub fn set_raw_output(&self, content: &str) {
        fs::write(self.raw_output_path(), content).unwrap();
    }

    pub fn stub_args(&self) -> Vec<String> {
        fs::read_to_string(self.stub_log())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn stub_cwd(&self) -> PathBuf {
        let mut cwd = self.stub_log().into_os_string();
        cwd.push(".cwd");
        PathBuf::from(fs::read_to_string(cwd).unwrap().trim())
    }

    /// The wrapper with the fixture's environment but no arguments
    pub fn command(&self) -> Command {
        let path = std::env::var_os("PATH").unwrap_or_default();
        let mut paths = vec![self.bin_dir()];
        paths.extend(std::env::split_paths(&path));

        let mut cmd = cargo_bin_cmd!("effectivet3");
        cmd.env("PATH", std::env::join_paths(paths).unwrap())
            .env("EFFECTIVET3", self.install_dir())
            .env("STUB_OUTPUT", self.raw_output_path())
            .env("STUB_LOG", self.stub_log())
            .env_remove("RUST_LOG")
            .current_dir(self.root());
        cmd
    }

    /// The wrapper invoked with a full, valid argument list
    pub fn run(&self, threshold: &str) -> Command {
        let mut cmd = self.command();
        cmd.args([MODEL, threshold, "proteins.fasta", "out.tabular"]);
        cmd
    }
}
