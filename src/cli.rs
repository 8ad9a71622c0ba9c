use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::info;

use crate::install::{EffectiveT3Install, DEFAULT_INSTALL_DIR, INSTALL_DIR_ENV};
use crate::normalize::{normalize_file, Summary};
use crate::request::InvocationRequest;
use crate::runner::EffectiveT3Runner;

pub const VERSION_BANNER: &str = concat!(
    "Wrapper v",
    env!("CARGO_PKG_VERSION"),
    ", TTSS_GUI-1.0.1.jar"
);

/// Effective T3 wrapper - predict type III secreted effectors and write a Galaxy tabular file
#[derive(Parser, Debug)]
#[command(name = "effectivet3")]
#[command(disable_version_flag = true, about, long_about = None)]
#[command(after_help = "Use -v or --version to print the wrapper version.")]
pub struct Cli {
    /// Model file name inside the install's module folder, e.g. TTSS_STD-2.0.2.jar
    #[arg(value_name = "MODEL")]
    model: String,

    /// selective, sensitive, or cutoff=<value>
    #[arg(value_name = "THRESHOLD")]
    threshold: String,

    /// Input protein FASTA file
    #[arg(value_name = "INPUT_FASTA")]
    input: PathBuf,

    /// Output tabular file
    #[arg(value_name = "OUTPUT_TABULAR")]
    output: PathBuf,

    /// Effective T3 installation folder
    #[arg(long, env = INSTALL_DIR_ENV, default_value = DEFAULT_INSTALL_DIR)]
    install_dir: PathBuf,
}

/// The version flag wins over everything else on the command line
pub fn version_requested(args: &[OsString]) -> bool {
    args.iter().skip(1).any(|a| a == "-v" || a == "--version")
}

impl Cli {
    pub fn run(self) -> Result<Summary, Box<dyn std::error::Error>> {
        let request =
            InvocationRequest::new(self.model, &self.threshold, self.input, self.output)?;

        let install = EffectiveT3Install::locate(&self.install_dir)?;
        let model = install.model(&request.model)?;
        info!(
            root = %install.root().display(),
            model = %model.display(),
            "located Effective T3 install"
        );

        let raw = EffectiveT3Runner::new(&install).run(&request)?;

        let summary = normalize_file(&raw, &request.output)?;
        println!("{summary}");

        // The tabular file stays in place so the errors can be inspected
        summary.check()?;

        Ok(summary)
    }
}
