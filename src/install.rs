//! Effective T3 installation discovery

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;
use walkdir::WalkDir;

/// Environment variable Galaxy's tool dependency sets to the install root
pub const INSTALL_DIR_ENV: &str = "EFFECTIVET3";

pub const DEFAULT_INSTALL_DIR: &str = "/opt/EffectiveT3/";

pub const MAIN_JAR: &str = "TTSS_GUI-1.0.1.jar";

const MODULE_DIR: &str = "module";

#[derive(Error, Debug)]
pub enum InstallError {
    #[error("Effective T3 folder not found: {:?}", .0.display().to_string())]
    FolderNotFound(PathBuf),

    #[error("Effective T3 JAR file not found: {:?}", .0.display().to_string())]
    JarNotFound(PathBuf),

    #[error("Effective T3 module folder not found: {:?}", .0.display().to_string())]
    ModuleFolderNotFound(PathBuf),

    #[error(
        "Effective T3 model JAR file not found: {:?}\nContents of {:?} is {}\nMain JAR was found: {:?}",
        .model.display().to_string(),
        .module_dir.display().to_string(),
        format_listing(.available),
        .jar.display().to_string()
    )]
    ModelNotFound {
        model: PathBuf,
        module_dir: PathBuf,
        jar: PathBuf,
        available: Vec<String>,
    },
}

/// A located Effective T3 installation
#[derive(Debug)]
pub struct EffectiveT3Install {
    root: PathBuf,
    jar: PathBuf,
    module_dir: PathBuf,
}

impl EffectiveT3Install {
    /// Check the install root holds the main JAR and the model folder
    pub fn locate(root: impl Into<PathBuf>) -> Result<Self, InstallError> {
        let root = root.into();

        if !root.is_dir() {
            return Err(InstallError::FolderNotFound(root));
        }

        let jar = root.join(MAIN_JAR);
        if !jar.is_file() {
            return Err(InstallError::JarNotFound(jar));
        }

        let module_dir = root.join(MODULE_DIR);
        if !module_dir.is_dir() {
            return Err(InstallError::ModuleFolderNotFound(module_dir));
        }

        Ok(Self {
            root,
            jar,
            module_dir,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn jar(&self) -> &Path {
        &self.jar
    }

    /// Resolve a model by file name inside the module folder
    pub fn model(&self, name: &str) -> Result<PathBuf, InstallError> {
        let model = self.module_dir.join(name);
        if model.is_file() {
            return Ok(model);
        }

        Err(InstallError::ModelNotFound {
            model,
            module_dir: self.module_dir.clone(),
            jar: self.jar.clone(),
            available: self.available_models(),
        })
    }

    /// Names of every entry directly inside the module folder, sorted.
    ///
    /// Entries that cannot be read show up as `<unreadable: ...>`.
    pub fn available_models(&self) -> Vec<String> {
        let mut names: Vec<String> = WalkDir::new(&self.module_dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .map(|e| match e {
                Ok(entry) => entry.file_name().to_string_lossy().into_owned(),
                Err(err) => {
                    warn!(
                        dir = %self.module_dir.display(),
                        error = %err,
                        "could not list module folder"
                    );
                    format!("<unreadable: {err}>")
                }
            })
            .collect();

        names.sort();
        names
    }
}

fn format_listing(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("{n:?}"))
        .collect::<Vec<_>>()
        .join(", ")
}
