use std::io;
use std::path::PathBuf;

use walkdir::{DirEntry, WalkDir};

use data_element::DataElement;
use fs_element::FileElement;

use crate::error::AppError;

#[derive(Clone, Debug, clap::Args)]
#[clap(
    name = "ingest",
    about = "Ingest files and directories as file-backed elements"
)]
pub struct Ingest {
    #[clap(
        required = true,
        help = "Files or directories to ingest; directories are walked \
                recursively, hidden entries are skipped"
    )]
    paths: Vec<PathBuf>,
}

impl Ingest {
    pub fn run(&self) -> Result<(), AppError> {
        let mut count = 0;
        for path in &self.paths {
            if path.is_file() {
                emit(&FileElement::new(path))?;
                count += 1;
            } else if path.is_dir() {
                log::debug!("Expanding directory: {}", path.display());
                for entry in WalkDir::new(path)
                    .into_iter()
                    .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
                {
                    let entry = entry.map_err(io::Error::from)?;
                    if entry.file_type().is_file() {
                        emit(&FileElement::new(entry.path()))?;
                        count += 1;
                    }
                }
            } else {
                log::warn!("No such file or directory: {}", path.display());
            }
        }
        log::info!("Ingested {count} elements");
        Ok(())
    }
}

/// Emit one reconstruction config per element; downstream ingest
/// consumers read these line by line.
fn emit(element: &FileElement) -> Result<(), AppError> {
    println!("{}", serde_json::to_string(&element.get_config())?);
    Ok(())
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}
