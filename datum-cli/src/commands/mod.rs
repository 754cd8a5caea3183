use clap::Subcommand;

use data_element::ElementRegistry;
use fs_element::FileElement;
use mem_element::MemoryElement;

use crate::error::AppError;

mod ingest;
mod resolve;
mod stores;

#[derive(Debug, Subcommand)]
pub enum Commands {
    Stores(stores::Stores),
    Resolve(resolve::Resolve),
    Ingest(ingest::Ingest),
}

impl Commands {
    pub fn run(&self) -> Result<(), AppError> {
        match self {
            Commands::Stores(stores) => stores.run(),
            Commands::Resolve(resolve) => resolve.run(),
            Commands::Ingest(ingest) => ingest.run(),
        }
    }
}

/// Element types offered for URI resolution, in precedence order:
/// byte-format URIs first, file paths last.
pub fn registry() -> ElementRegistry {
    let mut registry = ElementRegistry::new();
    registry.register::<MemoryElement>(MemoryElement::KIND);
    registry.register::<FileElement>(FileElement::KIND);
    registry
}
