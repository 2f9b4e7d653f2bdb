//! Sources of the initial translation table.
mod candidates;
mod discovery;
mod types;

pub use candidates::CandidateLoader;
pub use discovery::discover_translation_files;
pub use types::{
    FnLoader,
    LoadError,
    Loader,
    StaticLoader,
    loader_fn,
};
