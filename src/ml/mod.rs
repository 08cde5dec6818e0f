//! Trained classifier support: JSON model blobs, discovery, caching

mod cache;
mod model;
mod registry;

pub use cache::{shared, ModelCache};
pub use model::LogisticModel;
pub use registry::{latest_model_path, resolve_models_dir, MODELS_DIR_ENV};
