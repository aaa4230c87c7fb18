//! Input table loading.

mod detections;
mod embeddings;

pub use detections::load_detections;
pub use embeddings::load_embeddings;
