mod cache;
pub mod catalog;
mod loader;

pub use cache::{CacheInfo, QuestionCache};
pub use loader::{load_questions, parse_csv, parse_json, LoadError, LoadSummary};
