pub mod store;
pub mod types;

pub use store::EvaluationStore;
pub use types::Evaluation;
