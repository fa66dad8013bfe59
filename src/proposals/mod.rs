pub mod store;
pub mod types;

pub use store::ProposalStore;
pub use types::{Cellule, Proposal};
