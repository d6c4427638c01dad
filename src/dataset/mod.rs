//! The graph document: typed records, loading and structural checks.

mod error;
mod load;
mod types;
mod validate;

pub use error::{Collection, DatasetError};
pub use load::{load_dataset, settle_load};
pub use types::{Edge, EntityId, GraphDataset, Node, Record};
pub use validate::{DatasetIssue, Endpoint};
