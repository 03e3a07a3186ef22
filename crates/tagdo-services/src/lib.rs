//! Client-side state for tagdo: the remote gateway and the models kept in step with it.

pub mod client;
pub mod error;
pub mod filter;
pub mod gateway;
pub mod label_set;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod sequence;
pub mod todo_collection;
pub mod types;

pub use client::TodoApiClient;
pub use error::{FailureCause, Operation, SyncError, SyncResult};
pub use filter::{project, resolve_labels, select_label};
pub use gateway::SyncGateway;
pub use label_set::{toggle, LabelSet};
#[cfg(any(test, feature = "test-util"))]
pub use memory::MemoryGateway;
pub use todo_collection::TodoCollection;
pub use types::{Label, LabelId, NewLabelPayload, NewTodoPayload, Todo, TodoId, UpdateTodoPayload};
