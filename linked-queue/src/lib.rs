pub mod error;
pub mod handle;
pub mod queue;
pub mod sort;

pub use error::QueueError;
pub use handle::QueueHandle;
pub use queue::Queue;
pub use sort::{MergeStrategy, SortOptions, SortOrder};
