pub mod bounds;
pub mod issue;
pub mod page;
pub mod suggestion;

pub use bounds::{META_BOUNDS, TITLE_BOUNDS};
pub use issue::{Issue, IssueSet};
pub use page::{PageRecord, WorklistEntry};
pub use suggestion::{ApprovedItem, GenerationRequest, GenerationResult};
