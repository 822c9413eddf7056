pub mod assignment;
pub mod context;
pub mod lookahead;
pub mod router;

pub use assignment::{ConsumedPages, PageAssignment};
pub use context::{Bucket, Numbering, SectionContext, SectionKind};
pub use lookahead::{apply_parent_lock, peek_upcoming, Upcoming};
pub use router::{reduce, route_document, Capture, Decision, PageInfo, RouteResult, Router, Step};
