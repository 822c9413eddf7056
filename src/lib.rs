// Library exports for use in scripts and other binaries

pub mod config;
pub mod error;
pub mod heading;
pub mod naming;
pub mod pipeline;
pub mod report;
pub mod routing;
pub mod source;
pub mod utils;

// Re-export commonly used types
pub use config::{RoutingConfig, RunConfig};
pub use error::{Result, SplitError};
pub use heading::{HeadingClassifier, HeadingMatch, Title};
pub use naming::OutputLayout;
pub use pipeline::{split_document, split_with, RunSummary};
pub use routing::{route_document, PageAssignment, Router};
pub use source::{TextProvider, TextSource};
