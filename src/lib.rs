pub mod auditor;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod parameters;
pub mod parsers;
pub mod reporting;
pub mod router;
pub mod verdict;

// Re-export commonly used items
pub use auditor::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use models::*;
pub use parameters::*;
pub use parsers::*;
pub use reporting::*;
pub use router::*;
pub use verdict::*;
