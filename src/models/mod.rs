pub mod listing;
pub mod loaders;
pub mod organization;
pub mod retrieval;

pub use listing::{ListingRecord, ListingTable};
pub use loaders::{load_registry, parse_registry};
pub use organization::{Organization, OrganizationCategory, OrganizationRegistry};
pub use retrieval::{RecordOutcome, RecordReport, RetrievalOutcome, RetrievalReport};
