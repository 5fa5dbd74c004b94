pub mod attachment_policy;
pub mod folder_name;
pub mod listing_parser;
pub mod progress;
pub mod url_normalizer;

pub use attachment_policy::AttachmentPolicy;
pub use folder_name::{folder_name, sanitize_filename};
pub use listing_parser::{ListingParser, ParsedPage};
pub use progress::{estimate_remaining, CollectProgress, LogProgress, ProgressListener, RetrieveProgress};
pub use url_normalizer::UrlNormalizer;
