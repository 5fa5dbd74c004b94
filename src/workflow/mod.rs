pub mod attachment_flow;
pub mod listing_ctx;

pub use attachment_flow::{close_stray_tabs, AttachmentFlow, RetrievalSettings};
pub use listing_ctx::ListingCtx;
