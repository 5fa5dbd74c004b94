pub mod browser_session;
pub mod chromium_session;

pub use browser_session::{BrowserSession, TabHandle};
pub use chromium_session::ChromiumSession;
