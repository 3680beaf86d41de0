mod bootstrap;
mod session;

pub use bootstrap::bootstrap_handler;
pub use session::{logout_handler, me_handler};

pub const SESSION_USER_KEY: &str = "user_identity";
/// Absolute session creation timestamp for OWASP absolute timeout enforcement.
pub const SESSION_CREATED_AT_KEY: &str = "session_created_at";
/// Sessions older than this are rejected regardless of activity.
pub const SESSION_ABSOLUTE_TIMEOUT_SECONDS: i64 = 8 * 60 * 60;
