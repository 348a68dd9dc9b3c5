//! MCP tool implementations.
//!
//! This module contains all tools exposed by the tabthreads server.

pub mod badge_status;
pub mod clear_cache;
pub mod find_discussions;
pub mod options;
pub mod tab_event;

pub use badge_status::BadgeStatusParams;
pub use find_discussions::FindDiscussionsParams;
pub use options::SetOptionsParams;
pub use tab_event::TabEventParams;
