//! View compositions.
//!
//! A page value owns every timer, task, listener and document change of its
//! view. Leaving the view means dropping the page.

pub mod home;
pub mod timeline_page;

pub use home::{HomePage, HOME_DESCRIPTION, HOME_VIEW};
pub use timeline_page::{
    Key, TimelineContent, TimelinePage, TIMELINE_DESCRIPTION, TIMELINE_PROMPT, TIMELINE_VIEW,
};
