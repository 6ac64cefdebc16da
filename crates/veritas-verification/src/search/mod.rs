//! Grounding search collaborators.

mod google_news;

pub use google_news::{parse_feed, GoogleNewsSearch};
