// src/links/mod.rs
// =============================================================================
// Link handling: pulling anchors out of HTML and putting URLs in canonical form.
// =============================================================================

mod html;
mod normalize;

pub use html::extract_links;
pub use normalize::normalize;
