use rust_embed::RustEmbed;

/// Embedded dashboard assets (query editor page and its script).
/// Path is relative to the crate root.
#[derive(RustEmbed)]
#[folder = "web"]
pub struct WebAssets;
