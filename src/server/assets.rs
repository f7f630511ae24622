//! Static asset constants.

/// Stylesheet for the upload page.
pub const CSS: &str = include_str!("styles.css");
