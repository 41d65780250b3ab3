//! Configuration constants for font variant resolution.

/// Weight assumed for a manifest entry without one.
pub const DEFAULT_WEIGHT: u16 = 500;

/// Style assumed for a manifest entry without one.
pub const DEFAULT_STYLE: &str = "regular";

/// Stretch assumed for a manifest entry without one.
pub const DEFAULT_STRETCH: &str = "normal";

/// Public path prefix used when neither the host nor the query provides one.
pub const DEFAULT_PUBLIC_PATH: &str = "/";

/// Number of content-hash characters in emitted asset names.
pub const NAME_HASH_LENGTH: usize = 8;

/// Resources with these extensions are passed through untouched.
pub const STYLESHEET_EXTENSIONS: &[&str] = &["css", "sass", "scss", "less"];
