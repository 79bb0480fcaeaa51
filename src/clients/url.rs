//! Resource URL construction.
//!
//! Every Graph endpoint has the shape `BASE/{resource_id}[suffix]`. The suffix
//! is appended verbatim: callers pass it with its leading `/` and any query
//! string already in place (e.g. `"/product_groups"` or `"/?fields=name"`).

use std::fmt::Display;

/// Suffix for creating product groups under a catalog.
pub const PRODUCT_GROUPS: &str = "/product_groups";
/// Suffix for creating product items under a product group.
pub const PRODUCTS: &str = "/products";
/// Suffix for creating feeds under a catalog.
pub const PRODUCT_FEEDS: &str = "/product_feeds";
/// Suffix for posting log events.
pub const LOG_EVENTS: &str = "/log_events";
/// Suffix for feed uploads.
pub const UPLOADS: &str = "/uploads";
/// Suffix selecting a page's name.
pub const FIELDS_NAME: &str = "/?fields=name";
/// Suffix selecting an upload's completion time.
pub const FIELDS_END_TIME: &str = "/?fields=end_time";

/// Builds a resource URL by concatenating `base`, `resource_id` and `suffix`.
///
/// Nothing is escaped or validated.
///
/// # Example
///
/// ```rust
/// use commerce_graph::clients::build_url;
///
/// let url = build_url("https://graph.facebook.com/v2.9/", "123", "/?fields=name");
/// assert_eq!(url, "https://graph.facebook.com/v2.9/123/?fields=name");
/// ```
#[must_use]
pub fn build_url(base: &str, resource_id: impl Display, suffix: &str) -> String {
    format!("{base}{resource_id}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResourceId;

    const BASE: &str = "https://graph.facebook.com/v2.9/";

    #[test]
    fn test_concatenates_base_id_suffix_in_order() {
        assert_eq!(
            build_url(BASE, "catalog1", PRODUCT_GROUPS),
            "https://graph.facebook.com/v2.9/catalog1/product_groups"
        );
    }

    #[test]
    fn test_empty_suffix_addresses_resource_itself() {
        assert_eq!(build_url(BASE, 987_u64, ""), format!("{BASE}987"));
    }

    #[test]
    fn test_is_deterministic() {
        let id = ResourceId::from("g 1");
        let first = build_url(BASE, &id, "/?a=b&c");
        let second = build_url(BASE, &id, "/?a=b&c");
        assert_eq!(first, second);
        // No escaping of either part
        assert_eq!(first, format!("{BASE}g 1/?a=b&c"));
    }
}
