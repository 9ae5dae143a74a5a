// ── Cache key derivation ──
//
// The canonical key functions shared by writers (the fold) and readers
// (selectors). Two serializations exist per key: the full one keeps
// pagination/sort terms so distinct query variants track distinct
// in-flight requests; the simplified one strips them so semantically
// equivalent queries share one stored payload.

use crate::model::Filter;

/// Key for in-flight flags and errors: `id` alone without a filter,
/// `id-<filter string>` otherwise. An empty filter counts as none.
pub fn entity_identifier(id: &str, filter: Option<&Filter>) -> String {
    compose(id, filter.map(Filter::to_filter_string))
}

/// Key for stored payloads: like [`entity_identifier`] but with the
/// simplified filter serialization.
pub fn simplified_entity_identifier(id: &str, filter: Option<&Filter>) -> String {
    compose(id, filter.map(|f| f.simple().to_filter_string()))
}

/// Key for a paired "compare two reports" fetch: the concatenation
/// `id+delta_id`. Delta caches key by the pair alone.
pub fn delta_identifier(id: &str, delta_id: &str) -> String {
    format!("{id}+{delta_id}")
}

/// Key for a collection fetch: the filter string, or `"default"` without
/// a filter.
pub fn collection_identifier(filter: Option<&Filter>) -> String {
    filter
        .map(Filter::to_filter_string)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "default".to_owned())
}

/// Simplified-key twin of [`collection_identifier`].
pub fn simplified_collection_identifier(filter: Option<&Filter>) -> String {
    filter
        .map(|f| f.simple().to_filter_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "default".to_owned())
}

fn compose(id: &str, filter_string: Option<String>) -> String {
    match filter_string {
        Some(s) if !s.is_empty() => format!("{id}-{s}"),
        _ => id.to_owned(),
    }
}

/// The id/filter pair an action was dispatched for.
///
/// Carrying the pair (rather than a precomputed string) keeps the fold
/// and the selectors deriving keys through the same functions, so reads
/// and writes agree by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    id: Option<String>,
    filter: Option<Filter>,
}

impl CacheKey {
    /// Key for a single-entity fetch.
    pub fn entity(id: impl Into<String>, filter: Option<Filter>) -> Self {
        Self {
            id: Some(id.into()),
            filter,
        }
    }

    /// Key for a delta-pair fetch. The filter only parameterizes the
    /// request; the pair alone identifies the cache entry.
    pub fn delta(id: &str, delta_id: &str) -> Self {
        Self {
            id: Some(delta_identifier(id, delta_id)),
            filter: None,
        }
    }

    /// Key for a collection fetch.
    pub fn collection(filter: Option<Filter>) -> Self {
        Self { id: None, filter }
    }

    /// Full serialization, used for in-flight flags and errors.
    pub fn loading(&self) -> String {
        match &self.id {
            Some(id) => entity_identifier(id, self.filter.as_ref()),
            None => collection_identifier(self.filter.as_ref()),
        }
    }

    /// Simplified serialization, used for stored payloads.
    pub fn storage(&self) -> String {
        match &self.id {
            Some(id) => simplified_entity_identifier(id, self.filter.as_ref()),
            None => simplified_collection_identifier(self.filter.as_ref()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn absent_filter_key_is_the_id() {
        assert_eq!(entity_identifier("foo", None), "foo");
        assert_eq!(simplified_entity_identifier("foo", None), "foo");
    }

    #[test]
    fn empty_filter_counts_as_none() {
        let filter = Filter::new();
        assert_eq!(entity_identifier("foo", Some(&filter)), "foo");
        assert_eq!(simplified_entity_identifier("foo", Some(&filter)), "foo");
    }

    #[test]
    fn full_key_keeps_pagination_simplified_drops_it() {
        let filter: Filter = "foo=bar rows=10".parse().unwrap();
        assert_eq!(
            entity_identifier("foo", Some(&filter)),
            "foo-foo=bar rows=10"
        );
        assert_eq!(
            simplified_entity_identifier("foo", Some(&filter)),
            "foo-foo=bar"
        );
    }

    #[test]
    fn pagination_only_filter_simplifies_to_bare_id() {
        let filter: Filter = "rows=10 first=20".parse().unwrap();
        assert_eq!(
            entity_identifier("foo", Some(&filter)),
            "foo-rows=10 first=20"
        );
        assert_eq!(simplified_entity_identifier("foo", Some(&filter)), "foo");
    }

    #[test]
    fn delta_key_concatenates_the_pair() {
        assert_eq!(delta_identifier("r1", "r2"), "r1+r2");
        let key = CacheKey::delta("r1", "r2");
        assert_eq!(key.loading(), "r1+r2");
        assert_eq!(key.storage(), "r1+r2");
    }

    #[test]
    fn collection_keys_default_without_filter() {
        assert_eq!(collection_identifier(None), "default");
        let filter: Filter = "severity>6.9 rows=10".parse().unwrap();
        assert_eq!(collection_identifier(Some(&filter)), "severity>6.9 rows=10");
        assert_eq!(
            simplified_collection_identifier(Some(&filter)),
            "severity>6.9"
        );
    }
}
