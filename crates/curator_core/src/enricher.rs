use std::collections::{BTreeMap, HashSet};

use curator_logging::curator_debug;
use url::Url;

use crate::{Enrichable, FetchError, ItemId, LinkPreview};

/// Normalizes a link for dedupe: trims whitespace, lowercases scheme and
/// host, drops one trailing slash. Unparseable input is only trimmed.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    match Url::parse(trimmed) {
        Ok(url) => strip_one_slash(url.as_str()).to_string(),
        Err(_) => strip_one_slash(trimmed).to_string(),
    }
}

fn strip_one_slash(url: &str) -> &str {
    url.strip_suffix('/').unwrap_or(url)
}

/// A preview fetch for one `(item, link)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRequest {
    pub item_id: ItemId,
    /// Link as declared on the item (trimmed); this is what gets fetched.
    pub url: String,
    /// Normalized form of `url`, the dedupe key.
    pub key: String,
    pub epoch: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichOutcome {
    Merged,
    /// Nothing was recorded; a later `reconcile` will retry the pair.
    Failed(FetchError),
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ResolvedPreview {
    key: String,
    preview: LinkPreview,
}

/// Per-item link preview cache with at-most-one in-flight fetch per
/// `(item, link)` pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecondaryResourceEnricher {
    resolved: BTreeMap<ItemId, Vec<ResolvedPreview>>,
    in_flight: HashSet<(ItemId, String)>,
    epoch: u64,
}

impl SecondaryResourceEnricher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks every missing pair as in flight and returns the fetches to run.
    pub fn reconcile<T: Enrichable>(&mut self, items: &[T]) -> Vec<PreviewRequest> {
        let mut requests = Vec::new();
        for item in items {
            let item_id = item.item_id();
            for link in item.links() {
                let key = normalize_url(link);
                if key.is_empty() || self.has_preview_key(&item_id, &key) {
                    continue;
                }
                if !self.in_flight.insert((item_id.clone(), key.clone())) {
                    continue;
                }
                requests.push(PreviewRequest {
                    item_id: item_id.clone(),
                    url: link.trim().to_string(),
                    key,
                    epoch: self.epoch,
                });
            }
        }
        if !requests.is_empty() {
            curator_debug!(
                "Reconcile issued {} preview fetches ({} in flight)",
                requests.len(),
                self.in_flight.len()
            );
        }
        requests
    }

    pub fn complete(
        &mut self,
        request: &PreviewRequest,
        result: Result<LinkPreview, FetchError>,
    ) -> EnrichOutcome {
        if request.epoch != self.epoch {
            curator_debug!(
                "Discarding stale preview for item {} url {}",
                request.item_id,
                request.url
            );
            return EnrichOutcome::Stale;
        }
        self.in_flight
            .remove(&(request.item_id.clone(), request.key.clone()));

        match result {
            Ok(preview) => {
                let entries = self.resolved.entry(request.item_id.clone()).or_default();
                entries.retain(|entry| entry.key != request.key);
                entries.push(ResolvedPreview {
                    key: request.key.clone(),
                    preview,
                });
                EnrichOutcome::Merged
            }
            Err(err) => EnrichOutcome::Failed(err),
        }
    }

    /// Previews of one item in completion order.
    pub fn previews(&self, item_id: &ItemId) -> Vec<&LinkPreview> {
        self.resolved
            .get(item_id)
            .map(|entries| entries.iter().map(|entry| &entry.preview).collect())
            .unwrap_or_default()
    }

    pub fn preview(&self, item_id: &ItemId, url: &str) -> Option<&LinkPreview> {
        let key = normalize_url(url);
        self.resolved
            .get(item_id)?
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| &entry.preview)
    }

    pub fn is_in_flight(&self, item_id: &ItemId, url: &str) -> bool {
        self.in_flight.contains(&(item_id.clone(), normalize_url(url)))
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight.is_empty()
    }

    pub fn clear(&mut self) {
        self.resolved.clear();
        self.in_flight.clear();
        self.epoch += 1;
    }

    fn has_preview_key(&self, item_id: &ItemId, key: &str) -> bool {
        self.resolved
            .get(item_id)
            .is_some_and(|entries| entries.iter().any(|entry| entry.key == key))
    }
}

#[cfg(test)]
mod tests {
    use super::normalize_url;

    #[test]
    fn normalization_catches_variants() {
        let expected = normalize_url("https://example.com");
        assert_eq!(normalize_url("https://example.com/"), expected);
        assert_eq!(normalize_url("HTTPS://EXAMPLE.COM"), expected);
        assert_eq!(normalize_url("  https://example.com/  "), expected);
    }

    #[test]
    fn path_case_is_preserved() {
        assert_ne!(
            normalize_url("https://example.com/Page"),
            normalize_url("https://example.com/page")
        );
    }

    #[test]
    fn only_one_trailing_slash_is_dropped() {
        assert_eq!(normalize_url("https://x.example/a//"), "https://x.example/a/");
        assert_ne!(
            normalize_url("https://x.example/a//"),
            normalize_url("https://x.example/a")
        );
    }

    #[test]
    fn unparseable_links_are_only_trimmed() {
        assert_eq!(normalize_url("  not a url/ "), "not a url");
    }
}
