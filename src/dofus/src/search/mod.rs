//! Item search over an external provider.
//!
//! The public search API is accent- and ligature-sensitive, so a query is
//! sent in several spellings at once. The merged hits are de-duplicated by
//! Ankama id (first occurrence wins), re-ranked with
//! [`relevance::score`](crate::relevance::score) and truncated.

mod gate;

pub use gate::{GateInput, SuggestionGate, Ticket, DEFAULT_DEBOUNCE, MIN_QUERY_LEN};

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::relevance;

/// Maximum number of suggestions kept after ranking
pub const MAX_RESULTS: usize = 10;

/// Error talking to the search provider
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("Server returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    Decode(String),
}

/// Item category, as used in the provider's `/items/{category}` routes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Equipment,
    Resources,
    Consumables,
    Cosmetics,
    Quest,
}

impl ItemCategory {
    /// Order in which categories are tried when the category is unknown
    pub const LOOKUP_ORDER: [ItemCategory; 5] = [
        ItemCategory::Equipment,
        ItemCategory::Resources,
        ItemCategory::Consumables,
        ItemCategory::Cosmetics,
        ItemCategory::Quest,
    ];

    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Equipment => "equipment",
            Self::Resources => "resources",
            Self::Consumables => "consumables",
            Self::Cosmetics => "cosmetics",
            Self::Quest => "quest",
        }
    }

    /// Category from an endpoint name or an item type id such as
    /// `items-resources`
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.strip_prefix("items-").unwrap_or(name);
        Self::LOOKUP_ORDER
            .into_iter()
            .find(|category| category.endpoint() == name)
    }
}

/// One search result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub ankama_id: u64,
    pub name: String,
    /// Subtype id such as `resources` or `equipment`
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default)]
    pub icon_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl SearchHit {
    /// Readable label of the hit's subtype
    pub fn type_label(&self) -> String {
        subtype_label(self.subtype.as_deref())
    }
}

/// French display label for an item subtype id
pub fn subtype_label(subtype: Option<&str>) -> String {
    match subtype {
        Some("resources") => "Ressource".to_string(),
        Some("consumables") => "Consommable".to_string(),
        Some("equipment") => "Équipement".to_string(),
        Some("cosmetics") => "Cosmétique".to_string(),
        Some("quest") | Some("quest_items") => "Item de Quête".to_string(),
        Some(other) if !other.is_empty() => other.to_string(),
        _ => "Inconnu".to_string(),
    }
}

/// What kind of entity a search looks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Items,
    Pets,
}

/// External item search service
pub trait SearchProvider {
    /// Full-text search over all items
    fn search_items(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, SearchError>;

    /// Full-text search restricted to pets
    fn search_pets(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, SearchError>;

    /// Fetch one item; `Ok(None)` when the id does not exist in `category`
    fn item_by_id(&self, id: u64, category: ItemCategory) -> Result<Option<SearchHit>, SearchError>;
}

/// Spellings of `query` sent to the provider, original first, duplicates removed
pub fn query_variants(query: &str) -> Vec<String> {
    let candidates = [
        query.to_string(),
        query.replace("oe", "œ"),
        query.replace('œ', "oe"),
        normalize_query(query),
    ];

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|variant| seen.insert(variant.clone()))
        .collect()
}

/// Lower-case `s` and strip French diacritics. `oe` is written as the
/// `œ` ligature, the spelling item names use; `æ` is expanded.
pub fn normalize_query(s: &str) -> String {
    let lower = s.to_lowercase().replace("oe", "œ");
    let mut folded = String::with_capacity(lower.len());
    for c in lower.chars() {
        match c {
            'æ' => folded.push_str("ae"),
            'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => folded.push('a'),
            'è' | 'é' | 'ê' | 'ë' => folded.push('e'),
            'ì' | 'í' | 'î' | 'ï' => folded.push('i'),
            'ò' | 'ó' | 'ô' | 'õ' | 'ö' => folded.push('o'),
            'ù' | 'ú' | 'û' | 'ü' => folded.push('u'),
            'ç' => folded.push('c'),
            'ñ' => folded.push('n'),
            other => folded.push(other),
        }
    }
    folded
}

/// Search every spelling of `query` concurrently and rank the merged hits.
///
/// Queries shorter than [`MIN_QUERY_LEN`] characters return nothing. A
/// variant whose request fails contributes no hits; the others are still
/// merged.
pub fn search_ranked<P>(provider: &P, query: &str, kind: SearchKind) -> Vec<SearchHit>
where
    P: SearchProvider + Sync + ?Sized,
{
    if query.trim().chars().count() < MIN_QUERY_LEN {
        return Vec::new();
    }

    let variants = query_variants(query);
    let batches: Vec<Vec<SearchHit>> = std::thread::scope(|scope| {
        let handles: Vec<_> = variants
            .iter()
            .map(|variant| {
                scope.spawn(move || match kind {
                    SearchKind::Items => provider.search_items(variant, MAX_RESULTS),
                    SearchKind::Pets => provider.search_pets(variant, MAX_RESULTS),
                })
            })
            .collect();

        handles
            .into_iter()
            .zip(&variants)
            .map(|(handle, variant)| match handle.join() {
                Ok(Ok(hits)) => hits,
                Ok(Err(e)) => {
                    tracing::warn!(variant = %variant, error = %e, "search variant failed");
                    Vec::new()
                }
                Err(_) => {
                    tracing::warn!(variant = %variant, "search variant panicked");
                    Vec::new()
                }
            })
            .collect()
    });

    merge_ranked(batches, query)
}

/// De-duplicate batches by id in order, rank by relevance, keep the top results
pub fn merge_ranked(batches: Vec<Vec<SearchHit>>, query: &str) -> Vec<SearchHit> {
    let mut seen = HashSet::new();
    let mut merged: Vec<SearchHit> = batches
        .into_iter()
        .flatten()
        .filter(|hit| seen.insert(hit.ankama_id))
        .collect();

    relevance::rank_by_relevance(&mut merged, query, |hit| hit.name.as_str());
    merged.truncate(MAX_RESULTS);
    merged
}

/// Look an id up in every category until one knows it.
///
/// Failing categories are skipped. `None` means no category had the item.
pub fn find_by_id<P>(provider: &P, id: u64) -> Option<(ItemCategory, SearchHit)>
where
    P: SearchProvider + ?Sized,
{
    for category in ItemCategory::LOOKUP_ORDER {
        match provider.item_by_id(id, category) {
            Ok(Some(hit)) => return Some((category, hit)),
            Ok(None) => {}
            Err(e) => {
                tracing::debug!(id, category = category.endpoint(), error = %e, "lookup failed");
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    fn hit(id: u64, name: &str) -> SearchHit {
        SearchHit {
            ankama_id: id,
            name: name.to_string(),
            subtype: Some("resources".to_string()),
            ..Default::default()
        }
    }

    /// Provider answering from a fixed table, failing for listed queries
    #[derive(Default)]
    struct FakeProvider {
        items: HashMap<String, Vec<SearchHit>>,
        failing: Vec<String>,
        by_id: HashMap<(u64, ItemCategory), SearchHit>,
        calls: Mutex<Vec<String>>,
    }

    impl SearchProvider for FakeProvider {
        fn search_items(&self, query: &str, _limit: usize) -> Result<Vec<SearchHit>, SearchError> {
            self.calls.lock().unwrap().push(query.to_string());
            if self.failing.iter().any(|q| q == query) {
                return Err(SearchError::Status {
                    status: 502,
                    url: query.to_string(),
                });
            }
            Ok(self.items.get(query).cloned().unwrap_or_default())
        }

        fn search_pets(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, SearchError> {
            self.search_items(query, limit)
        }

        fn item_by_id(&self, id: u64, category: ItemCategory) -> Result<Option<SearchHit>, SearchError> {
            if category == ItemCategory::Equipment {
                return Err(SearchError::Transport("timeout".to_string()));
            }
            Ok(self.by_id.get(&(id, category)).cloned())
        }
    }

    #[test]
    fn test_query_variants() {
        assert_eq!(
            query_variants("Oeil de Boeuf"),
            vec!["Oeil de Boeuf", "Oeil de Bœuf", "œil de bœuf"]
        );
        assert_eq!(query_variants("Bœuf"), vec!["Bœuf", "Boeuf", "bœuf"]);
        assert_eq!(query_variants("boeuf"), vec!["boeuf", "bœuf"]);
        assert_eq!(query_variants("ble"), vec!["ble"]);
    }

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("Blé Noir"), "ble noir");
        assert_eq!(normalize_query("Cœur de Façade"), "cœur de facade");
        assert_eq!(normalize_query("COEUR"), "cœur");
        assert_eq!(normalize_query("Ætherium"), "aetherium");
    }

    #[test]
    fn test_short_query_returns_nothing() {
        let provider = FakeProvider::default();
        assert!(search_ranked(&provider, "bl", SearchKind::Items).is_empty());
        assert!(provider.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_merge_dedupes_and_ranks() {
        let mut provider = FakeProvider::default();
        provider.items.insert(
            "Blé".to_string(),
            vec![hit(2, "Graine de Blé"), hit(1, "Blé")],
        );
        provider.items.insert(
            "ble".to_string(),
            vec![hit(1, "Blé (copy)"), hit(3, "Blé Noir"), hit(4, "Table")],
        );

        let hits = search_ranked(&provider, "Blé", SearchKind::Items);
        let ids: Vec<u64> = hits.iter().map(|h| h.ankama_id).collect();
        assert_eq!(ids, vec![1, 3, 2, 4]);
        // first occurrence of id 1 wins
        assert_eq!(hits[0].name, "Blé");
    }

    #[test]
    fn test_failed_variant_is_tolerated() {
        let mut provider = FakeProvider::default();
        provider.items.insert("Bœuf".to_string(), vec![hit(9, "Bœuf")]);
        provider.failing.push("Boeuf".to_string());

        let hits = search_ranked(&provider, "Boeuf", SearchKind::Items);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].ankama_id, 9);
        assert_eq!(provider.calls.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_truncates_to_max_results() {
        let batch: Vec<SearchHit> = (0..25).map(|i| hit(i, &format!("Bois {}", i))).collect();
        let merged = merge_ranked(vec![batch], "bois");
        assert_eq!(merged.len(), MAX_RESULTS);
    }

    #[test]
    fn test_find_by_id_skips_failing_categories() {
        let mut provider = FakeProvider::default();
        provider
            .by_id
            .insert((289, ItemCategory::Resources), hit(289, "Blé"));

        let (category, found) = find_by_id(&provider, 289).unwrap();
        assert_eq!(category, ItemCategory::Resources);
        assert_eq!(found.name, "Blé");

        assert!(find_by_id(&provider, 1).is_none());
    }

    #[test]
    fn test_subtype_labels() {
        assert_eq!(subtype_label(Some("resources")), "Ressource");
        assert_eq!(subtype_label(Some("quest_items")), "Item de Quête");
        assert_eq!(subtype_label(Some("mounts")), "mounts");
        assert_eq!(subtype_label(None), "Inconnu");
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(
            ItemCategory::parse("items-consumables"),
            Some(ItemCategory::Consumables)
        );
        assert_eq!(ItemCategory::parse("quest"), Some(ItemCategory::Quest));
        assert_eq!(ItemCategory::parse("quest_items"), None);
    }
}
