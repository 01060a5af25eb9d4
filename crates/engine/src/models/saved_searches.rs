//! Saved search models.

use serde::{Deserialize, Serialize};

/// A saved search: its name and the query text it runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedSearch {
    #[serde(default)]
    pub name: String,
    pub search: String,
}

/// Wire shape of the saved-search list response.
#[derive(Debug, Deserialize, Clone)]
pub struct SavedSearchListResponse {
    pub entry: Vec<SavedSearchEntry>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SavedSearchEntry {
    pub name: String,
    pub content: SavedSearchContent,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SavedSearchContent {
    pub search: String,
}

impl SavedSearchListResponse {
    /// Flatten entries into [`SavedSearch`] values, merging the entry name
    /// into the content.
    pub fn into_saved_searches(self) -> Vec<SavedSearch> {
        self.entry
            .into_iter()
            .map(|e| SavedSearch {
                name: e.name,
                search: e.content.search,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_name_merged_into_content() {
        let json = r#"{
            "entry": [
                {"name": "Errors last hour", "content": {"search": "index=main error"}},
                {"name": "Notables", "content": {"search": "index=notable"}}
            ]
        }"#;
        let response: SavedSearchListResponse = serde_json::from_str(json).unwrap();
        let searches = response.into_saved_searches();
        assert_eq!(searches.len(), 2);
        assert_eq!(searches[0].name, "Errors last hour");
        assert_eq!(searches[0].search, "index=main error");
    }
}
