//! Wire types for one page of the collection listing
//!
//! Deserialization is deliberately tolerant: every field defaults, so a
//! release missing its `basic_information` or an artist without a name does
//! not abort the page. Only the absence of a release id makes an entry
//! unusable, and that is decided per item by `to_item`.

use serde::Deserialize;

/// One page of `/users/{username}/collection/folders/0/releases`
#[derive(Debug, Deserialize)]
pub struct CollectionPage {
    #[serde(default)]
    pub releases: Vec<ReleaseEntry>,

    #[serde(default)]
    pub pagination: Option<Pagination>,
}

impl CollectionPage {
    /// Server-supplied locator for the following page, absent on the last one
    pub fn next_url(&self) -> Option<&str> {
        self.pagination.as_ref()?.urls.next.as_deref()
    }
}

/// A single collection entry as listed on a page
#[derive(Debug, Default, Deserialize)]
pub struct ReleaseEntry {
    #[serde(default)]
    pub basic_information: BasicInformation,
}

/// The catalog fields of a collection entry
#[derive(Debug, Default, Deserialize)]
pub struct BasicInformation {
    pub id: Option<u64>,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub artists: Vec<ArtistRef>,
}

impl BasicInformation {
    /// Builds a usable item, or `None` when the release id is missing
    pub fn to_item(&self) -> Option<CollectionItem> {
        Some(CollectionItem {
            release_id: self.id?,
            title: self.title.clone(),
            artist_names: self
                .artists
                .iter()
                .map(|a| a.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        })
    }
}

/// Artist reference within `basic_information`
#[derive(Debug, Deserialize)]
pub struct ArtistRef {
    #[serde(default)]
    pub name: String,
}

/// Pagination block of a collection page
#[derive(Debug, Default, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub urls: PageUrls,
}

/// Navigation URLs inside the pagination block
#[derive(Debug, Default, Deserialize)]
pub struct PageUrls {
    pub next: Option<String>,
}

/// One release extracted from a page, immutable once read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionItem {
    pub release_id: u64,
    pub title: String,
    /// Comma-joined artist names, may be empty
    pub artist_names: String,
}
