use super::{base, Filter};
use serde_json::{Map, Value};

/// Parameters for `album-create`.
#[derive(Debug, Clone)]
pub struct AlbumCreateParams {
    id: String,
    name: Option<String>,
}

impl AlbumCreateParams {
    /// `id` is the caller-chosen unique album ID, at most 100 characters.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }

    /// Human-readable album name, at most 100 characters.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub(crate) fn into_params(self) -> Map<String, Value> {
        let mut params = base("album-create");
        params.insert("id".into(), Value::String(self.id));
        if let Some(name) = self.name {
            params.insert("name".into(), Value::String(name));
        }
        params
    }
}

/// Search criteria for `album-search`.
#[derive(Debug, Clone, Default)]
pub struct AlbumSearchParams {
    images: Option<Filter<u64>>,
    storage: Option<Filter<u64>>,
    created: Option<Filter<String>>,
    offset: Option<u64>,
    limit: Option<u64>,
}

impl AlbumSearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by number of images in the album.
    pub fn images(mut self, filter: Filter<u64>) -> Self {
        self.images = Some(filter);
        self
    }

    /// Filter by the sum of file sizes of the album's images, in bytes.
    pub fn storage(mut self, filter: Filter<u64>) -> Self {
        self.storage = Some(filter);
        self
    }

    /// Filter by album creation time, ISO 8601.
    pub fn created(mut self, filter: Filter<String>) -> Self {
        self.created = Some(filter);
        self
    }

    /// Skip the first `offset` albums in the result.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Return at most `limit` albums.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub(crate) fn into_params(self) -> Map<String, Value> {
        let mut params = base("album-search");
        if let Some(images) = &self.images {
            params.insert("images".into(), images.to_value());
        }
        if let Some(storage) = &self.storage {
            params.insert("storage".into(), storage.to_value());
        }
        if let Some(created) = &self.created {
            params.insert("created".into(), created.to_value());
        }
        if let Some(offset) = self.offset {
            params.insert("offset".into(), Value::from(offset));
        }
        if let Some(limit) = self.limit {
            params.insert("limit".into(), Value::from(limit));
        }
        params
    }
}
