use super::{base, Filter, StringFilter};
use crate::Result;
use base64::Engine as _;
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Where the image content comes from.
///
/// Byte and file sources are sent inline, base64-encoded; URL and
/// existing-image sources are fetched server-side.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Raw image bytes, encoded into the request body.
    Bytes(Vec<u8>),
    /// Local file, read at enqueue time and sent as bytes.
    File(PathBuf),
    /// Publicly reachable URL the server downloads from.
    Url(String),
    /// ID of an image already stored in the account.
    Image(String),
}

impl ImageSource {
    async fn resolve(self) -> Result<(&'static str, String)> {
        match self {
            ImageSource::Bytes(bytes) => {
                Ok(("bytes", base64::engine::general_purpose::STANDARD.encode(bytes)))
            }
            ImageSource::File(path) => {
                let bytes = tokio::fs::read(&path).await?;
                Ok(("bytes", base64::engine::general_purpose::STANDARD.encode(bytes)))
            }
            ImageSource::Url(url) => Ok(("url", url)),
            ImageSource::Image(id) => Ok(("image", id)),
        }
    }
}

/// Rotation transform. `angle` must be 90, 180 or 270.
#[derive(Debug, Clone, Copy)]
pub struct Rotate {
    pub angle: u16,
    pub clockwise: bool,
}

impl Rotate {
    fn to_value(self) -> Value {
        let mut map = Map::new();
        map.insert("angle".into(), Value::from(self.angle));
        map.insert("clockwise".into(), Value::Bool(self.clockwise));
        Value::Object(map)
    }
}

/// Resize transform.
#[derive(Debug, Clone, Copy)]
pub struct Resize {
    pub width: u32,
    pub height: u32,
    pub keep_ratio: bool,
}

impl Resize {
    fn to_value(self) -> Value {
        let mut map = Map::new();
        map.insert("width".into(), Value::from(self.width));
        map.insert("height".into(), Value::from(self.height));
        map.insert("keepRatio".into(), Value::Bool(self.keep_ratio));
        Value::Object(map)
    }
}

/// Crop transform, edge coordinates in pixels.
#[derive(Debug, Clone, Copy)]
pub struct Crop {
    pub top: u32,
    pub left: u32,
    pub bottom: u32,
    pub right: u32,
}

impl Crop {
    fn to_value(self) -> Value {
        let mut map = Map::new();
        map.insert("top".into(), Value::from(self.top));
        map.insert("left".into(), Value::from(self.left));
        map.insert("bottom".into(), Value::from(self.bottom));
        map.insert("right".into(), Value::from(self.right));
        Value::Object(map)
    }
}

/// Parameters for `image-create`.
///
/// With `asynchronous(true)` the server answers immediately with a job
/// handle instead of the stored image; `Client::run` with `wait = true`
/// turns that handle into a poll and settles the action when the job
/// finishes.
#[derive(Debug, Clone)]
pub struct ImageCreateParams {
    id: String,
    source: ImageSource,
    public: bool,
    shorten: Option<bool>,
    album: Option<String>,
    name: Option<String>,
    tags: Option<Vec<String>>,
    metadata: Option<Value>,
    rotate: Option<Rotate>,
    resize: Option<Resize>,
    crop: Option<Crop>,
    quality: Option<u8>,
    asynchronous: Option<bool>,
}

impl ImageCreateParams {
    /// `id` is the caller-chosen unique image ID, at most 100 characters.
    pub fn new(id: impl Into<String>, source: ImageSource) -> Self {
        Self {
            id: id.into(),
            source,
            public: false,
            shorten: None,
            album: None,
            name: None,
            tags: None,
            metadata: None,
            rotate: None,
            resize: None,
            crop: None,
            quality: None,
            asynchronous: None,
        }
    }

    /// Generate a public URL for the image.
    pub fn public(mut self, public: bool) -> Self {
        self.public = public;
        self
    }

    /// Shorten the public URL. Only meaningful together with `public(true)`.
    pub fn shorten(mut self, shorten: bool) -> Self {
        self.shorten = Some(shorten);
        self
    }

    /// Album to put the image in.
    pub fn album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }

    /// Image name, at most 100 characters.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Tags: at most 50 of them, each at most 50 characters.
    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    /// User-defined metadata; at most 5000 characters JSON-serialized.
    pub fn metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn rotate(mut self, rotate: Rotate) -> Self {
        self.rotate = Some(rotate);
        self
    }

    pub fn resize(mut self, resize: Resize) -> Self {
        self.resize = Some(resize);
        self
    }

    pub fn crop(mut self, crop: Crop) -> Self {
        self.crop = Some(crop);
        self
    }

    /// JPEG quality (1-100) for the transformed image. Ignored unless a
    /// rotate, resize or crop transform is set.
    pub fn quality(mut self, quality: u8) -> Self {
        self.quality = Some(quality);
        self
    }

    /// Ask the server to process the upload asynchronously and answer with
    /// a job handle.
    pub fn asynchronous(mut self, asynchronous: bool) -> Self {
        self.asynchronous = Some(asynchronous);
        self
    }

    pub(crate) async fn into_params(self) -> Result<Map<String, Value>> {
        let mut params = base("image-create");
        params.insert("id".into(), Value::String(self.id));

        let (source_type, source) = self.source.resolve().await?;
        params.insert("type".into(), Value::String(source_type.into()));
        params.insert("source".into(), Value::String(source));

        params.insert("public".into(), Value::Bool(self.public));
        if self.public {
            if let Some(shorten) = self.shorten {
                params.insert("shorten".into(), Value::Bool(shorten));
            }
        }
        if let Some(album) = self.album {
            params.insert("album".into(), Value::String(album));
        }
        if let Some(name) = self.name {
            params.insert("name".into(), Value::String(name));
        }
        if let Some(tags) = self.tags {
            params.insert(
                "tags".into(),
                Value::Array(tags.into_iter().map(Value::String).collect()),
            );
        }
        if let Some(metadata) = self.metadata {
            params.insert("metadata".into(), metadata);
        }

        let has_transform =
            self.rotate.is_some() || self.resize.is_some() || self.crop.is_some();
        if let Some(rotate) = self.rotate {
            params.insert("rotate".into(), rotate.to_value());
        }
        if let Some(resize) = self.resize {
            params.insert("resize".into(), resize.to_value());
        }
        if let Some(crop) = self.crop {
            params.insert("crop".into(), crop.to_value());
        }
        if has_transform {
            if let Some(quality) = self.quality {
                params.insert("quality".into(), Value::from(quality));
            }
        }

        if let Some(asynchronous) = self.asynchronous {
            params.insert("async".into(), Value::Bool(asynchronous));
        }

        Ok(params)
    }
}

/// Search criteria for `image-search`.
#[derive(Debug, Clone, Default)]
pub struct ImageSearchParams {
    album: Option<StringFilter>,
    format: Option<StringFilter>,
    width: Option<Filter<u64>>,
    height: Option<Filter<u64>>,
    filesize: Option<Filter<u64>>,
    public: Option<bool>,
    tags: Option<StringFilter>,
    created: Option<Filter<String>>,
    offset: Option<u64>,
    limit: Option<u64>,
}

impl ImageSearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by album ID(s).
    pub fn album(mut self, filter: impl Into<StringFilter>) -> Self {
        self.album = Some(filter.into());
        self
    }

    /// Filter by image format (`jpg`, `png`).
    pub fn format(mut self, filter: impl Into<StringFilter>) -> Self {
        self.format = Some(filter.into());
        self
    }

    pub fn width(mut self, filter: Filter<u64>) -> Self {
        self.width = Some(filter);
        self
    }

    pub fn height(mut self, filter: Filter<u64>) -> Self {
        self.height = Some(filter);
        self
    }

    pub fn filesize(mut self, filter: Filter<u64>) -> Self {
        self.filesize = Some(filter);
        self
    }

    /// Filter by the `public` flag.
    pub fn public(mut self, public: bool) -> Self {
        self.public = Some(public);
        self
    }

    /// Filter by tag(s).
    pub fn tags(mut self, filter: impl Into<StringFilter>) -> Self {
        self.tags = Some(filter.into());
        self
    }

    /// Filter by image creation time, ISO 8601.
    pub fn created(mut self, filter: Filter<String>) -> Self {
        self.created = Some(filter);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub(crate) fn into_params(self) -> Map<String, Value> {
        let mut params = base("image-search");
        if let Some(album) = &self.album {
            params.insert("album".into(), album.to_value());
        }
        if let Some(format) = &self.format {
            params.insert("format".into(), format.to_value());
        }
        if let Some(width) = &self.width {
            params.insert("width".into(), width.to_value());
        }
        if let Some(height) = &self.height {
            params.insert("height".into(), height.to_value());
        }
        if let Some(filesize) = &self.filesize {
            params.insert("filesize".into(), filesize.to_value());
        }
        if let Some(public) = self.public {
            params.insert("public".into(), Value::Bool(public));
        }
        if let Some(tags) = &self.tags {
            params.insert("tags".into(), tags.to_value());
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn bytes_source_is_base64_encoded() {
        let params = ImageCreateParams::new("pic", ImageSource::Bytes(vec![1, 2, 3]))
            .into_params()
            .await
            .unwrap();

        assert_eq!(params["action"], json!("image-create"));
        assert_eq!(params["type"], json!("bytes"));
        assert_eq!(params["source"], json!("AQID"));
        assert_eq!(params["public"], json!(false));
    }

    #[tokio::test]
    async fn url_source_passes_through() {
        let params = ImageCreateParams::new(
            "pic",
            ImageSource::Url("https://example.com/cat.jpg".into()),
        )
        .into_params()
        .await
        .unwrap();

        assert_eq!(params["type"], json!("url"));
        assert_eq!(params["source"], json!("https://example.com/cat.jpg"));
    }

    #[tokio::test]
    async fn quality_requires_a_transform() {
        let params = ImageCreateParams::new("pic", ImageSource::Image("other".into()))
            .quality(80)
            .into_params()
            .await
            .unwrap();
        assert!(!params.contains_key("quality"));

        let params = ImageCreateParams::new("pic", ImageSource::Image("other".into()))
            .resize(Resize {
                width: 640,
                height: 480,
                keep_ratio: true,
            })
            .quality(80)
            .into_params()
            .await
            .unwrap();
        assert_eq!(params["quality"], json!(80));
        assert_eq!(
            params["resize"],
            json!({ "width": 640, "height": 480, "keepRatio": true })
        );
    }

    #[tokio::test]
    async fn shorten_requires_public() {
        let params = ImageCreateParams::new("pic", ImageSource::Image("other".into()))
            .shorten(true)
            .into_params()
            .await
            .unwrap();
        assert!(!params.contains_key("shorten"));

        let params = ImageCreateParams::new("pic", ImageSource::Image("other".into()))
            .public(true)
            .shorten(true)
            .into_params()
            .await
            .unwrap();
        assert_eq!(params["shorten"], json!(true));
    }

    #[tokio::test]
    async fn async_flag_uses_wire_name() {
        let params = ImageCreateParams::new("pic", ImageSource::Image("other".into()))
            .asynchronous(true)
            .into_params()
            .await
            .unwrap();
        assert_eq!(params["async"], json!(true));
    }

    #[test]
    fn search_emits_only_set_criteria() {
        let params = ImageSearchParams::new()
            .album("holiday")
            .format(vec!["jpg".to_string(), "png".to_string()])
            .width(Filter::Between(640, 1920))
            .public(true)
            .into_params();

        assert_eq!(params["action"], json!("image-search"));
        assert_eq!(params["album"], json!("holiday"));
        assert_eq!(params["format"], json!(["jpg", "png"]));
        assert_eq!(params["width"], json!({ "from": 640, "to": 1920 }));
        assert_eq!(params["public"], json!(true));
        assert!(!params.contains_key("height"));
        assert!(!params.contains_key("tags"));
    }
}
