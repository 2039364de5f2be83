use crate::action::{Action, ActionHandle, ActionId};
use crate::actions::{
    self, AccountInfoParams, AlbumCreateParams, AlbumSearchParams, ImageCreateParams,
    ImageSearchParams,
};
use crate::client::builder::ClientBuilder;
use crate::codec::WireCodec;
use crate::dispatch::{DispatchError, Dispatcher, RunOptions};
use crate::transport::Transport;
use crate::Result;
use bytes::Bytes;
use serde_json::Value;

/// PixVault API client.
///
/// Queue any number of actions, then [`run`](Client::run) them as one
/// batched request. Each enqueue method returns an [`ActionHandle`] naming
/// the queued action; `run` returns the settled [`Action`]s.
///
/// Action IDs are monotonic for the lifetime of the client; they do not
/// restart after a run. A client is single-threaded by contract: share it
/// across tasks only behind external synchronization.
pub struct Client {
    transport: Box<dyn Transport>,
    codec: Box<dyn WireCodec>,
    queue: Vec<Action>,
    next_id: u64,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("queue", &self.queue)
            .field("next_id", &self.next_id)
            .finish_non_exhaustive()
    }
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub(crate) fn new(transport: Box<dyn Transport>, codec: Box<dyn WireCodec>) -> Self {
        Self {
            transport,
            codec,
            queue: Vec::new(),
            next_id: 0,
        }
    }

    /// Queue an `account-info` request.
    pub fn account_info(&mut self, params: AccountInfoParams) -> ActionHandle {
        self.enqueue(params.into_params())
    }

    /// Queue an `album-create`.
    pub fn album_create(&mut self, params: AlbumCreateParams) -> ActionHandle {
        self.enqueue(params.into_params())
    }

    /// Queue an `album-info` for the album `id`.
    pub fn album_info(&mut self, id: &str) -> ActionHandle {
        self.enqueue_with_id("album-info", id)
    }

    /// Queue an `album-remove`.
    pub fn album_remove(&mut self, id: &str) -> ActionHandle {
        self.enqueue_with_id("album-remove", id)
    }

    /// Queue an `album-update` setting the album's name.
    pub fn album_update(&mut self, id: &str, name: &str) -> ActionHandle {
        let mut params = actions::base("album-update");
        params.insert("id".into(), Value::String(id.into()));
        params.insert("name".into(), Value::String(name.into()));
        self.enqueue(params)
    }

    /// Queue an `album-search`.
    pub fn album_search(&mut self, params: AlbumSearchParams) -> ActionHandle {
        self.enqueue(params.into_params())
    }

    /// Queue an `image-create`.
    ///
    /// Async because a file source is read (and base64-encoded) here, at
    /// enqueue time, so that `run` works from fully resolved parameters.
    pub async fn image_create(&mut self, params: ImageCreateParams) -> Result<ActionHandle> {
        let params = params.into_params().await?;
        Ok(self.enqueue(params))
    }

    /// Queue an `image-info` for the image `id`.
    pub fn image_info(&mut self, id: &str) -> ActionHandle {
        self.enqueue_with_id("image-info", id)
    }

    /// Queue an `image-remove`.
    pub fn image_remove(&mut self, id: &str) -> ActionHandle {
        self.enqueue_with_id("image-remove", id)
    }

    /// Queue an `image-search`.
    pub fn image_search(&mut self, params: ImageSearchParams) -> ActionHandle {
        self.enqueue(params.into_params())
    }

    /// Queue a `job-view` for a job handle obtained from an asynchronous
    /// image create.
    pub fn job_view(&mut self, id: &str) -> ActionHandle {
        self.enqueue_with_id("job-view", id)
    }

    /// Fetch an image's binary contents immediately, bypassing the queue.
    pub async fn image_get(&self, id: &str) -> Result<Bytes> {
        let mut params = actions::base("image-get");
        params.insert("id".into(), Value::String(id.into()));
        let body = self.codec.encode(&[&params])?;
        self.transport.send(body).await
    }

    /// Actions queued for the next run.
    pub fn queued(&self) -> &[Action] {
        &self.queue
    }

    /// Drop all queued actions without sending them.
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Send every queued action as one batch and settle the results.
    ///
    /// With `wait` set in `opts`, successful asynchronous image creates are
    /// polled until their job completes; those actions appear in the output
    /// after the synchronously settled ones, in completion order. The queue
    /// is consumed whether or not the call succeeds; on failure the
    /// [`DispatchError`] carries every action settled before the abort.
    pub async fn run(&mut self, opts: RunOptions) -> std::result::Result<Vec<Action>, DispatchError> {
        let queued = std::mem::take(&mut self.queue);
        Dispatcher::new(self.transport.as_ref(), self.codec.as_ref())
            .run(queued, &opts)
            .await
    }

    fn enqueue_with_id(&mut self, action: &str, id: &str) -> ActionHandle {
        let mut params = actions::base(action);
        params.insert("id".into(), Value::String(id.into()));
        self.enqueue(params)
    }

    fn enqueue(&mut self, params: serde_json::Map<String, Value>) -> ActionHandle {
        self.next_id += 1;
        let action = Action::new(ActionId(self.next_id), params);
        let handle = action.handle();
        self.queue.push(action);
        handle
    }
}
