//! Blob store capability contract.
//!
//! Guests need the `wasmcloud:blobstore` link to use [`Blobstore`]. Downloads
//! are asynchronous: [`Blobstore::start_download`] returns at once and the
//! provider then streams the blob back as `ReceiveChunk` calls, which a guest
//! serves with [`register_receive_chunk`].

use std::sync::Arc;

use actor_core::{HandlerResult, HostClient, HostTransport, OperationRegistry};
use log::debug;

mod schema;

pub use schema::*;

/// Contract namespace of blob store providers.
pub const NAMESPACE: &str = "wasmcloud:blobstore";

/// Creates a container, answering with the created [`Container`].
pub const OP_CREATE_CONTAINER: &str = "CreateContainer";
pub const OP_REMOVE_CONTAINER: &str = "RemoveContainer";
pub const OP_REMOVE_OBJECT: &str = "RemoveObject";
/// Lists the blobs of one container as a [`BlobList`].
pub const OP_LIST_OBJECTS: &str = "ListObjects";
/// Stores one chunk of a blob whose upload was started earlier.
pub const OP_UPLOAD_CHUNK: &str = "UploadChunk";
/// Requests a chunked download; chunks arrive later as [`OP_RECEIVE_CHUNK`].
pub const OP_START_DOWNLOAD: &str = "StartDownload";
/// Starts an upload with a metadata-carrying first chunk.
pub const OP_START_UPLOAD: &str = "StartUpload";
/// Inbound delivery of one downloaded chunk.
pub const OP_RECEIVE_CHUNK: &str = "ReceiveChunk";
pub const OP_GET_OBJECT_INFO: &str = "GetObjectInfo";

/// Outbound client for a blob store provider.
#[derive(Debug, Clone)]
pub struct Blobstore {
    client: HostClient,
}

impl Blobstore {
    /// Client for the provider linked on the default binding.
    pub fn new(transport: Arc<dyn HostTransport>) -> Self {
        Self::from_client(HostClient::new(transport, NAMESPACE))
    }

    /// Client for the provider linked on `binding`.
    pub fn with_binding(transport: Arc<dyn HostTransport>, binding: impl Into<String>) -> Self {
        Self::from_client(HostClient::new(transport, NAMESPACE).with_binding(binding))
    }

    /// Wraps a client obtained elsewhere, e.g. from `Guest::host_client`.
    pub fn from_client(client: HostClient) -> Self {
        Self { client }
    }

    pub fn binding(&self) -> &str {
        self.client.binding()
    }

    pub fn create_container(&self, id: impl Into<String>) -> HandlerResult<Container> {
        let args = CreateContainerArgs { id: id.into() };
        self.client.call(OP_CREATE_CONTAINER, &args)
    }

    pub fn remove_container(&self, id: impl Into<String>) -> HandlerResult<BlobstoreResult> {
        let args = RemoveContainerArgs { id: id.into() };
        self.client.call(OP_REMOVE_CONTAINER, &args)
    }

    pub fn remove_object(
        &self,
        id: impl Into<String>,
        container_id: impl Into<String>,
    ) -> HandlerResult<BlobstoreResult> {
        let args = RemoveObjectArgs {
            id: id.into(),
            container_id: container_id.into(),
        };
        self.client.call(OP_REMOVE_OBJECT, &args)
    }

    pub fn list_objects(&self, container_id: impl Into<String>) -> HandlerResult<BlobList> {
        let args = ListObjectsArgs {
            container_id: container_id.into(),
        };
        self.client.call(OP_LIST_OBJECTS, &args)
    }

    pub fn upload_chunk(&self, chunk: FileChunk) -> HandlerResult<BlobstoreResult> {
        self.client.call(OP_UPLOAD_CHUNK, &UploadChunkArgs { chunk })
    }

    /// Asks the provider to stream `blob_id` back in `chunk_size` pieces.
    ///
    /// `context` is echoed back on every chunk so the guest can correlate
    /// concurrent downloads.
    pub fn start_download(
        &self,
        blob_id: impl Into<String>,
        container_id: impl Into<String>,
        chunk_size: u64,
        context: Option<String>,
    ) -> HandlerResult<BlobstoreResult> {
        let args = StartDownloadArgs {
            blob_id: blob_id.into(),
            container_id: container_id.into(),
            chunk_size,
            context,
        };
        debug!(
            "event=start_download module=blobstore blob={} container={} chunk_size={}",
            args.blob_id, args.container_id, args.chunk_size
        );
        self.client.call(OP_START_DOWNLOAD, &args)
    }

    pub fn start_upload(&self, chunk: FileChunk) -> HandlerResult<BlobstoreResult> {
        debug!(
            "event=start_upload module=blobstore blob={} container={} total_bytes={}",
            chunk.id, chunk.container.id, chunk.total_bytes
        );
        self.client.call(OP_START_UPLOAD, &StartUploadArgs { chunk })
    }

    pub fn get_object_info(
        &self,
        blob_id: impl Into<String>,
        container_id: impl Into<String>,
    ) -> HandlerResult<Blob> {
        let args = GetObjectInfoArgs {
            blob_id: blob_id.into(),
            container_id: container_id.into(),
        };
        self.client.call(OP_GET_OBJECT_INFO, &args)
    }
}

/// Registers `handler` for chunks delivered by the provider.
pub fn register_receive_chunk<F>(registry: &mut OperationRegistry, handler: F)
where
    F: Fn(FileChunk) -> HandlerResult<()> + 'static,
{
    registry.register_void(OP_RECEIVE_CHUNK, move |args: ReceiveChunkArgs| {
        handler(args.chunk)
    });
}
