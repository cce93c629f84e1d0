//! Records exchanged with a `wasmcloud:blobstore` provider.
//!
//! Data records use camelCase wire names; operation argument records use
//! snake_case, matching existing providers.

use actor_core::{Decoder, DecodeError, EncodeError, Encoder, Field, Record};

fn read_opt_string(d: &mut Decoder<'_>) -> Result<Option<String>, DecodeError> {
    d.read_nullable(|d| d.read_string())
}

fn write_opt_string(e: &mut Encoder<'_>, value: &Option<String>) -> Result<(), EncodeError> {
    e.write_nullable(value.as_deref(), |e, text| e.write_str(text))
}

/// A named bucket of blobs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Container {
    pub id: String,
}

impl Container {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl Record for Container {
    const FIELDS: &'static [Field<Self>] = &[Field {
        name: "id",
        decode: |r, d| {
            r.id = d.read_string()?;
            Ok(())
        },
        encode: |r, e| e.write_str(&r.id),
    }];
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerList {
    pub containers: Vec<Container>,
}

impl Record for ContainerList {
    const FIELDS: &'static [Field<Self>] = &[Field {
        name: "containers",
        decode: |r, d| {
            r.containers = d.read_list(|d| d.read_record())?;
            Ok(())
        },
        encode: |r, e| e.write_list(&r.containers, |e, item| e.write_record(item)),
    }];
}

/// Metadata describing one stored object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blob {
    pub id: String,
    pub container: Container,
    pub byte_size: u64,
}

impl Record for Blob {
    const FIELDS: &'static [Field<Self>] = &[
        Field {
            name: "id",
            decode: |r, d| {
                r.id = d.read_string()?;
                Ok(())
            },
            encode: |r, e| e.write_str(&r.id),
        },
        Field {
            name: "container",
            decode: |r, d| {
                r.container = d.read_record()?;
                Ok(())
            },
            encode: |r, e| e.write_record(&r.container),
        },
        Field {
            name: "byteSize",
            decode: |r, d| {
                r.byte_size = d.read_u64()?;
                Ok(())
            },
            encode: |r, e| e.write_u64(r.byte_size),
        },
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlobList {
    pub blobs: Vec<Blob>,
}

impl Record for BlobList {
    const FIELDS: &'static [Field<Self>] = &[Field {
        name: "blobs",
        decode: |r, d| {
            r.blobs = d.read_list(|d| d.read_record())?;
            Ok(())
        },
        encode: |r, e| e.write_list(&r.blobs, |e, item| e.write_record(item)),
    }];
}

/// Describes a chunked transfer of one blob.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transfer {
    pub blob_id: String,
    pub container: Container,
    pub chunk_size: u64,
    pub total_size: u64,
    pub total_chunks: u64,
    pub context: Option<String>,
}

impl Record for Transfer {
    const FIELDS: &'static [Field<Self>] = &[
        Field {
            name: "blobId",
            decode: |r, d| {
                r.blob_id = d.read_string()?;
                Ok(())
            },
            encode: |r, e| e.write_str(&r.blob_id),
        },
        Field {
            name: "container",
            decode: |r, d| {
                r.container = d.read_record()?;
                Ok(())
            },
            encode: |r, e| e.write_record(&r.container),
        },
        Field {
            name: "chunkSize",
            decode: |r, d| {
                r.chunk_size = d.read_u64()?;
                Ok(())
            },
            encode: |r, e| e.write_u64(r.chunk_size),
        },
        Field {
            name: "totalSize",
            decode: |r, d| {
                r.total_size = d.read_u64()?;
                Ok(())
            },
            encode: |r, e| e.write_u64(r.total_size),
        },
        Field {
            name: "totalChunks",
            decode: |r, d| {
                r.total_chunks = d.read_u64()?;
                Ok(())
            },
            encode: |r, e| e.write_u64(r.total_chunks),
        },
        Field {
            name: "context",
            decode: |r, d| {
                r.context = read_opt_string(d)?;
                Ok(())
            },
            encode: |r, e| write_opt_string(e, &r.context),
        },
    ];
}

/// One piece of a blob in transit. Chunks may arrive out of order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileChunk {
    pub sequence_no: u64,
    pub container: Container,
    pub id: String,
    pub total_bytes: u64,
    pub chunk_size: u64,
    pub context: Option<String>,
    pub chunk_bytes: Vec<u8>,
}

impl Record for FileChunk {
    const FIELDS: &'static [Field<Self>] = &[
        Field {
            name: "sequenceNo",
            decode: |r, d| {
                r.sequence_no = d.read_u64()?;
                Ok(())
            },
            encode: |r, e| e.write_u64(r.sequence_no),
        },
        Field {
            name: "container",
            decode: |r, d| {
                r.container = d.read_record()?;
                Ok(())
            },
            encode: |r, e| e.write_record(&r.container),
        },
        Field {
            name: "id",
            decode: |r, d| {
                r.id = d.read_string()?;
                Ok(())
            },
            encode: |r, e| e.write_str(&r.id),
        },
        Field {
            name: "totalBytes",
            decode: |r, d| {
                r.total_bytes = d.read_u64()?;
                Ok(())
            },
            encode: |r, e| e.write_u64(r.total_bytes),
        },
        Field {
            name: "chunkSize",
            decode: |r, d| {
                r.chunk_size = d.read_u64()?;
                Ok(())
            },
            encode: |r, e| e.write_u64(r.chunk_size),
        },
        Field {
            name: "context",
            decode: |r, d| {
                r.context = read_opt_string(d)?;
                Ok(())
            },
            encode: |r, e| write_opt_string(e, &r.context),
        },
        Field {
            name: "chunkBytes",
            decode: |r, d| {
                r.chunk_bytes = d.read_bytes()?;
                Ok(())
            },
            encode: |r, e| e.write_bytes(&r.chunk_bytes),
        },
    ];
}

/// Outcome of a blobstore operation that returns no data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlobstoreResult {
    pub success: bool,
    pub error: Option<String>,
}

impl Record for BlobstoreResult {
    const FIELDS: &'static [Field<Self>] = &[
        Field {
            name: "success",
            decode: |r, d| {
                r.success = d.read_bool()?;
                Ok(())
            },
            encode: |r, e| e.write_bool(r.success),
        },
        Field {
            name: "error",
            decode: |r, d| {
                r.error = read_opt_string(d)?;
                Ok(())
            },
            encode: |r, e| write_opt_string(e, &r.error),
        },
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateContainerArgs {
    pub id: String,
}

impl Record for CreateContainerArgs {
    const FIELDS: &'static [Field<Self>] = &[Field {
        name: "id",
        decode: |r, d| {
            r.id = d.read_string()?;
            Ok(())
        },
        encode: |r, e| e.write_str(&r.id),
    }];
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoveContainerArgs {
    pub id: String,
}

impl Record for RemoveContainerArgs {
    const FIELDS: &'static [Field<Self>] = &[Field {
        name: "id",
        decode: |r, d| {
            r.id = d.read_string()?;
            Ok(())
        },
        encode: |r, e| e.write_str(&r.id),
    }];
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoveObjectArgs {
    pub id: String,
    pub container_id: String,
}

impl Record for RemoveObjectArgs {
    const FIELDS: &'static [Field<Self>] = &[
        Field {
            name: "id",
            decode: |r, d| {
                r.id = d.read_string()?;
                Ok(())
            },
            encode: |r, e| e.write_str(&r.id),
        },
        Field {
            name: "container_id",
            decode: |r, d| {
                r.container_id = d.read_string()?;
                Ok(())
            },
            encode: |r, e| e.write_str(&r.container_id),
        },
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListObjectsArgs {
    pub container_id: String,
}

impl Record for ListObjectsArgs {
    const FIELDS: &'static [Field<Self>] = &[Field {
        name: "container_id",
        decode: |r, d| {
            r.container_id = d.read_string()?;
            Ok(())
        },
        encode: |r, e| e.write_str(&r.container_id),
    }];
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadChunkArgs {
    pub chunk: FileChunk,
}

impl Record for UploadChunkArgs {
    const FIELDS: &'static [Field<Self>] = &[Field {
        name: "chunk",
        decode: |r, d| {
            r.chunk = d.read_record()?;
            Ok(())
        },
        encode: |r, e| e.write_record(&r.chunk),
    }];
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartDownloadArgs {
    pub blob_id: String,
    pub container_id: String,
    pub chunk_size: u64,
    pub context: Option<String>,
}

impl Record for StartDownloadArgs {
    const FIELDS: &'static [Field<Self>] = &[
        Field {
            name: "blob_id",
            decode: |r, d| {
                r.blob_id = d.read_string()?;
                Ok(())
            },
            encode: |r, e| e.write_str(&r.blob_id),
        },
        Field {
            name: "container_id",
            decode: |r, d| {
                r.container_id = d.read_string()?;
                Ok(())
            },
            encode: |r, e| e.write_str(&r.container_id),
        },
        Field {
            name: "chunk_size",
            decode: |r, d| {
                r.chunk_size = d.read_u64()?;
                Ok(())
            },
            encode: |r, e| e.write_u64(r.chunk_size),
        },
        Field {
            name: "context",
            decode: |r, d| {
                r.context = read_opt_string(d)?;
                Ok(())
            },
            encode: |r, e| write_opt_string(e, &r.context),
        },
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartUploadArgs {
    pub chunk: FileChunk,
}

impl Record for StartUploadArgs {
    const FIELDS: &'static [Field<Self>] = &[Field {
        name: "chunk",
        decode: |r, d| {
            r.chunk = d.read_record()?;
            Ok(())
        },
        encode: |r, e| e.write_record(&r.chunk),
    }];
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetObjectInfoArgs {
    pub blob_id: String,
    pub container_id: String,
}

impl Record for GetObjectInfoArgs {
    const FIELDS: &'static [Field<Self>] = &[
        Field {
            name: "blob_id",
            decode: |r, d| {
                r.blob_id = d.read_string()?;
                Ok(())
            },
            encode: |r, e| e.write_str(&r.blob_id),
        },
        Field {
            name: "container_id",
            decode: |r, d| {
                r.container_id = d.read_string()?;
                Ok(())
            },
            encode: |r, e| e.write_str(&r.container_id),
        },
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceiveChunkArgs {
    pub chunk: FileChunk,
}

impl Record for ReceiveChunkArgs {
    const FIELDS: &'static [Field<Self>] = &[Field {
        name: "chunk",
        decode: |r, d| {
            r.chunk = d.read_record()?;
            Ok(())
        },
        encode: |r, e| e.write_record(&r.chunk),
    }];
}
