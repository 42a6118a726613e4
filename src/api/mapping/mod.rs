use super::owned;
use bytes::Bytes;

/// Mapping update for a document type, with the mapping already serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct PutMappingRequest {
    pub indices: Vec<String>,
    pub doc_type: String,
    pub source: Bytes,
}

impl PutMappingRequest {
    pub fn new(source: impl Into<Bytes>, doc_type: impl ToString, indices: &[&str]) -> Self {
        Self {
            indices: owned(indices),
            doc_type: doc_type.to_string(),
            source: source.into(),
        }
    }
}
