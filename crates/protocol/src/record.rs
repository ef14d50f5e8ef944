//! Log record and payload value types
//!
//! A `Record` is the unit that flows through the engine: a routing tag, a
//! key/value payload, a monotonic id assigned by the upstream collector,
//! and the ids of any fragments that were fused into it.

use std::collections::HashMap;

use bytes::BytesMut;

use crate::error::RecordError;

/// A payload value
///
/// Upstream decoders produce byte buffers for log text and occasionally
/// scalars for structured fields. Only `Bytes` and `String` can carry log
/// text or identify a source; the other variants take the bypass paths.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Raw byte buffer (the common case for log text)
    Bytes(BytesMut),
    /// UTF-8 string
    String(String),
    /// Signed integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Boolean
    Bool(bool),
    /// Explicit null
    Null,
}

impl Value {
    /// View the value as bytes, if it is textual
    ///
    /// Returns `None` for scalar variants; there is no coercion.
    #[inline]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(buf) => Some(buf),
            Self::String(s) => Some(s.as_bytes()),
            _ => None,
        }
    }

    /// Byte length of a textual value, 0 for scalars
    #[inline]
    pub fn len(&self) -> usize {
        self.as_bytes().map_or(0, <[u8]>::len)
    }

    /// Whether the value carries no bytes
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Name of the variant, for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bytes(_) => "bytes",
            Self::String(_) => "string",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
            Self::Null => "null",
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&[u8]> for Value {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(BytesMut::from(bytes))
    }
}

impl From<BytesMut> for Value {
    fn from(buf: BytesMut) -> Self {
        Self::Bytes(buf)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// A structured log record
///
/// Records are mutated only by their current owner. The fusion engine
/// accretes fragment text onto a record with [`Record::append_to`] and
/// remembers each fragment's id in [`Record::ext_ids`], in arrival order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    tag: String,
    payload: HashMap<String, Value>,
    id: i64,
    ext_ids: Vec<i64>,
}

impl Record {
    /// Create a new record with an empty payload
    pub fn new(tag: impl Into<String>, id: i64) -> Self {
        Self {
            tag: tag.into(),
            payload: HashMap::new(),
            id,
            ext_ids: Vec::new(),
        }
    }

    /// The routing tag
    #[inline]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Replace the routing tag
    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.tag = tag.into();
    }

    /// The collector-assigned id
    #[inline]
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Replace the collector-assigned id
    pub fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    /// Ids of fragments fused into this record, in arrival order
    ///
    /// Empty until the first fragment is fused.
    #[inline]
    pub fn ext_ids(&self) -> &[i64] {
        &self.ext_ids
    }

    /// Remember a fused fragment's id
    pub fn push_ext_id(&mut self, id: i64) {
        self.ext_ids.push(id);
    }

    /// Insert a payload value, replacing any previous value for the key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.payload.insert(key.into(), value.into());
    }

    /// Look up a payload value
    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }

    /// Whether the payload has a value for the key
    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.payload.contains_key(key)
    }

    /// The full payload map
    #[inline]
    pub fn payload(&self) -> &HashMap<String, Value> {
        &self.payload
    }

    /// Byte length of the payload value at `key`, 0 if absent or scalar
    #[inline]
    pub fn payload_len(&self, key: &str) -> usize {
        self.payload.get(key).map_or(0, Value::len)
    }

    /// Append a fragment to the payload value at `key`
    ///
    /// Writes a single `\n` followed by `fragment` onto the existing
    /// value. A `String` value is converted to `Bytes` in place so later
    /// appends extend the same buffer.
    ///
    /// # Errors
    ///
    /// `MissingField` if the key is absent, `UnexpectedType` if the value
    /// is not textual. Either way the record is left untouched.
    pub fn append_to(&mut self, key: &str, fragment: &[u8]) -> Result<(), RecordError> {
        let value = self
            .payload
            .get_mut(key)
            .ok_or_else(|| RecordError::missing_field(key))?;

        match value {
            Value::Bytes(buf) => {
                buf.reserve(fragment.len() + 1);
                buf.extend_from_slice(b"\n");
                buf.extend_from_slice(fragment);
            }
            Value::String(s) => {
                let mut buf = BytesMut::with_capacity(s.len() + fragment.len() + 1);
                buf.extend_from_slice(s.as_bytes());
                buf.extend_from_slice(b"\n");
                buf.extend_from_slice(fragment);
                *value = Value::Bytes(buf);
            }
            other => return Err(RecordError::unexpected_type(key, other.type_name())),
        }

        Ok(())
    }

    /// Clear the record for pool reuse
    ///
    /// Keeps the payload map's allocation; drops tag, id and ext_ids.
    pub fn recycle(&mut self) {
        self.tag.clear();
        self.payload.clear();
        self.id = 0;
        self.ext_ids.clear();
    }
}
