use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ServiceError;

pub const INVALID_RECORD: &str = "Invalid data format";
pub const INVALID_DOCUMENT: &str = "Invalid data format: must include users and parts arrays";

/// The whole persisted state.
///
/// Both collections are always present. Elements are kept as raw JSON since
/// only `id` and the discriminant fields carry meaning; unknown top-level
/// keys ride along in `extra` so a replaced document is written back as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub users: Vec<Value>,
    pub parts: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Document {
    /// Shape check for a caller-supplied document: `users` and `parts` must be arrays.
    pub fn from_value(value: Value) -> Result<Self, ServiceError> {
        serde_json::from_value(value).map_err(|_| ServiceError::validation(INVALID_DOCUMENT))
    }

    /// Parse a stored file. A missing collection reads as empty so the other
    /// one is kept; collections of the wrong type are still a parse error.
    pub fn from_stored(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice::<StoredDocument>(bytes).map(Into::into)
    }

    pub fn collection(&self, kind: RecordKind) -> &[Value] {
        match kind {
            RecordKind::User => &self.users,
            RecordKind::Part => &self.parts,
        }
    }

    fn collection_mut(&mut self, kind: RecordKind) -> &mut Vec<Value> {
        match kind {
            RecordKind::User => &mut self.users,
            RecordKind::Part => &mut self.parts,
        }
    }

    /// Replace the first element with the same `id` in place, or append.
    pub fn upsert(&mut self, record: ClassifiedRecord) -> UpsertOutcome {
        let ClassifiedRecord { kind, record } = record;
        let items = self.collection_mut(kind);
        let position = items.iter().position(|existing| record.matches(existing));
        match position {
            Some(index) => {
                items[index] = record.into_value();
                UpsertOutcome::Replaced(index)
            }
            None => {
                items.push(record.into_value());
                UpsertOutcome::Inserted(items.len() - 1)
            }
        }
    }
}

#[derive(Deserialize)]
struct StoredDocument {
    #[serde(default)]
    users: Vec<Value>,
    #[serde(default)]
    parts: Vec<Value>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<StoredDocument> for Document {
    fn from(s: StoredDocument) -> Self {
        Self { users: s.users, parts: s.parts, extra: s.extra }
    }
}

/// Which collection a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    User,
    Part,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::User => "user",
            RecordKind::Part => "part",
        }
    }
}

/// A schema-less record: an optional `id` plus whatever else the caller sent.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    pub fn new(fields: Map<String, Value>) -> Self { Self { fields } }

    pub fn id(&self) -> Option<&Value> { self.fields.get("id") }

    pub fn field(&self, name: &str) -> Option<&Value> { self.fields.get(name) }

    /// Same identifier as a stored element. A missing `id` only matches a missing `id`.
    fn matches(&self, existing: &Value) -> bool {
        existing.as_object().is_some_and(|obj| match (obj.get("id"), self.id()) {
            (None, None) => true,
            (Some(a), Some(b)) => same_id(a, b),
            _ => false,
        })
    }

    pub fn into_value(self) -> Value { Value::Object(self.fields) }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRecord {
    pub kind: RecordKind,
    pub record: Record,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted(usize),
    Replaced(usize),
}

/// Decide whether a submitted record is a user or a part.
///
/// A truthy `birthdate` makes it a user; otherwise a truthy `userId` makes it
/// a part. A record carrying both is a user. Anything else, including
/// non-object bodies, is rejected.
pub fn classify(value: Value) -> Result<ClassifiedRecord, ServiceError> {
    let Value::Object(fields) = value else {
        return Err(ServiceError::validation(INVALID_RECORD));
    };
    let record = Record::new(fields);
    let kind = if record.field("birthdate").is_some_and(is_truthy) {
        RecordKind::User
    } else if record.field("userId").is_some_and(is_truthy) {
        RecordKind::Part
    } else {
        return Err(ServiceError::validation(INVALID_RECORD));
    };
    Ok(ClassifiedRecord { kind, record })
}

/// Strict equality on ids: numbers by value (`1` equals `1.0`), arrays and
/// objects never equal anything, everything else structurally.
fn same_id(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::Array(_) | Value::Object(_), _) | (_, Value::Array(_) | Value::Object(_)) => false,
        _ => a == b,
    }
}

/// JavaScript truthiness over JSON values.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
