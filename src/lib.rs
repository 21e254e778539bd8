//! Core library for the skill tree data editor.
//! Provides the typed record model for the Skill/Sequence/Effect/Condition categories,
//! a lenient parser and canonical writer for category documents, and the
//! cross-category reference resolver behind the summary tree.

pub mod coerce;
pub mod document;
pub mod error;
pub mod parse;
mod record;
pub mod resolve;
mod schema;
pub mod statics;
mod store;
pub mod transfer;
mod value;

pub use coerce::Kind;
pub use error::{MalformedValue, ParseError, TransferError};
pub use parse::ParseMode;
pub use record::{Category, CategoryKind, Field, Record, default_name};
pub use schema::{
    KeyCatalog, SchemaCatalog, StaticKeyCatalog, TypeSchema, effective_allowed_keys,
    resolve_kind_for_key,
};
pub use store::RecordStore;
pub use value::{DocValue, Document, Entries};
