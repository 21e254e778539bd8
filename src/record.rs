use crate::error::MalformedValue;
use crate::schema::{TypeSchema, resolve_kind_for_key};
use crate::{Kind, coerce, statics};
use std::fmt;

/// One of the four fixed record groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CategoryKind {
    Skill,
    Sequence,
    Effect,
    Condition,
}

impl CategoryKind {
    pub const ALL: [CategoryKind; 4] = [
        CategoryKind::Skill,
        CategoryKind::Sequence,
        CategoryKind::Effect,
        CategoryKind::Condition,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CategoryKind::Skill => statics::CATEGORY_SKILL,
            CategoryKind::Sequence => statics::CATEGORY_SEQUENCE,
            CategoryKind::Effect => statics::CATEGORY_EFFECT,
            CategoryKind::Condition => statics::CATEGORY_CONDITION,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub key: String,
    pub kind: Kind,
    pub value: String,
}

impl Field {
    pub fn new(key: impl Into<String>, kind: Kind, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind,
            value: value.into(),
        }
    }

    pub fn validate(&self) -> Result<(), MalformedValue> {
        coerce::validate(self)
    }
}

/// An identified, named, field-bearing unit within a category.
/// Field keys are not required to be unique; order is edit order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: i64,
    pub name: String,
    pub fields: Vec<Field>,
}

impl Record {
    pub fn new(category: CategoryKind, id: i64) -> Self {
        Self {
            id,
            name: default_name(category, id),
            fields: Vec::new(),
        }
    }

    /// First field whose key matches, ignoring ASCII case.
    pub fn field(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.key.eq_ignore_ascii_case(key))
    }

    pub fn field_mut(&mut self, key: &str) -> Option<&mut Field> {
        self.fields
            .iter_mut()
            .find(|f| f.key.eq_ignore_ascii_case(key))
    }

    /// Replace all fields with fresh copies of the schema's preset.
    pub fn apply_preset(&mut self, schema: &TypeSchema) {
        self.fields = schema.default_preset.clone();
    }

    /// Append an empty string field keyed by the schema's first declared key
    /// (string keys first, then int, then float).
    pub fn add_empty_field(&mut self, schema: &TypeSchema) -> usize {
        let key = [Kind::String, Kind::Int, Kind::Float]
            .into_iter()
            .find_map(|kind| schema.keys(kind).first())
            .map(String::as_str)
            .unwrap_or(statics::KEY_NEW);
        self.fields.push(Field::new(key, Kind::String, ""));
        self.fields.len() - 1
    }

    pub fn remove_field(&mut self, index: usize) -> Option<Field> {
        (index < self.fields.len()).then(|| self.fields.remove(index))
    }

    pub fn move_field(&mut self, from: usize, to: usize) -> bool {
        if from >= self.fields.len() || to >= self.fields.len() {
            return false;
        }
        let field = self.fields.remove(from);
        self.fields.insert(to, field);
        true
    }

    /// Stable ordinal sort by key.
    pub fn sort_fields_by_key(&mut self) {
        self.fields.sort_by(|a, b| a.key.cmp(&b.key));
    }

    pub fn set_field_kind(&mut self, index: usize, kind: Kind) -> bool {
        match self.fields.get_mut(index) {
            Some(field) => {
                field.kind = kind;
                true
            }
            None => false,
        }
    }

    /// Set a field's key after the user picked it, re-deriving the kind from the
    /// schema when the key is declared there. Undeclared keys keep their kind.
    pub fn choose_key(&mut self, index: usize, schema: &TypeSchema, key: &str) -> bool {
        let Some(field) = self.fields.get_mut(index) else {
            return false;
        };
        field.key = key.to_string();
        if let Some(kind) = resolve_kind_for_key(schema, key) {
            field.kind = kind;
        }
        true
    }

    pub fn validation_warnings(&self) -> Vec<MalformedValue> {
        self.fields
            .iter()
            .filter_map(|f| f.validate().err())
            .collect()
    }

    /// Use the `DESC` field as the display name when it holds non-blank text.
    pub(crate) fn rename_from_desc(&mut self) {
        if let Some(desc) = self
            .field(statics::KEY_DESC)
            .filter(|f| !f.value.trim().is_empty())
            .map(|f| f.value.clone())
        {
            self.name = desc;
        }
    }
}

pub fn default_name(category: CategoryKind, id: i64) -> String {
    format!("{}_{id}", category.name())
}

/// Records of one category plus the id counter.
/// Ids are never reused within a session, except after an import recomputes the counter.
#[derive(Debug, Clone)]
pub struct Category {
    kind: CategoryKind,
    next_id: i64,
    nodes: Vec<Record>,
}

impl Category {
    pub fn new(kind: CategoryKind) -> Self {
        Self {
            kind,
            next_id: 1,
            nodes: Vec::new(),
        }
    }

    pub fn kind(&self) -> CategoryKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn next_id(&self) -> i64 {
        self.next_id
    }

    pub fn create_node(&mut self, schema: &TypeSchema) -> &mut Record {
        let id = self.next_id;
        self.next_id += 1;

        let mut record = Record::new(self.kind, id);
        record.apply_preset(schema);
        self.nodes.push(record);
        let last = self.nodes.len() - 1;
        &mut self.nodes[last]
    }

    pub fn remove_node(&mut self, id: i64) -> bool {
        let Some(index) = self.nodes.iter().position(|n| n.id == id) else {
            return false;
        };
        self.nodes.remove(index);
        true
    }

    pub fn find(&self, id: i64) -> Option<&Record> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn find_mut(&mut self, id: i64) -> Option<&mut Record> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn all_nodes(&self) -> &[Record] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Swap in a whole new record list and recompute the id counter as max id + 1.
    pub fn replace_nodes(&mut self, nodes: Vec<Record>) {
        self.next_id = nodes.iter().map(|n| n.id).max().map_or(1, |max| max + 1);
        self.nodes = nodes;
    }

    /// Make sure an empty category gets one record from its first schema.
    /// Returns the id of the first record, if any.
    pub fn ensure_seeded(&mut self, schemas: &[TypeSchema]) -> Option<i64> {
        if self.nodes.is_empty()
            && let Some(schema) = schemas.first()
        {
            return Some(self.create_node(schema).id);
        }
        self.nodes.first().map(|n| n.id)
    }
}
