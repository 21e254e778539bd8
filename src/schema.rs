//! Per-category sub-type schemas and the allowed-key rules built on them.

use crate::{CategoryKind, Field, Kind};
use indexmap::IndexMap;
use std::collections::{BTreeSet, HashMap};

/// A named sub-type within a category: allowed keys per kind plus a default field preset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSchema {
    pub type_name: String,
    pub int_keys: Vec<String>,
    pub float_keys: Vec<String>,
    pub string_keys: Vec<String>,
    pub default_preset: Vec<Field>,
}

impl TypeSchema {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            int_keys: Vec::new(),
            float_keys: Vec::new(),
            string_keys: Vec::new(),
            default_preset: Vec::new(),
        }
    }

    pub fn with_keys<I, S>(mut self, kind: Kind, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys_mut(kind).extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn with_preset(mut self, preset: impl IntoIterator<Item = Field>) -> Self {
        self.default_preset.extend(preset);
        self
    }

    /// Declared keys for a kind, in declaration order.
    pub fn keys(&self, kind: Kind) -> &[String] {
        match kind {
            Kind::Int => &self.int_keys,
            Kind::Float => &self.float_keys,
            Kind::String => &self.string_keys,
        }
    }

    fn keys_mut(&mut self, kind: Kind) -> &mut Vec<String> {
        match kind {
            Kind::Int => &mut self.int_keys,
            Kind::Float => &mut self.float_keys,
            Kind::String => &mut self.string_keys,
        }
    }
}

/// Externally supplied allowed key names per (category, kind).
pub trait KeyCatalog {
    fn lookup(&self, category: CategoryKind, kind: Kind) -> BTreeSet<String>;
}

/// A key catalog held in memory, e.g. filled from hand-authored enumerations.
#[derive(Debug, Clone, Default)]
pub struct StaticKeyCatalog {
    keys: HashMap<(CategoryKind, Kind), BTreeSet<String>>,
}

impl StaticKeyCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<I, S>(&mut self, category: CategoryKind, kind: Kind, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys
            .entry((category, kind))
            .or_default()
            .extend(keys.into_iter().map(Into::into));
    }
}

impl KeyCatalog for StaticKeyCatalog {
    fn lookup(&self, category: CategoryKind, kind: Kind) -> BTreeSet<String> {
        self.keys.get(&(category, kind)).cloned().unwrap_or_default()
    }
}

/// Union of the schema's declared keys and the catalog's keys for the kind,
/// deduplicated and sorted ordinally. Recomputed on every call.
pub fn effective_allowed_keys(
    schema: &TypeSchema,
    category: CategoryKind,
    kind: Kind,
    catalog: &dyn KeyCatalog,
) -> Vec<String> {
    let mut keys = catalog.lookup(category, kind);
    keys.extend(schema.keys(kind).iter().cloned());
    keys.into_iter().collect()
}

/// Kind under which the schema declares `key`, checking Int, Float, String in order.
pub fn resolve_kind_for_key(schema: &TypeSchema, key: &str) -> Option<Kind> {
    Kind::ALL
        .into_iter()
        .find(|kind| schema.keys(*kind).iter().any(|k| k == key))
}

/// Ordered sub-type schemas for every category. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    entries: IndexMap<CategoryKind, Vec<TypeSchema>>,
}

impl SchemaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schema(mut self, category: CategoryKind, schema: TypeSchema) -> Self {
        self.entries.entry(category).or_default().push(schema);
        self
    }

    pub fn schemas_for(&self, category: CategoryKind) -> &[TypeSchema] {
        self.entries
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn find(&self, category: CategoryKind, type_name: &str) -> Option<&TypeSchema> {
        self.schemas_for(category)
            .iter()
            .find(|s| s.type_name == type_name)
    }

    /// The editor's stock sub-types.
    pub fn builtin() -> Self {
        use Kind::{Float, Int, String};

        Self::new()
            .with_schema(
                CategoryKind::Skill,
                TypeSchema::new("Active")
                    .with_keys(Int, ["NEXT_SKILL_ID", "ENABLE_INDICATOR_SKILL"])
                    .with_keys(Float, ["COOL_TIME", "ATTACK_DISTANCE", "USE_EP", "GET_EP"])
                    .with_keys(
                        String,
                        ["SKILL_TYPE", "SKILL_OPTIONS", "ACTIVATE_TYPES", "RANGE_TYPE", "DESC"],
                    )
                    .with_preset([
                        Field::new("SKILL_TYPE", String, "ACTIVE"),
                        Field::new("COOL_TIME", Float, "5"),
                        Field::new("USE_EP", Float, "0"),
                        Field::new("DESC", String, ""),
                    ]),
            )
            .with_schema(
                CategoryKind::Skill,
                TypeSchema::new("Passive")
                    .with_keys(Int, ["PLAYING_POSSIBLE_RESERVATION"])
                    .with_keys(Float, ["ENABLE", "ENABLE_NEXT"])
                    .with_keys(String, ["SKILL_TYPE", "SKILL_OPTIONS", "DESC"])
                    .with_preset([
                        Field::new("SKILL_TYPE", String, "PASSIVE"),
                        Field::new("ENABLE", Float, "1"),
                        Field::new("DESC", String, ""),
                    ]),
            )
            .with_schema(
                CategoryKind::Sequence,
                TypeSchema::new("Damage")
                    .with_keys(Int, ["COUNT", "PLAY_INDICATOR"])
                    .with_keys(Float, ["START_DELAY_TIME", "DURATION_TIME", "FLOAT_VALUE"])
                    .with_keys(
                        String,
                        ["SEQUENCE_TYPE", "DAMAGE_TYPE", "CONDITION_IDS", "CREATE_IDS", "DESC"],
                    )
                    .with_preset([
                        Field::new("SEQUENCE_TYPE", String, "DAMAGE"),
                        Field::new("START_DELAY_TIME", Float, "0"),
                        Field::new("DESC", String, ""),
                    ]),
            )
            .with_schema(
                CategoryKind::Effect,
                TypeSchema::new("Buff/Debuff")
                    .with_keys(Int, ["OVERLAP_COUNT", "PRIORITY", "INT_VALUE"])
                    .with_keys(Float, ["START_DELAY_TIME", "DURATION_TIME", "FLOAT_VALUE"])
                    .with_keys(
                        String,
                        ["AFFECT_TYPE", "BUFF_TYPE", "END_TYPE", "CONDITION_IDS", "DESC"],
                    )
                    .with_preset([
                        Field::new("AFFECT_TYPE", String, "BUFF"),
                        Field::new("DURATION_TIME", Float, "3"),
                        Field::new("DESC", String, ""),
                    ]),
            )
            .with_schema(
                CategoryKind::Condition,
                TypeSchema::new("Targeting")
                    .with_keys(
                        Int,
                        ["ABSOLUTE_SELECT", "UNCHECK_ENABLE_TARGET", "CHECK_INPUTVALUE"],
                    )
                    .with_keys(Float, ["FLOAT_VALUE", "FLOAT_OPTION"])
                    .with_keys(
                        String,
                        [
                            "CONDITION_TYPE",
                            "TARGETING_TEAM",
                            "TARGETING_SELECT",
                            "OPERATOR",
                            "DESC",
                        ],
                    )
                    .with_preset([
                        Field::new("CONDITION_TYPE", String, "TARGETING"),
                        Field::new("TARGETING_TEAM", String, "ENEMY"),
                        Field::new("DESC", String, ""),
                    ]),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::{
        SchemaCatalog, StaticKeyCatalog, TypeSchema, effective_allowed_keys, resolve_kind_for_key,
    };
    use crate::{CategoryKind, Kind};

    #[test]
    fn builtin_catalog_has_every_category() {
        let catalog = SchemaCatalog::builtin();
        for category in CategoryKind::ALL {
            assert!(!catalog.schemas_for(category).is_empty(), "{category}");
        }
        let names: Vec<&str> = catalog
            .schemas_for(CategoryKind::Skill)
            .iter()
            .map(|s| s.type_name.as_str())
            .collect();
        assert_eq!(names, vec!["Active", "Passive"]);
        assert!(catalog.find(CategoryKind::Effect, "Buff/Debuff").is_some());
        assert!(catalog.find(CategoryKind::Effect, "Active").is_none());
        assert!(SchemaCatalog::new().schemas_for(CategoryKind::Skill).is_empty());
    }

    #[test]
    fn builtin_presets_use_declared_keys() {
        let catalog = SchemaCatalog::builtin();
        for category in CategoryKind::ALL {
            for schema in catalog.schemas_for(category) {
                for field in &schema.default_preset {
                    assert_eq!(
                        resolve_kind_for_key(schema, &field.key),
                        Some(field.kind),
                        "{}::{}",
                        schema.type_name,
                        field.key
                    );
                }
            }
        }
    }

    #[test]
    fn effective_keys_union_sorted_and_deduplicated() {
        let schema = TypeSchema::new("T").with_keys(Kind::Int, ["ZETA", "ALPHA"]);
        let mut external = StaticKeyCatalog::new();
        external.insert(CategoryKind::Skill, Kind::Int, ["MID", "ALPHA", "alpha"]);
        external.insert(CategoryKind::Skill, Kind::Float, ["RATE"]);

        let keys = effective_allowed_keys(&schema, CategoryKind::Skill, Kind::Int, &external);
        assert_eq!(keys, vec!["ALPHA", "MID", "ZETA", "alpha"]);

        let keys = effective_allowed_keys(&schema, CategoryKind::Sequence, Kind::Int, &external);
        assert_eq!(keys, vec!["ALPHA", "ZETA"]);

        let keys = effective_allowed_keys(&schema, CategoryKind::Skill, Kind::String, &external);
        assert!(keys.is_empty());
    }

    #[test]
    fn resolve_kind_for_unknown_key_is_none() {
        let schema = TypeSchema::new("T").with_keys(Kind::Float, ["RATE"]);
        assert_eq!(resolve_kind_for_key(&schema, "RATE"), Some(Kind::Float));
        assert_eq!(resolve_kind_for_key(&schema, "rate"), None);
    }
}
