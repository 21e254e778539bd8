//! Cross-category reference walk: Skill -> Sequence -> Effect -> Condition.
//!
//! Records point at each other through link fields holding delimiter-separated
//! numeric ids. The walk is fixed at four levels, so reference cycles cannot
//! make it loop. Ids with no matching record are dropped from the summary;
//! [`find_unresolved`] lists them for callers that want to report them.

use crate::{Category, CategoryKind, Record, RecordStore, statics};
use std::fmt::Write as _;

const SKILL_LINKS: &[&str] = &[statics::LINK_SEQUENCE_IDS, statics::LINK_SKILL_OPTIONS];
const SEQUENCE_EFFECT_LINKS: &[&str] = &[statics::LINK_CREATE_IDS];
const CONDITION_LINKS: &[&str] = &[statics::LINK_CONDITION_IDS];

/// One row of the summary tree. Depth 0 is the synthetic root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub depth: usize,
    pub category: Option<CategoryKind>,
    pub id: Option<i64>,
    pub label: String,
}

impl SummaryRow {
    fn root() -> Self {
        Self {
            depth: 0,
            category: None,
            id: None,
            label: statics::SUMMARY_ROOT_LABEL.to_string(),
        }
    }

    fn for_record(depth: usize, category: CategoryKind, record: &Record) -> Self {
        let label = match category {
            CategoryKind::Skill => format!("[{}] {}", record.id, record.name),
            other => format!("{other} [{}] {}", record.id, record.name),
        };
        Self {
            depth,
            category: Some(category),
            id: Some(record.id),
            label,
        }
    }
}

/// A link id that names no record in its target category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReference {
    pub from: CategoryKind,
    pub from_id: i64,
    pub field: &'static str,
    pub target: CategoryKind,
    pub id: i64,
}

/// Ids referenced by `record` through the named fields.
///
/// Keys are matched ignoring ASCII case and scanned in the order given; within a
/// field, ids come left to right. Pieces that are not integers are dropped.
pub fn extract_ids(record: &Record, keys: &[&str]) -> Vec<i64> {
    keys.iter().flat_map(|key| ids_in_field(record, key)).collect()
}

fn ids_in_field(record: &Record, key: &str) -> Vec<i64> {
    let Some(field) = record.field(key) else {
        return Vec::new();
    };
    field
        .value
        .split(statics::ID_DELIMITERS)
        .filter_map(|piece| piece.trim().parse::<i64>().ok())
        .collect()
}

/// Flattened four-level listing in walk order.
pub fn build_summary(store: &RecordStore) -> Vec<SummaryRow> {
    let mut rows = vec![SummaryRow::root()];
    walk(store, |step| match step {
        Step::Found {
            depth,
            category,
            record,
        } => rows.push(SummaryRow::for_record(depth, category, record)),
        Step::Missing(missing) => {
            tracing::debug!(
                from = %missing.from,
                from_id = missing.from_id,
                field = missing.field,
                target = %missing.target,
                id = missing.id,
                "dropping unresolved reference"
            );
        }
    });
    rows
}

/// Every link id the summary walk could not resolve, in walk order.
pub fn find_unresolved(store: &RecordStore) -> Vec<UnresolvedReference> {
    let mut missing = Vec::new();
    walk(store, |step| {
        if let Step::Missing(m) = step {
            missing.push(m);
        }
    });
    missing
}

/// Text outline of summary rows, indented per depth, one row per line.
pub fn render_outline(rows: &[SummaryRow]) -> String {
    let mut out = String::new();
    for row in rows {
        let _ = writeln!(
            out,
            "{}{}",
            statics::OUTLINE_INDENT.repeat(row.depth),
            row.label
        );
    }
    out
}

enum Step<'a> {
    Found {
        depth: usize,
        category: CategoryKind,
        record: &'a Record,
    },
    Missing(UnresolvedReference),
}

fn walk<'a>(store: &'a RecordStore, mut visit: impl FnMut(Step<'a>)) {
    let sequences = store.category(CategoryKind::Sequence);
    let effects = store.category(CategoryKind::Effect);
    let conditions = store.category(CategoryKind::Condition);

    for skill in store.category(CategoryKind::Skill).all_nodes() {
        visit(Step::Found {
            depth: 1,
            category: CategoryKind::Skill,
            record: skill,
        });

        for sequence in linked(skill, CategoryKind::Skill, SKILL_LINKS, sequences, &mut visit) {
            visit(Step::Found {
                depth: 2,
                category: CategoryKind::Sequence,
                record: sequence,
            });

            let seq_effects = linked(
                sequence,
                CategoryKind::Sequence,
                SEQUENCE_EFFECT_LINKS,
                effects,
                &mut visit,
            );
            for effect in seq_effects {
                visit(Step::Found {
                    depth: 3,
                    category: CategoryKind::Effect,
                    record: effect,
                });
                let effect_conditions = linked(
                    effect,
                    CategoryKind::Effect,
                    CONDITION_LINKS,
                    conditions,
                    &mut visit,
                );
                for condition in effect_conditions {
                    visit(Step::Found {
                        depth: 4,
                        category: CategoryKind::Condition,
                        record: condition,
                    });
                }
            }

            let seq_conditions = linked(
                sequence,
                CategoryKind::Sequence,
                CONDITION_LINKS,
                conditions,
                &mut visit,
            );
            for condition in seq_conditions {
                visit(Step::Found {
                    depth: 3,
                    category: CategoryKind::Condition,
                    record: condition,
                });
            }
        }
    }
}

/// Resolve the ids in `record`'s link fields against `target`, reporting misses.
fn linked<'a>(
    record: &Record,
    from: CategoryKind,
    keys: &[&'static str],
    target: &'a Category,
    visit: &mut impl FnMut(Step<'a>),
) -> Vec<&'a Record> {
    let mut found = Vec::new();
    for &key in keys {
        for id in ids_in_field(record, key) {
            match target.find(id) {
                Some(linked) => found.push(linked),
                None => visit(Step::Missing(UnresolvedReference {
                    from,
                    from_id: record.id,
                    field: key,
                    target: target.kind(),
                    id,
                })),
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::{build_summary, extract_ids, find_unresolved, render_outline};
    use crate::{CategoryKind, Field, Kind, Record, RecordStore};
    use pretty_assertions::assert_eq;

    fn record(category: CategoryKind, id: i64, fields: &[(&str, &str)]) -> Record {
        let mut rec = Record::new(category, id);
        rec.fields = fields
            .iter()
            .map(|(k, v)| Field::new(*k, Kind::String, *v))
            .collect();
        rec
    }

    #[test]
    fn extract_ids_splits_trims_and_drops_junk() {
        let rec = record(
            CategoryKind::Skill,
            1,
            &[("skill_options", "7 | x;8"), ("SEQUENCE_IDS", " 2, 3,,abc ,-4")],
        );
        assert_eq!(
            extract_ids(&rec, &["SEQUENCE_IDS", "SKILL_OPTIONS"]),
            vec![2, 3, -4, 7, 8]
        );
        assert!(extract_ids(&rec, &["CREATE_IDS"]).is_empty());

        let blank = record(CategoryKind::Skill, 2, &[("SEQUENCE_IDS", "   ")]);
        assert!(extract_ids(&blank, &["SEQUENCE_IDS"]).is_empty());
    }

    #[test]
    fn summary_walks_four_levels_and_drops_missing() {
        let mut store = RecordStore::new();
        store.category_mut(CategoryKind::Skill).replace_nodes(vec![record(
            CategoryKind::Skill,
            1,
            &[("SEQUENCE_IDS", "2,3")],
        )]);
        store.category_mut(CategoryKind::Sequence).replace_nodes(vec![record(
            CategoryKind::Sequence,
            2,
            &[("CREATE_IDS", "9"), ("CONDITION_IDS", "7,8")],
        )]);
        store.category_mut(CategoryKind::Effect).replace_nodes(vec![record(
            CategoryKind::Effect,
            9,
            &[("CONDITION_IDS", "7")],
        )]);
        store.category_mut(CategoryKind::Condition).replace_nodes(vec![
            record(CategoryKind::Condition, 7, &[]),
        ]);

        let rows = build_summary(&store);
        let depths: Vec<(usize, Option<i64>)> = rows.iter().map(|r| (r.depth, r.id)).collect();
        assert_eq!(
            depths,
            vec![
                (0, None),
                (1, Some(1)),
                (2, Some(2)),
                (3, Some(9)),
                (4, Some(7)),
                (3, Some(7)),
            ]
        );
        assert_eq!(rows[4].category, Some(CategoryKind::Condition));
        assert_eq!(rows[5].category, Some(CategoryKind::Condition));

        assert_eq!(
            render_outline(&rows),
            "Skill\n  [1] Skill_1\n    Sequence [2] Sequence_2\n      Effect [9] Effect_9\n        Condition [7] Condition_7\n      Condition [7] Condition_7\n"
        );

        let missing = find_unresolved(&store);
        let ids: Vec<(CategoryKind, i64)> = missing.iter().map(|m| (m.target, m.id)).collect();
        assert_eq!(
            ids,
            vec![(CategoryKind::Sequence, 3), (CategoryKind::Condition, 8)]
        );
        assert_eq!(missing[0].field, "SEQUENCE_IDS");
        assert_eq!(missing[1].from, CategoryKind::Sequence);
    }

    #[test]
    fn cycles_do_not_recurse() {
        let mut store = RecordStore::new();
        store.category_mut(CategoryKind::Skill).replace_nodes(vec![record(
            CategoryKind::Skill,
            1,
            &[("SEQUENCE_IDS", "1"), ("SKILL_OPTIONS", "1")],
        )]);
        store.category_mut(CategoryKind::Sequence).replace_nodes(vec![record(
            CategoryKind::Sequence,
            1,
            &[("SEQUENCE_IDS", "1"), ("CREATE_IDS", "1")],
        )]);
        store.category_mut(CategoryKind::Effect).replace_nodes(vec![record(
            CategoryKind::Effect,
            1,
            &[("CREATE_IDS", "1")],
        )]);

        let rows = build_summary(&store);
        let depths: Vec<usize> = rows.iter().map(|r| r.depth).collect();
        assert_eq!(depths, vec![0, 1, 2, 3, 2, 3]);
    }

    #[test]
    fn empty_store_has_only_root() {
        let rows = build_summary(&RecordStore::new());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].label, "Skill");
    }
}
