use crate::coerce::{self, guess_kind, to_display_string};
use crate::value::Document;
use crate::{CategoryKind, Field, Record, statics};
use indexmap::IndexMap;

/// Type an untyped document into records of `category`.
///
/// Top-level keys that are not integers, and top-level values that are not
/// objects, are skipped. Keys naming the same id (`"1"`, `"01"`, `" 1"`) keep the
/// last record at the first one's position. Records with a non-blank `DESC`
/// field take it as their name.
pub fn records_from_document(category: CategoryKind, doc: &Document) -> Vec<Record> {
    let mut records: IndexMap<i64, Record> = IndexMap::with_capacity(doc.len());

    for (key, value) in doc {
        let Ok(id) = key.trim().parse::<i64>() else {
            tracing::debug!(%category, key = %key, "skipping non-integer top-level key");
            continue;
        };
        let Some(entries) = value.as_object() else {
            tracing::debug!(%category, id, found = value.type_name(), "skipping non-object record");
            continue;
        };

        let mut record = Record::new(category, id);
        record.fields = entries
            .iter()
            .map(|(k, v)| Field::new(k.clone(), guess_kind(v), to_display_string(v)))
            .collect();
        if records.insert(id, record).is_some() {
            tracing::debug!(%category, id, key = %key, "replacing record with duplicate id");
        }
    }

    records
        .into_values()
        .map(|mut record| {
            record.rename_from_desc();
            record
        })
        .collect()
}

/// Serialize records as a document: one object keyed by id, fields in stored order.
/// The output needs no lenient cleanup (no comments, no trailing commas).
pub fn write_document(records: &[Record]) -> String {
    write_document_with_newline(records, statics::NL_LF)
}

pub fn write_document_with_newline(records: &[Record], newline: &str) -> String {
    let indent = statics::DOC_INDENT;
    let mut out = String::new();

    out.push('{');
    if records.is_empty() {
        out.push('}');
        out.push_str(newline);
        return out;
    }
    out.push_str(newline);

    for (i, record) in records.iter().enumerate() {
        out.push_str(indent);
        coerce::write_escaped_string(&mut out, &record.id.to_string());
        out.push_str(": {");

        if !record.fields.is_empty() {
            out.push_str(newline);
            for (j, field) in record.fields.iter().enumerate() {
                out.push_str(indent);
                out.push_str(indent);
                coerce::write_escaped_string(&mut out, &field.key);
                out.push_str(": ");
                coerce::write_token(&mut out, field);
                if j + 1 != record.fields.len() {
                    out.push(',');
                }
                out.push_str(newline);
            }
            out.push_str(indent);
        }

        out.push('}');
        if i + 1 != records.len() {
            out.push(',');
        }
        out.push_str(newline);
    }

    out.push('}');
    out.push_str(newline);
    out
}
