use serde::{Deserialize, Deserializer, de};

/// Object body in source order. Repeated keys are kept as separate entries.
pub type Entries = Vec<(String, DocValue)>;

/// Top-level shape of a category document: id string -> value.
pub type Document = Entries;

/// Untyped value produced by the document parsers.
/// Integer and float literals stay distinct so import can guess a field kind from them.
#[derive(Debug, Clone, PartialEq)]
pub enum DocValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<DocValue>),
    Object(Entries),
}

impl DocValue {
    pub fn as_object(&self) -> Option<&[(String, DocValue)]> {
        match self {
            DocValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[DocValue]> {
        match self {
            DocValue::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DocValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// First entry under `key`.
    pub fn get(&self, key: &str) -> Option<&DocValue> {
        self.as_object()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            DocValue::Null => "null",
            DocValue::Bool(_) => "bool",
            DocValue::Int(_) => "int",
            DocValue::Float(_) => "float",
            DocValue::String(_) => "string",
            DocValue::Array(_) => "array",
            DocValue::Object(_) => "object",
        }
    }

    /// Unwraps a top-level value into a document. Anything other than an object
    /// yields an empty document.
    pub fn into_document(self) -> Document {
        match self {
            DocValue::Object(map) => map,
            _ => Document::new(),
        }
    }
}

impl<'de> Deserialize<'de> for DocValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ValueVisitor;

        impl<'de> de::Visitor<'de> for ValueVisitor {
            type Value = DocValue;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a JSON5 value")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(DocValue::Null)
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(DocValue::Null)
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
                Ok(DocValue::Bool(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(DocValue::Int(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                // Out-of-range unsigned literals keep their magnitude as a float.
                Ok(i64::try_from(v).map_or(DocValue::Float(v as f64), DocValue::Int))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(DocValue::Float(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(DocValue::String(v.to_owned()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
                Ok(DocValue::String(v))
            }

            fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut values = Vec::new();
                while let Some(value) = seq.next_element::<DocValue>()? {
                    values.push(value);
                }
                Ok(DocValue::Array(values))
            }

            fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut values = Entries::new();
                while let Some(entry) = map.next_entry::<String, DocValue>()? {
                    values.push(entry);
                }
                Ok(DocValue::Object(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::DocValue;

    #[test]
    fn deserialize_keeps_int_and_float_distinct() {
        let v: DocValue = json5::from_str("{ a: 5, b: 5.0, c: 'x', d: [1, null, true] }").unwrap();
        assert_eq!(v.get("a"), Some(&DocValue::Int(5)));
        assert_eq!(v.get("b"), Some(&DocValue::Float(5.0)));
        assert_eq!(v.get("c").and_then(|c| c.as_str()), Some("x"));
        assert_eq!(
            v.get("d").and_then(|d| d.as_array()).map(|d| d.len()),
            Some(3)
        );
    }

    #[test]
    fn into_document_discards_non_objects() {
        assert!(DocValue::Array(vec![DocValue::Int(1)]).into_document().is_empty());
        assert!(DocValue::String("x".to_string()).into_document().is_empty());

        let entries = vec![("1".to_string(), DocValue::Null)];
        assert_eq!(DocValue::Object(entries).into_document().len(), 1);
    }

    #[test]
    fn type_names_are_stable() {
        assert_eq!(DocValue::Int(1).type_name(), "int");
        assert_eq!(DocValue::Float(1.0).type_name(), "float");
        assert_eq!(DocValue::Object(Vec::new()).type_name(), "object");
    }
}
