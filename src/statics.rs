// Central place for record/document constants and user-facing strings.
// Keep these out of the parser/writer code to reduce duplication and make tweaks safer.

// Category names (also used as document file stems and default record name prefixes).
pub const CATEGORY_SKILL: &str = "Skill";
pub const CATEGORY_SEQUENCE: &str = "Sequence";
pub const CATEGORY_EFFECT: &str = "Effect";
pub const CATEGORY_CONDITION: &str = "Condition";

// Field keys with special meaning.
pub const KEY_DESC: &str = "DESC";
pub const KEY_NEW: &str = "NEW_KEY";

// Link fields walked by the reference resolver.
pub const LINK_SEQUENCE_IDS: &str = "SEQUENCE_IDS";
pub const LINK_SKILL_OPTIONS: &str = "SKILL_OPTIONS";
pub const LINK_CREATE_IDS: &str = "CREATE_IDS";
pub const LINK_CONDITION_IDS: &str = "CONDITION_IDS";

/// Separators accepted between reference ids inside a link field.
pub const ID_DELIMITERS: [char; 3] = [',', ';', '|'];

// Display conversion of untyped values.
pub const PLACEHOLDER_OBJECT: &str = "{...}";
pub const LIST_SEPARATOR: &str = ",";

/// Deepest `{`/`[` nesting the parsers descend into. Record bodies sit at depth 2.
pub const MAX_NESTING_DEPTH: usize = 128;

// Summary tree.
pub const SUMMARY_ROOT_LABEL: &str = CATEGORY_SKILL;
pub const OUTLINE_INDENT: &str = "  ";

// Document files.
pub const DOC_EXT_PLAIN: &str = "json";
pub const DOC_EXT_GZIP: &str = "json.gz";
pub const DOC_INDENT: &str = "  ";
pub const NL_LF: &str = "\n";

// Gzip magic bytes.
pub const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

// Kind labels.
pub const EN_KIND_INT: &str = "Int";
pub const EN_KIND_FLOAT: &str = "Float";
pub const EN_KIND_STRING: &str = "String";

// Transfer status messages.
pub const EN_IMPORTED: &str = "Imported";
pub const EN_EXPORTED: &str = "Exported";
pub const EN_IMPORT_FAILED: &str = "Import failed";
pub const EN_EXPORT_FAILED: &str = "Export failed";
