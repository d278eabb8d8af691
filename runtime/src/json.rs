//! Provides utilities for encoding a table to its JSON artifact form and
//! decoding it back.

use std::path::Path;

use crate::DfaTable;

#[derive(Debug)]
pub enum SerializationErr {
    Encode(serde_json::Error),
    Io(std::io::Error),
}

impl std::fmt::Display for SerializationErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "unable to encode table: {}", err),
            Self::Io(err) => write!(f, "unable to write table: {}", err),
        }
    }
}

impl std::error::Error for SerializationErr {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Encode(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

/// Renders a table as a pretty-printed JSON document.
pub fn to_string_pretty(table: &DfaTable) -> Result<String, SerializationErr> {
    serde_json::to_string_pretty(table).map_err(SerializationErr::Encode)
}

/// Decodes a table from its JSON document form.
pub fn from_str(data: &str) -> Result<DfaTable, SerializationErr> {
    serde_json::from_str(data).map_err(SerializationErr::Encode)
}

/// Writes a table to the given path as a JSON document.
///
/// The document is rendered fully in memory, written to a temporary sibling
/// path and renamed over the target, so a failure at any point leaves no
/// partial artifact behind.
pub fn write_file<P: AsRef<Path>>(path: P, table: &DfaTable) -> Result<(), SerializationErr> {
    let path = path.as_ref();
    let rendered = to_string_pretty(table)?;

    let mut tmp_os = path.as_os_str().to_os_string();
    tmp_os.push(".tmp");
    let tmp = std::path::PathBuf::from(tmp_os);

    std::fs::write(&tmp, rendered.as_bytes())
        .and_then(|_| std::fs::rename(&tmp, path))
        .map_err(|err| {
            let _ = std::fs::remove_file(&tmp);
            SerializationErr::Io(err)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TableEntry;

    fn sample_table() -> DfaTable {
        DfaTable::new(
            "This corresponds to the regular expression '[0-9]+'".to_string(),
            1,
            vec![2],
            vec![
                TableEntry::new(1, 48, 57, 2),
                TableEntry::new(2, 48, 57, 2),
            ],
        )
    }

    #[test]
    fn should_preserve_table_through_encode_decode() {
        let table = sample_table();

        let rendered = to_string_pretty(&table).unwrap();
        let decoded = from_str(&rendered).unwrap();

        assert_eq!(table, decoded);
    }

    #[test]
    fn should_render_fields_in_artifact_order() {
        let rendered = to_string_pretty(&sample_table()).unwrap();

        let comment_pos = rendered.find("\"_comment\"").unwrap();
        let start_pos = rendered.find("\"start_state\"").unwrap();
        let match_pos = rendered.find("\"match_states\"").unwrap();
        let table_pos = rendered.find("\"transition_table\"").unwrap();

        assert!(comment_pos < start_pos);
        assert!(start_pos < match_pos);
        assert!(match_pos < table_pos);
    }

    #[test]
    fn should_write_complete_file_and_clean_up_temporaries() {
        let table = sample_table();
        let path = std::env::temp_dir().join("dfa-runtime-json-write-test.json");
        let tmp_sibling = std::env::temp_dir().join("dfa-runtime-json-write-test.json.tmp");

        write_file(&path, &table).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(table, from_str(&written).unwrap());
        assert!(!tmp_sibling.exists());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn should_error_without_creating_file_on_unwritable_path() {
        let table = sample_table();
        let path = std::env::temp_dir()
            .join("dfa-runtime-missing-dir")
            .join("out.json");

        assert!(write_file(&path, &table).is_err());
        assert!(!path.exists());
    }
}
