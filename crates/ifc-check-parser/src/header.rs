// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HEADER section decoding

use crate::tokenizer::parse_header_record;
use ifc_check_model::{AttributeValue, LoadError, LoadResult, ModelMetadata};

const MAGIC: &str = "ISO-10303-21;";

/// Parse the HEADER section into model metadata
///
/// Fails when the content is not an exchange file, the header is missing,
/// or FILE_SCHEMA does not name an IFC schema.
pub fn parse_header(content: &str) -> LoadResult<ModelMetadata> {
    if !content.trim_start().starts_with(MAGIC) {
        return Err(LoadError::format("missing ISO-10303-21 signature"));
    }

    let start = content
        .find("HEADER;")
        .ok_or_else(|| LoadError::header("missing HEADER section"))?
        + "HEADER;".len();
    let len = content[start..]
        .find("ENDSEC;")
        .ok_or_else(|| LoadError::header("unterminated HEADER section"))?;

    let mut metadata = ModelMetadata::default();
    for statement in split_statements(&content[start..start + len]) {
        let Some((name, attrs)) = parse_header_record(statement) else {
            continue;
        };
        match name.as_str() {
            "FILE_SCHEMA" => {
                metadata.schema_version = attrs
                    .first()
                    .and_then(|v| v.as_list())
                    .and_then(|l| l.first())
                    .and_then(|v| v.as_string())
                    .unwrap_or_default()
                    .to_string();
            }
            "FILE_NAME" => {
                metadata.file_name = text(&attrs, 0);
                metadata.timestamp = text(&attrs, 1);
                metadata.author = first_of_list(&attrs, 2);
                metadata.organization = first_of_list(&attrs, 3);
                metadata.preprocessor_version = text(&attrs, 4);
                metadata.originating_system = text(&attrs, 5);
            }
            _ => {}
        }
    }

    if metadata.schema_version.is_empty() {
        return Err(LoadError::header("missing FILE_SCHEMA"));
    }
    if !metadata.schema_version.to_ascii_uppercase().starts_with("IFC") {
        return Err(LoadError::UnsupportedSchema(metadata.schema_version));
    }

    Ok(metadata)
}

fn text(attrs: &[AttributeValue], index: usize) -> Option<String> {
    attrs
        .get(index)
        .and_then(|v| v.as_string())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn first_of_list(attrs: &[AttributeValue], index: usize) -> Option<String> {
    attrs
        .get(index)
        .and_then(|v| v.as_list())
        .and_then(|items| items.iter().filter_map(|v| v.as_string()).find(|s| !s.is_empty()))
        .map(str::to_string)
}

/// Split a section into `;`-terminated statements, ignoring `;` inside strings
fn split_statements(section: &str) -> Vec<&str> {
    let mut statements = Vec::new();
    let mut in_string = false;
    let mut begin = 0;

    for (i, b) in section.bytes().enumerate() {
        match b {
            b'\'' => in_string = !in_string,
            b';' if !in_string => {
                statements.push(section[begin..i].trim());
                begin = i + 1;
            }
            _ => {}
        }
    }

    statements
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = r#"ISO-10303-21;
HEADER;
FILE_DESCRIPTION(('ViewDefinition [CoordinationView]'),'2;1');
FILE_NAME('test.ifc','2024-01-01T00:00:00',('Author'),('Org'),'Preprocessor','App','');
FILE_SCHEMA(('IFC2X3'));
ENDSEC;
DATA;
ENDSEC;
END-ISO-10303-21;
"#;

    #[test]
    fn test_parse_header() {
        let metadata = parse_header(HEADER).unwrap();
        assert_eq!(metadata.schema_version, "IFC2X3");
        assert_eq!(metadata.file_name.as_deref(), Some("test.ifc"));
        assert_eq!(metadata.timestamp.as_deref(), Some("2024-01-01T00:00:00"));
        assert_eq!(metadata.author.as_deref(), Some("Author"));
        assert_eq!(metadata.organization.as_deref(), Some("Org"));
        assert_eq!(metadata.preprocessor_version.as_deref(), Some("Preprocessor"));
        assert_eq!(metadata.originating_system.as_deref(), Some("App"));
    }

    #[test]
    fn test_rejects_non_step_content() {
        let err = parse_header("Entity_Type,Property_Set\nIfcWall,Pset_WallCommon\n").unwrap_err();
        assert!(matches!(err, LoadError::InvalidFormat(_)));
    }

    #[test]
    fn test_rejects_missing_schema() {
        let content = "ISO-10303-21;\nHEADER;\nFILE_NAME('a.ifc','',(''),(''),'','','');\nENDSEC;\n";
        assert!(matches!(parse_header(content), Err(LoadError::InvalidHeader(_))));
    }

    #[test]
    fn test_rejects_foreign_schema() {
        let content = "ISO-10303-21;\nHEADER;\nFILE_SCHEMA(('AP214'));\nENDSEC;\n";
        assert!(matches!(parse_header(content), Err(LoadError::UnsupportedSchema(_))));
    }
}
