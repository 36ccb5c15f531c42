// Integration tests for aam-core using .aam test fixtures
use aam_core::analyze;
use aam_core::error::Severity;
use std::fs;
use std::path::PathBuf;

fn get_test_file_path(subdir: &str, filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join(subdir)
        .join(filename)
}

fn analyze_fixture(subdir: &str, filename: &str) -> aam_core::Analysis {
    let path = get_test_file_path(subdir, filename);
    let source = fs::read_to_string(&path)
        .unwrap_or_else(|_| panic!("Failed to read test file: {:?}", path));
    // The real path matters: import targets resolve against the fixture dir.
    analyze(&source, &path.to_string_lossy())
}

// Fixtures that must come out clean.
mod ok_tests {
    use super::*;

    #[test]
    fn test_properties() {
        let analysis = analyze_fixture("ok", "properties.aam");
        assert!(
            analysis.diagnostics.is_empty(),
            "{}",
            analysis.format_diagnostics()
        );
        assert_eq!(analysis.document.properties().count(), 5);
    }

    #[test]
    fn test_schema() {
        let analysis = analyze_fixture("ok", "schema.aam");
        assert!(
            analysis.diagnostics.is_empty(),
            "{}",
            analysis.format_diagnostics()
        );
        let schema = analysis.document.schemas().next().unwrap();
        assert_eq!(schema.name.as_deref(), Some("Player"));
        assert_eq!(schema.fields.len(), 3);
    }

    #[test]
    fn test_aliases_forward_reference() {
        let analysis = analyze_fixture("ok", "aliases.aam");
        assert!(
            analysis.diagnostics.is_empty(),
            "{}",
            analysis.format_diagnostics()
        );
    }

    #[test]
    fn test_composition_resolves_sibling_imports() {
        let analysis = analyze_fixture("ok", "composition.aam");
        assert!(
            analysis.diagnostics.is_empty(),
            "{}",
            analysis.format_diagnostics()
        );
    }

    #[test]
    fn test_ok_fixtures_serialize() {
        for name in ["properties.aam", "schema.aam", "aliases.aam", "composition.aam"] {
            let analysis = analyze_fixture("ok", name);
            assert!(analysis.to_json().is_ok(), "json failed for {name}");
            assert!(analysis.to_yaml().is_ok(), "yaml failed for {name}");
        }
    }
}

// Fixtures that must produce their specific diagnostics while still
// yielding a complete tree.
mod bad_tests {
    use super::*;

    #[test]
    fn test_missing_field_definition() {
        let analysis = analyze_fixture("bad", "missing_field.aam");
        assert!(analysis.has_errors());
        assert!(analysis.diagnostics.iter().any(|d| d.message
            == "Schema 'Enemy': required field 'hp' is not defined in this file"));
    }

    #[test]
    fn test_unknown_type() {
        let analysis = analyze_fixture("bad", "unknown_type.aam");
        assert!(analysis.has_errors());
        assert!(analysis
            .diagnostics
            .iter()
            .any(|d| d.message.starts_with("Unknown type 'cooking::spoon'.")));
    }

    #[test]
    fn test_missing_import() {
        let analysis = analyze_fixture("bad", "missing_import.aam");
        assert!(analysis.has_errors());
        assert!(analysis
            .diagnostics
            .iter()
            .any(|d| d.message == "@import: file 'nowhere.aam' not found"));
    }

    #[test]
    fn test_wrong_extension_is_only_a_warning() {
        let analysis = analyze_fixture("bad", "wrong_extension.aam");
        assert!(!analysis.has_errors());
        assert_eq!(analysis.diagnostics.len(), 1);
        assert_eq!(analysis.diagnostics[0].severity, Severity::Warning);
        assert_eq!(
            analysis.diagnostics[0].message,
            "@import: expected a '.aam' file, got 'notes.txt'"
        );
    }

    #[test]
    fn test_malformed_still_builds_a_tree() {
        let analysis = analyze_fixture("bad", "malformed.aam");
        assert!(analysis.has_errors());
        // One node per started declaration: schema, property, type, import.
        assert_eq!(analysis.document.declarations.len(), 4);
        let messages: Vec<&str> = analysis
            .diagnostics
            .iter()
            .map(|d| d.message.as_str())
            .collect();
        assert!(messages.contains(&"Expected schema name after @schema"));
        assert!(messages.contains(&"Expected '=' after type alias name"));
        assert!(messages.contains(&"Expected file path after @import"));
    }
}
