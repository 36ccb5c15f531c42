// Reference-validity tests against a real directory tree, plus the
// end-to-end diagnostic composition of analyze().

use aam_core::analyze;
use aam_core::error::Severity;
use std::fs;

#[test]
fn test_imports_resolve_in_a_real_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("base.aam"), "shared = 1\n").unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub/child.aam"), "nested = 1\n").unwrap();

    let source = "@import base.aam\n@derive sub/child.aam\n";
    let file_name = dir.path().join("main.aam");
    let analysis = analyze(source, &file_name.to_string_lossy());

    assert!(
        analysis.diagnostics.is_empty(),
        "{}",
        analysis.format_diagnostics()
    );
}

#[test]
fn test_missing_import_in_a_real_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("present.aam"), "x = 1\n").unwrap();

    let source = "@import present.aam\n@import absent.aam\n";
    let file_name = dir.path().join("main.aam");
    let analysis = analyze(source, &file_name.to_string_lossy());

    assert_eq!(analysis.diagnostics.len(), 1);
    assert_eq!(analysis.diagnostics[0].severity, Severity::Error);
    assert_eq!(
        analysis.diagnostics[0].message,
        "@import: file 'absent.aam' not found"
    );
}

#[test]
fn test_directory_is_not_a_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("folder.aam")).unwrap();

    let source = "@import folder.aam\n";
    let file_name = dir.path().join("main.aam");
    let analysis = analyze(source, &file_name.to_string_lossy());

    assert!(analysis.has_errors());
}

#[test]
fn test_extension_warning_skips_existence_check() {
    // No file named notes.txt anywhere; still only the warning, because a
    // wrong extension short-circuits the lookup.
    let dir = tempfile::tempdir().unwrap();
    let source = "@import notes.txt\n";
    let file_name = dir.path().join("main.aam");
    let analysis = analyze(source, &file_name.to_string_lossy());

    assert!(!analysis.has_errors());
    assert_eq!(analysis.diagnostics.len(), 1);
    assert_eq!(analysis.diagnostics[0].severity, Severity::Warning);
}

#[test]
fn test_all_three_passes_compose() {
    let dir = tempfile::tempdir().unwrap();
    let source = "\
@import gone.aam
@schema Enemy {
  hp: i32,
  ai: cooking::spoon
}
";
    let file_name = dir.path().join("main.aam");
    let analysis = analyze(source, &file_name.to_string_lossy());

    let messages: Vec<&str> = analysis
        .diagnostics
        .iter()
        .map(|d| d.message.as_str())
        .collect();
    assert!(messages
        .contains(&"Schema 'Enemy': required field 'hp' is not defined in this file"));
    assert!(messages
        .contains(&"Schema 'Enemy': required field 'ai' is not defined in this file"));
    assert!(messages
        .iter()
        .any(|m| m.starts_with("Unknown type 'cooking::spoon'.")));
    assert!(messages.contains(&"@import: file 'gone.aam' not found"));
    // Completeness findings come before type findings, references last.
    assert_eq!(analysis.diagnostics.len(), 4);
}
