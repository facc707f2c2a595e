use std::fs;

use microcms_export::{ensure_output_dir, AtomicFileWriter, PersistError};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn entries(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn creates_missing_output_dir_with_parents() {
    let temp = TempDir::new().unwrap();
    let content_dir = temp.path().join("content").join("post");
    assert!(!content_dir.exists());

    ensure_output_dir(&content_dir).unwrap();
    assert!(content_dir.is_dir());
    assert!(entries(&content_dir).is_empty());

    ensure_output_dir(&content_dir).unwrap();
}

#[test]
fn output_path_that_is_a_file_is_not_a_directory() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("post");
    fs::write(&file_path, "x").unwrap();

    match ensure_output_dir(&file_path).unwrap_err() {
        PersistError::NotADirectory { path } => assert_eq!(path, file_path),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn output_dir_below_a_file_cannot_be_created() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("blocker");
    fs::write(&blocker, "x").unwrap();
    let nested = blocker.join("post");

    let err = ensure_output_dir(&nested).unwrap_err();
    match &err {
        PersistError::CreateDir { path, .. } | PersistError::Inspect { path, .. } => {
            assert_eq!(path, &nested)
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("post"));
}

#[test]
fn rewriting_a_post_replaces_its_content() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer
        .write("hello-world.md", "+++\ntitle = \"Old, longer title\"\n+++\n\nold")
        .unwrap();
    assert_eq!(first, temp.path().join("hello-world.md"));

    let second = writer
        .write("hello-world.md", "+++\ntitle = \"New\"\n+++\n\nnew")
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(
        fs::read_to_string(&second).unwrap(),
        "+++\ntitle = \"New\"\n+++\n\nnew"
    );
    assert_eq!(entries(temp.path()), vec!["hello-world.md"]);
}

#[test]
fn post_shadowed_by_a_directory_fails_with_its_path() {
    let temp = TempDir::new().unwrap();
    let shadow = temp.path().join("hello-world.md");
    fs::create_dir(&shadow).unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    match writer.write("hello-world.md", "body").unwrap_err() {
        PersistError::Write { path, .. } => assert_eq!(path, shadow),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(shadow.is_dir());
    // The temp file is cleaned up when the rename fails.
    assert_eq!(entries(temp.path()), vec!["hello-world.md"]);
}
