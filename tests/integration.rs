use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn cdx_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("cdx");
    path
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    // Vocabulary
    let vocab_dir = root.join("vocab");
    fs::create_dir_all(vocab_dir.join("subjects")).unwrap();
    fs::create_dir_all(vocab_dir.join("topics")).unwrap();
    fs::create_dir_all(vocab_dir.join("difficulty")).unwrap();
    fs::write(vocab_dir.join("stopwords.txt"), "the\na\nan\nis\nand\nwith\nthis\n").unwrap();
    fs::write(
        vocab_dir.join("subjects/technology.txt"),
        "api\ncode\nsoftware\ndeployment\n",
    )
    .unwrap();
    fs::write(
        vocab_dir.join("subjects/science.txt"),
        "research\nexperiment\ndata\n",
    )
    .unwrap();
    fs::write(vocab_dir.join("topics/testing.txt"), "test\ncoverage\n").unwrap();
    fs::write(vocab_dir.join("difficulty/beginner.txt"), "basic\nintro\n").unwrap();
    fs::write(vocab_dir.join("difficulty/advanced.txt"), "complex\nexpert\n").unwrap();

    // Content
    let content_dir = root.join("content");
    fs::create_dir_all(&content_dir).unwrap();
    fs::write(
        content_dir.join("api-guide.md"),
        "---\ntitle: API Guide\nsummary: How the service API is structured and tested.\ntags:\n  - api\n---\n\
         # API Guide\n\nThis API is built with clean code and tested software. \
         Deployment is covered at the end, including basic test coverage advice.\n",
    )
    .unwrap();
    fs::write(
        content_dir.join("research-notes.md"),
        "---\ntitle: Research Notes\nsummary: Running experiments and collecting data for analysis.\n---\n\
         We describe the research process, the experiment design, and how data is collected. \
         The experiment ran for three weeks and produced useful data.\n",
    )
    .unwrap();
    // No front matter: title is autofilled, validation reports errors.
    fs::write(
        content_dir.join("loose-notes.md"),
        "Unstructured notes without any metadata block, long enough to avoid \
         the short-content warning being the only finding in this file.\n",
    )
    .unwrap();

    let config_content = format!(
        r#"[content]
root = "{root}/content"
include_globs = ["**/*.md", "**/*.yaml", "**/*.yml"]

[vocab]
dir = "{root}/vocab"

[cache]
path = "{root}/.cache/codex.db"

[output]
index_path = "{root}/codex-index.json"
report_path = "{root}/codex-report.json"
"#,
        root = root.display()
    );

    let config_path = root.join("cdx.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_cdx(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = cdx_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run cdx binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

#[test]
fn test_init_creates_cache_and_scaffold() {
    let (tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_cdx(&config_path, &["init"]);
    assert!(success, "init failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("Initialized"));
    assert!(tmp.path().join(".cache/codex.db").exists());
    assert!(tmp.path().join("vocab/subjects").exists());
}

#[test]
fn test_init_idempotent() {
    let (_tmp, config_path) = setup_test_env();

    let (_, _, success1) = run_cdx(&config_path, &["init"]);
    assert!(success1, "First init failed");

    let (_, _, success2) = run_cdx(&config_path, &["init"]);
    assert!(success2, "Second init failed (not idempotent)");
}

#[test]
fn test_index_writes_artifacts() {
    let (tmp, config_path) = setup_test_env();

    run_cdx(&config_path, &["init"]);
    let (stdout, stderr, success) = run_cdx(&config_path, &["index"]);
    assert!(success, "index failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("files found: 3"));
    assert!(stdout.contains("analyzed: 3"));
    assert!(stdout.contains("ok"));

    let index_json = fs::read_to_string(tmp.path().join("codex-index.json")).unwrap();
    let index: serde_json::Value = serde_json::from_str(&index_json).unwrap();
    assert_eq!(index["document_count"], 3);
    assert!(
        index_json.contains("technology"),
        "Expected technology classification in index, got: {}",
        index_json
    );

    let report_json = fs::read_to_string(tmp.path().join("codex-report.json")).unwrap();
    let report: serde_json::Value = serde_json::from_str(&report_json).unwrap();
    assert_eq!(report["summary"]["total_files"], 3);
}

#[test]
fn test_index_incremental() {
    let (tmp, config_path) = setup_test_env();

    run_cdx(&config_path, &["init"]);
    run_cdx(&config_path, &["index"]);

    // Second run without changes should reuse everything.
    let (stdout, _, success) = run_cdx(&config_path, &["index"]);
    assert!(success);
    assert!(
        stdout.contains("analyzed: 0") && stdout.contains("reused from cache: 3"),
        "Expected full cache reuse, got: {}",
        stdout
    );

    // Modify one file; only it should be re-analyzed.
    fs::write(
        tmp.path().join("content/loose-notes.md"),
        "Completely rewritten notes about software deployment and api code paths.\n",
    )
    .unwrap();

    let (stdout, _, success) = run_cdx(&config_path, &["index"]);
    assert!(success);
    assert!(
        stdout.contains("analyzed: 1") && stdout.contains("reused from cache: 2"),
        "Expected one re-analysis after modification, got: {}",
        stdout
    );
}

#[test]
fn test_index_full_ignores_cache() {
    let (_tmp, config_path) = setup_test_env();

    run_cdx(&config_path, &["init"]);
    run_cdx(&config_path, &["index"]);

    let (stdout, _, success) = run_cdx(&config_path, &["index", "--full"]);
    assert!(success);
    assert!(
        stdout.contains("analyzed: 3"),
        "Expected --full to re-analyze everything, got: {}",
        stdout
    );
}

#[test]
fn test_index_dry_run_writes_nothing() {
    let (tmp, config_path) = setup_test_env();

    run_cdx(&config_path, &["init"]);
    let (stdout, _, success) = run_cdx(&config_path, &["index", "--dry-run"]);
    assert!(success);
    assert!(stdout.contains("dry-run"));
    assert!(stdout.contains("files found: 3"));
    assert!(!tmp.path().join("codex-index.json").exists());
}

#[test]
fn test_index_with_limit() {
    let (_tmp, config_path) = setup_test_env();

    run_cdx(&config_path, &["init"]);
    let (stdout, _, success) = run_cdx(&config_path, &["index", "--limit", "1"]);
    assert!(success);
    assert!(stdout.contains("files found: 1"));
}

#[test]
fn test_index_validate_fails_on_errors() {
    let (_tmp, config_path) = setup_test_env();

    run_cdx(&config_path, &["init"]);
    // loose-notes.md has no title or summary in its metadata.
    let (_, stderr, success) = run_cdx(&config_path, &["index", "--validate"]);
    assert!(!success, "Expected --validate to fail");
    assert!(
        stderr.contains("failed validation"),
        "Should mention validation, got: {}",
        stderr
    );
}

#[test]
fn test_index_validate_passes_when_clean() {
    let (tmp, config_path) = setup_test_env();

    run_cdx(&config_path, &["init"]);
    fs::remove_file(tmp.path().join("content/loose-notes.md")).unwrap();

    let (stdout, stderr, success) = run_cdx(&config_path, &["index", "--validate"]);
    assert!(
        success,
        "Expected clean tree to pass --validate: stdout={}, stderr={}",
        stdout, stderr
    );
}

#[test]
fn test_index_deterministic() {
    let (tmp, config_path) = setup_test_env();

    run_cdx(&config_path, &["init"]);
    run_cdx(&config_path, &["index", "--full"]);
    let first = fs::read_to_string(tmp.path().join("codex-index.json")).unwrap();
    let first: serde_json::Value = serde_json::from_str(&first).unwrap();

    run_cdx(&config_path, &["index", "--full"]);
    let second = fs::read_to_string(tmp.path().join("codex-index.json")).unwrap();
    let second: serde_json::Value = serde_json::from_str(&second).unwrap();

    // Everything but the timestamp must match.
    assert_eq!(first["documents"], second["documents"]);
}

#[test]
fn test_stats() {
    let (_tmp, config_path) = setup_test_env();

    run_cdx(&config_path, &["init"]);
    run_cdx(&config_path, &["index"]);

    let (stdout, _, success) = run_cdx(&config_path, &["stats"]);
    assert!(success);
    assert!(stdout.contains("Files:       3"));
    assert!(stdout.contains("technology"));
}

#[test]
fn test_vocab_counts() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_cdx(&config_path, &["vocab"]);
    assert!(success);
    assert!(stdout.contains("technology"));
    assert!(stdout.contains("beginner"));
    assert!(stdout.contains("advanced"));
}

#[test]
fn test_cache_clear_forces_reanalysis() {
    let (_tmp, config_path) = setup_test_env();

    run_cdx(&config_path, &["init"]);
    run_cdx(&config_path, &["index"]);

    let (stdout, _, success) = run_cdx(&config_path, &["cache", "clear"]);
    assert!(success);
    assert!(stdout.contains("Cache cleared"));

    let (stdout, _, _) = run_cdx(&config_path, &["index"]);
    assert!(
        stdout.contains("analyzed: 3"),
        "Expected re-analysis after cache clear, got: {}",
        stdout
    );
}

#[test]
fn test_enhance_errors_when_disabled() {
    let (tmp, config_path) = setup_test_env();

    let doc = tmp.path().join("content/api-guide.md");
    let (_, stderr, success) = run_cdx(&config_path, &["enhance", doc.to_str().unwrap()]);
    assert!(!success, "enhance should fail when provider disabled");
    assert!(
        stderr.contains("disabled"),
        "Should mention disabled, got: {}",
        stderr
    );
}

#[test]
fn test_unreadable_document_is_skipped_not_fatal() {
    let (tmp, config_path) = setup_test_env();

    run_cdx(&config_path, &["init"]);
    // Invalid UTF-8 makes the file unreadable as text.
    fs::write(tmp.path().join("content/binary.md"), [0xff, 0xfe, 0x00]).unwrap();

    let (stdout, stderr, success) = run_cdx(&config_path, &["index"]);
    assert!(success, "index should survive unreadable files: {}", stderr);
    assert!(stdout.contains("skipped: 1"));
    assert!(stdout.contains("analyzed: 3"));
}
