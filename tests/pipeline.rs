//! Pipeline Integration Tests
//!
//! Runs the file stages end to end over real artifacts in a temp
//! directory using the default filesystem processor.

use std::path::Path;

use sha2::{Digest, Sha256};
use shipwright::core::{Pipeline, ReleaseContext, Stage};
use shipwright::tools::FileSystemProcessor;
use shipwright::{model, StageFailures};

fn write_artifact(dir: &Path, name: &str, content: &[u8]) {
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(dir.join(name), content).unwrap();
}

fn model_yaml(dist_dir: &Path) -> String {
    format!(
        r#"
project:
  name: duke
  version: 1.2.3
release:
  release_notes_url: "https://acme.org/duke/v{{{{projectVersion}}}}"
  download_url: "https://acme.org/duke/v{{{{projectVersion}}}}/{{{{artifactFileName}}}}"
distributions:
  duke:
    name: duke
    type: BINARY
    artifacts:
      - path: {dist}/duke-1.2.3-linux-x86_64.zip
        platform: linux-x86_64
      - path: {dist}/duke-1.2.3.zip
"#,
        dist = dist_dir.display()
    )
}

#[tokio::test]
async fn test_file_stages_produce_checksums_staging_and_manifest() {
    let workspace = tempfile::tempdir().unwrap();
    let dist_dir = workspace.path().join("dist");
    let out_dir = workspace.path().join("out");

    write_artifact(&dist_dir, "duke-1.2.3-linux-x86_64.zip", b"linux bits");
    write_artifact(&dist_dir, "duke-1.2.3.zip", b"universal bits");

    let model = model::from_yaml(&model_yaml(&dist_dir)).unwrap();
    let context = ReleaseContext::new(model, &out_dir, false);

    let pipeline = Pipeline::new(FileSystemProcessor).skip(Stage::Announce);
    pipeline.run(&context).await.unwrap();

    // Checksum stage: exact SHA-256 of the artifact bytes
    let checksum_file = out_dir
        .join("checksums")
        .join("duke")
        .join("duke-1.2.3-linux-x86_64.zip.sha256");
    let content = std::fs::read_to_string(&checksum_file).unwrap();
    let expected = hex::encode(Sha256::digest(b"linux bits"));
    assert_eq!(
        content,
        format!("{}  duke-1.2.3-linux-x86_64.zip\n", expected)
    );

    // Prepare stage: artifacts staged
    assert!(out_dir
        .join("prepare")
        .join("duke")
        .join("duke-1.2.3.zip")
        .exists());

    // Package stage: manifest carries the checksum back
    let manifest: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(out_dir.join("package").join("duke").join("manifest.json"))
            .unwrap(),
    )
    .unwrap();
    assert_eq!(manifest["name"], "duke");
    assert_eq!(manifest["type"], "BINARY");
    assert_eq!(manifest["artifacts"][0]["checksum"], expected);
}

#[tokio::test]
async fn test_dry_run_writes_nothing() {
    let workspace = tempfile::tempdir().unwrap();
    let dist_dir = workspace.path().join("dist");
    let out_dir = workspace.path().join("out");

    write_artifact(&dist_dir, "duke-1.2.3-linux-x86_64.zip", b"linux bits");
    write_artifact(&dist_dir, "duke-1.2.3.zip", b"universal bits");

    let model = model::from_yaml(&model_yaml(&dist_dir)).unwrap();
    let context = ReleaseContext::new(model, &out_dir, true);

    let pipeline = Pipeline::new(FileSystemProcessor).skip(Stage::Announce);
    pipeline.run(&context).await.unwrap();

    assert!(!out_dir.exists());
}

#[tokio::test]
async fn test_missing_artifact_is_an_item_failure() {
    let workspace = tempfile::tempdir().unwrap();
    let dist_dir = workspace.path().join("dist");
    let out_dir = workspace.path().join("out");
    // Only one of the two artifacts exists
    write_artifact(&dist_dir, "duke-1.2.3.zip", b"universal bits");

    let model = model::from_yaml(&model_yaml(&dist_dir)).unwrap();
    let context = ReleaseContext::new(model, &out_dir, false);

    let pipeline = Pipeline::new(FileSystemProcessor).skip(Stage::Announce);
    let err = pipeline.run(&context).await.unwrap_err();

    let aggregate = err.downcast_ref::<StageFailures>().expect("aggregate error");
    assert_eq!(aggregate.failures.len(), 1);
    assert_eq!(aggregate.failures[0].name, "duke");
}
