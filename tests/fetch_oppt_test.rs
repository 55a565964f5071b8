use std::path::{Path, PathBuf};

use clap::Parser;
use serde_json::{json, Value};
use summit_lab_helpers::cli::commands::fetch_oppt::{run, FetchOpptArgs};
use summit_lab_helpers::HelperError;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SITE_ID: &str = "13b91559-bbed-41d3-af66-c60660223ed5";
const OPPT_FILE: &str = "opp--alt-text--3_7_2025.json";

fn write_descriptor(dir: &Path) -> anyhow::Result<PathBuf> {
    let file = dir.join(OPPT_FILE);
    std::fs::write(&file, "{}")?;
    Ok(file)
}

fn args(server: &MockServer, token: &str, oppt_file: &Path, extra: &[&str]) -> FetchOpptArgs {
    let base_url = server.uri();
    let oppt_file = oppt_file.to_string_lossy().into_owned();
    let mut argv = vec![
        "fetch-oppt",
        "--token",
        token,
        "--api-base-url",
        base_url.as_str(),
        "--site-id",
        SITE_ID,
        "--oppt-file",
        oppt_file.as_str(),
    ];
    argv.extend_from_slice(extra);
    FetchOpptArgs::try_parse_from(argv).unwrap()
}

#[tokio::test]
async fn test_fetch_prints_payload_unchanged() -> anyhow::Result<()> {
    let payload = json!({"type": "alt-text", "records": [{"url": "https://example.com/a"}]});
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/sites/{}/opportunities", SITE_ID)))
        .and(query_param("type", "alt-text"))
        .and(header("authorization", "Bearer VALID"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir()?;
    let oppt_file = write_descriptor(dir.path())?;

    let mut out = Vec::new();
    run(args(&server, "VALID", &oppt_file, &[]), &mut out).await?;

    let printed: Value = serde_json::from_slice(&out)?;
    assert_eq!(printed, payload);
    Ok(())
}

#[tokio::test]
async fn test_fetch_writes_output_file() -> anyhow::Result<()> {
    let payload = json!({"type": "alt-text", "records": [{"url": "https://example.com/a"}]});
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/sites/{}/opportunities", SITE_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload.clone()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir()?;
    let oppt_file = write_descriptor(dir.path())?;
    let output = dir.path().join("out").join("alt-text.json");
    let output_arg = output.to_string_lossy().into_owned();

    let mut out = Vec::new();
    run(
        args(&server, "VALID", &oppt_file, &["--output", output_arg.as_str()]),
        &mut out,
    )
    .await?;

    assert!(out.is_empty());
    let written: Value = serde_json::from_str(&std::fs::read_to_string(&output)?)?;
    assert_eq!(written, payload);
    Ok(())
}

#[tokio::test]
async fn test_rejected_token_leaves_no_output() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir()?;
    let oppt_file = write_descriptor(dir.path())?;
    let output = dir.path().join("alt-text.json");
    let output_arg = output.to_string_lossy().into_owned();

    let mut out = Vec::new();
    let err = run(
        args(&server, "EXPIRED", &oppt_file, &["--output", output_arg.as_str()]),
        &mut out,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, HelperError::Authentication { status: Some(401), .. }));
    assert_eq!(err.exit_code(), 3);
    assert!(!output.exists());
    assert!(out.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_unknown_site_is_not_found() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Site not found"})))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir()?;
    let oppt_file = write_descriptor(dir.path())?;

    let mut out = Vec::new();
    let err = run(args(&server, "VALID", &oppt_file, &[]), &mut out)
        .await
        .unwrap_err();
    assert!(matches!(err, HelperError::NotFound { .. }));
    Ok(())
}

#[tokio::test]
async fn test_malformed_site_id_never_reaches_the_api() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir()?;
    let oppt_file = write_descriptor(dir.path())?;
    let base_url = server.uri();
    let oppt_arg = oppt_file.to_string_lossy().into_owned();
    let args = FetchOpptArgs::try_parse_from([
        "fetch-oppt",
        "--token",
        "VALID",
        "--api-base-url",
        base_url.as_str(),
        "--site-id",
        "not-a-uuid",
        "--oppt-file",
        oppt_arg.as_str(),
    ])?;

    let mut out = Vec::new();
    let err = run(args, &mut out).await.unwrap_err();
    assert!(matches!(err, HelperError::InvalidInput(_)));
    Ok(())
}
