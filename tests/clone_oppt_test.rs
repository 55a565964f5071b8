use clap::Parser;
use serde_json::json;
use summit_lab_helpers::cli::commands::clone_oppt::{run, CloneOpptArgs};
use summit_lab_helpers::HelperError;
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SITE_ID: &str = "9f466aa2-e734-4714-8399-c173bd96347e";
const DOC_URL: &str = "https://docs.google.com/document/d/1AbCdEf/edit";

fn args(server: &MockServer, oppt_file: &str) -> CloneOpptArgs {
    let api = server.uri();
    let sheet = format!("{}/lab-337/lab-337-sites.json", server.uri());
    CloneOpptArgs::try_parse_from([
        "clone-oppt",
        "--token",
        "1234567890",
        "--api-base-url",
        api.as_str(),
        "--lab-sites-url",
        sheet.as_str(),
        "--site-id",
        SITE_ID,
        "--oppt-file",
        oppt_file,
    ])
    .unwrap()
}

#[tokio::test]
async fn test_clone_creates_opportunity_and_suggestions() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/sites/{}/opportunities", SITE_ID)))
        .and(body_partial_json(json!({
            "type": "alt-text",
            "origin": "AUTOMATION",
            "title": "Missing alt text"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "opp-1",
            "type": "alt-text"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/sites/{}/opportunities/opp-1/suggestions", SITE_ID)))
        .and(body_json(json!([{
            "type": "CONTENT_UPDATE",
            "data": {"variations": [{"variationEditPageUrl": DOC_URL}]},
            "opportunityId": "opp-1"
        }])))
        .respond_with(ResponseTemplate::new(207).set_body_json(json!({
            "metadata": {"total": 1, "success": 1, "failure": 0}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/lab-337/lab-337-sites.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "id": SITE_ID,
                "baseURL": "https://main--wknd-summit2025--adobe.aem.live/lab-337/000/"
            }]
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir()?;
    let file = dir.path().join("opp--alt-text--3_7_2025.json");
    std::fs::write(
        &file,
        serde_json::to_vec(&json!({
            "opportunity": {
                "auditId": "audit-1",
                "runbook": "https://example.com/runbook",
                "type": "alt-text",
                "title": "Missing alt text",
                "description": "Images without alt text",
                "tags": ["accessibility"]
            },
            "suggestions": [{
                "type": "CONTENT_UPDATE",
                "data": {"variations": [{"variationEditPageUrl": DOC_URL}]}
            }]
        }))?,
    )?;

    let mut out = Vec::new();
    run(args(&server, &file.to_string_lossy()), &mut out).await?;

    let printed = String::from_utf8(out)?;
    assert!(printed.contains("Opportunity created:"));
    assert!(printed.contains("Suggestions added:"));
    assert!(printed.contains(DOC_URL));
    assert!(printed.contains("site baseURL: https://main--wknd-summit2025--adobe.aem.live/lab-337/000/"));
    Ok(())
}

#[tokio::test]
async fn test_export_without_opportunity_is_rejected() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir()?;
    let file = dir.path().join("opp--alt-text--3_7_2025.json");
    std::fs::write(&file, r#"{"type": "alt-text"}"#)?;

    let mut out = Vec::new();
    let err = run(args(&server, &file.to_string_lossy()), &mut out)
        .await
        .unwrap_err();
    assert!(matches!(err, HelperError::InvalidInput(_)));
    Ok(())
}
