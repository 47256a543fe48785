//! Integration tests for multipart file uploads.
//!
//! These tests capture the multipart body the client sends to a mock server
//! and check each part against the GraphQL multipart request convention.

use std::collections::HashMap;

use graphql_upload_client::{
    BuildError, CallContext, Endpoint, GraphqlClient, GraphqlError, Operation, Upload, UploadMode,
};
use serde::Deserialize;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Deserialize, PartialEq)]
struct File {
    #[serde(rename = "filename")]
    file_name: String,
    #[serde(rename = "mimetype")]
    mime_type: String,
}

const SINGLE_UPLOAD: &str =
    "mutation ($file: Upload!) { singleUpload(file: $file) { filename mimetype } }";

/// One decoded part of a multipart body.
#[derive(Debug)]
struct FormPart {
    file_name: Option<String>,
    content_type: Option<String>,
    body: String,
}

/// Creates a client pointed at the mock server's `/graphql` path.
fn create_client(server: &MockServer) -> GraphqlClient {
    let endpoint = Endpoint::new(format!("{}/graphql", server.uri())).unwrap();
    GraphqlClient::new(endpoint).unwrap()
}

async fn mount_reply(server: &MockServer, reply: Value) {
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply))
        .expect(1)
        .mount(server)
        .await;
}

fn quoted(header: &str, key: &str) -> Option<String> {
    let start = header.find(&format!("{key}=\""))? + key.len() + 2;
    let end = header[start..].find('"')? + start;
    Some(header[start..end].to_string())
}

/// Splits the single captured request into its named parts, keeping order.
async fn captured_parts(server: &MockServer) -> (String, Vec<(String, FormPart)>) {
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];

    let content_type = request
        .headers
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let boundary = content_type.split("boundary=").nth(1).unwrap().to_string();
    let body = String::from_utf8(request.body.clone()).unwrap();

    let mut parts = Vec::new();
    for segment in body.split(&format!("--{boundary}")) {
        let segment = segment.strip_prefix("\r\n").unwrap_or(segment);
        if segment.is_empty() || segment.starts_with("--") {
            continue;
        }
        let (head, content) = segment.split_once("\r\n\r\n").unwrap();
        let content = content.strip_suffix("\r\n").unwrap_or(content);

        let mut headers = HashMap::new();
        for line in head.split("\r\n") {
            let (name, value) = line.split_once(':').unwrap();
            headers.insert(name.trim().to_lowercase(), value.trim().to_string());
        }
        let disposition = &headers["content-disposition"];
        parts.push((
            quoted(disposition, "name").unwrap(),
            FormPart {
                file_name: quoted(disposition, "filename"),
                content_type: headers.get("content-type").cloned(),
                body: content.to_string(),
            },
        ));
    }
    (content_type, parts)
}

// ============================================================================
// Single Upload
// ============================================================================

#[tokio::test]
async fn test_single_upload_wire_format() {
    let server = MockServer::start().await;
    mount_reply(
        &server,
        json!({
            "data": { "singleUpload": { "filename": "hello.txt", "mimetype": "text/plain" } }
        }),
    )
    .await;

    let client = create_client(&server);
    let upload = Upload::new("hello.txt", "hello").with_mime_type("text/plain");
    let response = client
        .single_upload(&CallContext::new(), SINGLE_UPLOAD, "singleUpload", upload)
        .await
        .unwrap();

    let file: File = response.guess("singleUpload").unwrap();
    assert_eq!(file.file_name, "hello.txt");
    assert_eq!(file.mime_type, "text/plain");

    let (content_type, parts) = captured_parts(&server).await;
    assert!(content_type.starts_with("multipart/form-data; boundary="));

    let names: Vec<&str> = parts.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, ["operations", "map", "0"]);

    let operations: Value = serde_json::from_str(&parts[0].1.body).unwrap();
    assert_eq!(
        operations,
        json!({
            "operationName": "singleUpload",
            "query": SINGLE_UPLOAD,
            "variables": { "file": null }
        })
    );

    let map: Value = serde_json::from_str(&parts[1].1.body).unwrap();
    assert_eq!(map, json!({ "0": ["variables.file"] }));

    let file_part = &parts[2].1;
    assert_eq!(file_part.file_name.as_deref(), Some("hello.txt"));
    assert_eq!(file_part.content_type.as_deref(), Some("text/plain"));
    assert_eq!(file_part.body, "hello");
}

#[tokio::test]
async fn test_single_upload_defaults_file_content_type() {
    let server = MockServer::start().await;
    mount_reply(&server, json!({ "data": { "singleUpload": true } })).await;

    let client = create_client(&server);
    client
        .single_upload(
            &CallContext::new(),
            "mutation ($file: Upload!) { singleUpload(file: $file) }",
            "",
            Upload::from_reader("blob.bin", &b"raw bytes"[..]).unwrap(),
        )
        .await
        .unwrap();

    let (_, parts) = captured_parts(&server).await;
    assert_eq!(
        parts[2].1.content_type.as_deref(),
        Some("application/octet-stream")
    );
    assert_eq!(parts[2].1.body, "raw bytes");
}

// ============================================================================
// Multiple Upload
// ============================================================================

#[tokio::test]
async fn test_multi_upload_wire_format() {
    let server = MockServer::start().await;
    mount_reply(
        &server,
        json!({
            "data": {
                "multipleUpload": [
                    { "filename": "a.txt", "mimetype": "text/plain" },
                    { "filename": "b.txt", "mimetype": "text/plain" },
                    { "filename": "c.txt", "mimetype": "text/plain" }
                ]
            }
        }),
    )
    .await;

    let client = create_client(&server);
    let uploads = vec![
        Upload::new("a.txt", "alpha"),
        Upload::new("b.txt", "beta"),
        Upload::new("c.txt", "gamma"),
    ];
    let response = client
        .multi_upload(
            &CallContext::new(),
            "mutation ($files: [Upload!]!) { multipleUpload(files: $files) { filename mimetype } }",
            "multipleUpload",
            uploads,
        )
        .await
        .unwrap();

    let files: Vec<File> = response.guess("multipleUpload").unwrap();
    let file_names: Vec<&str> = files.iter().map(|f| f.file_name.as_str()).collect();
    assert_eq!(file_names, ["a.txt", "b.txt", "c.txt"]);

    let (_, parts) = captured_parts(&server).await;
    let names: Vec<&str> = parts.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, ["operations", "map", "0", "1", "2"]);

    let operations: Value = serde_json::from_str(&parts[0].1.body).unwrap();
    assert_eq!(operations["variables"], json!({ "files": [null, null, null] }));

    let map: Value = serde_json::from_str(&parts[1].1.body).unwrap();
    assert_eq!(
        map,
        json!({
            "0": ["variables.files.0"],
            "1": ["variables.files.1"],
            "2": ["variables.files.2"]
        })
    );

    let bodies: Vec<(&str, &str)> = parts[2..]
        .iter()
        .map(|(_, part)| (part.file_name.as_deref().unwrap(), part.body.as_str()))
        .collect();
    assert_eq!(bodies, [("a.txt", "alpha"), ("b.txt", "beta"), ("c.txt", "gamma")]);
}

#[tokio::test]
async fn test_multi_upload_without_files_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
        .expect(0)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let result = client
        .multi_upload(&CallContext::new(), "mutation", "", Vec::new())
        .await;

    let error = result.unwrap_err();
    assert!(matches!(error, GraphqlError::Build(BuildError::NoUploads)));
    assert_eq!(error.to_string(), "build request error: has no files");
}

#[tokio::test]
async fn test_upload_reply_with_errors_fails_the_call() {
    let server = MockServer::start().await;
    mount_reply(
        &server,
        json!({ "data": null, "errors": [{ "message": "File too large" }] }),
    )
    .await;

    let client = create_client(&server);
    let result = client
        .single_upload(
            &CallContext::new(),
            "mutation ($file: Upload!) { singleUpload(file: $file) { filename } }",
            "singleUpload",
            Upload::new("big.bin", vec![0u8; 1024]),
        )
        .await;

    let error = result.unwrap_err();
    assert_eq!(error.response().unwrap().errors[0].message, "File too large");
    assert!(error.to_string().starts_with("singleUpload error: "));
}

#[tokio::test]
async fn test_send_upload_keeps_caller_variables_unaffected() {
    let server = MockServer::start().await;
    mount_reply(&server, json!({ "data": { "ok": true } })).await;

    let mut operation = Operation::upload(
        "mutation ($file: Upload!, $note: String) { upload(file: $file, note: $note) }",
        "upload",
        vec![Upload::new("n.txt", "n")],
    );
    operation
        .variables
        .insert("note".to_string(), json!("kept locally"));
    let kept = operation.variables.clone();

    // The caller's copy is untouched; the wire copy carries only placeholders.
    let payload = operation.upload_payload(UploadMode::Single).unwrap();
    assert_eq!(operation.variables, kept);
    assert_eq!(payload.operations()["variables"], json!({ "file": null }));

    let client = create_client(&server);
    let response = client
        .send_upload(&CallContext::new(), operation, UploadMode::Single)
        .await
        .unwrap();
    assert!(response.guess::<bool>("ok").unwrap());
}
