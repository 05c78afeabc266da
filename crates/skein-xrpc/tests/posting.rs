//! Sessions and posting against a mock PDS.

use chrono::{TimeZone, Utc};
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use skein_core::richtext::{AspectRatio, HashTag, Link, Mention, PostBuilder};
use skein_core::{
    AccessToken, AtUri, Credentials, Did, Error, FailureKind, Handle, PdsUrl, RefreshToken,
};
use skein_xrpc::AtpClient;

const DID: &str = "did:plc:test123";

fn mock_pds_url(server: &MockServer) -> PdsUrl {
    PdsUrl::new(format!("http://127.0.0.1:{}", server.address().port())).unwrap()
}

fn authed_client(server: &MockServer) -> AtpClient {
    AtpClient::new(mock_pds_url(server))
        .unwrap()
        .with_access_token(AccessToken::new("test-access-token").unwrap())
}

fn session_body(access: &str, refresh: &str) -> Value {
    json!({
        "did": DID,
        "handle": "alice.test",
        "accessJwt": access,
        "refreshJwt": refresh,
        "email": "alice@example.com",
        "emailConfirmed": true,
        "active": true
    })
}

// ============================================================================
// Sessions
// ============================================================================

#[tokio::test]
async fn test_create_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/xrpc/com.atproto.server.createSession"))
        .and(body_json(json!({
            "identifier": "alice.test",
            "password": "app-password"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(session_body("access-jwt-1", "refresh-jwt-1")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = AtpClient::new(mock_pds_url(&server)).unwrap();
    let session = client
        .create_session(&Credentials::new("alice.test", "app-password"))
        .await
        .unwrap()
        .into_result()
        .unwrap();

    assert_eq!(session.did, Did::new(DID).unwrap());
    assert_eq!(session.handle, Handle::new("alice.test").unwrap());
    assert_eq!(session.access_token.as_str(), "access-jwt-1");
    assert_eq!(session.refresh_token.as_str(), "refresh-jwt-1");
    assert_eq!(session.email_confirmed, Some(true));

    // The client that logged in stays unauthenticated.
    assert!(!client.is_authenticated());
    assert!(client.with_access_token(session.access_token).is_authenticated());
}

#[tokio::test]
async fn test_create_session_sends_auth_factor_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/xrpc/com.atproto.server.createSession"))
        .and(body_json(json!({
            "identifier": "alice.test",
            "password": "app-password",
            "authFactorToken": "123456"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(session_body("access-jwt-1", "refresh-jwt-1")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let credentials =
        Credentials::new("alice.test", "app-password").with_auth_factor_token("123456");
    let response = AtpClient::new(mock_pds_url(&server))
        .unwrap()
        .create_session(&credentials)
        .await
        .unwrap();
    assert!(response.succeeded());
}

#[tokio::test]
async fn test_create_session_bad_password() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/xrpc/com.atproto.server.createSession"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "AuthenticationRequired",
            "message": "Invalid identifier or password"
        })))
        .mount(&server)
        .await;

    let response = AtpClient::new(mock_pds_url(&server))
        .unwrap()
        .create_session(&Credentials::new("alice.test", "wrong"))
        .await
        .unwrap();

    assert!(!response.succeeded());
    assert_eq!(response.status(), Some(401));
    assert_eq!(response.failure_kind(), Some(FailureKind::Authentication));
}

#[tokio::test]
async fn test_refresh_session_uses_refresh_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/xrpc/com.atproto.server.refreshSession"))
        .and(header("authorization", "Bearer refresh-jwt-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(session_body("access-jwt-2", "refresh-jwt-2")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let refresh = RefreshToken::new("refresh-jwt-1").unwrap();
    let session = AtpClient::new(mock_pds_url(&server))
        .unwrap()
        .refresh_session(&refresh)
        .await
        .unwrap()
        .into_result()
        .unwrap();

    assert_eq!(session.access_token.as_str(), "access-jwt-2");
    assert_eq!(session.refresh_token.as_str(), "refresh-jwt-2");
}

#[tokio::test]
async fn test_refresh_session_expired() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/xrpc/com.atproto.server.refreshSession"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "ExpiredToken",
            "message": "Token has expired"
        })))
        .mount(&server)
        .await;

    let response = AtpClient::new(mock_pds_url(&server))
        .unwrap()
        .refresh_session(&RefreshToken::new("old-refresh").unwrap())
        .await
        .unwrap();

    assert_eq!(response.failure_kind(), Some(FailureKind::Authentication));
}

// ============================================================================
// Posts
// ============================================================================

#[tokio::test]
async fn test_create_post_sends_facets_and_type() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/xrpc/com.atproto.repo.createRecord"))
        .and(header("authorization", "Bearer test-access-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uri": format!("at://{}/app.bsky.feed.post/3l2ab3cd4ef5g", DID),
            "cid": "bafyreipost"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let bob = Did::new("did:plc:bob").unwrap();
    let mut builder = PostBuilder::new();
    builder
        .text("ünïcode hi ")
        .mention(Mention::for_handle(bob, &Handle::new("bob.test").unwrap()))
        .text(" see ")
        .link(Link::with_text("https://example.com/".parse().unwrap(), "this").unwrap())
        .text(" ")
        .hashtag(HashTag::new("rust").unwrap())
        .languages(["en"])
        .created_at(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
    let post = builder.build().unwrap();

    let output = authed_client(&server)
        .create_post(&Did::new(DID).unwrap(), &post)
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(output.uri.collection().as_str(), "app.bsky.feed.post");

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(
        body,
        json!({
            "repo": DID,
            "collection": "app.bsky.feed.post",
            "record": {
                "$type": "app.bsky.feed.post",
                "text": "ünïcode hi @bob.test see this #rust",
                "facets": [
                    {
                        "index": { "byteStart": 13, "byteEnd": 22 },
                        "features": [
                            { "$type": "app.bsky.richtext.facet#mention", "did": "did:plc:bob" }
                        ]
                    },
                    {
                        "index": { "byteStart": 27, "byteEnd": 31 },
                        "features": [
                            { "$type": "app.bsky.richtext.facet#link", "uri": "https://example.com/" }
                        ]
                    },
                    {
                        "index": { "byteStart": 32, "byteEnd": 37 },
                        "features": [
                            { "$type": "app.bsky.richtext.facet#tag", "tag": "rust" }
                        ]
                    }
                ],
                "langs": ["en"],
                "createdAt": "2024-05-01T12:00:00Z"
            }
        })
    );
}

#[tokio::test]
async fn test_create_post_requires_token() {
    let server = MockServer::start().await;

    let post = PostBuilder::with_text("hello").build().unwrap();
    let err = AtpClient::new(mock_pds_url(&server))
        .unwrap()
        .create_post(&Did::new(DID).unwrap(), &post)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Auth(skein_core::error::AuthError::SessionRequired)
    ));
}

#[tokio::test]
async fn test_delete_post() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/xrpc/com.atproto.repo.deleteRecord"))
        .and(body_json(json!({
            "repo": DID,
            "collection": "app.bsky.feed.post",
            "rkey": "3l2ab3cd4ef5g"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let uri = AtUri::new(format!("at://{}/app.bsky.feed.post/3l2ab3cd4ef5g", DID)).unwrap();
    let response = authed_client(&server).delete_post(&uri).await.unwrap();
    assert!(response.succeeded());
}

#[tokio::test]
async fn test_delete_post_rejects_other_collections() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let uri = AtUri::new(format!("at://{}/app.bsky.feed.like/3l2ab3cd4ef5g", DID)).unwrap();
    let err = authed_client(&server).delete_post(&uri).await.unwrap_err();
    assert!(err.is_invalid_input());
}

#[tokio::test]
async fn test_upload_image_then_post_it() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/xrpc/com.atproto.repo.uploadBlob"))
        .and(header("content-type", "image/jpeg"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "blob": {
                "$type": "blob",
                "ref": { "$link": "bafkreiimage" },
                "mimeType": "image/jpeg",
                "size": 3
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = authed_client(&server);
    let image = client
        .upload_image(
            vec![0xff, 0xd8, 0xff],
            "image/jpeg",
            "a cat",
            Some(AspectRatio::new(4, 3).unwrap()),
        )
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(image.alt, "a cat");
    assert_eq!(image.image.cid().as_str(), "bafkreiimage");

    let post = PostBuilder::with_text("look").image(image).build().unwrap();
    let embed = serde_json::to_value(post.embed.unwrap()).unwrap();
    assert_eq!(embed["$type"], "app.bsky.embed.images");
    assert_eq!(embed["images"][0]["image"]["ref"]["$link"], "bafkreiimage");
    assert_eq!(embed["images"][0]["image"]["$type"], "blob");
    assert_eq!(embed["images"][0]["aspectRatio"]["width"], 4);
}

#[tokio::test]
async fn test_upload_image_rejects_non_image() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = authed_client(&server)
        .upload_image(vec![1, 2, 3], "application/pdf", "doc", None)
        .await
        .unwrap_err();
    assert!(err.is_invalid_input());
}
