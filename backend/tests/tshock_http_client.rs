//! Integration tests for the reqwest TShock client against a stub upstream.
//!
//! Each test starts a wiremock server, points a fresh client at it, and
//! checks the requests the client actually sent.

use std::sync::Arc;
use std::time::Duration;

use rstest::{fixture, rstest};
use serde_json::json;
use tshock_gateway::domain::ports::{TShockApi, TShockApiError};
use tshock_gateway::domain::{Credentials, ServerAdminService, UserCondition};
use tshock_gateway::outbound::tshock::{TOKEN_PARAM, TShockHttpClient};
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const TOKEN: &str = "tok-1";

#[fixture]
fn credentials() -> Credentials {
    Credentials::try_from_parts("admin", "secret").expect("valid credentials")
}

fn client_for(server: &MockServer, credentials: Credentials) -> TShockHttpClient {
    client_with_timeout(server, credentials, Duration::from_secs(2))
}

fn client_with_timeout(
    server: &MockServer,
    credentials: Credentials,
    timeout: Duration,
) -> TShockHttpClient {
    let base = Url::parse(&server.uri()).expect("stub URI");
    TShockHttpClient::new(base, timeout, credentials).expect("client should build")
}

async fn mount_token_create(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/v2/token/create"))
        .and(query_param("username", "admin"))
        .and(query_param("password", "secret"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": "200", "token": TOKEN })),
        )
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn token_of(request: &Request) -> Option<String> {
    request
        .url
        .query_pairs()
        .find(|(key, _)| key == TOKEN_PARAM)
        .map(|(_, value)| value.into_owned())
}

async fn requests_to(server: &MockServer, route: &str) -> Vec<Request> {
    server
        .received_requests()
        .await
        .expect("request recording is enabled")
        .into_iter()
        .filter(|request| request.url.path() == route)
        .collect()
}

#[rstest]
#[tokio::test]
async fn first_authenticated_call_logs_in_once(credentials: Credentials) {
    let server = MockServer::start().await;
    mount_token_create(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/v2/users/list"))
        .and(query_param(TOKEN_PARAM, TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "200",
            "users": [{ "name": "alice", "id": 1, "group": "superadmin" }]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server, credentials);
    let first = client.users_list().await.expect("first list");
    let second = client.users_list().await.expect("second list");

    assert_eq!(first, second);
    assert_eq!(first[0].name, "alice");
    assert_eq!(client.session().await.token(), Some(TOKEN));
}

#[rstest]
#[tokio::test]
async fn concurrent_calls_share_a_single_login(credentials: Credentials) {
    let server = MockServer::start().await;
    mount_token_create(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/v2/server/broadcast"))
        .and(query_param(TOKEN_PARAM, TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "200" })))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v3/server/rawcmd"))
        .and(query_param(TOKEN_PARAM, TOKEN))
        .and(query_param("cmd", "/time noon"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": "200", "response": ["Set time to 12:00."] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, credentials);
    let (first, second, output) = tokio::join!(
        client.server_broadcast("hello"),
        client.server_broadcast("again"),
        client.server_raw_cmd("/time noon"),
    );

    first.expect("first broadcast");
    second.expect("second broadcast");
    assert_eq!(output.expect("raw command"), vec!["Set time to 12:00.".to_owned()]);
}

#[rstest]
#[tokio::test]
async fn failed_login_skips_the_original_request(credentials: Credentials) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/token/create"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "status": "403",
            "error": "Invalid username/password combination provided."
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/users/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "200" })))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server, credentials);
    let error = client.users_list().await.expect_err("login must fail");

    assert_eq!(
        error,
        TShockApiError::rejected(403_u16, "Invalid username/password combination provided.")
    );
    assert!(client.session().await.token().is_none());
}

#[rstest]
#[tokio::test]
async fn public_endpoints_never_carry_a_token(credentials: Credentials) {
    let server = MockServer::start().await;
    mount_token_create(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/v3/server/motd"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "200",
            "motd": ["Welcome", "Be nice"]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, credentials.clone());
    client
        .create_token(&credentials)
        .await
        .expect("token should be issued");
    let motd = client.server_motd().await.expect("motd");

    assert_eq!(motd, vec!["Welcome".to_owned(), "Be nice".to_owned()]);
    let sent = requests_to(&server, "/v3/server/motd").await;
    assert_eq!(sent.len(), 1);
    assert_eq!(token_of(&sent[0]), None);
}

#[rstest]
#[tokio::test]
async fn status_requests_flags_and_drops_marker(credentials: Credentials) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/server/status"))
        .and(query_param("players", "true"))
        .and(query_param("rules", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "200",
            "name": "Terraria",
            "serverversion": "v1.4.4.9",
            "tshockversion": "5.2.0",
            "port": 7777,
            "playercount": 0,
            "maxplayers": 8,
            "world": "Forest",
            "uptime": "0.00:10:00",
            "serverpassword": false,
            "players": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, credentials);
    let status = client.server_status(true, false).await.expect("status");
    let rendered = serde_json::to_value(&status).expect("serialise status");

    assert_eq!(status.port, 7777);
    assert_eq!(status.players, Some(Vec::new()));
    assert!(rendered.get("status").is_none());
    assert!(rendered.get("rules").is_none());
}

#[rstest]
#[tokio::test]
async fn destroy_without_argument_targets_the_session_token(credentials: Credentials) {
    let server = MockServer::start().await;
    mount_token_create(&server, 1).await;
    Mock::given(method("GET"))
        .and(path(format!("/token/destroy/{TOKEN}")))
        .and(query_param(TOKEN_PARAM, TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "200",
            "response": "Destroyed token."
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/token/destroy/retired-token"))
        .and(query_param(TOKEN_PARAM, TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "200" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, credentials.clone());
    client
        .create_token(&credentials)
        .await
        .expect("token should be issued");
    client.destroy_token(None).await.expect("destroy own token");
    client
        .destroy_token(Some("retired-token".to_owned()))
        .await
        .expect("destroy named token");

    assert_eq!(client.session().await.token(), Some(TOKEN));
}

#[rstest]
#[tokio::test]
async fn destroy_without_argument_targets_the_latest_token(credentials: Credentials) {
    let server = MockServer::start().await;
    for token in ["t1", "t2"] {
        Mock::given(method("GET"))
            .and(path("/v2/token/create"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "status": "200", "token": token })),
            )
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/token/destroy/t2"))
        .and(query_param(TOKEN_PARAM, "t2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "200" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, credentials.clone());
    let first = client.create_token(&credentials).await.expect("first token");
    let second = client.create_token(&credentials).await.expect("second token");
    client.destroy_token(None).await.expect("destroy latest token");

    assert_eq!((first.as_str(), second.as_str()), ("t1", "t2"));
    assert!(requests_to(&server, "/token/destroy/t1").await.is_empty());
}

#[rstest]
#[tokio::test]
async fn repeated_token_tests_keep_the_session_token(credentials: Credentials) {
    let server = MockServer::start().await;
    mount_token_create(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/tokentest"))
        .and(query_param(TOKEN_PARAM, TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "200",
            "associateduser": "admin"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server, credentials.clone());
    let service = ServerAdminService::new(Arc::new(client), credentials);

    assert_eq!(service.verify_token().await.as_deref(), Some("admin"));
    assert_eq!(service.verify_token().await.as_deref(), Some("admin"));
}

#[rstest]
#[case::by_id("42", "id", "42")]
#[case::by_name("alice", "name", "alice")]
#[case::padded_id(" 7 ", "id", "7")]
#[tokio::test]
async fn user_lookups_tag_the_identifier(
    credentials: Credentials,
    #[case] identifier: &str,
    #[case] expected_type: &str,
    #[case] expected_user: &str,
) {
    let server = MockServer::start().await;
    mount_token_create(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/v2/users/read"))
        .and(query_param("type", expected_type))
        .and(query_param("user", expected_user))
        .and(query_param(TOKEN_PARAM, TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "200",
            "name": "alice",
            "id": 42,
            "group": "default"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, credentials);
    let user = client
        .users_read(&UserCondition::parse(identifier))
        .await
        .expect("user should be read");

    assert_eq!(user.id, 42);
}

#[rstest]
#[tokio::test]
async fn failing_marker_maps_to_rejection(credentials: Credentials) {
    let server = MockServer::start().await;
    mount_token_create(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/v2/users/destroy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "400",
            "error": "Invalid user name"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, credentials);
    let error = client
        .users_destroy(&UserCondition::by_name("ghost"))
        .await
        .expect_err("marker 400 must fail");

    assert_eq!(error, TShockApiError::rejected(400_u16, "Invalid user name"));
}

#[rstest]
#[tokio::test]
async fn non_json_gateway_errors_keep_the_http_status(credentials: Credentials) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/server/rules"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server, credentials);
    let error = client.server_rules().await.expect_err("502 must fail");

    assert_eq!(error, TShockApiError::rejected(502_u16, "<html>Bad Gateway</html>"));
}

#[rstest]
#[tokio::test]
async fn slow_upstream_maps_to_timeout(credentials: Credentials) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/server/motd"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": "200", "motd": [] }))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let client = client_with_timeout(&server, credentials, Duration::from_millis(50));
    let error = client.server_motd().await.expect_err("request must time out");

    assert!(matches!(error, TShockApiError::Timeout { .. }));
}

#[rstest]
#[tokio::test]
async fn facade_reports_upstream_failures_as_empty_results(credentials: Credentials) {
    let server = MockServer::start().await;
    mount_token_create(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/v2/users/list"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/users/create"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "status": "500",
            "error": "User already exists"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, credentials.clone());
    let service = ServerAdminService::new(Arc::new(client), credentials);

    assert!(service.list_users().await.is_empty());
    assert!(!service.create_user("alice", "pw", Some("default")).await);
}

#[rstest]
#[tokio::test]
async fn maintenance_calls_hit_their_endpoints(credentials: Credentials) {
    let server = MockServer::start().await;
    mount_token_create(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/v3/server/reload"))
        .and(query_param(TOKEN_PARAM, TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "200" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/server/off"))
        .and(query_param("confirm", "true"))
        .and(query_param(TOKEN_PARAM, TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "200" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/token/destroy/all"))
        .and(query_param(TOKEN_PARAM, TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "200" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, credentials);
    client.server_reload().await.expect("reload");
    client.server_off().await.expect("shutdown");
    client.destroy_all_tokens().await.expect("destroy all tokens");
}
