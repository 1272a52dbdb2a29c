use std::sync::{Arc, Mutex};

use knightride_application::{AuthService, ContactBook};
use knightride_core::auth::Credentials;
use knightride_core::contact::ContactRef;
use knightride_core::session::SessionStore;
use knightride_interaction::ApiClient;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(server.uri(), Arc::new(SessionStore::in_memory()))
}

/// Contact list that supports listing and positional deletion.
#[derive(Clone)]
struct ContactServer {
    phones: Arc<Mutex<Vec<&'static str>>>,
}

impl ContactServer {
    fn body(phones: &[&'static str]) -> serde_json::Value {
        let contacts: Vec<_> = phones
            .iter()
            .enumerate()
            .map(|(i, phone)| {
                json!({
                    "id": format!("c-{}", i),
                    "name": format!("Contact {}", i),
                    "phone": phone,
                    "relationship": "Friend"
                })
            })
            .collect();
        json!({ "contacts": contacts })
    }
}

impl Respond for ContactServer {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let mut phones = self.phones.lock().unwrap();
        if request.method.as_str() == "GET" {
            return ResponseTemplate::new(200).set_body_json(Self::body(&phones));
        }

        let index: usize = request
            .url
            .path()
            .rsplit('/')
            .next()
            .and_then(|segment| segment.parse().ok())
            .unwrap_or(usize::MAX);
        if index >= phones.len() {
            return ResponseTemplate::new(404).set_body_json(json!({ "detail": "Contact not found" }));
        }
        let removed = phones.remove(index);
        ResponseTemplate::new(200).set_body_json(json!({
            "message": "Emergency contact deleted successfully",
            "deleted_contact": { "name": "removed", "phone": removed, "relationship": "Friend" }
        }))
    }
}

async fn contact_server(phones: Vec<&'static str>) -> (MockServer, ContactServer) {
    let server = MockServer::start().await;
    let state = ContactServer {
        phones: Arc::new(Mutex::new(phones)),
    };
    Mock::given(method("GET"))
        .and(path("/contacts"))
        .respond_with(state.clone())
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(state.clone())
        .mount(&server)
        .await;
    (server, state)
}

#[tokio::test]
async fn test_remove_matching_resolves_current_position() {
    let (server, state) =
        contact_server(vec!["+91 9000000001", "+91 9000000002", "+91 9000000003"]).await;
    let book = ContactBook::new(client_for(&server));

    book.remove_at(0).await.unwrap();
    let deleted = book.remove_matching("+919000000003").await.unwrap();

    assert_eq!(deleted.deleted_contact.unwrap().phone, "+91 9000000003");
    assert_eq!(*state.phones.lock().unwrap(), vec!["+91 9000000002"]);
}

#[tokio::test]
async fn test_remove_matching_unknown_phone() {
    let (server, state) = contact_server(vec!["+91 9000000001"]).await;
    let book = ContactBook::new(client_for(&server));

    let err = book.remove_matching("+1 555 0100").await.unwrap_err();

    assert_eq!(err.message(), "No emergency contact with phone +1 555 0100");
    assert_eq!(state.phones.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_sos_contact_set_uses_ids() {
    let (server, _state) = contact_server(vec!["+91 9000000001", "+91 9000000002"]).await;
    let book = ContactBook::new(client_for(&server));

    let refs = book.sos_contact_set().await.unwrap();

    assert_eq!(
        refs,
        vec![ContactRef("c-0".to_string()), ContactRef("c-1".to_string())]
    );
}

#[tokio::test]
async fn test_signed_out_profile_lookup_reports_server_detail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/profile"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({ "detail": "Not authenticated" })),
        )
        .mount(&server)
        .await;
    let auth = AuthService::new(client_for(&server));

    let err = auth.current_user().await.unwrap_err();

    assert_eq!(err.message(), "Not authenticated");
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_login_then_profile() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "jwt-1",
            "token_type": "bearer",
            "user_id": "u-1"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u-1",
            "name": "Arjun",
            "email": "arjun@example.com",
            "phone": "+91 9876543210"
        })))
        .mount(&server)
        .await;

    let auth = AuthService::new(client_for(&server));
    auth.login(&Credentials {
        email: "arjun@example.com".into(),
        password: "secret".into(),
    })
    .await
    .unwrap();
    let user = auth.current_user().await.unwrap();

    assert_eq!(user.id, "u-1");

    auth.logout();
    assert!(!auth.is_authenticated());
}
