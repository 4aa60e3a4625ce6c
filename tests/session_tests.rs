use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use pinmap::auth::{LandingOutcome, SessionManager};
use pinmap::core::clock::FixedClock;
use pinmap::core::config::{AppConfig, AuthConfig, RetryPolicy};
use pinmap::http::mock::ScriptedTransport;
use pinmap::http::{Method, RequestBody};
use pinmap::storage::{keys, PreferenceStore};
use pinmap::view::ToastKind;
use pinmap::{Language, TourMap};
use serde_json::json;
use std::sync::Arc;

/// Session lifecycle and favorites against a scripted identity provider
#[cfg(test)]
mod session_tests {
    use super::*;

    const NOW: i64 = 1_717_200_000_000;
    const MINUTE: i64 = 60 * 1000;

    fn id_token(sub: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256"}"#);
        let payload = URL_SAFE_NO_PAD.encode(json!({"sub": sub, "email": "guest@example.com"}).to_string());
        format!("{}.{}.sig", header, payload)
    }

    fn token_body(with_refresh: bool) -> String {
        let mut body = json!({
            "access_token": "fresh-access",
            "id_token": id_token("user-42"),
            "expires_in": 3600
        });
        if with_refresh {
            body["refresh_token"] = json!("fresh-refresh");
        }
        body.to_string()
    }

    fn seed_session(store: &PreferenceStore, expires_in_ms: i64) {
        store.set(keys::ACCESS_TOKEN, "old-access");
        store.set(keys::ID_TOKEN, &id_token("user-42"));
        store.set(keys::REFRESH_TOKEN, "old-refresh");
        store.set(keys::SUB, "user-42");
        store.set(keys::TOKEN_EXPIRY, &(NOW + expires_in_ms));
    }

    fn session(transport: Arc<ScriptedTransport>, store: PreferenceStore) -> SessionManager {
        SessionManager::new(
            transport,
            store,
            AuthConfig::default(),
            Arc::new(FixedClock::new(NOW)),
        )
    }

    #[tokio::test]
    async fn test_refresh_when_expiring_within_five_minutes() {
        let transport = Arc::new(ScriptedTransport::new().respond(200, token_body(false)));
        let store = PreferenceStore::in_memory();
        seed_session(&store, 4 * MINUTE);

        assert!(session(transport.clone(), store.clone()).check_and_refresh_tokens().await);
        assert_eq!(transport.request_count(), 1);

        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::Post);
        match &request.body {
            Some(RequestBody::Form(form)) => {
                assert!(form.contains(&("grant_type".to_string(), "refresh_token".to_string())));
                assert!(form.contains(&("refresh_token".to_string(), "old-refresh".to_string())));
            }
            other => panic!("unexpected body: {:?}", other),
        }

        assert_eq!(
            store.get_optional::<String>(keys::ACCESS_TOKEN).as_deref(),
            Some("fresh-access")
        );
        // no refresh token in the response: the old one is kept
        assert_eq!(
            store.get_optional::<String>(keys::REFRESH_TOKEN).as_deref(),
            Some("old-refresh")
        );
        assert_eq!(store.get_optional::<i64>(keys::TOKEN_EXPIRY), Some(NOW + 60 * MINUTE));
    }

    #[tokio::test]
    async fn test_no_refresh_when_expiry_is_far() {
        let transport = Arc::new(ScriptedTransport::new());
        let store = PreferenceStore::in_memory();
        seed_session(&store, 10 * MINUTE);

        assert!(session(transport.clone(), store).check_and_refresh_tokens().await);
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_bearer_after_failed_refresh_is_not_authenticated() {
        let transport = Arc::new(ScriptedTransport::new().respond(401, "expired"));
        let store = PreferenceStore::in_memory();
        seed_session(&store, MINUTE);

        let session = session(transport, store);
        assert!(matches!(session.bearer().await, Err(pinmap::Error::NotAuthenticated)));
        assert!(!session.state().is_authenticated());
    }

    fn tour_map(transport: Arc<ScriptedTransport>, store: PreferenceStore) -> TourMap {
        let mut config = AppConfig::default();
        config.feed.url = "https://feeds.example.com/pins.geojson".to_string();
        config.feed.retry = RetryPolicy::for_testing();
        config.favorites.api_endpoint = "https://api.example.com/dev".to_string();
        let map = TourMap::with_clock(config, transport, store, Arc::new(FixedClock::new(NOW)));
        map.set_language(Language::En);
        map
    }

    fn feed() -> String {
        json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {"id": "1", "pin_id": "pin-1", "title": "Shuri Castle", "category": "1"},
                    "geometry": {"type": "Point", "coordinates": [127.719, 26.217]}
                },
                {
                    "type": "Feature",
                    "properties": {"id": "2", "pin_id": "pin-2", "title": "Naha Airport", "category": "9"},
                    "geometry": {"type": "Point", "coordinates": [127.646, 26.196]}
                }
            ]
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_landing_then_favorites_flow() {
        let transport = Arc::new(
            ScriptedTransport::new()
                // code exchange
                .respond(200, token_body(true))
                // favorites after sign-in
                .respond(200, r#"{"favorites": ["pin-2"]}"#)
                // feed, then favorites again on reload
                .respond(200, feed())
                .respond(200, r#"{"favorites": ["pin-2"]}"#)
                // add pin-1
                .respond(201, "{}")
                // remove pin-2
                .respond(204, ""),
        );
        let store = PreferenceStore::in_memory();
        let mut map = tour_map(transport.clone(), store.clone());

        let outcome = map
            .handle_landing("https://mop-okinawa.com/?code=abc123")
            .await
            .unwrap();
        match outcome {
            LandingOutcome::SignedIn { user, url } => {
                assert_eq!(user.sub, "user-42");
                assert_eq!(url, "https://mop-okinawa.com/");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(store.get_optional::<String>(keys::SUB).as_deref(), Some("user-42"));
        assert!(map.favorite_status().is_favorite("pin-2"));

        map.reload().await;
        let favorites: Vec<&str> = map.favorite_locations().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(favorites, vec!["2"]);
        assert!(map.popup("2", None).unwrap().is_favorite);

        let added = map.toggle_favorite("pin-1").await;
        assert_eq!(added.kind, ToastKind::Success);
        assert_eq!(added.message, "Added to favorites!");

        let removed = map.toggle_favorite("pin-2").await;
        assert_eq!(removed.message, "Removed from favorites");

        assert!(map.favorite_status().is_favorite("pin-1"));
        assert!(!map.favorite_status().is_favorite("pin-2"));

        let requests = transport.requests();
        assert_eq!(requests.len(), 6);
        assert_eq!(requests[4].method, Method::Post);
        assert_eq!(
            requests[4].body,
            Some(RequestBody::Json(json!({"sub": "user-42", "pin_id": "pin-1"})))
        );
        assert_eq!(requests[5].method, Method::Delete);
        assert!(requests[5].url.ends_with("/favorites?pin_id=pin-2"));
    }

    #[tokio::test]
    async fn test_malformed_favorites_response_is_empty() {
        let transport = Arc::new(
            ScriptedTransport::new().respond(200, r#"{"favorites": "not-an-array"}"#),
        );
        let store = PreferenceStore::in_memory();
        seed_session(&store, 30 * MINUTE);

        let mut map = tour_map(transport.clone(), store);
        map.refresh_favorites().await;
        assert!(map.favorite_status().is_empty());
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_rejected_toggle_shows_error_toast() {
        let transport = Arc::new(ScriptedTransport::new().respond(500, "boom"));
        let store = PreferenceStore::in_memory();
        seed_session(&store, 30 * MINUTE);

        let mut map = tour_map(transport, store);
        let toast = map.toggle_favorite("pin-1").await;
        assert_eq!(toast.kind, ToastKind::Error);
        assert!(!map.favorite_status().is_favorite("pin-1"));
    }

    #[tokio::test]
    async fn test_logout_clears_favorites() {
        let transport = Arc::new(ScriptedTransport::new().respond(200, r#"{"favorites": ["pin-1"]}"#));
        let store = PreferenceStore::in_memory();
        seed_session(&store, 30 * MINUTE);

        let mut map = tour_map(transport, store);
        map.refresh_favorites().await;
        assert_eq!(map.favorite_status().len(), 1);

        map.logout();
        assert!(map.favorite_status().is_empty());
        assert!(!map.session().state().is_authenticated());
        assert!(map.login_url().unwrap().as_str().contains("response_type=code"));
    }
}
