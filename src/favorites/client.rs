use crate::auth::session::{Bearer, SessionManager};
use crate::core::config::FavoritesConfig;
use crate::http::{HttpRequest, HttpTransport};
use crate::{Error, Result};
use fxhash::FxHashSet;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use url::Url;

/// Expected shape of the list response
#[derive(Debug, Deserialize)]
struct FavoritesPayload {
    favorites: Vec<String>,
}

/// Result of a successful toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteToggle {
    Added,
    Removed,
}

impl FavoriteToggle {
    pub fn is_favorite(&self) -> bool {
        matches!(self, Self::Added)
    }

    /// Translation key of the toast shown after the toggle
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::Added => "message.addedToFavorites",
            Self::Removed => "message.removedFromFavorites",
        }
    }
}

/// Client for `{endpoint}/favorites`.
///
/// Calls are made with the identity token of the current session, which is
/// refreshed first when it is about to expire.
#[derive(Clone)]
pub struct FavoritesClient {
    transport: Arc<dyn HttpTransport>,
    session: SessionManager,
    config: FavoritesConfig,
}

impl FavoritesClient {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        session: SessionManager,
        config: FavoritesConfig,
    ) -> Self {
        Self {
            transport,
            session,
            config,
        }
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Favorite pin ids of the current user.
    ///
    /// Never fails: no session, a transport error, or a response of the wrong
    /// shape all yield an empty set.
    pub async fn list(&self) -> FxHashSet<String> {
        if !self.session.state().is_authenticated() {
            return FxHashSet::default();
        }

        match self.try_list().await {
            Ok(pins) => pins,
            Err(e) => {
                log::error!("Error fetching favorites: {}", e);
                FxHashSet::default()
            }
        }
    }

    async fn try_list(&self) -> Result<FxHashSet<String>> {
        let bearer = self.session.bearer().await?;
        let url = self.config.favorites_url();

        let response = self
            .transport
            .send(HttpRequest::get(url.as_str()).bearer(&bearer.id_token))
            .await?
            .error_for_status(&url)?;

        let payload: FavoritesPayload = response.json().map_err(|e| {
            Error::InvalidData(format!("Invalid response format: {}", e))
        })?;

        log::debug!("fetched {} favorites", payload.favorites.len());
        Ok(payload.favorites.into_iter().collect())
    }

    /// Adds `pin_id` to the user's favorites
    pub async fn add(&self, pin_id: &str) -> Result<()> {
        let Bearer { id_token, sub } = self.session.bearer().await?;
        let url = self.config.favorites_url();

        self.transport
            .send(
                HttpRequest::post(url.as_str())
                    .bearer(&id_token)
                    .json(json!({ "sub": sub, "pin_id": pin_id })),
            )
            .await?
            .error_for_status(&url)
            .map_err(|e| {
                log::error!("Error adding to favorites: {}", e);
                e
            })?;

        log::info!("added favorite {}", pin_id);
        Ok(())
    }

    /// Removes `pin_id` from the user's favorites
    pub async fn remove(&self, pin_id: &str) -> Result<()> {
        let bearer = self.session.bearer().await?;

        let mut url = Url::parse(&self.config.favorites_url())?;
        url.query_pairs_mut().append_pair("pin_id", pin_id);

        self.transport
            .send(
                HttpRequest::delete(url.as_str())
                    .bearer(&bearer.id_token)
                    .header("Content-Type", "application/json"),
            )
            .await?
            .error_for_status(url.as_str())
            .map_err(|e| {
                log::error!("Error deleting favorite: {}", e);
                e
            })?;

        log::info!("removed favorite {}", pin_id);
        Ok(())
    }

    /// Adds or removes `pin_id` depending on its current state.
    ///
    /// Two toggles of the same pin are not serialized against each other;
    /// whichever response lands last wins.
    pub async fn toggle(&self, pin_id: &str, currently_favorite: bool) -> Result<FavoriteToggle> {
        if currently_favorite {
            self.remove(pin_id).await?;
            Ok(FavoriteToggle::Removed)
        } else {
            self.add(pin_id).await?;
            Ok(FavoriteToggle::Added)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::encode_test_token;
    use crate::core::clock::FixedClock;
    use crate::core::config::AuthConfig;
    use crate::http::mock::ScriptedTransport;
    use crate::http::{Method, RequestBody};
    use crate::storage::preferences::{keys, PreferenceStore};

    const NOW: i64 = 1_700_000_000_000;

    fn client(transport: Arc<ScriptedTransport>, signed_in: bool) -> FavoritesClient {
        let store = PreferenceStore::in_memory();
        if signed_in {
            let id_token = encode_test_token(&json!({"sub": "user-1"}));
            store.set(keys::ID_TOKEN, &id_token);
            store.set(keys::ACCESS_TOKEN, "access");
            store.set(keys::REFRESH_TOKEN, "refresh");
            store.set(keys::SUB, "user-1");
            store.set(keys::TOKEN_EXPIRY, &(NOW + 3_600_000));
        }
        let session = SessionManager::new(
            transport.clone(),
            store,
            AuthConfig::default(),
            Arc::new(FixedClock::new(NOW)),
        );
        let config = FavoritesConfig {
            api_endpoint: "https://api.example.com/dev".to_string(),
        };
        FavoritesClient::new(transport, session, config)
    }

    #[tokio::test]
    async fn test_list_anonymous_is_empty() {
        let transport = Arc::new(ScriptedTransport::new());
        assert!(client(transport.clone(), false).list().await.is_empty());
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_list_parses_favorites() {
        let transport = Arc::new(ScriptedTransport::new().respond(200, r#"{"favorites": ["p1", "p2"]}"#));
        let pins = client(transport.clone(), true).list().await;
        assert_eq!(pins.len(), 2);
        assert!(pins.contains("p1"));

        let request = &transport.requests()[0];
        assert_eq!(request.url, "https://api.example.com/dev/favorites");
        assert!(request.header_value("authorization").unwrap().starts_with("Bearer "));
    }

    #[tokio::test]
    async fn test_list_degrades_to_empty() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond(200, r#"{"favorites": "not-an-array"}"#)
                .respond(500, "oops")
                .respond(200, r#"{"favorites": [1, 2]}"#),
        );
        let client = client(transport, true);
        assert!(client.list().await.is_empty());
        assert!(client.list().await.is_empty());
        assert!(client.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_add_and_remove_requests() {
        let transport = Arc::new(ScriptedTransport::always(200, "{}"));
        let client = client(transport.clone(), true);

        assert_eq!(client.toggle("pin 7", false).await.unwrap(), FavoriteToggle::Added);
        assert_eq!(client.toggle("pin 7", true).await.unwrap(), FavoriteToggle::Removed);

        let requests = transport.requests();
        assert_eq!(requests[0].method, Method::Post);
        assert_eq!(
            requests[0].body,
            Some(RequestBody::Json(json!({"sub": "user-1", "pin_id": "pin 7"})))
        );
        assert_eq!(requests[1].method, Method::Delete);
        assert_eq!(
            requests[1].url,
            "https://api.example.com/dev/favorites?pin_id=pin+7"
        );
    }

    #[tokio::test]
    async fn test_add_requires_session() {
        let transport = Arc::new(ScriptedTransport::always(200, "{}"));
        let err = client(transport.clone(), false).add("p1").await.unwrap_err();
        assert!(matches!(err, Error::NotAuthenticated));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_add_rejected_by_service() {
        let transport = Arc::new(ScriptedTransport::always(403, "forbidden"));
        let err = client(transport, true).add("p1").await.unwrap_err();
        assert!(matches!(err, Error::Http { status: 403, .. }));
    }
}
