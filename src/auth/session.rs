use super::token::{decode_id_token, IdClaims, TokenResponse};
use crate::core::clock::{Clock, SystemClock};
use crate::core::config::AuthConfig;
use crate::core::constants::TOKEN_REFRESH_WINDOW_MS;
use crate::http::{HttpRequest, HttpTransport};
use crate::storage::preferences::{keys, PreferenceStore};
use crate::{Error, Result};
use std::sync::Arc;
use url::Url;

/// Profile shown for a signed-in user
pub type UserInfo = IdClaims;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Anonymous,
    Authenticated(UserInfo),
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

/// What happened while processing the landing URL
#[derive(Debug, Clone, PartialEq)]
pub enum LandingOutcome {
    /// An authorization code was exchanged; `url` is the landing URL
    /// without the one-time code
    SignedIn { user: UserInfo, url: String },
    /// A stored session is still valid (refreshed if needed)
    Restored(UserInfo),
    Anonymous,
}

/// Credentials for a favorites call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bearer {
    pub id_token: String,
    pub sub: String,
}

/// OAuth2 authorization-code session backed by the preference store.
///
/// Every token artifact lives in the store under the keys in
/// [`keys::SESSION`]; the manager itself holds no session state.
#[derive(Clone)]
pub struct SessionManager {
    transport: Arc<dyn HttpTransport>,
    store: PreferenceStore,
    config: AuthConfig,
    clock: Arc<dyn Clock>,
}

impl SessionManager {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        store: PreferenceStore,
        config: AuthConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            transport,
            store,
            config,
            clock,
        }
    }

    /// Manager on the system clock
    pub fn with_system_clock(
        transport: Arc<dyn HttpTransport>,
        store: PreferenceStore,
        config: AuthConfig,
    ) -> Self {
        Self::new(transport, store, config, Arc::new(SystemClock))
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Hosted login page to send anonymous users to
    pub fn login_url(&self) -> Result<Url> {
        self.config.login_url()
    }

    /// Session as currently stored, without touching the network
    pub fn state(&self) -> SessionState {
        match self.stored_claims() {
            Some(user) if self.store.get_optional::<String>(keys::SUB).is_some() => {
                SessionState::Authenticated(user)
            }
            _ => SessionState::Anonymous,
        }
    }

    fn stored_claims(&self) -> Option<IdClaims> {
        let id_token: String = self.store.get_optional(keys::ID_TOKEN)?;
        decode_id_token(&id_token)
            .map_err(|e| log::warn!("stored identity token is unreadable: {}", e))
            .ok()
    }

    async fn request_tokens(&self, form: Vec<(&str, String)>) -> Result<TokenResponse> {
        let endpoint = self.config.token_endpoint();
        let response = self
            .transport
            .send(HttpRequest::post(endpoint.as_str()).form(form))
            .await?;

        if !response.is_success() {
            return Err(Error::Auth(format!("token endpoint returned {}", response.status)));
        }
        response.json()
    }

    fn persist_tokens(&self, tokens: &TokenResponse) {
        self.store.set(keys::ACCESS_TOKEN, &tokens.access_token);
        self.store.set(keys::ID_TOKEN, &tokens.id_token);
        if let Some(refresh_token) = &tokens.refresh_token {
            self.store.set(keys::REFRESH_TOKEN, refresh_token);
        }
        self.store
            .set(keys::TOKEN_EXPIRY, &tokens.expiry_ms(self.clock.now_ms()));
    }

    /// Exchanges a one-time authorization code for a token set
    pub async fn exchange_code(&self, code: &str) -> Result<UserInfo> {
        let tokens = self
            .request_tokens(vec![
                ("grant_type", "authorization_code".to_string()),
                ("code", code.to_string()),
                ("client_id", self.config.client_id.clone()),
                ("redirect_uri", self.config.redirect_uri.clone()),
            ])
            .await
            .map_err(|e| {
                log::error!("Token exchange error: {}", e);
                e
            })?;

        let claims = decode_id_token(&tokens.id_token)?;
        self.persist_tokens(&tokens);
        self.store.set(keys::SUB, &claims.sub);

        log::info!("signed in as {}", claims.sub);
        Ok(claims)
    }

    /// Trades the stored refresh token for fresh access and identity tokens
    pub async fn refresh_tokens(&self) -> Result<()> {
        let refresh_token: String = self
            .store
            .get_optional(keys::REFRESH_TOKEN)
            .ok_or(Error::NotAuthenticated)?;

        let tokens = self
            .request_tokens(vec![
                ("grant_type", "refresh_token".to_string()),
                ("refresh_token", refresh_token),
                ("client_id", self.config.client_id.clone()),
            ])
            .await?;

        self.persist_tokens(&tokens);
        log::debug!("tokens refreshed, valid for {}s", tokens.expires_in);
        Ok(())
    }

    /// Validates the stored session, refreshing tokens that expire within
    /// five minutes.
    ///
    /// Returns `false` when there is no session, or when the refresh fails;
    /// in the latter case the session is cleared.
    pub async fn check_and_refresh_tokens(&self) -> bool {
        let expiry: Option<i64> = self.store.get_optional(keys::TOKEN_EXPIRY);
        let refresh_token: Option<String> = self.store.get_optional(keys::REFRESH_TOKEN);

        let expiry = match (expiry, refresh_token) {
            (Some(expiry), Some(_)) => expiry,
            _ => return false,
        };

        if expiry - self.clock.now_ms() >= TOKEN_REFRESH_WINDOW_MS {
            return true;
        }

        match self.refresh_tokens().await {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to refresh tokens: {}", e);
                self.logout();
                false
            }
        }
    }

    /// Handles the URL the app was opened with.
    ///
    /// A `code` query parameter is exchanged for tokens; otherwise the
    /// stored session is validated.
    pub async fn handle_landing(&self, landing_url: &str) -> Result<LandingOutcome> {
        let url = Url::parse(landing_url)?;
        let code = url
            .query_pairs()
            .find(|(k, _)| k == "code")
            .map(|(_, v)| v.into_owned());

        if let Some(code) = code {
            let user = self.exchange_code(&code).await?;
            return Ok(LandingOutcome::SignedIn {
                user,
                url: strip_query_param(url, "code").to_string(),
            });
        }

        if self.check_and_refresh_tokens().await {
            if let Some(user) = self.stored_claims() {
                return Ok(LandingOutcome::Restored(user));
            }
        }
        Ok(LandingOutcome::Anonymous)
    }

    /// Forgets every session key
    pub fn logout(&self) {
        for key in keys::SESSION {
            self.store.remove(key);
        }
        log::info!("session cleared");
    }

    /// Credentials for an authenticated call, refreshed first if needed
    pub async fn bearer(&self) -> Result<Bearer> {
        self.check_and_refresh_tokens().await;

        let id_token: Option<String> = self.store.get_optional(keys::ID_TOKEN);
        let sub: Option<String> = self.store.get_optional(keys::SUB);
        match (id_token, sub) {
            (Some(id_token), Some(sub)) if !id_token.is_empty() && !sub.is_empty() => {
                Ok(Bearer { id_token, sub })
            }
            _ => Err(Error::NotAuthenticated),
        }
    }
}

fn strip_query_param(mut url: Url, name: &str) -> Url {
    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != name)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    if retained.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(retained);
    }
    url
}
