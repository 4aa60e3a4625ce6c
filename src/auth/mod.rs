//! OAuth2 session lifecycle and identity-token decoding

pub mod session;
pub mod token;

pub use session::{Bearer, LandingOutcome, SessionManager, SessionState, UserInfo};
pub use token::{decode_id_token, IdClaims, TokenResponse};
