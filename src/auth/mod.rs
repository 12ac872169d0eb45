pub mod cookies;
pub mod gotrue;
pub mod jwt;
pub mod middleware;
pub mod pkce;
pub mod session;

pub use gotrue::GoTrueClient;
pub use jwt::JwtValidator;
pub use middleware::require_session;
pub use session::{SessionUser, SessionVerifier};
