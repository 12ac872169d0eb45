pub mod instagram;
pub mod provider;
pub mod spotify;

pub use instagram::InstagramProvider;
pub use provider::{LinkProvider, OAuthProvider, TokenGrant};
pub use spotify::SpotifyProvider;

use crate::config::Config;

/// How long a started link flow stays valid, in seconds.
pub const STATE_MAX_AGE: i64 = 600;

/// Build the provider client for `kind`, or `None` when it is not configured.
pub fn provider_for(kind: LinkProvider, config: &Config) -> Option<Box<dyn OAuthProvider>> {
    match kind {
        LinkProvider::Spotify => config
            .spotify
            .clone()
            .map(|c| Box::new(SpotifyProvider::new(c)) as Box<dyn OAuthProvider>),
        LinkProvider::Instagram => config
            .instagram
            .clone()
            .map(|c| Box::new(InstagramProvider::new(c)) as Box<dyn OAuthProvider>),
    }
}

/// Opaque anti-forgery value round-tripped through the provider.
pub fn new_state() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
