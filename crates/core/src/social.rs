//! Supported social-auth providers for the login callback.

/// Cookie carrying the one-time social login code.
pub const SOCIAL_CODE_COOKIE: &str = "social_code";

/// Cookie carrying the provider name.
pub const SOCIAL_BACKEND_COOKIE: &str = "social_backend";

/// Client-side route the login callback redirects to.
pub const LOGIN_REDIRECT_PATH: &str = "/#/welcome-profile";

/// Default lifetime of an issued login code, in seconds.
pub const DEFAULT_SOCIAL_CODE_TTL_SECS: i64 = 600;

/// Longest accepted login code lifetime: 30 days.
pub const MAX_SOCIAL_CODE_TTL_SECS: i64 = 30 * 24 * 60 * 60;

/// A social-auth provider the service accepts logins from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialBackend {
    Facebook,
}

impl SocialBackend {
    /// All supported providers.
    pub const ALL: &'static [SocialBackend] = &[SocialBackend::Facebook];

    /// Provider name as used in URLs and cookies.
    pub fn name(&self) -> &'static str {
        match self {
            SocialBackend::Facebook => "facebook",
        }
    }

    /// Resolve a provider by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|b| b.name() == name)
    }
}
