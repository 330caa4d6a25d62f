use std::fmt;

use url::form_urlencoded;

/// Path of the login page on the storefront.
pub const LOGIN_PAGE_PATH: &str = "/login";

/// Landing path used when no safe post-login destination is available.
pub const DEFAULT_NEXT_PATH: &str = "/products";

/// Why the user is being sent to the login page. Carried as a transient
/// `reason` query parameter, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    AuthRequired,
    ActionRequiresAuth,
    SessionExpired,
}

impl RedirectReason {
    pub fn as_str(self) -> &'static str {
        match self {
            RedirectReason::AuthRequired => "auth_required",
            RedirectReason::ActionRequiresAuth => "action_requires_auth",
            RedirectReason::SessionExpired => "session_expired",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "auth_required" => Some(RedirectReason::AuthRequired),
            "action_requires_auth" => Some(RedirectReason::ActionRequiresAuth),
            "session_expired" => Some(RedirectReason::SessionExpired),
            _ => None,
        }
    }
}

impl fmt::Display for RedirectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed banner copy for each redirect reason; unknown or absent values
/// render nothing.
pub fn login_reason_message(reason: &str) -> Option<&'static str> {
    match RedirectReason::parse(reason)? {
        RedirectReason::AuthRequired => Some("Please log in to continue."),
        RedirectReason::ActionRequiresAuth => {
            Some("Please log in to add items to cart or wishlist.")
        }
        RedirectReason::SessionExpired => Some("Your session expired. Please log in again."),
    }
}

/// Resolve the post-login destination from an untrusted `next` value. Only
/// root-relative paths pass through; absolute URLs and protocol-relative
/// `//host` forms would turn `next` into an open redirect.
pub fn safe_next_path(candidate: Option<&str>) -> String {
    match candidate {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path.to_owned(),
        _ => DEFAULT_NEXT_PATH.to_owned(),
    }
}

/// Build the login URL carrying the redirect reason and, when the caller is
/// not already on the login page, the location to return to afterwards.
pub fn login_url(reason: RedirectReason, current_location: Option<&str>) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query.append_pair("reason", reason.as_str());
    if let Some(next) = current_location {
        if !next.is_empty() && next != LOGIN_PAGE_PATH {
            query.append_pair("next", next);
        }
    }
    format!("{LOGIN_PAGE_PATH}?{}", query.finish())
}

/// Navigation seam invoked when the pipeline gives up on a session. The
/// embedding front-end decides what "go to login" means; the default handler
/// does nothing, for contexts with nowhere to navigate to.
pub trait RedirectHandler: Send + Sync {
    fn redirect_to_login(&self, reason: RedirectReason);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRedirectHandler;

impl RedirectHandler for NoopRedirectHandler {
    fn redirect_to_login(&self, _reason: RedirectReason) {}
}
