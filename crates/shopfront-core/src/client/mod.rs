mod error;
mod pipeline;
mod redirect;

pub use error::{ApiError, ApiResult};
pub use pipeline::ApiClient;
pub use redirect::{
    login_reason_message, login_url, safe_next_path, NoopRedirectHandler, RedirectHandler,
    RedirectReason, DEFAULT_NEXT_PATH, LOGIN_PAGE_PATH,
};
