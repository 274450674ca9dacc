use axum_extra::extract::cookie::{Cookie, SameSite};
use time::{Duration, OffsetDateTime};

use crate::config::RuntimeEnv;
use crate::extractors::auth::TOKEN_COOKIE;

fn base(value: String, env: RuntimeEnv) -> Cookie<'static> {
    // Cross-site frontends in production need SameSite=None, which browsers only accept with Secure.
    let same_site = if env.is_production() {
        SameSite::None
    } else {
        SameSite::Strict
    };

    Cookie::build((TOKEN_COOKIE, value))
        .http_only(true)
        .secure(env.is_production())
        .same_site(same_site)
        .path("/")
        .build()
}

/// Cookie delivering a freshly signed session token.
pub fn session(token: String, env: RuntimeEnv, ttl_days: i64) -> Cookie<'static> {
    let mut cookie = base(token, env);
    cookie.set_max_age(Duration::days(ttl_days));
    cookie
}

/// Cookie that makes the browser drop the session token immediately.
pub fn cleared(env: RuntimeEnv) -> Cookie<'static> {
    let mut cookie = base(String::new(), env);
    cookie.set_max_age(Duration::ZERO);
    cookie.set_expires(OffsetDateTime::UNIX_EPOCH);
    cookie
}
