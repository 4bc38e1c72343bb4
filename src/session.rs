use axum::{
	http::{header, HeaderMap, HeaderName},
	response::AppendHeaders,
};
use cookie::{Cookie, CookieJar, Key, SameSite};

pub const COOKIE_NAME: &str = "booklib";

/// How long a "remember me" session survives.
const REMEMBER_FOR: cookie::time::Duration = cookie::time::Duration::days(30);

/// Issues and verifies signed session cookies carrying a user id.
#[derive(Clone)]
pub struct Sessions {
	key: Key,
	secure: bool,
}

impl Sessions {
	/// `secret` must be at least 32 bytes long.
	pub fn new(secret: &[u8], secure: bool) -> Self {
		Self {
			key: Key::derive_from(secret),
			secure,
		}
	}

	/// Creates a signed session cookie for the user.
	///
	/// Without `remember`, the cookie has no expiry and lasts until the
	/// browser is closed.
	pub fn create_cookie(&self, user_id: i64, remember: bool) -> CookieJar {
		let mut cookie = Cookie::build((COOKIE_NAME, user_id.to_string()))
			.secure(self.secure)
			.http_only(true)
			.same_site(SameSite::Lax)
			.path("/");

		if remember {
			cookie = cookie.max_age(REMEMBER_FOR);
		}

		let mut jar = CookieJar::new();

		jar.signed_mut(&self.key).add(cookie);
		jar
	}

	/// Creates an empty session cookie used to invalidate a previous one
	pub fn clear_cookie(&self) -> CookieJar {
		let mut cookie = Cookie::build((COOKIE_NAME, ""))
			.secure(self.secure)
			.http_only(true)
			.path("/")
			.build();

		cookie.make_removal();

		let mut jar = CookieJar::new();

		jar.add(cookie);
		jar
	}

	/// Returns the user id of a correctly signed session cookie.
	pub fn user_id(&self, headers: &HeaderMap) -> Option<i64> {
		let mut jar = CookieJar::new();

		headers
			.get_all(header::COOKIE)
			.into_iter()
			.filter_map(|value| value.to_str().ok())
			.flat_map(Cookie::split_parse)
			.filter_map(Result::ok)
			.for_each(|cookie| jar.add_original(cookie.into_owned()));

		jar.signed(&self.key).get(COOKIE_NAME)?.value().parse().ok()
	}
}

/// Turns the changes made to a jar into `Set-Cookie` headers.
pub fn set_cookie(jar: &CookieJar) -> AppendHeaders<Vec<(HeaderName, String)>> {
	AppendHeaders(
		jar.delta()
			.map(|cookie| (header::SET_COOKIE, cookie.to_string()))
			.collect(),
	)
}
