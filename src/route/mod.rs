pub mod post;
pub mod session;
pub mod star;
pub mod user;

use axum::{
	http::HeaderValue,
	middleware,
	routing::{get, post},
	Router,
};
use tower::ServiceBuilder;
use tower_governor::GovernorLayer;
use tower_http::{
	compression::CompressionLayer,
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
};

use crate::{auth, config::Config, ratelimit, AppState};

/// Settings for the HTTP layer that are not part of the shared state.
pub struct Options {
	pub cors_origin: HeaderValue,
	pub rate_limit: bool,
}

impl From<&Config> for Options {
	fn from(config: &Config) -> Self {
		Self {
			cors_origin: config.cors_origin.clone(),
			rate_limit: config.rate_limit,
		}
	}
}

/// Builds the application with all middleware applied.
///
/// Layers run top to bottom: request id, tracing, compression, CORS, then
/// session authentication.
pub fn app(state: AppState, options: &Options) -> Router {
	let layers = ServiceBuilder::new()
		.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
		.layer(PropagateRequestIdLayer::x_request_id())
		.layer(crate::middleware::trace())
		.layer(CompressionLayer::new())
		.layer(crate::middleware::cors(options.cors_origin.clone()))
		.layer(middleware::from_fn_with_state(
			state.clone(),
			auth::authenticate,
		));

	routes(options.rate_limit).layer(layers).with_state(state)
}

pub fn routes(rate_limit: bool) -> Router<AppState> {
	let mut login = post(session::create_session);

	// only logging in is limited, logging out never is
	if rate_limit {
		let config = ratelimit::login();

		ratelimit::cleanup_old_limits(&[&config]);
		login = login.layer(GovernorLayer { config });
	}

	let private = Router::new()
		.route("/whoami", get(user::whoami))
		.route("/posts", post(post::create_post))
		.route(
			"/posts/:id",
			get(post::get_post)
				.put(post::update_post)
				.delete(post::delete_post),
		)
		.route(
			"/posts/:id/star",
			post(star::give_star).delete(star::take_star),
		)
		.route_layer(middleware::from_fn(auth::authorize));

	Router::new()
		.route("/users", post(user::create_user))
		.route("/sessions", login.delete(session::delete_session))
		.route("/posts", get(post::get_posts))
		.route("/posts/:id", get(post::get_post))
		.route("/user/:id", get(user::get_user))
		.route("/user/:id/posts", get(post::get_user_posts))
		.nest("/private", private)
}
