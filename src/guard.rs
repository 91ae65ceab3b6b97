//! Navigation guard consulted before every route change. It resolves the
//! current user on each navigation (no caching) and steers users without an
//! active subscription to the subscription page. UX-only: real access control
//! must live on the API.

use crate::session::{SessionStore, UserLookup};
use std::{future::Future, sync::Arc};
use tracing::debug;

pub const SUBSCRIBE_PATH: &str = "/subscribe";
pub const SIGNIN_PATH: &str = "/signin";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Navigation {
    Proceed,
    Redirect(String),
}

/// Anything able to resolve the current user for the guard.
pub trait UserSource: Send + Sync {
    fn current_user(&self) -> impl Future<Output = UserLookup> + Send;
}

impl UserSource for SessionStore {
    fn current_user(&self) -> impl Future<Output = UserLookup> + Send {
        self.get_user()
    }
}

pub struct RouteGuard<S> {
    source: Option<Arc<S>>,
}

impl<S: UserSource> RouteGuard<S> {
    #[must_use]
    pub fn new(source: Option<Arc<S>>) -> Self {
        Self { source }
    }

    /// Decides where a navigation to `to` should go.
    pub async fn before_each(&self, to: &str) -> Navigation {
        let Some(source) = &self.source else {
            return Navigation::Proceed;
        };

        if let UserLookup::Authenticated(user) = source.current_user().await {
            if !user.has_subscription() && route_path(to) != SUBSCRIBE_PATH {
                debug!(to, "no active subscription, redirecting");
                return Navigation::Redirect(SUBSCRIBE_PATH.to_string());
            }
        }

        Navigation::Proceed
    }
}

/// Path component of a route target, without query or fragment.
fn route_path(to: &str) -> &str {
    to.split(['?', '#']).next().unwrap_or(to)
}
