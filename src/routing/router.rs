//! Request routing dispatch module
//!
//! Routes are tried in registration order; the first pattern that matches the
//! path and method wins.

use hyper::Method;
use std::sync::Arc;

use super::matcher::RoutePattern;
use crate::handler::Handler;
use crate::http::{self, HttpResponse, RequestContext};

struct Route {
    method: Method,
    pattern: RoutePattern,
    handler: Arc<dyn Handler>,
}

/// Method + pattern table mapping requests to handlers
#[derive(Default)]
pub struct Router {
    prefix: String,
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register routes under a common path prefix
    pub fn route(&mut self, prefix: &str, build: impl FnOnce(&mut Self)) -> &mut Self {
        let mut scoped = Self {
            prefix: join(&self.prefix, prefix),
            routes: Vec::new(),
        };
        build(&mut scoped);
        self.routes.append(&mut scoped.routes);
        self
    }

    /// Register a GET route; HEAD requests are served by it as well
    pub fn get(&mut self, pattern: &str, handler: Arc<dyn Handler>) -> &mut Self {
        self.add(Method::GET, pattern, handler)
    }

    pub fn add(&mut self, method: Method, pattern: &str, handler: Arc<dyn Handler>) -> &mut Self {
        self.routes.push(Route {
            method,
            pattern: RoutePattern::parse(&join(&self.prefix, pattern)),
            handler,
        });
        self
    }

    /// Patterns in dispatch order, as `METHOD pattern`
    pub fn describe(&self) -> Vec<String> {
        self.routes
            .iter()
            .map(|r| format!("{} {}", r.method, r.pattern.as_str()))
            .collect()
    }

    /// Find the handler for a request and run it
    pub async fn dispatch(&self, ctx: &RequestContext) -> HttpResponse {
        let is_head = ctx.method == Method::HEAD;
        let method = if is_head { &Method::GET } else { &ctx.method };
        let mut allowed: Vec<&str> = Vec::new();

        for route in &self.routes {
            let Some(params) = route.pattern.matches(&ctx.path) else {
                continue;
            };
            if route.method != *method {
                allowed.push(route.method.as_str());
                continue;
            }

            let response = route.handler.handle(ctx, &params).await;
            return if is_head {
                http::strip_body(response)
            } else {
                response
            };
        }

        if allowed.is_empty() {
            return http::build_404_response();
        }
        if allowed.contains(&"GET") {
            allowed.push("HEAD");
        }
        allowed.sort_unstable();
        allowed.dedup();
        http::build_405_response(&allowed.join(", "))
    }
}

fn join(prefix: &str, pattern: &str) -> String {
    format!("{}{pattern}", prefix.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::PathParams;
    use async_trait::async_trait;
    use hyper::header::ALLOW;
    use hyper::StatusCode;

    struct Echo;

    #[async_trait]
    impl Handler for Echo {
        async fn handle(&self, ctx: &RequestContext, params: &PathParams) -> HttpResponse {
            let body = format!("{} {}", ctx.path, params.get("user_id").unwrap_or("-"));
            http::build_html_response(body.into_bytes())
        }
    }

    fn users_router() -> Router {
        let mut router = Router::new();
        router.route("/users", |r| {
            r.get("/{user_id}", Arc::new(Echo));
        });
        router
    }

    #[test]
    fn test_prefix_is_joined() {
        let router = users_router();
        assert_eq!(router.describe(), vec!["GET /users/{user_id}".to_string()]);

        let mut nested = Router::new();
        nested.route("/api/", |r| {
            r.route("/v1", |r| {
                r.get("/ping", Arc::new(Echo));
            });
        });
        assert_eq!(nested.describe(), vec!["GET /api/v1/ping".to_string()]);
    }

    #[tokio::test]
    async fn test_dispatch_passes_params() {
        let router = users_router();
        let response = router
            .dispatch(&RequestContext::new(Method::GET, "/users/42"))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(http::body_string(response).await, "/users/42 42");
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let router = users_router();
        for path in ["/", "/users", "/users/", "/users/42/friends", "/groups/1"] {
            let response = router.dispatch(&RequestContext::new(Method::GET, path)).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "path {path}");
        }
    }

    #[tokio::test]
    async fn test_wrong_method_is_405() {
        let router = users_router();
        let response = router
            .dispatch(&RequestContext::new(Method::POST, "/users/42"))
            .await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[ALLOW], "GET, HEAD");
    }

    #[tokio::test]
    async fn test_405_lists_each_method_once() {
        let mut router = users_router();
        router.route("/users", |r| {
            r.add(Method::PUT, "/{user_id}", Arc::new(Echo));
            r.get("/me", Arc::new(Echo));
        });

        let response = router
            .dispatch(&RequestContext::new(Method::DELETE, "/users/me"))
            .await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[ALLOW], "GET, HEAD, PUT");
    }

    #[tokio::test]
    async fn test_head_uses_get_route_without_body() {
        let router = users_router();
        let response = router
            .dispatch(&RequestContext::new(Method::HEAD, "/users/42"))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(http::body_string(response).await, "");
    }
}
