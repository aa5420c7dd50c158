//! User profile page: `GET /users/{user_id}`

use async_trait::async_trait;
use hyper::StatusCode;
use std::path::Path;
use std::sync::Arc;

use super::Handler;
use crate::http::{self, HttpResponse, RequestContext};
use crate::logger::Logger;
use crate::routing::{PathParams, Router};
use crate::users::{UserDirectory, UserId};
use crate::views::TemplateSet;

const BASE_TEMPLATE: &str = "views/base.html";
const PROFILE_TEMPLATE: &str = "views/users/profile.html";

/// Renders a user's profile page.
///
/// | failure                  | status | body                  |
/// |--------------------------|--------|-----------------------|
/// | `user_id` not a `u64`    | 422    | `wrong user id`       |
/// | directory lookup failed  | 500    | `something was wrong` |
/// | templates failed to load | 500    | empty (error logged)  |
///
/// A missing user is a lookup failure like any other.
pub struct ProfileHandler {
    logger: Logger,
    directory: Arc<dyn UserDirectory>,
    views: TemplateSet,
}

impl ProfileHandler {
    /// `resources` is the directory containing `views/`
    pub fn new(logger: Logger, directory: Arc<dyn UserDirectory>, resources: &Path) -> Self {
        Self {
            logger,
            directory,
            views: TemplateSet::new(resources, BASE_TEMPLATE, PROFILE_TEMPLATE),
        }
    }

    /// Register `/users/{user_id}`
    pub fn mount(self: Arc<Self>, router: &mut Router) {
        router.route("/users", |r| {
            r.get("/{user_id}", self);
        });
    }
}

#[async_trait]
impl Handler for ProfileHandler {
    async fn handle(&self, ctx: &RequestContext, params: &PathParams) -> HttpResponse {
        let Some(user_id) = params
            .get("user_id")
            .and_then(|raw| raw.parse::<UserId>().ok())
        else {
            return http::build_text_response(StatusCode::UNPROCESSABLE_ENTITY, "wrong user id");
        };

        let Ok(profile) = self.directory.get_by_id(ctx, user_id).await else {
            return http::build_text_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "something was wrong",
            );
        };

        let layout = match self.views.load().await {
            Ok(layout) => layout,
            Err(err) => {
                self.logger.error("failed to parse templates", &[("error", &err)]);
                return http::build_empty_response(StatusCode::INTERNAL_SERVER_ERROR);
            }
        };

        // Render errors are not reported: the output produced so far goes out as-is
        let mut body = Vec::new();
        let _ = layout.render_into(&profile, &mut body);
        http::build_html_response(body)
    }
}
