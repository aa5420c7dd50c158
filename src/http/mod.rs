//! HTTP protocol layer module
//!
//! Request context and response builders shared by the router and handlers.

pub mod context;
pub mod response;

pub use context::RequestContext;
pub use response::{
    build_404_response, build_405_response, build_empty_response, build_html_response,
    build_text_response, strip_body, HttpResponse,
};

/// Collect a response body into a string
#[cfg(test)]
pub async fn body_string(response: HttpResponse) -> String {
    use http_body_util::BodyExt;

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
