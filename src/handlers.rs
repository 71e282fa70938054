//! HTTP route handlers exposing answer parsing and rendering.

use crate::answer_parser::parse_answer;
use crate::error::ApiError;
use crate::models::{AnswerPayload, ParsedAnswer};
use crate::render::render_answer_html;
use crate::AppState;

use axum::{
    extract::State,
    response::{Html, Json},
};
use std::sync::Arc;

pub async fn health() -> &'static str {
    "ok"
}

/// Resolve citations; a non-string answer serializes as JSON `null`.
pub async fn parse(Json(payload): Json<AnswerPayload>) -> Json<Option<ParsedAnswer>> {
    let parsed = parse_answer(&payload);
    match &parsed {
        Some(answer) => tracing::info!(
            citations_in = payload.citations.len(),
            citations_out = answer.citations.len(),
            "parsed answer"
        ),
        None => tracing::warn!("answer text is not a string"),
    }
    Json(parsed)
}

pub async fn render(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AnswerPayload>,
) -> Result<Html<String>, ApiError> {
    let parsed = parse_answer(&payload).ok_or(ApiError::UnparseableAnswer)?;
    tracing::info!(citations_out = parsed.citations.len(), "rendered answer");
    Ok(Html(render_answer_html(&parsed, state.config.label_max_len)))
}

#[cfg(test)]
mod tests {
    use crate::{build_router, AppConfig, AppState};
    use axum::{
        body::Body,
        http::{header::CONTENT_TYPE, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> axum::Router {
        build_router(Arc::new(AppState::new(AppConfig::default())))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "ok");
    }

    #[tokio::test]
    async fn test_parse_endpoint() {
        let payload = json!({
            "answer": "See [3] and [1].",
            "citations": [
                {"filepath": "a.md", "title": "A"},
                {"filepath": "b.md", "title": "B"},
                {"filepath": "a.md", "title": "C"}
            ]
        });
        let response = app().oneshot(post_json("/api/answer/parse", payload)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let out: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(out["markdownFormatText"], json!("See  [1]  and  [2] ."));
        assert_eq!(out["citations"][0]["title"], json!("C"));
        assert_eq!(out["citations"][0]["id"], json!("3"));
        assert_eq!(out["citations"][1]["part_index"], json!(2));
        assert_eq!(out["generated_chart"], Value::Null);
    }

    #[tokio::test]
    async fn test_parse_endpoint_accepts_malformed_citation_fields() {
        let payload = json!({
            "answer": "See [1].",
            "citations": [{"filepath": 7, "id": 3, "title": "T"}]
        });
        let response = app().oneshot(post_json("/api/answer/parse", payload)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let out: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(out["markdownFormatText"], json!("See  [1] ."));
        assert_eq!(out["citations"][0]["filepath"], json!(7));
        assert_eq!(out["citations"][0]["id"], json!("1"));
        assert_eq!(out["citations"][0]["title"], json!("T"));
    }

    #[tokio::test]
    async fn test_parse_endpoint_returns_null_for_non_string_answer() {
        let payload = json!({"answer": 42, "citations": []});
        let response = app().oneshot(post_json("/api/answer/parse", payload)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "null");
    }

    #[tokio::test]
    async fn test_render_endpoint() {
        let payload = json!({
            "answer": "Record the grounds [1].",
            "citations": [{"filepath": "police_guidelines.md", "title": "PACE Code A"}]
        });
        let response = app().oneshot(post_json("/api/answer/render", payload)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_string(response).await;
        assert!(html.contains(r##"<a href="#citation-1""##));
        assert!(html.contains("police_guidelines.md - Part 1"));
    }

    #[tokio::test]
    async fn test_render_endpoint_rejects_non_string_answer() {
        let payload = json!({"answer": ["not", "text"]});
        let response = app().oneshot(post_json("/api/answer/render", payload)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let out: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(out["error"], json!("answer text must be a string"));
    }
}
