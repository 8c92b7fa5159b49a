use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, Method, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use hearth::db::{Insert, Record};
use hearth::services::{
    BlogPost, ContactMessage, NewBlogPost, NewContactMessage, NewProgram, NewStaff, NewStory,
    NewSubscription, NewsletterSubscription, Program, Staff, Story,
};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{require_admin, AdminAuth};
use crate::error::ApiError;
use crate::state::AppState;

type Body = Result<Json<Value>, JsonRejection>;

async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

async fn subscribe(State(state): State<AppState>, body: Body) -> Result<Json<Value>, ApiError> {
    let Json(body) = body?;
    let subscription = state.site.create::<NewSubscription>(&body)?;
    Ok(Json(json!({"success": true, "subscription": subscription})))
}

async fn contact(State(state): State<AppState>, body: Body) -> Result<Json<Value>, ApiError> {
    let Json(body) = body?;
    let message = state.site.create::<NewContactMessage>(&body)?;
    Ok(Json(json!({"success": true, "message": message})))
}

async fn list<R: Record>(State(state): State<AppState>) -> Result<Json<Vec<R>>, ApiError> {
    Ok(Json(state.site.list::<R>()?))
}

async fn get_one<R: Record>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<R>, ApiError> {
    Ok(Json(state.site.get::<R>(&id)?))
}

async fn create<I: Insert>(
    State(state): State<AppState>,
    body: Body,
) -> Result<(StatusCode, Json<I::Record>), ApiError> {
    let Json(body) = body?;
    let record = state.site.create::<I>(&body)?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn update<I: Insert>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Body,
) -> Result<Json<I::Record>, ApiError> {
    let Json(body) = body?;
    Ok(Json(state.site.update::<I>(&id, &body)?))
}

async fn delete<R: Record>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.site.delete::<R>(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Public read routes for one content kind
fn content_routes<R: Record>(name: &str) -> Router<AppState> {
    Router::new()
        .route(&format!("/api/{name}"), get(list::<R>))
        .route(&format!("/api/{name}/{{id}}"), get(get_one::<R>))
}

/// Admin write routes for one content kind
fn content_admin_routes<I: Insert>(name: &str) -> Router<AppState> {
    Router::new()
        .route(&format!("/api/admin/{name}"), post(create::<I>))
        .route(
            &format!("/api/admin/{name}/{{id}}"),
            axum::routing::put(update::<I>).delete(delete::<I::Record>),
        )
}

pub fn build_router(state: AppState) -> Router {
    let admin_auth = AdminAuth::new(state.config.server.parsed_admin_keys());

    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let public_routes = Router::new()
        .route("/api/newsletter", post(subscribe))
        .route("/api/contact", post(contact))
        .merge(content_routes::<BlogPost>("blog"))
        .merge(content_routes::<Program>("programs"))
        .merge(content_routes::<Story>("stories"))
        .merge(content_routes::<Staff>("staff"));

    let admin_routes = Router::new()
        .route("/api/contact-messages", get(list::<ContactMessage>))
        .route(
            "/api/contact-messages/{id}",
            get(get_one::<ContactMessage>).delete(delete::<ContactMessage>),
        )
        .route(
            "/api/admin/subscriptions",
            get(list::<NewsletterSubscription>),
        )
        .route(
            "/api/admin/subscriptions/{id}",
            axum::routing::delete(delete::<NewsletterSubscription>),
        )
        .merge(content_admin_routes::<NewBlogPost>("blog"))
        .merge(content_admin_routes::<NewProgram>("programs"))
        .merge(content_admin_routes::<NewStory>("stories"))
        .merge(content_admin_routes::<NewStaff>("staff"))
        .route_layer(middleware::from_fn(require_admin))
        .layer(Extension(admin_auth));

    Router::new()
        .route("/health", get(health))
        .merge(public_routes)
        .merge(admin_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body as HttpBody};
    use axum::http::Request;
    use hearth::services::SiteConfig;
    use hearth::testing::{
        blog_post_input, contact_input, program_input, subscription_input, test_store,
    };
    use tower::ServiceExt;

    const ADMIN_KEY: &str = "test-admin-key";

    fn router_with_keys(admin_keys: &str) -> Router {
        let mut config = SiteConfig::default();
        config.server.admin_keys = admin_keys.to_string();
        build_router(AppState::with_store(config, test_store()))
    }

    fn router() -> Router {
        router_with_keys(ADMIN_KEY)
    }

    fn request(method: Method, uri: &str, body: Option<Value>, key: Option<&str>) -> Request<HttpBody> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(key) = key {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {key}"));
        }
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(HttpBody::from(body.to_string()))
                .unwrap(),
            None => builder.body(HttpBody::empty()).unwrap(),
        }
    }

    async fn send(router: &Router, request: Request<HttpBody>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    mod public {
        use super::*;

        #[tokio::test]
        async fn health_is_ok() {
            let (status, body) = send(&router(), request(Method::GET, "/health", None, None)).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, json!({"status": "ok"}));
        }

        #[tokio::test]
        async fn subscribe_then_duplicate() {
            let app = router();
            let input = subscription_input("a@x.com");

            let (status, body) = send(
                &app,
                request(Method::POST, "/api/newsletter", Some(input.clone()), None),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["success"], true);
            assert_eq!(body["subscription"]["email"], "a@x.com");
            assert!(body["subscription"]["subscribedAt"].is_string());

            let (status, body) =
                send(&app, request(Method::POST, "/api/newsletter", Some(input), None)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["message"], "Email already subscribed");
        }

        #[tokio::test]
        async fn subscribe_rejects_invalid_email() {
            let (status, body) = send(
                &router(),
                request(
                    Method::POST,
                    "/api/newsletter",
                    Some(subscription_input("not-an-email")),
                    None,
                ),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["message"], "email must be a valid email address");
        }

        #[tokio::test]
        async fn contact_reports_short_fields() {
            let (status, body) = send(
                &router(),
                request(
                    Method::POST,
                    "/api/contact",
                    Some(contact_input("Jo", "jo@x.com", "Hi", "short")),
                    None,
                ),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            let message = body["message"].as_str().unwrap();
            assert!(message.contains("subject"));
            assert!(message.contains("message"));
            assert!(!message.contains("name"));
            assert!(!message.contains("email"));
        }

        #[tokio::test]
        async fn contact_returns_stored_message() {
            let (status, body) = send(
                &router(),
                request(
                    Method::POST,
                    "/api/contact",
                    Some(contact_input(
                        "Jo",
                        "jo@x.com",
                        "Volunteering",
                        "I can help on weekends.",
                    )),
                    None,
                ),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["success"], true);
            assert_eq!(body["message"]["subject"], "Volunteering");
            assert!(body["message"]["id"].is_string());
            assert!(body["message"]["createdAt"].is_string());
        }

        #[tokio::test]
        async fn malformed_json_is_bad_request() {
            let request = Request::builder()
                .method(Method::POST)
                .uri("/api/newsletter")
                .header(header::CONTENT_TYPE, "application/json")
                .body(HttpBody::from("{\"email\": "))
                .unwrap();
            let (status, body) = send(&router(), request).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(body["message"].is_string());
        }

        #[tokio::test]
        async fn non_object_body_is_bad_request() {
            let (status, body) = send(
                &router(),
                request(Method::POST, "/api/contact", Some(json!([1, 2])), None),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["message"], "body must be a JSON object");
        }

        #[tokio::test]
        async fn unknown_id_is_not_found() {
            let (status, body) =
                send(&router(), request(Method::GET, "/api/blog/nope", None, None)).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body["message"], "Blog post 'nope' not found");
        }

        #[tokio::test]
        async fn seeded_content_is_listed() {
            let app = build_router(AppState::new(SiteConfig::default()).unwrap());

            let (status, body) = send(&app, request(Method::GET, "/api/programs", None, None)).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body.as_array().unwrap().len(), 4);

            let (_, posts) = send(&app, request(Method::GET, "/api/blog", None, None)).await;
            let dates: Vec<&str> = posts
                .as_array()
                .unwrap()
                .iter()
                .map(|p| p["publishedAt"].as_str().unwrap())
                .collect();
            let mut sorted = dates.clone();
            sorted.sort_unstable_by(|a, b| b.cmp(a));
            assert_eq!(dates, sorted);

            let id = posts[0]["id"].as_str().unwrap();
            let (status, post) = send(
                &app,
                request(Method::GET, &format!("/api/blog/{id}"), None, None),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(post, posts[0]);
        }

        #[tokio::test]
        async fn public_routes_ignore_admin_keys() {
            let (status, _) =
                send(&router(), request(Method::GET, "/api/staff", None, None)).await;
            assert_eq!(status, StatusCode::OK);
        }
    }

    mod admin {
        use super::*;

        #[tokio::test]
        async fn missing_key_is_unauthorized() {
            let (status, body) = send(
                &router(),
                request(Method::GET, "/api/contact-messages", None, None),
            )
            .await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body["message"], "Missing Authorization header");
        }

        #[tokio::test]
        async fn wrong_key_is_unauthorized() {
            let (status, body) = send(
                &router(),
                request(
                    Method::POST,
                    "/api/admin/programs",
                    Some(program_input("Schools")),
                    Some("wrong"),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body["message"], "Invalid API key");
        }

        #[tokio::test]
        async fn no_configured_keys_passes_through() {
            let (status, body) = send(
                &router_with_keys(""),
                request(Method::GET, "/api/admin/subscriptions", None, None),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, json!([]));
        }

        #[tokio::test]
        async fn contact_messages_newest_first() {
            let app = router();
            for subject in ["First", "Second"] {
                send(
                    &app,
                    request(
                        Method::POST,
                        "/api/contact",
                        Some(contact_input("Jo", "jo@x.com", subject, "Please call me back.")),
                        None,
                    ),
                )
                .await;
            }

            let (status, body) = send(
                &app,
                request(Method::GET, "/api/contact-messages", None, Some(ADMIN_KEY)),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body[0]["subject"], "Second");
            assert_eq!(body[1]["subject"], "First");

            let id = body[0]["id"].as_str().unwrap().to_string();
            let uri = format!("/api/contact-messages/{id}");
            let (status, _) = send(&app, request(Method::DELETE, &uri, None, Some(ADMIN_KEY))).await;
            assert_eq!(status, StatusCode::NO_CONTENT);
            let (status, _) = send(&app, request(Method::GET, &uri, None, Some(ADMIN_KEY))).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
        }

        #[tokio::test]
        async fn program_lifecycle() {
            let app = router();

            let (status, created) = send(
                &app,
                request(
                    Method::POST,
                    "/api/admin/programs",
                    Some(program_input("Schools")),
                    Some(ADMIN_KEY),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
            let id = created["id"].as_str().unwrap().to_string();

            let (status, fetched) = send(
                &app,
                request(Method::GET, &format!("/api/programs/{id}"), None, None),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(fetched, created);

            let (status, updated) = send(
                &app,
                request(
                    Method::PUT,
                    &format!("/api/admin/programs/{id}"),
                    Some(json!({"category": "Youth"})),
                    Some(ADMIN_KEY),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(updated["category"], "Youth");
            assert_eq!(updated["title"], "Schools");
            assert_eq!(updated["id"], created["id"]);

            let (status, _) = send(
                &app,
                request(
                    Method::DELETE,
                    &format!("/api/admin/programs/{id}"),
                    None,
                    Some(ADMIN_KEY),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::NO_CONTENT);

            let (status, _) = send(
                &app,
                request(Method::GET, &format!("/api/programs/{id}"), None, None),
            )
            .await;
            assert_eq!(status, StatusCode::NOT_FOUND);
        }

        #[tokio::test]
        async fn invalid_update_is_bad_request() {
            let app = router();
            let (_, created) = send(
                &app,
                request(
                    Method::POST,
                    "/api/admin/blog",
                    Some(blog_post_input("Launch", None)),
                    Some(ADMIN_KEY),
                ),
            )
            .await;
            let id = created["id"].as_str().unwrap();

            let (status, body) = send(
                &app,
                request(
                    Method::PUT,
                    &format!("/api/admin/blog/{id}"),
                    Some(json!({"readTime": 0})),
                    Some(ADMIN_KEY),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["message"], "readTime must be a positive integer");
        }

        #[tokio::test]
        async fn create_reports_validation_errors() {
            let (status, body) = send(
                &router(),
                request(
                    Method::POST,
                    "/api/admin/stories",
                    Some(json!({"name": "Priya"})),
                    Some(ADMIN_KEY),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(
                body["message"],
                "role is required; quote is required; image is required"
            );
        }

        #[tokio::test]
        async fn delete_subscription() {
            let app = router();
            let (_, body) = send(
                &app,
                request(
                    Method::POST,
                    "/api/newsletter",
                    Some(subscription_input("a@x.com")),
                    None,
                ),
            )
            .await;
            let id = body["subscription"]["id"].as_str().unwrap();

            let (status, _) = send(
                &app,
                request(
                    Method::DELETE,
                    &format!("/api/admin/subscriptions/{id}"),
                    None,
                    Some(ADMIN_KEY),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::NO_CONTENT);

            let (_, list) = send(
                &app,
                request(Method::GET, "/api/admin/subscriptions", None, Some(ADMIN_KEY)),
            )
            .await;
            assert_eq!(list, json!([]));
        }
    }
}
