use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, ErrorBody, Room, User};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get_request(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

// --- rooms ---

#[tokio::test]
async fn get_room_from_root() {
    let resp = app()
        .oneshot(get_request("/v1/rooms/H151006172656205"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let room: Room = body_json(resp).await;
    assert_eq!(room.id, "H151006172656205");
    assert_eq!(room.city, "my city");
}

#[tokio::test]
async fn get_nested_room() {
    let resp = app()
        .oneshot(get_request("/v1/users/1/rooms/h123123"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let room: Room = body_json(resp).await;
    assert_eq!(room.city, "London");
}

#[tokio::test]
async fn nested_room_of_another_user_is_not_found() {
    let resp = app()
        .oneshot(get_request("/v1/users/2/rooms/h123123"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let error: ErrorBody = body_json(resp).await;
    assert_eq!(error.status, 404);
    assert_eq!(error.message, "room not found");
}

#[tokio::test]
async fn list_rooms_returns_seeded_rooms() {
    let resp = app().oneshot(get_request("/v1/rooms")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let rooms: Vec<Room> = body_json(resp).await;
    assert_eq!(rooms.len(), 2);
}

// --- users ---

#[tokio::test]
async fn force_error_returns_401_body() {
    let resp = app()
        .oneshot(get_request("/v1/users/forceerror"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let error: ErrorBody = body_json(resp).await;
    assert_eq!(
        error,
        ErrorBody {
            status: 401,
            message: "Authenticate".to_string()
        }
    );
}

#[tokio::test]
async fn create_user_returns_201_with_id() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/v1/users",
            r#"{"firstname":"Grace","age":18}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let user: User = body_json(resp).await;
    assert!(!user.id.is_empty());
    assert_eq!(user.firstname, "Grace");
    assert_eq!(user.age, 18);
}

#[tokio::test]
async fn create_user_malformed_json_returns_4xx() {
    let resp = app()
        .oneshot(json_request("POST", "/v1/users", r#"{"age":"old"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let resp = app().oneshot(get_request("/v1/users/42")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- full user lifecycle ---

#[tokio::test]
async fn user_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/v1/users", r#"{"firstname":"Walk"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: User = body_json(resp).await;
    let id = created.id;

    // update
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("/v1/users/{id}"),
            r#"{"firstname":"Run"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: User = body_json(resp).await;
    assert_eq!(updated.id, id);
    assert_eq!(updated.firstname, "Run");

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .method("DELETE")
                .uri(&format!("/v1/users/{id}"))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    // get after delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request(&format!("/v1/users/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
