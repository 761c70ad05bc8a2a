use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use vocab_hero_lib::api::{self, AppState, USER_ID_HEADER};
use vocab_hero_lib::{Config, Database};

fn app() -> Router {
    let db = Database::open_in_memory().unwrap();
    api::router(AppState::new(db, Config::default()))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    user: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header(USER_ID_HEADER, user);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn create_user(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/users",
        None,
        Some(json!({ "email": email })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_str().unwrap().to_string()
}

async fn create_word(app: &Router, user: &str, word: &str, reading: &str, meaning: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/vocabulary",
        Some(user),
        Some(json!({ "word": word, "reading": reading, "meaning": meaning })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_needs_no_user() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn test_unknown_route_uses_envelope() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/nothing-here", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_wrong_method_uses_envelope() {
    let app = app();
    let user = create_user(&app, "method@example.com").await;
    let (status, body) = send(&app, Method::GET, "/api/notifications/read-all", Some(&user), None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "METHOD_NOT_ALLOWED");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("/api/notifications/read-all"));
}

#[tokio::test]
async fn test_authentication_header() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/vocabulary", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let (status, _) = send(&app, Method::GET, "/api/vocabulary", Some("not-a-uuid"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let stranger = uuid::Uuid::new_v4().to_string();
    let (status, _) = send(&app, Method::GET, "/api/vocabulary", Some(&stranger), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let user = create_user(&app, "Learner@Example.com").await;
    let (status, body) = send(&app, Method::GET, "/api/users/me", Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "learner@example.com");
}

#[tokio::test]
async fn test_duplicate_user_is_conflict() {
    let app = app();
    create_user(&app, "dup@example.com").await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/users",
        None,
        Some(json!({ "email": "DUP@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_malformed_input_is_bad_request() {
    let app = app();
    let user = create_user(&app, "bad@example.com").await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/vocabulary")
        .header(USER_ID_HEADER, &user)
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    let (status, body) = send(&app, Method::GET, "/api/vocabulary/123", Some(&user), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_vocabulary_validation_details() {
    let app = app();
    let user = create_user(&app, "val@example.com").await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/vocabulary",
        Some(&user),
        Some(json!({ "word": "", "reading": "よみ", "meaning": "", "jlptLevel": 9 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    let fields: Vec<&str> = body["error"]["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"word"));
    assert!(fields.contains(&"meaning"));
    assert!(fields.contains(&"jlptLevel"));
}

#[tokio::test]
async fn test_vocabulary_lifecycle_and_review() {
    let app = app();
    let user = create_user(&app, "life@example.com").await;
    let id = create_word(&app, &user, "猫", "ねこ", "cat").await;

    let (status, body) = send(&app, Method::GET, &format!("/api/vocabulary/{}", id), Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["word"], "猫");
    assert_eq!(body["data"]["schedule"]["repetitions"], 0);

    let (_, body) = send(&app, Method::GET, "/api/vocabulary/due", Some(&user), None).await;
    assert_eq!(body["data"]["totalDue"], 1);

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/vocabulary/{}/review", id),
        Some(&user),
        Some(json!({ "quality": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["correct"], true);
    assert_eq!(body["data"]["schedule"]["interval"], 1);

    let (_, body) = send(&app, Method::GET, "/api/vocabulary/due", Some(&user), None).await;
    assert_eq!(body["data"]["totalDue"], 0);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/vocabulary/{}/review", id),
        Some(&user),
        Some(json!({ "quality": 6 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/vocabulary/{}", id), Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::GET, &format!("/api/vocabulary/{}", id), Some(&user), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_other_users_rows_are_not_found() {
    let app = app();
    let owner = create_user(&app, "owner@example.com").await;
    let other = create_user(&app, "other@example.com").await;
    let id = create_word(&app, &owner, "犬", "いぬ", "dog").await;

    let (status, _) = send(&app, Method::GET, &format!("/api/vocabulary/{}", id), Some(&other), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/vocabulary/{}", id),
        Some(&other),
        Some(json!({ "meaning": "cat" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_sentences_crud() {
    let app = app();
    let user = create_user(&app, "sent@example.com").await;
    let id = create_word(&app, &user, "水", "みず", "water").await;
    let base = format!("/api/vocabulary/{}/sentences", id);

    let (status, body) = send(
        &app,
        Method::POST,
        &base,
        Some(&user),
        Some(json!({ "sentence": "水を飲む。", "translation": "I drink water." })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let sentence_id = body["data"]["id"].as_str().unwrap().to_string();

    let (_, body) = send(&app, Method::GET, &base, Some(&user), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("{}/{}", base, sentence_id),
        Some(&user),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, Method::GET, &base, Some(&user), None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_group_membership_order() {
    let app = app();
    let user = create_user(&app, "groups@example.com").await;
    let a = create_word(&app, &user, "一", "いち", "one").await;
    let b = create_word(&app, &user, "二", "に", "two").await;
    let c = create_word(&app, &user, "三", "さん", "three").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/groups",
        Some(&user),
        Some(json!({ "name": "Numbers" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let group = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/groups/{}/vocabulary", group),
        Some(&user),
        Some(json!({ "vocabularyIds": [c, a, b] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["vocabularyIds"], json!([c, a, b]));
    assert_eq!(body["data"]["itemCount"], 3);

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/groups/{}/vocabulary/{}", group, a),
        Some(&user),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["vocabularyIds"], json!([c, b]));

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/groups",
        Some(&user),
        Some(json!({ "name": "Numbers" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_replacing_members_with_unknown_id_is_rejected() {
    let app = app();
    let user = create_user(&app, "members@example.com").await;
    let word = create_word(&app, &user, "水", "みず", "water").await;
    let (_, body) = send(
        &app,
        Method::POST,
        "/api/groups",
        Some(&user),
        Some(json!({ "name": "Drinks" })),
    )
    .await;
    let group = body["data"]["id"].as_str().unwrap().to_string();

    let unknown = uuid::Uuid::new_v4().to_string();
    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/groups/{}/vocabulary", group),
        Some(&user),
        Some(json!({ "vocabularyIds": [word, unknown] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["details"][0]["field"], "vocabularyIds");

    let (_, body) = send(&app, Method::GET, &format!("/api/groups/{}", group), Some(&user), None).await;
    assert_eq!(body["data"]["itemCount"], 0);
}

#[tokio::test]
async fn test_vocabulary_list_pages_with_cursor() {
    let app = app();
    let user = create_user(&app, "pages@example.com").await;
    let mut created = Vec::new();
    for (word, reading, meaning) in [("一", "いち", "one"), ("二", "に", "two"), ("三", "さん", "three")] {
        created.push(create_word(&app, &user, word, reading, meaning).await);
    }

    let (status, first) = send(&app, Method::GET, "/api/vocabulary?limit=2", Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["data"]["items"].as_array().unwrap().len(), 2);
    assert_eq!(first["data"]["hasMore"], true);
    let cursor = first["data"]["nextCursor"].as_str().unwrap().to_string();

    let (status, second) = send(
        &app,
        Method::GET,
        &format!("/api/vocabulary?limit=2&cursor={}", cursor),
        Some(&user),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["data"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(second["data"]["hasMore"], false);
    assert!(second["data"]["nextCursor"].is_null());

    let mut seen: Vec<String> = first["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .chain(second["data"]["items"].as_array().unwrap())
        .map(|item| item["id"].as_str().unwrap().to_string())
        .collect();
    seen.sort();
    created.sort();
    assert_eq!(seen, created);

    let (status, body) = send(&app, Method::GET, "/api/vocabulary?cursor=%21%21", Some(&user), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["details"][0]["field"], "cursor");
}

#[tokio::test]
async fn test_listening_quiz_prompts_reading() {
    let app = app();
    let user = create_user(&app, "listen@example.com").await;
    create_word(&app, &user, "山", "やま", "mountain").await;
    create_word(&app, &user, "川", "かわ", "river").await;
    create_word(&app, &user, "海", "うみ", "sea").await;

    let (status, body) = send(&app, Method::GET, "/api/quiz/listening?count=3", Some(&user), None).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let questions = body["data"].as_array().unwrap();
    assert_eq!(questions.len(), 3);
    for question in questions {
        let prompt = question["prompt"].as_str().unwrap();
        assert!(["やま", "かわ", "うみ"].contains(&prompt));
        let options = question["options"].as_array().unwrap();
        let correct = question["correctIndex"].as_u64().unwrap() as usize;
        assert!(correct < options.len());
    }
}

#[tokio::test]
async fn test_quiz_needs_two_items() {
    let app = app();
    let user = create_user(&app, "quiz@example.com").await;
    create_word(&app, &user, "月", "つき", "moon").await;

    let (status, body) = send(&app, Method::GET, "/api/quiz/multiple-choice", Some(&user), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    create_word(&app, &user, "日", "ひ", "sun").await;
    create_word(&app, &user, "火", "ひ", "fire").await;
    let (status, body) = send(
        &app,
        Method::GET,
        "/api/quiz/multiple-choice?count=2&optionCount=3",
        Some(&user),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let questions = body["data"].as_array().unwrap();
    assert_eq!(questions.len(), 2);
    for question in questions {
        let options = question["options"].as_array().unwrap();
        assert_eq!(options.len(), 3);
        let correct = question["correctIndex"].as_u64().unwrap() as usize;
        assert!(correct < options.len());
    }

    let (status, body) = send(&app, Method::GET, "/api/quiz/matching?pairs=3", Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["left"].as_array().unwrap().len(), 3);
    assert_eq!(body["data"]["right"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_check_answer_normalizes_kana() {
    let app = app();
    let user = create_user(&app, "check@example.com").await;
    let id = create_word(&app, &user, "猫", "ねこ", "cat").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/quiz/check",
        Some(&user),
        Some(json!({ "vocabularyId": id, "mode": "reading", "answer": "ネコ" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["correct"], true);
    assert_eq!(body["data"]["expected"], "ねこ");
}

#[tokio::test]
async fn test_session_flow_feeds_stats_and_goals() {
    let app = app();
    let user = create_user(&app, "session@example.com").await;
    let id = create_word(&app, &user, "花", "はな", "flower").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/sessions",
        Some(&user),
        Some(json!({ "mode": "multipleChoice", "totalQuestions": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["status"], "inProgress");
    let session = body["data"]["id"].as_str().unwrap().to_string();

    for correct in [true, false] {
        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/api/sessions/{}/answers", session),
            Some(&user),
            Some(json!({ "vocabularyId": id, "correct": correct })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/sessions/{}/complete", session),
        Some(&user),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "complete");
    assert_eq!(body["data"]["correctAnswers"], 1);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/sessions/{}/complete", session),
        Some(&user),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = send(&app, Method::GET, "/api/progress/stats", Some(&user), None).await;
    assert_eq!(body["data"]["reviewsToday"], 2);
    assert_eq!(body["data"]["correctToday"], 1);
    assert_eq!(body["data"]["currentStreak"], 1);
    assert_eq!(body["data"]["sessionsCompleted"], 1);

    let (_, body) = send(&app, Method::GET, "/api/progress/history?days=3", Some(&user), None).await;
    let days = body["data"].as_array().unwrap();
    assert_eq!(days.len(), 3);
    assert_eq!(days[2]["reviews"], 2);

    let (status, _) = send(&app, Method::GET, "/api/progress/history?days=0", Some(&user), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, Method::GET, "/api/goals", Some(&user), None).await;
    assert_eq!(body["data"]["goal"]["targetReviews"], 20);
    assert_eq!(body["data"]["today"]["reviewsDone"], 2);
    assert_eq!(body["data"]["today"]["newWordsAdded"], 1);
}

#[tokio::test]
async fn test_goal_update_validates_range() {
    let app = app();
    let user = create_user(&app, "goal@example.com").await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/goals",
        Some(&user),
        Some(json!({ "targetReviews": 30 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["goal"]["targetReviews"], 30);
    assert_eq!(body["data"]["goal"]["targetNewWords"], 5);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/goals",
        Some(&user),
        Some(json!({ "targetNewWords": 101 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_notifications_due_reminder() {
    let app = app();
    let user = create_user(&app, "notify@example.com").await;

    let (status, body) = send(&app, Method::POST, "/api/notifications/due-reminder", Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].is_null());

    create_word(&app, &user, "空", "そら", "sky").await;
    let (_, body) = send(&app, Method::POST, "/api/notifications/due-reminder", Some(&user), None).await;
    assert_eq!(body["data"]["kind"], "dueReminder");
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (_, body) = send(&app, Method::GET, "/api/notifications?unreadOnly=true", Some(&user), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/notifications/{}/read", id),
        Some(&user),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["read"], true);

    let (_, body) = send(&app, Method::PUT, "/api/notifications/read-all", Some(&user), None).await;
    assert_eq!(body["data"]["updated"], 0);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/notifications/preferences",
        Some(&user),
        Some(json!({ "reminderTime": "7:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/notifications/preferences",
        Some(&user),
        Some(json!({ "enabled": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["enabled"], false);

    let (_, body) = send(&app, Method::POST, "/api/notifications/due-reminder", Some(&user), None).await;
    assert!(body["data"].is_null());
}
