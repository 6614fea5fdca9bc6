use std::env;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    routing::{get, post},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;
use uuid::Uuid;

fn full_router(app_state: academy_backend::AppState) -> Router {
    Router::new()
        .route("/health", get(academy_backend::routes::health::health))
        .route(
            "/api/auth/register",
            post(academy_backend::routes::auth::register)
                .fallback(academy_backend::routes::fallback::method_not_allowed),
        )
        .route(
            "/api/auth/login",
            post(academy_backend::routes::auth::login)
                .fallback(academy_backend::routes::fallback::method_not_allowed),
        )
        .route(
            "/api/tests",
            get(academy_backend::routes::tests::list_tests)
                .fallback(academy_backend::routes::fallback::method_not_allowed),
        )
        .route(
            "/api/tests/submit",
            post(academy_backend::routes::tests::submit_test)
                .fallback(academy_backend::routes::fallback::method_not_allowed),
        )
        .route(
            "/api/tests/:id",
            get(academy_backend::routes::tests::get_test)
                .fallback(academy_backend::routes::fallback::method_not_allowed),
        )
        .route(
            "/api/knowledge",
            get(academy_backend::routes::knowledge::list_knowledge)
                .fallback(academy_backend::routes::fallback::method_not_allowed),
        )
        .route(
            "/api/knowledge/topics/:id",
            get(academy_backend::routes::knowledge::get_topic)
                .fallback(academy_backend::routes::fallback::method_not_allowed),
        )
        .route(
            "/api/profile/progress",
            get(academy_backend::routes::profile::get_progress)
                .fallback(academy_backend::routes::fallback::method_not_allowed),
        )
        .route(
            "/api/dashboard/stats",
            get(academy_backend::routes::profile::dashboard_stats)
                .fallback(academy_backend::routes::fallback::method_not_allowed),
        )
        .route(
            "/api/metrics",
            get(academy_backend::routes::metrics::list_metrics)
                .fallback(academy_backend::routes::fallback::method_not_allowed),
        )
        .route(
            "/api/metrics/recommendations",
            get(academy_backend::routes::metrics::recommendations)
                .fallback(academy_backend::routes::fallback::method_not_allowed),
        )
        .route(
            "/api/metrics/comparison",
            get(academy_backend::routes::metrics::comparison)
                .fallback(academy_backend::routes::fallback::method_not_allowed),
        )
        .route(
            "/api/export",
            post(academy_backend::routes::export::export_metrics)
                .fallback(academy_backend::routes::fallback::method_not_allowed),
        )
        .route(
            "/api/notifications",
            get(academy_backend::routes::notifications::list_notifications)
                .post(academy_backend::routes::notifications::create_notification)
                .put(academy_backend::routes::notifications::mark_notification_read)
                .fallback(academy_backend::routes::fallback::method_not_allowed),
        )
        .route(
            "/api/achievements",
            get(academy_backend::routes::achievements::list_achievements)
                .post(academy_backend::routes::achievements::unlock_achievement)
                .fallback(academy_backend::routes::fallback::method_not_allowed),
        )
        .layer(axum::middleware::from_fn_with_state(
            academy_backend::middleware::rate_limit::new_rps_state(100),
            academy_backend::middleware::rate_limit::rps_middleware,
        ))
        .fallback(academy_backend::routes::fallback::not_found)
        .with_state(app_state)
}

fn get_req(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

fn json_req(method: &str, uri: &str, token: Option<&str>, body: &JsonValue) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_json(resp: axum::response::Response) -> JsonValue {
    let bytes = to_bytes(resp.into_body(), 4 * 1024 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
#[ignore = "needs a running Postgres and DATABASE_URL"]
async fn submit_flow_end_to_end() {
    dotenvy::dotenv().ok();
    env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
    env::set_var("JWT_SECRET", "test_secret_key");
    env::set_var("API_RPS", "100");

    academy_backend::config::init_config().expect("init config");

    let pool = academy_backend::database::pool::create_pool()
        .await
        .expect("pool");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");

    let run = Uuid::new_v4().simple().to_string();

    let category_id = Uuid::new_v4();
    sqlx::query(
        r#"INSERT INTO knowledge_categories (id, name, description, position) VALUES ($1, $2, $3, $4)"#,
    )
    .bind(category_id)
    .bind(format!("Product Marketing {}", run))
    .bind("Core metric literacy")
    .bind(1)
    .execute(&pool)
    .await
    .expect("seed category");

    let topic_id = Uuid::new_v4();
    sqlx::query(
        r#"INSERT INTO topics (id, category_id, name, description, content, position)
            VALUES ($1, $2, $3, $4, $5, $6)"#,
    )
    .bind(topic_id)
    .bind(category_id)
    .bind(format!("Key Metrics {}", run))
    .bind("What the core metrics mean")
    .bind("DAU counts distinct users active on a given day.")
    .bind(1)
    .execute(&pool)
    .await
    .expect("seed topic");

    let test1_id = Uuid::new_v4();
    let test2_id = Uuid::new_v4();
    let test3_id = Uuid::new_v4();
    for (id, topic, title) in [
        (test1_id, Some(topic_id), format!("Fundamentals {}", run)),
        (test2_id, None, format!("Advanced {}", run)),
        (test3_id, None, format!("Race {}", run)),
    ] {
        sqlx::query(
            r#"INSERT INTO tests (id, topic_id, title, description, difficulty, time_limit_minutes, passing_score)
                VALUES ($1, $2, $3, $4, $5, $6, $7)"#,
        )
        .bind(id)
        .bind(topic)
        .bind(title)
        .bind("Covers the basics")
        .bind("easy")
        .bind(30)
        .bind(70.0)
        .execute(&pool)
        .await
        .expect("seed test");
    }

    let q1_id = Uuid::new_v4();
    let q2_id = Uuid::new_v4();
    let q3_id = Uuid::new_v4();
    let q4_id = Uuid::new_v4();
    let questions = [
        (q1_id, test1_id, 1, "single_choice", json!(["100", "1000", "10000"]), "1", 10),
        (q2_id, test1_id, 2, "multiple_choice", json!(["CAC", "NPS", "CPC", "Churn"]), "0,2", 20),
        (q3_id, test2_id, 1, "single_choice", json!(["Rising", "Falling"]), "1", 10),
        (q4_id, test3_id, 1, "single_choice", json!(["LTV", "CAC"]), "0", 10),
    ];
    for (id, test_id, position, kind, options, correct_key, points) in questions {
        sqlx::query(
            r#"INSERT INTO questions (id, test_id, position, text, kind, options, correct_key, points)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"#,
        )
        .bind(id)
        .bind(test_id)
        .bind(position)
        .bind("Pick the right answer")
        .bind(kind)
        .bind(options)
        .bind(correct_key)
        .bind(points)
        .execute(&pool)
        .await
        .expect("seed question");
    }

    let metric_id = Uuid::new_v4();
    sqlx::query(
        r#"INSERT INTO metrics (id, name, category, description, formula) VALUES ($1, $2, $3, $4, $5)"#,
    )
    .bind(metric_id)
    .bind(format!("DAU {}", run))
    .bind(format!("engagement-{}", run))
    .bind("Daily active users")
    .bind("count(distinct active users per day)")
    .execute(&pool)
    .await
    .expect("seed metric");

    let now = Utc::now();
    for (days_ago, value) in [(45i64, 100.0f64), (2, 100.0), (1, 80.0)] {
        sqlx::query(
            r#"INSERT INTO metric_samples (metric_id, recorded_at, value) VALUES ($1, $2, $3)"#,
        )
        .bind(metric_id)
        .bind(now - Duration::days(days_ago))
        .bind(value)
        .execute(&pool)
        .await
        .expect("seed sample");
    }

    let achievement_id = Uuid::new_v4();
    sqlx::query(
        r#"INSERT INTO achievements (id, title, description, icon) VALUES ($1, $2, $3, $4)"#,
    )
    .bind(achievement_id)
    .bind(format!("First Steps {}", run))
    .bind("Complete your first test")
    .bind("🎯")
    .execute(&pool)
    .await
    .expect("seed achievement");

    let app_state = academy_backend::AppState::new(pool.clone());
    let app = full_router(app_state);

    // Register, then sanity-check both login outcomes.
    let email = format!("flow_{}@example.com", run);
    let register_body = json!({
        "email": email,
        "name": "Flow Tester",
        "password": "password123"
    });
    let resp = app
        .clone()
        .oneshot(json_req("POST", "/api/auth/register", None, &register_body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let registered = body_json(resp).await;
    let token = registered["token"].as_str().unwrap().to_string();
    assert_eq!(registered["user"]["email"], email.as_str());

    let resp = app
        .clone()
        .oneshot(json_req("POST", "/api/auth/register", None, &register_body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "Email already registered");

    let resp = app
        .clone()
        .oneshot(json_req(
            "POST",
            "/api/auth/login",
            None,
            &json!({"email": email, "password": "password123"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .clone()
        .oneshot(json_req(
            "POST",
            "/api/auth/login",
            None,
            &json!({"email": email, "password": "wrong-password"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "Invalid email or password");

    // Fresh profile starts empty.
    let resp = app
        .clone()
        .oneshot(get_req("/api/profile/progress", &token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let progress = body_json(resp).await;
    assert_eq!(progress["total_points"], 0);
    assert_eq!(progress["total_tasks"], 0);
    assert_eq!(progress["level"], 1);
    assert_eq!(progress["next_level_points"], 100);
    assert_eq!(progress["recent_results"].as_array().unwrap().len(), 0);

    // The catalog lists the seeded test with its question count.
    let resp = app.clone().oneshot(get_req("/api/tests", &token)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let tests = body_json(resp).await;
    let listed = tests
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["id"] == test1_id.to_string())
        .expect("test1 listed");
    assert_eq!(listed["question_count"], 2);

    // Taking view must not leak answer keys.
    let resp = app
        .clone()
        .oneshot(get_req(&format!("/api/tests/{}", test1_id), &token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let detail = body_json(resp).await;
    let detail_questions = detail["questions"].as_array().unwrap();
    assert_eq!(detail_questions.len(), 2);
    for question in detail_questions {
        assert!(question.get("correct_key").is_none());
        assert!(question.get("explanation").is_none());
    }
    assert_eq!(detail_questions[0]["id"], q1_id.to_string());

    let resp = app
        .clone()
        .oneshot(get_req(&format!("/api/tests/{}", Uuid::new_v4()), &token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "Test not found");

    // All answers correct: 30 of 30 points.
    let submit1 = json!({
        "test_id": test1_id,
        "answers": {
            (q1_id.to_string()): "1",
            (q2_id.to_string()): ["0", "2"]
        },
        "time_spent_seconds": 120
    });
    let resp = app
        .clone()
        .oneshot(json_req("POST", "/api/tests/submit", Some(&token), &submit1))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let graded = body_json(resp).await;
    assert_eq!(graded["score"], 30);
    assert_eq!(graded["max_score"], 30);
    assert_eq!(graded["percentage"], 100.0);
    assert_eq!(graded["passed"], true);
    assert_eq!(graded["time_spent_seconds"], 120);

    // Retaking is rejected, both on submit and on the taking view.
    let resp = app
        .clone()
        .oneshot(json_req("POST", "/api/tests/submit", Some(&token), &submit1))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "Test already completed");

    let resp = app
        .clone()
        .oneshot(get_req(&format!("/api/tests/{}", test1_id), &token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // A wrong answer records a failed attempt.
    let submit2 = json!({
        "test_id": test2_id,
        "answers": { (q3_id.to_string()): "0" },
        "time_spent_seconds": 45
    });
    let resp = app
        .clone()
        .oneshot(json_req("POST", "/api/tests/submit", Some(&token), &submit2))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let graded = body_json(resp).await;
    assert_eq!(graded["score"], 0);
    assert_eq!(graded["passed"], false);

    let resp = app
        .clone()
        .oneshot(get_req("/api/profile/progress", &token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let progress = body_json(resp).await;
    assert_eq!(progress["total_points"], 30);
    assert_eq!(progress["completed_tasks"], 1);
    assert_eq!(progress["total_tasks"], 2);
    assert_eq!(progress["success_rate"], 50.0);
    assert_eq!(progress["recent_results"].as_array().unwrap().len(), 2);

    // Two racing submissions of the same test: exactly one is recorded.
    let submit3 = json!({
        "test_id": test3_id,
        "answers": { (q4_id.to_string()): "0" },
        "time_spent_seconds": 10
    });
    let (left, right) = tokio::join!(
        app.clone()
            .oneshot(json_req("POST", "/api/tests/submit", Some(&token), &submit3)),
        app.clone()
            .oneshot(json_req("POST", "/api/tests/submit", Some(&token), &submit3)),
    );
    let mut statuses = vec![left.unwrap().status(), right.unwrap().status()];
    statuses.sort_by_key(|s| s.as_u16());
    assert_eq!(statuses, vec![StatusCode::OK, StatusCode::BAD_REQUEST]);

    let resp = app
        .clone()
        .oneshot(get_req("/api/profile/progress", &token))
        .await
        .unwrap();
    let progress = body_json(resp).await;
    assert_eq!(progress["total_points"], 40);
    assert_eq!(progress["completed_tasks"], 2);
    assert_eq!(progress["total_tasks"], 3);
    let success_rate = progress["success_rate"].as_f64().unwrap();
    assert!((success_rate - 66.6667).abs() < 0.01);
    let titles: Vec<&str> = progress["recent_results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["test_title"].as_str().unwrap())
        .collect();
    assert_eq!(titles.len(), 3);
    for title in [
        format!("Fundamentals {}", run),
        format!("Advanced {}", run),
        format!("Race {}", run),
    ] {
        assert!(titles.contains(&title.as_str()));
    }

    // Knowledge base lists the category with its topic, and the topic page
    // links back to the attached test.
    let resp = app.clone().oneshot(get_req("/api/knowledge", &token)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let categories = body_json(resp).await;
    let category = categories
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["id"] == category_id.to_string())
        .expect("seeded category listed");
    assert_eq!(category["topics"].as_array().unwrap().len(), 1);

    let resp = app
        .clone()
        .oneshot(get_req(&format!("/api/knowledge/topics/{}", topic_id), &token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let topic = body_json(resp).await;
    assert!(topic["content"].as_str().unwrap().contains("DAU"));
    let topic_tests = topic["tests"].as_array().unwrap();
    assert_eq!(topic_tests.len(), 1);
    assert_eq!(topic_tests[0]["id"], test1_id.to_string());
    assert_eq!(topic_tests[0]["question_count"], 2);

    // Metric dashboards: catalog, falling-trend recommendation, and the
    // 30-day window comparison.
    let resp = app.clone().oneshot(get_req("/api/metrics", &token)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let metrics = body_json(resp).await;
    assert!(metrics
        .as_array()
        .unwrap()
        .iter()
        .any(|m| m["id"] == metric_id.to_string()));

    let resp = app
        .clone()
        .oneshot(get_req("/api/metrics/recommendations", &token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let recommendations = body_json(resp).await;
    let item = recommendations
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["metric"] == format!("engagement-{}", run))
        .expect("falling metric produces a recommendation");
    assert_eq!(item["impact"], "high");
    assert!(item["reason"].as_str().unwrap().contains("20.0%"));

    let resp = app
        .clone()
        .oneshot(get_req("/api/metrics/comparison", &token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let comparison = body_json(resp).await;
    let row = comparison
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["metric_id"] == metric_id.to_string())
        .expect("seeded metric compared");
    assert_eq!(row["current"], 90.0);
    assert_eq!(row["previous"], 100.0);
    assert_eq!(row["change_percent"], -10.0);

    // CSV export carries all samples inside the requested range.
    let export_body = json!({
        "metric_ids": [metric_id],
        "format": "csv",
        "date_range": {
            "start": (now - Duration::days(60)).to_rfc3339(),
            "end": (now + Duration::days(1)).to_rfc3339()
        }
    });
    let resp = app
        .clone()
        .oneshot(json_req("POST", "/api/export", Some(&token), &export_body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("content-type").unwrap().to_str().unwrap(),
        "text/csv"
    );
    assert_eq!(
        resp.headers()
            .get("content-disposition")
            .unwrap()
            .to_str()
            .unwrap(),
        "attachment; filename=\"metrics.csv\""
    );
    let bytes = to_bytes(resp.into_body(), 4 * 1024 * 1024).await.unwrap();
    let csv = String::from_utf8(bytes.to_vec()).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "date,metric,value");
    assert_eq!(lines.len(), 4);
    assert!(csv.contains(&format!("DAU {}", run)));

    let resp = app
        .clone()
        .oneshot(json_req(
            "POST",
            "/api/export",
            Some(&token),
            &json!({
                "metric_ids": [metric_id],
                "format": "excel",
                "date_range": {
                    "start": (now - Duration::days(60)).to_rfc3339(),
                    "end": (now + Duration::days(1)).to_rfc3339()
                }
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), 4 * 1024 * 1024).await.unwrap();
    assert!(bytes.starts_with(b"PK"));

    // Notifications: create, list unread, mark read, reject bad severity.
    let resp = app
        .clone()
        .oneshot(json_req(
            "POST",
            "/api/notifications",
            Some(&token),
            &json!({"metric_id": metric_id, "message": "DAU dropped sharply", "severity": "high"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let alert = body_json(resp).await;
    let alert_id = alert["id"].as_str().unwrap().to_string();
    assert_eq!(alert["is_read"], false);

    let resp = app
        .clone()
        .oneshot(get_req("/api/notifications", &token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let unread = body_json(resp).await;
    assert!(unread
        .as_array()
        .unwrap()
        .iter()
        .any(|a| a["id"] == alert_id.as_str()));

    let resp = app
        .clone()
        .oneshot(json_req(
            "PUT",
            "/api/notifications",
            Some(&token),
            &json!({"alert_id": alert_id}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let marked = body_json(resp).await;
    assert_eq!(marked["is_read"], true);

    let resp = app
        .clone()
        .oneshot(json_req(
            "POST",
            "/api/notifications",
            Some(&token),
            &json!({"metric_id": null, "message": "Check this", "severity": "urgent"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "Invalid severity: urgent");

    // Achievements: locked at first sight, unlock once, reject repeats.
    let resp = app
        .clone()
        .oneshot(get_req("/api/achievements", &token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let achievements = body_json(resp).await;
    let seeded = achievements
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["id"] == achievement_id.to_string())
        .expect("seeded achievement listed");
    assert_eq!(seeded["unlocked"], false);
    assert!(seeded["unlocked_at"].is_null());

    let resp = app
        .clone()
        .oneshot(json_req(
            "POST",
            "/api/achievements",
            Some(&token),
            &json!({"achievement_id": achievement_id}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = app
        .clone()
        .oneshot(json_req(
            "POST",
            "/api/achievements",
            Some(&token),
            &json!({"achievement_id": achievement_id}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "Achievement already unlocked");

    let resp = app
        .clone()
        .oneshot(get_req("/api/achievements", &token))
        .await
        .unwrap();
    let achievements = body_json(resp).await;
    let seeded = achievements
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["id"] == achievement_id.to_string())
        .expect("seeded achievement listed");
    assert_eq!(seeded["unlocked"], true);
    assert!(seeded["unlocked_at"].is_string());

    // Dashboard counters reflect everything above.
    let resp = app
        .clone()
        .oneshot(get_req("/api/dashboard/stats", &token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let stats = body_json(resp).await;
    assert_eq!(stats["tests_taken"], 3);
    assert_eq!(stats["tests_passed"], 2);
    assert_eq!(stats["total_points"], 40);
    assert_eq!(stats["unread_alerts"], 0);
    assert!(stats["metrics_tracked"].as_i64().unwrap() >= 1);
}
