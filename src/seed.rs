use chrono::{Duration, Utc};
use rand::Rng;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::question::{KIND_MULTIPLE_CHOICE, KIND_SINGLE_CHOICE};
use crate::utils::crypto::hash_password;

const DEMO_USER_ID: Uuid = Uuid::from_u128(0x11111111_1111_4111_8111_111111111111);
const CATEGORY_ID: Uuid = Uuid::from_u128(0x22222222_2222_4222_8222_222222222222);
const TOPIC_ID: Uuid = Uuid::from_u128(0x33333333_3333_4333_8333_333333333333);
const TEST_FUNDAMENTALS_ID: Uuid = Uuid::from_u128(0x44444444_4444_4444_8444_444444444444);
const TEST_ADVANCED_ID: Uuid = Uuid::from_u128(0x55555555_5555_4555_8555_555555555555);
const METRIC_DAU_ID: Uuid = Uuid::from_u128(0x66666666_6666_4666_8666_666666666666);
const METRIC_LTV_ID: Uuid = Uuid::from_u128(0x77777777_7777_4777_8777_777777777777);
const METRIC_CAC_ID: Uuid = Uuid::from_u128(0x88888888_8888_4888_8888_888888888888);

/// Demo content for local runs: one account, a knowledge section, two tests,
/// the tracked metrics with a month of samples, and achievement templates.
/// Every row is keyed on a fixed id, so re-running leaves the data unchanged.
pub async fn run(pool: &PgPool) -> Result<()> {
    seed_demo_user(pool).await?;
    seed_knowledge(pool).await?;
    seed_tests(pool).await?;
    seed_metrics(pool).await?;
    seed_achievements(pool).await?;
    tracing::info!("demo data seeded");
    Ok(())
}

async fn seed_demo_user(pool: &PgPool) -> Result<()> {
    let password_hash = hash_password("password123")
        .map_err(|e| Error::Internal(format!("password hashing failed: {e}")))?;

    sqlx::query(
        r#"
        INSERT INTO users (id, email, name, password_hash)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(DEMO_USER_ID)
    .bind("test@example.com")
    .bind("Test User")
    .bind(&password_hash)
    .execute(pool)
    .await?;

    sqlx::query(r#"INSERT INTO profiles (user_id) VALUES ($1) ON CONFLICT DO NOTHING"#)
        .bind(DEMO_USER_ID)
        .execute(pool)
        .await?;

    Ok(())
}

async fn seed_knowledge(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO knowledge_categories (id, name, description, position)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(CATEGORY_ID)
    .bind("Product Marketing")
    .bind("Core concepts of product marketing analytics")
    .bind(1)
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO topics (id, category_id, name, description, content, position)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(TOPIC_ID)
    .bind(CATEGORY_ID)
    .bind("Key Product Metrics")
    .bind("DAU, LTV, CAC and how they relate")
    .bind(
        "Product metrics describe how users find, use and pay for a product. \
         Engagement metrics such as DAU and MAU count active users, revenue \
         metrics such as LTV estimate the value of a customer over their \
         lifetime, and acquisition metrics such as CAC measure what it costs \
         to win a new customer. Healthy products keep LTV well above CAC.",
    )
    .bind(1)
    .execute(pool)
    .await?;

    Ok(())
}

struct SeedQuestion {
    id: Uuid,
    test_id: Uuid,
    position: i32,
    text: &'static str,
    kind: &'static str,
    options: &'static [&'static str],
    correct_key: &'static str,
    explanation: &'static str,
    points: i32,
}

async fn seed_tests(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO tests (id, topic_id, title, description, difficulty, time_limit_minutes, passing_score)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(TEST_FUNDAMENTALS_ID)
    .bind(TOPIC_ID)
    .bind("Product Metric Fundamentals")
    .bind("Covers the basic product metrics: DAU, MAU, LTV, CAC")
    .bind("easy")
    .bind(30)
    .bind(70.0_f64)
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO tests (id, topic_id, title, description, difficulty, time_limit_minutes, passing_score)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(TEST_ADVANCED_ID)
    .bind(TOPIC_ID)
    .bind("Advanced Metric Analysis")
    .bind("Interpreting metric movements and unit economics")
    .bind("medium")
    .bind(45)
    .bind(80.0_f64)
    .execute(pool)
    .await?;

    let questions = [
        SeedQuestion {
            id: Uuid::from_u128(0x44444444_0000_4000_8000_000000000001),
            test_id: TEST_FUNDAMENTALS_ID,
            position: 1,
            text: "What does DAU stand for?",
            kind: KIND_SINGLE_CHOICE,
            options: &[
                "Daily Active Users",
                "Daily Average Users",
                "Daily Active Usage",
                "Daily Average Usage",
            ],
            correct_key: "0",
            explanation: "DAU counts the unique users who are active on a given day.",
            points: 10,
        },
        SeedQuestion {
            id: Uuid::from_u128(0x44444444_0000_4000_8000_000000000002),
            test_id: TEST_FUNDAMENTALS_ID,
            position: 2,
            text: "How is LTV usually derived?",
            kind: KIND_SINGLE_CHOICE,
            options: &[
                "Total revenue across all users",
                "Average revenue per user over the customer lifetime",
                "Company revenue for the quarter",
                "Revenue from one user in one day",
            ],
            correct_key: "1",
            explanation: "LTV estimates the revenue an average customer brings over their whole lifetime.",
            points: 10,
        },
        SeedQuestion {
            id: Uuid::from_u128(0x44444444_0000_4000_8000_000000000003),
            test_id: TEST_FUNDAMENTALS_ID,
            position: 3,
            text: "Which of these are acquisition metrics?",
            kind: KIND_MULTIPLE_CHOICE,
            options: &["CAC", "Retention rate", "Cost per click", "NPS"],
            correct_key: "0,2",
            explanation: "CAC and cost per click both measure the cost side of acquiring users.",
            points: 20,
        },
        SeedQuestion {
            id: Uuid::from_u128(0x55555555_0000_4000_8000_000000000001),
            test_id: TEST_ADVANCED_ID,
            position: 1,
            text: "A falling DAU/MAU ratio most likely signals what?",
            kind: KIND_SINGLE_CHOICE,
            options: &[
                "Rising engagement",
                "Falling engagement",
                "Lower acquisition cost",
                "Higher conversion",
            ],
            correct_key: "1",
            explanation: "DAU/MAU expresses stickiness, a falling ratio means users return less often.",
            points: 15,
        },
        SeedQuestion {
            id: Uuid::from_u128(0x55555555_0000_4000_8000_000000000002),
            test_id: TEST_ADVANCED_ID,
            position: 2,
            text: "When are a product's unit economics considered healthy?",
            kind: KIND_SINGLE_CHOICE,
            options: &["LTV < CAC", "LTV = CAC", "LTV > CAC", "CAC = 0"],
            correct_key: "2",
            explanation: "A customer has to bring in more value than it cost to acquire them.",
            points: 15,
        },
    ];

    for question in &questions {
        let options: Vec<String> = question.options.iter().map(|s| s.to_string()).collect();
        sqlx::query(
            r#"
            INSERT INTO questions (id, test_id, position, text, kind, options, correct_key, explanation, points)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(question.id)
        .bind(question.test_id)
        .bind(question.position)
        .bind(question.text)
        .bind(question.kind)
        .bind(Json(options))
        .bind(question.correct_key)
        .bind(question.explanation)
        .bind(question.points)
        .execute(pool)
        .await?;
    }

    Ok(())
}

async fn seed_metrics(pool: &PgPool) -> Result<()> {
    let metrics = [
        (
            METRIC_DAU_ID,
            "DAU",
            "engagement",
            "Daily active users",
            "COUNT(DISTINCT users active on the day)",
            1200.0_f64,
        ),
        (
            METRIC_LTV_ID,
            "LTV",
            "revenue",
            "Customer lifetime value",
            "ARPU * average customer lifetime",
            45.0_f64,
        ),
        (
            METRIC_CAC_ID,
            "CAC",
            "acquisition",
            "Customer acquisition cost",
            "Marketing spend / new customers",
            12.0_f64,
        ),
    ];

    let now = Utc::now();

    for (id, name, category, description, formula, base_value) in metrics {
        sqlx::query(
            r#"
            INSERT INTO metrics (id, name, category, description, formula)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(category)
        .bind(description)
        .bind(formula)
        .execute(pool)
        .await?;

        let has_samples: bool =
            sqlx::query_scalar(r#"SELECT EXISTS(SELECT 1 FROM metric_samples WHERE metric_id = $1)"#)
                .bind(id)
                .fetch_one(pool)
                .await?;
        if has_samples {
            continue;
        }

        for (recorded_at, value) in sample_series(base_value, now) {
            sqlx::query(
                r#"INSERT INTO metric_samples (metric_id, recorded_at, value) VALUES ($1, $2, $3)"#,
            )
            .bind(id)
            .bind(recorded_at)
            .bind(value)
            .execute(pool)
            .await?;
        }
    }

    Ok(())
}

/// 30 daily samples around a base value: a slight upward drift with noise,
/// so dashboards have a visible but imperfect trend to work with.
fn sample_series(base_value: f64, now: chrono::DateTime<Utc>) -> Vec<(chrono::DateTime<Utc>, f64)> {
    let mut rng = rand::thread_rng();
    (0..30)
        .map(|day| {
            let recorded_at = now - Duration::days(29 - day);
            let drift = 1.0 + day as f64 * 0.004;
            let jitter = 1.0 + rng.gen_range(-0.05..0.05);
            let value = (base_value * drift * jitter * 100.0).round() / 100.0;
            (recorded_at, value)
        })
        .collect()
}

async fn seed_achievements(pool: &PgPool) -> Result<()> {
    let achievements = [
        (
            Uuid::from_u128(0x99999999_0000_4000_8000_000000000001),
            "First Steps",
            "Complete your first test",
            "🎯",
            "Finish any test",
        ),
        (
            Uuid::from_u128(0x99999999_0000_4000_8000_000000000002),
            "Perfect Score",
            "Answer every question in a test correctly",
            "🏆",
            "Score 100% on any test",
        ),
        (
            Uuid::from_u128(0x99999999_0000_4000_8000_000000000003),
            "Metric Master",
            "Pass every available test",
            "📈",
            "Pass all tests in the catalog",
        ),
    ];

    for (id, title, description, icon, criteria) in achievements {
        sqlx::query(
            r#"
            INSERT INTO achievements (id, title, description, icon, criteria)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(description)
        .bind(icon)
        .bind(criteria)
        .execute(pool)
        .await?;
    }

    Ok(())
}
