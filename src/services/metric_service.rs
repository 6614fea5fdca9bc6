use sqlx::PgPool;

use crate::error::Result;
use crate::models::metric::Metric;

#[derive(Clone)]
pub struct MetricService {
    pool: PgPool,
}

impl MetricService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_metrics(&self) -> Result<Vec<Metric>> {
        let metrics = sqlx::query_as::<_, Metric>(r#"SELECT * FROM metrics ORDER BY name"#)
            .fetch_all(&self.pool)
            .await?;
        Ok(metrics)
    }
}
