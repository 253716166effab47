use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use super::{Error, Result, SubscriptionStorage};
use crate::model::{Subscription, ValidSubscription};

/// `SubscriptionStorage` backed by the `subscriptions` table.
#[derive(Clone, Debug)]
pub struct PgStorage {
    db: PgPool,
}

impl PgStorage {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SubscriptionStorage for PgStorage {
    #[tracing::instrument(
        name = "Inserting subscription",
        skip(self, subscription),
        fields(user_id = %subscription.user_id, service_name = %subscription.service_name),
        err
    )]
    async fn create(&self, subscription: &ValidSubscription) -> Result<i64> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO subscriptions (service_name, user_id, price, start_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id
        "#,
        )
        .bind(subscription.service_name.as_str())
        .bind(subscription.user_id.as_str())
        .bind(*subscription.price)
        .bind(subscription.start_date.to_string())
        .fetch_one(&self.db)
        .await?;

        info!(id, "subscription inserted");
        Ok(id)
    }

    #[tracing::instrument(name = "Fetching subscription", skip(self), err)]
    async fn get_by_id(&self, id: i64) -> Result<Subscription> {
        sqlx::query_as::<_, Subscription>(
            r#"
            SELECT id, user_id, service_name, price, start_date
            FROM subscriptions
            WHERE id = $1
        "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(Error::SubscriptionNotFound)
    }

    #[tracing::instrument(name = "Listing subscriptions", skip(self), err)]
    async fn list(&self) -> Result<Vec<Subscription>> {
        let subscriptions = sqlx::query_as::<_, Subscription>(
            r#"
            SELECT id, user_id, service_name, price, start_date
            FROM subscriptions
            ORDER BY id
        "#,
        )
        .fetch_all(&self.db)
        .await?;

        if subscriptions.is_empty() {
            return Err(Error::NoSubscriptions);
        }

        Ok(subscriptions)
    }

    #[tracing::instrument(name = "Updating subscription", skip(self, subscription), err)]
    async fn update(&self, id: i64, subscription: &ValidSubscription) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE subscriptions
            SET user_id = $2, service_name = $3, price = $4, start_date = $5
            WHERE id = $1
        "#,
        )
        .bind(id)
        .bind(subscription.user_id.as_str())
        .bind(subscription.service_name.as_str())
        .bind(*subscription.price)
        .bind(subscription.start_date.to_string())
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::SubscriptionNotFound);
        }

        Ok(())
    }

    #[tracing::instrument(name = "Deleting subscription", skip(self), err)]
    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM subscriptions WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::SubscriptionNotFound);
        }

        Ok(())
    }

    #[tracing::instrument(name = "Summing subscription prices", skip(self), err)]
    async fn total_sum(&self) -> Result<i64> {
        // SUM over INTEGER yields BIGINT in postgres.
        let total: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(price), 0) FROM subscriptions")
            .fetch_one(&self.db)
            .await?;

        Ok(total)
    }
}
