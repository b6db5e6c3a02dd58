use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::bw_subscriptions;

/// `business_wall_id` is filled in by the repository once the wall row exists.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bw_subscriptions)]
pub struct InsertBwSubscriptionEntity {
    pub business_wall_id: Option<Uuid>,
    pub status: String,
    pub pricing_field: String,
    pub pricing_tier: String,
    pub monthly_price: i32,
    pub annual_price: i32,
    pub started_at: DateTime<Utc>,
}
