use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::business_walls;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = business_walls)]
pub struct BusinessWallEntity {
    pub id: Uuid,
    pub bw_type: String,
    pub status: String,
    pub is_free: bool,
    pub owner_id: Uuid,
    pub payer_id: Uuid,
    pub organisation_id: Option<Uuid>,
    pub activated_at: Option<DateTime<Utc>>,
    pub payer_first_name: String,
    pub payer_last_name: String,
    pub payer_email: String,
    pub payer_phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = business_walls)]
pub struct InsertBusinessWallEntity {
    pub bw_type: String,
    pub status: String,
    pub is_free: bool,
    pub owner_id: Uuid,
    pub payer_id: Uuid,
    pub organisation_id: Option<Uuid>,
    pub activated_at: Option<DateTime<Utc>>,
    pub payer_first_name: String,
    pub payer_last_name: String,
    pub payer_email: String,
    pub payer_phone: String,
}
