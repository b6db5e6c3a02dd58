use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::organisations;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = organisations)]
pub struct OrganisationEntity {
    pub id: Uuid,
    pub name: String,
    /// Created implicitly at registration; deleted once it has no members.
    pub is_auto: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
