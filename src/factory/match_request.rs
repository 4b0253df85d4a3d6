use chrono::{DateTime, FixedOffset};
use fake::{Dummy, Fake, Faker};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::model::match_request::{MatchRequest, MatchStatus};

pub struct MatchRequestFactory<T: Clone> {
    modifier_one: fn(x: &MatchRequest, ext: T) -> MatchRequest,
}

impl<T: Clone> Default for MatchRequestFactory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> MatchRequestFactory<T> {
    pub fn new() -> Self {
        Self {
            modifier_one: |x, _| x.clone(),
        }
    }

    pub fn modified_one(&mut self, modifier: fn(x: &MatchRequest, ext: T) -> MatchRequest) {
        self.modifier_one = modifier
    }

    /// The dummy row carries random party ids; callers must point
    /// sender/receiver at existing users through the modifier.
    pub async fn generate_one(&mut self, db: &PgPool, ext: T) -> anyhow::Result<MatchRequest> {
        let data = MatchRequestDummy::new().generate_one();
        let data = (self.modifier_one)(&data, ext);
        sqlx::query(
            r#"INSERT INTO public.match_request (id, sender_id, receiver_id, status,
            restaurant_preference, proposed_date, created_date, updated_date)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"#,
        )
        .bind(data.id)
        .bind(data.sender_id)
        .bind(data.receiver_id)
        .bind(data.status)
        .bind(&data.restaurant_preference)
        .bind(data.proposed_date)
        .bind(data.created_date)
        .bind(data.updated_date)
        .execute(db)
        .await?;
        Ok(data.clone())
    }
}

#[derive(Debug, Default, Deserialize, Dummy, Clone)]
struct MatchRequestDummy {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub restaurant_preference: Option<String>,
    pub proposed_date: Option<DateTime<FixedOffset>>,
    pub created_date: Option<DateTime<FixedOffset>>,
    pub updated_date: Option<DateTime<FixedOffset>>,
}

impl MatchRequestDummy {
    pub fn new() -> Self {
        Faker.fake::<Self>()
    }

    pub fn generate_one(&self) -> MatchRequest {
        let dummy = Faker.fake::<MatchRequestDummy>();
        MatchRequest {
            id: dummy.id,
            sender_id: dummy.sender_id,
            receiver_id: dummy.receiver_id,
            status: MatchStatus::Pending,
            restaurant_preference: dummy.restaurant_preference,
            proposed_date: dummy.proposed_date,
            created_date: dummy.created_date,
            updated_date: dummy.updated_date,
        }
    }
}
