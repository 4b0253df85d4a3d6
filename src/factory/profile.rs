use chrono::{DateTime, FixedOffset};
use fake::{Dummy, Fake, Faker};
use serde::Deserialize;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::model::profile::{Profile, VerificationStatus};

pub struct ProfileFactory<T: Clone> {
    modifier_one: fn(x: &Profile, ext: T) -> Profile,
}

impl<T: Clone> Default for ProfileFactory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> ProfileFactory<T> {
    pub fn new() -> Self {
        Self {
            modifier_one: |x, _| x.clone(),
        }
    }

    pub fn modified_one(&mut self, modifier: fn(x: &Profile, ext: T) -> Profile) {
        self.modifier_one = modifier
    }

    /// The dummy row carries a random `user_id`; callers must point it at an
    /// existing user through the modifier or the FK will reject it.
    pub async fn generate_one(&mut self, db: &PgPool, ext: T) -> anyhow::Result<Profile> {
        let data = ProfileDummy::new().generate_one();
        let data = (self.modifier_one)(&data, ext);
        sqlx::query(
            r#"INSERT INTO public.profile (id, user_id, full_name, bio, cuisine_preferences,
            dietary_restrictions, location, avatar_url, profile_photos, verification_status,
            cooking_level, preferred_group_size, favorite_cuisines, price_range, created_date, updated_date)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)"#,
        )
        .bind(data.id)
        .bind(data.user_id)
        .bind(&data.full_name)
        .bind(&data.bio)
        .bind(&data.cuisine_preferences)
        .bind(&data.dietary_restrictions)
        .bind(&data.location)
        .bind(&data.avatar_url)
        .bind(&data.profile_photos)
        .bind(data.verification_status)
        .bind(&data.cooking_level)
        .bind(data.preferred_group_size)
        .bind(&data.favorite_cuisines)
        .bind(&data.price_range)
        .bind(data.created_date)
        .bind(data.updated_date)
        .execute(db)
        .await?;
        Ok(data.clone())
    }
}

#[derive(Debug, Default, Deserialize, Dummy, Clone)]
struct ProfileDummy {
    pub id: Uuid,
    pub user_id: Uuid,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub cuisine_preferences: Option<String>,
    pub dietary_restrictions: Option<String>,
    pub location: Option<String>,
    pub avatar_url: Option<String>,
    pub profile_photos: Vec<String>,
    pub cooking_level: Option<String>,
    pub preferred_group_size: Option<i32>,
    pub favorite_cuisines: Vec<String>,
    pub price_range: Option<String>,
    pub created_date: Option<DateTime<FixedOffset>>,
    pub updated_date: Option<DateTime<FixedOffset>>,
}

impl ProfileDummy {
    pub fn new() -> Self {
        Faker.fake::<Self>()
    }

    pub fn generate_one(&self) -> Profile {
        let dummy = Faker.fake::<ProfileDummy>();
        Profile {
            id: dummy.id,
            user_id: dummy.user_id,
            full_name: dummy.full_name,
            bio: dummy.bio,
            cuisine_preferences: dummy.cuisine_preferences,
            dietary_restrictions: dummy.dietary_restrictions,
            location: dummy.location,
            avatar_url: dummy.avatar_url,
            profile_photos: Json(dummy.profile_photos),
            verification_status: VerificationStatus::Unverified,
            verification_date: None,
            cooking_level: dummy.cooking_level,
            preferred_dining_time: None,
            preferred_meal_types: None,
            preferred_group_size: dummy.preferred_group_size,
            food_allergies: None,
            special_diets: None,
            favorite_cuisines: Json(dummy.favorite_cuisines),
            price_range: dummy.price_range,
            created_date: dummy.created_date,
            updated_date: dummy.updated_date,
        }
    }
}
