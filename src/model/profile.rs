use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use sqlx::{types::Json, FromRow};
use uuid::Uuid;

pub const TABLE_NAME: &str = "public.profile";

/// Forward-only verification state, reset only by an operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, sqlx::Type)]
#[sqlx(type_name = "verification_status", rename_all = "lowercase")]
pub enum VerificationStatus {
    Unverified,
    Pending,
    Verified,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Unverified => "unverified",
            VerificationStatus::Pending => "pending",
            VerificationStatus::Verified => "verified",
        }
    }
}

#[derive(Clone, Debug, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub cuisine_preferences: Option<String>,
    pub dietary_restrictions: Option<String>,
    pub location: Option<String>,
    pub avatar_url: Option<String>,
    pub profile_photos: Json<Vec<String>>,
    pub verification_status: VerificationStatus,
    pub verification_date: Option<DateTime<FixedOffset>>,
    pub cooking_level: Option<String>,
    pub preferred_dining_time: Option<String>,
    pub preferred_meal_types: Option<String>,
    pub preferred_group_size: Option<i32>,
    pub food_allergies: Option<String>,
    pub special_diets: Option<String>,
    pub favorite_cuisines: Json<Vec<String>>,
    pub price_range: Option<String>,
    pub created_date: Option<DateTime<FixedOffset>>,
    pub updated_date: Option<DateTime<FixedOffset>>,
}
