use chrono::{DateTime, FixedOffset};
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::model::profile::{Profile, TABLE_NAME};

pub async fn get_profile_by_user_id(
    tx: &mut Transaction<'_, Postgres>,
    user_id: &Uuid,
) -> anyhow::Result<Option<Profile>> {
    let profile: Option<Profile> =
        sqlx::query_as(format!("SELECT * FROM {} WHERE user_id = $1", TABLE_NAME).as_str())
            .bind(user_id)
            .fetch_optional(&mut **tx)
            .await?;
    Ok(profile)
}

pub async fn create_profile(
    tx: &mut Transaction<'_, Postgres>,
    profile: &Profile,
) -> anyhow::Result<()> {
    sqlx::query(
        format!(
            r#"
        INSERT INTO {} (id, user_id, full_name, bio, cuisine_preferences, dietary_restrictions,
            location, avatar_url, profile_photos, verification_status, verification_date,
            cooking_level, preferred_dining_time, preferred_meal_types, preferred_group_size,
            food_allergies, special_diets, favorite_cuisines, price_range, created_date, updated_date)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21)
        "#,
            TABLE_NAME
        )
        .as_str(),
    )
    .bind(profile.id)
    .bind(profile.user_id)
    .bind(&profile.full_name)
    .bind(&profile.bio)
    .bind(&profile.cuisine_preferences)
    .bind(&profile.dietary_restrictions)
    .bind(&profile.location)
    .bind(&profile.avatar_url)
    .bind(&profile.profile_photos)
    .bind(profile.verification_status)
    .bind(profile.verification_date)
    .bind(&profile.cooking_level)
    .bind(&profile.preferred_dining_time)
    .bind(&profile.preferred_meal_types)
    .bind(profile.preferred_group_size)
    .bind(&profile.food_allergies)
    .bind(&profile.special_diets)
    .bind(&profile.favorite_cuisines)
    .bind(&profile.price_range)
    .bind(profile.created_date)
    .bind(profile.updated_date)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Full-row write; the caller merges partial updates into the loaded row
/// first so unspecified fields keep their prior value.
pub async fn update_profile(
    tx: &mut Transaction<'_, Postgres>,
    profile: &mut Profile,
    now: &DateTime<FixedOffset>,
) -> anyhow::Result<()> {
    profile.updated_date = Some(*now);
    sqlx::query(
        format!(
            r#"UPDATE {}
            SET full_name = $1, bio = $2, cuisine_preferences = $3, dietary_restrictions = $4,
            location = $5, avatar_url = $6, profile_photos = $7, verification_status = $8,
            verification_date = $9, cooking_level = $10, preferred_dining_time = $11,
            preferred_meal_types = $12, preferred_group_size = $13, food_allergies = $14,
            special_diets = $15, favorite_cuisines = $16, price_range = $17, updated_date = $18
            WHERE id = $19"#,
            TABLE_NAME
        )
        .as_str(),
    )
    .bind(&profile.full_name)
    .bind(&profile.bio)
    .bind(&profile.cuisine_preferences)
    .bind(&profile.dietary_restrictions)
    .bind(&profile.location)
    .bind(&profile.avatar_url)
    .bind(&profile.profile_photos)
    .bind(profile.verification_status)
    .bind(profile.verification_date)
    .bind(&profile.cooking_level)
    .bind(&profile.preferred_dining_time)
    .bind(&profile.preferred_meal_types)
    .bind(profile.preferred_group_size)
    .bind(&profile.food_allergies)
    .bind(&profile.special_diets)
    .bind(&profile.favorite_cuisines)
    .bind(&profile.price_range)
    .bind(profile.updated_date)
    .bind(profile.id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
