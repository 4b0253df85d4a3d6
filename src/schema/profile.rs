use poem_openapi::{payload::Json, ApiResponse, Object};
use serde::Deserialize;

use crate::{
    core::utils::datetime_to_string_opt,
    model::profile::Profile,
    schema::common::{
        BadRequestResponse, ConflictResponse, InternalServerErrorResponse, NotFoundResponse,
        UnauthorizedResponse,
    },
};

#[derive(Object, Deserialize)]
pub struct ProfileCreateRequest {
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub cuisine_preferences: Option<String>,
    pub dietary_restrictions: Option<String>,
    pub location: Option<String>,
    pub avatar_url: Option<String>,
    pub profile_photos: Option<Vec<String>>,
    pub cooking_level: Option<String>,
    pub preferred_dining_time: Option<String>,
    pub preferred_meal_types: Option<String>,
    pub preferred_group_size: Option<i32>,
    pub food_allergies: Option<String>,
    pub special_diets: Option<String>,
    pub favorite_cuisines: Option<Vec<String>>,
    pub price_range: Option<String>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Object, Deserialize)]
pub struct ProfileUpdateRequest {
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub cuisine_preferences: Option<String>,
    pub dietary_restrictions: Option<String>,
    pub location: Option<String>,
    pub avatar_url: Option<String>,
    pub profile_photos: Option<Vec<String>>,
    pub cooking_level: Option<String>,
    pub preferred_dining_time: Option<String>,
    pub preferred_meal_types: Option<String>,
    pub preferred_group_size: Option<i32>,
    pub food_allergies: Option<String>,
    pub special_diets: Option<String>,
    pub favorite_cuisines: Option<Vec<String>>,
    pub price_range: Option<String>,
}

#[derive(Object, Deserialize)]
pub struct DetailProfile {
    pub id: String,
    pub user_id: String,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub cuisine_preferences: Option<String>,
    pub dietary_restrictions: Option<String>,
    pub location: Option<String>,
    pub avatar_url: Option<String>,
    pub profile_photos: Vec<String>,
    pub verification_status: String,
    pub cooking_level: Option<String>,
    pub preferred_dining_time: Option<String>,
    pub preferred_meal_types: Option<String>,
    pub preferred_group_size: Option<i32>,
    pub food_allergies: Option<String>,
    pub special_diets: Option<String>,
    pub favorite_cuisines: Vec<String>,
    pub price_range: Option<String>,
    pub created_date: Option<String>,
    pub updated_date: Option<String>,
}

impl DetailProfile {
    pub fn from_model(profile: &Profile) -> Self {
        Self {
            id: profile.id.to_string(),
            user_id: profile.user_id.to_string(),
            full_name: profile.full_name.clone(),
            bio: profile.bio.clone(),
            cuisine_preferences: profile.cuisine_preferences.clone(),
            dietary_restrictions: profile.dietary_restrictions.clone(),
            location: profile.location.clone(),
            avatar_url: profile.avatar_url.clone(),
            profile_photos: profile.profile_photos.0.clone(),
            verification_status: profile.verification_status.as_str().to_string(),
            cooking_level: profile.cooking_level.clone(),
            preferred_dining_time: profile.preferred_dining_time.clone(),
            preferred_meal_types: profile.preferred_meal_types.clone(),
            preferred_group_size: profile.preferred_group_size,
            food_allergies: profile.food_allergies.clone(),
            special_diets: profile.special_diets.clone(),
            favorite_cuisines: profile.favorite_cuisines.0.clone(),
            price_range: profile.price_range.clone(),
            created_date: datetime_to_string_opt(profile.created_date),
            updated_date: datetime_to_string_opt(profile.updated_date),
        }
    }
}

#[derive(ApiResponse)]
pub enum ProfileCreateResponses {
    #[oai(status = 201)]
    Created(Json<DetailProfile>),

    #[oai(status = 400)]
    BadRequest(Json<BadRequestResponse>),

    #[oai(status = 401)]
    Unauthorized(Json<UnauthorizedResponse>),

    #[oai(status = 409)]
    Conflict(Json<ConflictResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}

#[derive(ApiResponse)]
pub enum ProfileDetailResponses {
    #[oai(status = 200)]
    Ok(Json<DetailProfile>),

    #[oai(status = 401)]
    Unauthorized(Json<UnauthorizedResponse>),

    #[oai(status = 404)]
    NotFound(Json<NotFoundResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}

#[derive(ApiResponse)]
pub enum ProfileUpdateResponses {
    #[oai(status = 200)]
    Ok(Json<DetailProfile>),

    #[oai(status = 400)]
    BadRequest(Json<BadRequestResponse>),

    #[oai(status = 401)]
    Unauthorized(Json<UnauthorizedResponse>),

    #[oai(status = 404)]
    NotFound(Json<NotFoundResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}
