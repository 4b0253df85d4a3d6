//! Candidate filtering and ranking behind the potential-matches endpoint.
//!
//! A ranking request reads everything inside one transaction: the exclusion
//! set, the candidate rows and the scoring counts all observe the same
//! snapshot. Cross-request freshness is best effort.

use std::collections::HashSet;

use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::{
    model::{profile::Profile, user::User},
    repository::{
        match_request::{count_match_outcomes, get_match_requests_involving},
        profile::get_profile_by_user_id,
        user::get_candidates,
    },
};

use super::score::{cuisine_score, dietary_score, location_score, SUCCESS_RATE_WEIGHT};

pub struct RankedCandidate {
    pub user: User,
    pub profile: Profile,
    pub score: f64,
}

/// Share of accepted matches over all matches involving the user, scaled
/// to [0, 20]. No history scores 0.
pub async fn success_rate_score(
    tx: &mut Transaction<'_, Postgres>,
    user_id: &Uuid,
) -> anyhow::Result<f64> {
    let (accepted, total) = count_match_outcomes(tx, user_id).await?;
    if total == 0 {
        return Ok(0.0);
    }
    Ok(accepted as f64 / total as f64 * SUCCESS_RATE_WEIGHT)
}

/// The user themself plus both parties of every match they appear in,
/// any status. Rejected history stays excluded for good.
pub async fn excluded_user_ids(
    tx: &mut Transaction<'_, Postgres>,
    user_id: &Uuid,
) -> anyhow::Result<Vec<Uuid>> {
    let mut ids: HashSet<Uuid> = HashSet::new();
    ids.insert(*user_id);
    for item in get_match_requests_involving(tx, user_id).await? {
        ids.insert(item.sender_id);
        ids.insert(item.receiver_id);
    }
    Ok(ids.into_iter().collect())
}

/// Profile-vs-profile part of the compatibility score, range [0, 80].
pub fn profile_score(own: &Profile, other: &Profile) -> f64 {
    cuisine_score(
        own.cuisine_preferences.as_deref(),
        other.cuisine_preferences.as_deref(),
    ) + location_score(own.location.as_deref(), other.location.as_deref())
        + dietary_score(
            own.dietary_restrictions.as_deref(),
            other.dietary_restrictions.as_deref(),
        )
}

/// Scores every non-excluded active candidate against the current user's
/// profile, sorts descending and slices `skip..skip+limit`. A user without
/// a profile gets an empty list. The sort is stable, so equal scores keep
/// the repository enumeration order.
pub async fn rank_candidates(
    tx: &mut Transaction<'_, Postgres>,
    current_user: &User,
    skip: u32,
    limit: u32,
) -> anyhow::Result<Vec<RankedCandidate>> {
    let own_profile = match get_profile_by_user_id(tx, &current_user.id).await? {
        Some(val) => val,
        None => return Ok(vec![]),
    };

    let excluded = excluded_user_ids(tx, &current_user.id).await?;
    let candidates = get_candidates(tx, &excluded).await?;

    let mut ranked: Vec<RankedCandidate> = Vec::with_capacity(candidates.len());
    for (user, profile) in candidates {
        let mut score = profile_score(&own_profile, &profile);
        score += success_rate_score(tx, &user.id).await?;
        ranked.push(RankedCandidate {
            user,
            profile,
            score,
        });
    }
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

    Ok(ranked
        .into_iter()
        .skip(skip as usize)
        .take(limit as usize)
        .collect())
}
