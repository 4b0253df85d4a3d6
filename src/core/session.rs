use redis::ConnectionLike;
use serde::{Deserialize, Serialize};

use crate::{model::user::User, settings::Config};

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionData {
    pub user_id: String,
    pub refresh_token: String,
}

pub fn add_session<C: ConnectionLike>(
    redis_conn: &mut C,
    user: &User,
    config: &Config,
    token: String,
    refresh_token: String,
) -> anyhow::Result<()> {
    let session_data = SessionData {
        user_id: user.id.to_string(),
        refresh_token,
    };
    let session_json = serde_json::to_string(&session_data)?;
    redis::Cmd::set_ex(token, session_json, config.jwt_exp as u64).exec(redis_conn)?;
    Ok(())
}

pub fn get_session<C: ConnectionLike>(
    redis_conn: &mut C,
    token: String,
) -> anyhow::Result<Option<SessionData>> {
    let res: Option<String> = redis::cmd("get").arg(token).query(redis_conn)?;
    let res = match res {
        Some(val) => val,
        None => return Ok(None),
    };
    let session_data: SessionData = serde_json::from_str(res.as_str())?;
    Ok(Some(session_data))
}

pub fn remove_session<C: ConnectionLike>(
    redis_conn: &mut C,
    token: String,
) -> anyhow::Result<bool> {
    let res: Option<String> = redis::cmd("get").arg(&token).query(redis_conn)?;
    let res = match res {
        Some(val) => val,
        None => return Ok(false),
    };
    let session_data: SessionData = serde_json::from_str(res.as_str())?;
    redis::cmd("del")
        .arg(session_data.refresh_token)
        .exec(redis_conn)?;
    redis::cmd("del").arg(token).exec(redis_conn)?;
    Ok(true)
}
