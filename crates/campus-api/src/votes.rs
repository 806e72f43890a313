//! Shared request/response types for the two vote endpoints.

use campus_core::{
  store::PlatformStore, target::Target, user::User, vote::VoteValue,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct VoteBody {
  /// `1` or `-1`; anything else is a 400.
  pub value: i64,
}

#[derive(Debug, Serialize)]
pub struct VoteTotal {
  pub votes: i64,
}

/// Run the vote state machine for `user` on `target` and return the new
/// counter value.
pub async fn cast<S>(
  store: &S,
  user: &User,
  target: Target,
  body: VoteBody,
) -> Result<VoteTotal, ApiError>
where
  S: PlatformStore,
{
  let value = VoteValue::try_from(body.value)?;
  let votes = store.cast_vote(user.user_id, target, value).await?;
  Ok(VoteTotal { votes })
}
