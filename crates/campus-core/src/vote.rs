//! Vote types.
//!
//! A vote is one user's single up- or down-mark on one target. The vote
//! engine (in the store backend) applies toggle/switch semantics: re-casting
//! the same value removes the vote, casting the opposite value updates it in
//! place. The target's denormalized counter moves with every transition.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::Error, target::Target};

/// The value of a vote: exactly `+1` or `-1` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum VoteValue {
  Up,
  Down,
}

impl VoteValue {
  pub fn as_i64(self) -> i64 {
    match self {
      VoteValue::Up => 1,
      VoteValue::Down => -1,
    }
  }
}

impl From<VoteValue> for i64 {
  fn from(v: VoteValue) -> i64 { v.as_i64() }
}

impl TryFrom<i64> for VoteValue {
  type Error = Error;

  fn try_from(v: i64) -> Result<Self, Error> {
    match v {
      1 => Ok(VoteValue::Up),
      -1 => Ok(VoteValue::Down),
      other => Err(Error::InvalidVoteValue(other)),
    }
  }
}

/// A persisted vote row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
  pub vote_id: Uuid,
  pub user_id: Uuid,
  pub target:  Target,
  pub value:   VoteValue,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn vote_value_round_trips_through_i64() {
    assert_eq!(VoteValue::try_from(1).unwrap(), VoteValue::Up);
    assert_eq!(VoteValue::try_from(-1).unwrap(), VoteValue::Down);
    assert_eq!(VoteValue::Up.as_i64(), 1);
    assert_eq!(VoteValue::Down.as_i64(), -1);
  }

  #[test]
  fn vote_value_rejects_everything_else() {
    for v in [0, 2, -2, 100] {
      assert!(matches!(
        VoteValue::try_from(v),
        Err(Error::InvalidVoteValue(_))
      ));
    }
  }

  #[test]
  fn vote_value_deserializes_from_json_integer() {
    let up: VoteValue = serde_json::from_str("1").unwrap();
    assert_eq!(up, VoteValue::Up);
    assert!(serde_json::from_str::<VoteValue>("3").is_err());
  }
}
