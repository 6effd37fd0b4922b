//! Coarse encounter outcomes and the session star rating that produces them.

use serde::{Deserialize, Serialize};

use crate::error::RatingError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    CorrectUnaided,
    CorrectAided,
    Incorrect,
}

/// End-of-session rating shown to the learner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum StarRating {
    One,
    Two,
    Three,
}

impl TryFrom<u8> for StarRating {
    type Error = RatingError;

    fn try_from(stars: u8) -> Result<Self, Self::Error> {
        match stars {
            1 => Ok(StarRating::One),
            2 => Ok(StarRating::Two),
            3 => Ok(StarRating::Three),
            other => Err(RatingError::OutOfRange(other)),
        }
    }
}

impl From<StarRating> for u8 {
    fn from(rating: StarRating) -> Self {
        match rating {
            StarRating::One => 1,
            StarRating::Two => 2,
            StarRating::Three => 3,
        }
    }
}

impl From<StarRating> for Outcome {
    fn from(rating: StarRating) -> Self {
        match rating {
            StarRating::Three => Outcome::CorrectUnaided,
            StarRating::Two => Outcome::CorrectAided,
            StarRating::One => Outcome::Incorrect,
        }
    }
}

/// One chunk touched in a session, paired with the outcome it will be scheduled with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Encounter {
    pub chunk_id: String,
    pub outcome: Outcome,
}
