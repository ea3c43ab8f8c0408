use serde::{Deserialize, Serialize};

/// Meal slot a serving was logged under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Meal {
    Breakfast,
    Lunch,
    Dinner,
    Other(i64),
}

impl Meal {
    pub fn from_id(id: i64) -> Self {
        match id {
            0 => Self::Breakfast,
            1 => Self::Lunch,
            2 => Self::Dinner,
            other => Self::Other(other),
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Self::Breakfast => 0,
            Self::Lunch => 1,
            Self::Dinner => 2,
            Self::Other(id) => *id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Breakfast => "Breakfast",
            Self::Lunch => "Lunch",
            Self::Dinner => "Dinner",
            Self::Other(_) => "Meal",
        }
    }
}
