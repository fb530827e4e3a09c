use strum::{EnumCount, EnumIter, FromRepr, VariantArray};

use crate::env::IndexedAction;

use super::map::Pos;

#[derive(EnumIter, VariantArray, FromRepr, Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Dir {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Dir {
    pub fn offset(self, (x, y): Pos) -> Pos {
        match self {
            Dir::Up => (x, y - 1),
            Dir::Right => (x + 1, y),
            Dir::Down => (x, y + 1),
            Dir::Left => (x - 1, y),
        }
    }
}

/// A move in one of four directions, either a single step or a noisy double step
#[derive(
    EnumIter, VariantArray, FromRepr, EnumCount, Clone, Copy, Debug, Hash, PartialEq, Eq,
)]
pub enum Action {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
    FastUp = 4,
    FastRight = 5,
    FastDown = 6,
    FastLeft = 7,
}

impl Action {
    pub fn direction(self) -> Dir {
        Dir::from_repr(self as usize % 4).expect("Every action maps onto a direction")
    }

    pub fn is_fast(self) -> bool {
        self as usize >= 4
    }
}

impl IndexedAction for Action {
    fn index(self) -> usize {
        self as usize
    }

    fn from_index(index: usize) -> Self {
        Self::from_repr(index).unwrap_or_else(|| {
            panic!(
                "Action index {index} is outside the action space [0, {}).",
                Self::COUNT
            )
        })
    }
}
