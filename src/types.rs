use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

pub type Money = i64;
pub type Worth = i64;
pub type PlayerId = usize;
pub type PropertyId = usize;

/// Color group of a deed. Railroads and utilities are groups too, they just
/// cannot be developed.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Color {
    Brown,
    LightBlue,
    Pink,
    Orange,
    Red,
    Yellow,
    Green,
    DarkBlue,
    Railroad,
    Utility,
}

impl Color {
    pub const ALL: [Color; 10] = [
        Color::Brown,
        Color::LightBlue,
        Color::Pink,
        Color::Orange,
        Color::Red,
        Color::Yellow,
        Color::Green,
        Color::DarkBlue,
        Color::Railroad,
        Color::Utility,
    ];

    /// Groups that take houses, in board order.
    pub const BUILDABLE: [Color; 8] = [
        Color::Brown,
        Color::LightBlue,
        Color::Pink,
        Color::Orange,
        Color::Red,
        Color::Yellow,
        Color::Green,
        Color::DarkBlue,
    ];

    pub const fn index(self) -> usize {
        match self {
            Color::Brown => 0,
            Color::LightBlue => 1,
            Color::Pink => 2,
            Color::Orange => 3,
            Color::Red => 4,
            Color::Yellow => 5,
            Color::Green => 6,
            Color::DarkBlue => 7,
            Color::Railroad => 8,
            Color::Utility => 9,
        }
    }

    pub const fn is_buildable(self) -> bool {
        !matches!(self, Color::Railroad | Color::Utility)
    }

    /// Number of deeds needed for a complete set.
    pub const fn group_size(self) -> usize {
        match self {
            Color::Brown | Color::DarkBlue | Color::Utility => 2,
            Color::Railroad => 4,
            _ => 3,
        }
    }

    /// ANSI-256 foreground code used when a name is printed for a human.
    pub const fn ansi_code(self) -> u8 {
        match self {
            Color::Brown => 137,
            Color::LightBlue => 80,
            Color::Pink => 162,
            Color::Orange => 208,
            Color::Red => 196,
            Color::Yellow => 226,
            Color::Green => 41,
            Color::DarkBlue => 33,
            Color::Railroad => 249,
            Color::Utility => 250,
        }
    }
}

/// How close a player is to owning a complete color group. Ordered, so
/// `degree <= OwnershipDegree::One` reads the way it sounds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OwnershipDegree {
    None,
    One,
    AlmostMonopoly,
    Monopoly,
}

impl OwnershipDegree {
    /// Classify `count` owned deeds of `color`. Counts outside `0..=size` are
    /// clamped so hypothetical bundles never fall back to a lower degree.
    pub fn classify(color: Color, count: i32) -> Self {
        let size = color.group_size() as i32;
        if count >= size {
            OwnershipDegree::Monopoly
        } else if count <= 0 {
            OwnershipDegree::None
        } else if count == size - 1 && color != Color::Utility {
            OwnershipDegree::AlmostMonopoly
        } else {
            OwnershipDegree::One
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum Token {
    Battleship,
    Boot,
    Cannon,
    Horse,
    Iron,
    Racecar,
    Dog,
    Thimble,
    TopHat,
    Wheelbarrow,
}

impl Token {
    pub const ORDERED: [Token; 8] = [
        Token::Battleship,
        Token::Boot,
        Token::Cannon,
        Token::Horse,
        Token::Iron,
        Token::Racecar,
        Token::Dog,
        Token::Thimble,
    ];
}

/// Fixed-size map keyed by every color group, pre-populated with `T::default()`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorMap<T> {
    slots: [T; Color::ALL.len()],
}

impl<T: Default> Default for ColorMap<T> {
    fn default() -> Self {
        Self {
            slots: std::array::from_fn(|_| T::default()),
        }
    }
}

impl<T> ColorMap<T> {
    pub fn iter(&self) -> impl Iterator<Item = (Color, &T)> + '_ {
        Color::ALL.into_iter().zip(self.slots.iter())
    }
}

impl<T> std::ops::Index<Color> for ColorMap<T> {
    type Output = T;

    fn index(&self, color: Color) -> &T {
        &self.slots[color.index()]
    }
}

impl<T> std::ops::IndexMut<Color> for ColorMap<T> {
    fn index_mut(&mut self, color: Color) -> &mut T {
        &mut self.slots[color.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degree_is_monotonic_and_monopoly_only_at_group_size() {
        for color in Color::ALL {
            let size = color.group_size() as i32;
            let mut previous = OwnershipDegree::None;
            for count in 0..=size {
                let degree = OwnershipDegree::classify(color, count);
                assert!(degree >= previous, "{color} at {count}");
                assert_eq!(degree == OwnershipDegree::Monopoly, count == size);
                previous = degree;
            }
        }
    }

    #[test]
    fn two_deed_groups_are_almost_complete_at_one() {
        assert_eq!(
            OwnershipDegree::classify(Color::Brown, 1),
            OwnershipDegree::AlmostMonopoly
        );
        assert_eq!(
            OwnershipDegree::classify(Color::DarkBlue, 1),
            OwnershipDegree::AlmostMonopoly
        );
        assert_eq!(
            OwnershipDegree::classify(Color::Utility, 1),
            OwnershipDegree::One
        );
        assert_eq!(
            OwnershipDegree::classify(Color::Railroad, 3),
            OwnershipDegree::AlmostMonopoly
        );
        assert_eq!(
            OwnershipDegree::classify(Color::Railroad, 2),
            OwnershipDegree::One
        );
    }

    #[test]
    fn color_map_starts_empty_for_every_color() {
        let mut map: ColorMap<u32> = ColorMap::default();
        map[Color::Green] += 2;
        assert_eq!(map[Color::Green], 2);
        assert!(map.iter().filter(|(c, _)| *c != Color::Green).all(|(_, v)| *v == 0));
    }
}
