use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::types::{Color, Money, PropertyId};

pub const BOARD_SIZE: usize = 40;
/// Jail sits off the board; released players are put on `JUST_VISITING`.
pub const JAIL: usize = 40;
pub const JUST_VISITING: usize = 10;
pub const GO_SALARY: Money = 200;
pub const MAX_HOUSES: u8 = 5;

pub const RAILROAD_COST: Money = 200;
pub const UTILITY_COST: Money = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeedKind {
    Street {
        build_cost: Money,
        /// Rent by house count, index 5 is a hotel.
        rent: [Money; 6],
    },
    Railroad,
    Utility,
}

/// Printed title deed: everything about a property that never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Deed {
    pub id: PropertyId,
    pub name: &'static str,
    pub space: usize,
    pub cost: Money,
    pub color: Color,
    pub kind: DeedKind,
}

impl Deed {
    pub const fn mortgage_amount(&self) -> Money {
        self.cost / 2
    }

    pub const fn unmortgage_amount(&self) -> Money {
        self.mortgage_amount() * 11 / 10
    }

    pub const fn build_cost(&self) -> Money {
        match self.kind {
            DeedKind::Street { build_cost, .. } => build_cost,
            _ => 0,
        }
    }

    pub const fn can_develop(&self) -> bool {
        matches!(self.kind, DeedKind::Street { .. })
    }
}

impl fmt::Display for Deed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Space {
    Go,
    Deed(PropertyId),
    CommunityChest,
    Chance,
    IncomeTax,
    LuxuryTax,
    JustVisiting,
    FreeParking,
    GoToJail,
}

impl Space {
    pub fn label(&self) -> &'static str {
        match self {
            Space::Go => "Go",
            Space::Deed(id) => DEEDS[*id].name,
            Space::CommunityChest => "Community Chest",
            Space::Chance => "Chance",
            Space::IncomeTax => "Income Tax",
            Space::LuxuryTax => "Luxury Tax",
            Space::JustVisiting => "Visiting Jail",
            Space::FreeParking => "Free Parking",
            Space::GoToJail => "Go to Jail",
        }
    }
}

/// Named board spaces that cards send players to.
pub mod landmarks {
    pub const GO: usize = 0;
    pub const READING_RAILROAD: usize = 5;
    pub const ST_CHARLES_PLACE: usize = 11;
    pub const ELECTRIC_COMPANY: usize = 12;
    pub const PENNSYLVANIA_RAILROAD: usize = 15;
    pub const ILLINOIS_AVENUE: usize = 24;
    pub const BO_RAILROAD: usize = 25;
    pub const WATER_WORKS: usize = 28;
    pub const SHORT_LINE: usize = 35;
    pub const BOARDWALK: usize = 39;
}

const fn street(
    id: PropertyId,
    name: &'static str,
    space: usize,
    cost: Money,
    color: Color,
    build_cost: Money,
    rent: [Money; 6],
) -> Deed {
    Deed {
        id,
        name,
        space,
        cost,
        color,
        kind: DeedKind::Street { build_cost, rent },
    }
}

const fn railroad(id: PropertyId, name: &'static str, space: usize) -> Deed {
    Deed {
        id,
        name,
        space,
        cost: RAILROAD_COST,
        color: Color::Railroad,
        kind: DeedKind::Railroad,
    }
}

const fn utility(id: PropertyId, name: &'static str, space: usize) -> Deed {
    Deed {
        id,
        name,
        space,
        cost: UTILITY_COST,
        color: Color::Utility,
        kind: DeedKind::Utility,
    }
}

/// Every ownable property, indexed by `PropertyId` in board order.
pub static DEEDS: [Deed; 28] = [
    street(0, "Mediterranean Avenue", 1, 60, Color::Brown, 50, [2, 10, 30, 90, 160, 250]),
    street(1, "Baltic Avenue", 3, 60, Color::Brown, 50, [4, 20, 60, 180, 320, 450]),
    railroad(2, "Reading Railroad", 5),
    street(3, "Oriental Avenue", 6, 100, Color::LightBlue, 50, [6, 30, 90, 270, 400, 550]),
    street(4, "Vermont Avenue", 8, 100, Color::LightBlue, 50, [6, 30, 90, 270, 400, 550]),
    street(5, "Connecticut Avenue", 9, 120, Color::LightBlue, 50, [8, 40, 100, 300, 450, 600]),
    street(6, "St. Charles Place", 11, 140, Color::Pink, 100, [10, 50, 150, 450, 625, 750]),
    utility(7, "Electric Company", 12),
    street(8, "States Avenue", 13, 140, Color::Pink, 100, [10, 50, 150, 450, 625, 750]),
    street(9, "Virginia Avenue", 14, 160, Color::Pink, 100, [12, 60, 180, 500, 700, 900]),
    railroad(10, "Pennsylvania Railroad", 15),
    street(11, "St. James Place", 16, 180, Color::Orange, 100, [14, 70, 200, 550, 750, 950]),
    street(12, "Tennessee Avenue", 18, 180, Color::Orange, 100, [14, 70, 200, 550, 750, 950]),
    street(13, "New York Avenue", 19, 200, Color::Orange, 100, [16, 80, 220, 600, 800, 1000]),
    street(14, "Kentucky Avenue", 21, 220, Color::Red, 150, [18, 90, 250, 700, 875, 1050]),
    street(15, "Indiana Avenue", 23, 220, Color::Red, 150, [18, 90, 250, 700, 875, 1050]),
    street(16, "Illinois Avenue", 24, 240, Color::Red, 150, [20, 100, 300, 750, 925, 1100]),
    railroad(17, "B. & O. Railroad", 25),
    street(18, "Atlantic Avenue", 26, 260, Color::Yellow, 150, [22, 110, 330, 800, 975, 1150]),
    street(19, "Ventnor Avenue", 27, 260, Color::Yellow, 150, [22, 110, 330, 800, 975, 1150]),
    utility(20, "Water Works", 28),
    street(21, "Marvin Gardens", 29, 280, Color::Yellow, 150, [24, 120, 360, 850, 1025, 1200]),
    street(22, "Pacific Avenue", 31, 300, Color::Green, 200, [26, 130, 390, 900, 1100, 1275]),
    street(23, "North Carolina Avenue", 32, 300, Color::Green, 200, [26, 130, 390, 900, 1100, 1275]),
    street(24, "Pennsylvania Avenue", 34, 320, Color::Green, 200, [28, 150, 450, 1000, 1200, 1400]),
    railroad(25, "Short Line", 35),
    street(26, "Park Place", 37, 350, Color::DarkBlue, 200, [35, 175, 500, 1100, 1300, 1500]),
    street(27, "Boardwalk", 39, 400, Color::DarkBlue, 200, [50, 200, 600, 1400, 1700, 2000]),
];

pub static BOARD: Lazy<[Space; BOARD_SIZE]> = Lazy::new(|| {
    let mut spaces = [Space::FreeParking; BOARD_SIZE];
    for deed in DEEDS.iter() {
        spaces[deed.space] = Space::Deed(deed.id);
    }
    for space in [2, 17, 33] {
        spaces[space] = Space::CommunityChest;
    }
    for space in [7, 22, 36] {
        spaces[space] = Space::Chance;
    }
    spaces[0] = Space::Go;
    spaces[4] = Space::IncomeTax;
    spaces[10] = Space::JustVisiting;
    spaces[30] = Space::GoToJail;
    spaces[38] = Space::LuxuryTax;
    spaces
});

pub fn deed(id: PropertyId) -> &'static Deed {
    &DEEDS[id]
}

pub fn deed_by_name(name: &str) -> Option<&'static Deed> {
    DEEDS.iter().find(|d| d.name.eq_ignore_ascii_case(name.trim()))
}

pub fn deeds_of(color: Color) -> impl Iterator<Item = &'static Deed> {
    DEEDS.iter().filter(move |d| d.color == color)
}

/// Label of a board position, including the off-board jail cell.
pub fn space_label(position: usize) -> &'static str {
    if position == JAIL {
        "Jail"
    } else {
        BOARD[position % BOARD_SIZE].label()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_sizes_match_deed_table() {
        for color in Color::ALL {
            assert_eq!(deeds_of(color).count(), color.group_size(), "{color}");
        }
    }

    #[test]
    fn deeds_sit_on_their_spaces() {
        for deed in DEEDS.iter() {
            assert_eq!(BOARD[deed.space], Space::Deed(deed.id));
        }
        assert_eq!(BOARD[landmarks::BOARDWALK], Space::Deed(27));
        assert_eq!(BOARD[30], Space::GoToJail);
        assert_eq!(BOARD[20], Space::FreeParking);
    }

    #[test]
    fn mortgage_values_truncate() {
        let park_place = deed_by_name("park place").unwrap();
        assert_eq!(park_place.mortgage_amount(), 175);
        assert_eq!(park_place.unmortgage_amount(), 192);
        let baltic = deed(1);
        assert_eq!(baltic.mortgage_amount(), 30);
        assert_eq!(baltic.unmortgage_amount(), 33);
        assert_eq!(deed(2).unmortgage_amount(), 110);
    }
}
