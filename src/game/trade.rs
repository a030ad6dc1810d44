use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::board;
use crate::types::{Money, PlayerId, PropertyId};

/// One side's contribution to a trade.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TradeBundle {
    pub properties: Vec<PropertyId>,
    pub money: Money,
    pub jail_cards: u32,
}

impl TradeBundle {
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty() && self.money == 0 && self.jail_cards == 0
    }

    fn canonical_text(&self) -> String {
        let names = self
            .properties
            .iter()
            .sorted()
            .map(|id| board::deed(*id).name)
            .join(",");
        format!("[{names}]${}#{}", self.money, self.jail_cards)
    }
}

impl fmt::Display for TradeBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = vec![];
        if !self.properties.is_empty() {
            parts.push(
                self.properties
                    .iter()
                    .map(|id| board::deed(*id).name)
                    .join(", "),
            );
        }
        if self.money > 0 {
            parts.push(format!("${}", self.money));
        }
        if self.jail_cards > 0 {
            parts.push(format!("{} get out of jail free card(s)", self.jail_cards));
        }
        if parts.is_empty() {
            return write!(f, "nothing");
        }
        write!(f, "{}", parts.join(" + "))
    }
}

/// Directional proposal: the initiator gives `initiator_bundle` and asks for
/// `recipient_bundle`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TradeOffer {
    pub initiator: PlayerId,
    pub recipient: PlayerId,
    pub initiator_bundle: TradeBundle,
    pub recipient_bundle: TradeBundle,
}

impl TradeOffer {
    pub fn new(initiator: PlayerId, recipient: PlayerId) -> Self {
        Self {
            initiator,
            recipient,
            initiator_bundle: TradeBundle::default(),
            recipient_bundle: TradeBundle::default(),
        }
    }

    pub fn offering(mut self, properties: impl IntoIterator<Item = PropertyId>) -> Self {
        self.initiator_bundle.properties.extend(properties);
        self
    }

    pub fn requesting(mut self, properties: impl IntoIterator<Item = PropertyId>) -> Self {
        self.recipient_bundle.properties.extend(properties);
        self
    }

    pub fn bundle_of(&self, player: PlayerId) -> Option<&TradeBundle> {
        if player == self.initiator {
            Some(&self.initiator_bundle)
        } else if player == self.recipient {
            Some(&self.recipient_bundle)
        } else {
            None
        }
    }

    /// Key for the declined-offer registry. Property order inside a bundle
    /// does not matter.
    pub fn canonical_text(&self) -> String {
        format!(
            "{}>{}:{}|{}",
            self.initiator,
            self.recipient,
            self.initiator_bundle.canonical_text(),
            self.recipient_bundle.canonical_text()
        )
    }
}

impl fmt::Display for TradeOffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "player {} offers {} for {} from player {}",
            self.initiator + 1,
            self.initiator_bundle,
            self.recipient_bundle,
            self.recipient + 1
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_text_ignores_property_order() {
        let a = TradeOffer::new(0, 1).offering([3, 5]).requesting([27]);
        let b = TradeOffer::new(0, 1).offering([5, 3]).requesting([27]);
        assert_eq!(a.canonical_text(), b.canonical_text());

        let mut c = b.clone();
        c.initiator_bundle.money = 100;
        assert_ne!(a.canonical_text(), c.canonical_text());
        assert_ne!(
            a.canonical_text(),
            TradeOffer::new(1, 0).offering([3, 5]).requesting([27]).canonical_text()
        );
    }

    #[test]
    fn bundle_display_lists_everything_offered() {
        let mut offer = TradeOffer::new(0, 1).offering([0]);
        offer.initiator_bundle.money = 100;
        assert_eq!(
            offer.to_string(),
            "player 1 offers Mediterranean Avenue + $100 for nothing from player 2"
        );
    }
}
