//! Upgrade shop
//!
//! Opened on each level-up. One-time upgrades can be bought once per shop
//! session; consumables can be bought as often as dust allows.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entities::Player;

/// Catalog item identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeId {
    Shield,
    RapidFire,
    Heal,
    Damage,
    Speed,
    Magnet,
}

impl UpgradeId {
    pub const ALL: [UpgradeId; 6] = [
        UpgradeId::Shield,
        UpgradeId::RapidFire,
        UpgradeId::Heal,
        UpgradeId::Damage,
        UpgradeId::Speed,
        UpgradeId::Magnet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UpgradeId::Shield => "shield",
            UpgradeId::RapidFire => "rapid_fire",
            UpgradeId::Heal => "heal",
            UpgradeId::Damage => "damage",
            UpgradeId::Speed => "speed",
            UpgradeId::Magnet => "magnet",
        }
    }
}

impl fmt::Display for UpgradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UpgradeId {
    type Err = PurchaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "shield" => Ok(UpgradeId::Shield),
            "rapid_fire" | "rapidfire" => Ok(UpgradeId::RapidFire),
            "heal" => Ok(UpgradeId::Heal),
            "damage" => Ok(UpgradeId::Damage),
            "speed" => Ok(UpgradeId::Speed),
            "magnet" => Ok(UpgradeId::Magnet),
            _ => Err(PurchaseError::UnknownItem(s.to_string())),
        }
    }
}

/// How often an item may be bought
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeCategory {
    /// Once per shop session
    OneTime,
    /// Any number of times
    Consumable,
}

/// Effect applied to the player on purchase
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpgradeEffect {
    Shield { duration: f32 },
    RapidFire { duration: f32 },
    Heal { amount: f32 },
    DamageMultiplier { multiplier: f32 },
    SpeedMultiplier { multiplier: f32 },
    Magnet { duration: f32 },
}

impl UpgradeEffect {
    pub fn apply(&self, player: &mut Player) {
        match *self {
            UpgradeEffect::Shield { duration } => {
                player.upgrades.shield = true;
                player.upgrades.shield_remaining = duration;
            }
            UpgradeEffect::RapidFire { duration } => {
                player.upgrades.rapid_fire = true;
                player.upgrades.rapid_fire_remaining = duration;
            }
            UpgradeEffect::Heal { amount } => player.heal(amount),
            UpgradeEffect::DamageMultiplier { multiplier } => {
                player.upgrades.damage_multiplier = multiplier;
            }
            UpgradeEffect::SpeedMultiplier { multiplier } => {
                player.upgrades.speed_multiplier = multiplier;
            }
            UpgradeEffect::Magnet { duration } => {
                player.upgrades.magnet = true;
                player.upgrades.magnet_remaining = duration;
            }
        }
    }
}

/// A catalog entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpgradeItem {
    pub id: UpgradeId,
    pub name: &'static str,
    pub description: &'static str,
    pub cost: u64,
    pub category: UpgradeCategory,
    pub effect: UpgradeEffect,
}

pub const CATALOG: [UpgradeItem; 6] = [
    UpgradeItem {
        id: UpgradeId::Shield,
        name: "Energy Shield",
        description: "Absorbs one hit",
        cost: 10,
        category: UpgradeCategory::OneTime,
        effect: UpgradeEffect::Shield { duration: 15.0 },
    },
    UpgradeItem {
        id: UpgradeId::RapidFire,
        name: "Rapid Fire",
        description: "Doubles fire rate for 15s",
        cost: 15,
        category: UpgradeCategory::OneTime,
        effect: UpgradeEffect::RapidFire { duration: 15.0 },
    },
    UpgradeItem {
        id: UpgradeId::Heal,
        name: "Hull Repair",
        description: "Restores 50 health",
        cost: 8,
        category: UpgradeCategory::Consumable,
        effect: UpgradeEffect::Heal { amount: 50.0 },
    },
    UpgradeItem {
        id: UpgradeId::Damage,
        name: "Overcharge",
        description: "Doubles projectile damage",
        cost: 20,
        category: UpgradeCategory::OneTime,
        effect: UpgradeEffect::DamageMultiplier { multiplier: 2.0 },
    },
    UpgradeItem {
        id: UpgradeId::Speed,
        name: "Improved Thrusters",
        description: "Increases speed by 50%",
        cost: 12,
        category: UpgradeCategory::OneTime,
        effect: UpgradeEffect::SpeedMultiplier { multiplier: 1.5 },
    },
    UpgradeItem {
        id: UpgradeId::Magnet,
        name: "Dust Magnet",
        description: "Pulls nearby dust for 20s",
        cost: 25,
        category: UpgradeCategory::OneTime,
        effect: UpgradeEffect::Magnet { duration: 20.0 },
    },
];

/// Look up a catalog entry
pub fn catalog_item(id: UpgradeId) -> &'static UpgradeItem {
    match id {
        UpgradeId::Shield => &CATALOG[0],
        UpgradeId::RapidFire => &CATALOG[1],
        UpgradeId::Heal => &CATALOG[2],
        UpgradeId::Damage => &CATALOG[3],
        UpgradeId::Speed => &CATALOG[4],
        UpgradeId::Magnet => &CATALOG[5],
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PurchaseError {
    #[error("unknown shop item: {0}")]
    UnknownItem(String),
    #[error("insufficient dust: {item} costs {cost}, have {available}")]
    InsufficientFunds {
        item: UpgradeId,
        cost: u64,
        available: u64,
    },
    #[error("{0} already purchased this session")]
    AlreadyPurchased(UpgradeId),
    #[error("shop is closed")]
    ShopClosed,
}

/// One line of the shop listing
#[derive(Debug, Clone, PartialEq)]
pub struct ShopOffer {
    pub item: &'static UpgradeItem,
    pub affordable: bool,
    pub purchased: bool,
}

impl ShopOffer {
    pub fn available(&self) -> bool {
        self.affordable && !self.purchased
    }
}

/// Purchase window state, reset each time the shop opens
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShopSession {
    purchased: Vec<UpgradeId>,
}

impl ShopSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh session
    pub fn open(&mut self) {
        self.purchased.clear();
    }

    pub fn is_purchased(&self, id: UpgradeId) -> bool {
        self.purchased.contains(&id)
    }

    pub fn purchased(&self) -> &[UpgradeId] {
        &self.purchased
    }

    /// Buy an item. On failure nothing changes.
    ///
    /// Returns the dust spent.
    pub fn purchase(
        &mut self,
        id: UpgradeId,
        player: &mut Player,
        dust: &mut u64,
    ) -> Result<u64, PurchaseError> {
        let item = catalog_item(id);

        if *dust < item.cost {
            return Err(PurchaseError::InsufficientFunds {
                item: id,
                cost: item.cost,
                available: *dust,
            });
        }
        if item.category == UpgradeCategory::OneTime && self.is_purchased(id) {
            return Err(PurchaseError::AlreadyPurchased(id));
        }

        item.effect.apply(player);
        *dust -= item.cost;
        if item.category == UpgradeCategory::OneTime {
            self.purchased.push(id);
        }
        log::debug!("Purchased {} for {} dust ({} left)", id, item.cost, dust);
        Ok(item.cost)
    }

    /// Current listing for the shop screen
    pub fn offers(&self, dust: u64) -> Vec<ShopOffer> {
        CATALOG
            .iter()
            .map(|item| ShopOffer {
                item,
                affordable: dust >= item.cost,
                purchased: item.category == UpgradeCategory::OneTime
                    && self.is_purchased(item.id),
            })
            .collect()
    }
}
