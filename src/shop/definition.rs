//! Shop Definition Structures
//!
//! Static shop configuration (what a shop sells and which factors weight it)
//! and the generated stock it currently offers.

use serde::{Deserialize, Serialize};

use crate::data::ItemKind;
use crate::note::PARAM_COUNT;

// ============================================================================
// Categories
// ============================================================================

/// Which item tables a shop draws its stock from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShopCategory {
    Items,
    #[serde(alias = "wep")]
    Weapons,
    #[serde(alias = "arm")]
    Armor,
    #[serde(alias = "wepnitem")]
    WeaponsItems,
    #[serde(alias = "armnitem")]
    ArmorItems,
    #[serde(alias = "wepnarm")]
    WeaponsArmor,
    All,
}

impl ShopCategory {
    /// Tables making up this category, in generation order
    pub fn kinds(&self) -> &'static [ItemKind] {
        match self {
            ShopCategory::Items => &[ItemKind::Item],
            ShopCategory::Weapons => &[ItemKind::Weapon],
            ShopCategory::Armor => &[ItemKind::Armor],
            ShopCategory::WeaponsItems => &[ItemKind::Item, ItemKind::Weapon],
            ShopCategory::ArmorItems => &[ItemKind::Item, ItemKind::Armor],
            ShopCategory::WeaponsArmor => &[ItemKind::Weapon, ItemKind::Armor],
            ShopCategory::All => &ItemKind::ALL,
        }
    }
}

// ============================================================================
// Weight Factors
// ============================================================================

/// A modifier that shifts every item's appearance chance in a shop.
///
/// Written in config as `"level"`, `"param7"`, `"switch1"` or `"variable2"`
/// (a `:` between name and number is also accepted).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum WeightFactor {
    /// Chance rises as the party average level nears the item's target level
    Level,
    /// Chance rises as the party average of a param nears the item's target
    Param(usize),
    /// Adds the switch rate while the switch is on
    Switch(u32),
    /// Adds the variable's current value
    Variable(u32),
}

impl TryFrom<String> for WeightFactor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let text = value.trim().trim_start_matches(':').to_ascii_lowercase();
        if text == "level" {
            return Ok(WeightFactor::Level);
        }

        let split = text
            .find(|c: char| c.is_ascii_digit() || c == ':')
            .ok_or_else(|| format!("unknown shop factor {:?}", value))?;
        let (name, number) = text.split_at(split);
        let number: u32 = number
            .trim_start_matches(':')
            .parse()
            .map_err(|_| format!("invalid number in shop factor {:?}", value))?;

        match name {
            "param" if (number as usize) < PARAM_COUNT => Ok(WeightFactor::Param(number as usize)),
            "param" => Err(format!("param {number} must be below {PARAM_COUNT}")),
            "switch" => Ok(WeightFactor::Switch(number)),
            "variable" => Ok(WeightFactor::Variable(number)),
            _ => Err(format!("unknown shop factor {:?}", value)),
        }
    }
}

impl From<WeightFactor> for String {
    fn from(factor: WeightFactor) -> Self {
        match factor {
            WeightFactor::Level => "level".to_string(),
            WeightFactor::Param(index) => format!("param{}", index),
            WeightFactor::Switch(id) => format!("switch{}", id),
            WeightFactor::Variable(id) => format!("variable{}", id),
        }
    }
}

// ============================================================================
// Shop Definition
// ============================================================================

/// A shop definition, immutable once loaded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopDefinition {
    pub id: u32,
    #[serde(default)]
    pub display_name: String,
    pub category: ShopCategory,
    #[serde(default)]
    pub factors: Vec<WeightFactor>,
}

impl ShopDefinition {
    pub fn has_factor(&self, factor: WeightFactor) -> bool {
        self.factors.contains(&factor)
    }
}

// ============================================================================
// Stock
// ============================================================================

/// One purchasable item reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StockEntry {
    pub kind: ItemKind,
    pub item_id: u32,
}

impl StockEntry {
    /// The host shop scene's goods tuple: (type, id, price type, price).
    /// Price type 0 means the database price is used.
    pub fn goods(&self) -> [u32; 4] {
        [self.kind.code() as u32, self.item_id, 0, 0]
    }
}

/// Generated stock of one shop, replaced wholesale on every reset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShopStock {
    pub entries: Vec<StockEntry>,
}

impl ShopStock {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StockEntry> {
        self.entries.iter()
    }

    pub fn contains(&self, kind: ItemKind, item_id: u32) -> bool {
        self.entries
            .iter()
            .any(|e| e.kind == kind && e.item_id == item_id)
    }

    pub fn goods(&self) -> Vec<[u32; 4]> {
        self.entries.iter().map(StockEntry::goods).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shop() {
        let toml_str = r#"
            id = 1
            display_name = "Weapon Smith"
            category = "wep"
            factors = ["variable2", "param:7", "switch1", "level"]
        "#;

        let shop: ShopDefinition = toml::from_str(toml_str).unwrap();
        assert_eq!(shop.id, 1);
        assert_eq!(shop.category, ShopCategory::Weapons);
        assert_eq!(
            shop.factors,
            vec![
                WeightFactor::Variable(2),
                WeightFactor::Param(7),
                WeightFactor::Switch(1),
                WeightFactor::Level,
            ]
        );
        assert!(shop.has_factor(WeightFactor::Level));
        assert!(!shop.has_factor(WeightFactor::Switch(2)));
    }

    #[test]
    fn test_shop_defaults() {
        let shop: ShopDefinition = toml::from_str("id = 3\ncategory = \"all\"").unwrap();
        assert!(shop.factors.is_empty());
        assert_eq!(shop.display_name, "");
        assert_eq!(shop.category.kinds(), &ItemKind::ALL);
    }

    #[test]
    fn test_factor_errors() {
        assert!(WeightFactor::try_from("param8".to_string()).is_err());
        assert!(WeightFactor::try_from("bogus3".to_string()).is_err());
        assert!(WeightFactor::try_from("switch".to_string()).is_err());
        assert!(WeightFactor::try_from("levels".to_string()).is_err());
        assert_eq!(
            WeightFactor::try_from(":Switch12".to_string()),
            Ok(WeightFactor::Switch(12))
        );
    }

    #[test]
    fn test_factor_display_form() {
        assert_eq!(String::from(WeightFactor::Param(3)), "param3");
        assert_eq!(String::from(WeightFactor::Level), "level");
    }

    #[test]
    fn test_category_tables() {
        let armor_items = ShopCategory::ArmorItems.kinds();
        assert_eq!(armor_items, &[ItemKind::Item, ItemKind::Armor]);
        let weapons_armor = ShopCategory::WeaponsArmor.kinds();
        assert_eq!(weapons_armor, &[ItemKind::Weapon, ItemKind::Armor]);
    }

    #[test]
    fn test_goods_tuple() {
        let entry = |kind, item_id| StockEntry { kind, item_id };
        let stock = ShopStock {
            entries: vec![entry(ItemKind::Armor, 5), entry(ItemKind::Item, 1)],
        };
        assert_eq!(stock.goods(), vec![[2, 5, 0, 0], [0, 1, 0, 0]]);
        assert!(stock.contains(ItemKind::Armor, 5));
        assert!(!stock.contains(ItemKind::Weapon, 5));
    }
}
