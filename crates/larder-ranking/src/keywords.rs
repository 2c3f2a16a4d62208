// ABOUTME: Keyword lists behind the non-food, basic-food and processed-food classifiers
// ABOUTME: Built-in defaults plus an optional JSON override loaded once at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Classifier keyword lists
//!
//! Matching is a case-insensitive substring test against the food name, so every term
//! here must avoid appearing inside ordinary food names ("cup" would catch "cupcake",
//! "collar" would catch "collard greens", "pie" would catch "chicken pieces").

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use larder_core::errors::{AppError, AppResult};

/// Gift, kitchenware, apparel, electronics, media, toy and office-supply terms
pub const NON_FOOD_KEYWORDS: &[&str] = &[
    // drinkware and kitchenware
    "mug",
    "coffee mug",
    "tumbler",
    "thermos",
    "water bottle holder",
    "coaster",
    "placemat",
    "spatula",
    "ladle",
    "grater",
    "colander",
    "cutting board",
    "knife set",
    "chef knife",
    "scissors",
    "tupperware",
    "lunchbox",
    "lunch box",
    "ice cube tray",
    "oven mitt",
    "apron",
    "blender",
    "food processor",
    "measuring spoon",
    "measuring cup",
    "cookware",
    "bakeware",
    // apparel and accessories
    "t-shirt",
    "tshirt",
    "shirt",
    "hoodie",
    "sweater",
    "jacket",
    "socks",
    "beanie",
    "scarf",
    "glove",
    "costume",
    "necklace",
    "bracelet",
    "earring",
    "jewelry",
    "keychain",
    "keyring",
    "lanyard",
    "wallet",
    "backpack",
    "tote",
    "umbrella",
    // electronics
    "phone case",
    "charger",
    "usb",
    "headphone",
    "earbud",
    "speaker",
    "laptop",
    "keyboard",
    "mousepad",
    "mouse pad",
    "flash drive",
    "calculator",
    "printer",
    "ink cartridge",
    // media
    "dvd",
    "blu-ray",
    "vinyl",
    "paperback",
    "hardcover",
    "cookbook",
    "poster",
    "calendar",
    // toys and games
    "toy",
    "plush",
    "puzzle",
    "jigsaw",
    "lego",
    "board game",
    "video game",
    "playing cards",
    "frisbee",
    "figurine",
    "action figure",
    // office and stationery
    "notebook",
    "pencil",
    "stapler",
    "eraser",
    "crayon",
    "highlighter",
    "binder",
    "envelope",
    "stationery",
    "sticker",
    "bookmark",
    // home, gifts and personal care
    "candle",
    "diffuser",
    "ornament",
    "magnet",
    "picture frame",
    "vase",
    "towel",
    "blanket",
    "pillow",
    "gift card",
    "shampoo",
    "conditioner",
    "lotion",
    "toothpaste",
    "deodorant",
    "perfume",
    "cologne",
    "detergent",
    // pets
    "dog toy",
    "cat toy",
    "leash",
    "cat litter",
    "aquarium",
];

/// Unprocessed staples: fruits, vegetables, proteins, dairy, grains, nuts and seeds
pub const BASIC_FOOD_KEYWORDS: &[&str] = &[
    // fruits
    "apple",
    "banana",
    "orange",
    "strawberr",
    "blueberr",
    "raspberr",
    "blackberr",
    "grape",
    "pear",
    "peach",
    "plum",
    "cherr",
    "mango",
    "pineapple",
    "watermelon",
    "melon",
    "lemon",
    "lime",
    "kiwi",
    "avocado",
    // vegetables
    "tomato",
    "potato",
    "carrot",
    "broccoli",
    "spinach",
    "kale",
    "lettuce",
    "cucumber",
    "onion",
    "garlic",
    "celery",
    "cabbage",
    "cauliflower",
    "zucchini",
    "mushroom",
    "asparagus",
    "bell pepper",
    "green bean",
    "lentil",
    "chickpea",
    "black bean",
    // proteins
    "chicken",
    "beef",
    "pork",
    "turkey",
    "lamb",
    "salmon",
    "tuna",
    "cod",
    "shrimp",
    "egg",
    "tofu",
    // dairy
    "milk",
    "yogurt",
    "cottage cheese",
    // grains
    "oats",
    "oatmeal",
    "rice",
    "brown rice",
    "quinoa",
    "barley",
    "buckwheat",
    // nuts and seeds
    "almond",
    "walnut",
    "cashew",
    "peanut",
    "pecan",
    "pistachio",
    "hazelnut",
    "chia",
    "flax",
    "sunflower seed",
    "pumpkin seed",
];

/// Processed-food nouns and label adjectives
pub const PROCESSED_FOOD_KEYWORDS: &[&str] = &[
    // nouns
    "soda",
    "cola",
    "candy",
    "candy bar",
    "protein bar",
    "granola bar",
    "chips",
    "crisps",
    "cookie",
    "cake",
    "donut",
    "doughnut",
    "pastry",
    "muffin",
    "brownie",
    "cracker",
    "pretzel",
    "chocolate",
    "ice cream",
    "pizza",
    "burger",
    "hot dog",
    "sausage",
    "bacon",
    "jerky",
    "nugget",
    "fries",
    "juice",
    "nectar",
    "smoothie",
    "energy drink",
    "sports drink",
    "syrup",
    "sauce",
    "dressing",
    "ketchup",
    "mayonnaise",
    "margarine",
    "spread",
    "pudding",
    "jelly",
    "ramen",
    "mac and cheese",
    "snack",
    "puffs",
    // label adjectives
    "canned",
    "frozen",
    "instant",
    "microwave",
    "low-fat",
    "fat-free",
    "reduced-fat",
    "sugar-free",
    "fortified",
    "enriched",
    "flavored",
    "sweetened",
    "breaded",
    "battered",
    "fried",
    "glazed",
    "frosted",
    "processed",
];

/// The three keyword lists, loaded once and shared by the classifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordLists {
    /// Terms that mark a candidate as not a food
    pub non_food: Vec<String>,
    /// Terms that mark a candidate (or query) as a basic staple
    pub basic: Vec<String>,
    /// Terms that mark a candidate as processed
    pub processed: Vec<String>,
}

impl Default for KeywordLists {
    fn default() -> Self {
        Self {
            non_food: owned(NON_FOOD_KEYWORDS),
            basic: owned(BASIC_FOOD_KEYWORDS),
            processed: owned(PROCESSED_FOOD_KEYWORDS),
        }
    }
}

/// On-disk override; any list left out keeps its built-in default
#[derive(Debug, Deserialize)]
struct KeywordOverrides {
    #[serde(default, alias = "nonFood")]
    non_food: Option<Vec<String>>,
    #[serde(default)]
    basic: Option<Vec<String>>,
    #[serde(default)]
    processed: Option<Vec<String>>,
}

impl KeywordLists {
    /// Build lists from explicit terms
    pub fn new(
        non_food: impl IntoIterator<Item = impl Into<String>>,
        basic: impl IntoIterator<Item = impl Into<String>>,
        processed: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            non_food: non_food.into_iter().map(Into::into).collect(),
            basic: basic.into_iter().map(Into::into).collect(),
            processed: processed.into_iter().map(Into::into).collect(),
        }
    }

    /// Load lists from a JSON object with optional `non_food`, `basic` and `processed` arrays
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file cannot be read or parsed
    pub fn from_json_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::config(format!("cannot read keyword lists {}: {e}", path.display()))
        })?;
        Self::from_json_str(&raw)
            .map_err(|e| AppError::config(format!("{}: {}", path.display(), e.message)))
    }

    /// Parse lists from JSON text
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the text is not a valid keyword override object
    pub fn from_json_str(raw: &str) -> AppResult<Self> {
        let overrides: KeywordOverrides = serde_json::from_str(raw)
            .map_err(|e| AppError::config(format!("invalid keyword lists: {e}")))?;
        let defaults = Self::default();
        let lists = Self {
            non_food: overrides.non_food.unwrap_or(defaults.non_food),
            basic: overrides.basic.unwrap_or(defaults.basic),
            processed: overrides.processed.unwrap_or(defaults.processed),
        };
        info!(
            non_food = lists.non_food.len(),
            basic = lists.basic.len(),
            processed = lists.processed.len(),
            "Loaded keyword lists"
        );
        Ok(lists)
    }
}

fn owned(terms: &[&str]) -> Vec<String> {
    terms.iter().map(|t| (*t).to_owned()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_list_sizes() {
        assert!(NON_FOOD_KEYWORDS.len() >= 80);
        assert!(BASIC_FOOD_KEYWORDS.len() >= 50);
        assert!(PROCESSED_FOOD_KEYWORDS.len() >= 40);
    }

    #[test]
    fn test_non_food_terms_do_not_hit_common_foods() {
        let foods = [
            "cupcake",
            "collard greens",
            "chicken pieces",
            "vegetable soup",
            "kettle cooked chips",
            "capers",
            "string cheese",
            "casein protein",
            "bagel",
            "herring",
            "graham crackers",
        ];
        for food in foods {
            for term in NON_FOOD_KEYWORDS {
                assert!(!food.contains(term), "{term} matched {food}");
            }
        }
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let lists = KeywordLists::from_json_str(r#"{"basic": ["kohlrabi"]}"#).unwrap();
        assert_eq!(lists.basic, vec!["kohlrabi".to_owned()]);
        assert_eq!(lists.non_food.len(), NON_FOOD_KEYWORDS.len());
    }

    #[test]
    fn test_invalid_override_is_config_error() {
        assert!(KeywordLists::from_json_str("[1, 2]").is_err());
    }
}
