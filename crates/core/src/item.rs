//! Catalogue item types, the fixed category table, and write-side rules
//! (id generation, legacy image folding, input validation).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Maximum number of image URLs per item.
pub const MAX_IMAGES: usize = 10;

/// Maximum number of video URLs per item.
pub const MAX_VIDEOS: usize = 5;

/// Minimum number of digits in the sequence part of a generated item id.
const ID_SEQUENCE_WIDTH: usize = 3;

// ---------------------------------------------------------------------------
// Category table
// ---------------------------------------------------------------------------

/// Fixed main-category enumeration as `(name, id code)` pairs.
///
/// The code is the prefix of every item id in that category.
pub const CATEGORIES: &[(&str, &str)] = &[
    ("Rings", "RNG"),
    ("Earrings", "EAR"),
    ("Necklaces", "NCK"),
    ("Pendants", "PND"),
    ("Bangles", "BNG"),
    ("Bracelets", "BRC"),
    ("Chains", "CHN"),
    ("Mangalsutra", "MNG"),
    ("Nose Pins", "NSP"),
    ("Anklets", "ANK"),
    ("Custom", "CUS"),
];

/// Look up the id code for a main category name.
pub fn category_code(main: &str) -> Option<&'static str> {
    CATEGORIES
        .iter()
        .find(|(name, _)| *name == main)
        .map(|(_, code)| *code)
}

/// Item category: a main category from [`CATEGORIES`] and an optional
/// free-form sub-category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Category {
    #[validate(length(min = 1))]
    pub main: String,
    #[serde(default)]
    pub sub: Option<String>,
}

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    #[serde(rename = "festival")]
    Festival,
    #[serde(rename = "lightweight")]
    Lightweight,
    #[serde(rename = "daily wear")]
    DailyWear,
    #[serde(rename = "fancy")]
    Fancy,
    #[default]
    #[serde(rename = "normal")]
    Normal,
}

impl ItemType {
    pub const ALL: [ItemType; 5] = [
        ItemType::Festival,
        ItemType::Lightweight,
        ItemType::DailyWear,
        ItemType::Fancy,
        ItemType::Normal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ItemType::Festival => "festival",
            ItemType::Lightweight => "lightweight",
            ItemType::DailyWear => "daily wear",
            ItemType::Fancy => "fancy",
            ItemType::Normal => "normal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metal {
    #[serde(rename = "gold")]
    Gold,
    #[serde(rename = "silver")]
    Silver,
    #[serde(rename = "diamond")]
    Diamond,
    #[serde(rename = "platinum")]
    Platinum,
    #[serde(rename = "rose gold")]
    RoseGold,
}

impl Metal {
    pub const ALL: [Metal; 5] = [
        Metal::Gold,
        Metal::Silver,
        Metal::Diamond,
        Metal::Platinum,
        Metal::RoseGold,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Metal::Gold => "gold",
            Metal::Silver => "silver",
            Metal::Diamond => "diamond",
            Metal::Platinum => "platinum",
            Metal::RoseGold => "rose gold",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Men,
    Women,
    #[default]
    Unisex,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Men, Gender::Women, Gender::Unisex];

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Men => "Men",
            Gender::Women => "Women",
            Gender::Unisex => "Unisex",
        }
    }
}

/// Gold purity. Serialized as the bare number (`22` or `18`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Carat {
    K22,
    K18,
}

impl Carat {
    pub fn value(self) -> u8 {
        match self {
            Carat::K22 => 22,
            Carat::K18 => 18,
        }
    }
}

impl TryFrom<u8> for Carat {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            22 => Ok(Carat::K22),
            18 => Ok(Carat::K18),
            other => Err(CoreError::Validation(format!(
                "Unsupported carat {other}, expected 22 or 18"
            ))),
        }
    }
}

impl From<Carat> for u8 {
    fn from(carat: Carat) -> Self {
        carat.value()
    }
}

/// Parse one of the string-valued enums by its wire name.
fn parse_named<T: Copy>(
    all: &[T],
    name: fn(T) -> &'static str,
    kind: &str,
    s: &str,
) -> Result<T, CoreError> {
    all.iter()
        .copied()
        .find(|v| name(*v) == s)
        .ok_or_else(|| CoreError::Validation(format!("Unknown {kind} '{s}'")))
}

impl FromStr for ItemType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named(&ItemType::ALL, ItemType::as_str, "item type", s)
    }
}

impl FromStr for Metal {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named(&Metal::ALL, Metal::as_str, "metal", s)
    }
}

impl FromStr for Gender {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named(&Gender::ALL, Gender::as_str, "gender", s)
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Metal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Item
// ---------------------------------------------------------------------------

fn default_true() -> bool {
    true
}

/// One catalogue entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub name: String,
    pub category: Category,
    #[serde(rename = "type", default)]
    pub item_type: ItemType,
    pub metal: Metal,
    pub carat: Carat,
    /// Weight in grams.
    pub weight: f64,
    #[serde(default)]
    pub stone_weight: Option<f64>,
    #[serde(default)]
    pub gender: Gender,
    /// Legacy single image; always also present in `images`.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub videos: Vec<String>,
    #[serde(default = "default_true")]
    pub is_our_design: bool,
    #[serde(alias = "date")]
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(default)]
    pub click_count: i64,
    #[serde(default)]
    pub order_no: Option<i32>,
}

impl Item {
    /// Whether the item carries a stone (non-zero stone weight).
    pub fn has_stone(&self) -> bool {
        self.stone_weight.is_some_and(|w| w > 0.0)
    }
}

/// Admin payload for creating or overwriting an item.
///
/// The id is never part of the payload: it is generated on create and
/// immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ItemInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(nested)]
    pub category: Category,
    #[serde(rename = "type", default)]
    pub item_type: ItemType,
    pub metal: Metal,
    pub carat: Carat,
    #[validate(range(min = 0.0))]
    pub weight: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub stone_weight: Option<f64>,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    #[validate(length(max = 10))]
    pub images: Vec<String>,
    #[serde(default)]
    #[validate(length(max = 5))]
    pub videos: Vec<String>,
    #[serde(default = "default_true")]
    pub is_our_design: bool,
    #[serde(default)]
    pub order_no: Option<i32>,
}

impl ItemInput {
    /// Validate and normalize an admin payload before it is written.
    ///
    /// - Runs the field-level `validator` rules.
    /// - Requires `category.main` to be a known category.
    /// - Trims `name`; blank `category.sub` / `image` become `None`.
    /// - Folds the legacy `image` into `images[0]` and re-checks the limit.
    pub fn into_validated(mut self) -> Result<Self, CoreError> {
        self.validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;

        if !self.weight.is_finite() {
            return Err(CoreError::Validation("weight must be a finite number".into()));
        }
        if category_code(&self.category.main).is_none() {
            return Err(CoreError::Validation(format!(
                "Unknown category '{}'",
                self.category.main
            )));
        }

        self.name = self.name.trim().to_string();
        if self.name.is_empty() {
            return Err(CoreError::Validation("name must not be blank".into()));
        }
        self.category.sub = non_blank(self.category.sub.take());
        self.image = non_blank(self.image.take());

        fold_legacy_image(self.image.as_deref(), &mut self.images);
        if self.images.len() > MAX_IMAGES {
            return Err(CoreError::Validation(format!(
                "at most {MAX_IMAGES} images are allowed"
            )));
        }
        if self.videos.len() > MAX_VIDEOS {
            return Err(CoreError::Validation(format!(
                "at most {MAX_VIDEOS} videos are allowed"
            )));
        }
        Ok(self)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Write-side helpers
// ---------------------------------------------------------------------------

/// Ensure the legacy single `image` appears in `images`, inserting it at the
/// front when missing.
pub fn fold_legacy_image(image: Option<&str>, images: &mut Vec<String>) {
    if let Some(image) = image {
        if !images.iter().any(|i| i == image) {
            images.insert(0, image.to_string());
        }
    }
}

/// Generate the next item id for a category code.
///
/// Takes the highest numeric suffix among `existing` ids that start with
/// `code` and adds one. Ids whose suffix is not purely numeric are ignored.
/// Fails with [`CoreError::Conflict`] once the sequence cannot grow further.
///
/// # Examples
///
/// ```
/// use catalog_core::item::next_item_id;
///
/// assert_eq!(next_item_id("EAR", &[]).unwrap(), "EAR001");
/// let existing = vec!["EAR001".to_string(), "EAR007".to_string()];
/// assert_eq!(next_item_id("EAR", &existing).unwrap(), "EAR008");
/// ```
pub fn next_item_id(code: &str, existing: &[String]) -> Result<String, CoreError> {
    let highest = existing
        .iter()
        .filter_map(|id| id.strip_prefix(code))
        .filter(|suffix| !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()))
        .filter_map(|suffix| suffix.parse::<u64>().ok())
        .max()
        .unwrap_or(0);

    let next = highest
        .checked_add(1)
        .ok_or_else(|| CoreError::Conflict(format!("Id sequence for {code} is exhausted")))?;

    Ok(format!("{code}{next:0width$}", width = ID_SEQUENCE_WIDTH))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
