use crate::PreviewError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two interchangeable card layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CardType {
    #[default]
    #[serde(rename = "Type 1")]
    TypeOne,
    /// Twitter-style large summary card.
    #[serde(rename = "Type 2")]
    TypeTwo,
}

impl CardType {
    pub const ALL: [CardType; 2] = [CardType::TypeOne, CardType::TypeTwo];

    pub fn label(self) -> &'static str {
        match self {
            CardType::TypeOne => "Type 1",
            CardType::TypeTwo => "Type 2",
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CardType {
    type Err = PreviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "type 1" | "type1" | "1" => Ok(CardType::TypeOne),
            "type 2" | "type2" | "2" | "twitter" => Ok(CardType::TypeTwo),
            other => Err(PreviewError::InvalidConfiguration(format!(
                "Unknown card type: {other}"
            ))),
        }
    }
}

/// Keys accepted by [`Customization::set_field`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomizationField {
    CardWidth,
    CardHeight,
    CardRadius,
    ImageRadius,
}

impl CustomizationField {
    pub fn key(self) -> &'static str {
        match self {
            CustomizationField::CardWidth => "cardWidth",
            CustomizationField::CardHeight => "cardHeight",
            CustomizationField::CardRadius => "cardRadius",
            CustomizationField::ImageRadius => "imageRadius",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "cardWidth" => Some(CustomizationField::CardWidth),
            "cardHeight" => Some(CustomizationField::CardHeight),
            "cardRadius" => Some(CustomizationField::CardRadius),
            "imageRadius" => Some(CustomizationField::ImageRadius),
            _ => None,
        }
    }
}

/// Sizing and rounding applied to the rendered card.
///
/// A `card_height` of 0 lets the card grow to fit its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customization {
    pub card_width: u32,
    pub card_height: u32,
    pub card_radius: u32,
    pub image_radius: u32,
}

impl Default for Customization {
    fn default() -> Self {
        Self::for_card_type(CardType::TypeOne)
    }
}

impl Customization {
    pub fn for_card_type(card_type: CardType) -> Self {
        match card_type {
            CardType::TypeOne => Self {
                card_width: 300,
                card_height: 0,
                card_radius: 15,
                image_radius: 7,
            },
            CardType::TypeTwo => Self {
                card_width: 600,
                card_height: 0,
                card_radius: 35,
                image_radius: 0,
            },
        }
    }

    /// Switches to the defaults of `card_type`. The height goes back to auto.
    pub fn apply_card_type(&mut self, card_type: CardType) {
        *self = Self::for_card_type(card_type);
    }

    pub fn set(&mut self, field: CustomizationField, value: u32) {
        match field {
            CustomizationField::CardWidth => self.card_width = value,
            CustomizationField::CardHeight => self.card_height = value,
            CustomizationField::CardRadius => self.card_radius = value,
            CustomizationField::ImageRadius => self.image_radius = value,
        }
    }

    /// Overwrites the field named `key`. Unknown keys leave the record
    /// untouched and return `false`.
    pub fn set_field(&mut self, key: &str, value: u32) -> bool {
        match CustomizationField::from_key(key) {
            Some(field) => {
                self.set(field, value);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, field: CustomizationField) -> u32 {
        match field {
            CustomizationField::CardWidth => self.card_width,
            CustomizationField::CardHeight => self.card_height,
            CustomizationField::CardRadius => self.card_radius,
            CustomizationField::ImageRadius => self.image_radius,
        }
    }

    pub fn is_auto_height(&self) -> bool {
        self.card_height == 0
    }
}
