use derive_more::{AsRef, Deref, Display, From, Into};
use palette::Srgb;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    Deref,
    From,
    Into,
    AsRef,
)]
#[serde(transparent)]
pub struct ItemId(String);

crate::impl_string_newtype!(ItemId);

impl ItemId {
    /// Id of the ring copy made when this palette item is dropped on the ring.
    pub fn namespaced(&self, prefix: &str) -> Self {
        Self(format!("{prefix}{}", self.0))
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct Label(String);

crate::impl_string_newtype!(Label);

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct IconName(String);

crate::impl_string_newtype!(IconName);

/// Opaque action token executed when the menu entry is chosen.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    Deref,
    From,
    Into,
    AsRef,
)]
#[serde(transparent)]
pub struct CommandToken(String);

crate::impl_string_newtype!(CommandToken);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid colour '{input}': expected #rgb or #rrggbb")]
pub struct ColorParseError {
    input: String,
}

/// Accent colour of an item, written as `#rrggbb` or `#rgb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, DeserializeFromStr, SerializeDisplay)]
pub struct ItemColor(Srgb<u8>);

impl ItemColor {
    pub fn rgb(&self) -> Srgb<u8> {
        self.0
    }
}

impl FromStr for ItemColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ColorParseError {
            input: s.to_string(),
        };
        if !s.starts_with('#') {
            return Err(err());
        }
        Srgb::<u8>::from_str(s).map(Self).map_err(|_| err())
    }
}

impl fmt::Display for ItemColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Srgb {
            red, green, blue, ..
        } = self.0;
        write!(f, "#{red:02x}{green:02x}{blue:02x}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: ItemId,
    pub label: Label,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ItemColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<IconName>,
    #[serde(default)]
    pub command: CommandToken,
}

impl MenuItem {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(id),
            label: Label::new(label),
            color: None,
            icon: None,
            command: CommandToken::default(),
        }
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = CommandToken::new(command);
        self
    }

    /// Copy placed on the ring; everything but the id is shared with the
    /// palette original.
    pub fn clone_for_ring(&self, prefix: &str) -> Self {
        Self {
            id: self.id.namespaced(prefix),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuConfiguration {
    pub name: String,
    #[serde(default)]
    pub command: CommandToken,
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

impl MenuConfiguration {
    pub fn position(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.position(id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_for_ring_namespaces_id_only() {
        let palette = MenuItem::new("7", "Settings").with_command("app:settings");
        let ring = palette.clone_for_ring("radMenu-");
        assert_eq!(ring.id.as_str(), "radMenu-7");
        assert_eq!(ring.label, palette.label);
        assert_eq!(ring.command, palette.command);
        assert_eq!(palette.id.as_str(), "7");
    }

    #[test]
    fn test_color_deserialization() {
        let cases = vec![
            ("\"#7d4ecd\"", (0x7d, 0x4e, 0xcd)),
            ("\"#FF385D\"", (0xff, 0x38, 0x5d)),
            ("\"#fff\"", (0xff, 0xff, 0xff)),
        ];

        for (json, (r, g, b)) in cases {
            let color: ItemColor = serde_json::from_str(json).unwrap();
            assert_eq!(color.rgb(), Srgb::new(r, g, b));
        }
    }

    #[test]
    fn test_color_rejects_garbage() {
        assert!("7d4ecd".parse::<ItemColor>().is_err());
        assert!("#zzzzzz".parse::<ItemColor>().is_err());
        assert!(serde_json::from_str::<ItemColor>("\"red\"").is_err());
    }

    #[test]
    fn test_color_display_round_trips_through_hex() {
        let color: ItemColor = "#0a0b0c".parse().unwrap();
        assert_eq!(color.to_string(), "#0a0b0c");
    }

    #[test]
    fn test_item_deserializes_with_optional_fields() {
        let item: MenuItem =
            serde_json::from_str(r#"{"id": "radMenu-151", "label": "Select edge"}"#).unwrap();
        assert_eq!(item.id, ItemId::from("radMenu-151"));
        assert!(item.color.is_none());
        assert!(item.command.is_empty());
    }
}
