use serde::{Deserialize, Serialize};

use crate::DecodeError;

/// An opaque description of an in-game item.
///
/// Two descriptors that differ only in `amount` describe the same kind of
/// item; see [`ItemDescriptor::is_similar`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemDescriptor {
    /// The item material, e.g. `gold_ingot`.
    pub material: String,
    /// The stack size.
    #[serde(default = "default_amount")]
    pub amount: u32,
    /// A custom display name, if the item has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

fn default_amount() -> u32 { 1 }

impl ItemDescriptor {
    /// Creates a single item of the given material.
    pub fn new(material: impl Into<String>) -> Self {
        Self {
            material: material.into().to_lowercase(),
            amount: 1,
            display_name: None,
        }
    }

    /// Sets a custom display name.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Returns true if `other` is the same kind of item, ignoring stack
    /// size.
    pub fn is_similar(&self, other: &ItemDescriptor) -> bool {
        self.material == other.material && self.display_name == other.display_name
    }

    /// Returns the display name, or a title-cased form of the material.
    ///
    /// ```
    /// use currency_bridge::ItemDescriptor;
    ///
    /// assert_eq!(ItemDescriptor::new("gold_ingot").name(), "Gold Ingot");
    /// ```
    pub fn name(&self) -> String {
        if let Some(name) = &self.display_name {
            return name.clone();
        }
        self.material
            .split('_')
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<String>>()
            .join(" ")
    }
}

/// Converts items to and from their persisted tag strings.
pub trait ItemCodec: Send + Sync {
    /// Decodes a tag string into an item.
    fn decode(&self, tag: &str) -> Result<ItemDescriptor, DecodeError>;

    /// Encodes an item into a tag string.
    fn encode(&self, item: &ItemDescriptor) -> String;
}

/// Item codec storing items as compact JSON objects.
///
/// ```
/// use currency_bridge::{ItemCodec, ItemDescriptor, JsonItemCodec};
///
/// let codec = JsonItemCodec;
/// let tag = codec.encode(&ItemDescriptor::new("diamond"));
/// assert_eq!(tag, r#"{"material":"diamond","amount":1}"#);
/// assert_eq!(codec.decode(&tag).unwrap().material, "diamond");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonItemCodec;

impl ItemCodec for JsonItemCodec {
    fn decode(&self, tag: &str) -> Result<ItemDescriptor, DecodeError> {
        if tag.trim().is_empty() {
            return Err(DecodeError::Blank);
        }
        let mut item: ItemDescriptor = serde_json::from_str(tag)?;
        if item.material.trim().is_empty() {
            return Err(DecodeError::MissingMaterial);
        }
        item.material = item.material.to_lowercase();
        Ok(item)
    }

    fn encode(&self, item: &ItemDescriptor) -> String {
        // A struct of strings and integers always serializes.
        serde_json::to_string(item).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_from_material() {
        assert_eq!(ItemDescriptor::new("EMERALD").name(), "Emerald");
        assert_eq!(
            ItemDescriptor::new("diamond").with_display_name("Shiny").name(),
            "Shiny"
        );
    }

    #[test]
    fn test_decode_defaults_amount() {
        let item = JsonItemCodec.decode(r#"{"material":"Gold_Ingot"}"#).unwrap();
        assert_eq!(item.material, "gold_ingot");
        assert_eq!(item.amount, 1);
    }

    #[test]
    fn test_decode_failures() {
        assert!(matches!(JsonItemCodec.decode(""), Err(DecodeError::Blank)));
        assert!(matches!(
            JsonItemCodec.decode("not a tag"),
            Err(DecodeError::Malformed(_))
        ));
        assert!(matches!(
            JsonItemCodec.decode(r#"{"material":" "}"#),
            Err(DecodeError::MissingMaterial)
        ));
    }

    #[test]
    fn test_similar_ignores_amount() {
        let mut stack = ItemDescriptor::new("diamond");
        stack.amount = 64;
        assert!(stack.is_similar(&ItemDescriptor::new("diamond")));
        assert!(!stack.is_similar(&ItemDescriptor::new("emerald")));
    }
}
