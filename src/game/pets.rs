//! Pet catalog - elements and attack sets per pet

use serde::{Deserialize, Serialize};

/// Attack set size assumed for pets missing from the catalog
pub const DEFAULT_ATTACK_SET_SIZE: usize = 5;

/// Attack elements, serialized as the symbols the browser client uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Element {
    #[serde(rename = "🔥")]
    Fire,
    #[serde(rename = "💧")]
    Water,
    #[serde(rename = "🌱")]
    Plant,
}

impl Element {
    /// Whether this element wins a round against `other`
    pub fn beats(self, other: Element) -> bool {
        matches!(
            (self, other),
            (Element::Fire, Element::Plant)
                | (Element::Water, Element::Fire)
                | (Element::Plant, Element::Water)
        )
    }
}

/// A single attack choice submitted as part of an attack sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attack {
    #[serde(rename = "type")]
    pub element: Element,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub id: String,
}

const WATER_ATTACKS: [Element; 5] = [
    Element::Water,
    Element::Water,
    Element::Water,
    Element::Fire,
    Element::Plant,
];

const PLANT_ATTACKS: [Element; 5] = [
    Element::Plant,
    Element::Plant,
    Element::Plant,
    Element::Fire,
    Element::Water,
];

const FIRE_ATTACKS: [Element; 5] = [
    Element::Fire,
    Element::Fire,
    Element::Fire,
    Element::Water,
    Element::Plant,
];

/// Catalog entry for a known pet
#[derive(Debug, Clone, Copy)]
pub struct PetStats {
    /// Elements of the attacks the pet can choose from
    pub attacks: &'static [Element],
}

impl PetStats {
    pub fn for_name(name: &str) -> Option<Self> {
        let attacks: &'static [Element] = match name {
            "Hipodoge" | "Pydos" => &WATER_ATTACKS,
            "Capipepo" | "Tucapalma" => &PLANT_ATTACKS,
            "Ratigueya" | "Langostelvis" => &FIRE_ATTACKS,
            _ => return None,
        };

        Some(Self { attacks })
    }
}

/// The pet a player joined with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub name: String,
}

impl Pet {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Catalog stats, `None` for names the catalog does not know
    pub fn stats(&self) -> Option<PetStats> {
        PetStats::for_name(&self.name)
    }

    /// Maximum number of attacks in this pet's attack sequence
    pub fn attack_set_size(&self) -> usize {
        self.stats()
            .map(|s| s.attacks.len())
            .unwrap_or(DEFAULT_ATTACK_SET_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elements_form_a_cycle() {
        assert!(Element::Fire.beats(Element::Plant));
        assert!(Element::Water.beats(Element::Fire));
        assert!(Element::Plant.beats(Element::Water));
        assert!(!Element::Plant.beats(Element::Fire));
        assert!(!Element::Water.beats(Element::Water));
    }

    #[test]
    fn test_catalog_lookup() {
        let stats = PetStats::for_name("Capipepo").unwrap();
        assert_eq!(stats.attacks[0], Element::Plant);
        assert_eq!(stats.attacks.len(), 5);
        assert!(PetStats::for_name("Pikachu").is_none());
    }

    #[test]
    fn test_unknown_pet_uses_default_set_size() {
        assert_eq!(Pet::new("Langostelvis").attack_set_size(), 5);
        assert_eq!(Pet::new("Mystery").attack_set_size(), DEFAULT_ATTACK_SET_SIZE);
    }

    #[test]
    fn test_attack_wire_format() {
        let attack: Attack = serde_json::from_str(
            r#"{"type":"💧","name":"Water jet","id":"water-attack-1-button"}"#,
        )
        .unwrap();
        assert_eq!(attack.element, Element::Water);
        assert_eq!(attack.id, "water-attack-1-button");

        let json = serde_json::to_value(&attack).unwrap();
        assert_eq!(json["type"], "💧");
    }
}
