//! PokeBase API response types.
//!
//! These types model the JSON documents served by a PokeBase instance: the
//! autocomplete response and the Pokémon page document.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// One suggested match returned by the suggestion endpoint.
///
/// The server sends the identifier either as a slug (`"pikachu"`) or as a
/// number (`25`); both are stored as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Identifier used to build the navigation target.
    #[serde(deserialize_with = "identifier_from_string_or_number")]
    pub id: String,
    /// Display name.
    pub name: String,
}

impl Candidate {
    /// Create a candidate.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

fn identifier_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Identifier {
        Text(String),
        Number(i64),
    }

    Ok(match Identifier::deserialize(deserializer)? {
        Identifier::Text(s) => s,
        Identifier::Number(n) => n.to_string(),
    })
}

/// Response of `GET /api/pokemon-suggest`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuggestResponse {
    /// Ordered matches; absent means no suggestions.
    #[serde(default)]
    pub results: Vec<Candidate>,
}

/// A type reference (`fire`, `Fire`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRef {
    pub identifier: String,
    pub name: String,
}

/// A base stat with its dex-wide range and a bar percentage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub identifier: String,
    pub name: String,
    pub value: u32,
    #[serde(default)]
    pub min: u32,
    #[serde(default)]
    pub max: u32,
    /// Bar fill in percent, already clamped by the server.
    #[serde(default)]
    pub percent: u16,
}

/// An ability slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub identifier: String,
    pub name: String,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub flavor_text: String,
}

/// A level-up move row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub name: String,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub type_identifier: Option<String>,
    #[serde(default)]
    pub type_name: Option<String>,
    /// Damage class (Physical, Special, Status).
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub power: Option<u32>,
    #[serde(default)]
    pub accuracy: Option<u32>,
    #[serde(default)]
    pub pp: Option<u32>,
    #[serde(default)]
    pub effect: String,
}

/// A previous/next link on a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    /// National dex number.
    pub dex: u32,
    pub identifier: String,
    pub name: String,
    /// Disabled links are shown but not followed.
    #[serde(default)]
    pub disabled: bool,
}

/// How hard one attacking type hits this Pokémon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    pub identifier: String,
    pub name: String,
    /// Combined damage factor across the defender's types.
    pub multiplier: f64,
    /// Short form of the multiplier (`×4`, `×0.5`).
    #[serde(default)]
    pub label: String,
}

impl Matchup {
    /// The server's label, or one derived from the multiplier.
    pub fn display_label(&self) -> String {
        if !self.label.is_empty() {
            return self.label.clone();
        }
        format!("×{}", self.multiplier)
    }
}

/// Defensive type chart, grouped by outcome.
///
/// `weak` is ordered strongest first and `resist` weakest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeMatchups {
    #[serde(default)]
    pub weak: Vec<Matchup>,
    #[serde(default)]
    pub resist: Vec<Matchup>,
    #[serde(default)]
    pub immune: Vec<Matchup>,
}

impl TypeMatchups {
    pub fn is_empty(&self) -> bool {
        self.weak.is_empty() && self.resist.is_empty() && self.immune.is_empty()
    }
}

/// A species on either end of an evolution step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesRef {
    pub species_id: u32,
    pub identifier: String,
    /// Localized name; missing names fall back to the identifier.
    #[serde(default)]
    pub name: Option<String>,
}

impl SpeciesRef {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.identifier)
    }
}

/// One edge of the evolution chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evolution {
    /// Absent for a chain's base species.
    #[serde(default)]
    pub from: Option<SpeciesRef>,
    pub to: SpeciesRef,
    /// Trigger summary such as "Level 16" or "Use Thunder Stone".
    #[serde(default)]
    pub condition: String,
}

/// An alternate form of the same species.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    pub identifier: String,
    pub name: String,
    #[serde(default)]
    pub is_default: bool,
}

/// Where a Pokémon can be caught in one game version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encounter {
    pub version: String,
    #[serde(default)]
    pub locations: Vec<String>,
}

/// Detail document for one Pokémon.
///
/// Returned by `GET /api/pokemon/{identifier}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonPage {
    pub identifier: String,
    pub display_name: String,
    /// National dex number (species id).
    pub dex: u32,
    #[serde(default)]
    pub types: Vec<TypeRef>,
    #[serde(default)]
    pub stats: Vec<Stat>,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub abilities: Vec<Ability>,
    #[serde(default)]
    pub flavor_text: String,
    #[serde(default)]
    pub generation: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub growth_rate: Option<String>,
    #[serde(default)]
    pub capture_rate: Option<u32>,
    #[serde(default)]
    pub base_happiness: Option<u32>,
    #[serde(default)]
    pub egg_groups: Vec<String>,
    #[serde(default)]
    pub moves: Vec<Move>,
    #[serde(default)]
    pub type_matchups: TypeMatchups,
    #[serde(default)]
    pub evolutions: Vec<Evolution>,
    /// Alternate forms; empty when the species has only one.
    #[serde(default)]
    pub forms: Vec<Form>,
    #[serde(default)]
    pub encounters: Vec<Encounter>,
    #[serde(default)]
    pub nav_prev: Option<NavLink>,
    #[serde(default)]
    pub nav_next: Option<NavLink>,
}
