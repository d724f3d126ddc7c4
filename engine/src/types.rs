// ═══════════════════════════════════════════════════════════════════════
// Core types — catalog templates, ranks, unit instances, warbands
// ═══════════════════════════════════════════════════════════════════════

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Point costs. Signed so negative option deltas in data files survive.
pub type Points = i32;

// ── Identifiers ────────────────────────────────────────────────────────
// Both come from the same session counter and are never reused.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WarbandId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(pub u64);

impl std::fmt::Display for WarbandId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Rank ───────────────────────────────────────────────────────────────

/// Hero category. Decides how many followers the hero may lead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Rank {
    Legend,
    Valor,
    Fortitude,
    Minor,
    Independent,
    /// Anything the data file names that isn't a known rank.
    Other(String),
}

impl Rank {
    /// Maximum number of followers a hero of this rank may lead.
    /// Unrecognised ranks lead nobody.
    pub fn capacity(&self) -> usize {
        match self {
            Rank::Legend => 18,
            Rank::Valor => 15,
            Rank::Fortitude => 12,
            Rank::Minor => 6,
            Rank::Independent => 0,
            Rank::Other(_) => 0,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Rank::Other(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Rank::Legend => "Legend",
            Rank::Valor => "Valor",
            Rank::Fortitude => "Fortitude",
            Rank::Minor => "Minor",
            Rank::Independent => "Independent",
            Rank::Other(s) => s,
        }
    }
}

impl From<String> for Rank {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Legend" => Rank::Legend,
            "Valor" => Rank::Valor,
            "Fortitude" => Rank::Fortitude,
            "Minor" => Rank::Minor,
            "Independent" => Rank::Independent,
            _ => Rank::Other(s),
        }
    }
}

impl From<&str> for Rank {
    fn from(s: &str) -> Self {
        Rank::from(s.to_string())
    }
}

impl From<Rank> for String {
    fn from(rank: Rank) -> Self {
        match rank {
            Rank::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Follower capacity for an optional rank. A hero with no rank leads nobody.
pub fn capacity(rank: Option<&Rank>) -> usize {
    rank.map_or(0, Rank::capacity)
}

// ── Catalog templates ──────────────────────────────────────────────────

/// Optional wargear offered by a unit template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionTemplate {
    pub id: String,
    pub name: String,
    pub points: Points,
}

/// Immutable catalog entry for a hero or warrior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitTemplate {
    pub id: String,
    pub name: String,
    pub points: Points,
    #[serde(default)]
    pub image: String,
    /// Heroes only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<Rank>,
    #[serde(default)]
    pub options: Vec<OptionTemplate>,
    #[serde(default)]
    pub innate_wargear: Vec<String>,
}

impl UnitTemplate {
    pub fn option(&self, option_id: &str) -> Option<&OptionTemplate> {
        self.options.iter().find(|o| o.id == option_id)
    }

    pub fn has_option(&self, option_id: &str) -> bool {
        self.option(option_id).is_some()
    }

    pub fn capacity(&self) -> usize {
        capacity(self.rank.as_ref())
    }
}

/// One entry of the army manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub name: String,
    pub file: String,
}

/// Contents of a single army data file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArmyData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub army_name: Option<String>,
    /// Older data files carry the title here instead of `armyName`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub army_rule: Option<String>,
    #[serde(default)]
    pub heroes: Vec<UnitTemplate>,
    #[serde(default)]
    pub warriors: Vec<UnitTemplate>,
}

impl ArmyData {
    pub const DEFAULT_TITLE: &'static str = "Army List";
    pub const DEFAULT_RULE: &'static str = "No specific army rules found.";

    pub fn hero(&self, id: &str) -> Option<&UnitTemplate> {
        self.heroes.iter().find(|h| h.id == id)
    }

    pub fn warrior(&self, id: &str) -> Option<&UnitTemplate> {
        self.warriors.iter().find(|w| w.id == id)
    }

    pub fn title(&self) -> &str {
        self.army_name
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or(Self::DEFAULT_TITLE)
    }

    pub fn rule_text(&self) -> &str {
        self.army_rule.as_deref().unwrap_or(Self::DEFAULT_RULE)
    }
}

// ── Instances ──────────────────────────────────────────────────────────

/// Canonical, duplicate-free set of selected option ids.
pub type OptionSet = BTreeSet<String>;

/// A unit in the army: its own copy of the template plus its selections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitInstance {
    pub instance_id: InstanceId,
    pub template: UnitTemplate,
    pub selected: OptionSet,
}

impl UnitInstance {
    pub fn new(instance_id: InstanceId, template: &UnitTemplate) -> Self {
        UnitInstance {
            instance_id,
            template: template.clone(),
            selected: OptionSet::new(),
        }
    }

    pub fn template_id(&self) -> &str {
        &self.template.id
    }

    pub fn name(&self) -> &str {
        &self.template.name
    }

    /// Flip membership of `option_id`. Returns false, leaving the selection
    /// alone, when the template doesn't offer that option.
    pub fn toggle(&mut self, option_id: &str) -> bool {
        if !self.template.has_option(option_id) {
            return false;
        }
        if !self.selected.remove(option_id) {
            self.selected.insert(option_id.to_string());
        }
        true
    }

    pub fn is_selected(&self, option_id: &str) -> bool {
        self.selected.contains(option_id)
    }
}

// ── Warband ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warband {
    pub id: WarbandId,
    pub hero: UnitInstance,
    /// Display order is insertion order.
    pub followers: Vec<UnitInstance>,
}

impl Warband {
    pub fn capacity(&self) -> usize {
        self.hero.template.capacity()
    }

    pub fn is_full(&self) -> bool {
        self.followers.len() >= self.capacity()
    }

    pub fn follower(&self, id: InstanceId) -> Option<&UnitInstance> {
        self.followers.iter().find(|u| u.instance_id == id)
    }

    pub fn follower_mut(&mut self, id: InstanceId) -> Option<&mut UnitInstance> {
        self.followers.iter_mut().find(|u| u.instance_id == id)
    }

    /// Index of the first follower matching a stack configuration.
    pub fn find_in_stack(&self, template_id: &str, options: &OptionSet) -> Option<usize> {
        self.followers
            .iter()
            .position(|u| u.template.id == template_id && &u.selected == options)
    }
}
