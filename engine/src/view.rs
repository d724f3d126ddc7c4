// ═══════════════════════════════════════════════════════════════════════
// Views — what a presentation layer is allowed to draw
//
// The engine builds plain, serialisable view structs from the session and
// hands them to a `Presenter`. Every view carries the ids its controls
// need so the presenter can turn a click back into an `Action`.
// ═══════════════════════════════════════════════════════════════════════

use crate::session::ArmySession;
use crate::stats::{self, ArmyStats, StackKey};
use crate::types::*;
use serde::{Deserialize, Serialize};

const PLACEHOLDER_BASE: &str = "https://placehold.co/150x150/1a202c/ffd700";

/// Generated stand-in image labeled with the unit's name.
pub fn placeholder_image(name: &str) -> String {
    format!("{}?text={}", PLACEHOLDER_BASE, name.replace(' ', "+"))
}

/// The template's image, or a placeholder when `resolves` rejects it.
pub fn card_image(template: &UnitTemplate, resolves: impl Fn(&str) -> bool) -> String {
    if !template.image.is_empty() && resolves(&template.image) {
        template.image.clone()
    } else {
        placeholder_image(&template.name)
    }
}

// ── Army list views ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleView {
    pub title: String,
    /// One entry per line of the rule text.
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionToggle {
    pub id: String,
    pub name: String,
    pub points: Points,
    pub selected: bool,
}

impl OptionToggle {
    /// Checkbox label, e.g. `Shield (+5)`.
    pub fn label(&self) -> String {
        format!("{} (+{})", self.name, self.points)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroView {
    pub instance_id: InstanceId,
    pub name: String,
    pub rank: Option<Rank>,
    pub cost: Points,
    pub options: Vec<OptionToggle>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackView {
    pub key: StackKey,
    pub name: String,
    pub count: usize,
    pub per_model_cost: Points,
    pub total_cost: Points,
    pub options: Vec<OptionToggle>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarbandView {
    pub id: WarbandId,
    /// 1-based position in the army.
    pub index: usize,
    pub title: String,
    pub hero: HeroView,
    pub followers: usize,
    pub capacity: usize,
    pub total_cost: Points,
    pub stacks: Vec<StackView>,
}

impl WarbandView {
    /// e.g. `5 / 12 Warriors`.
    pub fn summary(&self) -> String {
        format!("{} / {} Warriors", self.followers, self.capacity)
    }
}

fn toggles(unit: &UnitInstance) -> Vec<OptionToggle> {
    unit.template
        .options
        .iter()
        .map(|o| OptionToggle {
            id: o.id.clone(),
            name: o.name.clone(),
            points: o.points,
            selected: unit.is_selected(&o.id),
        })
        .collect()
}

pub fn rule_view(army: &ArmyData) -> RuleView {
    RuleView {
        title: army.title().to_string(),
        lines: army.rule_text().lines().map(str::to_string).collect(),
    }
}

pub fn warband_view(index: usize, wb: &Warband) -> WarbandView {
    let summary = stats::warband_stats(wb);
    let stacks = stats::group_followers(&wb.followers)
        .into_iter()
        .map(|s| StackView {
            name: s.sample.name().to_string(),
            count: s.count(),
            per_model_cost: s.per_model_cost,
            total_cost: s.total_cost(),
            options: toggles(s.sample),
            key: s.key,
        })
        .collect();

    WarbandView {
        id: wb.id,
        index: index + 1,
        title: format!("Warband {}: {}", index + 1, wb.hero.name()),
        hero: HeroView {
            instance_id: wb.hero.instance_id,
            name: wb.hero.name().to_string(),
            rank: wb.hero.template.rank.clone(),
            cost: summary.hero_cost,
            options: toggles(&wb.hero),
        },
        followers: summary.followers,
        capacity: summary.capacity,
        total_cost: summary.total(),
        stacks,
    }
}

// ── Catalog views ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddTarget {
    pub warband: WarbandId,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    pub template_id: String,
    pub name: String,
    pub points: Points,
    pub image: String,
    /// Heroes only.
    pub rank: Option<Rank>,
    /// Warriors only: one button per existing warband.
    pub add_targets: Vec<AddTarget>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogView {
    pub heroes: Vec<CardView>,
    pub warriors: Vec<CardView>,
}

impl CatalogView {
    pub const NO_WARBAND_HINT: &'static str = "Add a Hero first";
}

pub fn catalog_view(session: &ArmySession, resolves: impl Fn(&str) -> bool) -> Option<CatalogView> {
    let army = session.army()?;
    let targets: Vec<AddTarget> = session
        .warbands()
        .iter()
        .enumerate()
        .map(|(i, wb)| AddTarget { warband: wb.id, label: format!("Add to Warband {}", i + 1) })
        .collect();

    let card = |t: &UnitTemplate, add_targets: Vec<AddTarget>| CardView {
        template_id: t.id.clone(),
        name: t.name.clone(),
        points: t.points,
        image: card_image(t, &resolves),
        rank: t.rank.clone(),
        add_targets,
    };

    Some(CatalogView {
        heroes: army.heroes.iter().map(|h| card(h, Vec::new())).collect(),
        warriors: army.warriors.iter().map(|w| card(w, targets.clone())).collect(),
    })
}

// ── Presenter ──────────────────────────────────────────────────────────

/// Implemented by anything that draws the army list.
pub trait Presenter {
    fn render_rule(&mut self, rule: &RuleView);
    fn render_warband(&mut self, warband: &WarbandView);
    fn render_stats(&mut self, stats: &ArmyStats);
    /// A message the user must see (load failures, capacity refusals).
    fn report(&mut self, message: &str);
}

/// Full re-render: rule box, every warband, then the stats bar.
pub fn render_army(session: &ArmySession, presenter: &mut impl Presenter) {
    if let Some(army) = session.army() {
        presenter.render_rule(&rule_view(army));
    }
    for (i, wb) in session.warbands().iter().enumerate() {
        presenter.render_warband(&warband_view(i, wb));
    }
    presenter.render_stats(&stats::army_stats(session.warbands()));
}
