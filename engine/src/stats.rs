// ═══════════════════════════════════════════════════════════════════════
// Aggregation — stacks, costs, model and bow counts
// Pure functions over session state. Recomputed from scratch on every
// render; armies are tens of models at most.
// ═══════════════════════════════════════════════════════════════════════

use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identity of a display stack: template plus canonical option set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StackKey {
    pub template_id: String,
    pub options: OptionSet,
}

impl StackKey {
    pub fn of(unit: &UnitInstance) -> Self {
        StackKey {
            template_id: unit.template_id().to_string(),
            options: unit.selected.clone(),
        }
    }
}

/// Followers sharing a template and an option selection.
#[derive(Debug, Clone)]
pub struct Stack<'a> {
    pub key: StackKey,
    /// First member in scan order; all members cost the same.
    pub sample: &'a UnitInstance,
    pub members: Vec<InstanceId>,
    pub per_model_cost: Points,
}

impl Stack<'_> {
    pub fn count(&self) -> usize {
        self.members.len()
    }

    pub fn total_cost(&self) -> Points {
        self.per_model_cost * self.count() as Points
    }

    pub fn bows(&self) -> usize {
        if has_bow(self.sample) { self.count() } else { 0 }
    }
}

/// Base cost plus every selected option the template prices.
pub fn unit_cost(unit: &UnitInstance) -> Points {
    let options: Points = unit
        .selected
        .iter()
        .filter_map(|id| unit.template.option(id))
        .map(|o| o.points)
        .sum();
    unit.template.points + options
}

/// Ranged-weapon classifier: any selected option id or innate wargear tag
/// containing "bow", ignoring case. Deliberately crude: `elbow_guard`
/// counts too.
pub fn has_bow(unit: &UnitInstance) -> bool {
    let mentions_bow = |s: &String| s.to_lowercase().contains("bow");
    unit.selected.iter().any(mentions_bow) || unit.template.innate_wargear.iter().any(mentions_bow)
}

/// Group followers into stacks, in first-appearance order.
pub fn group_followers(followers: &[UnitInstance]) -> Vec<Stack<'_>> {
    let mut stacks: Vec<Stack<'_>> = Vec::new();
    let mut index: HashMap<StackKey, usize> = HashMap::new();

    for unit in followers {
        let key = StackKey::of(unit);
        match index.get(&key) {
            Some(&i) => stacks[i].members.push(unit.instance_id),
            None => {
                index.insert(key.clone(), stacks.len());
                stacks.push(Stack {
                    key,
                    sample: unit,
                    members: vec![unit.instance_id],
                    per_model_cost: unit_cost(unit),
                });
            }
        }
    }
    stacks
}

/// Ranged-weapon allowance for an army of `models`: a third, rounded up.
pub fn bow_allowance(models: usize) -> usize {
    models.div_ceil(3)
}

// ── Per-warband summary ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarbandStats {
    pub hero_cost: Points,
    pub followers_cost: Points,
    pub followers: usize,
    pub capacity: usize,
    pub bows: usize,
}

impl WarbandStats {
    pub fn total(&self) -> Points {
        self.hero_cost + self.followers_cost
    }

    /// Hero plus followers.
    pub fn models(&self) -> usize {
        1 + self.followers
    }
}

pub fn warband_stats(wb: &Warband) -> WarbandStats {
    let stacks = group_followers(&wb.followers);
    WarbandStats {
        hero_cost: unit_cost(&wb.hero),
        followers_cost: stacks.iter().map(Stack::total_cost).sum(),
        followers: stacks.iter().map(Stack::count).sum(),
        capacity: wb.capacity(),
        bows: usize::from(has_bow(&wb.hero)) + stacks.iter().map(Stack::bows).sum::<usize>(),
    }
}

// ── Army-wide stats ────────────────────────────────────────────────────

/// Everything the stats bar shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArmyStats {
    pub points: Points,
    pub models: usize,
    pub bows: usize,
    pub bow_allowance: usize,
    pub over_limit: bool,
}

pub fn army_stats(warbands: &[Warband]) -> ArmyStats {
    let (points, models, bows) = warbands
        .iter()
        .map(warband_stats)
        .fold((0, 0, 0), |(p, m, b), s| (p + s.total(), m + s.models(), b + s.bows));
    let allowance = bow_allowance(models);
    ArmyStats {
        points,
        models,
        bows,
        bow_allowance: allowance,
        over_limit: bows > allowance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(id: &str, points: Points, options: &[(&str, Points)]) -> UnitTemplate {
        UnitTemplate {
            id: id.into(),
            name: id.into(),
            points,
            image: String::new(),
            rank: None,
            options: options
                .iter()
                .map(|(o, p)| OptionTemplate { id: o.to_string(), name: o.to_string(), points: *p })
                .collect(),
            innate_wargear: vec![],
        }
    }

    fn unit(id: u64, t: &UnitTemplate, selected: &[&str]) -> UnitInstance {
        let mut u = UnitInstance::new(InstanceId(id), t);
        u.selected = selected.iter().map(|s| s.to_string()).collect();
        u
    }

    #[test]
    fn option_order_does_not_split_stacks() {
        let t = template("w", 10, &[("shield", 1), ("bow", 1)]);
        let mut a = UnitInstance::new(InstanceId(1), &t);
        a.toggle("shield");
        a.toggle("bow");
        let mut b = UnitInstance::new(InstanceId(2), &t);
        b.toggle("bow");
        b.toggle("shield");
        let followers = vec![a, b];
        let stacks = group_followers(&followers);
        assert_eq!(stacks.len(), 1);
        assert_eq!(stacks[0].count(), 2);
        assert_eq!(stacks[0].per_model_cost, 12);
    }

    #[test]
    fn comma_in_option_id_does_not_collide() {
        // A joined-string key would make these identical.
        let t = template("w", 10, &[("a,b", 0), ("a", 0), ("b", 0)]);
        let followers = vec![unit(1, &t, &["a,b"]), unit(2, &t, &["a", "b"])];
        assert_eq!(group_followers(&followers).len(), 2);
    }

    #[test]
    fn stacks_keep_first_appearance_order() {
        let t = template("w", 10, &[("shield", 1)]);
        let u = template("u", 7, &[]);
        let followers = vec![
            unit(1, &t, &["shield"]),
            unit(2, &u, &[]),
            unit(3, &t, &[]),
            unit(4, &t, &["shield"]),
        ];
        let keys: Vec<_> = group_followers(&followers)
            .iter()
            .map(|s| (s.key.template_id.clone(), s.count()))
            .collect();
        assert_eq!(keys, vec![("w".to_string(), 2), ("u".to_string(), 1), ("w".to_string(), 1)]);
    }

    #[test]
    fn unpriced_selection_costs_nothing() {
        let t = template("w", 10, &[("shield", 1)]);
        let u = unit(1, &t, &["ghost"]);
        assert_eq!(unit_cost(&u), 10);
    }

    #[test]
    fn negative_option_reduces_cost() {
        let t = template("w", 10, &[("no_armour", -2)]);
        assert_eq!(unit_cost(&unit(1, &t, &["no_armour"])), 8);
    }

    #[test]
    fn bow_allowance_rounds_up() {
        assert_eq!(bow_allowance(0), 0);
        assert_eq!(bow_allowance(1), 1);
        assert_eq!(bow_allowance(2), 1);
        assert_eq!(bow_allowance(3), 1);
        assert_eq!(bow_allowance(4), 2);
        assert_eq!(bow_allowance(6), 2);
        assert_eq!(bow_allowance(7), 3);
    }

    #[test]
    fn bow_classifier_is_substring_based() {
        let t = template("w", 10, &[("Great_Bow", 2), ("elbow_pads", 0), ("spear", 1)]);
        assert!(has_bow(&unit(1, &t, &["Great_Bow"])));
        assert!(!has_bow(&unit(2, &t, &["spear"])));
        // Known false positive of the substring rule.
        assert!(has_bow(&unit(3, &t, &["elbow_pads"])));

        let mut archer = template("archer", 8, &[]);
        archer.innate_wargear = vec!["Elven_Bow".into()];
        assert!(has_bow(&unit(4, &archer, &[])));
    }
}
