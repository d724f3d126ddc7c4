// ═══════════════════════════════════════════════════════════════════════
// Army-building scenarios and invariants across session + aggregation
// ═══════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use crate::engine::{apply_action, Action};
    use crate::error::SessionError;
    use crate::session::ArmySession;
    use crate::stats::{army_stats, group_followers, warband_stats};
    use crate::types::*;
    use crate::view::{self, Presenter, RuleView, WarbandView};
    use crate::ArmyStats;
    use std::collections::HashSet;

    // ── Helpers ────────────────────────────────────────────────────────────

    fn opt(id: &str, points: Points) -> OptionTemplate {
        OptionTemplate { id: id.into(), name: id.replace('_', " "), points }
    }

    fn hero(id: &str, name: &str, points: Points, rank: &str) -> UnitTemplate {
        UnitTemplate {
            id: id.into(),
            name: name.into(),
            points,
            image: format!("img/{}.png", id),
            rank: Some(Rank::from(rank)),
            options: vec![opt("horse", 10), opt("bow_basic", 5)],
            innate_wargear: vec![],
        }
    }

    fn warrior(id: &str, name: &str, points: Points, options: Vec<OptionTemplate>) -> UnitTemplate {
        UnitTemplate {
            id: id.into(),
            name: name.into(),
            points,
            image: String::new(),
            rank: None,
            options,
            innate_wargear: vec![],
        }
    }

    fn gondor() -> ArmyData {
        let mut ranger = warrior("ranger", "Ranger of Gondor", 8, vec![opt("spear", 1)]);
        ranger.innate_wargear = vec!["bow".into()];
        ArmyData {
            army_name: Some("Minas Tirith".into()),
            name: None,
            army_rule: Some("Gondor's Finest".into()),
            heroes: vec![
                hero("boromir", "Boromir", 70, "Fortitude"),
                hero("aragorn", "Aragorn", 175, "Legend"),
                hero("captain", "Captain of Minas Tirith", 50, "Minor"),
                hero("damrod", "Damrod", 45, "Independent"),
                hero("odd", "Odd Hero", 40, "Mystery"),
            ],
            warriors: vec![
                warrior(
                    "wmt",
                    "Warriors of Minas Tirith",
                    10,
                    vec![opt("shield", 1), opt("bow_basic", 1), opt("spear", 1)],
                ),
                ranger,
            ],
        }
    }

    fn opts(ids: &[&str]) -> OptionSet {
        ids.iter().map(|s| s.to_string()).collect()
    }

    // ── Worked scenarios ───────────────────────────────────────────────────

    #[test]
    fn boromir_with_five_warriors_two_shields() {
        let mut s = ArmySession::with_army(gondor());
        let wb = s.start_warband("boromir").unwrap();
        let ids: Vec<InstanceId> = (0..5).map(|_| s.add_follower(wb, "wmt").unwrap()).collect();
        s.toggle_option(wb, ids[1], "shield", false).unwrap();
        s.toggle_option(wb, ids[3], "shield", false).unwrap();

        let stats = army_stats(s.warbands());
        assert_eq!(stats.points, 122);
        assert_eq!(stats.models, 6);

        let band = s.warband(wb).unwrap();
        let stacks = group_followers(&band.followers);
        assert_eq!(stacks.len(), 2);
        assert_eq!((stacks[0].count(), stacks[0].total_cost()), (3, 30));
        assert_eq!((stacks[1].count(), stacks[1].total_cost()), (2, 22));
        assert!(stacks[1].key.options.contains("shield"));
    }

    #[test]
    fn three_bows_in_six_models_is_over_limit() {
        let mut s = ArmySession::with_army(gondor());
        let wb = s.start_warband("captain").unwrap();
        s.add_follower(wb, "ranger").unwrap(); // innate bow
        s.set_stack_count(wb, "wmt", &opts(&["bow_basic"]), 2).unwrap();
        s.set_stack_count(wb, "wmt", &opts(&[]), 2).unwrap();

        let stats = army_stats(s.warbands());
        assert_eq!(stats.models, 6);
        assert_eq!(stats.bows, 3);
        assert_eq!(stats.bow_allowance, 2);
        assert!(stats.over_limit);
    }

    #[test]
    fn thirteenth_follower_of_fortitude_hero_is_rejected() {
        let mut s = ArmySession::with_army(gondor());
        let wb = s.start_warband("boromir").unwrap();
        for _ in 0..12 {
            s.add_follower(wb, "wmt").unwrap();
        }
        let err = s.add_follower(wb, "wmt").unwrap_err();
        assert!(matches!(err, SessionError::CapacityExceeded { capacity: 12, .. }));
        assert_eq!(s.warband(wb).unwrap().followers.len(), 12);
    }

    // ── Rank capacity ──────────────────────────────────────────────────────

    #[test]
    fn every_rank_has_its_capacity() {
        let mut s = ArmySession::with_army(gondor());
        for (id, cap) in [("aragorn", 18), ("boromir", 12), ("captain", 6), ("damrod", 0), ("odd", 0)] {
            let wb = s.start_warband(id).unwrap();
            let added = s.set_stack_count(wb, "wmt", &opts(&[]), 30);
            if cap == 0 {
                assert!(matches!(added, Err(SessionError::CapacityExceeded { .. })), "{}", id);
            } else {
                assert_eq!(added.unwrap(), cap, "{}", id);
            }
            assert_eq!(warband_stats(s.warband(wb).unwrap()).capacity, cap);
        }
        assert_eq!(capacity(None), 0);
        assert_eq!(Rank::from("Valor").capacity(), 15);
        assert_eq!(Rank::from("legend").capacity(), 0);
    }

    // ── Aggregation properties ─────────────────────────────────────────────

    #[test]
    fn option_order_never_splits_a_stack() {
        let mut s = ArmySession::with_army(gondor());
        let wb = s.start_warband("boromir").unwrap();
        let a = s.add_follower(wb, "wmt").unwrap();
        let b = s.add_follower(wb, "wmt").unwrap();
        s.toggle_option(wb, a, "shield", false).unwrap();
        s.toggle_option(wb, a, "spear", false).unwrap();
        s.toggle_option(wb, b, "spear", false).unwrap();
        s.toggle_option(wb, b, "shield", false).unwrap();

        let stacks = group_followers(&s.warband(wb).unwrap().followers);
        assert_eq!(stacks.len(), 1);
        assert_eq!(stacks[0].count(), 2);
    }

    #[test]
    fn total_is_independent_of_insertion_order() {
        let build = |order: &[(&str, &[&str])]| {
            let mut s = ArmySession::with_army(gondor());
            let wb = s.start_warband("aragorn").unwrap();
            for (unit, options) in order {
                s.set_stack_count(wb, unit, &opts(options), 1).unwrap();
            }
            army_stats(s.warbands())
        };
        let forward: &[(&str, &[&str])] =
            &[("wmt", &["shield"]), ("ranger", &[]), ("wmt", &[]), ("ranger", &["spear"])];
        let reverse: &[(&str, &[&str])] =
            &[("ranger", &["spear"]), ("wmt", &[]), ("ranger", &[]), ("wmt", &["shield"])];
        let (forward, reverse) = (build(forward), build(reverse));
        assert_eq!(forward, reverse);
        assert_eq!(forward.points, 175 + 11 + 8 + 10 + 9);
    }

    #[test]
    fn hero_options_count_toward_cost_and_bows() {
        let mut s = ArmySession::with_army(gondor());
        let wb = s.start_warband("boromir").unwrap();
        let hero_id = s.warband(wb).unwrap().hero.instance_id;
        s.toggle_option(wb, hero_id, "horse", true).unwrap();
        s.toggle_option(wb, hero_id, "bow_basic", true).unwrap();
        let stats = army_stats(s.warbands());
        assert_eq!(stats.points, 85);
        assert_eq!(stats.bows, 1);
        assert_eq!(stats.bow_allowance, 1);
        assert!(!stats.over_limit);
    }

    #[test]
    fn removing_a_warband_drops_everything_it_led() {
        let mut s = ArmySession::with_army(gondor());
        let keep = s.start_warband("captain").unwrap();
        s.add_follower(keep, "wmt").unwrap();
        let gone = s.start_warband("aragorn").unwrap();
        s.set_stack_count(gone, "ranger", &opts(&[]), 10).unwrap();

        let before = army_stats(s.warbands());
        assert_eq!(before.models, 13);

        let removed = s.remove_warband(gone).unwrap();
        assert_eq!(removed.followers.len(), 10);
        let after = army_stats(s.warbands());
        assert_eq!(after, ArmyStats { points: 60, models: 2, bows: 0, bow_allowance: 1, over_limit: false });
        assert!(matches!(s.remove_warband(gone), Err(SessionError::UnknownWarband(_))));
    }

    #[test]
    fn empty_army_has_no_allowance() {
        let s = ArmySession::with_army(gondor());
        assert_eq!(army_stats(s.warbands()), ArmyStats::default());
    }

    // ── Actions ────────────────────────────────────────────────────────────

    #[test]
    fn guard_actions_never_change_state() {
        let mut s = ArmySession::with_army(gondor());
        let wb = s.start_warband("boromir").unwrap();
        s.add_follower(wb, "wmt").unwrap();
        let snapshot = s.warbands().to_vec();

        let bad = [
            Action::StartWarband { hero: "sauron".into() },
            Action::AddFollower { warband: WarbandId(999), unit: "wmt".into() },
            Action::AddFollower { warband: wb, unit: "orc".into() },
            Action::ToggleOption { warband: wb, instance: InstanceId(999), option: "shield".into(), hero: false },
            Action::ToggleOption { warband: wb, instance: InstanceId(0), option: "crown".into(), hero: true },
            Action::RemoveWarband { warband: WarbandId(999) },
            Action::AdjustStack { warband: wb, unit: "wmt".into(), options: opts(&["shield"]), delta: -1 },
            Action::AdjustStack { warband: wb, unit: "wmt".into(), options: opts(&["crown"]), delta: 1 },
            Action::ToggleStackOption {
                warband: wb,
                unit: "wmt".into(),
                options: opts(&[]),
                option: "crown".into(),
            },
        ];
        for action in bad {
            let err = apply_action(&mut s, action.clone()).unwrap_err();
            assert!(err.is_guard(), "{:?} -> {:?}", action, err);
            assert_eq!(s.warbands(), snapshot.as_slice());
        }
    }

    // ── Randomised invariants ──────────────────────────────────────────────

    /// Random, mostly valid action for the current session.
    fn random_action(s: &ArmySession, rng: &mut impl rand::Rng) -> Action {
        use rand::seq::SliceRandom;
        use rand::Rng;
        let army = s.army().unwrap();
        let warbands = s.warbands();
        if warbands.is_empty() || rng.gen_bool(0.1) {
            let h = army.heroes.choose(rng).unwrap();
            return Action::StartWarband { hero: h.id.clone() };
        }
        let wb = warbands.choose(rng).unwrap();
        let w = army.warriors.choose(rng).unwrap();
        let some_opts = |rng: &mut dyn rand::RngCore| -> OptionSet {
            w.options.iter().filter(|_| rng.gen_bool(0.5)).map(|o| o.id.clone()).collect()
        };
        match rng.gen_range(0..6) {
            0 => Action::AddFollower { warband: wb.id, unit: w.id.clone() },
            1 => match wb.followers.choose(rng) {
                Some(u) if !u.template.options.is_empty() => Action::ToggleOption {
                    warband: wb.id,
                    instance: u.instance_id,
                    option: u.template.options.choose(rng).unwrap().id.clone(),
                    hero: false,
                },
                _ => Action::AddFollower { warband: wb.id, unit: w.id.clone() },
            },
            2 => Action::AdjustStack {
                warband: wb.id,
                unit: w.id.clone(),
                options: some_opts(rng),
                delta: rng.gen_range(1..5),
            },
            3 => Action::AdjustStack {
                warband: wb.id,
                unit: w.id.clone(),
                options: some_opts(rng),
                delta: -1,
            },
            4 => Action::ToggleStackOption {
                warband: wb.id,
                unit: w.id.clone(),
                options: some_opts(rng),
                option: w.options.first().map(|o| o.id.clone()).unwrap_or_default(),
            },
            _ if rng.gen_bool(0.2) => Action::RemoveWarband { warband: wb.id },
            _ => Action::ToggleOption {
                warband: wb.id,
                instance: wb.hero.instance_id,
                option: "horse".into(),
                hero: true,
            },
        }
    }

    #[test]
    fn random_sessions_keep_invariants() {
        use rand::SeedableRng;
        use rand_chacha::ChaCha8Rng;

        for seed in 0..20u64 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut s = ArmySession::with_army(gondor());
            let mut live: HashSet<u64> = HashSet::new();
            let mut high = 0u64;

            for _ in 0..300 {
                let action = random_action(&s, &mut rng);
                let before = s.warbands().to_vec();
                if apply_action(&mut s, action).is_err() {
                    assert_eq!(s.warbands(), before.as_slice(), "seed {}", seed);
                }

                let mut now: HashSet<u64> = HashSet::new();
                for wb in s.warbands() {
                    assert!(wb.followers.len() <= wb.capacity(), "seed {}", seed);
                    assert!(now.insert(wb.id.0));
                    for u in std::iter::once(&wb.hero).chain(&wb.followers) {
                        assert!(u.selected.iter().all(|o| u.template.has_option(o)));
                        assert!(now.insert(u.instance_id.0), "duplicate id, seed {}", seed);
                    }
                }
                // Anything new must be above every id handed out before.
                let mut step_high = high;
                for id in now.difference(&live) {
                    assert!(*id > high, "id {} reused, seed {}", id, seed);
                    step_high = step_high.max(*id);
                }
                high = step_high;
                live = now;

                let stats = army_stats(s.warbands());
                let models: usize = s.warbands().iter().map(|w| 1 + w.followers.len()).sum();
                assert_eq!(stats.models, models);
                assert_eq!(stats.over_limit, stats.bows > stats.models.div_ceil(3));
            }
        }
    }

    // ── Presentation contract ──────────────────────────────────────────────

    #[derive(Default)]
    struct Recorder {
        rules: Vec<RuleView>,
        warbands: Vec<WarbandView>,
        stats: Vec<ArmyStats>,
        reports: Vec<String>,
    }

    impl Presenter for Recorder {
        fn render_rule(&mut self, rule: &RuleView) {
            self.rules.push(rule.clone());
        }
        fn render_warband(&mut self, warband: &WarbandView) {
            self.warbands.push(warband.clone());
        }
        fn render_stats(&mut self, stats: &ArmyStats) {
            self.stats.push(*stats);
        }
        fn report(&mut self, message: &str) {
            self.reports.push(message.to_string());
        }
    }

    #[test]
    fn render_army_draws_rule_warbands_then_stats() {
        let mut s = ArmySession::with_army(gondor());
        let wb = s.start_warband("boromir").unwrap();
        s.set_stack_count(wb, "wmt", &opts(&[]), 3).unwrap();
        s.set_stack_count(wb, "wmt", &opts(&["shield"]), 2).unwrap();
        s.start_warband("captain").unwrap();

        let mut r = Recorder::default();
        view::render_army(&s, &mut r);
        assert_eq!(r.rules.len(), 1);
        assert_eq!(r.rules[0].title, "Minas Tirith");
        assert_eq!(r.warbands.len(), 2);
        assert!(r.reports.is_empty());

        let first = &r.warbands[0];
        assert_eq!(first.title, "Warband 1: Boromir");
        assert_eq!(first.summary(), "5 / 12 Warriors");
        assert_eq!(first.total_cost, 122);
        assert_eq!(first.stacks.len(), 2);
        assert_eq!(first.stacks[1].count, 2);
        assert_eq!(first.stacks[1].total_cost, 22);
        assert!(first.stacks[1].options.iter().any(|o| o.id == "shield" && o.selected));
        assert_eq!(r.warbands[1].summary(), "0 / 6 Warriors");
        assert_eq!(r.stats, vec![army_stats(s.warbands())]);
    }

    #[test]
    fn render_without_army_only_draws_stats() {
        let mut r = Recorder::default();
        view::render_army(&ArmySession::new(), &mut r);
        assert!(r.rules.is_empty());
        assert_eq!(r.stats, vec![ArmyStats::default()]);
    }

    #[test]
    fn catalog_view_offers_one_target_per_warband() {
        let mut s = ArmySession::with_army(gondor());
        let catalog = view::catalog_view(&s, |_| false).unwrap();
        assert!(catalog.warriors.iter().all(|c| c.add_targets.is_empty()));
        assert_eq!(catalog.heroes[0].rank, Some(Rank::Fortitude));
        assert_eq!(catalog.heroes[0].image, view::placeholder_image("Boromir"));

        s.start_warband("boromir").unwrap();
        s.start_warband("captain").unwrap();
        let catalog = view::catalog_view(&s, |_| true).unwrap();
        let labels: Vec<_> = catalog.warriors[0].add_targets.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["Add to Warband 1", "Add to Warband 2"]);
        assert_eq!(catalog.heroes[0].image, "img/boromir.png");

        assert!(view::catalog_view(&ArmySession::new(), |_| true).is_none());
    }
}
