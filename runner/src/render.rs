// ═══════════════════════════════════════════════════════════════════════
// Text presenter — draws the catalog, warbands and stats bar as plain text
// ═══════════════════════════════════════════════════════════════════════

use mesbg_engine::stats::ArmyStats;
use mesbg_engine::view::{CatalogView, OptionToggle, Presenter, RuleView, WarbandView};
use std::fmt;
use std::io::{self, Write};

pub struct TextPresenter<W: Write> {
    out: W,
    status: io::Result<()>,
}

impl<W: Write> TextPresenter<W> {
    pub fn new(out: W) -> Self {
        TextPresenter { out, status: Ok(()) }
    }

    /// Hand back the writer, or the first write error.
    pub fn finish(self) -> io::Result<W> {
        self.status.map(|()| self.out)
    }

    fn line(&mut self, args: fmt::Arguments<'_>) {
        if self.status.is_ok() {
            self.status = self.out.write_fmt(args).and_then(|()| self.out.write_all(b"\n"));
        }
    }

    pub fn render_catalog(&mut self, catalog: &CatalogView) {
        self.line(format_args!("── Heroes ──"));
        for card in &catalog.heroes {
            let rank = card.rank.as_ref().map(|r| r.as_str()).unwrap_or("-");
            self.line(format_args!(
                "  {:<32} {:>4} pts  [{}]  start: {}  ({})",
                card.name, card.points, rank, card.template_id, card.image
            ));
        }
        self.line(format_args!("── Warriors ──"));
        for card in &catalog.warriors {
            self.line(format_args!(
                "  {:<32} {:>4} pts  id: {}  ({})",
                card.name, card.points, card.template_id, card.image
            ));
            if card.add_targets.is_empty() {
                self.line(format_args!("      {}", CatalogView::NO_WARBAND_HINT));
            }
            for target in &card.add_targets {
                self.line(format_args!("      {} (warband {})", target.label, target.warband));
            }
        }
    }

    fn render_options(&mut self, indent: &str, options: &[OptionToggle], with_points: bool) {
        for o in options {
            let mark = if o.selected { "x" } else { " " };
            let label = if with_points { o.label() } else { o.name.clone() };
            self.line(format_args!("{}[{}] {} ({})", indent, mark, label, o.id));
        }
    }
}

impl<W: Write> Presenter for TextPresenter<W> {
    fn render_rule(&mut self, rule: &RuleView) {
        self.line(format_args!("=== {} ===", rule.title));
        for l in &rule.lines {
            self.line(format_args!("  {}", l));
        }
    }

    fn render_warband(&mut self, wb: &WarbandView) {
        self.line(format_args!("--- {} (warband {}) ---", wb.title, wb.id));
        let rank = wb.hero.rank.as_ref().map(|r| r.as_str()).unwrap_or("-");
        self.line(format_args!(
            "  {} [{}]  {} pts  (instance {})",
            wb.hero.name, rank, wb.hero.cost, wb.hero.instance_id
        ));
        self.render_options("    ", &wb.hero.options, true);
        self.line(format_args!("  {}", wb.summary()));
        for stack in &wb.stacks {
            self.line(format_args!(
                "  {}x {:<32} {:>4} pts",
                stack.count, stack.name, stack.total_cost
            ));
            self.render_options("      ", &stack.options, false);
        }
        self.line(format_args!("  Warband total: {} pts", wb.total_cost));
    }

    fn render_stats(&mut self, stats: &ArmyStats) {
        let flag = if stats.over_limit { "  (over limit!)" } else { "" };
        self.line(format_args!(
            "Points: {} | Models: {} | Bows: {} / {}{}",
            stats.points, stats.models, stats.bows, stats.bow_allowance, flag
        ));
    }

    fn report(&mut self, message: &str) {
        self.line(format_args!("! {}", message));
    }
}
