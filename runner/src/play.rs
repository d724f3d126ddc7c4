// ═══════════════════════════════════════════════════════════════════════
// Play loop — read an action, apply it, redraw everything, repeat
// ═══════════════════════════════════════════════════════════════════════

use crate::render::TextPresenter;
use mesbg_catalog::{find_entry, CatalogProvider, CatalogResult};
use mesbg_engine::view::{self, Presenter};
use mesbg_engine::{apply_action, Action, ArmyData, ArmySession, Outcome};
use serde::Deserialize;
use serde_json::Value;
use std::io::{self, BufRead, Write};

/// Totals for a finished session, mostly for logging.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PlaySummary {
    pub applied: usize,
    pub rejected: usize,
    pub ignored: usize,
}

// ── Input lines ────────────────────────────────────────────────────────
// Engine actions, plus `{"action":"select_army","army":"<file or name>"}`
// which goes through the catalog instead of the session.

enum Command {
    SelectArmy(String),
    Apply(Action),
}

#[derive(Deserialize)]
struct SelectArmy {
    #[serde(alias = "file")]
    army: String,
}

fn parse_command(line: &str) -> serde_json::Result<Command> {
    let value: Value = serde_json::from_str(line)?;
    if value.get("action").and_then(Value::as_str) == Some("select_army") {
        let SelectArmy { army } = serde_json::from_value::<SelectArmy>(value)?;
        Ok(Command::SelectArmy(army))
    } else {
        serde_json::from_value(value).map(Command::Apply)
    }
}

fn fetch_army(catalog: &dyn CatalogProvider, army: &str) -> CatalogResult<ArmyData> {
    let entries = catalog.manifest()?;
    let entry = find_entry(&entries, army)?;
    catalog.load_army(&entry.file)
}

/// Load `army` from the catalog and make it the session's army. On failure
/// the user is told and the session keeps its current army and warbands.
pub fn select_army<W: Write>(
    session: &mut ArmySession,
    catalog: &dyn CatalogProvider,
    army: &str,
    presenter: &mut TextPresenter<W>,
) -> bool {
    match fetch_army(catalog, army) {
        Ok(data) => {
            session.load_army(data);
            true
        }
        Err(e) => {
            tracing::error!(army, error = %e, "army load failed");
            presenter.report(&format!("Failed to load {}: {}", army, e));
            false
        }
    }
}

// ── Loop ───────────────────────────────────────────────────────────────

/// Feed `input` to the session line by line. Blank lines and `#` comments
/// are skipped. Nothing here is fatal except failing to read input.
pub fn run<R, W>(
    session: &mut ArmySession,
    catalog: &dyn CatalogProvider,
    input: R,
    presenter: &mut TextPresenter<W>,
    resolves: &dyn Fn(&str) -> bool,
) -> io::Result<PlaySummary>
where
    R: BufRead,
    W: Write,
{
    let mut summary = PlaySummary::default();
    redraw(session, presenter, resolves, true);

    for (n, line) in input.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let action = match parse_command(line) {
            Ok(Command::Apply(a)) => a,
            Ok(Command::SelectArmy(army)) => {
                if select_army(session, catalog, &army, presenter) {
                    summary.applied += 1;
                    redraw(session, presenter, resolves, true);
                } else {
                    summary.rejected += 1;
                }
                continue;
            }
            Err(e) => {
                presenter.report(&format!("line {}: not an action ({})", n + 1, e));
                summary.rejected += 1;
                continue;
            }
        };

        match apply_action(session, action) {
            Ok(outcome) => {
                summary.applied += 1;
                // Warband buttons on warrior cards change with the warband list.
                let catalog_changed =
                    matches!(outcome, Outcome::WarbandStarted(_) | Outcome::WarbandRemoved(_));
                redraw(session, presenter, resolves, catalog_changed);
            }
            Err(e) if e.is_guard() => {
                tracing::warn!(line = n + 1, error = %e, "ignored action");
                summary.ignored += 1;
            }
            Err(e) => {
                presenter.report(&e.to_string());
                summary.rejected += 1;
            }
        }
    }
    tracing::debug!(?summary, "input exhausted");
    Ok(summary)
}

fn redraw<W: Write>(
    session: &ArmySession,
    presenter: &mut TextPresenter<W>,
    resolves: &dyn Fn(&str) -> bool,
    with_catalog: bool,
) {
    if with_catalog {
        if let Some(catalog) = view::catalog_view(session, resolves) {
            presenter.render_catalog(&catalog);
        }
    }
    view::render_army(session, presenter);
}
