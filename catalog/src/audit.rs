// ═══════════════════════════════════════════════════════════════════════
// Catalog audit — load every manifest entry and sanity-check its data
// ═══════════════════════════════════════════════════════════════════════

use crate::error::{CatalogError, CatalogResult};
use crate::provider::CatalogProvider;
use mesbg_engine::types::{ArmyData, ManifestEntry, UnitTemplate};
use rayon::prelude::*;
use std::collections::HashSet;

/// Data problems that don't stop a file from loading but will confuse
/// the builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogIssue {
    DuplicateTemplate(String),
    DuplicateOption { template: String, option: String },
    /// Leads nobody.
    HeroWithoutRank(String),
    UnknownRank { hero: String, rank: String },
}

impl std::fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogIssue::DuplicateTemplate(id) => write!(f, "template id `{}` appears more than once", id),
            CatalogIssue::DuplicateOption { template, option } => {
                write!(f, "`{}` offers option `{}` more than once", template, option)
            }
            CatalogIssue::HeroWithoutRank(id) => write!(f, "hero `{}` has no rank", id),
            CatalogIssue::UnknownRank { hero, rank } => {
                write!(f, "hero `{}` has unrecognised rank `{}`", hero, rank)
            }
        }
    }
}

fn option_issues(t: &UnitTemplate, issues: &mut Vec<CatalogIssue>) {
    let mut seen = HashSet::new();
    for o in &t.options {
        if !seen.insert(o.id.as_str()) {
            issues.push(CatalogIssue::DuplicateOption { template: t.id.clone(), option: o.id.clone() });
        }
    }
}

/// Check one army file. Heroes and warriors share an id space.
pub fn validate(army: &ArmyData) -> Vec<CatalogIssue> {
    let mut issues = Vec::new();
    let mut ids = HashSet::new();

    for t in army.heroes.iter().chain(&army.warriors) {
        if !ids.insert(t.id.as_str()) {
            issues.push(CatalogIssue::DuplicateTemplate(t.id.clone()));
        }
        option_issues(t, &mut issues);
    }

    for h in &army.heroes {
        match &h.rank {
            None => issues.push(CatalogIssue::HeroWithoutRank(h.id.clone())),
            Some(rank) if !rank.is_known() => issues.push(CatalogIssue::UnknownRank {
                hero: h.id.clone(),
                rank: rank.to_string(),
            }),
            Some(_) => {}
        }
    }
    issues
}

/// Outcome of loading and checking one manifest entry.
#[derive(Debug)]
pub struct ArmyReport {
    pub entry: ManifestEntry,
    pub result: Result<Vec<CatalogIssue>, CatalogError>,
}

impl ArmyReport {
    pub fn loaded(&self) -> bool {
        self.result.is_ok()
    }
}

/// Load every army in the manifest in parallel. Reports come back in
/// manifest order.
pub fn audit<P>(catalog: &P) -> CatalogResult<Vec<ArmyReport>>
where
    P: CatalogProvider + Sync,
{
    let entries = catalog.manifest()?;
    let reports: Vec<ArmyReport> = entries
        .into_par_iter()
        .map(|entry| {
            let result = catalog.load_army(&entry.file).map(|army| validate(&army));
            if let Err(e) = &result {
                tracing::warn!(file = %entry.file, error = %e, "army failed to load");
            }
            ArmyReport { entry, result }
        })
        .collect();
    tracing::info!(
        armies = reports.len(),
        failed = reports.iter().filter(|r| !r.loaded()).count(),
        "catalog audited"
    );
    Ok(reports)
}
