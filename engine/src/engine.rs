// ═══════════════════════════════════════════════════════════════════════
// Action dispatch — user actions in, session mutations out
//
// The engine never does I/O. A presentation layer turns clicks (or script
// lines) into `Action`s, feeds them to `apply_action()`, and re-renders
// the whole army afterwards.
// ═══════════════════════════════════════════════════════════════════════

use crate::error::SessionError;
use crate::session::ArmySession;
use crate::types::*;
use serde::{Deserialize, Serialize};

/// Everything a user can do to an army list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// "Start Warband" on a hero card.
    StartWarband { hero: String },

    /// "Add to Warband N" on a warrior card.
    AddFollower { warband: WarbandId, unit: String },

    /// Wargear checkbox on the hero block (`hero = true`) or a single unit.
    ToggleOption {
        warband: WarbandId,
        instance: InstanceId,
        option: String,
        #[serde(default)]
        hero: bool,
    },

    /// "Delete" on a warband header.
    RemoveWarband { warband: WarbandId },

    /// "+" / "-" on a stack.
    AdjustStack {
        warband: WarbandId,
        unit: String,
        #[serde(default)]
        options: OptionSet,
        delta: i32,
    },

    /// Wargear checkbox on a stack: moves one model to another configuration.
    ToggleStackOption {
        warband: WarbandId,
        unit: String,
        #[serde(default)]
        options: OptionSet,
        option: String,
    },
}

/// What an action changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    WarbandStarted(WarbandId),
    FollowerAdded(InstanceId),
    OptionToggled,
    WarbandRemoved(WarbandId),
    /// Number of models added or removed.
    StackAdjusted(usize),
    StackOptionToggled(InstanceId),
}

/// Apply a single action. On error the session is unchanged.
pub fn apply_action(session: &mut ArmySession, action: Action) -> Result<Outcome, SessionError> {
    match action {
        Action::StartWarband { hero } => session.start_warband(&hero).map(Outcome::WarbandStarted),
        Action::AddFollower { warband, unit } => {
            session.add_follower(warband, &unit).map(Outcome::FollowerAdded)
        }
        Action::ToggleOption { warband, instance, option, hero } => session
            .toggle_option(warband, instance, &option, hero)
            .map(|()| Outcome::OptionToggled),
        Action::RemoveWarband { warband } => {
            session.remove_warband(warband).map(|wb| Outcome::WarbandRemoved(wb.id))
        }
        Action::AdjustStack { warband, unit, options, delta } => session
            .set_stack_count(warband, &unit, &options, delta)
            .map(Outcome::StackAdjusted),
        Action::ToggleStackOption { warband, unit, options, option } => session
            .toggle_stack_option(warband, &unit, &options, &option)
            .map(Outcome::StackOptionToggled),
    }
}
