// ═══════════════════════════════════════════════════════════════════════
// Army session — the authoritative in-memory army state
//
// Every mutation either completes or leaves the session untouched. Guard
// errors (unknown ids) are returned so callers can log them, but they
// never change state.
// ═══════════════════════════════════════════════════════════════════════

use crate::error::SessionError;
use crate::types::*;

#[derive(Debug, Clone, Default)]
pub struct ArmySession {
    army: Option<ArmyData>,
    warbands: Vec<Warband>,
    next_id: u64,
}

impl ArmySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session with `army` already selected.
    pub fn with_army(army: ArmyData) -> Self {
        let mut session = Self::new();
        session.load_army(army);
        session
    }

    /// Select a new army. Clears the current list; ids keep counting.
    pub fn load_army(&mut self, army: ArmyData) {
        tracing::info!(
            army = army.title(),
            heroes = army.heroes.len(),
            warriors = army.warriors.len(),
            "army selected"
        );
        self.army = Some(army);
        self.warbands.clear();
    }

    pub fn army(&self) -> Option<&ArmyData> {
        self.army.as_ref()
    }

    pub fn warbands(&self) -> &[Warband] {
        &self.warbands
    }

    pub fn warband(&self, id: WarbandId) -> Option<&Warband> {
        self.warbands.iter().find(|w| w.id == id)
    }

    fn warband_mut(&mut self, id: WarbandId) -> Result<&mut Warband, SessionError> {
        self.warbands
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or(SessionError::UnknownWarband(id))
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn army_data(&self) -> Result<&ArmyData, SessionError> {
        self.army.as_ref().ok_or(SessionError::NoArmyLoaded)
    }

    fn warrior_template(&self, template_id: &str) -> Result<UnitTemplate, SessionError> {
        self.army_data()?
            .warrior(template_id)
            .cloned()
            .ok_or_else(|| SessionError::UnknownTemplate(template_id.to_string()))
    }

    // ── Operations ─────────────────────────────────────────────────────

    /// Create a warband led by a fresh instance of the hero template.
    pub fn start_warband(&mut self, hero_template_id: &str) -> Result<WarbandId, SessionError> {
        let template = self
            .army_data()?
            .hero(hero_template_id)
            .cloned()
            .ok_or_else(|| SessionError::UnknownTemplate(hero_template_id.to_string()))?;

        let id = WarbandId(self.next());
        let hero = UnitInstance::new(InstanceId(self.next()), &template);
        tracing::debug!(warband = %id, hero = %template.name, "warband started");
        self.warbands.push(Warband { id, hero, followers: Vec::new() });
        Ok(id)
    }

    /// Append a follower with no options selected, if the hero has room.
    pub fn add_follower(
        &mut self,
        warband_id: WarbandId,
        template_id: &str,
    ) -> Result<InstanceId, SessionError> {
        self.add_configured(warband_id, template_id, &OptionSet::new())
    }

    fn add_configured(
        &mut self,
        warband_id: WarbandId,
        template_id: &str,
        options: &OptionSet,
    ) -> Result<InstanceId, SessionError> {
        let template = self.warrior_template(template_id)?;
        if let Some(missing) = options.iter().find(|o| !template.has_option(o)) {
            return Err(SessionError::UnknownOption {
                template: template.id.clone(),
                option: missing.clone(),
            });
        }

        let wb = self.warband_mut(warband_id)?;
        if wb.is_full() {
            return Err(SessionError::CapacityExceeded {
                hero: wb.hero.name().to_string(),
                capacity: wb.capacity(),
            });
        }

        let instance_id = InstanceId(self.next());
        let mut unit = UnitInstance::new(instance_id, &template);
        unit.selected = options.clone();
        let wb = self.warband_mut(warband_id)?;
        wb.followers.push(unit);
        tracing::debug!(
            warband = %warband_id,
            unit = %template.name,
            followers = wb.followers.len(),
            "follower added"
        );
        Ok(instance_id)
    }

    /// Flip one option on the hero (`is_hero`) or on a single follower.
    pub fn toggle_option(
        &mut self,
        warband_id: WarbandId,
        instance_id: InstanceId,
        option_id: &str,
        is_hero: bool,
    ) -> Result<(), SessionError> {
        let wb = self.warband_mut(warband_id)?;
        let unit = if is_hero {
            &mut wb.hero
        } else {
            wb.follower_mut(instance_id)
                .ok_or(SessionError::UnknownInstance(instance_id))?
        };
        if !unit.toggle(option_id) {
            return Err(SessionError::UnknownOption {
                template: unit.template.id.clone(),
                option: option_id.to_string(),
            });
        }
        tracing::debug!(warband = %warband_id, unit = %unit.name(), option = option_id, "option toggled");
        Ok(())
    }

    /// Delete a warband together with its hero and every follower.
    pub fn remove_warband(&mut self, warband_id: WarbandId) -> Result<Warband, SessionError> {
        let idx = self
            .warbands
            .iter()
            .position(|w| w.id == warband_id)
            .ok_or(SessionError::UnknownWarband(warband_id))?;
        let removed = self.warbands.remove(idx);
        tracing::debug!(warband = %warband_id, followers = removed.followers.len(), "warband removed");
        Ok(removed)
    }

    /// Grow or shrink the stack identified by `(template_id, options)`.
    ///
    /// A positive delta adds that many models one at a time and quietly stops
    /// at the hero's capacity; only a warband that is already full reports
    /// `CapacityExceeded`. A negative delta removes a single matching model,
    /// whatever its magnitude. Returns the number of models added or removed.
    pub fn set_stack_count(
        &mut self,
        warband_id: WarbandId,
        template_id: &str,
        options: &OptionSet,
        delta: i32,
    ) -> Result<usize, SessionError> {
        if delta > 0 {
            let mut added = 0;
            for _ in 0..delta {
                match self.add_configured(warband_id, template_id, options) {
                    Ok(_) => added += 1,
                    Err(SessionError::CapacityExceeded { .. }) if added > 0 => break,
                    Err(e) => return Err(e),
                }
            }
            Ok(added)
        } else if delta < 0 {
            let wb = self.warband_mut(warband_id)?;
            let idx = wb
                .find_in_stack(template_id, options)
                .ok_or_else(|| unknown_stack(template_id, options))?;
            let unit = wb.followers.remove(idx);
            tracing::debug!(warband = %warband_id, unit = %unit.name(), "follower removed from stack");
            Ok(1)
        } else {
            Ok(0)
        }
    }

    /// Toggle `option_id` on one model of a stack, moving it to another stack.
    pub fn toggle_stack_option(
        &mut self,
        warband_id: WarbandId,
        template_id: &str,
        options: &OptionSet,
        option_id: &str,
    ) -> Result<InstanceId, SessionError> {
        let wb = self.warband_mut(warband_id)?;
        let idx = wb
            .find_in_stack(template_id, options)
            .ok_or_else(|| unknown_stack(template_id, options))?;
        let unit = &mut wb.followers[idx];
        if !unit.toggle(option_id) {
            return Err(SessionError::UnknownOption {
                template: template_id.to_string(),
                option: option_id.to_string(),
            });
        }
        tracing::debug!(warband = %warband_id, unit = %unit.name(), option = option_id, "stack option toggled");
        Ok(unit.instance_id)
    }
}

fn unknown_stack(template_id: &str, options: &OptionSet) -> SessionError {
    SessionError::UnknownStack {
        template: template_id.to_string(),
        options: options.clone(),
    }
}
