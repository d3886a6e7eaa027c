#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure scoreboard system that folds world events into kill and death tallies.

use std::collections::BTreeMap;

use wizard_duel_core::{Event, WizardId};

/// Kill and death counts of a single wizard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    /// Kills credited to the wizard; self-kills subtract one.
    pub kills: i32,
    /// Times the wizard died.
    pub deaths: u32,
}

/// Running tallies for every wizard seen in the event stream.
#[derive(Debug, Default)]
pub struct Scoreboard {
    tallies: BTreeMap<WizardId, Tally>,
}

impl Scoreboard {
    /// Creates an empty scoreboard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes world events, updating the tallies.
    ///
    /// Kills are only credited to wizards whose spawn has been observed.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            match *event {
                Event::WizardSpawned { wizard, .. } => {
                    let _ = self.tallies.entry(wizard).or_default();
                }
                Event::WizardKilled { victim, killer } => self.record_kill(victim, killer),
                _ => {}
            }
        }
    }

    fn record_kill(&mut self, victim: WizardId, killer: WizardId) {
        if let Some(tally) = self.tallies.get_mut(&victim) {
            tally.deaths += 1;
            if killer == victim {
                tally.kills -= 1;
                return;
            }
        }
        if let Some(tally) = self.tallies.get_mut(&killer) {
            tally.kills += 1;
        }
    }

    /// Tally of a single wizard, if it has been seen.
    #[must_use]
    pub fn tally(&self, wizard: WizardId) -> Option<Tally> {
        self.tallies.get(&wizard).copied()
    }

    /// Every wizard ranked by kills (descending), then deaths (ascending),
    /// then identifier.
    #[must_use]
    pub fn standings(&self) -> Vec<(WizardId, Tally)> {
        let mut ranked: Vec<(WizardId, Tally)> =
            self.tallies.iter().map(|(id, tally)| (*id, *tally)).collect();
        ranked.sort_by(|(left_id, left), (right_id, right)| {
            right
                .kills
                .cmp(&left.kills)
                .then(left.deaths.cmp(&right.deaths))
                .then(left_id.cmp(right_id))
        });
        ranked
    }

    /// Wizard at the top of the standings.
    #[must_use]
    pub fn leader(&self) -> Option<WizardId> {
        self.standings().first().map(|(id, _)| *id)
    }
}
