//! Score groups and brackets.
//!
//! Players are grouped by exact score. Groups are ordered by score descending and
//! players inside a group by starting number ascending. The sorts are explicit so
//! that nothing depends on map iteration order.

use log::debug;
use std::collections::BTreeMap;

use crate::{history::PlayerCard, score::Score, tournament::StartNo};

/// Players sharing one score, ordered by starting number
#[derive(Clone, Debug)]
pub struct ScoreGroup<'h> {
    pub score: Score,
    pub players: Vec<&'h PlayerCard>,
}

impl<'h> ScoreGroup<'h> {
    pub fn start_nos(&self) -> Vec<StartNo> {
        self.players.iter().map(|card| card.start_no).collect()
    }
}

/// The working unit of pairing: one score group plus any downfloaters above it
#[derive(Clone, Debug, Default)]
pub struct Bracket<'h> {
    groups: Vec<ScoreGroup<'h>>,
}

impl<'h> Bracket<'h> {
    pub fn new(group: ScoreGroup<'h>) -> Self {
        Self {
            groups: vec![group],
        }
    }

    pub fn groups(&self) -> &[ScoreGroup<'h>] {
        &self.groups
    }

    /// Players in rank order (score descending, then starting number)
    pub fn players(&self) -> Vec<&'h PlayerCard> {
        self.groups
            .iter()
            .flat_map(|group| group.players.iter().copied())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(|group| group.players.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Score of the bracket's own (lowest) group
    pub fn score(&self) -> Score {
        self.groups
            .last()
            .map_or(Score::ZERO, |group| group.score)
    }

    /// Merge players into this bracket, keeping the group ordering strict
    pub fn absorb(&mut self, players: impl IntoIterator<Item = &'h PlayerCard>) {
        let merged = self.players().into_iter().chain(players);
        self.groups = group_by_score(merged);
    }

    /// Remove one player, dropping the group if it becomes empty
    pub fn remove(&mut self, start_no: StartNo) {
        for group in &mut self.groups {
            group.players.retain(|card| card.start_no != start_no);
        }
        self.groups.retain(|group| !group.players.is_empty());
    }
}

/// Group players by exact score, highest score first
pub fn group_by_score<'h>(players: impl IntoIterator<Item = &'h PlayerCard>) -> Vec<ScoreGroup<'h>> {
    let mut by_score: BTreeMap<Score, Vec<&'h PlayerCard>> = BTreeMap::new();
    for card in players {
        by_score.entry(card.score()).or_default().push(card);
    }

    by_score
        .into_iter()
        .rev()
        .map(|(score, mut players)| {
            players.sort_by_key(|card| card.start_no);
            players.dedup_by_key(|card| card.start_no);
            ScoreGroup { score, players }
        })
        .collect()
}

/// Builds the initial brackets for a round
pub struct BracketBuilder;

impl BracketBuilder {
    /// One singleton bracket per score group, highest score first
    pub fn build<'h>(eligible: impl IntoIterator<Item = &'h PlayerCard>) -> Vec<Bracket<'h>> {
        let brackets: Vec<Bracket<'h>> = group_by_score(eligible)
            .into_iter()
            .map(Bracket::new)
            .collect();

        debug!(
            "Built {} brackets: {:?}",
            brackets.len(),
            brackets
                .iter()
                .map(|b| (b.score().to_string(), b.len()))
                .collect::<Vec<_>>()
        );
        brackets
    }
}
