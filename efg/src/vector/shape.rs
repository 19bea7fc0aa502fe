use crate::game::Player;
use std::ops::Range;

/// Layout of a vector indexed by (player, infoset, action) triples.
///
/// Entries are stored player-major, then infoset, then action, all zero-based.
/// This is the single place where a triple is translated into a flat offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileShape {
    num_actions: Vec<Vec<usize>>,
    offsets: Vec<Vec<usize>>,
    dimension: usize,
}

impl ProfileShape {
    /// `num_actions[player][infoset]` is the number of actions at that infoset.
    pub fn new(num_actions: Vec<Vec<usize>>) -> ProfileShape {
        let mut offsets = Vec::with_capacity(num_actions.len());
        let mut dimension = 0;
        for player_actions in num_actions.iter() {
            let mut player_offsets = Vec::with_capacity(player_actions.len());
            for &k in player_actions.iter() {
                player_offsets.push(dimension);
                dimension += k;
            }
            offsets.push(player_offsets);
        }

        ProfileShape {
            num_actions,
            offsets,
            dimension,
        }
    }

    pub fn num_players(&self) -> usize {
        self.num_actions.len()
    }

    pub fn num_infosets(&self, player: Player) -> usize {
        self.num_actions[player.index()].len()
    }

    pub fn num_actions(&self, player: Player, infoset: usize) -> usize {
        self.num_actions[player.index()][infoset]
    }

    /// Total number of entries.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn offset(&self, player: Player, infoset: usize) -> usize {
        self.offsets[player.index()][infoset]
    }

    /// Flat index of a (player, infoset, action) triple.
    pub fn index(&self, player: Player, infoset: usize, action: usize) -> usize {
        assert!(
            action < self.num_actions(player, infoset),
            "Action {} out of range at infoset {} of {}",
            action,
            infoset,
            player
        );
        self.offset(player, infoset) + action
    }

    /// Flat range covered by one infoset.
    pub fn infoset_range(&self, player: Player, infoset: usize) -> Range<usize> {
        let start = self.offset(player, infoset);
        start..start + self.num_actions(player, infoset)
    }

    /// All infosets in storage order, together with their flat ranges.
    pub fn blocks<'a>(&'a self) -> impl Iterator<Item = (Player, usize, Range<usize>)> + 'a {
        (0..self.num_players()).flat_map(move |pl| {
            (0..self.num_actions[pl].len())
                .map(move |iset| (Player(pl), iset, self.infoset_range(Player(pl), iset)))
        })
    }
}
