use crate::driver::{solve, Creator, LiapOutcome, Solution};
use crate::errors::{LiapError, LiapResult};
use crate::objective::liap_value;
use crate::params::LiapParams;
use crate::status::CancellationToken;

use efg_lite::game::{GameTree, NodeId, Player};
use efg_lite::strategy::BehaviorProfile;
use efg_lite::vector::ProfileShape;
use log::{debug, info, warn};
use noisy_float::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Subgame identifier of every (player, infoset): the 1-based rank, in a list
/// of subgame roots, of the nearest listed root above the infoset's
/// representative node.
#[derive(Debug, Clone, PartialEq)]
pub struct SubgameMap {
    roots: Vec<NodeId>,
    ids: Vec<Vec<usize>>,
}

impl SubgameMap {
    /// Fails with a consistency fault if some infoset is not below any of `roots`.
    pub fn new(game: &GameTree, roots: &[NodeId]) -> LiapResult<SubgameMap> {
        let mut ids = Vec::with_capacity(game.num_players());
        for player in game.players() {
            let mut player_ids = Vec::with_capacity(game.num_infosets(player));
            for (infoset_id, infoset) in game.infosets(player).iter().enumerate() {
                let unmapped = LiapError::UnmappedInfoset {
                    player,
                    infoset: infoset_id,
                };
                let mut cur = Some(infoset.representative().ok_or_else(|| unmapped.clone())?);
                let mut id = None;
                while let Some(node) = cur {
                    if let Some(pos) = roots.iter().position(|r| *r == node) {
                        id = Some(pos + 1);
                        break;
                    }
                    cur = game.parent(node);
                }
                player_ids.push(id.ok_or(unmapped)?);
            }
            ids.push(player_ids);
        }
        Ok(SubgameMap {
            roots: roots.to_vec(),
            ids,
        })
    }

    /// Map over the game's marked subgame roots.
    pub fn from_marked(game: &GameTree) -> LiapResult<SubgameMap> {
        SubgameMap::new(game, &game.marked_subgame_roots())
    }

    pub fn subgame(&self, player: Player, infoset: usize) -> usize {
        self.ids[player.index()][infoset]
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn num_subgames(&self) -> usize {
        self.roots.len()
    }

    /// Infosets of `subgame`, player-major and in ascending order.
    pub fn infosets<'a>(&'a self, subgame: usize) -> impl Iterator<Item = (Player, usize)> + 'a {
        self.ids.iter().enumerate().flat_map(move |(pl, ids)| {
            ids.iter()
                .enumerate()
                .filter(move |(_, id)| **id == subgame)
                .map(move |(infoset, _)| (Player(pl), infoset))
        })
    }
}

/// Solves a game one subgame at a time. Keeps a running full-game profile,
/// a counter of the subgames solved so far and the evaluations they used.
pub struct SubgameDecomposer<'a> {
    game: &'a GameTree,
    params: LiapParams,
    map: SubgameMap,
    profile: BehaviorProfile,
    subgame_number: usize,
    num_evals: u64,
}

impl<'a> SubgameDecomposer<'a> {
    /// Decomposer over all marked subgame roots of `game`.
    pub fn new(
        game: &'a GameTree,
        params: LiapParams,
        start: &BehaviorProfile,
    ) -> LiapResult<SubgameDecomposer<'a>> {
        Self::with_roots(game, params, start, game.marked_subgame_roots())
    }

    /// Decomposer over an explicit list of subgame roots, nested roots first.
    pub fn with_roots(
        game: &'a GameTree,
        params: LiapParams,
        start: &BehaviorProfile,
        roots: Vec<NodeId>,
    ) -> LiapResult<SubgameDecomposer<'a>> {
        params.validate()?;
        let shape = game.shape();
        if **start.shape() != *shape {
            return Err(LiapError::DimensionMismatch {
                expected: shape.dimension(),
                found: start.shape().dimension(),
            });
        }
        let map = SubgameMap::new(game, &roots)?;
        Ok(SubgameDecomposer {
            game,
            params,
            map,
            profile: start.clone(),
            subgame_number: 0,
            num_evals: 0,
        })
    }

    pub fn map(&self) -> &SubgameMap {
        &self.map
    }

    /// Running full-game profile.
    pub fn profile(&self) -> &BehaviorProfile {
        &self.profile
    }

    /// Number of subgames solved so far.
    pub fn subgame_number(&self) -> usize {
        self.subgame_number
    }

    pub fn num_evals(&self) -> u64 {
        self.num_evals
    }

    /// Solves the next subgame. `subgame` is the standalone game of that
    /// subgame, its infosets in the same relative order as in the full game.
    /// The restart sampler of the k-th subgame is seeded with `seed + k - 1`.
    pub fn solve_subgame(
        &mut self,
        subgame: &GameTree,
        token: &CancellationToken,
    ) -> LiapResult<LiapOutcome> {
        self.subgame_number += 1;
        let start = self.restrict(self.subgame_number, subgame.shape())?;
        let params = LiapParams {
            seed: self
                .params
                .seed
                .map(|seed| seed.wrapping_add(self.subgame_number as u64 - 1)),
            ..self.params.clone()
        };

        let outcome = solve(subgame, &start, &params, token)?;
        self.num_evals += outcome.num_evals;
        if self.params.trace >= 1 {
            info!(
                "Subgame {}: {} solutions in {} tries, {} evaluations",
                self.subgame_number,
                outcome.solutions.len(),
                outcome.num_tries,
                outcome.num_evals
            );
        }
        Ok(outcome)
    }

    /// Writes a solution of the last solved subgame into the running profile.
    pub fn overlay(&mut self, fragment: &BehaviorProfile) -> LiapResult<()> {
        self.check_fragment(self.subgame_number, fragment.shape())?;
        let mut offset = 0;
        let entries = fragment.inner().as_slice();
        for (player, infoset) in self.map.infosets(self.subgame_number) {
            let probs = self.profile.infoset_mut(player, infoset);
            probs.copy_from_slice(&entries[offset..offset + probs.len()]);
            offset += probs.len();
        }
        Ok(())
    }

    /// Restriction of the running profile to the infosets of `subgame`.
    fn restrict(&self, subgame: usize, shape: Arc<ProfileShape>) -> LiapResult<BehaviorProfile> {
        self.check_fragment(subgame, &shape)?;
        let mut entries = Vec::with_capacity(shape.dimension());
        for (player, infoset) in self.map.infosets(subgame) {
            entries.extend_from_slice(self.profile.infoset(player, infoset));
        }
        Ok(BehaviorProfile::from_vec(shape, entries))
    }

    fn check_fragment(&self, subgame: usize, shape: &ProfileShape) -> LiapResult<()> {
        let mut num_actions = vec![vec![]; self.game.num_players()];
        for (player, infoset) in self.map.infosets(subgame) {
            num_actions[player.index()].push(self.game.num_actions(player, infoset));
        }
        let restricted = ProfileShape::new(num_actions);
        if restricted != *shape {
            return Err(LiapError::SubgameShapeMismatch {
                subgame,
                expected: shape.dimension(),
                found: restricted.dimension(),
            });
        }
        Ok(())
    }
}

/// Result of solving a game subgame by subgame.
#[derive(Debug, Clone)]
pub struct DecomposedOutcome {
    /// Solutions of every subgame attempted, in the order solved.
    pub per_subgame: Vec<Vec<Solution>>,
    /// Running profile with the best solution of every subgame laid over the start.
    pub profile: BehaviorProfile,
    /// The composed profile as a solution, when every subgame was solved.
    pub solution: Option<Solution>,
    pub num_evals: u64,
    pub cancelled: bool,
}

/// Solves the subgames of `game` from the innermost outwards. Each subgame
/// sees the subgames nested in it, which are already solved, as terminal
/// nodes paying their expected values. The lowest-valued solution of each
/// subgame is kept.
///
/// Only marked roots at most `max_depth` marked roots deep are used; `0`
/// uses all of them.
pub fn solve_decomposed(
    game: &GameTree,
    start: &BehaviorProfile,
    params: &LiapParams,
    max_depth: usize,
    token: &CancellationToken,
) -> LiapResult<DecomposedOutcome> {
    let roots: Vec<NodeId> = game
        .marked_subgame_roots()
        .into_iter()
        .filter(|root| max_depth == 0 || game.subgame_depth(*root) <= max_depth)
        .collect();
    debug!("Solving {} subgames rooted at {:?}", roots.len(), roots);

    let mut decomposer = SubgameDecomposer::with_roots(game, params.clone(), start, roots.clone())?;
    let mut per_subgame = Vec::with_capacity(roots.len());
    let mut complete = true;
    let mut cancelled = false;

    for (k, root) in roots.iter().enumerate() {
        let node_values = game.node_values(decomposer.profile());
        let cuts: BTreeMap<NodeId, Vec<f64>> = roots[..k]
            .iter()
            .filter(|r| game.is_ancestor(*root, **r))
            .map(|r| (*r, node_values[*r].clone()))
            .collect();
        let subgame = game.extract_subgame(*root, &cuts)?;

        let outcome = decomposer.solve_subgame(&subgame, token)?;
        match outcome.solutions.iter().min_by_key(|s| r64(s.value())) {
            Some(best) => decomposer.overlay(best.profile())?,
            None => {
                warn!(
                    "No solution for subgame {} rooted at node {}, keeping the start profile",
                    k + 1,
                    root
                );
                complete = false;
            }
        }
        per_subgame.push(outcome.solutions);

        if outcome.cancelled {
            cancelled = true;
            break;
        }
    }

    let profile = decomposer.profile().clone();
    let solution = if complete && !cancelled {
        let value = liap_value(game, &profile);
        Some(Solution::new(profile.clone(), value, Creator::LiapBySubgame))
    } else {
        None
    };
    Ok(DecomposedOutcome {
        per_subgame,
        profile,
        solution,
        num_evals: decomposer.num_evals(),
        cancelled,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_generators::{centipede, entry, pennies};

    #[test]
    fn map_of_nested_subgames() {
        let game = centipede::game(4).unwrap();
        let map = SubgameMap::from_marked(&game).unwrap();
        assert_eq!(map.roots(), &[6, 4, 2, 0]);
        assert_eq!(map.num_subgames(), 4);
        // Stage k belongs to player k % 2 and is rooted at node 2k.
        assert_eq!(map.subgame(Player(0), 0), 4);
        assert_eq!(map.subgame(Player(1), 0), 3);
        assert_eq!(map.subgame(Player(0), 1), 2);
        assert_eq!(map.subgame(Player(1), 1), 1);
        assert_eq!(map.infosets(2).collect::<Vec<_>>(), vec![(Player(0), 1)]);
    }

    #[test]
    fn map_without_subgames() {
        let game = pennies::game().unwrap();
        let map = SubgameMap::from_marked(&game).unwrap();
        assert_eq!(map.num_subgames(), 1);
        assert_eq!(
            map.infosets(1).collect::<Vec<_>>(),
            vec![(Player(0), 0), (Player(1), 0)]
        );
    }

    #[test]
    fn unmapped_infoset() {
        let game = entry::game().unwrap();
        let start = BehaviorProfile::uniform(game.shape());
        let err = SubgameDecomposer::with_roots(&game, LiapParams::default(), &start, vec![2])
            .err()
            .unwrap();
        assert_eq!(
            err,
            LiapError::UnmappedInfoset {
                player: Player(0),
                infoset: 0
            }
        );
        assert!(err.is_consistency_fault());
    }

    #[test]
    fn restrict_and_overlay() {
        let game = entry::game().unwrap();
        let mut start = BehaviorProfile::uniform(game.shape());
        start.infoset_mut(Player(0), 1).copy_from_slice(&[0.9, 0.1]);
        let mut decomposer = SubgameDecomposer::new(&game, LiapParams::default(), &start).unwrap();
        assert_eq!(decomposer.map().roots(), &[2, 0]);

        let pricing = game.extract_subgame(2, &BTreeMap::new()).unwrap();
        let restricted = decomposer.restrict(1, pricing.shape()).unwrap();
        assert_eq!(restricted.inner().as_slice(), &[0.9, 0.1, 0.5, 0.5]);

        decomposer.subgame_number = 1;
        let fragment = BehaviorProfile::from_vec(pricing.shape(), vec![0.0, 1.0, 0.25, 0.75]);
        decomposer.overlay(&fragment).unwrap();
        assert_eq!(decomposer.profile().infoset(Player(0), 0), &[0.5, 0.5]);
        assert_eq!(decomposer.profile().infoset(Player(0), 1), &[0.0, 1.0]);
        assert_eq!(decomposer.profile().infoset(Player(1), 0), &[0.25, 0.75]);

        // The whole game does not fit the first subgame.
        match decomposer.restrict(1, game.shape()) {
            Err(LiapError::SubgameShapeMismatch { subgame: 1, .. }) => {}
            other => panic!("Expected a shape mismatch, got {:?}", other),
        }
    }
}
