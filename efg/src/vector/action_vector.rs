use crate::game::Player;
use crate::vector::ProfileShape;

use std::ops::{AddAssign, Index, IndexMut, MulAssign, Sub, SubAssign};
use std::sync::Arc;

/// A vector laid out by a `ProfileShape`, with one entry per
/// (player, infoset, action) triple.
#[derive(Debug, Clone)]
pub struct ActionVector {
    shape: Arc<ProfileShape>,

    pub entries: Vec<f64>,
}

impl ActionVector {
    pub fn from_constant(shape: Arc<ProfileShape>, c: f64) -> ActionVector {
        let entries = vec![c; shape.dimension()];
        ActionVector { shape, entries }
    }

    /// Converts array into `ActionVector`. Clones the contents of the array.
    pub fn from_array(shape: Arc<ProfileShape>, initial_entries: &[f64]) -> ActionVector {
        assert_eq!(shape.dimension(), initial_entries.len());
        ActionVector {
            shape,
            entries: initial_entries.to_vec(),
        }
    }

    /// Converts vec into `ActionVector`, consuming it.
    pub fn from_vec(shape: Arc<ProfileShape>, initial_entries: Vec<f64>) -> ActionVector {
        assert_eq!(shape.dimension(), initial_entries.len());
        ActionVector {
            shape,
            entries: initial_entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn shape(&self) -> &Arc<ProfileShape> {
        &self.shape
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.entries
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.entries
    }

    /// Overwrites every entry with those of `values`.
    pub fn copy_from_slice(&mut self, values: &[f64]) {
        assert_eq!(self.len(), values.len());
        self.entries.copy_from_slice(values);
    }

    /// Entries belonging to one infoset, in action order.
    pub fn infoset(&self, player: Player, infoset: usize) -> &[f64] {
        &self.entries[self.shape.infoset_range(player, infoset)]
    }

    pub fn infoset_mut(&mut self, player: Player, infoset: usize) -> &mut [f64] {
        let range = self.shape.infoset_range(player, infoset);
        &mut self.entries[range]
    }

    pub fn inner(&self, other: &Self) -> f64 {
        assert_eq!(self.len(), other.len());
        self.entries
            .iter()
            .zip(other.entries.iter())
            .map(|(x, y)| x * y)
            .sum()
    }

    /// Compute L2-norm of the `ActionVector`.
    pub fn l2_norm(&self) -> f64 {
        self.entries.iter().map(|x| x * x).sum::<f64>().sqrt()
    }

    /// Compute max-norm of the `ActionVector`. Zero for an empty vector.
    pub fn max_norm(&self) -> f64 {
        self.entries.iter().map(|x| x.abs()).fold(0f64, f64::max)
    }
}

impl Index<(Player, usize, usize)> for ActionVector {
    type Output = f64;

    fn index(&self, (player, infoset, action): (Player, usize, usize)) -> &f64 {
        &self.entries[self.shape.index(player, infoset, action)]
    }
}

impl IndexMut<(Player, usize, usize)> for ActionVector {
    fn index_mut(&mut self, (player, infoset, action): (Player, usize, usize)) -> &mut f64 {
        let index = self.shape.index(player, infoset, action);
        &mut self.entries[index]
    }
}

impl<'b> SubAssign<&'b ActionVector> for ActionVector {
    fn sub_assign(&mut self, other: &'b ActionVector) {
        assert_eq!(self.len(), other.len());
        for (x, y) in self.entries.iter_mut().zip(other.entries.iter()) {
            *x -= y;
        }
    }
}

impl<'b> AddAssign<&'b ActionVector> for ActionVector {
    fn add_assign(&mut self, other: &'b ActionVector) {
        assert_eq!(self.len(), other.len());
        for (x, y) in self.entries.iter_mut().zip(other.entries.iter()) {
            *x += y;
        }
    }
}

impl MulAssign<f64> for ActionVector {
    fn mul_assign(&mut self, mul: f64) {
        for x in self.entries.iter_mut() {
            *x *= mul;
        }
    }
}

impl<'b> Sub<&'b ActionVector> for &ActionVector {
    type Output = ActionVector;
    fn sub(self, other: &'b ActionVector) -> ActionVector {
        let mut obj = self.clone();
        obj -= other;
        obj
    }
}
