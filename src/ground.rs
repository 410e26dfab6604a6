use rand::{Rng, RngCore};

use crate::level::{TileKind, TileSupport};

/// Square ground grid for the trail demo: side `2n + 1`, every tile walkable
/// except a single hole. The hole relocates through an injected random
/// source so games stay reproducible under a fixed seed.
#[derive(Debug, Clone)]
pub struct Ground {
    n: i32,
    hole: (i32, i32),
}

impl Ground {
    /// Creates a ground of side `2n + 1` with a randomized hole.
    pub fn new(n: i32, rng: &mut dyn RngCore) -> Self {
        let mut ground = Self {
            n: n.max(1),
            hole: (0, 0),
        };
        ground.relocate_hole(rng);
        ground
    }

    pub fn side(&self) -> i32 {
        2 * self.n + 1
    }

    /// The block's spawn tile; the hole never lands here.
    pub fn center(&self) -> (i32, i32) {
        (self.n, self.n)
    }

    pub fn hole(&self) -> (i32, i32) {
        self.hole
    }

    /// Moves the hole to a uniformly random tile, rejecting the center.
    pub fn relocate_hole(&mut self, rng: &mut dyn RngCore) {
        let side = self.side();
        loop {
            let hole = (rng.gen_range(0..side), rng.gen_range(0..side));
            if hole != self.center() {
                self.hole = hole;
                return;
            }
        }
    }

    /// Places the hole explicitly; out-of-range requests are ignored.
    pub fn set_hole(&mut self, x: i32, z: i32) {
        if self.in_range(x, z) {
            self.hole = (x, z);
        }
    }

    /// Uniformly random walkable tile, rejecting the hole.
    pub fn random_spawn_tile(&self, rng: &mut dyn RngCore) -> (i32, i32) {
        let side = self.side();
        loop {
            let tile = (rng.gen_range(0..side), rng.gen_range(0..side));
            if tile != self.hole {
                return tile;
            }
        }
    }

    fn in_range(&self, x: i32, z: i32) -> bool {
        x >= 0 && x < self.side() && z >= 0 && z < self.side()
    }
}

impl TileSupport for Ground {
    fn tile_kind(&self, x: i32, z: i32) -> TileKind {
        if !self.in_range(x, z) || (x, z) == self.hole {
            TileKind::Empty
        } else {
            TileKind::Normal
        }
    }
}
