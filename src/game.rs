use glam::{Mat4, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::block::RollingBlock;
use crate::camera::Camera;
use crate::ground::Ground;
use crate::input::Command;
use crate::level::{Level, TileKind, TileSupport};
use crate::render::{LightParams, RenderInstance};

/// Downward speed of a block falling through a hole, in units per second.
const FALL_SPEED: f32 = 2.0;
/// How long the fall plays before the block respawns.
const FALL_DURATION: f32 = 1.0;

const TILE_THICKNESS: f32 = 0.1;

/// What the window loop needs from a playable scene.
pub trait Game {
    fn handle(&mut self, command: Command);
    fn update(&mut self, dt: f32);
    fn instances(&self) -> Vec<RenderInstance>;
    fn camera(&self) -> Camera;
    fn light(&self) -> LightParams;
}

/// The level-based puzzle: roll the prism onto the goal tile and stand up.
pub struct PuzzleGame {
    level: Level,
    block: RollingBlock,
    paused: bool,
    wins: u32,
}

impl PuzzleGame {
    pub fn new(level: Level) -> Self {
        let block = RollingBlock::new(level.start_position());
        Self {
            level,
            block,
            paused: false,
            wins: 0,
        }
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn block(&self) -> &RollingBlock {
        &self.block
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// How many times the goal has been reached this session.
    pub fn wins(&self) -> u32 {
        self.wins
    }

    fn board_center(&self) -> Vec3 {
        Vec3::new(
            self.level.width() as f32 * 0.5,
            0.0,
            self.level.height() as f32 * 0.5,
        )
    }
}

impl Game for PuzzleGame {
    fn handle(&mut self, command: Command) {
        match command {
            Command::Move(direction) => {
                if !self.paused {
                    self.block.queue_move(direction);
                }
            }
            Command::TogglePause => {
                self.paused = !self.paused;
                log::info!("{}", if self.paused { "paused" } else { "resumed" });
            }
            Command::Reset => {
                self.block.reset(self.level.start_position());
                log::info!("level restarted");
            }
        }
    }

    fn update(&mut self, dt: f32) {
        if self.paused {
            return;
        }
        self.block.update(dt, &self.level);
        if self.block.has_won(&self.level) {
            self.wins += 1;
            log::info!(
                "solved in {} moves ({} wins this session)",
                self.block.move_count(),
                self.wins
            );
            self.block.reset(self.level.start_position());
        } else if self.block.has_lost(&self.level) {
            log::info!("fell off after {} moves", self.block.move_count());
            self.block.reset(self.level.start_position());
        }
    }

    fn instances(&self) -> Vec<RenderInstance> {
        let mut instances: Vec<RenderInstance> = self
            .level
            .tiles()
            .map(|(x, z, kind)| RenderInstance {
                model: tile_slab(x, z),
                color: match kind {
                    TileKind::Goal => Vec3::new(0.95, 0.55, 0.15),
                    _ => checker_gray(x, z),
                },
            })
            .collect();
        instances.push(RenderInstance {
            model: self.block.model_matrix(),
            color: Vec3::new(0.0, 0.5, 1.0),
        });
        instances
    }

    fn camera(&self) -> Camera {
        let span = self.level.width().max(self.level.height()) as f32;
        Camera::overlooking(self.board_center(), span * 1.8 + 4.0)
    }

    fn light(&self) -> LightParams {
        light_over(self.board_center())
    }
}

/// State of the trail demo's fall-and-respawn sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
enum TrailPhase {
    Rolling,
    Falling { elapsed: f32 },
}

/// The open-ground demo: a cube wandering a square board with one hole that
/// jumps to a new tile after every committed move.
pub struct TrailGame {
    ground: Ground,
    block: RollingBlock,
    rng: StdRng,
    phase: TrailPhase,
    seen_moves: u32,
    paused: bool,
    falls: u32,
}

impl TrailGame {
    /// Board of side `2n + 1`; the same seed replays the same hole sequence.
    pub fn new(n: i32, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let ground = Ground::new(n, &mut rng);
        let block = RollingBlock::new(ground.center());
        Self {
            ground,
            block,
            rng,
            phase: TrailPhase::Rolling,
            seen_moves: 0,
            paused: false,
            falls: 0,
        }
    }

    pub fn ground(&self) -> &Ground {
        &self.ground
    }

    pub fn block(&self) -> &RollingBlock {
        &self.block
    }

    pub fn is_falling(&self) -> bool {
        matches!(self.phase, TrailPhase::Falling { .. })
    }

    /// How many times the cube has dropped through the hole.
    pub fn falls(&self) -> u32 {
        self.falls
    }

    #[cfg(test)]
    fn force_hole(&mut self, x: i32, z: i32) {
        self.ground.set_hole(x, z);
    }

    fn respawn(&mut self) {
        // New hole first so the spawn draw can reject it.
        self.ground.relocate_hole(&mut self.rng);
        let spawn = self.ground.random_spawn_tile(&mut self.rng);
        self.block.reset(spawn);
        self.seen_moves = 0;
        self.phase = TrailPhase::Rolling;
    }

    fn board_center(&self) -> Vec3 {
        let half = self.ground.side() as f32 * 0.5;
        Vec3::new(half, 0.0, half)
    }
}

impl Game for TrailGame {
    fn handle(&mut self, command: Command) {
        match command {
            Command::Move(direction) => {
                if !self.paused && !self.is_falling() {
                    self.block.queue_move(direction);
                }
            }
            Command::TogglePause => {
                self.paused = !self.paused;
                log::info!("{}", if self.paused { "paused" } else { "resumed" });
            }
            Command::Reset => {
                self.block.reset(self.ground.center());
                self.ground.relocate_hole(&mut self.rng);
                self.seen_moves = 0;
                self.phase = TrailPhase::Rolling;
                log::info!("board restarted");
            }
        }
    }

    fn update(&mut self, dt: f32) {
        if self.paused {
            return;
        }
        if let TrailPhase::Falling { elapsed } = self.phase {
            let elapsed = elapsed + dt;
            if elapsed >= FALL_DURATION {
                self.respawn();
            } else {
                self.phase = TrailPhase::Falling { elapsed };
            }
            return;
        }

        self.block.update(dt, &self.ground);
        if self.block.move_count() != self.seen_moves {
            self.seen_moves = self.block.move_count();
            self.ground.relocate_hole(&mut self.rng);
        }
        if self.block.has_lost(&self.ground) {
            self.falls += 1;
            log::info!("fell through the hole ({} falls)", self.falls);
            self.phase = TrailPhase::Falling { elapsed: 0.0 };
        }
    }

    fn instances(&self) -> Vec<RenderInstance> {
        let side = self.ground.side();
        let mut instances = Vec::with_capacity((side * side) as usize + 1);
        for z in 0..side {
            for x in 0..side {
                if self.ground.tile_kind(x, z) == TileKind::Empty {
                    continue;
                }
                instances.push(RenderInstance {
                    model: tile_slab(x, z),
                    color: checker_gray(x, z),
                });
            }
        }

        let mut model = self.block.model_matrix();
        if let TrailPhase::Falling { elapsed } = self.phase {
            let drop = FALL_SPEED * elapsed;
            model = Mat4::from_translation(Vec3::new(0.0, -drop, 0.0)) * model;
        }
        instances.push(RenderInstance {
            model,
            color: Vec3::new(0.36, 0.26, 0.56),
        });
        instances
    }

    fn camera(&self) -> Camera {
        let span = self.ground.side() as f32;
        Camera::overlooking(self.board_center(), span * 1.8 + 4.0)
    }

    fn light(&self) -> LightParams {
        light_over(self.board_center())
    }
}

/// Thin slab whose top face sits flush with the ground plane.
fn tile_slab(x: i32, z: i32) -> Mat4 {
    let center = Vec3::new(x as f32 + 0.5, -TILE_THICKNESS * 0.5, z as f32 + 0.5);
    Mat4::from_translation(center) * Mat4::from_scale(Vec3::new(1.0, TILE_THICKNESS, 1.0))
}

fn checker_gray(x: i32, z: i32) -> Vec3 {
    if (x + z) % 2 == 0 {
        Vec3::splat(0.75)
    } else {
        Vec3::splat(0.5)
    }
}

fn light_over(target: Vec3) -> LightParams {
    LightParams {
        position: target + Vec3::new(4.0, 12.0, 6.0),
        color: Vec3::ONE,
        intensity: 1.0,
    }
}
