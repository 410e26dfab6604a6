use std::collections::VecDeque;
use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::level::{TileKind, TileSupport};

/// Wall-clock duration of one 90° roll.
pub const ANIMATION_DURATION: f32 = 0.2;

/// Discrete directional input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit displacement of one tile of travel in world space.
    fn travel(self) -> Vec3 {
        match self {
            Direction::Up => Vec3::new(0.0, 0.0, -1.0),
            Direction::Down => Vec3::new(0.0, 0.0, 1.0),
            Direction::Left => Vec3::new(-1.0, 0.0, 0.0),
            Direction::Right => Vec3::new(1.0, 0.0, 0.0),
        }
    }

    /// Axis of the roll rotation: perpendicular to travel, in the ground plane.
    fn rotation_axis(self) -> Vec3 {
        match self {
            Direction::Up | Direction::Down => Vec3::X,
            Direction::Left | Direction::Right => Vec3::Z,
        }
    }

    /// Signed end angle of the roll, chosen so the top face tips toward travel.
    fn rotation_angle(self) -> f32 {
        match self {
            Direction::Up | Direction::Right => -FRAC_PI_2,
            Direction::Down | Direction::Left => FRAC_PI_2,
        }
    }

    fn along_x(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

/// Which axis the long side of the 1×2×1 prism lies along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Standing,
    LyingX,
    LyingZ,
}

impl Orientation {
    /// World-space extents of the prism in this orientation.
    pub fn extents(self) -> Vec3 {
        match self {
            Orientation::Standing => Vec3::new(1.0, 2.0, 1.0),
            Orientation::LyingX => Vec3::new(2.0, 1.0, 1.0),
            Orientation::LyingZ => Vec3::new(1.0, 1.0, 2.0),
        }
    }

    fn lies_along(self, direction: Direction) -> bool {
        match self {
            Orientation::Standing => false,
            Orientation::LyingX => direction.along_x(),
            Orientation::LyingZ => !direction.along_x(),
        }
    }

    /// Half extent measured along the travel axis; locates the pivot edge.
    fn half_extent_along(self, direction: Direction) -> f32 {
        if self.lies_along(direction) {
            1.0
        } else {
            0.5
        }
    }
}

/// Grid tiles covered by the block's base: one standing, two lying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Footprint {
    tiles: [(i32, i32); 2],
    len: usize,
}

impl Footprint {
    pub fn tiles(&self) -> &[(i32, i32)] {
        &self.tiles[..self.len]
    }

    pub fn is_supported(&self, support: &dyn TileSupport) -> bool {
        self.tiles()
            .iter()
            .all(|&(x, z)| support.tile_kind(x, z).is_supported())
    }
}

/// In-flight roll; committed to the block only when progress reaches 1.
#[derive(Debug, Clone)]
struct Roll {
    end_center: Vec3,
    end_orientation: Orientation,
    pivot: Vec3,
    axis: Vec3,
    angle: f32,
    progress: f32,
}

/// The block/cube movement state machine.
///
/// `center` is the world-space center of the base footprint on the ground
/// plane; the footprint is always derived from it and the orientation rather
/// than stored. Moves are queued, validated one at a time against the tile
/// support, and animated as a 90° rotation about the bottom edge on the
/// travel side. Illegal moves are dropped silently.
#[derive(Debug, Clone)]
pub struct RollingBlock {
    center: Vec3,
    orientation: Orientation,
    queue: VecDeque<Direction>,
    roll: Option<Roll>,
    move_count: u32,
}

impl RollingBlock {
    /// Creates a standing block on the given tile.
    pub fn new(start: (i32, i32)) -> Self {
        Self {
            center: tile_center(start),
            orientation: Orientation::Standing,
            queue: VecDeque::new(),
            roll: None,
            move_count: 0,
        }
    }

    /// Appends a directional input; takes effect on a later `update`.
    pub fn queue_move(&mut self, direction: Direction) {
        self.queue.push_back(direction);
    }

    /// Cancels everything and restores a standing block on `start`.
    pub fn reset(&mut self, start: (i32, i32)) {
        self.center = tile_center(start);
        self.orientation = Orientation::Standing;
        self.queue.clear();
        self.roll = None;
        self.move_count = 0;
    }

    /// Advances the animation or starts the next queued move.
    pub fn update(&mut self, dt: f32, support: &dyn TileSupport) {
        if let Some(roll) = self.roll.as_mut() {
            roll.progress += dt / ANIMATION_DURATION;
            if roll.progress >= 1.0 {
                self.center = roll.end_center;
                self.orientation = roll.end_orientation;
                self.roll = None;
                self.move_count += 1;
            }
            return;
        }

        let Some(direction) = self.queue.pop_front() else {
            return;
        };

        let (end_center, end_orientation) = candidate_move(self.center, self.orientation, direction);
        if !footprint_of(end_center, end_orientation).is_supported(support) {
            // Illegal move: drop it, keep draining the queue next frame.
            return;
        }

        let pivot =
            self.center + direction.travel() * self.orientation.half_extent_along(direction);
        self.roll = Some(Roll {
            end_center,
            end_orientation,
            pivot,
            axis: direction.rotation_axis(),
            angle: direction.rotation_angle(),
            progress: 0.0,
        });
    }

    /// Tiles covered by the committed state (the pre-roll state while animating).
    pub fn footprint(&self) -> Footprint {
        footprint_of(self.center, self.orientation)
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn is_animating(&self) -> bool {
        self.roll.is_some()
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn pending_moves(&self) -> usize {
        self.queue.len()
    }

    /// True when idle, upright and standing exactly on the goal tile.
    pub fn has_won(&self, support: &dyn TileSupport) -> bool {
        if self.roll.is_some() || self.orientation != Orientation::Standing {
            return false;
        }
        let (x, z) = self.footprint().tiles()[0];
        support.tile_kind(x, z) == TileKind::Goal
    }

    /// True when any occupied tile no longer offers support.
    pub fn has_lost(&self, support: &dyn TileSupport) -> bool {
        !self.footprint().is_supported(support)
    }

    /// Model transform for rendering a unit cube as this block.
    pub fn model_matrix(&self) -> Mat4 {
        match &self.roll {
            Some(roll) => {
                let angle = roll.angle * roll.progress.min(1.0);
                roll_transform(self.center, self.orientation, roll.pivot, roll.axis, angle)
            }
            None => base_transform(self.center, self.orientation),
        }
    }
}

/// World center of a tile's top face.
fn tile_center((x, z): (i32, i32)) -> Vec3 {
    Vec3::new(x as f32 + 0.5, 0.0, z as f32 + 0.5)
}

/// Transition table: new base center and orientation for one roll.
fn candidate_move(
    center: Vec3,
    orientation: Orientation,
    direction: Direction,
) -> (Vec3, Orientation) {
    let travel = direction.travel();
    match orientation {
        // Tipping over: the center also gains half the prism's extra length.
        Orientation::Standing => {
            let end = if direction.along_x() {
                Orientation::LyingX
            } else {
                Orientation::LyingZ
            };
            (center + travel * 1.5, end)
        }
        _ if orientation.lies_along(direction) => {
            (center + travel * 1.5, Orientation::Standing)
        }
        // Lying across the travel axis: rolls along its side, one tile.
        _ => (center + travel, orientation),
    }
}

fn footprint_of(center: Vec3, orientation: Orientation) -> Footprint {
    let tile = |x: f32, z: f32| (x.floor() as i32, z.floor() as i32);
    match orientation {
        Orientation::Standing => Footprint {
            tiles: [tile(center.x, center.z); 2],
            len: 1,
        },
        Orientation::LyingX => Footprint {
            tiles: [
                tile(center.x - 0.5, center.z),
                tile(center.x + 0.5, center.z),
            ],
            len: 2,
        },
        Orientation::LyingZ => Footprint {
            tiles: [
                tile(center.x, center.z - 0.5),
                tile(center.x, center.z + 0.5),
            ],
            len: 2,
        },
    }
}

/// Unit cube placed on the ground plane with orientation-dependent extents.
fn base_transform(center: Vec3, orientation: Orientation) -> Mat4 {
    let extents = orientation.extents();
    let lift = Vec3::new(center.x, extents.y * 0.5, center.z);
    Mat4::from_translation(lift) * Mat4::from_scale(extents)
}

/// Base transform swung about the pivot edge by the given signed angle.
fn roll_transform(center: Vec3, orientation: Orientation, pivot: Vec3, axis: Vec3, angle: f32) -> Mat4 {
    Mat4::from_translation(pivot)
        * Mat4::from_axis_angle(axis, angle)
        * Mat4::from_translation(-pivot)
        * base_transform(center, orientation)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::level::Level;

    /// Endless floor with no holes.
    struct OpenFloor;

    impl TileSupport for OpenFloor {
        fn tile_kind(&self, _x: i32, _z: i32) -> TileKind {
            TileKind::Normal
        }
    }

    /// Floor made of an explicit tile set; everything else is a hole.
    struct SparseFloor(HashSet<(i32, i32)>);

    impl SparseFloor {
        fn of(tiles: &[(i32, i32)]) -> Self {
            Self(tiles.iter().copied().collect())
        }
    }

    impl TileSupport for SparseFloor {
        fn tile_kind(&self, x: i32, z: i32) -> TileKind {
            if self.0.contains(&(x, z)) {
                TileKind::Normal
            } else {
                TileKind::Empty
            }
        }
    }

    /// Drives updates until the block goes idle.
    fn settle(block: &mut RollingBlock, support: &dyn TileSupport) {
        for _ in 0..64 {
            block.update(ANIMATION_DURATION / 4.0, support);
            if !block.is_animating() && block.pending_moves() == 0 {
                return;
            }
        }
        panic!("block did not settle");
    }

    fn tiles(block: &RollingBlock) -> Vec<(i32, i32)> {
        block.footprint().tiles().to_vec()
    }

    #[test]
    fn standing_roll_follows_transition_table() {
        let cases = [
            (Direction::Right, Orientation::LyingX, vec![(6, 5), (7, 5)]),
            (Direction::Left, Orientation::LyingX, vec![(3, 5), (4, 5)]),
            (Direction::Down, Orientation::LyingZ, vec![(5, 6), (5, 7)]),
            (Direction::Up, Orientation::LyingZ, vec![(5, 3), (5, 4)]),
        ];
        for (direction, orientation, expected) in cases {
            let mut block = RollingBlock::new((5, 5));
            block.queue_move(direction);
            settle(&mut block, &OpenFloor);
            assert_eq!(block.orientation(), orientation, "{direction:?}");
            assert_eq!(tiles(&block), expected, "{direction:?}");
            assert_eq!(block.move_count(), 1);
        }
    }

    #[test]
    fn double_roll_same_axis_stands_three_tiles_over() {
        let mut block = RollingBlock::new((0, 0));
        block.queue_move(Direction::Right);
        block.queue_move(Direction::Right);
        settle(&mut block, &OpenFloor);
        assert_eq!(block.orientation(), Orientation::Standing);
        assert_eq!(tiles(&block), vec![(3, 0)]);
        assert_eq!(block.move_count(), 2);
    }

    #[test]
    fn lying_across_travel_rolls_one_tile_sideways() {
        let mut block = RollingBlock::new((0, 0));
        block.queue_move(Direction::Right);
        block.queue_move(Direction::Down);
        settle(&mut block, &OpenFloor);
        assert_eq!(block.orientation(), Orientation::LyingX);
        assert_eq!(tiles(&block), vec![(1, 1), (2, 1)]);
    }

    #[test]
    fn unsupported_move_is_dropped_silently() {
        let floor = SparseFloor::of(&[(0, 0)]);
        let mut block = RollingBlock::new((0, 0));
        block.queue_move(Direction::Right);
        block.update(0.01, &floor);
        assert!(!block.is_animating());
        assert_eq!(block.pending_moves(), 0);
        assert_eq!(block.orientation(), Orientation::Standing);
        assert_eq!(tiles(&block), vec![(0, 0)]);
        assert_eq!(block.move_count(), 0);
        assert!(!block.has_lost(&floor));
    }

    #[test]
    fn move_count_skips_rejected_moves() {
        // Room to roll right once (tiles 0..=2 on row 0), nothing below.
        let floor = SparseFloor::of(&[(0, 0), (1, 0), (2, 0)]);
        let mut block = RollingBlock::new((0, 0));
        block.queue_move(Direction::Down); // rejected
        block.queue_move(Direction::Right); // committed
        block.queue_move(Direction::Right); // would stand on (3, 0): rejected
        settle(&mut block, &floor);
        assert_eq!(block.move_count(), 1);
        assert_eq!(block.orientation(), Orientation::LyingX);
        assert_eq!(tiles(&block), vec![(1, 0), (2, 0)]);
    }

    #[test]
    fn one_move_animates_at_a_time() {
        let mut block = RollingBlock::new((0, 0));
        block.queue_move(Direction::Right);
        block.queue_move(Direction::Down);
        block.update(0.01, &OpenFloor);
        assert!(block.is_animating());
        assert_eq!(block.pending_moves(), 1);
        // Footprint stays at the committed pre-roll state mid-animation.
        assert_eq!(tiles(&block), vec![(0, 0)]);
        settle(&mut block, &OpenFloor);
        assert_eq!(block.move_count(), 2);
    }

    #[test]
    fn wins_only_standing_on_goal() {
        let level = Level::parse("2 1 1 3").unwrap();
        let mut block = RollingBlock::new(level.start_position());
        block.queue_move(Direction::Right);
        settle(&mut block, &level);
        // Lying with one half on the goal does not win.
        assert!(!block.has_won(&level));
        block.queue_move(Direction::Right);
        settle(&mut block, &level);
        assert_eq!(tiles(&block), vec![(3, 0)]);
        assert!(block.has_won(&level));
        assert!(!block.has_lost(&level));
    }

    #[test]
    fn loss_fires_when_support_disappears_underneath() {
        let mut floor = SparseFloor::of(&[(0, 0), (1, 0)]);
        let block = RollingBlock::new((0, 0));
        assert!(!block.has_lost(&floor));
        floor.0.remove(&(0, 0));
        assert!(block.has_lost(&floor));
    }

    #[test]
    fn reset_restores_standing_start() {
        let mut block = RollingBlock::new((0, 0));
        block.queue_move(Direction::Right);
        block.queue_move(Direction::Down);
        block.update(0.01, &OpenFloor);
        block.reset((2, 2));
        assert!(!block.is_animating());
        assert_eq!(block.pending_moves(), 0);
        assert_eq!(block.move_count(), 0);
        assert_eq!(block.orientation(), Orientation::Standing);
        assert_eq!(tiles(&block), vec![(2, 2)]);
    }

    #[test]
    fn roll_start_matches_base_transform() {
        let mut block = RollingBlock::new((4, 4));
        let before = block.model_matrix();
        block.queue_move(Direction::Left);
        block.update(0.0, &OpenFloor);
        assert!(block.is_animating());
        assert_matrices_cover_same_box(before, block.model_matrix());
    }

    #[test]
    fn full_roll_matches_end_transform() {
        // The swung-by-90° start box must land exactly on the committed end
        // box, for every orientation and direction.
        let starts = [
            (Vec3::new(4.5, 0.0, 4.5), Orientation::Standing),
            (Vec3::new(5.0, 0.0, 4.5), Orientation::LyingX),
            (Vec3::new(4.5, 0.0, 5.0), Orientation::LyingZ),
        ];
        for (center, orientation) in starts {
            for direction in Direction::ALL {
                let (end_center, end_orientation) = candidate_move(center, orientation, direction);
                let pivot = center + direction.travel() * orientation.half_extent_along(direction);
                let swung = roll_transform(
                    center,
                    orientation,
                    pivot,
                    direction.rotation_axis(),
                    direction.rotation_angle(),
                );
                let end = base_transform(end_center, end_orientation);
                assert_matrices_cover_same_box(swung, end);
            }
        }
    }

    /// Compares the images of the unit cube under both transforms as point
    /// sets, since a roll permutes the cube's corners.
    fn assert_matrices_cover_same_box(a: Mat4, b: Mat4) {
        let mut corners_a = unit_corners(a);
        let mut corners_b = unit_corners(b);
        let key = |v: &Vec3| {
            (
                (v.x * 1024.0).round() as i64,
                (v.y * 1024.0).round() as i64,
                (v.z * 1024.0).round() as i64,
            )
        };
        corners_a.sort_by_key(key);
        corners_b.sort_by_key(key);
        for (pa, pb) in corners_a.iter().zip(&corners_b) {
            assert!(
                pa.distance(*pb) < 1e-3,
                "boxes differ: {corners_a:?} vs {corners_b:?}"
            );
        }
    }

    fn unit_corners(matrix: Mat4) -> Vec<Vec3> {
        let mut corners = Vec::with_capacity(8);
        for &x in &[-0.5f32, 0.5] {
            for &y in &[-0.5f32, 0.5] {
                for &z in &[-0.5f32, 0.5] {
                    corners.push(matrix.transform_point3(Vec3::new(x, y, z)));
                }
            }
        }
        corners
    }
}
