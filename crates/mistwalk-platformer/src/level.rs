use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use mistwalk_core::geometry::{CONTACT_PADDING, Rect, Vec2};

use crate::config::BodyConfig;
use crate::push::{METAL_SIZE, Metal};

/// Top edge of the ground floor in world units (y grows downward).
pub const FLOOR_TOP: f32 = 600.0;
/// Thickness of floor segments.
const FLOOR_DEPTH: f32 = 100.0;
/// Thickness of raised ledges.
const LEDGE_DEPTH: f32 = 20.0;
/// Wall thickness.
const WALL_WIDTH: f32 = 40.0;
/// Width of the flat spawn segment.
const SPAWN_SEGMENT_WIDTH: f32 = 600.0;
/// Generated segments after the spawn segment.
const NUM_SEGMENTS: u32 = 8;

/// Static level geometry plus the items that can be pushed or pulled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub platforms: Vec<Rect>,
    pub metals: Vec<Metal>,
    /// Top-left corner a fresh body starts at.
    pub spawn: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Level {
    /// A single wide floor with the configured spawn point resting on it.
    pub fn flat(body: &BodyConfig) -> Self {
        let top = body.spawn_y + body.height + CONTACT_PADDING;
        let floor = Rect::new(body.spawn_x - 5_000.0, top, 10_000.0, FLOOR_DEPTH);
        Self {
            spawn: Vec2::new(body.spawn_x, body.spawn_y),
            platforms: vec![floor],
            metals: Vec::new(),
            width: floor.width,
            height: top + FLOOR_DEPTH,
        }
    }

    /// Top-left corner at `x` that puts a body exactly in contact with the
    /// top of `floor`: one unit lower would touch it, this point does not.
    pub fn resting_spawn(floor: &Rect, x: f32, body: &BodyConfig) -> Vec2 {
        Vec2::new(x, floor.y - CONTACT_PADDING - body.height)
    }
}

/// Generate a deterministic level from a seed.
pub fn generate_level(seed: u64, body: &BodyConfig) -> Level {
    let mut rng = StdRng::seed_from_u64(seed);

    let spawn_floor = Rect::new(-200.0, FLOOR_TOP, SPAWN_SEGMENT_WIDTH, FLOOR_DEPTH);
    let mut level = Level {
        platforms: vec![spawn_floor],
        metals: Vec::new(),
        spawn: Level::resting_spawn(&spawn_floor, 0.0, body),
        width: 0.0,
        height: FLOOR_TOP + FLOOR_DEPTH,
    };

    let mut x = spawn_floor.right();
    for _ in 0..NUM_SEGMENTS {
        // Pits are always wider than the body, so they can be fallen into.
        let pit = rng.random_range(body.width + 20.0..body.width + 120.0);
        x += pit;
        let len = rng.random_range(300.0f32..700.0);
        let segment = Rect::new(x, FLOOR_TOP, len, FLOOR_DEPTH);
        level.platforms.push(segment);
        generate_feature(&mut level, &mut rng, &segment, body);
        x += len;
    }

    level.width = x - spawn_floor.x;
    level
}

fn generate_feature(level: &mut Level, rng: &mut StdRng, segment: &Rect, body: &BodyConfig) {
    match rng.random_range(0u8..3) {
        0 => {
            // Flat run
        },
        1 => {
            // Raised ledge with a metal resting on it
            let lift = rng.random_range(100.0f32..180.0);
            let ledge_len = rng.random_range(120.0f32..240.0).min(segment.width);
            let ledge_x = segment.x + rng.random_range(0.0..segment.width - ledge_len + 1.0);
            let ledge = Rect::new(ledge_x, segment.y - lift, ledge_len, LEDGE_DEPTH);
            level.platforms.push(ledge);
            level.metals.push(Metal::new(
                ledge.x + (ledge.width - METAL_SIZE) / 2.0,
                ledge.y - METAL_SIZE,
            ));
        },
        _ => {
            // Tall wall standing on the floor, for wall jumps
            let wall_height = rng.random_range(body.height * 2.0..body.height * 4.0);
            let wall_x = segment.x + (segment.width - WALL_WIDTH) / 2.0;
            level.platforms.push(Rect::new(
                wall_x,
                segment.y - wall_height,
                WALL_WIDTH,
                wall_height,
            ));
        },
    }
}
