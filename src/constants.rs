pub const TICK_RATE: u32 = 30;
pub const TICK_MS: u64 = 1000 / TICK_RATE as u64;
pub const TICK_SECONDS: f32 = 1.0 / TICK_RATE as f32;

pub const ARENA_WIDTH: f32 = 960.0;
pub const ARENA_HEIGHT: f32 = 600.0;
pub const TILE_SIZE: f32 = 24.0;

pub const PLAYER_RADIUS: f32 = 14.0;
pub const PLAYER_SPEED: f32 = 200.0;
pub const MAX_HP: f32 = 100.0;
pub const HP_REGEN_PER_SEC: f32 = 4.0;
pub const MAX_ENERGY: f32 = 100.0;
pub const ENERGY_REGEN_PER_SEC: f32 = 12.0;
pub const PAINT_DAMAGE_PER_SEC: f32 = 10.0;
pub const RESPAWN_DELAY: f32 = 2.5;

pub const FIRE_COOLDOWN: f32 = 0.22;
pub const BULLET_SPEED: f32 = 430.0;
pub const BULLET_RADIUS: f32 = 4.0;
pub const BULLET_LIFETIME: f32 = 1.2;
pub const BULLET_SUBSTEPS: u32 = 4;
pub const MUZZLE_OFFSET: f32 = 20.0;
pub const HIT_DAMAGE: f32 = 28.0;

// Splat sizes by termination cause: wall > fade > hit.
pub const WALL_SPLAT_RADIUS: f32 = 34.0;
pub const FADE_SPLAT_RADIUS: f32 = 26.0;
pub const HIT_SPLAT_RADIUS: f32 = 16.0;

pub const ERASE_RADIUS: f32 = 30.0;
pub const ERASE_REACH: f32 = 44.0;
pub const ERASE_COST_PER_TILE: f32 = 1.5;

pub const SLIDE_SEARCH_STEPS: u32 = 6;
pub const SPAWN_INSET: f32 = 70.0;
