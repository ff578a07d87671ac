use serde::Serialize;

use crate::constants::{
    ARENA_HEIGHT, ARENA_WIDTH, BULLET_LIFETIME, BULLET_RADIUS, BULLET_SPEED, BULLET_SUBSTEPS,
    ENERGY_REGEN_PER_SEC, ERASE_COST_PER_TILE, ERASE_RADIUS, ERASE_REACH, FADE_SPLAT_RADIUS,
    FIRE_COOLDOWN, HIT_DAMAGE, HIT_SPLAT_RADIUS, HP_REGEN_PER_SEC, MAX_ENERGY, MAX_HP,
    MUZZLE_OFFSET, PAINT_DAMAGE_PER_SEC, PLAYER_RADIUS, PLAYER_SPEED, RESPAWN_DELAY, TICK_RATE,
    TILE_SIZE, WALL_SPLAT_RADIUS,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    Red,
    Blue,
}

impl Team {
    pub fn opponent(self) -> Self {
        match self {
            Self::Red => Self::Blue,
            Self::Blue => Self::Red,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Player,
    Spectator,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Wall {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

#[derive(Clone, Debug, Serialize)]
pub struct PlayerView {
    pub id: String,
    pub role: Role,
    pub team: Option<Team>,
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub hp: f32,
    pub energy: f32,
    pub alive: bool,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct BulletView {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Debug, Serialize)]
pub struct RosterEntry {
    pub id: String,
    pub role: Role,
    pub team: Option<Team>,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct PaintCoverage {
    pub red: f32,
    pub blue: f32,
}

#[derive(Clone, Debug, Serialize)]
pub struct SpawnPoints {
    pub red: Vec2,
    pub blue: Vec2,
}

#[derive(Clone, Debug, Serialize)]
pub struct WorldInit {
    pub width: f32,
    pub height: f32,
    #[serde(rename = "tileSize")]
    pub tile_size: f32,
    pub cols: usize,
    pub rows: usize,
    pub walls: Vec<Wall>,
    pub spawns: SpawnPoints,
}

#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    #[serde(rename = "nowMs")]
    pub now_ms: u64,
    pub paint: Vec<String>,
    pub coverage: PaintCoverage,
    pub players: Vec<PlayerView>,
    pub bullets: Vec<BulletView>,
}

// Partial intent from the wire; absent fields leave prior intent unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct IntentUpdate {
    pub move_up: Option<bool>,
    pub move_down: Option<bool>,
    pub move_left: Option<bool>,
    pub move_right: Option<bool>,
    pub fire: Option<bool>,
    pub erase: Option<bool>,
    pub aim_angle: Option<f32>,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct GameConfig {
    #[serde(rename = "tickRate")]
    pub tick_rate: u32,
    #[serde(rename = "arenaWidth")]
    pub arena_width: f32,
    #[serde(rename = "arenaHeight")]
    pub arena_height: f32,
    #[serde(rename = "tileSize")]
    pub tile_size: f32,
    #[serde(rename = "playerRadius")]
    pub player_radius: f32,
    #[serde(rename = "playerSpeed")]
    pub player_speed: f32,
    #[serde(rename = "maxHp")]
    pub max_hp: f32,
    #[serde(rename = "hpRegenPerSec")]
    pub hp_regen_per_sec: f32,
    #[serde(rename = "maxEnergy")]
    pub max_energy: f32,
    #[serde(rename = "energyRegenPerSec")]
    pub energy_regen_per_sec: f32,
    #[serde(rename = "paintDamagePerSec")]
    pub paint_damage_per_sec: f32,
    #[serde(rename = "respawnDelay")]
    pub respawn_delay: f32,
    #[serde(rename = "fireCooldown")]
    pub fire_cooldown: f32,
    #[serde(rename = "bulletSpeed")]
    pub bullet_speed: f32,
    #[serde(rename = "bulletRadius")]
    pub bullet_radius: f32,
    #[serde(rename = "bulletLifetime")]
    pub bullet_lifetime: f32,
    #[serde(rename = "bulletSubsteps")]
    pub bullet_substeps: u32,
    #[serde(rename = "muzzleOffset")]
    pub muzzle_offset: f32,
    #[serde(rename = "hitDamage")]
    pub hit_damage: f32,
    #[serde(rename = "wallSplatRadius")]
    pub wall_splat_radius: f32,
    #[serde(rename = "fadeSplatRadius")]
    pub fade_splat_radius: f32,
    #[serde(rename = "hitSplatRadius")]
    pub hit_splat_radius: f32,
    #[serde(rename = "eraseRadius")]
    pub erase_radius: f32,
    #[serde(rename = "eraseReach")]
    pub erase_reach: f32,
    #[serde(rename = "eraseCostPerTile")]
    pub erase_cost_per_tile: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_rate: TICK_RATE,
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            tile_size: TILE_SIZE,
            player_radius: PLAYER_RADIUS,
            player_speed: PLAYER_SPEED,
            max_hp: MAX_HP,
            hp_regen_per_sec: HP_REGEN_PER_SEC,
            max_energy: MAX_ENERGY,
            energy_regen_per_sec: ENERGY_REGEN_PER_SEC,
            paint_damage_per_sec: PAINT_DAMAGE_PER_SEC,
            respawn_delay: RESPAWN_DELAY,
            fire_cooldown: FIRE_COOLDOWN,
            bullet_speed: BULLET_SPEED,
            bullet_radius: BULLET_RADIUS,
            bullet_lifetime: BULLET_LIFETIME,
            bullet_substeps: BULLET_SUBSTEPS,
            muzzle_offset: MUZZLE_OFFSET,
            hit_damage: HIT_DAMAGE,
            wall_splat_radius: WALL_SPLAT_RADIUS,
            fade_splat_radius: FADE_SPLAT_RADIUS,
            hit_splat_radius: HIT_SPLAT_RADIUS,
            erase_radius: ERASE_RADIUS,
            erase_reach: ERASE_REACH,
            erase_cost_per_tile: ERASE_COST_PER_TILE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_serializes_with_camel_case_keys() {
        let value = serde_json::to_value(GameConfig::default()).expect("config serializes");
        let object = value.as_object().expect("config is an object");
        assert!(object.contains_key("tickRate"));
        assert!(object.contains_key("eraseCostPerTile"));
        assert!(object.contains_key("paintDamagePerSec"));
        assert!(!object.contains_key("tick_rate"));
    }

    #[test]
    fn default_splat_radii_are_ordered_by_cause() {
        let config = GameConfig::default();
        assert!(config.wall_splat_radius > config.fade_splat_radius);
        assert!(config.fade_splat_radius > config.hit_splat_radius);
    }

    #[test]
    fn team_serializes_snake_case_and_flips() {
        assert_eq!(
            serde_json::to_value(Team::Red).expect("team serializes"),
            serde_json::Value::String("red".to_string())
        );
        assert_eq!(Team::Red.opponent(), Team::Blue);
        assert_eq!(Team::Blue.opponent(), Team::Red);
    }
}
