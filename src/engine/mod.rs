use std::collections::BTreeMap;

use crate::types::{
    BulletView, GameConfig, IntentUpdate, PlayerView, Role, RosterEntry, Snapshot, Team, Vec2,
};
use crate::world::{spawn_angle, World};

mod player_system;
mod projectile_system;
mod utils;

use self::utils::{now_ms, offset_along};

// Pending intent for one connection; overwritten field-by-field as input
// arrives and only read at tick time.
#[derive(Clone, Copy, Debug, Default)]
struct Intent {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
    fire: bool,
    erase: bool,
    aim: f32,
}

impl Intent {
    // Unit-length (or zero) direction; diagonals are normalized.
    fn move_dir(&self) -> (f32, f32) {
        let mut dx: f32 = 0.0;
        let mut dy: f32 = 0.0;
        if self.left {
            dx -= 1.0;
        }
        if self.right {
            dx += 1.0;
        }
        if self.up {
            dy -= 1.0;
        }
        if self.down {
            dy += 1.0;
        }
        let len = (dx * dx + dy * dy).sqrt();
        if len > 0.0 {
            (dx / len, dy / len)
        } else {
            (0.0, 0.0)
        }
    }
}

#[derive(Clone, Debug)]
struct PlayerInternal {
    view: PlayerView,
    intent: Intent,
    fire_cooldown: f32,
    respawn_timer: f32,
    spawn: Vec2,
    spawn_facing: f32,
}

#[derive(Clone, Copy, Debug)]
struct BulletInternal {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    team: Team,
    life: f32,
}

#[derive(Clone, Debug)]
pub struct GameEngine {
    pub config: GameConfig,
    pub world: World,
    pub started_at_ms: u64,

    players: BTreeMap<String, PlayerInternal>,
    bullets: Vec<BulletInternal>,
    tick_counter: u64,
    elapsed: f64,
}

impl GameEngine {
    pub fn new(config: GameConfig) -> Self {
        Self {
            world: World::new(&config),
            config,
            started_at_ms: now_ms(),
            players: BTreeMap::new(),
            bullets: Vec::new(),
            tick_counter: 0,
            elapsed: 0.0,
        }
    }

    // First connection without an incumbent takes red, the next blue, the
    // rest spectate. Slots are never renegotiated while held.
    pub fn join(&mut self, id: &str) -> RosterEntry {
        let team = if self.slot_is_free(Team::Red) {
            Some(Team::Red)
        } else if self.slot_is_free(Team::Blue) {
            Some(Team::Blue)
        } else {
            None
        };
        let role = if team.is_some() {
            Role::Player
        } else {
            Role::Spectator
        };
        let (spawn, facing) = match team {
            Some(team) => (self.world.spawn_point(team), spawn_angle(team)),
            None => (Vec2 { x: 0.0, y: 0.0 }, 0.0),
        };
        let combatant = role == Role::Player;
        self.players.insert(
            id.to_string(),
            PlayerInternal {
                view: PlayerView {
                    id: id.to_string(),
                    role,
                    team,
                    x: spawn.x,
                    y: spawn.y,
                    angle: facing,
                    hp: if combatant { self.config.max_hp } else { 0.0 },
                    energy: if combatant { self.config.max_energy } else { 0.0 },
                    alive: combatant,
                },
                intent: Intent {
                    aim: facing,
                    ..Intent::default()
                },
                fire_cooldown: 0.0,
                respawn_timer: 0.0,
                spawn,
                spawn_facing: facing,
            },
        );
        RosterEntry {
            id: id.to_string(),
            role,
            team,
        }
    }

    pub fn leave(&mut self, id: &str) -> bool {
        self.players.remove(id).is_some()
    }

    pub fn has_player(&self, id: &str) -> bool {
        self.players.contains_key(id)
    }

    pub fn receive_input(&mut self, id: &str, update: IntentUpdate) {
        let Some(player) = self.players.get_mut(id) else {
            return;
        };
        let intent = &mut player.intent;
        if let Some(value) = update.move_up {
            intent.up = value;
        }
        if let Some(value) = update.move_down {
            intent.down = value;
        }
        if let Some(value) = update.move_left {
            intent.left = value;
        }
        if let Some(value) = update.move_right {
            intent.right = value;
        }
        if let Some(value) = update.fire {
            intent.fire = value;
        }
        if let Some(value) = update.erase {
            intent.erase = value;
        }
        if let Some(value) = update.aim_angle {
            intent.aim = value;
        }
    }

    pub fn step(&mut self, dt: f32) {
        self.tick_counter += 1;
        self.elapsed += dt as f64;
        self.update_players(dt);
        self.update_bullets(dt);
    }

    pub fn current_now_ms(&self) -> u64 {
        self.started_at_ms + (self.elapsed * 1000.0) as u64
    }

    pub fn build_snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.tick_counter,
            now_ms: self.current_now_ms(),
            paint: self.world.paint.encode_rows(),
            coverage: self.world.paint.coverage(),
            players: self.players.values().map(|p| p.view.clone()).collect(),
            bullets: self
                .bullets
                .iter()
                .map(|b| BulletView { x: b.x, y: b.y })
                .collect(),
        }
    }

    pub fn roster(&self) -> Vec<RosterEntry> {
        self.players
            .values()
            .map(|p| RosterEntry {
                id: p.view.id.clone(),
                role: p.view.role,
                team: p.view.team,
            })
            .collect()
    }

    fn slot_is_free(&self, team: Team) -> bool {
        !self
            .players
            .values()
            .any(|p| p.view.role == Role::Player && p.view.team == Some(team))
    }
}
