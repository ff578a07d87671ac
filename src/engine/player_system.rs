use super::*;

use crate::constants::SLIDE_SEARCH_STEPS;

impl GameEngine {
    pub(super) fn update_players(&mut self, dt: f32) {
        let ids: Vec<String> = self.players.keys().cloned().collect();
        for id in ids {
            let Some(player) = self.players.get_mut(&id) else {
                continue;
            };
            if player.view.role != Role::Player {
                continue;
            }
            let Some(team) = player.view.team else {
                continue;
            };

            if !player.view.alive {
                player.respawn_timer -= dt;
                if player.respawn_timer <= 0.0 {
                    player.respawn_timer = 0.0;
                    player.view.x = player.spawn.x;
                    player.view.y = player.spawn.y;
                    player.view.angle = player.spawn_facing;
                    player.view.hp = self.config.max_hp;
                    player.view.alive = true;
                }
                continue;
            }

            let (dir_x, dir_y) = player.intent.move_dir();
            if dir_x != 0.0 || dir_y != 0.0 {
                let step = self.config.player_speed * dt;
                let radius = self.config.player_radius;
                let nx = slide_axis(
                    &self.world,
                    radius,
                    player.view.x,
                    player.view.x + dir_x * step,
                    player.view.y,
                    true,
                );
                let ny = slide_axis(
                    &self.world,
                    radius,
                    player.view.y,
                    player.view.y + dir_y * step,
                    nx,
                    false,
                );
                player.view.x = nx;
                player.view.y = ny;
            }

            player.view.angle = player.intent.aim;

            player.view.hp =
                (player.view.hp + self.config.hp_regen_per_sec * dt).min(self.config.max_hp);
            player.view.energy = (player.view.energy + self.config.energy_regen_per_sec * dt)
                .min(self.config.max_energy);

            let (tx, ty) = self.world.paint.tile_at(player.view.x, player.view.y);
            if self.world.paint.owner(tx, ty) == Some(team.opponent()) {
                player.view.hp =
                    (player.view.hp - self.config.paint_damage_per_sec * dt).max(0.0);
            }

            player.fire_cooldown = (player.fire_cooldown - dt).max(0.0);
            if player.intent.fire && player.fire_cooldown <= 0.0 {
                player.fire_cooldown = self.config.fire_cooldown;
                let (mx, my) = offset_along(
                    player.view.x,
                    player.view.y,
                    player.view.angle,
                    self.config.muzzle_offset,
                );
                self.bullets.push(BulletInternal {
                    x: mx,
                    y: my,
                    vx: player.view.angle.cos() * self.config.bullet_speed,
                    vy: player.view.angle.sin() * self.config.bullet_speed,
                    team,
                    life: self.config.bullet_lifetime,
                });
            }

            if player.intent.erase && player.view.energy > 0.0 {
                let budget =
                    (player.view.energy / self.config.erase_cost_per_tile).floor() as usize;
                if budget > 0 {
                    let (ax, ay) = offset_along(
                        player.view.x,
                        player.view.y,
                        player.view.angle,
                        self.config.erase_reach,
                    );
                    let cleared =
                        self.world
                            .paint
                            .erase_circle(ax, ay, self.config.erase_radius, budget);
                    player.view.energy = (player.view.energy
                        - cleared as f32 * self.config.erase_cost_per_tile)
                        .max(0.0);
                }
            }

            if player.view.hp <= 0.0 {
                player.view.alive = false;
                player.respawn_timer = self.config.respawn_delay;
            }
        }
    }
}

// Per-axis resolution: accept the proposed coordinate when it is free,
// otherwise binary-search between the current (legal) and proposed (blocked)
// coordinate and keep the open side. The current position must be legal.
pub(super) fn slide_axis(
    world: &World,
    radius: f32,
    from: f32,
    to: f32,
    other: f32,
    horizontal: bool,
) -> f32 {
    let blocked = |v: f32| {
        if horizontal {
            world.collides(v, other, radius)
        } else {
            world.collides(other, v, radius)
        }
    };
    if !blocked(to) {
        return to;
    }
    let mut open = from;
    let mut wall = to;
    for _ in 0..SLIDE_SEARCH_STEPS {
        let mid = (open + wall) * 0.5;
        if blocked(mid) {
            wall = mid;
        } else {
            open = mid;
        }
    }
    open
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use crate::constants::TICK_SECONDS;

    fn engine_with_red() -> GameEngine {
        let mut engine = GameEngine::new(GameConfig::default());
        engine.join("red");
        engine
    }

    fn red_view(engine: &GameEngine) -> &PlayerView {
        &engine.players.get("red").expect("player exists").view
    }

    #[test]
    fn walking_into_the_boundary_stops_without_embedding() {
        let mut engine = engine_with_red();
        engine
            .players
            .get_mut("red")
            .expect("player exists")
            .intent
            .left = true;
        for _ in 0..60 {
            engine.step(TICK_SECONDS);
        }
        let view = red_view(&engine);
        let radius = engine.config.player_radius;
        assert!(!engine.world.collides(view.x, view.y, radius));
        assert!(view.x >= radius - 1e-3, "x was {}", view.x);
        assert!(view.x <= radius + 0.2, "x was {}", view.x);
    }

    #[test]
    fn diagonal_movement_is_normalized() {
        let mut engine = engine_with_red();
        {
            let player = engine.players.get_mut("red").expect("player exists");
            player.view.x = 300.0;
            player.view.y = 150.0;
            player.intent.up = true;
            player.intent.right = true;
        }
        engine.step(0.1);
        let view = red_view(&engine);
        let expected = 200.0 * 0.1 * std::f32::consts::FRAC_1_SQRT_2;
        assert!((view.x - (300.0 + expected)).abs() < 0.01, "x was {}", view.x);
        assert!((view.y - (150.0 - expected)).abs() < 0.01, "y was {}", view.y);
    }

    #[test]
    fn blocked_axis_slides_along_the_wall_face() {
        let mut engine = engine_with_red();
        {
            let player = engine.players.get_mut("red").expect("player exists");
            player.view.x = 410.0;
            player.view.y = 300.0;
            player.intent.right = true;
            player.intent.down = true;
        }
        for _ in 0..10 {
            engine.step(TICK_SECONDS);
        }
        let view = red_view(&engine);
        // The center block face is at x=432; a 14-radius circle stops short
        // of x=418 while y keeps advancing.
        assert!(view.x < 418.0, "x was {}", view.x);
        assert!(view.x > 416.0, "x was {}", view.x);
        assert!(view.y > 344.0 && view.y < 350.0, "y was {}", view.y);
        assert!(!engine.world.collides(view.x, view.y, engine.config.player_radius));
    }

    #[test]
    fn random_walks_never_end_embedded() {
        for seed in 0..3u64 {
            let mut engine = engine_with_red();
            let mut rng = StdRng::seed_from_u64(seed);
            for _ in 0..300 {
                {
                    let intent =
                        &mut engine.players.get_mut("red").expect("player exists").intent;
                    intent.up = rng.random_bool(0.5);
                    intent.down = rng.random_bool(0.5);
                    intent.left = rng.random_bool(0.5);
                    intent.right = rng.random_bool(0.5);
                }
                engine.step(TICK_SECONDS);
                let view = red_view(&engine);
                assert!(
                    !engine
                        .world
                        .collides(view.x, view.y, engine.config.player_radius),
                    "embedded at ({}, {}) with seed {seed}",
                    view.x,
                    view.y
                );
            }
        }
    }

    #[test]
    fn respawn_restores_spawn_state_after_the_delay() {
        let mut engine = engine_with_red();
        {
            let player = engine.players.get_mut("red").expect("player exists");
            player.view.x = 300.0;
            player.view.y = 150.0;
            player.view.hp = 0.0;
            player.view.alive = false;
            player.respawn_timer = 0.5;
        }
        for _ in 0..6 {
            engine.step(0.1);
        }
        let view = red_view(&engine);
        assert!(view.alive);
        assert_eq!(view.hp, 100.0);
        assert_eq!(view.x, 70.0);
        assert_eq!(view.y, 300.0);
        assert_eq!(view.angle, 0.0);
    }

    #[test]
    fn dead_players_do_not_move_fire_or_erase() {
        let mut engine = engine_with_red();
        {
            let player = engine.players.get_mut("red").expect("player exists");
            player.view.alive = false;
            player.view.hp = 0.0;
            player.respawn_timer = 100.0;
            player.intent.right = true;
            player.intent.fire = true;
            player.intent.erase = true;
        }
        engine.step(0.1);
        let view = red_view(&engine);
        assert_eq!(view.x, 70.0);
        assert_eq!(view.hp, 0.0);
        assert!(engine.bullets.is_empty());
    }

    #[test]
    fn slide_axis_keeps_full_moves_in_open_space() {
        let engine = engine_with_red();
        let resolved = slide_axis(&engine.world, 14.0, 70.0, 80.0, 300.0, true);
        assert_eq!(resolved, 80.0);
    }
}
