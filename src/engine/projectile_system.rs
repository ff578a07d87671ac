use super::*;

impl GameEngine {
    pub(super) fn update_bullets(&mut self, dt: f32) {
        let mut idx = 0;
        while idx < self.bullets.len() {
            if self.step_bullet(idx, dt) {
                idx += 1;
            } else {
                self.bullets.swap_remove(idx);
            }
        }
    }

    // Advances one bullet for the tick; false means the bullet terminated
    // (exactly one splat was stamped) and must be removed.
    fn step_bullet(&mut self, idx: usize, dt: f32) -> bool {
        self.bullets[idx].life -= dt;
        if self.bullets[idx].life <= 0.0 {
            let bullet = self.bullets[idx];
            self.world.paint.stamp_circle(
                bullet.x,
                bullet.y,
                self.config.fade_splat_radius,
                bullet.team,
            );
            return false;
        }

        let substeps = self.config.bullet_substeps.max(1);
        let sub_dt = dt / substeps as f32;
        for _ in 0..substeps {
            self.bullets[idx].x += self.bullets[idx].vx * sub_dt;
            self.bullets[idx].y += self.bullets[idx].vy * sub_dt;
            let bullet = self.bullets[idx];

            if self
                .world
                .collides(bullet.x, bullet.y, self.config.bullet_radius)
            {
                self.world.paint.stamp_circle(
                    bullet.x,
                    bullet.y,
                    self.config.wall_splat_radius,
                    bullet.team,
                );
                return false;
            }

            let reach = self.config.player_radius + self.config.bullet_radius;
            let mut struck = false;
            for target in self.players.values_mut() {
                let view = &mut target.view;
                if view.role != Role::Player || !view.alive || view.team == Some(bullet.team) {
                    continue;
                }
                let dx = view.x - bullet.x;
                let dy = view.y - bullet.y;
                if dx * dx + dy * dy <= reach * reach {
                    view.hp = (view.hp - self.config.hit_damage).max(0.0);
                    if view.hp <= 0.0 {
                        view.alive = false;
                        target.respawn_timer = self.config.respawn_delay;
                    }
                    struck = true;
                    break;
                }
            }
            if struck {
                self.world.paint.stamp_circle(
                    bullet.x,
                    bullet.y,
                    self.config.hit_splat_radius,
                    bullet.team,
                );
                return false;
            }
        }
        true
    }
}
