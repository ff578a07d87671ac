use std::f32::consts::PI;

use crate::constants::SPAWN_INSET;
use crate::geometry::{circle_in_bounds, circle_overlaps_rect};
use crate::paint::PaintGrid;
use crate::types::{GameConfig, SpawnPoints, Team, Vec2, Wall, WorldInit};

#[derive(Clone, Debug)]
pub struct World {
    pub width: f32,
    pub height: f32,
    pub walls: Vec<Wall>,
    pub paint: PaintGrid,
}

// Static obstacle layout for the default 960x600 arena: a center block and
// four mirrored pillars, all aligned to the tile grid.
pub fn default_walls() -> Vec<Wall> {
    vec![
        Wall {
            x: 432.0,
            y: 240.0,
            w: 96.0,
            h: 120.0,
        },
        Wall {
            x: 216.0,
            y: 96.0,
            w: 48.0,
            h: 120.0,
        },
        Wall {
            x: 696.0,
            y: 96.0,
            w: 48.0,
            h: 120.0,
        },
        Wall {
            x: 216.0,
            y: 384.0,
            w: 48.0,
            h: 120.0,
        },
        Wall {
            x: 696.0,
            y: 384.0,
            w: 48.0,
            h: 120.0,
        },
    ]
}

pub fn spawn_angle(team: Team) -> f32 {
    match team {
        Team::Red => 0.0,
        Team::Blue => PI,
    }
}

impl World {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            width: config.arena_width,
            height: config.arena_height,
            walls: default_walls(),
            paint: PaintGrid::new(config.arena_width, config.arena_height, config.tile_size),
        }
    }

    // True when the circle overlaps a wall or its bounding box leaves the
    // arena; the boundary behaves as an implicit wall.
    pub fn collides(&self, x: f32, y: f32, r: f32) -> bool {
        if !circle_in_bounds(x, y, r, self.width, self.height) {
            return true;
        }
        self.walls
            .iter()
            .any(|wall| circle_overlaps_rect(x, y, r, wall.x, wall.y, wall.w, wall.h))
    }

    pub fn spawn_point(&self, team: Team) -> Vec2 {
        let y = self.height / 2.0;
        match team {
            Team::Red => Vec2 { x: SPAWN_INSET, y },
            Team::Blue => Vec2 {
                x: self.width - SPAWN_INSET,
                y,
            },
        }
    }

    pub fn to_world_init(&self) -> WorldInit {
        WorldInit {
            width: self.width,
            height: self.height,
            tile_size: self.paint.tile_size(),
            cols: self.paint.cols(),
            rows: self.paint.rows(),
            walls: self.walls.clone(),
            spawns: SpawnPoints {
                red: self.spawn_point(Team::Red),
                blue: self.spawn_point(Team::Blue),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_world() -> World {
        World::new(&GameConfig::default())
    }

    #[test]
    fn arena_boundary_acts_as_a_wall() {
        let world = default_world();
        assert!(world.collides(10.0, 300.0, 14.0));
        assert!(world.collides(955.0, 300.0, 14.0));
        assert!(world.collides(480.0, 4.0, 14.0));
        assert!(!world.collides(70.0, 300.0, 14.0));
    }

    #[test]
    fn center_block_blocks_circles() {
        let world = default_world();
        assert!(world.collides(480.0, 300.0, 14.0));
        assert!(world.collides(430.0, 300.0, 14.0));
        assert!(!world.collides(400.0, 300.0, 14.0));
    }

    #[test]
    fn spawn_points_are_legal_and_mirrored() {
        let world = default_world();
        let red = world.spawn_point(Team::Red);
        let blue = world.spawn_point(Team::Blue);
        assert!(!world.collides(red.x, red.y, 14.0));
        assert!(!world.collides(blue.x, blue.y, 14.0));
        assert!((red.x + blue.x - world.width).abs() < 1e-3);
        assert_eq!(red.y, blue.y);
    }

    #[test]
    fn world_init_reports_grid_dimensions() {
        let init = default_world().to_world_init();
        assert_eq!(init.cols, 40);
        assert_eq!(init.rows, 25);
        assert_eq!(init.walls.len(), 5);
        assert_eq!(init.spawns.red.x, 70.0);
    }

    #[test]
    fn spawn_facing_points_inward() {
        assert_eq!(spawn_angle(Team::Red), 0.0);
        assert!((spawn_angle(Team::Blue) - PI).abs() < 1e-6);
    }
}
