use std::collections::BTreeMap;
use std::f32::consts::PI;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{SecondsFormat, Utc};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use serde_json::json;
use turf_duel_server::constants::TICK_SECONDS;
use turf_duel_server::engine::GameEngine;
use turf_duel_server::types::{GameConfig, IntentUpdate, PlayerView, Role};

// Headless match driver: two seeded bots duel through the real engine while
// every tick is audited against the simulation invariants.

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[arg(long)]
    ticks: Option<u64>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    summary_out: Option<PathBuf>,
}

#[derive(Clone, Debug, Serialize)]
struct AnomalyRecord {
    tick: u64,
    message: String,
}

#[derive(Clone, Debug, Serialize)]
struct RunSummary {
    #[serde(rename = "startedAt")]
    started_at: String,
    seed: u64,
    ticks: u64,
    #[serde(rename = "coverageRed")]
    coverage_red: f32,
    #[serde(rename = "coverageBlue")]
    coverage_blue: f32,
    #[serde(rename = "paintedTiles")]
    painted_tiles: usize,
    #[serde(rename = "peakBullets")]
    peak_bullets: usize,
    deaths: BTreeMap<String, u32>,
    #[serde(rename = "anomalyCount")]
    anomaly_count: usize,
    anomalies: Vec<AnomalyRecord>,
}

struct BotDriver {
    id: &'static str,
    rng: StdRng,
    think_at: u64,
}

impl BotDriver {
    fn new(id: &'static str, seed: u64) -> Self {
        Self {
            id,
            rng: StdRng::seed_from_u64(seed),
            think_at: 0,
        }
    }

    fn think(
        &mut self,
        tick: u64,
        me: Option<(f32, f32)>,
        enemy: Option<(f32, f32)>,
    ) -> Option<IntentUpdate> {
        if tick < self.think_at {
            return None;
        }
        self.think_at = tick + self.rng.random_range(4..12);

        let aim = match (me, enemy) {
            (Some((mx, my)), Some((ex, ey))) => {
                let jitter: f32 = self.rng.random_range(-0.35..0.35);
                (ey - my).atan2(ex - mx) + jitter
            }
            _ => self.rng.random_range(-PI..PI),
        };
        Some(IntentUpdate {
            move_up: Some(self.rng.random_bool(0.4)),
            move_down: Some(self.rng.random_bool(0.4)),
            move_left: Some(self.rng.random_bool(0.4)),
            move_right: Some(self.rng.random_bool(0.4)),
            fire: Some(self.rng.random_bool(0.7)),
            erase: Some(self.rng.random_bool(0.2)),
            aim_angle: Some(aim),
        })
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let seed = cli.seed.unwrap_or_else(|| rand::rng().random());
    let ticks = cli.ticks.unwrap_or(1800);
    let started_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    emit_log("info", "run_started", json!({ "seed": seed, "ticks": ticks }));

    let mut engine = GameEngine::new(GameConfig::default());
    engine.join("bot_red");
    engine.join("bot_blue");
    engine.join("watcher");

    let mut bots = [
        BotDriver::new("bot_red", seed),
        BotDriver::new("bot_blue", seed ^ 0x9e37_79b9_7f4a_7c15),
    ];

    let mut positions: BTreeMap<String, (f32, f32)> = BTreeMap::new();
    let mut was_alive: BTreeMap<String, bool> = BTreeMap::new();
    let mut deaths: BTreeMap<String, u32> = BTreeMap::new();
    let mut peak_bullets = 0usize;
    let mut anomalies: Vec<AnomalyRecord> = Vec::new();

    for tick in 0..ticks {
        for bot in &mut bots {
            let enemy_id = if bot.id == "bot_red" {
                "bot_blue"
            } else {
                "bot_red"
            };
            let me = positions.get(bot.id).copied();
            let enemy = positions.get(enemy_id).copied();
            if let Some(update) = bot.think(tick, me, enemy) {
                engine.receive_input(bot.id, update);
            }
        }

        engine.step(TICK_SECONDS);

        let snapshot = engine.build_snapshot();
        peak_bullets = peak_bullets.max(snapshot.bullets.len());
        positions = snapshot
            .players
            .iter()
            .filter(|p| p.alive)
            .map(|p| (p.id.clone(), (p.x, p.y)))
            .collect();
        audit_players(
            &engine,
            &snapshot.players,
            tick,
            &mut anomalies,
            &mut was_alive,
            &mut deaths,
        );

        if tick % 300 == 299 {
            emit_log(
                "info",
                "progress",
                json!({
                    "tick": tick + 1,
                    "coverageRed": snapshot.coverage.red,
                    "coverageBlue": snapshot.coverage.blue,
                    "bullets": snapshot.bullets.len(),
                }),
            );
        }
    }

    let coverage = engine.world.paint.coverage();
    let summary = RunSummary {
        started_at,
        seed,
        ticks,
        coverage_red: coverage.red,
        coverage_blue: coverage.blue,
        painted_tiles: engine.world.paint.painted_count(),
        peak_bullets,
        deaths,
        anomaly_count: anomalies.len(),
        anomalies,
    };

    let rendered = serde_json::to_string_pretty(&summary).expect("summary serializes");
    println!("{rendered}");
    if let Some(path) = cli.summary_out {
        if let Err(error) = fs::write(&path, &rendered) {
            emit_log(
                "error",
                "summary_write_failed",
                json!({ "path": path.to_string_lossy(), "error": error.to_string() }),
            );
            return ExitCode::FAILURE;
        }
    }

    if summary.anomaly_count > 0 {
        emit_log(
            "error",
            "run_finished_with_anomalies",
            json!({ "count": summary.anomaly_count }),
        );
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn audit_players(
    engine: &GameEngine,
    players: &[PlayerView],
    tick: u64,
    anomalies: &mut Vec<AnomalyRecord>,
    was_alive: &mut BTreeMap<String, bool>,
    deaths: &mut BTreeMap<String, u32>,
) {
    let config = &engine.config;
    for player in players {
        if player.role != Role::Player {
            continue;
        }
        if !(0.0..=config.max_hp).contains(&player.hp) {
            anomalies.push(AnomalyRecord {
                tick,
                message: format!("{} hp out of range: {}", player.id, player.hp),
            });
        }
        if !(0.0..=config.max_energy).contains(&player.energy) {
            anomalies.push(AnomalyRecord {
                tick,
                message: format!("{} energy out of range: {}", player.id, player.energy),
            });
        }
        if player.alive
            && engine
                .world
                .collides(player.x, player.y, config.player_radius)
        {
            anomalies.push(AnomalyRecord {
                tick,
                message: format!(
                    "{} embedded at ({:.1}, {:.1})",
                    player.id, player.x, player.y
                ),
            });
        }
        let previously = was_alive.insert(player.id.clone(), player.alive);
        if previously == Some(true) && !player.alive {
            *deaths.entry(player.id.clone()).or_default() += 1;
        }
    }
}

fn emit_log(level: &str, event: &str, details: serde_json::Value) {
    let line = json!({
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "level": level,
        "event": event,
        "details": details,
    });
    eprintln!("{line}");
}
