//! Aberred Kit headless demo.
//!
//! Runs a fixed-step bevy_ecs world where a handful of seekers ease toward
//! their targets. Each arrival recycles an effect entity from the effect pool,
//! replays a pooled (silent) sound through the mixer and triggers an
//! `"arrived"` event on a tracker object that counts arrivals.
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run -- --frames 300 --config aberredkit.ini
//! ```

use aberredkit::components::effect::Effect;
use aberredkit::components::mapposition::MapPosition;
use aberredkit::components::rigidbody::RigidBody;
use aberredkit::components::seek::Seek;
use aberredkit::eventbus::{
    EventBus, Evented, Handler, Lifecycle, REMOVE_EVENT, on, on_keyed, remove, trigger,
};
use aberredkit::pool::Pool;
use aberredkit::resources::effectpool::{fire_effect, spawn_effect_pool};
use aberredkit::resources::kitconfig::{DEFAULT_CONFIG_PATH, KitConfig};
use aberredkit::resources::mixer::{Mixer, Playback, audio_pool};
use aberredkit::resources::worldtime::WorldTime;
use aberredkit::scenario::Scenario;
use aberredkit::systems::effect::effect_system;
use aberredkit::systems::movement::movement_system;
use aberredkit::systems::seek::seek_system;
use aberredkit::systems::time::update_world_time;
use bevy_ecs::prelude::*;
use clap::Parser;
use rustc_hash::FxHashSet;
use std::path::PathBuf;

const EFFECT_DURATION: f32 = 0.25;
const SOUND_POOL_SIZE: usize = 4;

/// Aberred Kit headless demo
#[derive(Parser)]
#[command(version, about = "Headless seek / pool / event demo for Aberred Kit")]
struct Cli {
    /// INI configuration file (default: ./aberredkit.ini, used only if present).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// JSON scenario file listing seekers; random targets when omitted.
    #[arg(long, value_name = "PATH")]
    scenario: Option<String>,

    /// Number of simulation steps to run.
    #[arg(long, default_value_t = 240)]
    frames: u32,

    /// Simulation steps per second.
    #[arg(long, default_value_t = 60.0)]
    fps: f32,

    /// Seed for the random scenario.
    #[arg(long)]
    seed: Option<u64>,
}

/// Payload of tracker events.
#[derive(Clone, Copy, Debug, Default)]
struct Arrival {
    index: usize,
    x: f32,
    y: f32,
}

/// Host object counting arrivals through its own event registry.
struct Tracker {
    arrivals: u32,
    alive: bool,
    events: Option<EventBus<Tracker>>,
}

impl Evented for Tracker {
    type Args = Arrival;
    fn events(&self) -> Option<&EventBus<Self>> {
        self.events.as_ref()
    }
    fn events_mut(&mut self) -> &mut Option<EventBus<Self>> {
        &mut self.events
    }
}

impl Lifecycle for Tracker {
    fn is_alive(&self) -> bool {
        self.alive
    }
    fn mark_dead(&mut self) {
        self.alive = false;
    }
}

/// Sound handle without an output device; it only keeps playback state.
#[derive(Clone, Debug, Default)]
struct SilentClip {
    time: f32,
    playing: bool,
    volume: f32,
    base_volume: Option<f32>,
    paused_by_game: bool,
}

impl Playback for SilentClip {
    fn current_time(&self) -> f32 {
        self.time
    }
    fn ended(&self) -> bool {
        false
    }
    fn play(&mut self) {
        self.playing = true;
    }
    fn pause(&mut self) {
        self.playing = false;
    }
    fn rewind(&mut self) {
        self.time = 0.0;
    }
    fn base_volume(&self) -> Option<f32> {
        self.base_volume
    }
    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }
    fn paused_by_game(&self) -> bool {
        self.paused_by_game
    }
    fn set_paused_by_game(&mut self, paused: bool) {
        self.paused_by_game = paused;
    }
}

fn load_config(path: Option<PathBuf>) -> Result<KitConfig, String> {
    match path {
        Some(path) => {
            let mut config = KitConfig::with_path(path);
            config.load_from_file()?;
            Ok(config)
        }
        None => {
            let mut config = KitConfig::with_path(DEFAULT_CONFIG_PATH);
            if let Err(e) = config.load_from_file() {
                log::info!("Using default config ({})", e);
            }
            Ok(config)
        }
    }
}

fn load_scenario(path: Option<&str>, seed: Option<u64>) -> Result<Scenario, String> {
    match path {
        Some(path) => Scenario::load_from_file(path)
            .map_err(|e| format!("Failed to load scenario '{}': {}", path, e)),
        None => {
            let mut rng = seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);
            Ok(Scenario::scattered(&mut rng, 5, 320.0, 180.0))
        }
    }
}

fn make_tracker() -> Tracker {
    let mut tracker = Tracker {
        arrivals: 0,
        alive: true,
        events: None,
    };
    on(&mut tracker, "arrived", |t: &mut Tracker, a: &Arrival| {
        t.arrivals += 1;
        log::info!("Seeker {} arrived at ({:.1}, {:.1})", a.index, a.x, a.y);
    });
    on_keyed(
        &mut tracker,
        "arrived",
        [(
            "first",
            Handler::new(|_: &mut Tracker, a: &Arrival| {
                log::info!("First arrival: seeker {}", a.index);
                false
            }),
        )],
    );
    on(&mut tracker, REMOVE_EVENT, |t: &mut Tracker, _: &Arrival| {
        log::info!("Tracker removed after {} arrivals", t.arrivals);
    });
    tracker
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match load_config(cli.config) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };
    let scenario = match load_scenario(cli.scenario.as_deref(), cli.seed) {
        Ok(scenario) => scenario,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };
    if cli.fps <= 0.0 {
        log::error!("--fps must be positive, got {}", cli.fps);
        std::process::exit(1);
    }

    log::info!(
        "Running {} seekers for {} frames at {} fps",
        scenario.seekers.len(),
        cli.frames,
        cli.fps
    );

    // --------------- ECS world + resources ---------------
    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    spawn_effect_pool(&mut world, config.pool_size, EFFECT_DURATION);

    let mut mixer = Mixer::new();
    let mut sounds: Pool<SilentClip> = audio_pool(
        SOUND_POOL_SIZE,
        &SilentClip {
            base_volume: Some(0.8),
            ..Default::default()
        },
    );
    mixer.set_volume_level(config.volume, &mut sounds);

    let seekers: Vec<Entity> = scenario
        .seekers
        .iter()
        .map(|spec| {
            world
                .spawn((
                    MapPosition::new(spec.x, spec.y),
                    RigidBody::new(),
                    Seek::new(spec.target_x, spec.target_y, config.motion),
                ))
                .id()
        })
        .collect();
    world.insert_resource(config);
    world.insert_resource(mixer);

    let mut schedule = Schedule::default();
    schedule.add_systems((seek_system, movement_system, effect_system).chain());

    let mut tracker = make_tracker();
    let mut arrived: FxHashSet<Entity> = FxHashSet::default();
    let dt = 1.0 / cli.fps;

    // --------------- Main loop ---------------
    for _ in 0..cli.frames {
        update_world_time(&mut world, dt);
        schedule.run(&mut world);

        let mut query = world.query::<(Entity, &MapPosition, &Seek)>();
        let new_arrivals: Vec<(Entity, f32, f32)> = query
            .iter(&world)
            .filter(|(entity, position, seek)| !arrived.contains(entity) && seek.is_near(position))
            .map(|(entity, position, _)| (entity, position.x, position.y))
            .collect();

        for (entity, x, y) in new_arrivals {
            arrived.insert(entity);
            fire_effect(&mut world, x, y);
            let index = seekers.iter().position(|e| *e == entity).unwrap_or_default();
            let base_volume = if index == 0 { 1.0 } else { 0.8 };
            world
                .resource::<Mixer>()
                .replay_with(sounds.next(), |clip| clip.base_volume = Some(base_volume));
            trigger(&mut tracker, "arrived", &Arrival { index, x, y });
        }
    }

    // --------------- Summary ---------------
    let active_effects = world
        .query::<&Effect>()
        .iter(&world)
        .filter(|effect| effect.active)
        .count();
    let elapsed = world.resource::<WorldTime>().elapsed;
    let playing = sounds.iter().filter(|clip| clip.playing).count();
    let volume = sounds.get(0).map_or(0.0, |clip| clip.volume);
    log::info!(
        "Done after {:.2}s: {}/{} seekers arrived, {} effects still active, {} sounds at volume {:.2}",
        elapsed,
        arrived.len(),
        seekers.len(),
        active_effects,
        playing,
        volume
    );

    remove(&mut tracker);
    debug_assert!(!tracker.is_alive());
}
