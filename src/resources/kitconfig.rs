//! Toolkit configuration resource.
//!
//! Manages motion, pooling and audio settings loaded from an INI
//! configuration file. Provides defaults for safe startup and methods to
//! load/save configuration.
//!
//! # Configuration File Format
//!
//! ```ini
//! [motion]
//! max_speed = 200
//! acceleration = 400
//! deceleration = 400
//!
//! [pool]
//! size = 8
//!
//! [audio]
//! volume = 1.0
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

use crate::motion::MotionProfile;

/// Default safe values for startup
const DEFAULT_MAX_SPEED: f32 = 200.0;
const DEFAULT_ACCELERATION: f32 = 400.0;
const DEFAULT_DECELERATION: f32 = 400.0;
const DEFAULT_POOL_SIZE: usize = 8;
const DEFAULT_VOLUME: f32 = 1.0;
pub const DEFAULT_CONFIG_PATH: &str = "./aberredkit.ini";

/// Toolkit configuration resource.
#[derive(Resource, Debug, Clone)]
pub struct KitConfig {
    /// Motion profile given to seeking entities.
    pub motion: MotionProfile,
    /// Number of pre-built items per pool.
    pub pool_size: usize,
    /// Master volume level applied on top of each handle's base volume.
    pub volume: f32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for KitConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl KitConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            motion: MotionProfile::new(DEFAULT_MAX_SPEED, DEFAULT_ACCELERATION, DEFAULT_DECELERATION),
            pool_size: DEFAULT_POOL_SIZE,
            volume: DEFAULT_VOLUME,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values. A pool size of
    /// zero is ignored since pools need at least one item.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [motion] section
        if let Some(max_speed) = config.getfloat("motion", "max_speed").ok().flatten() {
            self.motion.max_speed = max_speed as f32;
        }
        if let Some(acc) = config.getfloat("motion", "acceleration").ok().flatten() {
            self.motion.acceleration = acc as f32;
        }
        if let Some(dec) = config.getfloat("motion", "deceleration").ok().flatten() {
            self.motion.deceleration = dec as f32;
        }

        // [pool] section
        if let Some(size) = config.getuint("pool", "size").ok().flatten() {
            if size > 0 {
                self.pool_size = size as usize;
            }
        }

        // [audio] section
        if let Some(volume) = config.getfloat("audio", "volume").ok().flatten() {
            self.volume = volume as f32;
        }

        info!(
            "Loaded config: max_speed={}, acc={}, dec={}, pool={}, volume={}",
            self.motion.max_speed,
            self.motion.acceleration,
            self.motion.deceleration,
            self.pool_size,
            self.volume
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        // [motion] section
        config.set("motion", "max_speed", Some(self.motion.max_speed.to_string()));
        config.set("motion", "acceleration", Some(self.motion.acceleration.to_string()));
        config.set("motion", "deceleration", Some(self.motion.deceleration.to_string()));

        // [pool] section
        config.set("pool", "size", Some(self.pool_size.to_string()));

        // [audio] section
        config.set("audio", "volume", Some(self.volume.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}
