//! Seeker layouts for the demo runner.
//!
//! A scenario is a JSON document listing where each seeker starts and where
//! it should go:
//!
//! ```json
//! { "seekers": [ { "x": 0, "y": 0, "target_x": 120, "target_y": 40 } ] }
//! ```

use fastrand::Rng;
use serde::{Deserialize, Serialize};

use crate::math::randge_with;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeekerSpec {
    pub x: f32,
    pub y: f32,
    pub target_x: f32,
    pub target_y: f32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub seekers: Vec<SeekerSpec>,
}

impl Scenario {
    /// Loads a scenario from a JSON file at the specified path.
    pub fn load_from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let file_content = std::fs::read_to_string(path)?;
        let scenario: Scenario = serde_json::from_str(&file_content)?;
        Ok(scenario)
    }

    /// `count` seekers starting at the origin with targets scattered inside
    /// a `width` x `height` area.
    pub fn scattered(rng: &mut Rng, count: usize, width: f32, height: f32) -> Self {
        let seekers = (0..count)
            .map(|_| SeekerSpec {
                x: 0.0,
                y: 0.0,
                target_x: randge_with(rng, -width / 2.0, width / 2.0),
                target_y: randge_with(rng, -height / 2.0, height / 2.0),
            })
            .collect();
        Scenario { seekers }
    }
}
