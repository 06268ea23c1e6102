use serde::{Deserialize, Serialize};

pub const DEFAULT_STORAGE_KEY: &str = "love-map-data";

// ── Heart path ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeartConfig {
    /// Heart size as a fraction of the distance between the two people.
    pub size_ratio: f64,
    /// Loop segments; the loop carries `loop_points + 1` points.
    pub loop_points: usize,
    /// Connector segments; each connector carries `connector_points + 1` points.
    pub connector_points: usize,
    /// How far from each endpoint toward the midpoint the connector control sits.
    pub control_fraction: f64,
}

impl Default for HeartConfig {
    fn default() -> Self {
        Self {
            size_ratio:       0.15,
            loop_points:      50,
            connector_points: 20,
            control_fraction: 0.25,
        }
    }
}

// ── Animation ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationTrack {
    /// Great-circle segment between the two people.
    Straight,
    /// Along the drawn heart path.
    HeartPath,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub period_ms:         u64,
    pub frame_interval_ms: u64,
    pub track:             AnimationTrack,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            period_ms:         3000,
            frame_interval_ms: 16,
            track:             AnimationTrack::Straight,
        }
    }
}

// ── Distance facts ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactsConfig {
    pub earth_circumference_km: f64,
    pub step_length_m:          f64,
    pub plane_kmh:              f64,
    pub train_kmh:              f64,
    pub car_kmh:                f64,
}

impl Default for FactsConfig {
    fn default() -> Self {
        Self {
            earth_circumference_km: 40_075.0,
            step_length_m:          0.762,
            plane_kmh:              800.0,
            train_kmh:              250.0,
            car_kmh:                100.0,
        }
    }
}

// ── Top level ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoveMapConfig {
    pub storage_key: String,
    /// SQLite file backing the local store; `:memory:` keeps nothing.
    pub db_path:     String,
    pub heart:       HeartConfig,
    pub animation:   AnimationConfig,
    pub facts:       FactsConfig,
}

impl Default for LoveMapConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            db_path:     "love-map.db".to_string(),
            heart:       HeartConfig::default(),
            animation:   AnimationConfig::default(),
            facts:       FactsConfig::default(),
        }
    }
}

impl LoveMapConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: LoveMapConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Config for tests: in-memory store, default geometry.
    pub fn default_test() -> Self {
        Self {
            db_path: ":memory:".to_string(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.heart.loop_points > 0, "heart.loop_points must be > 0");
        anyhow::ensure!(self.heart.connector_points > 0, "heart.connector_points must be > 0");
        anyhow::ensure!(self.animation.period_ms > 0, "animation.period_ms must be > 0");
        for (label, speed) in [
            ("plane_kmh", self.facts.plane_kmh),
            ("train_kmh", self.facts.train_kmh),
            ("car_kmh", self.facts.car_kmh),
            ("step_length_m", self.facts.step_length_m),
        ] {
            anyhow::ensure!(speed > 0.0, "facts.{label} must be > 0, got {speed}");
        }
        Ok(())
    }
}
