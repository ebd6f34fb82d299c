//! Tunable game parameters.
//!
//! Passed from the page as an optional JSON object; every field has a default.

use serde::{Deserialize, Serialize};

fn default_settle_delay_ms() -> u32 {
    700
}
fn default_celebrate_streak() -> u32 {
    3
}
fn default_storage_key() -> String {
    "jokenpoScores".into()
}
fn default_title_text() -> String {
    "JOKENPÔ".into()
}
fn default_title_char_delay_ms() -> u32 {
    150
}
fn default_title_pause_ms() -> u32 {
    3000
}
fn default_score_pulse_ms() -> u32 {
    300
}
fn default_vibrate_ms() -> u32 {
    100
}
fn default_log_level() -> String {
    "info".into()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Pause between revealing both hands and showing the outcome.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u32,

    /// Win streak length that triggers confetti.
    #[serde(default = "default_celebrate_streak")]
    pub celebrate_streak: u32,

    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    #[serde(default = "default_title_text")]
    pub title_text: String,

    #[serde(default = "default_title_char_delay_ms")]
    pub title_char_delay_ms: u32,

    #[serde(default = "default_title_pause_ms")]
    pub title_pause_ms: u32,

    #[serde(default = "default_score_pulse_ms")]
    pub score_pulse_ms: u32,

    #[serde(default = "default_vibrate_ms")]
    pub vibrate_ms: u32,

    /// One of error / warn / info / debug / trace.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub particles: ParticleConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay_ms(),
            celebrate_streak: default_celebrate_streak(),
            storage_key: default_storage_key(),
            title_text: default_title_text(),
            title_char_delay_ms: default_title_char_delay_ms(),
            title_pause_ms: default_title_pause_ms(),
            score_pulse_ms: default_score_pulse_ms(),
            vibrate_ms: default_vibrate_ms(),
            log_level: default_log_level(),
            particles: ParticleConfig::default(),
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config. Empty input yields the defaults.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: Self = if json.trim().is_empty() {
            Self::default()
        } else {
            serde_json::from_str(json)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.settle_delay_ms > 0, "settle_delay_ms must be non-zero");
        anyhow::ensure!(self.celebrate_streak >= 1, "celebrate_streak must be at least 1");
        anyhow::ensure!(!self.storage_key.is_empty(), "storage_key must not be empty");
        anyhow::ensure!(
            self.title_char_delay_ms > 0,
            "title_char_delay_ms must be non-zero"
        );
        self.log_filter()?;
        Ok(())
    }

    pub fn log_filter(&self) -> anyhow::Result<log::LevelFilter> {
        self.log_level
            .parse::<log::LevelFilter>()
            .map_err(|_| anyhow::anyhow!("unknown log level '{}'", self.log_level))
    }
}

fn default_particle_count() -> u32 {
    60
}
fn default_density_area() -> u32 {
    800
}
fn default_particle_color() -> String {
    "#ffffff".into()
}
fn default_particle_opacity() -> f64 {
    0.5
}
fn default_particle_size() -> f64 {
    2.0
}
fn default_particle_speed() -> f64 {
    1.0
}

/// Background particle field handed to the page's `particlesJS`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleConfig {
    #[serde(default = "default_particle_count")]
    pub count: u32,
    #[serde(default = "default_density_area")]
    pub density_area: u32,
    #[serde(default = "default_particle_color")]
    pub color: String,
    #[serde(default = "default_particle_opacity")]
    pub opacity: f64,
    #[serde(default = "default_particle_size")]
    pub size: f64,
    #[serde(default = "default_particle_speed")]
    pub speed: f64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: default_particle_count(),
            density_area: default_density_area(),
            color: default_particle_color(),
            opacity: default_particle_opacity(),
            size: default_particle_size(),
            speed: default_particle_speed(),
        }
    }
}

impl ParticleConfig {
    /// Options object in the shape `particlesJS(id, options)` expects.
    pub fn to_particles_js(&self) -> serde_json::Value {
        serde_json::json!({
            "particles": {
                "number": { "value": self.count, "density": { "enable": true, "value_area": self.density_area } },
                "color": { "value": self.color },
                "shape": { "type": "circle" },
                "opacity": { "value": self.opacity, "random": true },
                "size": { "value": self.size, "random": true },
                "line_linked": { "enable": false },
                "move": {
                    "enable": true,
                    "speed": self.speed,
                    "direction": "none",
                    "random": true,
                    "straight": false,
                    "out_mode": "out"
                }
            },
            "interactivity": {
                "detect_on": "canvas",
                "events": { "onhover": { "enable": false }, "onclick": { "enable": false } }
            },
            "retina_detect": true
        })
    }
}
