use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::time::SimTime;

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_max_steps() -> u32 {
    5000
}
const fn default_required_parking_duration() -> f64 {
    5.0
}
const fn default_max_allowed_distance() -> f32 {
    20.0
}
const fn default_tick_seconds() -> f64 {
    0.02
}
const fn default_true() -> bool {
    true
}
const fn default_spotted_goal_reward() -> f32 {
    2.5
}
const fn default_entered_goal_reward() -> f32 {
    10.0
}
const fn default_max_staying_in_goal_reward() -> f32 {
    5.0
}
const fn default_threshold_precision() -> f32 {
    1.0
}
const fn default_max_precision_reward() -> f32 {
    5.0
}
const fn default_max_alignment_reward() -> f32 {
    2.5
}
const fn default_max_proximity_reward() -> f32 {
    2.5
}
const fn default_threshold_proximity() -> f32 {
    10.0
}
const fn default_max_velocity_reward() -> f32 {
    1.0
}
const fn default_threshold_velocity() -> f32 {
    3.0
}
const fn default_max_time_penalty() -> f32 {
    1.0
}
const fn default_max_offroad_penalty() -> f32 {
    2.5
}
const fn default_collision_penalty() -> f32 {
    10.0
}
const fn default_exceed_distance_penalty() -> f32 {
    10.0
}
const fn default_leave_parking_penalty() -> f32 {
    2.5
}
const fn default_region_min() -> [f32; 2] {
    [-10.0, -10.0]
}
const fn default_region_max() -> [f32; 2] {
    [10.0, 10.0]
}
const fn default_goal_position() -> [f32; 3] {
    [0.0, 0.0, 10.0]
}
const fn default_goal_size() -> [f32; 2] {
    [3.0, 6.0]
}
const fn default_vehicle_size() -> [f32; 3] {
    [2.0, 1.5, 4.5]
}
const fn default_road_center() -> [f32; 2] {
    [0.0, 5.0]
}
const fn default_road_size() -> [f32; 2] {
    [20.0, 40.0]
}

fn require_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn require_magnitude(field: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field: field.into(),
            message: format!("must be a finite, non-negative magnitude (got {value})"),
        })
    }
}

// ---------------------------------------------------------------------------
// RewardConfig
// ---------------------------------------------------------------------------

/// Reward magnitudes, enable flags and thresholds for each shaping term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardConfig {
    /// One-shot reward the first time a sensor ray hits the goal.
    #[serde(default = "default_true")]
    pub enable_spotted_goal: bool,
    #[serde(default = "default_spotted_goal_reward")]
    pub spotted_goal_reward: f32,

    /// One-shot reward for the first contact with the goal surface.
    #[serde(default = "default_entered_goal_reward")]
    pub entered_goal_reward: f32,

    /// Per-tick reward while fully inside the goal, spread over `max_steps`.
    #[serde(default = "default_true")]
    pub enable_staying_in_goal: bool,
    #[serde(default = "default_max_staying_in_goal_reward")]
    pub max_staying_in_goal_reward: f32,

    /// Distance at which the terminal precision reward reaches zero.
    #[serde(default = "default_threshold_precision")]
    pub threshold_precision: f32,
    #[serde(default = "default_max_precision_reward")]
    pub max_precision_reward: f32,
    #[serde(default = "default_max_alignment_reward")]
    pub max_alignment_reward: f32,

    #[serde(default)]
    pub enable_proximity: bool,
    #[serde(default = "default_max_proximity_reward")]
    pub max_proximity_reward: f32,
    /// Distance from the goal where the proximity reward starts coming in.
    #[serde(default = "default_threshold_proximity")]
    pub threshold_proximity: f32,

    /// Experimental: rewards steady movement.
    #[serde(default)]
    pub enable_velocity: bool,
    #[serde(default = "default_max_velocity_reward")]
    pub max_velocity_reward: f32,
    /// Speed above which the velocity reward is capped.
    #[serde(default = "default_threshold_velocity")]
    pub threshold_velocity: f32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            enable_spotted_goal: true,
            spotted_goal_reward: default_spotted_goal_reward(),
            entered_goal_reward: default_entered_goal_reward(),
            enable_staying_in_goal: true,
            max_staying_in_goal_reward: default_max_staying_in_goal_reward(),
            threshold_precision: default_threshold_precision(),
            max_precision_reward: default_max_precision_reward(),
            max_alignment_reward: default_max_alignment_reward(),
            enable_proximity: false,
            max_proximity_reward: default_max_proximity_reward(),
            threshold_proximity: default_threshold_proximity(),
            enable_velocity: false,
            max_velocity_reward: default_max_velocity_reward(),
            threshold_velocity: default_threshold_velocity(),
        }
    }
}

impl RewardConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("rewards.threshold_precision", self.threshold_precision)?;
        require_positive("rewards.threshold_proximity", self.threshold_proximity)?;
        require_positive("rewards.threshold_velocity", self.threshold_velocity)?;
        for (field, value) in [
            ("rewards.spotted_goal_reward", self.spotted_goal_reward),
            ("rewards.entered_goal_reward", self.entered_goal_reward),
            (
                "rewards.max_staying_in_goal_reward",
                self.max_staying_in_goal_reward,
            ),
            ("rewards.max_precision_reward", self.max_precision_reward),
            ("rewards.max_alignment_reward", self.max_alignment_reward),
            ("rewards.max_proximity_reward", self.max_proximity_reward),
            ("rewards.max_velocity_reward", self.max_velocity_reward),
        ] {
            require_magnitude(field, value)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PenaltyConfig
// ---------------------------------------------------------------------------

/// Penalty magnitudes. All are positive numbers subtracted from the reward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenaltyConfig {
    /// Total time penalty over a full-length episode.
    #[serde(default = "default_max_time_penalty")]
    pub max_time_penalty: f32,
    /// Total offroad penalty over a full-length episode spent offroad.
    #[serde(default = "default_max_offroad_penalty")]
    pub max_offroad_penalty: f32,
    /// Per contact with a parked car or an edge.
    #[serde(default = "default_collision_penalty")]
    pub collision_penalty: f32,
    /// Applied once when the episode fails by leaving the allowed radius.
    #[serde(default = "default_exceed_distance_penalty")]
    pub exceed_distance_penalty: f32,
    /// Per exit from the goal after having been fully inside it.
    #[serde(default = "default_leave_parking_penalty")]
    pub leave_parking_penalty: f32,
}

impl Default for PenaltyConfig {
    fn default() -> Self {
        Self {
            max_time_penalty: default_max_time_penalty(),
            max_offroad_penalty: default_max_offroad_penalty(),
            collision_penalty: default_collision_penalty(),
            exceed_distance_penalty: default_exceed_distance_penalty(),
            leave_parking_penalty: default_leave_parking_penalty(),
        }
    }
}

impl PenaltyConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("penalties.max_time_penalty", self.max_time_penalty),
            ("penalties.max_offroad_penalty", self.max_offroad_penalty),
            ("penalties.collision_penalty", self.collision_penalty),
            (
                "penalties.exceed_distance_penalty",
                self.exceed_distance_penalty,
            ),
            ("penalties.leave_parking_penalty", self.leave_parking_penalty),
        ] {
            require_magnitude(field, value)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// EpisodeConfig
// ---------------------------------------------------------------------------

/// Immutable per-run episode configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Resource)]
pub struct EpisodeConfig {
    /// Episode length limit in physics ticks (default: 5000).
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,

    /// Seconds of continuous containment required for success (default: 5).
    #[serde(default = "default_required_parking_duration")]
    pub required_parking_duration: f64,

    /// Goal distance beyond which the episode fails (default: 20).
    #[serde(default = "default_max_allowed_distance")]
    pub max_allowed_distance: f32,

    /// Physics tick length in seconds (default: 0.02 = 50 Hz).
    #[serde(default = "default_tick_seconds")]
    pub tick_seconds: f64,

    /// Whether the ECS adapter starts a new episode right after one ends.
    #[serde(default = "default_true")]
    pub auto_reset: bool,

    #[serde(default)]
    pub rewards: RewardConfig,

    #[serde(default)]
    pub penalties: PenaltyConfig,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
            required_parking_duration: default_required_parking_duration(),
            max_allowed_distance: default_max_allowed_distance(),
            tick_seconds: default_tick_seconds(),
            auto_reset: true,
            rewards: RewardConfig::default(),
            penalties: PenaltyConfig::default(),
        }
    }
}

impl EpisodeConfig {
    /// Validate configuration. Returns Err on values that would feed NaN or
    /// Inf into the reward math.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // sub-nanosecond ticks round to zero and would freeze the parking timer
        if !(self.tick_seconds.is_finite() && self.tick_seconds > 0.0) || self.tick().is_zero() {
            return Err(ConfigError::InvalidTickSeconds(self.tick_seconds));
        }
        if self.max_steps == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_steps".into(),
                message: "must be at least 1".into(),
            });
        }
        let duration = self.required_parking_duration;
        if !(duration.is_finite() && duration > 0.0) || self.required_parking_time().is_zero() {
            return Err(ConfigError::InvalidParkingDuration(duration));
        }
        require_positive("max_allowed_distance", self.max_allowed_distance)?;
        self.rewards.validate()?;
        self.penalties.validate()
    }

    /// Builder: set max steps.
    #[must_use]
    pub const fn with_max_steps(mut self, steps: u32) -> Self {
        self.max_steps = steps;
        self
    }

    /// Builder: set the tick length.
    #[must_use]
    pub const fn with_tick_seconds(mut self, secs: f64) -> Self {
        self.tick_seconds = secs;
        self
    }

    /// Builder: enable or disable auto-reset.
    #[must_use]
    pub const fn with_auto_reset(mut self, auto_reset: bool) -> Self {
        self.auto_reset = auto_reset;
        self
    }

    /// One physics tick.
    pub fn tick(&self) -> SimTime {
        SimTime::from_secs(self.tick_seconds)
    }

    /// Containment time that must be exceeded for success.
    pub fn required_parking_time(&self) -> SimTime {
        SimTime::from_secs(self.required_parking_duration)
    }
}

// ---------------------------------------------------------------------------
// SpawnConfig
// ---------------------------------------------------------------------------

/// Where the vehicle is placed at the start of each episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Resource)]
pub struct SpawnConfig {
    #[serde(default)]
    pub start_position: [f32; 3],
    /// Yaw in degrees (0 faces `+Z`).
    #[serde(default)]
    pub start_heading_deg: f32,

    /// Sample the start position inside `region_min..region_max`.
    #[serde(default)]
    pub random_position: bool,
    #[serde(default)]
    pub random_x: bool,
    #[serde(default)]
    pub random_z: bool,
    /// Spawn region `[x, z]` lower corner.
    #[serde(default = "default_region_min")]
    pub region_min: [f32; 2],
    /// Spawn region `[x, z]` upper corner.
    #[serde(default = "default_region_max")]
    pub region_max: [f32; 2],

    /// Uniform heading in `[0°, 360°)`. Takes priority over `flip_direction`.
    /// Both heading options only apply with `random_position`.
    #[serde(default)]
    pub random_heading: bool,
    /// Coin flip between 0° and 180°.
    #[serde(default)]
    pub flip_direction: bool,

    /// Root seed for spawn randomisation.
    #[serde(default)]
    pub seed: u64,
    /// Index of this environment among parallel instances.
    #[serde(default)]
    pub env_index: u16,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            start_position: [0.0; 3],
            start_heading_deg: 0.0,
            random_position: false,
            random_x: false,
            random_z: false,
            region_min: default_region_min(),
            region_max: default_region_max(),
            random_heading: false,
            flip_direction: false,
            seed: 0,
            env_index: 0,
        }
    }
}

impl SpawnConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.random_position {
            return Ok(());
        }
        if !self.random_x && !self.random_z {
            return Err(ConfigError::Incompatible(
                "random_position needs random_x or random_z".into(),
            ));
        }
        let axes = [(self.random_x, 0, "x"), (self.random_z, 1, "z")];
        for (enabled, i, axis) in axes {
            let (lo, hi) = (self.region_min[i], self.region_max[i]);
            if enabled && !(lo.is_finite() && hi.is_finite() && lo < hi) {
                return Err(ConfigError::InvalidValue {
                    field: format!("spawn.region.{axis}"),
                    message: format!("min ({lo}) must be < max ({hi})"),
                });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// LotConfig
// ---------------------------------------------------------------------------

/// Parking goal placement and footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalConfig {
    #[serde(default = "default_goal_position")]
    pub position: [f32; 3],
    #[serde(default)]
    pub heading_deg: f32,
    /// `[width, length]` of the bay.
    #[serde(default = "default_goal_size")]
    pub size: [f32; 2],
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            position: default_goal_position(),
            heading_deg: 0.0,
            size: default_goal_size(),
        }
    }
}

/// Drivable road rectangle on the ground plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadConfig {
    /// `[x, z]` centre.
    #[serde(default = "default_road_center")]
    pub center: [f32; 2],
    /// `[width, length]` along `x` and `z`.
    #[serde(default = "default_road_size")]
    pub size: [f32; 2],
}

impl Default for RoadConfig {
    fn default() -> Self {
        Self {
            center: default_road_center(),
            size: default_road_size(),
        }
    }
}

/// A parked car occupying a neighbouring bay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParkedCarConfig {
    pub position: [f32; 3],
    #[serde(default)]
    pub heading_deg: f32,
}

/// Layout of the parking lot around the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotConfig {
    #[serde(default)]
    pub goal: GoalConfig,
    #[serde(default)]
    pub road: RoadConfig,
    /// `[width, height, length]` shared by the agent and parked cars.
    #[serde(default = "default_vehicle_size")]
    pub vehicle_size: [f32; 3],
    #[serde(default)]
    pub parked_cars: Vec<ParkedCarConfig>,
}

impl Default for LotConfig {
    fn default() -> Self {
        Self {
            goal: GoalConfig::default(),
            road: RoadConfig::default(),
            vehicle_size: default_vehicle_size(),
            parked_cars: Vec::new(),
        }
    }
}

impl LotConfig {
    /// Half extents of the agent and parked cars.
    pub fn vehicle_half_extents(&self) -> [f32; 3] {
        self.vehicle_size.map(|v| v * 0.5)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("lot.goal.size[0]", self.goal.size[0])?;
        require_positive("lot.goal.size[1]", self.goal.size[1])?;
        require_positive("lot.road.size[0]", self.road.size[0])?;
        require_positive("lot.road.size[1]", self.road.size[1])?;
        for (i, field) in ["lot.vehicle_size[0]", "lot.vehicle_size[1]", "lot.vehicle_size[2]"]
            .into_iter()
            .enumerate()
        {
            require_positive(field, self.vehicle_size[i])?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SceneConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Complete scene configuration loaded from TOML.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneConfig {
    #[serde(default)]
    pub meta: SceneMeta,
    #[serde(default)]
    pub episode: EpisodeConfig,
    #[serde(default)]
    pub spawn: SpawnConfig,
    #[serde(default)]
    pub lot: LotConfig,
}

impl SceneConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.episode.validate()?;
        self.spawn.validate()?;
        self.lot.validate()
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // ---- EpisodeConfig defaults ----

    #[test]
    fn episode_config_default_values() {
        let cfg = EpisodeConfig::default();
        assert_eq!(cfg.max_steps, 5000);
        assert!((cfg.required_parking_duration - 5.0).abs() < f64::EPSILON);
        assert!((cfg.max_allowed_distance - 20.0).abs() < f32::EPSILON);
        assert!((cfg.tick_seconds - 0.02).abs() < f64::EPSILON);
        assert!(cfg.auto_reset);
        assert!(cfg.rewards.enable_spotted_goal);
        assert!(cfg.rewards.enable_staying_in_goal);
        assert!(!cfg.rewards.enable_proximity);
        assert!(!cfg.rewards.enable_velocity);
        assert!((cfg.penalties.collision_penalty - 10.0).abs() < f32::EPSILON);
    }

    #[test]
    fn episode_config_default_validates() {
        assert!(EpisodeConfig::default().validate().is_ok());
    }

    #[test]
    fn episode_config_time_conversions() {
        let cfg = EpisodeConfig::default().with_tick_seconds(0.1);
        assert_eq!(cfg.tick().nanos(), 100_000_000);
        assert_eq!(cfg.required_parking_time().nanos(), 5_000_000_000);
    }

    #[test]
    fn fractional_parking_duration_is_exact() {
        let mut cfg = EpisodeConfig::default();
        cfg.required_parking_duration = 0.7;
        assert_eq!(cfg.required_parking_time().nanos(), 700_000_000);
        cfg.required_parking_duration = 2.3;
        assert_eq!(cfg.required_parking_time().nanos(), 2_300_000_000);
    }

    #[test]
    fn episode_config_builders() {
        let cfg = EpisodeConfig::default()
            .with_max_steps(100)
            .with_auto_reset(false);
        assert_eq!(cfg.max_steps, 100);
        assert!(!cfg.auto_reset);
    }

    // ---- EpisodeConfig validate ----

    #[test]
    fn validate_rejects_zero_tick() {
        let cfg = EpisodeConfig::default().with_tick_seconds(0.0);
        assert!(matches!(
            cfg.validate().unwrap_err(),
            ConfigError::InvalidTickSeconds(_)
        ));
    }

    #[test]
    fn validate_rejects_tick_that_rounds_to_zero() {
        let cfg = EpisodeConfig::default().with_tick_seconds(1e-10);
        assert!(cfg.tick().is_zero());
        assert!(matches!(
            cfg.validate().unwrap_err(),
            ConfigError::InvalidTickSeconds(_)
        ));
        // one nanosecond is the shortest usable tick
        assert!(EpisodeConfig::default().with_tick_seconds(1e-9).validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_parking_duration() {
        for duration in [0.0, -5.0, f64::NAN, 1e-12] {
            let mut cfg = EpisodeConfig::default();
            cfg.required_parking_duration = duration;
            assert!(matches!(
                cfg.validate().unwrap_err(),
                ConfigError::InvalidParkingDuration(_)
            ));
        }
    }

    #[test]
    fn validate_rejects_nan_tick() {
        let cfg = EpisodeConfig::default().with_tick_seconds(f64::NAN);
        assert!(matches!(
            cfg.validate().unwrap_err(),
            ConfigError::InvalidTickSeconds(_)
        ));
    }

    #[test]
    fn validate_rejects_zero_max_steps() {
        let cfg = EpisodeConfig::default().with_max_steps(0);
        assert!(matches!(
            cfg.validate().unwrap_err(),
            ConfigError::InvalidValue { .. }
        ));
    }

    #[test]
    fn validate_rejects_non_positive_thresholds() {
        for setter in [
            |c: &mut EpisodeConfig| c.rewards.threshold_precision = 0.0,
            |c: &mut EpisodeConfig| c.rewards.threshold_proximity = -1.0,
            |c: &mut EpisodeConfig| c.rewards.threshold_velocity = 0.0,
            |c: &mut EpisodeConfig| c.max_allowed_distance = 0.0,
        ] {
            let mut cfg = EpisodeConfig::default();
            setter(&mut cfg);
            assert!(matches!(
                cfg.validate().unwrap_err(),
                ConfigError::NonPositive { .. }
            ));
        }
    }

    #[test]
    fn validate_rejects_disabled_term_with_bad_threshold() {
        // Thresholds are checked even when their term is switched off.
        let mut cfg = EpisodeConfig::default();
        cfg.rewards.enable_proximity = false;
        cfg.rewards.threshold_proximity = 0.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_negative_magnitudes() {
        let mut cfg = EpisodeConfig::default();
        cfg.penalties.collision_penalty = -10.0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("penalties.collision_penalty"));

        let mut cfg = EpisodeConfig::default();
        cfg.rewards.spotted_goal_reward = f32::INFINITY;
        assert!(cfg.validate().is_err());
    }

    // ---- TOML ----

    #[test]
    fn episode_config_toml_defaults() {
        let cfg: EpisodeConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, EpisodeConfig::default());
    }

    #[test]
    fn episode_config_toml_partial_tables() {
        let toml_str = r"
            max_steps = 300
            tick_seconds = 0.1

            [rewards]
            enable_proximity = true
            threshold_proximity = 8.0

            [penalties]
            collision_penalty = 4.0
        ";
        let cfg: EpisodeConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.max_steps, 300);
        assert!((cfg.tick_seconds - 0.1).abs() < f64::EPSILON);
        assert!(cfg.rewards.enable_proximity);
        assert!((cfg.rewards.threshold_proximity - 8.0).abs() < f32::EPSILON);
        // untouched fields keep their defaults
        assert!((cfg.rewards.max_proximity_reward - 2.5).abs() < f32::EPSILON);
        assert!((cfg.penalties.collision_penalty - 4.0).abs() < f32::EPSILON);
        assert!((cfg.penalties.leave_parking_penalty - 2.5).abs() < f32::EPSILON);
    }

    // ---- SpawnConfig ----

    #[test]
    fn spawn_config_default_validates() {
        assert!(SpawnConfig::default().validate().is_ok());
    }

    #[test]
    fn spawn_config_random_needs_axis() {
        let cfg = SpawnConfig {
            random_position: true,
            ..SpawnConfig::default()
        };
        assert!(matches!(
            cfg.validate().unwrap_err(),
            ConfigError::Incompatible(_)
        ));
    }

    #[test]
    fn spawn_config_rejects_empty_region() {
        let cfg = SpawnConfig {
            random_position: true,
            random_x: true,
            region_min: [5.0, -1.0],
            region_max: [5.0, 1.0],
            ..SpawnConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("spawn.region.x"));
    }

    #[test]
    fn spawn_config_ignores_region_of_unused_axis() {
        let cfg = SpawnConfig {
            random_position: true,
            random_x: true,
            region_min: [-1.0, 3.0],
            region_max: [1.0, 3.0],
            ..SpawnConfig::default()
        };
        assert!(cfg.validate().is_ok());
    }

    // ---- LotConfig ----

    #[test]
    fn lot_config_rejects_zero_size_goal() {
        let mut lot = LotConfig::default();
        lot.goal.size = [0.0, 6.0];
        assert!(lot.validate().is_err());
    }

    #[test]
    fn lot_config_default_is_valid() {
        let lot = LotConfig::default();
        assert!(lot.validate().is_ok());
        assert_eq!(lot.vehicle_half_extents(), [1.0, 0.75, 2.25]);
    }

    #[test]
    fn lot_config_road_defaults_and_validation() {
        let lot: LotConfig = toml::from_str("[road]\ncenter = [2.0, 0.0]\n").unwrap();
        assert_eq!(lot.road.center, [2.0, 0.0]);
        assert_eq!(lot.road.size, [20.0, 40.0]);

        let mut lot = LotConfig::default();
        lot.road.size = [20.0, -1.0];
        match lot.validate() {
            Err(ConfigError::NonPositive { field, .. }) => assert_eq!(field, "lot.road.size[1]"),
            other => panic!("expected NonPositive, got {other:?}"),
        }
    }

    // ---- SceneConfig ----

    #[test]
    fn scene_config_full_toml() {
        let toml_str = r#"
            [meta]
            name = "single_bay"
            description = "One bay between two parked cars"

            [episode]
            max_steps = 2000
            required_parking_duration = 3.0

            [episode.rewards]
            enable_velocity = true

            [spawn]
            start_position = [0.0, 0.5, -5.0]
            random_position = true
            random_x = true
            region_min = [-4.0, -8.0]
            region_max = [4.0, -2.0]
            flip_direction = true
            seed = 17

            [lot]
            vehicle_size = [2.0, 1.4, 4.6]

            [lot.goal]
            position = [0.0, 0.0, 12.0]
            size = [3.2, 6.0]

            [[lot.parked_cars]]
            position = [-3.5, 0.5, 12.0]

            [[lot.parked_cars]]
            position = [3.5, 0.5, 12.0]
            heading_deg = 180.0
        "#;
        let scene = SceneConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(scene.meta.name, "single_bay");
        assert_eq!(scene.episode.max_steps, 2000);
        assert!((scene.episode.required_parking_duration - 3.0).abs() < f64::EPSILON);
        assert!(scene.episode.rewards.enable_velocity);
        assert!(scene.spawn.random_position);
        assert!(scene.spawn.flip_direction);
        assert_eq!(scene.spawn.seed, 17);
        assert!((scene.lot.goal.position[2] - 12.0).abs() < f32::EPSILON);
        assert_eq!(scene.lot.parked_cars.len(), 2);
        assert!((scene.lot.parked_cars[1].heading_deg - 180.0).abs() < f32::EPSILON);
    }

    #[test]
    fn scene_config_from_toml_str_validates() {
        let err = SceneConfig::from_toml_str("[episode.rewards]\nthreshold_precision = -1.0\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::NonPositive { .. }));
    }

    #[test]
    fn scene_config_from_toml_str_parse_error() {
        let err = SceneConfig::from_toml_str("[episode\nmax_steps = ").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn scene_config_from_file() {
        let dir = std::env::temp_dir().join("autopark_test_scene_config");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("scene.toml");
        std::fs::write(
            &path,
            r"
            [episode]
            max_steps = 750
            tick_seconds = 0.05
        ",
        )
        .unwrap();

        let scene = SceneConfig::from_file(&path).unwrap();
        assert_eq!(scene.episode.max_steps, 750);
        assert!((scene.episode.tick_seconds - 0.05).abs() < f64::EPSILON);

        let _ = std::fs::remove_file(&path);
        let _ = std::fs::remove_dir(&dir);
    }

    #[test]
    fn scene_config_from_file_not_found() {
        let result = SceneConfig::from_file("/nonexistent/path/scene.toml");
        assert!(matches!(result.unwrap_err(), ConfigError::Io(_)));
    }

    #[test]
    fn episode_config_json_round_trip_keeps_values() {
        let cfg = EpisodeConfig::default().with_max_steps(42);
        let json = serde_json::to_string(&cfg).unwrap();
        let back: EpisodeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }
}
