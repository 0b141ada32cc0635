//! Simulation constants and tuning parameters.
//!
//! Durations are expressed in seconds and converted to ticks at the
//! simulation boundary (`types::secs_to_ticks`); the core never reads a
//! wall clock.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- World geometry ---

/// Playfield width in world units.
pub const WORLD_WIDTH: f64 = 2400.0;

/// Ground plane y coordinate (y grows downward).
pub const GROUND_Y: f64 = 640.0;

/// Fragments beyond the playfield by more than this margin are put to sleep.
pub const CULL_MARGIN: f64 = 220.0;

/// Gravity for free-falling bodies (units/s², positive = downward).
pub const GRAVITY: f64 = 1500.0;

/// Side length of a building voxel-cutout grid cell.
pub const VOXEL_CELL_SIZE: f64 = 10.0;

// --- Buildings ---

/// Base max-health roll for a building before category scaling.
pub const BUILDING_HEALTH_MIN: f64 = 300.0;
pub const BUILDING_HEALTH_MAX: f64 = 500.0;

/// Material resistance roll (multiplies incoming damage).
pub const MATERIAL_RESISTANCE_MIN: f64 = 0.7;
pub const MATERIAL_RESISTANCE_MAX: f64 = 1.3;

/// Damage-stage thresholds as health fractions. Stage 0 above
/// `STAGE_1_FRACTION`, stage 3 at or below `STAGE_3_FRACTION`.
pub const STAGE_1_FRACTION: f64 = 0.75;
pub const STAGE_2_FRACTION: f64 = 0.50;
pub const STAGE_3_FRACTION: f64 = 0.20;

/// Collapse animation duration roll (seconds).
pub const COLLAPSE_DURATION_MIN_SECS: f64 = 0.9;
pub const COLLAPSE_DURATION_MAX_SECS: f64 = 1.6;

/// Interval between collapse debris bursts (seconds, rolled per building).
pub const COLLAPSE_BURST_INTERVAL_MIN_SECS: f64 = 0.10;
pub const COLLAPSE_BURST_INTERVAL_MAX_SECS: f64 = 0.18;

/// Fragments per upward stage crossing, multiplied by the new stage.
pub const STAGE_BURST_COUNT_PER_STAGE: usize = 6;

/// Footprint area per fragment in the final collapse burst.
pub const FINAL_BURST_AREA_PER_FRAGMENT: f64 = 900.0;

/// Hard cap on the final collapse burst size.
pub const FINAL_BURST_MAX_FRAGMENTS: usize = 90;

/// Maximum visual tilt at full collapse progress (radians).
pub const COLLAPSE_TILT_MAX: f64 = 0.16;

/// Fraction of building height sunk into the ground at full progress.
pub const COLLAPSE_SINK_FRACTION: f64 = 0.85;

/// Per-tick probability of a loose break-off fragment at damage stage >= 2.
pub const BREAKOFF_PROBABILITY: f64 = 0.02;

/// Fire emitters ignited when a collapse completes.
pub const COLLAPSE_FIRE_MIN: usize = 1;
pub const COLLAPSE_FIRE_MAX: usize = 2;

/// Fire emitter burn time (seconds).
pub const FIRE_LIFETIME_SECS: f64 = 6.0;

/// Interval between fire smoke puffs (seconds).
pub const FIRE_PUFF_INTERVAL_SECS: f64 = 0.22;

// --- Bridge ---

/// Segment max-health roll.
pub const SEGMENT_HEALTH_MIN: f64 = 80.0;
pub const SEGMENT_HEALTH_MAX: f64 = 120.0;

/// Health fraction at or below which a segment shows as damaged.
pub const SEGMENT_DAMAGED_FRACTION: f64 = 0.5;

/// Dynamic segment rotation clamp (radians, ±60°).
pub const SEGMENT_MAX_ROTATION: f64 = std::f64::consts::FRAC_PI_3;

/// Cascade scheduling: base delay roll plus per-offset stagger (seconds).
pub const CASCADE_DELAY_MIN_SECS: f64 = 0.2;
pub const CASCADE_DELAY_MAX_SECS: f64 = 0.6;
pub const CASCADE_STAGGER_SECS: f64 = 0.1;

/// Cascade window roll: neighbors broken on either side of the trigger.
pub const CASCADE_WINDOW_MIN: usize = 3;
pub const CASCADE_WINDOW_MAX: usize = 6;

/// Bridge chunks spawned at a segment break point.
pub const BREAK_CHUNKS_MIN: usize = 8;
pub const BREAK_CHUNKS_MAX: usize = 16;

/// Deck sway oscillator rolls.
pub const SWAY_AMPLITUDE_MIN: f64 = 2.0;
pub const SWAY_AMPLITUDE_MAX: f64 = 4.0;
pub const SWAY_FREQUENCY_MIN_HZ: f64 = 0.8;
pub const SWAY_FREQUENCY_MAX_HZ: f64 = 1.6;

/// Sway exponential decay rate (1/s) once damping has recovered.
pub const SWAY_DECAY_RATE: f64 = 0.9;

/// Reduced decay rate right after a break, recovering after
/// `SWAY_DAMPING_RECOVERY_SECS`.
pub const SWAY_REDUCED_DECAY_RATE: f64 = 0.25;
pub const SWAY_DAMPING_RECOVERY_SECS: f64 = 0.8;

/// Joint spring-damper coefficients pulling a dynamic segment toward
/// alignment with its intact neighbor.
pub const JOINT_SPRING: f64 = 40.0;
pub const JOINT_DAMPING: f64 = 4.5;

/// Cable spring coefficient toward the curve-interpolated anchor.
/// Strong enough to let a dangling segment hang against gravity.
pub const CABLE_SPRING: f64 = 220.0;

/// Cable break-tension roll.
pub const CABLE_BREAK_TENSION_MIN: f64 = 1800.0;
pub const CABLE_BREAK_TENSION_MAX: f64 = 2600.0;

/// Tower max health (two per bridge).
pub const TOWER_HEALTH: f64 = 260.0;

// --- Debris pools ---

/// Speed below which a post-bounce fragment counts as resting.
pub const SETTLE_SPEED_THRESHOLD: f64 = 0.5;

/// Angular speed threshold for settling (rad/s).
pub const SETTLE_ANGULAR_THRESHOLD: f64 = 0.2;

/// Grace period after settling before a fragment sleeps (seconds).
pub const SLEEP_GRACE_SECS: f64 = 5.0;

/// Pool caps per fragment kind.
pub const SHARD_POOL_CAP: usize = 600;
pub const CHUNK_POOL_CAP: usize = 400;
pub const MICRO_CHIP_POOL_CAP: usize = 300;
pub const DUST_POOL_CAP: usize = 200;
pub const VOXEL_BIT_POOL_CAP: usize = 250;
pub const BRIDGE_CHUNK_POOL_CAP: usize = 220;

/// Time-to-live for lifetime-bounded pools (seconds).
pub const DUST_LIFETIME_SECS: f64 = 2.2;
pub const MICRO_CHIP_LIFETIME_SECS: f64 = 6.0;

// --- Weapons: shared ---

/// Falloff exponent for explosive weapons (aggressive concentration).
pub const EXPLOSIVE_FALLOFF_EXP: f64 = 3.0;

/// Falloff exponent for continuous/sustained effects.
pub const SUSTAINED_FALLOFF_EXP: f64 = 2.0;

/// Minimum interval between cosmetic impact-spark emissions per effect
/// instance (seconds) — bounds runaway spawn volume.
pub const SPARK_MIN_INTERVAL_SECS: f64 = 0.1;

// --- Weapons: meteor ---

pub const METEOR_RADIUS: f64 = 150.0;
pub const METEOR_DAMAGE: f64 = 100.0;
pub const METEOR_DAMAGE_CAP: f64 = 130.0;

/// Ballistic travel time bounds (seconds); scaled by distance to target.
pub const METEOR_TRAVEL_MIN_SECS: f64 = 0.4;
pub const METEOR_TRAVEL_MAX_SECS: f64 = 0.9;

// --- Weapons: nuclear bomb ---

/// Independently falling bombs per trigger.
pub const NUKE_BOMB_COUNT: usize = 5;
pub const NUKE_RADIUS: f64 = 200.0;
pub const NUKE_DAMAGE: f64 = 120.0;
pub const NUKE_DAMAGE_CAP: f64 = 140.0;
pub const NUKE_FALL_SPEED: f64 = 420.0;

/// Horizontal scatter of the bomb cluster around the trigger point.
pub const NUKE_SPREAD: f64 = 170.0;

// --- Weapons: orbital laser ---

pub const LASER_DURATION_SECS: f64 = 0.3;
pub const LASER_HALF_WIDTH: f64 = 70.0;
pub const LASER_TICK_DAMAGE: f64 = 3.0;
pub const LASER_DAMAGE_CAP: f64 = 30.0;

// --- Weapons: tornado ---

pub const TORNADO_DURATION_MIN_SECS: f64 = 3.0;
pub const TORNADO_DURATION_MAX_SECS: f64 = 5.0;
pub const TORNADO_RADIUS: f64 = 120.0;
pub const TORNADO_TICK_DAMAGE: f64 = 1.4;
pub const TORNADO_DAMAGE_CAP: f64 = 25.0;
pub const TORNADO_DRIFT_SPEED: f64 = 60.0;

/// Inverse-distance push strength on nearby debris.
pub const TORNADO_PUSH_STRENGTH: f64 = 5200.0;

/// Radius of the debris push field.
pub const TORNADO_PUSH_RADIUS: f64 = 260.0;

/// Maximum simultaneous tornado instances.
pub const MAX_CONCURRENT_TORNADOES: usize = 2;

// --- Weapons: sticky bombs ---

/// A trigger within this distance of a building surface attaches to it.
pub const STICKY_ATTACH_RANGE: f64 = 80.0;
pub const STICKY_RADIUS: f64 = 90.0;
pub const STICKY_DAMAGE: f64 = 45.0;

/// Aggregate damage cap per building for one detonate-all batch.
pub const STICKY_BATCH_CAP: f64 = 85.0;

// --- Weapons: guided missile ---

pub const MISSILE_COOLDOWN_SECS: f64 = 2.5;
pub const MISSILE_WINDUP_SECS: f64 = 0.35;
pub const MISSILE_SPEED: f64 = 520.0;

/// Lateral homing turn-rate limit (rad/s).
pub const MISSILE_TURN_RATE: f64 = 3.2;
pub const MISSILE_LIFETIME_SECS: f64 = 4.0;
pub const MISSILE_RADIUS: f64 = 120.0;
pub const MISSILE_DAMAGE: f64 = 100.0;
pub const MISSILE_DAMAGE_CAP: f64 = 110.0;

// --- Robot agent ---

pub const ROBOT_ACCEL: f64 = 900.0;
pub const ROBOT_MAX_SPEED: f64 = 260.0;

/// Horizontal friction rate while grounded (1/s, exponential decay).
pub const ROBOT_FRICTION: f64 = 8.0;
pub const ROBOT_JUMP_IMPULSE: f64 = 520.0;

/// Airtime before held jump becomes continuous thrust (seconds).
pub const ROBOT_THRUST_DELAY_SECS: f64 = 0.25;

/// Upward thrust acceleration (must beat gravity).
pub const ROBOT_THRUST_ACCEL: f64 = 2300.0;

/// Ascent speed cap while thrusting.
pub const ROBOT_MAX_ASCENT_SPEED: f64 = 340.0;

pub const ROBOT_FUEL_MAX: f64 = 100.0;
pub const ROBOT_FUEL_DRAIN_PER_SEC: f64 = 36.0;
pub const ROBOT_FUEL_REGEN_PER_SEC: f64 = 20.0;

pub const ROBOT_ENERGY_MAX: f64 = 100.0;
pub const ROBOT_ENERGY_DRAIN_PER_SEC: f64 = 30.0;
pub const ROBOT_ENERGY_REGEN_PER_SEC: f64 = 18.0;

pub const PUNCH_COOLDOWN_SECS: f64 = 0.35;
pub const PUNCH_REACH: f64 = 46.0;
pub const PUNCH_RADIUS: f64 = 60.0;
pub const PUNCH_DAMAGE: f64 = 26.0;
pub const PUNCH_DAMAGE_CAP: f64 = 30.0;

pub const ARM_LASER_COOLDOWN_SECS: f64 = 0.8;
pub const ARM_LASER_RADIUS: f64 = 40.0;
pub const ARM_LASER_DAMAGE: f64 = 18.0;

/// Hand laser cadence (shots per second) and per-shot damage.
pub const HAND_LASER_SHOTS_PER_SEC: f64 = 12.0;
pub const HAND_LASER_RADIUS: f64 = 30.0;
pub const HAND_LASER_DAMAGE: f64 = 6.0;

// --- UFO agent ---

pub const UFO_THRUST_ACCEL: f64 = 420.0;
pub const UFO_REVERSE_ACCEL: f64 = 260.0;
pub const UFO_TURN_RATE: f64 = 2.6;

/// Low drag (1/s exponential decay) — the craft coasts.
pub const UFO_FRICTION: f64 = 0.6;
pub const UFO_MAX_SPEED: f64 = 320.0;

pub const UFO_ENERGY_MAX: f64 = 100.0;
pub const UFO_BEAM_DRAIN_PER_SEC: f64 = 26.0;
pub const UFO_ENERGY_REGEN_PER_SEC: f64 = 16.0;

pub const UFO_BEAM_SHOTS_PER_SEC: f64 = 15.0;
pub const UFO_BEAM_RADIUS: f64 = 35.0;
pub const UFO_BEAM_DAMAGE: f64 = 5.0;

/// Tractor beam pull field.
pub const TRACTOR_RADIUS: f64 = 170.0;
pub const TRACTOR_STRENGTH: f64 = 900.0;

/// Focus point offset below the craft that fragments are pulled toward.
pub const TRACTOR_FOCUS_OFFSET: f64 = 60.0;

/// Building voxel erosion: interval, reach, cluster size, health cost.
pub const TRACTOR_EROSION_INTERVAL_SECS: f64 = 0.09;
pub const TRACTOR_EROSION_RANGE: f64 = 190.0;
pub const TRACTOR_EROSION_CELLS_MIN: usize = 3;
pub const TRACTOR_EROSION_CELLS_MAX: usize = 7;
pub const TRACTOR_EROSION_DAMAGE_PER_CELL: f64 = 0.6;

// --- Water ---

/// Horizontal spacing between water columns.
pub const WATER_COLUMN_SPACING: f64 = 12.0;

/// Spring constant toward rest height (per tick).
pub const WATER_SPRING_K: f64 = 0.02;

/// Velocity damping per tick.
pub const WATER_DAMPING: f64 = 0.985;

/// Neighbor coupling factor and pass count.
pub const WATER_SPREAD: f64 = 0.12;
pub const WATER_SPREAD_PASSES: usize = 2;

/// Explosions within this horizontal reach of the span splash the water.
pub const WATER_SPLASH_REACH: f64 = 120.0;
