//! Suspension bridge: linked deck segments, cable hangers, towers, sway
//! dynamics, and the time-staggered failure cascade.
//!
//! The bridge is engine-owned composite state (not ECS entities): segments
//! are indexed, ordered, and coupled, which a flat entity list models
//! poorly. Weapon damage reaches it through `damage::apply_area_damage`.

use glam::DVec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use rubble_core::constants::*;
use rubble_core::enums::{DebrisKind, SegmentState};
use rubble_core::events::FxEvent;
use rubble_core::state::{BridgeView, SegmentView};
use rubble_core::types::secs_to_ticks;

use crate::debris::DebrisState;
use crate::water::WaterState;
use rubble_procgen::BridgePlan;

/// One deck segment. Kinematic until broken, then a free body pulled
/// around by joints and cables.
#[derive(Debug, Clone)]
pub struct Segment {
    /// Fixed anchor; kinematic segments snap back here every tick.
    pub anchor: DVec2,
    pub pos: DVec2,
    pub vel: DVec2,
    pub rotation: f64,
    pub angular_vel: f64,
    pub health: f64,
    pub max_health: f64,
    pub state: SegmentState,
    pub is_kinematic: bool,
    /// Joint toward the lower-index / higher-index neighbor.
    pub left_joint: bool,
    pub right_joint: bool,
    /// Whether this segment has splashed into the water yet.
    splashed: bool,
}

/// One cable hanger: spring tension toward a curve-interpolated anchor on
/// the main cable, self-breaking past its tension threshold.
#[derive(Debug, Clone)]
pub struct Cable {
    pub segment_index: usize,
    pub anchor: DVec2,
    pub rest_length: f64,
    pub break_tension: f64,
    pub broken: bool,
}

#[derive(Debug, Clone)]
pub struct Tower {
    pub x: f64,
    pub health: f64,
    pub max_health: f64,
    pub destroyed: bool,
}

/// Shared deck sway oscillator: damped sinusoid on the whole deck's
/// vertical draw offset.
#[derive(Debug, Clone, Default)]
pub struct Sway {
    pub active: bool,
    pub offset: f64,
    start_tick: u64,
    amplitude: f64,
    frequency_hz: f64,
    /// Damping stays reduced until this tick, then recovers.
    recovery_tick: u64,
}

#[derive(Debug, Clone, Copy)]
enum BreakTarget {
    Segment(usize),
    Cable(usize),
}

#[derive(Debug, Clone, Copy)]
struct PendingBreak {
    due_tick: u64,
    target: BreakTarget,
}

#[derive(Debug)]
pub struct BridgeState {
    pub start_x: f64,
    pub end_x: f64,
    pub deck_y: f64,
    pub segment_width: f64,
    pub segments: Vec<Segment>,
    pub cables: Vec<Cable>,
    pub towers: [Tower; 2],
    pub sway: Sway,
    pending: Vec<PendingBreak>,
}

impl BridgeState {
    pub fn from_plan(plan: &BridgePlan, rng: &mut ChaCha8Rng) -> Self {
        let span = plan.end_x - plan.start_x;
        let segment_width = span / plan.segment_count as f64;
        let tower_top_y = plan.deck_y - 110.0;
        let mid_sag_y = plan.deck_y - 40.0;

        let segments: Vec<Segment> = (0..plan.segment_count)
            .map(|i| {
                let x = plan.start_x + (i as f64 + 0.5) * segment_width;
                let anchor = DVec2::new(x, plan.deck_y);
                let health = rng.gen_range(SEGMENT_HEALTH_MIN..SEGMENT_HEALTH_MAX);
                Segment {
                    anchor,
                    pos: anchor,
                    vel: DVec2::ZERO,
                    rotation: 0.0,
                    angular_vel: 0.0,
                    health,
                    max_health: health,
                    state: SegmentState::Intact,
                    is_kinematic: true,
                    left_joint: i > 0,
                    right_joint: i + 1 < plan.segment_count,
                    splashed: false,
                }
            })
            .collect();

        let xm = (plan.tower_xs[0] + plan.tower_xs[1]) / 2.0;
        let half_span = (plan.tower_xs[1] - plan.tower_xs[0]) / 2.0;
        let cables: Vec<Cable> = segments
            .iter()
            .enumerate()
            .map(|(i, seg)| {
                // Main cable: parabola through the tower tops, sagging
                // toward the deck mid-span.
                let u = ((seg.anchor.x - xm) / half_span).clamp(-1.0, 1.0);
                let anchor_y = mid_sag_y + (tower_top_y - mid_sag_y) * u * u;
                let anchor = DVec2::new(seg.anchor.x, anchor_y);
                Cable {
                    segment_index: i,
                    anchor,
                    rest_length: (plan.deck_y - anchor_y).max(1.0),
                    break_tension: rng.gen_range(CABLE_BREAK_TENSION_MIN..CABLE_BREAK_TENSION_MAX),
                    broken: false,
                }
            })
            .collect();

        let towers = [
            Tower {
                x: plan.tower_xs[0],
                health: TOWER_HEALTH,
                max_health: TOWER_HEALTH,
                destroyed: false,
            },
            Tower {
                x: plan.tower_xs[1],
                health: TOWER_HEALTH,
                max_health: TOWER_HEALTH,
                destroyed: false,
            },
        ];

        Self {
            start_x: plan.start_x,
            end_x: plan.end_x,
            deck_y: plan.deck_y,
            segment_width,
            segments,
            cables,
            towers,
            sway: Sway::default(),
            pending: Vec::new(),
        }
    }

    /// Index of the segment whose span covers `x`, if any.
    pub fn segment_index_at(&self, x: f64) -> Option<usize> {
        if x < self.start_x || x > self.end_x || self.segments.is_empty() {
            return None;
        }
        let idx = ((x - self.start_x) / self.segment_width) as usize;
        Some(idx.min(self.segments.len() - 1))
    }

    /// Landing surface for debris: the deck, where it is still standing.
    pub fn deck_surface_at(&self, x: f64) -> Option<f64> {
        let idx = self.segment_index_at(x)?;
        if self.segments[idx].state == SegmentState::Broken {
            None
        } else {
            Some(self.deck_y)
        }
    }

    /// Apply damage to one segment. Broken segments ignore it.
    pub fn damage_segment(
        &mut self,
        idx: usize,
        amount: f64,
        tick: u64,
        rng: &mut ChaCha8Rng,
        debris: &mut DebrisState,
        events: &mut Vec<FxEvent>,
    ) {
        let seg = &mut self.segments[idx];
        if seg.state == SegmentState::Broken {
            return;
        }
        seg.health = (seg.health - amount).max(0.0);
        if seg.health <= seg.max_health * SEGMENT_DAMAGED_FRACTION
            && seg.state == SegmentState::Intact
        {
            seg.state = SegmentState::Damaged;
        }
        if seg.health <= 0.0 {
            self.break_segment(idx, true, tick, rng, debris, events);
        }
    }

    /// Apply damage to one tower; depletion severs every cable through the
    /// cascade scheduler and re-triggers sway.
    pub fn damage_tower(
        &mut self,
        idx: usize,
        amount: f64,
        tick: u64,
        rng: &mut ChaCha8Rng,
        events: &mut Vec<FxEvent>,
    ) {
        let tower = &mut self.towers[idx];
        if tower.destroyed {
            return;
        }
        tower.health = (tower.health - amount).max(0.0);
        if tower.health > 0.0 {
            return;
        }
        tower.destroyed = true;
        events.push(FxEvent::TowerDestroyed { tower_index: idx });
        tracing::debug!(tower = idx, "bridge tower destroyed");

        let base = rng.gen_range(CASCADE_DELAY_MIN_SECS..CASCADE_DELAY_MAX_SECS);
        let mut offset = 0usize;
        for i in 0..self.cables.len() {
            if self.cables[i].broken {
                continue;
            }
            offset += 1;
            self.pending.push(PendingBreak {
                due_tick: tick + secs_to_ticks(base + CASCADE_STAGGER_SECS * offset as f64),
                target: BreakTarget::Cable(i),
            });
        }
        if !self.sway.active {
            self.start_sway(tick, rng);
        }
    }

    /// Break a segment: physics activation, joint severing, debris, sway,
    /// and (for damage-initiated breaks) the delayed neighbor cascade.
    pub fn break_segment(
        &mut self,
        idx: usize,
        schedule_cascade: bool,
        tick: u64,
        rng: &mut ChaCha8Rng,
        debris: &mut DebrisState,
        events: &mut Vec<FxEvent>,
    ) {
        if self.segments[idx].state == SegmentState::Broken {
            return;
        }

        {
            let seg = &mut self.segments[idx];
            seg.state = SegmentState::Broken;
            seg.health = 0.0;
            seg.is_kinematic = false;
            seg.vel = DVec2::new(rng.gen_range(-25.0..25.0), rng.gen_range(-40.0..-10.0));
            seg.angular_vel = rng.gen_range(-1.2..1.2);
            seg.left_joint = false;
            seg.right_joint = false;
        }
        if idx > 0 {
            self.segments[idx - 1].right_joint = false;
        }
        if idx + 1 < self.segments.len() {
            self.segments[idx + 1].left_joint = false;
        }

        events.push(FxEvent::SegmentBroken { segment_index: idx });
        tracing::debug!(segment = idx, cascade = schedule_cascade, "bridge segment broken");

        let break_x = self.segments[idx].anchor.x;
        let chunks = rng.gen_range(BREAK_CHUNKS_MIN..=BREAK_CHUNKS_MAX);
        debris
            .pool_mut(DebrisKind::BridgeChunk)
            .spawn_scatter(rng, break_x, self.deck_y, chunks, 120.0, tick);

        let mid = (self.segments.len() as f64 - 1.0) / 2.0;
        if (idx as f64 - mid).abs() <= 1.0 && !self.sway.active {
            self.start_sway(tick, rng);
        }

        if schedule_cascade {
            self.schedule_segment_cascade(idx, tick, rng);
            self.schedule_cable_cascade(idx, tick, rng);
        }
    }

    /// Queue forced breaks for a window of neighbors at staggered future
    /// ticks. Cascaded breaks do not re-cascade.
    fn schedule_segment_cascade(&mut self, idx: usize, tick: u64, rng: &mut ChaCha8Rng) {
        let window = rng.gen_range(CASCADE_WINDOW_MIN..=CASCADE_WINDOW_MAX);
        let base = rng.gen_range(CASCADE_DELAY_MIN_SECS..CASCADE_DELAY_MAX_SECS);
        for offset in 1..=window {
            let due_tick = tick + secs_to_ticks(base + CASCADE_STAGGER_SECS * offset as f64);
            for target in [idx.checked_sub(offset), Some(idx + offset)]
                .into_iter()
                .flatten()
            {
                if target < self.segments.len()
                    && self.segments[target].state != SegmentState::Broken
                {
                    self.pending.push(PendingBreak {
                        due_tick,
                        target: BreakTarget::Segment(target),
                    });
                }
            }
        }
    }

    fn schedule_cable_cascade(&mut self, idx: usize, tick: u64, rng: &mut ChaCha8Rng) {
        let radius = rng.gen_range(CASCADE_WINDOW_MIN..=CASCADE_WINDOW_MAX);
        let base = rng.gen_range(CASCADE_DELAY_MIN_SECS..CASCADE_DELAY_MAX_SECS);
        for offset in 0..=radius {
            let due_tick = tick + secs_to_ticks(base + CASCADE_STAGGER_SECS * offset as f64);
            for target in [idx.checked_sub(offset), Some(idx + offset)]
                .into_iter()
                .flatten()
            {
                if target < self.cables.len() && !self.cables[target].broken {
                    self.pending.push(PendingBreak {
                        due_tick,
                        target: BreakTarget::Cable(target),
                    });
                }
            }
        }
    }

    fn break_cable(&mut self, idx: usize, tick: u64, rng: &mut ChaCha8Rng, events: &mut Vec<FxEvent>) {
        if self.cables[idx].broken {
            return;
        }
        self.cables[idx].broken = true;
        events.push(FxEvent::CableSnapped { cable_index: idx });
        if !self.sway.active {
            self.start_sway(tick, rng);
        }
    }

    fn start_sway(&mut self, tick: u64, rng: &mut ChaCha8Rng) {
        self.sway = Sway {
            active: true,
            offset: 0.0,
            start_tick: tick,
            amplitude: rng.gen_range(SWAY_AMPLITUDE_MIN..SWAY_AMPLITUDE_MAX),
            frequency_hz: rng.gen_range(SWAY_FREQUENCY_MIN_HZ..SWAY_FREQUENCY_MAX_HZ),
            recovery_tick: tick + secs_to_ticks(SWAY_DAMPING_RECOVERY_SECS),
        };
    }

    /// Number of scheduled breaks not yet fired (for tests and HUD debug).
    pub fn pending_break_count(&self) -> usize {
        self.pending.len()
    }

    /// Due ticks of all pending segment breaks, in schedule order.
    pub fn pending_segment_due_ticks(&self) -> Vec<u64> {
        self.pending
            .iter()
            .filter(|p| matches!(p.target, BreakTarget::Segment(_)))
            .map(|p| p.due_tick)
            .collect()
    }

    /// Advance one tick: fire due cascade breaks, update sway, integrate
    /// dynamic segments under joint/cable forces, self-break overtense
    /// cables.
    pub fn update(
        &mut self,
        tick: u64,
        gravity: f64,
        rng: &mut ChaCha8Rng,
        debris: &mut DebrisState,
        mut water: Option<&mut WaterState>,
        events: &mut Vec<FxEvent>,
    ) {
        let dt = DT;

        // Fire scheduled breaks that have come due.
        let due: Vec<BreakTarget> = {
            let mut due = Vec::new();
            self.pending.retain(|p| {
                if p.due_tick <= tick {
                    due.push(p.target);
                    false
                } else {
                    true
                }
            });
            due
        };
        for target in due {
            match target {
                BreakTarget::Segment(i) => self.break_segment(i, false, tick, rng, debris, events),
                BreakTarget::Cable(i) => self.break_cable(i, tick, rng, events),
            }
        }

        // Sway: damped sinusoid with temporarily reduced damping.
        if self.sway.active {
            let t = tick.saturating_sub(self.sway.start_tick) as f64 * dt;
            let rate = if tick < self.sway.recovery_tick {
                SWAY_REDUCED_DECAY_RATE
            } else {
                SWAY_DECAY_RATE
            };
            let envelope = self.sway.amplitude * (-rate * t).exp();
            self.sway.offset = envelope * (std::f64::consts::TAU * self.sway.frequency_hz * t).sin();
            if envelope < 0.05 {
                self.sway.active = false;
                self.sway.offset = 0.0;
            }
        }

        // Segment physics.
        let n = self.segments.len();
        for i in 0..n {
            if self.segments[i].is_kinematic {
                // Kinematic segments never drift off their anchor.
                let seg = &mut self.segments[i];
                seg.pos = seg.anchor;
                seg.rotation = 0.0;
                seg.vel = DVec2::ZERO;
                continue;
            }

            // Joint spring-damper toward alignment with an intact neighbor.
            let mut accel = DVec2::new(0.0, gravity);
            let mut angular_accel = 0.0;
            for (joint_ok, neighbor) in [
                (self.segments[i].left_joint, i.checked_sub(1)),
                (self.segments[i].right_joint, Some(i + 1)),
            ] {
                let Some(j) = neighbor else { continue };
                if !joint_ok || j >= n || self.segments[j].state == SegmentState::Broken {
                    continue;
                }
                let seg = &self.segments[i];
                let pull = self.segments[j].anchor
                    + DVec2::new(seg.anchor.x - self.segments[j].anchor.x, 0.0);
                accel += (pull - seg.pos) * JOINT_SPRING - seg.vel * JOINT_DAMPING;
                angular_accel += -seg.rotation * JOINT_SPRING * 0.5 - seg.angular_vel * JOINT_DAMPING * 0.3;
            }

            // Cable tension toward the curve-interpolated anchor.
            let mut snapped_cable = None;
            if let Some(cable_idx) = self.cables.iter().position(|c| c.segment_index == i) {
                let cable = &self.cables[cable_idx];
                if !cable.broken {
                    let seg = &self.segments[i];
                    let to_anchor = cable.anchor - seg.pos;
                    let length = to_anchor.length();
                    let stretch = length - cable.rest_length;
                    if stretch > 0.0 && length > 1e-6 {
                        let tension = CABLE_SPRING * stretch;
                        if tension > cable.break_tension {
                            snapped_cable = Some(cable_idx);
                        } else {
                            accel += to_anchor / length * tension;
                        }
                    }
                }
            }
            if let Some(cable_idx) = snapped_cable {
                self.break_cable(cable_idx, tick, rng, events);
            }

            let seg = &mut self.segments[i];
            seg.vel += accel * dt;
            seg.angular_vel += angular_accel * dt;
            seg.pos += seg.vel * dt;
            seg.rotation =
                (seg.rotation + seg.angular_vel * dt).clamp(-SEGMENT_MAX_ROTATION, SEGMENT_MAX_ROTATION);

            // Splash once on entering the water, then settle on the bed.
            if seg.pos.y >= GROUND_Y {
                seg.pos.y = GROUND_Y;
                seg.vel *= 0.2;
                seg.angular_vel *= 0.5;
            }
            if !seg.splashed && seg.state == SegmentState::Broken && seg.pos.y > self.deck_y + 40.0 {
                seg.splashed = true;
                let x = seg.pos.x;
                events.push(FxEvent::Splash { x, impulse: 26.0 });
                if let Some(w) = water.as_deref_mut() {
                    w.splash(x, 26.0);
                }
            }
        }
    }

    pub fn view(&self) -> BridgeView {
        BridgeView {
            segments: self
                .segments
                .iter()
                .map(|s| SegmentView {
                    x: s.pos.x,
                    y: s.pos.y,
                    rotation: s.rotation,
                    state: s.state,
                })
                .collect(),
            sway_offset: self.sway.offset,
            sway_active: self.sway.active,
            cables_intact: self.cables.iter().filter(|c| !c.broken).count(),
            cables_total: self.cables.len(),
            towers: [
                self.towers[0].health / self.towers[0].max_health,
                self.towers[1].health / self.towers[1].max_health,
            ],
        }
    }
}
