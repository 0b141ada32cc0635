//! Debris fragment pools.
//!
//! One generic integrator covers every fragment kind; per-kind behavior is
//! a `DebrisParams` table entry. Pools are capped: cap pressure hides the
//! oldest-settled sleeping fragments (`do_not_draw`) instead of deleting
//! them, so the tractor beam can still reactivate them. Deletion happens
//! only through lifetime expiry on time-bounded kinds.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use rubble_core::constants::*;
use rubble_core::enums::DebrisKind;
use rubble_core::state::DebrisPoolView;
use rubble_core::types::secs_to_ticks;

/// Physical constants for one fragment kind.
#[derive(Debug, Clone)]
pub struct DebrisParams {
    /// Multiplier on world gravity. Slightly negative for buoyant dust.
    pub gravity_scale: f64,
    /// Vertical velocity retained (and reflected) on a ground bounce.
    pub bounciness: f64,
    /// Fraction of horizontal/angular velocity retained per second while
    /// grounded.
    pub ground_friction: f64,
    /// Fraction of pseudo-depth velocity retained per second.
    pub depth_damping: f64,
    /// Time-to-live; `None` = permanent until cap eviction.
    pub lifetime_ticks: Option<u64>,
    pub size_min: f64,
    pub size_max: f64,
    /// Angular velocity roll bound (rad/s, either direction).
    pub spin_max: f64,
    /// Pool cap before `debris_cap_scale`.
    pub base_cap: usize,
    /// Whether the fragment interacts with ground/deck surfaces.
    pub collides: bool,
}

/// Table of per-kind physics. The integrator itself is shared.
pub fn params_for(kind: DebrisKind) -> DebrisParams {
    match kind {
        DebrisKind::Shard => DebrisParams {
            gravity_scale: 1.0,
            bounciness: 0.25,
            ground_friction: 0.10,
            depth_damping: 0.45,
            lifetime_ticks: None,
            size_min: 4.0,
            size_max: 14.0,
            spin_max: 9.0,
            base_cap: SHARD_POOL_CAP,
            collides: true,
        },
        DebrisKind::Chunk => DebrisParams {
            gravity_scale: 1.15,
            bounciness: 0.2,
            ground_friction: 0.05,
            depth_damping: 0.45,
            lifetime_ticks: None,
            size_min: 6.0,
            size_max: 20.0,
            spin_max: 4.0,
            base_cap: CHUNK_POOL_CAP,
            collides: true,
        },
        DebrisKind::MicroChip => DebrisParams {
            gravity_scale: 0.9,
            bounciness: 0.3,
            ground_friction: 0.12,
            depth_damping: 0.5,
            lifetime_ticks: Some(secs_to_ticks(MICRO_CHIP_LIFETIME_SECS)),
            size_min: 1.5,
            size_max: 4.0,
            spin_max: 12.0,
            base_cap: MICRO_CHIP_POOL_CAP,
            collides: true,
        },
        DebrisKind::Dust => DebrisParams {
            gravity_scale: -0.06,
            bounciness: 0.0,
            ground_friction: 1.0,
            depth_damping: 0.6,
            lifetime_ticks: Some(secs_to_ticks(DUST_LIFETIME_SECS)),
            size_min: 8.0,
            size_max: 26.0,
            spin_max: 0.8,
            base_cap: DUST_POOL_CAP,
            collides: false,
        },
        DebrisKind::VoxelBit => DebrisParams {
            gravity_scale: 1.0,
            bounciness: 0.25,
            ground_friction: 0.08,
            depth_damping: 0.45,
            lifetime_ticks: None,
            size_min: 5.0,
            size_max: 10.0,
            spin_max: 7.0,
            base_cap: VOXEL_BIT_POOL_CAP,
            collides: true,
        },
        DebrisKind::BridgeChunk => DebrisParams {
            gravity_scale: 1.2,
            bounciness: 0.22,
            ground_friction: 0.05,
            depth_damping: 0.45,
            lifetime_ticks: None,
            size_min: 8.0,
            size_max: 24.0,
            spin_max: 5.0,
            base_cap: BRIDGE_CHUNK_POOL_CAP,
            collides: true,
        },
    }
}

/// One debris fragment.
#[derive(Debug, Clone)]
pub struct Fragment {
    pub x: f64,
    pub y: f64,
    /// Pseudo-depth: positive = toward the camera. Render-only.
    pub z: f64,
    pub vx: f64,
    pub vy: f64,
    pub vz: f64,
    pub rotation: f64,
    pub angular_vel: f64,
    pub size: f64,
    /// Palette slot; the renderer maps it per material.
    pub color_index: u8,
    pub spawn_tick: u64,
    pub on_ground: bool,
    /// Physics-exempt but still rendered.
    pub sleeping: bool,
    /// Evicted from render under cap pressure; retained for reactivation.
    pub do_not_draw: bool,
    /// Tick at which the fragment came to rest.
    pub settled_tick: Option<u64>,
}

/// Capped population of one fragment kind.
#[derive(Debug)]
pub struct DebrisPool {
    pub kind: DebrisKind,
    pub params: DebrisParams,
    cap: usize,
    sleep_grace_ticks: u64,
    pub fragments: Vec<Fragment>,
}

impl DebrisPool {
    pub fn new(kind: DebrisKind, cap_scale: f64) -> Self {
        let params = params_for(kind);
        let cap = ((params.base_cap as f64 * cap_scale) as usize).max(1);
        Self {
            kind,
            params,
            cap,
            sleep_grace_ticks: secs_to_ticks(SLEEP_GRACE_SECS),
            fragments: Vec::new(),
        }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn spawn(&mut self, fragment: Fragment) {
        self.fragments.push(fragment);
    }

    /// Spawn `count` fragments scattered around (x, y) with mostly-upward
    /// randomized velocities.
    pub fn spawn_scatter(
        &mut self,
        rng: &mut ChaCha8Rng,
        x: f64,
        y: f64,
        count: usize,
        speed: f64,
        tick: u64,
    ) {
        for _ in 0..count {
            let size = rng.gen_range(self.params.size_min..self.params.size_max);
            self.fragments.push(Fragment {
                x: x + rng.gen_range(-14.0..14.0),
                y: y + rng.gen_range(-10.0..10.0),
                z: rng.gen_range(-40.0..40.0),
                vx: rng.gen_range(-1.0..1.0) * speed,
                vy: rng.gen_range(-1.2..0.15) * speed,
                vz: rng.gen_range(-0.4..0.4) * speed,
                rotation: rng.gen_range(0.0..std::f64::consts::TAU),
                angular_vel: rng.gen_range(-self.params.spin_max..self.params.spin_max),
                size,
                color_index: rng.gen_range(0..4),
                spawn_tick: tick,
                on_ground: false,
                sleeping: false,
                do_not_draw: false,
                settled_tick: None,
            });
        }
    }

    /// Integrate one tick. `surface_below(x, y)` returns the y of the first
    /// landing surface at or below y (ground plane, or an intact deck
    /// segment in bridge scenes).
    pub fn update<F: Fn(f64, f64) -> f64>(&mut self, tick: u64, gravity: f64, surface_below: &F) {
        let dt = DT;
        let p = self.params.clone();
        let grace = self.sleep_grace_ticks;

        // Lifetime expiry is the only true deletion path.
        if let Some(lifetime) = p.lifetime_ticks {
            self.fragments
                .retain(|f| tick.saturating_sub(f.spawn_tick) < lifetime);
        }

        for f in &mut self.fragments {
            if f.sleeping {
                continue;
            }

            // Off-screen fragments sleep rather than despawn.
            if f.x < -CULL_MARGIN || f.x > WORLD_WIDTH + CULL_MARGIN || f.y > GROUND_Y + 400.0 {
                f.sleeping = true;
                continue;
            }

            if !f.on_ground {
                f.vy += gravity * p.gravity_scale * dt;
            }
            f.vz *= p.depth_damping.powf(dt);
            f.x += f.vx * dt;
            f.y += f.vy * dt;
            f.z += f.vz * dt;
            f.rotation += f.angular_vel * dt;

            if p.collides {
                let surface = surface_below(f.x, f.y);
                if f.y >= surface {
                    f.y = surface;
                    if f.vy > 0.0 {
                        f.vy = -f.vy * p.bounciness;
                        f.vx *= 0.8;
                        f.vz *= 0.8;
                        if f.vy.abs() < SETTLE_SPEED_THRESHOLD {
                            f.vy = 0.0;
                            f.on_ground = true;
                        }
                    }
                }

                if f.on_ground {
                    let friction = p.ground_friction.powf(dt);
                    f.vx *= friction;
                    f.angular_vel *= friction;
                    if f.settled_tick.is_none()
                        && f.vx.abs() < SETTLE_SPEED_THRESHOLD
                        && f.angular_vel.abs() < SETTLE_ANGULAR_THRESHOLD
                    {
                        f.settled_tick = Some(tick);
                    }
                }
            }

            if let Some(settled) = f.settled_tick {
                if tick.saturating_sub(settled) >= grace {
                    f.sleeping = true;
                }
            }
        }

        self.enforce_cap();
    }

    /// Hide the oldest-settled sleeping fragments until the rendered
    /// population fits the cap. Falls back to oldest-spawned only if there
    /// are not enough sleeping fragments to evict.
    fn enforce_cap(&mut self) {
        let visible = self.fragments.iter().filter(|f| !f.do_not_draw).count();
        if visible <= self.cap {
            return;
        }
        let mut excess = visible - self.cap;

        let mut candidates: Vec<usize> = (0..self.fragments.len())
            .filter(|&i| {
                let f = &self.fragments[i];
                f.sleeping && !f.do_not_draw
            })
            .collect();
        candidates.sort_by_key(|&i| self.fragments[i].settled_tick.unwrap_or(u64::MAX));

        for i in candidates {
            if excess == 0 {
                return;
            }
            self.fragments[i].do_not_draw = true;
            excess -= 1;
        }

        if excess > 0 {
            let mut rest: Vec<usize> = (0..self.fragments.len())
                .filter(|&i| !self.fragments[i].do_not_draw)
                .collect();
            rest.sort_by_key(|&i| self.fragments[i].spawn_tick);
            for i in rest.into_iter().take(excess) {
                self.fragments[i].do_not_draw = true;
            }
        }
    }

    /// Wake every fragment within `radius` of (x, y): clears sleep,
    /// eviction, and settle bookkeeping so physics picks it up again.
    pub fn wake_near(&mut self, x: f64, y: f64, radius: f64) {
        let r_sq = radius * radius;
        for f in &mut self.fragments {
            let dx = f.x - x;
            let dy = f.y - y;
            if dx * dx + dy * dy <= r_sq {
                f.sleeping = false;
                f.do_not_draw = false;
                f.on_ground = false;
                f.settled_tick = None;
            }
        }
    }

    /// Inverse-distance pull toward (x, y) on non-sleeping fragments
    /// (tractor beam).
    pub fn pull_toward(&mut self, x: f64, y: f64, radius: f64, strength: f64, dt: f64) {
        let r_sq = radius * radius;
        for f in &mut self.fragments {
            if f.sleeping || f.do_not_draw {
                continue;
            }
            let dx = x - f.x;
            let dy = y - f.y;
            let d_sq = dx * dx + dy * dy;
            if d_sq > r_sq || d_sq < 1e-6 {
                continue;
            }
            let dist = d_sq.sqrt();
            let force = strength / (dist + 20.0);
            f.vx += dx / dist * force * dt;
            f.vy += dy / dist * force * dt;
            f.on_ground = false;
            f.settled_tick = None;
        }
    }

    /// Inverse-distance push away from (x, y) with upward lift (tornado).
    /// Touched fragments are woken.
    pub fn push_from(&mut self, x: f64, y: f64, radius: f64, strength: f64, dt: f64) {
        let r_sq = radius * radius;
        for f in &mut self.fragments {
            if f.do_not_draw {
                continue;
            }
            let dx = f.x - x;
            let dy = f.y - y;
            let d_sq = dx * dx + dy * dy;
            if d_sq > r_sq {
                continue;
            }
            let dist = d_sq.sqrt().max(1.0);
            let force = strength / dist.max(30.0);
            f.vx += dx / dist * force * dt;
            f.vy += (dy / dist - 0.6) * force * dt;
            f.sleeping = false;
            f.on_ground = false;
            f.settled_tick = None;
        }
    }

    /// (active, sleeping-but-rendered, hidden) population counts.
    pub fn counts(&self) -> (usize, usize, usize) {
        let mut active = 0;
        let mut sleeping = 0;
        let mut hidden = 0;
        for f in &self.fragments {
            if f.do_not_draw {
                hidden += 1;
            } else if f.sleeping {
                sleeping += 1;
            } else {
                active += 1;
            }
        }
        (active, sleeping, hidden)
    }

    pub fn clear(&mut self) {
        self.fragments.clear();
    }
}

/// All pools, one per fragment kind.
#[derive(Debug)]
pub struct DebrisState {
    pools: Vec<DebrisPool>,
}

pub const ALL_KINDS: [DebrisKind; 6] = [
    DebrisKind::Shard,
    DebrisKind::Chunk,
    DebrisKind::MicroChip,
    DebrisKind::Dust,
    DebrisKind::VoxelBit,
    DebrisKind::BridgeChunk,
];

impl DebrisState {
    pub fn new(cap_scale: f64) -> Self {
        Self {
            pools: ALL_KINDS
                .iter()
                .map(|&kind| DebrisPool::new(kind, cap_scale))
                .collect(),
        }
    }

    pub fn pool_mut(&mut self, kind: DebrisKind) -> &mut DebrisPool {
        let idx = ALL_KINDS.iter().position(|&k| k == kind).unwrap_or(0);
        &mut self.pools[idx]
    }

    pub fn pools(&self) -> &[DebrisPool] {
        &self.pools
    }

    pub fn update_all<F: Fn(f64, f64) -> f64>(&mut self, tick: u64, gravity: f64, surface: &F) {
        for pool in &mut self.pools {
            pool.update(tick, gravity, surface);
        }
    }

    pub fn wake_near(&mut self, x: f64, y: f64, radius: f64) {
        for pool in &mut self.pools {
            pool.wake_near(x, y, radius);
        }
    }

    pub fn pull_toward(&mut self, x: f64, y: f64, radius: f64, strength: f64, dt: f64) {
        for pool in &mut self.pools {
            pool.pull_toward(x, y, radius, strength, dt);
        }
    }

    pub fn push_from(&mut self, x: f64, y: f64, radius: f64, strength: f64, dt: f64) {
        for pool in &mut self.pools {
            pool.push_from(x, y, radius, strength, dt);
        }
    }

    /// Discard every fragment (city reset / agent switch).
    pub fn clear_all(&mut self) {
        for pool in &mut self.pools {
            pool.clear();
        }
    }

    pub fn views(&self) -> Vec<DebrisPoolView> {
        self.pools
            .iter()
            .map(|pool| {
                let (active, sleeping, hidden) = pool.counts();
                DebrisPoolView {
                    kind: pool.kind,
                    active,
                    sleeping,
                    hidden,
                }
            })
            .collect()
    }
}

// --- Render-only depth derivations ---
//
// Pure functions of pseudo-depth; gameplay never reads them, but the
// renderer needs them reproduced for visual parity.

/// Draw scale from pseudo-depth (positive z = toward the camera).
pub fn perspective_scale(z: f64) -> f64 {
    (1.0 + z / 240.0).clamp(0.5, 1.6)
}

/// Ground shadow alpha, fading with distance from the focal plane.
pub fn shadow_alpha(z: f64) -> f64 {
    (0.35 - z.abs() / 400.0).clamp(0.05, 0.35)
}

/// Ground shadow radius for a fragment of `size`.
pub fn shadow_radius(size: f64, z: f64) -> f64 {
    size * perspective_scale(z) * 0.8
}

/// Depth-based brightness multiplier.
pub fn depth_brightness(z: f64) -> f64 {
    (1.0 + z / 300.0).clamp(0.6, 1.25)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rubble_core::constants::{GROUND_Y, GRAVITY};

    fn ground(_x: f64, _y: f64) -> f64 {
        GROUND_Y
    }

    fn drop_fragment(pool: &mut DebrisPool, y: f64) {
        pool.spawn(Fragment {
            x: 500.0,
            y,
            z: 0.0,
            vx: 0.0,
            vy: 0.0,
            vz: 0.0,
            rotation: 0.0,
            angular_vel: 0.0,
            size: 8.0,
            color_index: 0,
            spawn_tick: 0,
            on_ground: false,
            sleeping: false,
            do_not_draw: false,
            settled_tick: None,
        });
    }

    #[test]
    fn test_fragment_falls_settles_then_sleeps() {
        let mut pool = DebrisPool::new(DebrisKind::Chunk, 1.0);
        drop_fragment(&mut pool, GROUND_Y - 120.0);

        // Fall + bounce until rest.
        let mut tick = 0;
        for _ in 0..600 {
            tick += 1;
            pool.update(tick, GRAVITY, &ground);
        }
        let f = &pool.fragments[0];
        assert!(f.on_ground, "fragment should have landed");
        assert!(f.settled_tick.is_some(), "fragment should have settled");
        assert!(!f.sleeping, "sleep grace has not elapsed yet");
        assert!((f.y - GROUND_Y).abs() < 1e-6);

        // Sleep after the grace period, still rendered.
        let grace = secs_to_ticks(SLEEP_GRACE_SECS);
        for _ in 0..=grace {
            tick += 1;
            pool.update(tick, GRAVITY, &ground);
        }
        let f = &pool.fragments[0];
        assert!(f.sleeping, "fragment should sleep after the grace period");
        assert!(!f.do_not_draw, "sleeping fragments remain rendered");
    }

    #[test]
    fn test_cap_eviction_hides_oldest_settled_first() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut pool = DebrisPool::new(DebrisKind::Chunk, 1.0);
        let cap = pool.cap();

        // Two sleeping fragments with distinct settle times.
        for (i, settled) in [(0u64, 10u64), (1, 500)] {
            pool.spawn(Fragment {
                x: 100.0 + i as f64,
                y: GROUND_Y,
                z: 0.0,
                vx: 0.0,
                vy: 0.0,
                vz: 0.0,
                rotation: 0.0,
                angular_vel: 0.0,
                size: 8.0,
                color_index: 0,
                spawn_tick: 0,
                on_ground: true,
                sleeping: true,
                do_not_draw: false,
                settled_tick: Some(settled),
            });
        }
        // Fill to one over cap with live fragments.
        pool.spawn_scatter(&mut rng, 500.0, 300.0, cap - 1, 80.0, 1000);

        pool.update(1001, GRAVITY, &ground);

        let (active, sleeping, hidden) = pool.counts();
        assert!(active + sleeping <= cap, "rendered population exceeds cap");
        assert_eq!(hidden, 1, "exactly one fragment should be hidden");
        assert!(
            pool.fragments[0].do_not_draw,
            "the earliest-settled sleeper is evicted first"
        );
        assert!(!pool.fragments[1].do_not_draw);
    }

    #[test]
    fn test_wake_reactivates_hidden_fragment() {
        let mut pool = DebrisPool::new(DebrisKind::Shard, 1.0);
        drop_fragment(&mut pool, GROUND_Y);
        {
            let f = &mut pool.fragments[0];
            f.sleeping = true;
            f.do_not_draw = true;
            f.settled_tick = Some(5);
            f.on_ground = true;
        }

        pool.wake_near(500.0, GROUND_Y, 50.0);

        let f = &pool.fragments[0];
        assert!(!f.sleeping && !f.do_not_draw && !f.on_ground);
        assert!(f.settled_tick.is_none());
    }

    #[test]
    fn test_lifetime_pool_expires_fragments() {
        let mut pool = DebrisPool::new(DebrisKind::Dust, 1.0);
        drop_fragment(&mut pool, 300.0);
        let lifetime = pool.params.lifetime_ticks.unwrap();

        pool.update(lifetime - 1, GRAVITY, &ground);
        assert_eq!(pool.fragments.len(), 1);

        pool.update(lifetime + 1, GRAVITY, &ground);
        assert!(pool.fragments.is_empty(), "dust should expire by lifetime");
    }

    #[test]
    fn test_offscreen_fragment_sleeps_not_removed() {
        let mut pool = DebrisPool::new(DebrisKind::Chunk, 1.0);
        drop_fragment(&mut pool, 300.0);
        pool.fragments[0].x = -CULL_MARGIN - 50.0;

        pool.update(1, GRAVITY, &ground);

        assert_eq!(pool.fragments.len(), 1);
        assert!(pool.fragments[0].sleeping);
    }

    #[test]
    fn test_depth_derivations_are_bounded() {
        for z in [-300.0, -60.0, 0.0, 60.0, 300.0] {
            assert!((0.5..=1.6).contains(&perspective_scale(z)));
            assert!((0.05..=0.35).contains(&shadow_alpha(z)));
            assert!((0.6..=1.25).contains(&depth_brightness(z)));
            assert!(shadow_radius(8.0, z) > 0.0);
        }
        assert!((perspective_scale(0.0) - 1.0).abs() < 1e-12);
    }
}
