use rand::Rng;
use crate::math::Vec3;
use crate::sampling::{palette::FIREWORKS, ring_point, sphere_uniform};

/// Ascent speed range of a rocket, units per frame
pub const ASCENT_SPEED: (f32, f32) = (0.3, 0.5);

/// Initial spark speed range of a burst, units per frame
pub const BURST_SPEED: (f32, f32) = (0.15, 0.55);

/// Life lost per frame by a burst
pub const DECAY: (f32, f32) = (0.008, 0.016);

/// Velocity multiplier applied every frame to burst sparks
pub const DRAG: f32 = 0.96;

/// Downward velocity change per frame for burst sparks
pub const GRAVITY: f32 = 0.004;

const ROCKET_SIZE: f32 = 7.0;
const SPARK_SIZE: f32 = 5.0;

/// Spawn and geometry parameters of the firework pool
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireworkParams {
    /// Spawn probability per frame, in [0, 0.1]
    pub rate: f32,
    /// Maximum concurrent fireworks (rockets and bursts together)
    pub capacity: usize,
    pub min_radius: f32,
    pub max_radius: f32,
    pub min_apex: f32,
    pub max_apex: f32,
    /// Sparks per burst
    pub burst_size: usize,
}

impl Default for FireworkParams {
    fn default() -> Self {
        Self {
            rate: 0.03,
            capacity: 8,
            min_radius: 45.0,
            max_radius: 70.0,
            min_apex: 18.0,
            max_apex: 32.0,
            burst_size: 100,
        }
    }
}

/// A shell climbing toward its burst altitude
#[derive(Debug, Clone, PartialEq)]
pub struct Rocket {
    pub position: Vec3,
    pub target_y: f32,
    pub speed: f32,
    pub color: Vec3,
}

/// One spark of a burst
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spark {
    pub position: Vec3,
    pub velocity: Vec3,
    pub color: Vec3,
}

/// Expanding shower of sparks that fades out
#[derive(Debug, Clone, PartialEq)]
pub struct Burst {
    pub origin: Vec3,
    pub sparks: Vec<Spark>,
    /// Remaining life in (0, 1]; doubles as opacity
    pub life: f32,
    pub decay: f32,
}

impl Burst {
    fn new<R: Rng + ?Sized>(origin: Vec3, size: usize, rng: &mut R) -> Self {
        let sparks = (0..size)
            .map(|_| {
                let speed = rng.gen_range(BURST_SPEED.0..BURST_SPEED.1);
                Spark {
                    position: origin,
                    velocity: sphere_uniform(rng).scale(speed),
                    color: FIREWORKS.pick(rng),
                }
            })
            .collect();

        Self {
            origin,
            sparks,
            life: 1.0,
            decay: rng.gen_range(DECAY.0..DECAY.1),
        }
    }

    pub fn opacity(&self) -> f32 {
        self.life.max(0.0)
    }
}

/// A firework is always in exactly one of these states
#[derive(Debug, Clone, PartialEq)]
pub enum Firework {
    Ascending(Rocket),
    Bursting(Burst),
}

impl Firework {
    pub fn is_ascending(&self) -> bool {
        matches!(self, Firework::Ascending(_))
    }

    pub fn is_bursting(&self) -> bool {
        matches!(self, Firework::Bursting(_))
    }

    /// Advance one frame. Returns the entity's next state, or `None` once a
    /// burst has faded out. A rocket reaching its altitude comes back as a
    /// burst in the same call, so the two never coexist.
    fn advance<R: Rng + ?Sized>(self, burst_size: usize, rng: &mut R) -> Option<Firework> {
        match self {
            Firework::Ascending(mut rocket) => {
                rocket.position.y += rocket.speed;
                if rocket.position.y >= rocket.target_y {
                    let origin = Vec3::new(rocket.position.x, rocket.target_y, rocket.position.z);
                    log::debug!("firework burst at ({:.1}, {:.1}, {:.1})", origin.x, origin.y, origin.z);
                    Some(Firework::Bursting(Burst::new(origin, burst_size, rng)))
                } else {
                    Some(Firework::Ascending(rocket))
                }
            }
            Firework::Bursting(mut burst) => {
                for spark in &mut burst.sparks {
                    spark.position += spark.velocity;
                    spark.velocity.y -= GRAVITY;
                    spark.velocity *= DRAG;
                }
                burst.life -= burst.decay;
                if burst.life <= 0.0 {
                    None
                } else {
                    Some(Firework::Bursting(burst))
                }
            }
        }
    }
}

/// Bounded pool of fireworks with probabilistic spawning
pub struct FireworkSystem {
    pool: Vec<Firework>,
    params: FireworkParams,
}

impl FireworkSystem {
    pub fn new(params: FireworkParams) -> Self {
        Self {
            pool: Vec::with_capacity(params.capacity),
            params: FireworkParams {
                rate: clamp_rate(params.rate),
                ..params
            },
        }
    }

    pub fn params(&self) -> &FireworkParams {
        &self.params
    }

    /// Live-tunable spawn probability, clamped to [0, 0.1]
    pub fn set_rate(&mut self, rate: f32) {
        let clamped = clamp_rate(rate);
        if clamped != rate {
            log::warn!("firework rate {} clamped to {}", rate, clamped);
        }
        self.params.rate = clamped;
    }

    pub fn rate(&self) -> f32 {
        self.params.rate
    }

    pub fn count(&self) -> usize {
        self.pool.len()
    }

    pub fn fireworks(&self) -> &[Firework] {
        &self.pool
    }

    /// Spawn check followed by one integration step of every entity
    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.try_spawn(rng);

        let burst_size = self.params.burst_size;
        let pool = std::mem::take(&mut self.pool);
        self.pool = pool
            .into_iter()
            .filter_map(|fw| fw.advance(burst_size, rng))
            .collect();
    }

    /// Spawn a rocket with probability `rate` when below capacity. Spawns
    /// are dropped, never queued, while the pool is full.
    fn try_spawn<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.pool.len() >= self.params.capacity {
            return false;
        }
        if rng.gen::<f32>() >= self.params.rate {
            return false;
        }
        let rocket = self.new_rocket(rng);
        log::debug!("firework launched toward y = {:.1}", rocket.target_y);
        self.pool.push(Firework::Ascending(rocket));
        true
    }

    fn new_rocket<R: Rng + ?Sized>(&self, rng: &mut R) -> Rocket {
        let p = &self.params;
        let base = ring_point(p.min_radius, p.max_radius, rng);
        let target_y = if p.max_apex > p.min_apex {
            rng.gen_range(p.min_apex..p.max_apex)
        } else {
            p.min_apex
        };
        Rocket {
            position: base,
            target_y,
            speed: rng.gen_range(ASCENT_SPEED.0..ASCENT_SPEED.1),
            color: FIREWORKS.pick(rng),
        }
    }

    /// Point sprite data for GPU upload.
    /// Format: position(3) + size(1) + alpha(1) + color(3) = 8 floats per point
    pub fn particle_data(&self) -> Vec<f32> {
        let mut data = Vec::new();
        for fw in &self.pool {
            match fw {
                Firework::Ascending(rocket) => {
                    push_point(&mut data, rocket.position, ROCKET_SIZE, 1.0, rocket.color);
                }
                Firework::Bursting(burst) => {
                    let alpha = burst.opacity();
                    for spark in &burst.sparks {
                        push_point(&mut data, spark.position, SPARK_SIZE, alpha, spark.color);
                    }
                }
            }
        }
        data
    }

    #[cfg(test)]
    fn insert(&mut self, firework: Firework) {
        self.pool.push(firework);
    }
}

fn clamp_rate(rate: f32) -> f32 {
    if rate.is_nan() {
        0.0
    } else {
        rate.clamp(0.0, 0.1)
    }
}

pub(crate) fn push_point(data: &mut Vec<f32>, position: Vec3, size: f32, alpha: f32, color: Vec3) {
    data.extend_from_slice(&[
        position.x, position.y, position.z,
        size,
        alpha,
        color.x, color.y, color.z,
    ]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn rocket(y: f32, target_y: f32, speed: f32) -> Firework {
        Firework::Ascending(Rocket {
            position: Vec3::new(50.0, y, 0.0),
            target_y,
            speed,
            color: Vec3::ONE,
        })
    }

    fn quiet_system() -> FireworkSystem {
        FireworkSystem::new(FireworkParams {
            rate: 0.0,
            ..Default::default()
        })
    }

    #[test]
    fn test_pool_never_exceeds_capacity() {
        let mut rng = SmallRng::seed_from_u64(99);
        let mut system = FireworkSystem::new(FireworkParams {
            rate: 0.1,
            capacity: 8,
            ..Default::default()
        });
        let mut peak = 0;
        for _ in 0..20_000 {
            system.update(&mut rng);
            assert!(system.count() <= 8);
            peak = peak.max(system.count());
        }
        assert!(peak > 0);
    }

    #[test]
    fn test_zero_rate_never_spawns() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut system = quiet_system();
        for _ in 0..5_000 {
            system.update(&mut rng);
        }
        assert_eq!(system.count(), 0);
    }

    #[test]
    fn test_rate_is_clamped() {
        let mut system = quiet_system();
        system.set_rate(-0.5);
        assert_eq!(system.rate(), 0.0);
        system.set_rate(3.0);
        assert_eq!(system.rate(), 0.1);
        system.set_rate(f32::NAN);
        assert_eq!(system.rate(), 0.0);
        system.set_rate(0.05);
        assert_eq!(system.rate(), 0.05);
    }

    #[test]
    fn test_spawned_rocket_parameters() {
        let mut rng = SmallRng::seed_from_u64(12);
        let mut system = FireworkSystem::new(FireworkParams {
            rate: 0.1,
            ..Default::default()
        });
        while system.count() == 0 {
            system.try_spawn(&mut rng);
        }
        match &system.fireworks()[0] {
            Firework::Ascending(r) => {
                let d = r.position.horizontal_length();
                assert!(d >= 45.0 - 1e-3 && d <= 70.0 + 1e-3);
                assert!(r.target_y >= 18.0 && r.target_y < 32.0);
                assert!(r.speed >= ASCENT_SPEED.0 && r.speed < ASCENT_SPEED.1);
                assert!(FIREWORKS.contains(r.color));
            }
            other => panic!("expected a rocket, got {:?}", other),
        }
    }

    #[test]
    fn test_rocket_turns_into_exactly_one_burst() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut system = quiet_system();
        system.insert(rocket(9.0, 10.0, 0.6));

        system.update(&mut rng);
        assert_eq!(system.count(), 1);
        assert!(system.fireworks()[0].is_ascending());

        system.update(&mut rng);
        assert_eq!(system.count(), 1);
        match &system.fireworks()[0] {
            Firework::Bursting(b) => {
                // Burst sits exactly at the target altitude, not the overshoot
                assert_eq!(b.origin, Vec3::new(50.0, 10.0, 0.0));
                assert_eq!(b.sparks.len(), 100);
                assert_eq!(b.life, 1.0);
                assert!(b.decay >= DECAY.0 && b.decay < DECAY.1);
                for s in &b.sparks {
                    assert_eq!(s.position, b.origin);
                    let speed = s.velocity.length();
                    assert!(speed >= BURST_SPEED.0 - 1e-4 && speed < BURST_SPEED.1 + 1e-4);
                    assert!(FIREWORKS.contains(s.color));
                }
            }
            other => panic!("expected a burst, got {:?}", other),
        }
    }

    #[test]
    fn test_burst_life_decreases_until_removed() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut system = quiet_system();
        let decay = 0.3;
        system.insert(Firework::Bursting(Burst {
            origin: Vec3::ZERO,
            sparks: vec![Spark {
                position: Vec3::ZERO,
                velocity: Vec3::new(0.5, 0.0, 0.0),
                color: Vec3::ONE,
            }],
            life: 1.0,
            decay,
        }));

        // 1.0 -> 0.7 -> 0.4 -> ~0.1 -> removed on the fourth step
        let mut prev = 1.0;
        for _ in 0..3 {
            system.update(&mut rng);
            assert_eq!(system.count(), 1);
            match &system.fireworks()[0] {
                Firework::Bursting(b) => {
                    assert!(b.life < prev);
                    assert!(b.life > 0.0);
                    prev = b.life;
                }
                _ => unreachable!(),
            }
        }
        system.update(&mut rng);
        assert_eq!(system.count(), 0);
    }

    #[test]
    fn test_spark_integration_applies_gravity_and_drag() {
        let mut rng = SmallRng::seed_from_u64(6);
        let burst = Firework::Bursting(Burst {
            origin: Vec3::ZERO,
            sparks: vec![Spark {
                position: Vec3::ZERO,
                velocity: Vec3::new(1.0, 0.0, 0.0),
                color: Vec3::ONE,
            }],
            life: 1.0,
            decay: 0.01,
        });

        match burst.advance(100, &mut rng) {
            Some(Firework::Bursting(b)) => {
                let s = b.sparks[0];
                assert_eq!(s.position, Vec3::new(1.0, 0.0, 0.0));
                assert!((s.velocity.x - DRAG).abs() < 1e-6);
                assert!((s.velocity.y + GRAVITY * DRAG).abs() < 1e-6);
                assert!((b.life - 0.99).abs() < 1e-6);
            }
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn test_particle_data_layout() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut system = quiet_system();
        system.insert(rocket(0.0, 100.0, 0.4));
        system.insert(Firework::Bursting(Burst::new(Vec3::ZERO, 10, &mut rng)));

        let data = system.particle_data();
        assert_eq!(data.len(), (1 + 10) * 8);
        // Burst alpha tracks life
        assert_eq!(data[8 + 4], 1.0);
    }
}
