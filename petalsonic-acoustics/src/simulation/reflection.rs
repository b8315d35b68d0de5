use crate::config::SimulationSettings;
use crate::directivity::Directivity;
use crate::energy_field::EnergyField;
use crate::error::{AcousticsError, Result};
use crate::math::{CoordinateSpace, Quat, Vec3, fibonacci_sphere_direction};
use crate::scene::{MaterialTable, RayTracer};
use crate::sh;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::ops::AddAssign;
use std::panic::{self, AssertUnwindSafe};

/// Fewest rays traced by one rayon task.
const RAYS_PER_JOB: usize = 64;

/// Offset applied along the surface normal before casting from a hit point.
const SURFACE_OFFSET: f32 = 1e-3;

/// Rays whose remaining energy drops below this in every band are stopped.
const MIN_RAY_ENERGY: f32 = 1e-8;

/// Bands are bounded by the largest built-in layout.
const MAX_BANDS: usize = 16;

/// A sound source as seen by the simulator.
#[derive(Debug, Clone)]
pub struct SourceDesc {
    /// Position and orientation. Directivity is evaluated in this frame.
    pub frame: CoordinateSpace,
    pub directivity: Directivity,
}

impl SourceDesc {
    /// An omnidirectional source at `position`.
    pub fn new(position: Vec3) -> Self {
        Self {
            frame: CoordinateSpace::from_origin(position),
            directivity: Directivity::omni(),
        }
    }

    pub fn position(&self) -> Vec3 {
        self.frame.origin
    }

    pub fn with_orientation(mut self, rotation: Quat) -> Self {
        self.frame = CoordinateSpace::from_pose(self.frame.origin, rotation);
        self
    }

    pub fn with_directivity(mut self, directivity: Directivity) -> Self {
        self.directivity = directivity;
        self
    }
}

/// Counters gathered while tracing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationStats {
    pub rays_traced: usize,
    /// Surface hits across all bounces.
    pub hits: usize,
    /// Hit points that added energy to the field.
    pub contributions: usize,
    /// Hit points whose path to the source was blocked. Energy still passes
    /// through the blocking surface in proportion to its transmission.
    pub occluded: usize,
    /// Rays that left the scene before running out of bounces.
    pub escaped: usize,
}

impl AddAssign for SimulationStats {
    fn add_assign(&mut self, other: Self) {
        self.rays_traced += other.rays_traced;
        self.hits += other.hits;
        self.contributions += other.contributions;
        self.occluded += other.occluded;
        self.escaped += other.escaped;
    }
}

/// Stochastic ray tracer estimating the reflected energy reaching a listener.
///
/// Rays leave the listener along evenly spread directions and bounce through
/// the scene, reflecting specularly or diffusely according to each surface's
/// scattering coefficient. At every hit the path is connected to the source
/// and the ray's remaining energy, weighted by the source directivity and a
/// Lambertian distance term, is added to the field at the bin of the total
/// path's arrival time. A blocked connection is attenuated by the
/// transmission of the first surface in the way. The direct path is not
/// included.
///
/// Rays are traced on a rayon pool of `num_threads` threads.
pub struct ReflectionSimulator {
    settings: SimulationSettings,
}

impl ReflectionSimulator {
    pub fn new(settings: SimulationSettings) -> Result<Self> {
        settings.validate()?;

        log::info!(
            "Created reflection simulator: {} rays, {} bounces, {} threads",
            settings.num_rays,
            settings.num_bounces,
            settings.num_threads
        );

        Ok(Self { settings })
    }

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    /// Traces every ray and accumulates into `field`.
    ///
    /// Returns once all workers have finished, so the field may be finalized
    /// as soon as this returns. A panicking worker is reported as
    /// [`AcousticsError::Simulation`].
    pub fn simulate(
        &self,
        tracer: &dyn RayTracer,
        materials: &MaterialTable,
        source: &SourceDesc,
        listener: Vec3,
        field: &dyn EnergyField,
    ) -> Result<SimulationStats> {
        self.settings.bands().ensure_compatible(&field.bands())?;

        if !listener.is_finite() || !source.position().is_finite() {
            return Err(AcousticsError::Configuration(
                "Source and listener positions must be finite".into(),
            ));
        }

        let context = TraceContext {
            settings: &self.settings,
            tracer,
            materials,
            source,
            listener,
            field,
            order: field.order().min(self.settings.order),
        };

        let num_rays = self.settings.num_rays;
        let num_threads = self.settings.num_threads.min(num_rays.div_ceil(RAYS_PER_JOB));
        let num_coeffs = sh::num_coeffs_for_order(context.order);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()
            .map_err(|e| {
                AcousticsError::Simulation(format!("Failed to create worker pool: {}", e))
            })?;

        log::debug!("Tracing {} rays on {} threads", num_rays, num_threads);

        let traced = panic::catch_unwind(AssertUnwindSafe(|| {
            pool.install(|| {
                (0..num_rays)
                    .into_par_iter()
                    .with_min_len(RAYS_PER_JOB)
                    .fold(
                        || (SimulationStats::default(), vec![0.0f32; num_coeffs]),
                        |(mut stats, mut weights), ray_index| {
                            context.trace_ray(ray_index, &mut weights, &mut stats);
                            (stats, weights)
                        },
                    )
                    .map(|(stats, _)| stats)
                    .reduce(SimulationStats::default, |mut total, stats| {
                        total += stats;
                        total
                    })
            })
        }));

        let stats = traced.map_err(|_| {
            log::error!("Simulation worker panicked");
            AcousticsError::Simulation("Simulation worker panicked".into())
        })?;

        log::info!(
            "Simulation finished: {} rays, {} hits, {} contributions, {} occluded, {} escaped",
            stats.rays_traced,
            stats.hits,
            stats.contributions,
            stats.occluded,
            stats.escaped
        );

        Ok(stats)
    }
}

struct TraceContext<'a> {
    settings: &'a SimulationSettings,
    tracer: &'a dyn RayTracer,
    materials: &'a MaterialTable,
    source: &'a SourceDesc,
    listener: Vec3,
    field: &'a dyn EnergyField,
    order: u32,
}

impl TraceContext<'_> {
    fn trace_ray(&self, ray_index: usize, weights: &mut [f32], stats: &mut SimulationStats) {
        let settings = self.settings;
        let bands = settings.bands();
        let num_bands = bands.num_bands().min(MAX_BANDS);

        // Independent stream per ray, so results do not depend on scheduling.
        let mut rng = StdRng::seed_from_u64(
            settings
                .seed
                .wrapping_add((ray_index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)),
        );

        let arrival_direction = fibonacci_sphere_direction(ray_index, settings.num_rays);
        sh::energy_weights(arrival_direction, self.order, weights);

        let ray_weight = 1.0 / settings.num_rays as f32;
        let max_path_length = settings.duration * settings.speed_of_sound;
        let source_position = self.source.position();
        let min_distance_squared = settings.min_distance * settings.min_distance;

        let mut energy = [1.0f32; MAX_BANDS];
        let mut origin = self.listener;
        let mut direction = arrival_direction;
        let mut path_length = 0.0;

        stats.rays_traced += 1;

        for _ in 0..settings.num_bounces {
            let hit = self.tracer.cast_ray(origin, direction, f32::INFINITY);
            if !hit.hit || !hit.distance.is_finite() {
                stats.escaped += 1;
                break;
            }
            if path_length + hit.distance > max_path_length {
                break;
            }
            stats.hits += 1;

            let hit_point = origin + hit.distance * direction;
            path_length += hit.distance;

            let mut normal = hit.normal.normalize_or_zero();
            if normal == Vec3::ZERO {
                break;
            }
            if normal.dot(direction) > 0.0 {
                normal = -normal;
            }

            let material = self.materials.get_or_generic(hit.material_index);
            for (band, e) in energy.iter_mut().enumerate().take(num_bands) {
                *e *= material.reflectance_for(&bands, band);
            }

            let surface_point = hit_point + SURFACE_OFFSET * normal;
            let to_source = source_position - surface_point;
            let distance = to_source.length();
            let cosine = if distance > f32::EPSILON {
                normal.dot(to_source / distance)
            } else {
                0.0
            };

            if cosine > 0.0 {
                let mut transmission = [1.0f32; MAX_BANDS];
                if self.tracer.is_occluded(surface_point, source_position) {
                    stats.occluded += 1;
                    // Only the first blocking surface is accounted for.
                    let blocker = self
                        .tracer
                        .cast_ray(surface_point, to_source / distance, distance);
                    let blocker = self.materials.get_or_generic(blocker.material_index);
                    for (band, t) in transmission.iter_mut().enumerate().take(num_bands) {
                        *t = blocker.transmission_for(&bands, band);
                    }
                }

                if transmission[..num_bands].iter().any(|&t| t > 0.0) {
                    let arrival_time = (path_length + distance) / settings.speed_of_sound;
                    if let Some(bin) = self.field.bin_for_time(arrival_time) {
                        let directivity = self
                            .source
                            .directivity
                            .evaluate_at(surface_point, &self.source.frame)
                            .max(0.0);
                        let geometry = ray_weight * directivity * cosine
                            / (std::f32::consts::PI * (distance * distance).max(min_distance_squared));

                        for (band, (&e, &t)) in
                            energy.iter().zip(&transmission).enumerate().take(num_bands)
                        {
                            let value = geometry * e * t;
                            for (term, &w) in weights.iter().enumerate() {
                                self.field.accumulate(band, term, bin, value * w);
                            }
                        }
                        stats.contributions += 1;
                    }
                }
            }

            if energy[..num_bands].iter().all(|&e| e < MIN_RAY_ENERGY) {
                break;
            }

            direction = if rng.gen_range(0.0f32..1.0) < material.scattering {
                cosine_weighted_direction(normal, &mut rng)
            } else {
                direction - 2.0 * direction.dot(normal) * normal
            };
            origin = surface_point;
        }
    }
}

/// Lambertian-distributed direction in the hemisphere around `normal`.
fn cosine_weighted_direction(normal: Vec3, rng: &mut StdRng) -> Vec3 {
    let frame = CoordinateSpace::from_ahead(normal, Vec3::ZERO);
    let u: f32 = rng.gen_range(0.0..1.0);
    let phi = 2.0 * std::f32::consts::PI * rng.gen_range(0.0f32..1.0);
    let radius = u.sqrt();
    let (sin, cos) = phi.sin_cos();

    (radius * cos * frame.right + radius * sin * frame.up + (1.0 - u).sqrt() * normal)
        .normalize_or_zero()
}
