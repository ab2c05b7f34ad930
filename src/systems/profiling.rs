//! Per-system frame timings.
//!
//! Every scheduled system is wrapped with [`profile`], which records its run time into a small
//! ring buffer keyed by [`SystemId`]. `Game::tick` adds the whole-frame time under
//! [`SystemId::Total`] and uses the buffers to name the culprits of a slow frame.

use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use bevy_ecs::resource::Resource;
use bevy_ecs::system::{IntoSystem, System};
use bevy_ecs::world::World;
use circular_buffer::CircularBuffer;
use num_width::NumberWidth;
use parking_lot::Mutex;
use smallvec::SmallVec;
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{EnumCount, EnumIter, IntoStaticStr};
use thousands::Separable;

/// The number of profiled systems, used to size the fixed maps.
const MAX_SYSTEMS: usize = SystemId::COUNT;
/// Number of frames kept per system.
const TIMING_WINDOW_SIZE: usize = 30;

/// Any single system at or above this is reported on its own when a frame runs long.
const SLOW_SYSTEM_THRESHOLD: Duration = Duration::from_millis(2);

#[derive(EnumCount, EnumIter, IntoStaticStr, Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum SystemId {
    Total,
    Resize,
    Startup,
    PlayerControls,
    Restart,
    TimeToLive,
    Smoothing,
    Collision,
    Item,
    Spawner,
    Countdown,
    ParticleCap,
    Audio,
    Notifications,
}

impl Display for SystemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Into::<&'static str>::into(self).to_ascii_lowercase())
    }
}

/// Recent durations for one system. Frames in which the system did not run count as zero.
#[derive(Debug, Default)]
pub struct TimingBuffer {
    buffer: CircularBuffer<TIMING_WINDOW_SIZE, Duration>,
    last_frame: u64,
}

impl TimingBuffer {
    fn pad_to(&mut self, frame: u64) {
        if frame > self.last_frame + 1 {
            for _ in 0..(frame - self.last_frame - 1).min(TIMING_WINDOW_SIZE as u64) {
                self.buffer.push_back(Duration::ZERO);
            }
        }
    }

    /// Records a duration for `frame`. Several records in the same frame are summed.
    pub fn record(&mut self, duration: Duration, frame: u64) {
        if frame < self.last_frame {
            return;
        }

        if frame == self.last_frame && !self.buffer.is_empty() {
            if let Some(last) = self.buffer.back_mut() {
                *last += duration;
            }
            return;
        }

        self.pad_to(frame);
        self.buffer.push_back(duration);
        self.last_frame = frame;
    }

    pub fn latest(&self) -> Duration {
        self.buffer.back().copied().unwrap_or(Duration::ZERO)
    }

    /// Mean and sample standard deviation over the window.
    pub fn stats(&self) -> (Duration, Duration) {
        let count = self.buffer.len();
        if count == 0 {
            return (Duration::ZERO, Duration::ZERO);
        }

        let mean = self.buffer.iter().map(Duration::as_secs_f64).sum::<f64>() / count as f64;
        let variance = if count > 1 {
            self.buffer
                .iter()
                .map(|d| (d.as_secs_f64() - mean).powi(2))
                .sum::<f64>()
                / (count - 1) as f64
        } else {
            0.0
        };

        (Duration::from_secs_f64(mean), Duration::from_secs_f64(variance.sqrt()))
    }
}

/// Frame counter shared by the profiler and the log formatter.
#[derive(Resource, Debug, Default)]
pub struct Timing {
    current_frame: AtomicU64,
}

impl Timing {
    pub fn current_frame(&self) -> u64 {
        self.current_frame.load(Ordering::Relaxed)
    }

    /// Advances to the next frame and returns its number.
    pub fn next_frame(&self) -> u64 {
        self.current_frame.fetch_add(1, Ordering::Relaxed) + 1
    }
}

#[derive(Resource, Debug)]
pub struct SystemTimings {
    timings: micromap::Map<SystemId, Mutex<TimingBuffer>, MAX_SYSTEMS>,
}

impl Default for SystemTimings {
    fn default() -> Self {
        let mut timings = micromap::Map::new();
        for id in SystemId::iter() {
            timings.insert(id, Mutex::new(TimingBuffer::default()));
        }
        Self { timings }
    }
}

impl SystemTimings {
    pub fn record(&self, id: SystemId, duration: Duration, frame: u64) {
        if let Some(buffer) = self.timings.get(&id) {
            buffer.lock().record(duration, frame);
        }
    }

    pub fn stats(&self, id: SystemId) -> (Duration, Duration) {
        self.timings
            .get(&id)
            .map(|buffer| buffer.lock().stats())
            .unwrap_or((Duration::ZERO, Duration::ZERO))
    }

    /// Systems most likely responsible for the latest frame being slow.
    ///
    /// Anything over 2ms is reported outright; otherwise the most expensive systems are taken until
    /// they cover 30% of the frame, capped at five.
    pub fn slowest_systems(&self) -> SmallVec<[(SystemId, Duration); 5]> {
        let mut latest: SmallVec<[(SystemId, Duration); MAX_SYSTEMS]> = SystemId::iter()
            .filter(|id| *id != SystemId::Total)
            .filter_map(|id| self.timings.get(&id).map(|buffer| (id, buffer.lock().latest())))
            .collect();
        latest.sort_by(|a, b| b.1.cmp(&a.1));

        let over_threshold: SmallVec<[(SystemId, Duration); 5]> = latest
            .iter()
            .filter(|(_, duration)| *duration >= SLOW_SYSTEM_THRESHOLD)
            .take(5)
            .copied()
            .collect();
        if !over_threshold.is_empty() {
            return over_threshold;
        }

        let total: Duration = latest.iter().map(|(_, d)| *d).sum();
        let target = total.mul_f64(0.3);
        let mut accumulated = Duration::ZERO;
        let mut result = SmallVec::new();
        for (id, duration) in latest.iter().take(5) {
            result.push((*id, *duration));
            accumulated += *duration;
            if accumulated >= target {
                break;
            }
        }
        result
    }

    /// An aligned `name : mean ± stddev` table, Total first as effective FPS, then systems by cost.
    pub fn format_table(&self) -> SmallVec<[String; MAX_SYSTEMS]> {
        let (total_mean, total_std) = self.stats(SystemId::Total);
        let fps = match 1.0 / total_mean.as_secs_f64() {
            f if !f.is_finite() => "    - FPS".to_string(),
            f if f > 100.0 => format!("{:>5} FPS", (f as u32).separate_with_commas()),
            f if f < 10.0 => format!("{:.1} FPS", f),
            f => format!("{:5.0} FPS", f),
        };

        let mut rows: Vec<(String, Duration, Duration)> = SystemId::iter()
            .filter(|id| *id != SystemId::Total)
            .map(|id| {
                let (mean, std) = self.stats(id);
                (id.to_string(), mean, std)
            })
            .collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1));
        rows.insert(0, (fps, total_mean, total_std));

        format_rows(rows)
    }
}

/// Wraps a system so each run is timed into [`SystemTimings`].
pub fn profile<S, M>(id: SystemId, system: S) -> impl FnMut(&mut World)
where
    S: IntoSystem<(), (), M> + 'static,
{
    let mut system: S::System = IntoSystem::into_system(system);
    let mut is_initialized = false;
    move |world: &mut World| {
        if !is_initialized {
            system.initialize(world);
            is_initialized = true;
        }

        let start = Instant::now();
        system.run((), world);
        let duration = start.elapsed();

        if let (Some(timings), Some(timing)) = (world.get_resource::<SystemTimings>(), world.get_resource::<Timing>()) {
            timings.record(id, duration, timing.current_frame());
        }
    }
}

/// Splits a duration into integer part, three-digit fraction and unit.
fn split_duration(duration: Duration) -> (u64, u32, &'static str) {
    match duration {
        d if d >= Duration::from_secs(1) => (d.as_secs(), d.subsec_millis(), "s"),
        d if d >= Duration::from_millis(1) => (d.as_millis() as u64, (d.as_micros() % 1000) as u32, "ms"),
        d if d >= Duration::from_micros(1) => (d.as_micros() as u64, (d.as_nanos() % 1000) as u32, "µs"),
        d => (d.as_nanos() as u64, 0, "ns"),
    }
}

fn format_rows(rows: Vec<(String, Duration, Duration)>) -> SmallVec<[String; MAX_SYSTEMS]> {
    let split: Vec<_> = rows
        .into_iter()
        .map(|(name, mean, std)| (name, split_duration(mean), split_duration(std)))
        .collect();

    let name_width = split.iter().map(|(name, _, _)| name.chars().count()).max().unwrap_or(0);
    let mean_width = split.iter().map(|(_, (int, _, _), _)| int.width() as usize).max().unwrap_or(1);
    let std_width = split.iter().map(|(_, _, (int, _, _))| int.width() as usize).max().unwrap_or(1);

    split
        .iter()
        .map(|(name, (mean_int, mean_frac, mean_unit), (std_int, std_frac, std_unit))| {
            format!(
                "{name:name_width$} : {mean_int:>mean_width$}.{mean_frac:03}{mean_unit} ± {std_int:>std_width$}.{std_frac:03}{std_unit}"
            )
        })
        .collect()
}
