//! Headless demo driver
//!
//! Runs the animation at the configured frame rate and logs lifecycle
//! transitions plus the per-season reference data. Rendering is left to
//! embedders; this binary exercises the engine end to end.
//!
//! Usage: `rose-cycle [config.json] [cycles]`

use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use rose_cycle::{RoseAnimator, RoseConfig, facts};

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => RoseConfig::load_or_default(Path::new(&path)),
        None => RoseConfig::default(),
    };
    let cycles: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(1);

    let mut animator = match RoseAnimator::new(&config) {
        Ok(animator) => animator,
        Err(e) => {
            log::error!("invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let frame_time = Duration::from_secs_f64(1.0 / config.target_fps.max(1) as f64);
    let total_frames = cycles * config.stage_durations.total();
    log::info!(
        "running {cycles} cycle(s), {total_frames} frames at {} fps",
        config.target_fps
    );
    log_season(&animator);

    let mut last_stage = animator.stage();
    let mut last_season = animator.season();
    for _ in 0..total_frames {
        let frame_start = Instant::now();
        animator.tick();

        if animator.stage() != last_stage {
            let falling = animator
                .petals()
                .petals()
                .iter()
                .filter(|p| p.is_falling)
                .count();
            log::info!(
                "frame {:>5}: {} -> {} ({} petals falling, {} particles, glow {:.2})",
                animator.frame_count(),
                last_stage.as_str(),
                animator.stage().as_str(),
                falling,
                animator.particle_count(),
                animator.glow_intensity(),
            );
            last_stage = animator.stage();
        }
        if animator.season() != last_season {
            log_season(&animator);
            last_season = animator.season();
        }

        thread::sleep(frame_time.saturating_sub(frame_start.elapsed()));
    }

    log::info!(
        "finished at frame {} ({} live particles)",
        animator.frame_count(),
        animator.particle_count()
    );
}

fn log_season(animator: &RoseAnimator) {
    let facts = facts::for_season(animator.season());
    log::info!(
        "season {}: {} | {} | {} bloom days | {}",
        facts.season_name,
        facts.months,
        facts.temperature_range,
        facts.bloom_period_days,
        facts.growth_phase,
    );
}
