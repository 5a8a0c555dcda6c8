//! Orbit Break entry point
//!
//! Native: headless runner that steps the simulation and writes PNG frames.
//! Web: hands off to `platform::web`, which drives requestAnimationFrame.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    orbit_break::platform::web::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::error::Error;
    use std::path::PathBuf;

    use clap::{Parser, ValueEnum};

    use orbit_break::consts::{SURFACE_HEIGHT, SURFACE_WIDTH};
    use orbit_break::renderer::Canvas;
    use orbit_break::sim::{MotionState, RotationDirection, SimParams};
    use orbit_break::{Session, Settings};

    #[derive(Debug, Clone, Copy, ValueEnum)]
    enum Direction {
        Clockwise,
        Counterclockwise,
    }

    impl From<Direction> for RotationDirection {
        fn from(d: Direction) -> Self {
            match d {
                Direction::Clockwise => RotationDirection::Clockwise,
                Direction::Counterclockwise => RotationDirection::CounterClockwise,
            }
        }
    }

    /// Run the circular-motion simulation headless and export frames
    #[derive(Debug, Parser)]
    #[command(version, about)]
    struct Args {
        /// Number of frames to run
        #[arg(short, long, default_value_t = 300)]
        frames: u64,

        /// Body mass in kg (0.01 - 10)
        #[arg(long)]
        mass: Option<f32>,

        /// Angular velocity in rad/s (0 - 2)
        #[arg(long)]
        omega: Option<f32>,

        /// Rope length in m (0 - 10)
        #[arg(long)]
        radius: Option<f32>,

        /// Rope tension limit in N (0 - 10)
        #[arg(long)]
        max_tension: Option<f32>,

        /// Rotation direction
        #[arg(long, value_enum)]
        direction: Option<Direction>,

        /// JSON file with initial parameters
        #[arg(long)]
        params: Option<PathBuf>,

        /// JSON file with view settings
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Write the final frame to this PNG
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory for periodic snapshots
        #[arg(long)]
        snapshot_dir: Option<PathBuf>,

        /// Snapshot every K frames (with --snapshot-dir)
        #[arg(long, default_value_t = 30)]
        snapshot_every: u64,

        /// Start paused (frames render but do not step)
        #[arg(long)]
        paused: bool,
    }

    impl Args {
        /// Params from file (or defaults) with CLI overrides, clamped to control ranges
        fn sim_params(&self) -> Result<SimParams, Box<dyn Error>> {
            let mut params = match &self.params {
                Some(path) => SimParams::load_from(path)?,
                None => SimParams::default(),
            };
            if let Some(mass) = self.mass {
                params.mass = mass;
            }
            if let Some(omega) = self.omega {
                params.angular_velocity = omega;
            }
            if let Some(radius) = self.radius {
                params.radius = radius;
            }
            if let Some(max_tension) = self.max_tension {
                params.max_tension = max_tension;
            }
            if let Some(direction) = self.direction {
                params.rotation_direction = direction.into();
            }
            Ok(params.clamped_to_controls())
        }

        fn view_settings(&self) -> Result<Settings, Box<dyn Error>> {
            Ok(match &self.settings {
                Some(path) => Settings::load_from(path)?,
                None => Settings::default(),
            })
        }
    }

    pub fn run() -> Result<(), Box<dyn Error>> {
        env_logger::init();
        let args = Args::parse();
        log::info!("Orbit Break (native) starting...");

        let mut session = Session::new(args.sim_params()?, args.view_settings()?);
        let mut canvas = Canvas::new(SURFACE_WIDTH as usize, SURFACE_HEIGHT as usize);

        session.set_paused(args.paused);
        session.start();

        let every = args.snapshot_every.max(1);
        let mut broke_at = None;
        for frame in 0..args.frames {
            session.frame(&mut canvas);

            if broke_at.is_none() && session.model().is_broken() {
                broke_at = Some(frame);
            }

            if let Some(dir) = &args.snapshot_dir {
                if frame % every == 0 {
                    canvas.save_png(&dir.join(format!("frame_{:05}.png", frame)))?;
                }
            }
        }
        session.stop();

        // With no frames run, still export the initial configuration
        if args.frames == 0 {
            session.redraw(&mut canvas);
        }

        if let Some(path) = &args.output {
            canvas.save_png(path)?;
            log::info!("Final frame written to {}", path.display());
        }

        let model = session.model();
        let state = match model.state() {
            MotionState::Normal => "normal".to_string(),
            MotionState::Broken => match broke_at {
                Some(frame) => format!("broken (frame {})", frame),
                None => "broken".to_string(),
            },
        };
        println!("frames:      {}", session.driver().frames());
        println!("state:       {}", state);
        println!("angle:       {:.4} rad", model.angle());
        println!("force:       {:.3} N (limit {:.3} N)", model.centripetal_force(), model.max_tension);
        println!("speed:       {:.3} m/s", model.linear_velocity());
        println!("trajectory:  {} points", model.trajectory().len());
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(e) = native::run() {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
