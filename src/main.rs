//! Windmill headless driver
//!
//! Scatters a seeded point cloud, runs the windmill on a fixed timestep and
//! prints the resulting transition history as JSON.
//!
//! Usage: `windmill [seed] [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use glam::Vec2;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;
    use serde::Serialize;

    use windmill::WindmillSettings;
    use windmill::consts::*;
    use windmill::sim::{PivotSwitch, TickInput, Windmill, WindmillSnapshot, tick};

    /// Frame time of the simulated host
    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Simulated run length in seconds
    const RUN_SECONDS: f32 = 30.0;
    const POINT_COUNT: usize = 9;
    const SCATTER_RADIUS: f32 = 200.0;

    #[derive(Serialize)]
    struct Summary {
        seed: u64,
        switches: usize,
        final_state: WindmillSnapshot,
    }

    /// Fixed-timestep host loop
    struct Host {
        windmill: Windmill,
        accumulator: f32,
        input: TickInput,
        ray_length: f32,
        switches: Vec<PivotSwitch>,
    }

    impl Host {
        fn new(settings: WindmillSettings) -> Self {
            let ray_length = settings.view_height * 20.0;
            Self {
                windmill: Windmill::new(settings),
                accumulator: 0.0,
                input: TickInput::default(),
                ray_length,
                switches: Vec::new(),
            }
        }

        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let switch = tick(&mut self.windmill, &self.input, SIM_DT, self.ray_length);
                if let Some(switch) = switch {
                    log::info!(
                        "Pivot {} -> {} at ({:.1}, {:.1})",
                        switch.from,
                        switch.to,
                        switch.position.x,
                        switch.position.y
                    );
                    self.switches.push(switch);
                }
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input = TickInput::default();
            }
        }
    }

    fn scatter(seed: u64) -> Vec<Vec2> {
        let mut rng = Pcg32::seed_from_u64(seed);
        (0..POINT_COUNT)
            .map(|_| {
                Vec2::new(
                    rng.random_range(-SCATTER_RADIUS..SCATTER_RADIUS),
                    rng.random_range(-SCATTER_RADIUS..SCATTER_RADIUS),
                )
            })
            .collect()
    }

    pub fn run() {
        env_logger::init();
        log::info!("Windmill (native) starting...");

        let mut args = std::env::args().skip(1);
        let seed = args
            .next()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(0x5eed);
        let settings = match args.next() {
            Some(path) => WindmillSettings::load(path),
            None => WindmillSettings::default(),
        };
        log::info!("Scattering {} points with seed: {}", POINT_COUNT, seed);

        let mut host = Host::new(settings);
        host.input.add_points = scatter(seed);
        host.input.start = true;

        let frames = (RUN_SECONDS / FRAME_DT) as u32;
        for frame in 0..frames {
            // Speed up halfway through, like pressing the right arrow
            if frame == frames / 2 {
                host.input.speed_factor = Some(1.1);
            }
            host.update(FRAME_DT);
        }

        let summary = Summary {
            seed,
            switches: host.switches.len(),
            final_state: host.windmill.snapshot(),
        };
        log::info!(
            "{} switches, {} distinct edges",
            summary.switches,
            summary.final_state.edges.len()
        );

        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Failed to serialize summary: {}", e),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library-only on the web; hosts drive `Windmill` directly
}
