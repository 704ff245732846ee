use crate::config::GeneratorConfig;
use crate::dispatcher::RequestPort;
use crate::shared::StopFlag;
use crossbeam_channel as cbc;
use log::{error, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/**
 * Simulates passengers arriving at the building.
 *
 * Every `interval` a passenger shows up at a random floor wanting to go to
 * another random floor. Both floors are drawn uniformly from `1..=n_floors`;
 * a draw where they match is thrown away and drawn again.
 *
 * # Fields
 * - `port`:            Where requests are submitted.
 * - `n_floors`:        Number of floors in the building.
 * - `interval`:        Pause between two passengers.
 * - `rng`:             Seeded from the config when given, from entropy otherwise.
 * - `stop`:            Process-wide run flag.
 * - `terminate_rx`:    Cancellation from the dispatcher.
 */
pub struct RequestGenerator {
    port: RequestPort,
    n_floors: u8,
    interval: Duration,
    rng: StdRng,
    stop: StopFlag,
    terminate_rx: cbc::Receiver<()>,
}

impl RequestGenerator {
    pub fn new(
        config: &GeneratorConfig,
        port: RequestPort,
        stop: StopFlag,
        terminate_rx: cbc::Receiver<()>,
    ) -> RequestGenerator {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        RequestGenerator {
            n_floors: port.n_floors(),
            port,
            interval: Duration::from_millis(config.interval),
            rng,
            stop,
            terminate_rx,
        }
    }

    pub fn run(mut self) {
        info!("Request generator started");

        while !self.stop.is_stopped() {
            let (source, target) = self.draw();
            if let Err(e) = self.port.submit_request(source, target) {
                error!("Generated request {} -> {} was rejected: {}", source, target, e);
            }

            cbc::select! {
                recv(self.terminate_rx) -> _ => break,
                default(self.interval) => {}
            }
        }

        info!("Request generator stopped");
    }

    /// A 1-indexed (source, target) pair with source != target.
    pub fn draw(&mut self) -> (u8, u8) {
        loop {
            let source = self.rng.gen_range(1..=self.n_floors);
            let target = self.rng.gen_range(1..=self.n_floors);
            if source != target {
                return (source, target);
            }
        }
    }
}

/***************************************/
/*             Unit tests              */
/***************************************/
