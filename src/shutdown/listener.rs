use crate::config::ShutdownConfig;
use crate::shared::StopFlag;
use log::{debug, info, warn};
use std::io::BufRead;

/// Watches an input stream for the sentinel line and sets the stop flag.
/// Any other line is ignored. End of input ends the listener without stopping.
pub struct ShutdownListener<R> {
    input: R,
    sentinel: String,
    stop: StopFlag,
}

impl<R: BufRead> ShutdownListener<R> {
    pub fn new(config: &ShutdownConfig, stop: StopFlag, input: R) -> ShutdownListener<R> {
        ShutdownListener {
            input,
            sentinel: config.sentinel.clone(),
            stop,
        }
    }

    pub fn run(self) {
        info!("Type \"{}\" and press enter to stop", self.sentinel);

        for line in self.input.lines() {
            match line {
                Ok(line) if line.trim() == self.sentinel => {
                    if self.stop.stop() {
                        info!("Shutdown signal received");
                    }
                    return;
                }
                Ok(line) => debug!("Ignoring input {:?}", line),
                Err(e) => {
                    warn!("Failed to read shutdown input: {}", e);
                    return;
                }
            }
        }

        debug!("Shutdown input closed");
    }
}
