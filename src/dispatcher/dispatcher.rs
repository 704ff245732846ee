/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{error, info};
use std::io::{BufRead, Write};
use std::sync::Arc;
use std::thread::{Builder, JoinHandle};
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::Config;
use crate::dispatcher::RequestPort;
use crate::elevator::Elevator;
use crate::generator::RequestGenerator;
use crate::request_board::RequestBoard;
use crate::shared::{
    BuildingSnapshot, DispatchError, ElevatorStatus, FloorSnapshot, HallCall, StopFlag,
};
use crate::shutdown::ShutdownListener;
use crate::status::StatusReporter;

/***************************************/
/*             Public API              */
/***************************************/

/**
 * Owns the building: the request board, the elevators and the stop flag.
 *
 * Elevators are created with the dispatcher and live until shutdown. Each one
 * runs on its own thread and publishes its state over `state_rx`; the
 * dispatcher keeps the latest status per elevator for snapshots.
 *
 * Lifecycle: `new` -> `start` -> (`snapshot` / `submit_request`)* -> `shutdown`.
 * `run` does all of it, plus the request generator, the shutdown listener and
 * periodic status reports, and returns once the stop flag is set.
 */
pub struct Dispatcher {
    config: Config,
    board: Arc<RequestBoard>,
    port: RequestPort,
    stop: StopFlag,

    // Elevators waiting to be started
    elevators: Vec<Elevator>,
    workers: Vec<JoinHandle<()>>,
    terminate_txs: Vec<cbc::Sender<()>>,

    state_rx: cbc::Receiver<ElevatorStatus>,
    statuses: Vec<ElevatorStatus>,
}

impl Dispatcher {
    pub fn new(config: Config) -> Result<Dispatcher, DispatchError> {
        let n_floors = config.building.n_floors;
        let n_elevators = config.building.n_elevators;
        let start_floor = config.elevator.start_floor;

        if n_floors < 2 {
            return Err(DispatchError::InvalidBuilding(format!(
                "at least 2 floors required, got {}",
                n_floors
            )));
        }
        if n_elevators < 1 {
            return Err(DispatchError::InvalidBuilding(
                "at least 1 elevator required".to_string(),
            ));
        }
        if start_floor >= n_floors {
            return Err(DispatchError::InvalidBuilding(format!(
                "start floor {} is not below {} floors",
                start_floor, n_floors
            )));
        }

        let board = Arc::new(RequestBoard::new(n_floors));
        let stop = StopFlag::new();
        let (state_tx, state_rx) = cbc::unbounded::<ElevatorStatus>();

        let mut elevators = Vec::with_capacity(n_elevators);
        let mut wake_txs = Vec::with_capacity(n_elevators);
        let mut terminate_txs = Vec::with_capacity(n_elevators);
        for id in 0..n_elevators {
            // One pending wake is enough to trigger a rescan
            let (wake_tx, wake_rx) = cbc::bounded::<()>(1);
            let (terminate_tx, terminate_rx) = cbc::unbounded::<()>();
            elevators.push(Elevator::new(
                &config.elevator,
                id,
                board.clone(),
                stop.clone(),
                wake_rx,
                terminate_rx,
                state_tx.clone(),
            ));
            wake_txs.push(wake_tx);
            terminate_txs.push(terminate_tx);
        }

        let statuses = (0..n_elevators)
            .map(|id| ElevatorStatus::new(id, start_floor))
            .collect();

        Ok(Dispatcher {
            port: RequestPort::new(board.clone(), wake_txs),
            config,
            board,
            stop,
            elevators,
            workers: Vec::new(),
            terminate_txs,
            state_rx,
            statuses,
        })
    }

    /// Runs the whole simulation until the stop flag is set. `input` feeds the
    /// shutdown listener, `output` receives the status reports.
    pub fn run<R, W>(mut self, input: R, output: W) -> Result<(), DispatchError>
    where
        R: BufRead + Send + 'static,
        W: Write,
    {
        // Blocks on input, so it is never joined
        let listener = ShutdownListener::new(&self.config.shutdown, self.stop.clone(), input);
        Builder::new()
            .name("shutdown_listener".into())
            .spawn(move || listener.run())?;

        if let Err(e) = self.start() {
            self.shutdown();
            return Err(e);
        }

        let mut reporter = StatusReporter::new(self.config.status.format, output);
        let ticker = cbc::tick(Duration::from_millis(self.config.status.interval));

        // Main loop
        loop {
            if ticker.recv().is_err() || self.stop.is_stopped() {
                break;
            }

            let snapshot = self.snapshot();
            if let Err(e) = reporter.report(&snapshot) {
                error!("Failed to write status report: {}", e);
                self.stop.stop();
            }
        }

        self.shutdown();
        Ok(())
    }

    /// Spawns the elevator workers and, if enabled, the request generator.
    pub fn start(&mut self) -> Result<(), DispatchError> {
        for elevator in self.elevators.drain(..) {
            let name = format!("elevator_{}", elevator.id());
            let handle = Builder::new().name(name).spawn(move || elevator.run())?;
            self.workers.push(handle);
        }

        if self.config.generator.enabled {
            let (terminate_tx, terminate_rx) = cbc::unbounded::<()>();
            let generator = RequestGenerator::new(
                &self.config.generator,
                self.port.clone(),
                self.stop.clone(),
                terminate_rx,
            );
            let handle = Builder::new()
                .name("request_generator".into())
                .spawn(move || generator.run())?;
            self.terminate_txs.push(terminate_tx);
            self.workers.push(handle);
        }

        info!(
            "Dispatcher started {} elevator(s) on {} floors",
            self.n_elevators(),
            self.n_floors()
        );
        Ok(())
    }

    /// Sets the stop flag, cancels every worker and waits for them to finish.
    pub fn shutdown(&mut self) {
        if self.stop.stop() {
            info!("Stop requested");
        }

        for terminate_tx in &self.terminate_txs {
            let _ = terminate_tx.send(());
        }
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                error!("A worker thread panicked");
            }
        }

        self.refresh();
        info!("Dispatcher stopped");
    }

    /// 1-indexed floors, see `RequestPort::submit_request`.
    pub fn submit_request(
        &self,
        source: u8,
        target: u8,
    ) -> Result<Option<HallCall>, DispatchError> {
        self.port.submit_request(source, target)
    }

    pub fn port(&self) -> RequestPort {
        self.port.clone()
    }

    pub fn stop_flag(&self) -> StopFlag {
        self.stop.clone()
    }

    pub fn n_floors(&self) -> u8 {
        self.board.n_floors()
    }

    pub fn n_elevators(&self) -> usize {
        self.statuses.len()
    }

    /// Latest published status of every elevator, as of the last refresh.
    pub fn elevator_states(&self) -> &[ElevatorStatus] {
        &self.statuses
    }

    /// Pulls in every status the elevators published since the last call.
    pub fn refresh(&mut self) {
        for status in self.state_rx.try_iter() {
            let id = status.id;
            self.statuses[id] = status;
        }
    }

    pub fn snapshot(&mut self) -> BuildingSnapshot {
        self.refresh();

        let floors = (0..self.n_floors())
            .rev()
            .map(|floor| FloorSnapshot {
                floor,
                elevators: self
                    .statuses
                    .iter()
                    .filter(|status| status.floor == floor)
                    .map(|status| status.id)
                    .collect(),
                down: self.board.pending_down(floor),
                up: self.board.pending_up(floor),
            })
            .collect();

        BuildingSnapshot {
            floors,
            elevators: self.statuses.clone(),
        }
    }
}
