use crate::config::ElevatorConfig;
use crate::request_board::RequestBoard;
use crate::shared::{Direction, ElevatorStatus, HallCall, StopFlag};
use crossbeam_channel as cbc;
use log::{debug, info};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/**
 * Runs one elevator with a SCAN discipline over the shared request board.
 *
 * The elevator keeps moving in its direction while its route has stops or the
 * board has requests ahead of it in that direction. When both run out it goes
 * idle, and an idle elevator picks its next direction from the board: local
 * requests first, then the lowest up-request, then the highest down-request.
 * With nothing pending anywhere it blocks until a submission wakes it.
 *
 * # Fields
 * - `id`:              Index of the elevator in the building.
 * - `n_floors`:        Number of floors in the building.
 * - `floor`:           Current floor (0-indexed).
 * - `direction`:       Committed travel direction, or `Idle`.
 * - `route`:           Floors the elevator has to stop at.
 * - `boarded`:         Passengers picked up so far.
 * - `terminated`:      Latched once cancellation has been observed.
 * - `travel_time`:     Time to move one floor.
 * - `dwell_time`:      Time spent at a floor when passengers leave or board.
 * - `board`:           Shared pending requests.
 * - `stop`:            Process-wide run flag.
 * - `wake_rx`:         One message per request submission.
 * - `terminate_rx`:    Cancellation from the dispatcher.
 * - `state_tx`:        Publishes an `ElevatorStatus` after every change.
 */
pub struct Elevator {
    id: usize,
    n_floors: u8,
    floor: u8,
    direction: Direction,
    route: BTreeSet<u8>,
    boarded: u64,
    terminated: bool,
    travel_time: Duration,
    dwell_time: Duration,

    board: Arc<RequestBoard>,
    stop: StopFlag,
    wake_rx: cbc::Receiver<()>,
    terminate_rx: cbc::Receiver<()>,
    state_tx: cbc::Sender<ElevatorStatus>,
}

/// Outcome of a single `Elevator::step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Moved one floor in the committed direction.
    Moved,
    /// Was idle and boarded passengers waiting at its own floor.
    Boarded,
    /// Was idle and travelled to the floor of a pending request.
    Dispatched,
    /// Ran out of work in its direction and became idle.
    Stopped,
    /// Idle with nothing pending anywhere.
    Waiting,
    /// Saw cancellation at a checkpoint and did nothing further.
    Cancelled,
}

impl Elevator {
    pub fn new(
        config: &ElevatorConfig,
        id: usize,
        board: Arc<RequestBoard>,
        stop: StopFlag,
        wake_rx: cbc::Receiver<()>,
        terminate_rx: cbc::Receiver<()>,
        state_tx: cbc::Sender<ElevatorStatus>,
    ) -> Elevator {
        Elevator {
            id,
            n_floors: board.n_floors(),
            floor: config.start_floor,
            direction: Direction::Idle,
            route: BTreeSet::new(),
            boarded: 0,
            terminated: false,
            travel_time: config.travel_duration(),
            dwell_time: config.dwell_duration(),
            board,
            stop,
            wake_rx,
            terminate_rx,
            state_tx,
        }
    }

    pub fn run(mut self) {
        info!("Elevator {} started at floor {}", self.id, self.floor);
        self.publish();

        loop {
            match self.step() {
                Step::Cancelled => break,
                Step::Waiting if !self.wait_for_work() => break,
                _ => {}
            }
        }

        info!(
            "Elevator {} stopped at floor {} with route {:?}",
            self.id, self.floor, self.route
        );
    }

    /// One iteration: drop off, then either scan onward or dispatch from idle.
    /// Cancellation is checked before every dwell and every move.
    pub fn step(&mut self) -> Step {
        if self.cancelled() {
            return Step::Cancelled;
        }
        self.drop_off();
        if self.cancelled() {
            return Step::Cancelled;
        }

        match self.direction.hall_call() {
            Some(call) => self.scan(call),
            None => self.dispatch_idle(),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn floor(&self) -> u8 {
        self.floor
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn route(&self) -> &BTreeSet<u8> {
        &self.route
    }

    pub fn status(&self) -> ElevatorStatus {
        ElevatorStatus {
            id: self.id,
            floor: self.floor,
            direction: self.direction,
            route: self.route.iter().copied().collect(),
            boarded: self.boarded,
        }
    }

    fn scan(&mut self, call: HallCall) -> Step {
        let waiting = self.board.drain(call, self.floor);
        self.board_passengers(waiting);
        if self.cancelled() {
            return Step::Cancelled;
        }

        if self.route.is_empty() {
            self.look_ahead(call);
        }

        if self.route.is_empty() {
            debug!("Elevator {} has no more work heading {:?}", self.id, call);
            self.set_direction(Direction::Idle);
            return Step::Stopped;
        }

        self.move_one(call);
        Step::Moved
    }

    // Floors ahead with a request in the same direction become stops.
    fn look_ahead(&mut self, call: HallCall) {
        let pending = self.board.snapshot(call);
        let ahead = match call {
            HallCall::Up => (self.floor + 1)..self.n_floors,
            HallCall::Down => 0..self.floor,
        };

        let stops: Vec<u8> = ahead.filter(|&floor| pending[floor as usize]).collect();
        if !stops.is_empty() {
            debug!("Elevator {} extends route with {:?}", self.id, stops);
            self.route.extend(stops);
            self.publish();
        }
    }

    fn dispatch_idle(&mut self) -> Step {
        // Down before up at the current floor
        for call in [HallCall::Down, HallCall::Up] {
            let waiting = self.board.drain(call, self.floor);
            if !waiting.is_empty() {
                self.set_direction(call.into());
                self.take_on(waiting);
                return Step::Boarded;
            }
        }

        let up = self.board.snapshot(HallCall::Up);
        if let Some(floor) = up.iter().position(|&pending| pending) {
            if !self.travel_to(floor as u8) {
                return Step::Cancelled;
            }
            self.set_direction(Direction::Up);
            return Step::Dispatched;
        }

        let down = self.board.snapshot(HallCall::Down);
        if let Some(floor) = down.iter().rposition(|&pending| pending) {
            if !self.travel_to(floor as u8) {
                return Step::Cancelled;
            }
            self.set_direction(Direction::Down);
            return Step::Dispatched;
        }

        Step::Waiting
    }

    fn drop_off(&mut self) {
        if self.route.contains(&self.floor) {
            thread::sleep(self.dwell_time);
            self.route.remove(&self.floor);
            debug!("Elevator {} dropped off at floor {}", self.id, self.floor);
            self.publish();
        }
    }

    // Pickup on the way costs a dwell at the floor.
    fn board_passengers(&mut self, targets: HashSet<u8>) {
        if targets.is_empty() {
            return;
        }
        thread::sleep(self.dwell_time);
        self.take_on(targets);
    }

    // Idle pickup boards without a dwell.
    fn take_on(&mut self, targets: HashSet<u8>) {
        debug!(
            "Elevator {} boarded {} passenger(s) at floor {} for {:?}",
            self.id,
            targets.len(),
            self.floor,
            targets
        );
        self.boarded += targets.len() as u64;
        self.route.extend(targets);
        self.publish();
    }

    // Straight to `target`, no stops on the way. Checks cancellation per floor,
    // false when cancelled before arriving.
    fn travel_to(&mut self, target: u8) -> bool {
        debug!(
            "Elevator {} dispatched from floor {} to floor {}",
            self.id, self.floor, target
        );
        while self.floor != target && !self.cancelled() {
            let call = if target > self.floor {
                HallCall::Up
            } else {
                HallCall::Down
            };
            self.move_one(call);
        }
        self.floor == target && !self.cancelled()
    }

    fn move_one(&mut self, call: HallCall) {
        thread::sleep(self.travel_time);
        match call {
            HallCall::Up => {
                debug_assert!(self.floor + 1 < self.n_floors);
                self.floor += 1;
            }
            HallCall::Down => {
                debug_assert!(self.floor > 0);
                self.floor -= 1;
            }
        }
        debug!("Elevator {} at floor {}", self.id, self.floor);
        self.publish();
    }

    fn set_direction(&mut self, direction: Direction) {
        if self.direction != direction {
            self.direction = direction;
            self.publish();
        }
    }

    fn publish(&self) {
        let _ = self.state_tx.send(self.status());
    }

    fn cancelled(&mut self) -> bool {
        if !self.terminated {
            self.terminated = self.stop.is_stopped()
                || !matches!(self.terminate_rx.try_recv(), Err(cbc::TryRecvError::Empty));
        }
        self.terminated
    }

    // Blocks until a submission or cancellation. False means stop.
    fn wait_for_work(&mut self) -> bool {
        debug!("Elevator {} idle at floor {}", self.id, self.floor);
        let woken = cbc::select! {
            recv(self.wake_rx) -> wake => wake.is_ok(),
            recv(self.terminate_rx) -> _ => false,
        };
        if !woken {
            self.terminated = true;
            return false;
        }

        // Wakes that queued up while busy are covered by the next scan
        while self.wake_rx.try_recv().is_ok() {}
        !self.cancelled()
    }
}
