/***************************************/
/*        3rd party libraries          */
/***************************************/
use std::collections::{BTreeSet, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::HallCall;

/**
 * Pending passengers, per floor and per hall call direction.
 *
 * Each floor holds one set of target floors for up-bound passengers and one for
 * down-bound passengers. Every set sits behind its own lock, so activity on one
 * floor never blocks an elevator working another floor.
 *
 * Floors are 0-indexed. Methods taking a floor panic if it is outside
 * `0..n_floors`; callers validate external input before reaching the board.
 *
 * # Invariants
 * - a target in the up set of floor `f` is greater than `f`
 * - a target in the down set of floor `f` is less than `f`
 */
pub struct RequestBoard {
    up: Vec<Mutex<HashSet<u8>>>,
    down: Vec<Mutex<HashSet<u8>>>,
}

impl RequestBoard {
    pub fn new(n_floors: u8) -> RequestBoard {
        let slots = || -> Vec<Mutex<HashSet<u8>>> {
            (0..n_floors).map(|_| Mutex::new(HashSet::new())).collect()
        };
        RequestBoard {
            up: slots(),
            down: slots(),
        }
    }

    pub fn n_floors(&self) -> u8 {
        self.up.len() as u8
    }

    /// Queues a passenger at `source` heading to `target`. Returns the hall call
    /// it was queued under, or `None` when the trip goes nowhere.
    pub fn submit(&self, source: u8, target: u8) -> Option<HallCall> {
        assert!(target < self.n_floors(), "target floor {} out of range", target);
        let call = HallCall::for_trip(source, target)?;
        self.slot(call, source).insert(target);
        Some(call)
    }

    pub fn has_request(&self, call: HallCall, floor: u8) -> bool {
        !self.slot(call, floor).is_empty()
    }

    /// Occupancy per floor. Each floor is read under its own lock, the vector
    /// as a whole is not one atomic view.
    pub fn snapshot(&self, call: HallCall) -> Vec<bool> {
        (0..self.n_floors())
            .map(|floor| self.has_request(call, floor))
            .collect()
    }

    /// Takes every target waiting at `floor` for `call`, leaving the set empty.
    pub fn drain(&self, call: HallCall, floor: u8) -> HashSet<u8> {
        std::mem::take(&mut *self.slot(call, floor))
    }

    pub fn pending(&self, call: HallCall, floor: u8) -> BTreeSet<u8> {
        self.slot(call, floor).iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.up
            .iter()
            .chain(self.down.iter())
            .map(|slot| lock(slot).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has_up_request(&self, floor: u8) -> bool {
        self.has_request(HallCall::Up, floor)
    }

    pub fn has_down_request(&self, floor: u8) -> bool {
        self.has_request(HallCall::Down, floor)
    }

    pub fn snapshot_up(&self) -> Vec<bool> {
        self.snapshot(HallCall::Up)
    }

    pub fn snapshot_down(&self) -> Vec<bool> {
        self.snapshot(HallCall::Down)
    }

    pub fn drain_up(&self, floor: u8) -> HashSet<u8> {
        self.drain(HallCall::Up, floor)
    }

    pub fn drain_down(&self, floor: u8) -> HashSet<u8> {
        self.drain(HallCall::Down, floor)
    }

    pub fn pending_up(&self, floor: u8) -> BTreeSet<u8> {
        self.pending(HallCall::Up, floor)
    }

    pub fn pending_down(&self, floor: u8) -> BTreeSet<u8> {
        self.pending(HallCall::Down, floor)
    }

    fn slot(&self, call: HallCall, floor: u8) -> MutexGuard<'_, HashSet<u8>> {
        let slots = match call {
            HallCall::Up => &self.up,
            HallCall::Down => &self.down,
        };
        lock(&slots[floor as usize])
    }
}

// A panic while holding a slot cannot leave the set half-updated.
fn lock(slot: &Mutex<HashSet<u8>>) -> MutexGuard<'_, HashSet<u8>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}
