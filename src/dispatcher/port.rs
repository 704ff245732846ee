/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{debug, warn};
use std::sync::Arc;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::request_board::RequestBoard;
use crate::shared::{DispatchError, HallCall};

/**
 * Entry point for new trip requests.
 *
 * Cheap to clone, so every producer (the request generator, tests, an embedding
 * application) can own one. Floors given here are 1-indexed.
 *
 * A queued request wakes every elevator. Nothing is assigned to a particular
 * elevator: each one finds the request on its own next scan of the board.
 * Wake channels are expected to be bounded to one message, so a busy elevator
 * holds at most one pending wake.
 */
#[derive(Clone)]
pub struct RequestPort {
    board: Arc<RequestBoard>,
    wake_txs: Vec<cbc::Sender<()>>,
}

impl RequestPort {
    pub fn new(board: Arc<RequestBoard>, wake_txs: Vec<cbc::Sender<()>>) -> RequestPort {
        RequestPort { board, wake_txs }
    }

    pub fn n_floors(&self) -> u8 {
        self.board.n_floors()
    }

    pub fn board(&self) -> &RequestBoard {
        &self.board
    }

    /// Returns the hall call the passenger now waits under, `None` when source
    /// and target are the same floor.
    pub fn submit_request(
        &self,
        source: u8,
        target: u8,
    ) -> Result<Option<HallCall>, DispatchError> {
        let (from, to) = match (self.to_internal(source), self.to_internal(target)) {
            (Ok(from), Ok(to)) => (from, to),
            (Err(e), _) | (_, Err(e)) => {
                warn!("Rejected request {} -> {}: {}", source, target, e);
                return Err(e);
            }
        };

        let call = self.board.submit(from, to);
        match call {
            Some(call) => {
                debug!("New {:?} request at floor {} to floor {}", call, from, to);
                // A full channel already holds a wake the elevator has not seen
                for wake_tx in &self.wake_txs {
                    let _ = wake_tx.try_send(());
                }
            }
            None => debug!("Ignored request {} -> {}", source, target),
        }
        Ok(call)
    }

    fn to_internal(&self, floor: u8) -> Result<u8, DispatchError> {
        let n_floors = self.n_floors();
        if floor == 0 || floor > n_floors {
            return Err(DispatchError::InvalidFloor { floor, n_floors });
        }
        Ok(floor - 1)
    }
}
