//! Multi-elevator dispatch simulator.
//!
//! Elevators scan a shared per-floor request board on their own threads; the
//! dispatcher owns the board, wakes idle elevators on new requests and drives
//! the status reports and shutdown.

pub mod config;
pub mod dispatcher;
pub mod elevator;
pub mod generator;
pub mod request_board;
pub mod shared;
pub mod shutdown;
pub mod status;

pub use dispatcher::Dispatcher;
pub use dispatcher::RequestPort;
pub use elevator::Elevator;
pub use request_board::RequestBoard;
