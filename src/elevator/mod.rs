pub mod fsm;

pub use fsm::Elevator;
pub use fsm::Step;
