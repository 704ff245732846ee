pub mod error;
pub mod macros;
pub mod stop;
pub mod structs;

pub use error::ConfigError;
pub use error::DispatchError;
pub use stop::StopFlag;
pub use structs::BuildingSnapshot;
pub use structs::Direction;
pub use structs::ElevatorStatus;
pub use structs::FloorSnapshot;
pub use structs::HallCall;
