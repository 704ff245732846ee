pub mod dispatcher;
mod dispatcher_tests;
pub mod port;

pub use dispatcher::Dispatcher;
pub use port::RequestPort;
