pub mod listener;

pub use listener::ShutdownListener;
