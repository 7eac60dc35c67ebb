//! Demo command built on `cliframe`.
//!
//! `echo` prints its positional words, optionally upper-cased and repeated.
//! It exists to exercise the run loop end to end: option dispatch, debug
//! hooks, error translation and exit status.
pub mod echo;
pub mod logging;

pub use echo::EchoApp;
pub use logging::select_logger;
