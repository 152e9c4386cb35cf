//! Load pipeline and selection handling for Limitrofe.
//!
//! This crate ties the text source and the dataset together into the
//! load lifecycle ([`session`]) and defines the output boundaries the
//! front ends implement ([`display`]).

pub mod display;
pub mod session;

pub use display::{OptionBuffer, ResultDisplay, ResultView, SelectableListSink, selector_options};
pub use session::{
    LoadFailure, LoadState, LoadStatus, LoadTicket, ProgressReporter, Session, SilentProgress,
    session_from_config,
};
