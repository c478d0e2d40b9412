// ABOUTME: Site lifecycle orchestration using the type state pattern.
// ABOUTME: Exports state markers, the Site struct, the shared Enabler and the Controller.

mod controller;
mod enable;
mod site;
mod state;
mod transitions;

pub use controller::{Controller, CreateOutcome, EnableOutcome};
pub use enable::Enabler;
pub use site::Site;
pub use state::{
    Drafted, Enabled, Invalid, LinkOutcome, Reloaded, Rendered, Requested, Validated, Written,
};
pub use transitions::ValidationResult;
