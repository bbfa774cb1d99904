pub mod plan;
pub mod reports;
pub mod script;
pub mod seeds;
pub mod tester;

pub use script::{expand_steps, parse_script};
pub use seeds::resolve_seed_inputs;
pub use tester::{ForgeTester, ScenarioResult};
