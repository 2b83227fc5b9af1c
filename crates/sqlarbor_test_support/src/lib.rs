pub mod fake_driver;
pub mod fixtures;
pub mod scripted_host;

pub use fake_driver::{FakeDriver, FakeDriverStats, FakeQueryOutcome};
pub use scripted_host::ScriptedHost;
