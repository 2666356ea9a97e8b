//! Monte Carlo trial simulation.
//!
//! # Thread Pool Configuration
//!
//! [`Strategy::TaskParallel`] runs on Rayon's global work-stealing pool,
//! which defaults to one thread per logical CPU. [`Strategy::DataParallel`]
//! builds its own fixed-size pool, sized by [`ExecutionConfig::max_threads`]
//! (0 = hardware concurrency).
//!
//! # Example
//!
//! ```
//! use var_engine::simulation::{Engine, Strategy};
//!
//! let mut engine = Engine::new(10_000, 10, 0.95)?;
//! for strategy in Strategy::ALL {
//!     engine.run(strategy)?;
//!     let var = engine.value_at_risk()?;
//!     assert!(var.is_finite());
//! }
//! # Ok::<(), var_engine::SimulationError>(())
//! ```

mod config;
mod engine;
mod executor;
mod strategy;
mod trial;

pub use config::{ExecutionConfig, SimulationConfig};
pub use engine::{Engine, RunStats};
pub use executor::{DataParallel, ExecutionStrategy, Sequential, TaskParallel, TrialBody};
pub use strategy::Strategy;
pub use trial::{TrialEngine, simulate_losses};
