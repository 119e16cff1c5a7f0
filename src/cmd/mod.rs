//! CLI command implementations.
//!
//! | Module     | Commands handled      |
//! |------------|-----------------------|
//! | `run`      | `Run`, `Resume`       |
//! | `sessions` | `Sessions`            |

pub mod run;
pub mod sessions;

pub use run::{cmd_resume, cmd_run};
pub use sessions::cmd_sessions;
