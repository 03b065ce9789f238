//! CLI command implementations.
//!
//! Each submodule owns one or more related `Commands` variants:
//!
//! | Module    | Commands handled      |
//! |-----------|-----------------------|
//! | `lookup`  | `Lookup`              |
//! | `query`   | `Query`               |
//! | `history` | `History`, `Reset`    |
//! | `config`  | `Config`              |

pub mod config;
pub mod history;
pub mod lookup;
pub mod query;

pub use config::cmd_config;
pub use history::{cmd_history, cmd_reset};
pub use lookup::cmd_lookup;
pub use query::cmd_query;
