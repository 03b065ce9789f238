//! Stage gates.
//!
//! Each gate validates the input for its stage, issues the single remote
//! call, and either merges the result into the session and requests an
//! advance, or records the failure and leaves the stage unchanged. The
//! ordering guarantee between the two stages is structural: the vehicle
//! gate refuses to run unless the identity stage already confirmed an
//! eligible taxpayer.

pub mod identity;
pub mod vehicle;

pub use identity::verify_identity;
pub use vehicle::resolve_vehicle;
