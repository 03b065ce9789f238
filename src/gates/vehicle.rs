//! Stage-2 gate: vehicle record and points balance, merged in one call.

use tracing::debug;

use crate::errors::LookupError;
use crate::registry::VehicleRegistry;
use crate::session::{Session, Stage};

/// Validate the stage-2 input and resolve the vehicle record together with
/// the cached points balance.
///
/// Refuses to run out of order: the session must already be at the vehicle
/// stage, which it can only have reached through a confirmed identity. On
/// success both `vehicle` and `points` become visible at once and the
/// session advances to the result stage; on failure neither is touched.
pub async fn resolve_vehicle<R>(session: &mut Session, registry: &R) -> Result<(), LookupError>
where
    R: VehicleRegistry,
{
    let plate = session.input().plate.trim().to_owned();

    if plate.is_empty() {
        return Err(session.fail(LookupError::MissingPlate));
    }
    if session.stage() != Stage::Vehicle {
        return Err(session.fail(LookupError::IdentityNotVerified));
    }

    if let Err(err) = session.begin_attempt() {
        return Err(session.fail(err));
    }
    debug!(%plate, "resolving vehicle and points");
    let outcome = registry.resolve(&plate).await;
    session.finish_attempt();

    match outcome {
        Ok(lookup) => {
            debug!(points = lookup.points.total, "vehicle resolved");
            session.store_vehicle(lookup);
            session.advance_from(Stage::Vehicle);
            Ok(())
        }
        Err(err) => Err(session.fail(LookupError::VehicleService(err))),
    }
}
