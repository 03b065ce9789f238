//! Stage-1 gate: taxpayer identity verification and the eligibility rule.

use tracing::debug;

use crate::errors::LookupError;
use crate::registry::IdentityRegistry;
use crate::session::{Session, Stage};

/// Validate the stage-1 input, run one identity-registry call, and apply
/// the individual-taxpayer eligibility rule.
///
/// On success the confirmed identity is stored and the session advances to
/// the vehicle stage. On any failure the stage is unchanged, the failure is
/// recorded in the session's error slot, and `identity` stays unset. The
/// loading flag ends false on every exit path.
pub async fn verify_identity<R>(session: &mut Session, registry: &R) -> Result<(), LookupError>
where
    R: IdentityRegistry,
{
    let email = session.input().email.trim().to_owned();
    let tax_id = session.input().tax_id.trim().to_owned();

    if email.is_empty() || tax_id.is_empty() {
        return Err(session.fail(LookupError::MissingCredentials));
    }

    if let Err(err) = session.begin_attempt() {
        return Err(session.fail(err));
    }
    debug!(%tax_id, "verifying taxpayer identity");
    let outcome = registry.verify(&tax_id, &email).await;
    session.finish_attempt();

    match outcome {
        Ok(contribuyente) if contribuyente.is_eligible() => {
            debug!(name = %contribuyente.name, "taxpayer confirmed");
            session.store_identity(contribuyente);
            session.advance_from(Stage::Identity);
            Ok(())
        }
        Ok(_) => Err(session.fail(LookupError::NotIndividualTaxpayer)),
        Err(err) => Err(session.fail(LookupError::IdentityService(err))),
    }
}
