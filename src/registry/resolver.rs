//! Combined vehicle/points resolution: the SRI vehicle record chained with
//! the cached ANT points balance, presented to the orchestrator as a single
//! collaborator call.

use super::{AntClient, RegistryError, SriClient, VehicleLookup, VehicleRegistry};

pub struct VehiclePointsResolver {
    sri: SriClient,
    ant: AntClient,
}

impl VehiclePointsResolver {
    pub fn new(sri: SriClient, ant: AntClient) -> Self {
        Self { sri, ant }
    }
}

impl VehicleRegistry for VehiclePointsResolver {
    /// Both halves resolve inside one call so the session can store them
    /// atomically; if either registry fails, neither half is returned.
    async fn resolve(&self, plate: &str) -> Result<VehicleLookup, RegistryError> {
        let vehicle = self.sri.vehicle_info(plate).await?;
        let points = self.ant.points(plate).await?;
        Ok(VehicleLookup { vehicle, points })
    }
}
