//! MPI peer group (rsmpi)
//!
//! `MPI_Init` runs in [`MpiPeerGroup::init`]; the universe is dropped, and MPI
//! finalized, when the group goes out of scope after `finalize` has waited on
//! the world barrier.

use super::{LaunchContext, PeerGroup};
use crate::error::LaunchError;
use ::mpi::environment::Universe;
use ::mpi::traits::*;
use tracing::debug;

pub struct MpiPeerGroup {
    universe: Universe,
    context: LaunchContext,
}

impl MpiPeerGroup {
    pub fn init() -> Result<Self, LaunchError> {
        let universe = ::mpi::initialize()
            .ok_or_else(|| LaunchError::Bootstrap("MPI is already initialized".to_string()))?;
        let world = universe.world();
        let context = LaunchContext::new(world.rank() as i64, world.size() as i64)?;
        debug!(rank = context.rank(), size = context.peer_count(), "MPI initialized");

        Ok(Self { universe, context })
    }
}

impl PeerGroup for MpiPeerGroup {
    fn context(&self) -> LaunchContext {
        self.context
    }

    fn processor_name(&self) -> String {
        ::mpi::environment::processor_name().unwrap_or_else(|_| super::local_hostname())
    }

    fn finalize(&mut self) {
        self.universe.world().barrier();
    }
}
