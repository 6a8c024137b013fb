//! Staker address resolution.
//!
//! Address encodings are computed upstream (the indexer derives taproot
//! and both native-segwit parity variants from the staker key); this layer
//! only records and resolves them.

use crate::error::ServiceError;
use crate::StakingService;
use staking_storage::{DelegationFilter, PkAddressMapping};

impl StakingService {
    /// Record the address encodings for a staker public key. Re-inserting
    /// an already-known key is a no-op.
    pub async fn register_pk_address_mappings(
        &self,
        mapping: PkAddressMapping,
    ) -> Result<(), ServiceError> {
        self.store().insert_pk_address_mappings(mapping).await?;
        Ok(())
    }

    /// Resolve taproot addresses back to their staker keys. Unknown
    /// addresses are absent from the result.
    pub async fn find_pk_mappings_by_taproot_address(
        &self,
        taproot_addresses: &[String],
    ) -> Result<Vec<PkAddressMapping>, ServiceError> {
        Ok(self
            .store()
            .find_pk_mappings_by_taproot_address(taproot_addresses)
            .await?)
    }

    /// Resolve native segwit addresses (either parity variant) back to
    /// their staker keys.
    pub async fn find_pk_mappings_by_native_segwit_address(
        &self,
        native_segwit_addresses: &[String],
    ) -> Result<Vec<PkAddressMapping>, ServiceError> {
        Ok(self
            .store()
            .find_pk_mappings_by_native_segwit_address(native_segwit_addresses)
            .await?)
    }

    /// Whether any delegation exists for a staker taproot address under
    /// the optional filter.
    pub async fn check_delegation_exist_by_staker_taproot_address(
        &self,
        address: &str,
        filter: Option<&DelegationFilter>,
    ) -> Result<bool, ServiceError> {
        Ok(self
            .store()
            .check_delegation_exist_by_staker_taproot_address(address, filter)
            .await?)
    }
}
