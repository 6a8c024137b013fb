//! Read surface for the (external) API layer.
//!
//! Thin pass-throughs over the storage contract's paginated queries;
//! callers loop on the continuation token for exhaustive traversal.

use crate::error::ServiceError;
use crate::StakingService;
use staking_storage::{
    BtcInfo, DelegationDocument, FinalityProviderStatsDocument, OverallStatsDocument, Page,
    StakerStatsDocument,
};

impl StakingService {
    /// Delegations for one staker, paginated.
    pub async fn get_delegations_by_staker_pk(
        &self,
        staker_pk_hex: &str,
        pagination_token: Option<&str>,
    ) -> Result<Page<DelegationDocument>, ServiceError> {
        Ok(self
            .store()
            .find_delegations_by_staker_pk(staker_pk_hex, pagination_token)
            .await?)
    }

    /// Unordered exhaustive scan of all delegations, paginated. Used for
    /// full backfills.
    pub async fn scan_delegations(
        &self,
        pagination_token: Option<&str>,
    ) -> Result<Page<DelegationDocument>, ServiceError> {
        Ok(self
            .store()
            .scan_delegations_paginated(pagination_token)
            .await?)
    }

    /// Network-wide aggregates.
    pub async fn get_overall_stats(&self) -> Result<OverallStatsDocument, ServiceError> {
        Ok(self.store().get_overall_stats().await?)
    }

    /// Finality provider aggregates ordered by active TVL, paginated.
    pub async fn get_finality_provider_stats(
        &self,
        pagination_token: Option<&str>,
    ) -> Result<Page<FinalityProviderStatsDocument>, ServiceError> {
        Ok(self
            .store()
            .find_finality_provider_stats(pagination_token)
            .await?)
    }

    /// Batch lookup of finality provider aggregates by public key.
    pub async fn get_finality_provider_stats_by_pks(
        &self,
        fp_pk_hex: &[String],
    ) -> Result<Vec<FinalityProviderStatsDocument>, ServiceError> {
        Ok(self
            .store()
            .find_finality_provider_stats_by_pks(fp_pk_hex)
            .await?)
    }

    /// Top stakers by active TVL, paginated.
    pub async fn get_top_stakers_by_tvl(
        &self,
        pagination_token: Option<&str>,
    ) -> Result<Page<StakerStatsDocument>, ServiceError> {
        Ok(self.store().find_top_stakers_by_tvl(pagination_token).await?)
    }

    /// Latest observed BTC network info, if any.
    pub async fn get_latest_btc_info(&self) -> Result<Option<BtcInfo>, ServiceError> {
        Ok(self.store().get_latest_btc_info().await?)
    }
}
