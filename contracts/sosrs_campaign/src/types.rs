//! # Types
//!
//! Data structures shared across the campaign contract modules.
//!
//! ## Config / State split
//!
//! A campaign is stored as separate ledger entries:
//!
//! - [`CampaignConfig`] — written once by the constructor; never mutated.
//! - the owner address — rewritten only by `transfer_ownership`.
//! - [`CampaignState`] — rewritten on every donation, withdrawal and closure.
//!
//! The public API exposes the reconstructed [`Campaign`] snapshot.
//!
//! ## Lifecycle
//!
//! ```text
//! Open ──force_campaign_closure──► Closed
//! ```
//!
//! `is_closed` never goes back to `false`.

use soroban_sdk::{contracttype, Address, String};

/// Descriptive fields supplied at creation. Hash fields carry content
/// identifiers (e.g. IPFS CIDs) of documents stored off-chain.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignMetadata {
    pub name: String,
    pub objectives_hash: String,
    pub description_hash: String,
    pub contact: String,
    pub city: String,
    pub country: String,
    pub image_hash: String,
}

/// Immutable campaign configuration.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignConfig {
    pub id: u64,
    /// Token contract donations are denominated in.
    pub token: Address,
    pub donation_goal: i128,
    /// Ledger timestamp advertised as the end of the campaign.
    pub deadline: u64,
    pub metadata: CampaignMetadata,
}

/// Mutable campaign state.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignState {
    pub is_closed: bool,
    pub total_balance: i128,
}

/// Full view of a campaign, returned by `get_campaign`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Campaign {
    /// Sequential identifier assigned by the factory.
    pub id: u64,
    /// Address allowed to close the campaign and withdraw funds.
    pub owner: Address,
    /// Token contract donations are denominated in.
    pub token: Address,
    /// Target amount, in the token's smallest unit.
    pub donation_goal: i128,
    /// Advertised end of the campaign (ledger timestamp).
    pub deadline: u64,
    pub metadata: CampaignMetadata,
    /// `true` once the owner has forced closure.
    pub is_closed: bool,
    /// Funds currently held by the campaign.
    pub total_balance: i128,
}
