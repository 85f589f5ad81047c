use soroban_sdk::{contracttype, String};

/// Descriptive fields forwarded to a new campaign's constructor.
///
/// Field names and order match the campaign contract's own
/// `CampaignMetadata`, so both encode to the same `ScMap`.
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
