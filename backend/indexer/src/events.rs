//! Canonical event types emitted by the SosRS contracts.
//!
//! These mirror the Soroban events defined in
//! `contracts/sosrs_campaign/src/events.rs` and
//! `contracts/sosrs_factory/src/events.rs`.

use serde::{Deserialize, Serialize};

/// All recognised event kinds from the SosRS contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// The factory deployed a campaign (`created` topic).
    CampaignCreated,
    /// A donor funded a campaign (`donated` topic).
    DonationReceived,
    /// The owner withdrew funds (`withdrawn` topic).
    WithdrawExecuted,
    /// The owner closed the campaign (`closed` topic).
    CampaignClosed,
    /// Campaign ownership moved to a new address (`ownership` topic).
    OwnershipTransferred,
    /// An event from a watched contract that we don't recognise.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol into an [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "created" => Self::CampaignCreated,
            "donated" => Self::DonationReceived,
            "withdrawn" => Self::WithdrawExecuted,
            "closed" => Self::CampaignClosed,
            "ownership" => Self::OwnershipTransferred,
            _ => Self::Unknown,
        }
    }

    /// Identifier stored in the `event_type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CampaignCreated => "campaign_created",
            Self::DonationReceived => "donation_received",
            Self::WithdrawExecuted => "withdraw_executed",
            Self::CampaignClosed => "campaign_closed",
            Self::OwnershipTransferred => "ownership_transferred",
            Self::Unknown => "unknown",
        }
    }
}

/// A fully decoded SosRS event, ready to be stored.
///
/// Field meaning per kind:
///
/// | kind                    | actor          | counterparty      | amount |
/// |-------------------------|----------------|-------------------|--------|
/// | `campaign_created`      | owner          | campaign contract | –      |
/// | `donation_received`     | donor          | –                 | yes    |
/// | `withdraw_executed`     | owner          | –                 | yes    |
/// | `campaign_closed`       | owner          | –                 | –      |
/// | `ownership_transferred` | previous owner | new owner         | –      |
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SosrsEvent {
    /// RPC-assigned event id, unique across the network.
    pub event_id: String,
    pub event_type: String,
    pub campaign_id: Option<String>,
    pub actor: Option<String>,
    pub counterparty: Option<String>,
    /// Token amount as a decimal string (values are `i128` on-chain).
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}

impl SosrsEvent {
    pub fn kind(&self) -> EventKind {
        match self.event_type.as_str() {
            "campaign_created" => EventKind::CampaignCreated,
            "donation_received" => EventKind::DonationReceived,
            "withdraw_executed" => EventKind::WithdrawExecuted,
            "campaign_closed" => EventKind::CampaignClosed,
            "ownership_transferred" => EventKind::OwnershipTransferred,
            _ => EventKind::Unknown,
        }
    }
}

/// An event row as stored in / read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_id: String,
    pub event_type: String,
    pub campaign_id: Option<String>,
    pub actor: Option<String>,
    pub counterparty: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}

/// A campaign contract discovered from the factory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CampaignRecord {
    pub campaign_id: i64,
    pub contract_address: String,
    pub owner: String,
    pub created_ledger: i64,
    pub created_at: i64,
}

/// Aggregated view of one campaign, folded from its event history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CampaignSummary {
    pub campaign_id: String,
    pub owner: Option<String>,
    pub donation_count: u64,
    pub unique_donors: u64,
    /// Decimal strings; the on-chain amounts are `i128`.
    pub total_donated: String,
    pub total_withdrawn: String,
    pub balance: String,
    pub is_closed: bool,
}

impl CampaignSummary {
    /// Fold `events` (ordered by ledger) into a summary. Amounts that fail to
    /// parse are skipped.
    pub fn from_events(campaign_id: &str, events: &[EventRecord]) -> Self {
        let mut owner = None;
        let mut donors = std::collections::HashSet::new();
        let mut donation_count = 0u64;
        let mut donated: i128 = 0;
        let mut withdrawn: i128 = 0;
        let mut is_closed = false;

        let amount_of = |ev: &EventRecord| {
            ev.amount
                .as_deref()
                .and_then(|a| a.parse::<i128>().ok())
                .unwrap_or(0)
        };

        for ev in events {
            match ev.event_type.as_str() {
                "campaign_created" => owner = ev.actor.clone(),
                "donation_received" => {
                    donation_count += 1;
                    donated += amount_of(ev);
                    if let Some(donor) = &ev.actor {
                        donors.insert(donor.clone());
                    }
                }
                "withdraw_executed" => withdrawn += amount_of(ev),
                "campaign_closed" => is_closed = true,
                "ownership_transferred" => owner = ev.counterparty.clone(),
                _ => {}
            }
        }

        CampaignSummary {
            campaign_id: campaign_id.to_string(),
            owner,
            donation_count,
            unique_donors: donors.len() as u64,
            total_donated: donated.to_string(),
            total_withdrawn: withdrawn.to_string(),
            balance: (donated - withdrawn).to_string(),
            is_closed,
        }
    }
}
