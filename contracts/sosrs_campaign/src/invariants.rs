#![allow(dead_code)]

extern crate std;

use soroban_sdk::{Address, Env};

use crate::types::Campaign;
use crate::CampaignContractClient;

/// INV-1: The held balance is never negative.
pub fn assert_balance_non_negative(campaign: &Campaign) {
    assert!(
        campaign.total_balance >= 0,
        "INV-1 violated: campaign {} has negative balance ({})",
        campaign.id,
        campaign.total_balance
    );
}

/// INV-2: The donation goal is always positive.
pub fn assert_goal_positive(campaign: &Campaign) {
    assert!(
        campaign.donation_goal > 0,
        "INV-2 violated: campaign {} has non-positive goal ({})",
        campaign.id,
        campaign.donation_goal
    );
}

/// INV-3: Before any withdrawal, the balance equals the sum of all donor
/// deposits.
pub fn assert_balance_matches_deposits(client: &CampaignContractClient, donors: &[Address]) {
    let sum: i128 = donors.iter().map(|d| client.deposit_of(d)).sum();
    let balance = client.total_balance();
    assert_eq!(
        balance, sum,
        "INV-3 violated: total balance {} != sum of deposits {}",
        balance, sum
    );
}

/// INV-4: The contract's token holdings match its recorded balance.
pub fn assert_token_holdings_match(env: &Env, client: &CampaignContractClient) {
    let token = soroban_sdk::token::Client::new(env, &client.token());
    let held = token.balance(&client.address);
    let recorded = client.total_balance();
    assert_eq!(
        held, recorded,
        "INV-4 violated: contract holds {} but records {}",
        held, recorded
    );
}

/// INV-5: Closure is one-way.
pub fn assert_closure_sticky(was_closed: bool, is_closed: bool) {
    assert!(
        !was_closed || is_closed,
        "INV-5 violated: closed campaign reopened"
    );
}

/// INV-6: A withdrawal of `amount` lowers the balance by exactly `amount`.
pub fn assert_withdraw_invariant(balance_before: i128, balance_after: i128, amount: i128) {
    assert_eq!(
        balance_after,
        balance_before - amount,
        "INV-6 violated: withdraw invariant broken: {} - {} != {}",
        balance_before,
        amount,
        balance_after
    );
}

/// INV-7: Identity fields never change after construction.
pub fn assert_immutable_fields(before: &Campaign, current: &Campaign) {
    assert_eq!(before.id, current.id, "INV-7 violated: id changed");
    assert_eq!(before.token, current.token, "INV-7 violated: token changed");
    assert_eq!(
        before.donation_goal, current.donation_goal,
        "INV-7 violated: donation goal changed"
    );
    assert_eq!(
        before.deadline, current.deadline,
        "INV-7 violated: deadline changed"
    );
    assert_eq!(
        before.metadata, current.metadata,
        "INV-7 violated: metadata changed"
    );
}

/// Run all stateless campaign invariants.
pub fn assert_all_campaign_invariants(campaign: &Campaign) {
    assert_balance_non_negative(campaign);
    assert_goal_positive(campaign);
}
