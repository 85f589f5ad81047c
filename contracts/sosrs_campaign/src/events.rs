use soroban_sdk::{contracttype, symbol_short, Address, Env};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DonationReceived {
    pub donor: Address,
    pub amount: i128,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawExecuted {
    pub owner: Address,
    pub amount: i128,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignClosed {
    pub owner: Address,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnershipTransferred {
    pub previous_owner: Address,
    pub new_owner: Address,
    pub timestamp: u64,
}

pub fn emit_donation_received(env: &Env, campaign_id: u64, donor: Address, amount: i128) {
    let topics = (symbol_short!("donated"), campaign_id);
    let data = DonationReceived {
        donor,
        amount,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn emit_withdraw_executed(env: &Env, campaign_id: u64, owner: Address, amount: i128) {
    let topics = (symbol_short!("withdrawn"), campaign_id);
    let data = WithdrawExecuted {
        owner,
        amount,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn emit_campaign_closed(env: &Env, campaign_id: u64, owner: Address) {
    let topics = (symbol_short!("closed"), campaign_id);
    let data = CampaignClosed {
        owner,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn emit_ownership_transferred(
    env: &Env,
    campaign_id: u64,
    previous_owner: Address,
    new_owner: Address,
) {
    let topics = (symbol_short!("ownership"), campaign_id);
    let data = OwnershipTransferred {
        previous_owner,
        new_owner,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}
