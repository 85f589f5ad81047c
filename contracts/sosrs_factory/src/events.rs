use soroban_sdk::{contracttype, symbol_short, Address, Env};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignCreated {
    pub owner: Address,
    pub campaign_id: u64,
    pub contract_address: Address,
    pub timestamp: u64,
}

pub fn emit_campaign_created(
    env: &Env,
    owner: Address,
    campaign_id: u64,
    contract_address: Address,
) {
    let topics = (symbol_short!("created"), campaign_id);
    let data = CampaignCreated {
        owner,
        campaign_id,
        contract_address,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}
