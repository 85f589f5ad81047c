//! Long-running background task that polls the Soroban RPC and writes
//! decoded SosRS events to the database.
//!
//! Each poll scans the factory first, registers any campaign it announced,
//! then scans every known campaign from the same start ledger. A campaign
//! created in this poll is therefore scanned in the same pass.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::db;
use crate::errors::Result;
use crate::events::{CampaignRecord, EventKind, SosrsEvent};
use crate::rpc;

pub struct IndexerState {
    pub pool: SqlitePool,
    pub config: Config,
    pub client: Client,
}

/// Run the indexer loop until `shutdown` is cancelled.
pub async fn run(state: Arc<IndexerState>, shutdown: CancellationToken) {
    info!(
        "Indexer starting — factory: {}",
        state.config.factory_contract_id
    );

    let mut current_ledger = load_resume_ledger(&state.pool, state.config.start_ledger).await;

    info!("Resuming from ledger {current_ledger}");

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            result = poll_once(&state.pool, &state.client, &state.config, current_ledger) => {
                match result {
                    Ok(next_ledger) => current_ledger = next_ledger,
                    Err(e) => error!("Indexer poll error: {e}"),
                }
            }
        }

        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = tokio::time::sleep(Duration::from_secs(state.config.poll_interval_secs)) => {}
        }
    }

    info!("Indexer stopped at ledger {current_ledger}");
}

/// Load the cursor from the DB; fall back to config `start_ledger` when none
/// is saved or it cannot be read.
async fn load_resume_ledger(pool: &SqlitePool, start_ledger: u32) -> u32 {
    match db::get_last_ledger(pool).await {
        Ok(last_ledger) => resume_ledger(last_ledger, start_ledger),
        Err(e) => {
            error!("Failed to read saved cursor, rescanning from ledger {start_ledger}: {e}");
            start_ledger
        }
    }
}

fn resume_ledger(last_ledger: i64, start_ledger: u32) -> u32 {
    if last_ledger > 0 {
        u32::try_from(last_ledger).unwrap_or(u32::MAX)
    } else {
        start_ledger
    }
}

/// Perform a single poll iteration and return the ledger to start the next
/// one from.
async fn poll_once(
    pool: &SqlitePool,
    client: &Client,
    config: &Config,
    start_ledger: u32,
) -> Result<u32> {
    let mut latest = start_ledger;

    // ─── Factory: discover campaigns ──────────────────────
    let factory = [config.factory_contract_id.clone()];
    let (factory_events, factory_latest) =
        fetch_all_pages(client, config, &factory, start_ledger).await?;
    latest = latest.max(factory_latest);

    let mut discovered = 0usize;
    for campaign in factory_events.iter().filter_map(campaign_from_event) {
        if db::upsert_campaign(pool, &campaign).await? {
            info!(
                "Discovered campaign {} at {}",
                campaign.campaign_id, campaign.contract_address
            );
            discovered += 1;
        }
    }
    store(pool, &factory_events).await?;

    // ─── Campaigns ────────────────────────────────────────
    let addresses: Vec<String> = db::list_campaigns(pool)
        .await?
        .into_iter()
        .map(|c| c.contract_address)
        .collect();

    for chunk in addresses.chunks(rpc::MAX_CONTRACTS_PER_REQUEST) {
        let (events, chunk_latest) = fetch_all_pages(client, config, chunk, start_ledger).await?;
        latest = latest.max(chunk_latest);
        store(pool, &events).await?;
    }

    debug!(
        "Poll complete: {} campaigns watched, {discovered} new, latest ledger {latest}",
        addresses.len()
    );

    // Persist cursor so restarts are deterministic.
    db::save_last_ledger(pool, i64::from(latest)).await?;
    Ok(latest)
}

/// Page through `getEvents` for `contract_ids` until a short page.
async fn fetch_all_pages(
    client: &Client,
    config: &Config,
    contract_ids: &[String],
    start_ledger: u32,
) -> Result<(Vec<SosrsEvent>, u32)> {
    let mut decoded = Vec::new();
    let mut latest = start_ledger;
    let mut cursor: Option<String> = None;

    loop {
        let page = rpc::fetch_events(
            client,
            &config.rpc_url,
            contract_ids,
            start_ledger,
            cursor.as_deref(),
            config.events_per_page,
        )
        .await?;

        if let Some(l) = page.latest_ledger {
            latest = latest.max(u32::try_from(l).unwrap_or(u32::MAX));
        }
        decoded.extend(rpc::decode_events(&page.events));

        if !has_more(page.events.len(), config.events_per_page, page.cursor.as_deref()) {
            break;
        }
        cursor = page.cursor;
    }

    Ok((decoded, latest))
}

fn has_more(page_len: usize, limit: u32, cursor: Option<&str>) -> bool {
    cursor.is_some() && page_len > 0 && page_len >= limit as usize
}

async fn store(pool: &SqlitePool, events: &[SosrsEvent]) -> Result<()> {
    if events.is_empty() {
        return Ok(());
    }
    let inserted = db::insert_events(pool, events).await?;
    info!(
        "Decoded {} events → {} new records stored",
        events.len(),
        inserted
    );
    Ok(())
}

/// Extract the campaign registration carried by a factory `created` event.
fn campaign_from_event(event: &SosrsEvent) -> Option<CampaignRecord> {
    if event.kind() != EventKind::CampaignCreated {
        return None;
    }
    Some(CampaignRecord {
        campaign_id: event.campaign_id.as_deref()?.parse().ok()?,
        contract_address: event.counterparty.clone()?,
        owner: event.actor.clone()?,
        created_ledger: event.ledger,
        created_at: event.timestamp,
    })
}
