use cosmwasm_std::Event;

pub fn price_submitted(asset: &str, validator: &str, price: &str) -> Event {
    Event::new("price_submitted")
        .add_attribute("asset", asset)
        .add_attribute("validator", validator)
        .add_attribute("price", price)
}

pub fn price_aggregated(asset: &str, aggregated_price: &str, source_count: u64) -> Event {
    Event::new("price_aggregated")
        .add_attribute("asset", asset)
        .add_attribute("aggregated_price", aggregated_price)
        .add_attribute("source_count", source_count.to_string())
}

pub fn validator_slashed(validator: &str, asset: &str, slash_amount: &str) -> Event {
    Event::new("validator_slashed")
        .add_attribute("validator", validator)
        .add_attribute("asset", asset)
        .add_attribute("slash_amount", slash_amount)
}

pub fn validator_registered(validator: &str, region: &str) -> Event {
    Event::new("validator_registered")
        .add_attribute("validator", validator)
        .add_attribute("region", region)
}

pub fn validator_region_updated(validator: &str, new_region: &str) -> Event {
    Event::new("validator_region_updated")
        .add_attribute("validator", validator)
        .add_attribute("new_region", new_region)
}

pub fn geographic_diversity_warning(region: &str, score: &str) -> Event {
    Event::new("geographic_diversity_warning")
        .add_attribute("region", region)
        .add_attribute("score", score)
}

/// One summary event per begin/end-block pruning pass rather than one per
/// pair, since a single block may sweep up to `MAX_NONCES_PRUNED_PER_BLOCK`
/// entries.
pub fn nonces_pruned(count: u32) -> Event {
    Event::new("nonces_pruned").add_attribute("count", count.to_string())
}
