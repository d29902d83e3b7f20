use cosmwasm_std::Event;

pub fn provider_registered(provider: &str, endpoint: &str, stake: &str) -> Event {
    Event::new("provider_registered")
        .add_attribute("provider", provider)
        .add_attribute("endpoint", endpoint)
        .add_attribute("stake", stake)
}

pub fn provider_deactivated(provider: &str) -> Event {
    Event::new("provider_deactivated").add_attribute("provider", provider)
}

pub fn request_created(request_id: u64, requester: &str, escrow_amount: &str) -> Event {
    Event::new("request_created")
        .add_attribute("request_id", request_id.to_string())
        .add_attribute("requester", requester)
        .add_attribute("escrow_amount", escrow_amount)
}

pub fn escrow_locked(request_id: u64, amount: &str) -> Event {
    Event::new("escrow_locked")
        .add_attribute("request_id", request_id.to_string())
        .add_attribute("amount", amount)
}

pub fn escrow_released(request_id: u64, provider: &str, amount: &str) -> Event {
    Event::new("escrow_released")
        .add_attribute("request_id", request_id.to_string())
        .add_attribute("provider", provider)
        .add_attribute("amount", amount)
}

pub fn escrow_refunded(request_id: u64, requester: &str, amount: &str) -> Event {
    Event::new("escrow_refunded")
        .add_attribute("request_id", request_id.to_string())
        .add_attribute("requester", requester)
        .add_attribute("amount", amount)
}

pub fn provider_assigned(request_id: u64, provider: &str) -> Event {
    Event::new("provider_assigned")
        .add_attribute("request_id", request_id.to_string())
        .add_attribute("provider", provider)
}

pub fn result_submitted(request_id: u64, provider: &str, verified: bool) -> Event {
    Event::new("result_submitted")
        .add_attribute("request_id", request_id.to_string())
        .add_attribute("provider", provider)
        .add_attribute("verified", verified.to_string())
}

pub fn dispute_filed(dispute_id: u64, request_id: u64, disputant: &str) -> Event {
    Event::new("dispute_filed")
        .add_attribute("dispute_id", dispute_id.to_string())
        .add_attribute("request_id", request_id.to_string())
        .add_attribute("disputant", disputant)
}

pub fn appeal_filed(appeal_id: u64, dispute_id: u64, appellant: &str) -> Event {
    Event::new("appeal_filed")
        .add_attribute("appeal_id", appeal_id.to_string())
        .add_attribute("dispute_id", dispute_id.to_string())
        .add_attribute("appellant", appellant)
}

pub fn provider_cache_refreshed(size: u32, last_refresh_height: u64) -> Event {
    Event::new("provider_cache_refreshed")
        .add_attribute("size", size.to_string())
        .add_attribute("last_refresh_height", last_refresh_height.to_string())
}

pub fn request_timed_out(request_id: u64) -> Event {
    Event::new("request_timed_out").add_attribute("request_id", request_id.to_string())
}

pub fn reputation_decayed(providers_touched: u32, height: u64) -> Event {
    Event::new("reputation_decayed")
        .add_attribute("providers_touched", providers_touched.to_string())
        .add_attribute("height", height.to_string())
}
