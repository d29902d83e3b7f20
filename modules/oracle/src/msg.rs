use cosmwasm_schema::cw_serde;
use paw_types::Amount;

use crate::error::ContractError;

#[cw_serde]
pub enum ExecuteMsg {
    SubmitPrice {
        validator: String,
        asset: String,
        price: paw_types::Ratio,
        timestamp: u64,
    },
    RegisterOracle {
        validator: String,
        region: String,
        stake: Amount,
    },
    UpdateValidatorRegion {
        validator: String,
        new_region: String,
    },
}

impl ExecuteMsg {
    pub fn validate_basic(&self) -> Result<(), ContractError> {
        use paw_types::validation::validate_asset_name;

        match self {
            ExecuteMsg::SubmitPrice { asset, price, timestamp, .. } => {
                validate_asset_name(asset)?;
                if price.is_zero() {
                    return Err(paw_errors::CommonError::InvalidAsset {
                        asset: asset.clone(),
                        reason: "price must be greater than zero".to_string(),
                    }
                    .into());
                }
                if *timestamp == 0 {
                    return Err(paw_errors::CommonError::InvalidAsset {
                        asset: asset.clone(),
                        reason: "timestamp must be set".to_string(),
                    }
                    .into());
                }
                Ok(())
            }
            ExecuteMsg::RegisterOracle { region, stake, .. } => {
                if region.is_empty() || region.len() > 64 {
                    return Err(paw_errors::CommonError::InvalidAsset {
                        asset: region.clone(),
                        reason: "region must be 1-64 characters".to_string(),
                    }
                    .into());
                }
                if stake.is_zero() {
                    return Err(paw_errors::CommonError::InvalidAsset {
                        asset: "stake".to_string(),
                        reason: "stake must be greater than zero".to_string(),
                    }
                    .into());
                }
                Ok(())
            }
            ExecuteMsg::UpdateValidatorRegion { new_region, .. } => {
                if new_region.is_empty() || new_region.len() > 64 {
                    return Err(paw_errors::CommonError::InvalidAsset {
                        asset: new_region.clone(),
                        reason: "region must be 1-64 characters".to_string(),
                    }
                    .into());
                }
                Ok(())
            }
        }
    }
}
