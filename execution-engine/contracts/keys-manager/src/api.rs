use types::{
    account::{AccountHash, PublicKey, Weight},
    bytesrepr::FromBytes,
    ApiError, RuntimeArgs,
};

use crate::error::Error;

pub const SET_KEY_WEIGHT: &str = "set_key_weight";
pub const SET_DEPLOYMENT_THRESHOLD: &str = "set_deployment_threshold";
pub const SET_KEY_MANAGEMENT_THRESHOLD: &str = "set_key_management_threshold";
pub const SET_ALL: &str = "set_all";

pub const ARG_METHOD: &str = "method";
pub const ARG_ACCOUNT: &str = "account";
pub const ARG_WEIGHT: &str = "weight";
pub const ARG_DEPLOYMENT_THRESHOLD: &str = "deployment_threshold";
pub const ARG_KEY_MANAGEMENT_THRESHOLD: &str = "key_management_threshold";
pub const ARG_ACCOUNTS: &str = "accounts";
pub const ARG_WEIGHTS: &str = "weights";

/// A decoded keys manager request.
#[derive(Debug, PartialEq, Eq)]
pub enum Api {
    SetKeyWeight(AccountHash, Weight),
    SetDeploymentThreshold(Weight),
    SetKeyManagementThreshold(Weight),
    SetAll {
        deployment_threshold: Weight,
        key_management_threshold: Weight,
        keys: Vec<(AccountHash, Weight)>,
    },
}

fn get_arg<T: FromBytes>(args: &RuntimeArgs, name: &str) -> Result<T, ApiError> {
    args.get_typed(name)
        .ok_or(ApiError::MissingArgument)?
        .map_err(|_| ApiError::Deserialize)
}

fn get_weight_arg(args: &RuntimeArgs, name: &str) -> Result<Weight, ApiError> {
    get_arg::<u8>(args, name).map(Weight::new)
}

fn get_account_arg(args: &RuntimeArgs, name: &str) -> Result<AccountHash, ApiError> {
    get_arg::<PublicKey>(args, name).map(|public_key| AccountHash::from_public_key(&public_key))
}

/// Returns the method named by the request, if it carries a decodable one.
pub fn requested_method(args: &RuntimeArgs) -> Result<String, ApiError> {
    get_arg(args, ARG_METHOD)
}

impl Api {
    pub fn from_args(args: &RuntimeArgs) -> Result<Api, ApiError> {
        let method_name = requested_method(args)?;
        match method_name.as_str() {
            SET_KEY_WEIGHT => {
                let key = get_account_arg(args, ARG_ACCOUNT)?;
                let weight = get_weight_arg(args, ARG_WEIGHT)?;
                Ok(Api::SetKeyWeight(key, weight))
            }
            SET_DEPLOYMENT_THRESHOLD => {
                let threshold = get_weight_arg(args, ARG_WEIGHT)?;
                Ok(Api::SetDeploymentThreshold(threshold))
            }
            SET_KEY_MANAGEMENT_THRESHOLD => {
                let threshold = get_weight_arg(args, ARG_WEIGHT)?;
                Ok(Api::SetKeyManagementThreshold(threshold))
            }
            SET_ALL => {
                let deployment_threshold = get_weight_arg(args, ARG_DEPLOYMENT_THRESHOLD)?;
                let key_management_threshold =
                    get_weight_arg(args, ARG_KEY_MANAGEMENT_THRESHOLD)?;
                let accounts: Vec<PublicKey> = get_arg(args, ARG_ACCOUNTS)?;
                let weights: Vec<u8> = get_arg(args, ARG_WEIGHTS)?;
                if accounts.len() != weights.len() {
                    return Err(ApiError::InvalidArgument);
                }
                let keys = accounts
                    .iter()
                    .map(AccountHash::from_public_key)
                    .zip(weights.into_iter().map(Weight::new))
                    .collect();
                Ok(Api::SetAll {
                    deployment_threshold,
                    key_management_threshold,
                    keys,
                })
            }
            _ => Err(Error::UnknownApiCommand.into()),
        }
    }

    /// The method name this request was decoded from.
    pub fn method(&self) -> &'static str {
        match self {
            Api::SetKeyWeight(..) => SET_KEY_WEIGHT,
            Api::SetDeploymentThreshold(_) => SET_DEPLOYMENT_THRESHOLD,
            Api::SetKeyManagementThreshold(_) => SET_KEY_MANAGEMENT_THRESHOLD,
            Api::SetAll { .. } => SET_ALL,
        }
    }
}
