use std::collections::BTreeMap;

use engine_shared::{
    account::Account,
    logging::{self, log_level::LogLevel},
};
use types::{
    account::{AccountHash, Weight},
    ApiError, RuntimeArgs,
};

use crate::{
    api::{self, Api},
    error::Error,
    key_manager::KeyManager,
    runtime_context::RuntimeContext,
    storage::AccountStore,
    threshold_manager::ThresholdManager,
};

const UNKNOWN_ACTION: &str = "unknown";

/// Decodes `args`, applies the requested action to the context's account and logs the outcome.
///
/// Either the whole action is committed or the stored account is left untouched.
pub fn execute<S>(context: &mut RuntimeContext<S>, args: &RuntimeArgs) -> Result<(), ApiError>
where
    S: AccountStore,
{
    let (action, result) = match Api::from_args(args) {
        Ok(api) => (api.method().to_string(), dispatch(context, api)),
        Err(error) => {
            let action =
                api::requested_method(args).unwrap_or_else(|_| UNKNOWN_ACTION.to_string());
            (action, Err(error))
        }
    };
    log_outcome(&action, context.account_hash(), result);
    result
}

fn dispatch<S>(context: &mut RuntimeContext<S>, api: Api) -> Result<(), ApiError>
where
    S: AccountStore,
{
    match api {
        Api::SetKeyWeight(key, weight) => {
            context.modify_account(|account, caller_weight, max_keys| {
                KeyManager::new(account, caller_weight, max_keys).set_key_weight(key, weight)
            })
        }
        Api::SetDeploymentThreshold(threshold) => {
            context.modify_account(|account, caller_weight, _| {
                ThresholdManager::new(account, caller_weight).set_deployment_threshold(threshold)
            })
        }
        Api::SetKeyManagementThreshold(threshold) => {
            context.modify_account(|account, caller_weight, _| {
                ThresholdManager::new(account, caller_weight)
                    .set_key_management_threshold(threshold)
            })
        }
        Api::SetAll {
            deployment_threshold,
            key_management_threshold,
            keys,
        } => context.modify_account(|account, caller_weight, max_keys| {
            set_all(
                account,
                caller_weight,
                max_keys,
                deployment_threshold,
                key_management_threshold,
                &keys,
            )
        }),
    }
}

/// Applies both thresholds and every key weight as one action.
///
/// The caller's permission is checked once against the account as it is on entry; intermediate
/// steps never re-check it.
///
/// Thresholds which go down are applied before the keys change and thresholds which go up after,
/// so a target state satisfying every invariant is reachable regardless of the current one.
fn set_all(
    account: &mut Account,
    caller_weight: Weight,
    max_keys: usize,
    deployment_threshold: Weight,
    key_management_threshold: Weight,
    keys: &[(AccountHash, Weight)],
) -> Result<(), Error> {
    if !account.can_manage_keys(caller_weight) {
        return Err(Error::PermissionDenied);
    }

    let current = *account.action_thresholds();

    {
        let mut thresholds = ThresholdManager::authorized(account);
        if deployment_threshold < *current.deployment() {
            thresholds.set_deployment_threshold(deployment_threshold)?;
        }
        if key_management_threshold < *current.key_management() {
            thresholds.set_key_management_threshold(key_management_threshold)?;
        }
    }

    {
        let mut key_manager = KeyManager::authorized(account, max_keys);
        for (key, weight) in keys {
            key_manager.set_key_weight(*key, *weight)?;
        }
    }

    let mut thresholds = ThresholdManager::authorized(account);
    if key_management_threshold > *current.key_management() {
        thresholds.set_key_management_threshold(key_management_threshold)?;
    }
    if deployment_threshold > *current.deployment() {
        thresholds.set_deployment_threshold(deployment_threshold)?;
    }
    Ok(())
}

fn log_outcome(action: &str, account_hash: AccountHash, result: Result<(), ApiError>) {
    let mut properties = BTreeMap::new();
    properties.insert("action".to_string(), action.to_string());
    properties.insert("account".to_string(), account_hash.to_string());

    match result {
        Ok(()) => {
            properties.insert("outcome".to_string(), "success".to_string());
            logging::log_details(
                LogLevel::Info,
                "{action} on account {account}: {outcome}".to_string(),
                properties,
            );
        }
        Err(error) => {
            properties.insert("outcome".to_string(), "failure".to_string());
            properties.insert("error".to_string(), format!("{:?}", error));
            logging::log_details(
                LogLevel::Warning,
                "{action} on account {account}: {outcome} with {error}".to_string(),
                properties,
            );
        }
    }
}
