use engine_shared::account::Account;
use types::account::{ActionType, SetThresholdFailure, Weight};

use crate::error::Error;

/// Changes the deployment and key management thresholds of an account on behalf of a caller.
///
/// Whether the caller may manage keys is decided once, against the account as it is when the
/// manager is created.
pub struct ThresholdManager<'a> {
    account: &'a mut Account,
    can_manage_keys: bool,
}

impl<'a> ThresholdManager<'a> {
    pub fn new(account: &'a mut Account, caller_weight: Weight) -> Self {
        let can_manage_keys = account.can_manage_keys(caller_weight);
        ThresholdManager {
            account,
            can_manage_keys,
        }
    }

    /// Creates a manager for a caller already found to hold key management permission.
    pub(crate) fn authorized(account: &'a mut Account) -> Self {
        ThresholdManager {
            account,
            can_manage_keys: true,
        }
    }

    pub fn set_threshold(&mut self, action_type: ActionType, threshold: Weight) -> Result<(), Error> {
        if !self.can_manage_keys {
            return Err(Error::PermissionDenied);
        }
        self.account
            .set_action_threshold(action_type, threshold)
            .map_err(|failure| match failure {
                SetThresholdFailure::KeyManagementThreshold => Error::KeyManagementThresholdError,
                SetThresholdFailure::DeploymentThreshold => Error::DeploymentThresholdError,
                SetThresholdFailure::InsufficientTotalWeight => Error::InsufficientTotalWeight,
            })
    }

    pub fn set_deployment_threshold(&mut self, threshold: Weight) -> Result<(), Error> {
        self.set_threshold(ActionType::Deployment, threshold)
    }

    pub fn set_key_management_threshold(&mut self, threshold: Weight) -> Result<(), Error> {
        self.set_threshold(ActionType::KeyManagement, threshold)
    }
}

#[cfg(test)]
mod tests {
    use engine_shared::test_utils::account_with_keys;
    use types::account::AccountHash;

    use super::*;

    const K1: AccountHash = AccountHash::new([1u8; 32]);
    const K2: AccountHash = AccountHash::new([2u8; 32]);

    fn account(deployment: u8, key_management: u8) -> Account {
        account_with_keys(
            K1,
            &[(K1, Weight::new(10)), (K2, Weight::new(5))],
            Weight::new(deployment),
            Weight::new(key_management),
        )
    }

    #[test]
    fn key_management_below_deployment_should_fail() {
        let mut account = account(5, 5);
        let mut manager = ThresholdManager::new(&mut account, Weight::new(15));
        assert_eq!(
            manager.set_key_management_threshold(Weight::new(4)),
            Err(Error::KeyManagementThresholdError)
        );
        manager
            .set_key_management_threshold(Weight::new(5))
            .expect("equal thresholds are allowed");
        manager
            .set_key_management_threshold(Weight::new(6))
            .expect("higher key management threshold is allowed");
    }

    #[test]
    fn deployment_above_key_management_should_fail() {
        let mut account = account(1, 5);
        let mut manager = ThresholdManager::new(&mut account, Weight::new(15));
        assert_eq!(
            manager.set_deployment_threshold(Weight::new(6)),
            Err(Error::DeploymentThresholdError)
        );
        manager.set_deployment_threshold(Weight::new(5)).unwrap();
        assert_eq!(*account.action_thresholds().deployment(), Weight::new(5));
    }

    #[test]
    fn threshold_above_total_weight_should_fail() {
        let mut account = account(1, 1);
        let before = account.clone();
        let mut manager = ThresholdManager::new(&mut account, Weight::new(15));
        assert_eq!(
            manager.set_key_management_threshold(Weight::new(16)),
            Err(Error::InsufficientTotalWeight)
        );
        // Both the total weight and the ordering are broken; total weight is reported.
        assert_eq!(
            manager.set_deployment_threshold(Weight::new(16)),
            Err(Error::InsufficientTotalWeight)
        );
        assert_eq!(account, before);
    }

    #[test]
    fn caller_below_key_management_threshold_is_denied() {
        let mut account = account(1, 10);
        let mut manager = ThresholdManager::new(&mut account, Weight::new(5));
        assert_eq!(
            manager.set_deployment_threshold(Weight::new(2)),
            Err(Error::PermissionDenied)
        );
        assert_eq!(
            manager.set_key_management_threshold(Weight::new(2)),
            Err(Error::PermissionDenied)
        );
    }

    #[test]
    fn permission_is_fixed_when_manager_is_created() {
        let mut account = account(1, 5);
        let mut manager = ThresholdManager::new(&mut account, Weight::new(5));
        manager
            .set_key_management_threshold(Weight::new(15))
            .expect("caller meets the threshold on entry");
        manager
            .set_deployment_threshold(Weight::new(12))
            .expect("raised threshold does not revoke permission");
        assert_eq!(*account.action_thresholds().deployment(), Weight::new(12));
        assert_eq!(*account.action_thresholds().key_management(), Weight::new(15));
    }

    #[test]
    fn authorized_manager_skips_permission_check() {
        let mut account = account(1, 15);
        ThresholdManager::authorized(&mut account)
            .set_deployment_threshold(Weight::new(15))
            .expect("should apply");
        assert_eq!(*account.action_thresholds().deployment(), Weight::new(15));
    }
}
