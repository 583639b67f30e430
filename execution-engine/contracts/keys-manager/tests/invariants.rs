use std::{collections::BTreeSet, iter::FromIterator};

use proptest::{collection::vec, prelude::*};

use engine_shared::{
    account::Account, engine_config::EngineConfig, logging::logger, test_utils::mocked_account,
};
use keys_manager::{
    api::{
        ARG_ACCOUNT, ARG_ACCOUNTS, ARG_DEPLOYMENT_THRESHOLD, ARG_KEY_MANAGEMENT_THRESHOLD,
        ARG_METHOD, ARG_WEIGHT, ARG_WEIGHTS, SET_ALL, SET_DEPLOYMENT_THRESHOLD,
        SET_KEY_MANAGEMENT_THRESHOLD, SET_KEY_WEIGHT,
    },
    runtime_context::RuntimeContext,
    storage::{AccountStore, InMemoryAccountStore},
};
use types::{
    account::{AccountHash, PublicKey, Weight},
    runtime_args, RuntimeArgs,
};

const MAX_KEYS: usize = 4;

const KEY_POOL: [PublicKey; 6] = [
    PublicKey::ed25519_from([10u8; 32]),
    PublicKey::ed25519_from([11u8; 32]),
    PublicKey::ed25519_from([12u8; 32]),
    PublicKey::ed25519_from([13u8; 32]),
    PublicKey::ed25519_from([14u8; 32]),
    PublicKey::ed25519_from([15u8; 32]),
];

#[derive(Clone, Debug)]
enum Action {
    SetKeyWeight(usize, u8),
    SetDeploymentThreshold(u8),
    SetKeyManagementThreshold(u8),
    SetAll(u8, u8, Vec<(usize, u8)>),
}

impl Action {
    fn into_args(self) -> RuntimeArgs {
        match self {
            Action::SetKeyWeight(index, weight) => runtime_args! {
                ARG_METHOD => SET_KEY_WEIGHT,
                ARG_ACCOUNT => KEY_POOL[index],
                ARG_WEIGHT => weight,
            },
            Action::SetDeploymentThreshold(threshold) => runtime_args! {
                ARG_METHOD => SET_DEPLOYMENT_THRESHOLD,
                ARG_WEIGHT => threshold,
            },
            Action::SetKeyManagementThreshold(threshold) => runtime_args! {
                ARG_METHOD => SET_KEY_MANAGEMENT_THRESHOLD,
                ARG_WEIGHT => threshold,
            },
            Action::SetAll(deployment, key_management, keys) => {
                let accounts: Vec<PublicKey> =
                    keys.iter().map(|(index, _)| KEY_POOL[*index]).collect();
                let weights: Vec<u8> = keys.iter().map(|(_, weight)| *weight).collect();
                runtime_args! {
                    ARG_METHOD => SET_ALL,
                    ARG_DEPLOYMENT_THRESHOLD => deployment,
                    ARG_KEY_MANAGEMENT_THRESHOLD => key_management,
                    ARG_ACCOUNTS => accounts,
                    ARG_WEIGHTS => weights,
                }
            }
        }
    }
}

fn weight_arb() -> impl Strategy<Value = u8> {
    prop_oneof![Just(0u8), 1u8..=20, any::<u8>()]
}

fn action_arb() -> impl Strategy<Value = Action> {
    let index = 0..KEY_POOL.len();
    prop_oneof![
        3 => (index.clone(), weight_arb()).prop_map(|(i, w)| Action::SetKeyWeight(i, w)),
        1 => weight_arb().prop_map(Action::SetDeploymentThreshold),
        1 => weight_arb().prop_map(Action::SetKeyManagementThreshold),
        1 => (weight_arb(), weight_arb(), vec((index, weight_arb()), 0..4))
            .prop_map(|(d, k, keys)| Action::SetAll(d, k, keys)),
    ]
}

fn assert_invariants(account: &Account) {
    let total = account.associated_keys().total_keys_weight();
    let thresholds = account.action_thresholds();
    assert!(total >= *thresholds.deployment(), "deployment unreachable");
    assert!(total >= *thresholds.key_management(), "key management unreachable");
    assert!(thresholds.deployment() <= thresholds.key_management());
    assert!(account.associated_keys().len() <= MAX_KEYS);
    assert!(account.get_associated_keys().all(|(_, weight)| !weight.is_zero()));
}

proptest! {
    #[test]
    fn invariants_hold_after_every_action(
        actions in vec(action_arb(), 1..40),
        signer_count in 1..3usize,
    ) {
        logger::initialize_buffered_logger();

        let (owner, account) = mocked_account(KEY_POOL[0]);
        let mut store = InMemoryAccountStore::from_pairs(&[(owner, account)])
            .expect("should create store");
        let signers: BTreeSet<AccountHash> = BTreeSet::from_iter(
            KEY_POOL[..signer_count].iter().map(AccountHash::from_public_key),
        );
        let config = EngineConfig::new().with_max_associated_keys(MAX_KEYS);

        for action in actions {
            let before = store.read(owner).unwrap().unwrap();
            let caller_weight = before.authorization_weight(&signers);
            let result = {
                let mut context =
                    RuntimeContext::new(&mut store, owner, signers.clone(), config);
                keys_manager::execute(&mut context, &action.into_args())
            };
            let after = store.read(owner).unwrap().unwrap();

            assert_invariants(&after);
            match result {
                Ok(()) => {
                    prop_assert!(caller_weight >= *before.action_thresholds().key_management());
                }
                Err(_) => {
                    prop_assert_eq!(&after, &before);
                }
            }
        }
    }
}

#[test]
fn weights_saturate_instead_of_overflowing() {
    logger::initialize_buffered_logger();

    let (owner, account) = mocked_account(KEY_POOL[0]);
    let mut store = InMemoryAccountStore::from_pairs(&[(owner, account)])
        .expect("should create store");
    let signers = BTreeSet::from_iter(vec![owner]);
    for action in vec![
        Action::SetKeyWeight(1, 255),
        Action::SetKeyManagementThreshold(255),
        Action::SetDeploymentThreshold(255),
        // 255 + 255 saturates; dropping the first key still leaves 255.
        Action::SetKeyWeight(0, 0),
    ] {
        let mut context =
            RuntimeContext::new(&mut store, owner, signers.clone(), EngineConfig::new());
        assert_eq!(
            keys_manager::execute(&mut context, &action.into_args()),
            Ok(())
        );
    }
    let account = store.read(owner).unwrap().unwrap();
    assert_eq!(
        account.get_associated_key_weight(AccountHash::from_public_key(&KEY_POOL[1])),
        Some(&Weight::new(255))
    );
    assert_eq!(account.associated_keys().len(), 1);
}
