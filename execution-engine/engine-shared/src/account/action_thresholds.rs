use types::{
    account::{ActionType, SetThresholdFailure, Weight, WEIGHT_SERIALIZED_LENGTH},
    bytesrepr::{Error, FromBytes, ToBytes, U8_SERIALIZED_LENGTH},
};

const DEPLOYMENT_THRESHOLD_ID: u8 = 0;
const KEY_MANAGEMENT_THRESHOLD_ID: u8 = 1;

/// Thresholds that have to be met when executing an action of a certain type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActionThresholds {
    deployment: Weight,
    key_management: Weight,
}

impl ActionThresholds {
    /// Creates new ActionThresholds object with provided weights
    ///
    /// Requires deployment threshold to be lower than or equal to
    /// key management threshold.
    pub fn new(
        deployment: Weight,
        key_management: Weight,
    ) -> Result<ActionThresholds, SetThresholdFailure> {
        if deployment > key_management {
            return Err(SetThresholdFailure::DeploymentThreshold);
        }
        Ok(ActionThresholds {
            deployment,
            key_management,
        })
    }

    /// Sets new threshold for [ActionType::Deployment].
    /// Should return an error if setting new threshold for `action_type` breaks
    /// one of the invariants. Currently, invariant is that
    /// `ActionType::Deployment` threshold shouldn't be higher than any
    /// other, which should be checked both when increasing `Deployment`
    /// threshold and decreasing the other.
    pub fn set_deployment_threshold(
        &mut self,
        new_threshold: Weight,
    ) -> Result<(), SetThresholdFailure> {
        if new_threshold > self.key_management {
            Err(SetThresholdFailure::DeploymentThreshold)
        } else {
            self.deployment = new_threshold;
            Ok(())
        }
    }

    /// Sets new threshold for [ActionType::KeyManagement].
    pub fn set_key_management_threshold(
        &mut self,
        new_threshold: Weight,
    ) -> Result<(), SetThresholdFailure> {
        if self.deployment > new_threshold {
            Err(SetThresholdFailure::KeyManagementThreshold)
        } else {
            self.key_management = new_threshold;
            Ok(())
        }
    }

    pub fn deployment(&self) -> &Weight {
        &self.deployment
    }

    pub fn key_management(&self) -> &Weight {
        &self.key_management
    }

    /// Unified function that takes an action type, and changes appropriate
    /// threshold defined by the [ActionType] variants.
    pub fn set_threshold(
        &mut self,
        action_type: ActionType,
        new_threshold: Weight,
    ) -> Result<(), SetThresholdFailure> {
        match action_type {
            ActionType::Deployment => self.set_deployment_threshold(new_threshold),
            ActionType::KeyManagement => self.set_key_management_threshold(new_threshold),
        }
    }
}

impl Default for ActionThresholds {
    fn default() -> Self {
        ActionThresholds {
            deployment: Weight::new(1),
            key_management: Weight::new(1),
        }
    }
}

impl ToBytes for ActionThresholds {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut result = Vec::with_capacity(2 * (WEIGHT_SERIALIZED_LENGTH + U8_SERIALIZED_LENGTH));
        result.push(DEPLOYMENT_THRESHOLD_ID);
        result.append(&mut self.deployment.to_bytes()?);
        result.push(KEY_MANAGEMENT_THRESHOLD_ID);
        result.append(&mut self.key_management.to_bytes()?);
        Ok(result)
    }
}

impl FromBytes for ActionThresholds {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
        let (id_1, rem): (u8, &[u8]) = FromBytes::from_bytes(bytes)?;
        let (weight_1, rem): (Weight, &[u8]) = FromBytes::from_bytes(rem)?;
        let (id_2, rem): (u8, &[u8]) = FromBytes::from_bytes(rem)?;
        let (weight_2, rem): (Weight, &[u8]) = FromBytes::from_bytes(rem)?;
        let (deployment, key_management) = match (id_1, id_2) {
            (DEPLOYMENT_THRESHOLD_ID, KEY_MANAGEMENT_THRESHOLD_ID) => (weight_1, weight_2),
            (KEY_MANAGEMENT_THRESHOLD_ID, DEPLOYMENT_THRESHOLD_ID) => (weight_2, weight_1),
            _ => return Err(Error::FormattingError),
        };
        let action_thresholds = ActionThresholds::new(deployment, key_management)
            .map_err(|_| Error::FormattingError)?;
        Ok((action_thresholds, rem))
    }
}

#[cfg(any(feature = "gens", test))]
pub mod gens {
    use proptest::prelude::*;

    use super::ActionThresholds;
    use types::account::Weight;

    pub fn action_thresholds_arb() -> impl Strategy<Value = ActionThresholds> {
        (any::<u8>(), any::<u8>()).prop_map(|(a, b)| {
            let (deployment, key_management) = if a <= b { (a, b) } else { (b, a) };
            // Ordering is guaranteed above.
            ActionThresholds::new(Weight::new(deployment), Weight::new(key_management)).unwrap()
        })
    }
}
