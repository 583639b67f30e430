use failure::Fail;

use types::ApiError;

/// Reasons a keys manager action is aborted, reported to the caller as `ApiError::User`.
#[derive(Fail, Debug, PartialEq, Eq, Copy, Clone)]
#[repr(u16)]
pub enum Error {
    #[fail(display = "Unknown api command")]
    UnknownApiCommand = 1, // 65537
    #[fail(display = "Permission denied")]
    PermissionDenied = 2, // 65538
    #[fail(display = "Threshold violation")]
    ThresholdViolation = 3, // 65539
    #[fail(display = "Maximum number of keys reached")]
    MaxKeysLimit = 4, // 65540
    #[fail(display = "Duplicate key")]
    DuplicateKey = 5, // 65541
    #[fail(display = "Key management threshold below deployment threshold")]
    KeyManagementThresholdError = 6, // 65542
    #[fail(display = "Deployment threshold above key management threshold")]
    DeploymentThresholdError = 7, // 65543
    #[fail(display = "Threshold exceeds total weight of keys")]
    InsufficientTotalWeight = 8, // 65544
}

impl From<Error> for ApiError {
    fn from(error: Error) -> ApiError {
        ApiError::User(error as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_errors_should_have_stable_codes() {
        let codes: Vec<u32> = vec![
            Error::UnknownApiCommand,
            Error::PermissionDenied,
            Error::ThresholdViolation,
            Error::MaxKeysLimit,
            Error::DuplicateKey,
            Error::KeyManagementThresholdError,
            Error::DeploymentThresholdError,
            Error::InsufficientTotalWeight,
        ]
        .into_iter()
        .map(|error| u32::from(ApiError::from(error)))
        .collect();
        assert_eq!(
            codes,
            vec![65537, 65538, 65539, 65540, 65541, 65542, 65543, 65544]
        );
    }

    #[test]
    fn user_errors_should_not_collide_with_deserialize() {
        assert_ne!(
            u32::from(ApiError::from(Error::UnknownApiCommand)),
            u32::from(ApiError::Deserialize)
        );
    }
}
