use crate::errors::AppError;
use validator::Validate;

pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload
        .validate()
        .map_err(|err| AppError::BadRequest(err.to_string()))
}
