use super::ApiError;

const MAX_ID_LEN: usize = 128;
const DEFAULT_TOP_COUNT: u64 = 10;

/// Ids are matched byte for byte, so surrounding whitespace is an error
/// rather than something to strip.
pub fn validate_id(id: &str) -> Result<&str, ApiError> {
    if id.trim().is_empty() {
        return Err(ApiError::validation("Id cannot be empty"));
    }

    if id.trim() != id {
        return Err(ApiError::validation(format!(
            "Id '{id}' must not have leading or trailing whitespace"
        )));
    }

    if id.len() > MAX_ID_LEN {
        return Err(ApiError::validation(format!(
            "Id must be {MAX_ID_LEN} characters or less"
        )));
    }

    Ok(id)
}

/// A body may omit its id, but must not contradict the path.
pub fn validate_body_id<'a>(path_id: &'a str, body_id: &str) -> Result<&'a str, ApiError> {
    let path_id = validate_id(path_id)?;

    if !body_id.is_empty() && body_id != path_id {
        return Err(ApiError::validation(format!(
            "Body id '{body_id}' does not match path id '{path_id}'"
        )));
    }

    Ok(path_id)
}

pub fn validate_name(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

pub fn validate_number(field: &str, value: u32) -> Result<u32, ApiError> {
    if value == 0 {
        return Err(ApiError::validation(format!(
            "Invalid {field}: {value}. Must be a positive integer"
        )));
    }
    Ok(value)
}

pub const fn top_count(count: Option<u64>) -> u64 {
    match count {
        Some(count) => count,
        None => DEFAULT_TOP_COUNT,
    }
}
