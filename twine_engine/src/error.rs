use thiserror::Error;

/// Fatal interpreter failures. Scripts are trusted game data, so any of these
/// means the asset is corrupt or incompatible and the caller should abort.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifeError {
    #[error("actor {actor}: opcode {opcode:#04x} at offset {offset} is outside the life table")]
    UnknownOpcode {
        actor: usize,
        offset: usize,
        opcode: u8,
    },
    #[error("actor {actor}: unknown life condition {condition:#04x} at offset {offset}")]
    UnknownCondition {
        actor: usize,
        offset: usize,
        condition: u8,
    },
    #[error("life script truncated: {needed} byte(s) requested at offset {offset} of {len}")]
    Truncated {
        offset: usize,
        needed: usize,
        len: usize,
    },
    #[error("jump to offset {target} outside the {len}-byte life script")]
    InvalidJump { target: i32, len: usize },
    #[error("actor index {index} is outside the {count}-actor scene table")]
    InvalidActor { index: i32, count: usize },
    #[error("{table} index {index} is out of range (limit {limit})")]
    InvalidIndex {
        table: &'static str,
        index: i32,
        limit: usize,
    },
    #[error("actor {actor}: stored life cursor {cursor} is outside its {len}-byte script")]
    InvalidCursor { actor: usize, cursor: i32, len: usize },
    #[error("movie name at offset {offset} exceeds {max} bytes")]
    MovieNameTooLong { offset: usize, max: usize },
}

pub type LifeResult<T> = Result<T, LifeError>;

/// Bounds-check a small table index coming from script bytes.
pub(crate) fn check_index(table: &'static str, index: i32, limit: usize) -> LifeResult<usize> {
    if index >= 0 && (index as usize) < limit {
        Ok(index as usize)
    } else {
        Err(LifeError::InvalidIndex {
            table,
            index,
            limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_check_reports_the_table() {
        assert_eq!(check_index("scene flag", 79, 80), Ok(79));
        let err = check_index("scene flag", 80, 80).unwrap_err();
        assert_eq!(
            err.to_string(),
            "scene flag index 80 is out of range (limit 80)"
        );
        assert!(check_index("track", -1, 4).is_err());
    }
}
