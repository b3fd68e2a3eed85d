//! Caller policies enforced before a repertoire is created.

use crate::error::RepertoireError;

/// Default bound on the length of a repertoire name, in characters
pub const DEFAULT_MAX_NAME_LENGTH: usize = 100;

/// Default bound on the number of repertoires one owner may have
pub const DEFAULT_MAX_REPERTOIRES_PER_OWNER: usize = 50;

/// Limits checked by the [RepertoireService](crate::service::RepertoireService).
///
/// # Example
/// ```
/// use repertoire::service::RepertoireLimits;
///
/// let limits = RepertoireLimits::default().with_max_repertoires_per_owner(3);
/// assert_eq!(limits.validate_name("  Sicilian  ").unwrap(), "Sicilian");
/// assert!(limits.validate_name("   ").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepertoireLimits {
    pub max_name_length: usize,
    pub max_repertoires_per_owner: usize,
}

impl Default for RepertoireLimits {
    fn default() -> Self {
        Self {
            max_name_length: DEFAULT_MAX_NAME_LENGTH,
            max_repertoires_per_owner: DEFAULT_MAX_REPERTOIRES_PER_OWNER,
        }
    }
}

impl RepertoireLimits {
    pub fn with_max_name_length(mut self, max: usize) -> Self {
        self.max_name_length = max;
        self
    }

    pub fn with_max_repertoires_per_owner(mut self, max: usize) -> Self {
        self.max_repertoires_per_owner = max;
        self
    }

    /// Trims `name` and checks it is non-empty and short enough.
    ///
    /// # Returns
    /// * `Ok(&str)` - The trimmed name
    /// * `Err(NameRequired)` - If nothing but whitespace is left
    /// * `Err(NameTooLong)` - If the trimmed name has more than `max_name_length` characters
    pub fn validate_name<'a>(&self, name: &'a str) -> Result<&'a str, RepertoireError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(RepertoireError::NameRequired);
        }
        if trimmed.chars().count() > self.max_name_length {
            return Err(RepertoireError::NameTooLong {
                max: self.max_name_length,
            });
        }
        Ok(trimmed)
    }

    /// Checks that an owner with `current` repertoires may create another one.
    pub fn check_capacity(&self, current: usize) -> Result<(), RepertoireError> {
        if current >= self.max_repertoires_per_owner {
            return Err(RepertoireError::LimitReached {
                max: self.max_repertoires_per_owner,
            });
        }
        Ok(())
    }
}
