//! Profile resource records.

use crate::Resource;
use serde::{Deserialize, Serialize};

/// A user profile pulled from the source system.
///
/// The source keys accounts by email; the destination requires a username,
/// derived from the email local part (see [`Profile::username`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Profile {
    /// Stable source id
    pub id: String,
    /// Display name
    pub name: String,
    /// Free-form biography; may be empty
    pub bio: String,
    /// Account email; also the source account id
    pub email: String,
    /// Source record schema version
    pub schema: i64,
    /// Last modification timestamp, epoch milliseconds
    pub last_modified: i64,
}

impl Profile {
    /// Destination username: lowercase local part of the email with `-`
    /// replaced by `.` (emails are not valid usernames there).
    ///
    /// # Examples
    ///
    /// ```
    /// # use caravel_core::Profile;
    /// let p = Profile {
    ///     id: "p1".into(),
    ///     name: "Jean-Paul".into(),
    ///     bio: String::new(),
    ///     email: "Jean-Paul.Dupont@example.org".into(),
    ///     schema: 1,
    ///     last_modified: 0,
    /// };
    /// assert_eq!(p.username(), "jean.paul.dupont");
    /// ```
    pub fn username(&self) -> String {
        self.email
            .split('@')
            .next()
            .unwrap_or(&self.email)
            .to_lowercase()
            .replace('-', ".")
    }

    /// Destination display name: dots in the source name become spaces.
    pub fn display_name(&self) -> String {
        self.name.replace('.', " ")
    }
}

impl Resource for Profile {
    const KIND: &'static str = "profile";

    fn id(&self) -> &str {
        &self.id
    }

    fn order_key(&self) -> i64 {
        self.last_modified
    }
}
