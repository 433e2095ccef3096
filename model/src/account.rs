// Copyright(C) Mundis.
use {
    crate::error::ModelError,
    serde::{Deserialize, Serialize},
    std::{fmt, str::FromStr},
};

/// Longest name the chain accepts.
pub const MAX_NAME_LEN: usize = 12;

/// A chain-level identifier for accounts, permissions and contract actions.
///
/// Names are 1 to 12 characters drawn from `a-z`, `1-5` and `.`, and never end with a `.`.
/// Validation runs on every construction path, including deserialization, so a `Name` in
/// memory is always well formed.
#[derive(Serialize, Deserialize, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Name(String);

pub type AccountName = Name;
pub type PermissionName = Name;
pub type FuncName = Name;

impl Name {
    pub fn new(name: &str) -> Result<Self, ModelError> {
        let valid_chars = name
            .bytes()
            .all(|c| matches!(c, b'a'..=b'z' | b'1'..=b'5' | b'.'));
        if name.is_empty() || name.len() > MAX_NAME_LEN || !valid_chars || name.ends_with('.') {
            return Err(ModelError::InvalidName(name.to_string()));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Name {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Name {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Name> for String {
    fn from(name: Name) -> Self {
        name.0
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An `account@permission` pair a message claims to be authorized by.
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct AccountPermission {
    pub account: AccountName,
    pub permission: PermissionName,
}

impl AccountPermission {
    pub fn new(account: AccountName, permission: PermissionName) -> Self {
        Self { account, permission }
    }
}

impl fmt::Display for AccountPermission {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}@{}", self.account, self.permission)
    }
}
