// Copyright(C) Mundis.
use {
    crate::{
        account::{AccountName, AccountPermission, FuncName},
        codec,
        error::ModelResult,
    },
    serde::{de::DeserializeOwned, Deserialize, Serialize},
};

/// A typed, opaque payload addressed to the `type_name` action of the `code` contract.
///
/// The runtime never interprets `data`; only the contract handling the message does.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// The contract account that handles this message.
    pub code: AccountName,
    /// The action within `code`.
    pub type_name: FuncName,
    /// Permissions the sender claims for this message.
    pub authorization: Vec<AccountPermission>,
    #[serde(with = "serde_bytes")]
    pub data: Vec<u8>,
}

impl Message {
    pub fn new(
        code: AccountName,
        type_name: FuncName,
        authorization: Vec<AccountPermission>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            code,
            type_name,
            authorization,
            data,
        }
    }

    /// Builds a message whose payload is the canonical encoding of `payload`.
    pub fn with_payload<T: Serialize>(
        code: AccountName,
        type_name: FuncName,
        authorization: Vec<AccountPermission>,
        payload: &T,
    ) -> ModelResult<Self> {
        Ok(Self::new(code, type_name, authorization, codec::encode(payload)?))
    }

    /// Replaces the action and payload, keeping the target and authorization.
    pub fn set_payload<T: Serialize>(&mut self, type_name: FuncName, payload: &T) -> ModelResult<()> {
        self.data = codec::encode(payload)?;
        self.type_name = type_name;
        Ok(())
    }

    pub fn payload_as<T: DeserializeOwned>(&self) -> ModelResult<T> {
        codec::decode(&self.data)
    }
}
