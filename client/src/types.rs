//! SCALE mirrors of the on-chain types this client exchanges with
//! pallet-contracts and with the SphericalTokenInVacuum contract. The client
//! deliberately does not link the contract crate; like the metadata artifact,
//! these mirror the deployed interface.

use core::fmt;

use scale::{Decode, Encode};
use subxt::utils::AccountId32;

/// Weight v2, encoded with compact fields as in `ContractResult`.
#[derive(Encode, Decode, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Weight {
    #[codec(compact)]
    pub ref_time: u64,
    #[codec(compact)]
    pub proof_size: u64,
}

impl Weight {
    /// The naive 2x safety margin applied to estimated gas before
    /// submission.
    pub fn double(self) -> Self {
        Self {
            ref_time: self.ref_time.saturating_mul(2),
            proof_size: self.proof_size.saturating_mul(2),
        }
    }
}

/// Argument block of the `ContractsApi_call` runtime API.
#[derive(Encode)]
pub struct CallRequest {
    pub origin: AccountId32,
    pub dest: AccountId32,
    pub value: u128,
    pub gas_limit: Option<Weight>,
    pub storage_deposit_limit: Option<u128>,
    pub input_data: Vec<u8>,
}

#[derive(Decode, Debug)]
pub enum StorageDeposit {
    Refund(u128),
    Charge(u128),
}

/// Prefix of `ContractResult` as returned by `ContractsApi_call`. Trailing
/// fields some runtimes append (collected events) are ignored.
#[derive(Decode, Debug)]
pub struct ContractExecResult {
    pub gas_consumed: Weight,
    pub gas_required: Weight,
    pub storage_deposit: StorageDeposit,
    pub debug_message: Vec<u8>,
    pub result: Result<ExecReturnValue, DispatchError>,
}

#[derive(Decode, Debug)]
pub struct ExecReturnValue {
    pub flags: u32,
    pub data: Vec<u8>,
}

impl ExecReturnValue {
    pub fn did_revert(&self) -> bool {
        self.flags & 1 != 0
    }
}

#[derive(Decode, Debug)]
pub struct ModuleError {
    pub index: u8,
    pub error: [u8; 4],
}

#[derive(Decode, Debug)]
pub enum TokenError {
    FundsUnavailable,
    OnlyProvider,
    BelowMinimum,
    CannotCreate,
    UnknownAsset,
    Frozen,
    Unsupported,
    CannotCreateHold,
    NotExpendable,
    Blocked,
}

#[derive(Decode, Debug)]
pub enum ArithmeticError {
    Underflow,
    Overflow,
    DivisionByZero,
}

#[derive(Decode, Debug)]
pub enum TransactionalError {
    LimitReached,
    NoLayer,
}

/// `sp_runtime::DispatchError`, variant order matters.
#[derive(Decode, Debug)]
pub enum DispatchError {
    Other,
    CannotLookup,
    BadOrigin,
    Module(ModuleError),
    ConsumerRemaining,
    NoProviders,
    TooManyConsumers,
    Token(TokenError),
    Arithmetic(ArithmeticError),
    Transactional(TransactionalError),
    Exhausted,
    Corruption,
    Unavailable,
    RootNotAllowed,
}

/// Field block of the `Contracts::ContractEmitted` event.
#[derive(Decode, Debug)]
pub struct ContractEmitted {
    pub contract: AccountId32,
    pub data: Vec<u8>,
}

/// ink! message-dispatch failure, wrapped around every message return value.
#[derive(Encode, Decode, Debug, PartialEq, Eq)]
pub enum LangError {
    #[codec(index = 1)]
    CouldNotReadInput,
}

/// The contract's error enum.
#[derive(Encode, Decode, Debug, PartialEq, Eq)]
pub enum ContractError {
    InsufficientBalance,
    NotOwner,
    NotPotatoOwner,
    PotatoMissing,
    Overflow,
}

impl fmt::Display for ContractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::InsufficientBalance => "transfer amount exceeds balance",
            Self::NotOwner => "caller is not the contract owner",
            Self::NotPotatoOwner => "Can cook only your own potatoes!",
            Self::PotatoMissing => "no such potato",
            Self::Overflow => "arithmetic overflow",
        };
        f.write_str(reason)
    }
}

#[derive(Decode, Debug, PartialEq, Eq)]
pub struct Potato {
    pub name_str: String,
    pub weight_val: u64,
    pub cooked_flag: bool,
    pub owner_acc: AccountId32,
}

impl fmt::Display for Potato {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Potato {{ name: {:?}, weight: {}, cooked: {}, owner: {} }}",
            self.name_str, self.weight_val, self.cooked_flag, self.owner_acc
        )
    }
}

#[derive(Decode, Debug)]
pub struct PotatoAdded {
    pub potato_id: u32,
    pub owner_acc: AccountId32,
}

impl fmt::Display for PotatoAdded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PotatoAdded {{ potato_id: {}, owner: {} }}",
            self.potato_id, self.owner_acc
        )
    }
}

#[derive(Decode, Debug)]
pub struct PotatoCooked {
    pub potato_id: u32,
    pub owner_acc: AccountId32,
}

impl fmt::Display for PotatoCooked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PotatoCooked {{ potato_id: {}, owner: {} }}",
            self.potato_id, self.owner_acc
        )
    }
}

#[derive(Decode, Debug)]
pub struct Transferred {
    pub from_acc: AccountId32,
    pub to_acc: AccountId32,
    pub amount_val: u128,
}

impl fmt::Display for Transferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Transferred {{ from: {}, to: {}, amount: {} }}",
            self.from_acc, self.to_acc, self.amount_val
        )
    }
}

#[derive(Decode, Debug)]
pub struct Minted {
    pub to_acc: AccountId32,
    pub amount_val: u128,
}

impl fmt::Display for Minted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Minted {{ to: {}, amount: {} }}",
            self.to_acc, self.amount_val
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gas_margin_doubles_and_saturates() {
        let gas = Weight { ref_time: 10, proof_size: 3 };
        assert_eq!(gas.double(), Weight { ref_time: 20, proof_size: 6 });

        let huge = Weight { ref_time: u64::MAX, proof_size: u64::MAX - 1 };
        assert_eq!(huge.double(), Weight { ref_time: u64::MAX, proof_size: u64::MAX });
    }

    #[test]
    fn revert_flag_is_bit_zero() {
        let ok = ExecReturnValue { flags: 0, data: vec![] };
        assert!(!ok.did_revert());
        let reverted = ExecReturnValue { flags: 1, data: vec![] };
        assert!(reverted.did_revert());
    }

    #[test]
    fn lang_error_uses_explicit_variant_index() {
        // ink reserves index 0; dispatch failures arrive as variant 1.
        assert_eq!(LangError::CouldNotReadInput.encode(), vec![1]);
        assert_eq!(
            <LangError as Decode>::decode(&mut &[1u8][..]).unwrap(),
            LangError::CouldNotReadInput
        );
    }

    #[test]
    fn contract_error_reports_cook_access_violation() {
        assert_eq!(
            ContractError::NotPotatoOwner.to_string(),
            "Can cook only your own potatoes!"
        );
        // Variant order mirrors the deployed contract's Error enum.
        assert_eq!(ContractError::NotPotatoOwner.encode(), vec![2]);
    }

    #[test]
    fn potato_record_decodes_from_message_return_data() {
        // Ok(Some(potato)) as the `sack` message would return it.
        let mut data = Vec::new();
        0u8.encode_to(&mut data); // Result::Ok
        1u8.encode_to(&mut data); // Option::Some
        "Mr. Potato".to_string().encode_to(&mut data);
        200u64.encode_to(&mut data);
        false.encode_to(&mut data);
        AccountId32([7u8; 32]).encode_to(&mut data);

        let decoded =
            <Result<Option<Potato>, LangError>>::decode(&mut &data[..]).unwrap();
        let potato = decoded.unwrap().unwrap();
        assert_eq!(potato.name_str, "Mr. Potato");
        assert_eq!(potato.weight_val, 200);
        assert!(!potato.cooked_flag);
        assert_eq!(potato.owner_acc, AccountId32([7u8; 32]));
    }
}
