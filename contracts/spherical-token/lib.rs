#![cfg_attr(not(feature = "std"), no_std)]

#[ink::contract]
mod spherical_token {
    use ink::prelude::string::String;
    use ink::storage::Mapping;

    pub type PotatoId = u32;
    pub type Result<T> = core::result::Result<T, Error>;

    #[derive(scale::Encode, scale::Decode, Debug, PartialEq, Eq)]
    #[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
    pub enum Error {
        InsufficientBalance,
        NotOwner,
        /// Can cook only your own potatoes!
        NotPotatoOwner,
        PotatoMissing,
        Overflow,
    }

    /// An append-only record: created once, optionally cooked by its creator,
    /// never deleted.
    #[derive(scale::Encode, scale::Decode, Clone, Debug, PartialEq, Eq)]
    #[cfg_attr(
        feature = "std",
        derive(scale_info::TypeInfo, ink::storage::traits::StorageLayout)
    )]
    pub struct Potato {
        pub name_str: String,
        pub weight_val: u64,
        pub cooked_flag: bool,
        pub owner_acc: AccountId,
    }

    #[ink(event)]
    pub struct Transferred {
        #[ink(topic)]
        from_acc: AccountId,
        #[ink(topic)]
        to_acc: AccountId,
        amount_val: Balance,
    }

    #[ink(event)]
    pub struct Minted {
        #[ink(topic)]
        to_acc: AccountId,
        amount_val: Balance,
    }

    #[ink(event)]
    pub struct PotatoAdded {
        #[ink(topic)]
        potato_id: PotatoId,
        #[ink(topic)]
        owner_acc: AccountId,
    }

    #[ink(event)]
    pub struct PotatoCooked {
        #[ink(topic)]
        potato_id: PotatoId,
        #[ink(topic)]
        owner_acc: AccountId,
    }

    #[ink(storage)]
    pub struct SphericalTokenInVacuum {
        // governance / control
        owner_acc: AccountId,

        // token state
        total_supply: Balance,
        balances: Mapping<AccountId, Balance>,

        // potato state: ids are dense, sequential from 0
        potatoes: Mapping<PotatoId, Potato>,
        potato_count: PotatoId,
    }

    impl SphericalTokenInVacuum {
        /// Deployer becomes owner and receives the full initial supply.
        #[ink(constructor)]
        pub fn new(initial_supply_val: Balance) -> Self {
            let deployer_acc = Self::env().caller();
            let mut balances = Mapping::default();
            balances.insert(&deployer_acc, &initial_supply_val);
            Self::env().emit_event(Minted {
                to_acc: deployer_acc,
                amount_val: initial_supply_val,
            });
            Self {
                owner_acc: deployer_acc,
                total_supply: initial_supply_val,
                balances,
                potatoes: Mapping::default(),
                potato_count: 0,
            }
        }

        // -------- modifiers (helpers) --------

        fn only_owner(&self) -> Result<()> {
            if self.env().caller() != self.owner_acc {
                return Err(Error::NotOwner)
            }
            Ok(())
        }

        // -------- read API --------

        #[ink(message)]
        pub fn owner(&self) -> AccountId {
            self.owner_acc
        }

        #[ink(message)]
        pub fn total_supply(&self) -> Balance {
            self.total_supply
        }

        #[ink(message)]
        pub fn balance_of(&self, owner_acc: AccountId) -> Balance {
            self.balances.get(&owner_acc).unwrap_or(0)
        }

        #[ink(message)]
        pub fn my_balance(&self) -> Balance {
            let caller_acc = self.env().caller();
            self.balance_of(caller_acc)
        }

        /// Current stored record for `potato_id`, or `None` if it was never added.
        #[ink(message)]
        pub fn sack(&self, potato_id: PotatoId) -> Option<Potato> {
            self.potatoes.get(&potato_id)
        }

        #[ink(message)]
        pub fn potato_count(&self) -> PotatoId {
            self.potato_count
        }

        // -------- write API: token --------

        #[ink(message)]
        pub fn transfer(&mut self, to_acc: AccountId, amount_val: Balance) -> Result<()> {
            let from_acc = self.env().caller();
            self.move_balance(from_acc, to_acc, amount_val)
        }

        /// Privileged mint: only the contract owner may expand the supply.
        #[ink(message)]
        pub fn mint(&mut self, to_acc: AccountId, amount_val: Balance) -> Result<()> {
            self.only_owner()?;
            self.mint_internal(to_acc, amount_val)
        }

        // -------- write API: potatoes --------

        /// Append a new potato owned by the caller. Ids are assigned in call
        /// order, starting at 0.
        #[ink(message)]
        pub fn add_potato(&mut self, name_str: String, weight_val: u64) -> Result<PotatoId> {
            let owner_acc = self.env().caller();
            let potato_id = self.potato_count;
            self.potato_count = potato_id.checked_add(1).ok_or(Error::Overflow)?;

            self.potatoes.insert(
                &potato_id,
                &Potato {
                    name_str,
                    weight_val,
                    cooked_flag: false,
                    owner_acc,
                },
            );

            self.env().emit_event(PotatoAdded { potato_id, owner_acc });
            Ok(potato_id)
        }

        /// Mark a potato cooked. Can cook only your own potatoes!
        #[ink(message)]
        pub fn cook_potato(&mut self, potato_id: PotatoId) -> Result<()> {
            let mut potato = self.potatoes.get(&potato_id).ok_or(Error::PotatoMissing)?;

            let caller_acc = self.env().caller();
            if potato.owner_acc != caller_acc {
                return Err(Error::NotPotatoOwner)
            }

            potato.cooked_flag = true;
            self.potatoes.insert(&potato_id, &potato);

            self.env().emit_event(PotatoCooked {
                potato_id,
                owner_acc: caller_acc,
            });
            Ok(())
        }

        // ---- internals ----

        fn mint_internal(&mut self, to_acc: AccountId, amount_val: Balance) -> Result<()> {
            let new_total = self.total_supply.checked_add(amount_val).ok_or(Error::Overflow)?;
            self.total_supply = new_total;

            let to_bal = self.balances.get(&to_acc).unwrap_or(0);
            let new_to = to_bal.checked_add(amount_val).ok_or(Error::Overflow)?;
            self.balances.insert(&to_acc, &new_to);

            self.env().emit_event(Minted { to_acc, amount_val });
            Ok(())
        }

        fn move_balance(&mut self, from_acc: AccountId, to_acc: AccountId, amount_val: Balance) -> Result<()> {
            // The balance check precedes all writes: a failed transfer leaves
            // every balance untouched.
            let from_bal = self.balances.get(&from_acc).unwrap_or(0);
            if from_bal < amount_val {
                return Err(Error::InsufficientBalance)
            }
            let new_from = from_bal.checked_sub(amount_val).ok_or(Error::Overflow)?;
            self.balances.insert(&from_acc, &new_from);

            // The debit is written before the credit is read, so a
            // self-transfer nets to zero instead of minting.
            let to_bal = self.balances.get(&to_acc).unwrap_or(0);
            let new_to = to_bal.checked_add(amount_val).ok_or(Error::Overflow)?;
            self.balances.insert(&to_acc, &new_to);

            self.env().emit_event(Transferred { from_acc, to_acc, amount_val });
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use ink::env::test;

        type Env = ink::env::DefaultEnvironment;

        fn default_accounts() -> test::DefaultAccounts<Env> {
            test::default_accounts::<Env>()
        }

        fn set_caller(caller_acc: AccountId) {
            test::set_caller::<Env>(caller_acc);
        }

        fn deploy(initial_supply_val: Balance) -> SphericalTokenInVacuum {
            SphericalTokenInVacuum::new(initial_supply_val)
        }

        #[ink::test]
        fn deployment_sets_owner() {
            let accs = default_accounts();
            set_caller(accs.alice);
            let stv = deploy(1_000);
            assert_eq!(stv.owner(), accs.alice);
        }

        #[ink::test]
        fn deployment_assigns_supply_to_owner() {
            let accs = default_accounts();
            set_caller(accs.alice);
            let stv = deploy(1_000);
            assert_eq!(stv.total_supply(), 1_000);
            assert_eq!(stv.balance_of(accs.alice), stv.total_supply());

            let events = test::recorded_events().collect::<Vec<_>>();
            let minted = <Minted as scale::Decode>::decode(&mut &events[0].data[..])
                .expect("invalid Minted event data");
            assert_eq!(minted.to_acc, accs.alice);
            assert_eq!(minted.amount_val, 1_000);
        }

        #[ink::test]
        fn transfer_moves_exact_amounts() {
            let accs = default_accounts();
            set_caller(accs.alice);
            let mut stv = deploy(1_000);

            assert_eq!(stv.transfer(accs.bob, 50), Ok(()));
            assert_eq!(stv.balance_of(accs.alice), 950);
            assert_eq!(stv.balance_of(accs.bob), 50);
            // sum of balances is invariant under transfer
            assert_eq!(stv.balance_of(accs.alice) + stv.balance_of(accs.bob), stv.total_supply());

            set_caller(accs.bob);
            assert_eq!(stv.transfer(accs.charlie, 20), Ok(()));
            assert_eq!(stv.balance_of(accs.bob), 30);
            assert_eq!(stv.balance_of(accs.charlie), 20);

            let events = test::recorded_events().collect::<Vec<_>>();
            let transferred = <Transferred as scale::Decode>::decode(&mut &events[1].data[..])
                .expect("invalid Transferred event data");
            assert_eq!(transferred.from_acc, accs.alice);
            assert_eq!(transferred.to_acc, accs.bob);
            assert_eq!(transferred.amount_val, 50);
        }

        #[ink::test]
        fn transfer_exceeding_balance_changes_nothing() {
            let accs = default_accounts();
            set_caller(accs.alice);
            let mut stv = deploy(100);

            set_caller(accs.bob);
            assert_eq!(stv.transfer(accs.alice, 1), Err(Error::InsufficientBalance));
            assert_eq!(stv.balance_of(accs.alice), 100);
            assert_eq!(stv.balance_of(accs.bob), 0);

            set_caller(accs.alice);
            assert_eq!(stv.transfer(accs.bob, 101), Err(Error::InsufficientBalance));
            assert_eq!(stv.balance_of(accs.alice), 100);
            assert_eq!(stv.balance_of(accs.bob), 0);
        }

        #[ink::test]
        fn self_transfer_does_not_inflate_supply() {
            let accs = default_accounts();
            set_caller(accs.alice);
            let mut stv = deploy(100);

            assert_eq!(stv.transfer(accs.alice, 50), Ok(()));
            assert_eq!(stv.balance_of(accs.alice), 100);
            assert_eq!(stv.total_supply(), 100);
        }

        #[ink::test]
        fn my_balance_reads_caller_balance() {
            let accs = default_accounts();
            set_caller(accs.alice);
            let mut stv = deploy(100);
            stv.transfer(accs.bob, 40).unwrap();

            assert_eq!(stv.my_balance(), 60);
            set_caller(accs.bob);
            assert_eq!(stv.my_balance(), 40);
        }

        #[ink::test]
        fn potato_ids_are_sequential_and_attributed_to_caller() {
            let accs = default_accounts();
            set_caller(accs.alice);
            let mut stv = deploy(0);

            assert_eq!(stv.add_potato("Mr. Potato".into(), 200), Ok(0));
            set_caller(accs.bob);
            assert_eq!(stv.add_potato("Mrs. Potato".into(), 150), Ok(1));
            assert_eq!(stv.potato_count(), 2);

            let events = test::recorded_events().collect::<Vec<_>>();
            // events[0] is the constructor's Minted
            let first = <PotatoAdded as scale::Decode>::decode(&mut &events[1].data[..])
                .expect("invalid PotatoAdded event data");
            assert_eq!(first.potato_id, 0);
            assert_eq!(first.owner_acc, accs.alice);
            let second = <PotatoAdded as scale::Decode>::decode(&mut &events[2].data[..])
                .expect("invalid PotatoAdded event data");
            assert_eq!(second.potato_id, 1);
            assert_eq!(second.owner_acc, accs.bob);
        }

        #[ink::test]
        fn sack_returns_stored_record() {
            let accs = default_accounts();
            set_caller(accs.alice);
            let mut stv = deploy(0);
            stv.add_potato("Mr. Potato".into(), 200).unwrap();

            let potato = stv.sack(0).expect("potato 0 should exist");
            assert_eq!(potato.name_str, "Mr. Potato");
            assert_eq!(potato.weight_val, 200);
            assert_eq!(potato.owner_acc, accs.alice);
            assert!(!potato.cooked_flag);

            assert_eq!(stv.sack(1), None);
        }

        #[ink::test]
        fn only_creator_can_cook() {
            let accs = default_accounts();
            set_caller(accs.alice);
            let mut stv = deploy(0);
            stv.add_potato("Mr. Potato".into(), 200).unwrap();

            set_caller(accs.bob);
            assert_eq!(stv.cook_potato(0), Err(Error::NotPotatoOwner));
            assert!(!stv.sack(0).unwrap().cooked_flag);

            set_caller(accs.alice);
            assert_eq!(stv.cook_potato(0), Ok(()));
            assert!(stv.sack(0).unwrap().cooked_flag);

            let events = test::recorded_events().collect::<Vec<_>>();
            let cooked = <PotatoCooked as scale::Decode>::decode(&mut &events.last().unwrap().data[..])
                .expect("invalid PotatoCooked event data");
            assert_eq!(cooked.potato_id, 0);
            assert_eq!(cooked.owner_acc, accs.alice);
        }

        #[ink::test]
        fn cook_missing_potato_fails() {
            let accs = default_accounts();
            set_caller(accs.alice);
            let mut stv = deploy(0);
            assert_eq!(stv.cook_potato(7), Err(Error::PotatoMissing));
        }

        #[ink::test]
        fn mint_is_owner_only_and_grows_supply() {
            let accs = default_accounts();
            set_caller(accs.alice);
            let mut stv = deploy(1_000);

            assert_eq!(stv.mint(accs.bob, 228), Ok(()));
            assert_eq!(stv.total_supply(), 1_228);
            assert_eq!(stv.balance_of(accs.bob), 228);

            set_caller(accs.bob);
            assert_eq!(stv.mint(accs.bob, 1), Err(Error::NotOwner));
            assert_eq!(stv.total_supply(), 1_228);
        }
    }

}
