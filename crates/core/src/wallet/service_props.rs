//! Property-based tests for the custodial wallet.

use proptest::prelude::*;
use rust_decimal::Decimal;

use vireo_shared::types::UserId;

use super::service::{CustodialWallet, WalletService};

/// Strategy for generating positive amounts at money scale.
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// One wallet operation.
#[derive(Debug, Clone)]
enum Op {
    Credit(Decimal),
    Lock(Decimal),
    Release(Decimal),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        amount_strategy().prop_map(Op::Credit),
        amount_strategy().prop_map(Op::Lock),
        amount_strategy().prop_map(Op::Release),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Locking and releasing the same amount restores the balance
    /// bit-for-bit.
    #[test]
    fn prop_lock_release_round_trip(
        (lock, fund) in (amount_strategy(), amount_strategy())
            .prop_filter("lock must fit in funding", |(lock, fund)| lock <= fund),
    ) {
        let wallet = CustodialWallet::new();
        let user = UserId::new("prop_user");
        wallet.credit(&user, fund).unwrap();
        let before = wallet.balance(&user);

        wallet.lock_funds(&user, lock).unwrap();
        wallet.release_funds(&user, lock).unwrap();

        let after = wallet.balance(&user);
        prop_assert_eq!(after.total, before.total);
        prop_assert_eq!(after.locked, before.locked);
        prop_assert_eq!(after.available, before.available);
    }

    /// Releasing more than is locked always fails and changes nothing.
    #[test]
    fn prop_over_release_always_fails(
        (lock, fund, extra) in (amount_strategy(), amount_strategy(), amount_strategy())
            .prop_filter("lock must fit in funding", |(lock, fund, _)| lock <= fund),
    ) {
        let wallet = CustodialWallet::new();
        let user = UserId::new("prop_user");
        wallet.credit(&user, fund).unwrap();
        wallet.lock_funds(&user, lock).unwrap();

        prop_assert!(wallet.release_funds(&user, lock + extra).is_err());
        prop_assert_eq!(wallet.balance(&user).locked, lock);
    }

    /// The wallet agrees with a straight-line reference model after
    /// any sequence of operations, and `0 <= locked <= total` holds
    /// at every step.
    #[test]
    fn prop_wallet_matches_reference_model(
        ops in prop::collection::vec(op_strategy(), 1..40),
    ) {
        let wallet = CustodialWallet::new();
        let user = UserId::new("prop_user");
        let mut model_total = Decimal::ZERO;
        let mut model_locked = Decimal::ZERO;

        for op in ops {
            match op {
                Op::Credit(amount) => {
                    prop_assert!(wallet.credit(&user, amount).is_ok());
                    model_total += amount;
                }
                Op::Lock(amount) => {
                    let result = wallet.lock_funds(&user, amount);
                    if model_total - model_locked >= amount {
                        prop_assert!(result.is_ok());
                        model_locked += amount;
                    } else {
                        prop_assert!(result.is_err());
                    }
                }
                Op::Release(amount) => {
                    let result = wallet.release_funds(&user, amount);
                    if model_locked >= amount {
                        prop_assert!(result.is_ok());
                        model_locked -= amount;
                    } else {
                        prop_assert!(result.is_err());
                    }
                }
            }

            let balance = wallet.balance(&user);
            prop_assert_eq!(balance.total, model_total);
            prop_assert_eq!(balance.locked, model_locked);
            prop_assert_eq!(balance.available, model_total - model_locked);
            prop_assert!(balance.locked >= Decimal::ZERO);
            prop_assert!(balance.total >= balance.locked);
        }
    }
}
