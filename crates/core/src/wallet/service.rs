//! Wallet service trait and the in-process custodial wallet.
//!
//! The wallet is the single source of truth for funds. Transactions
//! reference amounts but never mutate balances themselves.

use dashmap::DashMap;
use rust_decimal::Decimal;
use tracing::debug;
use vireo_shared::types::{UserId, to_money_scale, validate_amount};

use crate::wallet::balance::AccountBalance;
use crate::wallet::error::WalletError;

/// Custodial balance operations.
///
/// Implementations must make each operation atomic per account:
/// concurrent calls for the same user behave as if executed one at a
/// time, and calls for different users do not contend.
pub trait WalletService: Send + Sync {
    /// Reserves `amount` of the user's available balance.
    ///
    /// # Errors
    ///
    /// `InsufficientFunds` if `available < amount`, `InvalidAmount`
    /// for non-positive or over-precise amounts. Nothing changes on
    /// error.
    fn lock_funds(&self, user_id: &UserId, amount: Decimal) -> Result<(), WalletError>;

    /// Returns a previously reserved `amount` to the available balance.
    ///
    /// # Errors
    ///
    /// `InsufficientLockedFunds` if `locked < amount`. The wallet
    /// never clamps; an over-release means the books are wrong.
    fn release_funds(&self, user_id: &UserId, amount: Decimal) -> Result<(), WalletError>;

    /// Adds funds to the account, creating it on first credit.
    ///
    /// # Errors
    ///
    /// `InvalidAmount` for non-positive or over-precise amounts.
    fn credit(&self, user_id: &UserId, amount: Decimal) -> Result<AccountBalance, WalletError>;

    /// Snapshot of the account. Unknown users read as all zeros.
    fn balance(&self, user_id: &UserId) -> AccountBalance;
}

/// Stored totals for one account.
#[derive(Debug, Clone, Copy, Default)]
struct AccountState {
    total: Decimal,
    locked: Decimal,
}

/// In-process custodial wallet.
///
/// Accounts live in a sharded map; each operation runs under that
/// account's entry guard, so check-and-update is atomic per account
/// without any wallet-wide lock.
#[derive(Debug, Default)]
pub struct CustodialWallet {
    accounts: DashMap<UserId, AccountState>,
}

impl CustodialWallet {
    /// Creates an empty wallet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl WalletService for CustodialWallet {
    fn lock_funds(&self, user_id: &UserId, amount: Decimal) -> Result<(), WalletError> {
        validate_amount(amount)?;
        let amount = to_money_scale(amount);

        let mut account =
            self.accounts
                .get_mut(user_id)
                .ok_or(WalletError::InsufficientFunds {
                    requested: amount,
                    available: Decimal::ZERO,
                })?;

        let available = account.total - account.locked;
        if available < amount {
            return Err(WalletError::InsufficientFunds {
                requested: amount,
                available,
            });
        }

        account.locked += amount;
        debug!(
            user_id = %user_id,
            amount = %amount,
            locked = %account.locked,
            "funds locked"
        );
        Ok(())
    }

    fn release_funds(&self, user_id: &UserId, amount: Decimal) -> Result<(), WalletError> {
        validate_amount(amount)?;
        let amount = to_money_scale(amount);

        let mut account =
            self.accounts
                .get_mut(user_id)
                .ok_or(WalletError::InsufficientLockedFunds {
                    requested: amount,
                    locked: Decimal::ZERO,
                })?;

        if account.locked < amount {
            return Err(WalletError::InsufficientLockedFunds {
                requested: amount,
                locked: account.locked,
            });
        }

        account.locked -= amount;
        debug!(
            user_id = %user_id,
            amount = %amount,
            locked = %account.locked,
            "funds released"
        );
        Ok(())
    }

    fn credit(&self, user_id: &UserId, amount: Decimal) -> Result<AccountBalance, WalletError> {
        validate_amount(amount)?;
        let amount = to_money_scale(amount);

        let mut account = self.accounts.entry(user_id.clone()).or_default();
        account.total += amount;
        let snapshot = AccountBalance::new(account.total, account.locked);
        drop(account);

        debug!(
            user_id = %user_id,
            amount = %amount,
            total = %snapshot.total,
            "account credited"
        );
        Ok(snapshot)
    }

    fn balance(&self, user_id: &UserId) -> AccountBalance {
        self.accounts.get(user_id).map_or_else(AccountBalance::zero, |account| {
            AccountBalance::new(account.total, account.locked)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use vireo_shared::types::AmountError;

    fn user() -> UserId {
        UserId::new("vietnam_user_1")
    }

    #[test]
    fn test_credit_creates_account() {
        let wallet = CustodialWallet::new();
        let balance = wallet.credit(&user(), dec!(1000.00)).unwrap();
        assert_eq!(balance.total, dec!(1000.00));
        assert_eq!(balance.locked, dec!(0));
        assert_eq!(balance.available, dec!(1000.00));
    }

    #[test]
    fn test_credit_accumulates() {
        let wallet = CustodialWallet::new();
        wallet.credit(&user(), dec!(600.00)).unwrap();
        let balance = wallet.credit(&user(), dec!(400.00)).unwrap();
        assert_eq!(balance.total, dec!(1000.00));
    }

    #[test]
    fn test_lock_reduces_available_not_total() {
        let wallet = CustodialWallet::new();
        wallet.credit(&user(), dec!(1000.00)).unwrap();
        wallet.lock_funds(&user(), dec!(500.00)).unwrap();

        let balance = wallet.balance(&user());
        assert_eq!(balance.total, dec!(1000.00));
        assert_eq!(balance.locked, dec!(500.00));
        assert_eq!(balance.available, dec!(500.00));
    }

    #[test]
    fn test_lock_beyond_available_fails() {
        let wallet = CustodialWallet::new();
        wallet.credit(&user(), dec!(1000.00)).unwrap();

        let err = wallet.lock_funds(&user(), dec!(1500.00)).unwrap_err();
        assert_eq!(
            err,
            WalletError::InsufficientFunds {
                requested: dec!(1500.00),
                available: dec!(1000.00),
            }
        );
        // Nothing changed.
        assert_eq!(wallet.balance(&user()).available, dec!(1000.00));
    }

    #[test]
    fn test_lock_counts_existing_reservations() {
        let wallet = CustodialWallet::new();
        wallet.credit(&user(), dec!(1000.00)).unwrap();
        wallet.lock_funds(&user(), dec!(800.00)).unwrap();

        let err = wallet.lock_funds(&user(), dec!(300.00)).unwrap_err();
        assert_eq!(
            err,
            WalletError::InsufficientFunds {
                requested: dec!(300.00),
                available: dec!(200.00),
            }
        );
    }

    #[test]
    fn test_lock_unknown_user_fails() {
        let wallet = CustodialWallet::new();
        let err = wallet.lock_funds(&user(), dec!(10.00)).unwrap_err();
        assert_eq!(
            err,
            WalletError::InsufficientFunds {
                requested: dec!(10.00),
                available: dec!(0),
            }
        );
    }

    #[test]
    fn test_release_restores_available_exactly() {
        let wallet = CustodialWallet::new();
        wallet.credit(&user(), dec!(1000.00)).unwrap();
        wallet.lock_funds(&user(), dec!(500.00)).unwrap();
        wallet.release_funds(&user(), dec!(500.00)).unwrap();

        let balance = wallet.balance(&user());
        assert_eq!(balance.total, dec!(1000.00));
        assert_eq!(balance.locked, dec!(0.00));
        assert_eq!(balance.available, dec!(1000.00));
    }

    #[test]
    fn test_over_release_fails_loudly() {
        let wallet = CustodialWallet::new();
        wallet.credit(&user(), dec!(1000.00)).unwrap();
        wallet.lock_funds(&user(), dec!(500.00)).unwrap();

        let err = wallet.release_funds(&user(), dec!(600.00)).unwrap_err();
        assert_eq!(
            err,
            WalletError::InsufficientLockedFunds {
                requested: dec!(600.00),
                locked: dec!(500.00),
            }
        );
        assert!(err.is_invariant_violation());
        // Never clamps: locked amount is untouched.
        assert_eq!(wallet.balance(&user()).locked, dec!(500.00));
    }

    #[test]
    fn test_release_unknown_user_fails() {
        let wallet = CustodialWallet::new();
        let err = wallet.release_funds(&user(), dec!(10.00)).unwrap_err();
        assert!(matches!(
            err,
            WalletError::InsufficientLockedFunds { .. }
        ));
    }

    #[test]
    fn test_balance_of_unknown_user_is_zero() {
        let wallet = CustodialWallet::new();
        assert_eq!(wallet.balance(&user()), AccountBalance::zero());
    }

    #[test]
    fn test_invalid_amounts_rejected() {
        let wallet = CustodialWallet::new();
        assert_eq!(
            wallet.credit(&user(), dec!(0)).unwrap_err(),
            WalletError::InvalidAmount(AmountError::NotPositive(dec!(0)))
        );
        assert_eq!(
            wallet.credit(&user(), dec!(-5.00)).unwrap_err(),
            WalletError::InvalidAmount(AmountError::NotPositive(dec!(-5.00)))
        );
        assert_eq!(
            wallet.credit(&user(), dec!(0.001)).unwrap_err(),
            WalletError::InvalidAmount(AmountError::PrecisionExceeded(dec!(0.001)))
        );
        assert!(wallet.lock_funds(&user(), dec!(-1)).is_err());
    }

    #[test]
    fn test_amounts_stored_at_money_scale() {
        let wallet = CustodialWallet::new();
        let balance = wallet.credit(&user(), dec!(500.5)).unwrap();
        assert_eq!(balance.total.to_string(), "500.50");
    }

    #[test]
    fn test_concurrent_locks_never_overdraw() {
        let wallet = Arc::new(CustodialWallet::new());
        wallet.credit(&user(), dec!(50.00)).unwrap();

        let successes: usize = std::thread::scope(|scope| {
            (0..10)
                .map(|_| {
                    let wallet = Arc::clone(&wallet);
                    scope.spawn(move || wallet.lock_funds(&user(), dec!(10.00)).is_ok())
                })
                .collect::<Vec<_>>()
                .into_iter()
                .map(|handle| usize::from(handle.join().unwrap()))
                .sum()
        });

        // Exactly five of the ten 10.00 locks fit into 50.00.
        assert_eq!(successes, 5);
        let balance = wallet.balance(&user());
        assert_eq!(balance.locked, dec!(50.00));
        assert_eq!(balance.available, dec!(0.00));
    }

    #[test]
    fn test_accounts_are_independent() {
        let wallet = CustodialWallet::new();
        let other = UserId::new("vietnam_user_2");
        wallet.credit(&user(), dec!(1000.00)).unwrap();
        wallet.credit(&other, dec!(500.00)).unwrap();
        wallet.lock_funds(&user(), dec!(999.00)).unwrap();

        assert_eq!(wallet.balance(&other).available, dec!(500.00));
        assert_eq!(wallet.balance(&other).locked, dec!(0));
    }
}
