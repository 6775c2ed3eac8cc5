// 💳 Account Entity - Bank accounts with a guarded balance
//
// "Account number is IDENTITY (never changes), holder and balance are VALUES"
//
// Invariant: balance >= 0 at all times. Every mutation checks first and
// writes second under the same lock, so a rejected deposit/withdraw/update
// leaves the account exactly as it was.

use crate::error::{ManagerError, Result};
use crate::events::{Event, EventLog};
use crate::repository::{Entity, KeyedRepository, Patch};
use crate::validation::{non_negative, positive_amount};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub type AccountNumber = u64;

// ============================================================================
// ACCOUNT ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Stable identity - NEVER changes
    pub account_number: AccountNumber,

    /// Name of the account holder
    pub account_holder: String,

    /// Current balance, never negative
    pub balance: f64,
}

impl Account {
    /// Open a new account with a zero balance
    pub fn new(account_number: AccountNumber, account_holder: impl Into<String>) -> Self {
        Account {
            account_number,
            account_holder: account_holder.into(),
            balance: 0.0,
        }
    }

    /// Open an account with an opening balance (rejects negative balances)
    pub fn with_balance(
        account_number: AccountNumber,
        account_holder: impl Into<String>,
        balance: f64,
    ) -> Result<Self> {
        let balance = non_negative("balance", balance)?;
        Ok(Account {
            account_number,
            account_holder: account_holder.into(),
            balance,
        })
    }
}

impl Entity for Account {
    type Id = AccountNumber;
    const KIND: &'static str = "account";

    fn id(&self) -> AccountNumber {
        self.account_number
    }
}

// ============================================================================
// PATCH + PROJECTIONS
// ============================================================================

/// Fields of an account that may be changed through `update_account`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountPatch {
    pub account_holder: Option<String>,
    pub balance: Option<f64>,
}

impl AccountPatch {
    pub fn holder(account_holder: impl Into<String>) -> Self {
        AccountPatch {
            account_holder: Some(account_holder.into()),
            ..Default::default()
        }
    }
}

impl Patch<Account> for AccountPatch {
    fn apply(&self, current: &Account) -> Result<Account> {
        let mut next = current.clone();
        if let Some(holder) = &self.account_holder {
            next.account_holder = holder.clone();
        }
        if let Some(balance) = self.balance {
            next.balance = non_negative("balance", balance)?;
        }
        Ok(next)
    }
}

/// Holder and balance only
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountSummary {
    pub account_holder: String,
    pub balance: f64,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        AccountSummary {
            account_holder: account.account_holder.clone(),
            balance: account.balance,
        }
    }
}

/// Everything except the balance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountIdentity {
    pub account_number: AccountNumber,
    pub account_holder: String,
}

impl From<&Account> for AccountIdentity {
    fn from(account: &Account) -> Self {
        AccountIdentity {
            account_number: account.account_number,
            account_holder: account.account_holder.clone(),
        }
    }
}

// ============================================================================
// BANK ACCOUNT MANAGER
// ============================================================================

/// Owns every account; clones share the same accounts
#[derive(Debug, Clone)]
pub struct BankAccountManager {
    accounts: Arc<RwLock<KeyedRepository<Account>>>,
    events: EventLog,
}

impl BankAccountManager {
    pub fn new() -> Self {
        BankAccountManager {
            accounts: Arc::new(RwLock::new(KeyedRepository::new())),
            events: EventLog::new("bank_account_manager"),
        }
    }

    pub fn create_account(&self, account: Account) -> Result<()> {
        non_negative("balance", account.balance)?;
        let number = account.account_number;
        let data = serde_json::json!({
            "account_holder": account.account_holder,
            "balance": account.balance,
        });

        self.accounts.write().add(account).map_err(|e| {
            warn!(account = number, "account creation rejected: {}", e);
            e
        })?;

        info!(account = number, "created account {}", number);
        self.events.record("AccountCreated", Account::KIND, number, data);
        Ok(())
    }

    /// Close (remove) an account and hand back its final state
    pub fn close_account(&self, account_number: AccountNumber) -> Result<Account> {
        let closed = self.accounts.write().remove(account_number).map_err(|e| {
            warn!(account = account_number, "close rejected: {}", e);
            e
        })?;

        info!(account = account_number, "closed account {}", account_number);
        self.events.record(
            "AccountClosed",
            Account::KIND,
            account_number,
            serde_json::json!({ "final_balance": closed.balance }),
        );
        Ok(closed)
    }

    pub fn get_account(&self, account_number: AccountNumber) -> Option<Account> {
        debug!(account = account_number, "account lookup");
        self.accounts.read().get(account_number).cloned()
    }

    pub fn list_all_accounts(&self) -> Vec<Account> {
        self.accounts.read().list_all()
    }

    /// Add funds; returns the new balance
    pub fn deposit(&self, account_number: AccountNumber, amount: f64) -> Result<f64> {
        let amount = positive_amount(amount).map_err(|e| {
            warn!(account = account_number, "deposit rejected: {}", e);
            e
        })?;

        let balance = {
            let mut accounts = self.accounts.write();
            let account = accounts.require_mut(account_number).map_err(|e| {
                warn!(account = account_number, "deposit rejected: {}", e);
                e
            })?;
            account.balance += amount;
            account.balance
        };

        info!(
            account = account_number,
            "deposited {} into {}, new balance {}", amount, account_number, balance
        );
        self.events.record(
            "Deposited",
            Account::KIND,
            account_number,
            serde_json::json!({ "amount": amount, "balance": balance }),
        );
        Ok(balance)
    }

    /// Take funds out; returns the new balance
    pub fn withdraw(&self, account_number: AccountNumber, amount: f64) -> Result<f64> {
        let amount = positive_amount(amount).map_err(|e| {
            warn!(account = account_number, "withdrawal rejected: {}", e);
            e
        })?;

        let balance = {
            let mut accounts = self.accounts.write();
            let account = accounts.require_mut(account_number).map_err(|e| {
                warn!(account = account_number, "withdrawal rejected: {}", e);
                e
            })?;
            if account.balance < amount {
                let err = ManagerError::InsufficientFunds {
                    account: account_number.to_string(),
                    balance: account.balance,
                    requested: amount,
                };
                warn!(account = account_number, "withdrawal rejected: {}", err);
                return Err(err);
            }
            account.balance -= amount;
            account.balance
        };

        info!(
            account = account_number,
            "withdrew {} from {}, new balance {}", amount, account_number, balance
        );
        self.events.record(
            "Withdrawn",
            Account::KIND,
            account_number,
            serde_json::json!({ "amount": amount, "balance": balance }),
        );
        Ok(balance)
    }

    pub fn update_account(
        &self,
        account_number: AccountNumber,
        patch: &AccountPatch,
    ) -> Result<Account> {
        let updated = self
            .accounts
            .write()
            .update(account_number, patch)
            .map_err(|e| {
                warn!(account = account_number, "update rejected: {}", e);
                e
            })?;

        info!(account = account_number, "updated account {}", account_number);
        self.events.record(
            "AccountUpdated",
            Account::KIND,
            account_number,
            serde_json::to_value(patch).unwrap_or_default(),
        );
        Ok(updated)
    }

    pub fn holder_and_balance(&self, account_number: AccountNumber) -> Option<AccountSummary> {
        self.accounts.read().view(account_number)
    }

    pub fn account_without_balance(
        &self,
        account_number: AccountNumber,
    ) -> Option<AccountIdentity> {
        self.accounts.read().view(account_number)
    }

    /// Sum of all balances
    pub fn total_balance(&self) -> f64 {
        self.accounts.read().iter().map(|a| a.balance).sum()
    }

    pub fn count(&self) -> usize {
        self.accounts.read().len()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.events()
    }
}

impl Default for BankAccountManager {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
