//! Property tests for control-account validation.
//!
//! The control predicate is `level == 0` OR "has children"; the two checks
//! are exercised independently over generated trees.

use proptest::prelude::*;
use tallix_shared::types::{AccountId, CompanyId, Currency, Scope, TenantId};

use super::types::{Account, AccountIndex, AccountType};
use super::validator::CoaValidator;

fn make_account(level: u8, parent_id: Option<AccountId>) -> Account {
    Account {
        id: AccountId::new(),
        scope: Scope::new(TenantId::new(), CompanyId::new()),
        code: format!("L{level}"),
        name: "prop".to_string(),
        account_type: AccountType::Asset,
        parent_id,
        level,
        is_active: true,
        currency: Currency::Myr,
        subtype: None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every level-0 account is rejected for direct posting, with or without
    /// children.
    #[test]
    fn prop_top_level_always_rejected(child_count in 0usize..5) {
        let top = make_account(0, None);
        let top_id = top.id;
        let mut accounts = vec![top];
        for _ in 0..child_count {
            accounts.push(make_account(1, Some(top_id)));
        }
        let index = AccountIndex::new(accounts);
        prop_assert!(CoaValidator::validate_control_accounts(&index, &[top_id]).is_err());
    }

    /// Any non-top-level account acquires control status exactly when it
    /// gains its first child.
    #[test]
    fn prop_children_flip_control_status(level in 1u8..5, child_count in 0usize..4) {
        let node = make_account(level, None);
        let node_id = node.id;
        let mut accounts = vec![node];
        for _ in 0..child_count {
            accounts.push(make_account(level + 1, Some(node_id)));
        }
        let index = AccountIndex::new(accounts);
        let result = CoaValidator::validate_control_accounts(&index, &[node_id]);
        if child_count == 0 {
            prop_assert!(result.is_ok());
        } else {
            prop_assert!(result.is_err());
        }
    }

    /// Leaves of a random chain are always postable, interior nodes never are.
    #[test]
    fn prop_chain_only_leaf_postable(depth in 2u8..6) {
        let mut accounts = Vec::new();
        let mut parent: Option<AccountId> = None;
        for level in 0..depth {
            let account = make_account(level, parent);
            parent = Some(account.id);
            accounts.push(account);
        }
        let ids: Vec<AccountId> = accounts.iter().map(|a| a.id).collect();
        let index = AccountIndex::new(accounts);

        let (leaf, interior) = ids.split_last().unwrap();
        prop_assert!(CoaValidator::validate_control_accounts(&index, &[*leaf]).is_ok());
        for id in interior {
            prop_assert!(CoaValidator::validate_control_accounts(&index, &[*id]).is_err());
        }
    }
}
