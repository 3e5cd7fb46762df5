use register_domain::{AccountCode, Register};
use uuid::Uuid;

use crate::{
    validation::{ensure_unique, normalize_code, normalize_label},
    CoreError,
};

/// Provides validated operations for [`AccountCode`] records.
pub struct AccountCodeService;

impl AccountCodeService {
    pub fn add(register: &mut Register, mut account: AccountCode) -> Result<Uuid, CoreError> {
        Self::normalize(&mut account)?;
        ensure_unique("Account code", &register.account_codes, &account.code, None)?;
        Ok(register.add_account_code(account))
    }

    pub fn edit(
        register: &mut Register,
        code: &str,
        mut changes: AccountCode,
    ) -> Result<(), CoreError> {
        let current = register
            .account_code(code)
            .map(|account| account.code.clone())
            .ok_or_else(|| CoreError::AccountCodeNotFound(code.trim().to_string()))?;
        Self::normalize(&mut changes)?;
        ensure_unique(
            "Account code",
            &register.account_codes,
            &changes.code,
            Some(&current),
        )?;
        if let Some(account) = register.account_code_mut(&current) {
            account.code = changes.code;
            account.label = changes.label;
            account.depreciation_account = changes.depreciation_account;
            account.charge_account = changes.charge_account;
        }
        register.touch();
        Ok(())
    }

    pub fn remove(register: &mut Register, code: &str) -> Result<(), CoreError> {
        let before = register.account_codes.len();
        register
            .account_codes
            .retain(|account| !account.code.eq_ignore_ascii_case(code.trim()));
        if register.account_codes.len() == before {
            return Err(CoreError::AccountCodeNotFound(code.trim().to_string()));
        }
        register.touch();
        Ok(())
    }

    pub fn list(register: &Register) -> Vec<&AccountCode> {
        let mut accounts: Vec<&AccountCode> = register.account_codes.iter().collect();
        accounts.sort_by(|a, b| a.code.cmp(&b.code));
        accounts
    }

    fn normalize(account: &mut AccountCode) -> Result<(), CoreError> {
        account.code = normalize_code("Account", &account.code)?;
        account.label = normalize_label("Account", &account.label)?;
        account.depreciation_account = account.depreciation_account.trim().to_string();
        account.charge_account = account.charge_account.trim().to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_edit_remove_cycle() {
        let mut register = Register::new("Accounts");
        AccountCodeService::add(
            &mut register,
            AccountCode::new("215400", "Matériel industriel", "281540", "681120"),
        )
        .unwrap();

        AccountCodeService::edit(
            &mut register,
            "215400",
            AccountCode::new("215400", "Matériel et outillage", " 281540 ", "681121"),
        )
        .unwrap();
        let stored = register.account_code("215400").unwrap();
        assert_eq!(stored.label, "Matériel et outillage");
        assert_eq!(stored.depreciation_account, "281540");
        assert_eq!(stored.charge_account, "681121");

        AccountCodeService::remove(&mut register, "215400").unwrap();
        assert!(matches!(
            AccountCodeService::remove(&mut register, "215400"),
            Err(CoreError::AccountCodeNotFound(_))
        ));
    }
}
