use anchor_lang::prelude::*;

use crate::constants::WALLET_SEED;
use crate::error::CustodyError;

/// Spendable view of a holding account.
///
/// The account keeps `reserve` lamports (its rent-exempt minimum) for its
/// whole life; only lamports above that are custody balance. Withdrawals may
/// drain the balance to zero but never touch the reserve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustodyBalance {
    lamports: u64,
    reserve: u64,
}

impl CustodyBalance {
    pub fn new(lamports: u64, reserve: u64) -> Self {
        Self { lamports, reserve }
    }

    pub fn lamports(&self) -> u64 {
        self.lamports
    }

    pub fn available(&self) -> u64 {
        self.lamports.saturating_sub(self.reserve)
    }

    /// Balance after receiving `amount`.
    pub fn credit(&self, amount: u64) -> Result<Self> {
        let lamports = self
            .lamports
            .checked_add(amount)
            .ok_or(CustodyError::MathOverflow)?;
        Ok(Self::new(lamports, self.reserve))
    }

    /// Balance after paying out `amount`.
    pub fn debit(&self, amount: u64) -> Result<Self> {
        require!(
            amount <= self.available(),
            CustodyError::InsufficientVaultBalance
        );
        let lamports = self
            .lamports
            .checked_sub(amount)
            .ok_or(CustodyError::InsufficientVaultBalance)?;
        Ok(Self::new(lamports, self.reserve))
    }
}

/// The caller must cover `amount` and either be emptied or stay above its
/// own rent-exempt minimum afterwards.
pub fn ensure_caller_solvent(lamports: u64, amount: u64, rent_minimum: u64) -> Result<()> {
    let remaining = lamports
        .checked_sub(amount)
        .ok_or(CustodyError::InsufficientCallerBalance)?;
    require!(
        remaining == 0 || remaining >= rent_minimum,
        CustodyError::InsufficientCallerBalance
    );
    Ok(())
}

/// Derive the keyless holding account owned by `signer`.
pub fn derive_wallet_address(signer: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[WALLET_SEED, signer.as_ref()], &crate::ID)
}
