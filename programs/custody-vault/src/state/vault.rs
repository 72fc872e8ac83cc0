use anchor_lang::prelude::*;

use crate::constants::VAULT_SEED;
use crate::error::CustodyError;

#[account]
pub struct Vault {
    /// The only key allowed to move funds through this vault
    pub signer: Pubkey,
    /// Bump seed for the vault PDA derivation
    pub bump: u8,
    /// Bump seed for the holding account PDA derivation
    pub wallet_bump: u8,
}

impl Vault {
    pub const LEN: usize = 8 + // discriminator
        32 + // signer
        1 + // bump
        1; // wallet_bump

    /// A freshly allocated record is zeroed, so an unset signer means the
    /// vault has not been bound yet.
    pub fn is_initialized(&self) -> bool {
        self.signer != Pubkey::default()
    }

    pub fn authorize(&self, caller: &Pubkey) -> Result<()> {
        require_keys_eq!(*caller, self.signer, CustodyError::Unauthorized);
        Ok(())
    }
}

/// Derive the vault PDA owned by `signer`.
pub fn derive_vault_address(signer: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[VAULT_SEED, signer.as_ref()], &crate::ID)
}
