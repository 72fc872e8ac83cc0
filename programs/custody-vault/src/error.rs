use anchor_lang::prelude::*;

#[error_code]
pub enum CustodyError {
    #[msg("Vault already exists for this signer")]
    AlreadyInitialized,
    #[msg("Supplied bump is not the canonical bump for this derivation")]
    InvalidDerivation,
    #[msg("Caller is not the signer bound to this vault")]
    Unauthorized,
    #[msg("Amount must be greater than zero")]
    InvalidAmount,
    #[msg("Caller cannot cover the deposit amount")]
    InsufficientCallerBalance,
    #[msg("Amount exceeds the withdrawable vault balance")]
    InsufficientVaultBalance,
    #[msg("Math operation overflow")]
    MathOverflow,
}
