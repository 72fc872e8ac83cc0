use anchor_lang::prelude::*;

#[event]
pub struct VaultInitialized {
    pub vault: Pubkey,
    pub signer: Pubkey,
    pub vault_wallet: Pubkey,
    pub reserve: u64,
    pub timestamp: i64,
}

#[event]
pub struct FundsAdded {
    pub vault: Pubkey,
    pub signer: Pubkey,
    pub amount: u64,
    pub balance: u64,
    pub timestamp: i64,
}

#[event]
pub struct FundsWithdrawn {
    pub vault: Pubkey,
    pub signer: Pubkey,
    pub amount: u64,
    pub balance: u64,
    pub timestamp: i64,
}
