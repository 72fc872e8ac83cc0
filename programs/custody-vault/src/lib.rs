pub mod constants;
pub mod error;
pub mod events;
pub mod instructions;
pub mod state;

use anchor_lang::prelude::*;

pub use constants::*;
pub use instructions::*;
pub use state::*;

declare_id!("AdEUyEPiUi6FmHKP8oPRRjehD8KRUZTppH22QkGWUHCu");

#[program]
pub mod custody_vault {
    use super::*;

    pub fn initialize(ctx: Context<Initialize>, vault_bump: u8, wallet_bump: u8) -> Result<()> {
        initialize::handler(ctx, vault_bump, wallet_bump)
    }

    pub fn add_funds(ctx: Context<AddFunds>, amount: u64) -> Result<()> {
        add_funds::handler(ctx, amount)
    }

    pub fn withdraw_funds(ctx: Context<WithdrawFunds>, amount: u64) -> Result<()> {
        withdraw_funds::handler(ctx, amount)
    }
}
