use anchor_lang::prelude::*;
use anchor_lang::system_program::{transfer, Transfer};

use crate::constants::{VAULT_SEED, WALLET_SEED, WALLET_SPACE};
use crate::error::CustodyError;
use crate::events::VaultInitialized;
use crate::state::Vault;

#[derive(Accounts)]
pub struct Initialize<'info> {
    /// The key that becomes the vault's only authorized signer
    #[account(mut)]
    pub signer: Signer<'info>,

    /// The vault record; a second initialize for the same signer is
    /// rejected in the handler rather than by the allocator
    #[account(
        init_if_needed,
        payer = signer,
        space = Vault::LEN,
        seeds = [VAULT_SEED, signer.key().as_ref()],
        bump
    )]
    pub vault: Account<'info, Vault>,

    /// The keyless holding account. Stays owned by the system program with
    /// no data, so only this program can sign for it.
    #[account(
        mut,
        seeds = [WALLET_SEED, signer.key().as_ref()],
        bump
    )]
    pub vault_wallet: SystemAccount<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Initialize>, vault_bump: u8, wallet_bump: u8) -> Result<()> {
    require!(
        vault_bump == ctx.bumps.vault,
        CustodyError::InvalidDerivation
    );
    require!(
        wallet_bump == ctx.bumps.vault_wallet,
        CustodyError::InvalidDerivation
    );
    require!(
        !ctx.accounts.vault.is_initialized(),
        CustodyError::AlreadyInitialized
    );

    // Fund the holding account up to its rent-exempt minimum. Anything sent
    // to the address beforehand counts toward that.
    let reserve = Rent::get()?.minimum_balance(WALLET_SPACE);
    let shortfall = reserve.saturating_sub(ctx.accounts.vault_wallet.lamports());
    if shortfall > 0 {
        let cpi_ctx = CpiContext::new(
            ctx.accounts.system_program.to_account_info(),
            Transfer {
                from: ctx.accounts.signer.to_account_info(),
                to: ctx.accounts.vault_wallet.to_account_info(),
            },
        );
        transfer(cpi_ctx, shortfall)?;
    }

    let vault = &mut ctx.accounts.vault;
    vault.signer = ctx.accounts.signer.key();
    vault.bump = vault_bump;
    vault.wallet_bump = wallet_bump;

    emit!(VaultInitialized {
        vault: vault.key(),
        signer: vault.signer,
        vault_wallet: ctx.accounts.vault_wallet.key(),
        reserve,
        timestamp: Clock::get()?.unix_timestamp,
    });

    msg!("Vault initialized successfully!");
    msg!("Vault: {}", vault.key());
    msg!("Signer: {}", vault.signer);
    msg!("Vault Wallet: {}", ctx.accounts.vault_wallet.key());
    msg!("Reserve: {} lamports", reserve);

    Ok(())
}
