use anchor_lang::prelude::*;
use anchor_lang::system_program::{transfer, Transfer};

use crate::constants::{VAULT_SEED, WALLET_SEED, WALLET_SPACE};
use crate::error::CustodyError;
use crate::events::FundsWithdrawn;
use crate::state::{CustodyBalance, Vault};

#[derive(Accounts)]
pub struct WithdrawFunds<'info> {
    /// Receives the withdrawn lamports
    #[account(mut)]
    pub signer: Signer<'info>,

    #[account(
        seeds = [VAULT_SEED, vault.signer.as_ref()],
        bump = vault.bump,
    )]
    pub vault: Account<'info, Vault>,

    #[account(
        mut,
        seeds = [WALLET_SEED, vault.signer.as_ref()],
        bump = vault.wallet_bump,
    )]
    pub vault_wallet: SystemAccount<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<WithdrawFunds>, amount: u64) -> Result<()> {
    let vault = &ctx.accounts.vault;

    vault.authorize(&ctx.accounts.signer.key())?;
    require!(amount > 0, CustodyError::InvalidAmount);

    let reserve = Rent::get()?.minimum_balance(WALLET_SPACE);
    let debited =
        CustodyBalance::new(ctx.accounts.vault_wallet.lamports(), reserve).debit(amount)?;

    // The holding account has no key; the program signs for it with its seeds
    let signer_key = vault.signer;
    let signer_seeds: &[&[&[u8]]] = &[&[
        WALLET_SEED,
        signer_key.as_ref(),
        &[vault.wallet_bump],
    ]];

    let cpi_ctx = CpiContext::new_with_signer(
        ctx.accounts.system_program.to_account_info(),
        Transfer {
            from: ctx.accounts.vault_wallet.to_account_info(),
            to: ctx.accounts.signer.to_account_info(),
        },
        signer_seeds,
    );
    transfer(cpi_ctx, amount)?;

    emit!(FundsWithdrawn {
        vault: vault.key(),
        signer: signer_key,
        amount,
        balance: debited.available(),
        timestamp: Clock::get()?.unix_timestamp,
    });

    msg!("Withdrawal successful!");
    msg!("Withdrawn: {} lamports", amount);
    msg!("Vault balance: {} lamports", debited.available());

    Ok(())
}
