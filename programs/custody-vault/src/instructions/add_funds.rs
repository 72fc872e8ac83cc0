use anchor_lang::prelude::*;
use anchor_lang::system_program::{transfer, Transfer};

use crate::constants::{VAULT_SEED, WALLET_SEED, WALLET_SPACE};
use crate::error::CustodyError;
use crate::events::FundsAdded;
use crate::state::{ensure_caller_solvent, CustodyBalance, Vault};

#[derive(Accounts)]
pub struct AddFunds<'info> {
    #[account(mut)]
    pub signer: Signer<'info>,

    #[account(
        seeds = [VAULT_SEED, vault.signer.as_ref()],
        bump = vault.bump,
    )]
    pub vault: Account<'info, Vault>,

    /// The holding account paired with `vault`
    #[account(
        mut,
        seeds = [WALLET_SEED, vault.signer.as_ref()],
        bump = vault.wallet_bump,
    )]
    pub vault_wallet: SystemAccount<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<AddFunds>, amount: u64) -> Result<()> {
    let signer = &ctx.accounts.signer;
    let vault = &ctx.accounts.vault;

    vault.authorize(&signer.key())?;
    require!(amount > 0, CustodyError::InvalidAmount);

    let rent = Rent::get()?;
    ensure_caller_solvent(
        signer.lamports(),
        amount,
        rent.minimum_balance(signer.data_len()),
    )?;

    let reserve = rent.minimum_balance(WALLET_SPACE);
    let credited =
        CustodyBalance::new(ctx.accounts.vault_wallet.lamports(), reserve).credit(amount)?;

    let cpi_ctx = CpiContext::new(
        ctx.accounts.system_program.to_account_info(),
        Transfer {
            from: signer.to_account_info(),
            to: ctx.accounts.vault_wallet.to_account_info(),
        },
    );
    transfer(cpi_ctx, amount)?;

    emit!(FundsAdded {
        vault: vault.key(),
        signer: vault.signer,
        amount,
        balance: credited.available(),
        timestamp: Clock::get()?.unix_timestamp,
    });

    msg!("Deposit successful!");
    msg!("Deposited: {} lamports", amount);
    msg!("Vault balance: {} lamports", credited.available());

    Ok(())
}
