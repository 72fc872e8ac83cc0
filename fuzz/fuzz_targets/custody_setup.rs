use anchor_lang::AccountDeserialize;
use anchor_lang::InstructionData;
use anchor_lang::ToAccountMetas;
use custody_vault::state::Vault;
use solana_program_test::*;
use solana_sdk::{
    instruction::{Instruction, InstructionError},
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    transaction::{Transaction, TransactionError},
};

pub use custody_vault::error::CustodyError;
pub use solana_program_test::{BanksClientError, ProgramTestContext};

pub type FuzzResult<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Default lamports handed to every test user
pub const USER_FUNDING: u64 = 20_000_000_000;

/// Test environment with program loaded
pub struct FuzzTestEnv {
    pub program_id: Pubkey,
    pub context: ProgramTestContext,
}

/// Vault record and holding account for one signer
#[derive(Debug, Clone)]
pub struct CustodyAccounts {
    pub vault: Pubkey,
    pub vault_bump: u8,
    pub vault_wallet: Pubkey,
    pub wallet_bump: u8,
}

// ============================================================================
// Core Setup Functions
// ============================================================================

/// Creates the program test environment with the compiled custody program
pub async fn setup_program_test() -> FuzzTestEnv {
    let program_id = custody_vault::id();
    let mut program_test = ProgramTest::new("custody_vault", program_id, None);
    program_test.prefer_bpf(true);

    let context = program_test.start_with_context().await;

    FuzzTestEnv {
        program_id,
        context,
    }
}

/// Moves lamports from the test payer to `to`
pub async fn fund_account(
    context: &mut ProgramTestContext,
    to: &Pubkey,
    lamports: u64,
) -> FuzzResult<()> {
    let ix = solana_sdk::system_instruction::transfer(&context.payer.pubkey(), to, lamports);

    let tx = Transaction::new_signed_with_payer(
        &[ix],
        Some(&context.payer.pubkey()),
        &[&context.payer],
        context.last_blockhash,
    );

    context.banks_client.process_transaction(tx).await?;
    Ok(())
}

/// Creates a funded keypair that can act as a vault signer
pub async fn setup_user(context: &mut ProgramTestContext, lamports: u64) -> FuzzResult<Keypair> {
    let user = Keypair::new();
    fund_account(context, &user.pubkey(), lamports).await?;
    Ok(user)
}

/// Signs `ix` with `signer`, lets the test payer cover fees, and submits it
/// under a fresh blockhash so identical instructions are never deduplicated.
pub async fn send_as(
    context: &mut ProgramTestContext,
    ix: Instruction,
    signer: &Keypair,
) -> Result<(), BanksClientError> {
    let blockhash = context
        .banks_client
        .get_new_latest_blockhash(&context.last_blockhash)
        .await?;
    context.last_blockhash = blockhash;

    let tx = Transaction::new_signed_with_payer(
        &[ix],
        Some(&context.payer.pubkey()),
        &[&context.payer, signer],
        blockhash,
    );

    context.banks_client.process_transaction(tx).await
}

// ============================================================================
// Instruction Builders
// ============================================================================

pub fn initialize_ix(
    program_id: &Pubkey,
    signer: &Pubkey,
    vault_bump: u8,
    wallet_bump: u8,
) -> Instruction {
    let (vault, _) = derive_vault_pda(program_id, signer);
    let (vault_wallet, _) = derive_wallet_pda(program_id, signer);

    let accounts = custody_vault::accounts::Initialize {
        signer: *signer,
        vault,
        vault_wallet,
        system_program: solana_sdk::system_program::ID,
    };

    Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(None),
        data: custody_vault::instruction::Initialize {
            vault_bump,
            wallet_bump,
        }
        .data(),
    }
}

/// Builds `add_funds` against `owner`'s vault, signed by `signer`
pub fn add_funds_ix(program_id: &Pubkey, signer: &Pubkey, owner: &Pubkey, amount: u64) -> Instruction {
    let (vault, _) = derive_vault_pda(program_id, owner);
    let (vault_wallet, _) = derive_wallet_pda(program_id, owner);

    let accounts = custody_vault::accounts::AddFunds {
        signer: *signer,
        vault,
        vault_wallet,
        system_program: solana_sdk::system_program::ID,
    };

    Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(None),
        data: custody_vault::instruction::AddFunds { amount }.data(),
    }
}

/// Builds `withdraw_funds` against `owner`'s vault, signed by `signer`
pub fn withdraw_funds_ix(
    program_id: &Pubkey,
    signer: &Pubkey,
    owner: &Pubkey,
    amount: u64,
) -> Instruction {
    let (vault, _) = derive_vault_pda(program_id, owner);
    let (vault_wallet, _) = derive_wallet_pda(program_id, owner);

    let accounts = custody_vault::accounts::WithdrawFunds {
        signer: *signer,
        vault,
        vault_wallet,
        system_program: solana_sdk::system_program::ID,
    };

    Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(None),
        data: custody_vault::instruction::WithdrawFunds { amount }.data(),
    }
}

// ============================================================================
// Custody Operations
// ============================================================================

/// Initializes `user`'s vault with the canonical bumps
pub async fn initialize_custody(
    context: &mut ProgramTestContext,
    program_id: &Pubkey,
    user: &Keypair,
) -> FuzzResult<CustodyAccounts> {
    let (vault, vault_bump) = derive_vault_pda(program_id, &user.pubkey());
    let (vault_wallet, wallet_bump) = derive_wallet_pda(program_id, &user.pubkey());

    let ix = initialize_ix(program_id, &user.pubkey(), vault_bump, wallet_bump);
    send_as(context, ix, user).await?;

    Ok(CustodyAccounts {
        vault,
        vault_bump,
        vault_wallet,
        wallet_bump,
    })
}

pub async fn add_funds(
    context: &mut ProgramTestContext,
    program_id: &Pubkey,
    signer: &Keypair,
    owner: &Pubkey,
    amount: u64,
) -> Result<(), BanksClientError> {
    let ix = add_funds_ix(program_id, &signer.pubkey(), owner, amount);
    send_as(context, ix, signer).await
}

pub async fn withdraw_funds(
    context: &mut ProgramTestContext,
    program_id: &Pubkey,
    signer: &Keypair,
    owner: &Pubkey,
    amount: u64,
) -> Result<(), BanksClientError> {
    let ix = withdraw_funds_ix(program_id, &signer.pubkey(), owner, amount);
    send_as(context, ix, signer).await
}

/// Sets up a program environment plus one funded, initialized user
pub async fn setup_complete_environment(
    initial_user_balance: u64,
) -> FuzzResult<(FuzzTestEnv, Keypair, CustodyAccounts)> {
    let mut env = setup_program_test().await;

    let user = setup_user(&mut env.context, initial_user_balance).await?;
    let custody = initialize_custody(&mut env.context, &env.program_id, &user).await?;

    Ok((env, user, custody))
}

// ============================================================================
// PDA Derivation Helpers
// ============================================================================

/// Derive the vault PDA for `signer`
pub fn derive_vault_pda(program_id: &Pubkey, signer: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[custody_vault::VAULT_SEED, signer.as_ref()], program_id)
}

/// Derive the holding account PDA for `signer`
pub fn derive_wallet_pda(program_id: &Pubkey, signer: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[custody_vault::WALLET_SEED, signer.as_ref()], program_id)
}

// ============================================================================
// Account State Verification Helpers
// ============================================================================

/// Fetch and return vault state
pub async fn get_vault_state(context: &mut ProgramTestContext, vault: &Pubkey) -> FuzzResult<Vault> {
    let account = context
        .banks_client
        .get_account(*vault)
        .await?
        .ok_or("Vault account not found")?;

    let vault_data = Vault::try_deserialize(&mut account.data.as_ref())?;
    Ok(vault_data)
}

/// Raw lamports held by `account`, zero when it does not exist
pub async fn get_lamports(context: &mut ProgramTestContext, account: &Pubkey) -> FuzzResult<u64> {
    Ok(context.banks_client.get_balance(*account).await?)
}

/// Rent-exempt reserve the holding account keeps for its whole life
pub async fn get_wallet_reserve(context: &mut ProgramTestContext) -> FuzzResult<u64> {
    let rent = context.banks_client.get_rent().await?;
    Ok(rent.minimum_balance(custody_vault::WALLET_SPACE))
}

/// Withdrawable custody balance of a holding account
pub async fn get_custody_balance(
    context: &mut ProgramTestContext,
    vault_wallet: &Pubkey,
) -> FuzzResult<u64> {
    let lamports = get_lamports(context, vault_wallet).await?;
    let reserve = get_wallet_reserve(context).await?;
    Ok(lamports.saturating_sub(reserve))
}

/// Custom program error code carried by a failed transaction, if any
pub fn custom_error_code(err: &BanksClientError) -> Option<u32> {
    match err {
        BanksClientError::TransactionError(TransactionError::InstructionError(
            _,
            InstructionError::Custom(code),
        ))
        | BanksClientError::SimulationError {
            err: TransactionError::InstructionError(_, InstructionError::Custom(code)),
            ..
        } => Some(*code),
        _ => None,
    }
}

/// Asserts that `result` failed with exactly `expected`
pub fn assert_custody_error(result: Result<(), BanksClientError>, expected: CustodyError) {
    let err = match result {
        Ok(()) => panic!("expected {:?}, transaction succeeded", expected),
        Err(err) => err,
    };
    assert_eq!(
        custom_error_code(&err),
        Some(u32::from(expected)),
        "unexpected failure: {:?}",
        err
    );
}
