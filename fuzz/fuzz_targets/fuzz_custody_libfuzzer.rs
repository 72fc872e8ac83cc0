#![no_main]

use arbitrary::Arbitrary;
use fuzz_helpers::*;
use libfuzzer_sys::fuzz_target;
use solana_sdk::signature::Signer;

/// Longest operation sequence replayed per iteration
const MAX_OPS: usize = 8;

#[derive(Debug, Clone, Arbitrary)]
enum CustodyOp {
    /// Owner deposits into its own vault
    Deposit(u64),
    /// Owner withdraws from its own vault
    Withdraw(u64),
    /// A second funded key tries to deposit into the owner's vault
    ForeignDeposit(u64),
    /// A second funded key tries to drain the owner's vault
    ForeignWithdraw(u64),
}

#[derive(Debug, Clone, Arbitrary)]
struct CustodyFuzzInput {
    ops: Vec<CustodyOp>,
}

/// Keeps amounts inside what the funded test users can actually move
fn bound(amount: u64) -> u64 {
    amount % (USER_FUNDING / 2)
}

async fn fuzz_custody_once(input: CustodyFuzzInput) -> FuzzResult<()> {
    let (mut env, owner, custody) = match setup_complete_environment(USER_FUNDING).await {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Setup failed: {}", e);
            return Ok(());
        }
    };
    let intruder = setup_user(&mut env.context, USER_FUNDING).await?;
    let program_id = env.program_id;
    let owner_key = owner.pubkey();

    // Model of the custody balance: deposits minus withdrawals
    let mut expected: u64 = 0;

    for op in input.ops.into_iter().take(MAX_OPS) {
        let before = get_custody_balance(&mut env.context, &custody.vault_wallet).await?;
        assert_eq!(before, expected, "custody balance drifted from model");

        match op {
            CustodyOp::Deposit(raw) => {
                let amount = bound(raw);
                let result =
                    add_funds(&mut env.context, &program_id, &owner, &owner_key, amount).await;
                match result {
                    Ok(()) => {
                        assert!(amount > 0, "zero deposit accepted");
                        expected += amount;
                    }
                    Err(e) => {
                        let code = custom_error_code(&e);
                        let acceptable = [
                            u32::from(CustodyError::InvalidAmount),
                            u32::from(CustodyError::InsufficientCallerBalance),
                        ];
                        match code {
                            Some(code) => assert!(
                                acceptable.contains(&code),
                                "unexpected deposit error {}",
                                code
                            ),
                            None => panic!("untyped deposit failure: {:?}", e),
                        }
                    }
                }
            }
            CustodyOp::Withdraw(raw) => {
                let amount = bound(raw);
                let result =
                    withdraw_funds(&mut env.context, &program_id, &owner, &owner_key, amount)
                        .await;
                match result {
                    Ok(()) => {
                        assert!(amount > 0 && amount <= expected, "withdrawal overdrew vault");
                        expected -= amount;
                    }
                    Err(e) => {
                        let code = custom_error_code(&e);
                        let wanted = if amount == 0 {
                            CustodyError::InvalidAmount
                        } else {
                            CustodyError::InsufficientVaultBalance
                        };
                        assert_eq!(code, Some(u32::from(wanted)), "unexpected withdraw error");
                        assert!(amount == 0 || amount > expected);
                    }
                }
            }
            CustodyOp::ForeignDeposit(raw) => {
                let result =
                    add_funds(&mut env.context, &program_id, &intruder, &owner_key, bound(raw))
                        .await;
                assert_custody_error(result, CustodyError::Unauthorized);
            }
            CustodyOp::ForeignWithdraw(raw) => {
                let result = withdraw_funds(
                    &mut env.context,
                    &program_id,
                    &intruder,
                    &owner_key,
                    bound(raw),
                )
                .await;
                assert_custody_error(result, CustodyError::Unauthorized);
            }
        }

        let after = get_custody_balance(&mut env.context, &custody.vault_wallet).await?;
        assert_eq!(after, expected, "custody balance does not match model");
    }

    // The binding never moves, whatever was attempted
    let vault = get_vault_state(&mut env.context, &custody.vault).await?;
    assert_eq!(vault.signer, owner_key);
    assert_eq!(vault.bump, custody.vault_bump);
    assert_eq!(vault.wallet_bump, custody.wallet_bump);

    Ok(())
}

fuzz_target!(|input: CustodyFuzzInput| {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            return;
        }
    };
    runtime.block_on(async {
        if let Err(e) = fuzz_custody_once(input).await {
            eprintln!("Fuzz iteration failed: {}", e);
        }
    });
});
