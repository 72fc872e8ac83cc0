use fuzz_helpers::*;
use solana_sdk::signature::{Keypair, Signer};

const ONE_SOL: u64 = 1_000_000_000;

#[tokio::test]
async fn initialize_binds_vault_to_caller() {
    let (mut env, user, custody) = setup_complete_environment(USER_FUNDING).await.unwrap();

    let vault = get_vault_state(&mut env.context, &custody.vault).await.unwrap();
    assert_eq!(vault.signer, user.pubkey());
    assert_eq!(vault.bump, custody.vault_bump);
    assert_eq!(vault.wallet_bump, custody.wallet_bump);
    assert!(vault.bump > 0);

    let reserve = get_wallet_reserve(&mut env.context).await.unwrap();
    let lamports = get_lamports(&mut env.context, &custody.vault_wallet).await.unwrap();
    assert_eq!(lamports, reserve);
    assert_eq!(
        get_custody_balance(&mut env.context, &custody.vault_wallet).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn second_initialize_is_rejected() {
    let (mut env, user, custody) = setup_complete_environment(USER_FUNDING).await.unwrap();
    let program_id = env.program_id;

    let ix = initialize_ix(
        &program_id,
        &user.pubkey(),
        custody.vault_bump,
        custody.wallet_bump,
    );
    let result = send_as(&mut env.context, ix, &user).await;
    assert_custody_error(result, CustodyError::AlreadyInitialized);

    let vault = get_vault_state(&mut env.context, &custody.vault).await.unwrap();
    assert_eq!(vault.signer, user.pubkey());
}

#[tokio::test]
async fn non_canonical_bump_is_rejected() {
    let mut env = setup_program_test().await;
    let program_id = env.program_id;
    let user = setup_user(&mut env.context, USER_FUNDING).await.unwrap();

    let (vault, vault_bump) = derive_vault_pda(&program_id, &user.pubkey());
    let (_, wallet_bump) = derive_wallet_pda(&program_id, &user.pubkey());

    let ix = initialize_ix(
        &program_id,
        &user.pubkey(),
        vault_bump.wrapping_sub(1),
        wallet_bump,
    );
    let result = send_as(&mut env.context, ix, &user).await;
    assert_custody_error(result, CustodyError::InvalidDerivation);

    let ix = initialize_ix(
        &program_id,
        &user.pubkey(),
        vault_bump,
        wallet_bump.wrapping_sub(1),
    );
    let result = send_as(&mut env.context, ix, &user).await;
    assert_custody_error(result, CustodyError::InvalidDerivation);

    // nothing was persisted
    assert_eq!(get_lamports(&mut env.context, &vault).await.unwrap(), 0);
}

#[tokio::test]
async fn deposit_and_withdraw_scenario() {
    let (mut env, owner, custody) = setup_complete_environment(USER_FUNDING).await.unwrap();
    let program_id = env.program_id;
    let owner_key = owner.pubkey();
    let intruder = setup_user(&mut env.context, USER_FUNDING).await.unwrap();

    let owner_start = get_lamports(&mut env.context, &owner_key).await.unwrap();
    add_funds(&mut env.context, &program_id, &owner, &owner_key, ONE_SOL)
        .await
        .unwrap();
    assert_eq!(
        owner_start - get_lamports(&mut env.context, &owner_key).await.unwrap(),
        ONE_SOL
    );
    assert_eq!(
        get_custody_balance(&mut env.context, &custody.vault_wallet).await.unwrap(),
        ONE_SOL
    );

    let owner_before = get_lamports(&mut env.context, &owner_key).await.unwrap();
    withdraw_funds(&mut env.context, &program_id, &owner, &owner_key, ONE_SOL / 2)
        .await
        .unwrap();
    let owner_after = get_lamports(&mut env.context, &owner_key).await.unwrap();
    assert_eq!(owner_after - owner_before, ONE_SOL / 2);
    assert_eq!(
        get_custody_balance(&mut env.context, &custody.vault_wallet).await.unwrap(),
        ONE_SOL / 2
    );

    let result = withdraw_funds(&mut env.context, &program_id, &intruder, &owner_key, 1).await;
    assert_custody_error(result, CustodyError::Unauthorized);
    assert_eq!(
        get_custody_balance(&mut env.context, &custody.vault_wallet).await.unwrap(),
        ONE_SOL / 2
    );

    let result =
        withdraw_funds(&mut env.context, &program_id, &owner, &owner_key, 10 * ONE_SOL).await;
    assert_custody_error(result, CustodyError::InsufficientVaultBalance);
    assert_eq!(
        get_custody_balance(&mut env.context, &custody.vault_wallet).await.unwrap(),
        ONE_SOL / 2
    );
}

#[tokio::test]
async fn foreign_deposit_is_rejected() {
    let (mut env, owner, custody) = setup_complete_environment(USER_FUNDING).await.unwrap();
    let program_id = env.program_id;
    let intruder = setup_user(&mut env.context, USER_FUNDING).await.unwrap();

    let intruder_before = get_lamports(&mut env.context, &intruder.pubkey()).await.unwrap();
    let result = add_funds(
        &mut env.context,
        &program_id,
        &intruder,
        &owner.pubkey(),
        ONE_SOL,
    )
    .await;
    assert_custody_error(result, CustodyError::Unauthorized);

    assert_eq!(
        get_custody_balance(&mut env.context, &custody.vault_wallet).await.unwrap(),
        0
    );
    assert_eq!(
        get_lamports(&mut env.context, &intruder.pubkey()).await.unwrap(),
        intruder_before
    );
}

#[tokio::test]
async fn zero_amounts_are_rejected() {
    let (mut env, owner, _custody) = setup_complete_environment(USER_FUNDING).await.unwrap();
    let program_id = env.program_id;
    let owner_key = owner.pubkey();

    let result = add_funds(&mut env.context, &program_id, &owner, &owner_key, 0).await;
    assert_custody_error(result, CustodyError::InvalidAmount);

    let result = withdraw_funds(&mut env.context, &program_id, &owner, &owner_key, 0).await;
    assert_custody_error(result, CustodyError::InvalidAmount);
}

#[tokio::test]
async fn deposit_beyond_caller_balance_is_rejected() {
    let (mut env, owner, custody) = setup_complete_environment(ONE_SOL).await.unwrap();
    let program_id = env.program_id;

    let result = add_funds(
        &mut env.context,
        &program_id,
        &owner,
        &owner.pubkey(),
        2 * ONE_SOL,
    )
    .await;
    assert_custody_error(result, CustodyError::InsufficientCallerBalance);
    assert_eq!(
        get_custody_balance(&mut env.context, &custody.vault_wallet).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn deposit_leaving_caller_below_rent_is_rejected() {
    let (mut env, owner, custody) = setup_complete_environment(ONE_SOL).await.unwrap();
    let program_id = env.program_id;
    let owner_key = owner.pubkey();

    let lamports = get_lamports(&mut env.context, &owner_key).await.unwrap();
    let result = add_funds(&mut env.context, &program_id, &owner, &owner_key, lamports - 1).await;
    assert_custody_error(result, CustodyError::InsufficientCallerBalance);

    assert_eq!(
        get_lamports(&mut env.context, &owner_key).await.unwrap(),
        lamports
    );
    assert_eq!(
        get_custody_balance(&mut env.context, &custody.vault_wallet).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn round_trip_restores_balance() {
    let (mut env, owner, custody) = setup_complete_environment(USER_FUNDING).await.unwrap();
    let program_id = env.program_id;
    let owner_key = owner.pubkey();

    add_funds(&mut env.context, &program_id, &owner, &owner_key, 3 * ONE_SOL)
        .await
        .unwrap();
    let before = get_custody_balance(&mut env.context, &custody.vault_wallet)
        .await
        .unwrap();

    let owner_start = get_lamports(&mut env.context, &owner_key).await.unwrap();

    let amount = 1_234_567;
    add_funds(&mut env.context, &program_id, &owner, &owner_key, amount)
        .await
        .unwrap();
    let owner_mid = get_lamports(&mut env.context, &owner_key).await.unwrap();
    assert_eq!(owner_start - owner_mid, amount);

    withdraw_funds(&mut env.context, &program_id, &owner, &owner_key, amount)
        .await
        .unwrap();
    assert_eq!(
        get_lamports(&mut env.context, &owner_key).await.unwrap(),
        owner_start
    );

    assert_eq!(
        get_custody_balance(&mut env.context, &custody.vault_wallet)
            .await
            .unwrap(),
        before
    );
}

#[tokio::test]
async fn full_drain_keeps_wallet_alive() {
    let (mut env, owner, custody) = setup_complete_environment(USER_FUNDING).await.unwrap();
    let program_id = env.program_id;
    let owner_key = owner.pubkey();

    add_funds(&mut env.context, &program_id, &owner, &owner_key, ONE_SOL)
        .await
        .unwrap();
    withdraw_funds(&mut env.context, &program_id, &owner, &owner_key, ONE_SOL)
        .await
        .unwrap();

    let reserve = get_wallet_reserve(&mut env.context).await.unwrap();
    assert_eq!(
        get_lamports(&mut env.context, &custody.vault_wallet).await.unwrap(),
        reserve
    );

    // the reserve itself is never withdrawable
    let result = withdraw_funds(&mut env.context, &program_id, &owner, &owner_key, 1).await;
    assert_custody_error(result, CustodyError::InsufficientVaultBalance);

    // and the vault keeps accepting deposits afterwards
    add_funds(&mut env.context, &program_id, &owner, &owner_key, 42)
        .await
        .unwrap();
    assert_eq!(
        get_custody_balance(&mut env.context, &custody.vault_wallet).await.unwrap(),
        42
    );
}

#[tokio::test]
async fn vaults_of_different_signers_are_independent() {
    let mut env = setup_program_test().await;
    let program_id = env.program_id;

    let alice = setup_user(&mut env.context, USER_FUNDING).await.unwrap();
    let bob = setup_user(&mut env.context, USER_FUNDING).await.unwrap();
    let alice_custody = initialize_custody(&mut env.context, &program_id, &alice)
        .await
        .unwrap();
    let bob_custody = initialize_custody(&mut env.context, &program_id, &bob)
        .await
        .unwrap();
    assert_ne!(alice_custody.vault, bob_custody.vault);
    assert_ne!(alice_custody.vault_wallet, bob_custody.vault_wallet);

    add_funds(&mut env.context, &program_id, &alice, &alice.pubkey(), 5 * ONE_SOL)
        .await
        .unwrap();
    add_funds(&mut env.context, &program_id, &bob, &bob.pubkey(), ONE_SOL)
        .await
        .unwrap();

    // bob cannot reach into alice's vault even with his own funds on deposit
    let result =
        withdraw_funds(&mut env.context, &program_id, &bob, &alice.pubkey(), 2 * ONE_SOL).await;
    assert_custody_error(result, CustodyError::Unauthorized);

    assert_eq!(
        get_custody_balance(&mut env.context, &alice_custody.vault_wallet)
            .await
            .unwrap(),
        5 * ONE_SOL
    );
    assert_eq!(
        get_custody_balance(&mut env.context, &bob_custody.vault_wallet)
            .await
            .unwrap(),
        ONE_SOL
    );
}

#[tokio::test]
async fn unfunded_key_cannot_claim_someone_elses_wallet() {
    let (mut env, owner, custody) = setup_complete_environment(USER_FUNDING).await.unwrap();
    let program_id = env.program_id;
    add_funds(&mut env.context, &program_id, &owner, &owner.pubkey(), ONE_SOL)
        .await
        .unwrap();

    let stranger = Keypair::new();
    let result =
        withdraw_funds(&mut env.context, &program_id, &stranger, &owner.pubkey(), ONE_SOL).await;
    assert_custody_error(result, CustodyError::Unauthorized);
    assert_eq!(
        get_custody_balance(&mut env.context, &custody.vault_wallet).await.unwrap(),
        ONE_SOL
    );
}
