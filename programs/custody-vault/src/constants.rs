/// Namespace tag for the per-signer `Vault` record.
pub const VAULT_SEED: &[u8] = b"vault";

/// Namespace tag for the per-signer keyless holding account.
pub const WALLET_SEED: &[u8] = b"pda";

/// The holding account carries no data, only lamports.
pub const WALLET_SPACE: usize = 0;
