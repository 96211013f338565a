use soroban_sdk::{contractclient, Address, Bytes, Env};

#[cfg(test)]
use soroban_sdk::{contract, contractimpl, contracttype};

/// Encrypted-value runtime interface.
///
/// `seal` turns a plaintext card into an opaque ciphertext that only `owner`
/// can open off-chain. `reveal` opens a ciphertext on-chain and is reserved
/// to the address that sealed it.
#[contractclient(name = "CipherRuntimeClient")]
pub trait CipherRuntime {
    fn seal(env: Env, sealer: Address, owner: Address, value: u32) -> Bytes;

    fn reveal(env: Env, sealer: Address, ciphertext: Bytes) -> u32;
}

/// Seal a card for `owner` on behalf of this contract.
pub fn seal_card(env: &Env, runtime: &Address, owner: &Address, card: u32) -> Bytes {
    let client = CipherRuntimeClient::new(env, runtime);
    client.seal(&env.current_contract_address(), owner, &card)
}

/// Publicly open a card this contract sealed earlier.
pub fn reveal_card(env: &Env, runtime: &Address, ciphertext: &Bytes) -> u32 {
    let client = CipherRuntimeClient::new(env, runtime);
    client.reveal(&env.current_contract_address(), ciphertext)
}

/// Mock runtime for tests. Ciphertexts are opaque handles into its storage;
/// `unseal` stands in for the owner's off-chain decryption.
#[cfg(test)]
#[contract]
pub struct MockCipherRuntime;

#[cfg(test)]
#[contracttype]
#[derive(Clone)]
enum MockKey {
    NextHandle,
    Sealed(Bytes),
}

#[cfg(test)]
#[contracttype]
#[derive(Clone)]
struct SealedValue {
    sealer: Address,
    owner: Address,
    value: u32,
}

#[cfg(test)]
#[contractimpl]
impl MockCipherRuntime {
    pub fn seal(env: Env, sealer: Address, owner: Address, value: u32) -> Bytes {
        sealer.require_auth();
        let handle: u32 = env
            .storage()
            .instance()
            .get(&MockKey::NextHandle)
            .unwrap_or(0);
        env.storage()
            .instance()
            .set(&MockKey::NextHandle, &(handle + 1));

        let mut ciphertext = Bytes::from_array(&env, &[0xC1, 0x9E]);
        ciphertext.extend_from_array(&handle.to_be_bytes());
        env.storage().persistent().set(
            &MockKey::Sealed(ciphertext.clone()),
            &SealedValue {
                sealer,
                owner,
                value,
            },
        );
        ciphertext
    }

    pub fn reveal(env: Env, sealer: Address, ciphertext: Bytes) -> u32 {
        sealer.require_auth();
        let sealed: SealedValue = env
            .storage()
            .persistent()
            .get(&MockKey::Sealed(ciphertext))
            .expect("unknown ciphertext");
        assert!(sealed.sealer == sealer, "not the sealer");
        sealed.value
    }

    pub fn unseal(env: Env, owner: Address, ciphertext: Bytes) -> u32 {
        owner.require_auth();
        let sealed: SealedValue = env
            .storage()
            .persistent()
            .get(&MockKey::Sealed(ciphertext))
            .expect("unknown ciphertext");
        assert!(sealed.owner == owner, "not the owner");
        sealed.value
    }
}
