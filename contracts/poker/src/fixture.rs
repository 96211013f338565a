//! Deployment fixture shared by the contract tests: a Poker contract wired to
//! a Stellar Asset Contract chip token and the mock cipher runtime, plus four
//! funded players who have approved the contract.

use soroban_sdk::{
    testutils::Address as _,
    token::{StellarAssetClient, TokenClient},
    Address, Env, InvokeError, Vec,
};

use crate::cipher::{MockCipherRuntime, MockCipherRuntimeClient};
use crate::types::*;
use crate::{PokerContract, PokerContractClient};

pub const BUY_IN: i128 = 1000;
pub const MAX_PLAYERS: u32 = 5;
pub const BIG_BLIND: i128 = 10;
pub const WALLET_FUNDS: i128 = 10_000;
pub const TABLE_ID: u32 = 0;

pub struct PokerFixture<'a> {
    pub env: Env,
    pub client: PokerContractClient<'a>,
    pub token: TokenClient<'a>,
    pub token_admin: StellarAssetClient<'a>,
    pub native: TokenClient<'a>,
    pub cipher: MockCipherRuntimeClient<'a>,
    pub admin: Address,
    pub player1: Address,
    pub player2: Address,
    pub player3: Address,
    pub player4: Address,
}

/// Deploy a Stellar Asset Contract; returns user and admin clients.
fn create_token<'a>(env: &Env, admin: &Address) -> (TokenClient<'a>, StellarAssetClient<'a>) {
    let sac = env.register_stellar_asset_contract_v2(admin.clone());
    (
        TokenClient::new(env, &sac.address()),
        StellarAssetClient::new(env, &sac.address()),
    )
}

/// Deploy the contract without any table.
pub fn deploy_poker() -> PokerFixture<'static> {
    let env = Env::default();
    env.mock_all_auths();

    let admin = Address::generate(&env);
    let token_issuer = Address::generate(&env);
    let (token, token_admin) = create_token(&env, &token_issuer);
    let (native, _) = create_token(&env, &token_issuer);

    let cipher_id = env.register(MockCipherRuntime, ());
    let cipher = MockCipherRuntimeClient::new(&env, &cipher_id);

    let contract_id = env.register(PokerContract, (&admin, &native.address, &cipher_id));
    let client = PokerContractClient::new(&env, &contract_id);

    let player1 = Address::generate(&env);
    let player2 = Address::generate(&env);
    let player3 = Address::generate(&env);
    let player4 = Address::generate(&env);

    PokerFixture {
        env,
        client,
        token,
        token_admin,
        native,
        cipher,
        admin,
        player1,
        player2,
        player3,
        player4,
    }
}

/// Table 0 (buy-in 1000, 5 seats, big blind 10) and four players holding
/// 10 000 chip tokens each, all approved for the contract.
pub fn setup_table() -> PokerFixture<'static> {
    let s = deploy_poker();

    let table_id = s
        .client
        .initialize_table(&s.admin, &BUY_IN, &MAX_PLAYERS, &BIG_BLIND, &Some(s.token.address.clone()));
    assert_eq!(table_id, TABLE_ID);

    s.token_admin.mint(&s.admin, &(WALLET_FUNDS * 4));
    for player in s.players().iter() {
        s.token.transfer(&s.admin, &player, &WALLET_FUNDS);
        s.approve(&player, WALLET_FUNDS);
    }
    s
}

impl PokerFixture<'_> {
    pub fn players(&self) -> Vec<Address> {
        Vec::from_array(
            &self.env,
            [
                self.player1.clone(),
                self.player2.clone(),
                self.player3.clone(),
                self.player4.clone(),
            ],
        )
    }

    pub fn approve(&self, player: &Address, amount: i128) {
        let expiration = self.env.ledger().sequence() + 10_000;
        self.token
            .approve(player, &self.client.address, &amount, &expiration);
    }

    /// Buy in every listed player for the table minimum.
    pub fn buy_in(&self, players: &[&Address]) {
        for player in players {
            self.client.buy_in(player, &TABLE_ID, &BUY_IN);
        }
    }

    pub fn deal(&self) -> u32 {
        self.client.deal_cards(&self.admin, &TABLE_ID)
    }

    pub fn round(&self) -> Round {
        let hand = self.client.tables(&TABLE_ID).total_hands;
        self.client.rounds(&TABLE_ID, &hand)
    }

    pub fn turn(&self) -> Address {
        self.round().turn
    }

    pub fn play(&self, player: &Address, action: PlayerAction, amount: i128) {
        self.client.play_hand(player, &TABLE_ID, &action, &amount);
    }

    pub fn chips(&self, player: &Address) -> i128 {
        self.client.player_chips_remaining(player, &TABLE_ID)
    }

    /// The owner's view of their hole cards.
    pub fn open_cards(&self, player: &Address, hand_number: u32) -> (u32, u32) {
        let hand = self
            .client
            .player_cards_encrypted(player, &TABLE_ID, &hand_number);
        (
            self.cipher.unseal(player, &hand.card1_encrypted),
            self.cipher.unseal(player, &hand.card2_encrypted),
        )
    }
}

pub fn assert_poker_error<T, E>(
    result: &Result<Result<T, E>, Result<PokerError, InvokeError>>,
    expected: PokerError,
) {
    match result {
        Err(Ok(actual)) => assert_eq!(
            *actual, expected,
            "expected {:?} ({}), got {:?} ({})",
            expected, expected as u32, actual, *actual as u32
        ),
        Err(Err(invoke_err)) => panic!(
            "expected {:?} ({}), got invoke error: {:?}",
            expected, expected as u32, invoke_err
        ),
        Ok(_) => panic!("expected {:?} ({}), got success", expected, expected as u32),
    }
}
