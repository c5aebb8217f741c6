use std::sync::Arc;

use patriot_consensus::{PeerId, VoteOutcome, VoteRejection, VotingEngine};
use patriot_messages::{InventoryItem, PaymentMessage, SyncItem};
use patriot_network::{Handled, IgnoreReason, NetworkError, PaymentSync, PeerInfo};
use patriot_nullables::{NullWorld, TestVoter};
use patriot_types::{BlockHeight, NetworkId, PaymentParams, Script, VoteHash};

const TIP: BlockHeight = 1000;

fn peer(id: u64) -> PeerInfo {
    PeerInfo {
        id: PeerId(id),
        protocol_version: 70_923,
    }
}

fn payee() -> Script {
    TestVoter::new(200).payee()
}

/// Ten voters registered with 40 nodes enabled.
fn setup(network: NetworkId) -> (NullWorld, Arc<VotingEngine>, PaymentSync) {
    let world = NullWorld::new();
    world.registry.set_best_height(TIP);
    world.registry.set_enabled_count(40);
    for voter in TestVoter::many(10) {
        voter.register_legacy(&world.registry, u32::from(voter.seed));
    }
    let engine = Arc::new(VotingEngine::new(
        PaymentParams::for_network(network),
        world.collaborators(),
    ));
    let sync = PaymentSync::new(engine.clone(), world.peers.clone(), network);
    (world, engine, sync)
}

fn record(engine: &VotingEngine, seed: u8, height: BlockHeight) -> VoteHash {
    match engine.process_vote(TestVoter::new(seed).vote(height, &payee()), None) {
        Ok(VoteOutcome::Recorded(hash)) => hash,
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[test]
fn request_announces_recent_votes_and_count() {
    let (_world, engine, sync) = setup(NetworkId::Main);
    let recent = record(&engine, 1, TIP - 5);
    let future = record(&engine, 2, TIP + 20);
    record(&engine, 3, TIP - 40);

    let handled = sync
        .handle(&peer(1), PaymentMessage::GetPaymentVotes { count: 10 })
        .unwrap();

    let Handled::Served { replies, announced } = handled else {
        panic!("request was not served");
    };
    assert_eq!(announced, 2);
    let PaymentMessage::Inventory(items) = &replies[0] else {
        panic!("first reply must be the inventory");
    };
    let mut hashes: Vec<VoteHash> = items.iter().map(|i| i.hash).collect();
    hashes.sort();
    let mut expected = vec![recent, future];
    expected.sort();
    assert_eq!(hashes, expected);
    assert_eq!(
        replies[1],
        PaymentMessage::SyncStatusCount {
            item: SyncItem::PaymentVotes,
            count: 2
        }
    );
}

#[test]
fn request_count_is_clamped_to_enabled_backlog() {
    let (_world, engine, sync) = setup(NetworkId::Main);
    record(&engine, 1, TIP - 50);
    // 40 enabled: at most 50 blocks back, however many are asked for.
    assert_eq!(sync.inventory_for(10_000).len(), 1);
    assert_eq!(sync.inventory_for(49).len(), 0);
    assert_eq!(
        sync.request(),
        PaymentMessage::GetPaymentVotes { count: 50 }
    );
}

#[test]
fn repeated_request_on_mainnet_is_penalized() {
    let (world, _engine, sync) = setup(NetworkId::Main);
    let ask = PaymentMessage::GetPaymentVotes { count: 10 };

    assert!(sync.handle(&peer(4), ask.clone()).is_ok());
    let err = sync.handle(&peer(4), ask.clone()).unwrap_err();
    assert!(matches!(err, NetworkError::RepeatedRequest(PeerId(4))));
    assert_eq!(world.peers.penalties(), vec![(PeerId(4), 20)]);

    // Other peers are unaffected.
    assert!(sync.handle(&peer(5), ask).is_ok());
}

#[test]
fn repeated_request_allowed_on_testnet() {
    let (world, _engine, sync) = setup(NetworkId::Test);
    let ask = PaymentMessage::GetPaymentVotes { count: 10 };
    assert!(sync.handle(&peer(4), ask.clone()).is_ok());
    assert!(sync.handle(&peer(4), ask).is_ok());
    assert!(world.peers.penalties().is_empty());
}

#[test]
fn incoming_vote_reaches_engine() {
    let (world, engine, sync) = setup(NetworkId::Main);
    let vote = TestVoter::new(1).vote(TIP + 1, &payee());
    let bytes = PaymentMessage::PaymentVote(vote).encode().unwrap();

    let handled = sync.handle_bytes(&peer(2), &bytes).unwrap();
    assert!(matches!(handled, Handled::Vote(Ok(VoteOutcome::Recorded(_)))));
    assert_eq!(engine.vote_count(), 1);
    assert_eq!(world.peers.relayed().len(), 1);
}

#[test]
fn rejected_vote_is_reported() {
    let (_world, _engine, sync) = setup(NetworkId::Main);
    let vote = TestVoter::new(1).vote(TIP + 21, &payee());
    let handled = sync
        .handle(&peer(2), PaymentMessage::PaymentVote(vote))
        .unwrap();
    let Handled::Vote(Err(rejection)) = handled else {
        panic!("vote should be rejected");
    };
    assert!(matches!(rejection, VoteRejection::OutOfRange { .. }));
}

#[test]
fn outdated_peer_votes_are_ignored() {
    let (_world, engine, sync) = setup(NetworkId::Main);
    let old = PeerInfo {
        id: PeerId(3),
        protocol_version: 70_922,
    };
    let vote = TestVoter::new(1).vote(TIP + 1, &payee());
    assert_eq!(
        sync.handle(&old, PaymentMessage::PaymentVote(vote)).unwrap(),
        Handled::Ignored(IgnoreReason::OutdatedPeer)
    );
    assert_eq!(engine.vote_count(), 0);
}

#[test]
fn nothing_handled_before_blockchain_sync() {
    let (world, engine, sync) = setup(NetworkId::Main);
    world.sync.set_blockchain_synced(false);
    let vote = TestVoter::new(1).vote(TIP + 1, &payee());
    assert_eq!(
        sync.handle(&peer(1), PaymentMessage::PaymentVote(vote)).unwrap(),
        Handled::Ignored(IgnoreReason::BlockchainNotSynced)
    );
    assert_eq!(
        sync.handle(&peer(1), PaymentMessage::GetPaymentVotes { count: 1 })
            .unwrap(),
        Handled::Ignored(IgnoreReason::BlockchainNotSynced)
    );
    assert_eq!(engine.vote_count(), 0);
}

#[test]
fn messages_ignored_once_legacy_is_obsolete() {
    let world = NullWorld::new();
    world.registry.set_best_height(TIP);
    let params = PaymentParams {
        deterministic_activation_height: TIP,
        ..PaymentParams::default()
    };
    let engine = Arc::new(VotingEngine::new(params, world.collaborators()));
    let sync = PaymentSync::new(engine, world.peers.clone(), NetworkId::Main);

    assert_eq!(
        sync.handle(&peer(1), PaymentMessage::GetPaymentVotes { count: 1 })
            .unwrap(),
        Handled::Ignored(IgnoreReason::LegacyObsolete)
    );
}

#[test]
fn inventory_asks_only_for_unknown_votes() {
    let (_world, engine, sync) = setup(NetworkId::Main);
    let known = record(&engine, 1, TIP + 1);
    let unknown = VoteHash::new([0xAB; 32]);

    let handled = sync
        .handle(
            &peer(1),
            PaymentMessage::Inventory(vec![
                InventoryItem::payment_vote(known),
                InventoryItem::payment_vote(unknown),
            ]),
        )
        .unwrap();
    assert_eq!(handled, Handled::Wanted(vec![unknown]));

    let message = sync.vote_message(&known).unwrap();
    assert!(matches!(message, PaymentMessage::PaymentVote(v) if v.hash() == known));
    assert!(sync.vote_message(&unknown).is_none());
}

#[test]
fn malformed_frame_is_an_error() {
    let (_world, _engine, sync) = setup(NetworkId::Main);
    assert!(matches!(
        sync.handle_bytes(&peer(1), &[0xFF, 0xFF]),
        Err(NetworkError::Message(_))
    ));
}
