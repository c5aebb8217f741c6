use std::collections::BTreeMap;
use std::fs;

use patriot_consensus::{LedgerSnapshot, VotingEngine};
use patriot_nullables::{NullWorld, TestVoter};
use patriot_store::{LoadError, PaymentsDb};
use patriot_types::{BlockHeight, NetworkId, PaymentParams};
use proptest::prelude::*;

const TIP: BlockHeight = 1000;

/// A ledger built by feeding signed votes from ten ranked voters through the
/// engine. `(voter, height offset, payee seed)` per vote; repeats for the
/// same voter and height are refused by the engine and simply skipped.
fn ledger_from(votes: &[(usize, u32, u8)]) -> LedgerSnapshot {
    let world = NullWorld::new();
    world.registry.set_best_height(TIP);
    let voters = TestVoter::many(10);
    for voter in &voters {
        voter.register_legacy(&world.registry, u32::from(voter.seed));
    }
    let engine = VotingEngine::new(PaymentParams::default(), world.collaborators());
    for &(who, offset, target) in votes {
        let payee = TestVoter::new(target).payee();
        let _ = engine.process_vote(voters[who].vote(TIP + offset, &payee), None);
    }
    engine.snapshot()
}

fn vote_plan() -> impl Strategy<Value = Vec<(usize, u32, u8)>> {
    prop::collection::vec((0usize..10, 0u32..20, 200u8..204), 1..30)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Any single flipped bit is caught by the checksum, never decoded.
    #[test]
    fn bit_flip_is_checksum_mismatch(
        entries in prop::collection::btree_map(0u32..10_000, "[a-z]{1,12}", 1..20),
        position in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let dir = tempfile::tempdir().unwrap();
        let db = PaymentsDb::new(dir.path().join("mnpayments.dat"), NetworkId::Main);
        db.write(&entries).unwrap();

        let mut bytes = fs::read(db.path()).unwrap();
        let at = position.index(bytes.len());
        bytes[at] ^= 1 << bit;
        fs::write(db.path(), &bytes).unwrap();

        let loaded = db.read::<BTreeMap<u32, String>>();
        prop_assert!(matches!(loaded, Err(LoadError::ChecksumMismatch)));
    }

    /// What was written is what is read.
    #[test]
    fn written_state_reads_back(
        entries in prop::collection::btree_map(0u32..10_000, "[a-z]{0,12}", 0..50),
    ) {
        let dir = tempfile::tempdir().unwrap();
        let db = PaymentsDb::new(dir.path().join("mnpayments.dat"), NetworkId::Test);
        db.write(&entries).unwrap();
        prop_assert_eq!(db.read::<BTreeMap<u32, String>>().unwrap(), entries);
    }

    /// The persisted ledger, votes and tallies both, survives a write.
    #[test]
    fn ledger_snapshot_reads_back(plan in vote_plan()) {
        let snapshot = ledger_from(&plan);
        prop_assert!(!snapshot.votes.is_empty());
        prop_assert!(!snapshot.blocks.is_empty());

        let dir = tempfile::tempdir().unwrap();
        let db = PaymentsDb::new(dir.path().join("mnpayments.dat"), NetworkId::Main);
        db.write(&snapshot).unwrap();
        prop_assert_eq!(db.read::<LedgerSnapshot>().unwrap(), snapshot);
    }

    /// A flipped bit anywhere in a real ledger file is caught by the checksum.
    #[test]
    fn ledger_snapshot_bit_flip_is_checksum_mismatch(
        plan in vote_plan(),
        position in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let dir = tempfile::tempdir().unwrap();
        let db = PaymentsDb::new(dir.path().join("mnpayments.dat"), NetworkId::Main);
        db.write(&ledger_from(&plan)).unwrap();

        let mut bytes = fs::read(db.path()).unwrap();
        let at = position.index(bytes.len());
        bytes[at] ^= 1 << bit;
        fs::write(db.path(), &bytes).unwrap();

        prop_assert!(matches!(db.read::<LedgerSnapshot>(), Err(LoadError::ChecksumMismatch)));
    }
}
