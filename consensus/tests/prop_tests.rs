use patriot_consensus::{subtract_from_coinstake, BlockPayees};
use patriot_types::{Amount, KeyId, Script, Transaction, TxOut};
use proptest::prelude::*;

fn script(n: u8) -> Script {
    Script::pay_to_key_id(&KeyId::new([n; 20]))
}

proptest! {
    /// The coinstake gives up exactly the payment, and every stake output
    /// except the last gives up the same share.
    #[test]
    fn coinstake_split_conserves_value(
        stake_outputs in 2usize..=50,
        payment in 0i64..10_000_000_000,
        appended in 0usize..3,
    ) {
        let mut outputs = vec![TxOut::empty()];
        outputs.extend((1..stake_outputs).map(|_| TxOut::new(Amount::new(100_000_000_000), script(1))));
        outputs.extend((0..appended).map(|_| TxOut::new(Amount::new(7), script(2))));
        let mut tx = Transaction::coinstake(outputs);
        let before = tx.value_out();

        subtract_from_coinstake(&mut tx, Amount::new(payment), stake_outputs).unwrap();

        prop_assert_eq!(before - tx.value_out(), Amount::new(payment));
        let taken: Vec<i64> = tx.outputs[1..stake_outputs]
            .iter()
            .map(|o| 100_000_000_000 - o.value.units())
            .collect();
        let share = taken[0];
        for t in &taken[..taken.len() - 1] {
            prop_assert_eq!(*t, share);
        }
        prop_assert!(taken[taken.len() - 1] >= share);
        for out in &tx.outputs[stake_outputs..] {
            prop_assert_eq!(out.value, Amount::new(7));
        }
    }

    /// Below the vote threshold every transaction passes.
    #[test]
    fn inconclusive_tally_accepts_anything(
        votes in proptest::collection::vec(0u8..5, 0..16),
        paid in 0u8..10,
        amount in 0i64..1_000_000_000,
    ) {
        let mut tally = BlockPayees::new(100);
        let mut counts = [0u32; 5];
        for v in &votes {
            counts[*v as usize] += 1;
            tally.add_vote(&script(*v));
        }
        prop_assume!(counts.iter().all(|c| *c < 6));

        let tx = Transaction::coinbase(vec![TxOut::new(Amount::new(amount), script(paid))]);
        prop_assert!(tally.is_transaction_valid(&tx, Amount::from_coins(3), 6));
    }

    /// The winner has at least as many votes as every other destination.
    #[test]
    fn tally_winner_has_most_votes(votes in proptest::collection::vec(0u8..5, 1..40)) {
        let mut tally = BlockPayees::new(100);
        for v in &votes {
            tally.add_vote(&script(*v));
        }
        let winner = tally.payee().cloned().unwrap();
        let best = tally.payees.iter().find(|p| p.script == winner).unwrap().votes;
        prop_assert!(tally.payees.iter().all(|p| p.votes <= best));
        let total: u32 = tally.payees.iter().map(|p| p.votes).sum();
        prop_assert_eq!(total as usize, votes.len());
    }
}
